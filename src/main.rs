use anyhow::Result;
use clap::{crate_version, App, Arg, ArgMatches};
use std::path::PathBuf;
use thoughtstorm::build::build_site;
use thoughtstorm::config::Config;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let matches = App::new("thoughtstorm")
        .version(crate_version!())
        .about("Generates a static blog from a directory of markdown posts")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help(
                    "The project file. Without it, the nearest thoughtstorm.yaml in the \
                     working directory or any parent directory is used, if one exists",
                ),
        )
        .arg(
            Arg::with_name("source")
                .short("s")
                .long("source")
                .value_name("DIR")
                .takes_value(true)
                .help("The directory holding the markdown posts (default: posts)"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .takes_value(true)
                .help("The directory the HTML pages are written to (default: output)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Logs progress to stderr; repeat for more detail"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"))?;

    let config = load_config(&matches)?.with_overrides(
        matches.value_of("source").map(PathBuf::from),
        matches.value_of("output").map(PathBuf::from),
    );
    build_site(&config)?;

    println!(
        "Blog generated in the '{}' directory.",
        config.output_directory.display()
    );
    Ok(())
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    match matches.value_of("config") {
        Some(path) => Config::from_project_file(&PathBuf::from(path)),
        None => Config::from_directory(&std::env::current_dir()?),
    }
}

fn init_logging(verbosity: u64) -> Result<()> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

use crate::parser::SortOrder;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the optional project file.
pub const PROJECT_FILE: &str = "thoughtstorm.yaml";

const DEFAULT_POSTS_DIRECTORY: &str = "posts";
const DEFAULT_OUTPUT_DIRECTORY: &str = "output";

/// The optional project file. Every key may be omitted. Directories are
/// relative to the file's own directory.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Project {
    posts_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    title: Option<String>,
    tagline: Option<String>,
    stylesheet: Option<String>,
    sort: Option<SortOrder>,
}

/// Site-wide values shared by every rendered page.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    /// The `<title>` of the index page.
    pub title: String,

    /// The heading at the top of the index page.
    pub tagline: String,

    /// The stylesheet every page links to, relative to the output directory.
    /// It is never generated; it's expected to already be there.
    pub stylesheet: String,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            title: String::from("thoughtStorm"),
            tagline: String::from("irrelevant thoughts about anything or everything"),
            stylesheet: String::from("style.css"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub posts_directory: PathBuf,
    pub output_directory: PathBuf,
    pub site: Site,
    pub sort: SortOrder,
}

impl Default for Config {
    /// `posts` in, `output` out, relative to the working directory.
    fn default() -> Self {
        Config {
            posts_directory: PathBuf::from(DEFAULT_POSTS_DIRECTORY),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            site: Site::default(),
            sort: SortOrder::default(),
        }
    }
}

impl Config {
    /// Looks for a [`PROJECT_FILE`] in `dir` and then in each of its
    /// ancestors, loading the first one found. Without one, the defaults
    /// apply.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        for ancestor in dir.ancestors() {
            let path = ancestor.join(PROJECT_FILE);
            if path.is_file() {
                return match Config::from_project_file(&path) {
                    Ok(config) => Ok(config),
                    Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
                };
            }
        }
        Ok(Config::default())
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = match File::open(path) {
            Err(e) => return Err(anyhow!("Opening project file `{}`: {}", path.display(), e)),
            Ok(file) => file,
        };
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config::from_project(project_root, project)),
        }
    }

    fn from_project(project_root: &Path, project: Project) -> Config {
        let defaults = Config::default();
        Config {
            posts_directory: project_root.join(
                project
                    .posts_directory
                    .unwrap_or(defaults.posts_directory),
            ),
            output_directory: project_root.join(
                project
                    .output_directory
                    .unwrap_or(defaults.output_directory),
            ),
            site: Site {
                title: project.title.unwrap_or(defaults.site.title),
                tagline: project.tagline.unwrap_or(defaults.site.tagline),
                stylesheet: project.stylesheet.unwrap_or(defaults.site.stylesheet),
            },
            sort: project.sort.unwrap_or(defaults.sort),
        }
    }

    /// Replaces the source and output directories with any given on the
    /// command line.
    pub fn with_overrides(
        mut self,
        posts_directory: Option<PathBuf>,
        output_directory: Option<PathBuf>,
    ) -> Config {
        if let Some(dir) = posts_directory {
            self.posts_directory = dir;
        }
        if let Some(dir) = output_directory {
            self.output_directory = dir;
        }
        self
    }
}

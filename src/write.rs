use crate::render::Page;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The file name of the index page inside the output directory.
pub const INDEX_FILE: &str = "index.html";

/// Responsible for writing rendered pages to disk.
pub struct Writer<'a> {
    /// The directory in which every page is written. Post pages land at
    /// `{output_directory}/{identifier}.html` and the index page at
    /// `{output_directory}/index.html`.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Creates the output directory if needed, then writes each post page and
    /// the index page, replacing any existing files of the same name. Files
    /// already in the directory that don't correspond to a page are left
    /// alone.
    pub fn write_site(&self, posts: &[Page], index: &str) -> Result<()> {
        std::fs::create_dir_all(self.output_directory).map_err(|err| {
            Error::CreateDirectory {
                path: self.output_directory.to_owned(),
                err,
            }
        })?;

        for page in posts {
            self.write_file(&page.file_name(), &page.html)?;
        }
        self.write_file(INDEX_FILE, index)
    }

    /// Writes a single file into the output directory, truncating it first if
    /// it exists.
    fn write_file(&self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.output_directory.join(file_name);
        std::fs::write(&path, contents).map_err(|err| Error::WriteFile {
            path: path.clone(),
            err,
        })?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote page");
        Ok(())
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// Returned when the output directory can't be created (e.g., a file
    /// already has its name).
    CreateDirectory { path: PathBuf, err: io::Error },

    /// Returned when an output file can't be written.
    WriteFile { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CreateDirectory { path, err } => {
                write!(f, "Creating output directory '{}': {}", path.display(), err)
            }
            Error::WriteFile { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CreateDirectory { path: _, err } => Some(err),
            Error::WriteFile { path: _, err } => Some(err),
        }
    }
}

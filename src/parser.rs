//! Defines the [`Parser`] and its [`Error`] type: the logic for loading
//! [`Post`]s from a source directory into memory.

use std::{
    collections::HashSet,
    fmt,
    fs::{self, Metadata},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::post::{self, Post};

/// The order in which loaded posts are handed to the renderer (and therefore
/// listed on the index page).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Directory enumeration order. Platform-defined and not guaranteed to be
    /// stable across environments.
    Filesystem,

    /// Ascending by source file name.
    Name,

    /// Most recent first, ties broken by identifier.
    Date,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Filesystem
    }
}

/// Loads [`Post`] objects from source files.
pub struct Parser {
    order: SortOrder,
}

impl Parser {
    /// Constructs a new parser which emits posts in the given `order`.
    pub fn new(order: SortOrder) -> Parser {
        Parser { order }
    }

    /// Searches `source_directory` (non-recursively) for markdown files (see
    /// [`post::MARKDOWN_EXTENSIONS`]) and returns one [`Post`] per file. Each
    /// file is structured as a title line followed by the markdown body:
    ///
    /// ```md
    /// # Hello, world!
    ///
    /// Today is the first day of the rest of the blog.
    /// ```
    ///
    /// Subdirectories and files with other extensions are skipped without
    /// being inspected, so a broken symlink named `notes.txt` is harmless. Any
    /// failure reading an eligible file aborts the whole load.
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        let mut walker = WalkDir::new(source_directory)
            .min_depth(1)
            .max_depth(1);
        if self.order == SortOrder::Name {
            walker = walker.sort_by(|a, b| a.file_name().cmp(b.file_name()));
        }

        let mut posts = Vec::new();
        let mut seen = HashSet::new();
        for result in walker {
            let entry = result?;
            let identifier = match post::identifier(Path::new(entry.file_name())) {
                Some(identifier) => identifier,
                None => continue,
            };
            // follows symlinks
            let metadata = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    return Err(Error::Annotated(
                        format!("reading `{}`", entry.path().display()),
                        Box::new(Error::Io(e)),
                    ))
                }
            };
            if !metadata.is_file() {
                continue;
            }
            if !seen.insert(identifier.to_owned()) {
                warn!(identifier, "duplicate post identifier; the later file wins");
            }
            posts.push(self.parse_post(entry.path(), identifier, &metadata)?);
        }

        if self.order == SortOrder::Date {
            sort_by_date(&mut posts);
        }
        Ok(posts)
    }

    /// Parses a single [`Post`], annotating any failure with the source
    /// path.
    fn parse_post(&self, path: &Path, identifier: &str, metadata: &Metadata) -> Result<Post> {
        match self._parse_post(path, identifier, metadata) {
            Ok(post) => Ok(post),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(&self, path: &Path, identifier: &str, metadata: &Metadata) -> Result<Post> {
        let contents = fs::read_to_string(path)?;
        let created_at = changed_at(metadata)
            .ok_or_else(|| Error::Timestamp(path.to_owned()))?;

        let post = Post::new(identifier, &contents, created_at);
        if post.title.is_empty() {
            warn!(path = %path.display(), "post has an empty title");
        }
        debug!(identifier, title = %post.title, "loaded post");
        Ok(post)
    }
}

/// Sorts posts most recent first. Posts sharing a timestamp are ordered by
/// identifier so the result doesn't depend on enumeration order.
fn sort_by_date(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.identifier.cmp(&b.identifier))
    });
}

/// The file's last metadata-change time (`ctime`).
#[cfg(unix)]
fn changed_at(metadata: &Metadata) -> Option<DateTime<Local>> {
    use chrono::TimeZone;
    use std::os::unix::fs::MetadataExt;
    Local
        .timestamp_opt(metadata.ctime(), metadata.ctime_nsec() as u32)
        .earliest()
}

/// The closest portable stand-in for a metadata-change time.
#[cfg(not(unix))]
fn changed_at(metadata: &Metadata) -> Option<DateTime<Local>> {
    metadata.modified().ok().map(DateTime::from)
}

/// Represents the result of a [`Post`]-load operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a file's timestamp can't be represented as a local date.
    Timestamp(PathBuf),

    /// Returned for I/O errors, including source files that aren't valid
    /// UTF-8.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors (e.g., a missing source directory).
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Timestamp(path) => {
                write!(f, "invalid timestamp for `{}`", path.display())
            }
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Timestamp(_) => None,
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for directory traversal.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &[u8]) -> std::io::Result<()> {
        fs::write(dir.join(name), contents)
    }

    #[test]
    fn test_parse_posts() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write(dir.path(), "hello.md", b"# Hello World\n\nThis is a test.")?;

        let posts = Parser::new(SortOrder::Filesystem).parse_posts(dir.path())?;
        assert_eq!(1, posts.len());
        assert_eq!("hello", posts[0].identifier);
        assert_eq!("Hello World", posts[0].title);
        assert_eq!("\nThis is a test.", posts[0].body);
        Ok(())
    }

    #[test]
    fn test_parse_posts_skips_other_files_and_subdirectories(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write(dir.path(), "a.md", b"# A\n")?;
        write(dir.path(), "b.markdown", b"# B\n")?;
        write(dir.path(), "notes.txt", b"# Not a post\n")?;
        write(dir.path(), "style.css", b"body {}")?;
        fs::create_dir(dir.path().join("nested.md"))?;
        fs::create_dir(dir.path().join("drafts"))?;
        write(&dir.path().join("drafts"), "c.md", b"# C\n")?;

        let posts = Parser::new(SortOrder::Name).parse_posts(dir.path())?;
        let identifiers: Vec<&str> =
            posts.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(vec!["a", "b"], identifiers);
        Ok(())
    }

    #[test]
    fn test_parse_posts_empty_directory(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let posts = Parser::new(SortOrder::Filesystem).parse_posts(dir.path())?;
        assert!(posts.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_posts_empty_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write(dir.path(), "blank.md", b"")?;

        let posts = Parser::new(SortOrder::Filesystem).parse_posts(dir.path())?;
        assert_eq!("", posts[0].title);
        assert_eq!("", posts[0].body);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_posts_dated_by_ctime() -> std::result::Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::MetadataExt;
        let dir = TempDir::new()?;
        write(dir.path(), "dated.md", b"# Written January 1, 1999

body")?;

        let posts = Parser::new(SortOrder::Filesystem).parse_posts(dir.path())?;
        let metadata = fs::metadata(dir.path().join("dated.md"))?;
        assert_eq!(metadata.ctime(), posts[0].created_at.timestamp());
        assert_eq!(
            metadata.ctime_nsec() as u32,
            posts[0].created_at.timestamp_subsec_nanos()
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_posts_ignores_broken_symlinks_to_other_files(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write(dir.path(), "a.md", b"# A\n")?;
        std::os::unix::fs::symlink("/nonexistent/x", dir.path().join("notes.txt"))?;

        let posts = Parser::new(SortOrder::Filesystem).parse_posts(dir.path())?;
        let identifiers: Vec<&str> =
            posts.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(vec!["a"], identifiers);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_posts_follows_symlinked_sources(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let elsewhere = TempDir::new()?;
        write(elsewhere.path(), "real.md", b"# Linked\n")?;
        std::os::unix::fs::symlink(
            elsewhere.path().join("real.md"),
            dir.path().join("linked.md"),
        )?;

        let posts = Parser::new(SortOrder::Filesystem).parse_posts(dir.path())?;
        assert_eq!(1, posts.len());
        assert_eq!("linked", posts[0].identifier);
        assert_eq!("Linked", posts[0].title);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_posts_broken_markdown_symlink(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        std::os::unix::fs::symlink("/nonexistent/x", dir.path().join("gone.md"))?;

        match Parser::new(SortOrder::Filesystem).parse_posts(dir.path()) {
            Err(Error::Annotated(_, err)) => match *err {
                Error::Io(e) => assert_eq!(std::io::ErrorKind::NotFound, e.kind()),
                other => panic!("unexpected error: {}", other),
            },
            other => panic!("wanted an annotated I/O error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_posts_sorted_by_name(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        for name in &["zeta.md", "alpha.md", "mid.md"] {
            write(dir.path(), name, b"# Title\n")?;
        }
        let posts = Parser::new(SortOrder::Name).parse_posts(dir.path())?;
        let identifiers: Vec<&str> =
            posts.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(vec!["alpha", "mid", "zeta"], identifiers);
        Ok(())
    }

    #[test]
    fn test_sort_by_date() {
        use chrono::TimeZone;
        let at = |day| Local.with_ymd_and_hms(2021, 4, day, 12, 0, 0).unwrap();
        let mut posts = vec![
            Post::new("old", "# Old\n", at(1)),
            Post::new("tie-b", "# B\n", at(5)),
            Post::new("new", "# New\n", at(9)),
            Post::new("tie-a", "# A\n", at(5)),
        ];
        sort_by_date(&mut posts);
        let identifiers: Vec<&str> =
            posts.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(vec!["new", "tie-a", "tie-b", "old"], identifiers);
    }

    #[test]
    fn test_parse_posts_invalid_utf8() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write(dir.path(), "bad.md", &[0xff, 0xfe, 0x00, 0x80])?;

        match Parser::new(SortOrder::Filesystem).parse_posts(dir.path()) {
            Err(Error::Annotated(_, err)) => match *err {
                Error::Io(e) => assert_eq!(std::io::ErrorKind::InvalidData, e.kind()),
                other => panic!("unexpected error: {}", other),
            },
            other => panic!("wanted an annotated I/O error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_posts_missing_directory() {
        let dir = Path::new("./this-directory-does-not-exist/");
        match Parser::new(SortOrder::Filesystem).parse_posts(dir) {
            Err(Error::WalkDir(_)) => {}
            other => panic!("wanted a walkdir error, got {:?}", other),
        }
    }
}

//! Defines the [`Post`] type (one markdown source document) and the
//! [`IndexEntry`] summary that the index page lists. Also holds the small pure
//! helpers that turn raw file contents and metadata into a [`Post`]: title and
//! body splitting, identifier derivation, and date formatting.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::path::Path;

/// The file extensions recognized as markdown sources. The extension is
/// stripped from the file name to produce the post identifier.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// The extension of every rendered page.
pub const HTML_EXTENSION: &str = "html";

/// The date format used on post and index pages, e.g. `April 06, 2021`.
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// A single source document, read from disk and ready to be rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The source file name less its extension. Used as the output file stem
    /// (`{identifier}.html`) and as the link target from the index page.
    pub identifier: String,

    /// The first line of the source with leading `#`/space characters and
    /// surrounding whitespace removed. May be empty.
    pub title: String,

    /// Everything after the first line, still in markdown.
    pub body: String,

    /// The file's metadata-change time in the local timezone.
    pub created_at: DateTime<Local>,
}

impl Post {
    /// Builds a [`Post`] from its identifier, raw file contents and
    /// timestamp.
    pub fn new(identifier: &str, contents: &str, created_at: DateTime<Local>) -> Post {
        let (title, body) = split_title(contents);
        Post {
            identifier: identifier.to_owned(),
            title: title.to_owned(),
            body: body.to_owned(),
            created_at,
        }
    }

    /// The human-readable publication date, e.g. `April 06, 2021`.
    pub fn date(&self) -> String {
        format_date(&self.created_at)
    }

    /// Summarizes the post for the index page.
    pub fn summarize(&self) -> IndexEntry {
        IndexEntry {
            identifier: self.identifier.clone(),
            title: self.title.clone(),
            date: self.date(),
        }
    }
}

/// One line of the index page: a link to `{identifier}.html` labeled with the
/// title, followed by the date.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexEntry {
    pub identifier: String,
    pub title: String,
    pub date: String,
}

/// Splits raw contents into `(title, body)`. The title is the first line with
/// leading heading markers stripped; the body is everything after the first
/// line break. Input without a line break has an empty body, so an empty file
/// yields two empty strings.
pub fn split_title(contents: &str) -> (&str, &str) {
    let (first_line, body) = match contents.find('\n') {
        Some(i) => (&contents[..i], &contents[i + 1..]),
        None => (contents, ""),
    };
    let title = first_line
        .trim_start_matches(|c: char| c == '#' || c == ' ')
        .trim();
    (title, body)
}

/// Returns the post identifier for a source file name, or `None` if the file
/// doesn't carry one of the [`MARKDOWN_EXTENSIONS`] (or has nothing before
/// the extension).
pub fn identifier(file_name: &Path) -> Option<&str> {
    let extension = file_name.extension()?.to_str()?;
    if !MARKDOWN_EXTENSIONS.contains(&extension) {
        return None;
    }
    file_name.file_stem()?.to_str()
}

/// Formats a timestamp with [`DATE_FORMAT`].
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format(DATE_FORMAT).to_string()
}

//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: loading the posts
//! ([`crate::parser`]), rendering post and index pages ([`crate::render`]),
//! and writing them to disk ([`crate::write`]). Each step runs to completion
//! before the next begins.

use crate::config::Config;
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::render::{Error as RenderError, Renderer};
use crate::write::{Error as WriteError, Writer};
use std::fmt;
use tracing::info;

/// Builds the site from a [`Config`] object. This calls into
/// [`PostParser::parse_posts`], [`Renderer::render_site`] and
/// [`Writer::write_site`] which do the heavy-lifting. Nothing in the output
/// directory is deleted; stale pages from earlier runs stay where they are.
pub fn build_site(config: &Config) -> Result<()> {
    // collect all posts
    let posts = PostParser::new(config.sort).parse_posts(&config.posts_directory)?;
    info!(
        count = posts.len(),
        source = %config.posts_directory.display(),
        "loaded posts"
    );

    // render every page before touching the output directory
    let renderer = Renderer::new(&config.site)?;
    let (pages, index) = renderer.render_site(&posts)?;
    info!(pages = pages.len() + 1, "rendered pages");

    // write the post and index pages
    let writer = Writer {
        output_directory: &config.output_directory,
    };
    writer.write_site(&pages, &index)?;
    info!(output = %config.output_directory.display(), "wrote site");

    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during loading,
/// rendering, or writing.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading posts from the source directory.
    Parse(ParseError),

    /// Returned for errors rendering pages.
    Render(RenderError),

    /// Returned for errors writing pages to disk.
    Write(WriteError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Render(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Write(err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<RenderError> for Error {
    /// Converts [`RenderError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: RenderError) -> Error {
        Error::Render(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

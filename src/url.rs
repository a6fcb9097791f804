//! Rewrites links between posts. Authors link to sibling sources the way they
//! appear on disk (`other.md`); the rendered pages live side by side in the
//! output directory, so those links must point at `other.html` instead.

use crate::post::{HTML_EXTENSION, MARKDOWN_EXTENSIONS};
use url::{ParseError, Url};

/// A stand-in origin used to normalize relative links. It never appears in
/// the output.
const BASE: &str = "http://site.invalid/posts/";

pub struct Converter {
    /// `None` only if [`BASE`] fails to parse, in which case no link is
    /// rewritten.
    base: Option<Url>,
}

impl Converter {
    /// Constructs a new `Converter`.
    pub fn new() -> Converter {
        Converter {
            base: Url::parse(BASE).ok(),
        }
    }

    /// Returns the stem of `relative` if it names a markdown source directly
    /// inside the posts directory (e.g. `foo.md` → `foo`).
    fn source_stem(relative: &str) -> Option<&str> {
        if relative.contains('/') {
            return None;
        }
        let (stem, extension) = relative.rsplit_once('.')?;
        match !stem.is_empty() && MARKDOWN_EXTENSIONS.contains(&extension) {
            true => Some(stem),
            false => None,
        }
    }

    fn convert_relative(&self, url: &str) -> Option<String> {
        let base = self.base.as_ref()?;
        let resolved = base.join(url).ok()?;
        let path = base.make_relative(&resolved)?;
        // `make_relative` carries the query and fragment along; only the
        // path decides whether this is a post link.
        let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or("");
        let stem = Self::source_stem(path)?;
        let mut converted = format!("{}.{}", stem, HTML_EXTENSION);
        if let Some(query) = resolved.query() {
            converted.push('?');
            converted.push_str(query);
        }
        if let Some(fragment) = resolved.fragment() {
            converted.push('#');
            converted.push_str(fragment);
        }
        Some(converted)
    }

    /// Converts a link target. Relative links to markdown sources in the
    /// posts directory become links to the corresponding HTML pages; every
    /// other link (absolute URLs, `mailto:`, fragments, assets, and targets
    /// that don't parse as URLs at all) is returned unchanged.
    pub fn convert(&self, url: &str) -> String {
        if url.starts_with('#') {
            return url.to_owned();
        }
        match Url::parse(url) {
            Err(ParseError::RelativeUrlWithoutBase) => {
                self.convert_relative(url).unwrap_or_else(|| url.to_owned())
            }
            _ => url.to_owned(),
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Converter::new()
    }
}

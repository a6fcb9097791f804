//! Turns loaded posts into complete HTML documents. There are exactly two
//! fixed templates: one for a single post and one for the index. Values are
//! interpolated verbatim; titles and dates are not HTML-escaped, so sources
//! are trusted to be author-controlled.

use crate::config::Site;
use crate::markdown;
use crate::post::{IndexEntry, Post, HTML_EXTENSION};
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::string::FromUtf8Error;

/// The template for a single post page.
const POST_TEMPLATE: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{.title}}</title>
    <link rel="stylesheet" href="{{.stylesheet}}">
</head>
<body>
    <div class="container">
        <h1>{{.title}}</h1>
        <a href="index.html" class="back-link">Back to Home</a>
        <p class="date"><i>published on {{.date}}</i></p>
        <hr>
        <div>{{.body}}</div>
    </div>
</body>
</html>
"#;

/// The template for the index page. `posts` is a list of objects with
/// `identifier`, `title` and `date` fields.
const INDEX_TEMPLATE: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{.title}}</title>
    <link rel="stylesheet" href="{{.stylesheet}}">
</head>
<body>
    <div class="container">
        <h1>{{.tagline}}</h1>
        <ul>
{{range .posts}}            <li><a href="{{.identifier}}.html">{{.title}}</a> - <span class="date">{{.date}}</span></li>
{{end}}        </ul>
    </div>
</body>
</html>
"#;

/// A rendered post page, keyed by the identifier that names its output file.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub identifier: String,
    pub html: String,
}

impl Page {
    /// The output file name, relative to the output directory.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.identifier, HTML_EXTENSION)
    }
}

/// Applies the post and index templates. Holds the parsed templates and the
/// site-wide values both pages share.
pub struct Renderer<'a> {
    site: &'a Site,
    post_template: Template,
    index_template: Template,
}

impl<'a> Renderer<'a> {
    /// Parses the page templates.
    pub fn new(site: &'a Site) -> Result<Renderer<'a>> {
        Ok(Renderer {
            site,
            post_template: parse_template(POST_TEMPLATE)?,
            index_template: parse_template(INDEX_TEMPLATE)?,
        })
    }

    /// Renders a post page from its title, markdown body and formatted date.
    pub fn render_post(&self, title: &str, body_markup: &str, date: &str) -> Result<String> {
        let body = markdown::to_html_string(body_markup);
        let mut m = self.site_values();
        m.insert("title".to_owned(), Value::String(title.to_owned()));
        m.insert("date".to_owned(), Value::String(date.to_owned()));
        m.insert("body".to_owned(), Value::String(body));
        execute(&self.post_template, Value::Object(m))
    }

    /// Renders the index page listing `entries` in the given order.
    pub fn render_index(&self, entries: &[IndexEntry]) -> Result<String> {
        let mut m = self.site_values();
        m.insert("title".to_owned(), Value::String(self.site.title.clone()));
        m.insert("tagline".to_owned(), Value::String(self.site.tagline.clone()));
        m.insert(
            "posts".to_owned(),
            Value::Array(entries.iter().map(Value::from).collect()),
        );
        execute(&self.index_template, Value::Object(m))
    }

    /// Renders every post page plus the index page. Pages come back in the
    /// same order as `posts`.
    pub fn render_site(&self, posts: &[Post]) -> Result<(Vec<Page>, String)> {
        let pages = posts
            .iter()
            .map(|post| {
                Ok(Page {
                    identifier: post.identifier.clone(),
                    html: self.render_post(&post.title, &post.body, &post.date())?,
                })
            })
            .collect::<Result<Vec<Page>>>()?;
        let entries: Vec<IndexEntry> = posts.iter().map(Post::summarize).collect();
        Ok((pages, self.render_index(&entries)?))
    }

    fn site_values(&self) -> HashMap<String, Value> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "stylesheet".to_owned(),
            Value::String(self.site.stylesheet.clone()),
        );
        m
    }
}

impl From<&IndexEntry> for Value {
    /// Converts an [`IndexEntry`] into a [`Value`] for templating.
    fn from(entry: &IndexEntry) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("identifier".to_owned(), Value::String(entry.identifier.clone()));
        m.insert("title".to_owned(), Value::String(entry.title.clone()));
        m.insert("date".to_owned(), Value::String(entry.date.clone()));
        Value::Object(m)
    }
}

fn parse_template(contents: &str) -> Result<Template> {
    let mut template = Template::default();
    template.parse(contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

fn execute(template: &Template, value: Value) -> Result<String> {
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &Context::from(value)?)?;
    Ok(String::from_utf8(out)?)
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a page.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors parsing the page templates.
    ParseTemplate(String),

    /// An error during templating.
    Template(String),

    /// Returned when the templated output isn't valid UTF-8.
    Encoding(FromUtf8Error),
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Error {
        Error::Encoding(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseTemplate(err) => write!(f, "parsing template: {}", err),
            Error::Template(err) => err.fmt(f),
            Error::Encoding(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ParseTemplate(_) => None,
            Error::Template(_) => None,
            Error::Encoding(err) => Some(err),
        }
    }
}

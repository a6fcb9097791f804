use crate::url::Converter as LinkConverter;
use pulldown_cmark::*;

/// Converts markdown to HTML, appending the result to `html`. Relative links
/// to sibling markdown sources are rewritten to point at their rendered pages
/// (see [`crate::url::Converter`]).
pub fn to_html(html: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let event_converter = EventConverter {
        link_converter: LinkConverter::new(),
    };
    html::push_html(
        html,
        Parser::new_ext(markdown, options).map(|ev| event_converter.convert(ev)),
    );
}

/// Converts markdown to an HTML string.
pub fn to_html_string(markdown: &str) -> String {
    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    to_html(&mut html, markdown);
    html
}

struct EventConverter {
    link_converter: LinkConverter,
}

impl EventConverter {
    fn convert_tag<'b>(&self, tag: Tag<'b>) -> Tag<'b> {
        match tag {
            // Links between posts are written against the source files
            // (`foo.md`) but must resolve against the output files
            // (`foo.html`).
            Tag::Link(
                link @ (LinkType::Inline
                | LinkType::Reference
                | LinkType::ReferenceUnknown
                | LinkType::Shortcut
                | LinkType::ShortcutUnknown
                | LinkType::Collapsed
                | LinkType::CollapsedUnknown),
                url,
                title,
            ) => Tag::Link(
                link,
                CowStr::Boxed(self.link_converter.convert(&url).into_boxed_str()),
                title,
            ),
            _ => tag,
        }
    }

    fn convert<'b>(&self, ev: Event<'b>) -> Event<'b> {
        match ev {
            Event::Start(tag) => Event::Start(self.convert_tag(tag)),
            _ => ev,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_plain_paragraphs_round_trip() {
        let paragraphs = ["First thought.", "Second thought.", "Third thought."];
        assert_eq!(
            "<p>First thought.</p>\n<p>Second thought.</p>\n<p>Third thought.</p>\n",
            to_html_string(&paragraphs.join("\n\n")),
        );
    }

    #[test]
    fn test_body_after_title_line() {
        assert_eq!("<p>This is a test.</p>\n", to_html_string("\nThis is a test."));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!("", to_html_string(""));
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(
            "<p><em>a</em> <strong>b</strong> <del>c</del> <code>d</code></p>\n",
            to_html_string("*a* **b** ~~c~~ `d`"),
        );
    }

    #[test]
    fn test_escapes_text() {
        assert_eq!("<p>1 &lt; 2 &amp; 3</p>\n", to_html_string("1 < 2 & 3"));
    }

    #[test]
    fn test_rewrites_post_links() {
        assert_eq!(
            "<p>See <a href=\"other.html#part-2\">the sequel</a>.</p>\n",
            to_html_string("See [the sequel](other.md#part-2)."),
        );
    }

    #[test]
    fn test_rewrites_reference_links() {
        assert_eq!(
            "<p><a href=\"other.html\">sequel</a></p>\n",
            to_html_string("[sequel]\n\n[sequel]: ./other.md"),
        );
    }

    #[test]
    fn test_leaves_external_links() {
        assert_eq!(
            "<p><a href=\"https://example.org/a.md\">out</a></p>\n",
            to_html_string("[out](https://example.org/a.md)"),
        );
    }

    #[test]
    fn test_keeps_unparseable_links() {
        assert_eq!(
            "<p>See <a href=\"http://example.org:99999/\">x</a> ok.</p>\n",
            to_html_string("See [x](http://example.org:99999/) ok."),
        );
        assert!(to_html_string("[x](http://[::1/)").contains(">x</a>"));
    }
}

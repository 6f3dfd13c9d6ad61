//! Read-only view of a loaded job posting page.

use scraper::{ElementRef, Html, Node, Selector};

use crate::extraction::ExtractionError;

/// What the extractors need from a page: the URL, the title, the visible text
/// laid out one block per line, and CSS selector lookups.
pub trait PageDom {
    fn url(&self) -> &str;

    fn title(&self) -> &str;

    fn visible_text(&self) -> &str;

    /// Trimmed text of the first element matching `selector`, or `None` when
    /// nothing matches or the match has no text.
    fn select_text(&self, selector: &str) -> Result<Option<String>, ExtractionError>;
}

/// A parsed HTML document.
pub struct HtmlPage {
    url: String,
    title: String,
    visible_text: String,
    document: Html,
}

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head", "svg"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

impl HtmlPage {
    pub fn parse(url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);
        let title = first_text(&document, "title").unwrap_or_default();
        let visible_text = render_visible_text(&document);
        Self {
            url: url.to_string(),
            title: collapse_spaces(&title),
            visible_text,
            document,
        }
    }
}

impl PageDom for HtmlPage {
    fn url(&self) -> &str {
        &self.url
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn visible_text(&self) -> &str {
        &self.visible_text
    }

    fn select_text(&self, selector: &str) -> Result<Option<String>, ExtractionError> {
        let parsed = Selector::parse(selector)
            .map_err(|_| ExtractionError::InvalidSelector(selector.to_string()))?;
        Ok(self
            .document
            .select(&parsed)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty()))
    }
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Renders the text a reader would see: block elements start new lines,
/// scripts and styles are dropped, blank lines are removed and runs of
/// whitespace inside a line collapse to one space.
fn render_visible_text(document: &Html) -> String {
    let mut raw = String::new();
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    walk(body.unwrap_or_else(|| document.root_element()), &mut raw);

    raw.lines()
        .map(collapse_spaces)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn walk(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }
    let is_block = BLOCK_ELEMENTS.contains(&name);
    if is_block {
        out.push('\n');
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    walk(child, out);
                }
            }
            _ => {}
        }
    }
    if is_block {
        out.push('\n');
    }
}

fn collapse_spaces(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head>
            <title>  Backend Engineer -
              Acme Corp </title>
            <style>.hidden { display: none }</style>
          </head>
          <body>
            <h1>Backend Engineer</h1>
            <div class="meta">Austin, <b>TX</b></div>
            <script>var salary = "$1";</script>
            <ul><li>Write Rust</li><li>Ship features</li></ul>
            <p></p>
          </body>
        </html>
    "#;

    #[test]
    fn test_title_is_whitespace_collapsed() {
        let page = HtmlPage::parse("https://example.com", PAGE);
        assert_eq!(page.title(), "Backend Engineer - Acme Corp");
    }

    #[test]
    fn test_visible_text_breaks_blocks_and_skips_scripts() {
        let page = HtmlPage::parse("https://example.com", PAGE);
        let lines: Vec<_> = page.visible_text().lines().collect();
        assert_eq!(
            lines,
            vec!["Backend Engineer", "Austin, TX", "Write Rust", "Ship features"]
        );
    }

    #[test]
    fn test_select_text_first_match_trimmed() {
        let page = HtmlPage::parse("https://example.com", PAGE);
        assert_eq!(page.select_text("li").unwrap().as_deref(), Some("Write Rust"));
        assert_eq!(page.select_text(".meta").unwrap().as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn test_select_text_empty_element_is_none() {
        let page = HtmlPage::parse("https://example.com", PAGE);
        assert_eq!(page.select_text("p").unwrap(), None);
        assert_eq!(page.select_text(".missing").unwrap(), None);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let page = HtmlPage::parse("https://example.com", PAGE);
        assert!(matches!(
            page.select_text("div[[["),
            Err(ExtractionError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_empty_document() {
        let page = HtmlPage::parse("", "");
        assert_eq!(page.title(), "");
        assert_eq!(page.visible_text(), "");
    }
}

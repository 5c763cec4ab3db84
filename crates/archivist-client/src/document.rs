//! Owned response document handle.

use scraper::Html;

/// An HTML page fetched from the archive.
///
/// `scraper::Html` is not `Send`, so the transport hands back the owned body
/// text instead; parse it on demand with [`Document::html`] and keep the
/// parsed tree inside a synchronous scope.
#[derive(Debug, Clone)]
pub struct Document {
    body: String,
}

impl Document {
    /// Wrap a response body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// The raw body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parse the body into an HTML tree.
    #[must_use]
    pub fn html(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_document_parses_on_demand() {
        let doc = Document::new("<html><body><h2 class=\"title\">Hello</h2></body></html>");
        assert!(doc.body().contains("Hello"));

        let html = doc.html();
        let selector = Selector::parse("h2.title").expect("static selector");
        let title = html.select(&selector).next().expect("title element");
        assert_eq!(title.text().collect::<String>(), "Hello");
    }
}

use crate::select::{
    all_texts, count32_from, count_from, date_from, first_attr, first_text, first_text_opt, has,
};
use archivist_core::{ArchiveError, Result};
use chrono::NaiveDate;
use scraper::Html;

/// Complete set of fields extracted from one work page.
///
/// Missing optional fields get their declared defaults; extraction only
/// fails for documents that are not work pages at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkFields {
    pub title: String,
    pub author: String,
    pub summary: Option<String>,
    pub language: String,
    pub words: u64,
    pub chapters_published: u32,
    pub chapters_expected: Option<u32>,
    pub is_completed: bool,
    pub kudos: u64,
    pub comments: u64,
    pub bookmarks: u64,
    pub hits: u64,
    pub published: Option<NaiveDate>,
    pub updated: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub relationships: Vec<(String, String)>,
    pub characters: Vec<String>,
    pub fandoms: Vec<String>,
    pub categories: Vec<String>,
    pub ratings: Vec<String>,
    pub warnings: Vec<String>,
    pub series: Option<String>,
    pub is_restricted: bool,
}

/// Extractor for work pages (`/works/{id}`).
pub struct WorkExtractor<'a> {
    html: &'a Html,
}

impl<'a> WorkExtractor<'a> {
    #[must_use]
    pub fn new(html: &'a Html) -> Self {
        Self { html }
    }

    /// Extract the full field record from the page.
    ///
    /// # Errors
    /// Returns [`ArchiveError::Parse`] when the document has neither a work
    /// title nor a work metadata block.
    pub fn extract(&self) -> Result<WorkFields> {
        if !has(self.html, "h2.title") && !has(self.html, "dl.work") {
            return Err(ArchiveError::Parse(
                "document does not contain a work metadata block".to_string(),
            ));
        }

        let (chapters_published, chapters_expected) = self.chapters();
        let warnings = all_texts(self.html, "dd.warning ul.commas li a");
        let is_restricted = self.is_restricted(&warnings);

        Ok(WorkFields {
            title: first_text(self.html, "h2.title"),
            author: self.author(),
            summary: first_text_opt(self.html, "div.summary .userstuff"),
            language: first_text(self.html, "dd.language"),
            words: count_from(&first_text(self.html, "dd.words")),
            chapters_published,
            chapters_expected,
            is_completed: self.is_completed(),
            kudos: count_from(&first_text(self.html, "dd.kudos")),
            comments: count_from(&first_text(self.html, "dd.comments")),
            bookmarks: count_from(&first_text(self.html, "dd.bookmarks")),
            hits: count_from(&first_text(self.html, "dd.hits")),
            published: date_from(&first_text(self.html, "dd.published")),
            updated: date_from(&first_text(self.html, "dd.status")),
            tags: all_texts(self.html, "dd.freeform ul.commas li a"),
            relationships: self.relationships(),
            characters: all_texts(self.html, "dd.character ul.commas li a"),
            fandoms: all_texts(self.html, "dd.fandom ul.commas li a"),
            categories: all_texts(self.html, "dd.category ul.commas li a"),
            ratings: all_texts(self.html, "dd.rating ul.commas li a"),
            warnings,
            series: self.series(),
            is_restricted,
        })
    }

    fn author(&self) -> String {
        let authors = all_texts(self.html, "a[rel='author']");
        if authors.is_empty() {
            "Anonymous".to_string()
        } else {
            authors.join(", ")
        }
    }

    /// Chapter counter rendered as `published/expected`; `?` and `∞` mean
    /// the expected total is unknown. A page without the counter is a
    /// single-chapter work.
    fn chapters(&self) -> (u32, Option<u32>) {
        let text = first_text(self.html, "dd.chapters");
        match text.split_once('/') {
            Some((published, expected)) => {
                let expected = expected.trim();
                let expected = if expected == "?" || expected == "∞" {
                    None
                } else {
                    Some(count32_from(expected))
                };
                (count32_from(published), expected)
            }
            None => (1, None),
        }
    }

    fn is_completed(&self) -> bool {
        let text = first_text(self.html, "dd.chapters");
        if let Some((published, expected)) = text.split_once('/') {
            let (published, expected) = (published.trim(), expected.trim());
            if published == expected && expected != "?" {
                return true;
            }
        }
        first_text(self.html, "dl.stats")
            .to_lowercase()
            .contains("complete")
    }

    /// Relationship tags are `A/B` (romantic) or `A & B` (platonic); a tag
    /// with no separator keeps an empty second half.
    fn relationships(&self) -> Vec<(String, String)> {
        all_texts(self.html, "dd.relationship ul.commas li a")
            .into_iter()
            .map(|tag| {
                if let Some((a, b)) = tag.split_once('/') {
                    (a.trim().to_string(), b.trim().to_string())
                } else if let Some((a, b)) = tag.split_once('&') {
                    (a.trim().to_string(), b.trim().to_string())
                } else {
                    (tag, String::new())
                }
            })
            .collect()
    }

    fn series(&self) -> Option<String> {
        first_text_opt(self.html, "dd.series span.position a")
            .or_else(|| first_text_opt(self.html, "dd.series a:not(.previous):not(.next)"))
    }

    /// Best-effort heuristic only: rating keywords are not an
    /// access-control signal, so treat this as a hint, never a boundary.
    fn is_restricted(&self, warnings: &[String]) -> bool {
        if first_attr(self.html, "h2.title", "class")
            .is_some_and(|class| class.contains("restricted"))
        {
            return true;
        }

        const INDICATORS: [&str; 4] = ["restricted", "explicit", "mature", "not rated"];
        warnings.iter().any(|warning| {
            let warning = warning.to_lowercase();
            INDICATORS.iter().any(|indicator| warning.contains(indicator))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_PAGE: &str = r##"<!DOCTYPE html>
<html>
<body>
<div class="wrapper">
  <dl class="work meta group">
    <dt class="rating tags">Rating:</dt>
    <dd class="rating tags"><ul class="commas"><li><a class="tag" href="/tags/teen">Teen And Up Audiences</a></li></ul></dd>
    <dt class="warning tags">Archive Warning:</dt>
    <dd class="warning tags"><ul class="commas"><li><a class="tag">No Archive Warnings Apply</a></li></ul></dd>
    <dt class="category tags">Category:</dt>
    <dd class="category tags"><ul class="commas"><li><a class="tag">Gen</a></li></ul></dd>
    <dt class="fandom tags">Fandom:</dt>
    <dd class="fandom tags"><ul class="commas"><li><a class="tag">Example Fandom</a></li></ul></dd>
    <dt class="relationship tags">Relationships:</dt>
    <dd class="relationship tags"><ul class="commas">
      <li><a class="tag">Alice/Bob</a></li>
      <li><a class="tag">Carol &amp; Dave</a></li>
      <li><a class="tag">Eve</a></li>
    </ul></dd>
    <dt class="character tags">Characters:</dt>
    <dd class="character tags"><ul class="commas"><li><a class="tag">Alice</a></li><li><a class="tag">Bob</a></li></ul></dd>
    <dt class="freeform tags">Additional Tags:</dt>
    <dd class="freeform tags"><ul class="commas"><li><a class="tag">Fluff</a></li><li><a class="tag">Slow Burn</a></li></ul></dd>
    <dt class="language">Language:</dt>
    <dd class="language">English</dd>
    <dt class="series">Series:</dt>
    <dd class="series"><span class="position">Part 2 of <a href="/series/99">The Example Series</a></span></dd>
    <dt class="stats">Stats:</dt>
    <dd class="stats"><dl class="stats">
      <dt class="published">Published:</dt><dd class="published">2021-03-14</dd>
      <dt class="status">Updated:</dt><dd class="status">2022-11-05</dd>
      <dt class="words">Words:</dt><dd class="words">84,312</dd>
      <dt class="chapters">Chapters:</dt><dd class="chapters">12/?</dd>
      <dt class="comments">Comments:</dt><dd class="comments">412</dd>
      <dt class="kudos">Kudos:</dt><dd class="kudos">2,350</dd>
      <dt class="bookmarks">Bookmarks:</dt><dd class="bookmarks">198</dd>
      <dt class="hits">Hits:</dt><dd class="hits">40,102</dd>
    </dl></dd>
  </dl>
  <div class="preface group">
    <h2 class="title heading">An Example Work</h2>
    <h3 class="byline heading"><a rel="author" href="/users/alice_writes">alice_writes</a></h3>
    <div class="summary module"><h3 class="heading">Summary:</h3>
      <blockquote class="userstuff"><p>Alice and Bob untangle a mystery.</p></blockquote>
    </div>
  </div>
</div>
</body>
</html>"##;

    #[test]
    fn test_extract_full_work_page() {
        let html = Html::parse_document(WORK_PAGE);
        let fields = WorkExtractor::new(&html).extract().expect("extract");

        assert_eq!(fields.title, "An Example Work");
        assert_eq!(fields.author, "alice_writes");
        assert_eq!(
            fields.summary.as_deref(),
            Some("Alice and Bob untangle a mystery.")
        );
        assert_eq!(fields.language, "English");
        assert_eq!(fields.words, 84_312);
        assert_eq!(fields.chapters_published, 12);
        assert_eq!(fields.chapters_expected, None);
        assert!(!fields.is_completed);
        assert_eq!(fields.kudos, 2_350);
        assert_eq!(fields.comments, 412);
        assert_eq!(fields.bookmarks, 198);
        assert_eq!(fields.hits, 40_102);
        assert_eq!(fields.published, NaiveDate::from_ymd_opt(2021, 3, 14));
        assert_eq!(fields.updated, NaiveDate::from_ymd_opt(2022, 11, 5));
        assert_eq!(fields.tags, vec!["Fluff", "Slow Burn"]);
        assert_eq!(
            fields.relationships,
            vec![
                ("Alice".to_string(), "Bob".to_string()),
                ("Carol".to_string(), "Dave".to_string()),
                ("Eve".to_string(), String::new()),
            ]
        );
        assert_eq!(fields.characters, vec!["Alice", "Bob"]);
        assert_eq!(fields.fandoms, vec!["Example Fandom"]);
        assert_eq!(fields.categories, vec!["Gen"]);
        assert_eq!(fields.ratings, vec!["Teen And Up Audiences"]);
        assert_eq!(fields.warnings, vec!["No Archive Warnings Apply"]);
        assert_eq!(fields.series.as_deref(), Some("The Example Series"));
        assert!(!fields.is_restricted);
    }

    #[test]
    fn test_extract_minimal_anonymous_work() {
        let html = Html::parse_document(
            r#"<html><body>
            <dl class="work meta group">
              <dt class="stats">Stats:</dt>
              <dd class="stats"><dl class="stats">
                <dt class="chapters">Chapters:</dt><dd class="chapters">3/3</dd>
              </dl></dd>
            </dl>
            <h2 class="title heading">Untitled Drabble</h2>
            </body></html>"#,
        );
        let fields = WorkExtractor::new(&html).extract().expect("extract");

        assert_eq!(fields.title, "Untitled Drabble");
        assert_eq!(fields.author, "Anonymous");
        assert_eq!(fields.summary, None);
        assert_eq!(fields.language, "");
        assert_eq!(fields.words, 0);
        assert_eq!(fields.chapters_published, 3);
        assert_eq!(fields.chapters_expected, Some(3));
        assert!(fields.is_completed);
        assert_eq!(fields.published, None);
        assert!(fields.tags.is_empty());
        assert!(fields.relationships.is_empty());
        assert_eq!(fields.series, None);
    }

    #[test]
    fn test_chapter_counter_without_slash_means_single_chapter() {
        let html = Html::parse_document(
            r#"<html><body><h2 class="title heading">One Shot</h2></body></html>"#,
        );
        let fields = WorkExtractor::new(&html).extract().expect("extract");
        assert_eq!(fields.chapters_published, 1);
        assert_eq!(fields.chapters_expected, None);
    }

    #[test]
    fn test_restricted_detection_is_heuristic() {
        let html = Html::parse_document(
            r#"<html><body>
            <h2 class="title heading restricted">Locked Work</h2>
            </body></html>"#,
        );
        let fields = WorkExtractor::new(&html).extract().expect("extract");
        assert!(fields.is_restricted);

        let html = Html::parse_document(
            r#"<html><body>
            <h2 class="title heading">Open Work</h2>
            <dl class="work meta group">
              <dd class="warning tags"><ul class="commas"><li><a class="tag">Explicit Violence</a></li></ul></dd>
            </dl>
            </body></html>"#,
        );
        let fields = WorkExtractor::new(&html).extract().expect("extract");
        assert!(fields.is_restricted);
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let html = Html::parse_document("<html><body><p>nothing here</p></body></html>");
        let err = WorkExtractor::new(&html).extract().unwrap_err();
        assert!(matches!(err, ArchiveError::Parse(_)));
    }
}

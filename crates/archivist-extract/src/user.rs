use crate::select::{date_from, first_text, has, selector};
use archivist_core::{ArchiveError, Result};
use chrono::NaiveDate;
use scraper::Html;

/// Fields extracted from a user profile page.
///
/// The profile meta list is label/value pairs; anything the user chose not
/// to publish simply stays at its default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFields {
    pub user_id: Option<String>,
    pub bio: String,
    pub location: Option<String>,
    pub joined: Option<NaiveDate>,
    pub email: Option<String>,
    pub pseuds: Vec<String>,
}

/// Extractor for user profile pages (`/users/{name}/profile`).
pub struct UserExtractor<'a> {
    html: &'a Html,
}

impl<'a> UserExtractor<'a> {
    #[must_use]
    pub fn new(html: &'a Html) -> Self {
        Self { html }
    }

    /// Extract the profile field record from the page.
    ///
    /// # Errors
    /// Returns [`ArchiveError::Parse`] when the document has neither a
    /// profile meta list nor a user block.
    pub fn extract(&self) -> Result<UserFields> {
        if !has(self.html, "dl.meta") && !has(self.html, "div.user") {
            return Err(ArchiveError::Parse(
                "document does not contain a user profile block".to_string(),
            ));
        }

        let mut fields = UserFields {
            bio: first_text(self.html, "div.bio .userstuff"),
            ..UserFields::default()
        };

        let dt_selector = selector("dl.meta dt");
        let dd_selector = selector("dl.meta dd");
        let link_selector = selector("a");

        for (dt, dd) in self
            .html
            .select(&dt_selector)
            .zip(self.html.select(&dd_selector))
        {
            let label = dt.text().collect::<String>();
            let label = label.trim().trim_end_matches(':');
            let value = dd.text().collect::<String>().trim().to_string();

            if label.starts_with("My pseuds") {
                fields.pseuds = dd
                    .select(&link_selector)
                    .map(|a| a.text().collect::<String>().trim().to_string())
                    .collect();
            } else if label.starts_with("I joined on") {
                fields.joined = date_from(&value);
            } else if label.starts_with("My user ID") {
                if !value.is_empty() {
                    fields.user_id = Some(value);
                }
            } else if label.starts_with("My email") {
                if !value.is_empty() {
                    fields.email = Some(value);
                }
            } else if (label.starts_with("My location") || label.starts_with("I live in"))
                && !value.is_empty()
            {
                fields.location = Some(value);
            }
        }

        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="user home profile">
  <div class="primary header module"><h2 class="heading">alice_writes</h2></div>
  <dl class="meta">
    <dt>My pseuds:</dt>
    <dd><a href="/users/alice_writes/pseuds/AliceWrites">AliceWrites</a>, <a href="/users/alice_writes/pseuds/al">al</a></dd>
    <dt>I joined on:</dt>
    <dd>2015-06-17</dd>
    <dt>My user ID is:</dt>
    <dd>123456</dd>
  </dl>
  <div class="bio module">
    <h3 class="heading">Bio</h3>
    <blockquote class="userstuff"><p>Writes about examples.</p></blockquote>
  </div>
</div>
</body>
</html>"#;

    #[test]
    fn test_extract_profile_page() {
        let html = Html::parse_document(PROFILE_PAGE);
        let fields = UserExtractor::new(&html).extract().expect("extract");

        assert_eq!(fields.user_id.as_deref(), Some("123456"));
        assert_eq!(fields.bio, "Writes about examples.");
        assert_eq!(fields.joined, NaiveDate::from_ymd_opt(2015, 6, 17));
        assert_eq!(fields.pseuds, vec!["AliceWrites", "al"]);
        assert_eq!(fields.location, None);
        assert_eq!(fields.email, None);
    }

    #[test]
    fn test_extract_sparse_profile() {
        let html = Html::parse_document(
            r#"<html><body><div class="user home profile"><dl class="meta"></dl></div></body></html>"#,
        );
        let fields = UserExtractor::new(&html).extract().expect("extract");
        assert_eq!(fields, UserFields::default());
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let html = Html::parse_document("<html><body><h1>welcome</h1></body></html>");
        let err = UserExtractor::new(&html).extract().unwrap_err();
        assert!(matches!(err, ArchiveError::Parse(_)));
    }
}

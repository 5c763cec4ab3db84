//! Small selector helpers shared by the extractors.

use chrono::NaiveDate;
use scraper::{Html, Selector};

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Text of the first match, trimmed; empty string when absent.
pub(crate) fn first_text(html: &Html, css: &str) -> String {
    first_text_opt(html, css).unwrap_or_default()
}

/// Text of the first match, trimmed; `None` when absent.
pub(crate) fn first_text_opt(html: &Html, css: &str) -> Option<String> {
    let selector = selector(css);
    html.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

/// Trimmed text of every match.
pub(crate) fn all_texts(html: &Html, css: &str) -> Vec<String> {
    let selector = selector(css);
    html.select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect()
}

/// Attribute of the first match.
pub(crate) fn first_attr(html: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = selector(css);
    html.select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

pub(crate) fn has(html: &Html, css: &str) -> bool {
    let selector = selector(css);
    html.select(&selector).next().is_some()
}

/// Parse a count out of display text ("84,312 words" -> 84312); 0 when no
/// digits are present.
pub(crate) fn count_from(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

pub(crate) fn count32_from(text: &str) -> u32 {
    u32::try_from(count_from(text)).unwrap_or(u32::MAX)
}

/// The archive renders dates as `YYYY-MM-DD`.
pub(crate) fn date_from(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_from() {
        assert_eq!(count_from("84,312"), 84_312);
        assert_eq!(count_from("  412 comments "), 412);
        assert_eq!(count_from(""), 0);
        assert_eq!(count_from("no digits"), 0);
    }

    #[test]
    fn test_date_from() {
        assert_eq!(
            date_from(" 2021-03-14 "),
            NaiveDate::from_ymd_opt(2021, 3, 14)
        );
        assert_eq!(date_from("14 March 2021"), None);
        assert_eq!(date_from(""), None);
    }

    #[test]
    fn test_text_helpers() {
        let html = Html::parse_document(
            r#"<div><dd class="words"> 10 </dd><dd class="words">20</dd></div>"#,
        );
        assert_eq!(first_text(&html, "dd.words"), "10");
        assert_eq!(all_texts(&html, "dd.words"), vec!["10", "20"]);
        assert_eq!(first_text(&html, "dd.kudos"), "");
        assert_eq!(first_text_opt(&html, "dd.kudos"), None);
        assert!(has(&html, "dd.words"));
        assert!(!has(&html, "dd.kudos"));
    }
}

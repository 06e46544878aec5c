//! Upstream result records and pages.
//!
//! These types mirror the Open Library `search.json` response loosely: every
//! field is optional and unknown fields are ignored, so a record missing its
//! author or year still decodes and simply renders with defaults.

use super::*;

/// A single search hit as returned by the upstream API.
///
/// Not owned by this crate; treated as read-only external data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultItem {
  /// Stable identifier of the work, e.g. `/works/OL893415W`
  pub key:                String,
  /// Work title
  pub title:              Option<String>,
  /// Author names in upstream order
  pub author_name:        Vec<String>,
  /// Year of first publication
  pub first_publish_year: Option<i32>,
  /// Number of editions grouped under this work
  pub edition_count:      Option<u32>,
  /// Language codes of the known editions
  pub language:           Vec<String>,
  /// Cover image identifier
  pub cover_i:            Option<i64>,
  /// ISBNs of the known editions
  pub isbn:               Vec<String>,
  /// OCLC numbers
  pub oclc:               Vec<String>,
  /// Library of Congress control numbers
  pub lccn:               Vec<String>,
  /// Subject headings
  pub subject:            Vec<String>,
  /// Publisher names
  pub publisher:          Vec<String>,
  /// Whether some edition has a readable full text
  pub has_fulltext:       bool,
  /// Internal-archive identifiers of scanned editions
  pub ia:                 Vec<String>,
}

impl ResultItem {
  /// The identifier used for deduplication and links.
  pub fn identifier(&self) -> &str { &self.key }

  /// Title, or `"Unknown Title"` when the record has none.
  pub fn display_title(&self) -> &str { self.title.as_deref().unwrap_or("Unknown Title") }

  /// First author, or `"Unknown"` when the record has none.
  pub fn display_author(&self) -> &str {
    self.author_name.first().map(String::as_str).unwrap_or("Unknown")
  }

  /// Up to `limit` authors joined by commas, or `"Unknown"`.
  pub fn authors(&self, limit: usize) -> String {
    if self.author_name.is_empty() {
      return "Unknown".to_string();
    }
    self.author_name.iter().take(limit).cloned().collect::<Vec<_>>().join(", ")
  }

  /// First listed language code, if any.
  pub fn primary_language(&self) -> Option<&str> { self.language.first().map(String::as_str) }

  /// Medium-size cover image URL from the first available identifier.
  ///
  /// Preference order is cover id, then ISBN, OCLC, and LCCN.
  pub fn cover_url(&self, covers_base: &str) -> Option<String> {
    let base = covers_base.trim_end_matches('/');
    if let Some(id) = self.cover_i {
      return Some(format!("{base}/b/id/{id}-M.jpg"));
    }
    [("isbn", &self.isbn), ("oclc", &self.oclc), ("lccn", &self.lccn)]
      .into_iter()
      .find_map(|(kind, values)| values.first().map(|value| format!("{base}/b/{kind}/{value}-M.jpg")))
  }

  /// Canonical detail page, `<catalog-base><key>`.
  pub fn open_url(&self, catalog_base: &str) -> String { detail_url(catalog_base, &self.key) }

  /// Reader link for the first scanned edition, when one exists.
  pub fn read_url(&self, reader_base: &str) -> Option<String> {
    self.ia.first().map(|ia| format!("{}/{ia}", reader_base.trim_end_matches('/')))
  }
}

/// Builds `<catalog-base><key>`, tolerating keys with or without a leading slash.
pub(crate) fn detail_url(catalog_base: &str, key: &str) -> String {
  let base = catalog_base.trim_end_matches('/');
  if key.starts_with('/') {
    format!("{base}{key}")
  } else {
    format!("{base}/{key}")
  }
}

/// One page of results for a single request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
  /// Items on this page, in upstream order
  #[serde(rename = "docs", default)]
  pub items:          Vec<ResultItem>,
  /// Total number of matches across all pages
  #[serde(rename = "numFound", default)]
  pub total_matching: u64,
}

impl ResultPage {
  /// Decodes a page from a raw response body.
  pub fn from_slice(data: &[u8]) -> Result<Self> {
    serde_json::from_slice(data)
      .map_err(|e| BookfinderError::Decode(format!("Failed to parse JSON: {}", e)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode_full_record() {
    let page = ResultPage::from_slice(
      br#"{
        "numFound": 250,
        "start": 0,
        "docs": [{
          "key": "/works/OL893415W",
          "title": "Dune",
          "author_name": ["Frank Herbert"],
          "first_publish_year": 1965,
          "edition_count": 120,
          "language": ["eng", "spa"],
          "cover_i": 11481354,
          "has_fulltext": true,
          "ia": ["dune00herb"],
          "ebook_access": "borrowable"
        }]
      }"#,
    )
    .unwrap();

    assert_eq!(page.total_matching, 250);
    let item = &page.items[0];
    assert_eq!(item.identifier(), "/works/OL893415W");
    assert_eq!(item.display_title(), "Dune");
    assert_eq!(item.display_author(), "Frank Herbert");
    assert_eq!(item.first_publish_year, Some(1965));
    assert_eq!(item.primary_language(), Some("eng"));
    assert_eq!(
      item.cover_url(config::DEFAULT_COVERS_BASE).as_deref(),
      Some("https://covers.openlibrary.org/b/id/11481354-M.jpg")
    );
    assert_eq!(item.open_url(config::DEFAULT_CATALOG_BASE), "https://openlibrary.org/works/OL893415W");
    assert_eq!(
      item.read_url(config::DEFAULT_READER_BASE).as_deref(),
      Some("https://archive.org/details/dune00herb")
    );
  }

  #[test]
  fn test_missing_fields_default() {
    let page = ResultPage::from_slice(br#"{"docs": [{"key": "/works/OL1W"}]}"#).unwrap();
    assert_eq!(page.total_matching, 0);

    let item = &page.items[0];
    assert_eq!(item.display_title(), "Unknown Title");
    assert_eq!(item.display_author(), "Unknown");
    assert_eq!(item.authors(3), "Unknown");
    assert_eq!(item.first_publish_year, None);
    assert!(!item.has_fulltext);
    assert_eq!(item.cover_url(config::DEFAULT_COVERS_BASE), None);
    assert_eq!(item.read_url(config::DEFAULT_READER_BASE), None);
  }

  #[test]
  fn test_empty_object_is_empty_page() {
    assert_eq!(ResultPage::from_slice(b"{}").unwrap(), ResultPage::default());
    assert!(matches!(ResultPage::from_slice(b"<html>"), Err(BookfinderError::Decode(_))));
  }

  #[test]
  fn test_cover_fallback_order() {
    let item = ResultItem {
      oclc: vec!["123".into()],
      lccn: vec!["456".into()],
      ..ResultItem::default()
    };
    assert_eq!(
      item.cover_url("https://covers.openlibrary.org/").as_deref(),
      Some("https://covers.openlibrary.org/b/oclc/123-M.jpg")
    );

    let item = ResultItem { isbn: vec!["9780441013593".into()], ..item };
    assert_eq!(
      item.cover_url("https://covers.openlibrary.org").as_deref(),
      Some("https://covers.openlibrary.org/b/isbn/9780441013593-M.jpg")
    );
  }

  #[test]
  fn test_authors_limit() {
    let item = ResultItem {
      author_name: vec!["A".into(), "B".into(), "C".into(), "D".into()],
      ..ResultItem::default()
    };
    assert_eq!(item.authors(3), "A, B, C");
  }

  #[test]
  fn test_detail_url_slashes() {
    assert_eq!(detail_url("https://openlibrary.org/", "/works/OL1W"), "https://openlibrary.org/works/OL1W");
    assert_eq!(detail_url("https://openlibrary.org", "works/OL1W"), "https://openlibrary.org/works/OL1W");
  }
}

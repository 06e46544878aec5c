//! Search filters and the pure request builder.
//!
//! [`build`] is the only place that knows how filters become upstream query
//! parameters. It is deterministic and free of side effects, so everything
//! about a request can be asserted without touching the network.
//!
//! # Examples
//!
//! ```
//! use bookfinder::request::{build, SearchField, SearchFilters};
//! use url::Url;
//!
//! let endpoint = Url::parse("https://openlibrary.org/search.json").unwrap();
//! let filters = SearchFilters::new("dune").with_field(SearchField::Title);
//! let request = build(&endpoint, &filters);
//!
//! assert_eq!(request.get("title"), Some("dune"));
//! assert!(!request.contains_key("q"));
//! assert!(!request.contains_key("page"));
//! ```

use super::*;

/// Which upstream field free text is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
  /// Match anywhere (`q`)
  #[default]
  All,
  /// Match titles only
  Title,
  /// Match author names only
  Author,
  /// Match subjects only
  Subject,
  /// Match ISBNs only
  Isbn,
}

impl SearchField {
  /// Every field, in the order they are offered to users.
  pub const ALL: [SearchField; 5] =
    [SearchField::All, SearchField::Title, SearchField::Author, SearchField::Subject, SearchField::Isbn];

  /// Upstream query parameter carrying the text for this field.
  pub fn param(self) -> &'static str {
    match self {
      SearchField::All => "q",
      SearchField::Title => "title",
      SearchField::Author => "author",
      SearchField::Subject => "subject",
      SearchField::Isbn => "isbn",
    }
  }
}

impl Display for SearchField {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SearchField::All => write!(f, "all"),
      field => write!(f, "{}", field.param()),
    }
  }
}

impl FromStr for SearchField {
  type Err = BookfinderError;

  fn from_str(s: &str) -> Result<Self> {
    match &s.trim().to_lowercase() as &str {
      "all" | "q" | "any" => Ok(SearchField::All),
      "title" => Ok(SearchField::Title),
      "author" => Ok(SearchField::Author),
      "subject" => Ok(SearchField::Subject),
      "isbn" => Ok(SearchField::Isbn),
      s => Err(BookfinderError::InvalidField(s.to_owned())),
    }
  }
}

/// The complete set of user-selected search criteria.
///
/// A new value supersedes the previous one entirely, except for `page`, which
/// moves independently as more results are requested. Use
/// [`SearchFilters::same_query`] to tell those two kinds of change apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchFilters {
  /// Field the text is matched against
  pub field:          SearchField,
  /// Free-text query, trimmed when the request is built
  pub text:           String,
  /// Language code such as `eng`
  pub language:       Option<String>,
  /// Earliest publication year, inclusive
  pub year_min:       Option<i32>,
  /// Latest publication year, inclusive
  pub year_max:       Option<i32>,
  /// Restrict to items with a readable full text
  pub full_text_only: bool,
  /// One-based result page
  pub page:           u32,
}

impl Default for SearchFilters {
  fn default() -> Self {
    Self {
      field:          SearchField::All,
      text:           String::new(),
      language:       None,
      year_min:       None,
      year_max:       None,
      full_text_only: false,
      page:           1,
    }
  }
}

impl SearchFilters {
  /// Creates page-one filters searching all fields for `text`.
  pub fn new(text: impl Into<String>) -> Self { Self { text: text.into(), ..Self::default() } }

  /// Sets the field the text is matched against.
  pub fn with_field(mut self, field: SearchField) -> Self {
    self.field = field;
    self
  }

  /// Sets the language filter. Empty codes are treated as no filter.
  pub fn with_language(mut self, language: impl Into<String>) -> Self {
    let language = language.into();
    self.language = if language.trim().is_empty() { None } else { Some(language) };
    self
  }

  /// Sets the publication year bounds. Either bound may be open.
  pub fn with_years(mut self, year_min: Option<i32>, year_max: Option<i32>) -> Self {
    self.year_min = year_min;
    self.year_max = year_max;
    self
  }

  /// Restricts results to items with a readable full text.
  pub fn with_full_text_only(mut self, full_text_only: bool) -> Self {
    self.full_text_only = full_text_only;
    self
  }

  /// Sets the page, clamped to at least 1.
  pub fn with_page(mut self, page: u32) -> Self {
    self.page = page.max(1);
    self
  }

  /// The same filters one page further on.
  pub fn next_page(&self) -> Self { self.clone().with_page(self.page.saturating_add(1)) }

  /// Whether `other` describes the same query, ignoring the page.
  pub fn same_query(&self, other: &SearchFilters) -> bool {
    self.field == other.field
      && self.text == other.text
      && self.language == other.language
      && self.year_min == other.year_min
      && self.year_max == other.year_max
      && self.full_text_only == other.full_text_only
  }
}

/// A fully resolved request: the endpoint plus its ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
  /// Endpoint without query parameters
  endpoint: Url,
  /// Query parameters in the order they are sent
  params:   Vec<(String, String)>,
}

impl RequestDescriptor {
  /// The endpoint this request is sent to.
  pub fn endpoint(&self) -> &Url { &self.endpoint }

  /// Query parameters in the order they are sent.
  pub fn params(&self) -> &[(String, String)] { &self.params }

  /// Value of the parameter `key`, if present.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
  }

  /// Whether the parameter `key` is present, even with an empty value.
  pub fn contains_key(&self, key: &str) -> bool { self.params.iter().any(|(k, _)| k == key) }

  /// The complete URL, with parameters percent-encoded.
  pub fn url(&self) -> Url {
    let mut url = self.endpoint.clone();
    url.query_pairs_mut().clear().extend_pairs(self.params.iter());
    url
  }
}

impl Display for RequestDescriptor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.url()) }
}

/// Maps a filter set onto a canonical request against `endpoint`.
///
/// - Text is trimmed and placed under the field's parameter. With
///   [`SearchField::All`] an empty text is still sent as `q=`, which asks the
///   upstream API for an unfiltered listing.
/// - `language` and `has_fulltext` are attached only when set. A non-blank
///   language is sent verbatim.
/// - Year bounds become `published_in=<min>-<max>`, leaving a missing bound
///   blank; the parameter is omitted when both are missing.
/// - `page` is omitted for the first page so page-one requests stay canonical.
pub fn build(endpoint: &Url, filters: &SearchFilters) -> RequestDescriptor {
  let mut endpoint = endpoint.clone();
  endpoint.set_query(None);
  endpoint.set_fragment(None);

  let mut params = Vec::new();
  params.push((filters.field.param().to_string(), filters.text.trim().to_string()));

  // blank means unset; anything else goes out as given
  if let Some(language) = filters.language.as_deref().filter(|l| !l.trim().is_empty()) {
    params.push(("language".to_string(), language.to_string()));
  }

  if filters.full_text_only {
    params.push(("has_fulltext".to_string(), "true".to_string()));
  }

  if filters.year_min.is_some() || filters.year_max.is_some() {
    let bound = |year: Option<i32>| year.map(|y| y.to_string()).unwrap_or_default();
    params.push((
      "published_in".to_string(),
      format!("{}-{}", bound(filters.year_min), bound(filters.year_max)),
    ));
  }

  if filters.page > 1 {
    params.push(("page".to_string(), filters.page.to_string()));
  }

  RequestDescriptor { endpoint, params }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn endpoint() -> Url { Url::parse(config::DEFAULT_ENDPOINT).unwrap() }

  #[test]
  fn test_title_search_first_page() {
    let filters = SearchFilters::new("dune").with_field(SearchField::Title);
    let request = build(&endpoint(), &filters);

    assert_eq!(request.get("title"), Some("dune"));
    assert!(!request.contains_key("q"));
    assert!(!request.contains_key("page"));
    assert_eq!(request.url().as_str(), "https://openlibrary.org/search.json?title=dune");
  }

  #[test]
  fn test_field_specific_keys_never_use_generic_key() {
    for field in SearchField::ALL.into_iter().filter(|f| *f != SearchField::All) {
      for text in ["dune", "  frank herbert  ", ""] {
        let request = build(&endpoint(), &SearchFilters::new(text).with_field(field));
        assert_eq!(request.get(field.param()), Some(text.trim()));
        assert!(!request.contains_key("q"), "{field} leaked into q");
      }
    }
  }

  #[test]
  fn test_empty_text_browses_all() {
    let request = build(&endpoint(), &SearchFilters::new("   "));
    assert!(request.contains_key("q"));
    assert_eq!(request.get("q"), Some(""));
    assert_eq!(request.url().as_str(), "https://openlibrary.org/search.json?q=");
  }

  #[test]
  fn test_year_ranges() {
    let request = build(&endpoint(), &SearchFilters::new("x"));
    assert!(!request.contains_key("published_in"));

    let request = build(&endpoint(), &SearchFilters::new("x").with_years(Some(1950), None));
    assert_eq!(request.get("published_in"), Some("1950-"));

    let request = build(&endpoint(), &SearchFilters::new("x").with_years(None, Some(1999)));
    assert_eq!(request.get("published_in"), Some("-1999"));

    let request = build(&endpoint(), &SearchFilters::new("x").with_years(Some(1950), Some(1999)));
    assert_eq!(request.get("published_in"), Some("1950-1999"));
  }

  #[test]
  fn test_optional_filters() {
    let filters = SearchFilters::new("tolkien")
      .with_field(SearchField::Author)
      .with_language("eng")
      .with_full_text_only(true)
      .with_page(3);
    let request = build(&endpoint(), &filters);

    assert_eq!(request.get("author"), Some("tolkien"));
    assert_eq!(request.get("language"), Some("eng"));
    assert_eq!(request.get("has_fulltext"), Some("true"));
    assert_eq!(request.get("page"), Some("3"));
    assert_eq!(
      request.url().as_str(),
      "https://openlibrary.org/search.json?author=tolkien&language=eng&has_fulltext=true&page=3"
    );
  }

  #[test]
  fn test_blank_language_and_first_page_omitted() {
    let mut filters = SearchFilters::new("x").with_page(1);
    filters.language = Some("  ".into());
    let request = build(&endpoint(), &filters);
    assert!(!request.contains_key("language"));
    assert!(!request.contains_key("page"));
    assert_eq!(SearchFilters::new("x").with_page(0).page, 1);
  }

  #[test]
  fn test_language_sent_verbatim() {
    let request = build(&endpoint(), &SearchFilters::new("x").with_language(" eng"));
    assert_eq!(request.get("language"), Some(" eng"));
    assert_eq!(request.url().query(), Some("q=x&language=+eng"));
  }

  #[test]
  fn test_text_is_encoded() {
    let request = build(&endpoint(), &SearchFilters::new("harry potter & co"));
    assert_eq!(request.url().query(), Some("q=harry+potter+%26+co"));
  }

  #[test]
  fn test_endpoint_query_is_replaced() {
    let endpoint = Url::parse("https://openlibrary.org/search.json?title=%7").unwrap();
    let request = build(&endpoint, &SearchFilters::new("dune"));
    assert_eq!(request.url().as_str(), "https://openlibrary.org/search.json?q=dune");
  }

  #[test]
  fn test_build_is_deterministic() {
    let filters = SearchFilters::new("dune").with_years(Some(1960), None).with_page(2);
    assert_eq!(build(&endpoint(), &filters), build(&endpoint(), &filters));
  }

  #[test]
  fn test_same_query_ignores_page() {
    let filters = SearchFilters::new("dune");
    assert!(filters.same_query(&filters.next_page()));
    assert_eq!(filters.next_page().page, 2);
    assert!(!filters.same_query(&filters.clone().with_field(SearchField::Title)));
    assert!(!filters.same_query(&filters.clone().with_language("fra")));
  }

  #[test]
  fn test_parse_field() {
    assert_eq!("Title".parse::<SearchField>().unwrap(), SearchField::Title);
    assert_eq!("q".parse::<SearchField>().unwrap(), SearchField::All);
    assert!(matches!("publisher".parse::<SearchField>(), Err(BookfinderError::InvalidField(_))));
  }
}

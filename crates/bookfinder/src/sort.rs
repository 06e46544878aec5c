//! Read-time ordering of accumulated results.
//!
//! Sorting never touches the canonical accumulated sequence; [`sorted`]
//! returns a new vector of references. All orders are stable, so items with
//! equal keys keep their upstream relative order.

use std::cmp::Reverse;

use super::*;

/// Interchangeable result orderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  /// Upstream order
  #[default]
  Relevance,
  /// Latest first publication first; unknown years last
  Newest,
  /// Earliest first publication first; unknown years last
  Oldest,
  /// Most editions first; unknown counts last
  Editions,
}

impl Display for SortOrder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SortOrder::Relevance => write!(f, "relevance"),
      SortOrder::Newest => write!(f, "newest"),
      SortOrder::Oldest => write!(f, "oldest"),
      SortOrder::Editions => write!(f, "editions"),
    }
  }
}

impl FromStr for SortOrder {
  type Err = BookfinderError;

  fn from_str(s: &str) -> Result<Self> {
    match &s.trim().to_lowercase() as &str {
      "relevance" | "best" => Ok(SortOrder::Relevance),
      "newest" => Ok(SortOrder::Newest),
      "oldest" => Ok(SortOrder::Oldest),
      "editions" => Ok(SortOrder::Editions),
      s => Err(BookfinderError::InvalidSort(s.to_owned())),
    }
  }
}

/// Returns `items` re-ordered by `order` without mutating them.
pub fn sorted(items: &[ResultItem], order: SortOrder) -> Vec<&ResultItem> {
  let mut view: Vec<&ResultItem> = items.iter().collect();
  match order {
    SortOrder::Relevance => {},
    SortOrder::Newest => view.sort_by_key(|item| Reverse(item.first_publish_year.unwrap_or(0))),
    SortOrder::Oldest =>
      view.sort_by_key(|item| item.first_publish_year.map(i64::from).unwrap_or(i64::MAX)),
    SortOrder::Editions => view.sort_by_key(|item| Reverse(item.edition_count.unwrap_or(0))),
  }
  view
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(key: &str, year: Option<i32>, editions: Option<u32>) -> ResultItem {
    ResultItem {
      key: key.to_string(),
      first_publish_year: year,
      edition_count: editions,
      ..ResultItem::default()
    }
  }

  fn keys(view: Vec<&ResultItem>) -> Vec<&str> { view.into_iter().map(|i| i.key.as_str()).collect() }

  fn fixture() -> Vec<ResultItem> {
    vec![
      item("a", Some(1990), Some(3)),
      item("b", None, None),
      item("c", Some(2005), Some(10)),
      item("d", Some(1990), Some(10)),
      item("e", Some(1850), Some(3)),
    ]
  }

  #[test]
  fn test_relevance_is_identity() {
    let items = fixture();
    assert_eq!(keys(sorted(&items, SortOrder::Relevance)), ["a", "b", "c", "d", "e"]);
  }

  #[test]
  fn test_newest_sinks_unknown() {
    let items = fixture();
    assert_eq!(keys(sorted(&items, SortOrder::Newest)), ["c", "a", "d", "e", "b"]);
  }

  #[test]
  fn test_oldest_sinks_unknown() {
    let items = fixture();
    assert_eq!(keys(sorted(&items, SortOrder::Oldest)), ["e", "a", "d", "c", "b"]);
  }

  #[test]
  fn test_editions_descending() {
    let items = fixture();
    assert_eq!(keys(sorted(&items, SortOrder::Editions)), ["c", "d", "a", "e", "b"]);
  }

  #[test]
  fn test_ties_keep_input_order() {
    let items: Vec<_> = (0..6).map(|i| item(&i.to_string(), Some(2000), Some(1))).collect();
    for order in [SortOrder::Relevance, SortOrder::Newest, SortOrder::Oldest, SortOrder::Editions] {
      assert_eq!(keys(sorted(&items, order)), ["0", "1", "2", "3", "4", "5"], "{order} not stable");
    }
  }

  #[test]
  fn test_input_untouched() {
    let items = fixture();
    let before = items.clone();
    let _ = sorted(&items, SortOrder::Newest);
    assert_eq!(items, before);
  }

  #[test]
  fn test_parse_sort_order() {
    assert_eq!("Newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
    assert!(matches!("random".parse::<SortOrder>(), Err(BookfinderError::InvalidSort(_))));
  }
}

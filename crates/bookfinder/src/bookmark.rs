//! Saved book collection with write-through persistence.
//!
//! [`Bookmarks`] is an explicit, singly owned value: whoever needs to read or
//! change saved books is handed a reference to it. It hydrates from its
//! [`Store`] once when opened and persists the whole collection as part of
//! every mutating call, so the stored value and the in-memory value agree
//! whenever a call returns.
//!
//! # Examples
//!
//! ```
//! use bookfinder::{
//!   bookmark::{BookmarkEntry, Bookmarks},
//!   store::{MemoryStore, Store},
//! };
//!
//! let mut bookmarks = Bookmarks::open(Store::new(MemoryStore::default()), "alex.bookmarks");
//! let entry = BookmarkEntry::new("/works/OL893415W", "Dune", "Frank Herbert");
//!
//! assert!(bookmarks.add(entry.clone()));
//! assert!(!bookmarks.add(entry));
//! assert_eq!(bookmarks.len(), 1);
//! assert!(bookmarks.contains("/works/OL893415W"));
//! ```

use super::*;
use crate::store::{KeyValueStore, Store};

/// Persisted projection of a [`ResultItem`].
///
/// The serialized keys follow the layout existing bookmark files already use
/// (`key`, `cover`, `hasFullText`, ...), so those files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
  /// Identifier of the work, unique within a collection
  #[serde(rename = "key")]
  pub identifier:    String,
  /// Title at the time of saving
  #[serde(default = "unknown_title")]
  pub title:         String,
  /// First author at the time of saving
  #[serde(default = "unknown_author")]
  pub author:        String,
  /// Year of first publication
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub year:          Option<i32>,
  /// Cover image URL
  #[serde(rename = "cover", default, skip_serializing_if = "Option::is_none")]
  pub cover_url:     Option<String>,
  /// Primary language code
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language:      Option<String>,
  /// Whether a readable full text exists
  #[serde(default)]
  pub has_full_text: bool,
  /// Canonical detail page
  #[serde(default)]
  pub open_url:      String,
  /// Reader link, when a scanned edition exists
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub read_url:      Option<String>,
  /// Number of editions
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub edition_count: Option<u32>,
  /// When the entry was added to the collection
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub saved_at:      Option<DateTime<Utc>>,
}

/// Serde default for entries saved without a title.
fn unknown_title() -> String { "Unknown Title".to_string() }

/// Serde default for entries saved without an author.
fn unknown_author() -> String { "Unknown Author".to_string() }

impl BookmarkEntry {
  /// Creates a minimal entry. The detail link is derived when the entry is added to a collection.
  pub fn new(
    identifier: impl Into<String>,
    title: impl Into<String>,
    author: impl Into<String>,
  ) -> Self {
    Self {
      identifier:    identifier.into(),
      title:         title.into(),
      author:        author.into(),
      year:          None,
      cover_url:     None,
      language:      None,
      has_full_text: false,
      open_url:      String::new(),
      read_url:      None,
      edition_count: None,
      saved_at:      None,
    }
  }

  /// Projects a search result into an entry, resolving links against `config`.
  pub fn from_item(item: &ResultItem, config: &Config) -> Self {
    Self {
      identifier:    item.key.clone(),
      title:         item.display_title().to_string(),
      author:        item.display_author().to_string(),
      year:          item.first_publish_year,
      cover_url:     item.cover_url(&config.covers_base),
      language:      item.primary_language().map(String::from),
      has_full_text: item.has_fulltext,
      open_url:      item.open_url(&config.catalog_base),
      read_url:      item.read_url(&config.reader_base),
      edition_count: item.edition_count,
      saved_at:      None,
    }
  }
}

/// Ordered, deduplicated collection of saved books, oldest first.
#[derive(Debug)]
pub struct Bookmarks<S: KeyValueStore> {
  /// Backing store
  store:        Store<S>,
  /// Store key holding the serialized collection
  key:          String,
  /// Base used to derive missing detail links
  catalog_base: String,
  /// Entries in insertion order
  entries:      Vec<BookmarkEntry>,
  /// Identifiers of `entries`, for constant-time membership checks
  index:        HashSet<String>,
}

impl<S: KeyValueStore> Bookmarks<S> {
  /// Opens the collection stored under `key` using the default catalog base.
  pub fn open(store: Store<S>, key: impl Into<String>) -> Self {
    Self::with_catalog_base(store, key, config::DEFAULT_CATALOG_BASE)
  }

  /// Opens the collection stored under `config.bookmarks_key`.
  pub fn from_config(store: Store<S>, config: &Config) -> Self {
    Self::with_catalog_base(store, &config.bookmarks_key, &config.catalog_base)
  }

  /// Opens the collection stored under `key`, deriving missing detail links from `catalog_base`.
  pub fn with_catalog_base(
    store: Store<S>,
    key: impl Into<String>,
    catalog_base: impl Into<String>,
  ) -> Self {
    let mut bookmarks = Self {
      store,
      key: key.into(),
      catalog_base: catalog_base.into(),
      entries: Vec::new(),
      index: HashSet::new(),
    };
    bookmarks.initialize();
    bookmarks
  }

  /// Replaces the in-memory collection with the stored one.
  ///
  /// Malformed stored data is logged by the store and treated as an empty
  /// collection. Duplicate identifiers in stored data keep their first
  /// occurrence.
  pub fn initialize(&mut self) {
    let stored: Vec<BookmarkEntry> = self.store.load(&self.key, Vec::new());
    self.entries.clear();
    self.index.clear();
    for entry in stored {
      let entry = self.normalize(entry);
      if self.index.insert(entry.identifier.clone()) {
        self.entries.push(entry);
      } else {
        debug!("Dropping duplicate stored bookmark {}", entry.identifier);
      }
    }
    debug!("Loaded {} bookmarks from {}", self.entries.len(), self.key);
  }

  /// Adds `entry` unless its identifier is already saved. Returns whether it was added.
  pub fn add(&mut self, entry: BookmarkEntry) -> bool {
    if !self.insert(entry) {
      return false;
    }
    self.persist();
    true
  }

  /// Removes the entry with `identifier`. Returns whether anything was removed.
  pub fn remove(&mut self, identifier: &str) -> bool {
    if !self.index.remove(identifier) {
      trace!("Bookmark {identifier} not present, nothing to remove");
      return false;
    }
    self.entries.retain(|entry| entry.identifier != identifier);
    self.persist();
    true
  }

  /// Removes `entry` when saved, adds it otherwise. Returns whether it is saved afterwards.
  pub fn toggle(&mut self, entry: BookmarkEntry) -> bool {
    if self.contains(&entry.identifier) {
      self.remove(&entry.identifier);
      false
    } else {
      self.add(entry)
    }
  }

  /// Empties the collection and erases the stored value.
  pub fn clear_all(&mut self) {
    self.entries.clear();
    self.index.clear();
    self.store.clear(&self.key);
    info!("Cleared all bookmarks from {}", self.key);
  }

  /// Saved entries, oldest first.
  pub fn list(&self) -> &[BookmarkEntry] { &self.entries }

  /// Whether `identifier` is saved.
  pub fn contains(&self, identifier: &str) -> bool { self.index.contains(identifier) }

  /// The saved entry with `identifier`.
  pub fn get(&self, identifier: &str) -> Option<&BookmarkEntry> {
    if !self.contains(identifier) {
      return None;
    }
    self.entries.iter().find(|entry| entry.identifier == identifier)
  }

  /// Number of saved entries.
  pub fn len(&self) -> usize { self.entries.len() }

  /// Whether nothing is saved.
  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  /// Store key holding this collection.
  pub fn key(&self) -> &str { &self.key }

  /// The backing store.
  pub fn store(&self) -> &Store<S> { &self.store }

  /// Pretty-printed JSON array of every entry, suitable for sharing or re-importing.
  pub fn export(&self) -> Result<String> { Ok(serde_json::to_string_pretty(&self.entries)?) }

  /// Writes [`Bookmarks::export`] to `path`.
  pub fn export_to(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, self.export()?)?;
    info!("Exported {} bookmarks to {}", self.entries.len(), path.display());
    Ok(())
  }

  /// Adds every entry of an exported JSON array, skipping already saved identifiers.
  ///
  /// Returns the number of entries added. Unlike loading from the store, a
  /// malformed document is an error here.
  pub fn import(&mut self, json: &str) -> Result<usize> {
    let incoming: Vec<BookmarkEntry> = serde_json::from_str(json)?;
    let added = incoming.into_iter().filter(|entry| self.insert(entry.clone())).count();
    if added > 0 {
      self.persist();
    }
    info!("Imported {added} new bookmarks");
    Ok(added)
  }

  /// Reads `path` and imports it with [`Bookmarks::import`].
  pub fn import_from(&mut self, path: impl AsRef<Path>) -> Result<usize> {
    let content = std::fs::read_to_string(path)?;
    self.import(&content)
  }

  /// Inserts without persisting. Returns whether the entry was new.
  fn insert(&mut self, entry: BookmarkEntry) -> bool {
    if self.contains(&entry.identifier) {
      trace!("Bookmark {} already saved", entry.identifier);
      return false;
    }
    let mut entry = self.normalize(entry);
    entry.saved_at.get_or_insert_with(Utc::now);
    self.index.insert(entry.identifier.clone());
    self.entries.push(entry);
    true
  }

  /// Fills in a missing detail link.
  fn normalize(&self, mut entry: BookmarkEntry) -> BookmarkEntry {
    if entry.open_url.is_empty() {
      entry.open_url = item::detail_url(&self.catalog_base, &entry.identifier);
    }
    entry
  }

  /// Writes the whole collection through to the store.
  fn persist(&self) {
    self.store.save(&self.key, &self.entries);
    trace!("Persisted {} bookmarks to {}", self.entries.len(), self.key);
  }
}

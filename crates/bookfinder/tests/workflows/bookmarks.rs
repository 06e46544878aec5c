use super::*;

#[traced_test]
#[test]
fn test_bookmarks_survive_reopen() -> TestResult<()> {
  let (config, _storage_dir) = test_config();
  let items = shelf(3);

  let mut bookmarks = open_bookmarks(&config);
  for item in &items {
    assert!(bookmarks.add(BookmarkEntry::from_item(item, &config)));
  }
  assert!(bookmarks.remove("/works/OL1W"));
  drop(bookmarks);

  let reopened = open_bookmarks(&config);
  let keys: Vec<_> = reopened.list().iter().map(|entry| entry.identifier.as_str()).collect();
  assert_eq!(keys, ["/works/OL0W", "/works/OL2W"]);

  let first = reopened.get("/works/OL0W").unwrap();
  assert_eq!(first.title, "Book 0");
  assert_eq!(first.open_url, "https://openlibrary.org/works/OL0W");
  assert_eq!(first.cover_url.as_deref(), Some("https://covers.openlibrary.org/b/id/1000-M.jpg"));
  assert!(first.saved_at.is_some());
  Ok(())
}

#[traced_test]
#[test]
fn test_export_then_import_elsewhere() -> TestResult<()> {
  let (config, _storage_dir) = test_config();
  let export_dir = tempdir()?;
  let export_path = export_dir.path().join("my-bookmarks.json");

  let mut bookmarks = open_bookmarks(&config);
  bookmarks.add(BookmarkEntry::new("/works/OL893415W", "Dune", "Frank Herbert"));
  bookmarks.add(BookmarkEntry::new("/works/OL45804W", "Fantastic Mr Fox", "Roald Dahl"));
  bookmarks.export_to(&export_path)?;

  let exported = std::fs::read_to_string(&export_path)?;
  assert!(exported.starts_with("[\n  {"));
  assert!(exported.contains(r#""key": "/works/OL893415W""#));

  let (other_config, _other_dir) = test_config();
  let mut other = open_bookmarks(&other_config);
  other.add(BookmarkEntry::new("/works/OL45804W", "Fantastic Mr Fox", "Roald Dahl"));
  assert_eq!(other.import_from(&export_path)?, 1);
  assert_eq!(other.len(), 2);
  assert_eq!(open_bookmarks(&other_config).len(), 2);
  Ok(())
}

#[traced_test]
#[test]
fn test_corrupt_storage_opens_empty() -> TestResult<()> {
  let (config, _storage_dir) = test_config();
  let store = FileStore::new(&config.storage_path);
  std::fs::create_dir_all(store.dir())?;
  std::fs::write(store.path_for(&config.bookmarks_key), "[{\"key\": ")?;

  let mut bookmarks = open_bookmarks(&config);
  assert!(bookmarks.is_empty());

  // the next mutation overwrites the corrupt value
  bookmarks.add(BookmarkEntry::new("/works/OL1W", "One", "Someone"));
  assert_eq!(open_bookmarks(&config).len(), 1);
  Ok(())
}

#[traced_test]
#[test]
fn test_hand_written_file_without_links() -> TestResult<()> {
  let (config, _storage_dir) = test_config();
  let store = FileStore::new(&config.storage_path);
  std::fs::create_dir_all(store.dir())?;
  std::fs::write(
    store.path_for(&config.bookmarks_key),
    r#"[{"key": "/works/OL1W"}, {"key": "/works/OL1W", "title": "Dupe"}]"#,
  )?;

  let bookmarks = open_bookmarks(&config);
  assert_eq!(bookmarks.len(), 1);
  let entry = &bookmarks.list()[0];
  assert_eq!(entry.title, "Unknown Title");
  assert_eq!(entry.author, "Unknown Author");
  assert_eq!(entry.open_url, "https://openlibrary.org/works/OL1W");
  Ok(())
}

#[traced_test]
#[test]
fn test_import_rejects_malformed_document() {
  let (config, _storage_dir) = test_config();
  let mut bookmarks = open_bookmarks(&config);
  let err = bookmarks.import("{\"not\": \"an array\"}").unwrap_err();
  assert!(matches!(err, BookfinderError::Json(_)));
  assert!(bookmarks.is_empty());
}

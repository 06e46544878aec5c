use super::*;

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_title_search_pages_through_results() -> TestResult<()> {
  let (config, _storage_dir) = test_config();
  let catalog = ShelfCatalog::new(shelf(60), 25);
  let mut controller = SearchController::new(catalog.clone(), &config)?;

  controller.search(SearchFilters::new("dune").with_field(SearchField::Title));
  assert_eq!(*controller.settle().await, SearchState::Success);
  assert_eq!(controller.items().len(), 25);
  assert_eq!(controller.total_matching(), 60);
  assert!(controller.has_more());

  controller.load_more();
  controller.settle().await;
  controller.load_more();
  controller.settle().await;
  assert_eq!(controller.items().len(), 60);
  assert!(!controller.has_more());
  assert_eq!(controller.load_more(), None);

  assert_eq!(catalog.requests(), [
    "https://openlibrary.org/search.json?title=dune",
    "https://openlibrary.org/search.json?title=dune&page=2",
    "https://openlibrary.org/search.json?title=dune&page=3",
  ]);
  Ok(())
}

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_typing_burst_issues_one_request() -> TestResult<()> {
  use bookfinder::debounce::Debouncer;

  let (config, _storage_dir) = test_config();
  let catalog = ShelfCatalog::new(shelf(3), 25);
  let mut controller = SearchController::new(catalog.clone(), &config)?;
  let (debouncer, mut debounced) = Debouncer::new(config.debounce());

  for text in ["d", "du", "dun", "dune"] {
    debouncer.push(text.to_string());
    tokio::time::sleep(Duration::from_millis(120)).await;
  }
  let text = debounced.recv().await.unwrap();
  controller.search(SearchFilters::new(text));
  controller.settle().await;

  assert_eq!(catalog.requests(), ["https://openlibrary.org/search.json?q=dune"]);
  assert_eq!(controller.items().len(), 3);
  Ok(())
}

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_sort_orders_are_permutations_of_results() -> TestResult<()> {
  let (config, _storage_dir) = test_config();
  let mut controller = SearchController::new(ShelfCatalog::new(shelf(20), 25), &config)?;
  controller.search(SearchFilters::new("anything"));
  controller.settle().await;

  let mut expected: Vec<_> = controller.items().iter().map(|item| item.key.clone()).collect();
  expected.sort();
  for order in [SortOrder::Relevance, SortOrder::Newest, SortOrder::Oldest, SortOrder::Editions] {
    let mut keys: Vec<_> = controller.sorted(order).iter().map(|item| item.key.clone()).collect();
    keys.sort();
    assert_eq!(keys, expected, "{order} is not a permutation");
  }

  let newest = controller.sorted(SortOrder::Newest);
  assert!(newest.windows(2).all(|w| w[0].first_publish_year >= w[1].first_publish_year));
  let editions = controller.sorted(SortOrder::Editions);
  assert!(editions.windows(2).all(|w| w[0].edition_count >= w[1].edition_count));
  Ok(())
}

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_changing_field_starts_over() -> TestResult<()> {
  let (config, _storage_dir) = test_config();
  let catalog = ShelfCatalog::new(shelf(40), 10);
  let mut controller = SearchController::new(catalog.clone(), &config)?;

  let filters = SearchFilters::new("herbert").with_field(SearchField::Title);
  controller.search(filters.clone());
  controller.settle().await;
  controller.load_more();
  controller.settle().await;
  assert_eq!(controller.items().len(), 20);

  controller.search(filters.with_field(SearchField::Author).with_page(2));
  controller.settle().await;
  assert_eq!(controller.items().len(), 10);
  assert_eq!(controller.filters().unwrap().page, 1);
  assert_eq!(
    catalog.requests().last().unwrap(),
    "https://openlibrary.org/search.json?author=herbert"
  );
  Ok(())
}

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_rapid_filter_changes_keep_only_latest() -> TestResult<()> {
  let (config, _storage_dir) = test_config();
  let catalog = ShelfCatalog::new(shelf(5), 25);
  let mut controller = SearchController::new(catalog.clone(), &config)?;

  controller.search(SearchFilters::new("a"));
  controller.search(SearchFilters::new("ab"));
  let latest = controller.search(SearchFilters::new("abc")).unwrap();
  controller.settle().await;

  assert_eq!(controller.sequence(), latest);
  assert_eq!(controller.filters().unwrap().text, "abc");
  assert_eq!(controller.items().len(), 5);
  Ok(())
}

#[ignore = "requires network access to openlibrary.org"]
#[traced_test]
#[tokio::test]
async fn test_live_search_and_save() -> TestResult<()> {
  use bookfinder::catalog::HttpCatalog;

  let (config, _storage_dir) = test_config();
  let mut controller = SearchController::new(Arc::new(HttpCatalog::new(&config)?), &config)?;
  controller.search(SearchFilters::new("dune").with_field(SearchField::Title));
  controller.settle().await;
  assert!(!controller.items().is_empty());

  let mut bookmarks = open_bookmarks(&config);
  assert!(bookmarks.add(BookmarkEntry::from_item(&controller.items()[0], &config)));
  Ok(())
}

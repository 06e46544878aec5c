//! Search-state and bookmark engine for the Open Library catalog.
//!
//! `bookfinder` turns structured search filters into Open Library requests,
//! accumulates paginated results, re-sorts them at read time, and keeps a
//! durable, deduplicated list of saved books.
//!
//! # Features
//!
//! - **Request building**: [`request::build`] maps [`request::SearchFilters`] onto a canonical
//!   request URL
//! - **Search lifecycle**: [`controller::SearchController`] issues requests, discards superseded
//!   responses, and merges result pages
//! - **Sorting**: [`sort::sorted`] re-orders results without touching the accumulated set
//! - **Bookmarks**: [`bookmark::Bookmarks`] is a write-through collection backed by a
//!   [`store::Store`]
//! - **Debouncing**: [`debounce::Debouncer`] collapses bursts of input into a single value
//!
//! # Getting Started
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bookfinder::{
//!   bookmark::{BookmarkEntry, Bookmarks},
//!   catalog::HttpCatalog,
//!   controller::SearchController,
//!   prelude::*,
//!   request::{SearchField, SearchFilters},
//!   sort::SortOrder,
//!   store::{FileStore, Store},
//!   Config,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::default();
//!   let catalog = Arc::new(HttpCatalog::new(&config)?);
//!   let mut controller = SearchController::new(catalog, &config)?;
//!
//!   controller.search(SearchFilters::new("dune").with_field(SearchField::Title));
//!   controller.settle().await;
//!
//!   let store = Store::new(FileStore::new(&config.storage_path));
//!   let mut bookmarks = Bookmarks::open(store, &config.bookmarks_key);
//!   if let Some(item) = controller.sorted(SortOrder::Newest).first() {
//!     bookmarks.add(BookmarkEntry::from_item(item, &config));
//!   }
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`request`]: Filter types and the pure request builder
//! - [`item`]: Upstream result records and pages
//! - [`catalog`]: Transport trait and the HTTP implementation
//! - [`controller`]: Fetch lifecycle and result accumulation
//! - [`sort`]: Read-time result ordering
//! - [`debounce`]: Generic input debouncer
//! - [`store`]: Fail-soft key-value persistence
//! - [`bookmark`]: Saved book collection
//! - [`config`]: User configuration

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::{HashMap, HashSet},
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
  sync::Arc,
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
use url::Url;
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod bookmark;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod item;
pub mod request;
pub mod sort;
pub mod store;

pub use crate::config::Config;
use crate::{error::*, item::*, request::*};

/// Common traits and types for ergonomic imports.
///
/// This module provides a convenient way to import frequently used traits
/// and types with a single glob import.
///
/// # Usage
///
/// ```no_run
/// use bookfinder::{prelude::*, store::MemoryStore};
///
/// fn example() -> Result<(), BookfinderError> {
///   let store = bookfinder::store::Store::new(MemoryStore::default());
///   let _ = store.load::<Vec<String>>("key", Vec::new());
///   Ok(())
/// }
/// ```
///
/// # Contents
///
/// - [`CatalogTransport`]: Trait for anything that can answer a search request
/// - [`KeyValueStore`]: Trait for the raw storage backing bookmarks
/// - [`BookfinderError`]: Core error type for the library
pub mod prelude {
  pub use crate::{catalog::CatalogTransport, error::BookfinderError, store::KeyValueStore};
}

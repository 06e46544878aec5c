//! Fetch lifecycle and result accumulation.
//!
//! The [`SearchController`] owns the accumulated results for the current
//! filters and the loading/error state around them. It is driven from a
//! single task: triggers ([`SearchController::search`],
//! [`SearchController::load_more`], ...) start requests, and completions are
//! fed back through [`SearchController::apply`], either one at a time from an
//! event loop via [`SearchController::next_completion`] or all at once with
//! [`SearchController::settle`].
//!
//! At most one request is authoritative. Starting a request aborts the
//! previous one and bumps a sequence number; a completion is applied only if
//! it carries the latest sequence number, so a response that slips through
//! after its task was aborted is still discarded.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bookfinder::{
//!   catalog::HttpCatalog,
//!   controller::SearchController,
//!   request::{SearchField, SearchFilters},
//!   Config,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut controller = SearchController::new(Arc::new(HttpCatalog::new(&config)?), &config)?;
//!
//! controller.search(SearchFilters::new("dune").with_field(SearchField::Title));
//! controller.settle().await;
//! println!("{} of {}", controller.items().len(), controller.total_matching());
//!
//! if controller.has_more() {
//!   controller.load_more();
//!   controller.settle().await;
//! }
//! # Ok(())
//! # }
//! ```

use tokio::{
  sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
  task::JoinHandle,
};

use super::*;
use crate::{
  catalog::CatalogTransport,
  sort::{self, SortOrder},
};

/// Where the controller is in its request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
  /// Nothing requested yet, or the last request was cancelled before any results arrived
  #[default]
  Idle,
  /// A request is in flight
  Loading,
  /// The latest request succeeded
  Success,
  /// The latest request failed with this message
  Error(String),
}

/// The outcome of one issued request, tagged with its sequence number.
#[derive(Debug)]
pub struct Completion {
  /// Sequence number assigned when the request was issued
  sequence: u64,
  /// Page the request asked for
  page:     u32,
  /// Decoded page or the failure
  outcome:  Result<ResultPage>,
}

impl Completion {
  /// Sequence number assigned when the request was issued.
  pub fn sequence(&self) -> u64 { self.sequence }
}

/// The request currently considered authoritative.
#[derive(Debug)]
struct InFlight {
  /// Sequence number of the request
  sequence: u64,
  /// Task performing it
  handle:   JoinHandle<()>,
}

/// Orchestrates requests for the current filters and accumulates their pages.
pub struct SearchController {
  /// Transport used for every request
  transport:      Arc<dyn CatalogTransport>,
  /// Search endpoint
  endpoint:       Url,
  /// Filters of the latest request, including its page
  filters:        Option<SearchFilters>,
  /// Results accumulated for the current filters
  items:          Vec<ResultItem>,
  /// Total matches reported by the latest successful response
  total_matching: u64,
  /// Lifecycle state
  state:          SearchState,
  /// Sequence number of the latest issued request
  sequence:       u64,
  /// Task of the latest issued request, until it completes
  in_flight:      Option<InFlight>,
  /// Sender cloned into every request task
  completions_tx: UnboundedSender<Completion>,
  /// Completions waiting to be applied
  completions_rx: UnboundedReceiver<Completion>,
}

impl std::fmt::Debug for SearchController {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SearchController")
      .field("endpoint", &self.endpoint.as_str())
      .field("filters", &self.filters)
      .field("items", &self.items.len())
      .field("total_matching", &self.total_matching)
      .field("state", &self.state)
      .field("sequence", &self.sequence)
      .finish()
  }
}

impl SearchController {
  /// Creates a controller sending requests to `config.endpoint` through `transport`.
  pub fn new(transport: Arc<dyn CatalogTransport>, config: &Config) -> Result<Self> {
    Ok(Self::with_endpoint(transport, Url::parse(&config.endpoint)?))
  }

  /// Creates a controller sending requests to `endpoint` through `transport`.
  pub fn with_endpoint(transport: Arc<dyn CatalogTransport>, endpoint: Url) -> Self {
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();
    Self {
      transport,
      endpoint,
      filters: None,
      items: Vec::new(),
      total_matching: 0,
      state: SearchState::Idle,
      sequence: 0,
      in_flight: None,
      completions_tx,
      completions_rx,
    }
  }

  /// Searches with `filters`, returning the sequence number of the issued request.
  ///
  /// - A change to anything but the page starts over: the page is reset to 1 and accumulated
  ///   results are cleared before the request goes out.
  /// - A change to the page alone requests that page; its results are appended.
  /// - Filters identical to the current ones issue nothing and return `None`, unless their last
  ///   request failed or was cancelled, in which case they are retried.
  pub fn search(&mut self, filters: SearchFilters) -> Option<u64> {
    let answered_or_pending = matches!(self.state, SearchState::Loading | SearchState::Success);
    match &self.filters {
      Some(current) if current.same_query(&filters) => {
        if current.page == filters.page && answered_or_pending {
          trace!("Filters unchanged, not issuing a request");
          return None;
        }
        Some(self.issue(filters))
      },
      _ => {
        self.reset();
        Some(self.issue(filters.with_page(1)))
      },
    }
  }

  /// Requests the next page of the current filters, when there is one and nothing is loading.
  pub fn load_more(&mut self) -> Option<u64> {
    if self.is_loading() || !self.has_more() {
      return None;
    }
    let next = self.filters.as_ref()?.next_page();
    Some(self.issue(next))
  }

  /// Re-issues the current filters from page 1, discarding accumulated results.
  pub fn refresh(&mut self) -> Option<u64> {
    let filters = self.filters.clone()?.with_page(1);
    self.reset();
    Some(self.issue(filters))
  }

  /// Aborts the in-flight request. Loading stops without recording an error.
  pub fn cancel(&mut self) {
    let Some(in_flight) = self.in_flight.take() else {
      return;
    };
    in_flight.handle.abort();
    // anything still on its way for the cancelled request is now stale
    self.sequence += 1;
    debug!("Cancelled request #{}", in_flight.sequence);
    self.settle_without_result();
  }

  /// Waits for the next completion, stale or not. Pass it to [`SearchController::apply`].
  ///
  /// Pending until some request finishes; never returns `None` while the controller is alive.
  pub async fn next_completion(&mut self) -> Option<Completion> { self.completions_rx.recv().await }

  /// Applies a completion if it belongs to the latest request. Returns whether it was applied.
  pub fn apply(&mut self, completion: Completion) -> bool {
    let Completion { sequence, page, outcome } = completion;
    if sequence != self.sequence {
      debug!("Discarding stale response #{sequence}, latest is #{}", self.sequence);
      return false;
    }
    self.in_flight = None;

    match outcome {
      Ok(result) => {
        debug!(
          "Request #{sequence} returned {} of {} results for page {page}",
          result.items.len(),
          result.total_matching
        );
        self.total_matching = result.total_matching;
        if page <= 1 {
          self.items = result.items;
        } else {
          self.items.extend(result.items);
        }
        self.state = SearchState::Success;
      },
      Err(e) if e.is_cancellation() => {
        debug!("Request #{sequence} was cancelled");
        self.settle_without_result();
      },
      Err(e) => {
        warn!("Request #{sequence} failed: {e}");
        self.state = SearchState::Error(e.to_string());
        self.rewind_page();
      },
    }
    true
  }

  /// Applies completions until the latest request has resolved, then returns the state.
  pub async fn settle(&mut self) -> &SearchState {
    while self.is_loading() {
      match self.completions_rx.recv().await {
        Some(completion) => {
          self.apply(completion);
        },
        None => break,
      }
    }
    &self.state
  }

  /// Lifecycle state.
  pub fn state(&self) -> &SearchState { &self.state }

  /// Whether a request is in flight.
  pub fn is_loading(&self) -> bool { self.state == SearchState::Loading }

  /// Message of the latest failure, if the latest request failed.
  pub fn error(&self) -> Option<&str> {
    match &self.state {
      SearchState::Error(message) => Some(message),
      _ => None,
    }
  }

  /// Results accumulated for the current filters, in upstream order.
  pub fn items(&self) -> &[ResultItem] { &self.items }

  /// Accumulated results re-ordered by `order`.
  pub fn sorted(&self, order: SortOrder) -> Vec<&ResultItem> { sort::sorted(&self.items, order) }

  /// Total matches reported upstream for the current filters.
  pub fn total_matching(&self) -> u64 { self.total_matching }

  /// Whether more results exist beyond those accumulated.
  pub fn has_more(&self) -> bool { (self.items.len() as u64) < self.total_matching }

  /// Filters of the latest request.
  pub fn filters(&self) -> Option<&SearchFilters> { self.filters.as_ref() }

  /// Sequence number of the latest issued request.
  pub fn sequence(&self) -> u64 { self.sequence }

  /// Starts a request for `filters`, superseding whatever is in flight.
  fn issue(&mut self, filters: SearchFilters) -> u64 {
    if let Some(previous) = self.in_flight.take() {
      previous.handle.abort();
      debug!("Superseded request #{}", previous.sequence);
    }

    self.sequence += 1;
    let sequence = self.sequence;
    let page = filters.page;
    let request = request::build(&self.endpoint, &filters);
    info!("Request #{sequence}: {request}");

    let transport = Arc::clone(&self.transport);
    let completions = self.completions_tx.clone();
    let handle = tokio::spawn(async move {
      let outcome = transport.fetch(&request).await;
      if completions.send(Completion { sequence, page, outcome }).is_err() {
        trace!("Controller dropped before request #{sequence} completed");
      }
    });

    self.in_flight = Some(InFlight { sequence, handle });
    self.filters = Some(filters);
    self.state = SearchState::Loading;
    sequence
  }

  /// Clears accumulated results ahead of a page-one request.
  fn reset(&mut self) {
    self.items.clear();
    self.total_matching = 0;
  }

  /// Leaves the loading state without a new result or error.
  fn settle_without_result(&mut self) {
    self.rewind_page();
    self.state = if self.items.is_empty() && self.total_matching == 0 {
      SearchState::Idle
    } else {
      SearchState::Success
    };
  }

  /// Points the filters back at the last page that actually arrived, so `load_more` retries.
  fn rewind_page(&mut self) {
    if let Some(filters) = self.filters.as_mut() {
      if filters.page > 1 {
        filters.page -= 1;
      }
    }
  }
}

impl Drop for SearchController {
  fn drop(&mut self) {
    if let Some(in_flight) = self.in_flight.take() {
      in_flight.handle.abort();
    }
  }
}

//! Transport seam between the controller and the upstream search API.
//!
//! [`CatalogTransport`] is the only thing the [`crate::controller`] knows
//! about the network. [`HttpCatalog`] is the real implementation; tests swap
//! in scripted transports.

use reqwest::Client;

use super::*;

/// Anything that can answer a search request with a page of results.
///
/// # Examples
///
/// ```no_run
/// # use bookfinder::{prelude::*, item::ResultPage, request::RequestDescriptor};
/// # use bookfinder::error::Result;
/// struct Canned(ResultPage);
///
/// #[async_trait::async_trait]
/// impl CatalogTransport for Canned {
///   async fn fetch(&self, _request: &RequestDescriptor) -> Result<ResultPage> { Ok(self.0.clone()) }
/// }
/// ```
#[async_trait]
pub trait CatalogTransport: Send + Sync {
  /// Performs the request and decodes the response.
  ///
  /// # Errors
  ///
  /// - [`BookfinderError::Network`] when no response arrives
  /// - [`BookfinderError::Http`] for non-2xx statuses
  /// - [`BookfinderError::Decode`] when the body is not a result page
  async fn fetch(&self, request: &RequestDescriptor) -> Result<ResultPage>;
}

/// [`CatalogTransport`] over HTTP using a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpCatalog {
  /// Client carrying the user agent and timeout
  client: Client,
}

impl HttpCatalog {
  /// Builds a client with the configured user agent and timeout.
  pub fn new(config: &Config) -> Result<Self> {
    let client =
      Client::builder().user_agent(&config.user_agent).timeout(config.timeout()).build()?;
    Ok(Self { client })
  }

  /// Wraps an existing client.
  pub fn with_client(client: Client) -> Self { Self { client } }
}

#[async_trait]
impl CatalogTransport for HttpCatalog {
  async fn fetch(&self, request: &RequestDescriptor) -> Result<ResultPage> {
    let url = request.url();
    debug!("Fetching {url}");

    let response = self.client.get(url).header(reqwest::header::CACHE_CONTROL, "no-store").send().await?;
    let status = response.status();
    if !status.is_success() {
      warn!("Search request failed with {status}");
      return Err(BookfinderError::Http(status));
    }

    let data = response.bytes().await?;
    trace!("Search response: {}", String::from_utf8_lossy(&data));
    ResultPage::from_slice(&data)
  }
}

//! User configuration for endpoints, timing, and storage locations.
//!
//! Every field has a default, so a missing or partial `config.toml` is
//! always valid. A full file looks like:
//!
//! ```toml
//! endpoint = "https://openlibrary.org/search.json"
//! catalog_base = "https://openlibrary.org"
//! covers_base = "https://covers.openlibrary.org"
//! reader_base = "https://archive.org/details"
//! debounce_ms = 500
//! timeout_secs = 20
//! user_agent = "bookfinder/0.1.0"
//! storage_path = "/home/me/.local/share/bookfinder"
//! bookmarks_key = "alex.bookmarks"
//! ```

use super::*;

/// Default Open Library search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openlibrary.org/search.json";
/// Default base for canonical detail links.
pub const DEFAULT_CATALOG_BASE: &str = "https://openlibrary.org";
/// Default base for cover images.
pub const DEFAULT_COVERS_BASE: &str = "https://covers.openlibrary.org";
/// Default base for reader links built from internal-archive identifiers.
pub const DEFAULT_READER_BASE: &str = "https://archive.org/details";
/// Default storage key holding the bookmark collection.
pub const DEFAULT_BOOKMARKS_KEY: &str = "alex.bookmarks";
/// Default debounce window for free-text input, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Runtime configuration shared by the library and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Search endpoint receiving the built query parameters
  pub endpoint:      String,
  /// Base for `<catalog-base><key>` detail links
  pub catalog_base:  String,
  /// Base for cover image links
  pub covers_base:   String,
  /// Base for `<reader-base>/<ia>` reader links
  pub reader_base:   String,
  /// Quiet period before free-text input is propagated
  pub debounce_ms:   u64,
  /// Per-request timeout
  pub timeout_secs:  u64,
  /// User agent sent with every request
  pub user_agent:    String,
  /// Directory backing the key-value store
  pub storage_path:  PathBuf,
  /// Store key holding the bookmark collection
  pub bookmarks_key: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      endpoint:      DEFAULT_ENDPOINT.to_string(),
      catalog_base:  DEFAULT_CATALOG_BASE.to_string(),
      covers_base:   DEFAULT_COVERS_BASE.to_string(),
      reader_base:   DEFAULT_READER_BASE.to_string(),
      debounce_ms:   DEFAULT_DEBOUNCE_MS,
      timeout_secs:  20,
      user_agent:    format!("bookfinder/{}", env!("CARGO_PKG_VERSION")),
      storage_path:  Self::default_storage_path(),
      bookmarks_key: DEFAULT_BOOKMARKS_KEY.to_string(),
    }
  }
}

impl Config {
  /// Returns the default path for the configuration file.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.config/bookfinder/config.toml`
  /// - On macOS: `~/Library/Application Support/bookfinder/config.toml`
  /// - On Windows: `%APPDATA%\bookfinder\config.toml`
  /// - Fallback: `./bookfinder/config.toml` in the current directory
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("bookfinder").join("config.toml")
  }

  /// Returns the default directory for persisted state such as bookmarks.
  ///
  /// - On Unix: `~/.local/share/bookfinder`
  /// - On macOS: `~/Library/Application Support/bookfinder`
  /// - On Windows: `%APPDATA%\bookfinder`
  pub fn default_storage_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("bookfinder")
  }

  /// Loads a configuration from a TOML file, falling back to defaults when it doesn't exist.
  ///
  /// A file that exists but fails to parse is an error: silently ignoring a typo in the user's
  /// configuration would be surprising.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      debug!("No configuration at {}, using defaults", path.display());
      return Ok(Self::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    trace!("Loaded configuration: {config:?}");
    Ok(config)
  }

  /// Writes this configuration as TOML, creating parent directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    info!("Wrote configuration to {}", path.display());
    Ok(())
  }

  /// Checks that every configured URL parses, requests can time out at all, and the bookmark key
  /// is usable as a store key.
  pub fn validate(&self) -> Result<()> {
    for url in [&self.endpoint, &self.catalog_base, &self.covers_base, &self.reader_base] {
      Url::parse(url)?;
    }
    if self.timeout_secs == 0 {
      return Err(BookfinderError::Config("timeout_secs must be at least 1".into()));
    }
    if self.bookmarks_key.trim().is_empty() {
      return Err(BookfinderError::Config("bookmarks_key must not be empty".into()));
    }
    Ok(())
  }

  /// The debounce window as a [`Duration`].
  pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }

  /// The request timeout as a [`Duration`].
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }

  /// Sets the search endpoint.
  pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
    self.endpoint = endpoint.into();
    self
  }

  /// Sets the directory backing persisted state.
  pub fn with_storage_path(mut self, storage_path: &Path) -> Self {
    self.storage_path = storage_path.to_path_buf();
    self
  }

  /// Sets the debounce window in milliseconds.
  pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
    self.debounce_ms = debounce_ms;
    self
  }

  /// Sets the store key holding the bookmark collection.
  pub fn with_bookmarks_key(mut self, key: impl Into<String>) -> Self {
    self.bookmarks_key = key.into();
    self
  }
}

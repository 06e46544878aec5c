//! Fail-soft key-value persistence.
//!
//! The raw backends implement [`KeyValueStore`] and report their I/O errors
//! honestly. [`Store`] sits on top and applies the recovery policy used for
//! bookmark data: reads fall back to a caller-supplied default, writes are
//! best effort, and nothing is ever raised to the caller. Every swallowed
//! failure is logged.
//!
//! # Examples
//!
//! ```
//! use bookfinder::store::{MemoryStore, Store};
//!
//! let store = Store::new(MemoryStore::default());
//! store.save("numbers", &vec![1, 2, 3]);
//! assert_eq!(store.load("numbers", Vec::<u32>::new()), vec![1, 2, 3]);
//!
//! store.clear("numbers");
//! assert!(store.load("numbers", Vec::<u32>::new()).is_empty());
//! ```

use std::{cell::RefCell, io};

use super::*;

/// Raw synchronous storage of string values under string keys.
pub trait KeyValueStore {
  /// Returns the value stored under `key`, or `None` when absent.
  fn get(&self, key: &str) -> io::Result<Option<String>>;

  /// Stores `value` under `key`, replacing any previous value.
  fn set(&self, key: &str, value: &str) -> io::Result<()>;

  /// Removes `key`. Removing an absent key succeeds.
  fn remove(&self, key: &str) -> io::Result<()>;
}

/// Directory-backed store: the value for key `k` lives in `<dir>/k.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
  /// Directory holding one file per key
  dir: PathBuf,
}

impl FileStore {
  /// Creates a store rooted at `dir`. The directory is created on first write.
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  /// Directory holding the stored values.
  pub fn dir(&self) -> &Path { &self.dir }

  /// File backing `key`.
  pub fn path_for(&self, key: &str) -> PathBuf {
    let file: String =
      key.chars().map(|c| if c.is_alphanumeric() || "._-".contains(c) { c } else { '_' }).collect();
    self.dir.join(format!("{file}.json"))
  }
}

impl KeyValueStore for FileStore {
  fn get(&self, key: &str) -> io::Result<Option<String>> {
    match std::fs::read_to_string(self.path_for(key)) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  fn set(&self, key: &str, value: &str) -> io::Result<()> {
    std::fs::create_dir_all(&self.dir)?;
    let path = self.path_for(key);
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, value)?;
    std::fs::rename(&tmp, &path)
  }

  fn remove(&self, key: &str) -> io::Result<()> {
    match std::fs::remove_file(self.path_for(key)) {
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      other => other,
    }
  }
}

/// In-process store, mostly useful for tests.
///
/// [`MemoryStore::failing_writes`] makes every `set` fail, simulating a full
/// disk or an exceeded quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
  /// Stored values
  values:         RefCell<HashMap<String, String>>,
  /// When set, every write fails
  failing_writes: bool,
}

impl MemoryStore {
  /// A store whose writes always fail.
  pub fn failing_writes() -> Self { Self { failing_writes: true, ..Self::default() } }

  /// Seeds `key` with a raw value, bypassing serialization.
  pub fn with_raw(self, key: &str, value: &str) -> Self {
    self.values.borrow_mut().insert(key.to_string(), value.to_string());
    self
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> io::Result<Option<String>> {
    Ok(self.values.borrow().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> io::Result<()> {
    if self.failing_writes {
      return Err(io::Error::new(io::ErrorKind::Other, "storage quota exceeded"));
    }
    self.values.borrow_mut().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> io::Result<()> {
    self.values.borrow_mut().remove(key);
    Ok(())
  }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
  fn get(&self, key: &str) -> io::Result<Option<String>> { (**self).get(key) }

  fn set(&self, key: &str, value: &str) -> io::Result<()> { (**self).set(key, value) }

  fn remove(&self, key: &str) -> io::Result<()> { (**self).remove(key) }
}

/// Typed, fail-soft adapter over a [`KeyValueStore`].
#[derive(Debug)]
pub struct Store<S> {
  /// Raw backend
  inner: S,
}

impl<S: KeyValueStore> Store<S> {
  /// Wraps a raw backend.
  pub fn new(inner: S) -> Self { Self { inner } }

  /// The raw backend.
  pub fn inner(&self) -> &S { &self.inner }

  /// Loads and deserializes `key`, returning `default` on any failure.
  ///
  /// An absent key is the normal first-run case and is only traced; read and
  /// parse failures are logged as warnings.
  pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
    let raw = match self.inner.get(key) {
      Ok(Some(raw)) => raw,
      Ok(None) => {
        trace!("No stored value for {key}");
        return default;
      },
      Err(e) => {
        warn!("Failed to read stored value for {key}: {e}");
        return default;
      },
    };
    match serde_json::from_str(&raw) {
      Ok(value) => value,
      Err(e) => {
        warn!("Discarding malformed stored value for {key}: {e}");
        default
      },
    }
  }

  /// Serializes and stores `value` under `key`. Failures are logged and swallowed.
  pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
      Ok(raw) => raw,
      Err(e) => {
        warn!("Failed to serialize value for {key}: {e}");
        return;
      },
    };
    if let Err(e) = self.inner.set(key, &raw) {
      warn!("Failed to persist value for {key}: {e}");
    }
  }

  /// Removes the value under `key`. Failures are logged and swallowed.
  pub fn clear(&self, key: &str) {
    if let Err(e) = self.inner.remove(key) {
      warn!("Failed to clear stored value for {key}: {e}");
    }
  }

  /// Whether a value is currently stored under `key`.
  pub fn contains(&self, key: &str) -> bool { matches!(self.inner.get(key), Ok(Some(_))) }
}

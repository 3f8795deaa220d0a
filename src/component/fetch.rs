//! Component document retrieval
//!
//! Resolves location strings to canonical [`Location`]s and fetches their
//! bytes from the local filesystem or over HTTP.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use url::Url;

use super::IngestError;

/// Default timeout for remote fetches
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A resolved document location
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Absolute, lexically normalized filesystem path
    File(PathBuf),
    /// http or https URL
    Remote(Url),
}

impl Location {
    /// Resolve a location string against the current directory
    pub fn parse(location: &str) -> Result<Self, IngestError> {
        Self::resolve(location, None)
    }

    /// Resolve a location string.
    ///
    /// Accepts `file://` URLs, `http(s)://` URLs and plain paths. Relative
    /// paths resolve against `base_dir`, or the current directory when no
    /// base is given.
    pub fn resolve(location: &str, base_dir: Option<&Path>) -> Result<Self, IngestError> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(invalid(location, "empty location"));
        }

        if trimmed.contains("://") {
            let url = Url::parse(trimmed).map_err(|e| invalid(location, &e.to_string()))?;
            return match url.scheme() {
                "file" => url
                    .to_file_path()
                    .map(|p| Self::File(normalize_path(&p)))
                    .map_err(|_| invalid(location, "file URL does not name a local path")),
                "http" | "https" => Ok(Self::Remote(url)),
                other => Err(invalid(location, &format!("unsupported scheme '{}'", other))),
            };
        }

        let path = Path::new(trimmed);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            let base = match base_dir {
                Some(dir) if dir.is_absolute() => dir.to_path_buf(),
                Some(dir) => current_dir(location)?.join(dir),
                None => current_dir(location)?,
            };
            base.join(path)
        };
        Ok(Self::File(normalize_path(&absolute)))
    }

    /// Canonical key used for deduplication (`file:///...` or the URL)
    pub fn key(&self) -> String {
        match self {
            Self::File(path) => Url::from_file_path(path)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| format!("file://{}", path.display())),
            Self::Remote(url) => url.to_string(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

fn invalid(location: &str, message: &str) -> IngestError {
    IngestError::InvalidLocation {
        location: location.to_string(),
        message: message.to_string(),
    }
}

fn current_dir(location: &str) -> Result<PathBuf, IngestError> {
    std::env::current_dir().map_err(|e| invalid(location, &e.to_string()))
}

/// Remove `.` and resolve `..` without touching the filesystem
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Retrieves the bytes behind a location
///
/// Failures of any kind (not found, network, permission) surface as a
/// single [`IngestError::Fetch`] naming the location.
pub trait Fetch {
    fn fetch(&self, location: &Location) -> Result<Vec<u8>, IngestError>;
}

/// Filesystem reads plus blocking HTTP(S) requests
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    timeout: Duration,
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout applied to remote requests
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[cfg(feature = "http")]
    fn fetch_remote(&self, url: &Url) -> Result<Vec<u8>, IngestError> {
        let fetch_error = |message: String| IngestError::Fetch {
            location: url.to_string(),
            message,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| fetch_error(e.to_string()))?;

        let response = client
            .get(url.as_str())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| fetch_error(e.to_string()))?;

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| fetch_error(e.to_string()))
    }

    #[cfg(not(feature = "http"))]
    fn fetch_remote(&self, url: &Url) -> Result<Vec<u8>, IngestError> {
        Err(IngestError::Fetch {
            location: url.to_string(),
            message: "remote locations require the `http` feature".to_string(),
        })
    }
}

impl Fetch for DefaultFetcher {
    fn fetch(&self, location: &Location) -> Result<Vec<u8>, IngestError> {
        match location {
            Location::File(path) => std::fs::read(path).map_err(|e| IngestError::Fetch {
                location: location.key(),
                message: e.to_string(),
            }),
            Location::Remote(url) => {
                tracing::debug!(url = %url, "Fetching remote component");
                self.fetch_remote(url)
            }
        }
    }
}

/// Serves documents from memory, keyed by canonical location
///
/// Counts fetches so callers can observe cache hits.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, Vec<u8>>,
    fetches: Cell<usize>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document under a location string
    pub fn with_document(mut self, location: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(location, content);
        self
    }

    /// Add or replace a document under a location string
    pub fn insert(&mut self, location: &str, content: impl Into<Vec<u8>>) {
        let key = Location::parse(location)
            .map(|l| l.key())
            .unwrap_or_else(|_| location.to_string());
        self.documents.insert(key, content.into());
    }

    /// Number of fetch calls served so far, successful or not
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl Fetch for MemoryFetcher {
    fn fetch(&self, location: &Location) -> Result<Vec<u8>, IngestError> {
        self.fetches.set(self.fetches.get() + 1);
        let key = location.key();
        self.documents
            .get(&key)
            .cloned()
            .ok_or_else(|| IngestError::Fetch {
                location: key,
                message: "document not found".to_string(),
            })
    }
}

impl<F: Fetch + ?Sized> Fetch for std::rc::Rc<F> {
    fn fetch(&self, location: &Location) -> Result<Vec<u8>, IngestError> {
        (**self).fetch(location)
    }
}

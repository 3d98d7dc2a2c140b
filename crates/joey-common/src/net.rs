//! Document sources: where markup and stylesheet text comes from.
//!
//! The rendering core never performs I/O itself. It asks a
//! [`DocumentSource`] for text and resolves linked references through it.
//! [`NetworkSource`] is the real implementation (HTTP via blocking
//! `reqwest`, local files, and `data:` URLs); [`MemorySource`] serves a fixed
//! set of documents and is what tests use.
//!
//! TODO: Implement proper Fetch Standard (<https://fetch.spec.whatwg.org/>)

use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use base64::Engine;
use thiserror::Error;

use crate::url::resolve_url;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("joey/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Why a document could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("the server responded with {status}")]
    Http {
        /// Status line, e.g. `404 Not Found`.
        status: String,
    },
    /// Connection, TLS, timeout, or body decoding failure.
    #[error("request failed: {0}")]
    Transport(String),
    /// Local file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Filesystem path that was requested.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Malformed `data:` URL.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
    /// Scheme this loader does not understand.
    #[error("URL scheme not supported: {0}")]
    UnsupportedScheme(String),
    /// Nothing registered under this address (in-memory sources).
    #[error("no document at '{0}'")]
    NotFound(String),
}

/// Retrieves raw text for the primary document and its linked stylesheets.
pub trait DocumentSource {
    /// Fetch the text behind an absolute address.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the resource cannot be retrieved.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Resolve a reference found in a document against that document's
    /// address.
    fn resolve(&self, base: &str, reference: &str) -> String {
        resolve_url(reference, Some(base))
    }
}

/// A parsed `data:` URL that can be decoded into text.
pub struct DataURL {
    /// The full raw `data:` URL string (e.g. `data:text/html,<p>hi</p>`).
    pub raw_data: String,
}

impl DataURL {
    /// Create a new `DataURL` from a raw data URL string.
    #[must_use]
    pub const fn new(raw_data: String) -> Self {
        Self { raw_data }
    }

    /// Decode the data URL payload into raw bytes.
    ///
    /// Supports `;base64` payloads and percent-encoded plain payloads.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if the URL has no comma or the
    /// base64 payload is invalid.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        let data_url = self.raw_data.trim_start_matches("data:");
        let Some((metadata, data)) = data_url.split_once(',') else {
            return Err(FetchError::DataUrl("missing comma".to_string()));
        };

        if metadata.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(data.trim())
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            Ok(percent_decode(data))
        }
    }
}

/// Decode `%XX` escapes; malformed escapes are kept literally.
fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let high = char::from(bytes[i + 1]).to_digit(16);
            let low = char::from(bytes[i + 2]).to_digit(16);
            if let (Some(high), Some(low)) = (high, low) {
                out.push((high * 16 + low) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

/// Fetches over HTTP(S), from the local filesystem, or from `data:` URLs.
pub struct NetworkSource {
    client: reqwest::blocking::Client,
}

impl NetworkSource {
    /// Create a source with the default timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn fetch_http(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Http {
                status: response.status().to_string(),
            });
        }

        response
            .text()
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))
    }
}

impl DocumentSource for NetworkSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.fetch_http(url);
        }

        if url.starts_with("data:") {
            let bytes = DataURL::new(url.to_string()).decode()?;
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }

        let path = if let Some(path) = url.strip_prefix("file://") {
            path
        } else if let Some((scheme, _)) = url.split_once("://") {
            return Err(FetchError::UnsupportedScheme(scheme.to_string()));
        } else {
            url
        };

        fs::read_to_string(path).map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })
    }
}

/// In-memory documents keyed by address.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `text` under `url`, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, url: &str, text: &str) -> Self {
        let _ = self.documents.insert(url.to_string(), text.to_string());
        self
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

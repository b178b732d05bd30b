//! Byte loaders - fetch raw package version list bytes
//!
//! The catalog never reads storage itself. It asks a [`ByteLoader`] for the
//! bytes behind a URI and is told either the bytes or an error message.
//! Retries, if any, are the loader's business.

mod file;
mod http;

pub use file::FileByteLoader;
pub use http::{HttpByteLoader, DEFAULT_HTTP_TIMEOUT};

use async_trait::async_trait;
use std::time::Duration;

/// Bytes delivered by a successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBytes {
    pub bytes: Vec<u8>,
    pub duration: Duration,
}

/// A failed load, described by a human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBytesFailure {
    pub message: String,
}

impl LoadBytesFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Asynchronous byte source
#[async_trait]
pub trait ByteLoader: Send + Sync {
    async fn load_bytes(&self, uri: &str) -> Result<LoadedBytes, LoadBytesFailure>;
}

/// Dispatches on the URI scheme: `file://` to disk, `http(s)://` to HTTP
#[derive(Debug, Clone)]
pub struct SchemeByteLoader {
    file: FileByteLoader,
    http: HttpByteLoader,
}

impl SchemeByteLoader {
    pub fn new(file: FileByteLoader, http: HttpByteLoader) -> Self {
        Self { file, http }
    }
}

#[async_trait]
impl ByteLoader for SchemeByteLoader {
    async fn load_bytes(&self, uri: &str) -> Result<LoadedBytes, LoadBytesFailure> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            self.http.load_bytes(uri).await
        } else {
            self.file.load_bytes(uri).await
        }
    }
}

/// Normalise a local path or URI into the URI handed to a loader
///
/// Backslashes become slashes; anything already carrying a scheme is kept
/// as is; bare paths get a `file://` scheme.
pub fn remote_path(path: &str) -> String {
    let regular_path = path.replace('\\', "/");

    if regular_path.contains("://") {
        regular_path
    } else if regular_path.starts_with('/') {
        format!("file://{regular_path}")
    } else {
        format!("file:///{regular_path}")
    }
}

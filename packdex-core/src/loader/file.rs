//! Local file loader

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use super::{ByteLoader, LoadBytesFailure, LoadedBytes};

/// Reads `file://` URIs (or bare paths) from the local disk
#[derive(Debug, Clone, Default)]
pub struct FileByteLoader;

impl FileByteLoader {
    pub fn new() -> Self {
        Self
    }

    /// Local path behind a `file://` URI
    pub fn path_from_uri(uri: &str) -> Result<PathBuf, LoadBytesFailure> {
        let path = match uri.strip_prefix("file://") {
            Some(rest) => rest,
            None if uri.contains("://") => {
                return Err(LoadBytesFailure::new(format!(
                    "Unsupported URI scheme in '{uri}'"
                )))
            }
            None => uri,
        };

        // file:///C:/dir -> C:/dir
        let bytes = path.as_bytes();
        let path = if bytes.len() >= 3
            && bytes[0] == b'/'
            && bytes[1].is_ascii_alphabetic()
            && bytes[2] == b':'
        {
            &path[1..]
        } else {
            path
        };

        Ok(PathBuf::from(path))
    }
}

#[async_trait]
impl ByteLoader for FileByteLoader {
    async fn load_bytes(&self, uri: &str) -> Result<LoadedBytes, LoadBytesFailure> {
        let path = Self::path_from_uri(uri)?;
        let started = Instant::now();

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| LoadBytesFailure::new(format!("{}: {}", path.display(), e)))?;

        let duration = started.elapsed();
        debug!("Read {} bytes from {} in {:?}", bytes.len(), path.display(), duration);

        Ok(LoadedBytes { bytes, duration })
    }
}

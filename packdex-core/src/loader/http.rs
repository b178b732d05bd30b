//! HTTP loader (requires the `http` feature)

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use super::{ByteLoader, LoadBytesFailure, LoadedBytes};

/// Default request timeout
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches `http(s)://` URIs with one shared client
#[derive(Debug, Clone)]
pub struct HttpByteLoader {
    user_agent: String,
    timeout: Duration,
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl HttpByteLoader {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Result<Self> {
        let user_agent = user_agent.into();

        #[cfg(feature = "http")]
        let client = {
            use anyhow::Context;
            reqwest::Client::builder()
                .user_agent(&user_agent)
                .timeout(timeout)
                .build()
                .context("Failed to create HTTP client")?
        };

        Ok(Self {
            user_agent,
            timeout,
            #[cfg(feature = "http")]
            client,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl ByteLoader for HttpByteLoader {
    async fn load_bytes(&self, uri: &str) -> Result<LoadedBytes, LoadBytesFailure> {
        let started = std::time::Instant::now();

        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| LoadBytesFailure::new(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LoadBytesFailure::new(response.status().to_string()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadBytesFailure::new(format!("Failed to read response body: {e}")))?;

        let duration = started.elapsed();
        tracing::debug!("Downloaded {} bytes from {} in {:?}", bytes.len(), uri, duration);

        Ok(LoadedBytes {
            bytes: bytes.to_vec(),
            duration,
        })
    }
}

/// Stub for when the http feature is disabled
#[cfg(not(feature = "http"))]
#[async_trait]
impl ByteLoader for HttpByteLoader {
    async fn load_bytes(&self, uri: &str) -> Result<LoadedBytes, LoadBytesFailure> {
        Err(LoadBytesFailure::new(format!(
            "Cannot fetch '{uri}': HTTP support is not enabled. Rebuild with --features http"
        )))
    }
}

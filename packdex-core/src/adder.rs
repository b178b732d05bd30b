//! Resource adder - fetch a package version list and ingest it
//!
//! Every call that gets past argument checking reports exactly once to the
//! completion callback, and does so before its error (if any) is handed
//! back to the caller:
//!
//! ```text
//! Idle ─► Fetching ─┬─► ingest ok     ─► notify(true)  ─► Ok
//!                   ├─► ingest failed ─► notify(false) ─► Err(Ingest)
//!                   └─► fetch failed  ─► notify(false) ─► Err(Fetch)
//! ```
//!
//! An empty path or a missing byte loader fails in `Idle` and is not
//! reported to the callback.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::builder::{CatalogBuilder, IngestSummary};
use crate::catalog::Catalog;
use crate::error::AddResourcesError;
use crate::loader::{remote_path, ByteLoader, LoadBytesFailure, LoadedBytes};
use crate::manifest::{ManifestDeserializer, SerdeManifestDeserializer};

/// Called once per add-resources call with the caller's path and the result
pub type AddResourcesCompleteCallback = Arc<dyn Fn(&str, bool) + Send + Sync>;

/// The settled outcome of one call, not yet reported to anyone
///
/// Reporting ([`Completion::notify`]) and propagating
/// ([`Completion::into_result`]) are separate steps so that observers are
/// always told before an error travels up.
#[derive(Debug)]
#[must_use]
pub struct Completion {
    token: String,
    outcome: Result<IngestSummary, AddResourcesError>,
}

impl Completion {
    pub fn new(token: impl Into<String>, outcome: Result<IngestSummary, AddResourcesError>) -> Self {
        Self {
            token: token.into(),
            outcome,
        }
    }

    /// Correlation token handed back to the callback
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn notify(&self, callback: Option<&AddResourcesCompleteCallback>) {
        if let Some(callback) = callback {
            callback(&self.token, self.success());
        }
    }

    pub fn into_result(self) -> Result<IngestSummary, AddResourcesError> {
        self.outcome
    }
}

/// Fetches package version lists and feeds them to the catalog builder
pub struct ResourceAdder {
    byte_loader: Option<Arc<dyn ByteLoader>>,
    deserializer: Arc<dyn ManifestDeserializer>,
    fetch_timeout: Option<Duration>,
    add_resources_complete: Option<AddResourcesCompleteCallback>,
}

impl Default for ResourceAdder {
    fn default() -> Self {
        Self {
            byte_loader: None,
            deserializer: Arc::new(SerdeManifestDeserializer::new()),
            fetch_timeout: None,
            add_resources_complete: None,
        }
    }
}

impl ResourceAdder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_byte_loader(&mut self, byte_loader: Arc<dyn ByteLoader>) {
        self.byte_loader = Some(byte_loader);
    }

    pub fn set_manifest_deserializer(&mut self, deserializer: Arc<dyn ManifestDeserializer>) {
        self.deserializer = deserializer;
    }

    /// Give up on a fetch after `timeout`; `None` waits forever
    pub fn set_fetch_timeout(&mut self, timeout: Option<Duration>) {
        self.fetch_timeout = timeout;
    }

    pub fn set_add_resources_complete(&mut self, callback: AddResourcesCompleteCallback) {
        self.add_resources_complete = Some(callback);
    }

    /// Fetch the list at `resource_version_path` and add it to `catalog`
    ///
    /// Resources whose variant differs from `current_variant` are skipped.
    /// On failure, entries added before the error stay in the catalog.
    pub async fn add_resources(
        &self,
        catalog: &mut Catalog,
        resource_version_path: &str,
        current_variant: Option<&str>,
    ) -> Result<IngestSummary, AddResourcesError> {
        if resource_version_path.is_empty() {
            return Err(AddResourcesError::InvalidManifestUri);
        }

        let byte_loader = self
            .byte_loader
            .as_deref()
            .ok_or(AddResourcesError::MissingByteLoader)?;

        let uri = remote_path(resource_version_path);
        info!(
            "Adding resources from {} (variant: {})",
            uri,
            current_variant.unwrap_or("<none>")
        );

        let outcome = match self.fetch(byte_loader, &uri).await {
            Ok(loaded) => {
                debug!("Fetched {} bytes in {:?}", loaded.bytes.len(), loaded.duration);
                CatalogBuilder::new(current_variant)
                    .ingest_bytes(catalog, self.deserializer.as_ref(), &loaded.bytes)
                    .map_err(|source| AddResourcesError::Ingest {
                        uri: uri.clone(),
                        source,
                    })
            }
            Err(failure) => Err(AddResourcesError::fetch(&uri, &failure.message)),
        };

        let completion = Completion::new(resource_version_path, outcome);
        completion.notify(self.add_resources_complete.as_ref());

        match completion.into_result() {
            Ok(summary) => {
                info!(
                    "Added {} resources and {} assets from {}",
                    summary.resources, summary.assets, uri
                );
                Ok(summary)
            }
            Err(e) => {
                // Reported by the caller
                debug!("Add resources from {} failed: {}", uri, e);
                Err(e)
            }
        }
    }

    async fn fetch(
        &self,
        byte_loader: &dyn ByteLoader,
        uri: &str,
    ) -> Result<LoadedBytes, LoadBytesFailure> {
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, byte_loader.load_bytes(uri))
                .await
                .unwrap_or_else(|_| {
                    Err(LoadBytesFailure::new(format!("Timed out after {limit:?}")))
                }),
            None => byte_loader.load_bytes(uri).await,
        }
    }
}

#[cfg(test)]
mod adder_tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_completion_notifies_token_and_flag() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: AddResourcesCompleteCallback = Arc::new(move |token: &str, ok: bool| {
            sink.lock().unwrap().push((token.to_string(), ok));
        });

        Completion::new("a.yaml", Ok(IngestSummary::default())).notify(Some(&callback));
        let failed = Completion::new("b.yaml", Err(AddResourcesError::fetch("b.yaml", "404")));
        failed.notify(Some(&callback));

        assert!(failed.into_result().is_err());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("a.yaml".to_string(), true), ("b.yaml".to_string(), false)]
        );
    }

    #[test]
    fn test_completion_without_callback_is_silent() {
        let completion = Completion::new("a.yaml", Ok(IngestSummary::default()));
        completion.notify(None);
        assert!(completion.success());
        assert_eq!(completion.token(), "a.yaml");
    }

    #[tokio::test]
    async fn test_configuration_errors_precede_io() {
        let mut catalog = Catalog::new();
        let adder = ResourceAdder::new();

        let err = adder
            .add_resources(&mut catalog, "", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AddResourcesError::InvalidManifestUri));

        let err = adder
            .add_resources(&mut catalog, "pvl.yaml", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AddResourcesError::MissingByteLoader));
        assert!(err.is_configuration_error());
    }
}

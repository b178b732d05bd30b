//! Resource manager - owns the session catalog and feeds it
//!
//! `add_resources` takes `&mut self`, so one manager runs at most one
//! ingestion at a time. Use separate managers to ingest in parallel.

use std::sync::Arc;
use std::time::Duration;

use crate::adder::{AddResourcesCompleteCallback, ResourceAdder};
use crate::builder::IngestSummary;
use crate::catalog::{AssetInfo, Catalog, ResourceGroup, ResourceInfo, ResourceName};
use crate::config::PackdexConfig;
use crate::error::AddResourcesError;
use crate::loader::ByteLoader;
use crate::manifest::ManifestDeserializer;

/// Session-wide catalog plus the machinery that fills it
#[derive(Default)]
pub struct ResourceManager {
    catalog: Catalog,
    resource_adder: ResourceAdder,
}

impl ResourceManager {
    /// Manager with an empty catalog and no byte loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager wired with the loaders, encoding and timeout from `config`
    pub fn from_config(config: &PackdexConfig) -> anyhow::Result<Self> {
        let mut manager = Self::new();
        manager.set_byte_loader(config.byte_loader()?);
        manager.set_manifest_deserializer(config.manifest_deserializer());
        manager.set_fetch_timeout(config.fetch_timeout());
        Ok(manager)
    }

    pub fn set_byte_loader(&mut self, byte_loader: Arc<dyn ByteLoader>) {
        self.resource_adder.set_byte_loader(byte_loader);
    }

    pub fn set_manifest_deserializer(&mut self, deserializer: Arc<dyn ManifestDeserializer>) {
        self.resource_adder.set_manifest_deserializer(deserializer);
    }

    pub fn set_fetch_timeout(&mut self, timeout: Option<Duration>) {
        self.resource_adder.set_fetch_timeout(timeout);
    }

    /// Register the callback told about every add-resources call
    pub fn set_add_resources_complete<F>(&mut self, callback: F)
    where
        F: Fn(&str, bool) + Send + Sync + 'static,
    {
        let callback: AddResourcesCompleteCallback = Arc::new(callback);
        self.resource_adder.set_add_resources_complete(callback);
    }

    /// Fetch a package version list and add its contents to the catalog
    pub async fn add_resources(
        &mut self,
        resource_version_path: &str,
        current_variant: Option<&str>,
    ) -> Result<IngestSummary, AddResourcesError> {
        self.resource_adder
            .add_resources(&mut self.catalog, resource_version_path, current_variant)
            .await
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    pub fn asset_info(&self, asset_name: &str) -> Option<&AssetInfo> {
        self.catalog.asset_info(asset_name)
    }

    pub fn has_asset(&self, asset_name: &str) -> bool {
        self.catalog.has_asset(asset_name)
    }

    pub fn resource_info(&self, resource_name: &ResourceName) -> Option<&ResourceInfo> {
        self.catalog.resource_info(resource_name)
    }

    pub fn resource_group(&self, name: &str) -> Option<&ResourceGroup> {
        self.catalog.resource_group(name)
    }

    pub fn asset_count(&self) -> usize {
        self.catalog.asset_count()
    }

    pub fn resource_count(&self) -> usize {
        self.catalog.resource_count()
    }
}

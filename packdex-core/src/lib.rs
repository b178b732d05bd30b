//! packdex core library exports
//!
//! Turns a package version list into an in-memory catalog of assets,
//! resources and resource groups.

pub mod adder;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod manager;
pub mod manifest;

pub use adder::{AddResourcesCompleteCallback, Completion, ResourceAdder};
pub use builder::{CatalogBuilder, IngestSummary};
pub use catalog::{AssetInfo, Catalog, LoadType, ResourceGroup, ResourceInfo, ResourceName};
pub use config::PackdexConfig;
pub use error::{AddResourcesError, IngestError};
pub use manager::ResourceManager;
pub use manifest::PackageVersionList;

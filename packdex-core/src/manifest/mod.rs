//! Package version list - the wire form of a distribution package
//!
//! Records reference each other by position in their sibling arrays, not
//! by name. Indexes are only meaningful inside one list and never leave
//! the ingestion pass.

mod serializer;

pub use serializer::{ManifestDeserializer, ManifestFormat, SerdeManifestDeserializer};

use serde::{Deserialize, Serialize};

use crate::catalog::ResourceName;

/// A package version list (manifest)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageVersionList {
    /// Game version this package applies to
    #[serde(default)]
    pub applicable_game_version: String,

    /// Monotonic resource version
    #[serde(default)]
    pub internal_resource_version: i32,

    #[serde(default)]
    pub assets: Vec<Asset>,

    #[serde(default)]
    pub resources: Vec<Resource>,

    #[serde(default)]
    pub file_systems: Vec<FileSystem>,

    #[serde(default)]
    pub resource_groups: Vec<ResourceGroup>,

    /// Cleared by deserializers that recognise a structurally broken list
    #[serde(skip, default = "default_valid")]
    valid: bool,
}

fn default_valid() -> bool {
    true
}

/// Asset record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,

    /// Indexes into [`PackageVersionList::assets`]
    #[serde(default)]
    pub dependency_asset_indexes: Vec<u32>,
}

/// Resource record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,

    #[serde(default)]
    pub variant: Option<String>,

    pub extension: String,

    /// Wire value of [`LoadType`](crate::catalog::LoadType)
    #[serde(default)]
    pub load_type: u8,

    pub length: u32,

    #[serde(default)]
    pub hash_code: i32,

    /// Indexes into [`PackageVersionList::assets`]
    #[serde(default)]
    pub asset_indexes: Vec<u32>,
}

/// File system (container) record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSystem {
    pub name: String,

    /// Indexes into [`PackageVersionList::resources`]
    #[serde(default)]
    pub resource_indexes: Vec<u32>,
}

/// Resource group record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub name: String,

    /// Indexes into [`PackageVersionList::resources`]
    #[serde(default)]
    pub resource_indexes: Vec<u32>,
}

impl Default for PackageVersionList {
    fn default() -> Self {
        Self {
            applicable_game_version: String::new(),
            internal_resource_version: 0,
            assets: Vec::new(),
            resources: Vec::new(),
            file_systems: Vec::new(),
            resource_groups: Vec::new(),
            valid: true,
        }
    }
}

impl PackageVersionList {
    pub fn new(
        assets: Vec<Asset>,
        resources: Vec<Resource>,
        file_systems: Vec<FileSystem>,
        resource_groups: Vec<ResourceGroup>,
    ) -> Self {
        Self {
            assets,
            resources,
            file_systems,
            resource_groups,
            ..Self::default()
        }
    }

    /// A list flagged as structurally broken
    pub fn invalid() -> Self {
        Self {
            valid: false,
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl Asset {
    pub fn new(name: impl Into<String>, dependency_asset_indexes: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            dependency_asset_indexes,
        }
    }
}

impl Resource {
    pub fn new(
        name: impl Into<String>,
        variant: Option<&str>,
        extension: impl Into<String>,
        length: u32,
        asset_indexes: Vec<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            variant: variant.map(str::to_string),
            extension: extension.into(),
            load_type: 0,
            length,
            hash_code: 0,
            asset_indexes,
        }
    }

    /// Identity of this record in the catalog
    pub fn resource_name(&self) -> ResourceName {
        ResourceName::new(&self.name, self.variant.as_deref(), &self.extension)
    }
}

impl FileSystem {
    pub fn new(name: impl Into<String>, resource_indexes: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            resource_indexes,
        }
    }
}

impl ResourceGroup {
    pub fn new(name: impl Into<String>, resource_indexes: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            resource_indexes,
        }
    }
}

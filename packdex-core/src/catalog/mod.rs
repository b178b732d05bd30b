//! Catalog - the queryable result of ingesting package version lists
//!
//! The catalog maps asset names and resource identities to their metadata
//! and tracks resource groups. It is owned by the [`ResourceManager`] and
//! lives for the whole session; every ingestion adds to it.
//!
//! # Overview
//!
//! ```text
//! asset name ──► AssetInfo ──► ResourceName ──► ResourceInfo ──► file system
//!                   │                               ▲
//!                   └─► dependency asset names      │
//!                                                   │
//! group name ──► ResourceGroup ─────────────────────┘
//! ```
//!
//! Assets and resources are inserted with reject-on-duplicate semantics;
//! nothing is ever overwritten.
//!
//! [`ResourceManager`]: crate::manager::ResourceManager

mod group;
mod info;
mod resource_name;

pub use group::ResourceGroup;
pub use info::{AssetInfo, LoadType, ResourceInfo};
pub use resource_name::ResourceName;

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::IngestError;

/// Name of the implicit group holding every resource
pub const DEFAULT_RESOURCE_GROUP_NAME: &str = "";

/// Asset, resource and group tables
#[derive(Debug, Default)]
pub struct Catalog {
    asset_infos: HashMap<String, AssetInfo>,
    resource_infos: HashMap<ResourceName, ResourceInfo>,
    resource_groups: HashMap<String, ResourceGroup>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset, rejecting a name that is already present
    pub fn add_asset_info(&mut self, asset_info: AssetInfo) -> Result<(), IngestError> {
        match self.asset_infos.entry(asset_info.asset_name().to_string()) {
            Entry::Occupied(entry) => Err(IngestError::DuplicateAsset {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(asset_info);
                Ok(())
            }
        }
    }

    /// Register a resource, rejecting an identity that is already present
    pub fn add_resource_info(&mut self, resource_info: ResourceInfo) -> Result<(), IngestError> {
        match self
            .resource_infos
            .entry(resource_info.resource_name().clone())
        {
            Entry::Occupied(entry) => Err(IngestError::DuplicateResource {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(resource_info);
                Ok(())
            }
        }
    }

    /// Get a group by name, creating an empty one if needed
    pub fn get_or_add_resource_group(&mut self, name: &str) -> &mut ResourceGroup {
        self.resource_groups
            .entry(name.to_string())
            .or_insert_with(|| ResourceGroup::new(name))
    }

    pub fn asset_info(&self, asset_name: &str) -> Option<&AssetInfo> {
        self.asset_infos.get(asset_name)
    }

    pub fn has_asset(&self, asset_name: &str) -> bool {
        self.asset_infos.contains_key(asset_name)
    }

    pub fn resource_info(&self, resource_name: &ResourceName) -> Option<&ResourceInfo> {
        self.resource_infos.get(resource_name)
    }

    /// Resource info for the resource that contains an asset
    pub fn resource_info_for_asset(&self, asset_name: &str) -> Option<&ResourceInfo> {
        self.asset_info(asset_name)
            .and_then(|asset| self.resource_info(asset.resource_name()))
    }

    pub fn resource_group(&self, name: &str) -> Option<&ResourceGroup> {
        self.resource_groups.get(name)
    }

    /// The implicit group of all resources, once anything has been ingested
    pub fn default_resource_group(&self) -> Option<&ResourceGroup> {
        self.resource_group(DEFAULT_RESOURCE_GROUP_NAME)
    }

    pub fn asset_count(&self) -> usize {
        self.asset_infos.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resource_infos.len()
    }

    pub fn resource_group_count(&self) -> usize {
        self.resource_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asset_infos.is_empty() && self.resource_infos.is_empty()
    }

    pub fn asset_infos(&self) -> impl Iterator<Item = &AssetInfo> {
        self.asset_infos.values()
    }

    pub fn resource_infos(&self) -> impl Iterator<Item = &ResourceInfo> {
        self.resource_infos.values()
    }

    pub fn resource_groups(&self) -> impl Iterator<Item = &ResourceGroup> {
        self.resource_groups.values()
    }

    /// Resources stored in the named file system, ordered by name
    pub fn resources_in_file_system(&self, file_system_name: &str) -> Vec<&ResourceName> {
        let mut names: Vec<&ResourceName> = self
            .resource_infos
            .values()
            .filter(|info| info.file_system_name() == Some(file_system_name))
            .map(|info| info.resource_name())
            .collect();
        names.sort();
        names
    }

    /// Every asset an asset transitively depends on, in first-visit order
    ///
    /// Dependencies missing from the catalog are still listed but not
    /// expanded. Cycles are tolerated. Returns `None` for an unknown asset.
    pub fn dependency_closure(&self, asset_name: &str) -> Option<Vec<String>> {
        let root = self.asset_info(asset_name)?;

        let mut visited: HashSet<&str> = HashSet::from([asset_name]);
        let mut closure = Vec::new();
        let mut queue: VecDeque<&str> = root
            .dependency_asset_names()
            .iter()
            .map(String::as_str)
            .collect();

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name) {
                continue;
            }
            closure.push(name.to_string());

            if let Some(info) = self.asset_info(name) {
                queue.extend(info.dependency_asset_names().iter().map(String::as_str));
            }
        }

        Some(closure)
    }
}

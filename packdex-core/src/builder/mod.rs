//! Catalog builder - turns a package version list into catalog entries
//!
//! One pass, in a fixed order:
//!
//! 1. index file systems (transient [`FileSystemLocator`])
//! 2. resources that pass the variant filter, each preceded by its assets
//! 3. resource groups
//!
//! The builder stops at the first error. Whatever it registered before that
//! point stays in the catalog.

mod locator;
mod variant;

pub use locator::FileSystemLocator;
pub use variant::VariantFilter;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{
    AssetInfo, Catalog, LoadType, ResourceInfo, DEFAULT_RESOURCE_GROUP_NAME,
};
use crate::error::IngestError;
use crate::manifest::{Asset, ManifestDeserializer, PackageVersionList, Resource};

/// Counts of what one ingestion pass added
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub assets: usize,
    pub resources: usize,
    pub skipped_resources: usize,
    pub file_system_resources: usize,
    pub resource_groups: usize,
}

/// Builds catalog entries for one variant
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogBuilder<'v> {
    filter: VariantFilter<'v>,
}

impl<'v> CatalogBuilder<'v> {
    pub fn new(current_variant: Option<&'v str>) -> Self {
        Self {
            filter: VariantFilter::new(current_variant),
        }
    }

    /// Deserialize raw bytes, then ingest the resulting list
    pub fn ingest_bytes(
        &self,
        catalog: &mut Catalog,
        deserializer: &dyn ManifestDeserializer,
        bytes: &[u8],
    ) -> Result<IngestSummary, IngestError> {
        let list = deserializer
            .deserialize(bytes)
            .map_err(|source| IngestError::Deserialize { source })?;

        if !list.is_valid() {
            return Err(IngestError::InvalidManifest);
        }

        self.ingest(catalog, &list)
    }

    /// Register every accepted asset, resource and group of `list`
    pub fn ingest(
        &self,
        catalog: &mut Catalog,
        list: &PackageVersionList,
    ) -> Result<IngestSummary, IngestError> {
        info!(
            "Ingesting package version list (game version '{}', resource version {}, variant {}): {} assets, {} resources, {} file systems, {} resource groups",
            list.applicable_game_version,
            list.internal_resource_version,
            self.filter.current_variant().unwrap_or("<none>"),
            list.assets.len(),
            list.resources.len(),
            list.file_systems.len(),
            list.resource_groups.len()
        );

        let mut summary = IngestSummary::default();
        catalog.get_or_add_resource_group(DEFAULT_RESOURCE_GROUP_NAME);

        let locator = FileSystemLocator::build(&list.file_systems, &list.resources, &self.filter)?;
        summary.file_system_resources = locator.len();
        debug!("Located {} resources in file systems", locator.len());

        for resource in &list.resources {
            if !self.filter.accepts(resource.variant.as_deref()) {
                summary.skipped_resources += 1;
                continue;
            }

            let resource_name = resource.resource_name();

            for &asset_index in &resource.asset_indexes {
                let asset = asset_at(&list.assets, asset_index, || {
                    format!("Resource '{resource_name}'")
                })?;
                let dependency_asset_names = dependency_names(&list.assets, asset)?;

                catalog.add_asset_info(AssetInfo::new(
                    &asset.name,
                    resource_name.clone(),
                    dependency_asset_names,
                ))?;
                summary.assets += 1;
            }

            let load_type = LoadType::try_from(resource.load_type).map_err(|value| {
                IngestError::UnknownLoadType {
                    resource: resource_name.clone(),
                    value,
                }
            })?;
            let file_system_name = locator.file_system_name(&resource_name).map(str::to_string);

            // Package lists ship uncompressed, so packed and unpacked lengths match
            catalog.add_resource_info(ResourceInfo::new(
                resource_name.clone(),
                file_system_name,
                load_type,
                resource.length,
                resource.hash_code,
                resource.length,
                true,
                true,
            ))?;
            catalog
                .get_or_add_resource_group(DEFAULT_RESOURCE_GROUP_NAME)
                .add_resource(resource_name, resource.length, resource.length);
            summary.resources += 1;
        }

        debug!(
            "Registered {} resources and {} assets, skipped {} resources of other variants",
            summary.resources, summary.assets, summary.skipped_resources
        );

        for group_record in &list.resource_groups {
            let group = catalog.get_or_add_resource_group(&group_record.name);

            for &resource_index in &group_record.resource_indexes {
                let resource = resource_at(&list.resources, resource_index, || {
                    format!("Resource group '{}'", group_record.name)
                })?;

                if !self.filter.accepts(resource.variant.as_deref()) {
                    continue;
                }

                group.add_resource(resource.resource_name(), resource.length, resource.length);
            }

            summary.resource_groups += 1;
        }

        Ok(summary)
    }
}

pub(crate) fn resource_at<'m>(
    resources: &'m [Resource],
    index: u32,
    referrer: impl FnOnce() -> String,
) -> Result<&'m Resource, IngestError> {
    resources
        .get(index as usize)
        .ok_or_else(|| IngestError::ResourceIndexOutOfRange {
            referrer: referrer(),
            index,
            len: resources.len(),
        })
}

fn asset_at<'m>(
    assets: &'m [Asset],
    index: u32,
    referrer: impl FnOnce() -> String,
) -> Result<&'m Asset, IngestError> {
    assets
        .get(index as usize)
        .ok_or_else(|| IngestError::AssetIndexOutOfRange {
            referrer: referrer(),
            index,
            len: assets.len(),
        })
}

/// Project dependency indexes onto asset names, keeping order
fn dependency_names(assets: &[Asset], asset: &Asset) -> Result<Vec<String>, IngestError> {
    asset
        .dependency_asset_indexes
        .iter()
        .map(|&index| {
            assets
                .get(index as usize)
                .map(|dependency| dependency.name.clone())
                .ok_or_else(|| IngestError::DependencyIndexOutOfRange {
                    asset: asset.name.clone(),
                    index,
                    len: assets.len(),
                })
        })
        .collect()
}

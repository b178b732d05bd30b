//! Catalog commands
//!
//! Each command builds a fresh catalog from one package version list and
//! prints a view of it: a table for people, JSON with `--json`.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing::debug;

use packdex_core::catalog::{Catalog, ResourceInfo, DEFAULT_RESOURCE_GROUP_NAME};
use packdex_core::manifest::{ManifestDeserializer, ManifestFormat};
use packdex_core::{IngestSummary, PackdexConfig, ResourceManager};

/// Global flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub config_path: Option<PathBuf>,
    pub variant: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl SessionOptions {
    /// Configuration file merged with command-line overrides
    pub fn config(&self) -> Result<PackdexConfig> {
        let mut config = match &self.config_path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                PackdexConfig::load_from_path(path)?
            }
            None => PackdexConfig::load()?,
        };

        if let Some(variant) = &self.variant {
            config.variant = Some(variant.clone());
        }
        if let Some(seconds) = self.timeout_seconds {
            config.fetch_timeout_seconds = Some(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    async fn build_catalog(&self, manifest: &str) -> Result<(Catalog, IngestSummary)> {
        let config = self.config()?;
        debug!("Using configuration: {:?}", config);

        let mut manager = ResourceManager::from_config(&config)?;
        manager.set_add_resources_complete(|token, success| {
            debug!(token, success, "Add resources complete");
        });

        let uri = manifest_uri(manifest)?;
        let summary = manager
            .add_resources(&uri, config.variant.as_deref())
            .await
            .with_context(|| format!("Failed to build catalog from {manifest}"))?;

        Ok((manager.into_catalog(), summary))
    }
}

/// Anchor a local manifest path at the working directory
///
/// URIs (anything with `://`) pass through untouched.
fn manifest_uri(manifest: &str) -> Result<String> {
    if manifest.contains("://") {
        return Ok(manifest.to_string());
    }

    let path = std::path::absolute(manifest)
        .with_context(|| format!("Failed to resolve manifest path {manifest}"))?;
    Ok(path.to_string_lossy().into_owned())
}

#[derive(Tabled)]
struct ResourceTableRow {
    #[tabled(rename = "Resource")]
    name: String,
    #[tabled(rename = "Load type")]
    load_type: String,
    #[tabled(rename = "Length")]
    length: u32,
    #[tabled(rename = "Hash")]
    hash_code: i32,
    #[tabled(rename = "File system")]
    file_system: String,
}

impl From<&ResourceInfo> for ResourceTableRow {
    fn from(info: &ResourceInfo) -> Self {
        Self {
            name: info.resource_name().full_name(),
            load_type: info.load_type().to_string(),
            length: info.length(),
            hash_code: info.hash_code(),
            file_system: info.file_system_name().unwrap_or("-").to_string(),
        }
    }
}

#[derive(Tabled)]
struct GroupTableRow {
    #[tabled(rename = "Group")]
    name: String,
    #[tabled(rename = "Resources")]
    resources: usize,
    #[tabled(rename = "Length")]
    total_length: u64,
    #[tabled(rename = "Packed length")]
    total_packed_length: u64,
}

fn group_label(name: &str) -> String {
    if name == DEFAULT_RESOURCE_GROUP_NAME {
        "<default>".to_string()
    } else {
        name.to_string()
    }
}

fn render<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub async fn inspect_command(session: &SessionOptions, manifest: &str, json: bool) -> Result<()> {
    let (catalog, summary) = session.build_catalog(manifest).await?;

    let mut resources: Vec<&ResourceInfo> = catalog.resource_infos().collect();
    resources.sort_by(|a, b| a.resource_name().cmp(b.resource_name()));

    if json {
        let output = json!({
            "summary": summary,
            "assetCount": catalog.asset_count(),
            "resourceCount": catalog.resource_count(),
            "resourceGroupCount": catalog.resource_group_count(),
            "resources": resources,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Added {} resources and {} assets ({} resources skipped for other variants)\n",
        summary.resources, summary.assets, summary.skipped_resources
    );

    if resources.is_empty() {
        println!("No resources found.");
    } else {
        let rows: Vec<ResourceTableRow> = resources.into_iter().map(Into::into).collect();
        println!("{}", render(&rows));
    }

    Ok(())
}

pub async fn asset_command(
    session: &SessionOptions,
    manifest: &str,
    asset_name: &str,
    json: bool,
) -> Result<()> {
    let (catalog, _) = session.build_catalog(manifest).await?;

    let asset = catalog
        .asset_info(asset_name)
        .ok_or_else(|| anyhow!("Asset '{asset_name}' is not in the catalog"))?;
    let resource = catalog.resource_info(asset.resource_name());
    let closure = catalog.dependency_closure(asset_name).unwrap_or_default();

    if json {
        let output = json!({
            "asset": asset,
            "resource": resource,
            "dependencyClosure": closure,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Asset:        {}", asset.asset_name());
    println!("Resource:     {}", asset.resource_name());
    if let Some(resource) = resource {
        println!("Load type:    {}", resource.load_type());
        println!("Length:       {}", resource.length());
        println!(
            "File system:  {}",
            resource.file_system_name().unwrap_or("-")
        );
    }

    if asset.dependency_asset_names().is_empty() {
        println!("Dependencies: none");
    } else {
        println!("Dependencies:");
        for name in asset.dependency_asset_names() {
            println!("  {name}");
        }
    }

    if closure.len() > asset.dependency_asset_names().len() {
        println!("All dependencies ({}):", closure.len());
        for name in &closure {
            println!("  {name}");
        }
    }

    Ok(())
}

pub async fn groups_command(session: &SessionOptions, manifest: &str, json: bool) -> Result<()> {
    let (catalog, _) = session.build_catalog(manifest).await?;

    let mut groups: Vec<_> = catalog.resource_groups().collect();
    groups.sort_by(|a, b| a.name().cmp(b.name()));

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    let rows: Vec<GroupTableRow> = groups
        .into_iter()
        .map(|group| GroupTableRow {
            name: group_label(group.name()),
            resources: group.resource_count(),
            total_length: group.total_length(),
            total_packed_length: group.total_packed_length(),
        })
        .collect();

    println!("Found {} resource groups\n", rows.len());
    println!("{}", render(&rows));

    Ok(())
}

pub fn convert_command(
    session: &SessionOptions,
    manifest: &Path,
    output: &Path,
    format: Option<&str>,
) -> Result<()> {
    let target = match format {
        Some(name) => name.parse::<ManifestFormat>()?,
        None => ManifestFormat::from_path(output).ok_or_else(|| {
            anyhow!(
                "Cannot guess the output format from {}; pass --format",
                output.display()
            )
        })?,
    };

    let config = session.config()?;
    let bytes = fs::read(manifest)
        .with_context(|| format!("Failed to read {}", manifest.display()))?;
    let deserializer = config.manifest_deserializer();
    let source = deserializer
        .format()
        .unwrap_or_else(|| ManifestFormat::sniff(&bytes));

    let list = deserializer
        .deserialize(&bytes)
        .with_context(|| format!("Failed to parse {}", manifest.display()))?;
    if !list.is_valid() {
        bail!("{} is not a valid package version list", manifest.display());
    }

    fs::write(output, target.encode(&list)?)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Converted {} ({}) to {} ({})",
        manifest.display(),
        source,
        output.display(),
        target
    );
    Ok(())
}

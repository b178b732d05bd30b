//! Catalog records: assets, resources and load types

use serde::Serialize;
use std::fmt;

use super::ResourceName;

/// How a resource is read off storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LoadType {
    LoadFromFile = 0,
    LoadFromMemory = 1,
    LoadFromMemoryAndQuickDecrypt = 2,
    LoadFromMemoryAndDecrypt = 3,
    LoadFromBinary = 4,
    LoadFromBinaryAndQuickDecrypt = 5,
    LoadFromBinaryAndDecrypt = 6,
}

impl LoadType {
    /// Binary resources are handed to the caller as raw bytes instead of
    /// being instantiated as asset containers.
    pub fn is_load_from_binary(self) -> bool {
        matches!(
            self,
            LoadType::LoadFromBinary
                | LoadType::LoadFromBinaryAndQuickDecrypt
                | LoadType::LoadFromBinaryAndDecrypt
        )
    }

    pub fn is_encrypted(self) -> bool {
        !matches!(
            self,
            LoadType::LoadFromFile | LoadType::LoadFromMemory | LoadType::LoadFromBinary
        )
    }
}

impl TryFrom<u8> for LoadType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LoadType::LoadFromFile),
            1 => Ok(LoadType::LoadFromMemory),
            2 => Ok(LoadType::LoadFromMemoryAndQuickDecrypt),
            3 => Ok(LoadType::LoadFromMemoryAndDecrypt),
            4 => Ok(LoadType::LoadFromBinary),
            5 => Ok(LoadType::LoadFromBinaryAndQuickDecrypt),
            6 => Ok(LoadType::LoadFromBinaryAndDecrypt),
            other => Err(other),
        }
    }
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A loadable asset and the resource that contains it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    asset_name: String,
    resource_name: ResourceName,
    dependency_asset_names: Vec<String>,
}

impl AssetInfo {
    pub fn new(
        asset_name: impl Into<String>,
        resource_name: ResourceName,
        dependency_asset_names: Vec<String>,
    ) -> Self {
        Self {
            asset_name: asset_name.into(),
            resource_name,
            dependency_asset_names,
        }
    }

    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    pub fn resource_name(&self) -> &ResourceName {
        &self.resource_name
    }

    /// Direct dependencies, in manifest order
    pub fn dependency_asset_names(&self) -> &[String] {
        &self.dependency_asset_names
    }
}

/// Storage metadata for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    resource_name: ResourceName,
    file_system_name: Option<String>,
    load_type: LoadType,
    length: u32,
    hash_code: i32,
    packed_length: u32,
    storage_in_read_only: bool,
    ready: bool,
}

impl ResourceInfo {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resource_name: ResourceName,
        file_system_name: Option<String>,
        load_type: LoadType,
        length: u32,
        hash_code: i32,
        packed_length: u32,
        storage_in_read_only: bool,
        ready: bool,
    ) -> Self {
        Self {
            resource_name,
            file_system_name,
            load_type,
            length,
            hash_code,
            packed_length,
            storage_in_read_only,
            ready,
        }
    }

    pub fn resource_name(&self) -> &ResourceName {
        &self.resource_name
    }

    /// Name of the container file system, `None` for standalone resources
    pub fn file_system_name(&self) -> Option<&str> {
        self.file_system_name.as_deref()
    }

    pub fn use_file_system(&self) -> bool {
        self.file_system_name.is_some()
    }

    pub fn load_type(&self) -> LoadType {
        self.load_type
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn hash_code(&self) -> i32 {
        self.hash_code
    }

    pub fn packed_length(&self) -> u32 {
        self.packed_length
    }

    pub fn storage_in_read_only(&self) -> bool {
        self.storage_in_read_only
    }

    pub fn ready(&self) -> bool {
        self.ready
    }
}

#[cfg(test)]
mod info_tests {
    use super::*;

    #[test]
    fn test_load_type_from_wire_value() {
        assert_eq!(LoadType::try_from(0), Ok(LoadType::LoadFromFile));
        assert_eq!(LoadType::try_from(6), Ok(LoadType::LoadFromBinaryAndDecrypt));
        assert_eq!(LoadType::try_from(7), Err(7));
    }

    #[test]
    fn test_load_type_classification() {
        assert!(LoadType::LoadFromBinary.is_load_from_binary());
        assert!(!LoadType::LoadFromMemory.is_load_from_binary());

        assert!(LoadType::LoadFromMemoryAndQuickDecrypt.is_encrypted());
        assert!(!LoadType::LoadFromFile.is_encrypted());
        assert!(!LoadType::LoadFromBinary.is_encrypted());
    }

    #[test]
    fn test_standalone_resource_has_no_file_system() {
        let info = ResourceInfo::new(
            ResourceName::new("R1", None, "bin"),
            None,
            LoadType::LoadFromFile,
            10,
            0,
            10,
            true,
            true,
        );
        assert!(!info.use_file_system());
        assert_eq!(info.file_system_name(), None);
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let info = ResourceInfo::new(
            ResourceName::new("ui/atlas", Some("hd"), "dat"),
            Some("fsA".to_string()),
            LoadType::LoadFromMemory,
            40,
            7,
            40,
            true,
            true,
        );
        let value = serde_json::to_value(&info).unwrap();

        assert_eq!(value["fileSystemName"], "fsA");
        assert_eq!(value["packedLength"], 40);
        assert_eq!(value["storageInReadOnly"], true);
        assert_eq!(value["resourceName"]["variant"], "hd");
        assert_eq!(value["loadType"], "LoadFromMemory");

        let asset = AssetInfo::new("A1", info.resource_name().clone(), vec!["A2".to_string()]);
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["assetName"], "A1");
        assert_eq!(value["dependencyAssetNames"][0], "A2");
    }
}

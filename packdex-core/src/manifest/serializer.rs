//! Package version list encodings
//!
//! Three encodings are understood: YAML, JSON and a binary form made of a
//! four byte magic header followed by a bincode body. The deserializer
//! sniffs the encoding unless one is pinned.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::PackageVersionList;
use crate::error::ManifestError;

/// Magic header of the binary encoding
pub const BINARY_MAGIC: &[u8; 4] = b"PVL\x01";

/// Turns raw manifest bytes into a package version list
///
/// Implementations borrow the bytes for the duration of the call only.
pub trait ManifestDeserializer: Send + Sync {
    fn deserialize(&self, bytes: &[u8]) -> Result<PackageVersionList, ManifestError>;
}

/// Supported encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    Yaml,
    Json,
    Binary,
}

impl ManifestFormat {
    /// Guess the encoding from a file extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(ManifestFormat::Yaml),
            "json" => Some(ManifestFormat::Json),
            "bin" | "dat" | "pvl" => Some(ManifestFormat::Binary),
            _ => None,
        }
    }

    /// Guess the encoding from the leading bytes
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(BINARY_MAGIC) {
            return ManifestFormat::Binary;
        }

        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => ManifestFormat::Json,
            _ => ManifestFormat::Yaml,
        }
    }

    pub fn encode(self, list: &PackageVersionList) -> Result<Vec<u8>, ManifestError> {
        match self {
            ManifestFormat::Yaml => Ok(serde_yaml_ng::to_string(list)?.into_bytes()),
            ManifestFormat::Json => Ok(serde_json::to_vec_pretty(list)?),
            ManifestFormat::Binary => {
                let mut bytes = BINARY_MAGIC.to_vec();
                bytes.extend(bincode::serialize(list)?);
                Ok(bytes)
            }
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<PackageVersionList, ManifestError> {
        match self {
            ManifestFormat::Yaml => Ok(serde_yaml_ng::from_reader(bytes)?),
            ManifestFormat::Json => Ok(serde_json::from_slice(bytes)?),
            ManifestFormat::Binary => match bytes.strip_prefix(BINARY_MAGIC.as_slice()) {
                Some(body) => Ok(bincode::deserialize(body)?),
                None => Ok(PackageVersionList::invalid()),
            },
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ManifestFormat::Yaml => "yaml",
            ManifestFormat::Json => "json",
            ManifestFormat::Binary => "binary",
        })
    }
}

impl FromStr for ManifestFormat {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(ManifestFormat::Yaml),
            "json" => Ok(ManifestFormat::Json),
            "binary" | "bin" => Ok(ManifestFormat::Binary),
            other => Err(ManifestError::UnknownFormat(other.to_string())),
        }
    }
}

/// Serde-backed deserializer for all supported encodings
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeManifestDeserializer {
    format: Option<ManifestFormat>,
}

impl SerdeManifestDeserializer {
    /// Sniff the encoding of every input
    pub fn new() -> Self {
        Self::default()
    }

    /// Always decode with one encoding
    pub fn with_format(format: ManifestFormat) -> Self {
        Self {
            format: Some(format),
        }
    }

    pub fn format(&self) -> Option<ManifestFormat> {
        self.format
    }
}

impl ManifestDeserializer for SerdeManifestDeserializer {
    fn deserialize(&self, bytes: &[u8]) -> Result<PackageVersionList, ManifestError> {
        let format = self.format.unwrap_or_else(|| ManifestFormat::sniff(bytes));
        tracing::trace!("Decoding {} byte package version list as {}", bytes.len(), format);
        format.decode(bytes)
    }
}

#[cfg(test)]
mod serializer_tests {
    use super::*;
    use crate::manifest::{Asset, FileSystem, Resource, ResourceGroup};

    fn sample_list() -> PackageVersionList {
        PackageVersionList::new(
            vec![Asset::new("A1", vec![1]), Asset::new("A2", vec![])],
            vec![Resource::new("R1", Some("hd"), "bin", 64, vec![0, 1])],
            vec![FileSystem::new("fsA", vec![0])],
            vec![ResourceGroup::new("base", vec![0])],
        )
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ManifestFormat::from_path("GameFrameworkList.yaml"),
            Some(ManifestFormat::Yaml)
        );
        assert_eq!(
            ManifestFormat::from_path("dir/list.JSON"),
            Some(ManifestFormat::Json)
        );
        assert_eq!(
            ManifestFormat::from_path("list.dat"),
            Some(ManifestFormat::Binary)
        );
        assert_eq!(ManifestFormat::from_path("list"), None);
        assert_eq!(ManifestFormat::from_path("list.txt"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(ManifestFormat::sniff(b"PVL\x01rest"), ManifestFormat::Binary);
        assert_eq!(ManifestFormat::sniff(b"  \n{\"assets\": []}"), ManifestFormat::Json);
        assert_eq!(ManifestFormat::sniff(b"assets: []"), ManifestFormat::Yaml);
        assert_eq!(ManifestFormat::sniff(b""), ManifestFormat::Yaml);
    }

    #[test]
    fn test_binary_encoding_keeps_variant_and_indexes() {
        let bytes = ManifestFormat::Binary.encode(&sample_list()).unwrap();
        assert!(bytes.starts_with(BINARY_MAGIC));

        let decoded = SerdeManifestDeserializer::new().deserialize(&bytes).unwrap();
        assert_eq!(decoded, sample_list());
    }

    #[test]
    fn test_binary_without_magic_is_invalid_not_an_error() {
        let list = SerdeManifestDeserializer::with_format(ManifestFormat::Binary)
            .deserialize(b"garbage")
            .unwrap();
        assert!(!list.is_valid());
    }

    #[test]
    fn test_truncated_binary_is_an_error() {
        let bytes = ManifestFormat::Binary.encode(&sample_list()).unwrap();
        let result = SerdeManifestDeserializer::new().deserialize(&bytes[..bytes.len() - 3]);
        assert!(matches!(result, Err(ManifestError::Binary(_))));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = SerdeManifestDeserializer::new().deserialize(b"{\"assets\": [");
        assert!(matches!(result, Err(ManifestError::Json(_))));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("YAML".parse::<ManifestFormat>().unwrap(), ManifestFormat::Yaml);
        assert_eq!("bin".parse::<ManifestFormat>().unwrap(), ManifestFormat::Binary);
        assert!("toml".parse::<ManifestFormat>().is_err());
    }
}

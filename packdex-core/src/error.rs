//! Error types for manifest decoding, catalog ingestion and the add-resources call

use thiserror::Error;

use crate::catalog::ResourceName;

/// Errors raised by a manifest deserializer or serializer
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("YAML package version list error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("JSON package version list error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary package version list error: {0}")]
    Binary(#[from] bincode::Error),

    #[error("Unrecognized package version list format '{0}'")]
    UnknownFormat(String),
}

/// Errors raised while building the catalog from a package version list
///
/// Everything except the two deserialization variants is an integrity
/// violation: the list decoded fine but its cross-references are broken.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Deserialize package version list failure")]
    Deserialize {
        #[source]
        source: ManifestError,
    },

    #[error("Package version list is invalid")]
    InvalidManifest,

    #[error("Asset '{name}' is declared more than once")]
    DuplicateAsset { name: String },

    #[error("Resource '{name}' is declared more than once")]
    DuplicateResource { name: ResourceName },

    #[error("{referrer} references asset index {index}, but the package version list has {len} assets")]
    AssetIndexOutOfRange {
        referrer: String,
        index: u32,
        len: usize,
    },

    #[error("Asset '{asset}' depends on asset index {index}, but the package version list has {len} assets")]
    DependencyIndexOutOfRange { asset: String, index: u32, len: usize },

    #[error("{referrer} references resource index {index}, but the package version list has {len} resources")]
    ResourceIndexOutOfRange {
        referrer: String,
        index: u32,
        len: usize,
    },

    #[error("Resource '{resource}' has unknown load type {value}")]
    UnknownLoadType { resource: ResourceName, value: u8 },
}

impl IngestError {
    pub fn is_integrity_violation(&self) -> bool {
        !matches!(
            self,
            IngestError::Deserialize { .. } | IngestError::InvalidManifest
        )
    }
}

/// Errors surfaced by an add-resources call
///
/// All of them are fatal to the call. The configuration variants are raised
/// before any I/O and never reach the completion callback; the rest are
/// raised only after the callback has been told the call failed.
#[derive(Error, Debug)]
pub enum AddResourcesError {
    #[error("Resource version path is invalid")]
    InvalidManifestUri,

    #[error("Byte loader is not configured")]
    MissingByteLoader,

    #[error("Package version list '{uri}' is invalid, error message is '{message}'")]
    Fetch { uri: String, message: String },

    #[error("Parse package version list '{uri}' failure: {source}")]
    Ingest {
        uri: String,
        #[source]
        source: IngestError,
    },
}

impl AddResourcesError {
    pub fn fetch(uri: impl Into<String>, message: &str) -> Self {
        let message = if message.is_empty() {
            "<Empty>".to_string()
        } else {
            message.to_string()
        };

        AddResourcesError::Fetch {
            uri: uri.into(),
            message,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AddResourcesError::InvalidManifestUri | AddResourcesError::MissingByteLoader
        )
    }

    /// The ingest failure behind this error, if the bytes arrived
    pub fn ingest_error(&self) -> Option<&IngestError> {
        match self {
            AddResourcesError::Ingest { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_fetch_error_renders_empty_message() {
        let err = AddResourcesError::fetch("file:///pvl.yaml", "");
        assert_eq!(
            err.to_string(),
            "Package version list 'file:///pvl.yaml' is invalid, error message is '<Empty>'"
        );

        let err = AddResourcesError::fetch("file:///pvl.yaml", "404");
        assert!(err.to_string().contains("'404'"));
    }

    #[test]
    fn test_integrity_classification() {
        assert!(!IngestError::InvalidManifest.is_integrity_violation());
        assert!(IngestError::DuplicateAsset {
            name: "A1".to_string()
        }
        .is_integrity_violation());
    }

    #[test]
    fn test_ingest_error_is_reachable_from_add_resources_error() {
        let err = AddResourcesError::Ingest {
            uri: "pvl.yaml".to_string(),
            source: IngestError::DuplicateResource {
                name: ResourceName::new("R1", None, "bin"),
            },
        };
        assert!(!err.is_configuration_error());
        assert!(matches!(
            err.ingest_error(),
            Some(IngestError::DuplicateResource { .. })
        ));
        assert!(err.to_string().contains("R1.bin"));
    }
}

//! Shared helpers for packdex integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use packdex_core::loader::{ByteLoader, LoadBytesFailure, LoadedBytes};
use packdex_core::manifest::{
    Asset, FileSystem, ManifestFormat, PackageVersionList, Resource, ResourceGroup,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Serves canned bytes or failures keyed by URI
#[derive(Default)]
pub struct StaticByteLoader {
    responses: HashMap<String, Result<Vec<u8>, String>>,
    requested: Mutex<Vec<String>>,
}

impl StaticByteLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(mut self, uri: &str, bytes: Vec<u8>) -> Self {
        self.responses.insert(uri.to_string(), Ok(bytes));
        self
    }

    pub fn with_list(self, uri: &str, list: &PackageVersionList) -> Self {
        let bytes = ManifestFormat::Yaml.encode(list).unwrap();
        self.with_bytes(uri, bytes)
    }

    pub fn with_failure(mut self, uri: &str, message: &str) -> Self {
        self.responses.insert(uri.to_string(), Err(message.to_string()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ByteLoader for StaticByteLoader {
    async fn load_bytes(&self, uri: &str) -> Result<LoadedBytes, LoadBytesFailure> {
        self.requested.lock().unwrap().push(uri.to_string());

        match self.responses.get(uri) {
            Some(Ok(bytes)) => Ok(LoadedBytes {
                bytes: bytes.clone(),
                duration: Duration::from_millis(1),
            }),
            Some(Err(message)) => Err(LoadBytesFailure::new(message.clone())),
            None => Err(LoadBytesFailure::new(format!("no response for {uri}"))),
        }
    }
}

/// Never completes
pub struct PendingByteLoader;

#[async_trait]
impl ByteLoader for PendingByteLoader {
    async fn load_bytes(&self, _uri: &str) -> Result<LoadedBytes, LoadBytesFailure> {
        std::future::pending().await
    }
}

/// Records every completion notification in order
#[derive(Clone, Default)]
pub struct CompletionLog {
    events: Arc<Mutex<Vec<(String, bool)>>>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self) -> impl Fn(&str, bool) + Send + Sync + 'static {
        let events = self.events.clone();
        move |token: &str, success: bool| {
            events.lock().unwrap().push((token.to_string(), success));
        }
    }

    pub fn events(&self) -> Vec<(String, bool)> {
        self.events.lock().unwrap().clone()
    }
}

/// The smallest interesting list: one file system, one resource, one asset
pub fn single_resource_list() -> PackageVersionList {
    PackageVersionList::new(
        vec![Asset::new("A1", vec![])],
        vec![Resource::new("R1", None, "bin", 128, vec![0])],
        vec![FileSystem::new("fsA", vec![0])],
        vec![],
    )
}

/// Mixed-variant list used by the variant and group tests
///
/// Resources: 0 `ui/main` (no variant), 1 `ui/atlas.hd`, 2 `ui/atlas.sd`,
/// 3 `audio/bgm` (no variant, standalone).
pub fn mixed_variant_list() -> PackageVersionList {
    PackageVersionList::new(
        vec![
            Asset::new("Assets/UI/Main.prefab", vec![1, 2]),
            Asset::new("Assets/UI/Atlas.png", vec![]),
            Asset::new("Assets/UI/Font.ttf", vec![]),
            Asset::new("Assets/UI/AtlasSD.png", vec![]),
            Asset::new("Assets/Audio/Bgm.ogg", vec![]),
        ],
        vec![
            Resource::new("ui/main", None, "dat", 1000, vec![0, 2]),
            Resource::new("ui/atlas", Some("hd"), "dat", 4000, vec![1]),
            Resource::new("ui/atlas", Some("sd"), "dat", 1500, vec![3]),
            Resource::new("audio/bgm", None, "dat", 700, vec![4]),
        ],
        vec![
            FileSystem::new("ui.fs", vec![0, 1, 2]),
        ],
        vec![
            ResourceGroup::new("ui", vec![0, 1, 2]),
            ResourceGroup::new("audio", vec![3]),
        ],
    )
}

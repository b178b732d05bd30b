//! Transient resource → file system lookup for one ingestion pass

use std::collections::HashMap;
use tracing::warn;

use super::{resource_at, VariantFilter};
use crate::catalog::ResourceName;
use crate::error::IngestError;
use crate::manifest::{FileSystem, Resource};

/// Maps accepted resources to the file system that contains them
///
/// Borrows names from the package version list, so it cannot outlive the
/// ingestion pass that built it.
#[derive(Debug, Default)]
pub struct FileSystemLocator<'m> {
    file_system_names: HashMap<ResourceName, &'m str>,
}

impl<'m> FileSystemLocator<'m> {
    /// Index every file system's resources that pass the filter
    ///
    /// A resource listed by more than one file system ends up with the last
    /// one listed.
    pub fn build(
        file_systems: &'m [FileSystem],
        resources: &'m [Resource],
        filter: &VariantFilter<'_>,
    ) -> Result<Self, IngestError> {
        let mut file_system_names = HashMap::new();

        for file_system in file_systems {
            for &resource_index in &file_system.resource_indexes {
                let resource = resource_at(resources, resource_index, || {
                    format!("File system '{}'", file_system.name)
                })?;

                if !filter.accepts(resource.variant.as_deref()) {
                    continue;
                }

                let resource_name = resource.resource_name();
                if let Some(previous) =
                    file_system_names.insert(resource_name, file_system.name.as_str())
                {
                    if previous != file_system.name {
                        warn!(
                            "Resource '{}' is listed by file systems '{}' and '{}', keeping '{}'",
                            resource.resource_name(),
                            previous,
                            file_system.name,
                            file_system.name
                        );
                    }
                }
            }
        }

        Ok(Self { file_system_names })
    }

    pub fn file_system_name(&self, resource_name: &ResourceName) -> Option<&'m str> {
        self.file_system_names.get(resource_name).copied()
    }

    pub fn len(&self) -> usize {
        self.file_system_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_system_names.is_empty()
    }
}

#[cfg(test)]
mod locator_tests {
    use super::*;

    fn resources() -> Vec<Resource> {
        vec![
            Resource::new("R0", None, "bin", 1, vec![]),
            Resource::new("R1", Some("hd"), "bin", 1, vec![]),
            Resource::new("R1", Some("sd"), "bin", 1, vec![]),
        ]
    }

    #[test]
    fn test_maps_accepted_resources_only() {
        let resources = resources();
        let file_systems = vec![
            FileSystem::new("fsA", vec![0, 1]),
            FileSystem::new("fsB", vec![2]),
        ];

        let filter = VariantFilter::new(Some("hd"));
        let locator = FileSystemLocator::build(&file_systems, &resources, &filter).unwrap();

        assert_eq!(locator.len(), 2);
        assert_eq!(
            locator.file_system_name(&ResourceName::new("R0", None, "bin")),
            Some("fsA")
        );
        assert_eq!(
            locator.file_system_name(&ResourceName::new("R1", Some("hd"), "bin")),
            Some("fsA")
        );
        assert_eq!(
            locator.file_system_name(&ResourceName::new("R1", Some("sd"), "bin")),
            None
        );
    }

    #[test]
    fn test_later_file_system_wins() {
        let resources = resources();
        let file_systems = vec![
            FileSystem::new("fsA", vec![0]),
            FileSystem::new("fsB", vec![0]),
        ];

        let locator =
            FileSystemLocator::build(&file_systems, &resources, &VariantFilter::default())
                .unwrap();

        assert_eq!(
            locator.file_system_name(&ResourceName::new("R0", None, "bin")),
            Some("fsB")
        );
    }

    #[test]
    fn test_out_of_range_index_is_an_integrity_error() {
        let resources = resources();
        let file_systems = vec![FileSystem::new("fsA", vec![3])];

        let err = FileSystemLocator::build(&file_systems, &resources, &VariantFilter::default())
            .unwrap_err();

        match err {
            IngestError::ResourceIndexOutOfRange {
                referrer,
                index,
                len,
            } => {
                assert_eq!(referrer, "File system 'fsA'");
                assert_eq!(index, 3);
                assert_eq!(len, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

//! Named resource groups with size accounting

use serde::Serialize;
use std::collections::BTreeSet;

use super::ResourceName;

/// A named subset of resources, used to plan partial downloads
///
/// The group with the empty name is the implicit group of every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    name: String,
    resource_names: BTreeSet<ResourceName>,
    total_length: u64,
    total_packed_length: u64,
}

impl ResourceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    /// Add a member and its sizes. A resource already in the group is not
    /// counted twice; returns whether it was newly added.
    pub fn add_resource(
        &mut self,
        resource_name: ResourceName,
        length: u32,
        packed_length: u32,
    ) -> bool {
        if !self.resource_names.insert(resource_name) {
            return false;
        }

        self.total_length += u64::from(length);
        self.total_packed_length += u64::from(packed_length);
        true
    }

    pub fn has_resource(&self, resource_name: &ResourceName) -> bool {
        self.resource_names.contains(resource_name)
    }

    /// Members, ordered by resource name
    pub fn resource_names(&self) -> impl Iterator<Item = &ResourceName> {
        self.resource_names.iter()
    }

    pub fn resource_count(&self) -> usize {
        self.resource_names.len()
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn total_packed_length(&self) -> u64 {
        self.total_packed_length
    }
}

#[cfg(test)]
mod group_tests {
    use super::*;

    #[test]
    fn test_sizes_accumulate_once_per_member() {
        let mut group = ResourceGroup::new("base");
        let r1 = ResourceName::new("R1", None, "bin");
        let r2 = ResourceName::new("R2", None, "bin");

        assert!(group.add_resource(r1.clone(), 100, 60));
        assert!(group.add_resource(r2, 50, 50));
        assert!(!group.add_resource(r1.clone(), 100, 60));

        assert_eq!(group.resource_count(), 2);
        assert_eq!(group.total_length(), 150);
        assert_eq!(group.total_packed_length(), 110);
        assert!(group.has_resource(&r1));
        assert!(!group.is_default());
    }

    #[test]
    fn test_default_group_has_empty_name() {
        assert!(ResourceGroup::new("").is_default());
    }
}

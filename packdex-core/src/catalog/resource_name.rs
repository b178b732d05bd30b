//! Composite resource identity

use serde::Serialize;
use std::fmt;

/// Identity of a resource: name, optional variant and extension.
///
/// Two resources are the same entity iff all three parts match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceName {
    name: String,
    variant: Option<String>,
    extension: String,
}

impl ResourceName {
    pub fn new(
        name: impl Into<String>,
        variant: Option<&str>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            variant: variant.map(str::to_owned),
            extension: extension.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `name.variant.extension`, or `name.extension` without a variant
    pub fn full_name(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{}.{}.{}", self.name, variant, self.extension),
            None => format!("{}.{}", self.name, self.extension),
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

//! Variant-based record filtering

/// Decides whether a record belongs to the variant being ingested
///
/// A record is included when it declares no variant, or when its variant
/// equals the current one. With no current variant only variant-less
/// records pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantFilter<'a> {
    current_variant: Option<&'a str>,
}

impl<'a> VariantFilter<'a> {
    pub fn new(current_variant: Option<&'a str>) -> Self {
        Self { current_variant }
    }

    pub fn current_variant(&self) -> Option<&'a str> {
        self.current_variant
    }

    pub fn accepts(&self, variant: Option<&str>) -> bool {
        match variant {
            None => true,
            Some(variant) => self.current_variant == Some(variant),
        }
    }
}

//! # Software Identification Tags
//!
//! An agency reports a SwID tag when software that uses one of its
//! checked-out keys is installed. Tags are keyed by their primary tag and
//! are immutable once reported.

use blossom_core::BlossomError;
use serde::{Deserialize, Serialize};

/// A reported software identification tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwId {
    /// Unique tag id.
    pub primary_tag: String,
    /// The ISO/IEC 19770-2 tag document.
    #[serde(default)]
    pub xml: String,
    /// License id the installation belongs to.
    #[serde(default)]
    pub asset: String,
    /// The checked-out key the installation uses.
    #[serde(default)]
    pub license: String,
    /// Reporting agency.
    #[serde(default)]
    pub agency: String,
}

impl SwId {
    /// Construct a tag.
    pub fn new(
        primary_tag: impl Into<String>,
        xml: impl Into<String>,
        asset: impl Into<String>,
        license: impl Into<String>,
        agency: impl Into<String>,
    ) -> Self {
        Self {
            primary_tag: primary_tag.into(),
            xml: xml.into(),
            asset: asset.into(),
            license: license.into(),
            agency: agency.into(),
        }
    }

    /// Reject tags missing an identifier.
    pub fn validate(&self) -> Result<(), BlossomError> {
        for (field, value) in [
            ("primary_tag", &self.primary_tag),
            ("asset", &self.asset),
            ("license", &self.license),
            ("agency", &self.agency),
        ] {
            if value.is_empty() {
                return Err(BlossomError::Validation(format!("swid {field} must be non-empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_identifiers() {
        let tag = SwId::new("tag-1", "<SoftwareIdentity/>", "l1", "k1", "a1");
        tag.validate().unwrap();

        let mut missing = tag.clone();
        missing.license.clear();
        let err = missing.validate().unwrap_err();
        assert!(err.to_string().contains("license"));
    }

    #[test]
    fn xml_may_be_empty() {
        SwId::new("tag-1", "", "l1", "k1", "a1").validate().unwrap();
    }

    #[test]
    fn json_field_names() {
        let value = serde_json::to_value(SwId::new("t", "x", "l1", "k1", "a1")).unwrap();
        assert_eq!(value["primary_tag"], "t");
        assert_eq!(value["asset"], "l1");
        assert_eq!(value["license"], "k1");
    }
}

//! Shared data types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Variant name of the control variant.
///
/// Nodes carrying this variant are shown while a test has no assignment.
pub const ORIGINAL_VARIANT: &str = "original";

/// A/B test settings attached to a content node (`abFirst` / `ab_first`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbFirst {
    #[serde(default, alias = "use_ab_testing")]
    pub use_ab_testing: bool,

    #[serde(default, alias = "ab_test_uuid")]
    pub ab_test_uuid: Option<String>,

    #[serde(default, alias = "ab_test_variant_name")]
    pub ab_test_variant_name: Option<String>,
}

impl AbFirst {
    /// Parse test settings from a raw attribute value.
    ///
    /// Anything that does not look like test settings yields `None`, so the
    /// node is treated as carrying no test.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn is_active(&self) -> bool {
        self.use_ab_testing
    }

    pub fn is_original(&self) -> bool {
        self.ab_test_variant_name.as_deref() == Some(ORIGINAL_VARIANT)
    }
}

/// One variant option declared by a test-bearing node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredTest {
    pub test_uuid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
}

impl DeclaredTest {
    pub fn new(test_uuid: impl Into<String>, variant_name: Option<String>) -> Self {
        Self {
            test_uuid: test_uuid.into(),
            variant_name,
        }
    }
}

/// Declared variants grouped by test uuid, in document order per test.
pub type DeclaredTests = BTreeMap<String, Vec<DeclaredTest>>;

/// The variant a visitor is assigned to for one test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assignment {
    pub test_uuid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,

    pub variant: String,

    pub participant: Value,
}

impl Assignment {
    pub fn new(test_uuid: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            test_uuid: test_uuid.into(),
            variant: variant.into(),
            ..Default::default()
        }
    }

    pub fn with_test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    pub fn with_participant(mut self, participant: Value) -> Self {
        self.participant = participant;
        self
    }
}

/// Record that a visitor was shown a given test variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exposure {
    pub ab_test_uuid: String,
    pub ab_test_name: Option<String>,
    pub variant: String,
    pub participant: Value,
}

impl From<&Assignment> for Exposure {
    fn from(assignment: &Assignment) -> Self {
        Self {
            ab_test_uuid: assignment.test_uuid.clone(),
            ab_test_name: assignment.test_name.clone(),
            variant: assignment.variant.clone(),
            participant: assignment.participant.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ab_first_camel_case() {
        let ab = AbFirst::from_value(&json!({
            "useAbTesting": true,
            "abTestUuid": "t1",
            "abTestVariantName": "original"
        }))
        .unwrap();
        assert!(ab.is_active());
        assert!(ab.is_original());
        assert_eq!(ab.ab_test_uuid.as_deref(), Some("t1"));
    }

    #[test]
    fn test_ab_first_snake_case_aliases() {
        let ab = AbFirst::from_value(&json!({
            "use_ab_testing": true,
            "ab_test_uuid": "t2",
            "ab_test_variant_name": "B"
        }))
        .unwrap();
        assert!(ab.is_active());
        assert!(!ab.is_original());
        assert_eq!(ab.ab_test_variant_name.as_deref(), Some("B"));
    }

    #[test]
    fn test_ab_first_missing_fields_default() {
        let ab = AbFirst::from_value(&json!({})).unwrap();
        assert!(!ab.is_active());
        assert!(ab.ab_test_uuid.is_none());
    }

    #[test]
    fn test_ab_first_rejects_non_object() {
        assert!(AbFirst::from_value(&json!("yes")).is_none());
        assert!(AbFirst::from_value(&json!(null)).is_none());
        assert!(AbFirst::from_value(&json!({"useAbTesting": "maybe"})).is_none());
    }

    #[test]
    fn test_declared_test_serializes_camel_case() {
        let test = DeclaredTest::new("t1", Some("A".to_string()));
        let json = serde_json::to_value(&test).unwrap();
        assert_eq!(json, json!({"testUuid": "t1", "variantName": "A"}));

        let no_variant = serde_json::to_value(DeclaredTest::new("t1", None)).unwrap();
        assert!(no_variant.get("variantName").is_none());
    }

    #[test]
    fn test_assignment_tolerates_missing_fields() {
        let assignment: Assignment =
            serde_json::from_value(json!({"testUuid": "t1", "variant": "B"})).unwrap();
        assert_eq!(assignment.test_uuid, "t1");
        assert_eq!(assignment.variant, "B");
        assert!(assignment.test_name.is_none());
        assert!(assignment.participant.is_null());
    }

    #[test]
    fn test_exposure_from_assignment() {
        let assignment = Assignment::new("t1", "B")
            .with_test_name("Hero copy")
            .with_participant(json!(true));
        let exposure = Exposure::from(&assignment);
        let json = serde_json::to_value(&exposure).unwrap();
        assert_eq!(json["abTestUuid"], "t1");
        assert_eq!(json["abTestName"], "Hero copy");
        assert_eq!(json["variant"], "B");
        assert_eq!(json["participant"], true);
    }
}

//! Response decoration.
//!
//! Bookkeeping goes under `decorated.abTests` on the page document:
//! `cookieHash`, `testsWithPageAsGoal` and `userAssignments`. Existing
//! `decorated` data is merged into, never replaced.

use serde_json::{Map, Value, json};
use tracing::warn;

use crate::types::Exposure;

/// Inputs for [`decorate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoration<'a> {
    /// Cookie hash returned by the assignment service.
    pub cookie_hash: Option<&'a str>,
    /// Cookie the visitor already sent, if any.
    pub existing_cookie: Option<&'a str>,
    /// Where the decoration was produced, recorded next to the cookie hash.
    pub origin: &'a str,
    pub tests_with_page_as_goal: &'a [Value],
    pub exposures: &'a [Exposure],
}

/// Attach A/B test bookkeeping to `page`.
///
/// `cookieHash` is only set for visitors without a cookie, and only when the
/// service handed out a hash. `testsWithPageAsGoal` is only set when
/// non-empty. Both overwrite earlier values; exposures are appended to
/// `userAssignments`.
pub fn decorate(page: &mut Value, decoration: &Decoration<'_>) {
    let Some(root) = page.as_object_mut() else {
        warn!("Page data is not an object, skipping A/B test decoration");
        return;
    };
    let Some(decorated) = object_entry(root, "decorated") else {
        return;
    };
    let Some(ab_tests) = object_entry(decorated, "abTests") else {
        return;
    };

    let has_cookie = decoration.existing_cookie.is_some_and(|c| !c.is_empty());
    if let Some(hash) = decoration.cookie_hash.filter(|h| !h.is_empty()) {
        if !has_cookie {
            ab_tests.insert(
                "cookieHash".to_string(),
                json!({"value": hash, "origin": decoration.origin}),
            );
        }
    }

    if !decoration.tests_with_page_as_goal.is_empty() {
        ab_tests.insert(
            "testsWithPageAsGoal".to_string(),
            Value::Array(decoration.tests_with_page_as_goal.to_vec()),
        );
    }

    if !decoration.exposures.is_empty() {
        let entry = ab_tests
            .entry("userAssignments")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(list) = entry {
            list.extend(decoration.exposures.iter().map(exposure_value));
        }
    }
}

fn exposure_value(exposure: &Exposure) -> Value {
    json!({
        "abTestUuid": exposure.ab_test_uuid,
        "abTestName": exposure.ab_test_name,
        "variant": exposure.variant,
        "participant": exposure.participant,
    })
}

/// The object stored under `key`, created (or replacing a non-object) as needed.
fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Map<String, Value>> {
    let slot = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
}

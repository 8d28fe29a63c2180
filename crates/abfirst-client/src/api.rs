//! Assignment service response types.
//!
//! Fields decode independently: a field with an unexpected shape falls back
//! to its default, and a malformed element is dropped from its list, so one
//! bad entry never discards the rest of a response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use abfirst_core::Assignment;

/// `POST /api/assignments` response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AssignmentsResponse {
    #[serde(deserialize_with = "lenient")]
    pub data: AssignmentsData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AssignmentsData {
    #[serde(deserialize_with = "lenient_list")]
    pub test_assignments: Vec<Assignment>,
    #[serde(deserialize_with = "lenient")]
    pub cookie_hash: Option<String>,
}

/// `GET /api/assignments/goal-page/...` response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GoalPageResponse {
    #[serde(deserialize_with = "lenient")]
    pub data: GoalPageTests,
}

/// Tests that use the current page as their goal.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalPageTests {
    /// Goal tests, passed through to the rendering layer untouched.
    #[serde(deserialize_with = "lenient_list")]
    pub tests_with_page_as_goal: Vec<Value>,

    /// Assignments for those tests.
    #[serde(rename = "testsWithPageAsGoalAssignments", deserialize_with = "lenient_list")]
    pub assignments: Vec<Assignment>,
}

/// Decode a response body, treating an unexpected shape as empty.
pub(crate) fn decode<T>(url: &str, value: Value) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(url, error = %e, "Unexpected response shape from assignment service");
            T::default()
        }
    }
}

/// Decode a field, falling back to its default on null or a bad shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring malformed field in assignment service response");
        T::default()
    }))
}

/// Decode a list element by element, skipping elements that do not decode.
/// Anything other than an array decodes as an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!(found = %other, "Expected a list in assignment service response");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(error = %e, "Skipping malformed entry in assignment service response");
                None
            }
        })
        .collect())
}

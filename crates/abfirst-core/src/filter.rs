//! Variant filtering.
//!
//! Only the top-level sequence of each format is filtered, and only nodes of
//! the format's test-bearing container type are candidates for removal.

use serde_json::Value;
use tracing::debug;

use crate::content::{ContentFormat, formats};
use crate::types::{Assignment, Exposure};

/// Outcome for one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Keep the node; it carries no test decision.
    Keep,
    /// Keep the node; the visitor is assigned to its variant.
    Exposed(Exposure),
    /// Remove the node.
    Drop,
}

impl Decision {
    pub fn is_kept(&self) -> bool {
        !matches!(self, Decision::Drop)
    }
}

/// First assignment for `test_uuid`.
///
/// Direct assignments are listed before goal-page assignments, so a direct
/// assignment wins when the service returns both for one test.
pub fn find_assignment<'a>(assignments: &'a [Assignment], test_uuid: &str) -> Option<&'a Assignment> {
    assignments.iter().find(|a| a.test_uuid == test_uuid)
}

/// Decide whether `node` survives for a visitor with `assignments`.
pub fn decide<F>(format: &F, node: &Value, assignments: &[Assignment]) -> Decision
where
    F: ContentFormat + ?Sized,
{
    if format.type_name_of(node) != Some(format.filtered_type_name()) {
        return Decision::Keep;
    }
    let Some(ab) = format.ab_first_of(node) else {
        return Decision::Keep;
    };
    if !ab.is_active() {
        return Decision::Keep;
    }

    let assignment = ab
        .ab_test_uuid
        .as_deref()
        .and_then(|uuid| find_assignment(assignments, uuid));

    match assignment {
        Some(a) if Some(a.variant.as_str()) == ab.ab_test_variant_name.as_deref() => {
            Decision::Exposed(Exposure::from(a))
        }
        // No assignment yet, e.g. the test is not live: show the control only.
        None if ab.is_original() => Decision::Keep,
        _ => Decision::Drop,
    }
}

/// Filter a node sequence in place and return the exposures it produced.
pub fn filter_nodes<F>(format: &F, nodes: &mut Vec<Value>, assignments: &[Assignment]) -> Vec<Exposure>
where
    F: ContentFormat + ?Sized,
{
    let mut exposures = Vec::new();
    let before = nodes.len();

    nodes.retain(|node| match decide(format, node, assignments) {
        Decision::Keep => true,
        Decision::Exposed(exposure) => {
            exposures.push(exposure);
            true
        }
        Decision::Drop => false,
    });

    debug!(
        format = format.name(),
        dropped = before - nodes.len(),
        exposed = exposures.len(),
        "Filtered content variants"
    );
    exposures
}

/// Filter every format present on a page document.
///
/// Returns one exposure per kept node that matched the visitor's assignment,
/// in document order.
pub fn filter_content(page: &mut Value, assignments: &[Assignment]) -> Vec<Exposure> {
    let mut exposures = Vec::new();
    for format in formats() {
        if let Some(Value::Array(nodes)) = page.get_mut(format.root_key()) {
            exposures.extend(filter_nodes(format, nodes, assignments));
        }
    }
    exposures
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;

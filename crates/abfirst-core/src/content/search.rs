//! Depth-first search over a content tree.

use serde_json::Value;

use super::ContentFormat;

/// Collect every node matching `predicate`, in document order.
///
/// Traversal is pre-order: a node is tested before its children, and the
/// children of a matching node are searched too, so a test container nested
/// inside another test container is still found. Input that is missing or not
/// a sequence yields an empty result.
pub fn search<'a, F, P>(format: &F, nodes: Option<&'a Value>, predicate: P) -> Vec<&'a Value>
where
    F: ContentFormat + ?Sized,
    P: Fn(&Value) -> bool,
{
    let mut found = Vec::new();
    if let Some(nodes) = nodes {
        collect(format, nodes, &predicate, &mut found);
    }
    found
}

fn collect<'a, F, P>(format: &F, nodes: &'a Value, predicate: &P, found: &mut Vec<&'a Value>)
where
    F: ContentFormat + ?Sized,
    P: Fn(&Value) -> bool,
{
    let Some(items) = nodes.as_array() else {
        return;
    };

    for item in items {
        if predicate(item) {
            found.push(item);
        }
        if let Some(children) = format.children_of(item) {
            collect(format, children, predicate, found);
        }
    }
}

//! Test declaration extraction.

use serde_json::Value;
use tracing::debug;

use crate::content::{BlockTree, ContentFormat, ModuleTree, search};
use crate::types::{DeclaredTest, DeclaredTests};

/// Collect the tests declared by nodes whose type name is in `type_names`.
///
/// Each active test-bearing node contributes one [`DeclaredTest`] under its
/// test uuid. Variants keep document order and duplicates are kept. Nodes
/// that enable testing without naming a test are skipped.
pub fn extract<F>(format: &F, nodes: Option<&Value>, type_names: &[&str]) -> DeclaredTests
where
    F: ContentFormat + ?Sized,
{
    let matches = search(format, nodes, |node| {
        format
            .type_name_of(node)
            .is_some_and(|name| type_names.contains(&name))
    });

    let mut tests = DeclaredTests::new();
    for node in matches {
        let Some(ab) = format.ab_first_of(node) else {
            continue;
        };
        if !ab.is_active() {
            continue;
        }
        let Some(uuid) = ab.ab_test_uuid else {
            debug!(format = format.name(), "Test-bearing node has no test uuid, skipping");
            continue;
        };
        tests
            .entry(uuid.clone())
            .or_default()
            .push(DeclaredTest::new(uuid, ab.ab_test_variant_name));
    }
    tests
}

/// Extract from a page document using the format's default type names plus
/// `extra_type_names`.
pub fn extract_from_page<F>(format: &F, page: &Value, extra_type_names: &[String]) -> DeclaredTests
where
    F: ContentFormat + ?Sized,
{
    let mut type_names: Vec<&str> = format.default_type_names().to_vec();
    type_names.extend(extra_type_names.iter().map(String::as_str));
    extract(format, format.nodes_of(page), &type_names)
}

/// Extract from whichever format the page uses.
///
/// Block-tree content is tried first. Module content is only consulted when
/// the block tree declares no tests; results are never merged.
pub fn extract_from_content(page: &Value, extra_type_names: &[String]) -> DeclaredTests {
    let tests = extract_from_page(&BlockTree, page, extra_type_names);
    if !tests.is_empty() {
        debug!(tests = tests.len(), "Found tests in block-tree content");
        return tests;
    }

    let tests = extract_from_page(&ModuleTree, page, extra_type_names);
    debug!(tests = tests.len(), "Searched module content for tests");
    tests
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(uuid: &str, variant: &str) -> Value {
        json!({
            "blockName": "next24hr/section",
            "abFirst": {"useAbTesting": true, "abTestUuid": uuid, "abTestVariantName": variant}
        })
    }

    fn row(uuid: &str, variant: &str) -> Value {
        json!({
            "name": "vc_row",
            "attributes": {
                "abFirst": {"useAbTesting": true, "abTestUuid": uuid, "abTestVariantName": variant}
            }
        })
    }

    #[test]
    fn test_groups_variants_in_document_order() {
        let page = json!({"blocks": [section("t1", "A"), section("t1", "B")]});
        let tests = extract_from_page(&BlockTree, &page, &[]);
        assert_eq!(tests.len(), 1);
        assert_eq!(
            tests["t1"],
            vec![
                DeclaredTest::new("t1", Some("A".to_string())),
                DeclaredTest::new("t1", Some("B".to_string())),
            ]
        );
    }

    #[test]
    fn test_keeps_duplicates() {
        let page = json!({"blocks": [section("t1", "A"), section("t1", "A")]});
        let tests = extract_from_page(&BlockTree, &page, &[]);
        assert_eq!(tests["t1"].len(), 2);
    }

    #[test]
    fn test_skips_inactive_and_untyped_nodes() {
        let page = json!({"blocks": [
            {"blockName": "next24hr/section",
             "abFirst": {"useAbTesting": false, "abTestUuid": "off", "abTestVariantName": "A"}},
            {"blockName": "core/paragraph",
             "abFirst": {"useAbTesting": true, "abTestUuid": "para", "abTestVariantName": "A"}},
            {"blockName": "next24hr/section"},
            {"blockName": "next24hr/section", "abFirst": {"useAbTesting": true}}
        ]});
        assert!(extract_from_page(&BlockTree, &page, &[]).is_empty());
    }

    #[test]
    fn test_extra_type_names() {
        let page = json!({"blocks": [
            {"blockName": "core/paragraph",
             "abFirst": {"useAbTesting": true, "abTestUuid": "para", "abTestVariantName": "A"}}
        ]});
        let tests = extract_from_page(&BlockTree, &page, &["core/paragraph".to_string()]);
        assert!(tests.contains_key("para"));
    }

    #[test]
    fn test_finds_nested_declarations() {
        let page = json!({"vc_content": [
            {"name": "vc_row", "children": [
                {"name": "vc_column", "children": [
                    {"name": "button", "attributes": {
                        "abFirst": {"useAbTesting": true, "abTestUuid": "btn", "abTestVariantName": "B"}
                    }}
                ]}
            ]}
        ]});
        let tests = extract_from_page(&ModuleTree, &page, &[]);
        assert_eq!(tests["btn"][0].variant_name.as_deref(), Some("B"));
    }

    #[test]
    fn test_content_prefers_block_tree() {
        let page = json!({
            "blocks": [section("blocks-test", "A")],
            "vc_content": [row("vc-test", "A")]
        });
        let tests = extract_from_content(&page, &[]);
        assert!(tests.contains_key("blocks-test"));
        assert!(!tests.contains_key("vc-test"));
    }

    #[test]
    fn test_content_falls_back_to_modules() {
        let page = json!({
            "blocks": [{"blockName": "core/paragraph"}],
            "vc_content": [row("vc-test", "original"), row("vc-test", "B")]
        });
        let tests = extract_from_content(&page, &[]);
        assert_eq!(tests["vc-test"].len(), 2);
    }

    #[test]
    fn test_content_without_tests() {
        assert!(extract_from_content(&json!({"title": "Home"}), &[]).is_empty());
        assert!(extract_from_content(&json!(null), &[]).is_empty());
    }
}

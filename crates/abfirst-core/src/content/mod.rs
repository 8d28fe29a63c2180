//! Authoring-format adapters and tree search.
//!
//! Page content comes in two shapes. Block-tree documents keep their nodes
//! under `blocks`, name them with `blockName` and carry test settings on the
//! node itself. Module documents keep their nodes under `vc_content`, name
//! them with `name` and carry test settings under `attributes`. The
//! [`ContentFormat`] trait hides those differences so extraction, search and
//! filtering are written once.

mod search;

pub use search::search;

use serde_json::Value;

use crate::types::AbFirst;

/// How to read one authoring format.
pub trait ContentFormat: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Key of the top-level node sequence on a page document.
    fn root_key(&self) -> &'static str;

    /// Node type names searched for test declarations.
    fn default_type_names(&self) -> &'static [&'static str];

    /// Type name of the test-bearing container whose siblings are filtered.
    fn filtered_type_name(&self) -> &'static str;

    /// The node's type name, if it has one.
    fn type_name_of<'a>(&self, node: &'a Value) -> Option<&'a str>;

    /// The object holding the node's test settings.
    fn attributes_of<'a>(&self, node: &'a Value) -> Option<&'a Value>;

    /// The node's child sequence. `blocks` wins over `children` when both exist.
    fn children_of<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        node.get("blocks")
            .filter(|v| !v.is_null())
            .or_else(|| node.get("children"))
    }

    /// Parsed test settings for a node.
    fn ab_first_of(&self, node: &Value) -> Option<AbFirst> {
        let attributes = self.attributes_of(node)?;
        let raw = attributes
            .get("abFirst")
            .or_else(|| attributes.get("ab_first"))?;
        AbFirst::from_value(raw)
    }

    /// The top-level node sequence of a page document.
    fn nodes_of<'a>(&self, page: &'a Value) -> Option<&'a Value> {
        page.get(self.root_key())
    }
}

/// Block-tree content (`blocks`, `blockName`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockTree;

impl ContentFormat for BlockTree {
    fn name(&self) -> &'static str {
        "block-tree"
    }

    fn root_key(&self) -> &'static str {
        "blocks"
    }

    fn default_type_names(&self) -> &'static [&'static str] {
        &["next24hr/section", "button"]
    }

    fn filtered_type_name(&self) -> &'static str {
        "next24hr/section"
    }

    fn type_name_of<'a>(&self, node: &'a Value) -> Option<&'a str> {
        node.get("blockName").and_then(Value::as_str)
    }

    fn attributes_of<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        Some(node)
    }
}

/// Module/row content (`vc_content`, `name`, `attributes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleTree;

impl ContentFormat for ModuleTree {
    fn name(&self) -> &'static str {
        "module-tree"
    }

    fn root_key(&self) -> &'static str {
        "vc_content"
    }

    fn default_type_names(&self) -> &'static [&'static str] {
        &["vc_row", "button"]
    }

    fn filtered_type_name(&self) -> &'static str {
        "vc_row"
    }

    fn type_name_of<'a>(&self, node: &'a Value) -> Option<&'a str> {
        node.get("name").and_then(Value::as_str)
    }

    fn attributes_of<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        node.get("attributes")
    }
}

/// Every supported format, in the order they are tried.
pub fn formats() -> [&'static dyn ContentFormat; 2] {
    [&BlockTree, &ModuleTree]
}

//! # AB First Core
//!
//! Synchronous domain logic for A/B tests embedded in page-authoring content.
//!
//! - [`content`] - Authoring-format adapters and the generic tree search
//! - [`extract`] - Collects the tests declared on a page
//! - [`filter`] - Drops the variants a visitor is not assigned to
//! - [`decorate`] - Attaches bookkeeping for the rendering layer
//!
//! Nothing in this crate performs I/O. Resolving assignments against the
//! remote service lives in `abfirst-client`.

pub mod content;
pub mod decorate;
pub mod extract;
pub mod filter;
pub mod types;

pub use content::{BlockTree, ContentFormat, ModuleTree, search};
pub use decorate::{Decoration, decorate};
pub use extract::{extract, extract_from_content, extract_from_page};
pub use filter::{Decision, decide, filter_content, filter_nodes, find_assignment};
pub use types::{AbFirst, Assignment, DeclaredTest, DeclaredTests, Exposure, ORIGINAL_VARIANT};

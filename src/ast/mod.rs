//! Syntax node model.
//!
//! An arena-backed, parent-linked JavaScript syntax tree. The analysis only
//! ever reads it: nodes are constructed once per source unit (by the bundled
//! tree-sitter lowering or by a host embedding the library), sealed by the
//! builder, and discarded after the pass.

mod node;
mod tree;

pub use node::{AssignOp, DeclarationKind, LiteralValue, NodeKind, UpdateOp};
pub use tree::{Ancestors, NodeId, SourceTree, TreeBuilder};

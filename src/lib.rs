//! Mutation safety analysis for JavaScript sources.
//!
//! The crate is split into a pure analysis core and a thin front end. The
//! [`ast`] module defines a parent-linked arena tree; [`analysis`] hosts the
//! scope walker, binding classifier, and exemption detectors; [`rules`]
//! turns their verdicts into violations. With the `tree-sitter` feature the
//! [`parser`] module lowers real JavaScript into the tree model and [`cli`]
//! drives whole-directory runs.

pub mod analysis;
pub mod ast;
pub mod config;
pub mod report;
pub mod rules;

#[cfg(feature = "tree-sitter")]
pub mod cli;
#[cfg(feature = "tree-sitter")]
pub mod parser;

pub use ast::{NodeId, NodeKind, SourceTree, TreeBuilder};
pub use config::RuleConfig;
pub use rules::{check_tree, RuleKind, Violation};

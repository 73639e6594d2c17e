//! Mutation rules.
//!
//! Each rule is a thin scan over the tree that defers ownership and
//! exemption decisions to [`crate::analysis`].

mod types;

pub mod no_mutating_functions;
pub mod no_mutating_methods;
pub mod no_mutation;

pub use types::{RuleKind, Violation};

use crate::ast::SourceTree;
use crate::config::RuleConfig;

/// Run all rules over one tree. Violations come back ordered by line.
pub fn check_tree(tree: &SourceTree, config: &RuleConfig) -> Vec<Violation> {
    let mut violations = no_mutation::check(tree, config);
    violations.extend(no_mutating_methods::check(tree, config));
    violations.extend(no_mutating_functions::check(tree, config));
    violations.sort_by_key(|v| v.line);
    violations
}

//! Binding-safety analysis core.
//!
//! Pure predicates over a parent-linked syntax tree: the scope walker and
//! binding classifier decide whether a mutation target is locally owned, and
//! the exemption detectors recognize the structural carve-outs (reducer
//! accumulators, for-loop afterthoughts, prototype and export assignment,
//! user-declared exceptions). Nothing here performs I/O, mutates the tree,
//! or reports diagnostics; the rules in [`crate::rules`] consume the
//! verdicts.

mod exempt;
mod scope;

pub use exempt::{
    compile_exceptions, is_export_surface, is_for_loop_update_clause, is_prototype_assignment,
    is_within_exempted_reducer, matches_exception_template, TargetPattern,
};
pub use scope::{
    is_bound_to_local_scope, is_fresh_initializer, is_owned_reference, is_scoped_function,
    is_scoped_let_assignment,
};

pub(crate) use scope::is_initializer_call;

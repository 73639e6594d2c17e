//! Structural exemption detectors.
//!
//! Independent matchers consulted by the rules before reporting: the
//! reducer-accumulator carve-out, the for-loop afterthought clause, the
//! prototype and CommonJS export assignment shapes, and user-declared
//! exception templates.

use crate::ast::{NodeId, NodeKind, SourceTree};
use crate::config::RuleConfig;

use super::scope::{is_block_boundary, is_scoped_function};

/// Reserved CommonJS export-surface identifier.
const EXPORTS: &str = "exports";
/// Object half of the `module.exports` member chain.
const MODULE: &str = "module";
/// Property naming a constructor's prototype object.
const PROTOTYPE: &str = "prototype";

/// Whether `node` sits inside a callback passed to a recognized reducer.
///
/// Ascends to the nearest block boundary; the exemption holds when that
/// boundary is a function literal passed as an argument to a call whose
/// callee name (or callee property name) is in `reducers`. Mutating the
/// accumulator of a fold is confined to the fold's own lifecycle, so it is
/// not treated as sharing.
pub fn is_within_exempted_reducer(tree: &SourceTree, reducers: &[String], node: NodeId) -> bool {
    let boundary = block_ancestor(tree, node);
    if !tree.kind(boundary).is_function_literal() {
        return false;
    }

    let Some(call) = tree.parent(boundary) else {
        return false;
    };
    let NodeKind::CallExpression { callee, arguments } = tree.kind(call) else {
        return false;
    };
    if !arguments.contains(&boundary) {
        return false;
    }

    let name = match tree.kind(*callee) {
        NodeKind::Identifier { name } => Some(name.as_str()),
        NodeKind::PropertyAccess { property, .. } => tree.identifier_name(*property),
        _ => None,
    };
    name.is_some_and(|n| reducers.iter().any(|r| r == n))
}

fn block_ancestor(tree: &SourceTree, node: NodeId) -> NodeId {
    if is_block_boundary(tree.kind(node)) {
        return node;
    }
    match tree.parent(node) {
        Some(parent) => block_ancestor(tree, parent),
        None => node,
    }
}

/// Whether `node` is exactly the update clause of an enclosing `for`
/// header, or an operand of a comma sequence that is (recursively) the
/// update clause. An identical-looking expression in the loop test or body
/// does not qualify.
pub fn is_for_loop_update_clause(tree: &SourceTree, node: NodeId) -> bool {
    let Some(parent) = tree.parent(node) else {
        return false;
    };
    match tree.kind(parent) {
        NodeKind::ForStatement { update, .. } => *update == Some(node),
        NodeKind::SequenceExpression { .. } => is_for_loop_update_clause(tree, parent),
        _ => false,
    }
}

/// Whether `assign` writes to `<identifier>.prototype.<member>` where the
/// identifier resolves to a locally declared function or class.
pub fn is_prototype_assignment(tree: &SourceTree, assign: NodeId) -> bool {
    let NodeKind::AssignmentExpression { left, .. } = tree.kind(assign) else {
        return false;
    };
    is_prototype_member(tree, *left) && is_scoped_function(tree, *left, tree.parent(assign))
}

fn is_prototype_member(tree: &SourceTree, target: NodeId) -> bool {
    let NodeKind::PropertyAccess { object, .. } = tree.kind(target) else {
        return false;
    };
    let NodeKind::PropertyAccess {
        object: root,
        property,
        ..
    } = tree.kind(*object)
    else {
        return false;
    };
    tree.identifier_name(*property) == Some(PROTOTYPE)
        && matches!(tree.kind(*root), NodeKind::Identifier { .. })
}

/// Whether `node` is the CommonJS export surface: the `exports` identifier,
/// the `module.exports` chain, or any member chain rooted in either.
///
/// This is category detection, independent of the `commonjs` opt-in flag:
/// the rule uses it both to exempt (flag on) and to pick the violation kind
/// (flag off).
pub fn is_export_surface(tree: &SourceTree, node: NodeId) -> bool {
    if tree.identifier_name(node) == Some(EXPORTS) || is_module_exports(tree, node) {
        return true;
    }
    match tree.kind(node) {
        NodeKind::PropertyAccess { object, .. } => is_export_surface(tree, *object),
        _ => false,
    }
}

fn is_module_exports(tree: &SourceTree, node: NodeId) -> bool {
    let NodeKind::PropertyAccess {
        object,
        property,
        computed: false,
    } = tree.kind(node)
    else {
        return false;
    };
    tree.identifier_name(*object) == Some(MODULE)
        && tree.identifier_name(*property) == Some(EXPORTS)
}

/// A compiled exception pattern, matched structurally against a member
/// access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPattern {
    /// Member access constrained by object and/or property name. At least
    /// one constraint is present; templates with neither never match.
    Member {
        object: Option<String>,
        property: Option<String>,
    },
    /// Any member access on `this`.
    ThisMember,
}

impl TargetPattern {
    fn matches(&self, tree: &SourceTree, node: NodeId) -> bool {
        let NodeKind::PropertyAccess {
            object, property, ..
        } = tree.kind(node)
        else {
            return false;
        };
        match self {
            TargetPattern::Member {
                object: want_object,
                property: want_property,
            } => {
                if want_object.is_none() && want_property.is_none() {
                    return false;
                }
                let object_ok = want_object.as_ref().map_or(true, |want| {
                    tree.identifier_name(*object) == Some(want.as_str())
                });
                let property_ok = want_property.as_ref().map_or(true, |want| {
                    tree.identifier_name(*property) == Some(want.as_str())
                });
                object_ok && property_ok
            }
            TargetPattern::ThisMember => {
                matches!(tree.kind(*object), NodeKind::ThisExpression)
            }
        }
    }
}

/// Compile the configured exception templates, adding the `this.*` pattern
/// when `allow_this` is set.
pub fn compile_exceptions(config: &RuleConfig) -> Vec<TargetPattern> {
    let mut patterns: Vec<TargetPattern> = config
        .exceptions
        .iter()
        .map(|t| TargetPattern::Member {
            object: t.object.clone(),
            property: t.property.clone(),
        })
        .collect();
    if config.allow_this {
        patterns.push(TargetPattern::ThisMember);
    }
    patterns
}

/// Whether any pattern matches the member chain `node` or, recursively, any
/// enclosing member-access prefix of it (`module.exports[foo].bar` matches a
/// `{module, exports}` template through its prefix).
pub fn matches_exception_template(
    tree: &SourceTree,
    patterns: &[TargetPattern],
    node: NodeId,
) -> bool {
    let NodeKind::PropertyAccess { object, .. } = tree.kind(node) else {
        return false;
    };
    patterns.iter().any(|p| p.matches(tree, node))
        || (matches!(tree.kind(*object), NodeKind::PropertyAccess { .. })
            && matches_exception_template(tree, patterns, *object))
}

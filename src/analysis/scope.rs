//! Scope walker and binding classifier.
//!
//! The two central predicates live together because they are mutually
//! recursive: a name is locally bound when some enclosing statement list
//! declares it with a fresh initializer, and a reference initializer is fresh
//! when its root name is itself locally bound. Termination rests on the
//! acyclic parent chain the tree builder guarantees; recursion depth is
//! bounded by source nesting depth.
//!
//! Every predicate is total and fails toward the conservative verdict: an
//! absent node, absent initializer, or unrecognized construct is never fresh,
//! never bound, never exempt.

use crate::ast::{NodeId, NodeKind, SourceTree};
use crate::config::RuleConfig;

/// Constructor that returns its argument instead of allocating: `new
/// Object(x)` is `x`. Every other `new` is treated as an allocation point.
const ALIASING_CONSTRUCTOR: &str = "Object";

/// Node kinds beyond which a variable or function lookup must not ascend.
pub(crate) fn is_block_boundary(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Program { .. }
            | NodeKind::FunctionDeclaration { .. }
            | NodeKind::ClassDeclaration { .. }
            | NodeKind::FunctionExpression { .. }
            | NodeKind::ArrowFunction { .. }
    )
}

/// Node kinds beyond which the `let` reassignment lookup must not ascend.
/// Narrower than [`is_block_boundary`]: a `let` stays reassignable from
/// inside function-expression and arrow bodies that close over it.
fn is_variable_scope_boundary(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Program { .. }
            | NodeKind::FunctionDeclaration { .. }
            | NodeKind::ClassDeclaration { .. }
    )
}

/// Whether `name` resolves to a locally owned binding, searching outward
/// from `start`.
///
/// Each enclosing statement list is scanned for a declaration that binds
/// `name` (through destructuring) with a freshly-owned initializer. With
/// `allow_function_ownership`, a locally declared or exported function or
/// class of that name also qualifies. For-loop headers are special-cased so
/// the counter declared in the initializer clause is visible from the test
/// and update clauses.
pub fn is_bound_to_local_scope(
    tree: &SourceTree,
    name: &str,
    start: NodeId,
    allow_function_ownership: bool,
    config: &RuleConfig,
) -> bool {
    scoped_variable_lookup(tree, name, Some(start), allow_function_ownership, config)
}

/// Reference-expression form of [`is_bound_to_local_scope`]: resolves the
/// root identifier of a member chain, then walks from `from`.
pub fn is_owned_reference(
    tree: &SourceTree,
    target: NodeId,
    from: Option<NodeId>,
    allow_function_ownership: bool,
    config: &RuleConfig,
) -> bool {
    let root = tree.leftmost_object(target);
    match tree.identifier_name(root) {
        Some(name) => scoped_variable_lookup(tree, name, from, allow_function_ownership, config),
        None => false,
    }
}

fn scoped_variable_lookup(
    tree: &SourceTree,
    name: &str,
    node: Option<NodeId>,
    allow_function_ownership: bool,
    config: &RuleConfig,
) -> bool {
    let Some(id) = node else {
        return false;
    };

    tree.statements(id)
        .iter()
        .any(|&stmt| declares_fresh_binding(tree, name, stmt, allow_function_ownership, config))
        || (allow_function_ownership && scoped_function_lookup(tree, name, Some(id)))
        || for_statement_declares(tree, name, id, allow_function_ownership, config)
        || (!is_block_boundary(tree.kind(id))
            && scoped_variable_lookup(
                tree,
                name,
                tree.parent(id),
                allow_function_ownership,
                config,
            ))
}

/// Whether `stmt` is a variable declaration binding `name` with a fresh
/// initializer. A declarator without an initializer never qualifies.
fn declares_fresh_binding(
    tree: &SourceTree,
    name: &str,
    stmt: NodeId,
    allow_function_ownership: bool,
    config: &RuleConfig,
) -> bool {
    let NodeKind::VariableDeclaration { declarations, .. } = tree.kind(stmt) else {
        return false;
    };

    declarations.iter().any(|&decl| {
        let NodeKind::VariableDeclarator { pattern, init } = tree.kind(decl) else {
            return false;
        };
        tree.binds_name(*pattern, name)
            && init.is_some_and(|init| {
                is_fresh_initializer(tree, init, stmt, allow_function_ownership, config)
            })
    })
}

/// Loop-header visibility: the counter declared in a `for` initializer
/// clause is in scope for the test and update clauses without a surrounding
/// block to scan.
fn for_statement_declares(
    tree: &SourceTree,
    name: &str,
    id: NodeId,
    allow_function_ownership: bool,
    config: &RuleConfig,
) -> bool {
    match tree.kind(id) {
        NodeKind::ForStatement { init: Some(init), .. } => {
            declares_fresh_binding(tree, name, *init, allow_function_ownership, config)
        }
        _ => false,
    }
}

/// Whether `expr` denotes a freshly-owned value when used as the initializer
/// of a binding declared by `decl_stmt`.
///
/// Fresh: literals and object/array literals; `new` expressions other than
/// the aliasing [`ALIASING_CONSTRUCTOR`]; calls matching a configured
/// initializer signature (including chained factory calls); references whose
/// root name is itself locally owned; conditionals whose branches are both
/// fresh. Everything else is a possible alias.
pub fn is_fresh_initializer(
    tree: &SourceTree,
    expr: NodeId,
    decl_stmt: NodeId,
    allow_function_ownership: bool,
    config: &RuleConfig,
) -> bool {
    match tree.kind(expr) {
        NodeKind::Literal { .. }
        | NodeKind::ObjectLiteral { .. }
        | NodeKind::ArrayLiteral { .. } => true,
        NodeKind::NewExpression { callee, .. } => {
            tree.identifier_name(*callee) != Some(ALIASING_CONSTRUCTOR)
        }
        NodeKind::CallExpression { .. } => is_initializer_call(tree, expr, config),
        kind if kind.is_reference() => is_owned_reference(
            tree,
            expr,
            tree.parent(decl_stmt),
            allow_function_ownership,
            config,
        ),
        NodeKind::ConditionalExpression { consequent, alternate, .. } => {
            is_fresh_initializer(tree, *consequent, decl_stmt, allow_function_ownership, config)
                && is_fresh_initializer(
                    tree,
                    *alternate,
                    decl_stmt,
                    allow_function_ownership,
                    config,
                )
        }
        _ => false,
    }
}

/// Whether `call` matches a configured initializer signature, by plain name
/// (`structuredClone(x)`) or `object.property` shape (`Object.keys(x)`).
/// Recurses into the callee's object so chained factory calls like
/// `Object.keys(m).filter(f)` stay fresh.
pub(crate) fn is_initializer_call(tree: &SourceTree, call: NodeId, config: &RuleConfig) -> bool {
    let NodeKind::CallExpression { callee, .. } = tree.kind(call) else {
        return false;
    };

    match tree.kind(*callee) {
        NodeKind::Identifier { name } => config.initializers.iter().any(|sig| sig == name),
        NodeKind::PropertyAccess { object, property, .. } => {
            let dotted_match = match (tree.identifier_name(*object), tree.identifier_name(*property))
            {
                (Some(obj), Some(prop)) => config
                    .initializers
                    .iter()
                    .any(|sig| signature_matches(sig, obj, prop)),
                _ => false,
            };
            dotted_match
                || (matches!(tree.kind(*object), NodeKind::CallExpression { .. })
                    && is_initializer_call(tree, *object, config))
        }
        _ => false,
    }
}

fn signature_matches(signature: &str, object: &str, property: &str) -> bool {
    signature
        .split_once('.')
        .is_some_and(|(o, p)| o == object && p == property)
}

/// Whether `assign` is a plain `=` whose target's root identifier resolves
/// to a `let` declaration within the variable-scope boundary. A `let`
/// binding is reassignable regardless of its initializer's freshness.
pub fn is_scoped_let_assignment(tree: &SourceTree, assign: NodeId) -> bool {
    let NodeKind::AssignmentExpression { op, left, .. } = tree.kind(assign) else {
        return false;
    };
    if !op.is_plain() {
        return false;
    }

    let root = tree.leftmost_object(*left);
    match tree.identifier_name(root) {
        Some(name) => scoped_let_lookup(tree, name, tree.parent(assign)),
        None => false,
    }
}

fn scoped_let_lookup(tree: &SourceTree, name: &str, node: Option<NodeId>) -> bool {
    let Some(id) = node else {
        return false;
    };

    tree.statements(id)
        .iter()
        .any(|&stmt| declares_let_binding(tree, name, stmt))
        || (!is_variable_scope_boundary(tree.kind(id))
            && scoped_let_lookup(tree, name, tree.parent(id)))
}

fn declares_let_binding(tree: &SourceTree, name: &str, stmt: NodeId) -> bool {
    let NodeKind::VariableDeclaration { kind, declarations } = tree.kind(stmt) else {
        return false;
    };
    *kind == crate::ast::DeclarationKind::Let
        && declarations.iter().any(|&decl| {
            matches!(tree.kind(decl), NodeKind::VariableDeclarator { pattern, .. }
                if tree.binds_name(*pattern, name))
        })
}

/// Whether the root identifier of `target` names a function or class
/// declared (or export-declared) in an enclosing statement list.
pub fn is_scoped_function(tree: &SourceTree, target: NodeId, from: Option<NodeId>) -> bool {
    let root = tree.leftmost_object(target);
    match tree.identifier_name(root) {
        Some(name) => scoped_function_lookup(tree, name, from),
        None => false,
    }
}

fn scoped_function_lookup(tree: &SourceTree, name: &str, node: Option<NodeId>) -> bool {
    let Some(id) = node else {
        return false;
    };

    tree.statements(id).iter().any(|&stmt| {
        is_function_declaration_of(tree, name, stmt)
            || is_exported_function_declaration_of(tree, name, stmt)
    }) || (!is_block_boundary(tree.kind(id))
        && scoped_function_lookup(tree, name, tree.parent(id)))
}

fn is_function_declaration_of(tree: &SourceTree, name: &str, stmt: NodeId) -> bool {
    match tree.kind(stmt) {
        NodeKind::FunctionDeclaration { name: n, .. }
        | NodeKind::ClassDeclaration { name: n, .. } => n == name,
        _ => false,
    }
}

fn is_exported_function_declaration_of(tree: &SourceTree, name: &str, stmt: NodeId) -> bool {
    match tree.kind(stmt) {
        NodeKind::ExportDeclaration {
            declaration: Some(decl),
            ..
        } => is_function_declaration_of(tree, name, *decl),
        _ => false,
    }
}

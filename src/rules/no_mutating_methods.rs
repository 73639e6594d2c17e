//! Rule: disallow built-in methods that mutate their receiver.

use phf::phf_set;

use crate::analysis::{is_initializer_call, is_owned_reference, is_within_exempted_reducer};
use crate::ast::{NodeId, NodeKind, SourceTree};
use crate::config::RuleConfig;

use super::{RuleKind, Violation};

/// Built-in collection methods that mutate in place.
static MUTATING_METHODS: phf::Set<&'static str> = phf_set! {
    "copyWithin",
    "pop",
    "push",
    "reverse",
    "shift",
    "sort",
    "splice",
    "unshift",
    "unwatch",
    "watch",
};

/// Check every call expression in the tree.
pub fn check(tree: &SourceTree, config: &RuleConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    for id in tree.ids() {
        let NodeKind::CallExpression { callee, .. } = tree.kind(id) else {
            continue;
        };
        let NodeKind::PropertyAccess {
            object, property, ..
        } = tree.kind(*callee)
        else {
            continue;
        };

        if let Some(receiver) = tree.identifier_name(*object) {
            if config.allowed_objects.iter().any(|a| a == receiver) {
                continue;
            }
        }

        let Some(name) = mutating_method_name(tree, *property) else {
            continue;
        };

        if is_owned_reference(tree, *object, tree.parent(id), false, config)
            || tree.kind(*object).is_object_expression()
            || is_fresh_receiver(tree, *object, config)
            || tree
                .parent(id)
                .is_some_and(|p| is_within_exempted_reducer(tree, &config.reducers, p))
        {
            continue;
        }

        violations.push(Violation {
            rule: RuleKind::MutatingMethod,
            message: format!(
                "The use of method `{}` is not allowed as it might be a mutating method",
                name
            ),
            line: tree.line(id),
        });
    }

    violations
}

/// The method name, when the property names a known mutating method either
/// directly or through a computed string key (`xs["push"]`).
fn mutating_method_name<'a>(tree: &'a SourceTree, property: NodeId) -> Option<&'a str> {
    let name = match tree.kind(property) {
        NodeKind::Identifier { name } => name.as_str(),
        NodeKind::Literal { value } => value.as_string()?,
        _ => return None,
    };
    MUTATING_METHODS.contains(name).then_some(name)
}

/// A receiver that is itself a fresh factory chain (`Object.keys(m).sort()`)
/// owns its storage, so mutating it is confined to this expression.
fn is_fresh_receiver(tree: &SourceTree, object: NodeId, config: &RuleConfig) -> bool {
    matches!(tree.kind(object), NodeKind::CallExpression { .. })
        && is_initializer_call(tree, object, config)
}

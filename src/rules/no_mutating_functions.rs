//! Rule: disallow functions known to mutate their first argument.

use crate::analysis::{is_owned_reference, is_within_exempted_reducer};
use crate::ast::{NodeId, NodeKind, SourceTree};
use crate::config::RuleConfig;

use super::{RuleKind, Violation};

const MESSAGE: &str = "Unallowed use of mutating functions";

/// Known mutating functions, written as they appear at call sites.
const MUTATING_FUNCTIONS: &[&str] = &[
    "Object.assign",
    "Object.defineProperties",
    "Object.defineProperty",
    "Object.setPrototypeOf",
    "_.assign",
    "_.assignIn",
    "_.assignInWith",
    "_.assignWith",
    "_.defaults",
    "_.defaultsDeep",
    "_.fill",
    "_.pull",
    "_.pullAll",
    "_.pullAllBy",
    "_.pullAllWith",
    "_.pullAt",
    "_.merge",
    "_.mergeWith",
    "_.remove",
    "_.reverse",
    "_.set",
    "_.setWith",
    "_.unset",
    "_.update",
    "_.updateWith",
];

/// A callee shape to match against call expressions.
enum CalleeSpec {
    Plain(String),
    Member { object: String, property: String },
}

impl CalleeSpec {
    fn matches(&self, tree: &SourceTree, callee: NodeId) -> bool {
        match self {
            CalleeSpec::Plain(name) => tree
                .identifier_name(callee)
                .is_some_and(|found| found == name),
            CalleeSpec::Member { object, property } => {
                let NodeKind::PropertyAccess {
                    object: obj,
                    property: prop,
                    computed: false,
                } = tree.kind(callee)
                else {
                    return false;
                };
                tree.identifier_name(*obj).is_some_and(|o| o == object)
                    && tree.identifier_name(*prop).is_some_and(|p| p == property)
            }
        }
    }
}

/// The effective callee list after applying the lodash-import and ignore
/// options. `use_lodash_function_imports` strips the `_.` prefix so that
/// `import { merge } from "lodash"` call sites are still caught.
fn callee_specs(config: &RuleConfig) -> Vec<CalleeSpec> {
    MUTATING_FUNCTIONS
        .iter()
        .filter_map(|entry| {
            let spec = match entry.split_once('.') {
                Some(("_", name)) if config.use_lodash_function_imports => {
                    CalleeSpec::Plain(name.to_string())
                }
                Some((object, property)) => CalleeSpec::Member {
                    object: object.to_string(),
                    property: property.to_string(),
                },
                None => CalleeSpec::Plain((*entry).to_string()),
            };
            let visible_name = match &spec {
                CalleeSpec::Plain(name) => name.as_str(),
                CalleeSpec::Member { property, .. } => property.as_str(),
            };
            if config.ignored_functions.iter().any(|i| i == visible_name) {
                None
            } else {
                Some(spec)
            }
        })
        .collect()
}

/// Check every call expression in the tree.
pub fn check(tree: &SourceTree, config: &RuleConfig) -> Vec<Violation> {
    let specs = callee_specs(config);
    let mut violations = Vec::new();

    for id in tree.ids() {
        let NodeKind::CallExpression { callee, arguments } = tree.kind(id) else {
            continue;
        };
        if !specs.iter().any(|spec| spec.matches(tree, *callee)) {
            continue;
        }

        if arguments
            .first()
            .is_some_and(|&first| is_allowed_first_argument(tree, id, first, config))
            || tree
                .parent(id)
                .is_some_and(|p| is_within_exempted_reducer(tree, &config.reducers, p))
        {
            continue;
        }

        violations.push(Violation {
            rule: RuleKind::MutatingFunction,
            message: MESSAGE.to_string(),
            line: tree.line(id),
        });
    }

    violations
}

/// Mutation lands in the first argument, so a call is fine when that
/// argument is fresh storage or a locally owned binding.
fn is_allowed_first_argument(
    tree: &SourceTree,
    call: NodeId,
    first: NodeId,
    config: &RuleConfig,
) -> bool {
    let kind = tree.kind(first);
    kind.is_object_expression()
        || kind.is_function_literal()
        || is_owned_reference(tree, first, tree.parent(call), config.function_props, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DeclarationKind, TreeBuilder};

    fn ident(b: &mut TreeBuilder, name: &str) -> NodeId {
        b.node(NodeKind::Identifier { name: name.into() })
    }

    fn member_call(
        b: &mut TreeBuilder,
        object: &str,
        property: &str,
        arguments: Vec<NodeId>,
    ) -> NodeId {
        let object = ident(b, object);
        let property = ident(b, property);
        let callee = b.node(NodeKind::PropertyAccess {
            object,
            property,
            computed: false,
        });
        b.node(NodeKind::CallExpression { callee, arguments })
    }

    fn program_with_call(mut b: TreeBuilder, call: NodeId) -> SourceTree {
        let stmt = b.node(NodeKind::ExpressionStatement { expression: call });
        let root = b.node(NodeKind::Program { body: vec![stmt] });
        b.build(root)
    }

    #[test]
    fn reports_object_assign_on_unowned_target() {
        let mut b = TreeBuilder::new();
        let a = ident(&mut b, "a");
        let bb = ident(&mut b, "b");
        let call = member_call(&mut b, "Object", "assign", vec![a, bb]);
        let tree = program_with_call(b, call);

        let violations = check(&tree, &RuleConfig::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, RuleKind::MutatingFunction);
    }

    #[test]
    fn allows_object_assign_into_literal() {
        // Object.assign({}, b)
        let mut b = TreeBuilder::new();
        let target = b.node(NodeKind::ObjectLiteral { properties: vec![] });
        let source = ident(&mut b, "b");
        let call = member_call(&mut b, "Object", "assign", vec![target, source]);
        let tree = program_with_call(b, call);

        assert!(check(&tree, &RuleConfig::default()).is_empty());
    }

    #[test]
    fn allows_object_assign_into_owned_local() {
        // const a = {}; Object.assign(a, b);
        let mut b = TreeBuilder::new();
        let obj = b.node(NodeKind::ObjectLiteral { properties: vec![] });
        let pat = ident(&mut b, "a");
        let decl = b.node(NodeKind::VariableDeclarator {
            pattern: pat,
            init: Some(obj),
        });
        let decl_stmt = b.node(NodeKind::VariableDeclaration {
            kind: DeclarationKind::Const,
            declarations: vec![decl],
        });
        let a = ident(&mut b, "a");
        let src = ident(&mut b, "b");
        let call = member_call(&mut b, "Object", "assign", vec![a, src]);
        let stmt = b.node(NodeKind::ExpressionStatement { expression: call });
        let root = b.node(NodeKind::Program {
            body: vec![decl_stmt, stmt],
        });
        let tree = b.build(root);

        assert!(check(&tree, &RuleConfig::default()).is_empty());
    }

    #[test]
    fn call_without_arguments_is_reported() {
        let mut b = TreeBuilder::new();
        let call = member_call(&mut b, "_", "merge", vec![]);
        let tree = program_with_call(b, call);

        assert_eq!(check(&tree, &RuleConfig::default()).len(), 1);
    }

    #[test]
    fn lodash_imports_match_bare_names() {
        // merge(a, b) with useLodashFunctionImports
        let mut b = TreeBuilder::new();
        let callee = ident(&mut b, "merge");
        let a = ident(&mut b, "a");
        let bb = ident(&mut b, "b");
        let call = b.node(NodeKind::CallExpression {
            callee,
            arguments: vec![a, bb],
        });
        let tree = program_with_call(b, call);

        assert!(check(&tree, &RuleConfig::default()).is_empty());

        let config = RuleConfig {
            use_lodash_function_imports: true,
            ..RuleConfig::default()
        };
        assert_eq!(check(&tree, &config).len(), 1);
    }

    #[test]
    fn ignored_functions_are_skipped() {
        let mut b = TreeBuilder::new();
        let a = ident(&mut b, "a");
        let bb = ident(&mut b, "b");
        let call = member_call(&mut b, "_", "set", vec![a, bb]);
        let tree = program_with_call(b, call);

        assert_eq!(check(&tree, &RuleConfig::default()).len(), 1);

        let config = RuleConfig {
            ignored_functions: vec!["set".into()],
            ..RuleConfig::default()
        };
        assert!(check(&tree, &config).is_empty());
    }
}

//! Rule: disallow reassignment and mutating update operators.

use crate::analysis::{
    is_export_surface, is_for_loop_update_clause, is_owned_reference, is_prototype_assignment,
    is_scoped_let_assignment, is_within_exempted_reducer, matches_exception_template,
    compile_exceptions, TargetPattern,
};
use crate::ast::{NodeId, NodeKind, SourceTree, UpdateOp};
use crate::config::RuleConfig;

use super::{RuleKind, Violation};

const REASSIGNMENT_MSG: &str = "Reassignment is disallowed";
const COMMONJS_MSG: &str = "Assignment to exports or module.exports is disallowed. \
     You may want to activate the `commonjs` option for this rule";
const PROTOTYPE_MSG: &str = "Assignment to object prototype is disallowed. \
     You may want to activate the `prototypes` option for this rule";

/// Check every assignment and update expression in the tree.
pub fn check(tree: &SourceTree, config: &RuleConfig) -> Vec<Violation> {
    let patterns = compile_exceptions(config);
    let mut violations = Vec::new();

    for id in tree.ids() {
        match tree.kind(id) {
            NodeKind::AssignmentExpression { left, .. } => {
                check_assignment(tree, config, &patterns, id, *left, &mut violations);
            }
            NodeKind::UpdateExpression { op, .. } => {
                check_update(tree, config, id, *op, &mut violations);
            }
            _ => {}
        }
    }

    violations
}

fn check_assignment(
    tree: &SourceTree,
    config: &RuleConfig,
    patterns: &[TargetPattern],
    assign: NodeId,
    left: NodeId,
    violations: &mut Vec<Violation>,
) {
    // Category detection runs unconditionally; the opt-in flags only decide
    // whether the category exempts or merely renames the violation.
    let commonjs = is_export_surface(tree, left);
    let prototype = is_prototype_assignment(tree, assign);

    let exempt = (commonjs && config.commonjs)
        || (prototype && config.prototypes)
        || matches_exception_template(tree, patterns, left)
        || is_scoped_let_assignment(tree, assign)
        || is_owned_reference(tree, left, tree.parent(assign), config.function_props, config)
        || tree
            .parent(assign)
            .is_some_and(|p| is_within_exempted_reducer(tree, &config.reducers, p));
    if exempt {
        return;
    }

    let rule = if commonjs {
        RuleKind::CommonJsAssignment
    } else if prototype {
        RuleKind::PrototypeAssignment
    } else {
        RuleKind::Reassignment
    };
    let message = match rule {
        RuleKind::CommonJsAssignment => COMMONJS_MSG,
        RuleKind::PrototypeAssignment => PROTOTYPE_MSG,
        _ => REASSIGNMENT_MSG,
    };

    violations.push(Violation {
        rule,
        message: message.to_string(),
        line: tree.line(assign),
    });
}

fn check_update(
    tree: &SourceTree,
    config: &RuleConfig,
    update: NodeId,
    op: UpdateOp,
    violations: &mut Vec<Violation>,
) {
    if config.allow_unary_operator_in_for_loops && is_for_loop_update_clause(tree, update) {
        return;
    }

    violations.push(Violation {
        rule: RuleKind::UnsafeUpdateOperator,
        message: format!("Use of `{}` operator is disallowed", op.as_str()),
        line: tree.line(update),
    });
}

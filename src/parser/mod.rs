//! Tree-sitter based JavaScript front end.
//!
//! Lowers a tree-sitter parse into the [`SourceTree`] model the analysis
//! runs on. Constructs the analysis has no opinion about keep their children
//! under [`NodeKind::Other`] so ancestry walks stay intact.

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use tree_sitter::{Language, Node, Parser};

use crate::ast::{
    AssignOp, DeclarationKind, LiteralValue, NodeId, NodeKind, SourceTree, TreeBuilder, UpdateOp,
};

static LANGUAGE: Lazy<Language> = Lazy::new(|| tree_sitter_javascript::LANGUAGE.into());

/// Parse one JavaScript source unit into an analysis tree.
pub fn parse_source(source: &str) -> Result<SourceTree> {
    let mut parser = Parser::new();
    parser.set_language(&LANGUAGE)?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| anyhow!("tree-sitter failed to produce a parse tree"))?;

    let mut lowerer = Lowerer {
        source: source.as_bytes(),
        builder: TreeBuilder::new(),
    };
    let root = lowerer.lower(tree.root_node());
    Ok(lowerer.builder.build(root))
}

struct Lowerer<'a> {
    source: &'a [u8],
    builder: TreeBuilder,
}

impl Lowerer<'_> {
    fn text(&self, node: Node<'_>) -> &str {
        std::str::from_utf8(&self.source[node.byte_range()]).unwrap_or("")
    }

    fn line(node: Node<'_>) -> usize {
        node.start_position().row + 1
    }

    fn named_children<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect()
    }

    fn lower(&mut self, node: Node<'_>) -> NodeId {
        let line = Self::line(node);
        let kind = self.lower_kind(node);
        self.builder.node_at(line, kind)
    }

    fn lower_field(&mut self, node: Node<'_>, field: &str) -> Option<NodeId> {
        node.child_by_field_name(field).map(|c| self.lower(c))
    }

    fn lower_children(&mut self, node: Node<'_>) -> Vec<NodeId> {
        self.named_children(node)
            .into_iter()
            .map(|c| self.lower(c))
            .collect()
    }

    fn lower_kind(&mut self, node: Node<'_>) -> NodeKind {
        match node.kind() {
            "program" => NodeKind::Program {
                body: self.lower_children(node),
            },
            "statement_block" | "class_body" => NodeKind::Block {
                body: self.lower_children(node),
            },
            "expression_statement" => match self.named_children(node).first().copied() {
                Some(inner) => NodeKind::ExpressionStatement {
                    expression: self.lower(inner),
                },
                None => NodeKind::Other { children: vec![] },
            },
            "parenthesized_expression" => match self.named_children(node).first().copied() {
                Some(inner) => self.lower_kind(inner),
                None => NodeKind::Other { children: vec![] },
            },
            "lexical_declaration" | "variable_declaration" => self.lower_declaration(node),
            "variable_declarator" => {
                let pattern = self
                    .lower_field(node, "name")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                let init = self.lower_field(node, "value");
                NodeKind::VariableDeclarator { pattern, init }
            }
            "identifier" | "property_identifier" | "statement_identifier"
            | "shorthand_property_identifier" | "shorthand_property_identifier_pattern" => {
                NodeKind::Identifier {
                    name: self.text(node).to_string(),
                }
            }
            "this" => NodeKind::ThisExpression,
            "object_pattern" => NodeKind::ObjectPattern {
                properties: self
                    .named_children(node)
                    .into_iter()
                    .map(|c| self.lower_pattern_property(c))
                    .collect(),
            },
            "array_pattern" => NodeKind::ArrayPattern {
                elements: self
                    .named_children(node)
                    .into_iter()
                    .map(|c| self.lower_pattern_element(c))
                    .collect(),
            },
            "rest_pattern" | "rest_element" => {
                let argument = self
                    .named_children(node)
                    .first()
                    .map(|&c| self.lower(c))
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                NodeKind::RestElement { argument }
            }
            "object" => NodeKind::ObjectLiteral {
                properties: self.lower_children(node),
            },
            "array" => NodeKind::ArrayLiteral {
                elements: self.lower_children(node),
            },
            "member_expression" => self.lower_member(node, "property", false),
            "subscript_expression" => self.lower_member(node, "index", true),
            "call_expression" => {
                let callee = self
                    .lower_field(node, "function")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                let arguments = self.lower_arguments(node);
                NodeKind::CallExpression { callee, arguments }
            }
            "new_expression" => {
                let callee = self
                    .lower_field(node, "constructor")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                let arguments = self.lower_arguments(node);
                NodeKind::NewExpression { callee, arguments }
            }
            "assignment_expression" => self.lower_assignment(node, AssignOp::Assign),
            "augmented_assignment_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .and_then(|o| AssignOp::parse(self.text(o)))
                    .unwrap_or(AssignOp::Add);
                self.lower_assignment(node, op)
            }
            "update_expression" => {
                let argument = self
                    .lower_field(node, "argument")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                let op = match node.child_by_field_name("operator").map(|o| o.kind()) {
                    Some("--") => UpdateOp::Decrement,
                    _ => UpdateOp::Increment,
                };
                NodeKind::UpdateExpression { op, argument }
            }
            "ternary_expression" => {
                let test = self
                    .lower_field(node, "condition")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                let consequent = self
                    .lower_field(node, "consequence")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                let alternate = self
                    .lower_field(node, "alternative")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                NodeKind::ConditionalExpression {
                    test,
                    consequent,
                    alternate,
                }
            }
            "sequence_expression" => NodeKind::SequenceExpression {
                expressions: self.lower_children(node),
            },
            "string" | "template_string" => NodeKind::Literal {
                value: LiteralValue::String(self.string_payload(node)),
            },
            "number" => NodeKind::Literal {
                value: LiteralValue::Number(self.text(node).parse().unwrap_or(f64::NAN)),
            },
            "true" => NodeKind::Literal {
                value: LiteralValue::Boolean(true),
            },
            "false" => NodeKind::Literal {
                value: LiteralValue::Boolean(false),
            },
            "null" => NodeKind::Literal {
                value: LiteralValue::Null,
            },
            "undefined" => NodeKind::Literal {
                value: LiteralValue::Undefined,
            },
            "regex" => NodeKind::Literal {
                value: LiteralValue::Regex(self.text(node).to_string()),
            },
            "function_declaration" | "generator_function_declaration" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                let params = self.lower_parameters(node);
                let body = self
                    .lower_field(node, "body")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Block { body: vec![] }));
                NodeKind::FunctionDeclaration { name, params, body }
            }
            "function_expression" | "function" | "generator_function" => {
                let name = node.child_by_field_name("name").map(|n| self.text(n).to_string());
                let params = self.lower_parameters(node);
                let body = self
                    .lower_field(node, "body")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Block { body: vec![] }));
                NodeKind::FunctionExpression { name, params, body }
            }
            "arrow_function" => {
                let params = match node.child_by_field_name("parameters") {
                    Some(list) => self.lower_children(list),
                    None => node
                        .child_by_field_name("parameter")
                        .map(|p| vec![self.lower(p)])
                        .unwrap_or_default(),
                };
                let body = self
                    .lower_field(node, "body")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Block { body: vec![] }));
                NodeKind::ArrowFunction { params, body }
            }
            "class_declaration" | "class" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                let body = node
                    .child_by_field_name("body")
                    .map(|b| self.lower_children(b))
                    .unwrap_or_default();
                NodeKind::ClassDeclaration { name, body }
            }
            "export_statement" => {
                let declaration = node
                    .child_by_field_name("declaration")
                    .or_else(|| node.child_by_field_name("value"))
                    .map(|d| self.lower(d));
                let default = (0..node.child_count())
                    .filter_map(|i| node.child(i))
                    .any(|c| c.kind() == "default");
                NodeKind::ExportDeclaration {
                    declaration,
                    default,
                }
            }
            "for_statement" => {
                let init = self.lower_for_clause(node, "initializer");
                let test = self.lower_for_clause(node, "condition");
                let update = self.lower_field(node, "increment");
                let body = self
                    .lower_field(node, "body")
                    .unwrap_or_else(|| self.builder.node(NodeKind::Block { body: vec![] }));
                NodeKind::ForStatement {
                    init,
                    test,
                    update,
                    body,
                }
            }
            _ => NodeKind::Other {
                children: self.lower_children(node),
            },
        }
    }

    /// `var` statements carry their keyword in the node kind; `let`/`const`
    /// share `lexical_declaration` and expose the keyword as the first token.
    fn lower_declaration(&mut self, node: Node<'_>) -> NodeKind {
        let kind = if node.kind() == "variable_declaration" {
            DeclarationKind::Var
        } else {
            let keyword = node.child(0).map(|c| c.kind()).unwrap_or("let");
            match keyword {
                "const" => DeclarationKind::Const,
                _ => DeclarationKind::Let,
            }
        };
        NodeKind::VariableDeclaration {
            kind,
            declarations: self.lower_children(node),
        }
    }

    fn lower_member(&mut self, node: Node<'_>, property_field: &str, computed: bool) -> NodeKind {
        let object = self
            .lower_field(node, "object")
            .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
        let property = self
            .lower_field(node, property_field)
            .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
        NodeKind::PropertyAccess {
            object,
            property,
            computed,
        }
    }

    fn lower_assignment(&mut self, node: Node<'_>, op: AssignOp) -> NodeKind {
        let left = self
            .lower_field(node, "left")
            .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
        let right = self
            .lower_field(node, "right")
            .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
        NodeKind::AssignmentExpression { op, left, right }
    }

    /// Argument list of a call or `new`. A tagged template carries its
    /// template as the single argument.
    fn lower_arguments(&mut self, node: Node<'_>) -> Vec<NodeId> {
        match node.child_by_field_name("arguments") {
            Some(args) if args.kind() == "arguments" => self.lower_children(args),
            Some(template) => vec![self.lower(template)],
            None => Vec::new(),
        }
    }

    fn lower_parameters(&mut self, node: Node<'_>) -> Vec<NodeId> {
        node.child_by_field_name("parameters")
            .map(|list| self.lower_children(list))
            .unwrap_or_default()
    }

    /// One entry of an object destructuring pattern.
    fn lower_pattern_property(&mut self, node: Node<'_>) -> NodeId {
        let line = Self::line(node);
        let kind = match node.kind() {
            "pair_pattern" => {
                let key = node
                    .child_by_field_name("key")
                    .map(|k| self.text(k).to_string())
                    .unwrap_or_default();
                let value = node
                    .child_by_field_name("value")
                    .map(|v| self.lower_pattern_element(v))
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                NodeKind::PatternProperty { key, value }
            }
            "shorthand_property_identifier_pattern" => {
                let name = self.text(node).to_string();
                let value = self.builder.node_at(
                    line,
                    NodeKind::Identifier { name: name.clone() },
                );
                NodeKind::PatternProperty { key: name, value }
            }
            "object_assignment_pattern" => {
                // `{a = 1}` still binds `a`; the default does not matter here.
                let value = node
                    .child_by_field_name("left")
                    .map(|l| self.lower_pattern_element(l))
                    .unwrap_or_else(|| self.builder.node(NodeKind::Other { children: vec![] }));
                let key = node
                    .child_by_field_name("left")
                    .map(|l| self.text(l).to_string())
                    .unwrap_or_default();
                NodeKind::PatternProperty { key, value }
            }
            _ => return self.lower(node),
        };
        self.builder.node_at(line, kind)
    }

    /// One element of an array pattern, unwrapping default values.
    fn lower_pattern_element(&mut self, node: Node<'_>) -> NodeId {
        if node.kind() == "assignment_pattern" {
            if let Some(left) = node.child_by_field_name("left") {
                return self.lower_pattern_element(left);
            }
        }
        self.lower(node)
    }

    /// `for (;;)` clauses: the grammar wraps the initializer and condition as
    /// statements, and an `empty_statement` means the clause is absent.
    fn lower_for_clause(&mut self, node: Node<'_>, field: &str) -> Option<NodeId> {
        let clause = node.child_by_field_name(field)?;
        if clause.kind() == "empty_statement" {
            return None;
        }
        Some(self.lower(clause))
    }

    /// Literal payload of a string, without the surrounding quotes.
    fn string_payload(&self, node: Node<'_>) -> String {
        let fragments: Vec<&str> = self
            .named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "string_fragment")
            .map(|c| self.text(c))
            .collect();
        if fragments.is_empty() {
            let raw = self.text(node);
            raw.trim_matches(|c| c == '"' || c == '\'' || c == '`').to_string()
        } else {
            fragments.concat()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of(source: &str) -> Vec<String> {
        let tree = parse_source(source).unwrap();
        tree.statements(tree.root())
            .iter()
            .map(|&s| format!("{:?}", std::mem::discriminant(tree.kind(s))))
            .collect()
    }

    #[test]
    fn parses_empty_source() {
        let tree = parse_source("").unwrap();
        assert!(tree.statements(tree.root()).is_empty());
    }

    #[test]
    fn lowers_declarations_with_kinds() {
        let tree = parse_source("let a = 1;\nconst b = {};\nvar c;").unwrap();
        let stmts = tree.statements(tree.root());
        assert_eq!(stmts.len(), 3);

        let kinds: Vec<DeclarationKind> = stmts
            .iter()
            .filter_map(|&s| match tree.kind(s) {
                NodeKind::VariableDeclaration { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                DeclarationKind::Let,
                DeclarationKind::Const,
                DeclarationKind::Var
            ]
        );
    }

    #[test]
    fn lowers_member_assignment_with_lines() {
        let tree = parse_source("a.b = 1;").unwrap();
        let stmts = tree.statements(tree.root());
        let NodeKind::ExpressionStatement { expression } = tree.kind(stmts[0]) else {
            panic!("expected expression statement");
        };
        let NodeKind::AssignmentExpression { op, left, .. } = tree.kind(*expression) else {
            panic!("expected assignment");
        };
        assert_eq!(*op, AssignOp::Assign);
        assert_eq!(tree.line(*expression), 1);
        let NodeKind::PropertyAccess { object, computed, .. } = tree.kind(*left) else {
            panic!("expected member access");
        };
        assert!(!*computed);
        assert_eq!(tree.identifier_name(*object), Some("a"));
    }

    #[test]
    fn lowers_compound_assignment_operator() {
        let tree = parse_source("b += 2;").unwrap();
        let stmts = tree.statements(tree.root());
        let NodeKind::ExpressionStatement { expression } = tree.kind(stmts[0]) else {
            panic!("expected expression statement");
        };
        let NodeKind::AssignmentExpression { op, .. } = tree.kind(*expression) else {
            panic!("expected assignment");
        };
        assert_eq!(*op, AssignOp::Add);
    }

    #[test]
    fn lowers_destructuring_patterns() {
        let tree = parse_source("const {a, b: renamed, ...rest} = source;").unwrap();
        let stmts = tree.statements(tree.root());
        let NodeKind::VariableDeclaration { declarations, .. } = tree.kind(stmts[0]) else {
            panic!("expected declaration");
        };
        let NodeKind::VariableDeclarator { pattern, init } = tree.kind(declarations[0]) else {
            panic!("expected declarator");
        };
        assert!(init.is_some());
        assert!(tree.binds_name(*pattern, "a"));
        assert!(tree.binds_name(*pattern, "renamed"));
        assert!(tree.binds_name(*pattern, "rest"));
        assert!(!tree.binds_name(*pattern, "b"));
    }

    #[test]
    fn array_pattern_skips_holes() {
        let tree = parse_source("const [, x, ...xs] = list;").unwrap();
        let stmts = tree.statements(tree.root());
        let NodeKind::VariableDeclaration { declarations, .. } = tree.kind(stmts[0]) else {
            panic!("expected declaration");
        };
        let NodeKind::VariableDeclarator { pattern, .. } = tree.kind(declarations[0]) else {
            panic!("expected declarator");
        };
        assert!(tree.binds_name(*pattern, "x"));
        assert!(tree.binds_name(*pattern, "xs"));
    }

    #[test]
    fn lowers_for_statement_clauses() {
        let tree = parse_source("for (let i = 0; i < 5; i++) { work(i); }").unwrap();
        let stmts = tree.statements(tree.root());
        let NodeKind::ForStatement {
            init,
            test,
            update,
            ..
        } = tree.kind(stmts[0])
        else {
            panic!("expected for statement");
        };
        assert!(init.is_some());
        assert!(test.is_some());
        let update = update.expect("increment clause");
        assert!(matches!(
            tree.kind(update),
            NodeKind::UpdateExpression {
                op: UpdateOp::Increment,
                ..
            }
        ));
    }

    #[test]
    fn computed_member_keeps_string_key() {
        let tree = parse_source("o[\"name\"] = 2;").unwrap();
        let stmts = tree.statements(tree.root());
        let NodeKind::ExpressionStatement { expression } = tree.kind(stmts[0]) else {
            panic!("expected expression statement");
        };
        let NodeKind::AssignmentExpression { left, .. } = tree.kind(*expression) else {
            panic!("expected assignment");
        };
        let NodeKind::PropertyAccess {
            property, computed, ..
        } = tree.kind(*left)
        else {
            panic!("expected member access");
        };
        assert!(*computed);
        let NodeKind::Literal { value } = tree.kind(*property) else {
            panic!("expected literal key");
        };
        assert_eq!(value.as_string(), Some("name"));
    }

    #[test]
    fn unhandled_constructs_keep_children() {
        // The analysis must still ascend out of a while body.
        let tree = parse_source("while (cond) { a = 1; }").unwrap();
        assert_eq!(kinds_of("while (cond) { a = 1; }").len(), 1);
        let assignments = tree
            .ids()
            .filter(|&id| matches!(tree.kind(id), NodeKind::AssignmentExpression { .. }))
            .count();
        assert_eq!(assignments, 1);
    }
}

//! Node kinds for the JavaScript syntax tree model.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Declaration keyword of a variable statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Assignment operators, plain and compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    BitAnd,
    BitXor,
    BitOr,
    LogicalAnd,
    LogicalOr,
    Nullish,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::Exp => "**=",
            AssignOp::ShiftLeft => "<<=",
            AssignOp::ShiftRight => ">>=",
            AssignOp::UnsignedShiftRight => ">>>=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitXor => "^=",
            AssignOp::BitOr => "|=",
            AssignOp::LogicalAnd => "&&=",
            AssignOp::LogicalOr => "||=",
            AssignOp::Nullish => "??=",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(AssignOp::Assign),
            "+=" => Some(AssignOp::Add),
            "-=" => Some(AssignOp::Sub),
            "*=" => Some(AssignOp::Mul),
            "/=" => Some(AssignOp::Div),
            "%=" => Some(AssignOp::Rem),
            "**=" => Some(AssignOp::Exp),
            "<<=" => Some(AssignOp::ShiftLeft),
            ">>=" => Some(AssignOp::ShiftRight),
            ">>>=" => Some(AssignOp::UnsignedShiftRight),
            "&=" => Some(AssignOp::BitAnd),
            "^=" => Some(AssignOp::BitXor),
            "|=" => Some(AssignOp::BitOr),
            "&&=" => Some(AssignOp::LogicalAnd),
            "||=" => Some(AssignOp::LogicalOr),
            "??=" => Some(AssignOp::Nullish),
            _ => None,
        }
    }

    /// Whether this is the plain `=` operator rather than a compound one.
    pub fn is_plain(&self) -> bool {
        matches!(self, AssignOp::Assign)
    }
}

/// Increment/decrement operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

/// Literal values. Only string payloads matter to the analysis (computed
/// member names); the rest are carried for completeness.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
    Regex(String),
}

impl LiteralValue {
    /// The string payload, if this is a string literal.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Tagged union over the syntax constructs the analysis understands.
///
/// Constructs outside this set lower to [`NodeKind::Other`], which keeps its
/// children so upward traversal still works through them. The analysis treats
/// `Other` conservatively: it declares nothing, owns nothing, exempts nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program { body: Vec<NodeId> },
    Block { body: Vec<NodeId> },
    ExpressionStatement { expression: NodeId },
    VariableDeclaration { kind: DeclarationKind, declarations: Vec<NodeId> },
    VariableDeclarator { pattern: NodeId, init: Option<NodeId> },
    ObjectPattern { properties: Vec<NodeId> },
    PatternProperty { key: String, value: NodeId },
    ArrayPattern { elements: Vec<NodeId> },
    RestElement { argument: NodeId },
    Identifier { name: String },
    ThisExpression,
    Literal { value: LiteralValue },
    ObjectLiteral { properties: Vec<NodeId> },
    ArrayLiteral { elements: Vec<NodeId> },
    PropertyAccess { object: NodeId, property: NodeId, computed: bool },
    CallExpression { callee: NodeId, arguments: Vec<NodeId> },
    NewExpression { callee: NodeId, arguments: Vec<NodeId> },
    AssignmentExpression { op: AssignOp, left: NodeId, right: NodeId },
    UpdateExpression { op: UpdateOp, argument: NodeId },
    ConditionalExpression { test: NodeId, consequent: NodeId, alternate: NodeId },
    SequenceExpression { expressions: Vec<NodeId> },
    FunctionDeclaration { name: String, params: Vec<NodeId>, body: NodeId },
    FunctionExpression { name: Option<String>, params: Vec<NodeId>, body: NodeId },
    ArrowFunction { params: Vec<NodeId>, body: NodeId },
    ClassDeclaration { name: String, body: Vec<NodeId> },
    ExportDeclaration { declaration: Option<NodeId>, default: bool },
    ForStatement {
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    Other { children: Vec<NodeId> },
}

impl NodeKind {
    /// All direct children, in source order. Used once to seal parent links
    /// and by generic downward walks.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Program { body }
            | NodeKind::Block { body }
            | NodeKind::ClassDeclaration { body, .. } => body.clone(),
            NodeKind::ExpressionStatement { expression } => vec![*expression],
            NodeKind::VariableDeclaration { declarations, .. } => declarations.clone(),
            NodeKind::VariableDeclarator { pattern, init } => {
                let mut out = vec![*pattern];
                out.extend(init.iter().copied());
                out
            }
            NodeKind::ObjectPattern { properties } => properties.clone(),
            NodeKind::PatternProperty { value, .. } => vec![*value],
            NodeKind::ArrayPattern { elements } => elements.clone(),
            NodeKind::RestElement { argument } => vec![*argument],
            NodeKind::Identifier { .. }
            | NodeKind::ThisExpression
            | NodeKind::Literal { .. } => Vec::new(),
            NodeKind::ObjectLiteral { properties } => properties.clone(),
            NodeKind::ArrayLiteral { elements } => elements.clone(),
            NodeKind::PropertyAccess { object, property, .. } => vec![*object, *property],
            NodeKind::CallExpression { callee, arguments }
            | NodeKind::NewExpression { callee, arguments } => {
                let mut out = vec![*callee];
                out.extend(arguments.iter().copied());
                out
            }
            NodeKind::AssignmentExpression { left, right, .. } => vec![*left, *right],
            NodeKind::UpdateExpression { argument, .. } => vec![*argument],
            NodeKind::ConditionalExpression { test, consequent, alternate } => {
                vec![*test, *consequent, *alternate]
            }
            NodeKind::SequenceExpression { expressions } => expressions.clone(),
            NodeKind::FunctionDeclaration { params, body, .. }
            | NodeKind::FunctionExpression { params, body, .. }
            | NodeKind::ArrowFunction { params, body } => {
                let mut out = params.clone();
                out.push(*body);
                out
            }
            NodeKind::ExportDeclaration { declaration, .. } => {
                declaration.iter().copied().collect()
            }
            NodeKind::ForStatement { init, test, update, body } => {
                let mut out = Vec::new();
                out.extend(init.iter().copied());
                out.extend(test.iter().copied());
                out.extend(update.iter().copied());
                out.push(*body);
                out
            }
            NodeKind::Other { children } => children.clone(),
        }
    }

    /// Whether this is a function-valued expression (not a declaration).
    pub fn is_function_literal(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionExpression { .. } | NodeKind::ArrowFunction { .. }
        )
    }

    /// Whether this is an object or array literal expression.
    pub fn is_object_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::ObjectLiteral { .. } | NodeKind::ArrayLiteral { .. }
        )
    }

    /// Whether this is a reference expression (identifier or member access).
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            NodeKind::Identifier { .. } | NodeKind::PropertyAccess { .. }
        )
    }
}

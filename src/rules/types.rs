//! Core types for rule results.

use serde::{Deserialize, Serialize};

/// Rule names for the violation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "reassignment")]
    Reassignment,
    #[serde(rename = "commonjs_assignment")]
    CommonJsAssignment,
    #[serde(rename = "prototype_assignment")]
    PrototypeAssignment,
    #[serde(rename = "unsafe_update_operator")]
    UnsafeUpdateOperator,
    #[serde(rename = "mutating_method")]
    MutatingMethod,
    #[serde(rename = "mutating_function")]
    MutatingFunction,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Reassignment => "reassignment",
            RuleKind::CommonJsAssignment => "commonjs_assignment",
            RuleKind::PrototypeAssignment => "prototype_assignment",
            RuleKind::UnsafeUpdateOperator => "unsafe_update_operator",
            RuleKind::MutatingMethod => "mutating_method",
            RuleKind::MutatingFunction => "mutating_function",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reassignment" => Some(RuleKind::Reassignment),
            "commonjs_assignment" => Some(RuleKind::CommonJsAssignment),
            "prototype_assignment" => Some(RuleKind::PrototypeAssignment),
            "unsafe_update_operator" => Some(RuleKind::UnsafeUpdateOperator),
            "mutating_method" => Some(RuleKind::MutatingMethod),
            "mutating_function" => Some(RuleKind::MutatingFunction),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected mutation violation in one source unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub rule: RuleKind,
    pub message: String,
    /// 1-based source line, 0 when unknown.
    pub line: usize,
}

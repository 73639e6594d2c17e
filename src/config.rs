//! Rule configuration.
//!
//! One immutable struct, built once per analysis run and threaded explicitly
//! into every core query. All fields have documented defaults and deserialize
//! from YAML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Baked-in default name lists.
pub mod defaults {
    /// Callee names whose callback may mutate its accumulator argument.
    pub const REDUCERS: &[&str] = &["reduce"];

    /// Call signatures treated as allocation points: each returns a fresh
    /// mapping, sequence, or clone rather than a view of its argument.
    pub const INITIALIZERS: &[&str] = &[
        "Array.from",
        "Array.fromAsync",
        "Array.of",
        "Map.groupBy",
        "Object.create",
        "Object.entries",
        "Object.fromEntries",
        "Object.getOwnPropertyNames",
        "Object.getOwnPropertySymbols",
        "Object.groupBy",
        "Object.keys",
        "Object.values",
        "structuredClone",
    ];
}

/// A user-declared structural pattern marking a member-access target as
/// intentionally permitted. At least one of the two fields must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExceptionTemplate {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
}

/// Resolved configuration for the mutation rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Permit assignment to `exports` / `module.exports` chains.
    #[serde(default)]
    pub commonjs: bool,

    /// Permit assignment to `this.*` targets.
    #[serde(default)]
    pub allow_this: bool,

    /// Permit `++`/`--` when it is the update clause of a `for` header.
    #[serde(default)]
    pub allow_unary_operator_in_for_loops: bool,

    /// Permit `<localFn>.prototype.<member>` assignment.
    #[serde(default)]
    pub prototypes: bool,

    /// Treat locally declared or exported functions and classes as
    /// assignable owners.
    #[serde(default)]
    pub function_props: bool,

    /// Assignment targets exempted by structural template.
    #[serde(default)]
    pub exceptions: Vec<ExceptionTemplate>,

    /// Callee names with accumulator-mutation callbacks (default: `reduce`).
    #[serde(default = "default_reducers")]
    pub reducers: Vec<String>,

    /// Factory-call signatures treated as allocation points.
    #[serde(default = "default_initializers")]
    pub initializers: Vec<String>,

    /// Receiver names exempt from the mutating-methods rule (e.g. `_`, `R`).
    #[serde(default)]
    pub allowed_objects: Vec<String>,

    /// Entries removed from the mutating-functions list.
    #[serde(default)]
    pub ignored_functions: Vec<String>,

    /// Match bare lodash imports (`merge(...)`) instead of `_.merge(...)`.
    #[serde(default)]
    pub use_lodash_function_imports: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            commonjs: false,
            allow_this: false,
            allow_unary_operator_in_for_loops: false,
            prototypes: false,
            function_props: false,
            exceptions: Vec::new(),
            reducers: default_reducers(),
            initializers: default_initializers(),
            allowed_objects: Vec::new(),
            ignored_functions: Vec::new(),
            use_lodash_function_imports: false,
        }
    }
}

fn default_reducers() -> Vec<String> {
    defaults::REDUCERS.iter().map(|s| s.to_string()).collect()
}

fn default_initializers() -> Vec<String> {
    defaults::INITIALIZERS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl RuleConfig {
    /// Parse a configuration from a YAML file and validate it.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: RuleConfig = serde_yaml::from_str(&content)?;
        validate(&config)?;
        Ok(config)
    }
}

/// Configuration validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("exception template needs an object or a property name")]
    EmptyException,
    #[error("empty name in `{0}` list")]
    EmptyName(&'static str),
    #[error("invalid initializer signature {0:?}: expected `name` or `object.property`")]
    BadInitializer(String),
}

/// Validate a configuration.
pub fn validate(config: &RuleConfig) -> Result<(), ConfigError> {
    for exception in &config.exceptions {
        if exception.object.is_none() && exception.property.is_none() {
            return Err(ConfigError::EmptyException);
        }
    }

    for (list, name) in [
        (&config.reducers, "reducers"),
        (&config.allowed_objects, "allowed_objects"),
        (&config.ignored_functions, "ignored_functions"),
    ] {
        if list.iter().any(|entry| entry.is_empty()) {
            return Err(ConfigError::EmptyName(name));
        }
    }

    for signature in &config.initializers {
        let mut segments = signature.split('.');
        let well_formed = match (segments.next(), segments.next(), segments.next()) {
            (Some(name), None, _) => !name.is_empty(),
            (Some(object), Some(property), None) => !object.is_empty() && !property.is_empty(),
            _ => false,
        };
        if !well_formed {
            return Err(ConfigError::BadInitializer(signature.clone()));
        }
    }

    Ok(())
}

//! Structured error types shared across diffgeom crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`DgError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (slots, signatures, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the diffgeom engine.
///
/// Every error is terminal for the operation that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum DgError {
    /// Operand index-position signatures (or owning manifolds) differ.
    #[error("signature error: {0}")]
    Signature(ErrorInfo),
    /// A slot is already in the requested position, or a position letter is unknown.
    #[error("position error: {0}")]
    Position(ErrorInfo),
    /// Matrix inversion found no pivot.
    #[error("singular matrix: {0}")]
    Singular(ErrorInfo),
    /// A requested symbol clashes with an existing coordinate.
    #[error("name collision: {0}")]
    NameCollision(ErrorInfo),
    /// Unknown coordinate name, out of range index or slot.
    #[error("lookup error: {0}")]
    Lookup(ErrorInfo),
    /// Mismatched matrix or coordinate shapes.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Symbolic arithmetic failures such as division by zero.
    #[error("symbolic error: {0}")]
    Symbolic(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Invalid engine options.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl DgError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            DgError::Signature(info)
            | DgError::Position(info)
            | DgError::Singular(info)
            | DgError::NameCollision(info)
            | DgError::Lookup(info)
            | DgError::Shape(info)
            | DgError::Symbolic(info)
            | DgError::Serde(info)
            | DgError::Config(info) => info,
        }
    }

    /// Shorthand for a [`DgError::Lookup`] with the given code and message.
    pub fn lookup(code: &str, message: impl Into<String>) -> Self {
        DgError::Lookup(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`DgError::Shape`] with the given code and message.
    pub fn shape(code: &str, message: impl Into<String>) -> Self {
        DgError::Shape(ErrorInfo::new(code, message))
    }
}

//! Centralized error type for the collection store (§7).

use serde::Serialize;
use std::fmt;

/// A remediation hint attached to a `Validation` error: which field was
/// wrong and what to send instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationHint {
    pub field: String,
    pub suggestion: String,
}

impl RemediationHint {
    pub fn new(field: impl Into<String>, suggestion: impl Into<String>) -> Self {
        RemediationHint {
            field: field.into(),
            suggestion: suggestion.into(),
        }
    }
}

/// The seven error kinds every core API operation can fail with (§7). No
/// raw `io::Error`/`serde_json::Error` crosses the API boundary — they are
/// folded into `Io`/`Corrupt` here first.
#[derive(Debug, Clone, Serialize)]
pub enum CoreError {
    NotFound(String),
    Validation {
        message: String,
        hints: Vec<RemediationHint>,
    },
    Conflict(String),
    Io(String),
    Corrupt(String),
    Cancelled(String),
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
            hints: Vec::new(),
        }
    }

    pub fn validation_with_hints(message: impl Into<String>, hints: Vec<RemediationHint>) -> Self {
        CoreError::Validation {
            message: message.into(),
            hints,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::NotFound(_) => "NotFound",
            CoreError::Validation { .. } => "Validation",
            CoreError::Conflict(_) => "Conflict",
            CoreError::Io(_) => "IO",
            CoreError::Corrupt(_) => "Corrupt",
            CoreError::Cancelled(_) => "Cancelled",
            CoreError::Internal(_) => "Internal",
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::NotFound(msg) => write!(f, "not found: {}", msg),
            CoreError::Validation { message, .. } => write!(f, "validation error: {}", message),
            CoreError::Conflict(msg) => write!(f, "conflict: {}", msg),
            CoreError::Io(msg) => write!(f, "I/O error: {}", msg),
            CoreError::Corrupt(msg) => write!(f, "corrupt file: {}", msg),
            CoreError::Cancelled(msg) => write!(f, "cancelled: {}", msg),
            CoreError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<std::io::Error> for CoreError {
    fn from(error: std::io::Error) -> Self {
        CoreError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::Corrupt(format!("JSON error: {}", error))
    }
}

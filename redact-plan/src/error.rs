//! Errors raised while resolving redaction plans.
//!
//! Every error names the fully qualified schema entity it was raised for, so a
//! single diagnostic is actionable without the rest of the run's output.

use thiserror::Error;

/// Result type for single-entity resolution.
pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The `(redact.custom)` payload, or one of its sub-rules, is malformed.
    #[error("[{location}] invalid redaction rule: expected {expected}, got {found} (hint: {hint})")]
    InvalidAnnotation {
        location: String,
        expected: String,
        found: String,
        hint: String,
    },

    /// The rule's kind does not match the field's kind.
    #[error("[{location}] rule type does not match field type: expected {expected}, got {found} (hint: {hint})")]
    TypeMismatch {
        location: String,
        expected: String,
        found: String,
        hint: String,
    },

    /// A collection field without an element rule, or an element rule on a
    /// singular field.
    #[error("[{location}] rule label does not match field label: expected {expected}, got {found} (hint: {hint})")]
    LabelMismatch {
        location: String,
        expected: String,
        found: String,
        hint: String,
    },

    /// `element.item.element`: only one level of element rules is supported.
    #[error("[{location}] nested element.item.element is not supported, maximum nesting depth is 1 (hint: {hint})")]
    NestedDepthExceeded { location: String, hint: String },

    /// More than one of `(redact.ignored)`, `(redact.nil)` and `(redact.empty)`.
    #[error("[{location}] conflicting message options: expected at most one of (redact.ignored), (redact.nil), or (redact.empty), got {found}")]
    ConflictingMessageOptions { location: String, found: String },

    #[error("[{location}] invalid status code: expected valid gRPC status code (0-16), got {code} (hint: see https://grpc.io/docs/guides/status-codes/ for valid codes)")]
    InvalidStatusCode { location: String, code: u32 },

    /// Missing package, type reference, input or output.
    #[error("[{location}] {reason}")]
    Structural { location: String, reason: String },
}

impl PlanError {
    /// Fully qualified name of the entity the error was raised for.
    pub fn location(&self) -> &str {
        match self {
            PlanError::InvalidAnnotation { location, .. }
            | PlanError::TypeMismatch { location, .. }
            | PlanError::LabelMismatch { location, .. }
            | PlanError::NestedDepthExceeded { location, .. }
            | PlanError::ConflictingMessageOptions { location, .. }
            | PlanError::InvalidStatusCode { location, .. }
            | PlanError::Structural { location, .. } => location,
        }
    }

    pub(crate) fn structural(location: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanError::Structural {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank required field, non-positive number).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. not UUID-shaped).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// A conflict occurred (e.g. an order that already has a delivery).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Validation error for a blank required field: `"{field} is required"`.
    pub fn required(field: &str) -> Self {
        Self::Validation(format!("{field} is required"))
    }
}

/// Reject blank (empty or whitespace-only) required strings.
pub fn require_non_blank(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::required(field));
    }
    Ok(())
}

/// Reject zero, negative, NaN and infinite numeric values.
pub fn require_positive(value: f64, field: &str) -> DomainResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

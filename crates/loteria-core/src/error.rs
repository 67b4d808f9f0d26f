//! # Error Types
//!
//! Domain-specific error types for loteria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  loteria-core errors (this file)                                       │
//! │  ├── CoreError        - Denomination table and payload failures        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  loteria-client errors (separate crate)                                │
//! │  └── ClientError      - HTTP, session and storage failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → Front-end           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown roles, resources and actions are NOT errors for permission checks:
//! `can` answers `false` for them. Only direct parsing of a name reports
//! [`ValidationError::NotAllowed`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A label does not belong to the denomination table in use.
    ///
    /// ## When This Occurs
    /// - The form sends a field for a denomination the table does not know
    /// - A table was configured without one of the labels the caller assumes
    #[error("Unknown denomination: {0}")]
    UnknownDenomination(String),

    /// The same label appears twice while building a table.
    #[error("Denomination {0} is listed more than once")]
    DuplicateDenomination(String),

    /// A denomination face value must be strictly positive.
    #[error("Denomination {label} has an invalid face value")]
    InvalidFaceValue { label: String },

    /// A decimal amount string could not be read exactly.
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// They are recoverable: the caller rejects the edit and keeps the old value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Quantity text is not a non-negative integer.
    ///
    /// ## User Workflow
    /// ```text
    /// Operator types "-1" in the R$ 50,00 field
    ///      │
    ///      ▼
    /// validate_quantity("-1")
    ///      │
    ///      ▼
    /// InvalidQuantity { input: "-1" }
    ///      │
    ///      ▼
    /// Field keeps its previous value, UI flags the input
    /// ```
    #[error("'{input}' is not a valid quantity")]
    InvalidQuantity { input: String },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a malformed `label=qty` pair or email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Date lies after the reference day.
    #[error("{field} cannot be in the future")]
    InFuture { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

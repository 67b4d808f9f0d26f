//! # Validation Module
//!
//! Input validation utilities for Loteria360.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form (front-end)                                             │
//! │  ├── Keystroke handling, numeric keyboard                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantity text → integer, explicit rejection                       │
//! │  └── Required ids, dates, credentials                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Back-end REST API                                            │
//! │  └── Field errors returned in the `errors` array                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use loteria_core::validation::validate_quantity;
//!
//! assert_eq!(validate_quantity("12").unwrap(), 12);
//! assert_eq!(validate_quantity("").unwrap(), 0);
//! assert!(validate_quantity("-1").is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::LoginRequest;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Count of banknotes or coins of one denomination.
///
/// Unsigned, so a negative count cannot be represented at all.
pub type Quantity = u32;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the raw text of a quantity field.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Empty input and `"0"` both mean zero
/// - Only ASCII digits are accepted (no sign, no decimals, no spaces inside)
/// - Values beyond [`Quantity::MAX`] are rejected
///
/// Anything else is [`ValidationError::InvalidQuantity`]; invalid text is
/// never coerced to zero.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Count Form: edit a denomination                                        │
/// │                                                                         │
/// │  Operator types "12" in the R$ 20,00 field                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity("12") ← THIS FUNCTION                               │
/// │       │                                                                 │
/// │       ├── not digits? → InvalidQuantity, field keeps old value         │
/// │       │                                                                 │
/// │       └── OK(12) → set quantity, summary recomputed                    │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(raw: &str) -> ValidationResult<Quantity> {
    let text = raw.trim();

    if text.is_empty() {
        return Ok(0);
    }

    let invalid = || ValidationError::InvalidQuantity {
        input: raw.to_string(),
    };

    // `u32::from_str` would accept a leading '+'; the form only produces digits.
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    text.parse::<Quantity>().map_err(|_| invalid())
}

/// Validates a positive item quantity (sale form).
pub fn validate_positive_quantity(field: &str, qty: Quantity) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates pagination parameters.
///
/// ## Rules
/// - `size` must be between 1 and 100
pub fn validate_page_size(size: u32) -> ValidationResult<()> {
    if size == 0 || size > 100 {
        return Err(ValidationError::OutOfRange {
            field: "size".to_string(),
            min: 1,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a field is present and not blank, returning it trimmed.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Validates the login form.
///
/// ## Rules
/// - Email and password must not be blank
/// - Email must contain a single `@` with text on both sides
/// - The email is trimmed, the password is sent as typed
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult<LoginRequest> {
    let email = validate_required("email", email)?;
    if password.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "senha".to_string(),
        });
    }

    let well_formed = matches!(
        email.split_once('@'),
        Some((user, domain)) if !user.is_empty() && !domain.is_empty() && !domain.contains('@')
    );
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be an email address".to_string(),
        });
    }

    Ok(LoginRequest {
        email,
        password: password.to_string(),
    })
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates that a date is not after `today`.
///
/// `today` is supplied by the caller so this stays a pure function.
pub fn validate_not_future(field: &str, date: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if date > today {
        return Err(ValidationError::InFuture {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a reporting period (`start <= end`).
pub fn validate_period(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::InvalidFormat {
            field: "dataInicio".to_string(),
            reason: "must not be after dataFim".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity_accepts() {
        assert_eq!(validate_quantity("0").unwrap(), 0);
        assert_eq!(validate_quantity("").unwrap(), 0);
        assert_eq!(validate_quantity("   ").unwrap(), 0);
        assert_eq!(validate_quantity("7").unwrap(), 7);
        assert_eq!(validate_quantity(" 42 ").unwrap(), 42);
        assert_eq!(validate_quantity("0007").unwrap(), 7);
        assert_eq!(validate_quantity("12000").unwrap(), 12000);
    }

    #[test]
    fn test_validate_quantity_rejects() {
        for input in ["-1", "abc", "1.5", "+3", "1 2", "12a", "99999999999"] {
            let err = validate_quantity(input).unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidQuantity {
                    input: input.to_string()
                },
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_validate_positive_quantity() {
        assert!(validate_positive_quantity("quantidade", 1).is_ok());
        assert!(validate_positive_quantity("quantidade", 0).is_err());
    }

    #[test]
    fn test_validate_page_size() {
        assert!(validate_page_size(20).is_ok());
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(101).is_err());
    }

    #[test]
    fn test_validate_credentials() {
        let login = validate_credentials("  ana@loteria.com ", "segredo").unwrap();
        assert_eq!(login.email, "ana@loteria.com");
        assert_eq!(login.password, "segredo");

        assert!(validate_credentials("", "x").is_err());
        assert!(validate_credentials("ana@loteria.com", "   ").is_err());
        assert!(validate_credentials("ana", "x").is_err());
        assert!(validate_credentials("@loteria.com", "x").is_err());
        assert!(validate_credentials("a@b@c", "x").is_err());
    }

    #[test]
    fn test_validate_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();

        assert!(validate_not_future("dataContagem", today, today).is_ok());
        assert!(validate_not_future("dataContagem", yesterday, today).is_ok());
        assert!(validate_not_future("dataContagem", tomorrow, today).is_err());

        assert!(validate_period(yesterday, today).is_ok());
        assert!(validate_period(today, yesterday).is_err());
    }
}

//! Validation utilities.

use crate::{FieldError, RedeemError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `RedeemError` on failure.
    fn validate_request(&self) -> Result<(), RedeemError> {
        self.validate().map_err(validation_errors_to_redeem_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect()
}

/// Converts `validator::ValidationErrors` to `RedeemError`.
#[must_use]
pub fn validation_errors_to_redeem_error(errors: ValidationErrors) -> RedeemError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    RedeemError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Longest gift code accepted.
    pub const MAX_GIFT_CODE_LEN: usize = 64;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates a customer mobile number: an optional leading `+` followed by 3-15 digits.
    pub fn valid_mobile(mobile: &str) -> Result<(), ValidationError> {
        let digits = mobile.strip_prefix('+').unwrap_or(mobile);
        if digits.len() < 3 {
            return Err(ValidationError::new("mobile_too_short"));
        }
        if digits.len() > 15 {
            return Err(ValidationError::new("mobile_too_long"));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new("mobile_invalid_characters"));
        }
        Ok(())
    }

    /// Validates a gift code: non-empty, bounded, alphanumeric with `-` or `_`.
    pub fn valid_gift_code(code: &str) -> Result<(), ValidationError> {
        if code.is_empty() {
            return Err(ValidationError::new("gift_code_empty"));
        }
        if code.len() > MAX_GIFT_CODE_LEN {
            return Err(ValidationError::new("gift_code_too_long"));
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::new("gift_code_invalid_characters"));
        }
        Ok(())
    }
}

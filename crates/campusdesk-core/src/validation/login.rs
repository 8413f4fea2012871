//! Login form validation
//!
//! Format rules are declared with the `validator` derive; blank checks run first
//! so an empty field reports `MissingField` rather than a format error.

use validator::Validate;

use super::{FieldErrorKind, FieldErrors, PHONE_PATTERN};
use crate::models::LoginRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct LoginFields {
    #[validate(regex(
        path = *PHONE_PATTERN,
        code = "invalid_format",
        message = "Please enter a valid 10-digit mobile number"
    ))]
    pub mobile: String,
    #[validate(length(
        min = 6,
        code = "too_short",
        message = "Password must be at least 6 characters"
    ))]
    pub password: String,
}

impl LoginFields {
    pub fn new(mobile: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            password: password.into(),
        }
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            mobile: self.mobile.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

pub fn validate_login(fields: &LoginFields) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if fields.mobile.trim().is_empty() {
        errors.add(
            "mobile",
            FieldErrorKind::MissingField,
            "Mobile number is required",
        );
    }
    if fields.password.is_empty() {
        errors.add(
            "password",
            FieldErrorKind::MissingField,
            "Password is required",
        );
    }

    // The mobile number is checked in the form it is sent.
    let sent = LoginFields::new(fields.mobile.trim(), fields.password.as_str());
    if let Err(report) = sent.validate() {
        for (field, field_errors) in report.field_errors() {
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                errors.add(
                    field.to_string(),
                    FieldErrorKind::from_code(&first.code),
                    message,
                );
            }
        }
    }

    errors.into_result()
}

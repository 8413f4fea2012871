//! Signup form validation

use super::{is_blank, is_valid_email, is_valid_phone, FieldErrorKind, FieldErrors};
use crate::models::{Gender, SignupField, SignupFields};

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn validate_signup(fields: &SignupFields) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = fields.first_name.trim();
    if first_name.is_empty() {
        errors.add(
            SignupField::FirstName.as_str(),
            FieldErrorKind::MissingField,
            "First name is required",
        );
    } else if first_name.chars().count() < MIN_NAME_LENGTH {
        errors.add(
            SignupField::FirstName.as_str(),
            FieldErrorKind::TooShort,
            "First name must be at least 2 characters",
        );
    }

    if is_blank(&fields.email) {
        errors.add(
            SignupField::Email.as_str(),
            FieldErrorKind::MissingField,
            "Email is required",
        );
    } else if !is_valid_email(fields.email.trim()) {
        errors.add(
            SignupField::Email.as_str(),
            FieldErrorKind::InvalidFormat,
            "Please enter a valid email address",
        );
    }

    if fields.mobile.is_empty() {
        errors.add(
            SignupField::Mobile.as_str(),
            FieldErrorKind::MissingField,
            "Mobile number is required",
        );
    } else if !is_valid_phone(&fields.mobile) {
        errors.add(
            SignupField::Mobile.as_str(),
            FieldErrorKind::InvalidFormat,
            "Mobile number must be 10 digits",
        );
    }

    if fields.gender.parse::<Gender>().is_err() {
        errors.add(
            SignupField::Gender.as_str(),
            FieldErrorKind::MissingField,
            "Gender is required",
        );
    }

    if fields.password.is_empty() {
        errors.add(
            SignupField::Password.as_str(),
            FieldErrorKind::MissingField,
            "Password is required",
        );
    } else if fields.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            SignupField::Password.as_str(),
            FieldErrorKind::TooShort,
            "Password must be at least 6 characters",
        );
    }

    if fields.confirm_password.is_empty() {
        errors.add(
            SignupField::ConfirmPassword.as_str(),
            FieldErrorKind::MissingField,
            "Please confirm your password",
        );
    } else if fields.confirm_password != fields.password {
        errors.add(
            SignupField::ConfirmPassword.as_str(),
            FieldErrorKind::Mismatch,
            "Passwords do not match",
        );
    }

    errors.into_result()
}

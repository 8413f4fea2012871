//! Validation modules
//!
//! Pure classification of form input. Every rule runs independently so a single
//! pass reports every violated field; nothing here mutates its input.

pub mod files;
pub mod login;
pub mod signup;
pub mod student;

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;

pub use files::{validate_document_file, validate_photo_file};
pub use login::{validate_login, LoginFields};
pub use signup::validate_signup;
pub use student::validate_student;

/// `localpart@domain.tld` with no embedded whitespace.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Exactly ten ASCII digits.
pub(crate) static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern compiles"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorKind {
    MissingField,
    TooShort,
    InvalidFormat,
    Mismatch,
    UnsupportedType,
    TooLarge,
    /// The server already holds this value for another account.
    Conflict,
}

impl FieldErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorKind::MissingField => "missing_field",
            FieldErrorKind::TooShort => "too_short",
            FieldErrorKind::InvalidFormat => "invalid_format",
            FieldErrorKind::Mismatch => "mismatch",
            FieldErrorKind::UnsupportedType => "unsupported_type",
            FieldErrorKind::TooLarge => "too_large",
            FieldErrorKind::Conflict => "conflict",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "missing_field" => FieldErrorKind::MissingField,
            "too_short" => FieldErrorKind::TooShort,
            "mismatch" => FieldErrorKind::Mismatch,
            "unsupported_type" => FieldErrorKind::UnsupportedType,
            "too_large" => FieldErrorKind::TooLarge,
            "conflict" => FieldErrorKind::Conflict,
            _ => FieldErrorKind::InvalidFormat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.message)
    }
}

/// Field name to message mapping produced by a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. The first violation recorded for a field wins.
    pub fn add(
        &mut self,
        field: impl Into<String>,
        kind: FieldErrorKind,
        message: impl Into<String>,
    ) {
        self.0
            .entry(field.into())
            .or_insert_with(|| FieldError::new(kind, message));
    }

    /// Replace whatever is recorded for a field.
    pub fn set(&mut self, field: impl Into<String>, error: FieldError) {
        self.0.insert(field.into(), error);
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn kind(&self, field: &str) -> Option<FieldErrorKind> {
        self.0.get(field).map(|e| e.kind)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Drop a field's message, as done when the user edits that field.
    pub fn clear(&mut self, field: &str) -> Option<FieldError> {
        self.0.remove(field)
    }

    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// One-line banner text for the whole form.
    pub fn summary(&self) -> String {
        let missing: Vec<&str> = self
            .iter()
            .filter(|(_, e)| e.kind == FieldErrorKind::MissingField)
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return format!("Please fill in all required fields: {}", missing.join(", "));
        }
        self.0
            .values()
            .next()
            .map(|e| e.message.clone())
            .unwrap_or_default()
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, error)| format!("{}: {}", field, error.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

//! Student form validation

use chrono::NaiveDate;

use super::{is_blank, is_valid_email, is_valid_phone, FieldErrorKind, FieldErrors};
use crate::models::{Department, Gender, StudentField, StudentFields};

fn required_message(field: StudentField) -> &'static str {
    match field {
        StudentField::AdmissionNumber => "Admission number is required",
        StudentField::Name => "Name is required",
        StudentField::Email => "Email is required",
        StudentField::MobileNumber => "Mobile number is required",
        StudentField::Department => "Department is required",
        StudentField::Year => "Year is required",
        StudentField::Dob => "Date of birth is required",
        StudentField::Gender => "Gender is required",
        StudentField::Address => "Address is required",
        StudentField::GuardianContact => "Guardian contact is required",
    }
}

/// Validate the add/edit student form.
///
/// Rules:
/// - Every required field must be non-blank
/// - Email must look like `localpart@domain.tld`
/// - Mobile number, and guardian contact when present, must be exactly 10 digits
/// - Department, year (1-4), gender and date of birth must be known values
pub fn validate_student(fields: &StudentFields) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for field in StudentField::REQUIRED {
        if is_blank(fields.get(field)) {
            errors.add(
                field.as_str(),
                FieldErrorKind::MissingField,
                required_message(field),
            );
        }
    }

    let email = fields.email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        errors.add(
            StudentField::Email.as_str(),
            FieldErrorKind::InvalidFormat,
            "Invalid email format.",
        );
    }

    let mobile = fields.mobile_number.trim();
    if !mobile.is_empty() && !is_valid_phone(mobile) {
        errors.add(
            StudentField::MobileNumber.as_str(),
            FieldErrorKind::InvalidFormat,
            "Mobile number must be 10 digits.",
        );
    }

    let guardian = fields.guardian_contact.trim();
    if !guardian.is_empty() && !is_valid_phone(guardian) {
        errors.add(
            StudentField::GuardianContact.as_str(),
            FieldErrorKind::InvalidFormat,
            "Guardian contact must be 10 digits.",
        );
    }

    if !is_blank(&fields.department) && fields.department.parse::<Department>().is_err() {
        errors.add(
            StudentField::Department.as_str(),
            FieldErrorKind::InvalidFormat,
            "Select a department from the list",
        );
    }

    let year = fields.year.trim();
    if !year.is_empty() && !matches!(year.parse::<u8>(), Ok(1..=4)) {
        errors.add(
            StudentField::Year.as_str(),
            FieldErrorKind::InvalidFormat,
            "Year must be between 1 and 4",
        );
    }

    let dob = fields.dob.trim();
    if !dob.is_empty() && NaiveDate::parse_from_str(dob, "%Y-%m-%d").is_err() {
        errors.add(
            StudentField::Dob.as_str(),
            FieldErrorKind::InvalidFormat,
            "Date of birth must be a date (YYYY-MM-DD)",
        );
    }

    // An unknown gender counts as not chosen.
    if !is_blank(&fields.gender) && fields.gender.parse::<Gender>().is_err() {
        errors.add(
            StudentField::Gender.as_str(),
            FieldErrorKind::MissingField,
            required_message(StudentField::Gender),
        );
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> StudentFields {
        StudentFields {
            admission_number: "ADM001".to_string(),
            name: "Ann Lee".to_string(),
            email: "ann@example.com".to_string(),
            mobile_number: "1111111111".to_string(),
            department: "Computer Science".to_string(),
            year: "2".to_string(),
            dob: "2004-03-15".to_string(),
            gender: "Female".to_string(),
            address: "12 Elm Street".to_string(),
            guardian_contact: String::new(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_student(&valid_fields()).is_ok());
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = validate_student(&StudentFields::default()).unwrap_err();
        assert_eq!(errors.len(), StudentField::REQUIRED.len());
        for field in StudentField::REQUIRED {
            assert_eq!(
                errors.kind(field.as_str()),
                Some(FieldErrorKind::MissingField),
                "{} should be flagged",
                field
            );
        }
        assert!(!errors.contains("guardianContact"));
    }

    #[test]
    fn test_blank_whitespace_counts_as_missing() {
        let mut fields = valid_fields();
        fields.address = "   ".to_string();
        let errors = validate_student(&fields).unwrap_err();
        assert_eq!(errors.kind("address"), Some(FieldErrorKind::MissingField));
    }

    #[test]
    fn test_format_errors_reported_together() {
        let mut fields = valid_fields();
        fields.email = "a@b".to_string();
        fields.mobile_number = "12345".to_string();
        fields.guardian_contact = "98765432100".to_string();
        fields.name.clear();
        let errors = validate_student(&fields).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.kind("email"), Some(FieldErrorKind::InvalidFormat));
        assert_eq!(
            errors.kind("mobileNumber"),
            Some(FieldErrorKind::InvalidFormat)
        );
        assert_eq!(
            errors.kind("guardianContact"),
            Some(FieldErrorKind::InvalidFormat)
        );
        assert_eq!(errors.kind("name"), Some(FieldErrorKind::MissingField));
    }

    #[test]
    fn test_enumerated_values_checked() {
        let mut fields = valid_fields();
        fields.department = "Astrology".to_string();
        fields.year = "5".to_string();
        fields.dob = "15/03/2004".to_string();
        fields.gender = "Unknown".to_string();
        let errors = validate_student(&fields).unwrap_err();
        assert_eq!(
            errors.kind("department"),
            Some(FieldErrorKind::InvalidFormat)
        );
        assert_eq!(errors.kind("year"), Some(FieldErrorKind::InvalidFormat));
        assert_eq!(errors.kind("dob"), Some(FieldErrorKind::InvalidFormat));
        assert_eq!(errors.kind("gender"), Some(FieldErrorKind::MissingField));
    }

    #[test]
    fn test_validation_does_not_mutate_input() {
        let fields = StudentFields {
            email: "  not-an-email ".to_string(),
            ..valid_fields()
        };
        let before = fields.clone();
        let _ = validate_student(&fields);
        assert_eq!(fields, before);
    }
}

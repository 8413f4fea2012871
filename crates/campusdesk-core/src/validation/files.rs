//! Upload file constraints

use super::{FieldError, FieldErrorKind};
use crate::models::FileBlob;

const BYTES_PER_MB: u64 = 1024 * 1024;

fn check_size(file: &FileBlob, max_bytes: u64) -> Result<(), FieldError> {
    if file.len() > max_bytes {
        return Err(FieldError::new(
            FieldErrorKind::TooLarge,
            format!(
                "{} exceeds the {} MB upload limit",
                file.file_name,
                max_bytes.div_ceil(BYTES_PER_MB)
            ),
        ));
    }
    Ok(())
}

/// Supporting documents must be PDFs within the upload limit.
pub fn validate_document_file(file: &FileBlob, max_bytes: u64) -> Result<(), FieldError> {
    if !file.is_pdf() {
        return Err(FieldError::new(
            FieldErrorKind::UnsupportedType,
            "Only PDF documents are allowed",
        ));
    }
    check_size(file, max_bytes)
}

/// Photos must declare an `image/*` type and fit the upload limit.
pub fn validate_photo_file(file: &FileBlob, max_bytes: u64) -> Result<(), FieldError> {
    if !file.is_image() {
        return Err(FieldError::new(
            FieldErrorKind::UnsupportedType,
            "Only image files are allowed for the photo",
        ));
    }
    check_size(file, max_bytes)
}

//! Attachment tracker
//!
//! Reconciles what the user intends to keep, add or remove for a student's photo
//! and supporting documents before anything is sent to the server. A stored
//! document is either retained or deleted; files picked in this session are new.

use crate::models::{DocumentId, FileBlob, StoredDocument, StudentRecord};
use crate::validation::{validate_document_file, validate_photo_file, FieldErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentError {
    #[error("{file_name}: {message}")]
    UnsupportedType { file_name: String, message: String },

    #[error("{file_name}: {message}")]
    TooLarge { file_name: String, message: String },

    #[error("No new document at index {index} ({len} selected)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Document {0} is not attached to this student")]
    UnknownDocument(DocumentId),
}

impl AttachmentError {
    fn rejected(file: &FileBlob, kind: FieldErrorKind, message: String) -> Self {
        let file_name = file.file_name.clone();
        match kind {
            FieldErrorKind::TooLarge => AttachmentError::TooLarge { file_name, message },
            _ => AttachmentError::UnsupportedType { file_name, message },
        }
    }
}

/// What happens to the student's photo on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhotoAction {
    #[default]
    Unchanged,
    Replace(FileBlob),
    Delete,
}

/// Attachment part of a create/update submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub new_documents: Vec<FileBlob>,
    /// Present only when at least one stored document is being removed.
    pub deleted_document_ids: Option<Vec<DocumentId>>,
    pub photo: PhotoAction,
}

impl SubmissionPayload {
    /// `deletedDocuments` multipart value: a JSON array of identifiers.
    pub fn deleted_documents_json(&self) -> Option<String> {
        self.deleted_document_ids.as_ref().map(|ids| {
            let ids: Vec<&str> = ids.iter().map(DocumentId::as_str).collect();
            serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
        })
    }

    pub fn deletes_photo(&self) -> bool {
        self.photo == PhotoAction::Delete
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentTracker {
    new_documents: Vec<FileBlob>,
    existing: Vec<StoredDocument>,
    deleted: Vec<DocumentId>,
    photo: PhotoAction,
    has_stored_photo: bool,
    max_upload_bytes: u64,
}

impl AttachmentTracker {
    /// Empty tracker for a new student.
    pub fn new(max_upload_bytes: u64) -> Self {
        Self {
            new_documents: Vec::new(),
            existing: Vec::new(),
            deleted: Vec::new(),
            photo: PhotoAction::Unchanged,
            has_stored_photo: false,
            max_upload_bytes,
        }
    }

    /// Tracker seeded from the record being edited: every stored document is retained.
    pub fn for_record(record: &StudentRecord, max_upload_bytes: u64) -> Self {
        Self {
            existing: record.documents.clone(),
            has_stored_photo: record.photo.is_some(),
            ..Self::new(max_upload_bytes)
        }
    }

    /// Append a batch of selected documents. Any rejected file refuses the whole batch.
    pub fn add_documents(&mut self, files: Vec<FileBlob>) -> Result<(), AttachmentError> {
        for file in &files {
            validate_document_file(file, self.max_upload_bytes)
                .map_err(|e| AttachmentError::rejected(file, e.kind, e.message))?;
        }
        self.new_documents.extend(files);
        Ok(())
    }

    pub fn remove_new_document(&mut self, index: usize) -> Result<FileBlob, AttachmentError> {
        if index >= self.new_documents.len() {
            return Err(AttachmentError::IndexOutOfRange {
                index,
                len: self.new_documents.len(),
            });
        }
        Ok(self.new_documents.remove(index))
    }

    /// Mark a stored document for deletion. Marking it twice is a no-op.
    pub fn remove_existing_document(&mut self, id: &DocumentId) -> Result<(), AttachmentError> {
        if !self.existing.iter().any(|doc| &doc.id == id) {
            return Err(AttachmentError::UnknownDocument(id.clone()));
        }
        if !self.deleted.contains(id) {
            self.deleted.push(id.clone());
        }
        Ok(())
    }

    pub fn set_photo(&mut self, file: FileBlob) -> Result<(), AttachmentError> {
        validate_photo_file(&file, self.max_upload_bytes)
            .map_err(|e| AttachmentError::rejected(&file, e.kind, e.message))?;
        self.photo = PhotoAction::Replace(file);
        Ok(())
    }

    pub fn clear_photo(&mut self) {
        self.photo = if self.has_stored_photo {
            PhotoAction::Delete
        } else {
            PhotoAction::Unchanged
        };
    }

    pub fn new_documents(&self) -> &[FileBlob] {
        &self.new_documents
    }

    pub fn retained_documents(&self) -> impl Iterator<Item = &StoredDocument> {
        self.existing
            .iter()
            .filter(|doc| !self.deleted.contains(&doc.id))
    }

    pub fn retained_document_ids(&self) -> Vec<&DocumentId> {
        self.retained_documents().map(|doc| &doc.id).collect()
    }

    pub fn deleted_document_ids(&self) -> &[DocumentId] {
        &self.deleted
    }

    pub fn photo_action(&self) -> &PhotoAction {
        &self.photo
    }

    /// Whether a photo will exist after submit.
    pub fn shows_photo(&self) -> bool {
        match self.photo {
            PhotoAction::Replace(_) => true,
            PhotoAction::Delete => false,
            PhotoAction::Unchanged => self.has_stored_photo,
        }
    }

    pub fn to_submission_payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            new_documents: self.new_documents.clone(),
            deleted_document_ids: (!self.deleted.is_empty()).then(|| self.deleted.clone()),
            photo: self.photo.clone(),
        }
    }
}

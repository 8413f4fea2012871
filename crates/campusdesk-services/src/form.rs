//! Student form controller
//!
//! One controller serves both adding and editing a student. It owns the
//! entered text, the field errors and the attachment tracker, and allows a
//! single submission in flight at a time.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use campusdesk_core::models::{
    DocumentId, FileBlob, StudentField, StudentFields, StudentId, StudentRecord, StudentSubmission,
};
use campusdesk_core::validation::validate_student;
use campusdesk_core::{
    AttachmentError, AttachmentTracker, ClientError, FieldErrorKind, FieldErrors, StudentBackend,
    GENERIC_FAILURE_MESSAGE,
};

use crate::inflight::InFlight;
use crate::notification::{log_client_error, Notification};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(StudentId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    /// Freshly opened; `prefilled` when seeded from an existing record.
    Idle { prefilled: bool },
    Editing,
    Validating,
    Submitting,
    Success,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(Notification),
    /// Client-side validation blocked the submit; nothing was sent.
    Rejected(FieldErrors),
    Failed {
        error: ClientError,
        notification: Notification,
    },
    /// The form was torn down before the response arrived.
    Discarded,
}

pub struct StudentFormController {
    backend: Arc<dyn StudentBackend>,
    mode: FormMode,
    fields: StudentFields,
    errors: FieldErrors,
    attachments: AttachmentTracker,
    state: FormState,
    banner: Option<String>,
    max_upload_bytes: u64,
    in_flight: InFlight<()>,
    lifetime: CancellationToken,
}

impl StudentFormController {
    pub fn open_create(
        backend: Arc<dyn StudentBackend>,
        max_upload_bytes: u64,
        lifetime: CancellationToken,
    ) -> Self {
        Self {
            backend,
            mode: FormMode::Create,
            fields: StudentFields::default(),
            errors: FieldErrors::new(),
            attachments: AttachmentTracker::new(max_upload_bytes),
            state: FormState::Idle { prefilled: false },
            banner: None,
            max_upload_bytes,
            in_flight: InFlight::new(),
            lifetime,
        }
    }

    /// Form pre-populated from `record`, with all its stored documents retained.
    pub fn open_edit(
        backend: Arc<dyn StudentBackend>,
        record: &StudentRecord,
        max_upload_bytes: u64,
        lifetime: CancellationToken,
    ) -> Self {
        Self {
            mode: FormMode::Edit(record.id.clone()),
            fields: StudentFields::from_record(record),
            attachments: AttachmentTracker::for_record(record, max_upload_bytes),
            state: FormState::Idle { prefilled: true },
            ..Self::open_create(backend, max_upload_bytes, lifetime)
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn fields(&self) -> &StudentFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn attachments(&self) -> &AttachmentTracker {
        &self.attachments
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Form-level error message, if any.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_pending()
    }

    pub fn lifetime(&self) -> &CancellationToken {
        &self.lifetime
    }

    /// Update one field; its error, if any, goes away.
    pub fn set_field(&mut self, field: StudentField, value: impl Into<String>) {
        self.fields.set(field, value);
        self.errors.clear(field.as_str());
        self.touch();
    }

    pub fn add_documents(&mut self, files: Vec<FileBlob>) -> Result<(), AttachmentError> {
        let result = self.attachments.add_documents(files);
        self.report_attachment(result)
    }

    pub fn remove_new_document(&mut self, index: usize) -> Result<FileBlob, AttachmentError> {
        let removed = self.attachments.remove_new_document(index)?;
        self.touch();
        Ok(removed)
    }

    pub fn remove_existing_document(&mut self, id: &DocumentId) -> Result<(), AttachmentError> {
        let result = self.attachments.remove_existing_document(id);
        self.report_attachment(result)
    }

    pub fn set_photo(&mut self, file: FileBlob) -> Result<(), AttachmentError> {
        let result = self.attachments.set_photo(file);
        self.report_attachment(result)
    }

    pub fn clear_photo(&mut self) {
        self.attachments.clear_photo();
        self.touch();
    }

    /// Validate and send the form.
    ///
    /// Fails with `SubmissionInFlight` while an earlier submission is still
    /// out. If this future is dropped the request keeps running; collect its
    /// result with [`settle`](Self::settle).
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ClientError> {
        if self.in_flight.is_pending() {
            return Err(ClientError::SubmissionInFlight);
        }

        self.state = FormState::Validating;
        self.banner = None;
        if let Err(errors) = validate_student(&self.fields) {
            tracing::debug!(fields = %errors, "Student form blocked by validation");
            self.banner = Some(errors.summary());
            self.errors = errors.clone();
            self.state = FormState::Editing;
            return Ok(SubmitOutcome::Rejected(errors));
        }
        self.errors.clear_all();

        let payload = self.attachments.to_submission_payload();
        let submission = StudentSubmission::new(&self.fields, payload);
        let backend = Arc::clone(&self.backend);
        let mode = self.mode.clone();
        self.in_flight.start(async move {
            match mode {
                FormMode::Create => backend.create_student(submission).await,
                FormMode::Edit(id) => backend.update_student(&id, submission).await,
            }
        })?;
        self.state = FormState::Submitting;

        Ok(self.settle().await.unwrap_or(SubmitOutcome::Discarded))
    }

    /// Wait for the pending submission, if any, and apply its result.
    pub async fn settle(&mut self) -> Option<SubmitOutcome> {
        let result = self.in_flight.wait().await?;

        if self.lifetime.is_cancelled() {
            tracing::debug!("Discarding student form response after teardown");
            return Some(SubmitOutcome::Discarded);
        }

        match result {
            Ok(()) => {
                let message = match &self.mode {
                    FormMode::Create => "Student added successfully!",
                    FormMode::Edit(_) => "Student updated successfully!",
                };
                match &self.mode {
                    FormMode::Create => tracing::info!("Student created"),
                    FormMode::Edit(id) => tracing::info!(student_id = %id, "Student updated"),
                }
                self.state = FormState::Success;
                Some(SubmitOutcome::Saved(Notification::success(message)))
            }
            Err(error) => {
                log_client_error(&error, "save_student");
                let message = error
                    .server_message()
                    .unwrap_or(GENERIC_FAILURE_MESSAGE)
                    .to_string();
                if let Some(field) = ClientError::conflict_field(&message) {
                    let field = match field {
                        "mobile" => StudentField::MobileNumber,
                        _ => StudentField::Email,
                    };
                    self.errors
                        .add(field.as_str(), FieldErrorKind::Conflict, message.clone());
                }
                self.banner = Some(message.clone());
                self.state = FormState::Failed(message.clone());
                Some(SubmitOutcome::Failed {
                    error,
                    notification: Notification::error(message),
                })
            }
        }
    }

    /// Back to an empty create form. Refused while a submission is out.
    pub fn reset(&mut self) -> Result<(), ClientError> {
        if self.in_flight.is_pending() {
            return Err(ClientError::SubmissionInFlight);
        }
        self.mode = FormMode::Create;
        self.fields = StudentFields::default();
        self.errors.clear_all();
        self.attachments = AttachmentTracker::new(self.max_upload_bytes);
        self.state = FormState::Idle { prefilled: false };
        self.banner = None;
        Ok(())
    }

    /// Stop applying responses to this form.
    pub fn teardown(&self) {
        self.lifetime.cancel();
    }

    fn touch(&mut self) {
        if self.state != FormState::Submitting {
            self.state = FormState::Editing;
        }
    }

    fn report_attachment<T>(
        &mut self,
        result: Result<T, AttachmentError>,
    ) -> Result<T, AttachmentError> {
        match &result {
            Ok(_) => {
                self.banner = None;
                self.touch();
            }
            Err(e) => {
                tracing::debug!(error = %e, "Attachment rejected");
                self.banner = Some(e.to_string());
            }
        }
        result
    }
}

//! Student page
//!
//! Top-level shell for the student screen: the roster over the collection and
//! at most one open add/edit form. Every successful mutation ends in a single
//! collection refresh.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use campusdesk_core::models::StudentId;
use campusdesk_core::{ClientConfig, ClientError, StudentBackend};

use crate::collection::StudentCollection;
use crate::form::{StudentFormController, SubmitOutcome};
use crate::notification::Notification;
use crate::roster::RosterController;

pub struct StudentPage {
    backend: Arc<dyn StudentBackend>,
    roster: RosterController,
    form: Option<StudentFormController>,
    max_upload_bytes: u64,
    lifetime: CancellationToken,
}

impl StudentPage {
    pub fn new(backend: Arc<dyn StudentBackend>, config: &ClientConfig) -> Self {
        let lifetime = CancellationToken::new();
        let collection = StudentCollection::new(Arc::clone(&backend), lifetime.child_token());
        let roster = RosterController::new(collection, config.page_size, lifetime.child_token());
        Self {
            backend,
            roster,
            form: None,
            max_upload_bytes: config.max_upload_bytes(),
            lifetime,
        }
    }

    /// Initial fetch. On failure the page stays usable with an empty roster.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.roster.refresh().await
    }

    pub fn roster(&self) -> &RosterController {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut RosterController {
        &mut self.roster
    }

    pub fn form(&self) -> Option<&StudentFormController> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut StudentFormController> {
        self.form.as_mut()
    }

    pub fn open_create(&mut self) -> &mut StudentFormController {
        self.close_form();
        let form = StudentFormController::open_create(
            Arc::clone(&self.backend),
            self.max_upload_bytes,
            self.lifetime.child_token(),
        );
        self.form.insert(form)
    }

    /// Open the form pre-populated from the cached record. `None` if the
    /// student is not in the collection.
    pub fn open_edit(&mut self, id: &StudentId) -> Option<&mut StudentFormController> {
        let record = self.roster.edit_target(id)?;
        self.close_form();
        let form = StudentFormController::open_edit(
            Arc::clone(&self.backend),
            &record,
            self.max_upload_bytes,
            self.lifetime.child_token(),
        );
        Some(self.form.insert(form))
    }

    /// Close the open form. A response still in flight for it is ignored.
    pub fn close_form(&mut self) {
        if let Some(form) = self.form.take() {
            form.teardown();
        }
    }

    /// Submit the open form. On success the form closes and the collection is refreshed.
    pub async fn submit_form(&mut self) -> Result<SubmitOutcome, ClientError> {
        let form = self.form.as_mut().ok_or(ClientError::FormClosed)?;
        let outcome = form.submit().await?;
        self.finish_submit(&outcome).await;
        Ok(outcome)
    }

    /// Collect a submission whose `submit_form` call was abandoned.
    pub async fn settle_form(&mut self) -> Result<Option<SubmitOutcome>, ClientError> {
        let form = self.form.as_mut().ok_or(ClientError::FormClosed)?;
        let outcome = form.settle().await;
        if let Some(outcome) = &outcome {
            self.finish_submit(outcome).await;
        }
        Ok(outcome)
    }

    pub async fn confirm_delete(&mut self) -> Option<Notification> {
        self.roster.confirm_delete().await
    }

    /// Stop applying late responses anywhere on the page.
    pub fn teardown(&mut self) {
        self.lifetime.cancel();
        self.form = None;
    }

    async fn finish_submit(&mut self, outcome: &SubmitOutcome) {
        if let SubmitOutcome::Saved(_) = outcome {
            self.close_form();
            // Failure is logged by the collection; the previous records stay visible.
            let _ = self.roster.refresh().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormMode;
    use crate::test_helpers::{students, valid_fields, MockBackend};
    use campusdesk_core::models::StudentField;

    async fn page_with(backend: &MockBackend) -> StudentPage {
        let mut page = StudentPage::new(Arc::new(backend.clone()), &ClientConfig::default());
        page.load().await.unwrap();
        page
    }

    #[tokio::test]
    async fn test_create_closes_form_and_refreshes() {
        let backend = MockBackend::with_students(students(2));
        let mut page = page_with(&backend).await;

        let form = page.open_create();
        let fields = valid_fields();
        for field in StudentField::ALL {
            form.set_field(field, fields.get(field));
        }
        let outcome = page.submit_form().await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert!(page.form().is_none());
        assert_eq!(backend.list_calls(), 2);
        assert_eq!(page.roster().collection().len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_form_open_without_refresh() {
        let backend = MockBackend::with_students(students(1));
        let mut page = page_with(&backend).await;
        page.open_create();

        let outcome = page.submit_form().await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert!(page.form().is_some());
        assert_eq!(backend.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_open_edit_prefills_from_collection() {
        let backend = MockBackend::with_students(students(2));
        let mut page = page_with(&backend).await;

        let form = page.open_edit(&StudentId::new("s02")).unwrap();
        assert_eq!(form.mode(), &FormMode::Edit(StudentId::new("s02")));
        assert_eq!(form.fields().name, "Student 02");

        assert!(page.open_edit(&StudentId::new("missing")).is_none());
        assert!(page.form().is_some());
    }

    #[tokio::test]
    async fn test_submit_without_form_fails() {
        let backend = MockBackend::new();
        let mut page = page_with(&backend).await;
        assert_eq!(page.submit_form().await, Err(ClientError::FormClosed));
    }

    #[tokio::test]
    async fn test_close_form_tears_it_down() {
        let backend = MockBackend::new();
        let mut page = page_with(&backend).await;
        let lifetime = page.open_create().lifetime().clone();

        page.close_form();

        assert!(lifetime.is_cancelled());
        assert!(page.form().is_none());
    }

    #[tokio::test]
    async fn test_teardown_cancels_children() {
        let backend = MockBackend::with_students(students(1));
        let mut page = page_with(&backend).await;
        page.teardown();

        page.load().await.unwrap();
        assert_eq!(backend.list_calls(), 1);
    }
}

//! Roster controller
//!
//! The student table: a filtered and paginated view over the collection, plus
//! the per-row actions (detail, edit, delete, download). Actions that change
//! server state always end with a refresh of the collection.

use std::path::Path;
use tokio_util::sync::CancellationToken;

use campusdesk_core::models::{DocumentId, StudentId, StudentRecord};
use campusdesk_core::ClientError;

use crate::collection::StudentCollection;
use crate::notification::{log_client_error, Notification};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One rendered page of the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub records: Vec<&'a StudentRecord>,
    /// 1-based current page, already clamped.
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    /// 1-based index of the first row shown, 0 when nothing matches.
    pub first_index: usize,
    pub last_index: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

pub struct RosterController {
    collection: StudentCollection,
    search_term: String,
    page: usize,
    page_size: usize,
    menu_open: Option<StudentId>,
    viewing: Option<StudentId>,
    pending_delete: Option<StudentId>,
    lifetime: CancellationToken,
}

impl RosterController {
    pub fn new(
        collection: StudentCollection,
        page_size: usize,
        lifetime: CancellationToken,
    ) -> Self {
        Self {
            collection,
            search_term: String::new(),
            page: 1,
            page_size: page_size.max(1),
            menu_open: None,
            viewing: None,
            pending_delete: None,
            lifetime,
        }
    }

    pub fn collection(&self) -> &StudentCollection {
        &self.collection
    }

    pub fn is_loading(&self) -> bool {
        self.collection.is_loading()
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.collection.refresh().await
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Changing the search term always returns to the first page.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    /// Records whose name or mobile number contains the search term, ignoring case.
    pub fn filtered(&self) -> Vec<&StudentRecord> {
        let term = self.search_term.to_lowercase();
        self.collection
            .records()
            .iter()
            .filter(|record| {
                term.is_empty()
                    || record.name.to_lowercase().contains(&term)
                    || record.mobile_number.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size).max(1)
    }

    /// Current page, clamped to what the filtered collection can fill.
    pub fn page(&self) -> usize {
        self.page.clamp(1, self.total_pages())
    }

    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.total_pages());
        self.page
    }

    pub fn next_page(&mut self) -> usize {
        let page = self.page();
        self.go_to_page(page + 1)
    }

    pub fn previous_page(&mut self) -> usize {
        let page = self.page();
        self.go_to_page(page.saturating_sub(1))
    }

    pub fn view(&self) -> PageView<'_> {
        let filtered = self.filtered();
        let filtered_count = filtered.len();
        let total_pages = filtered_count.div_ceil(self.page_size).max(1);
        let page = self.page.clamp(1, total_pages);
        let start = (page - 1) * self.page_size;
        let records: Vec<&StudentRecord> = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();
        let (first_index, last_index) = if records.is_empty() {
            (0, 0)
        } else {
            (start + 1, start + records.len())
        };

        PageView {
            records,
            page,
            total_pages,
            filtered_count,
            first_index,
            last_index,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }

    /// Open the action menu for `id`, or close it if it is already open.
    pub fn toggle_menu(&mut self, id: &StudentId) {
        if self.menu_open.as_ref() == Some(id) {
            self.menu_open = None;
        } else {
            self.menu_open = Some(id.clone());
        }
    }

    pub fn menu_open(&self) -> Option<&StudentId> {
        self.menu_open.as_ref()
    }

    pub fn open_detail(&mut self, id: &StudentId) -> Option<&StudentRecord> {
        self.menu_open = None;
        self.viewing = self.collection.get(id).map(|record| record.id.clone());
        self.viewing()
    }

    pub fn viewing(&self) -> Option<&StudentRecord> {
        self.viewing.as_ref().and_then(|id| self.collection.get(id))
    }

    pub fn close_detail(&mut self) {
        self.viewing = None;
    }

    /// Record to pre-populate the edit form with.
    pub fn edit_target(&mut self, id: &StudentId) -> Option<StudentRecord> {
        self.menu_open = None;
        self.viewing = None;
        self.collection.get(id).cloned()
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: &StudentId) -> Option<&StudentRecord> {
        self.menu_open = None;
        self.pending_delete = self.collection.get(id).map(|record| record.id.clone());
        self.pending_delete()
    }

    pub fn pending_delete(&self) -> Option<&StudentRecord> {
        self.pending_delete
            .as_ref()
            .and_then(|id| self.collection.get(id))
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the student awaiting confirmation, then refresh whatever the outcome.
    ///
    /// Returns `None` when nothing was pending or the roster was torn down
    /// while the request was out.
    pub async fn confirm_delete(&mut self) -> Option<Notification> {
        let id = self.pending_delete.take()?;
        let result = self.collection.backend().delete_student(&id).await;

        if self.lifetime.is_cancelled() {
            tracing::debug!(student_id = %id, "Discarding delete response after teardown");
            return None;
        }

        let notification = match result {
            Ok(()) => {
                tracing::info!(student_id = %id, "Student deleted");
                Notification::success("Student deleted successfully!")
            }
            Err(e) => {
                log_client_error(&e, "delete");
                Notification::error("Error deleting student")
            }
        };
        // Failure is already logged; the roster keeps the previous records.
        let _ = self.collection.refresh().await;
        Some(notification)
    }

    /// Fetch the server archive for `id` and save it under `dir` as
    /// `{admissionNumber}_data.zip`.
    pub async fn download(&mut self, id: &StudentId, dir: &Path) -> Option<Notification> {
        self.menu_open = None;
        let Some(record) = self.collection.get(id).cloned() else {
            tracing::warn!(student_id = %id, "Download requested for unknown student");
            return Some(Notification::error("Error downloading student data"));
        };

        let result = self.collection.backend().download_student_archive(id).await;
        if self.lifetime.is_cancelled() {
            tracing::debug!(student_id = %id, "Discarding download after teardown");
            return None;
        }

        let archive = match result {
            Ok(archive) => archive,
            Err(e) => {
                log_client_error(&e, "download");
                return Some(Notification::error("Error downloading student data"));
            }
        };

        let path = dir.join(record.archive_file_name());
        if let Err(e) = tokio::fs::write(&path, &archive).await {
            tracing::error!(path = %path.display(), error = %e, "Failed to save student archive");
            return Some(Notification::error("Error downloading student data"));
        }
        tracing::info!(
            student_id = %id,
            path = %path.display(),
            bytes = archive.len(),
            "Student archive saved"
        );
        Some(Notification::success(format!("Downloaded data for {}", record.name)))
    }

    pub fn document_url(&self, id: &StudentId, document: &DocumentId) -> String {
        self.collection.backend().document_url(id, document)
    }

    pub fn teardown(&self) {
        self.lifetime.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{student, students, MockBackend};
    use std::sync::Arc;

    async fn roster_with(backend: &MockBackend) -> RosterController {
        let lifetime = CancellationToken::new();
        let collection = StudentCollection::new(Arc::new(backend.clone()), lifetime.child_token());
        let mut roster = RosterController::new(collection, DEFAULT_PAGE_SIZE, lifetime);
        roster.refresh().await.unwrap();
        roster
    }

    fn names(view: &PageView<'_>) -> Vec<String> {
        view.records.iter().map(|r| r.name.clone()).collect()
    }

    #[tokio::test]
    async fn test_filter_matches_name_case_insensitively() {
        let backend = MockBackend::with_students(vec![
            student("a", "Ann", "1111111111"),
            student("b", "Bob", "2222222222"),
        ]);
        let mut roster = roster_with(&backend).await;

        roster.set_search("ann");
        assert_eq!(names(&roster.view()), vec!["Ann"]);

        roster.set_search("ANN");
        assert_eq!(names(&roster.view()), vec!["Ann"]);

        roster.set_search("");
        assert_eq!(roster.view().filtered_count, 2);
    }

    #[tokio::test]
    async fn test_filter_keeps_surrounding_whitespace() {
        let backend = MockBackend::with_students(vec![
            student("a", "Ann", "1111111111"),
            student("b", "Ann Lee", "2222222222"),
        ]);
        let mut roster = roster_with(&backend).await;

        roster.set_search("Ann ");
        assert_eq!(names(&roster.view()), vec!["Ann Lee"]);

        roster.set_search(" ");
        assert_eq!(names(&roster.view()), vec!["Ann Lee"]);
    }

    #[tokio::test]
    async fn test_filter_matches_mobile_number() {
        let backend = MockBackend::with_students(vec![
            student("a", "Ann", "1111111111"),
            student("b", "Bob", "2222222222"),
        ]);
        let mut roster = roster_with(&backend).await;

        roster.set_search("2222");
        assert_eq!(names(&roster.view()), vec!["Bob"]);
    }

    #[tokio::test]
    async fn test_pagination_and_clamping() {
        let backend = MockBackend::with_students(students(25));
        let mut roster = roster_with(&backend).await;

        let view = roster.view();
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.records.len(), 10);
        assert_eq!((view.first_index, view.last_index), (1, 10));
        assert!(!view.has_previous);
        assert!(view.has_next);

        assert_eq!(roster.go_to_page(3), 3);
        let view = roster.view();
        assert_eq!(view.records.len(), 5);
        assert_eq!((view.first_index, view.last_index), (21, 25));
        assert!(!view.has_next);

        assert_eq!(roster.go_to_page(4), 3);
        assert_eq!(roster.go_to_page(0), 1);
        assert_eq!(roster.next_page(), 2);
        assert_eq!(roster.previous_page(), 1);
        assert_eq!(roster.previous_page(), 1);
    }

    #[tokio::test]
    async fn test_search_resets_page_and_empty_result_has_one_page() {
        let backend = MockBackend::with_students(students(25));
        let mut roster = roster_with(&backend).await;
        roster.go_to_page(3);

        roster.set_search("Student 2");
        assert_eq!(roster.page(), 1);

        roster.set_search("nobody");
        let view = roster.view();
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.filtered_count, 0);
        assert_eq!((view.first_index, view.last_index), (0, 0));
    }

    #[tokio::test]
    async fn test_menu_open_for_one_row_at_a_time() {
        let backend = MockBackend::with_students(students(2));
        let mut roster = roster_with(&backend).await;
        let first = StudentId::new("s01");
        let second = StudentId::new("s02");

        roster.toggle_menu(&first);
        assert_eq!(roster.menu_open(), Some(&first));
        roster.toggle_menu(&second);
        assert_eq!(roster.menu_open(), Some(&second));
        roster.toggle_menu(&second);
        assert_eq!(roster.menu_open(), None);

        roster.toggle_menu(&first);
        assert_eq!(roster.open_detail(&first).unwrap().name, "Student 01");
        assert_eq!(roster.menu_open(), None);
        roster.close_detail();
        assert!(roster.viewing().is_none());
    }

    #[tokio::test]
    async fn test_confirm_delete_refreshes_collection() {
        let backend = MockBackend::with_students(students(3));
        let mut roster = roster_with(&backend).await;
        let id = StudentId::new("s02");

        assert!(roster.request_delete(&id).is_some());
        let notification = roster.confirm_delete().await.unwrap();

        assert_eq!(
            notification,
            Notification::success("Student deleted successfully!")
        );
        assert_eq!(backend.deleted(), vec![id.clone()]);
        assert!(roster.collection().get(&id).is_none());
        assert_eq!(backend.list_calls(), 2);
        assert!(roster.pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_delete_of_missing_student_reports_error_and_refetches() {
        let backend = MockBackend::with_students(students(3));
        let mut roster = roster_with(&backend).await;
        let id = StudentId::new("s02");
        roster.request_delete(&id);

        backend.remove_student("s02");
        let notification = roster.confirm_delete().await.unwrap();

        assert!(notification.is_error());
        assert_eq!(notification.message, "Error deleting student");
        assert_eq!(backend.list_calls(), 2);
        assert!(roster.collection().get(&id).is_none());
        assert_eq!(roster.collection().len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_delete_sends_nothing() {
        let backend = MockBackend::with_students(students(1));
        let mut roster = roster_with(&backend).await;
        roster.request_delete(&StudentId::new("s01"));
        roster.cancel_delete();

        assert!(roster.confirm_delete().await.is_none());
        assert!(backend.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_download_saves_archive() {
        let backend = MockBackend::with_students(students(1));
        let mut roster = roster_with(&backend).await;
        let dir = tempfile::tempdir().unwrap();

        let notification = roster
            .download(&StudentId::new("s01"), dir.path())
            .await
            .unwrap();

        assert_eq!(notification.message, "Downloaded data for Student 01");
        let saved = std::fs::read(dir.path().join("ADM-S01_data.zip")).unwrap();
        assert_eq!(saved, b"PK-archive-s01");
    }

    #[tokio::test]
    async fn test_download_failure_reports_error() {
        let backend = MockBackend::with_students(students(1));
        let mut roster = roster_with(&backend).await;
        let dir = tempfile::tempdir().unwrap();
        backend.fail_next_with(ClientError::Server {
            status: 500,
            message: None,
        });

        let notification = roster
            .download(&StudentId::new("s01"), dir.path())
            .await
            .unwrap();

        assert_eq!(
            notification,
            Notification::error("Error downloading student data")
        );
        assert!(!dir.path().join("ADM-S01_data.zip").exists());
    }

    #[tokio::test]
    async fn test_delete_after_teardown_is_discarded() {
        let backend = MockBackend::with_students(students(2));
        let mut roster = roster_with(&backend).await;
        roster.request_delete(&StudentId::new("s01"));
        roster.teardown();

        assert!(roster.confirm_delete().await.is_none());
        assert_eq!(backend.list_calls(), 1);
        assert_eq!(roster.collection().len(), 2);
    }

    #[tokio::test]
    async fn test_document_url() {
        let backend = MockBackend::with_students(students(1));
        let roster = roster_with(&backend).await;
        assert_eq!(
            roster.document_url(&StudentId::new("s01"), &DocumentId::new("d1")),
            "http://mock/api/students/s01/document/d1"
        );
    }
}

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use campusdesk_core::models::{
    DocumentId, LoginRequest, LoginResponse, SignupRequest, StoredDocument, StudentId,
    StudentRecord, StudentSubmission, UserProfile,
};
use campusdesk_core::{AuthBackend, ClientError, PhotoAction, StudentBackend};

#[derive(Default)]
struct MockState {
    students: Vec<StudentRecord>,
    next_document: usize,
    list_calls: usize,
    created: Vec<StudentSubmission>,
    updated: Vec<(StudentId, StudentSubmission)>,
    deleted: Vec<StudentId>,
    downloads: Vec<StudentId>,
    signups: Vec<SignupRequest>,
    logins: Vec<LoginRequest>,
    fail_next: Option<ClientError>,
    fail_list: Option<ClientError>,
}

/// In-memory stand-in for the REST API. Clones share state.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_students(students: Vec<StudentRecord>) -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().students = students;
        backend
    }

    /// Mutating requests wait for a permit from `release` before completing.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    /// The next mutating request (create, update, delete, download, signup, login) fails.
    pub fn fail_next_with(&self, err: ClientError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    /// The next list request fails.
    pub fn fail_list_with(&self, err: ClientError) {
        self.state.lock().unwrap().fail_list = Some(err);
    }

    pub fn remove_student(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .students
            .retain(|s| s.id.as_str() != id);
    }

    pub fn students(&self) -> Vec<StudentRecord> {
        self.state.lock().unwrap().students.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn created(&self) -> Vec<StudentSubmission> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn updated(&self) -> Vec<(StudentId, StudentSubmission)> {
        self.state.lock().unwrap().updated.clone()
    }

    pub fn deleted(&self) -> Vec<StudentId> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn downloads(&self) -> Vec<StudentId> {
        self.state.lock().unwrap().downloads.clone()
    }

    pub fn signups(&self) -> Vec<SignupRequest> {
        self.state.lock().unwrap().signups.clone()
    }

    pub fn logins(&self) -> Vec<LoginRequest> {
        self.state.lock().unwrap().logins.clone()
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn take_failure(&self) -> Result<(), ClientError> {
        match self.state.lock().unwrap().fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn not_found() -> ClientError {
    ClientError::Server {
        status: 404,
        message: Some("Student not found".to_string()),
    }
}

// Enumerated fields are stored only when they carry the exact wire name, like
// the server's schema enums.
fn apply_submission(
    state: &mut MockState,
    record: &mut StudentRecord,
    submission: &StudentSubmission,
) {
    let field = |name: &str| submission.field(name).unwrap_or_default().to_string();
    let wire = |name: &str| serde_json::Value::String(field(name));
    record.admission_number = field("admissionNumber");
    record.name = field("name");
    record.email = field("email");
    record.mobile_number = field("mobileNumber");
    if let Ok(department) = serde_json::from_value(wire("department")) {
        record.department = department;
    }
    if let Ok(year) = field("year").parse() {
        record.year = year;
    }
    if let Ok(gender) = serde_json::from_value(wire("gender")) {
        record.gender = gender;
    }
    record.address = field("address");
    let guardian = field("guardianContact");
    record.guardian_contact = (!guardian.is_empty()).then_some(guardian);

    let attachments = &submission.attachments;
    if let Some(deleted) = &attachments.deleted_document_ids {
        record.documents.retain(|doc| !deleted.contains(&doc.id));
    }
    for file in &attachments.new_documents {
        state.next_document += 1;
        record.documents.push(StoredDocument {
            id: DocumentId::new(format!("doc-{}", state.next_document)),
            name: file.file_name.clone(),
            path: Some(format!("uploads/documents/{}", file.file_name)),
        });
    }
    match &attachments.photo {
        PhotoAction::Unchanged => {}
        PhotoAction::Replace(file) => {
            record.photo = Some(format!("/uploads/photos/{}", file.file_name));
        }
        PhotoAction::Delete => record.photo = None,
    }
}

#[async_trait]
impl StudentBackend for MockBackend {
    async fn list_students(&self) -> Result<Vec<StudentRecord>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if let Some(err) = state.fail_list.take() {
            return Err(err);
        }
        Ok(state.students.clone())
    }

    async fn create_student(&self, submission: StudentSubmission) -> Result<(), ClientError> {
        self.pass_gate().await;
        self.take_failure()?;
        let mut state = self.state.lock().unwrap();
        let id = format!("new-{}", state.created.len() + 1);
        let mut record = crate::test_helpers::fixtures::student(&id, "", "");
        apply_submission(&mut state, &mut record, &submission);
        state.students.push(record);
        state.created.push(submission);
        Ok(())
    }

    async fn update_student(
        &self,
        id: &StudentId,
        submission: StudentSubmission,
    ) -> Result<(), ClientError> {
        self.pass_gate().await;
        self.take_failure()?;
        let mut state = self.state.lock().unwrap();
        let position = state
            .students
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(not_found)?;
        let mut record = state.students[position].clone();
        apply_submission(&mut state, &mut record, &submission);
        state.students[position] = record;
        state.updated.push((id.clone(), submission));
        Ok(())
    }

    async fn delete_student(&self, id: &StudentId) -> Result<(), ClientError> {
        self.pass_gate().await;
        self.take_failure()?;
        let mut state = self.state.lock().unwrap();
        let before = state.students.len();
        state.students.retain(|s| &s.id != id);
        if state.students.len() == before {
            return Err(not_found());
        }
        state.deleted.push(id.clone());
        Ok(())
    }

    async fn download_student_archive(&self, id: &StudentId) -> Result<Bytes, ClientError> {
        self.pass_gate().await;
        self.take_failure()?;
        let mut state = self.state.lock().unwrap();
        if !state.students.iter().any(|s| &s.id == id) {
            return Err(not_found());
        }
        state.downloads.push(id.clone());
        Ok(Bytes::from(format!("PK-archive-{}", id)))
    }

    fn document_url(&self, id: &StudentId, document: &DocumentId) -> String {
        format!("http://mock/api/students/{}/document/{}", id, document)
    }
}

#[async_trait]
impl AuthBackend for MockBackend {
    async fn signup(&self, request: &SignupRequest) -> Result<(), ClientError> {
        self.pass_gate().await;
        self.take_failure()?;
        self.state.lock().unwrap().signups.push(request.clone());
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.pass_gate().await;
        self.take_failure()?;
        self.state.lock().unwrap().logins.push(request.clone());
        Ok(LoginResponse {
            token: format!("token-{}", request.mobile),
            user: UserProfile {
                mobile: Some(request.mobile.clone()),
                first_name: Some("Ann".to_string()),
                ..Default::default()
            },
        })
    }
}

//! Backend traits
//!
//! The remote REST API as seen by the controllers. The HTTP client crate
//! implements these; tests substitute an in-memory fake.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ClientError;
use crate::models::{
    DocumentId, LoginRequest, LoginResponse, SignupRequest, StudentId, StudentRecord,
    StudentSubmission,
};

#[async_trait]
pub trait StudentBackend: Send + Sync {
    /// Fetch the full collection. Filtering and paging happen client-side.
    async fn list_students(&self) -> Result<Vec<StudentRecord>, ClientError>;

    async fn create_student(&self, submission: StudentSubmission) -> Result<(), ClientError>;

    async fn update_student(
        &self,
        id: &StudentId,
        submission: StudentSubmission,
    ) -> Result<(), ClientError>;

    async fn delete_student(&self, id: &StudentId) -> Result<(), ClientError>;

    /// Server-generated archive of one student's data.
    async fn download_student_archive(&self, id: &StudentId) -> Result<Bytes, ClientError>;

    /// Direct link for viewing one stored document.
    fn document_url(&self, id: &StudentId, document: &DocumentId) -> String;
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn signup(&self, request: &SignupRequest) -> Result<(), ClientError>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError>;
}

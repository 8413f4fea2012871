//! Domain methods for the campusdesk API client.
//!
//! Implements the backend traits from `campusdesk_core` over HTTP: student
//! CRUD as multipart forms, archive download, signup and login.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use campusdesk_core::models::{
    DocumentId, FileBlob, LoginRequest, LoginResponse, SignupRequest, StudentId, StudentRecord,
    StudentSubmission,
};
use campusdesk_core::{AuthBackend, ClientError, PhotoAction, StudentBackend};

use crate::ApiClient;

fn student_path(id: &StudentId) -> String {
    format!("/students/{}", urlencoding::encode(id.as_str()))
}

fn file_part(file: &FileBlob) -> Part {
    let part = Part::bytes(file.data.to_vec()).file_name(file.file_name.clone());
    match part.mime_str(&file.content_type) {
        Ok(part) => part,
        Err(e) => {
            tracing::warn!(
                file = %file.file_name,
                error = %e,
                "Sending file without a content type"
            );
            Part::bytes(file.data.to_vec()).file_name(file.file_name.clone())
        }
    }
}

/// Multipart body for `POST /students` and `PUT /students/{id}`.
///
/// Scalar fields first, then one `documents` part per new file, the photo
/// directive and the JSON list of removed documents.
pub fn student_form(submission: &StudentSubmission) -> Form {
    let mut form = Form::new();
    for (name, value) in &submission.fields {
        form = form.text(*name, value.clone());
    }

    let attachments = &submission.attachments;
    for document in &attachments.new_documents {
        form = form.part("documents", file_part(document));
    }
    form = match &attachments.photo {
        PhotoAction::Unchanged => form,
        PhotoAction::Replace(photo) => form.part("photo", file_part(photo)),
        PhotoAction::Delete => form.text("deletePhoto", "true"),
    };
    if let Some(deleted) = attachments.deleted_documents_json() {
        form = form.text("deletedDocuments", deleted);
    }
    form
}

#[async_trait]
impl StudentBackend for ApiClient {
    async fn list_students(&self) -> Result<Vec<StudentRecord>, ClientError> {
        self.get("/students").await
    }

    async fn create_student(&self, submission: StudentSubmission) -> Result<(), ClientError> {
        self.send_multipart(Method::POST, "/students", student_form(&submission))
            .await
    }

    async fn update_student(
        &self,
        id: &StudentId,
        submission: StudentSubmission,
    ) -> Result<(), ClientError> {
        self.send_multipart(Method::PUT, &student_path(id), student_form(&submission))
            .await
    }

    async fn delete_student(&self, id: &StudentId) -> Result<(), ClientError> {
        self.delete(&student_path(id)).await
    }

    async fn download_student_archive(&self, id: &StudentId) -> Result<Bytes, ClientError> {
        self.get_bytes(&format!("{}/download", student_path(id)))
            .await
    }

    fn document_url(&self, id: &StudentId, document: &DocumentId) -> String {
        self.build_url(&format!(
            "{}/document/{}",
            student_path(id),
            urlencoding::encode(document.as_str())
        ))
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn signup(&self, request: &SignupRequest) -> Result<(), ClientError> {
        self.post_json_unit("/auth/signup", request).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.post_json("/auth/login", request).await
    }
}

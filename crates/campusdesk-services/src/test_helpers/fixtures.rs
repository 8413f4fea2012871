use campusdesk_core::models::{
    Department, DocumentId, FileBlob, Gender, StoredDocument, StudentFields, StudentRecord,
};

pub fn student(id: &str, name: &str, mobile: &str) -> StudentRecord {
    let json = serde_json::json!({
        "_id": id,
        "admissionNumber": format!("ADM-{}", id.to_uppercase()),
        "name": name,
        "email": format!("{}@example.com", id),
        "mobileNumber": mobile,
        "department": Department::ComputerScience.as_str(),
        "year": 1,
        "dob": "2004-03-15T00:00:00.000Z",
        "gender": Gender::Other.as_str(),
        "address": "1 College Road",
        "documents": [],
    });
    serde_json::from_value(json).expect("fixture student is valid")
}

/// `count` students named "Student 01".. with distinct mobile numbers.
pub fn students(count: usize) -> Vec<StudentRecord> {
    (1..=count)
        .map(|i| {
            student(
                &format!("s{:02}", i),
                &format!("Student {:02}", i),
                &format!("90000000{:02}", i),
            )
        })
        .collect()
}

pub fn with_documents(mut record: StudentRecord, ids: &[&str]) -> StudentRecord {
    record.documents = ids
        .iter()
        .map(|id| StoredDocument {
            id: DocumentId::new(*id),
            name: format!("{}.pdf", id),
            path: Some(format!("uploads/documents/{}.pdf", id)),
        })
        .collect();
    record
}

pub fn with_photo(mut record: StudentRecord) -> StudentRecord {
    record.photo = Some(format!("/uploads/photos/{}.jpg", record.id));
    record
}

pub fn pdf(name: &str) -> FileBlob {
    FileBlob::new(name, "application/pdf", b"%PDF-1.4 fixture".to_vec())
}

pub fn image(name: &str) -> FileBlob {
    FileBlob::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

pub fn valid_fields() -> StudentFields {
    StudentFields {
        admission_number: "adm900".to_string(),
        name: "Cara Diaz".to_string(),
        email: "cara@example.com".to_string(),
        mobile_number: "3333333333".to_string(),
        department: "Civil Engineering".to_string(),
        year: "3".to_string(),
        dob: "2003-07-09".to_string(),
        gender: "Female".to_string(),
        address: "9 Hill Lane".to_string(),
        guardian_contact: String::new(),
    }
}

//! Rendering helpers shared by the `campusdesk` binary.

use campusdesk_core::models::StudentRecord;
use campusdesk_core::FieldErrors;
use campusdesk_services::{Notification, PageView};
use serde_json::{json, Value};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Plain text table for one roster page.
pub fn render_page(view: &PageView<'_>) -> String {
    let mut out = String::new();
    if view.records.is_empty() {
        out.push_str("No students found.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<26} {:<12} {:<24} {:<12} {:<24} {:>4}\n",
        "ID", "Admission", "Name", "Mobile", "Department", "Year"
    ));
    out.push_str(&"-".repeat(107));
    out.push('\n');
    for record in &view.records {
        out.push_str(&format!(
            "{:<26} {:<12} {:<24} {:<12} {:<24} {:>4}\n",
            truncate_string(record.id.as_str(), 26),
            truncate_string(&record.admission_number, 12),
            truncate_string(&record.name, 24),
            record.mobile_number,
            truncate_string(record.department.as_str(), 24),
            record.year
        ));
    }
    out.push_str(&format!(
        "\nShowing {} to {} of {} students (page {} of {})\n",
        view.first_index, view.last_index, view.filtered_count, view.page, view.total_pages
    ));
    out
}

pub fn page_json(view: &PageView<'_>) -> Value {
    json!({
        "page": view.page,
        "totalPages": view.total_pages,
        "total": view.filtered_count,
        "students": view.records,
    })
}

/// Every field of one record, one per line.
pub fn render_detail(record: &StudentRecord) -> String {
    let mut lines = vec![
        format!("ID:               {}", record.id),
        format!("Admission number: {}", record.admission_number),
        format!("Name:             {}", record.name),
        format!("Email:            {}", record.email),
        format!("Mobile number:    {}", record.mobile_number),
        format!("Department:       {}", record.department),
        format!("Year:             {}", record.year),
        format!("Date of birth:    {}", record.dob.format("%Y-%m-%d")),
        format!("Gender:           {}", record.gender),
        format!("Address:          {}", record.address),
        format!(
            "Guardian contact: {}",
            record.guardian_contact.as_deref().unwrap_or("-")
        ),
        format!(
            "Photo:            {}",
            record.photo.as_deref().unwrap_or("-")
        ),
    ];
    if record.documents.is_empty() {
        lines.push("Documents:        -".to_string());
    } else {
        lines.push("Documents:".to_string());
        for document in &record.documents {
            lines.push(format!("  {}  {}", document.id, document.name));
        }
    }
    lines.join("\n")
}

pub fn render_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, error)| format!("  {}: {}", field, error.message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn notification_json(notification: &Notification) -> Value {
    json!({
        "success": !notification.is_error(),
        "message": notification.message,
    })
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusdesk_core::FieldErrorKind;

    fn record(name: &str) -> StudentRecord {
        serde_json::from_value(json!({
            "_id": "665f1c",
            "admissionNumber": "ADM001",
            "name": name,
            "email": "ann@example.com",
            "mobileNumber": "1111111111",
            "department": "Computer Science",
            "year": 2,
            "dob": "2004-03-15",
            "gender": "Female",
            "address": "1 College Road",
            "documents": [{ "_id": "d1", "name": "marks.pdf" }]
        }))
        .unwrap()
    }

    fn view_of(records: &[StudentRecord]) -> PageView<'_> {
        PageView {
            records: records.iter().collect(),
            page: 1,
            total_pages: 1,
            filtered_count: records.len(),
            first_index: if records.is_empty() { 0 } else { 1 },
            last_index: records.len(),
            has_previous: false,
            has_next: false,
        }
    }

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_multibyte() {
        assert_eq!(truncate_string("Zoë Ångström", 7), "Zoë ...");
    }

    #[test]
    fn render_page_lists_rows_and_range() {
        let records = vec![record("Ann Lee")];
        let out = render_page(&view_of(&records));
        assert!(out.contains("Ann Lee"));
        assert!(out.contains("Computer Science"));
        assert!(out.contains("Showing 1 to 1 of 1 students (page 1 of 1)"));
    }

    #[test]
    fn render_empty_page() {
        assert_eq!(render_page(&view_of(&[])), "No students found.\n");
    }

    #[test]
    fn page_json_shape() {
        let records = vec![record("Ann Lee")];
        let value = page_json(&view_of(&records));
        assert_eq!(value["total"], 1);
        assert_eq!(value["students"][0]["admissionNumber"], "ADM001");
    }

    #[test]
    fn render_detail_includes_documents() {
        let out = render_detail(&record("Ann Lee"));
        assert!(out.contains("Date of birth:    2004-03-15"));
        assert!(out.contains("Guardian contact: -"));
        assert!(out.contains("d1  marks.pdf"));
    }

    #[test]
    fn field_errors_one_per_line() {
        let mut errors = FieldErrors::new();
        errors.add(
            "email",
            FieldErrorKind::InvalidFormat,
            "Invalid email format.",
        );
        errors.add("name", FieldErrorKind::MissingField, "Name is required");
        assert_eq!(
            render_field_errors(&errors),
            "  email: Invalid email format.\n  name: Name is required"
        );
    }

    #[test]
    fn notification_json_shape() {
        let value = notification_json(&Notification::error("Error deleting student"));
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "Error deleting student");
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::attachments::SubmissionPayload;

/// Identifier assigned by the server when a student is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Identifier of a document stored alongside a student record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    #[serde(rename = "Electrical Engineering")]
    ElectricalEngineering,
    #[serde(rename = "Mechanical Engineering")]
    MechanicalEngineering,
    #[serde(rename = "Civil Engineering")]
    CivilEngineering,
    #[serde(rename = "Business Administration")]
    BusinessAdministration,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::ComputerScience,
        Department::ElectricalEngineering,
        Department::MechanicalEngineering,
        Department::CivilEngineering,
        Department::BusinessAdministration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::ComputerScience => "Computer Science",
            Department::ElectricalEngineering => "Electrical Engineering",
            Department::MechanicalEngineering => "Mechanical Engineering",
            Department::CivilEngineering => "Civil Engineering",
            Department::BusinessAdministration => "Business Administration",
        }
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Department::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("Invalid department: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(anyhow::anyhow!("Invalid gender: {}", s)),
        }
    }
}

/// A document already stored on the server for a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Student record as returned by `GET /students`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(rename = "_id")]
    pub id: StudentId,
    pub admission_number: String,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub department: Department,
    #[serde(deserialize_with = "year_from_wire")]
    pub year: u8,
    #[serde(deserialize_with = "date_from_wire")]
    pub dob: NaiveDate,
    pub gender: Gender,
    pub address: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub guardian_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub documents: Vec<StoredDocument>,
}

impl StudentRecord {
    /// File name used when saving the server-generated archive for this student.
    pub fn archive_file_name(&self) -> String {
        format!("{}_data.zip", self.admission_number)
    }

    pub fn document(&self, id: &DocumentId) -> Option<&StoredDocument> {
        self.documents.iter().find(|doc| &doc.id == id)
    }
}

// The server stores year as a number but older records carry the form's string value.
fn year_from_wire<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(u64),
        Text(String),
    }

    let year = match Year::deserialize(deserializer)? {
        Year::Number(n) => u8::try_from(n).ok(),
        Year::Text(s) => s.trim().parse::<u8>().ok(),
    };
    year.ok_or_else(|| serde::de::Error::custom("year must be an integer between 1 and 255"))
}

// Accepts both `2003-05-01` and full timestamps such as `2003-05-01T00:00:00.000Z`.
fn date_from_wire<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let date_part = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Editable scalar fields of the student form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StudentField {
    AdmissionNumber,
    Name,
    Email,
    MobileNumber,
    Department,
    Year,
    Dob,
    Gender,
    Address,
    GuardianContact,
}

impl StudentField {
    pub const ALL: [StudentField; 10] = [
        StudentField::AdmissionNumber,
        StudentField::Name,
        StudentField::Email,
        StudentField::MobileNumber,
        StudentField::Department,
        StudentField::Year,
        StudentField::Dob,
        StudentField::Gender,
        StudentField::Address,
        StudentField::GuardianContact,
    ];

    pub const REQUIRED: [StudentField; 9] = [
        StudentField::AdmissionNumber,
        StudentField::Name,
        StudentField::Email,
        StudentField::MobileNumber,
        StudentField::Department,
        StudentField::Year,
        StudentField::Dob,
        StudentField::Gender,
        StudentField::Address,
    ];

    /// Wire name, also used as the key in field error maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentField::AdmissionNumber => "admissionNumber",
            StudentField::Name => "name",
            StudentField::Email => "email",
            StudentField::MobileNumber => "mobileNumber",
            StudentField::Department => "department",
            StudentField::Year => "year",
            StudentField::Dob => "dob",
            StudentField::Gender => "gender",
            StudentField::Address => "address",
            StudentField::GuardianContact => "guardianContact",
        }
    }
}

impl Display for StudentField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StudentField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown student field: {}", s))
    }
}

/// Form state for adding or editing a student, kept as entered text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFields {
    pub admission_number: String,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub department: String,
    pub year: String,
    pub dob: String,
    pub gender: String,
    pub address: String,
    pub guardian_contact: String,
}

impl StudentFields {
    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            admission_number: record.admission_number.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            mobile_number: record.mobile_number.clone(),
            department: record.department.as_str().to_string(),
            year: record.year.to_string(),
            dob: record.dob.format("%Y-%m-%d").to_string(),
            gender: record.gender.as_str().to_string(),
            address: record.address.clone(),
            guardian_contact: record.guardian_contact.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: StudentField) -> &str {
        match field {
            StudentField::AdmissionNumber => &self.admission_number,
            StudentField::Name => &self.name,
            StudentField::Email => &self.email,
            StudentField::MobileNumber => &self.mobile_number,
            StudentField::Department => &self.department,
            StudentField::Year => &self.year,
            StudentField::Dob => &self.dob,
            StudentField::Gender => &self.gender,
            StudentField::Address => &self.address,
            StudentField::GuardianContact => &self.guardian_contact,
        }
    }

    pub fn set(&mut self, field: StudentField, value: impl Into<String>) {
        let value = value.into();
        match field {
            StudentField::AdmissionNumber => self.admission_number = value,
            StudentField::Name => self.name = value,
            StudentField::Email => self.email = value,
            StudentField::MobileNumber => self.mobile_number = value,
            StudentField::Department => self.department = value,
            StudentField::Year => self.year = value,
            StudentField::Dob => self.dob = value,
            StudentField::Gender => self.gender = value,
            StudentField::Address => self.address = value,
            StudentField::GuardianContact => self.guardian_contact = value,
        }
    }

    /// Scalar multipart fields in wire order.
    ///
    /// The admission number is upper-cased. Enumerated fields are sent in the
    /// exact form the server stores and returns them; text that does not parse
    /// is sent trimmed as entered.
    pub fn to_form_pairs(&self) -> Vec<(&'static str, String)> {
        StudentField::ALL
            .into_iter()
            .map(|field| {
                let value = canonical_value(field, self.get(field).trim());
                (field.as_str(), value)
            })
            .collect()
    }
}

fn canonical_value(field: StudentField, value: &str) -> String {
    let canonical = match field {
        StudentField::AdmissionNumber => Some(value.to_uppercase()),
        StudentField::Department => value
            .parse::<Department>()
            .ok()
            .map(|department| department.as_str().to_string()),
        StudentField::Gender => value
            .parse::<Gender>()
            .ok()
            .map(|gender| gender.as_str().to_string()),
        StudentField::Year => value.parse::<u8>().ok().map(|year| year.to_string()),
        StudentField::Dob => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .map(|dob| dob.format("%Y-%m-%d").to_string()),
        _ => None,
    };
    canonical.unwrap_or_else(|| value.to_string())
}

/// Everything sent to `POST /students` or `PUT /students/{id}`.
#[derive(Debug, Clone)]
pub struct StudentSubmission {
    pub fields: Vec<(&'static str, String)>,
    pub attachments: SubmissionPayload,
}

impl StudentSubmission {
    pub fn new(fields: &StudentFields, attachments: SubmissionPayload) -> Self {
        Self {
            fields: fields.to_form_pairs(),
            attachments,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

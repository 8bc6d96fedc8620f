use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_ROLE: &str = "delegate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionField {
    FullName,
    Email,
    Phone,
    School,
    City,
    Experience,
    Committee,
}

impl SubmissionField {
    pub const ALL: [SubmissionField; 7] = [
        SubmissionField::FullName,
        SubmissionField::Email,
        SubmissionField::Phone,
        SubmissionField::School,
        SubmissionField::City,
        SubmissionField::Experience,
        SubmissionField::Committee,
    ];

    /// Fields collected on the personal-info step.
    pub const PERSONAL: [SubmissionField; 5] = [
        SubmissionField::FullName,
        SubmissionField::Email,
        SubmissionField::Phone,
        SubmissionField::School,
        SubmissionField::City,
    ];

    /// Fields collected on the committee-selection step.
    pub const COMMITTEE: [SubmissionField; 2] =
        [SubmissionField::Experience, SubmissionField::Committee];

    pub fn wire_name(self) -> &'static str {
        match self {
            SubmissionField::FullName => "fullName",
            SubmissionField::Email => "email",
            SubmissionField::Phone => "phone",
            SubmissionField::School => "school",
            SubmissionField::City => "city",
            SubmissionField::Experience => "experience",
            SubmissionField::Committee => "committee",
        }
    }
}

impl fmt::Display for SubmissionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A registration as it travels from the form to the intake endpoint.
///
/// Absent and `null` fields deserialize as empty strings so that the intake
/// reports them through the same missing-field check as blank input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmission {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub school: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub experience: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub committee: String,
}

impl RegistrationSubmission {
    pub fn field(&self, field: SubmissionField) -> &str {
        match field {
            SubmissionField::FullName => &self.full_name,
            SubmissionField::Email => &self.email,
            SubmissionField::Phone => &self.phone,
            SubmissionField::School => &self.school,
            SubmissionField::City => &self.city,
            SubmissionField::Experience => &self.experience,
            SubmissionField::Committee => &self.committee,
        }
    }

    pub fn field_mut(&mut self, field: SubmissionField) -> &mut String {
        match field {
            SubmissionField::FullName => &mut self.full_name,
            SubmissionField::Email => &mut self.email,
            SubmissionField::Phone => &mut self.phone,
            SubmissionField::School => &mut self.school,
            SubmissionField::City => &mut self.city,
            SubmissionField::Experience => &mut self.experience,
            SubmissionField::Committee => &mut self.committee,
        }
    }

    /// Returns the subset of `fields` that are empty, in the given order.
    pub fn missing_among(&self, fields: &[SubmissionField]) -> Vec<SubmissionField> {
        fields
            .iter()
            .copied()
            .filter(|field| self.field(*field).is_empty())
            .collect()
    }

    pub fn missing_fields(&self) -> Vec<SubmissionField> {
        self.missing_among(&SubmissionField::ALL)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payment confirmation the registrant picked on the last step. Only the
/// reference is tracked; the file itself never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub filename: String,
    pub size_bytes: Option<u64>,
    pub mime_type: Option<String>,
}

impl PaymentProof {
    pub fn named(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            size_bytes: None,
            mime_type: None,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

/// A tracked case. `created_by` and the timestamps are server-assigned;
/// district, summary and notes are caller-supplied.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Case {
    pub id: Uuid,
    pub district: String,
    pub summary: String,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the by-district aggregation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DistrictCount {
    pub district: String,
    pub count: i64,
}

/// Raw case body as received on the wire. Every field is optional here so
/// that presence checks can produce per-field validation errors instead of a
/// blanket deserialization failure. There is intentionally no `created_by`
/// field: a caller-supplied owner is dropped before it can reach storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CasePayload {
    pub district: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
}

/// Validated body for create and full update.
#[derive(Debug, Clone)]
pub struct NewCase {
    pub district: String,
    pub summary: String,
    pub notes: Option<String>,
}

/// Validated body for partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CasePatch {
    pub district: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
}

impl CasePayload {
    /// Validate for create / full update: district and summary are required.
    pub fn into_new_case(self, districts: &[String]) -> Result<NewCase, HashMap<String, String>> {
        let mut field_errors = HashMap::new();

        let district = match self.district.as_deref().map(str::trim) {
            None | Some("") => {
                field_errors.insert("district".to_string(), "This field is required".to_string());
                None
            }
            Some(d) => {
                check_district(d, districts, &mut field_errors);
                Some(d.to_string())
            }
        };

        let summary = match self.summary.as_deref().map(str::trim) {
            None | Some("") => {
                field_errors.insert("summary".to_string(), "This field is required".to_string());
                None
            }
            Some(s) => Some(s.to_string()),
        };

        if !field_errors.is_empty() {
            return Err(field_errors);
        }

        Ok(NewCase {
            district: district.unwrap_or_default(),
            summary: summary.unwrap_or_default(),
            notes: normalize_notes(self.notes),
        })
    }

    /// Validate for partial update: only supplied fields are checked. An
    /// empty payload is a valid no-op.
    pub fn into_patch(self, districts: &[String]) -> Result<CasePatch, HashMap<String, String>> {
        let mut field_errors = HashMap::new();

        let district = match self.district.as_deref().map(str::trim) {
            None => None,
            Some("") => {
                field_errors.insert("district".to_string(), "This field may not be blank".to_string());
                None
            }
            Some(d) => {
                check_district(d, districts, &mut field_errors);
                Some(d.to_string())
            }
        };

        let summary = match self.summary.as_deref().map(str::trim) {
            None => None,
            Some("") => {
                field_errors.insert("summary".to_string(), "This field may not be blank".to_string());
                None
            }
            Some(s) => Some(s.to_string()),
        };

        if !field_errors.is_empty() {
            return Err(field_errors);
        }

        Ok(CasePatch {
            district,
            summary,
            notes: normalize_notes(self.notes),
        })
    }
}

fn check_district(district: &str, districts: &[String], field_errors: &mut HashMap<String, String>) {
    if !districts.iter().any(|d| d == district) {
        field_errors.insert(
            "district".to_string(),
            format!("Unrecognized district: {}", district),
        );
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

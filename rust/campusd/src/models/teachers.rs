use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, required, stamp};
use crate::error::{Error, Result};
use crate::listing::{FieldValue, Row};
use crate::store::Record;

const TEACHER_CODE_PREFIX: &str = "T";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeacherStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
}

impl TeacherStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::OnLeave => "OnLeave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    /// Staff code such as `T007`; assigned on create when blank.
    #[serde(default)]
    pub teacher_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: Vec<String>,
    /// Free-form `grade-section` strings, e.g. `10-A`.
    #[serde(default)]
    pub assigned_classes: Vec<String>,
    #[serde(default)]
    pub status: TeacherStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

fn code_number(code: &str) -> Option<u64> {
    code.strip_prefix(TEACHER_CODE_PREFIX)?.parse().ok()
}

/// Next free staff code after the highest numbered one, saturating at
/// `u64::MAX`.
pub fn next_teacher_code(existing: &[Teacher]) -> String {
    let next = existing
        .iter()
        .filter_map(|t| code_number(&t.teacher_id))
        .max()
        .unwrap_or(0)
        .saturating_add(1);
    format!("{TEACHER_CODE_PREFIX}{next:03}")
}

impl Row for Teacher {
    const KIND: &'static str = "teacher";
    const FIELDS: &'static [&'static str] = &[
        "teacherId",
        "firstName",
        "lastName",
        "name",
        "email",
        "phone",
        "specialization",
        "assignedClasses",
        "status",
        "joiningDate",
        "experienceYears",
        "createdAt",
        "updatedAt",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "teacherId", "specialization"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "teacherId" => optional_text(Some(&self.teacher_id)),
            "firstName" => Some(FieldValue::text(&self.first_name)),
            "lastName" => Some(FieldValue::text(&self.last_name)),
            "name" => Some(FieldValue::Text(self.full_name())),
            "email" => Some(FieldValue::text(&self.email)),
            "phone" => optional_text(self.phone.as_ref()),
            "specialization" => Some(FieldValue::List(self.specialization.clone())),
            "assignedClasses" => Some(FieldValue::List(self.assigned_classes.clone())),
            "status" => Some(FieldValue::text(self.status.as_str())),
            "joiningDate" => self.joining_date.map(FieldValue::day),
            "experienceYears" => self.experience_years.map(|y| FieldValue::Number(i64::from(y))),
            "createdAt" => stamp(self.created_at.as_ref()),
            "updatedAt" => stamp(self.updated_at.as_ref()),
            _ => None,
        }
    }
}

impl Record for Teacher {
    const COLLECTION: &'static str = "teachers";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        required("firstName", &self.first_name)?;
        required("lastName", &self.last_name)?;
        required("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(Error::invalid("email must be a valid address"));
        }
        Ok(())
    }

    fn on_create(&mut self, existing: &[Self]) {
        if self.teacher_id.trim().is_empty() {
            self.teacher_id = next_teacher_code(existing);
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, required, stamp};
use crate::error::Result;
use crate::listing::{FieldValue, Row};
use crate::store::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
}

impl StudentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Graduated => "Graduated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub roll_no: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub class: String,
    pub section: String,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    pub fn in_section(&self, class: &str, section: &str) -> bool {
        self.class == class && self.section == section
    }
}

impl Row for Student {
    const KIND: &'static str = "student";
    const FIELDS: &'static [&'static str] = &[
        "rollNo",
        "firstName",
        "lastName",
        "name",
        "email",
        "phone",
        "class",
        "section",
        "status",
        "tags",
        "guardianName",
        "admissionDate",
        "createdAt",
        "updatedAt",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "rollNo", "email", "guardianName"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "rollNo" => Some(FieldValue::text(&self.roll_no)),
            "firstName" => Some(FieldValue::text(&self.first_name)),
            "lastName" => Some(FieldValue::text(&self.last_name)),
            "name" => Some(FieldValue::Text(self.full_name())),
            "email" => optional_text(self.email.as_ref()),
            "phone" => optional_text(self.phone.as_ref()),
            "class" => Some(FieldValue::text(&self.class)),
            "section" => Some(FieldValue::text(&self.section)),
            "status" => Some(FieldValue::text(self.status.as_str())),
            "tags" => Some(FieldValue::List(self.tags.clone())),
            "guardianName" => optional_text(self.guardian_name.as_ref()),
            "admissionDate" => self.admission_date.map(FieldValue::day),
            "createdAt" => stamp(self.created_at.as_ref()),
            "updatedAt" => stamp(self.updated_at.as_ref()),
            _ => None,
        }
    }
}

impl Record for Student {
    const COLLECTION: &'static str = "students";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        required("rollNo", &self.roll_no)?;
        required("firstName", &self.first_name)?;
        required("lastName", &self.last_name)?;
        required("class", &self.class)?;
        required("section", &self.section)
    }
}

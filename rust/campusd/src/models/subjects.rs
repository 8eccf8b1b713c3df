use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, required, stamp};
use crate::error::Result;
use crate::listing::{FieldValue, Row};
use crate::store::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectType {
    Core,
    Elective,
    Extracurricular,
}

impl SubjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Elective => "Elective",
            Self::Extracurricular => "Extracurricular",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectStatus {
    #[default]
    Active,
    Inactive,
}

impl SubjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    #[serde(default)]
    pub status: SubjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    #[serde(default)]
    pub grade_levels: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Row for Subject {
    const KIND: &'static str = "subject";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "code",
        "description",
        "type",
        "status",
        "credits",
        "gradeLevels",
        "createdAt",
        "updatedAt",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "code", "description"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::text(&self.name)),
            "code" => Some(FieldValue::text(&self.code)),
            "description" => optional_text(Some(&self.description)),
            "type" => Some(FieldValue::text(self.subject_type.as_str())),
            "status" => Some(FieldValue::text(self.status.as_str())),
            "credits" => self.credits.map(|c| FieldValue::Number(i64::from(c))),
            "gradeLevels" => Some(FieldValue::List(self.grade_levels.clone())),
            "createdAt" => stamp(self.created_at.as_ref()),
            "updatedAt" => stamp(self.updated_at.as_ref()),
            _ => None,
        }
    }
}

impl Record for Subject {
    const COLLECTION: &'static str = "subjects";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        required("name", &self.name)?;
        required("code", &self.code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub total: usize,
    pub by_type: BTreeMap<&'static str, usize>,
    pub by_status: BTreeMap<&'static str, usize>,
    pub total_credits: u64,
}

pub fn compute_stats(subjects: &[Subject]) -> SubjectStats {
    let mut stats = SubjectStats {
        total: subjects.len(),
        ..SubjectStats::default()
    };
    for s in subjects {
        *stats.by_type.entry(s.subject_type.as_str()).or_default() += 1;
        *stats.by_status.entry(s.status.as_str()).or_default() += 1;
        stats.total_credits += u64::from(s.credits.unwrap_or(0));
    }
    stats
}

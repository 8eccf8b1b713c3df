use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{optional_text, percent, required, stamp};
use crate::error::{Error, Result};
use crate::listing::{FieldValue, Row};
use crate::store::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassStatus {
    #[default]
    Active,
    Inactive,
}

impl ClassStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

/// Copy of the teacher's details taken when the section was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_teacher: Option<TeacherSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassData {
    pub id: String,
    pub class_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub status: ClassStatus,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ClassData {
    /// Summed in `u64`; per-section figures are client-supplied `u32`s.
    pub fn student_count(&self) -> u64 {
        self.sections.iter().map(|s| u64::from(s.student_count)).sum()
    }

    pub fn capacity(&self) -> u64 {
        self.sections.iter().map(|s| u64::from(s.capacity)).sum()
    }
}

fn number(n: u64) -> FieldValue {
    FieldValue::Number(i64::try_from(n).unwrap_or(i64::MAX))
}

impl Row for ClassData {
    const KIND: &'static str = "class";
    const FIELDS: &'static [&'static str] = &[
        "className",
        "description",
        "academicYear",
        "status",
        "section",
        "classTeacher",
        "sectionCount",
        "studentCount",
        "capacity",
        "createdAt",
        "updatedAt",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["className", "description", "classTeacher"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "className" => Some(FieldValue::text(&self.class_name)),
            "description" => optional_text(Some(&self.description)),
            "academicYear" => optional_text(self.academic_year.as_ref()),
            "status" => Some(FieldValue::text(self.status.as_str())),
            "section" => Some(FieldValue::List(
                self.sections.iter().map(|s| s.name.clone()).collect(),
            )),
            "classTeacher" => Some(FieldValue::List(
                self.sections
                    .iter()
                    .filter_map(|s| s.class_teacher.as_ref().map(|t| t.name.clone()))
                    .collect(),
            )),
            "sectionCount" => Some(FieldValue::Number(self.sections.len() as i64)),
            "studentCount" => Some(number(self.student_count())),
            "capacity" => Some(number(self.capacity())),
            "createdAt" => stamp(self.created_at.as_ref()),
            "updatedAt" => stamp(self.updated_at.as_ref()),
            _ => None,
        }
    }
}

impl Record for ClassData {
    const COLLECTION: &'static str = "classes";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        required("className", &self.class_name)?;
        if self.sections.is_empty() {
            return Err(Error::invalid("at least one section is required"));
        }
        for section in &self.sections {
            required("section name", &section.name)?;
            if section.capacity == 0 {
                return Err(Error::invalid(format!(
                    "section {} capacity must be greater than 0",
                    section.name
                )));
            }
        }
        Ok(())
    }

    fn on_create(&mut self, _existing: &[Self]) {
        for section in &mut self.sections {
            if section.id.trim().is_empty() {
                section.id = Uuid::new_v4().to_string();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStats {
    pub section_count: usize,
    pub student_count: u64,
    pub capacity: u64,
    pub available_seats: u64,
    pub utilization: f64,
}

pub fn compute_stats(class: &ClassData) -> ClassStats {
    let student_count = class.student_count();
    let capacity = class.capacity();
    ClassStats {
        section_count: class.sections.len(),
        student_count,
        capacity,
        available_seats: capacity.saturating_sub(student_count),
        utilization: percent(student_count as usize, capacity as usize),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub total_classes: usize,
    pub active_classes: usize,
    pub section_count: usize,
    pub student_count: u64,
    pub capacity: u64,
    pub utilization: f64,
}

pub fn summarize(classes: &[ClassData]) -> ClassSummary {
    let student_count = classes
        .iter()
        .map(ClassData::student_count)
        .fold(0u64, u64::saturating_add);
    let capacity = classes
        .iter()
        .map(ClassData::capacity)
        .fold(0u64, u64::saturating_add);
    ClassSummary {
        total_classes: classes.len(),
        active_classes: classes
            .iter()
            .filter(|c| c.status == ClassStatus::Active)
            .count(),
        section_count: classes.iter().map(|c| c.sections.len()).sum(),
        student_count,
        capacity,
        utilization: percent(student_count as usize, capacity as usize),
    }
}

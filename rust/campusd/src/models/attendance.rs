//! Attendance records and the roster snapshot they are built from.
//!
//! A record stores the full list of students with their status for one
//! (date, class, section); it is a snapshot, never a diff against the roster.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::students::Student;
use super::{optional_text, percent, required, stamp};
use crate::error::{Error, Result};
use crate::listing::{locale_cmp, FieldValue, Row};
use crate::store::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendance {
    pub student_id: String,
    pub name: String,
    #[serde(default)]
    pub roll_no: String,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub date: NaiveDate,
    pub class: String,
    pub section: String,
    pub students: Vec<StudentAttendance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    fn count(&self, status: AttendanceStatus) -> usize {
        self.students.iter().filter(|s| s.status == status).count()
    }

    pub fn is_for(&self, date: NaiveDate, class: &str, section: &str) -> bool {
        self.date == date && self.class == class && self.section == section
    }

    /// Set one student's status in place.
    pub fn mark(
        &mut self,
        student_id: &str,
        status: AttendanceStatus,
        remarks: Option<String>,
    ) -> Result<()> {
        let Some(entry) = self
            .students
            .iter_mut()
            .find(|s| s.student_id == student_id)
        else {
            return Err(Error::not_found("student", student_id));
        };
        entry.status = status;
        if remarks.is_some() {
            entry.remarks = remarks;
        }
        Ok(())
    }
}

impl Row for AttendanceRecord {
    const KIND: &'static str = "attendance record";
    const FIELDS: &'static [&'static str] = &[
        "date",
        "class",
        "section",
        "markedBy",
        "studentId",
        "studentName",
        "studentCount",
        "presentCount",
        "absentCount",
        "lateCount",
        "createdAt",
        "updatedAt",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["class", "section", "studentName"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "date" => Some(FieldValue::day(self.date)),
            "class" => Some(FieldValue::text(&self.class)),
            "section" => Some(FieldValue::text(&self.section)),
            "markedBy" => optional_text(self.marked_by.as_ref()),
            "studentId" => Some(FieldValue::List(
                self.students.iter().map(|s| s.student_id.clone()).collect(),
            )),
            "studentName" => Some(FieldValue::List(
                self.students.iter().map(|s| s.name.clone()).collect(),
            )),
            "studentCount" => Some(FieldValue::Number(self.students.len() as i64)),
            "presentCount" => Some(FieldValue::Number(
                self.count(AttendanceStatus::Present) as i64,
            )),
            "absentCount" => Some(FieldValue::Number(
                self.count(AttendanceStatus::Absent) as i64,
            )),
            "lateCount" => Some(FieldValue::Number(self.count(AttendanceStatus::Late) as i64)),
            "createdAt" => stamp(self.created_at.as_ref()),
            "updatedAt" => stamp(self.updated_at.as_ref()),
            _ => None,
        }
    }
}

impl Record for AttendanceRecord {
    const COLLECTION: &'static str = "attendanceRecords";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        required("class", &self.class)?;
        required("section", &self.section)?;
        if self.students.is_empty() {
            return Err(Error::invalid("attendance needs at least one student"));
        }
        Ok(())
    }
}

/// Roster for (class, section) with every student `present` unless `prior`
/// or `overrides` (which wins) says otherwise. Ordered by roll number.
pub fn roster_snapshot(
    students: &[Student],
    class: &str,
    section: &str,
    prior: Option<&AttendanceRecord>,
    overrides: &BTreeMap<String, AttendanceStatus>,
) -> Vec<StudentAttendance> {
    let mut roster: Vec<&Student> = students
        .iter()
        .filter(|s| s.in_section(class, section))
        .collect();
    roster.sort_by(|a, b| locale_cmp(&a.roll_no, &b.roll_no));

    roster
        .into_iter()
        .map(|s| {
            let earlier = prior.and_then(|r| r.students.iter().find(|e| e.student_id == s.id));
            let status = overrides
                .get(&s.id)
                .copied()
                .or_else(|| earlier.map(|e| e.status))
                .unwrap_or_default();
            StudentAttendance {
                student_id: s.id.clone(),
                name: s.full_name(),
                roll_no: s.roll_no.clone(),
                status,
                remarks: earlier.and_then(|e| e.remarks.clone()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub records: usize,
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    /// Present and late over total, in percent.
    pub attendance_rate: f64,
}

pub fn compute_stats(records: &[AttendanceRecord]) -> AttendanceStats {
    let mut stats = AttendanceStats {
        records: records.len(),
        ..AttendanceStats::default()
    };
    for record in records {
        stats.total += record.students.len();
        stats.present += record.count(AttendanceStatus::Present);
        stats.absent += record.count(AttendanceStatus::Absent);
        stats.late += record.count(AttendanceStatus::Late);
    }
    stats.attendance_rate = percent(stats.present + stats.late, stats.total);
    stats
}

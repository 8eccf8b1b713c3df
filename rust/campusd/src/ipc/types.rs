use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::db::{self, SqliteStore};
use crate::error::{Error, Result};
use crate::listing::{ListQuery, ListState};
use crate::models::attendance::AttendanceRecord;
use crate::models::classes::ClassData;
use crate::models::notices::Notice;
use crate::models::seed;
use crate::models::students::Student;
use crate::models::subjects::Subject;
use crate::models::teachers::Teacher;
use crate::repository::Repository;
use crate::store::Store;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Entity families a list view can be opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Classes,
    Students,
    Teachers,
    Subjects,
    Notices,
    Attendance,
}

impl Collection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "classes" => Some(Self::Classes),
            "students" => Some(Self::Students),
            "teachers" => Some(Self::Teachers),
            "subjects" => Some(Self::Subjects),
            "notices" => Some(Self::Notices),
            "attendance" | "attendanceRecords" => Some(Self::Attendance),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Students => "students",
            Self::Teachers => "teachers",
            Self::Subjects => "subjects",
            Self::Notices => "notices",
            Self::Attendance => "attendance",
        }
    }
}

/// A stateful list session; rows are refetched on every read.
pub struct View {
    pub collection: Collection,
    pub state: ListState,
}

pub struct AppState {
    pub config: Config,
    pub workspace: Option<PathBuf>,
    pub classes: Repository<ClassData>,
    pub students: Repository<Student>,
    pub teachers: Repository<Teacher>,
    pub subjects: Repository<Subject>,
    pub notices: Repository<Notice>,
    pub attendance: Repository<AttendanceRecord>,
    pub views: HashMap<String, View>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let latency = config.latency();
        let seeded = config.seed_demo_data;
        let state = Self {
            classes: Repository::in_memory(demo(seeded, seed::classes), latency)?,
            students: Repository::in_memory(demo(seeded, seed::students), latency)?,
            teachers: Repository::in_memory(demo(seeded, seed::teachers), latency)?,
            subjects: Repository::in_memory(demo(seeded, seed::subjects), latency)?,
            notices: Repository::in_memory(demo(seeded, seed::notices), latency)?,
            attendance: Repository::in_memory(Vec::new(), latency)?,
            workspace: None,
            views: HashMap::new(),
            config,
        };
        tracing::info!(seeded, latency_ms = state.config.latency_ms, "state initialised");
        Ok(state)
    }

    /// Move attendance onto `<path>/campus.sqlite3`. Records submitted
    /// before any workspace was open are written into it; returns how many.
    pub fn open_workspace(&mut self, path: &Path) -> anyhow::Result<usize> {
        let conn = db::open_db(path)?;
        let mut store = SqliteStore::<AttendanceRecord>::new(conn);

        let mut carried = 0;
        if self.workspace.is_none() {
            let pending = self.attendance.all()?;
            if !pending.is_empty() {
                carried = pending.len();
                tracing::warn!(
                    count = carried,
                    workspace = %path.display(),
                    "moving unsaved attendance into workspace"
                );
                store.upsert_all(pending)?;
            }
        }

        self.attendance.replace_store(Box::new(store));
        self.workspace = Some(path.to_path_buf());
        tracing::info!(workspace = %path.display(), "workspace opened");
        Ok(carried)
    }

    /// Run the list pipeline for `collection` and serialize the page.
    pub fn list_json(&self, collection: Collection, query: &ListQuery) -> Result<Value> {
        let page = match collection {
            Collection::Classes => serde_json::to_value(self.classes.list(query)?)?,
            Collection::Students => serde_json::to_value(self.students.list(query)?)?,
            Collection::Teachers => serde_json::to_value(self.teachers.list(query)?)?,
            Collection::Subjects => serde_json::to_value(self.subjects.list(query)?)?,
            Collection::Notices => serde_json::to_value(self.notices.list(query)?)?,
            Collection::Attendance => serde_json::to_value(self.attendance.list(query)?)?,
        };
        Ok(page)
    }

    pub fn view(&self, view_id: &str) -> Result<&View> {
        self.views
            .get(view_id)
            .ok_or_else(|| Error::not_found("view", view_id))
    }

    pub fn view_mut(&mut self, view_id: &str) -> Result<&mut View> {
        self.views
            .get_mut(view_id)
            .ok_or_else(|| Error::not_found("view", view_id))
    }
}

fn demo<T>(seeded: bool, records: fn() -> Vec<T>) -> Vec<T> {
    if seeded {
        records()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_round_trip() {
        for c in [
            Collection::Classes,
            Collection::Students,
            Collection::Teachers,
            Collection::Subjects,
            Collection::Notices,
            Collection::Attendance,
        ] {
            assert_eq!(Collection::parse(c.as_str()), Some(c));
        }
        assert_eq!(
            Collection::parse("attendanceRecords"),
            Some(Collection::Attendance)
        );
        assert_eq!(Collection::parse("grades"), None);
    }

    #[test]
    fn seeding_follows_config() {
        let seeded = AppState::new(Config::default()).unwrap();
        assert!(!seeded.classes.all().unwrap().is_empty());
        assert!(seeded.attendance.all().unwrap().is_empty());

        let empty = AppState::new(Config {
            seed_demo_data: false,
            ..Config::default()
        })
        .unwrap();
        assert!(empty.students.all().unwrap().is_empty());
    }

    fn submit(state: &mut AppState, date: &str) -> AttendanceRecord {
        state
            .attendance
            .create(serde_json::json!({
                "date": date,
                "class": "Grade 1",
                "section": "A",
                "students": [{ "studentId": "student-1", "name": "Ava Brown", "status": "present" }]
            }))
            .unwrap()
    }

    #[test]
    fn first_workspace_keeps_attendance_taken_in_memory() {
        let first = tempfile::tempdir().expect("temp dir");
        let second = tempfile::tempdir().expect("temp dir");
        let mut state = AppState::new(Config::default()).unwrap();
        let early = submit(&mut state, "2026-10-12");

        assert_eq!(state.open_workspace(first.path()).unwrap(), 1);
        assert_eq!(state.attendance.get(&early.id).unwrap(), early);

        // Switching workspaces does not copy records between them.
        assert_eq!(state.open_workspace(second.path()).unwrap(), 0);
        assert!(state.attendance.all().unwrap().is_empty());

        assert_eq!(state.open_workspace(first.path()).unwrap(), 0);
        assert_eq!(state.attendance.all().unwrap().len(), 1);
    }
}

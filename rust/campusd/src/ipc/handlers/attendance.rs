use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use super::records;
use crate::error::{Error, Result};
use crate::ipc::error::respond;
use crate::ipc::helpers::{optional_param, parse_params};
use crate::ipc::types::{AppState, Request};
use crate::listing::{filter_records, Criteria};
use crate::models::attendance::{
    compute_stats, roster_snapshot, AttendanceRecord, AttendanceStatus,
};
use crate::store::Record;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterParams {
    class: String,
    section: String,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    overrides: BTreeMap<String, AttendanceStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitParams {
    date: NaiveDate,
    class: String,
    section: String,
    #[serde(default)]
    statuses: BTreeMap<String, AttendanceStatus>,
    #[serde(default)]
    remarks: BTreeMap<String, String>,
    #[serde(default)]
    marked_by: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStudentParams {
    record_id: String,
    student_id: String,
    status: AttendanceStatus,
    #[serde(default)]
    remarks: Option<String>,
}

/// Latest stored record for the same (date, class, section), if any.
fn prior_record(
    state: &AppState,
    date: NaiveDate,
    class: &str,
    section: &str,
) -> Result<Option<AttendanceRecord>> {
    Ok(state
        .attendance
        .all()?
        .into_iter()
        .rev()
        .find(|r| r.is_for(date, class, section)))
}

fn handle_attendance_roster(state: &mut AppState, req: &Request) -> Result<Value> {
    let p: RosterParams = parse_params(&req.params)?;
    let prior = match p.date {
        Some(date) => prior_record(state, date, &p.class, &p.section)?,
        None => None,
    };
    let students = roster_snapshot(
        &state.students.all()?,
        &p.class,
        &p.section,
        prior.as_ref(),
        &p.overrides,
    );
    Ok(json!({
        "date": p.date,
        "class": p.class,
        "section": p.section,
        "recordId": prior.as_ref().map(|r| r.id.clone()),
        "students": students,
    }))
}

fn handle_attendance_submit(state: &mut AppState, req: &Request) -> Result<Value> {
    let p: SubmitParams = parse_params(&req.params)?;
    let mut students = roster_snapshot(
        &state.students.all()?,
        &p.class,
        &p.section,
        None,
        &p.statuses,
    );
    if students.is_empty() {
        return Err(Error::invalid(format!(
            "no students in {} {}",
            p.class, p.section
        )));
    }
    for entry in &mut students {
        if let Some(remark) = p.remarks.get(&entry.student_id) {
            entry.remarks = Some(remark.clone());
        }
    }

    let record = state.attendance.create(json!({
        "date": p.date,
        "class": p.class,
        "section": p.section,
        "students": students,
        "markedBy": p.marked_by,
    }))?;
    tracing::info!(
        record = %record.id,
        date = %record.date,
        class = %record.class,
        section = %record.section,
        students = record.students.len(),
        "attendance submitted"
    );
    Ok(serde_json::to_value(record)?)
}

fn handle_attendance_update_student(state: &mut AppState, req: &Request) -> Result<Value> {
    let p: UpdateStudentParams = parse_params(&req.params)?;
    let mut record = state.attendance.get(&p.record_id)?;
    record.mark(&p.student_id, p.status, p.remarks)?;
    let updated = state
        .attendance
        .update(&p.record_id, &json!({ "students": record.students }))?;
    Ok(serde_json::to_value(updated)?)
}

/// With `id`: one record's counts. Otherwise totals over the records
/// matching `filter`.
fn handle_attendance_stats(state: &mut AppState, req: &Request) -> Result<Value> {
    if let Some(id) = optional_param::<String>(&req.params, "id")? {
        let record = state.attendance.get(&id)?;
        return Ok(serde_json::to_value(compute_stats(std::slice::from_ref(
            &record,
        )))?);
    }
    let criteria: Criteria = optional_param(&req.params, "filter")?.unwrap_or_default();
    let records = filter_records(&state.attendance.all()?, &criteria)?;
    Ok(serde_json::to_value(compute_stats(&records))?)
}

/// Accepts the stored string or an already parsed array. Upserts by id.
fn handle_attendance_import_legacy(state: &mut AppState, req: &Request) -> Result<Value> {
    let raw = req
        .params
        .get("json")
        .ok_or_else(|| Error::invalid("missing params.json"))?;
    let records: Vec<AttendanceRecord> = match raw {
        Value::String(s) => serde_json::from_str::<Vec<AttendanceRecord>>(s),
        other => serde_json::from_value::<Vec<AttendanceRecord>>(other.clone()),
    }
    .map_err(|e| Error::invalid(format!("bad {}: {e}", AttendanceRecord::COLLECTION)))?;

    let imported = state.attendance.upsert_all(records)?;
    tracing::info!(imported, "legacy attendance imported");
    Ok(json!({ "imported": imported }))
}

fn handle_attendance_export_legacy(state: &mut AppState, _req: &Request) -> Result<Value> {
    let records = state.attendance.all()?;
    Ok(json!({
        "key": AttendanceRecord::COLLECTION,
        "count": records.len(),
        "json": serde_json::to_string(&records)?,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.roster" => handle_attendance_roster(state, req),
        "attendance.submit" => handle_attendance_submit(state, req),
        "attendance.updateStudent" => handle_attendance_update_student(state, req),
        "attendance.stats" => handle_attendance_stats(state, req),
        "attendance.importLegacy" => handle_attendance_import_legacy(state, req),
        "attendance.exportLegacy" => handle_attendance_export_legacy(state, req),
        "attendance.list" | "attendance.get" | "attendance.delete" => {
            let verb = req.method.strip_prefix("attendance.")?;
            records::dispatch(&mut state.attendance, verb, req)?
        }
        _ => return None,
    };
    Some(respond(&req.id, result))
}

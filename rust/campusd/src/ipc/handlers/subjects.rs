use serde_json::Value;

use super::records;
use crate::error::Result;
use crate::ipc::error::respond;
use crate::ipc::helpers::optional_param;
use crate::ipc::types::{AppState, Request};
use crate::listing::{filter_records, Criteria};
use crate::models::subjects::compute_stats;

fn handle_subjects_stats(state: &mut AppState, req: &Request) -> Result<Value> {
    let criteria: Criteria = optional_param(&req.params, "filter")?.unwrap_or_default();
    let subjects = filter_records(&state.subjects.all()?, &criteria)?;
    Ok(serde_json::to_value(compute_stats(&subjects))?)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "subjects.stats" => handle_subjects_stats(state, req),
        method => {
            let verb = method.strip_prefix("subjects.")?;
            records::dispatch(&mut state.subjects, verb, req)?
        }
    };
    Some(respond(&req.id, result))
}

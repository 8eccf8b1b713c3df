use serde_json::Value;

use super::records;
use crate::error::Result;
use crate::ipc::error::respond;
use crate::ipc::helpers::optional_param;
use crate::ipc::types::{AppState, Request};
use crate::listing::{filter_records, Criteria};
use crate::models::classes::{compute_stats, summarize};

/// With `id`: one class's capacity figures. Otherwise a summary over the
/// classes matching `filter`.
fn handle_classes_stats(state: &mut AppState, req: &Request) -> Result<Value> {
    if let Some(id) = optional_param::<String>(&req.params, "id")? {
        let class = state.classes.get(&id)?;
        return Ok(serde_json::to_value(compute_stats(&class))?);
    }
    let criteria: Criteria = optional_param(&req.params, "filter")?.unwrap_or_default();
    let classes = filter_records(&state.classes.all()?, &criteria)?;
    Ok(serde_json::to_value(summarize(&classes))?)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "classes.stats" => handle_classes_stats(state, req),
        method => {
            let verb = method.strip_prefix("classes.")?;
            records::dispatch(&mut state.classes, verb, req)?
        }
    };
    Some(respond(&req.id, result))
}

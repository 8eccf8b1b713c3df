use chrono::{NaiveDate, Utc};
use serde_json::Value;

use super::records;
use crate::error::{Error, Result};
use crate::ipc::error::respond;
use crate::ipc::helpers::optional_param;
use crate::ipc::types::{AppState, Request};
use crate::listing::{filter_records, parse_day, Criteria};
use crate::models::notices::compute_stats;

/// `today` defaults to the current UTC date.
fn handle_notices_stats(state: &mut AppState, req: &Request) -> Result<Value> {
    let criteria: Criteria = optional_param(&req.params, "filter")?.unwrap_or_default();
    let today: NaiveDate = match optional_param::<String>(&req.params, "today")? {
        Some(raw) => parse_day(&raw).ok_or_else(|| Error::invalid(format!("bad date: {raw}")))?,
        None => Utc::now().date_naive(),
    };
    let notices = filter_records(&state.notices.all()?, &criteria)?;
    Ok(serde_json::to_value(compute_stats(&notices, today))?)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "notices.stats" => handle_notices_stats(state, req),
        method => {
            let verb = method.strip_prefix("notices.")?;
            records::dispatch(&mut state.notices, verb, req)?
        }
    };
    Some(respond(&req.id, result))
}

use super::records;
use crate::ipc::error::respond;
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let verb = req.method.strip_prefix("students.")?;
    let result = records::dispatch(&mut state.students, verb, req)?;
    Some(respond(&req.id, result))
}

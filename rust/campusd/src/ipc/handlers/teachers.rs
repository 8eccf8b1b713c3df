use super::records;
use crate::ipc::error::respond;
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let verb = req.method.strip_prefix("teachers.")?;
    let result = records::dispatch(&mut state.teachers, verb, req)?;
    Some(respond(&req.id, result))
}

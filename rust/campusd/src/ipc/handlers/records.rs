//! `<family>.{list,get,create,update,delete}` for any [`Record`].

use serde_json::{json, Value};

use crate::error::Result;
use crate::ipc::helpers::{optional_param, parse_params, required_str};
use crate::ipc::types::Request;
use crate::listing::{ListQuery, Page};
use crate::repository::Repository;
use crate::store::Record;

fn handle_list<T: Record>(repo: &Repository<T>, req: &Request) -> Result<Value> {
    let query: ListQuery = parse_params(&req.params)?;
    let page: Page<T> = repo.list(&query)?;
    Ok(serde_json::to_value(page)?)
}

fn handle_get<T: Record>(repo: &Repository<T>, req: &Request) -> Result<Value> {
    let id = required_str(&req.params, "id")?;
    Ok(serde_json::to_value(repo.get(&id)?)?)
}

fn handle_create<T: Record>(repo: &mut Repository<T>, req: &Request) -> Result<Value> {
    let input = optional_param::<Value>(&req.params, "record")?.unwrap_or_else(|| req.params.clone());
    Ok(serde_json::to_value(repo.create(input)?)?)
}

fn handle_update<T: Record>(repo: &mut Repository<T>, req: &Request) -> Result<Value> {
    let id = required_str(&req.params, "id")?;
    let patch = optional_param::<Value>(&req.params, "patch")?.unwrap_or_else(|| json!({}));
    Ok(serde_json::to_value(repo.update(&id, &patch)?)?)
}

fn handle_delete<T: Record>(repo: &mut Repository<T>, req: &Request) -> Result<Value> {
    let id = required_str(&req.params, "id")?;
    let deleted = repo.delete(&id)?;
    Ok(json!({ "id": id, "deleted": deleted }))
}

/// Run `verb` against `repo`, or `None` when it is not a CRUD verb.
pub fn dispatch<T: Record>(
    repo: &mut Repository<T>,
    verb: &str,
    req: &Request,
) -> Option<Result<Value>> {
    match verb {
        "list" => Some(handle_list(repo, req)),
        "get" => Some(handle_get(repo, req)),
        "create" => Some(handle_create(repo, req)),
        "update" => Some(handle_update(repo, req)),
        "delete" => Some(handle_delete(repo, req)),
        _ => None,
    }
}

//! Stateful list sessions, one per list screen.
//!
//! A view keeps only the criteria, sort and paging state. Every read runs the
//! list pipeline against the store again, so a write made through any other
//! method shows up on the next `views.get`.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ipc::error::respond;
use crate::ipc::helpers::{optional_param, required_str};
use crate::ipc::types::{AppState, Collection, Request, View};
use crate::listing::{Criteria, ListState, SortSpec};

fn snapshot(view_id: &str, collection: Collection, state: &ListState, page: Value) -> Value {
    json!({
        "viewId": view_id,
        "collection": collection.as_str(),
        "query": state.query(),
        "page": page,
    })
}

/// Apply `change` to a copy of the view state and keep it only if the
/// resulting query runs.
fn update_view(
    state: &mut AppState,
    view_id: &str,
    change: impl FnOnce(&mut ListState),
) -> Result<Value> {
    let view = state.view(view_id)?;
    let collection = view.collection;
    let mut next = view.state.clone();
    change(&mut next);
    let page = state.list_json(collection, &next.query())?;
    let out = snapshot(view_id, collection, &next, page);
    state.view_mut(view_id)?.state = next;
    Ok(out)
}

fn handle_views_open(state: &mut AppState, req: &Request) -> Result<Value> {
    let raw = required_str(&req.params, "collection")?;
    let collection = Collection::parse(&raw)
        .ok_or_else(|| Error::invalid(format!("unknown collection: {raw}")))?;
    let page_size = state
        .config
        .page_size(optional_param(&req.params, "pageSize")?);

    let mut list = ListState::new(page_size);
    if let Some(criteria) = optional_param::<Criteria>(&req.params, "filter")? {
        list.set_criteria(criteria);
    }
    list.set_sort(optional_param::<SortSpec>(&req.params, "sort")?);

    let page = state.list_json(collection, &list.query())?;
    let view_id = Uuid::new_v4().to_string();
    let out = snapshot(&view_id, collection, &list, page);
    tracing::debug!(view = %view_id, collection = collection.as_str(), "view opened");
    state.views.insert(
        view_id,
        View {
            collection,
            state: list,
        },
    );
    Ok(out)
}

fn handle_views_get(state: &mut AppState, req: &Request) -> Result<Value> {
    let view_id = required_str(&req.params, "viewId")?;
    update_view(state, &view_id, |_| {})
}

fn handle_views_set_filter(state: &mut AppState, req: &Request) -> Result<Value> {
    let view_id = required_str(&req.params, "viewId")?;
    let criteria: Criteria = optional_param(&req.params, "filter")?.unwrap_or_default();
    update_view(state, &view_id, |list| list.set_criteria(criteria))
}

fn handle_views_set_sort(state: &mut AppState, req: &Request) -> Result<Value> {
    let view_id = required_str(&req.params, "viewId")?;
    let sort: Option<SortSpec> = optional_param(&req.params, "sort")?;
    update_view(state, &view_id, |list| list.set_sort(sort))
}

fn handle_views_set_page(state: &mut AppState, req: &Request) -> Result<Value> {
    let view_id = required_str(&req.params, "viewId")?;
    let page: usize = optional_param(&req.params, "page")?
        .ok_or_else(|| Error::invalid("missing params.page"))?;
    update_view(state, &view_id, |list| list.set_page(page))
}

fn handle_views_set_page_size(state: &mut AppState, req: &Request) -> Result<Value> {
    let view_id = required_str(&req.params, "viewId")?;
    let requested: usize = optional_param(&req.params, "pageSize")?
        .ok_or_else(|| Error::invalid("missing params.pageSize"))?;
    let size = state.config.page_size(Some(requested));
    update_view(state, &view_id, |list| list.set_page_size(size))
}

fn handle_views_close(state: &mut AppState, req: &Request) -> Result<Value> {
    let view_id = required_str(&req.params, "viewId")?;
    let closed = state.views.remove(&view_id).is_some();
    Ok(json!({ "viewId": view_id, "closed": closed }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "views.open" => handle_views_open(state, req),
        "views.get" => handle_views_get(state, req),
        "views.setFilter" => handle_views_set_filter(state, req),
        "views.setSort" => handle_views_set_sort(state, req),
        "views.setPage" => handle_views_set_page(state, req),
        "views.setPageSize" => handle_views_set_page_size(state, req),
        "views.close" => handle_views_close(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn request(method: &str, params: Value) -> Request {
        Request {
            id: "1".to_string(),
            method: method.to_string(),
            params,
        }
    }

    fn result(state: &mut AppState, method: &str, params: Value) -> Value {
        let resp = try_handle(state, &request(method, params)).expect("handled");
        assert_eq!(resp["ok"], true, "{resp}");
        resp["result"].clone()
    }

    #[test]
    fn filter_change_resets_page_and_rejected_filter_keeps_state() {
        let mut state = AppState::new(Config::default()).unwrap();
        let opened = result(
            &mut state,
            "views.open",
            json!({ "collection": "students", "pageSize": 2 }),
        );
        let view_id = opened["viewId"].as_str().unwrap().to_string();
        assert_eq!(opened["page"]["total"], 6);
        assert_eq!(opened["page"]["pageCount"], 3);

        let paged = result(&mut state, "views.setPage", json!({ "viewId": view_id, "page": 2 }));
        assert_eq!(paged["page"]["page"], 2);

        let filtered = result(
            &mut state,
            "views.setFilter",
            json!({ "viewId": view_id, "filter": { "class": "Grade 1" } }),
        );
        assert_eq!(filtered["page"]["page"], 0);
        assert_eq!(filtered["page"]["total"], 4);

        let bad = try_handle(
            &mut state,
            &request(
                "views.setFilter",
                json!({ "viewId": view_id, "filter": { "shoeSize": "9" } }),
            ),
        )
        .unwrap();
        assert_eq!(bad["error"]["code"], "bad_params");
        let again = result(&mut state, "views.get", json!({ "viewId": view_id }));
        assert_eq!(again["page"]["total"], 4);
    }

    #[test]
    fn views_see_writes_made_elsewhere() {
        let mut state = AppState::new(Config::default()).unwrap();
        let opened = result(&mut state, "views.open", json!({ "collection": "subjects" }));
        let view_id = opened["viewId"].as_str().unwrap().to_string();
        let before = opened["page"]["total"].as_u64().unwrap();

        state.subjects.delete("subject-1").unwrap();
        let after = result(&mut state, "views.get", json!({ "viewId": view_id }));
        assert_eq!(after["page"]["total"].as_u64().unwrap(), before - 1);
    }

    #[test]
    fn page_size_is_clamped_and_closed_views_are_gone() {
        let mut state = AppState::new(Config::default()).unwrap();
        let opened = result(&mut state, "views.open", json!({ "collection": "notices" }));
        let view_id = opened["viewId"].as_str().unwrap().to_string();
        assert_eq!(opened["page"]["pageSize"], 10);

        let resized = result(
            &mut state,
            "views.setPageSize",
            json!({ "viewId": view_id, "pageSize": 1000 }),
        );
        assert_eq!(resized["page"]["pageSize"], 100);

        let closed = result(&mut state, "views.close", json!({ "viewId": view_id }));
        assert_eq!(closed["closed"], true);
        let gone = try_handle(&mut state, &request("views.get", json!({ "viewId": view_id })))
            .unwrap();
        assert_eq!(gone["error"]["code"], "not_found");
    }

    #[test]
    fn unknown_collection_is_rejected() {
        let mut state = AppState::new(Config::default()).unwrap();
        let resp = try_handle(
            &mut state,
            &request("views.open", json!({ "collection": "grades" })),
        )
        .unwrap();
        assert_eq!(resp["error"]["code"], "bad_params");
    }
}

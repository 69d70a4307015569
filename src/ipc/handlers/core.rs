use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{optional_str, request_now};
use crate::ipc::types::{AppState, Request};
use crate::seed::MAX_HISTORY_DAYS;
use crate::store::RecordStore;
use serde_json::json;
use std::path::PathBuf;

fn store_counts(store: &RecordStore) -> serde_json::Value {
    json!({
        "students": store.list_students().len(),
        "departments": store.list_departments().len(),
        "records": store.list_attendance_records().len()
    })
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "seed": state.config.seed,
            "datasetPath": state.config.dataset.as_ref().map(|p| p.to_string_lossy().to_string()),
            "counts": store_counts(&state.store)
        }),
    )
}

fn handle_dataset_generate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let seed = match req.params.get("seed") {
        None => state.config.seed,
        Some(v) if v.is_null() => state.config.seed,
        Some(v) => match v.as_u64() {
            Some(n) => n,
            None => return err(&req.id, "bad_params", "seed must be an unsigned integer", None),
        },
    };
    let history_days = match req.params.get("historyDays") {
        None => state.config.history_days,
        Some(v) if v.is_null() => state.config.history_days,
        Some(v) => match v.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) if n <= MAX_HISTORY_DAYS => n,
            _ => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("historyDays must be an integer between 0 and {}", MAX_HISTORY_DAYS),
                    Some(json!({ "max": MAX_HISTORY_DAYS })),
                )
            }
        },
    };
    let now = match request_now(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    state.store = RecordStore::generate(seed, now.date(), history_days);
    state.config.seed = seed;
    state.config.history_days = history_days;
    state.config.dataset = None;
    log::info!(
        "generated dataset seed={} historyDays={} records={}",
        seed,
        history_days,
        state.store.list_attendance_records().len()
    );

    ok(
        &req.id,
        json!({
            "seed": seed,
            "historyDays": history_days,
            "today": now.date(),
            "counts": store_counts(&state.store)
        }),
    )
}

fn handle_dataset_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match optional_str(req, "path") {
        Ok(Some(v)) => PathBuf::from(v),
        Ok(None) => return err(&req.id, "bad_params", "missing params.path", None),
        Err(e) => return e,
    };

    match RecordStore::from_dataset_file(&path) {
        Ok(store) => {
            state.store = store;
            state.config.dataset = Some(path.clone());
            log::info!(
                "loaded dataset {} records={}",
                path.display(),
                state.store.list_attendance_records().len()
            );
            ok(
                &req.id,
                json!({
                    "datasetPath": path.to_string_lossy(),
                    "counts": store_counts(&state.store)
                }),
            )
        }
        Err(e) => {
            log::warn!("dataset load failed: {e:#}");
            err(&req.id, "dataset_load_failed", format!("{e:#}"), None)
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "dataset.generate" => Some(handle_dataset_generate(state, req)),
        "dataset.load" => Some(handle_dataset_load(state, req)),
        _ => None,
    }
}

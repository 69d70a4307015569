use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::request_now;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_dashboard_today(state: &mut AppState, req: &Request) -> serde_json::Value {
    let today = match request_now(state, req) {
        Ok(v) => v.date(),
        Err(e) => return e,
    };
    let snapshot = calc::today_snapshot(
        state.store.list_attendance_records(),
        state.store.list_students(),
        today,
    );
    ok(&req.id, json!({ "date": today, "stats": snapshot }))
}

fn handle_dashboard_weekly(state: &mut AppState, req: &Request) -> serde_json::Value {
    let today = match request_now(state, req) {
        Ok(v) => v.date(),
        Err(e) => return e,
    };
    let days = calc::weekly_overview(
        state.store.list_attendance_records(),
        state.store.list_students(),
        today,
    );
    ok(&req.id, json!({ "date": today, "days": days }))
}

fn handle_dashboard_departments(state: &mut AppState, req: &Request) -> serde_json::Value {
    let today = match request_now(state, req) {
        Ok(v) => v.date(),
        Err(e) => return e,
    };
    let rows = calc::department_today(
        state.store.list_attendance_records(),
        state.store.list_students(),
        state.store.list_departments(),
        today,
    );
    ok(&req.id, json!({ "date": today, "departments": rows }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.today" => Some(handle_dashboard_today(state, req)),
        "dashboard.weekly" => Some(handle_dashboard_weekly(state, req)),
        "dashboard.departments" => Some(handle_dashboard_departments(state, req)),
        _ => None,
    }
}

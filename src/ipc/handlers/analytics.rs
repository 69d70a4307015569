use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{optional_usize, parse_department, parse_window, request_now};
use crate::ipc::types::{AppState, Request};
use crate::model::AttendanceRecord;
use serde_json::json;

struct AnalyticsQuery {
    window_days: u32,
    department: calc::DepartmentFilter,
    now: chrono::NaiveDateTime,
}

impl AnalyticsQuery {
    fn echo(&self) -> serde_json::Value {
        json!({
            "windowDays": self.window_days,
            "department": self.department.as_str(),
            "from": calc::window_start(self.now, self.window_days),
            "now": self.now
        })
    }
}

fn parse_analytics_query(state: &AppState, req: &Request) -> Result<AnalyticsQuery, serde_json::Value> {
    Ok(AnalyticsQuery {
        window_days: parse_window(req)?,
        department: parse_department(req)?,
        now: request_now(state, req)?,
    })
}

fn windowed<'a>(state: &'a AppState, q: &AnalyticsQuery) -> Vec<&'a AttendanceRecord> {
    calc::filter_by_window_and_department(
        state.store.list_attendance_records(),
        state.store.list_students(),
        q.window_days,
        &q.department,
        q.now,
    )
}

fn handle_analytics_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let q = match parse_analytics_query(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let records = windowed(state, &q);
    let students = state.store.list_students();

    ok(
        &req.id,
        json!({
            "query": q.echo(),
            "recordCount": records.len(),
            "daily": calc::daily_series(records.iter().copied()),
            "subjects": calc::subject_rates(records.iter().copied()),
            "students": calc::student_rankings(records.iter().copied(), students),
            "departments": calc::department_comparison(
                state.store.list_attendance_records(),
                students,
                state.store.list_departments(),
            )
        }),
    )
}

fn handle_analytics_daily(state: &mut AppState, req: &Request) -> serde_json::Value {
    let q = match parse_analytics_query(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let records = windowed(state, &q);
    ok(
        &req.id,
        json!({
            "query": q.echo(),
            "points": calc::daily_series(records.iter().copied())
        }),
    )
}

fn handle_analytics_subjects(state: &mut AppState, req: &Request) -> serde_json::Value {
    let q = match parse_analytics_query(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let records = windowed(state, &q);
    ok(
        &req.id,
        json!({
            "query": q.echo(),
            "subjects": calc::subject_rates(records.iter().copied())
        }),
    )
}

fn handle_analytics_students(state: &mut AppState, req: &Request) -> serde_json::Value {
    let q = match parse_analytics_query(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let limit = match optional_usize(req, "limit") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let records = windowed(state, &q);
    let mut rows = calc::student_rankings(records.iter().copied(), state.store.list_students());
    let ranked = rows.len();
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    ok(
        &req.id,
        json!({
            "query": q.echo(),
            "rankedCount": ranked,
            "students": rows
        }),
    )
}

/// Department comparison always spans the full record history; window and
/// department params are not applied.
fn handle_analytics_departments(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "departments": calc::department_comparison(
                state.store.list_attendance_records(),
                state.store.list_students(),
                state.store.list_departments(),
            )
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analytics.open" => Some(handle_analytics_open(state, req)),
        "analytics.daily" => Some(handle_analytics_daily(state, req)),
        "analytics.subjects" => Some(handle_analytics_subjects(state, req)),
        "analytics.students" => Some(handle_analytics_students(state, req)),
        "analytics.departments" => Some(handle_analytics_departments(state, req)),
        _ => None,
    }
}

use crate::calc;
use crate::ipc::error::ok;
use crate::ipc::helpers::{optional_str, required_date, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::MarkState;
use serde_json::json;

fn attendance_session(state: &AppState, req: &Request) -> Result<serde_json::Value, serde_json::Value> {
    let date = required_date(req, "date")?;
    let subject = required_str(req, "subject")?;
    let search = optional_str(req, "search")?;

    let roster = calc::session_roster(&state.store, date, subject.trim(), search.as_deref());
    Ok(json!({
        "subjects": state.store.subjects(),
        "roster": roster
    }))
}

fn attendance_status(state: &AppState, req: &Request) -> Result<serde_json::Value, serde_json::Value> {
    let student_id = required_str(req, "studentId")?;
    let date = required_date(req, "date")?;
    let subject = required_str(req, "subject")?;

    let status = state.store.mark_state(&student_id, date, subject.trim());
    Ok(json!({
        "studentId": student_id,
        "date": date,
        "subject": subject,
        "state": MarkState::from(status)
    }))
}

fn handle_attendance_session(state: &mut AppState, req: &Request) -> serde_json::Value {
    match attendance_session(state, req) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error,
    }
}

fn handle_attendance_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    match attendance_status(state, req) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error,
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.session" => Some(handle_attendance_session(state, req)),
        "attendance.status" => Some(handle_attendance_status(state, req)),
        _ => None,
    }
}

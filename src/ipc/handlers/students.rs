use crate::calc;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::optional_str;
use crate::ipc::types::{AppState, Request};
use crate::store::StudentQuery;
use serde_json::json;

fn parse_year(req: &Request) -> Result<Option<u8>, serde_json::Value> {
    let Some(value) = req.params.get("year") else {
        return Ok(None);
    };
    if value.is_null() || value.as_str().map(|s| s.trim().eq_ignore_ascii_case("all")) == Some(true) {
        return Ok(None);
    }
    let year = value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()));
    match year {
        Some(y) if (1..=4).contains(&y) => Ok(Some(y as u8)),
        _ => Err(err(&req.id, "bad_params", "year must be 1..=4 or \"all\"", None)),
    }
}

fn parse_student_query(req: &Request) -> Result<StudentQuery, serde_json::Value> {
    let department = optional_str(req, "department")?.filter(|d| !d.eq_ignore_ascii_case("all"));
    Ok(StudentQuery {
        search: optional_str(req, "search")?,
        department,
        year: parse_year(req)?,
    })
}

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let query = match parse_student_query(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let records = state.store.list_attendance_records();
    let rows: Vec<serde_json::Value> = state
        .store
        .search_students(&query)
        .into_iter()
        .map(|s| {
            json!({
                "student": s,
                "displayName": s.display_name(),
                "attendance": calc::student_summary(records, &s.id)
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "total": state.store.list_students().len(),
            "matched": rows.len(),
            "students": rows
        }),
    )
}

fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match optional_str(req, "studentId") {
        Ok(Some(v)) => v,
        Ok(None) => return err(&req.id, "bad_params", "missing studentId", None),
        Err(e) => return e,
    };
    let Some(student) = state.store.student(&student_id) else {
        return err(&req.id, "not_found", "student not found", None);
    };
    ok(
        &req.id,
        json!({
            "student": student,
            "attendance": calc::student_summary(state.store.list_attendance_records(), &student.id)
        }),
    )
}

fn handle_departments_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({ "departments": state.store.list_departments() }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        "departments.list" => Some(handle_departments_list(state, req)),
        _ => None,
    }
}

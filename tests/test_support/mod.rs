#![allow(dead_code)]

use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub const NOW: &str = "2026-10-17T10:00:00";

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

/// Sidecar with a pinned clock and seed so generated data is reproducible.
pub fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    spawn_sidecar_with(&[("ATTENDANCED_NOW", NOW), ("ATTENDANCED_SEED", "42")])
}

pub fn spawn_sidecar_with(env: &[(&str, &str)]) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_attendanced");
    let mut cmd = Command::new(exe);
    cmd.env_remove("ATTENDANCED_DATASET")
        .env_remove("ATTENDANCED_HISTORY_DAYS")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    for (k, v) in env {
        cmd.env(k, v);
    }
    let mut child = cmd.spawn().expect("spawn attendanced");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

pub fn send_line(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>, line: &str) -> serde_json::Value {
    writeln!(stdin, "{}", line).expect("write request");
    stdin.flush().expect("flush request");

    let mut out = String::new();
    reader.read_line(&mut out).expect("read response line");
    assert!(!out.trim().is_empty(), "empty response for {}", line);
    serde_json::from_str(out.trim()).expect("parse response json")
}

pub fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    let value = send_line(stdin, reader, &payload.to_string());
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

pub fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or(serde_json::Value::Null)
}

pub fn error_code(resp: &serde_json::Value) -> Option<&str> {
    resp.get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
}

fn student(id: &str, first: &str, last: &str, department: &str) -> serde_json::Value {
    json!({
        "id": id,
        "firstName": first,
        "lastName": last,
        "email": format!("{}@college.edu", first.to_ascii_lowercase()),
        "rollNumber": format!("R{}", id),
        "department": department,
        "year": 2,
        "joinDate": "2024-08-15"
    })
}

fn record(student_id: &str, date: &str, subject: &str, status: &str, session: usize) -> serde_json::Value {
    json!({
        "id": format!("{}-{}-{}", student_id, date, session),
        "studentId": student_id,
        "date": date,
        "status": status,
        "subject": subject,
        "teacher": "Prof. Fixture"
    })
}

/// Small hand-written dataset: two CS students, one EE student, an ME
/// department with nobody enrolled and one record for an unknown student.
pub fn write_fixture_dataset(dir: &std::path::Path) -> PathBuf {
    let dataset = json!({
        "students": [
            student("A", "Asha", "Rao", "Computer Science"),
            student("B", "Bilal", "Khan", "Electrical Engineering"),
            student("C", "Chitra", "Iyer", "Computer Science")
        ],
        "departments": [
            { "id": "1", "name": "Computer Science", "code": "CS", "totalStudents": 300 },
            { "id": "2", "name": "Electrical Engineering", "code": "EE", "totalStudents": 120 },
            { "id": "3", "name": "Mechanical Engineering", "code": "ME", "totalStudents": 100 }
        ],
        "records": [
            record("A", "2026-10-16", "Mathematics", "present", 0),
            record("B", "2026-10-16", "Mathematics", "absent", 0),
            record("A", "2026-10-17", "Physics", "present", 0),
            record("A", "2026-10-17", "Programming", "present", 1),
            record("A", "2026-10-17", "Electronics", "late", 2),
            record("C", "2026-10-17", "Physics", "late", 0),
            record("C", "2026-08-01", "Physics", "absent", 0),
            record("ghost", "2026-10-16", "Mathematics", "present", 0)
        ]
    });
    let path = dir.join("dataset.json");
    std::fs::write(&path, dataset.to_string()).expect("write dataset");
    path
}

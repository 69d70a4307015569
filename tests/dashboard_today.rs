mod test_support;

use serde_json::json;
use test_support::{request_ok, spawn_sidecar, temp_dir, write_fixture_dataset};

#[test]
fn dashboard_counts_distinct_students_for_today() {
    let workspace = temp_dir("attendanced-dashboard");
    let dataset = write_fixture_dataset(&workspace);
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "dataset.load",
        json!({ "path": dataset.to_string_lossy() }),
    );

    let today = request_ok(&mut stdin, &mut reader, "2", "dashboard.today", json!({}));
    assert_eq!(today["date"], "2026-10-17");
    assert_eq!(
        today["stats"],
        json!({
            "totalStudents": 3,
            "presentToday": 1,
            "lateToday": 2,
            "absentToday": 0,
            "attendanceRate": 33
        })
    );

    let yesterday = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "dashboard.today",
        json!({ "now": "2026-10-16T09:00:00" }),
    );
    assert_eq!(yesterday["stats"]["presentToday"], 1);
    assert_eq!(yesterday["stats"]["absentToday"], 2);

    let weekly = request_ok(&mut stdin, &mut reader, "4", "dashboard.weekly", json!({}));
    let days = weekly["days"].as_array().expect("days");
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], "2026-10-11");
    assert_eq!(days[6]["weekday"], "Sat");
    assert_eq!((days[5]["present"].as_u64(), days[5]["absent"].as_u64()), (Some(1), Some(2)));
    assert_eq!(
        (days[6]["present"].as_u64(), days[6]["late"].as_u64(), days[6]["absent"].as_u64()),
        (Some(1), Some(2), Some(0))
    );
    assert_eq!(days[0]["absent"], 3);

    let depts = request_ok(&mut stdin, &mut reader, "5", "dashboard.departments", json!({}));
    assert_eq!(
        depts["departments"],
        json!([
            { "department": "CS", "attendanceRate": 50, "totalStudents": 2 },
            { "department": "EE", "attendanceRate": 0, "totalStudents": 1 },
            { "department": "ME", "attendanceRate": 0, "totalStudents": 0 }
        ])
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn empty_dataset_degrades_to_zeros() {
    let workspace = temp_dir("attendanced-empty");
    let path = workspace.join("empty.json");
    std::fs::write(&path, r#"{"students":[],"departments":[],"records":[]}"#).expect("write");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "dataset.load",
        json!({ "path": path.to_string_lossy() }),
    );
    let today = request_ok(&mut stdin, &mut reader, "2", "dashboard.today", json!({}));
    assert_eq!(today["stats"]["attendanceRate"], 0);
    assert_eq!(today["stats"]["totalStudents"], 0);
    assert_eq!(today["stats"]["absentToday"], 0);

    let open = request_ok(&mut stdin, &mut reader, "3", "analytics.open", json!({}));
    assert_eq!(open["daily"], json!([]));
    assert_eq!(open["subjects"], json!([]));
    assert_eq!(open["students"], json!([]));
    assert_eq!(open["departments"], json!([]));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn generated_snapshot_respects_roster_bounds() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    for seed in [1u64, 2, 3, 42] {
        let _ = request_ok(&mut stdin, &mut reader, "g", "dataset.generate", json!({ "seed": seed }));
        let today = request_ok(&mut stdin, &mut reader, "t", "dashboard.today", json!({}));
        let s = &today["stats"];
        let total = s["totalStudents"].as_u64().expect("total");
        let present = s["presentToday"].as_u64().expect("present");
        let late = s["lateToday"].as_u64().expect("late");
        assert_eq!(total, 6);
        assert!(present <= total && late <= total);
        assert_eq!(s["absentToday"].as_u64(), Some(total.saturating_sub(present + late)));
        assert!(s["attendanceRate"].as_u64().expect("rate") <= 100);
    }

    drop(stdin);
    let _ = child.wait();
}

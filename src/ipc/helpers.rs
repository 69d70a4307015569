use crate::calc::DepartmentFilter;
use crate::config::parse_instant;
use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const MAX_WINDOW_DAYS: u32 = 36_500;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// Trimmed string param; null, missing or blank read as `None`.
pub fn optional_str(req: &Request, key: &str) -> Result<Option<String>, serde_json::Value> {
    let Some(value) = req.params.get(key) else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    let Some(raw) = value.as_str() else {
        return Err(err(
            &req.id,
            "bad_params",
            format!("{} must be string or null", key),
            None,
        ));
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

pub fn required_date(req: &Request, key: &str) -> Result<NaiveDate, serde_json::Value> {
    let raw = required_str(req, key)?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        err(
            &req.id,
            "bad_params",
            format!("{} must be YYYY-MM-DD", key),
            None,
        )
    })
}

/// `params.now` when given, otherwise the configured clock.
pub fn request_now(state: &AppState, req: &Request) -> Result<NaiveDateTime, serde_json::Value> {
    match optional_str(req, "now")? {
        None => Ok(state.config.now()),
        Some(raw) => parse_instant(&raw).ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                "now must be YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
                None,
            )
        }),
    }
}

/// Window length in days: an integer in `1..=MAX_WINDOW_DAYS`, or one of the
/// dashboard presets `7days`, `30days`, `90days`.
pub fn parse_window(req: &Request) -> Result<u32, serde_json::Value> {
    let bad = || {
        err(
            &req.id,
            "bad_params",
            "window must be an integer between 1 and 36500 or one of: 7days, 30days, 90days",
            Some(json!({ "max": MAX_WINDOW_DAYS })),
        )
    };
    let Some(value) = req.params.get("window") else {
        return Ok(DEFAULT_WINDOW_DAYS);
    };
    if value.is_null() {
        return Ok(DEFAULT_WINDOW_DAYS);
    }
    if let Some(n) = value.as_u64() {
        return match u32::try_from(n) {
            Ok(days) if (1..=MAX_WINDOW_DAYS).contains(&days) => Ok(days),
            _ => Err(bad()),
        };
    }
    match value.as_str().map(str::trim) {
        Some("7days") => Ok(7),
        Some("30days") => Ok(30),
        Some("90days") => Ok(90),
        _ => Err(bad()),
    }
}

/// Optional non-negative integer param; anything else is `bad_params`.
pub fn optional_usize(req: &Request, key: &str) -> Result<Option<usize>, serde_json::Value> {
    let Some(value) = req.params.get(key) else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("{} must be a non-negative integer", key),
                None,
            )
        })
}

pub fn parse_department(req: &Request) -> Result<DepartmentFilter, serde_json::Value> {
    Ok(DepartmentFilter::parse(optional_str(req, "department")?.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::RecordStore;
    use serde_json::json;

    fn req(params: serde_json::Value) -> Request {
        Request {
            id: "t".to_string(),
            method: "test".to_string(),
            params,
        }
    }

    #[test]
    fn window_accepts_numbers_and_presets() {
        assert_eq!(parse_window(&req(json!({}))).ok(), Some(30));
        assert_eq!(parse_window(&req(json!({ "window": 14 }))).ok(), Some(14));
        assert_eq!(parse_window(&req(json!({ "window": "7days" }))).ok(), Some(7));
        assert_eq!(parse_window(&req(json!({ "window": "90days" }))).ok(), Some(90));

        let e = parse_window(&req(json!({ "window": 0 }))).expect_err("zero");
        assert_eq!(e["error"]["code"], "bad_params");
        assert!(parse_window(&req(json!({ "window": "weekly" }))).is_err());
        assert!(parse_window(&req(json!({ "window": -3 }))).is_err());

        assert_eq!(parse_window(&req(json!({ "window": 36_500 }))).ok(), Some(MAX_WINDOW_DAYS));
        let e = parse_window(&req(json!({ "window": 200_000_000 }))).expect_err("huge");
        assert_eq!(e["error"]["code"], "bad_params");
        assert_eq!(e["error"]["details"]["max"], 36_500);
    }

    #[test]
    fn optional_usize_rejects_negative_and_fractional() {
        assert_eq!(optional_usize(&req(json!({})), "limit").ok(), Some(None));
        assert_eq!(optional_usize(&req(json!({ "limit": null })), "limit").ok(), Some(None));
        assert_eq!(optional_usize(&req(json!({ "limit": 3 })), "limit").ok(), Some(Some(3)));
        for bad in [json!(-1), json!(2.5), json!("3")] {
            let e = optional_usize(&req(json!({ "limit": bad })), "limit").expect_err("bad limit");
            assert_eq!(e["error"]["code"], "bad_params");
        }
    }

    #[test]
    fn optional_str_treats_blank_as_missing() {
        let r = req(json!({ "search": "  ", "department": null, "year": 3 }));
        assert_eq!(optional_str(&r, "search").ok(), Some(None));
        assert_eq!(optional_str(&r, "department").ok(), Some(None));
        assert_eq!(optional_str(&r, "missing").ok(), Some(None));
        assert!(optional_str(&r, "year").is_err());
    }

    #[test]
    fn now_param_overrides_config_clock() {
        let state = AppState {
            config: Config {
                now: parse_instant("2026-10-17T12:00:00"),
                ..Config::default()
            },
            store: RecordStore::default(),
        };
        let pinned = request_now(&state, &req(json!({}))).expect("now");
        assert_eq!(pinned.to_string(), "2026-10-17 12:00:00");
        let given = request_now(&state, &req(json!({ "now": "2026-01-02" }))).expect("now");
        assert_eq!(given.to_string(), "2026-01-02 00:00:00");
        assert!(request_now(&state, &req(json!({ "now": "soon" }))).is_err());
    }

    #[test]
    fn dates_must_be_iso() {
        assert!(required_date(&req(json!({ "date": "2026-10-17" })), "date").is_ok());
        assert!(required_date(&req(json!({ "date": "17-10-2026" })), "date").is_err());
        assert!(required_date(&req(json!({})), "date").is_err());
    }
}

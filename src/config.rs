use crate::seed::{DEFAULT_HISTORY_DAYS, DEFAULT_SEED, MAX_HISTORY_DAYS};
use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::PathBuf;

pub const ENV_SEED: &str = "ATTENDANCED_SEED";
pub const ENV_HISTORY_DAYS: &str = "ATTENDANCED_HISTORY_DAYS";
pub const ENV_DATASET: &str = "ATTENDANCED_DATASET";
pub const ENV_NOW: &str = "ATTENDANCED_NOW";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub seed: u64,
    pub history_days: u32,
    pub dataset: Option<PathBuf>,
    /// Pinned clock; `None` follows the local wall clock.
    pub now: Option<NaiveDateTime>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            history_days: DEFAULT_HISTORY_DAYS,
            dataset: None,
            now: None,
        }
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date
/// (midnight).
pub fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    let t = raw.trim();
    NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(t, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::default()))
        })
}

impl Config {
    /// Reads `.env` when present, then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        if let Some(v) = lookup(ENV_SEED) {
            cfg.seed = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_SEED} must be an unsigned integer, got {v:?}"))?;
        }
        if let Some(v) = lookup(ENV_HISTORY_DAYS) {
            cfg.history_days = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_HISTORY_DAYS} must be an unsigned integer, got {v:?}"))?;
            if cfg.history_days > MAX_HISTORY_DAYS {
                anyhow::bail!("{ENV_HISTORY_DAYS} must be at most {MAX_HISTORY_DAYS}, got {v:?}");
            }
        }
        if let Some(v) = lookup(ENV_DATASET) {
            if !v.trim().is_empty() {
                cfg.dataset = Some(PathBuf::from(v.trim()));
            }
        }
        if let Some(v) = lookup(ENV_NOW) {
            let Some(now) = parse_instant(&v) else {
                anyhow::bail!("{ENV_NOW} must be YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, got {v:?}");
            };
            cfg.now = Some(now);
        }
        Ok(cfg)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }
}

mod calc;
mod config;
mod ipc;
mod model;
mod seed;
mod store;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn initial_store(cfg: &config::Config) -> anyhow::Result<store::RecordStore> {
    match cfg.dataset.as_ref() {
        Some(path) => store::RecordStore::from_dataset_file(path),
        None => Ok(store::RecordStore::generate(
            cfg.seed,
            cfg.now().date(),
            cfg.history_days,
        )),
    }
}

fn main() -> ExitCode {
    // stdout carries the protocol; env_logger writes to stderr.
    env_logger::init();

    let config = match config::Config::from_env() {
        Ok(v) => v,
        Err(e) => {
            log::error!("invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let store = match initial_store(&config) {
        Ok(v) => v,
        Err(e) => {
            log::error!("could not build record store: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "attendanced {} ready: {} students, {} records",
        env!("CARGO_PKG_VERSION"),
        store.list_students().len(),
        store.list_attendance_records().len()
    );

    let mut state = ipc::AppState { config, store };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            Err(e) => {
                log::warn!("unparseable request: {e}");
                ipc::bad_json(e.to_string())
            }
        };
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    ExitCode::SUCCESS
}

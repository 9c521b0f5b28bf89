use chrono::NaiveDate;
use exit_window::config::AppConfig;
use exit_window::error::AppError;
use exit_window::state::FileStore;
use exit_window::ExitWindowService;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    exit_window::domain::parse_date(raw)
}

/// Parses a wire label (`notice-required`, `forced-move`, ...) strictly; values that would
/// otherwise fall back to `unknown` are rejected.
pub(crate) fn parse_wire<T>(raw: &str) -> Result<T, String>
where
    T: Serialize + DeserializeOwned,
{
    let raw = raw.trim();
    let value: T = serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|err| format!("'{raw}' is not a recognised value ({err})"))?;
    match serde_json::to_value(&value) {
        Ok(Value::String(canonical)) if canonical == raw => Ok(value),
        _ => Err(format!("'{raw}' is not a recognised value")),
    }
}

pub(crate) fn parse_months(raw: &str) -> Result<f64, String> {
    let months: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a number of months ({err})"))?;
    if !months.is_finite() || months < 0.0 {
        return Err(format!("months must be a non-negative number, got '{raw}'"));
    }
    Ok(months)
}

pub(crate) fn open_service(config: &AppConfig) -> Result<ExitWindowService<FileStore>, AppError> {
    let store = FileStore::open(config.storage.data_dir.clone())
        .map_err(|err| AppError::Service(err.into()))?;
    debug!(root = %store.root().display(), "state directory opened");
    Ok(ExitWindowService::new(Arc::new(store)))
}

/// Writes to `out` when given, otherwise prints to stdout.
pub(crate) fn emit_text(text: &str, out: Option<&Path>) -> Result<(), AppError> {
    match out {
        Some(path) => {
            fs::write(path, text)?;
            println!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &PathBuf) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

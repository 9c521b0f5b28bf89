//! Local persistence: a key-value adapter trait, a versioned envelope around each persisted
//! frame, and the frames themselves (constraints, last evaluation, and the record stores).

mod changes;
mod constraints;
mod continuity;
mod evaluation;
mod file;
mod memory;
mod mode;
mod notes;
mod predeparture;
mod risk;
mod snapshots;
mod stability;

pub use changes::ChangeLog;
pub use constraints::ConstraintsFrame;
pub use continuity::ContinuityChecks;
pub use evaluation::EvaluationFrame;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use mode::ModeFrame;
pub use notes::NotesFrame;
pub use predeparture::{days_until, PreDepartureFrame};
pub use risk::RiskBoundaries;
pub use snapshots::{SnapshotComparison, SnapshotLog};
pub use stability::{StabilityFrame, DEFAULT_STABILITY_STATEMENT};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const STORAGE_PREFIX: &str = "exit-window-";
pub const LEGACY_STORAGE_KEY: &str = "exit-window-store";

pub fn storage_key(suffix: &str) -> String {
    format!("{STORAGE_PREFIX}{suffix}")
}

/// Raw key-value persistence; frames are stored as JSON strings.
pub trait StateStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Validation failures raised by frame mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("no {kind} at position {index}")]
    OutOfRange { kind: &'static str, index: usize },
}

/// A persisted store. Each frame owns one storage key and a schema version.
pub trait Frame: Serialize + DeserializeOwned + Default {
    const SUFFIX: &'static str;
    const VERSION: u32 = 1;

    fn key() -> String {
        storage_key(Self::SUFFIX)
    }

    /// Adjusts a freshly decoded frame; the default keeps it as stored.
    fn migrate(self) -> Self {
        self
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    state: T,
}

/// Load a frame, falling back to defaults on a missing key, a version mismatch, or bad data.
///
/// Only text that is not JSON at all is removed. A well-formed envelope whose state no longer
/// fits the frame is left on disk untouched so nothing the user entered is destroyed.
pub fn load_frame<F: Frame>(store: &dyn StateStore) -> Result<F, StoreError> {
    let key = F::key();
    let Some(raw) = store.read(&key)? else {
        return Ok(F::default());
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(%key, error = %err, "corrupt frame discarded");
            store.remove(&key)?;
            return Ok(F::default());
        }
    };

    let stored_version = value.get("version").and_then(serde_json::Value::as_u64);
    if stored_version != Some(u64::from(F::VERSION)) {
        info!(
            %key,
            stored = ?stored_version,
            current = F::VERSION,
            "stored frame version differs; starting from defaults"
        );
        return Ok(F::default());
    }

    match serde_json::from_value::<Envelope<F>>(value) {
        Ok(envelope) => Ok(envelope.state.migrate()),
        Err(err) => {
            warn!(%key, error = %err, "stored frame does not match the current schema; kept on disk, using defaults");
            Ok(F::default())
        }
    }
}

pub fn save_frame<F: Frame>(store: &dyn StateStore, frame: &F) -> Result<(), StoreError> {
    let key = F::key();
    let raw = serde_json::to_string_pretty(&EnvelopeRef {
        state: frame,
        version: F::VERSION,
    })
    .map_err(|source| StoreError::Encode {
        key: key.clone(),
        source,
    })?;
    store.write(&key, &raw)?;
    debug!(%key, "frame saved");
    Ok(())
}

/// Remove every key this application owns. Returns the removed keys.
pub fn wipe(store: &dyn StateStore) -> Result<Vec<String>, StoreError> {
    let mut removed = Vec::new();
    for key in store.keys()? {
        if key == LEGACY_STORAGE_KEY || key.starts_with(STORAGE_PREFIX) {
            store.remove(&key)?;
            removed.push(key);
        }
    }
    info!(count = removed.len(), "local state wiped");
    Ok(removed)
}

pub(crate) fn require_text(value: &str, field: &'static str) -> Result<String, RecordError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Returns `base`, or `base-2`, `base-3`, ... when `base` is already taken.
pub(crate) fn unique_id<'a, I>(base: String, existing: I) -> String
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let taken = |candidate: &str| existing.clone().into_iter().any(|id| id == candidate);
    if !taken(&base) {
        return base;
    }

    let mut attempt = 2;
    loop {
        let candidate = format!("{base}-{attempt}");
        if !taken(&candidate) {
            return candidate;
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Probe {
        count: u32,
        label: String,
    }

    impl Frame for Probe {
        const SUFFIX: &'static str = "probe";
    }

    #[test]
    fn frames_round_trip_through_the_envelope() {
        let store = MemoryStore::default();
        let probe = Probe {
            count: 3,
            label: "kept".to_string(),
        };

        save_frame(&store, &probe).expect("save succeeds");
        let raw = store
            .read("exit-window-probe")
            .expect("read succeeds")
            .expect("key present");
        assert!(raw.contains("\"version\": 1"));

        let loaded: Probe = load_frame(&store).expect("load succeeds");
        assert_eq!(loaded, probe);
    }

    #[test]
    fn version_mismatch_resets_to_defaults() {
        let store = MemoryStore::default();
        store
            .write(
                "exit-window-probe",
                r#"{"state":{"count":9,"label":"old"},"version":0}"#,
            )
            .expect("write succeeds");

        let loaded: Probe = load_frame(&store).expect("load succeeds");

        assert_eq!(loaded, Probe::default());
        assert!(store.read("exit-window-probe").expect("read").is_some());
    }

    #[test]
    fn corrupt_frames_are_removed() {
        let store = MemoryStore::default();
        store
            .write("exit-window-probe", "{not json")
            .expect("write succeeds");

        let loaded: Probe = load_frame(&store).expect("load succeeds");

        assert_eq!(loaded, Probe::default());
        assert!(store.read("exit-window-probe").expect("read").is_none());
    }

    #[test]
    fn schema_mismatches_keep_the_stored_frame() {
        let store = MemoryStore::default();
        let raw = r#"{"state":{"count":"three","label":"kept"},"version":1}"#;
        store.write("exit-window-probe", raw).expect("write succeeds");

        let loaded: Probe = load_frame(&store).expect("load succeeds");

        assert_eq!(loaded, Probe::default());
        assert_eq!(
            store.read("exit-window-probe").expect("read").as_deref(),
            Some(raw)
        );
    }

    #[test]
    fn constraints_survive_unreadable_dates_and_float_notice_days() {
        let store = MemoryStore::default();
        store
            .write(
                "exit-window-constraints",
                r#"{"state":{"constraints":{"legal":{"blocker":"present","note":"consulate appt booked"},"housing":{"leaseEndDate":"30/06/2025","noticeDays":30.0}}},"version":1}"#,
            )
            .expect("write succeeds");

        let frame: ConstraintsFrame = load_frame(&store).expect("load succeeds");

        let constraints = frame.constraints;
        assert_eq!(constraints.legal.blocker, crate::domain::LegalBlocker::Present);
        assert_eq!(constraints.legal.note, "consulate appt booked");
        assert_eq!(constraints.housing.lease_end_date, None);
        assert_eq!(constraints.housing.notice_days, Some(30));
        assert!(store.read("exit-window-constraints").expect("read").is_some());
    }

    #[test]
    fn missing_fields_fall_back_individually() {
        let store = MemoryStore::default();
        store
            .write("exit-window-probe", r#"{"state":{"count":4},"version":1}"#)
            .expect("write succeeds");

        let loaded: Probe = load_frame(&store).expect("load succeeds");

        assert_eq!(loaded.count, 4);
        assert_eq!(loaded.label, "");
    }

    #[test]
    fn wipe_only_touches_owned_keys() {
        let store = MemoryStore::default();
        store.write("exit-window-notes", "{}").expect("write");
        store.write("exit-window-store", "{}").expect("write");
        store.write("other-app", "{}").expect("write");

        let mut removed = wipe(&store).expect("wipe succeeds");
        removed.sort();

        assert_eq!(removed, vec!["exit-window-notes", "exit-window-store"]);
        assert_eq!(store.keys().expect("keys"), vec!["other-app".to_string()]);
    }

    #[test]
    fn unique_id_appends_a_counter_on_collision() {
        let existing = ["a", "a-2"];
        let id = unique_id("a".to_string(), existing.iter().copied());
        assert_eq!(id, "a-3");
        assert_eq!(unique_id("b".to_string(), existing.iter().copied()), "b");
    }
}

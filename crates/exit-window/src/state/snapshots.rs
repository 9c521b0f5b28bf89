use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, unique_id, Frame, RecordError};
use crate::domain::{Snapshot, SnapshotInput};

/// Snapshot history, newest first. Entries are never edited after capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotLog {
    pub snapshots: Vec<Snapshot>,
}

impl Frame for SnapshotLog {
    const SUFFIX: &'static str = "snapshots";
}

/// Differences between an earlier and a later snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotComparison {
    pub earlier_id: String,
    pub later_id: String,
    pub resolved_blockers: Vec<String>,
    pub introduced_blockers: Vec<String>,
    pub resolved_unknowns: Vec<String>,
    pub introduced_unknowns: Vec<String>,
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn missing_from(source: &[String], other: &[String]) -> Vec<String> {
    source
        .iter()
        .filter(|item| !other.contains(item))
        .cloned()
        .collect()
}

impl SnapshotLog {
    pub fn add(&mut self, input: SnapshotInput, now: DateTime<Utc>) -> Result<&Snapshot, RecordError> {
        let summary = require_text(&input.summary, "summary")?;
        let label = input
            .label
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty());
        let created_at = input.created_at.unwrap_or(now);

        let base_id = format!(
            "{}-{summary}",
            created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        let id = unique_id(base_id, self.snapshots.iter().map(|s| s.id.as_str()));

        self.snapshots.insert(
            0,
            Snapshot {
                id,
                created_at,
                summary,
                known_blockers: clean_list(input.known_blockers),
                unknowns: clean_list(input.unknowns),
                notes: input.notes,
                label,
            },
        );
        Ok(&self.snapshots[0])
    }

    pub fn reset(&mut self) {
        self.snapshots.clear();
    }

    pub fn find(&self, id: &str) -> Result<&Snapshot, RecordError> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.id == id)
            .ok_or_else(|| RecordError::NotFound {
                kind: "snapshot",
                id: id.to_string(),
            })
    }

    /// The two most recent snapshots by capture time.
    pub fn latest(&self) -> Vec<&Snapshot> {
        let mut ordered: Vec<&Snapshot> = self.snapshots.iter().collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        ordered.truncate(2);
        ordered
    }

    /// Compares two snapshots, ordering them by capture time regardless of argument order.
    pub fn compare(&self, first: &str, second: &str) -> Result<SnapshotComparison, RecordError> {
        let first = self.find(first)?;
        let second = self.find(second)?;
        let (earlier, later) = if first.created_at <= second.created_at {
            (first, second)
        } else {
            (second, first)
        };

        Ok(SnapshotComparison {
            earlier_id: earlier.id.clone(),
            later_id: later.id.clone(),
            resolved_blockers: missing_from(&earlier.known_blockers, &later.known_blockers),
            introduced_blockers: missing_from(&later.known_blockers, &earlier.known_blockers),
            resolved_unknowns: missing_from(&earlier.unknowns, &later.unknowns),
            introduced_unknowns: missing_from(&later.unknowns, &earlier.unknowns),
        })
    }
}

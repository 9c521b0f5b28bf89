use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, unique_id, Frame, RecordError};
use crate::domain::{PreDepartureStatus, TimeConstraint, TimeConstraintPatch};

/// The user's own pre-departure view. Status is never derived from an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreDepartureFrame {
    pub status: PreDepartureStatus,
    pub top_blockers: Vec<String>,
    pub next_required_condition: String,
    pub time_constraints: Vec<TimeConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_change_at: Option<DateTime<Utc>>,
}

impl Frame for PreDepartureFrame {
    const SUFFIX: &'static str = "pre-departure";
}

/// Signed whole days from `today` to `target`; negative once the date has passed.
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    target.signed_duration_since(today).num_days()
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

impl PreDepartureFrame {
    pub fn set_status(&mut self, status: PreDepartureStatus) {
        self.status = status;
    }

    pub fn add_top_blocker(&mut self, blocker: &str) -> Result<(), RecordError> {
        let blocker = require_text(blocker, "blocker")?;
        self.top_blockers.push(blocker);
        Ok(())
    }

    pub fn remove_top_blocker(&mut self, index: usize) -> Result<String, RecordError> {
        if index >= self.top_blockers.len() {
            return Err(RecordError::OutOfRange {
                kind: "top blocker",
                index,
            });
        }
        Ok(self.top_blockers.remove(index))
    }

    pub fn set_next_required_condition(&mut self, condition: &str) {
        self.next_required_condition = condition.trim().to_string();
    }

    pub fn add_time_constraint(
        &mut self,
        label: &str,
        target_date: Option<NaiveDate>,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&TimeConstraint, RecordError> {
        let label = require_text(label, "label")?;
        let id = unique_id(
            now.timestamp_millis().to_string(),
            self.time_constraints.iter().map(|t| t.id.as_str()),
        );

        self.time_constraints.push(TimeConstraint {
            id,
            label,
            target_date,
            note: optional_text(note),
        });
        let last = self.time_constraints.len() - 1;
        Ok(&self.time_constraints[last])
    }

    pub fn update_time_constraint(
        &mut self,
        id: &str,
        patch: TimeConstraintPatch,
    ) -> Result<&TimeConstraint, RecordError> {
        let entry = self
            .time_constraints
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| RecordError::NotFound {
                kind: "time constraint",
                id: id.to_string(),
            })?;

        if let Some(label) = patch.label {
            entry.label = require_text(&label, "label")?;
        }
        if patch.target_date.is_some() {
            entry.target_date = patch.target_date;
        }
        if patch.note.is_some() {
            entry.note = optional_text(patch.note);
        }
        Ok(&*entry)
    }

    pub fn remove_time_constraint(&mut self, id: &str) -> Result<TimeConstraint, RecordError> {
        let position = self
            .time_constraints
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| RecordError::NotFound {
                kind: "time constraint",
                id: id.to_string(),
            })?;
        Ok(self.time_constraints.remove(position))
    }

    pub fn mark_changes_reviewed(&mut self, at: DateTime<Utc>) {
        self.last_reviewed_change_at = Some(at);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

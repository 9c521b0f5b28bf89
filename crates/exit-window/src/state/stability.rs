use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, unique_id, Frame, RecordError};
use crate::domain::{StabilityFocus, StabilityFocusInput, StabilityFocusPatch, StabilityStatus};

pub const DEFAULT_STABILITY_STATEMENT: &str =
    "Waiting is correct right now. Keep the essentials steady.";

/// Holding-pattern frame: whether stability mode is on, its statement, and the focuses to watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityFrame {
    pub active: bool,
    pub statement: String,
    pub focuses: Vec<StabilityFocus>,
}

impl Default for StabilityFrame {
    fn default() -> Self {
        Self {
            active: false,
            statement: DEFAULT_STABILITY_STATEMENT.to_string(),
            focuses: Vec::new(),
        }
    }
}

impl Frame for StabilityFrame {
    const SUFFIX: &'static str = "stability";
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

impl StabilityFrame {
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Stores the statement as written; a blank statement restores the default one.
    pub fn set_statement(&mut self, statement: &str) {
        self.statement = if statement.trim().is_empty() {
            DEFAULT_STABILITY_STATEMENT.to_string()
        } else {
            statement.to_string()
        };
    }

    pub fn add_focus(
        &mut self,
        input: StabilityFocusInput,
        now: DateTime<Utc>,
    ) -> Result<&StabilityFocus, RecordError> {
        let label = require_text(&input.label, "label")?;
        let must_remain_stable = require_text(&input.must_remain_stable, "must remain stable")?;
        let status = input.status.unwrap_or_default();

        let base_id = optional_text(input.id).unwrap_or_else(|| now.timestamp_millis().to_string());
        let id = unique_id(base_id, self.focuses.iter().map(|f| f.id.as_str()));

        self.focuses.push(StabilityFocus {
            id,
            label,
            must_remain_stable,
            status,
            note: optional_text(input.note),
            flagged_at: input
                .flagged_at
                .or_else(|| (status == StabilityStatus::Degrading).then_some(now)),
        });
        let last = self.focuses.len() - 1;
        Ok(&self.focuses[last])
    }

    pub fn update_focus(
        &mut self,
        id: &str,
        patch: StabilityFocusPatch,
        now: DateTime<Utc>,
    ) -> Result<&StabilityFocus, RecordError> {
        let focus = self
            .focuses
            .iter_mut()
            .find(|focus| focus.id == id)
            .ok_or_else(|| RecordError::NotFound {
                kind: "stability focus",
                id: id.to_string(),
            })?;

        if let Some(label) = patch.label {
            focus.label = require_text(&label, "label")?;
        }
        if let Some(must_remain_stable) = patch.must_remain_stable {
            focus.must_remain_stable = require_text(&must_remain_stable, "must remain stable")?;
        }
        if patch.note.is_some() {
            focus.note = optional_text(patch.note);
        }
        if let Some(status) = patch.status {
            focus.status = status;
            if status == StabilityStatus::Degrading {
                focus.flagged_at = Some(now);
            }
        }
        Ok(&*focus)
    }

    pub fn remove_focus(&mut self, id: &str) -> Result<StabilityFocus, RecordError> {
        let position = self
            .focuses
            .iter()
            .position(|focus| focus.id == id)
            .ok_or_else(|| RecordError::NotFound {
                kind: "stability focus",
                id: id.to_string(),
            })?;
        Ok(self.focuses.remove(position))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// One warning per degrading focus, in focus order.
    pub fn warnings(&self) -> Vec<String> {
        self.focuses
            .iter()
            .filter(|focus| focus.status == StabilityStatus::Degrading)
            .map(|focus| match &focus.note {
                Some(note) => format!("Stability is degrading for {}: {note}.", focus.label),
                None => format!("Stability is degrading for {}.", focus.label),
            })
            .collect()
    }
}

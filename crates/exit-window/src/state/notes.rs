use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, unique_id, Frame, RecordError};
use crate::domain::{ScopedNote, ScopedNoteContext};

/// Reflection notes scoped to a constraint, snapshot, or blocker. Newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesFrame {
    pub notes: Vec<ScopedNote>,
}

impl Frame for NotesFrame {
    const SUFFIX: &'static str = "notes";
}

impl NotesFrame {
    pub fn add(
        &mut self,
        context: ScopedNoteContext,
        context_id: &str,
        text: &str,
        created_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<&ScopedNote, RecordError> {
        let text = require_text(text, "note text")?;
        let context_id = require_text(context_id, "context id")?;
        let created_at = created_at.unwrap_or(now);

        let base_id = format!(
            "{}-{context_id}",
            created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        let id = unique_id(base_id, self.notes.iter().map(|note| note.id.as_str()));

        self.notes.insert(
            0,
            ScopedNote {
                id,
                context,
                context_id,
                text,
                created_at,
            },
        );
        Ok(&self.notes[0])
    }

    pub fn remove(&mut self, id: &str) -> Result<ScopedNote, RecordError> {
        let position = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or_else(|| RecordError::NotFound {
                kind: "note",
                id: id.to_string(),
            })?;
        Ok(self.notes.remove(position))
    }

    pub fn reset(&mut self) {
        self.notes.clear();
    }

    pub fn for_context<'a>(
        &'a self,
        context: ScopedNoteContext,
        context_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ScopedNote> + 'a {
        self.notes.iter().filter(move |note| {
            note.context == context && context_id.map_or(true, |id| note.context_id == id)
        })
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, unique_id, Frame, RecordError};
use crate::domain::{ChangeInput, ConstraintChangeEntry};

/// Constraint change log, newest first, with the last time the user reviewed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeLog {
    pub changes: Vec<ConstraintChangeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl Frame for ChangeLog {
    const SUFFIX: &'static str = "change-log";
}

impl ChangeLog {
    pub fn add(
        &mut self,
        input: ChangeInput,
        now: DateTime<Utc>,
    ) -> Result<&ConstraintChangeEntry, RecordError> {
        let title = require_text(&input.title, "title")?;
        let description = require_text(&input.description, "description")?;
        let recorded_at = input.recorded_at.unwrap_or(now);

        let base_id = format!(
            "{}-{title}",
            recorded_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        let id = unique_id(base_id, self.changes.iter().map(|c| c.id.as_str()));

        self.changes.insert(
            0,
            ConstraintChangeEntry {
                id,
                recorded_at,
                title,
                description,
                kind: input.kind,
                related_constraint: input.related_constraint,
            },
        );
        Ok(&self.changes[0])
    }

    pub fn mark_reviewed(&mut self, at: DateTime<Utc>) {
        self.last_reviewed_at = Some(at);
    }

    /// Entries recorded strictly after the last review; everything when never reviewed.
    pub fn since_last_review(&self) -> Vec<&ConstraintChangeEntry> {
        match self.last_reviewed_at {
            None => self.changes.iter().collect(),
            Some(reviewed) => self
                .changes
                .iter()
                .filter(|entry| entry.recorded_at > reviewed)
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        self.changes.clear();
        self.last_reviewed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConstraintChangeKind, ConstraintKind};
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, hour, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn input(title: &str, description: &str) -> ChangeInput {
        ChangeInput {
            title: title.to_string(),
            description: description.to_string(),
            kind: ConstraintChangeKind::BlockerResolved,
            related_constraint: Some(ConstraintKind::Legal),
            recorded_at: None,
        }
    }

    #[test]
    fn add_trims_and_prepends() {
        let mut log = ChangeLog::default();
        log.add(input("Visa", "Approved"), at(9)).expect("added");
        log.add(input(" Lease ", " Signed release "), at(10))
            .expect("added");

        assert_eq!(log.changes[0].title, "Lease");
        assert_eq!(log.changes[0].description, "Signed release");
        assert_eq!(log.changes[0].id, "2025-04-01T10:00:00.000Z-Lease");
        assert_eq!(log.changes[1].related_constraint, Some(ConstraintKind::Legal));
    }

    #[test]
    fn add_rejects_empty_fields() {
        let mut log = ChangeLog::default();
        assert_eq!(
            log.add(input(" ", "desc"), at(9)).unwrap_err(),
            RecordError::EmptyField("title")
        );
        assert_eq!(
            log.add(input("title", ""), at(9)).unwrap_err(),
            RecordError::EmptyField("description")
        );
        assert!(log.changes.is_empty());
    }

    #[test]
    fn since_last_review_is_strictly_after_the_review() {
        let mut log = ChangeLog::default();
        log.add(input("first", "one"), at(8)).expect("added");
        log.add(input("second", "two"), at(9)).expect("added");
        assert_eq!(log.since_last_review().len(), 2);

        log.mark_reviewed(at(8));
        let pending = log.since_last_review();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "second");

        log.mark_reviewed(at(9) + Duration::seconds(1));
        assert!(log.since_last_review().is_empty());
    }

    #[test]
    fn reset_clears_entries_and_review() {
        let mut log = ChangeLog::default();
        log.add(input("first", "one"), at(8)).expect("added");
        log.mark_reviewed(at(9));

        log.reset();

        assert_eq!(log, ChangeLog::default());
    }
}

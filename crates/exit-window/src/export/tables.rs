use chrono::SecondsFormat;

use super::ExportError;
use crate::domain::{ConstraintChangeEntry, Snapshot};

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// One row per snapshot; list columns are joined with "; ".
pub fn snapshots_csv(snapshots: &[Snapshot]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "created_at",
        "label",
        "summary",
        "known_blockers",
        "unknowns",
        "notes",
    ])?;

    for snapshot in snapshots {
        writer.write_record([
            snapshot.id.as_str(),
            snapshot
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .as_str(),
            snapshot.label.as_deref().unwrap_or_default(),
            snapshot.summary.as_str(),
            snapshot.known_blockers.join("; ").as_str(),
            snapshot.unknowns.join("; ").as_str(),
            snapshot.notes.as_str(),
        ])?;
    }

    finish(writer)
}

pub fn changes_csv(changes: &[ConstraintChangeEntry]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "recorded_at",
        "kind",
        "title",
        "description",
        "related_constraint",
    ])?;

    for change in changes {
        writer.write_record([
            change.id.as_str(),
            change
                .recorded_at
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .as_str(),
            change.kind.label(),
            change.title.as_str(),
            change.description.as_str(),
            change
                .related_constraint
                .map(|kind| kind.key())
                .unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConstraintChangeKind, ConstraintKind};
    use chrono::{TimeZone, Utc};

    #[test]
    fn snapshot_rows_quote_embedded_commas() {
        let created_at = Utc
            .with_ymd_and_hms(2025, 4, 1, 9, 0, 0)
            .single()
            .expect("valid instant");
        let snapshot = Snapshot {
            id: "s1".to_string(),
            created_at,
            summary: "Waiting, for now".to_string(),
            known_blockers: vec!["visa".to_string(), "lease".to_string()],
            unknowns: Vec::new(),
            notes: String::new(),
            label: Some("Q2".to_string()),
        };

        let csv = snapshots_csv(&[snapshot]).expect("csv renders");
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "id,created_at,label,summary,known_blockers,unknowns,notes"
        );
        assert_eq!(
            lines[1],
            "s1,2025-04-01T09:00:00.000Z,Q2,\"Waiting, for now\",visa; lease,,"
        );
    }

    #[test]
    fn change_rows_use_wire_labels() {
        let recorded_at = Utc
            .with_ymd_and_hms(2025, 4, 2, 0, 0, 0)
            .single()
            .expect("valid instant");
        let change = ConstraintChangeEntry {
            id: "c1".to_string(),
            recorded_at,
            title: "Runway".to_string(),
            description: "Savings grew".to_string(),
            kind: ConstraintChangeKind::ConstraintChanged,
            related_constraint: Some(ConstraintKind::CashRunway),
        };

        let csv = changes_csv(&[change]).expect("csv renders");

        assert_eq!(
            csv.lines().nth(1),
            Some("c1,2025-04-02T00:00:00.000Z,constraint-changed,Runway,Savings grew,cashRunway")
        );
    }

    #[test]
    fn empty_exports_still_carry_headers() {
        let csv = changes_csv(&[]).expect("csv renders");
        assert_eq!(csv.lines().count(), 1);
    }
}

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{ConstraintChangeEntry, Constraints, RiskBoundary, Snapshot};
use crate::state::{days_until, PreDepartureFrame, StabilityFrame};

const NONE_RECORDED: &str = "(none recorded)";

/// Everything the pre-departure summary reads, gathered at one instant.
#[derive(Debug, Clone)]
pub struct PreDeparturePack {
    pub generated_at: DateTime<Utc>,
    pub frame: PreDepartureFrame,
    pub constraints: Constraints,
    pub changes: Vec<ConstraintChangeEntry>,
    pub stability: StabilityFrame,
    pub risk_boundaries: Vec<RiskBoundary>,
    pub recent_snapshots: Vec<Snapshot>,
}

fn with_note(line: String, note: &str) -> String {
    if note.trim().is_empty() {
        line
    } else {
        format!("{line} | {note}")
    }
}

/// One line per constraint section, prefixed with "- ".
pub fn format_constraints(constraints: &Constraints) -> String {
    let housing = &constraints.housing;
    let mut housing_line = format!("Housing: {}", housing.status.label());
    if let Some(date) = housing.lease_end_date {
        housing_line.push_str(&format!(", lease end {date}"));
    }
    if let Some(days) = housing.notice_days.filter(|days| *days > 0) {
        housing_line.push_str(&format!(", notice {days} days"));
    }

    let runway = &constraints.cash_runway;
    let mut runway_line = format!("Cash runway: {}", runway.status.label());
    if let Some(months) = runway.months {
        runway_line.push_str(&format!(" ({months} months)"));
    }

    [
        with_note(housing_line, &housing.note),
        with_note(
            format!("Income: {}", constraints.income.stability.label()),
            &constraints.income.note,
        ),
        with_note(runway_line, &runway.note),
        with_note(
            format!("Dependents: {}", constraints.dependents.coverage.label()),
            &constraints.dependents.note,
        ),
        with_note(
            format!("Healthcare: {}", constraints.healthcare.continuity.label()),
            &constraints.healthcare.note,
        ),
        with_note(
            format!("Legal: {}", constraints.legal.blocker.label()),
            &constraints.legal.note,
        ),
    ]
    .iter()
    .map(|line| format!("- {line}"))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn bullets_or(items: Vec<String>, empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join("\n")
    }
}

fn relative_days(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "in 1 day".to_string(),
        -1 => "1 day ago".to_string(),
        d if d > 0 => format!("in {d} days"),
        d => format!("{} days ago", -d),
    }
}

impl PreDeparturePack {
    pub fn to_plain_text(&self) -> String {
        let frame = &self.frame;
        let today = self.generated_at.date_naive();

        let next_condition = if frame.next_required_condition.is_empty() {
            "(unspecified)"
        } else {
            frame.next_required_condition.as_str()
        };

        let blockers = bullets_or(
            frame
                .top_blockers
                .iter()
                .map(|blocker| format!("- {blocker}"))
                .collect(),
            NONE_RECORDED,
        );

        let time_constraints = bullets_or(
            frame
                .time_constraints
                .iter()
                .map(|item| {
                    let mut line = format!("- {}", item.label);
                    if let Some(date) = item.target_date {
                        let relative = relative_days(days_until(date, today));
                        line.push_str(&format!(" ({date}, {relative})"));
                    }
                    with_note(line, item.note.as_deref().unwrap_or_default())
                })
                .collect(),
            NONE_RECORDED,
        );

        let changes = bullets_or(
            self.changes
                .iter()
                .map(|change| {
                    format!(
                        "- {}: {}: {}",
                        change.kind.label(),
                        change.title,
                        change.description
                    )
                })
                .collect(),
            NONE_RECORDED,
        );

        let stability = &self.stability;
        let focuses = bullets_or(
            stability
                .focuses
                .iter()
                .map(|focus| {
                    with_note(
                        format!(
                            "- {} [{}]: {}",
                            focus.label,
                            focus.status.label(),
                            focus.must_remain_stable
                        ),
                        focus.note.as_deref().unwrap_or_default(),
                    )
                })
                .collect(),
            NONE_RECORDED,
        );
        let warnings = bullets_or(
            stability
                .warnings()
                .into_iter()
                .map(|warning| format!("- {warning}"))
                .collect(),
            "(none)",
        );

        let boundaries = bullets_or(
            self.risk_boundaries
                .iter()
                .map(|boundary| format!("- {}: {}", boundary.category.label(), boundary.description))
                .collect(),
            NONE_RECORDED,
        );

        let snapshots = if self.recent_snapshots.is_empty() {
            "(no snapshots)".to_string()
        } else {
            self.recent_snapshots
                .iter()
                .map(render_snapshot)
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        [
            "Pre-Departure Summary".to_string(),
            format!("Status: {}", frame.status.label()),
            format!("Next required condition: {next_condition}"),
            format!("Top blockers:\n{blockers}"),
            format!("Time-based constraints:\n{time_constraints}"),
            format!("Constraints:\n{}", format_constraints(&self.constraints)),
            format!("Change log (explicit only):\n{changes}"),
            format!(
                "Stability mode: {}",
                if stability.active { "active" } else { "inactive" }
            ),
            format!("Stability statement: {}", stability.statement),
            format!("Stability focuses:\n{focuses}"),
            format!("Stability warnings:\n{warnings}"),
            format!("Risk boundaries:\n{boundaries}"),
            format!("Latest snapshots:\n{snapshots}"),
        ]
        .join("\n\n")
    }

    /// Standalone HTML page wrapping the escaped plain text.
    pub fn to_printable_html(&self) -> String {
        let body = escape_html(&self.to_plain_text()).replace('\n', "<br/>");
        format!(
            "<!doctype html><html><head><meta charset=\"utf-8\"><title>Pre-Departure Summary</title>\
             <style>body{{font-family:ui-sans-serif,system-ui;max-width:720px;margin:32px auto;padding:0 16px;color:#0f172a;}}\
             h1{{font-size:20px;margin-bottom:12px;}}\
             pre{{white-space:pre-wrap;font-size:14px;line-height:1.6;background:#f8fafc;padding:16px;border:1px solid #e2e8f0;border-radius:12px;}}</style>\
             </head><body><h1>Pre-Departure Summary</h1><pre>{body}</pre></body></html>"
        )
    }
}

fn render_snapshot(snapshot: &Snapshot) -> String {
    let join_or_none = |items: &[String]| {
        if items.is_empty() {
            "none".to_string()
        } else {
            items.join(", ")
        }
    };
    let notes = if snapshot.notes.trim().is_empty() {
        "(none)"
    } else {
        snapshot.notes.as_str()
    };

    format!(
        "- {} @ {}\n  Summary: {}\n  Known blockers: {}\n  Unknowns: {}\n  Notes: {}",
        snapshot.label.as_deref().unwrap_or("Snapshot"),
        snapshot
            .created_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        snapshot.summary,
        join_or_none(&snapshot.known_blockers),
        join_or_none(&snapshot.unknowns),
        notes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ConstraintChangeKind, HousingStatus, PreDepartureStatus, RiskBoundaryCategory,
        StabilityFocus, StabilityStatus, TimeConstraint,
    };
    use chrono::{NaiveDate, TimeZone};

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn empty_pack() -> PreDeparturePack {
        PreDeparturePack {
            generated_at: instant(),
            frame: PreDepartureFrame::default(),
            constraints: Constraints::default(),
            changes: Vec::new(),
            stability: StabilityFrame::default(),
            risk_boundaries: Vec::new(),
            recent_snapshots: Vec::new(),
        }
    }

    #[test]
    fn empty_pack_uses_placeholders() {
        let text = empty_pack().to_plain_text();
        let sections: Vec<&str> = text.split("\n\n").collect();

        assert_eq!(sections[0], "Pre-Departure Summary");
        assert_eq!(sections[1], "Status: not-yet");
        assert_eq!(sections[2], "Next required condition: (unspecified)");
        assert_eq!(sections[3], "Top blockers:\n(none recorded)");
        assert_eq!(sections[4], "Time-based constraints:\n(none recorded)");
        assert!(sections[5].starts_with("Constraints:\n- Housing: unknown\n- Income: unknown"));
        assert_eq!(sections[6], "Change log (explicit only):\n(none recorded)");
        assert_eq!(sections[7], "Stability mode: inactive");
        assert_eq!(
            sections[8],
            "Stability statement: Waiting is correct right now. Keep the essentials steady."
        );
        assert_eq!(sections[10], "Stability warnings:\n(none)");
        assert_eq!(sections[11], "Risk boundaries:\n(none recorded)");
        assert_eq!(sections[12], "Latest snapshots:\n(no snapshots)");
    }

    #[test]
    fn populated_pack_lists_every_record() {
        let mut pack = empty_pack();
        pack.frame.status = PreDepartureStatus::WindowOpen;
        pack.frame.top_blockers = vec!["Visa appointment".to_string()];
        pack.frame.time_constraints = vec![TimeConstraint {
            id: "t1".to_string(),
            label: "Give notice".to_string(),
            target_date: NaiveDate::from_ymd_opt(2025, 4, 11),
            note: Some("60 days".to_string()),
        }];
        pack.constraints.housing.status = HousingStatus::NoticeRequired;
        pack.constraints.housing.notice_days = Some(60);
        pack.constraints.cash_runway.months = Some(2.5);
        pack.changes = vec![ConstraintChangeEntry {
            id: "c1".to_string(),
            recorded_at: instant(),
            title: "Visa".to_string(),
            description: "Approved".to_string(),
            kind: ConstraintChangeKind::BlockerResolved,
            related_constraint: None,
        }];
        pack.stability.focuses = vec![StabilityFocus {
            id: "f1".to_string(),
            label: "Job".to_string(),
            must_remain_stable: "Keep hours".to_string(),
            status: StabilityStatus::Degrading,
            note: Some("hours cut".to_string()),
            flagged_at: Some(instant()),
        }];
        pack.risk_boundaries = vec![RiskBoundary {
            id: "r1".to_string(),
            category: RiskBoundaryCategory::ForcedMove,
            description: "Building sold".to_string(),
            added_at: instant(),
        }];

        let text = pack.to_plain_text();

        assert!(text.contains("Status: window-open"));
        assert!(text.contains("Top blockers:\n- Visa appointment"));
        assert!(text.contains("- Give notice (2025-04-11, in 10 days) | 60 days"));
        assert!(text.contains("- Housing: notice-required, notice 60 days"));
        assert!(text.contains("- Cash runway: unknown (2.5 months)"));
        assert!(text.contains("- blocker-resolved: Visa: Approved"));
        assert!(text.contains("- Job [degrading]: Keep hours | hours cut"));
        assert!(text.contains("- Stability is degrading for Job: hours cut."));
        assert!(text.contains("- forced-move: Building sold"));
    }

    #[test]
    fn snapshots_render_with_fallbacks() {
        let mut pack = empty_pack();
        pack.recent_snapshots = vec![Snapshot {
            id: "s1".to_string(),
            created_at: instant(),
            summary: "Baseline".to_string(),
            known_blockers: Vec::new(),
            unknowns: vec!["lease".to_string(), "visa".to_string()],
            notes: String::new(),
            label: None,
        }];

        let text = pack.to_plain_text();

        assert!(text.ends_with(
            "Latest snapshots:\n- Snapshot @ 2025-04-01T09:00:00.000Z\n  Summary: Baseline\n  Known blockers: none\n  Unknowns: lease, visa\n  Notes: (none)"
        ));
    }

    #[test]
    fn printable_html_escapes_and_breaks_lines() {
        let mut pack = empty_pack();
        pack.frame.next_required_condition = "Landlord's <signed> release & keys".to_string();

        let html = pack.to_printable_html();

        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains(
            "Next required condition: Landlord&#039;s &lt;signed&gt; release &amp; keys<br/>"
        ));
        assert!(!html.contains("<signed>"));
        assert!(html.ends_with("</pre></body></html>"));
    }

    #[test]
    fn constraint_notes_follow_a_bar() {
        let mut constraints = Constraints::default();
        constraints.legal.note = "waiting on embassy".to_string();

        let formatted = format_constraints(&constraints);

        assert_eq!(formatted.lines().count(), 6);
        assert!(formatted.ends_with("- Legal: unknown | waiting on embassy"));
    }
}

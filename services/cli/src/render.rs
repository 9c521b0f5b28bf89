use chrono::SecondsFormat;
use exit_window::domain::{
    ConstraintChangeEntry, Constraints, RiskBoundary, ScopedNote, Snapshot, StabilityFocus,
    TimeConstraint,
};
use exit_window::export::format_constraints;
use exit_window::state::{
    days_until, ContinuityChecks, PreDepartureFrame, SnapshotComparison, StabilityFrame,
};
use exit_window::EvaluationResult;

fn bullets(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return format!("{title}: none");
    }
    let mut out = format!("{title}:");
    for item in items {
        out.push_str(&format!("\n  - {item}"));
    }
    out
}

pub(crate) fn evaluation(result: &EvaluationResult) -> String {
    let mut lines = vec![
        format!("Status: {}", result.status.label()),
        format!("Earliest window: {}", result.earliest_window),
        format!("Summary: {}", result.summary),
        bullets("Reasons", &result.reasons),
        bullets("Hard blockers", &result.hard_blockers),
        bullets("Soft blockers", &result.soft_blockers),
    ];
    let steps: Vec<String> = result
        .ordered_steps
        .iter()
        .enumerate()
        .map(|(index, step)| format!("{}. {step}", index + 1))
        .collect();
    lines.push(bullets("Next steps", &steps));
    lines.push(format!(
        "Generated at: {}",
        result.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    lines.join("\n")
}

pub(crate) fn constraints(constraints: &Constraints) -> String {
    format!("Constraints\n{}", format_constraints(constraints))
}

pub(crate) fn snapshot(snapshot: &Snapshot) -> String {
    let mut out = format!(
        "{} [{}] {}",
        snapshot.id,
        snapshot.label.as_deref().unwrap_or("Snapshot"),
        snapshot.summary
    );
    if !snapshot.known_blockers.is_empty() {
        out.push_str(&format!("\n  blockers: {}", snapshot.known_blockers.join(", ")));
    }
    if !snapshot.unknowns.is_empty() {
        out.push_str(&format!("\n  unknowns: {}", snapshot.unknowns.join(", ")));
    }
    if !snapshot.notes.is_empty() {
        out.push_str(&format!("\n  notes: {}", snapshot.notes));
    }
    out
}

pub(crate) fn comparison(comparison: &SnapshotComparison) -> String {
    [
        format!("Comparing {} -> {}", comparison.earlier_id, comparison.later_id),
        bullets("Resolved blockers", &comparison.resolved_blockers),
        bullets("New blockers", &comparison.introduced_blockers),
        bullets("Resolved unknowns", &comparison.resolved_unknowns),
        bullets("New unknowns", &comparison.introduced_unknowns),
    ]
    .join("\n")
}

pub(crate) fn note(note: &ScopedNote) -> String {
    format!(
        "{} [{}:{}] {}",
        note.id,
        note.context.label(),
        note.context_id,
        note.text
    )
}

pub(crate) fn boundary(boundary: &RiskBoundary) -> String {
    format!(
        "{} [{}] {}",
        boundary.id,
        boundary.category.label(),
        boundary.description
    )
}

pub(crate) fn change(change: &ConstraintChangeEntry) -> String {
    let related = change
        .related_constraint
        .map(|kind| format!(" ({})", kind.label()))
        .unwrap_or_default();
    format!(
        "{} [{}] {}{related}: {}",
        change.id,
        change.kind.label(),
        change.title,
        change.description
    )
}

pub(crate) fn focus(focus: &StabilityFocus) -> String {
    let note = focus
        .note
        .as_deref()
        .map(|note| format!(" | {note}"))
        .unwrap_or_default();
    format!(
        "{} {} [{}]: {}{note}",
        focus.id,
        focus.label,
        focus.status.label(),
        focus.must_remain_stable
    )
}

pub(crate) fn stability(frame: &StabilityFrame) -> String {
    let mut lines = vec![
        format!(
            "Stability mode: {}",
            if frame.active { "active" } else { "inactive" }
        ),
        format!("Statement: {}", frame.statement),
    ];
    if frame.focuses.is_empty() {
        lines.push("Focuses: none".to_string());
    } else {
        lines.push("Focuses:".to_string());
        lines.extend(frame.focuses.iter().map(|f| format!("  - {}", focus(f))));
    }
    for warning in frame.warnings() {
        lines.push(format!("warning: {warning}"));
    }
    lines.join("\n")
}

fn time_constraint(item: &TimeConstraint, today: chrono::NaiveDate) -> String {
    let due = item
        .target_date
        .map(|date| format!(" due {date} ({} days)", days_until(date, today)))
        .unwrap_or_default();
    let note = item
        .note
        .as_deref()
        .map(|note| format!(" | {note}"))
        .unwrap_or_default();
    format!("{} {}{due}{note}", item.id, item.label)
}

pub(crate) fn pre_departure(frame: &PreDepartureFrame, today: chrono::NaiveDate) -> String {
    let blockers: Vec<String> = frame
        .top_blockers
        .iter()
        .enumerate()
        .map(|(index, blocker)| format!("[{index}] {blocker}"))
        .collect();
    let times: Vec<String> = frame
        .time_constraints
        .iter()
        .map(|item| time_constraint(item, today))
        .collect();
    let condition = if frame.next_required_condition.is_empty() {
        "(unspecified)"
    } else {
        frame.next_required_condition.as_str()
    };

    [
        format!("Status: {}", frame.status.badge()),
        format!("Next required condition: {condition}"),
        bullets("Top blockers", &blockers),
        bullets("Time-based constraints", &times),
    ]
    .join("\n")
}

pub(crate) fn continuity(checks: &ContinuityChecks) -> String {
    let mut lines: Vec<String> = exit_window::domain::ContinuityKey::ordered()
        .into_iter()
        .map(|key| format!("{:<18} {}", key.key(), checks.status(key).label()))
        .collect();
    lines.push(format!("{} open", checks.open_items().len()));
    lines.join("\n")
}

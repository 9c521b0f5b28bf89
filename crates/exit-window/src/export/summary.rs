use crate::evaluation::EvaluationResult;

fn bullet_section(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        format!("{title}: none")
    } else {
        format!("{title}:\n- {}", items.join("\n- "))
    }
}

/// Plain-text rendering of the last evaluation, sections separated by blank lines.
pub fn evaluation_summary_text(result: Option<&EvaluationResult>) -> String {
    let Some(result) = result else {
        return "No evaluation available.".to_string();
    };

    [
        format!("Status: {}", result.status.label()),
        format!("Earliest window: {}", result.earliest_window),
        bullet_section("Hard blockers", &result.hard_blockers),
        bullet_section("Soft blockers", &result.soft_blockers),
        format!("Summary: {}", result.summary),
        bullet_section("Step order", &result.ordered_steps),
    ]
    .join("\n\n")
}

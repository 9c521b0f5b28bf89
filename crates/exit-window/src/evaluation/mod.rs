//! Constraint evaluation: maps a full [`Constraints`] record to a readiness verdict.
//!
//! The evaluator is a pure, total function. The only ambient input is the clock used for
//! `generated_at`, which callers inject through [`evaluate_with`].

mod clock;
mod policy;
mod rules;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use policy::ExitStatus;
pub use rules::{HardBlocker, RemediationStep, SoftBlocker};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Constraints;
use policy::estimate_window;

/// Evaluation output; replaced wholesale on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub status: ExitStatus,
    pub hard_blockers: Vec<String>,
    pub soft_blockers: Vec<String>,
    pub earliest_window: String,
    pub reasons: Vec<String>,
    pub summary: String,
    pub ordered_steps: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl EvaluationResult {
    pub fn is_ready(&self) -> bool {
        self.status == ExitStatus::Ready
    }
}

/// Evaluate against wall-clock time.
pub fn evaluate(constraints: &Constraints) -> EvaluationResult {
    evaluate_with(constraints, &SystemClock)
}

pub fn evaluate_with(constraints: &Constraints, clock: &dyn Clock) -> EvaluationResult {
    let signals = rules::classify(constraints);

    let hard_blockers: Vec<String> = signals
        .hard
        .iter()
        .map(|rule| rule.message().to_string())
        .collect();
    let soft_blockers: Vec<String> = signals
        .soft
        .iter()
        .map(|rule| rule.message().to_string())
        .collect();

    let window = estimate_window(
        &constraints.housing,
        hard_blockers.len(),
        soft_blockers.len(),
    );
    let status = ExitStatus::from_hard_blocker_count(hard_blockers.len());

    let mut reasons = Vec::new();
    reasons.extend(window.notice_reason);
    match status {
        ExitStatus::NotYet => reasons.extend(hard_blockers.iter().cloned()),
        ExitStatus::Ready => reasons.extend(soft_blockers.iter().cloned()),
    }

    let ordered_steps = signals
        .steps
        .iter()
        .map(|step| step.message().to_string())
        .collect();

    EvaluationResult {
        status,
        hard_blockers,
        soft_blockers,
        earliest_window: window.earliest_window,
        reasons,
        summary: status.summary().to_string(),
        ordered_steps,
        generated_at: clock.now(),
    }
}

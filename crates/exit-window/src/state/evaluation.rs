use serde::{Deserialize, Serialize};

use super::Frame;
use crate::domain::Constraints;
use crate::evaluation::{evaluate_with, Clock, EvaluationResult};

/// Holds the most recent evaluation. Never updated incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluationFrame {
    pub last_result: Option<EvaluationResult>,
}

impl Frame for EvaluationFrame {
    const SUFFIX: &'static str = "evaluation";
}

impl EvaluationFrame {
    pub fn evaluate(&mut self, constraints: &Constraints, clock: &dyn Clock) -> &EvaluationResult {
        self.last_result.insert(evaluate_with(constraints, clock))
    }

    pub fn clear(&mut self) {
        self.last_result = None;
    }
}

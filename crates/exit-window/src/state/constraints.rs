use serde::{Deserialize, Serialize};

use super::Frame;
use crate::domain::{ConstraintPatch, Constraints};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintsFrame {
    pub constraints: Constraints,
}

impl Frame for ConstraintsFrame {
    const SUFFIX: &'static str = "constraints";
}

impl ConstraintsFrame {
    pub fn update(&mut self, patch: ConstraintPatch) {
        self.constraints.apply(patch);
    }

    pub fn reset(&mut self) {
        self.constraints = Constraints::default();
    }
}

use serde::{Deserialize, Serialize};

use super::Frame;
use crate::domain::AppMode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeFrame {
    pub mode: AppMode,
}

impl Frame for ModeFrame {
    const SUFFIX: &'static str = "mode";
}

impl ModeFrame {
    pub fn set(&mut self, mode: AppMode) {
        self.mode = mode;
    }
}

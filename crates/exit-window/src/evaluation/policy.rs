use serde::{Deserialize, Serialize};

use crate::domain::HousingConstraint;

/// Readiness verdict. `NotYet` whenever at least one hard blocker fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitStatus {
    Ready,
    NotYet,
}

impl ExitStatus {
    pub(crate) fn from_hard_blocker_count(count: usize) -> Self {
        if count > 0 {
            Self::NotYet
        } else {
            Self::Ready
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::NotYet => "not-yet",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::Ready => "Constraints allow an exit window once soft blockers are addressed.",
            Self::NotYet => "Relocation is not yet possible due to hard blockers.",
        }
    }
}

pub(crate) const WINDOW_BLOCKED: &str = "Not available until hard blockers are removed";
pub(crate) const WINDOW_PENDING_HOUSING: &str = "Earliest after confirming housing exit timing";
pub(crate) const WINDOW_OPEN_NOW: &str = "Window opens now";

pub(crate) struct WindowEstimate {
    pub earliest_window: String,
    pub notice_reason: Option<String>,
}

/// Human-readable window estimate; deliberately not a parsed date.
pub(crate) fn estimate_window(
    housing: &HousingConstraint,
    hard_count: usize,
    soft_count: usize,
) -> WindowEstimate {
    if hard_count > 0 {
        return WindowEstimate {
            earliest_window: WINDOW_BLOCKED.to_string(),
            notice_reason: None,
        };
    }

    let Some(lease_end) = housing.lease_end_date else {
        let earliest_window = if soft_count == 0 {
            WINDOW_OPEN_NOW
        } else {
            WINDOW_PENDING_HOUSING
        };
        return WindowEstimate {
            earliest_window: earliest_window.to_string(),
            notice_reason: None,
        };
    };

    // The notice line is emitted whether or not soft blockers remain.
    let notice_reason = housing
        .notice_days
        .filter(|days| *days > 0)
        .map(|days| format!("Send housing notice {days} days before {lease_end}."));

    let earliest_window = if soft_count == 0 {
        format!("After {lease_end}")
    } else {
        format!("Earliest after lease end on {lease_end}")
    };

    WindowEstimate {
        earliest_window,
        notice_reason,
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::constraints::ConstraintKind;

/// Immutable record of how readiness looked at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub summary: String,
    #[serde(default)]
    pub known_blockers: Vec<String>,
    #[serde(default)]
    pub unknowns: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// What a user supplies when capturing a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotInput {
    pub summary: String,
    pub known_blockers: Vec<String>,
    pub unknowns: Vec<String>,
    pub notes: String,
    pub label: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopedNoteContext {
    Constraint,
    Snapshot,
    Blocker,
}

impl ScopedNoteContext {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Constraint => "constraint",
            Self::Snapshot => "snapshot",
            Self::Blocker => "blocker",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedNote {
    pub id: String,
    pub context: ScopedNoteContext,
    pub context_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskBoundaryCategory {
    Abort,
    ForcedMove,
    Reassess,
}

impl RiskBoundaryCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::ForcedMove => "forced-move",
            Self::Reassess => "reassess",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBoundary {
    pub id: String,
    pub category: RiskBoundaryCategory,
    pub description: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintChangeKind {
    ConstraintChanged,
    BlockerResolved,
    BlockerIntroduced,
}

impl ConstraintChangeKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ConstraintChanged => "constraint-changed",
            Self::BlockerResolved => "blocker-resolved",
            Self::BlockerIntroduced => "blocker-introduced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintChangeEntry {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub kind: ConstraintChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_constraint: Option<ConstraintKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeInput {
    pub title: String,
    pub description: String,
    pub kind: ConstraintChangeKind,
    pub related_constraint: Option<ConstraintKind>,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StabilityStatus {
    #[default]
    Stable,
    Watch,
    Degrading,
}

impl StabilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Watch => "watch",
            Self::Degrading => "degrading",
        }
    }
}

/// Something that must stay steady while the exit is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityFocus {
    pub id: String,
    pub label: String,
    pub must_remain_stable: String,
    #[serde(default)]
    pub status: StabilityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilityFocusInput {
    pub id: Option<String>,
    pub label: String,
    pub must_remain_stable: String,
    pub status: Option<StabilityStatus>,
    pub note: Option<String>,
    pub flagged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilityFocusPatch {
    pub label: Option<String>,
    pub must_remain_stable: Option<String>,
    pub status: Option<StabilityStatus>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreDepartureStatus {
    #[default]
    NotYet,
    WindowOpen,
}

impl PreDepartureStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotYet => "not-yet",
            Self::WindowOpen => "window-open",
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            Self::NotYet => "Not yet",
            Self::WindowOpen => "Window open",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeConstraint {
    pub id: String,
    pub label: String,
    #[serde(
        default,
        deserialize_with = "super::deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeConstraintPatch {
    pub label: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContinuityKey {
    Comms,
    Access,
    IdentityInference,
    Cutoffs,
    AddressShadow,
    Jurisdiction,
    Mail,
    Devices,
    Cognitive,
    SupportTested,
    DocsAccess,
    Expectations,
}

impl ContinuityKey {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::Comms,
            Self::Access,
            Self::IdentityInference,
            Self::Cutoffs,
            Self::AddressShadow,
            Self::Jurisdiction,
            Self::Mail,
            Self::Devices,
            Self::Cognitive,
            Self::SupportTested,
            Self::DocsAccess,
            Self::Expectations,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Comms => "comms",
            Self::Access => "access",
            Self::IdentityInference => "identityInference",
            Self::Cutoffs => "cutoffs",
            Self::AddressShadow => "addressShadow",
            Self::Jurisdiction => "jurisdiction",
            Self::Mail => "mail",
            Self::Devices => "devices",
            Self::Cognitive => "cognitive",
            Self::SupportTested => "supportTested",
            Self::DocsAccess => "docsAccess",
            Self::Expectations => "expectations",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContinuityStatus {
    #[default]
    Open,
    Clear,
}

impl ContinuityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Clear => "clear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppMode {
    #[default]
    Planning,
    Holding,
}

impl AppMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Holding => "holding",
        }
    }
}

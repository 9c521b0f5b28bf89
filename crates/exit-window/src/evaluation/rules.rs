use serde::{Deserialize, Serialize};

use crate::domain::{
    Constraints, DependentsCoverage, HealthcareContinuity, HousingStatus, IncomeStability,
    LegalBlocker, RunwayStatus,
};

/// Conditions that make relocation impossible until resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardBlocker {
    LegalPresent,
    HealthcareAtRisk,
    DependentsUnsupported,
    RunwayUnderOneMonth,
}

impl HardBlocker {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::LegalPresent,
            Self::HealthcareAtRisk,
            Self::DependentsUnsupported,
            Self::RunwayUnderOneMonth,
        ]
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::LegalPresent => "Legal or administrative blocker present.",
            Self::HealthcareAtRisk => "Healthcare continuity is at risk.",
            Self::DependentsUnsupported => "Dependents do not have confirmed support.",
            Self::RunwayUnderOneMonth => "Cash runway is under 1 month.",
        }
    }

    pub fn applies(self, constraints: &Constraints) -> bool {
        match self {
            Self::LegalPresent => constraints.legal.blocker == LegalBlocker::Present,
            Self::HealthcareAtRisk => {
                constraints.healthcare.continuity == HealthcareContinuity::AtRisk
            }
            Self::DependentsUnsupported => {
                constraints.dependents.coverage == DependentsCoverage::Unsupported
            }
            Self::RunwayUnderOneMonth => constraints
                .cash_runway
                .months
                .is_some_and(|months| months < 1.0),
        }
    }
}

/// Conditions worth addressing that do not hold the exit back on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftBlocker {
    IncomeUnstable,
    RunwayTight,
    HousingNoticeRequired,
    HousingLockedIn,
    HousingUnknown,
    LegalUnknown,
    HealthcareUnknown,
    DependentsUnknown,
}

impl SoftBlocker {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::IncomeUnstable,
            Self::RunwayTight,
            Self::HousingNoticeRequired,
            Self::HousingLockedIn,
            Self::HousingUnknown,
            Self::LegalUnknown,
            Self::HealthcareUnknown,
            Self::DependentsUnknown,
        ]
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::IncomeUnstable => "Income is currently unstable.",
            Self::RunwayTight => "Cash runway is tight (<3 months).",
            Self::HousingNoticeRequired => "Housing requires notice before exit.",
            Self::HousingLockedIn => "Lease is locked beyond the desired exit window.",
            Self::HousingUnknown => "Housing end date is unknown.",
            Self::LegalUnknown => "Legal/administrative status is unknown.",
            Self::HealthcareUnknown => "Healthcare continuity needs confirmation.",
            Self::DependentsUnknown => "Dependents support plan is unknown.",
        }
    }

    pub fn applies(self, constraints: &Constraints) -> bool {
        match self {
            Self::IncomeUnstable => constraints.income.stability == IncomeStability::Unstable,
            // Status and months are checked independently; a "secure" status with
            // months in [1, 3) still counts as tight.
            Self::RunwayTight => {
                constraints.cash_runway.status == RunwayStatus::Tight
                    || constraints
                        .cash_runway
                        .months
                        .is_some_and(|months| (1.0..3.0).contains(&months))
            }
            Self::HousingNoticeRequired => {
                constraints.housing.status == HousingStatus::NoticeRequired
            }
            Self::HousingLockedIn => constraints.housing.status == HousingStatus::LockedIn,
            Self::HousingUnknown => constraints.housing.status == HousingStatus::Unknown,
            Self::LegalUnknown => constraints.legal.blocker == LegalBlocker::Unknown,
            Self::HealthcareUnknown => {
                constraints.healthcare.continuity == HealthcareContinuity::Unknown
            }
            Self::DependentsUnknown => {
                constraints.dependents.coverage == DependentsCoverage::Unknown
            }
        }
    }
}

/// Remediation checklist entries, keyed on field values rather than on fired blockers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationStep {
    ResolveLegal,
    SecureHealthcare,
    ConfirmDependentsSupport,
    ServeHousingNotice,
    ConfirmLeaseEndDate,
    StabilizeIncome,
    ExtendCashRunway,
}

impl RemediationStep {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::ResolveLegal,
            Self::SecureHealthcare,
            Self::ConfirmDependentsSupport,
            Self::ServeHousingNotice,
            Self::ConfirmLeaseEndDate,
            Self::StabilizeIncome,
            Self::ExtendCashRunway,
        ]
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::ResolveLegal => "Resolve legal or administrative blockers.",
            Self::SecureHealthcare => "Secure healthcare continuity.",
            Self::ConfirmDependentsSupport => "Confirm support plan for dependents.",
            Self::ServeHousingNotice => "Serve required housing notice.",
            Self::ConfirmLeaseEndDate => "Confirm lease end date.",
            Self::StabilizeIncome => "Stabilize income source.",
            Self::ExtendCashRunway => "Extend cash runway to 3+ months.",
        }
    }

    pub fn applies(self, constraints: &Constraints) -> bool {
        match self {
            Self::ResolveLegal => constraints.legal.blocker != LegalBlocker::Clear,
            Self::SecureHealthcare => {
                constraints.healthcare.continuity != HealthcareContinuity::Secured
            }
            Self::ConfirmDependentsSupport => {
                constraints.dependents.coverage != DependentsCoverage::Supported
            }
            Self::ServeHousingNotice => {
                constraints.housing.status == HousingStatus::NoticeRequired
            }
            Self::ConfirmLeaseEndDate => constraints.housing.lease_end_date.is_none(),
            Self::StabilizeIncome => constraints.income.stability != IncomeStability::Stable,
            Self::ExtendCashRunway => constraints.cash_runway.status != RunwayStatus::Secure,
        }
    }
}

pub(crate) struct BlockerSignals {
    pub hard: Vec<HardBlocker>,
    pub soft: Vec<SoftBlocker>,
    pub steps: Vec<RemediationStep>,
}

pub(crate) fn classify(constraints: &Constraints) -> BlockerSignals {
    let hard = HardBlocker::ordered()
        .into_iter()
        .filter(|rule| rule.applies(constraints))
        .collect();

    let soft = SoftBlocker::ordered()
        .into_iter()
        .filter(|rule| rule.applies(constraints))
        .collect();

    let steps = RemediationStep::ordered()
        .into_iter()
        .filter(|step| step.applies(constraints))
        .collect();

    BlockerSignals { hard, soft, steps }
}

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::{
    CashRunwayConstraint, Constraints, DependentsConstraint, DependentsCoverage,
    HealthcareConstraint, HealthcareContinuity, HousingConstraint, HousingStatus,
    IncomeConstraint, IncomeStability, LegalBlocker, LegalConstraint, RunwayStatus,
};
use crate::evaluation::{evaluate_with, EvaluationResult, FixedClock};

pub(super) fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn lease_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid lease end")
}

pub(super) fn run(constraints: &Constraints) -> EvaluationResult {
    evaluate_with(constraints, &FixedClock(fixed_instant()))
}

/// Every categorical field resolved favorably, lease end on 2025-06-30.
pub(super) fn resolved_constraints() -> Constraints {
    Constraints {
        housing: HousingConstraint {
            status: HousingStatus::Aligned,
            lease_end_date: Some(lease_end()),
            ..HousingConstraint::default()
        },
        income: IncomeConstraint {
            stability: IncomeStability::Stable,
            ..IncomeConstraint::default()
        },
        cash_runway: CashRunwayConstraint {
            status: RunwayStatus::Secure,
            months: Some(6.0),
            ..CashRunwayConstraint::default()
        },
        dependents: DependentsConstraint {
            coverage: DependentsCoverage::Supported,
            ..DependentsConstraint::default()
        },
        healthcare: HealthcareConstraint {
            continuity: HealthcareContinuity::Secured,
            ..HealthcareConstraint::default()
        },
        legal: LegalConstraint {
            blocker: LegalBlocker::Clear,
            ..LegalConstraint::default()
        },
    }
}

/// Resolved constraints with every hard-blocker condition switched on.
pub(super) fn fully_blocked_constraints() -> Constraints {
    let mut constraints = resolved_constraints();
    constraints.legal.blocker = LegalBlocker::Present;
    constraints.healthcare.continuity = HealthcareContinuity::AtRisk;
    constraints.dependents.coverage = DependentsCoverage::Unsupported;
    constraints.cash_runway.months = Some(0.25);
    constraints
}

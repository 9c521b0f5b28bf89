use super::common::*;
use crate::domain::{
    Constraints, DependentsCoverage, HealthcareContinuity, HousingStatus, IncomeStability,
    LegalBlocker, RunwayStatus,
};
use crate::evaluation::{ExitStatus, HardBlocker, SoftBlocker};

#[test]
fn hard_blockers_follow_fixed_order() {
    let result = run(&fully_blocked_constraints());

    let expected: Vec<String> = HardBlocker::ordered()
        .into_iter()
        .map(|rule| rule.message().to_string())
        .collect();
    assert_eq!(result.hard_blockers, expected);
    assert_eq!(result.status, ExitStatus::NotYet);
    assert_eq!(result.reasons, expected);
}

#[test]
fn each_hard_condition_alone_blocks_the_exit() {
    let cases: [(fn(&mut Constraints), &str); 4] = [
        (
            |c| c.legal.blocker = LegalBlocker::Present,
            "Legal or administrative blocker present.",
        ),
        (
            |c| c.healthcare.continuity = HealthcareContinuity::AtRisk,
            "Healthcare continuity is at risk.",
        ),
        (
            |c| c.dependents.coverage = DependentsCoverage::Unsupported,
            "Dependents do not have confirmed support.",
        ),
        (
            |c| c.cash_runway.months = Some(0.0),
            "Cash runway is under 1 month.",
        ),
    ];

    for (mutate, message) in cases {
        let mut constraints = resolved_constraints();
        mutate(&mut constraints);

        let result = run(&constraints);

        assert_eq!(result.status, ExitStatus::NotYet, "{message}");
        assert_eq!(result.hard_blockers, vec![message.to_string()]);
    }
}

#[test]
fn unknown_values_never_become_hard_blockers() {
    let result = run(&Constraints::default());

    assert!(result.hard_blockers.is_empty());
    assert_eq!(result.status, ExitStatus::Ready);
}

#[test]
fn soft_blockers_follow_fixed_order() {
    let mut constraints = Constraints::default();
    constraints.income.stability = IncomeStability::Unstable;
    constraints.cash_runway.status = RunwayStatus::Tight;

    let result = run(&constraints);

    assert_eq!(
        result.soft_blockers,
        vec![
            SoftBlocker::IncomeUnstable.message().to_string(),
            SoftBlocker::RunwayTight.message().to_string(),
            SoftBlocker::HousingUnknown.message().to_string(),
            SoftBlocker::LegalUnknown.message().to_string(),
            SoftBlocker::HealthcareUnknown.message().to_string(),
            SoftBlocker::DependentsUnknown.message().to_string(),
        ]
    );
}

#[test]
fn at_most_one_housing_soft_blocker_fires() {
    let housing_messages = [
        SoftBlocker::HousingNoticeRequired.message(),
        SoftBlocker::HousingLockedIn.message(),
        SoftBlocker::HousingUnknown.message(),
    ];

    for status in [
        HousingStatus::Aligned,
        HousingStatus::NoticeRequired,
        HousingStatus::LockedIn,
        HousingStatus::Unknown,
    ] {
        let mut constraints = resolved_constraints();
        constraints.housing.status = status;

        let result = run(&constraints);
        let fired = result
            .soft_blockers
            .iter()
            .filter(|blocker| housing_messages.contains(&blocker.as_str()))
            .count();

        let expected = usize::from(status != HousingStatus::Aligned);
        assert_eq!(fired, expected, "housing status {status:?}");
    }
}

#[test]
fn runway_under_one_month_is_hard_only() {
    let mut constraints = resolved_constraints();
    constraints.cash_runway.months = Some(0.5);

    let result = run(&constraints);

    assert_eq!(
        result.hard_blockers,
        vec!["Cash runway is under 1 month.".to_string()]
    );
    assert!(!result
        .soft_blockers
        .contains(&SoftBlocker::RunwayTight.message().to_string()));
}

#[test]
fn tight_status_fires_soft_rule_even_when_months_is_hard() {
    let mut constraints = resolved_constraints();
    constraints.cash_runway.months = Some(0.5);
    constraints.cash_runway.status = RunwayStatus::Tight;

    let result = run(&constraints);

    assert!(result
        .hard_blockers
        .contains(&HardBlocker::RunwayUnderOneMonth.message().to_string()));
    assert_eq!(
        result.soft_blockers,
        vec![SoftBlocker::RunwayTight.message().to_string()]
    );
}

#[test]
fn secure_status_with_short_months_still_reads_as_tight() {
    let mut constraints = resolved_constraints();
    constraints.cash_runway.status = RunwayStatus::Secure;
    constraints.cash_runway.months = Some(2.0);

    let result = run(&constraints);

    assert_eq!(result.status, ExitStatus::Ready);
    assert_eq!(
        result.soft_blockers,
        vec!["Cash runway is tight (<3 months).".to_string()]
    );
}

#[test]
fn runway_boundaries_are_half_open() {
    let tight = SoftBlocker::RunwayTight.message().to_string();

    for (months, hard, soft) in [
        (0.99, true, false),
        (1.0, false, true),
        (2.99, false, true),
        (3.0, false, false),
    ] {
        let mut constraints = resolved_constraints();
        constraints.cash_runway.months = Some(months);

        let result = run(&constraints);

        assert_eq!(!result.hard_blockers.is_empty(), hard, "months {months}");
        assert_eq!(result.soft_blockers.contains(&tight), soft, "months {months}");
    }
}

#[test]
fn reasons_list_one_category_only() {
    let mut blocked = Constraints::default();
    blocked.legal.blocker = LegalBlocker::Present;
    let not_yet = run(&blocked);
    assert!(!not_yet.soft_blockers.is_empty());
    assert_eq!(not_yet.reasons, not_yet.hard_blockers);

    let ready = run(&Constraints::default());
    assert_eq!(ready.reasons, ready.soft_blockers);
}

#[test]
fn summary_is_keyed_by_status() {
    let ready = run(&resolved_constraints());
    assert_eq!(
        ready.summary,
        "Constraints allow an exit window once soft blockers are addressed."
    );

    let not_yet = run(&fully_blocked_constraints());
    assert_eq!(
        not_yet.summary,
        "Relocation is not yet possible due to hard blockers."
    );
}

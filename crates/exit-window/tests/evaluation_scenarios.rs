use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use exit_window::domain::{
    Constraints, DependentsCoverage, HealthcareContinuity, HousingStatus, IncomeStability,
    LegalBlocker, RunwayStatus,
};
use exit_window::evaluation::{evaluate_with, EvaluationResult, ExitStatus, FixedClock};

fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0)
        .single()
        .expect("valid instant")
}

fn run(constraints: &Constraints) -> EvaluationResult {
    evaluate_with(constraints, &FixedClock(generated_at()))
}

fn lease_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid lease end")
}

fn resolved() -> Constraints {
    let mut constraints = Constraints::default();
    constraints.legal.blocker = LegalBlocker::Clear;
    constraints.healthcare.continuity = HealthcareContinuity::Secured;
    constraints.dependents.coverage = DependentsCoverage::Supported;
    constraints.income.stability = IncomeStability::Stable;
    constraints.cash_runway.status = RunwayStatus::Secure;
    constraints.cash_runway.months = Some(6.0);
    constraints.housing.status = HousingStatus::Aligned;
    constraints.housing.lease_end_date = Some(lease_end());
    constraints
}

#[test]
fn all_unknown_constraints_are_ready_with_soft_blockers() {
    let result = run(&Constraints::default());

    assert_eq!(result.status, ExitStatus::Ready);
    assert!(result.hard_blockers.is_empty());
    assert_eq!(
        result.soft_blockers,
        vec![
            "Housing end date is unknown.".to_string(),
            "Legal/administrative status is unknown.".to_string(),
            "Healthcare continuity needs confirmation.".to_string(),
            "Dependents support plan is unknown.".to_string(),
        ]
    );
    assert_eq!(
        result.earliest_window,
        "Earliest after confirming housing exit timing"
    );
    assert_eq!(result.reasons, result.soft_blockers);
    assert_eq!(result.generated_at, generated_at());
}

#[test]
fn legal_blocker_alone_holds_the_exit() {
    let mut constraints = Constraints::default();
    constraints.legal.blocker = LegalBlocker::Present;

    let result = run(&constraints);

    assert_eq!(result.status, ExitStatus::NotYet);
    assert_eq!(
        result.hard_blockers,
        vec!["Legal or administrative blocker present.".to_string()]
    );
    assert_eq!(
        result.earliest_window,
        "Not available until hard blockers are removed"
    );
    assert_eq!(
        result.reasons,
        vec!["Legal or administrative blocker present.".to_string()]
    );
}

#[test]
fn fully_resolved_constraints_open_after_lease_end() {
    let result = run(&resolved());

    assert_eq!(result.status, ExitStatus::Ready);
    assert!(result.hard_blockers.is_empty());
    assert!(result.soft_blockers.is_empty());
    assert_eq!(result.earliest_window, "After 2025-06-30");
    assert!(result.ordered_steps.is_empty());
    assert_eq!(
        result.summary,
        "Constraints allow an exit window once soft blockers are addressed."
    );
}

#[test]
fn half_month_runway_is_hard_and_tight_status_is_independent() {
    let mut constraints = Constraints::default();
    constraints.cash_runway.months = Some(0.5);

    let result = run(&constraints);
    assert_eq!(
        result.hard_blockers,
        vec!["Cash runway is under 1 month.".to_string()]
    );
    assert!(!result
        .soft_blockers
        .iter()
        .any(|blocker| blocker == "Cash runway is tight (<3 months)."));

    constraints.cash_runway.status = RunwayStatus::Tight;
    let result = run(&constraints);
    assert!(result
        .soft_blockers
        .iter()
        .any(|blocker| blocker == "Cash runway is tight (<3 months)."));
}

#[test]
fn notice_days_lead_the_reasons() {
    let mut constraints = resolved();
    constraints.housing.notice_days = Some(30);

    let result = run(&constraints);

    assert_eq!(
        result.reasons,
        vec!["Send housing notice 30 days before 2025-06-30.".to_string()]
    );
    assert_eq!(result.earliest_window, "After 2025-06-30");
}

#[test]
fn status_tracks_hard_conditions_across_combinations() {
    for mask in 0u8..16 {
        let mut constraints = Constraints::default();
        if mask & 1 != 0 {
            constraints.legal.blocker = LegalBlocker::Present;
        }
        if mask & 2 != 0 {
            constraints.healthcare.continuity = HealthcareContinuity::AtRisk;
        }
        if mask & 4 != 0 {
            constraints.dependents.coverage = DependentsCoverage::Unsupported;
        }
        if mask & 8 != 0 {
            constraints.cash_runway.months = Some(0.0);
        }

        let result = run(&constraints);

        assert_eq!(result.hard_blockers.len(), mask.count_ones() as usize);
        let expected = if mask == 0 {
            ExitStatus::Ready
        } else {
            ExitStatus::NotYet
        };
        assert_eq!(result.status, expected, "mask {mask:04b}");

        let reasons: Vec<&String> = result
            .reasons
            .iter()
            .filter(|reason| !reason.starts_with("Send housing notice"))
            .collect();
        let listed: Vec<&String> = match result.status {
            ExitStatus::NotYet => result.hard_blockers.iter().collect(),
            ExitStatus::Ready => result.soft_blockers.iter().collect(),
        };
        assert_eq!(reasons, listed, "mask {mask:04b}");
    }
}

#[test]
fn results_serialize_with_wire_names() {
    let result = run(&Constraints::default());

    let value = serde_json::to_value(&result).expect("serializes");

    assert_eq!(value["status"], "ready");
    assert!(value["hardBlockers"].as_array().is_some());
    assert!(value["orderedSteps"].as_array().is_some());
    assert_eq!(value["generatedAt"], "2025-02-01T08:00:00Z");
}

#[test]
fn constraints_read_from_wire_json_with_lenient_values() {
    let raw = r#"{
        "housing": { "status": "notice-required", "leaseEndDate": "", "noticeDays": 45 },
        "cashRunway": { "status": "flush", "months": 2 },
        "legal": { "blocker": "present" }
    }"#;

    let constraints: Constraints = serde_json::from_str(raw).expect("parses");

    assert_eq!(constraints.housing.status, HousingStatus::NoticeRequired);
    assert_eq!(constraints.housing.lease_end_date, None);
    assert_eq!(constraints.housing.notice_days, Some(45));
    assert_eq!(constraints.cash_runway.status, RunwayStatus::Unknown);
    assert_eq!(constraints.cash_runway.months, Some(2.0));
    assert_eq!(constraints.income.stability, IncomeStability::Unknown);

    let result = run(&constraints);
    assert_eq!(result.status, ExitStatus::NotYet);
}

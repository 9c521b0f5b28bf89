use crate::infra::{parse_date, print_json};
use crate::render;
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use clap::Args;
use exit_window::domain::{
    CashRunwayConstraint, ConstraintPatch, DependentsConstraint, DependentsCoverage,
    HealthcareConstraint, HealthcareContinuity, HousingConstraint, HousingStatus,
    IncomeConstraint, IncomeStability, LegalBlocker, LegalConstraint, RunwayStatus,
    SnapshotInput,
};
use exit_window::error::AppError;
use exit_window::evaluation::FixedClock;
use exit_window::export::evaluation_summary_text;
use exit_window::state::{MemoryStore, SnapshotLog};
use exit_window::{EvaluationResult, ExitWindowService};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the walkthrough runs on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the exported summary of the final evaluation.
    #[arg(long)]
    pub(crate) export: bool,
}

struct Stage {
    title: &'static str,
    patch: ConstraintPatch,
    snapshot: &'static str,
}

fn stages(today: NaiveDate) -> Vec<Stage> {
    vec![
        Stage {
            title: "Nothing stated yet",
            patch: ConstraintPatch::default(),
            snapshot: "Starting point",
        },
        Stage {
            title: "Legal and healthcare problems surface",
            patch: ConstraintPatch {
                legal: Some(LegalConstraint {
                    blocker: LegalBlocker::Present,
                    note: "Visa appointment not booked".to_string(),
                    ..LegalConstraint::default()
                }),
                healthcare: Some(HealthcareConstraint {
                    continuity: HealthcareContinuity::AtRisk,
                    ..HealthcareConstraint::default()
                }),
                cash_runway: Some(CashRunwayConstraint {
                    status: RunwayStatus::Tight,
                    months: Some(0.5),
                    ..CashRunwayConstraint::default()
                }),
                ..ConstraintPatch::default()
            },
            snapshot: "Blocked",
        },
        Stage {
            title: "Blockers resolved, notice still to serve",
            patch: ConstraintPatch {
                housing: Some(HousingConstraint {
                    status: HousingStatus::NoticeRequired,
                    lease_end_date: Some(today + Duration::days(90)),
                    notice_days: Some(60),
                    ..HousingConstraint::default()
                }),
                income: Some(IncomeConstraint {
                    stability: IncomeStability::Stable,
                    ..IncomeConstraint::default()
                }),
                cash_runway: Some(CashRunwayConstraint {
                    status: RunwayStatus::Secure,
                    months: Some(4.0),
                    ..CashRunwayConstraint::default()
                }),
                dependents: Some(DependentsConstraint {
                    coverage: DependentsCoverage::Supported,
                    ..DependentsConstraint::default()
                }),
                healthcare: Some(HealthcareConstraint {
                    continuity: HealthcareContinuity::Secured,
                    ..HealthcareConstraint::default()
                }),
                legal: Some(LegalConstraint {
                    blocker: LegalBlocker::Clear,
                    ..LegalConstraint::default()
                }),
            },
            snapshot: "Ready pending notice",
        },
    ]
}

fn snapshot_input(label: &str, result: &EvaluationResult) -> SnapshotInput {
    SnapshotInput {
        summary: result.summary.clone(),
        known_blockers: result.hard_blockers.clone(),
        unknowns: result.soft_blockers.clone(),
        label: Some(label.to_string()),
        ..SnapshotInput::default()
    }
}

pub(crate) fn run_demo(args: DemoArgs, json: bool) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let clock = FixedClock(today.and_time(NaiveTime::MIN).and_utc());
    let service = ExitWindowService::with_clock(Arc::new(MemoryStore::default()), Arc::new(clock));

    let mut results = Vec::new();
    for (index, stage) in stages(today).into_iter().enumerate() {
        if !stage.patch.is_empty() {
            service.update_constraints(stage.patch)?;
        }
        let result = service.evaluate()?;
        service.modify(|log: &mut SnapshotLog, now| {
            log.add(snapshot_input(stage.snapshot, &result), now)
                .map(|_| ())
        })?;

        if !json {
            if index > 0 {
                println!();
            }
            println!("== {} ==", stage.title);
            println!("{}", render::evaluation(&result));
        }
        results.push(result);
    }

    let log = service.load::<SnapshotLog>()?;
    if let [later, earlier] = log.latest().as_slice() {
        let comparison = log
            .compare(&earlier.id, &later.id)
            .map_err(|err| AppError::Service(err.into()))?;
        if !json {
            println!("\n{}", render::comparison(&comparison));
        }
    }

    if json {
        return print_json(&results);
    }
    if args.export {
        println!(
            "\n{}",
            evaluation_summary_text(service.last_result()?.as_ref())
        );
    }
    Ok(())
}

use crate::demo::{run_demo, DemoArgs};
use crate::infra::{
    emit_text, open_service, parse_date, parse_months, parse_wire, print_json, read_json_file,
};
use crate::render;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use exit_window::config::AppConfig;
use exit_window::domain::{
    AppMode, ChangeInput, ConstraintChangeKind, ConstraintKind, ConstraintPatch,
    ContinuityKey, ContinuityStatus, DependentsCoverage, HealthcareContinuity, HousingStatus,
    IncomeStability, LegalBlocker, PreDepartureStatus, RiskBoundaryCategory, RunwayStatus,
    ScopedNoteContext, SnapshotInput, StabilityFocusInput, StabilityFocusPatch, StabilityStatus,
    Ternary, TimeConstraintPatch,
};
use exit_window::error::AppError;
use exit_window::export::{changes_csv, evaluation_summary_text, snapshots_csv};
use exit_window::state::{
    ChangeLog, ContinuityChecks, ModeFrame, NotesFrame, PreDepartureFrame, RiskBoundaries,
    SnapshotLog, StabilityFrame, StateStore,
};
use exit_window::{telemetry, ExitWindowService};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "exit-window",
    about = "Track relocation constraints locally and evaluate whether an exit window is open",
    version
)]
pub(crate) struct Cli {
    /// Print machine-readable JSON where supported
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Show or edit the stored constraints
    Constraints {
        #[command(subcommand)]
        command: ConstraintsCommand,
    },
    /// Evaluate the stored constraints and keep the result
    Evaluate,
    /// Inspect or clear the last evaluation
    Result {
        #[command(subcommand)]
        command: ResultCommand,
    },
    /// Render an export as text, HTML, or CSV
    Export(ExportArgs),
    /// Capture and compare readiness snapshots
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommand,
    },
    /// Notes scoped to a constraint, snapshot, or blocker
    Note {
        #[command(subcommand)]
        command: NoteCommand,
    },
    /// Lines that would abort, force, or reassess a move
    Risk {
        #[command(subcommand)]
        command: RiskCommand,
    },
    /// Explicit constraint change log
    Change {
        #[command(subcommand)]
        command: ChangeCommand,
    },
    /// Stability mode while the exit is blocked
    Stability {
        #[command(subcommand)]
        command: StabilityCommand,
    },
    /// Pre-departure status, blockers, and time constraints
    Predeparture {
        #[command(subcommand)]
        command: PreDepartureCommand,
    },
    /// Continuity checklist
    Continuity {
        #[command(subcommand)]
        command: ContinuityCommand,
    },
    /// Planning or holding mode
    Mode {
        #[command(subcommand)]
        command: ModeCommand,
    },
    /// Remove every stored file owned by this tool
    Wipe(WipeArgs),
    /// Walk through sample scenarios in memory without touching stored state
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
pub(crate) enum ConstraintsCommand {
    /// Print the stored constraints
    Show,
    Housing(HousingArgs),
    Income(IncomeArgs),
    Runway(RunwayArgs),
    Dependents(DependentsArgs),
    Healthcare(HealthcareArgs),
    Legal(LegalArgs),
    /// Replace sections from a JSON file (camelCase keys, sections optional)
    Import { path: PathBuf },
    /// Restore all-unknown defaults
    Reset,
}

#[derive(Args, Debug, Default)]
pub(crate) struct HousingArgs {
    #[arg(long, value_parser = parse_wire::<HousingStatus>)]
    status: Option<HousingStatus>,
    /// Lease end date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, conflicts_with = "clear_lease_end")]
    lease_end: Option<NaiveDate>,
    #[arg(long)]
    clear_lease_end: bool,
    #[arg(long, conflicts_with = "clear_notice_days")]
    notice_days: Option<u32>,
    #[arg(long)]
    clear_notice_days: bool,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    move_out_notice_sent: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    new_place_secured: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    utilities_transfer_planned: Option<Ternary>,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct IncomeArgs {
    #[arg(long, value_parser = parse_wire::<IncomeStability>)]
    stability: Option<IncomeStability>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    employer_notified: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    final_pay_known: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    benefits_adjusted: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    backup_income_ready: Option<Ternary>,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RunwayArgs {
    #[arg(long, value_parser = parse_wire::<RunwayStatus>)]
    status: Option<RunwayStatus>,
    /// Months of cash runway (non-negative)
    #[arg(long, value_parser = parse_months, conflicts_with = "clear_months")]
    months: Option<f64>,
    #[arg(long)]
    clear_months: bool,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    move_costs_covered: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    emergency_buffer_ready: Option<Ternary>,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DependentsArgs {
    #[arg(long, value_parser = parse_wire::<DependentsCoverage>)]
    coverage: Option<DependentsCoverage>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    care_arranged: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    records_transferred: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    backup_care_ready: Option<Ternary>,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct HealthcareArgs {
    #[arg(long, value_parser = parse_wire::<HealthcareContinuity>)]
    continuity: Option<HealthcareContinuity>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    coverage_active: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    meds_stocked: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    records_ready: Option<Ternary>,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct LegalArgs {
    #[arg(long, value_parser = parse_wire::<LegalBlocker>)]
    blocker: Option<LegalBlocker>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    ids_valid: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    mail_forwarding_set: Option<Ternary>,
    #[arg(long, value_parser = parse_wire::<Ternary>)]
    insurance_proof_ready: Option<Ternary>,
    #[arg(long)]
    note: Option<String>,
}

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl ConstraintsCommand {
    /// Builds a one-section patch from the current constraints and the given flags.
    fn into_patch(
        self,
        current: &exit_window::domain::Constraints,
    ) -> Result<Option<ConstraintPatch>, AppError> {
        let mut patch = ConstraintPatch::default();
        match self {
            ConstraintsCommand::Housing(args) => {
                let mut section = current.housing.clone();
                assign(&mut section.status, args.status);
                if args.clear_lease_end {
                    section.lease_end_date = None;
                } else if args.lease_end.is_some() {
                    section.lease_end_date = args.lease_end;
                }
                if args.clear_notice_days {
                    section.notice_days = None;
                } else if args.notice_days.is_some() {
                    section.notice_days = args.notice_days;
                }
                assign(&mut section.move_out_notice_sent, args.move_out_notice_sent);
                assign(&mut section.new_place_secured, args.new_place_secured);
                assign(
                    &mut section.utilities_transfer_planned,
                    args.utilities_transfer_planned,
                );
                assign(&mut section.note, args.note);
                patch.housing = Some(section);
            }
            ConstraintsCommand::Income(args) => {
                let mut section = current.income.clone();
                assign(&mut section.stability, args.stability);
                assign(&mut section.employer_notified, args.employer_notified);
                assign(&mut section.final_pay_known, args.final_pay_known);
                assign(&mut section.benefits_adjusted, args.benefits_adjusted);
                assign(&mut section.backup_income_ready, args.backup_income_ready);
                assign(&mut section.note, args.note);
                patch.income = Some(section);
            }
            ConstraintsCommand::Runway(args) => {
                let mut section = current.cash_runway.clone();
                assign(&mut section.status, args.status);
                if args.clear_months {
                    section.months = None;
                } else if args.months.is_some() {
                    section.months = args.months;
                }
                assign(&mut section.move_costs_covered, args.move_costs_covered);
                assign(&mut section.emergency_buffer_ready, args.emergency_buffer_ready);
                assign(&mut section.note, args.note);
                patch.cash_runway = Some(section);
            }
            ConstraintsCommand::Dependents(args) => {
                let mut section = current.dependents.clone();
                assign(&mut section.coverage, args.coverage);
                assign(&mut section.care_arranged, args.care_arranged);
                assign(&mut section.records_transferred, args.records_transferred);
                assign(&mut section.backup_care_ready, args.backup_care_ready);
                assign(&mut section.note, args.note);
                patch.dependents = Some(section);
            }
            ConstraintsCommand::Healthcare(args) => {
                let mut section = current.healthcare.clone();
                assign(&mut section.continuity, args.continuity);
                assign(&mut section.coverage_active, args.coverage_active);
                assign(&mut section.meds_stocked, args.meds_stocked);
                assign(&mut section.records_ready, args.records_ready);
                assign(&mut section.note, args.note);
                patch.healthcare = Some(section);
            }
            ConstraintsCommand::Legal(args) => {
                let mut section = current.legal.clone();
                assign(&mut section.blocker, args.blocker);
                assign(&mut section.ids_valid, args.ids_valid);
                assign(&mut section.mail_forwarding_set, args.mail_forwarding_set);
                assign(&mut section.insurance_proof_ready, args.insurance_proof_ready);
                assign(&mut section.note, args.note);
                patch.legal = Some(section);
            }
            ConstraintsCommand::Import { path } => {
                patch = read_json_file(&path)?;
                if patch.is_empty() {
                    return Err(AppError::Input(format!(
                        "{} contains no constraint sections",
                        path.display()
                    )));
                }
            }
            ConstraintsCommand::Show | ConstraintsCommand::Reset => return Ok(None),
        }
        Ok(Some(patch))
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum ResultCommand {
    Show,
    Clear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportKind {
    Summary,
    Pack,
    PackHtml,
    SnapshotsCsv,
    ChangesCsv,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[arg(value_enum)]
    kind: ExportKind,
    /// Write to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum SnapshotCommand {
    /// Capture a snapshot of the current picture
    Add {
        #[arg(long)]
        summary: String,
        /// Known blocker (repeatable)
        #[arg(long = "blocker")]
        blockers: Vec<String>,
        /// Open unknown (repeatable)
        #[arg(long = "unknown")]
        unknowns: Vec<String>,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        label: Option<String>,
    },
    List,
    /// Compare two snapshots by id
    Compare { first: String, second: String },
    Reset,
}

#[derive(Subcommand, Debug)]
pub(crate) enum NoteCommand {
    Add {
        #[arg(long, value_parser = parse_wire::<ScopedNoteContext>)]
        context: ScopedNoteContext,
        #[arg(long)]
        context_id: String,
        #[arg(long)]
        text: String,
    },
    List {
        #[arg(long, value_parser = parse_wire::<ScopedNoteContext>)]
        context: Option<ScopedNoteContext>,
        #[arg(long, requires = "context")]
        context_id: Option<String>,
    },
    Remove { id: String },
    Reset,
}

#[derive(Subcommand, Debug)]
pub(crate) enum RiskCommand {
    Add {
        #[arg(long, value_parser = parse_wire::<RiskBoundaryCategory>)]
        category: RiskBoundaryCategory,
        #[arg(long)]
        description: String,
    },
    List,
    Remove { id: String },
    Reset,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ChangeCommand {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, value_parser = parse_wire::<ConstraintChangeKind>)]
        kind: ConstraintChangeKind,
        /// Related constraint section (housing, income, cashRunway, ...)
        #[arg(long, value_parser = parse_wire::<ConstraintKind>)]
        constraint: Option<ConstraintKind>,
    },
    List {
        /// Only entries recorded after the last review
        #[arg(long)]
        since_review: bool,
    },
    /// Mark the change log as reviewed now
    Review,
    Reset,
}

#[derive(Subcommand, Debug)]
pub(crate) enum StabilityCommand {
    Show,
    On,
    Off,
    Statement { text: String },
    AddFocus {
        #[arg(long)]
        label: String,
        #[arg(long)]
        must_remain_stable: String,
        #[arg(long, value_parser = parse_wire::<StabilityStatus>)]
        status: Option<StabilityStatus>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    UpdateFocus {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        must_remain_stable: Option<String>,
        #[arg(long, value_parser = parse_wire::<StabilityStatus>)]
        status: Option<StabilityStatus>,
        #[arg(long)]
        note: Option<String>,
    },
    RemoveFocus { id: String },
    Reset,
}

#[derive(Subcommand, Debug)]
pub(crate) enum PreDepartureCommand {
    Show,
    Status {
        #[arg(value_parser = parse_wire::<PreDepartureStatus>)]
        status: PreDepartureStatus,
    },
    AddBlocker { text: String },
    RemoveBlocker { index: usize },
    Condition { text: String },
    AddTime {
        #[arg(long)]
        label: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
    },
    UpdateTime {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
    },
    RemoveTime { id: String },
    /// Mark the change log as reviewed from the pre-departure view
    ReviewChanges,
    Reset,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ContinuityCommand {
    Show,
    Set {
        #[arg(value_parser = parse_wire::<ContinuityKey>)]
        key: ContinuityKey,
        #[arg(value_parser = parse_wire::<ContinuityStatus>)]
        status: ContinuityStatus,
    },
    Reset,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ModeCommand {
    Show,
    Set {
        #[arg(value_parser = parse_wire::<AppMode>)]
        mode: AppMode,
    },
}

#[derive(Args, Debug)]
pub(crate) struct WipeArgs {
    /// Confirm removal of all local state
    #[arg(long)]
    yes: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if let Command::Demo(args) = cli.command {
        return run_demo(args, cli.json);
    }

    let service = open_service(&config)?;
    execute(cli.command, cli.json, &service)
}

pub(crate) fn execute<S>(
    command: Command,
    json: bool,
    service: &ExitWindowService<S>,
) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    match command {
        Command::Constraints { command } => constraints(command, json, service),
        Command::Evaluate => {
            let result = service.evaluate()?;
            if json {
                print_json(&result)
            } else {
                println!("{}", render::evaluation(&result));
                Ok(())
            }
        }
        Command::Result { command } => match command {
            ResultCommand::Show => {
                let result = service.last_result()?;
                if json {
                    return print_json(&result);
                }
                match result {
                    Some(result) => println!("{}", render::evaluation(&result)),
                    None => println!("No evaluation yet. Run `exit-window evaluate`."),
                }
                Ok(())
            }
            ResultCommand::Clear => {
                service.clear_result()?;
                println!("last evaluation cleared");
                Ok(())
            }
        },
        Command::Export(args) => export(args, service),
        Command::Snapshot { command } => snapshots(command, json, service),
        Command::Note { command } => notes(command, json, service),
        Command::Risk { command } => risks(command, json, service),
        Command::Change { command } => changes(command, json, service),
        Command::Stability { command } => stability(command, json, service),
        Command::Predeparture { command } => pre_departure(command, json, service),
        Command::Continuity { command } => continuity(command, json, service),
        Command::Mode { command } => {
            let frame = match command {
                ModeCommand::Show => service.load::<ModeFrame>()?,
                ModeCommand::Set { mode } => service.modify(|frame: &mut ModeFrame, _| {
                    frame.set(mode);
                    Ok(*frame)
                })?,
            };
            if json {
                print_json(&frame)
            } else {
                println!("Mode: {}", frame.mode.label());
                Ok(())
            }
        }
        Command::Wipe(args) => {
            if !args.yes {
                return Err(AppError::Input(
                    "wipe removes all local state; pass --yes to confirm".to_string(),
                ));
            }
            let removed = service.wipe()?;
            println!("removed {} stored file(s)", removed.len());
            Ok(())
        }
        Command::Demo(args) => run_demo(args, json),
    }
}

fn constraints<S>(
    command: ConstraintsCommand,
    json: bool,
    service: &ExitWindowService<S>,
) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    let updated = match command {
        ConstraintsCommand::Show => service.constraints()?,
        ConstraintsCommand::Reset => service.reset_constraints()?,
        command => {
            let current = service.constraints()?;
            match command.into_patch(&current)? {
                Some(patch) => service.update_constraints(patch)?,
                None => current,
            }
        }
    };

    if json {
        print_json(&updated)
    } else {
        println!("{}", render::constraints(&updated));
        Ok(())
    }
}

fn export<S>(args: ExportArgs, service: &ExitWindowService<S>) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    let text = match args.kind {
        ExportKind::Summary => evaluation_summary_text(service.last_result()?.as_ref()),
        ExportKind::Pack => service.pre_departure_pack()?.to_plain_text(),
        ExportKind::PackHtml => service.pre_departure_pack()?.to_printable_html(),
        ExportKind::SnapshotsCsv => snapshots_csv(&service.load::<SnapshotLog>()?.snapshots)?,
        ExportKind::ChangesCsv => changes_csv(&service.load::<ChangeLog>()?.changes)?,
    };
    emit_text(&text, args.out.as_deref())
}

fn snapshots<S>(
    command: SnapshotCommand,
    json: bool,
    service: &ExitWindowService<S>,
) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    match command {
        SnapshotCommand::Add {
            summary,
            blockers,
            unknowns,
            notes,
            label,
        } => {
            let input = SnapshotInput {
                summary,
                known_blockers: blockers,
                unknowns,
                notes,
                label,
                created_at: None,
            };
            let snapshot = service.modify(|log: &mut SnapshotLog, now| {
                log.add(input, now).map(|snapshot| snapshot.clone())
            })?;
            if json {
                return print_json(&snapshot);
            }
            println!("{}", render::snapshot(&snapshot));
        }
        SnapshotCommand::List => {
            let log = service.load::<SnapshotLog>()?;
            if json {
                return print_json(&log.snapshots);
            }
            if log.snapshots.is_empty() {
                println!("no snapshots");
            }
            for snapshot in &log.snapshots {
                println!("{}", render::snapshot(snapshot));
            }
        }
        SnapshotCommand::Compare { first, second } => {
            let log = service.load::<SnapshotLog>()?;
            let comparison = log
                .compare(&first, &second)
                .map_err(|err| AppError::Service(err.into()))?;
            if json {
                return print_json(&comparison);
            }
            println!("{}", render::comparison(&comparison));
        }
        SnapshotCommand::Reset => {
            service.modify(|log: &mut SnapshotLog, _| {
                log.reset();
                Ok(())
            })?;
            println!("snapshots cleared");
        }
    }
    Ok(())
}

fn notes<S>(command: NoteCommand, json: bool, service: &ExitWindowService<S>) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    match command {
        NoteCommand::Add {
            context,
            context_id,
            text,
        } => {
            let note = service.modify(|frame: &mut NotesFrame, now| {
                frame
                    .add(context, &context_id, &text, None, now)
                    .map(|note| note.clone())
            })?;
            if json {
                return print_json(&note);
            }
            println!("{}", render::note(&note));
        }
        NoteCommand::List {
            context,
            context_id,
        } => {
            let frame = service.load::<NotesFrame>()?;
            let notes: Vec<_> = match context {
                Some(context) => frame
                    .for_context(context, context_id.as_deref())
                    .cloned()
                    .collect(),
                None => frame.notes.clone(),
            };
            if json {
                return print_json(&notes);
            }
            if notes.is_empty() {
                println!("no notes");
            }
            for note in &notes {
                println!("{}", render::note(note));
            }
        }
        NoteCommand::Remove { id } => {
            service.modify(|frame: &mut NotesFrame, _| frame.remove(&id))?;
            println!("removed note {id}");
        }
        NoteCommand::Reset => {
            service.modify(|frame: &mut NotesFrame, _| {
                frame.reset();
                Ok(())
            })?;
            println!("notes cleared");
        }
    }
    Ok(())
}

fn risks<S>(command: RiskCommand, json: bool, service: &ExitWindowService<S>) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    match command {
        RiskCommand::Add {
            category,
            description,
        } => {
            let boundary = service.modify(|frame: &mut RiskBoundaries, now| {
                frame
                    .add(category, &description, now)
                    .map(|boundary| boundary.clone())
            })?;
            if json {
                return print_json(&boundary);
            }
            println!("{}", render::boundary(&boundary));
        }
        RiskCommand::List => {
            let frame = service.load::<RiskBoundaries>()?;
            if json {
                return print_json(&frame.boundaries);
            }
            if frame.boundaries.is_empty() {
                println!("no risk boundaries");
            }
            for boundary in &frame.boundaries {
                println!("{}", render::boundary(boundary));
            }
        }
        RiskCommand::Remove { id } => {
            service.modify(|frame: &mut RiskBoundaries, _| frame.remove(&id))?;
            println!("removed risk boundary {id}");
        }
        RiskCommand::Reset => {
            service.modify(|frame: &mut RiskBoundaries, _| {
                frame.reset();
                Ok(())
            })?;
            println!("risk boundaries cleared");
        }
    }
    Ok(())
}

fn changes<S>(
    command: ChangeCommand,
    json: bool,
    service: &ExitWindowService<S>,
) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    match command {
        ChangeCommand::Add {
            title,
            description,
            kind,
            constraint,
        } => {
            let input = ChangeInput {
                title,
                description,
                kind,
                related_constraint: constraint,
                recorded_at: None,
            };
            let entry = service.modify(|log: &mut ChangeLog, now| {
                log.add(input, now).map(|entry| entry.clone())
            })?;
            if json {
                return print_json(&entry);
            }
            println!("{}", render::change(&entry));
        }
        ChangeCommand::List { since_review } => {
            let log = service.load::<ChangeLog>()?;
            let entries: Vec<_> = if since_review {
                log.since_last_review().into_iter().cloned().collect()
            } else {
                log.changes.clone()
            };
            if json {
                return print_json(&entries);
            }
            if entries.is_empty() {
                println!("no changes");
            }
            for entry in &entries {
                println!("{}", render::change(entry));
            }
        }
        ChangeCommand::Review => {
            let pending = service.modify(|log: &mut ChangeLog, now| {
                let pending = log.since_last_review().len();
                log.mark_reviewed(now);
                Ok(pending)
            })?;
            println!("marked {pending} change(s) as reviewed");
        }
        ChangeCommand::Reset => {
            service.modify(|log: &mut ChangeLog, _| {
                log.reset();
                Ok(())
            })?;
            println!("change log cleared");
        }
    }
    Ok(())
}

fn stability<S>(
    command: StabilityCommand,
    json: bool,
    service: &ExitWindowService<S>,
) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    let frame = match command {
        StabilityCommand::Show => service.load::<StabilityFrame>()?,
        command => service.modify(|frame: &mut StabilityFrame, now| {
            match command {
                StabilityCommand::On => frame.set_active(true),
                StabilityCommand::Off => frame.set_active(false),
                StabilityCommand::Statement { text } => frame.set_statement(&text),
                StabilityCommand::AddFocus {
                    label,
                    must_remain_stable,
                    status,
                    note,
                    id,
                } => {
                    let input = StabilityFocusInput {
                        id,
                        label,
                        must_remain_stable,
                        status,
                        note,
                        flagged_at: None,
                    };
                    frame.add_focus(input, now)?;
                }
                StabilityCommand::UpdateFocus {
                    id,
                    label,
                    must_remain_stable,
                    status,
                    note,
                } => {
                    let patch = StabilityFocusPatch {
                        label,
                        must_remain_stable,
                        status,
                        note,
                    };
                    frame.update_focus(&id, patch, now)?;
                }
                StabilityCommand::RemoveFocus { id } => {
                    frame.remove_focus(&id)?;
                }
                StabilityCommand::Reset => frame.reset(),
                StabilityCommand::Show => {}
            }
            Ok(frame.clone())
        })?,
    };

    if json {
        print_json(&frame)
    } else {
        println!("{}", render::stability(&frame));
        Ok(())
    }
}

fn pre_departure<S>(
    command: PreDepartureCommand,
    json: bool,
    service: &ExitWindowService<S>,
) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    let frame = match command {
        PreDepartureCommand::Show => service.load::<PreDepartureFrame>()?,
        PreDepartureCommand::ReviewChanges => {
            let now = service.now();
            service.modify(|log: &mut ChangeLog, _| {
                log.mark_reviewed(now);
                Ok(())
            })?;
            service.modify(|frame: &mut PreDepartureFrame, _| {
                frame.mark_changes_reviewed(now);
                Ok(frame.clone())
            })?
        }
        command => service.modify(|frame: &mut PreDepartureFrame, now| {
            match command {
                PreDepartureCommand::Status { status } => frame.set_status(status),
                PreDepartureCommand::AddBlocker { text } => frame.add_top_blocker(&text)?,
                PreDepartureCommand::RemoveBlocker { index } => {
                    frame.remove_top_blocker(index)?;
                }
                PreDepartureCommand::Condition { text } => frame.set_next_required_condition(&text),
                PreDepartureCommand::AddTime { label, date, note } => {
                    frame.add_time_constraint(&label, date, note, now)?;
                }
                PreDepartureCommand::UpdateTime {
                    id,
                    label,
                    date,
                    note,
                } => {
                    let patch = TimeConstraintPatch {
                        label,
                        target_date: date,
                        note,
                    };
                    frame.update_time_constraint(&id, patch)?;
                }
                PreDepartureCommand::RemoveTime { id } => {
                    frame.remove_time_constraint(&id)?;
                }
                PreDepartureCommand::Reset => frame.reset(),
                PreDepartureCommand::Show | PreDepartureCommand::ReviewChanges => {}
            }
            Ok(frame.clone())
        })?,
    };

    if json {
        print_json(&frame)
    } else {
        println!(
            "{}",
            render::pre_departure(&frame, service.now().date_naive())
        );
        Ok(())
    }
}

fn continuity<S>(
    command: ContinuityCommand,
    json: bool,
    service: &ExitWindowService<S>,
) -> Result<(), AppError>
where
    S: StateStore + 'static,
{
    let checks = match command {
        ContinuityCommand::Show => service.load::<ContinuityChecks>()?,
        ContinuityCommand::Set { key, status } => {
            service.modify(|checks: &mut ContinuityChecks, _| {
                checks.set(key, status);
                Ok(checks.clone())
            })?
        }
        ContinuityCommand::Reset => service.modify(|checks: &mut ContinuityChecks, _| {
            *checks = ContinuityChecks::default();
            Ok(checks.clone())
        })?,
    };

    if json {
        print_json(&checks)
    } else {
        println!("{}", render::continuity(&checks));
        Ok(())
    }
}

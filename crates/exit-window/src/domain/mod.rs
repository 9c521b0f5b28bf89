//! User-authored inputs: the relocation constraints the evaluator reads and the auxiliary
//! records (snapshots, notes, boundaries, change log, stability focuses) kept beside them.

mod constraints;
mod records;

pub use constraints::{
    deserialize_optional_date, deserialize_optional_days, parse_date, CashRunwayConstraint,
    ConstraintKind, ConstraintPatch, Constraints, DependentsConstraint, DependentsCoverage, HealthcareConstraint,
    HealthcareContinuity, HousingConstraint, HousingStatus, IncomeConstraint, IncomeStability,
    LegalBlocker, LegalConstraint, RunwayStatus, Ternary,
};
pub use records::{
    AppMode, ChangeInput, ConstraintChangeEntry, ConstraintChangeKind, ContinuityKey,
    ContinuityStatus, PreDepartureStatus, RiskBoundary, RiskBoundaryCategory, ScopedNote,
    ScopedNoteContext, Snapshot, SnapshotInput, StabilityFocus, StabilityFocusInput,
    StabilityFocusPatch, StabilityStatus, TimeConstraint, TimeConstraintPatch,
};

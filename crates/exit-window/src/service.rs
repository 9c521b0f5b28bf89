use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{ConstraintPatch, Constraints};
use crate::evaluation::{Clock, EvaluationResult, SystemClock};
use crate::export::PreDeparturePack;
use crate::state::{
    self, load_frame, save_frame, ChangeLog, ConstraintsFrame, EvaluationFrame, Frame,
    PreDepartureFrame, RecordError, RiskBoundaries, SnapshotLog, StabilityFrame, StateStore,
    StoreError,
};

/// Application layer over a state store: owns the clock, decides when to evaluate,
/// and keeps the last result.
pub struct ExitWindowService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> ExitWindowService<S>
where
    S: StateStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn constraints(&self) -> Result<Constraints, ServiceError> {
        Ok(self.load::<ConstraintsFrame>()?.constraints)
    }

    /// Applies the patch and persists it. The last result is left untouched.
    pub fn update_constraints(&self, patch: ConstraintPatch) -> Result<Constraints, ServiceError> {
        let mut frame = self.load::<ConstraintsFrame>()?;
        frame.update(patch);
        save_frame(self.store.as_ref(), &frame)?;
        Ok(frame.constraints)
    }

    pub fn reset_constraints(&self) -> Result<Constraints, ServiceError> {
        let mut frame = self.load::<ConstraintsFrame>()?;
        frame.reset();
        save_frame(self.store.as_ref(), &frame)?;
        Ok(frame.constraints)
    }

    /// Runs the evaluator over the stored constraints and replaces the last result.
    pub fn evaluate(&self) -> Result<EvaluationResult, ServiceError> {
        let constraints = self.constraints()?;
        let mut frame = self.load::<EvaluationFrame>()?;
        let result = frame.evaluate(&constraints, self.clock.as_ref()).clone();
        save_frame(self.store.as_ref(), &frame)?;

        info!(
            status = result.status.label(),
            hard = result.hard_blockers.len(),
            soft = result.soft_blockers.len(),
            "constraints evaluated"
        );
        Ok(result)
    }

    pub fn last_result(&self) -> Result<Option<EvaluationResult>, ServiceError> {
        Ok(self.load::<EvaluationFrame>()?.last_result)
    }

    pub fn clear_result(&self) -> Result<(), ServiceError> {
        let mut frame = self.load::<EvaluationFrame>()?;
        frame.clear();
        save_frame(self.store.as_ref(), &frame)?;
        Ok(())
    }

    pub fn load<F: Frame>(&self) -> Result<F, ServiceError> {
        Ok(load_frame::<F>(self.store.as_ref())?)
    }

    /// Loads a frame, applies `change` with the current time, and saves it when the change succeeds.
    pub fn modify<F, R>(
        &self,
        change: impl FnOnce(&mut F, DateTime<Utc>) -> Result<R, RecordError>,
    ) -> Result<R, ServiceError>
    where
        F: Frame,
    {
        let mut frame = self.load::<F>()?;
        let outcome = change(&mut frame, self.clock.now())?;
        save_frame(self.store.as_ref(), &frame)?;
        Ok(outcome)
    }

    pub fn wipe(&self) -> Result<Vec<String>, ServiceError> {
        Ok(state::wipe(self.store.as_ref())?)
    }

    pub fn pre_departure_pack(&self) -> Result<PreDeparturePack, ServiceError> {
        let snapshots = self.load::<SnapshotLog>()?;
        Ok(PreDeparturePack {
            generated_at: self.clock.now(),
            frame: self.load::<PreDepartureFrame>()?,
            constraints: self.constraints()?,
            changes: self.load::<ChangeLog>()?.changes,
            stability: self.load::<StabilityFrame>()?,
            risk_boundaries: self.load::<RiskBoundaries>()?.boundaries,
            recent_snapshots: snapshots.latest().into_iter().cloned().collect(),
        })
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

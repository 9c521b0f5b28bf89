//! Local-first relocation readiness: constraint evaluation, the record stores kept beside it,
//! and the exports built from both.

pub mod config;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod service;
pub mod state;
pub mod telemetry;

pub use error::AppError;
pub use evaluation::{evaluate, evaluate_with, EvaluationResult, ExitStatus};
pub use service::{ExitWindowService, ServiceError};

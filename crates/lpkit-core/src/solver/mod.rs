//! Solver abstractions shared by every backend.
//!
//! # Overview
//!
//! - [`SolverConfig`]: Configuration options for solver behavior
//! - [`SolutionStatus`]: Outcome of a solve
//! - [`Solution`]: Immutable solve result
//! - [`SolverError`]: Error types for solver operations
//! - [`SolverAdapter`]: Trait for solver implementations

mod config;
mod error;
mod solution;

pub use config::SolverConfig;
pub use error::SolverError;
pub use solution::{Solution, SolutionStatus};

use crate::model::Model;

/// Trait for solver implementations.
///
/// An adapter translates a validated [`Model`] into a backend's native form,
/// runs it and reports the outcome. Infeasible and unbounded problems are
/// reported through [`SolutionStatus`], never as errors. Returned values are
/// indexed by variable declaration order.
pub trait SolverAdapter {
    /// Short backend name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Solve the model with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a `SolverError` if:
    /// - The backend is not available
    /// - The time limit expired before optimality was proven
    /// - The backend failed internally
    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<Solution, SolverError>;
}

impl<S: SolverAdapter + ?Sized> SolverAdapter for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
        (**self).solve(model, config)
    }
}

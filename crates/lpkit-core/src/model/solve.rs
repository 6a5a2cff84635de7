//! Solver dispatch for the model.

use std::time::Instant;

use crate::error::SolveError;
use crate::solver::{Solution, SolverAdapter, SolverConfig, SolverError};

use super::error::ModelError;
use super::{Model, ModelState};

impl Model {
    /// Validate, solve and store resolved values.
    ///
    /// A `Building` model is sealed first. The adapter borrows the model
    /// read-only for the duration of the call. Any returned [`Solution`]
    /// (including infeasible or unbounded ones) moves the model to `Solved`;
    /// values are written only for optimal solutions. An adapter error moves
    /// the model to `Failed`. A config that fails
    /// [`SolverConfig::validate`] is rejected before dispatch and leaves the
    /// model sealed, ready for another attempt.
    pub fn solve_with<S>(
        &mut self,
        adapter: &mut S,
        config: &SolverConfig,
    ) -> Result<Solution, SolveError>
    where
        S: SolverAdapter + ?Sized,
    {
        match self.state {
            ModelState::Building => self.seal()?,
            ModelState::Validated => {}
            state => return Err(ModelError::Locked { state }.into()),
        }
        config.validate()?;

        self.state = ModelState::Solving;
        tracing::debug!(
            component = "model",
            operation = "solve",
            status = "start",
            model = %self.name,
            solver = adapter.name(),
            variables = self.variables.len(),
            constraints = self.constraints.len(),
            "Dispatching model to solver"
        );

        let started = Instant::now();
        let outcome = adapter.solve(self, config);
        let elapsed = started.elapsed().as_secs_f64();

        let solution = match outcome.and_then(|solution| self.check_solution(solution)) {
            Ok(solution) => solution,
            Err(err) => {
                self.state = ModelState::Failed;
                tracing::warn!(
                    component = "model",
                    operation = "solve",
                    status = "error",
                    model = %self.name,
                    solver = adapter.name(),
                    code = err.code(),
                    elapsed_seconds = elapsed,
                    "Solver failed"
                );
                return Err(err.into());
            }
        };

        if let Some(values) = solution.values() {
            self.values = Some(values.to_vec());
        }
        self.state = ModelState::Solved;
        tracing::debug!(
            component = "model",
            operation = "solve",
            status = "success",
            model = %self.name,
            solver = adapter.name(),
            solution_status = solution.status().as_str(),
            objective = ?solution.objective_value(),
            elapsed_seconds = elapsed,
            "Solve finished"
        );
        Ok(solution)
    }

    fn check_solution(&self, solution: Solution) -> Result<Solution, SolverError> {
        match solution.values() {
            Some(values) if values.len() != self.variables.len() => {
                Err(SolverError::Internal(format!(
                    "solution has {} values for {} variables",
                    values.len(),
                    self.variables.len()
                )))
            }
            _ => Ok(solution),
        }
    }
}

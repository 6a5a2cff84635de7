//! Errors raised by [`Model::solve_with`](crate::Model::solve_with).

use crate::model::{ModelError, Violations};
use crate::solver::SolverError;

/// Anything that can stop a solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The model failed validation.
    Invalid(Violations),
    /// The model is in the wrong state, or the solution did not fit it.
    Model(ModelError),
    /// The backend failed.
    Solver(SolverError),
}

impl SolveError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolveError::Invalid(violations) => violations.code(),
            SolveError::Model(err) => err.code(),
            SolveError::Solver(err) => err.code(),
        }
    }
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::Invalid(violations) => violations.fmt(f),
            SolveError::Model(err) => err.fmt(f),
            SolveError::Solver(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Invalid(violations) => Some(violations),
            SolveError::Model(err) => Some(err),
            SolveError::Solver(err) => Some(err),
        }
    }
}

impl From<Violations> for SolveError {
    fn from(violations: Violations) -> Self {
        SolveError::Invalid(violations)
    }
}

impl From<ModelError> for SolveError {
    fn from(err: ModelError) -> Self {
        SolveError::Model(err)
    }
}

impl From<SolverError> for SolveError {
    fn from(err: SolverError) -> Self {
        SolveError::Solver(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_comes_from_the_wrapped_error() {
        let err: SolveError = SolverError::Internal("boom".to_string()).into();
        assert_eq!(err.code(), "SOLVER_INTERNAL");
        assert!(err.to_string().contains("boom"));

        let err: SolveError = Violations::new(vec![]).into();
        assert_eq!(err.code(), "MODEL_INVALID");
    }
}

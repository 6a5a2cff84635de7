//! Solver error types.

/// Error type for solver operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Backend unknown or not compiled into this build.
    Unavailable(String),
    /// Time limit reached before optimality was proven.
    Timeout {
        limit_seconds: f64,
        /// Objective of the best solution found so far, if any.
        best_objective: Option<f64>,
    },
    /// A configuration value the backend cannot accept.
    InvalidConfig(String),
    /// Internal solver error.
    Internal(String),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::Unavailable(_) => "SOLVER_UNAVAILABLE",
            SolverError::Timeout { .. } => "SOLVER_TIMEOUT",
            SolverError::InvalidConfig(_) => "SOLVER_INVALID_CONFIG",
            SolverError::Internal(_) => "SOLVER_INTERNAL",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::Unavailable(name) => {
                write!(f, "[{}] Solver '{}' is not available", self.code(), name)
            }
            SolverError::Timeout {
                limit_seconds,
                best_objective: Some(best),
            } => write!(
                f,
                "[{}] Time limit of {}s reached; best objective found {}",
                self.code(),
                limit_seconds,
                best
            ),
            SolverError::Timeout {
                limit_seconds,
                best_objective: None,
            } => write!(
                f,
                "[{}] Time limit of {}s reached without a solution",
                self.code(),
                limit_seconds
            ),
            SolverError::InvalidConfig(msg) => {
                write!(f, "[{}] Invalid solver configuration: {}", self.code(), msg)
            }
            SolverError::Internal(msg) => {
                write!(f, "[{}] Solver internal error: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unavailable() {
        let msg = SolverError::Unavailable("gurobi".to_string()).to_string();
        assert!(msg.contains("SOLVER_UNAVAILABLE"));
        assert!(msg.contains("gurobi"));
    }

    #[test]
    fn test_error_display_timeout_with_incumbent() {
        let err = SolverError::Timeout {
            limit_seconds: 2.0,
            best_objective: Some(10345.0),
        };
        let msg = err.to_string();
        assert!(msg.contains("SOLVER_TIMEOUT"));
        assert!(msg.contains("10345"));
    }

    #[test]
    fn test_error_display_timeout_without_incumbent() {
        let err = SolverError::Timeout {
            limit_seconds: 0.5,
            best_objective: None,
        };
        assert!(err.to_string().contains("without a solution"));
    }

    #[test]
    fn test_error_display_invalid_config() {
        let msg = SolverError::InvalidConfig("time_limit is NaN".to_string()).to_string();
        assert!(msg.contains("SOLVER_INVALID_CONFIG"));
        assert!(msg.contains("time_limit"));
    }

    #[test]
    fn test_error_display_internal_error() {
        let msg = SolverError::Internal("something went wrong".to_string()).to_string();
        assert!(msg.contains("SOLVER_INTERNAL"));
        assert!(msg.contains("something went wrong"));
    }
}

//! Expression construction errors.

#[derive(Debug, Clone, PartialEq)]
pub enum LinearExprError {
    MismatchedLengths { variables: usize, coefficients: usize },
    NonFiniteCoefficient { coefficient: f64 },
}

impl LinearExprError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LinearExprError::MismatchedLengths { .. } => "EXPR_MISMATCHED_LENGTHS",
            LinearExprError::NonFiniteCoefficient { .. } => "EXPR_NON_FINITE_COEFFICIENT",
        }
    }
}

impl std::fmt::Display for LinearExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinearExprError::MismatchedLengths {
                variables,
                coefficients,
            } => write!(
                f,
                "[{}] variables ({}) and coefficients ({}) must have the same length",
                self.code(),
                variables,
                coefficients
            ),
            LinearExprError::NonFiniteCoefficient { coefficient } => write!(
                f,
                "[{}] coefficient must be finite (got {})",
                self.code(),
                coefficient
            ),
        }
    }
}

impl std::error::Error for LinearExprError {}

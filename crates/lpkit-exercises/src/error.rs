//! Errors raised while assembling an exercise model.

use lpkit_core::{LinearExprError, ModelError};

#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseError {
    /// Exercise name not in the catalog.
    UnknownExercise { name: String },
    /// Input tables do not agree on their dimensions.
    InvalidData { exercise: &'static str, reason: String },
    Expr(LinearExprError),
    Model(ModelError),
}

impl ExerciseError {
    pub fn code(&self) -> &'static str {
        match self {
            ExerciseError::UnknownExercise { .. } => "EXERCISE_UNKNOWN",
            ExerciseError::InvalidData { .. } => "EXERCISE_INVALID_DATA",
            ExerciseError::Expr(err) => err.code(),
            ExerciseError::Model(err) => err.code(),
        }
    }

    pub(crate) fn invalid(exercise: &'static str, reason: impl Into<String>) -> Self {
        ExerciseError::InvalidData {
            exercise,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ExerciseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseError::UnknownExercise { name } => {
                write!(f, "[{}] No exercise named '{}'", self.code(), name)
            }
            ExerciseError::InvalidData { exercise, reason } => {
                write!(f, "[{}] Invalid {} data: {}", self.code(), exercise, reason)
            }
            ExerciseError::Expr(err) => err.fmt(f),
            ExerciseError::Model(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ExerciseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExerciseError::Expr(err) => Some(err),
            ExerciseError::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LinearExprError> for ExerciseError {
    fn from(err: LinearExprError) -> Self {
        ExerciseError::Expr(err)
    }
}

impl From<ModelError> for ExerciseError {
    fn from(err: ModelError) -> Self {
        ExerciseError::Model(err)
    }
}

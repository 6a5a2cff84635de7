//! Model error types.

use crate::model::ModelState;
use crate::types::Domain;

/// Errors that can occur while building or querying a model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Bounds do not fit the variable's domain (or are unordered).
    InvalidDomain {
        name: String,
        domain: Domain,
        lower: f64,
        upper: f64,
    },
    /// Name already used by a variable or constraint of the model.
    DuplicateName { name: String },
    /// A constraint or the objective mentions a variable the model does not own.
    UnknownVariable {
        variable: String,
        referenced_by: String,
    },
    /// Resolved value requested before a successful solve.
    UnsolvedState { variable: String },
    /// Coefficient or constant is NaN or infinite.
    InvalidCoefficient { owner: String, coefficient: f64 },
    /// Mutation or solve attempted outside the allowed lifecycle state.
    Locked { state: ModelState },
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidDomain { .. } => "VARIABLE_INVALID_DOMAIN",
            ModelError::DuplicateName { .. } => "NAME_DUPLICATE",
            ModelError::UnknownVariable { .. } => "VARIABLE_UNKNOWN",
            ModelError::UnsolvedState { .. } => "VARIABLE_UNSOLVED",
            ModelError::InvalidCoefficient { .. } => "COEFFICIENT_INVALID",
            ModelError::Locked { .. } => "MODEL_LOCKED",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InvalidDomain {
                name,
                domain,
                lower,
                upper,
            } => write!(
                f,
                "[{}] Variable '{}' has bounds [{}, {}] incompatible with domain {}",
                self.code(),
                name,
                lower,
                upper,
                domain
            ),
            ModelError::DuplicateName { name } => write!(
                f,
                "[{}] Name '{}' is already used in this model",
                self.code(),
                name
            ),
            ModelError::UnknownVariable {
                variable,
                referenced_by,
            } => write!(
                f,
                "[{}] '{}' references variable {} which is not registered in the model",
                self.code(),
                referenced_by,
                variable
            ),
            ModelError::UnsolvedState { variable } => write!(
                f,
                "[{}] Variable '{}' has no resolved value; solve the model first",
                self.code(),
                variable
            ),
            ModelError::InvalidCoefficient { owner, coefficient } => write!(
                f,
                "[{}] '{}' has a non-finite coefficient ({})",
                self.code(),
                owner,
                coefficient
            ),
            ModelError::Locked { state } => write!(
                f,
                "[{}] Model is {} and can no longer be changed",
                self.code(),
                state
            ),
        }
    }
}

impl std::error::Error for ModelError {}

/// Every problem found while validating a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(Vec<ModelError>);

impl Violations {
    pub fn new(errors: Vec<ModelError>) -> Self {
        Self(errors)
    }

    pub fn code(&self) -> &'static str {
        "MODEL_INVALID"
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelError> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<ModelError> {
        self.0
    }
}

impl From<ModelError> for Violations {
    fn from(error: ModelError) -> Self {
        Self(vec![error])
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a ModelError;
    type IntoIter = std::slice::Iter<'a, ModelError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] Model has {} violation(s)",
            self.code(),
            self.0.len()
        )?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

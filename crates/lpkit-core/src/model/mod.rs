//! Model module for building optimization models.
//!
//! This module provides the core [`Model`] type: an ordered set of named
//! variables, named linear constraints and one objective, guarded by a small
//! lifecycle state machine.
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for adding variables, constraints, and objectives
//! - [`storage`]: Lookups and resolved values
//! - [`validate`]: Whole-model validation and sealing
//! - [`solve`]: Solver dispatch and value write-back
//! - [`document`]: Serializable model documents
//! - [`pretty`]: Human-readable rendering

mod builder;
mod document;
mod error;
mod pretty;
mod solve;
mod storage;
mod validate;

use crate::types::{Constraint, Objective, Variable};
use lpkit_expr::ids::{ConstraintId, VariableId};
use std::collections::HashMap;

pub use document::{ConstraintSpec, ModelDocument, ObjectiveSpec, TermSpec, VariableSpec};
pub use error::{ModelError, Violations};
pub use pretty::PrettyPrintOptions;
pub(crate) use pretty::format_ascii_number;

/// Lifecycle of a model.
///
/// `Building → Validated → Solving → Solved | Failed`. Only a `Building`
/// model accepts new variables, constraints or objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelState {
    Building,
    Validated,
    Solving,
    Solved,
    Failed,
}

impl ModelState {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelState::Building => "building",
            ModelState::Validated => "validated",
            ModelState::Solving => "solving",
            ModelState::Solved => "solved",
            ModelState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of a name in the model's shared namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameOwner {
    Variable(VariableId),
    Constraint(ConstraintId),
}

/// A linear or mixed-integer program under construction.
///
/// Variables and constraints keep their declaration order; ids are positions
/// in that order. Variable and constraint names share one namespace.
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) name: String,
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Objective,
    pub(crate) names: HashMap<String, NameOwner>,
    pub(crate) state: ModelState,
    pub(crate) values: Option<Vec<f64>>,
}

impl Model {
    /// Create a new empty model named `model`.
    pub fn new() -> Self {
        Self::named("model")
    }

    /// Create a new empty model with a name used in logs and reports.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Objective::feasibility(),
            names: HashMap::new(),
            state: ModelState::Building,
            values: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ModelState {
        self.state
    }

    /// Get the objective
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Copy the definition into a fresh `Building` model without resolved values.
    pub fn fork(&self) -> Model {
        tracing::debug!(
            component = "model",
            operation = "fork",
            status = "success",
            model = %self.name,
            from_state = self.state.as_str(),
            "Forked model definition"
        );
        Model {
            name: self.name.clone(),
            variables: self.variables.clone(),
            constraints: self.constraints.clone(),
            objective: self.objective.clone(),
            names: self.names.clone(),
            state: ModelState::Building,
            values: None,
        }
    }

    pub(crate) fn ensure_building(&self) -> Result<(), ModelError> {
        if self.state == ModelState::Building {
            Ok(())
        } else {
            Err(ModelError::Locked { state: self.state })
        }
    }

    /// Label for a variable id in diagnostics: its name when known.
    pub(crate) fn describe_variable(&self, id: VariableId) -> String {
        self.variables
            .get(id.index())
            .map_or_else(|| id.to_string(), |var| var.name().to_string())
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

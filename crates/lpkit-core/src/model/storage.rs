//! Storage access methods for the model.

use crate::types::{Constraint, Variable};
use lpkit_expr::ids::{ConstraintId, VariableId};

use super::error::ModelError;
use super::{Model, NameOwner};

impl Model {
    /// Get the number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Get the number of constraints
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Get the number of nonzero constraint coefficients in the model.
    pub fn num_coefficients(&self) -> usize {
        self.constraints
            .iter()
            .map(|constraint| constraint.canonical().num_terms())
            .sum()
    }

    /// Variables in declaration order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Constraints in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Variables paired with their ids, in declaration order.
    pub fn variable_entries(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(idx, var)| (VariableId::new(idx as u32), var))
    }

    /// Get a variable by ID.
    pub fn variable(&self, id: VariableId) -> Result<&Variable, ModelError> {
        self.variables
            .get(id.index())
            .ok_or_else(|| ModelError::UnknownVariable {
                variable: id.to_string(),
                referenced_by: self.name.clone(),
            })
    }

    /// Look up a variable by name.
    pub fn variable_id(&self, name: &str) -> Option<VariableId> {
        match self.names.get(name) {
            Some(NameOwner::Variable(id)) => Some(*id),
            _ => None,
        }
    }

    /// Get a constraint by ID.
    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id.index())
    }

    /// Look up a constraint by name.
    pub fn constraint_id(&self, name: &str) -> Option<ConstraintId> {
        match self.names.get(name) {
            Some(NameOwner::Constraint(id)) => Some(*id),
            _ => None,
        }
    }

    /// Resolved value of a variable.
    ///
    /// Fails with [`ModelError::UnsolvedState`] until a solve has produced an
    /// optimal solution for this model.
    pub fn value(&self, id: VariableId) -> Result<f64, ModelError> {
        let variable = self.variable(id)?;
        self.values
            .as_ref()
            .and_then(|values| values.get(id.index()).copied())
            .ok_or_else(|| ModelError::UnsolvedState {
                variable: variable.name().to_string(),
            })
    }

    /// Resolved value of a variable looked up by name.
    pub fn value_of(&self, name: &str) -> Result<f64, ModelError> {
        let id = self
            .variable_id(name)
            .ok_or_else(|| ModelError::UnknownVariable {
                variable: name.to_string(),
                referenced_by: self.name.clone(),
            })?;
        self.value(id)
    }

    /// All resolved values in declaration order, if solved.
    pub fn values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }
}

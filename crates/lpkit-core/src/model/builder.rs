//! Model builder methods for adding variables, constraints, and objectives.

use crate::types::{Constraint, Objective, Sense, Variable};
use lpkit_expr::expr::{ConstraintExpr, Expr};
use lpkit_expr::ids::{ConstraintId, VariableId};

use crate::model::error::ModelError;
use crate::model::{Model, NameOwner};

impl Model {
    /// Add a variable to the model.
    ///
    /// Fails with [`ModelError::DuplicateName`] when the name is already used
    /// by a variable or a constraint.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        self.ensure_building()?;
        variable.check_domain()?;
        self.ensure_name_free(variable.name())?;

        let id = VariableId::new(self.variables.len() as u32);
        self.names
            .insert(variable.name().to_string(), NameOwner::Variable(id));
        tracing::trace!(
            component = "model",
            operation = "add_variable",
            status = "success",
            variable = %variable.name(),
            domain = variable.domain().as_str(),
            "Added variable"
        );
        self.variables.push(variable);
        Ok(id)
    }

    /// Add a named constraint to the model.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: ConstraintExpr,
    ) -> Result<ConstraintId, ModelError> {
        self.ensure_building()?;
        let name = name.into();
        self.ensure_name_free(&name)?;
        self.check_expr(&name, expr.canonical())?;

        let id = ConstraintId::new(self.constraints.len() as u32);
        self.names.insert(name.clone(), NameOwner::Constraint(id));
        tracing::trace!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            constraint = %name,
            sense = expr.sense().as_str(),
            terms = expr.canonical().num_terms(),
            "Added constraint"
        );
        self.constraints.push(Constraint::new(name, expr));
        Ok(id)
    }

    /// Set the objective function, replacing any previous one.
    pub fn set_objective(&mut self, expr: Expr, sense: Sense) -> Result<(), ModelError> {
        self.ensure_building()?;
        let label = self.objective.label().to_string();
        self.check_expr(&label, &expr)?;

        let terms = expr.num_terms();
        self.objective.sense = sense;
        self.objective.expr = expr;
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = sense.as_str(),
            terms,
            "Set objective function"
        );
        Ok(())
    }

    /// Minimize a linear expression.
    pub fn minimize(&mut self, expr: impl Into<Expr>) -> Result<(), ModelError> {
        self.set_objective(expr.into(), Sense::Minimize)
    }

    /// Maximize a linear expression.
    pub fn maximize(&mut self, expr: impl Into<Expr>) -> Result<(), ModelError> {
        self.set_objective(expr.into(), Sense::Maximize)
    }

    /// Name the objective for reports and diagnostics.
    pub fn set_objective_name(&mut self, name: impl Into<String>) -> Result<(), ModelError> {
        self.ensure_building()?;
        self.objective.name = Some(name.into());
        Ok(())
    }

    /// Replace the whole objective at once.
    pub fn replace_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        let Objective { sense, expr, name } = objective;
        self.set_objective(expr, sense)?;
        self.objective.name = name;
        Ok(())
    }

    fn ensure_name_free(&self, name: &str) -> Result<(), ModelError> {
        if self.names.contains_key(name) {
            Err(ModelError::DuplicateName {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn check_expr(&self, owner: &str, expr: &Expr) -> Result<(), ModelError> {
        if !expr.constant().is_finite() {
            return Err(ModelError::InvalidCoefficient {
                owner: owner.to_string(),
                coefficient: expr.constant(),
            });
        }
        for (var_id, coeff) in expr.terms() {
            if var_id.index() >= self.variables.len() {
                return Err(ModelError::UnknownVariable {
                    variable: var_id.to_string(),
                    referenced_by: owner.to_string(),
                });
            }
            if !coeff.is_finite() {
                return Err(ModelError::InvalidCoefficient {
                    owner: owner.to_string(),
                    coefficient: coeff,
                });
            }
        }
        Ok(())
    }
}

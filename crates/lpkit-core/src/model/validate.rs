//! Whole-model validation and sealing.

use std::collections::HashSet;

use lpkit_expr::expr::Expr;

use super::error::{ModelError, Violations};
use super::{Model, ModelState};

impl Model {
    /// Collect every problem with the model definition.
    ///
    /// Does not change the model; calling it twice yields the same list.
    pub fn validate(&self) -> Vec<ModelError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for variable in &self.variables {
            if !seen.insert(variable.name()) {
                errors.push(ModelError::DuplicateName {
                    name: variable.name().to_string(),
                });
            }
            if let Err(err) = variable.check_domain() {
                errors.push(err);
            }
        }

        for constraint in &self.constraints {
            if !seen.insert(constraint.name()) {
                errors.push(ModelError::DuplicateName {
                    name: constraint.name().to_string(),
                });
            }
            self.collect_expr_errors(constraint.name(), constraint.canonical(), &mut errors);
        }

        self.collect_expr_errors(self.objective.label(), &self.objective.expr, &mut errors);

        tracing::debug!(
            component = "model",
            operation = "validate",
            status = if errors.is_empty() { "success" } else { "invalid" },
            model = %self.name,
            violations = errors.len(),
            "Validated model"
        );
        errors
    }

    /// Move a `Building` model to `Validated`.
    ///
    /// Sealing an already validated model is a no-op. Any other state is
    /// reported as [`ModelError::Locked`].
    pub fn seal(&mut self) -> Result<(), Violations> {
        match self.state {
            ModelState::Validated => return Ok(()),
            ModelState::Building => {}
            state => return Err(ModelError::Locked { state }.into()),
        }

        let errors = self.validate();
        if !errors.is_empty() {
            return Err(Violations::new(errors));
        }
        self.state = ModelState::Validated;
        tracing::debug!(
            component = "model",
            operation = "seal",
            status = "success",
            model = %self.name,
            variables = self.variables.len(),
            constraints = self.constraints.len(),
            "Sealed model"
        );
        Ok(())
    }

    fn collect_expr_errors(&self, owner: &str, expr: &Expr, errors: &mut Vec<ModelError>) {
        if !expr.constant().is_finite() {
            errors.push(ModelError::InvalidCoefficient {
                owner: owner.to_string(),
                coefficient: expr.constant(),
            });
        }
        for (var_id, coeff) in expr.terms() {
            if var_id.index() >= self.variables.len() {
                errors.push(ModelError::UnknownVariable {
                    variable: var_id.to_string(),
                    referenced_by: owner.to_string(),
                });
            }
            if !coeff.is_finite() {
                errors.push(ModelError::InvalidCoefficient {
                    owner: owner.to_string(),
                    coefficient: coeff,
                });
            }
        }
    }
}

//! Serializable model documents.
//!
//! A [`ModelDocument`] describes a model by variable names instead of ids, so
//! it can be written by hand as JSON and loaded with [`Model::from_document`].

use lpkit_expr::expr::{ComparisonSense, ConstraintExpr, Expr};
use serde::{Deserialize, Serialize};

use crate::types::{Bounds, Constraint, Domain, Sense, Variable};

use super::error::{ModelError, Violations};
use super::{Model, NameOwner};

/// One variable of a document. Missing bounds use the domain defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    #[serde(default)]
    pub domain: Domain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

/// `coefficient * variable`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSpec {
    pub variable: String,
    pub coefficient: f64,
}

/// `sum(terms) <sense> rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub name: String,
    pub terms: Vec<TermSpec>,
    pub sense: ComparisonSense,
    pub rhs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sense: Sense,
    pub terms: Vec<TermSpec>,
    #[serde(default)]
    pub constant: f64,
}

/// A whole model keyed by names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default = "default_model_name")]
    pub name: String,
    pub variables: Vec<VariableSpec>,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<ObjectiveSpec>,
}

fn default_model_name() -> String {
    "model".to_string()
}

impl ModelDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Model {
    /// Assemble a `Building` model from a document.
    ///
    /// Every problem is reported at once: unknown variable names, duplicate
    /// names, invalid bounds and non-finite coefficients.
    pub fn from_document(document: &ModelDocument) -> Result<Model, Violations> {
        let mut model = Model::named(document.name.clone());
        let mut errors = Vec::new();

        for spec in &document.variables {
            let defaults = spec.domain.default_bounds();
            let bounds = Bounds::new(
                spec.lower.unwrap_or(defaults.lower),
                spec.upper.unwrap_or(defaults.upper),
            );
            let variable = Variable::unchecked(spec.name.clone(), spec.domain, bounds);
            model.push_unchecked_variable(variable);
        }

        for spec in &document.constraints {
            let terms = model.resolve_terms(&spec.terms, &spec.name, 0.0, &mut errors);
            let expr = ConstraintExpr::with_rhs(terms, spec.sense, spec.rhs);
            model.push_unchecked_constraint(Constraint::new(spec.name.clone(), expr));
        }

        if let Some(spec) = &document.objective {
            let label = spec.name.as_deref().unwrap_or("objective");
            let expr = model.resolve_terms(&spec.terms, label, spec.constant, &mut errors);
            model.objective.sense = spec.sense;
            model.objective.expr = expr;
            model.objective.name = spec.name.clone();
        }

        errors.extend(model.validate());
        if errors.is_empty() {
            tracing::debug!(
                component = "model",
                operation = "from_document",
                status = "success",
                model = %model.name,
                variables = model.variables.len(),
                constraints = model.constraints.len(),
                "Loaded model document"
            );
            Ok(model)
        } else {
            Err(Violations::new(errors))
        }
    }

    /// Describe the model definition as a document.
    pub fn to_document(&self) -> ModelDocument {
        let variables = self
            .variables
            .iter()
            .map(|var| {
                let Bounds { lower, upper } = var.bounds();
                VariableSpec {
                    name: var.name().to_string(),
                    domain: var.domain(),
                    lower: lower.is_finite().then_some(lower),
                    upper: upper.is_finite().then_some(upper),
                }
            })
            .collect();

        let constraints = self
            .constraints
            .iter()
            .map(|constraint| ConstraintSpec {
                name: constraint.name().to_string(),
                terms: self.term_specs(constraint.canonical()),
                sense: constraint.sense(),
                rhs: constraint.rhs(),
            })
            .collect();

        let objective = ObjectiveSpec {
            name: self.objective.name.clone(),
            sense: self.objective.sense,
            terms: self.term_specs(&self.objective.expr),
            constant: self.objective.expr.constant(),
        };

        ModelDocument {
            name: self.name.clone(),
            variables,
            constraints,
            objective: Some(objective),
        }
    }

    fn term_specs(&self, expr: &Expr) -> Vec<TermSpec> {
        expr.terms()
            .map(|(var_id, coefficient)| TermSpec {
                variable: self.describe_variable(var_id),
                coefficient,
            })
            .collect()
    }

    fn resolve_terms(
        &self,
        terms: &[TermSpec],
        owner: &str,
        constant: f64,
        errors: &mut Vec<ModelError>,
    ) -> Expr {
        let mut expr = Expr::from_constant(constant);
        for term in terms {
            match self.variable_id(&term.variable) {
                Some(var_id) => expr.add_term(var_id, term.coefficient),
                None => errors.push(ModelError::UnknownVariable {
                    variable: term.variable.clone(),
                    referenced_by: owner.to_string(),
                }),
            }
        }
        expr
    }

    // Documents may repeat names; the first owner keeps the name and
    // validation reports the rest.
    fn push_unchecked_variable(&mut self, variable: Variable) {
        let id = lpkit_expr::ids::VariableId::new(self.variables.len() as u32);
        self.names
            .entry(variable.name().to_string())
            .or_insert(NameOwner::Variable(id));
        self.variables.push(variable);
    }

    fn push_unchecked_constraint(&mut self, constraint: Constraint) {
        let id = lpkit_expr::ids::ConstraintId::new(self.constraints.len() as u32);
        self.names
            .entry(constraint.name().to_string())
            .or_insert(NameOwner::Constraint(id));
        self.constraints.push(constraint);
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const PRODUCTION: &str = r#"{
        "name": "production",
        "variables": [
            { "name": "A", "lower": 0 },
            { "name": "B", "lower": 0 }
        ],
        "constraints": [
            { "name": "Mixing", "terms": [
                { "variable": "A", "coefficient": 2 },
                { "variable": "B", "coefficient": 4 }
            ], "sense": "less_equal", "rhs": 50 },
            { "name": "Packing", "terms": [
                { "variable": "A", "coefficient": 3 },
                { "variable": "B", "coefficient": 2 }
            ], "sense": "less_equal", "rhs": 30 }
        ],
        "objective": { "sense": "maximize", "terms": [
            { "variable": "A", "coefficient": 40 },
            { "variable": "B", "coefficient": 35 }
        ] }
    }"#;

    #[test]
    fn loads_json_document() {
        let document = ModelDocument::from_json(PRODUCTION).unwrap();
        let model = Model::from_document(&document).unwrap();

        assert_eq!(model.name(), "production");
        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.num_constraints(), 2);
        assert_eq!(model.num_coefficients(), 4);
        assert_eq!(model.objective().sense, Sense::Maximize);

        let a = model.variable_id("A").unwrap();
        assert_eq!(model.variable(a).unwrap().bounds(), Bounds::non_negative());
        let packing = model.constraint_id("Packing").unwrap();
        assert_eq!(model.constraint(packing).unwrap().rhs(), 30.0);
    }

    #[test]
    fn reports_every_problem() {
        let document = ModelDocument {
            name: "broken".to_string(),
            variables: vec![
                VariableSpec {
                    name: "x".to_string(),
                    domain: Domain::Binary,
                    lower: None,
                    upper: Some(2.0),
                },
                VariableSpec {
                    name: "x".to_string(),
                    domain: Domain::Continuous,
                    lower: None,
                    upper: None,
                },
            ],
            constraints: vec![ConstraintSpec {
                name: "c".to_string(),
                terms: vec![TermSpec {
                    variable: "ghost".to_string(),
                    coefficient: 1.0,
                }],
                sense: ComparisonSense::LessEqual,
                rhs: 1.0,
            }],
            objective: None,
        };

        let violations = Model::from_document(&document).unwrap_err();
        let codes: Vec<_> = violations.iter().map(ModelError::code).collect();
        assert!(codes.contains(&"VARIABLE_UNKNOWN"));
        assert!(codes.contains(&"NAME_DUPLICATE"));
        assert!(codes.contains(&"VARIABLE_INVALID_DOMAIN"));
    }

    #[test]
    fn document_of_a_model_loads_back() {
        let document = ModelDocument::from_json(PRODUCTION).unwrap();
        let model = Model::from_document(&document).unwrap();
        let exported = model.to_document();

        assert_eq!(exported.variables, document.variables);
        assert_eq!(exported.constraints, document.constraints);
        let reloaded = Model::from_document(&exported).unwrap();
        assert_eq!(reloaded.num_coefficients(), model.num_coefficients());
    }
}

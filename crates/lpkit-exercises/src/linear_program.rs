//! Small dense linear programs over non-negative variables.
//!
//! The three presets are the introductory exercises: a covering problem, a
//! two-product production plan and a four-route transport problem.

use lpkit_core::{ComparisonSense, Expr, Model, Objective, Reporter, Sense, Variable};
use serde::{Deserialize, Serialize};

use crate::Exercise;
use crate::error::ExerciseError;

const EXERCISE: &str = "linear program";

/// One dense constraint row over all variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowData {
    pub name: String,
    pub coefficients: Vec<f64>,
    pub sense: ComparisonSense,
    pub rhs: f64,
}

/// A dense linear program where every variable is continuous and `>= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearProgramData {
    pub name: String,
    pub sense: Sense,
    pub variables: Vec<String>,
    pub objective: Vec<f64>,
    pub rows: Vec<RowData>,
}

impl LinearProgramData {
    fn row(name: &str, coefficients: &[f64], sense: ComparisonSense, rhs: f64) -> RowData {
        RowData {
            name: name.to_string(),
            coefficients: coefficients.to_vec(),
            sense,
            rhs,
        }
    }

    /// Minimize `2 x_1 + 5 x_2` subject to `3 x_1 + 8 x_2 >= 24`.
    ///
    /// The exercise sheet files this one under maximisation, but the model
    /// it states minimizes. The sense here is the one the model states.
    pub fn tp1_base() -> Self {
        Self {
            name: "tp1_base".to_string(),
            sense: Sense::Minimize,
            variables: vec!["x_1".to_string(), "x_2".to_string()],
            objective: vec![2.0, 5.0],
            rows: vec![Self::row(
                "constraint_1",
                &[3.0, 8.0],
                ComparisonSense::GreaterEqual,
                24.0,
            )],
        }
    }

    /// Maximize `40 A + 35 B` under mixing and packing capacity.
    pub fn tp1_production() -> Self {
        Self {
            name: "tp1_production".to_string(),
            sense: Sense::Maximize,
            variables: vec!["A".to_string(), "B".to_string()],
            objective: vec![40.0, 35.0],
            rows: vec![
                Self::row("constraint_1", &[2.0, 4.0], ComparisonSense::LessEqual, 50.0),
                Self::row("constraint_2", &[3.0, 2.0], ComparisonSense::LessEqual, 30.0),
            ],
        }
    }

    /// Ship 25 units to each of two destinations from two capacitated
    /// origins at minimum cost.
    pub fn tp1_transport() -> Self {
        Self {
            name: "tp1_transport".to_string(),
            sense: Sense::Minimize,
            variables: (1..=4).map(|i| format!("x_{i}")).collect(),
            objective: vec![4.0, 8.0, 6.0, 3.0],
            rows: vec![
                Self::row(
                    "constraint_1",
                    &[1.0, 1.0, 0.0, 0.0],
                    ComparisonSense::Equal,
                    25.0,
                ),
                Self::row(
                    "constraint_2",
                    &[0.0, 0.0, 1.0, 1.0],
                    ComparisonSense::Equal,
                    25.0,
                ),
                Self::row(
                    "constraint_3",
                    &[1.0, 0.0, 1.0, 0.0],
                    ComparisonSense::LessEqual,
                    30.0,
                ),
                Self::row(
                    "constraint_4",
                    &[0.0, 1.0, 0.0, 1.0],
                    ComparisonSense::LessEqual,
                    20.0,
                ),
            ],
        }
    }
}

/// Build the model for a dense linear program.
pub fn build(data: &LinearProgramData) -> Result<Exercise, ExerciseError> {
    let mut model = Model::named(data.name.as_str());
    let mut ids = Vec::with_capacity(data.variables.len());
    for name in &data.variables {
        ids.push(model.add_variable(Variable::continuous(name.as_str()).with_lower(0.0)?)?);
    }

    let objective = Expr::from_pairs(&ids, &data.objective)?;
    model.replace_objective(Objective {
        sense: data.sense,
        expr: objective,
        name: Some("objective".to_string()),
    })?;

    for row in &data.rows {
        if row.coefficients.len() != ids.len() {
            return Err(ExerciseError::invalid(
                EXERCISE,
                format!(
                    "row '{}' has {} coefficients for {} variables",
                    row.name,
                    row.coefficients.len(),
                    ids.len()
                ),
            ));
        }
        let lhs = Expr::from_pairs(&ids, &row.coefficients)?;
        model.add_constraint(row.name.as_str(), lhs.compare_scalar(row.rhs, row.sense))?;
    }

    tracing::debug!(
        component = "exercise",
        operation = "build",
        status = "success",
        exercise = %data.name,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        "Built linear program"
    );
    Ok(Exercise {
        model,
        reporter: Reporter::new(),
    })
}

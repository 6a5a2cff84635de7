//! Backend-neutral, owned copy of a model in column/row form.

use lpkit_core::{ComparisonSense, Domain, Model, Sense, Solution};

/// One model variable as a backend column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Column {
    pub lower: f64,
    pub upper: f64,
    pub objective: f64,
    pub domain: Domain,
}

impl Column {
    pub fn is_integral(&self) -> bool {
        self.domain.is_integral()
    }
}

/// One constraint as `sum(terms) <sense> rhs`, terms keyed by column index.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Row {
    pub terms: Vec<(usize, f64)>,
    pub sense: ComparisonSense,
    pub rhs: f64,
}

/// Model data a backend needs, detached from the model so it can move to a
/// worker thread.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinearProblem {
    pub sense: Sense,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    /// Objective constant; backends see only the variable part.
    pub objective_offset: f64,
}

impl LinearProblem {
    pub fn from_model(model: &Model) -> Self {
        let objective = model.objective();
        let columns = model
            .variable_entries()
            .map(|(var_id, var)| {
                let bounds = var.bounds();
                Column {
                    lower: bounds.lower,
                    upper: bounds.upper,
                    objective: objective.expr.coefficient(var_id),
                    domain: var.domain(),
                }
            })
            .collect();

        let rows = model
            .constraints()
            .iter()
            .map(|constraint| Row {
                terms: constraint
                    .terms()
                    .map(|(var_id, coeff)| (var_id.index(), coeff))
                    .collect(),
                sense: constraint.sense(),
                rhs: constraint.rhs(),
            })
            .collect();

        Self {
            sense: objective.sense,
            columns,
            rows,
            objective_offset: objective.expr.constant(),
        }
    }

    pub fn has_integral_columns(&self) -> bool {
        self.columns.iter().any(Column::is_integral)
    }

    /// Answer a problem without columns directly: every row is a constant
    /// comparison.
    pub fn solve_without_columns(&self, tolerance: f64) -> Option<Solution> {
        if !self.columns.is_empty() {
            return None;
        }
        let feasible = self
            .rows
            .iter()
            .all(|row| row.sense.holds(0.0, row.rhs, tolerance));
        Some(if feasible {
            Solution::optimal(self.objective_offset, Vec::new())
        } else {
            Solution::infeasible()
        })
    }

    /// Round integral columns that are within `tolerance` of an integer.
    pub fn snap_integral(&self, values: &mut [f64], tolerance: f64) {
        for (value, column) in values.iter_mut().zip(&self.columns) {
            if column.is_integral() {
                let rounded = value.round();
                if (*value - rounded).abs() <= tolerance {
                    *value = rounded;
                }
            }
            if *value == 0.0 {
                *value = 0.0;
            }
        }
    }
}

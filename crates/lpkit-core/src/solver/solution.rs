//! Solve results.

use std::collections::BTreeMap;

use lpkit_expr::ids::VariableId;
use serde::Serialize;

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    /// Optimal solution found.
    Optimal,
    /// No point satisfies the constraints.
    Infeasible,
    /// The objective can improve without bound.
    Unbounded,
    /// The backend stopped without a conclusive answer.
    NotSolved,
}

impl SolutionStatus {
    pub fn is_optimal(self) -> bool {
        matches!(self, SolutionStatus::Optimal)
    }

    /// Label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "Optimal",
            SolutionStatus::Infeasible => "Infeasible",
            SolutionStatus::Unbounded => "Unbounded",
            SolutionStatus::NotSolved => "Not Solved",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::Unbounded => "unbounded",
            SolutionStatus::NotSolved => "not_solved",
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a solve.
///
/// The objective value and variable values are present exactly when the
/// status is [`SolutionStatus::Optimal`]. Values are indexed by variable
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    status: SolutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    objective_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solve_time_seconds: Option<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, f64>,
}

impl Solution {
    /// Optimal result with one value per model variable.
    pub fn optimal(objective_value: f64, values: Vec<f64>) -> Self {
        Self::with_status(SolutionStatus::Optimal, Some(objective_value), Some(values))
    }

    pub fn infeasible() -> Self {
        Self::with_status(SolutionStatus::Infeasible, None, None)
    }

    pub fn unbounded() -> Self {
        Self::with_status(SolutionStatus::Unbounded, None, None)
    }

    pub fn not_solved() -> Self {
        Self::with_status(SolutionStatus::NotSolved, None, None)
    }

    fn with_status(
        status: SolutionStatus,
        objective_value: Option<f64>,
        values: Option<Vec<f64>>,
    ) -> Self {
        Self {
            status,
            objective_value,
            values,
            solve_time_seconds: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Record the wall-clock solve time.
    pub fn with_solve_time(mut self, seconds: f64) -> Self {
        self.solve_time_seconds = Some(seconds);
        self
    }

    /// Attach a numeric detail (iteration count, gap, node count).
    pub fn with_metadata(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn status(&self) -> SolutionStatus {
        self.status
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Value of one variable, if the solve was optimal.
    pub fn value(&self, id: VariableId) -> Option<f64> {
        self.values
            .as_ref()
            .and_then(|values| values.get(id.index()).copied())
    }

    /// All values in declaration order, if the solve was optimal.
    pub fn values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }

    pub fn solve_time_seconds(&self) -> Option<f64> {
        self.solve_time_seconds
    }

    pub fn metadata(&self) -> &BTreeMap<String, f64> {
        &self.metadata
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn optimal_carries_values() {
        let solution = Solution::optimal(15.0, vec![0.0, 3.0]).with_solve_time(0.01);
        assert!(solution.is_optimal());
        assert_eq!(solution.objective_value(), Some(15.0));
        assert_eq!(solution.value(VariableId::new(1)), Some(3.0));
        assert_eq!(solution.value(VariableId::new(2)), None);
        assert_eq!(solution.solve_time_seconds(), Some(0.01));
    }

    #[test]
    fn infeasible_has_neither_objective_nor_values() {
        let solution = Solution::infeasible();
        assert_eq!(solution.status(), SolutionStatus::Infeasible);
        assert!(solution.objective_value().is_none());
        assert!(solution.values().is_none());
        assert!(solution.value(VariableId::new(0)).is_none());
    }

    #[test]
    fn status_labels() {
        assert_eq!(SolutionStatus::NotSolved.to_string(), "Not Solved");
        assert_eq!(SolutionStatus::Optimal.as_str(), "optimal");
    }

    #[test]
    fn serializes_without_absent_fields() {
        let json = serde_json::to_value(Solution::unbounded()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "unbounded" }));

        let json =
            serde_json::to_value(Solution::optimal(1.0, vec![1.0]).with_metadata("nodes", 3.0))
                .unwrap();
        assert_eq!(json["objective_value"], 1.0);
        assert_eq!(json["metadata"]["nodes"], 3.0);
    }
}

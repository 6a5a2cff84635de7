//! Constraint expressions in canonical form: `expr <op> 0`.
//!
//! However a caller phrases a comparison (`a <= 5`, `a - b >= c`), the
//! right-hand side is folded into the canonical expression's constant, so
//! backends see one representation. `rhs()` recovers the conventional
//! `terms <op> rhs` reading.

use crate::expr::core::Expr;
use crate::ids::VariableId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }

    /// Mathematical operator used in rendered output.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "<=",
            ComparisonSense::GreaterEqual => ">=",
            ComparisonSense::Equal => "=",
        }
    }

    /// Whether `lhs <op> rhs` holds within `tolerance`.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            ComparisonSense::LessEqual => lhs <= rhs + tolerance,
            ComparisonSense::GreaterEqual => lhs >= rhs - tolerance,
            ComparisonSense::Equal => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl std::fmt::Display for ComparisonSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintExpr {
    canonical: Expr,
    sense: ComparisonSense,
}

impl ConstraintExpr {
    /// Wrap an expression already in `expr <op> 0` form.
    pub fn new(canonical: Expr, sense: ComparisonSense) -> Self {
        Self { canonical, sense }
    }

    /// Build from `terms <op> rhs`.
    pub fn with_rhs(terms: Expr, sense: ComparisonSense, rhs: f64) -> Self {
        terms.compare_scalar(rhs, sense)
    }

    /// The canonical left-hand side (compared against zero).
    pub fn canonical(&self) -> &Expr {
        &self.canonical
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    /// Right-hand side of the `terms <op> rhs` reading.
    pub fn rhs(&self) -> f64 {
        let constant = self.canonical.constant();
        if constant == 0.0 { 0.0 } else { -constant }
    }

    /// Variable terms of the canonical expression.
    pub fn terms(&self) -> impl Iterator<Item = (VariableId, f64)> + '_ {
        self.canonical.terms()
    }

    /// Check the comparison against a value lookup. Missing values count as
    /// unsatisfied.
    pub fn is_satisfied_by(
        &self,
        value: impl FnMut(VariableId) -> Option<f64>,
        tolerance: f64,
    ) -> bool {
        self.canonical
            .evaluate(value)
            .is_some_and(|lhs| self.sense.holds(lhs, 0.0, tolerance))
    }

    pub fn into_parts(self) -> (Expr, ComparisonSense) {
        (self.canonical, self.sense)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn x() -> VariableId {
        VariableId::new(0)
    }

    #[test]
    fn rhs_is_recovered_from_canonical_constant() {
        let c = ConstraintExpr::with_rhs(Expr::term(x(), 3.0), ComparisonSense::GreaterEqual, 24.0);
        assert_eq!(c.canonical().constant(), -24.0);
        assert_eq!(c.rhs(), 24.0);
        assert_eq!(c.terms().collect::<Vec<_>>(), vec![(x(), 3.0)]);
    }

    #[test]
    fn phrasing_does_not_change_canonical_form() {
        // 3x >= 24 and 3x - 24 >= 0 normalize identically.
        let a = Expr::term(x(), 3.0).ge_scalar(24.0);
        let b = (Expr::term(x(), 3.0) - 24.0).ge_scalar(0.0);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_rhs_is_not_negative_zero() {
        let c = Expr::var(x()).le_scalar(0.0);
        assert!(c.rhs().is_sign_positive());
    }

    #[test]
    fn satisfaction_respects_tolerance() {
        let c = Expr::var(x()).eq_scalar(5.0);
        assert!(c.is_satisfied_by(|_| Some(5.0 + 1e-9), 1e-6));
        assert!(!c.is_satisfied_by(|_| Some(5.1), 1e-6));
        assert!(!c.is_satisfied_by(|_| None, 1e-6));
    }

    #[test]
    fn sense_symbols() {
        assert_eq!(ComparisonSense::LessEqual.symbol(), "<=");
        assert_eq!(ComparisonSense::GreaterEqual.to_string(), ">=");
        assert_eq!(ComparisonSense::Equal.as_str(), "eq");
    }
}

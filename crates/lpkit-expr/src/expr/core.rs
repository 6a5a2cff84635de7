//! Core expression type: one coefficient per variable + constant.
//!
//! Terms live in a `BTreeMap` keyed by variable id, so two expressions that
//! mention the same variable merge into a single coefficient, and iteration
//! order is the variable declaration order. Entries whose coefficient
//! becomes exactly zero are dropped.

use crate::expr::constraint::{ComparisonSense, ConstraintExpr};
use crate::expr::error::LinearExprError;
use crate::ids::VariableId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    constant: f64,
    terms: BTreeMap<VariableId, f64>,
}

impl Expr {
    // ── Constructors ────────────────────────────────────────

    /// Zero expression (no terms, zero constant).
    pub fn zero() -> Self {
        Self::default()
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Default::default()
        }
    }

    /// Single linear term: coeff * var.
    pub fn term(var_id: VariableId, coeff: f64) -> Self {
        let mut expr = Self::default();
        expr.add_term(var_id, coeff);
        expr
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var_id: VariableId) -> Self {
        Self::term(var_id, 1.0)
    }

    /// From (variable, coefficient) pairs plus a constant. Repeated
    /// variables are summed.
    pub fn from_terms(terms: impl IntoIterator<Item = (VariableId, f64)>, constant: f64) -> Self {
        let mut expr = Self::from_constant(constant);
        for (var_id, coeff) in terms {
            expr.add_term(var_id, coeff);
        }
        expr
    }

    /// Zip a column of variables with a column of coefficients.
    pub fn from_pairs(
        variables: &[VariableId],
        coefficients: &[f64],
    ) -> Result<Self, LinearExprError> {
        if variables.len() != coefficients.len() {
            return Err(LinearExprError::MismatchedLengths {
                variables: variables.len(),
                coefficients: coefficients.len(),
            });
        }
        if let Some(bad) = coefficients.iter().find(|c| !c.is_finite()) {
            return Err(LinearExprError::NonFiniteCoefficient { coefficient: *bad });
        }
        Ok(Self::from_terms(
            variables.iter().copied().zip(coefficients.iter().copied()),
            0.0,
        ))
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Coefficient of a variable; zero when the variable is absent.
    pub fn coefficient(&self, var_id: VariableId) -> f64 {
        self.terms.get(&var_id).copied().unwrap_or(0.0)
    }

    /// Non-zero terms in variable order.
    pub fn terms(&self) -> impl Iterator<Item = (VariableId, f64)> + '_ {
        self.terms.iter().map(|(v, c)| (*v, *c))
    }

    /// Variables with a non-zero coefficient.
    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.terms.keys().copied()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// True when no variable has a non-zero coefficient.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// True for the zero expression.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty() && self.constant == 0.0
    }

    /// Consume and return (terms, constant).
    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.terms.into_iter().collect(), self.constant)
    }

    /// Evaluate the expression against a value lookup.
    ///
    /// Returns `None` when a variable has no value.
    pub fn evaluate(&self, mut value: impl FnMut(VariableId) -> Option<f64>) -> Option<f64> {
        let mut total = self.constant;
        for (var_id, coeff) in &self.terms {
            total += coeff * value(*var_id)?;
        }
        Some(total)
    }

    // ── Operations ──────────────────────────────────────────

    /// Add `coeff * var` in place, merging with an existing term.
    pub fn add_term(&mut self, var_id: VariableId, coeff: f64) {
        if coeff == 0.0 {
            return;
        }
        let slot = self.terms.entry(var_id).or_insert(0.0);
        *slot += coeff;
        if *slot == 0.0 {
            self.terms.remove(&var_id);
        }
    }

    /// Scale all terms and the constant by a factor.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            constant: self.constant * by,
            terms: self
                .terms
                .iter()
                .map(|(v, c)| (*v, *c * by))
                .filter(|(_, c)| *c != 0.0)
                .collect(),
        }
    }

    /// Sum of two expressions; shared variables add their coefficients.
    pub fn add(&self, other: &Expr) -> Self {
        let mut out = self.clone();
        out.add_assign_ref(other);
        out
    }

    /// Add a constant offset.
    pub fn add_constant(&self, value: f64) -> Self {
        Self {
            constant: self.constant + value,
            terms: self.terms.clone(),
        }
    }

    /// Copy with constant set to zero.
    pub fn without_constant(&self) -> Self {
        Self {
            constant: 0.0,
            terms: self.terms.clone(),
        }
    }

    fn add_assign_ref(&mut self, other: &Expr) {
        self.constant += other.constant;
        for (var_id, coeff) in &other.terms {
            self.add_term(*var_id, *coeff);
        }
    }

    // ── Comparison methods (produce ConstraintExpr) ─────────

    /// `self <sense> rhs`, normalized to `self - rhs <sense> 0`.
    pub fn compare_scalar(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.add_constant(-rhs), sense)
    }

    /// `self <sense> other`, normalized to `self - other <sense> 0`.
    pub fn compare_expr(&self, other: &Expr, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.add(&other.scale(-1.0)), sense)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::Equal)
    }

    pub fn le_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::Equal)
    }
}

impl From<VariableId> for Expr {
    fn from(var_id: VariableId) -> Self {
        Expr::var(var_id)
    }
}

impl From<f64> for Expr {
    fn from(constant: f64) -> Self {
        Expr::from_constant(constant)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for Expr {
    type Output = Expr;

    fn add(mut self, rhs: Expr) -> Self::Output {
        self.add_assign_ref(&rhs);
        self
    }
}

impl std::ops::Add<f64> for Expr {
    type Output = Expr;

    fn add(mut self, rhs: f64) -> Self::Output {
        self.constant += rhs;
        self
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;

    fn sub(mut self, rhs: Expr) -> Self::Output {
        self.add_assign_ref(&rhs.scale(-1.0));
        self
    }
}

impl std::ops::Sub<f64> for Expr {
    type Output = Expr;

    fn sub(mut self, rhs: f64) -> Self::Output {
        self.constant -= rhs;
        self
    }
}

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        self.add_assign_ref(&rhs);
    }
}

impl std::ops::SubAssign for Expr {
    fn sub_assign(&mut self, rhs: Expr) {
        self.add_assign_ref(&rhs.scale(-1.0));
    }
}

impl std::ops::Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Self::Output {
        rhs.scale(self)
    }
}

impl std::ops::Mul<VariableId> for f64 {
    type Output = Expr;

    fn mul(self, rhs: VariableId) -> Self::Output {
        Expr::term(rhs, self)
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

impl std::iter::Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Self {
        iter.fold(Expr::zero(), |acc, e| acc + e)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::VariableId;
    use crate::expr::{ComparisonSense, Expr, LinearExprError};

    fn x() -> VariableId {
        VariableId::new(1)
    }

    fn y() -> VariableId {
        VariableId::new(2)
    }

    fn terms(e: &Expr) -> Vec<(u32, f64)> {
        e.terms().map(|(id, c)| (id.inner(), c)).collect()
    }

    #[test]
    fn from_constant() {
        let e = Expr::from_constant(5.0);
        assert_eq!(e.constant(), 5.0);
        assert!(e.is_constant());
        assert!(!e.is_zero());
    }

    #[test]
    fn combining_sums_shared_coefficients() {
        // (2x + 3y) + (x - y) = 3x + 2y
        let a = 2.0 * x() + 3.0 * y();
        let b = Expr::var(x()) - Expr::var(y());
        let c = a + b;
        assert_eq!(terms(&c), vec![(1, 3.0), (2, 2.0)]);
        assert_eq!(c.constant(), 0.0);
    }

    #[test]
    fn scaling_by_zero_prunes_everything() {
        let e = Expr::from_terms([(x(), 2.0), (y(), -4.0)], 0.0);
        let scaled = e * 0.0;
        assert!(scaled.is_zero());
        assert_eq!(scaled.num_terms(), 0);
    }

    #[test]
    fn cancelling_terms_are_removed() {
        let e = Expr::term(x(), 2.0) + Expr::term(x(), -2.0) + Expr::term(y(), 4.0);
        assert_eq!(terms(&e), vec![(2, 4.0)]);
        assert_eq!(e.coefficient(x()), 0.0);
    }

    #[test]
    fn from_terms_merges_duplicates() {
        let e = Expr::from_terms([(y(), 1.0), (x(), 1.5), (y(), 2.0)], 7.0);
        assert_eq!(terms(&e), vec![(1, 1.5), (2, 3.0)]);
        assert_eq!(e.constant(), 7.0);
    }

    #[test]
    fn scale_with_constant() {
        let e = Expr::from_terms([(x(), 2.0)], 3.0);
        let scaled = e.scale(2.0);
        assert_eq!(scaled.constant(), 6.0);
        assert_eq!(scaled.coefficient(x()), 4.0);
    }

    #[test]
    fn sum_of_expressions() {
        let total: Expr = [1.0, 2.0, 3.0]
            .iter()
            .map(|c| Expr::term(x(), *c))
            .sum();
        assert_eq!(terms(&total), vec![(1, 6.0)]);
    }

    #[test]
    fn evaluate_uses_lookup() {
        let e = Expr::from_terms([(x(), 2.0), (y(), 5.0)], 1.0);
        let value = e.evaluate(|id| if id == x() { Some(0.0) } else { Some(3.0) });
        assert_eq!(value, Some(16.0));
        assert_eq!(e.evaluate(|_| None), None);
    }

    #[test]
    fn from_pairs_rejects_mismatched_lengths() {
        let result = Expr::from_pairs(&[x(), y()], &[1.0]);
        assert_eq!(
            result.unwrap_err(),
            LinearExprError::MismatchedLengths {
                variables: 2,
                coefficients: 1
            }
        );
    }

    #[test]
    fn from_pairs_rejects_nan() {
        let result = Expr::from_pairs(&[x()], &[f64::NAN]);
        assert!(matches!(
            result,
            Err(LinearExprError::NonFiniteCoefficient { .. })
        ));
    }

    #[test]
    fn le_scalar_folds_rhs_into_canonical_constant() {
        let e = Expr::from_terms([(x(), 1.0)], 3.0);
        let c = e.le_scalar(10.0);
        assert_eq!(c.sense(), ComparisonSense::LessEqual);
        assert_eq!(c.canonical().constant(), -7.0);
        assert_eq!(c.rhs(), 7.0);
    }

    #[test]
    fn ge_expr_moves_everything_left() {
        let lhs = Expr::from_terms([(x(), 1.0)], 3.0);
        let rhs = Expr::from_terms([(y(), 1.0)], 7.0);
        let c = lhs.ge_expr(&rhs);
        assert_eq!(c.sense(), ComparisonSense::GreaterEqual);
        assert_eq!(c.rhs(), 4.0);
        assert_eq!(c.canonical().coefficient(y()), -1.0);
    }
}

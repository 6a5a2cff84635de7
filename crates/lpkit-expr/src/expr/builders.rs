//! Builder functions for constructing linear expressions.

use crate::expr::core::Expr;
use crate::ids::VariableId;

/// Weighted sum `Σ weight_i * var_i`, the workhorse of data-driven models.
///
/// Pairs are zipped, so the shorter input decides the length; use
/// [`Expr::from_pairs`] when a length mismatch should be an error.
pub fn linear_sum<V, W>(variables: V, weights: W) -> Expr
where
    V: IntoIterator<Item = VariableId>,
    W: IntoIterator<Item = f64>,
{
    Expr::from_terms(variables.into_iter().zip(weights), 0.0)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn linear_sum_zips_weights() {
        let vars = [VariableId::new(0), VariableId::new(1), VariableId::new(0)];
        let expr = linear_sum(vars, [2.0, 5.0, 1.0]);
        assert_eq!(expr.coefficient(VariableId::new(0)), 3.0);
        assert_eq!(expr.coefficient(VariableId::new(1)), 5.0);
        assert_eq!(expr.constant(), 0.0);
    }

    #[test]
    fn linear_sum_of_nothing_is_zero() {
        let expr = linear_sum(Vec::new(), Vec::new());
        assert!(expr.is_zero());
    }
}

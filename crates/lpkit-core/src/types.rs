use crate::model::ModelError;
use lpkit_expr::{ComparisonSense, ConstraintExpr, Expr, VariableId};
use serde::{Deserialize, Serialize};

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

/// Value domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    #[default]
    Continuous,
    Integer,
    Binary,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Continuous => "continuous",
            Domain::Integer => "integer",
            Domain::Binary => "binary",
        }
    }

    /// Integer and binary variables must take integral values.
    pub fn is_integral(self) -> bool {
        matches!(self, Domain::Integer | Domain::Binary)
    }

    /// Bounds used when the caller does not give any.
    pub fn default_bounds(self) -> Bounds {
        match self {
            Domain::Continuous | Domain::Integer => Bounds::free(),
            Domain::Binary => Bounds::new(0.0, 1.0),
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounds for a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// (-inf, +inf)
    pub fn free() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    /// [0, +inf)
    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// [value, value]
    pub fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn is_fixed(&self) -> bool {
        self.lower == self.upper
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// A named decision variable with a domain and bounds.
///
/// Construction checks the bounds against the domain; a variable that
/// exists is always well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    domain: Domain,
    bounds: Bounds,
}

impl Variable {
    /// Create a variable, rejecting bounds that do not fit the domain.
    pub fn new(
        name: impl Into<String>,
        domain: Domain,
        lower: f64,
        upper: f64,
    ) -> Result<Self, ModelError> {
        let variable = Self::unchecked(name.into(), domain, Bounds::new(lower, upper));
        variable.check_domain()?;
        Ok(variable)
    }

    /// Continuous variable on (-inf, +inf).
    pub fn continuous(name: impl Into<String>) -> Self {
        Self::unchecked(name.into(), Domain::Continuous, Domain::Continuous.default_bounds())
    }

    /// Integer variable on (-inf, +inf).
    pub fn integer(name: impl Into<String>) -> Self {
        Self::unchecked(name.into(), Domain::Integer, Domain::Integer.default_bounds())
    }

    /// Binary variable on [0, 1].
    pub fn binary(name: impl Into<String>) -> Self {
        Self::unchecked(name.into(), Domain::Binary, Domain::Binary.default_bounds())
    }

    pub(crate) fn unchecked(name: String, domain: Domain, bounds: Bounds) -> Self {
        Self {
            name,
            domain,
            bounds,
        }
    }

    /// Replace both bounds.
    pub fn with_bounds(self, lower: f64, upper: f64) -> Result<Self, ModelError> {
        Self::new(self.name, self.domain, lower, upper)
    }

    /// Replace the lower bound.
    pub fn with_lower(self, lower: f64) -> Result<Self, ModelError> {
        let upper = self.bounds.upper;
        self.with_bounds(lower, upper)
    }

    /// Replace the upper bound.
    pub fn with_upper(self, upper: f64) -> Result<Self, ModelError> {
        let lower = self.bounds.lower;
        self.with_bounds(lower, upper)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_integral(&self) -> bool {
        self.domain.is_integral()
    }

    pub(crate) fn check_domain(&self) -> Result<(), ModelError> {
        let Bounds { lower, upper } = self.bounds;
        let ordered = !lower.is_nan() && !upper.is_nan() && lower <= upper;
        let fits_domain = match self.domain {
            Domain::Binary => is_zero_or_one(lower) && is_zero_or_one(upper),
            Domain::Continuous | Domain::Integer => true,
        };
        if ordered && fits_domain {
            Ok(())
        } else {
            Err(ModelError::InvalidDomain {
                name: self.name.clone(),
                domain: self.domain,
                lower,
                upper,
            })
        }
    }
}

fn is_zero_or_one(value: f64) -> bool {
    value == 0.0 || value == 1.0
}

/// A named linear constraint held by a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    name: String,
    expr: ConstraintExpr,
}

impl Constraint {
    pub(crate) fn new(name: String, expr: ConstraintExpr) -> Self {
        Self { name, expr }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &ConstraintExpr {
        &self.expr
    }

    /// Canonical left-hand side, compared against zero.
    pub fn canonical(&self) -> &Expr {
        self.expr.canonical()
    }

    pub fn sense(&self) -> ComparisonSense {
        self.expr.sense()
    }

    pub fn rhs(&self) -> f64 {
        self.expr.rhs()
    }

    pub fn terms(&self) -> impl Iterator<Item = (VariableId, f64)> + '_ {
        self.expr.terms()
    }
}

/// Objective function with a sense and a linear expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub sense: Sense,
    pub expr: Expr,
    pub name: Option<String>,
}

impl Objective {
    pub fn new(sense: Sense, expr: Expr) -> Self {
        Self {
            sense,
            expr,
            name: None,
        }
    }

    /// `Minimize 0`: every feasible point is optimal.
    pub fn feasibility() -> Self {
        Self::new(Sense::Minimize, Expr::zero())
    }

    /// Label used in diagnostics.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("objective")
    }
}

impl Default for Objective {
    fn default() -> Self {
        Self::feasibility()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn binary_with_unit_bounds_is_accepted() {
        let var = Variable::new("open", Domain::Binary, 0.0, 1.0).unwrap();
        assert_eq!(var.bounds(), Bounds::new(0.0, 1.0));
        assert!(var.is_integral());
    }

    #[test]
    fn binary_with_upper_two_is_rejected() {
        let result = Variable::new("open", Domain::Binary, 0.0, 2.0);
        assert!(matches!(
            result,
            Err(ModelError::InvalidDomain {
                domain: Domain::Binary,
                ..
            })
        ));
    }

    #[test]
    fn binary_may_be_fixed() {
        assert!(Variable::new("on", Domain::Binary, 1.0, 1.0).is_ok());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = Variable::new("x", Domain::Continuous, 5.0, 1.0);
        assert!(matches!(result, Err(ModelError::InvalidDomain { .. })));
    }

    #[test]
    fn nan_bounds_are_rejected() {
        let result = Variable::new("x", Domain::Integer, f64::NAN, 1.0);
        assert!(result.is_err());
    }

    #[test]
    fn default_bounds_depend_on_domain() {
        assert_eq!(Variable::continuous("x").bounds(), Bounds::free());
        assert_eq!(Variable::integer("n").bounds(), Bounds::free());
        assert_eq!(Variable::binary("b").bounds(), Bounds::new(0.0, 1.0));
    }

    #[test]
    fn with_lower_keeps_upper() {
        let var = Variable::binary("b").with_lower(1.0).unwrap();
        assert_eq!(var.bounds(), Bounds::fixed(1.0));
        assert!(var.bounds().is_fixed());

        let var = Variable::continuous("x").with_lower(0.0).unwrap();
        assert_eq!(var.bounds(), Bounds::non_negative());
    }

    #[test]
    fn with_upper_revalidates() {
        assert!(Variable::binary("b").with_upper(3.0).is_err());
    }

    #[test]
    fn feasibility_objective_is_zero_minimization() {
        let objective = Objective::default();
        assert_eq!(objective.sense, Sense::Minimize);
        assert!(objective.expr.is_zero());
        assert_eq!(objective.label(), "objective");
    }
}

//! Linear expressions for lpkit models.
//!
//! Expressions are plain values: they know nothing about the model their
//! variables belong to. A model checks references when an expression is
//! attached to it as a constraint or objective.

pub mod expr;
pub mod ids;

pub use expr::{ComparisonSense, ConstraintExpr, Expr, LinearExprError, linear_sum};
pub use ids::{ConstraintId, VariableId};

//! Expression types for linear modeling.
//!
//! - `core`      : Expr: coefficient per variable + constant
//! - `constraint`: ConstraintExpr: canonical `expr <op> 0` comparison
//! - `builders`  : helpers for assembling expressions from columns of data
//! - `error`     : Expression construction errors

pub mod builders;
pub mod constraint;
pub mod core;
pub mod error;

pub use builders::linear_sum;
pub use constraint::{ComparisonSense, ConstraintExpr};
pub use core::Expr;
pub use error::LinearExprError;

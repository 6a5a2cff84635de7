//! lpkit core: a linear model builder with a validated solve lifecycle.
//!
//! Callers declare [`Variable`]s, combine them into [`Expr`]essions, attach
//! constraints and an objective to a [`Model`], and hand the model to a
//! [`SolverAdapter`]. The resulting [`Solution`] can be rendered with a
//! [`Reporter`].

pub mod error;
pub mod model;
pub mod report;
pub mod solver;
pub mod types;

pub use error::SolveError;
pub use model::{
    ConstraintSpec, Model, ModelDocument, ModelError, ModelState, ObjectiveSpec,
    PrettyPrintOptions, TermSpec, VariableSpec, Violations,
};
pub use report::{ReportSection, Reporter};
pub use solver::{Solution, SolutionStatus, SolverAdapter, SolverConfig, SolverError};
pub use types::{Bounds, Constraint, Domain, Objective, Sense, Variable};

pub use lpkit_expr::{
    ComparisonSense, ConstraintExpr, ConstraintId, Expr, LinearExprError, VariableId, linear_sum,
};

//! Solver backends for lpkit models.
//!
//! Each backend implements [`lpkit_core::SolverAdapter`] and is compiled in
//! through a cargo feature:
//!
//! - `microlp` (default): [`MicrolpSolver`], pure Rust
//! - `highs`: [`HighsSolver`], the HiGHS library
//!
//! [`solver_by_name`] and [`default_solver`] pick a backend at run time.

mod lowering;
#[cfg(feature = "highs")]
mod solver_highs;
#[cfg(feature = "microlp")]
mod solver_microlp;

use lpkit_core::{SolverAdapter, SolverError};

#[cfg(feature = "highs")]
pub use solver_highs::HighsSolver;
#[cfg(feature = "microlp")]
pub use solver_microlp::MicrolpSolver;

/// A backend chosen at run time.
pub type BoxedSolver = Box<dyn SolverAdapter + Send>;

/// Names of the backends compiled into this build, preferred first.
pub fn available_solvers() -> Vec<&'static str> {
    let mut names = Vec::new();
    #[cfg(feature = "highs")]
    names.push("highs");
    #[cfg(feature = "microlp")]
    names.push("microlp");
    names
}

/// Create a backend by name.
///
/// Returns [`SolverError::Unavailable`] when the name is unknown or the
/// backend was not compiled in.
pub fn solver_by_name(name: &str) -> Result<BoxedSolver, SolverError> {
    let solver: Option<BoxedSolver> = match name.to_ascii_lowercase().as_str() {
        #[cfg(feature = "highs")]
        "highs" => Some(Box::new(HighsSolver::new())),
        #[cfg(feature = "microlp")]
        "microlp" => Some(Box::new(MicrolpSolver::new())),
        _ => None,
    };

    match solver {
        Some(solver) => {
            tracing::debug!(
                component = "solver",
                operation = "select",
                status = "success",
                solver = solver.name(),
                "Selected solver backend"
            );
            Ok(solver)
        }
        None => {
            tracing::warn!(
                component = "solver",
                operation = "select",
                status = "unavailable",
                requested = name,
                available = ?available_solvers(),
                "Requested solver backend is not available"
            );
            Err(SolverError::Unavailable(name.to_string()))
        }
    }
}

/// The preferred compiled-in backend: HiGHS when present, else microlp.
pub fn default_solver() -> Result<BoxedSolver, SolverError> {
    match available_solvers().first() {
        Some(name) => solver_by_name(name),
        None => Err(SolverError::Unavailable("no solver backend compiled in".to_string())),
    }
}

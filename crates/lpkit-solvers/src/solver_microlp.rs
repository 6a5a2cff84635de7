//! Pure-Rust backend built on `microlp` (simplex plus branch and bound).
//!
//! `microlp` has no time limit of its own, so each solve runs on a worker
//! thread that owns a copy of the problem data and the caller waits on a
//! channel with a timeout. A worker that outlives its time limit is
//! detached; its result is discarded.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use lpkit_core::{
    ComparisonSense, Domain, Model, Sense, Solution, SolverAdapter, SolverConfig, SolverError,
};
use microlp::{ComparisonOp, OptimizationDirection, Problem};
use tracing::{debug, trace, warn};

use crate::lowering::{Column, LinearProblem};

/// Outcome sent back by the worker thread.
enum WorkerOutcome {
    Optimal { objective: f64, values: Vec<f64> },
    Infeasible,
    Unbounded,
    Failed(String),
}

/// [`SolverAdapter`] backed by `microlp`.
///
/// `microlp` cannot be interrupted. When the time limit expires the adapter
/// returns [`SolverError::Timeout`] at once, but the detached worker keeps
/// its CPU time and memory until the search ends or the process exits. A
/// retry on a forked model starts a second worker next to the first, so
/// integer models solved here should carry finite bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpSolver;

impl MicrolpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl SolverAdapter for MicrolpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
        config.validate()?;
        let tolerance = config.integrality_tolerance_or_default();
        let problem = LinearProblem::from_model(model);
        log_ignored_options(config);

        if let Some(solution) = problem.solve_without_columns(tolerance) {
            debug!(
                component = "solver",
                operation = "solve",
                status = "success",
                solver = "microlp",
                solution_status = solution.status().as_str(),
                "Model has no variables; answered without the backend"
            );
            return Ok(solution);
        }

        debug!(
            component = "solver",
            operation = "solve",
            status = "start",
            solver = "microlp",
            columns = problem.columns.len(),
            rows = problem.rows.len(),
            integral = problem.has_integral_columns(),
            time_limit = ?config.time_limit,
            "Starting microlp solve"
        );

        let started = Instant::now();
        let (sender, receiver) = mpsc::channel();
        let worker_problem = problem.clone();
        thread::Builder::new()
            .name("lpkit-microlp".to_string())
            .spawn(move || {
                let outcome = run_microlp(&worker_problem);
                // The caller may have stopped waiting.
                let _ = sender.send(outcome);
            })
            .map_err(|err| SolverError::Internal(format!("failed to spawn worker: {err}")))?;

        let received = match config.time_limit.and_then(wait_limit) {
            Some(limit) => receiver.recv_timeout(limit),
            None => receiver
                .recv()
                .map_err(|_| mpsc::RecvTimeoutError::Disconnected),
        };
        let elapsed = started.elapsed().as_secs_f64();

        let outcome = match received {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let limit_seconds = config.time_limit.unwrap_or_default();
                warn!(
                    component = "solver",
                    operation = "solve",
                    status = "timeout",
                    solver = "microlp",
                    limit_seconds,
                    "microlp did not finish within the time limit"
                );
                return Err(SolverError::Timeout {
                    limit_seconds,
                    best_objective: None,
                });
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(SolverError::Internal(
                    "microlp worker exited without a result".to_string(),
                ));
            }
        };

        let solution = match outcome {
            WorkerOutcome::Optimal {
                objective,
                mut values,
            } => {
                problem.snap_integral(&mut values, tolerance);
                Solution::optimal(objective + problem.objective_offset, values)
            }
            WorkerOutcome::Infeasible => Solution::infeasible(),
            WorkerOutcome::Unbounded => Solution::unbounded(),
            WorkerOutcome::Failed(message) => {
                warn!(
                    component = "solver",
                    operation = "solve",
                    status = "error",
                    solver = "microlp",
                    error = %message,
                    "microlp reported an internal error"
                );
                return Err(SolverError::Internal(message));
            }
        };

        debug!(
            component = "solver",
            operation = "solve",
            status = "success",
            solver = "microlp",
            solution_status = solution.status().as_str(),
            objective = ?solution.objective_value(),
            duration_ms = elapsed * 1000.0,
            "microlp solve completed"
        );
        Ok(solution.with_solve_time(elapsed))
    }
}

/// Time limit as a channel timeout; `None` when it does not fit a
/// [`Duration`], which amounts to no limit.
fn wait_limit(seconds: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(seconds).ok()
}

fn log_ignored_options(config: &SolverConfig) {
    let ignored = [
        ("mip_gap", config.mip_gap.is_some()),
        ("threads", config.threads.is_some()),
        ("presolve", config.presolve.is_some()),
        ("log_to_console", config.log_to_console.is_some()),
    ];
    for (option, set) in ignored {
        if set {
            debug!(
                component = "solver",
                operation = "config",
                status = "ignored",
                solver = "microlp",
                option,
                "Option not supported by microlp"
            );
        }
    }
}

fn run_microlp(problem: &LinearProblem) -> WorkerOutcome {
    let direction = match problem.sense {
        Sense::Minimize => OptimizationDirection::Minimize,
        Sense::Maximize => OptimizationDirection::Maximize,
    };
    let mut lp = Problem::new(direction);
    let vars: Vec<microlp::Variable> = problem
        .columns
        .iter()
        .map(|column| add_column(&mut lp, column))
        .collect();

    for (index, row) in problem.rows.iter().enumerate() {
        let op = match row.sense {
            ComparisonSense::LessEqual => ComparisonOp::Le,
            ComparisonSense::GreaterEqual => ComparisonOp::Ge,
            ComparisonSense::Equal => ComparisonOp::Eq,
        };
        // Row terms come from a merged expression, so each column appears once.
        let terms: Vec<(microlp::Variable, f64)> = row
            .terms
            .iter()
            .map(|&(col, coeff)| (vars[col], coeff))
            .collect();
        lp.add_constraint(terms.as_slice(), op, row.rhs);
        trace!(
            component = "solver",
            operation = "add_constraint",
            status = "success",
            solver = "microlp",
            row = index,
            terms = row.terms.len(),
            rhs = row.rhs,
            "Added row to microlp"
        );
    }

    match lp.solve() {
        Ok(solution) => WorkerOutcome::Optimal {
            objective: solution.objective(),
            values: vars.iter().map(|var| *solution.var_value(*var)).collect(),
        },
        Err(microlp::Error::Infeasible) => WorkerOutcome::Infeasible,
        Err(microlp::Error::Unbounded) => WorkerOutcome::Unbounded,
        Err(err) => WorkerOutcome::Failed(err.to_string()),
    }
}

fn add_column(lp: &mut Problem, column: &Column) -> microlp::Variable {
    match column.domain {
        Domain::Continuous => lp.add_var(column.objective, (column.lower, column.upper)),
        Domain::Binary if column.lower == 0.0 && column.upper == 1.0 => {
            lp.add_binary_var(column.objective)
        }
        Domain::Binary | Domain::Integer => lp.add_integer_var(
            column.objective,
            (integer_bound_lower(column.lower), integer_bound_upper(column.upper)),
        ),
    }
}

fn integer_bound_lower(lower: f64) -> i32 {
    lower.ceil().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

fn integer_bound_upper(upper: f64) -> i32 {
    upper.floor().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

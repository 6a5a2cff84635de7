//! HiGHS backend through the `highs` crate.

use std::time::Instant;

use highs::{HighsModelStatus, RowProblem, Sense as HighsSense, SolvedModel};
use lpkit_core::{
    ComparisonSense, Model, Sense, Solution, SolverAdapter, SolverConfig, SolverError,
};
use tracing::{debug, trace, warn};

use crate::lowering::LinearProblem;

const MIN_HIGHS_TOLERANCE: f64 = 1e-10;

/// Status classes this adapter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HighsStatus {
    Optimal,
    Infeasible,
    Unbounded,
    UnboundedOrInfeasible,
    ReachedTimeLimit,
    ReachedIterationLimit,
    Unknown,
}

fn map_status(status: HighsModelStatus) -> HighsStatus {
    match status {
        HighsModelStatus::Optimal => HighsStatus::Optimal,
        HighsModelStatus::Infeasible => HighsStatus::Infeasible,
        HighsModelStatus::Unbounded => HighsStatus::Unbounded,
        HighsModelStatus::UnboundedOrInfeasible => HighsStatus::UnboundedOrInfeasible,
        HighsModelStatus::ReachedTimeLimit => HighsStatus::ReachedTimeLimit,
        HighsModelStatus::ReachedIterationLimit => HighsStatus::ReachedIterationLimit,
        _ => HighsStatus::Unknown,
    }
}

fn highs_status_string(status: HighsStatus) -> &'static str {
    match status {
        HighsStatus::Optimal => "optimal",
        HighsStatus::Infeasible => "infeasible",
        HighsStatus::Unbounded => "unbounded",
        HighsStatus::UnboundedOrInfeasible => "unbounded_or_infeasible",
        HighsStatus::ReachedTimeLimit => "time_limit",
        HighsStatus::ReachedIterationLimit => "iteration_limit",
        HighsStatus::Unknown => "unknown",
    }
}

/// [`SolverAdapter`] backed by HiGHS.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl SolverAdapter for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(&mut self, model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
        config.validate()?;
        let problem = LinearProblem::from_model(model);
        let tolerance = config.integrality_tolerance_or_default();
        if let Some(solution) = problem.solve_without_columns(tolerance) {
            return Ok(solution);
        }

        let started = Instant::now();
        debug!(
            component = "solver",
            operation = "solve",
            status = "start",
            solver = "highs",
            columns = problem.columns.len(),
            rows = problem.rows.len(),
            integral = problem.has_integral_columns(),
            "Starting HiGHS solve"
        );

        let mut solved = run_highs(&problem, config, config.presolve);
        let mut status = map_status(solved.status());

        // Presolve may stop at "unbounded or infeasible"; a solve without
        // presolve tells the two apart.
        if status == HighsStatus::UnboundedOrInfeasible && config.presolve != Some(false) {
            debug!(
                component = "solver",
                operation = "solve",
                status = "retry",
                solver = "highs",
                "Re-solving without presolve to classify the model"
            );
            solved = run_highs(&problem, config, Some(false));
            status = map_status(solved.status());
        }

        let elapsed = started.elapsed().as_secs_f64();
        let objective = solved.objective_value() + problem.objective_offset;
        let gap = solved.mip_gap();

        debug!(
            component = "solver",
            operation = "solve",
            status = "success",
            solver = "highs",
            solver_status = highs_status_string(status),
            objective_value = objective,
            optimality_gap = gap,
            duration_ms = elapsed * 1000.0,
            "HiGHS solve completed"
        );

        let solution = match status {
            HighsStatus::Optimal => {
                let mut values = solved.get_solution().columns().to_vec();
                problem.snap_integral(&mut values, tolerance);
                let mut solution = Solution::optimal(objective, values);
                if problem.has_integral_columns() && gap.is_finite() {
                    solution = solution.with_metadata("mip_gap", gap);
                }
                solution
            }
            HighsStatus::Infeasible => Solution::infeasible(),
            HighsStatus::Unbounded | HighsStatus::UnboundedOrInfeasible => Solution::unbounded(),
            HighsStatus::ReachedTimeLimit | HighsStatus::ReachedIterationLimit => {
                let best_objective = Some(objective).filter(|value| value.is_finite());
                warn!(
                    component = "solver",
                    operation = "solve",
                    status = "timeout",
                    solver = "highs",
                    solver_status = highs_status_string(status),
                    best_objective = ?best_objective,
                    "HiGHS stopped at a limit before proving optimality"
                );
                return Err(SolverError::Timeout {
                    limit_seconds: config.time_limit.unwrap_or(f64::INFINITY),
                    best_objective,
                });
            }
            HighsStatus::Unknown => Solution::not_solved(),
        };

        Ok(solution.with_solve_time(elapsed))
    }
}

fn run_highs(problem: &LinearProblem, config: &SolverConfig, presolve: Option<bool>) -> SolvedModel {
    let mut rows = RowProblem::default();
    let columns: Vec<_> = problem
        .columns
        .iter()
        .map(|column| {
            if column.is_integral() {
                rows.add_integer_column(column.objective, column.lower..=column.upper)
            } else {
                rows.add_column(column.objective, column.lower..=column.upper)
            }
        })
        .collect();

    for (index, row) in problem.rows.iter().enumerate() {
        let factors: Vec<_> = row
            .terms
            .iter()
            .map(|&(col, coeff)| (columns[col], coeff))
            .collect();
        let (lower, upper) = match row.sense {
            ComparisonSense::LessEqual => (f64::NEG_INFINITY, row.rhs),
            ComparisonSense::GreaterEqual => (row.rhs, f64::INFINITY),
            ComparisonSense::Equal => (row.rhs, row.rhs),
        };
        rows.add_row(lower..=upper, factors);
        trace!(
            component = "solver",
            operation = "add_row",
            status = "success",
            solver = "highs",
            row = index,
            terms = row.terms.len(),
            "Added row to HiGHS"
        );
    }

    let sense = match problem.sense {
        Sense::Minimize => HighsSense::Minimise,
        Sense::Maximize => HighsSense::Maximise,
    };
    let mut model = rows.optimise(sense);
    if !config.log_to_console.unwrap_or(false) {
        model.make_quiet();
    }
    if let Some(limit) = config.time_limit {
        model.set_option("time_limit", limit);
    }
    if let Some(gap) = config.mip_gap {
        model.set_option("mip_rel_gap", gap);
    }
    if let Some(threads) = config.threads {
        model.set_option("threads", i32::try_from(threads).unwrap_or(i32::MAX));
    }
    if let Some(enabled) = presolve {
        model.set_option("presolve", if enabled { "on" } else { "off" });
    }
    if let Some(tolerance) = config.integrality_tolerance {
        // HiGHS rejects tolerances below 1e-10.
        model.set_option(
            "mip_feasibility_tolerance",
            tolerance.max(MIN_HIGHS_TOLERANCE),
        );
    }
    model.solve()
}

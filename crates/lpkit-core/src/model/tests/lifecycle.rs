use super::support::{FixtureSolver, covering_model};
use super::*;
use crate::error::SolveError;
use crate::solver::{Solution, SolutionStatus, SolverConfig, SolverError};

#[test]
fn test_value_before_solve_is_unsolved_state() {
    let (model, x1, _) = covering_model();
    let err = model.value(x1).unwrap_err();
    assert_eq!(
        err,
        ModelError::UnsolvedState {
            variable: "x1".to_string()
        }
    );
    assert!(model.value_of("x2").is_err());
    assert!(model.values().is_none());
}

#[test]
fn test_solve_writes_values_once_and_locks() {
    let (mut model, x1, x2) = covering_model();
    let mut solver = FixtureSolver::returning(Solution::optimal(15.0, vec![0.0, 3.0]));

    let solution = model
        .solve_with(&mut solver, &SolverConfig::default())
        .unwrap();

    assert_eq!(solution.status(), SolutionStatus::Optimal);
    assert_eq!(solver.calls, 1);
    assert_eq!(solver.seen_variables, 2);
    assert_eq!(model.state(), ModelState::Solved);
    assert_eq!(model.value(x1).unwrap(), 0.0);
    assert_eq!(model.value(x2).unwrap(), 3.0);
    assert_eq!(model.value_of("x2").unwrap(), 3.0);

    let err = model
        .add_variable(Variable::continuous("late"))
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::Locked {
            state: ModelState::Solved
        }
    );

    let again = model.solve_with(&mut solver, &SolverConfig::default());
    assert!(matches!(
        again,
        Err(SolveError::Model(ModelError::Locked { .. }))
    ));
    assert_eq!(solver.calls, 1);
}

#[test]
fn test_infeasible_solve_writes_no_values() {
    let (mut model, x1, _) = covering_model();
    let mut solver = FixtureSolver::returning(Solution::infeasible());

    let solution = model
        .solve_with(&mut solver, &SolverConfig::default())
        .unwrap();

    assert_eq!(solution.status(), SolutionStatus::Infeasible);
    assert!(solution.objective_value().is_none());
    assert_eq!(model.state(), ModelState::Solved);
    assert!(matches!(
        model.value(x1),
        Err(ModelError::UnsolvedState { .. })
    ));
}

#[test]
fn test_solver_error_moves_model_to_failed() {
    let (mut model, _, _) = covering_model();
    let mut solver = FixtureSolver::failing(SolverError::Timeout {
        limit_seconds: 1.0,
        best_objective: None,
    });

    let err = model
        .solve_with(&mut solver, &SolverConfig::new().with_time_limit(1.0))
        .unwrap_err();

    assert_eq!(err.code(), "SOLVER_TIMEOUT");
    assert_eq!(model.state(), ModelState::Failed);
}

#[test]
fn test_wrong_value_count_is_internal_error() {
    let (mut model, _, _) = covering_model();
    let mut solver = FixtureSolver::returning(Solution::optimal(1.0, vec![1.0]));

    let err = model
        .solve_with(&mut solver, &SolverConfig::default())
        .unwrap_err();

    assert!(matches!(err, SolveError::Solver(SolverError::Internal(_))));
    assert_eq!(model.state(), ModelState::Failed);
    assert!(model.values().is_none());
}

#[test]
fn test_fork_retries_after_failure() {
    let (mut model, _, x2) = covering_model();
    let mut failing = FixtureSolver::failing(SolverError::Internal("crash".to_string()));
    assert!(model
        .solve_with(&mut failing, &SolverConfig::default())
        .is_err());

    let mut retry = model.fork();
    assert_eq!(retry.state(), ModelState::Building);
    assert_eq!(retry.num_constraints(), model.num_constraints());

    let mut solver = FixtureSolver::returning(Solution::optimal(15.0, vec![0.0, 3.0]));
    retry
        .solve_with(&mut solver, &SolverConfig::default())
        .unwrap();
    assert_eq!(retry.value(x2).unwrap(), 3.0);
}

#[test]
fn test_invalid_model_never_reaches_solver() {
    let (mut model, _, _) = covering_model();
    model.variables.push(Variable::continuous("x1"));
    let mut solver = FixtureSolver::returning(Solution::not_solved());

    let err = model
        .solve_with(&mut solver, &SolverConfig::default())
        .unwrap_err();

    assert!(matches!(err, SolveError::Invalid(_)));
    assert_eq!(solver.calls, 0);
    assert_eq!(model.state(), ModelState::Building);
}

#[test]
fn test_invalid_config_is_rejected_before_dispatch() {
    let (mut model, _, _) = covering_model();
    let mut solver = FixtureSolver::returning(Solution::optimal(15.0, vec![0.0, 3.0]));

    let err = model
        .solve_with(&mut solver, &SolverConfig::new().with_time_limit(f64::NAN))
        .unwrap_err();
    assert!(matches!(
        err,
        SolveError::Solver(SolverError::InvalidConfig(_))
    ));
    assert_eq!(solver.calls, 0);
    assert_eq!(model.state(), ModelState::Validated);

    let solution = model
        .solve_with(&mut solver, &SolverConfig::new().with_time_limit(5.0))
        .unwrap();
    assert_eq!(solution.status(), SolutionStatus::Optimal);
}

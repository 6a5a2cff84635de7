use crate::model::Model;
use crate::solver::{Solution, SolverAdapter, SolverConfig, SolverError};
use crate::types::Variable;
use lpkit_expr::expr::Expr;
use lpkit_expr::ids::VariableId;

/// Adapter that replays a canned outcome and counts calls.
pub(super) struct FixtureSolver {
    outcome: Result<Solution, SolverError>,
    pub(super) calls: usize,
    pub(super) seen_variables: usize,
}

impl FixtureSolver {
    pub(super) fn returning(solution: Solution) -> Self {
        Self {
            outcome: Ok(solution),
            calls: 0,
            seen_variables: 0,
        }
    }

    pub(super) fn failing(error: SolverError) -> Self {
        Self {
            outcome: Err(error),
            calls: 0,
            seen_variables: 0,
        }
    }
}

impl SolverAdapter for FixtureSolver {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn solve(&mut self, model: &Model, _config: &SolverConfig) -> Result<Solution, SolverError> {
        self.calls += 1;
        self.seen_variables = model.num_variables();
        self.outcome.clone()
    }
}

/// `min 2 x1 + 5 x2  s.t.  3 x1 + 8 x2 >= 24`, both non-negative.
pub(super) fn covering_model() -> (Model, VariableId, VariableId) {
    let mut model = Model::named("covering");
    let x1 = model
        .add_variable(Variable::continuous("x1").with_lower(0.0).unwrap())
        .unwrap();
    let x2 = model
        .add_variable(Variable::continuous("x2").with_lower(0.0).unwrap())
        .unwrap();
    model
        .add_constraint("cover", (3.0 * x1 + 8.0 * x2).ge_scalar(24.0))
        .unwrap();
    model
        .minimize(Expr::term(x1, 2.0) + Expr::term(x2, 5.0))
        .unwrap();
    (model, x1, x2)
}

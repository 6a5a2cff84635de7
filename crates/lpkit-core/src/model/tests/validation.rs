use super::support::covering_model;
use super::*;
use crate::types::Bounds;

#[test]
fn test_valid_model_has_no_violations() {
    let (model, _, _) = covering_model();
    assert!(model.validate().is_empty());
}

#[test]
fn test_validate_is_idempotent() {
    let (mut model, _, _) = covering_model();
    model.variables.push(Variable::unchecked(
        "x1".to_string(),
        Domain::Binary,
        Bounds::new(0.0, 2.0),
    ));

    let first = model.validate();
    let second = model.validate();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(model.state(), ModelState::Building);
}

#[test]
fn test_validate_reports_every_violation() {
    let (mut model, x1, _) = covering_model();
    // Bypass the builder checks to plant several problems at once.
    model.variables.push(Variable::continuous("cover"));
    model.constraints.push(crate::types::Constraint::new(
        "ghost".to_string(),
        Expr::term(VariableId::new(42), 1.0).le_scalar(1.0),
    ));
    model.objective.expr = Expr::term(x1, f64::INFINITY);

    let codes: Vec<&str> = model.validate().iter().map(ModelError::code).collect();
    assert_eq!(
        codes,
        vec!["NAME_DUPLICATE", "VARIABLE_UNKNOWN", "COEFFICIENT_INVALID"]
    );
}

#[test]
fn test_seal_moves_to_validated_and_locks() {
    let (mut model, x1, _) = covering_model();
    model.seal().unwrap();
    assert_eq!(model.state(), ModelState::Validated);
    model.seal().unwrap();

    let err = model.minimize(Expr::var(x1)).unwrap_err();
    assert_eq!(err.code(), "MODEL_LOCKED");
}

#[test]
fn test_seal_rejects_invalid_model() {
    let (mut model, _, _) = covering_model();
    model.variables.push(Variable::continuous("x2"));

    let violations = model.seal().unwrap_err();
    assert_eq!(violations.len(), 1);
    assert_eq!(model.state(), ModelState::Building);
}

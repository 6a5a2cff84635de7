//! Multi-year personnel planning.
//!
//! Staff at each level evolves naturally from one year to the next through
//! an evolution matrix, is topped up by recruitment and reduced by layoffs,
//! and must cover the yearly needs. The plan minimizes salaries plus
//! recruitment and layoff costs.
//!
//! Variables are named `R_{year}_{level}`, `L_{year}_{level}` and
//! `S_{year}_{level}` with years and levels counted from 1; `S_0_{level}` is
//! the fixed initial staff.
//!
//! With integer head counts the natural evolution keeps whole people:
//! `N_{year}_{level}` is the integer part of the evolved staff, and the
//! balance reads `S = N + R - L`. Forcing `S - R + L` to equal the
//! fractional evolution exactly would only admit staff levels whose shares
//! happen to be whole (multiples of 100 at level 1 for the standard data).
//! Every plan of that stricter model is still a plan here.

use lpkit_core::{Domain, Expr, Model, Reporter, Variable, VariableId};
use serde::{Deserialize, Serialize};

use crate::Exercise;
use crate::error::ExerciseError;

const EXERCISE: &str = "personnel";

/// How far below the evolved staff the retained count may fall. Just under
/// one person, so an integer count is the floor.
const RETENTION_BAND: f64 = 1.0 - 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonnelData {
    pub years: usize,
    /// Staff per level before the first year.
    pub initial_staff: Vec<f64>,
    /// `evolution[to][from]`: share of last year's `from` staff found at
    /// level `to` without intervention.
    pub evolution: Vec<Vec<f64>>,
    /// `needs[year - 1][level - 1]`: minimum staff.
    pub needs: Vec<Vec<f64>>,
    pub salary_cost: Vec<f64>,
    /// Per-head recruitment cost; `None` where a level does not recruit.
    pub recruitment_cost: Vec<Option<f64>>,
    /// For each level, the level whose recruits enter its balance. The
    /// exercise counts level-2 recruits in the level-1 balance too.
    pub recruit_source: Vec<usize>,
    pub layoff_cost: Vec<f64>,
    /// Upper bound on layoffs summed over every year and level.
    #[serde(default)]
    pub layoff_cap: Option<f64>,
    /// Integer head counts when true, a continuous relaxation otherwise.
    #[serde(default = "default_integral")]
    pub integral: bool,
}

fn default_integral() -> bool {
    true
}

impl PersonnelData {
    /// Three years, three levels, as stated in the exercise.
    pub fn standard() -> Self {
        Self {
            years: 3,
            initial_staff: vec![200.0, 500.0, 3000.0],
            evolution: vec![
                vec![0.95, 0.0, 0.0],
                vec![0.02, 0.9, 0.0],
                vec![0.0, 0.01, 0.8],
            ],
            needs: vec![
                vec![150.0, 700.0, 2000.0],
                vec![200.0, 500.0, 3000.0],
                vec![200.0, 500.0, 3000.0],
            ],
            salary_cost: vec![100.0, 70.0, 50.0],
            recruitment_cost: vec![None, Some(10.0), Some(5.0)],
            recruit_source: vec![2, 2, 3],
            layoff_cost: vec![50.0, 35.0, 25.0],
            layoff_cap: None,
            integral: true,
        }
    }

    pub fn with_layoff_cap(mut self, cap: f64) -> Self {
        self.layoff_cap = Some(cap);
        self
    }

    pub fn relaxed(mut self) -> Self {
        self.integral = false;
        self
    }

    fn levels(&self) -> usize {
        self.initial_staff.len()
    }

    /// Upper bound on every integer head count: all initial staff plus every
    /// yearly need. It keeps branch and bound inside a finite box.
    pub fn head_count_cap(&self) -> f64 {
        self.initial_staff.iter().sum::<f64>() + self.needs.iter().flatten().sum::<f64>()
    }

    fn check(&self) -> Result<(), ExerciseError> {
        let levels = self.levels();
        if levels == 0 || self.years == 0 {
            return Err(ExerciseError::invalid(
                EXERCISE,
                "at least one year and one level are required",
            ));
        }
        if self.evolution.len() != levels || self.evolution.iter().any(|row| row.len() != levels) {
            return Err(ExerciseError::invalid(
                EXERCISE,
                format!("evolution matrix must be {levels}x{levels}"),
            ));
        }
        if self.needs.len() != self.years || self.needs.iter().any(|row| row.len() != levels) {
            return Err(ExerciseError::invalid(
                EXERCISE,
                format!("needs must be {}x{levels}", self.years),
            ));
        }
        let per_level = [
            ("salary_cost", self.salary_cost.len()),
            ("recruitment_cost", self.recruitment_cost.len()),
            ("recruit_source", self.recruit_source.len()),
            ("layoff_cost", self.layoff_cost.len()),
        ];
        if let Some((field, len)) = per_level.iter().find(|(_, len)| *len != levels) {
            return Err(ExerciseError::invalid(
                EXERCISE,
                format!("{field} has {len} entries for {levels} levels"),
            ));
        }
        for (level, &source) in self.recruit_source.iter().enumerate() {
            let recruits = source
                .checked_sub(1)
                .and_then(|index| self.recruitment_cost.get(index))
                .is_some_and(Option::is_some);
            if !recruits {
                return Err(ExerciseError::invalid(
                    EXERCISE,
                    format!("level {} draws recruits from level {source}, which does not recruit", level + 1),
                ));
            }
        }
        Ok(())
    }
}

/// Variables of a built personnel model, indexed `[year - 1][level - 1]`.
/// Recruitment entries are `None` for levels that do not recruit.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonnelVariables {
    pub recruitment: Vec<Vec<Option<VariableId>>>,
    pub layoffs: Vec<Vec<VariableId>>,
    pub staff: Vec<Vec<VariableId>>,
    pub initial_staff: Vec<VariableId>,
    /// Whole staff kept by the natural evolution; empty for a relaxed plan.
    pub retained: Vec<Vec<VariableId>>,
}

/// Build the planning model and return its variable layout alongside.
pub fn build_with_variables(
    data: &PersonnelData,
) -> Result<(Exercise, PersonnelVariables), ExerciseError> {
    data.check()?;
    let levels = data.levels();
    let domain = if data.integral {
        Domain::Integer
    } else {
        Domain::Continuous
    };
    let cap = if data.integral {
        data.head_count_cap()
    } else {
        f64::INFINITY
    };
    let counted = |name: String| Variable::new(name, domain, 0.0, cap);

    let mut model = Model::named("personnel_planning");

    let mut recruitment = Vec::with_capacity(data.years);
    for year in 1..=data.years {
        let mut row = Vec::with_capacity(levels);
        for (level, cost) in data.recruitment_cost.iter().enumerate() {
            row.push(match cost {
                Some(_) => Some(model.add_variable(counted(format!("R_{year}_{}", level + 1))?)?),
                None => None,
            });
        }
        recruitment.push(row);
    }

    let mut layoffs = Vec::with_capacity(data.years);
    for year in 1..=data.years {
        let row = (1..=levels)
            .map(|level| model.add_variable(counted(format!("L_{year}_{level}"))?))
            .collect::<Result<Vec<_>, _>>()?;
        layoffs.push(row);
    }

    let mut staff = Vec::with_capacity(data.years);
    for year in 1..=data.years {
        let row = (1..=levels)
            .map(|level| model.add_variable(counted(format!("S_{year}_{level}"))?))
            .collect::<Result<Vec<_>, _>>()?;
        staff.push(row);
    }

    let mut initial_staff = Vec::with_capacity(levels);
    for (level, &count) in data.initial_staff.iter().enumerate() {
        let variable = Variable::new(format!("S_0_{}", level + 1), domain, count, count)?;
        initial_staff.push(model.add_variable(variable)?);
    }

    let mut retained = Vec::new();
    if data.integral {
        for year in 1..=data.years {
            let row = (1..=levels)
                .map(|level| model.add_variable(counted(format!("N_{year}_{level}"))?))
                .collect::<Result<Vec<_>, _>>()?;
            retained.push(row);
        }
    }

    let mut cost = Expr::zero();
    for year in 0..data.years {
        for level in 0..levels {
            cost.add_term(staff[year][level], data.salary_cost[level]);
            if let (Some(var), Some(price)) =
                (recruitment[year][level], data.recruitment_cost[level])
            {
                cost.add_term(var, price);
            }
            cost.add_term(layoffs[year][level], data.layoff_cost[level]);
        }
    }
    model.minimize(cost)?;
    model.set_objective_name("total_cost")?;

    for year in 0..data.years {
        let previous = if year == 0 {
            &initial_staff
        } else {
            &staff[year - 1]
        };
        for level in 0..levels {
            let mut evolved = Expr::zero();
            for (from, &share) in data.evolution[level].iter().enumerate() {
                evolved.add_term(previous[from], share);
            }
            // S = evolved + R - L, or S = N + R - L with N = floor(evolved)
            let mut balance = Expr::var(staff[year][level]);
            match retained.get(year) {
                Some(row) => {
                    let kept = row[level];
                    balance.add_term(kept, -1.0);
                    let rounding = Expr::var(kept) - evolved;
                    model.add_constraint(
                        format!("retain_max_{}_{}", year + 1, level + 1),
                        rounding.le_scalar(0.0),
                    )?;
                    model.add_constraint(
                        format!("retain_min_{}_{}", year + 1, level + 1),
                        rounding.ge_scalar(-RETENTION_BAND),
                    )?;
                }
                None => balance -= evolved,
            }
            if let Some(recruits) = recruitment[year][data.recruit_source[level] - 1] {
                balance.add_term(recruits, -1.0);
            }
            balance.add_term(layoffs[year][level], 1.0);
            model.add_constraint(
                format!("balance_{}_{}", year + 1, level + 1),
                balance.eq_scalar(0.0),
            )?;
        }
    }

    for (year, needs) in data.needs.iter().enumerate() {
        for (level, &need) in needs.iter().enumerate() {
            model.add_constraint(
                format!("need_{}_{}", year + 1, level + 1),
                Expr::var(staff[year][level]).ge_scalar(need),
            )?;
        }
    }

    if let Some(cap) = data.layoff_cap {
        let total: Expr = layoffs.iter().flatten().map(|&id| Expr::var(id)).sum();
        model.add_constraint("layoff_cap", total.le_scalar(cap))?;
    }

    tracing::debug!(
        component = "exercise",
        operation = "build",
        status = "success",
        exercise = EXERCISE,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        integral = data.integral,
        layoff_cap = ?data.layoff_cap,
        "Built personnel planning model"
    );

    let mut reporter = Reporter::new()
        .with_section("Recruitment", recruitment.iter().flatten().flatten().copied())
        .with_section("Layoffs", layoffs.iter().flatten().copied())
        .with_section("Staff", staff.iter().flatten().copied());
    if !retained.is_empty() {
        reporter = reporter.with_section("Retained", retained.iter().flatten().copied());
    }
    let variables = PersonnelVariables {
        recruitment,
        layoffs,
        staff,
        initial_staff,
        retained,
    };
    Ok((Exercise { model, reporter }, variables))
}

/// Build the planning model.
pub fn build(data: &PersonnelData) -> Result<Exercise, ExerciseError> {
    build_with_variables(data).map(|(exercise, _)| exercise)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use lpkit_core::ComparisonSense;

    #[test]
    fn standard_model_shape() {
        let (exercise, vars) = build_with_variables(&PersonnelData::standard()).unwrap();
        let model = &exercise.model;
        // 6 recruitment + 9 layoff + 9 staff + 3 initial + 9 retained
        assert_eq!(model.num_variables(), 36);
        // 9 balance + 18 retention + 9 need
        assert_eq!(model.num_constraints(), 36);
        assert!(vars.recruitment.iter().all(|year| year[0].is_none()));
        assert!(model.variable_id("R_1_1").is_none());
        assert!(model.variable_id("R_3_3").is_some());
        assert!(model.variable_id("N_3_3").is_some());
        assert_eq!(model.objective().label(), "total_cost");
        assert_eq!(exercise.reporter.sections().len(), 4);
    }

    #[test]
    fn relaxed_model_has_no_retained_counts() {
        let data = PersonnelData::standard().relaxed();
        let (exercise, vars) = build_with_variables(&data).unwrap();
        assert_eq!(exercise.model.num_variables(), 27);
        assert_eq!(exercise.model.num_constraints(), 18);
        assert!(vars.retained.is_empty());
        assert_eq!(exercise.reporter.sections().len(), 3);
        let staff = exercise.model.variable(vars.staff[0][0]).unwrap();
        assert_eq!(staff.bounds().upper, f64::INFINITY);
    }

    #[test]
    fn integer_head_counts_are_capped() {
        let data = PersonnelData::standard();
        // 3700 initial + 2850 + 3700 + 3700 needed
        assert_eq!(data.head_count_cap(), 13950.0);
        let (exercise, vars) = build_with_variables(&data).unwrap();
        for id in vars.staff.iter().chain(&vars.layoffs).chain(&vars.retained).flatten() {
            let variable = exercise.model.variable(*id).unwrap();
            assert_eq!(variable.bounds().upper, 13950.0, "{}", variable.name());
        }
    }

    #[test]
    fn initial_staff_is_fixed() {
        let (exercise, vars) = build_with_variables(&PersonnelData::standard()).unwrap();
        let senior = exercise.model.variable(vars.initial_staff[2]).unwrap();
        assert_eq!(senior.name(), "S_0_3");
        assert!(senior.bounds().is_fixed());
        assert_eq!(senior.bounds().lower, 3000.0);
        assert_eq!(senior.domain(), Domain::Integer);
    }

    #[test]
    fn junior_balance_uses_level_two_recruits() {
        let data = PersonnelData::standard().relaxed();
        let (exercise, vars) = build_with_variables(&data).unwrap();
        let model = &exercise.model;
        let id = model.constraint_id("balance_1_1").unwrap();
        let balance = model.constraint(id).unwrap();
        assert_eq!(balance.sense(), ComparisonSense::Equal);
        let canonical = balance.canonical();
        assert_eq!(canonical.coefficient(vars.staff[0][0]), 1.0);
        assert_eq!(canonical.coefficient(vars.initial_staff[0]), -0.95);
        assert_eq!(canonical.coefficient(vars.recruitment[0][1].unwrap()), -1.0);
        assert_eq!(canonical.coefficient(vars.layoffs[0][0]), 1.0);
        // zero shares are not stored
        assert_eq!(canonical.num_terms(), 4);
    }

    #[test]
    fn integer_balance_goes_through_retained_staff() {
        let (exercise, vars) = build_with_variables(&PersonnelData::standard()).unwrap();
        let model = &exercise.model;
        let kept = vars.retained[1][1];

        let balance = model
            .constraint(model.constraint_id("balance_2_2").unwrap())
            .unwrap()
            .canonical();
        assert_eq!(balance.coefficient(kept), -1.0);
        assert_eq!(balance.coefficient(vars.staff[0][1]), 0.0);

        let upper = model
            .constraint(model.constraint_id("retain_max_2_2").unwrap())
            .unwrap();
        assert_eq!(upper.sense(), ComparisonSense::LessEqual);
        assert_eq!(upper.canonical().coefficient(kept), 1.0);
        assert_eq!(upper.canonical().coefficient(vars.staff[0][0]), -0.02);
        assert_eq!(upper.canonical().coefficient(vars.staff[0][1]), -0.9);

        let lower = model
            .constraint(model.constraint_id("retain_min_2_2").unwrap())
            .unwrap();
        assert_eq!(lower.sense(), ComparisonSense::GreaterEqual);
        assert_eq!(lower.rhs(), -RETENTION_BAND);
    }

    #[test]
    fn layoff_cap_adds_one_row() {
        let data = PersonnelData::standard().with_layoff_cap(500.0).relaxed();
        let exercise = build(&data).unwrap();
        let model = &exercise.model;
        assert_eq!(model.num_constraints(), 19);
        let cap = model.constraint(model.constraint_id("layoff_cap").unwrap()).unwrap();
        assert_eq!(cap.terms().count(), 9);
        assert_eq!(cap.rhs(), 500.0);
        assert_eq!(model.variables()[0].domain(), Domain::Continuous);
    }

    #[test]
    fn mismatched_tables_are_rejected() {
        let mut data = PersonnelData::standard();
        data.needs.pop();
        let err = build(&data).unwrap_err();
        assert_eq!(err.code(), "EXERCISE_INVALID_DATA");

        let mut data = PersonnelData::standard();
        data.recruit_source[0] = 1;
        let err = build(&data).unwrap_err();
        assert!(err.to_string().contains("does not recruit"));
    }
}

//! Plain-text solve reports.
//!
//! A report lists the model size, the solve time when known, the status, the
//! objective value and every variable with its value. Output depends only on
//! the model and the solution, so identical inputs give identical text.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::io;

use lpkit_expr::ids::VariableId;

use crate::model::{Model, format_ascii_number};
use crate::solver::Solution;

const RULE_WIDTH: usize = 40;
const DEFAULT_HEADING: &str = "Variables' values";
const REMAINDER_HEADING: &str = "Other variables";

/// A heading followed by a group of variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub heading: String,
    pub variables: Vec<VariableId>,
}

impl ReportSection {
    pub fn new(heading: impl Into<String>, variables: impl IntoIterator<Item = VariableId>) -> Self {
        Self {
            heading: heading.into(),
            variables: variables.into_iter().collect(),
        }
    }
}

/// Renders a model and its solution as text.
///
/// Without sections every variable is listed under one heading in
/// declaration order. With sections, each section lists its variables in
/// declaration order and variables no section covers follow at the end.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    sections: Vec<ReportSection>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(
        mut self,
        heading: impl Into<String>,
        variables: impl IntoIterator<Item = VariableId>,
    ) -> Self {
        self.sections.push(ReportSection::new(heading, variables));
        self
    }

    pub fn with_sections(mut self, sections: impl IntoIterator<Item = ReportSection>) -> Self {
        self.sections.extend(sections);
        self
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    /// Build the report text.
    pub fn report(&self, model: &Model, solution: &Solution) -> String {
        let mut out = String::new();

        push_heading(&mut out, "Stats");
        let _ = writeln!(out, "Number variables: {}", model.num_variables());
        let _ = writeln!(out, "Number constraints: {}", model.num_constraints());
        out.push('\n');

        if let Some(seconds) = solution.solve_time_seconds() {
            let _ = writeln!(out, "Time:");
            let _ = writeln!(out, "- (real) {seconds:.6}");
            out.push('\n');
        }

        let _ = writeln!(out, "Solve status: {}", solution.status());
        let _ = writeln!(
            out,
            "Objective value: {}",
            format_optional(solution.objective_value())
        );

        if self.sections.is_empty() {
            let all: Vec<VariableId> = model.variable_entries().map(|(id, _)| id).collect();
            push_variable_block(&mut out, model, solution, DEFAULT_HEADING, &all);
            return out;
        }

        let mut covered = HashSet::new();
        for section in &self.sections {
            let mut ids: Vec<VariableId> = section
                .variables
                .iter()
                .copied()
                .filter(|id| id.index() < model.num_variables())
                .collect();
            ids.sort_unstable();
            ids.dedup();
            covered.extend(ids.iter().copied());
            push_variable_block(&mut out, model, solution, &section.heading, &ids);
        }

        let rest: Vec<VariableId> = model
            .variable_entries()
            .map(|(id, _)| id)
            .filter(|id| !covered.contains(id))
            .collect();
        if !rest.is_empty() {
            push_variable_block(&mut out, model, solution, REMAINDER_HEADING, &rest);
        }
        out
    }

    /// Write the report to a sink such as stdout or a file.
    pub fn write_to<W: io::Write>(
        &self,
        model: &Model,
        solution: &Solution,
        sink: &mut W,
    ) -> io::Result<()> {
        sink.write_all(self.report(model, solution).as_bytes())?;
        sink.flush()
    }
}

fn push_heading(out: &mut String, heading: &str) {
    let rule = "-".repeat(RULE_WIDTH);
    let _ = write!(out, "\n{rule}\n{heading}\n{rule}\n\n");
}

fn push_variable_block(
    out: &mut String,
    model: &Model,
    solution: &Solution,
    heading: &str,
    ids: &[VariableId],
) {
    push_heading(out, heading);
    for id in ids {
        let Ok(variable) = model.variable(*id) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{}\t\t{}",
            variable.name(),
            format_optional(solution.value(*id))
        );
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "None".to_string(), format_ascii_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variable;

    fn two_variable_model() -> (Model, VariableId, VariableId) {
        let mut model = Model::new();
        let x1 = model.add_variable(Variable::continuous("x1")).unwrap();
        let x2 = model.add_variable(Variable::continuous("x2")).unwrap();
        model
            .add_constraint("cover", (3.0 * x1 + 8.0 * x2).ge_scalar(24.0))
            .unwrap();
        (model, x1, x2)
    }

    #[test]
    fn report_lists_stats_and_values_in_declaration_order() {
        let (model, _, _) = two_variable_model();
        let solution = Solution::optimal(15.0, vec![0.0, 3.0]).with_solve_time(0.25);

        let text = Reporter::new().report(&model, &solution);
        assert!(text.contains("Number variables: 2"));
        assert!(text.contains("Number constraints: 1"));
        assert!(text.contains("- (real) 0.250000"));
        assert!(text.contains("Solve status: Optimal"));
        assert!(text.contains("Objective value: 15"));
        assert!(text.contains("Variables' values"));
        let x1_at = text.find("x1\t\t0").unwrap();
        let x2_at = text.find("x2\t\t3").unwrap();
        assert!(x1_at < x2_at);
    }

    #[test]
    fn report_without_solution_values_prints_none() {
        let (model, _, _) = two_variable_model();
        let text = Reporter::new().report(&model, &Solution::infeasible());
        assert!(text.contains("Solve status: Infeasible"));
        assert!(text.contains("Objective value: None"));
        assert!(text.contains("x1\t\tNone"));
        assert!(!text.contains("Time:"));
    }

    #[test]
    fn report_is_deterministic() {
        let (model, x1, _) = two_variable_model();
        let solution = Solution::optimal(15.0, vec![0.0, 3.0]);
        let reporter = Reporter::new().with_section("First", [x1]);
        assert_eq!(
            reporter.report(&model, &solution),
            reporter.report(&model, &solution)
        );
    }

    #[test]
    fn sections_group_variables_and_leave_rest_last() {
        let (model, _, x2) = two_variable_model();
        let solution = Solution::optimal(15.0, vec![0.0, 3.0]);

        let text = Reporter::new()
            .with_section("Second only", [x2])
            .report(&model, &solution);
        let section_at = text.find("Second only").unwrap();
        let rest_at = text.find("Other variables").unwrap();
        assert!(section_at < rest_at);
        assert!(text.find("x2\t\t3").unwrap() < rest_at);
        assert!(text.find("x1\t\t0").unwrap() > rest_at);
    }

    #[test]
    fn write_to_matches_report() {
        let (model, _, _) = two_variable_model();
        let solution = Solution::optimal(15.0, vec![0.0, 3.0]);
        let reporter = Reporter::new();

        let mut sink = Vec::new();
        reporter.write_to(&model, &solution, &mut sink).unwrap();
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            reporter.report(&model, &solution)
        );
    }
}

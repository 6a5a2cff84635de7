//! Human-readable ASCII model formatting.

use std::fmt::Write as _;

use lpkit_expr::expr::Expr;

use crate::model::Model;
use crate::types::{Bounds, Domain, Sense};

const PREVIEW_CONSTRAINTS: usize = 20;
const PREVIEW_TERMS: usize = 30;
const PREVIEW_DOMAIN_ITEMS: usize = 20;

/// Formatting controls for pretty-print output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyPrintOptions {
    /// Maximum number of constraints to render.
    pub constraints: Option<usize>,
    /// Maximum number of terms to render per linear expression.
    pub terms: Option<usize>,
    /// Maximum number of items in the binary, integer and bounds sections.
    pub domain_items: Option<usize>,
}

impl PrettyPrintOptions {
    /// Preview mode used by terse displays.
    pub fn preview() -> Self {
        Self {
            constraints: Some(PREVIEW_CONSTRAINTS),
            terms: Some(PREVIEW_TERMS),
            domain_items: Some(PREVIEW_DOMAIN_ITEMS),
        }
    }

    /// Full mode with no truncation.
    pub fn full() -> Self {
        Self {
            constraints: None,
            terms: None,
            domain_items: None,
        }
    }
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        Self::preview()
    }
}

struct ConstraintRenderLine {
    lhs: String,
    op: &'static str,
    rhs: String,
}

impl Model {
    /// Render the model to ASCII.
    ///
    /// ```text
    /// Max 40 A + 35 B
    ///
    /// s.t.
    ///  Mixing: 2 A + 4 B <= 50
    ///  Packing: 3 A + 2 B <= 30
    ///
    /// Bounds:
    ///  0 <= A
    ///  0 <= B
    /// ```
    pub fn format_ascii(&self, options: PrettyPrintOptions) -> String {
        let mut lines = Vec::new();
        lines.push(self.render_objective_line(options.terms));
        lines.push(String::new());
        lines.push("s.t.".to_string());

        let total_constraints = self.num_constraints();
        let constraint_limit = options
            .constraints
            .unwrap_or(total_constraints)
            .min(total_constraints);

        if constraint_limit == 0 {
            lines.push(" (none)".to_string());
        } else {
            let rendered_constraints: Vec<ConstraintRenderLine> = self.constraints
                [..constraint_limit]
                .iter()
                .map(|constraint| ConstraintRenderLine {
                    lhs: format!(
                        "{}: {}",
                        constraint.name(),
                        self.format_linear_expression(constraint.canonical(), options.terms)
                    ),
                    op: constraint.sense().symbol(),
                    rhs: format_ascii_number(constraint.rhs()),
                })
                .collect();

            let lhs_width = rendered_constraints
                .iter()
                .map(|entry| entry.lhs.len())
                .max()
                .unwrap_or(0);
            for entry in rendered_constraints {
                lines.push(format!(
                    " {:lhs_width$} {:>2} {}",
                    entry.lhs,
                    entry.op,
                    entry.rhs,
                    lhs_width = lhs_width
                ));
            }
        }

        if constraint_limit < total_constraints {
            lines.push(format!(
                " ... ({} more constraints)",
                total_constraints - constraint_limit
            ));
        }

        let mut binary_vars = Vec::new();
        let mut integer_vars = Vec::new();
        let mut bounds_lines = Vec::new();
        for var in &self.variables {
            match var.domain() {
                Domain::Binary if var.bounds() == Domain::Binary.default_bounds() => {
                    binary_vars.push(var.name());
                    continue;
                }
                Domain::Binary => binary_vars.push(var.name()),
                Domain::Integer => integer_vars.push(var.name()),
                Domain::Continuous => {}
            }
            if let Some(line) = format_variable_bounds_line(var.name(), var.bounds()) {
                bounds_lines.push(line);
            }
        }

        let has_domains =
            !binary_vars.is_empty() || !integer_vars.is_empty() || !bounds_lines.is_empty();
        if has_domains {
            lines.push(String::new());
        }
        if !binary_vars.is_empty() {
            lines.push(format_variable_group_line(
                "Binary",
                &binary_vars,
                options.domain_items,
            ));
        }
        if !integer_vars.is_empty() {
            lines.push(format_variable_group_line(
                "Integer",
                &integer_vars,
                options.domain_items,
            ));
        }
        if !bounds_lines.is_empty() {
            lines.push("Bounds:".to_string());
            let bounds_limit = options
                .domain_items
                .unwrap_or(bounds_lines.len())
                .min(bounds_lines.len());
            for bound_line in bounds_lines.iter().take(bounds_limit) {
                lines.push(format!(" {bound_line}"));
            }
            if bounds_limit < bounds_lines.len() {
                lines.push(format!(
                    " ... ({} more bounds)",
                    bounds_lines.len() - bounds_limit
                ));
            }
        }

        lines.join("\n")
    }

    fn render_objective_line(&self, max_terms: Option<usize>) -> String {
        let objective = self.objective();
        let sense_label = match objective.sense {
            Sense::Minimize => "Min",
            Sense::Maximize => "Max",
        };
        let mut expr = self.format_linear_expression(&objective.expr, max_terms);
        let constant = objective.expr.constant();
        if constant != 0.0 && !objective.expr.is_constant() {
            let sign = if constant < 0.0 { '-' } else { '+' };
            let _ = write!(expr, " {sign} {}", format_ascii_number(constant.abs()));
        } else if objective.expr.is_constant() {
            expr = format_ascii_number(constant);
        }
        match &objective.name {
            Some(name) => format!("{sense_label} {name}: {expr}"),
            None => format!("{sense_label} {expr}"),
        }
    }

    /// Variable part of an expression; constants are rendered by callers.
    fn format_linear_expression(&self, expr: &Expr, max_terms: Option<usize>) -> String {
        let total_terms = expr.num_terms();
        if total_terms == 0 {
            return "0".to_string();
        }

        let term_limit = max_terms.unwrap_or(total_terms).min(total_terms);
        let mut rendered = String::new();

        for (idx, (var_id, coeff)) in expr.terms().take(term_limit).enumerate() {
            let negative = coeff < 0.0;
            let abs_coeff = coeff.abs();
            let label = self.describe_variable(var_id);
            let term_body = if abs_coeff == 1.0 {
                label
            } else {
                format!("{} {label}", format_ascii_number(abs_coeff))
            };

            if idx == 0 {
                if negative {
                    rendered.push('-');
                }
                rendered.push_str(&term_body);
            } else if negative {
                let _ = write!(rendered, " - {term_body}");
            } else {
                let _ = write!(rendered, " + {term_body}");
            }
        }

        if term_limit < total_terms {
            let _ = write!(
                rendered,
                " + ... ({} more terms)",
                total_terms - term_limit
            );
        }

        rendered
    }
}

/// Shared numeric formatter for ASCII output.
pub fn format_ascii_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            "-inf".to_string()
        } else {
            "inf".to_string()
        };
    }

    let mut rendered = format!("{value:.12}");
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    if rendered == "-0" {
        "0".to_string()
    } else {
        rendered
    }
}

fn format_variable_group_line(label: &str, variables: &[&str], max_items: Option<usize>) -> String {
    let limit = max_items.unwrap_or(variables.len()).min(variables.len());
    let mut line = String::new();
    let _ = write!(line, "{label}: ");
    if limit > 0 {
        line.push_str(&variables[..limit].join(", "));
    }
    if limit < variables.len() {
        if limit > 0 {
            line.push_str(", ");
        }
        let _ = write!(line, "... ({} more)", variables.len() - limit);
    }
    line
}

fn format_variable_bounds_line(label: &str, bounds: Bounds) -> Option<String> {
    let lower_finite = bounds.lower.is_finite();
    let upper_finite = bounds.upper.is_finite();
    if !lower_finite && !upper_finite {
        return None;
    }

    if bounds.is_fixed() {
        return Some(format!("{label} = {}", format_ascii_number(bounds.lower)));
    }
    if lower_finite && upper_finite {
        return Some(format!(
            "{} <= {label} <= {}",
            format_ascii_number(bounds.lower),
            format_ascii_number(bounds.upper)
        ));
    }
    if lower_finite {
        return Some(format!("{} <= {label}", format_ascii_number(bounds.lower)));
    }
    Some(format!("{label} <= {}", format_ascii_number(bounds.upper)))
}

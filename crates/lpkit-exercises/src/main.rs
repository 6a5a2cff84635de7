mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lpkit_core::{
    Model, ModelDocument, PrettyPrintOptions, Reporter, Solution, SolverAdapter, SolverConfig,
};
use lpkit_exercises::{CATALOG, Exercise, ExerciseOptions, build_exercise};
use lpkit_solvers::{BoxedSolver, available_solvers, default_solver, solver_by_name};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lpkit",
    author,
    version,
    about = "Build, solve and report small linear programs"
)]
struct Cli {
    /// Log filter directive; overrides LPKIT_TRACE
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in exercises and compiled-in solvers
    List(ListArgs),
    /// Build and solve a built-in exercise
    Run(RunArgs),
    /// Solve a model read from a JSON document
    Solve(SolveFileArgs),
    /// Write a built-in exercise as a JSON model document
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Output format for stdout
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Exercise name (see `lpkit list`)
    exercise: String,

    /// Cap on total layoffs (personnel exercise)
    #[arg(long)]
    layoff_cap: Option<f64>,

    /// Solve the continuous relaxation
    #[arg(long)]
    relaxed: bool,

    #[command(flatten)]
    solve: SolveArgs,
}

#[derive(Args, Debug)]
struct SolveFileArgs {
    /// JSON model document
    #[arg(long)]
    model: PathBuf,

    #[command(flatten)]
    solve: SolveArgs,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Exercise name (see `lpkit list`)
    exercise: String,

    /// Destination file; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Solver backend; the preferred compiled-in one when omitted
    #[arg(long)]
    solver: Option<String>,

    /// Time limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Relative optimality gap for integer models
    #[arg(long)]
    mip_gap: Option<f64>,

    /// Solver threads
    #[arg(long)]
    threads: Option<u32>,

    /// Disable presolve
    #[arg(long)]
    no_presolve: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the model before the report
    #[arg(long)]
    show_model: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl SolveArgs {
    fn config(&self) -> SolverConfig {
        let mut config = SolverConfig::new();
        if let Some(limit) = self.time_limit {
            config = config.with_time_limit(limit);
        }
        if let Some(gap) = self.mip_gap {
            config = config.with_mip_gap(gap);
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        if self.no_presolve {
            config = config.with_presolve(false);
        }
        config
    }

    fn solver(&self) -> Result<BoxedSolver, Box<dyn std::error::Error>> {
        let solver = match &self.solver {
            Some(name) => solver_by_name(name)?,
            None => default_solver()?,
        };
        Ok(solver)
    }
}

#[derive(Debug, Serialize)]
struct CatalogEntry {
    name: &'static str,
    summary: &'static str,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    exercises: Vec<CatalogEntry>,
    solvers: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct VariableValue<'a> {
    name: &'a str,
    value: Option<f64>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    model: &'a str,
    solver: &'a str,
    variables: usize,
    constraints: usize,
    #[serde(flatten)]
    solution: &'a Solution,
    named_values: Vec<VariableValue<'a>>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.log.as_deref())?;
    match cli.command {
        Command::List(args) => list_command(args),
        Command::Run(args) => run_command(args),
        Command::Solve(args) => solve_file_command(args),
        Command::Export(args) => export_command(args),
    }
}

fn list_command(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => {
            for info in CATALOG {
                writeln!(stdout, "{:<22}{}", info.name, info.summary)?;
            }
            writeln!(stdout)?;
            writeln!(stdout, "solvers: {}", available_solvers().join(", "))?;
        }
        OutputFormat::Json => {
            let output = ListOutput {
                exercises: CATALOG
                    .iter()
                    .map(|info| CatalogEntry {
                        name: info.name,
                        summary: info.summary,
                    })
                    .collect(),
                solvers: available_solvers(),
            };
            writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }
    Ok(())
}

fn run_command(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExerciseOptions {
        layoff_cap: args.layoff_cap,
        relaxed: args.relaxed,
    };
    let Exercise { model, reporter } = build_exercise(&args.exercise, &options)?;
    solve_and_report(model, &reporter, &args.solve)
}

fn solve_file_command(args: SolveFileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(&args.model)
        .map_err(|err| format!("Failed to read {}: {err}", args.model.display()))?;
    let document = ModelDocument::from_json(&json)?;
    let model = Model::from_document(&document)?;
    solve_and_report(model, &Reporter::new(), &args.solve)
}

fn export_command(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let exercise = build_exercise(&args.exercise, &ExerciseOptions::default())?;
    let json = exercise.model.to_document().to_json_pretty()?;
    let mut sink = open_sink(args.output.as_ref())?;
    writeln!(sink, "{json}")?;
    sink.flush()?;
    Ok(())
}

fn solve_and_report(
    mut model: Model,
    reporter: &Reporter,
    args: &SolveArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut solver = args.solver()?;
    let config = args.config();
    let mut sink = open_sink(args.output.as_ref())?;

    if args.show_model {
        writeln!(sink, "{}", model.format_ascii(PrettyPrintOptions::default()))?;
    }

    let solution = model.solve_with(&mut solver, &config)?;

    match args.format {
        OutputFormat::Text => reporter.write_to(&model, &solution, &mut sink)?,
        OutputFormat::Json => {
            let report = json_report(&model, solver.name(), &solution);
            writeln!(sink, "{}", serde_json::to_string_pretty(&report)?)?;
            sink.flush()?;
        }
    }
    Ok(())
}

fn json_report<'a>(model: &'a Model, solver: &'a str, solution: &'a Solution) -> JsonReport<'a> {
    JsonReport {
        model: model.name(),
        solver,
        variables: model.num_variables(),
        constraints: model.num_constraints(),
        solution,
        named_values: model
            .variable_entries()
            .map(|(id, var)| VariableValue {
                name: var.name(),
                value: solution.value(id),
            })
            .collect(),
    }
}

fn open_sink(path: Option<&PathBuf>) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| format!("Failed to create {}: {err}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_map_onto_solver_config() {
        let cli = Cli::try_parse_from([
            "lpkit",
            "run",
            "warehouse",
            "--time-limit",
            "5",
            "--mip-gap",
            "0.01",
            "--no-presolve",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.exercise, "warehouse");
        assert_eq!(args.solve.format, OutputFormat::Json);
        let config = args.solve.config();
        assert_eq!(config.time_limit, Some(5.0));
        assert_eq!(config.mip_gap, Some(0.01));
        assert_eq!(config.presolve, Some(false));
        assert_eq!(config.threads, None);
    }

    #[test]
    fn default_solve_args_leave_config_empty() {
        let cli = Cli::try_parse_from(["lpkit", "run", "tp1-base"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.solve.config().is_empty());
        assert!(!args.solve.show_model);
        assert!(args.solve.output.is_none());
    }

    #[test]
    fn solve_requires_a_model_path() {
        assert!(Cli::try_parse_from(["lpkit", "solve"]).is_err());
        let cli = Cli::try_parse_from(["lpkit", "solve", "--model", "m.json", "--solver", "microlp"])
            .unwrap();
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.model, PathBuf::from("m.json"));
        assert_eq!(args.solve.solver.as_deref(), Some("microlp"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["lpkit", "list", "--format", "xml"]).is_err());
    }

    #[cfg(feature = "microlp")]
    #[test]
    fn json_report_names_every_variable() {
        let Exercise { mut model, .. } =
            build_exercise("tp1-production", &ExerciseOptions::default()).unwrap();
        let mut solver = solver_by_name("microlp").unwrap();
        let solution = model.solve_with(&mut solver, &SolverConfig::default()).unwrap();

        let report = json_report(&model, solver.name(), &solution);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["model"], "tp1_production");
        assert_eq!(value["solver"], "microlp");
        assert_eq!(value["status"], "optimal");
        assert_eq!(value["named_values"][0]["name"], "A");
        assert!((value["objective_value"].as_f64().unwrap() - 493.75).abs() < 1e-6);
    }
}

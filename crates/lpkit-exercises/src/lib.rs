//! Coursework linear programs built on lpkit.
//!
//! Each exercise is plain data plus a builder that turns it into a
//! [`Model`] and a [`Reporter`] laid out for that exercise. The catalog
//! gives every preset a stable name for the `lpkit` command line.

pub mod error;
pub mod linear_program;
pub mod personnel;
pub mod warehouse;

use lpkit_core::{Model, Reporter};

pub use error::ExerciseError;
pub use linear_program::LinearProgramData;
pub use personnel::PersonnelData;
pub use warehouse::WarehouseData;

/// A built exercise: the model to solve and how to report it.
#[derive(Debug, Clone)]
pub struct Exercise {
    pub model: Model,
    pub reporter: Reporter,
}

/// Catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseInfo {
    pub name: &'static str,
    pub summary: &'static str,
}

pub const CATALOG: [ExerciseInfo; 6] = [
    ExerciseInfo {
        name: "tp1-base",
        summary: "Covering problem: min 2 x_1 + 5 x_2 s.t. 3 x_1 + 8 x_2 >= 24",
    },
    ExerciseInfo {
        name: "tp1-production",
        summary: "Production plan: max 40 A + 35 B under mixing and packing capacity",
    },
    ExerciseInfo {
        name: "tp1-transport",
        summary: "Transport: four routes, two demands, two supplies",
    },
    ExerciseInfo {
        name: "personnel",
        summary: "Three-year personnel planning with integer head counts",
    },
    ExerciseInfo {
        name: "warehouse",
        summary: "Warehouse rental with whole trucks",
    },
    ExerciseInfo {
        name: "warehouse-continuous",
        summary: "Warehouse rental with fractional trucks allowed",
    },
];

/// Knobs some exercises expose on top of their preset data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExerciseOptions {
    /// Global layoff cap for the personnel plan.
    pub layoff_cap: Option<f64>,
    /// Solve the continuous relaxation instead of the integer model.
    pub relaxed: bool,
}

/// Build a catalog exercise by name.
pub fn build_exercise(name: &str, options: &ExerciseOptions) -> Result<Exercise, ExerciseError> {
    match name {
        "tp1-base" => linear_program::build(&LinearProgramData::tp1_base()),
        "tp1-production" => linear_program::build(&LinearProgramData::tp1_production()),
        "tp1-transport" => linear_program::build(&LinearProgramData::tp1_transport()),
        "personnel" => {
            let mut data = PersonnelData::standard();
            data.layoff_cap = options.layoff_cap;
            data.integral = !options.relaxed;
            personnel::build(&data)
        }
        "warehouse" | "warehouse-continuous" => {
            let mut data = WarehouseData::standard();
            data.integral_trucks = name == "warehouse" && !options.relaxed;
            warehouse::build(&data)
        }
        _ => Err(ExerciseError::UnknownExercise {
            name: name.to_string(),
        }),
    }
}

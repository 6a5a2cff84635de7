//! Warehouse rental and truck delivery planning.
//!
//! Pick which warehouses to rent and how many full trucks each rented
//! warehouse sends to each zone so every zone's demand is met. Costs are
//! monthly rent plus a per-truck delivery price.

use lpkit_core::{Domain, Expr, Model, Reporter, Variable, VariableId};
use serde::{Deserialize, Serialize};

use crate::Exercise;
use crate::error::ExerciseError;

const EXERCISE: &str = "warehouse";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseData {
    /// Volume one truck carries.
    pub truck_capacity: f64,
    pub rent: Vec<f64>,
    /// Storage volume per warehouse.
    pub capacity: Vec<f64>,
    /// Volume each zone needs.
    pub demand: Vec<f64>,
    /// `delivery_cost[warehouse][zone]`: price of one truck.
    pub delivery_cost: Vec<Vec<f64>>,
    /// Whole trucks only when true.
    #[serde(default = "default_integral_trucks")]
    pub integral_trucks: bool,
}

fn default_integral_trucks() -> bool {
    true
}

impl WarehouseData {
    /// Five warehouses, three zones, trucks of 10 m3.
    pub fn standard() -> Self {
        Self {
            truck_capacity: 10.0,
            rent: vec![1000.0, 2700.0, 1000.0, 5000.0, 3000.0],
            capacity: vec![100.0, 450.0, 150.0, 600.0, 250.0],
            demand: vec![400.0, 200.0, 300.0],
            delivery_cost: vec![
                vec![52.0, 60.0, 10.0],
                vec![80.0, 50.0, 32.0],
                vec![47.0, 18.0, 32.0],
                vec![49.0, 31.0, 14.0],
                vec![10.0, 20.0, 31.0],
            ],
            integral_trucks: true,
        }
    }

    /// Same data with fractional truck counts allowed.
    pub fn continuous_trucks(mut self) -> Self {
        self.integral_trucks = false;
        self
    }

    fn check(&self) -> Result<(), ExerciseError> {
        if !(self.truck_capacity.is_finite() && self.truck_capacity > 0.0) {
            return Err(ExerciseError::invalid(
                EXERCISE,
                format!("truck capacity must be positive (got {})", self.truck_capacity),
            ));
        }
        let warehouses = self.rent.len();
        if self.capacity.len() != warehouses || self.delivery_cost.len() != warehouses {
            return Err(ExerciseError::invalid(
                EXERCISE,
                format!(
                    "rent, capacity and delivery_cost must list {warehouses} warehouses"
                ),
            ));
        }
        let zones = self.demand.len();
        if let Some(row) = self.delivery_cost.iter().position(|row| row.len() != zones) {
            return Err(ExerciseError::invalid(
                EXERCISE,
                format!("delivery_cost row {} must list {zones} zones", row + 1),
            ));
        }
        Ok(())
    }
}

/// Variables of a built warehouse model.
#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseVariables {
    /// `rented[warehouse]`, binary.
    pub rented: Vec<VariableId>,
    /// `trucks[warehouse][zone]`.
    pub trucks: Vec<Vec<VariableId>>,
}

/// Build the rental model and return its variable layout alongside.
pub fn build_with_variables(
    data: &WarehouseData,
) -> Result<(Exercise, WarehouseVariables), ExerciseError> {
    data.check()?;
    let truck_domain = if data.integral_trucks {
        Domain::Integer
    } else {
        Domain::Continuous
    };

    let mut model = Model::named("warehouse_rental");
    let rented = (1..=data.rent.len())
        .map(|i| model.add_variable(Variable::binary(format!("E_{i}"))))
        .collect::<Result<Vec<_>, _>>()?;

    // No single route carries more than its warehouse holds.
    let mut trucks = Vec::with_capacity(data.rent.len());
    for (i, &capacity) in (1..=data.rent.len()).zip(&data.capacity) {
        let most = capacity / data.truck_capacity;
        let row = (1..=data.demand.len())
            .map(|j| {
                let variable = Variable::new(format!("c_{i}_{j}"), truck_domain, 0.0, most)?;
                model.add_variable(variable)
            })
            .collect::<Result<Vec<_>, _>>()?;
        trucks.push(row);
    }

    let rent = Expr::from_pairs(&rented, &data.rent)?;
    let mut delivery = Expr::zero();
    for (row, prices) in trucks.iter().zip(&data.delivery_cost) {
        delivery += Expr::from_pairs(row, prices)?;
    }
    model.minimize(rent + delivery)?;
    model.set_objective_name("total_cost")?;

    // Trucks leaving a warehouse fit its capacity, and only if it is rented.
    for (i, (row, &capacity)) in trucks.iter().zip(&data.capacity).enumerate() {
        let shipped: Expr = row.iter().map(|&id| Expr::var(id)).sum();
        let allowed = Expr::term(rented[i], capacity / data.truck_capacity);
        model.add_constraint(
            format!("capacity_{}", i + 1),
            (shipped - allowed).le_scalar(0.0),
        )?;
    }

    for (j, &demand) in data.demand.iter().enumerate() {
        let received: Expr = trucks.iter().map(|row| Expr::var(row[j])).sum();
        model.add_constraint(
            format!("demand_{}", j + 1),
            received.ge_scalar(demand / data.truck_capacity),
        )?;
    }

    tracing::debug!(
        component = "exercise",
        operation = "build",
        status = "success",
        exercise = EXERCISE,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        integral_trucks = data.integral_trucks,
        "Built warehouse rental model"
    );

    let reporter = Reporter::new()
        .with_section("Rented warehouses", rented.iter().copied())
        .with_section("Trucks", trucks.iter().flatten().copied());
    Ok((
        Exercise { model, reporter },
        WarehouseVariables { rented, trucks },
    ))
}

/// Build the rental model.
pub fn build(data: &WarehouseData) -> Result<Exercise, ExerciseError> {
    build_with_variables(data).map(|(exercise, _)| exercise)
}

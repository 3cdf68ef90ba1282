use serde::{Deserialize, Serialize};

use crate::domain::types::{AlgorithmTag, Depot, Location, Vehicle};
use crate::error::SolveError;

/// Five non-negative weights; at least one must be positive. The mapping
/// to fitness components is fixed: (cost, distance, vehicles, time,
/// balance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Objectives {
    pub minimize_cost: f64,
    pub minimize_distance: f64,
    pub minimize_vehicles: f64,
    pub minimize_time: f64,
    pub balance_routes: f64,
}

impl Objectives {
    pub fn new(
        minimize_cost: f64,
        minimize_distance: f64,
        minimize_vehicles: f64,
        minimize_time: f64,
        balance_routes: f64,
    ) -> Self {
        Self {
            minimize_cost,
            minimize_distance,
            minimize_vehicles,
            minimize_time,
            balance_routes,
        }
    }

    pub fn balanced() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0, 1.0)
    }

    fn is_valid(&self) -> bool {
        let weights = [
            self.minimize_cost,
            self.minimize_distance,
            self.minimize_vehicles,
            self.minimize_time,
            self.balance_routes,
        ];
        weights.iter().all(|w| w.is_finite() && *w >= 0.0) && weights.iter().any(|w| *w > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Constraints {
    pub max_route_time: Option<f64>,
    pub max_route_distance: Option<f64>,
    pub require_time_windows: bool,
    pub allow_split_deliveries: bool,
    pub balance_workload: bool,
}

/// Per-engine tuning. Any field left `None` falls back to the default in
/// [`crate::config`] for the corresponding algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Parameters {
    pub population_size: Option<usize>,
    pub generations: Option<usize>,
    pub mutation_rate: Option<f64>,
    pub elite_size: Option<usize>,
    pub temperature: Option<f64>,
    pub cooling_rate: Option<f64>,
    pub tabu_tenure: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub depot: Depot,
    pub locations: Vec<Location>,
    pub vehicles: Vec<Vehicle>,
    pub constraints: Constraints,
    pub objectives: Objectives,
    pub algorithm: AlgorithmTag,
    pub parameters: Parameters,
}

impl OptimizationRequest {
    pub fn new(depot: Depot, locations: Vec<Location>, vehicles: Vec<Vehicle>) -> Self {
        Self {
            depot,
            locations,
            vehicles,
            constraints: Constraints::default(),
            objectives: Objectives::balanced(),
            algorithm: AlgorithmTag::Tabu,
            parameters: Parameters::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: AlgorithmTag) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_objectives(mut self, objectives: Objectives) -> Self {
        self.objectives = objectives;
        self
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// `invalid-request` checks from SPEC_FULL.md §7: negative capacity,
    /// non-finite coordinates, all-zero objective weights. Fatal — the
    /// solve never starts if this fails.
    pub fn validate(&self) -> Result<(), SolveError> {
        if !self.depot.coordinate.is_finite() {
            return Err(SolveError::InvalidRequest(
                "depot coordinate is not finite".into(),
            ));
        }
        for loc in &self.locations {
            if !loc.coordinate.is_finite() {
                return Err(SolveError::InvalidRequest(format!(
                    "location {} has non-finite coordinate",
                    loc.id
                )));
            }
            if !loc.demand.is_non_negative() {
                return Err(SolveError::InvalidRequest(format!(
                    "location {} has negative demand",
                    loc.id
                )));
            }
        }
        for vehicle in &self.vehicles {
            if !vehicle.capacity.is_non_negative() {
                return Err(SolveError::InvalidRequest(format!(
                    "vehicle {} has negative capacity",
                    vehicle.id
                )));
            }
            if vehicle.speed_kmh <= 0.0 || !vehicle.speed_kmh.is_finite() {
                return Err(SolveError::InvalidRequest(format!(
                    "vehicle {} has non-positive or non-finite speed",
                    vehicle.id
                )));
            }
        }
        if !self.objectives.is_valid() {
            return Err(SolveError::InvalidRequest(
                "objective weights must be non-negative with at least one positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Capacity, Coordinate, Demand};

    fn depot() -> Depot {
        Depot::new(0, "depot", Coordinate::new(0.0, 0.0))
    }

    #[test]
    fn rejects_all_zero_objectives() {
        let req = OptimizationRequest::new(depot(), vec![], vec![])
            .with_objectives(Objectives::new(0.0, 0.0, 0.0, 0.0, 0.0));
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_negative_demand() {
        let loc = Location::new(1, "a", Coordinate::new(1.0, 1.0))
            .with_demand(Demand::new(-1.0, 0.0, 0.0));
        let req = OptimizationRequest::new(depot(), vec![loc], vec![]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_coordinate() {
        let loc = Location::new(1, "a", Coordinate::new(f64::NAN, 1.0));
        let req = OptimizationRequest::new(depot(), vec![loc], vec![]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn accepts_well_formed_request() {
        let loc = Location::new(1, "a", Coordinate::new(1.0, 1.0));
        let vehicle = Vehicle::new(1, Capacity::new(10.0, 10.0, 10.0), 50.0, Coordinate::new(0.0, 0.0));
        let req = OptimizationRequest::new(depot(), vec![loc], vec![vehicle]);
        assert!(req.validate().is_ok());
    }
}

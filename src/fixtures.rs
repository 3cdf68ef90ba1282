//! Synthetic problem generator for tests and the demo binary.
//!
//! Grounded in the teacher's `fixtures/data_generator.rs`, which builds
//! reproducible random problem instances from a seeded
//! `ChaCha8Rng::seed_from_u64`. This crate drops the CSV/postal-code
//! lookup (an out-of-scope persistence concern) and generates
//! coordinates, demands, and vehicles directly in memory.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::request::{Constraints, Objectives, OptimizationRequest, Parameters};
use crate::domain::types::{AlgorithmTag, Capacity, Coordinate, Demand, Location, Vehicle};

/// Builds `location_count` locations scattered within `radius_degrees`
/// of the origin depot, and `vehicle_count` identical vehicles, all from
/// a single seeded RNG so the instance is fully reproducible.
pub fn synthetic_request(
    location_count: usize,
    vehicle_count: usize,
    radius_degrees: f64,
    seed: u64,
    algorithm: AlgorithmTag,
) -> OptimizationRequest {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let depot = Location::new(0, "depot", Coordinate::new(0.0, 0.0));

    let locations: Vec<Location> = (1..=location_count)
        .map(|id| {
            let lat = rng.gen_range(-radius_degrees..radius_degrees);
            let lon = rng.gen_range(-radius_degrees..radius_degrees);
            let demand = Demand::new(
                rng.gen_range(1.0..10.0),
                rng.gen_range(0.1..2.0),
                rng.gen_range(1.0..5.0),
            );
            Location::new(id as u64, format!("customer-{id}"), Coordinate::new(lat, lon))
                .with_demand(demand)
                .with_service_time(rng.gen_range(5.0..20.0))
        })
        .collect();

    let vehicles: Vec<Vehicle> = (1..=vehicle_count)
        .map(|id| {
            Vehicle::new(
                id as u64,
                Capacity::new(50.0, 10.0, 30.0),
                rng.gen_range(40.0..70.0),
                Coordinate::new(0.0, 0.0),
            )
            .with_costs(
                rng.gen_range(0.5..2.0),
                rng.gen_range(10.0..30.0),
                rng.gen_range(50.0..150.0),
            )
        })
        .collect();

    OptimizationRequest {
        depot,
        locations,
        vehicles,
        constraints: Constraints::default(),
        objectives: Objectives::balanced(),
        algorithm,
        parameters: Parameters::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_identical_requests() {
        let a = synthetic_request(20, 4, 2.0, 1, AlgorithmTag::Hybrid);
        let b = synthetic_request(20, 4, 2.0, 1, AlgorithmTag::Hybrid);
        assert_eq!(a.locations, b.locations);
        assert_eq!(a.vehicles, b.vehicles);
    }

    #[test]
    fn respects_requested_counts() {
        let req = synthetic_request(15, 3, 1.0, 9, AlgorithmTag::Genetic);
        assert_eq!(req.locations.len(), 15);
        assert_eq!(req.vehicles.len(), 3);
    }
}

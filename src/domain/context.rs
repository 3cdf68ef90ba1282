//! Per-solve shared context: depot + locations + vehicles + the
//! memoised distance matrix, all indexed for O(1) lookup by the
//! engines. Built once in [`crate::solver::optimize`] and shared
//! read-only afterwards — mirrors the teacher's `ProblemInstance`,
//! generalised from its parallel-array encoding to typed lookups.

use std::collections::HashMap;

use crate::domain::request::{Constraints, Objectives, OptimizationRequest};
use crate::domain::types::{Coordinate, Depot, Location, LocationId, Vehicle, VehicleId};
use crate::geometry::DistanceMatrix;

/// Matrix index 0 is always the depot; indices `1..=locations.len()`
/// follow request order.
pub struct ProblemContext {
    pub depot: Depot,
    pub locations: Vec<Location>,
    pub vehicles: Vec<Vehicle>,
    pub constraints: Constraints,
    pub objectives: Objectives,
    pub distances: DistanceMatrix,
    location_index: HashMap<LocationId, usize>,
    location_by_id: HashMap<LocationId, usize>,
    vehicle_by_id: HashMap<VehicleId, usize>,
}

impl ProblemContext {
    pub fn build(request: &OptimizationRequest) -> Self {
        let mut coords = Vec::with_capacity(request.locations.len() + 1);
        coords.push(request.depot.coordinate);
        let mut location_index = HashMap::with_capacity(request.locations.len());
        let mut location_by_id = HashMap::with_capacity(request.locations.len());
        for (i, loc) in request.locations.iter().enumerate() {
            coords.push(loc.coordinate);
            location_index.insert(loc.id, i + 1);
            location_by_id.insert(loc.id, i);
        }
        let mut vehicle_by_id = HashMap::with_capacity(request.vehicles.len());
        for (i, v) in request.vehicles.iter().enumerate() {
            vehicle_by_id.insert(v.id, i);
        }

        Self {
            depot: request.depot.clone(),
            locations: request.locations.clone(),
            vehicles: request.vehicles.clone(),
            constraints: request.constraints,
            objectives: request.objectives,
            distances: DistanceMatrix::build(&coords),
            location_index,
            location_by_id,
            vehicle_by_id,
        }
    }

    pub fn matrix_index(&self, id: LocationId) -> usize {
        self.location_index[&id]
    }

    pub const DEPOT_INDEX: usize = 0;

    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[self.location_by_id[&id]]
    }

    pub fn vehicle(&self, id: VehicleId) -> &Vehicle {
        &self.vehicles[self.vehicle_by_id[&id]]
    }

    pub fn distance_between(&self, from: LocationId, to: LocationId) -> f64 {
        self.distances
            .get(self.matrix_index(from), self.matrix_index(to))
    }

    pub fn distance_from_depot(&self, to: LocationId) -> f64 {
        self.distances.get(Self::DEPOT_INDEX, self.matrix_index(to))
    }

    pub fn distance_to_coordinate(&self, from: LocationId, coordinate: Coordinate) -> f64 {
        // The end coordinate may differ from the depot; compute directly
        // rather than looking it up in the matrix, which only covers
        // depot + request locations.
        crate::geometry::haversine_km(self.location(from).coordinate, coordinate)
    }

    pub fn location_ids(&self) -> Vec<LocationId> {
        self.locations.iter().map(|l| l.id).collect()
    }
}

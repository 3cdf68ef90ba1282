use serde::{Deserialize, Serialize};

use crate::domain::types::{LocationId, RouteMetrics, StopTiming, VehicleId, Violation};

/// One vehicle's ordered visit sequence plus everything the evaluator
/// computed about it. The depot is implicit at both ends and not stored
/// in `stops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub vehicle_id: VehicleId,
    pub stops: Vec<LocationId>,
    pub timings: Vec<StopTiming>,
    pub metrics: RouteMetrics,
    pub violations: Vec<Violation>,
}

impl Route {
    pub fn new(vehicle_id: VehicleId, stops: Vec<LocationId>) -> Self {
        Self {
            vehicle_id,
            stops,
            timings: Vec::new(),
            metrics: RouteMetrics::default(),
            violations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == crate::domain::types::Severity::Error)
    }
}

/// An ordered list of routes plus the set of locations that could not be
/// assigned. Invariant: `served ∪ unassigned = all request locations`
/// and `served ∩ unassigned = ∅`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Solution {
    pub routes: Vec<Route>,
    pub unassigned: Vec<LocationId>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn served_count(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    pub fn total_violations(&self) -> usize {
        self.routes.iter().map(|r| r.violations.len()).sum()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.routes.iter().map(|r| r.metrics.distance_km).sum()
    }

    pub fn total_time_minutes(&self) -> f64 {
        self.routes.iter().map(|r| r.metrics.time_minutes).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.routes.iter().map(|r| r.metrics.cost).sum()
    }

    pub fn mean_utilization_pct(&self) -> f64 {
        if self.routes.is_empty() {
            return 0.0;
        }
        self.routes
            .iter()
            .map(|r| r.metrics.utilization_pct)
            .sum::<f64>()
            / self.routes.len() as f64
    }

    /// Routes that actually serve at least one stop ("vehicles used").
    pub fn active_routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|r| !r.is_empty())
    }

    pub fn vehicles_used(&self) -> usize {
        self.active_routes().count()
    }

    /// Checks the partition invariant against the full location set a
    /// request was asked to serve.
    pub fn is_partition_of(&self, all_locations: &[LocationId]) -> bool {
        let mut seen = std::collections::HashSet::new();
        for route in &self.routes {
            for stop in &route.stops {
                if !seen.insert(*stop) {
                    return false;
                }
            }
        }
        for id in &self.unassigned {
            if !seen.insert(*id) {
                return false;
            }
        }
        let expected: std::collections::HashSet<_> = all_locations.iter().copied().collect();
        seen == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_checks_union_and_disjointness() {
        let mut sol = Solution::new();
        sol.routes.push(Route::new(1, vec![1, 2]));
        sol.unassigned.push(3);
        assert!(sol.is_partition_of(&[1, 2, 3]));
        assert!(!sol.is_partition_of(&[1, 2]));

        sol.unassigned.push(1); // duplicate -> not disjoint
        assert!(!sol.is_partition_of(&[1, 2, 3]));
    }

    #[test]
    fn vehicles_used_ignores_empty_routes() {
        let mut sol = Solution::new();
        sol.routes.push(Route::new(1, vec![1]));
        sol.routes.push(Route::new(2, vec![]));
        assert_eq!(sol.vehicles_used(), 1);
    }
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Three non-negative scalars that aggregate by componentwise addition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub weight: f64,
    pub volume: f64,
    pub pallets: f64,
}

impl Demand {
    pub const ZERO: Demand = Demand {
        weight: 0.0,
        volume: 0.0,
        pallets: 0.0,
    };

    pub fn new(weight: f64, volume: f64, pallets: f64) -> Self {
        Self {
            weight,
            volume,
            pallets,
        }
    }

    pub fn is_non_negative(&self) -> bool {
        self.weight >= 0.0 && self.volume >= 0.0 && self.pallets >= 0.0
    }
}

impl std::ops::Add for Demand {
    type Output = Demand;

    fn add(self, rhs: Demand) -> Demand {
        Demand {
            weight: self.weight + rhs.weight,
            volume: self.volume + rhs.volume,
            pallets: self.pallets + rhs.pallets,
        }
    }
}

impl std::ops::AddAssign for Demand {
    fn add_assign(&mut self, rhs: Demand) {
        *self = *self + rhs;
    }
}

/// Same three scalars as [`Demand`]; a load is feasible only if every
/// component is `<=` the corresponding capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    pub weight: f64,
    pub volume: f64,
    pub pallets: f64,
}

impl Capacity {
    pub fn new(weight: f64, volume: f64, pallets: f64) -> Self {
        Self {
            weight,
            volume,
            pallets,
        }
    }

    pub fn is_non_negative(&self) -> bool {
        self.weight >= 0.0 && self.volume >= 0.0 && self.pallets >= 0.0
    }

    /// Does `load` fit within this capacity, componentwise?
    pub fn fits(&self, load: Demand) -> bool {
        load.weight <= self.weight && load.volume <= self.volume && load.pallets <= self.pallets
    }

    /// Mean of the three load-to-capacity fractions, in percent. Can
    /// exceed 100 when the load is infeasible; zero-capacity components
    /// are skipped from the mean rather than dividing by zero.
    pub fn utilization_pct(&self, load: Demand) -> f64 {
        let mut sum = 0.0;
        let mut n = 0.0;
        for (l, c) in [
            (load.weight, self.weight),
            (load.volume, self.volume),
            (load.pallets, self.pallets),
        ] {
            if c > 0.0 {
                sum += l / c;
                n += 1.0;
            }
        }
        if n == 0.0 {
            0.0
        } else {
            (sum / n) * 100.0
        }
    }
}

/// Service cannot start before `earliest` (the vehicle waits) and must
/// start by `latest` (else a violation). Values are absolute minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub earliest: f64,
    pub latest: f64,
}

impl TimeWindow {
    /// Returns `None` if either bound is non-finite or `earliest > latest`.
    pub fn new(earliest: f64, latest: f64) -> Option<Self> {
        if !earliest.is_finite() || !latest.is_finite() || earliest > latest {
            return None;
        }
        Some(Self { earliest, latest })
    }

    pub fn wait_time(&self, arrival: f64) -> f64 {
        if arrival < self.earliest {
            self.earliest - arrival
        } else {
            0.0
        }
    }

    pub fn is_missed(&self, start_of_service: f64) -> bool {
        start_of_service > self.latest
    }
}

pub type LocationId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub coordinate: Coordinate,
    pub time_window: Option<TimeWindow>,
    pub service_time_minutes: f64,
    pub demand: Demand,
    pub priority: i32,
    pub requirements: Option<HashSet<String>>,
}

impl Location {
    pub fn new(id: LocationId, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate,
            time_window: None,
            service_time_minutes: 0.0,
            demand: Demand::ZERO,
            priority: 0,
            requirements: None,
        }
    }

    pub fn with_demand(mut self, demand: Demand) -> Self {
        self.demand = demand;
        self
    }

    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = Some(window);
        self
    }

    pub fn with_service_time(mut self, minutes: f64) -> Self {
        self.service_time_minutes = minutes;
        self
    }

    pub fn with_requirements(mut self, requirements: HashSet<String>) -> Self {
        self.requirements = Some(requirements);
        self
    }
}

/// A distinguished [`Location`]; every route begins and ends here (or at
/// a vehicle's own end coordinate, when supplied).
pub type Depot = Location;

pub type VehicleId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub capacity: Capacity,
    pub cost_per_km: f64,
    pub cost_per_hour: f64,
    pub fixed_cost: f64,
    pub speed_kmh: f64,
    pub start: Coordinate,
    pub end: Option<Coordinate>,
    pub available_from: f64,
    pub available_until: f64,
    pub features: Option<HashSet<String>>,
}

impl Vehicle {
    pub fn new(id: VehicleId, capacity: Capacity, speed_kmh: f64, start: Coordinate) -> Self {
        Self {
            id,
            capacity,
            cost_per_km: 0.0,
            cost_per_hour: 0.0,
            fixed_cost: 0.0,
            speed_kmh,
            start,
            end: None,
            available_from: 0.0,
            available_until: f64::INFINITY,
            features: None,
        }
    }

    pub fn with_costs(mut self, cost_per_km: f64, cost_per_hour: f64, fixed_cost: f64) -> Self {
        self.cost_per_km = cost_per_km;
        self.cost_per_hour = cost_per_hour;
        self.fixed_cost = fixed_cost;
        self
    }

    pub fn with_availability(mut self, from: f64, until: f64) -> Self {
        self.available_from = from;
        self.available_until = until;
        self
    }

    pub fn end_coordinate(&self, depot: &Depot) -> Coordinate {
        self.end.unwrap_or(depot.coordinate)
    }
}

/// Closed set of algorithm tags — a tagged union, never a bare string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmTag {
    Genetic,
    AntColony,
    SimulatedAnnealing,
    Tabu,
    Hybrid,
}

impl AlgorithmTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmTag::Genetic => "genetic",
            AlgorithmTag::AntColony => "ant_colony",
            AlgorithmTag::SimulatedAnnealing => "simulated_annealing",
            AlgorithmTag::Tabu => "tabu",
            AlgorithmTag::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    CapacityExceeded,
    TimeWindowMissed,
    RouteDurationExceeded,
    RouteDistanceExceeded,
    VehicleAvailabilityMissed,
    FeatureRequirementUnmet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub description: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
        }
    }

    pub fn error(kind: ViolationKind, description: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RouteMetrics {
    pub distance_km: f64,
    pub time_minutes: f64,
    pub cost: f64,
    pub utilization_pct: f64,
    pub stop_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopTiming {
    pub arrival: f64,
    pub departure: f64,
    pub wait: f64,
    pub service: f64,
    pub cumulative_load: Demand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_fits_componentwise() {
        let cap = Capacity::new(10.0, 1.0, 10.0);
        assert!(cap.fits(Demand::new(10.0, 1.0, 10.0)));
        assert!(!cap.fits(Demand::new(10.1, 1.0, 10.0)));
    }

    #[test]
    fn utilization_is_mean_of_fractions() {
        let cap = Capacity::new(10.0, 10.0, 10.0);
        let util = cap.utilization_pct(Demand::new(5.0, 0.0, 10.0));
        assert!((util - 50.0).abs() < 1e-9);
    }

    #[test]
    fn time_window_rejects_inverted_bounds() {
        assert!(TimeWindow::new(10.0, 5.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 5.0).is_none());
    }

    #[test]
    fn time_window_wait_and_miss() {
        let tw = TimeWindow::new(100.0, 200.0).unwrap();
        assert_eq!(tw.wait_time(50.0), 50.0);
        assert_eq!(tw.wait_time(150.0), 0.0);
        assert!(!tw.is_missed(200.0));
        assert!(tw.is_missed(200.1));
    }
}

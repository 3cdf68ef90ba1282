//! Great-circle distance and a per-solve memoised distance matrix.

use crate::domain::types::Coordinate;

/// Distance between two coordinates in kilometres, via the spherical
/// law of cosines (Earth radius 6371 km). Symmetric and triangle-inequality
/// respecting to within floating-point tolerance.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlon.cos();
    // Clamp for float error near antipodal/identical points, where
    // cos_angle can drift slightly outside [-1, 1].
    let cos_angle = cos_angle.clamp(-1.0, 1.0);

    crate::config::EARTH_RADIUS_KM * cos_angle.acos()
}

/// Dense N×N memoised distance matrix for a single solve.
///
/// Built once from a request's depot + locations (index 0 is always the
/// depot) and shared read-only by every engine for that call — distances
/// never survive across solves, per the shared-resource policy.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    coords: Vec<Coordinate>,
    matrix: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn build(coords: &[Coordinate]) -> Self {
        let n = coords.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = haversine_km(coords[i], coords[j]);
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }
        Self {
            coords: coords.to_vec(),
            matrix,
        }
    }

    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.matrix[from][to]
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn symmetric() {
        let a = Coordinate::new(1.0, 2.0);
        let b = Coordinate::new(3.0, -4.0);
        assert_relative_eq!(haversine_km(a, b), haversine_km(b, a), epsilon = 1e-9);
    }

    #[test]
    fn zero_for_identical_points() {
        let a = Coordinate::new(12.3, 45.6);
        assert_relative_eq!(haversine_km(a, a), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn one_degree_at_equator_matches_expected() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        // 1 degree of longitude at the equator ~ 111.195 km.
        assert_relative_eq!(haversine_km(a, b), 111.195, epsilon = 0.01);
    }

    #[test]
    fn triangle_inequality_holds() {
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(5.0, -3.0);
        let c = Coordinate::new(-2.0, 8.0);
        let ab = haversine_km(a, b);
        let bc = haversine_km(b, c);
        let ac = haversine_km(a, c);
        assert!(ac <= ab + bc + 1e-6);
    }

    #[test]
    fn matrix_matches_pairwise() {
        let coords = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 0.0),
        ];
        let dm = DistanceMatrix::build(&coords);
        assert_eq!(dm.len(), 3);
        for i in 0..3 {
            for j in 0..3 {
                let expected = haversine_km(coords[i], coords[j]);
                assert!((dm.get(i, j) - expected).abs() < 1e-9);
            }
        }
    }

    proptest! {
        /// Invariant 3: distance is symmetric and obeys the triangle
        /// inequality for any three points on the sphere, not just the
        /// hand-picked examples above.
        #[test]
        fn symmetric_and_triangle_inequality_for_arbitrary_points(
            lat_a in -90.0f64..90.0, lon_a in -180.0f64..180.0,
            lat_b in -90.0f64..90.0, lon_b in -180.0f64..180.0,
            lat_c in -90.0f64..90.0, lon_c in -180.0f64..180.0,
        ) {
            let a = Coordinate::new(lat_a, lon_a);
            let b = Coordinate::new(lat_b, lon_b);
            let c = Coordinate::new(lat_c, lon_c);

            prop_assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-6);

            let ab = haversine_km(a, b);
            let bc = haversine_km(b, c);
            let ac = haversine_km(a, c);
            prop_assert!(ac <= ab + bc + 1e-6);
        }
    }
}

//! Ellipsoidal geodesy: distances, bearings and local tangent-plane projection.

mod ellipsoid;
mod enu;

use std::fmt;

use geographiclib_rs::{DirectGeodesic, Geodesic, InverseGeodesic};

use crate::circular::normalize_deg;

pub use ellipsoid::{Ellipsoid, WGS84_FLATTENING, WGS84_SEMI_MAJOR_AXIS_M};
pub use enu::ecef_to_enu;

/// Solution of the inverse geodesic problem between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inverse {
    /// Initial bearing at the first point, degrees in [0, 360).
    pub bearing_deg: f64,
    pub distance_m: f64,
}

/// Geodesic solver bound to one ellipsoid.
pub struct Geodesy {
    ellipsoid: Ellipsoid,
    geodesic: Geodesic,
}

impl fmt::Debug for Geodesy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geodesy")
            .field("ellipsoid", &self.ellipsoid)
            .finish()
    }
}

impl Default for Geodesy {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Geodesy {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            geodesic: Geodesic::new(ellipsoid.semi_major_axis_m, ellipsoid.flattening),
        }
    }

    pub fn wgs84() -> Self {
        Self::new(Ellipsoid::wgs84())
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Initial bearing and distance from point 1 to point 2.
    ///
    /// Coincident points give a zero distance and an arbitrary bearing; callers
    /// that derive a course must check the distance first.
    pub fn inverse(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Inverse {
        let (s12, azi1, _azi2, _a12): (f64, f64, f64, f64) =
            self.geodesic.inverse(lat1, lon1, lat2, lon2);
        Inverse {
            bearing_deg: normalize_deg(azi1),
            distance_m: s12,
        }
    }

    pub fn distance(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        self.inverse(lat1, lon1, lat2, lon2).distance_m
    }

    pub fn bearing(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        self.inverse(lat1, lon1, lat2, lon2).bearing_deg
    }

    /// Point reached by travelling `distance_m` from (lat, lon) along the
    /// initial bearing. Returns (latitude, longitude) in degrees.
    pub fn destination(
        &self,
        latitude_deg: f64,
        longitude_deg: f64,
        bearing_deg: f64,
        distance_m: f64,
    ) -> (f64, f64) {
        let (lat2, lon2): (f64, f64) =
            self.geodesic
                .direct(latitude_deg, longitude_deg, bearing_deg, distance_m);
        (lat2, lon2)
    }

    /// East/north/up offset of `point` relative to `origin`, in metres, in the
    /// tangent frame at `origin`. Both points are taken at zero height.
    pub fn local_enu(&self, origin: (f64, f64), point: (f64, f64)) -> (f64, f64, f64) {
        let o = self.ellipsoid.to_ecef(origin.0, origin.1, 0.0);
        let p = self.ellipsoid.to_ecef(point.0, point.1, 0.0);
        let dr = [p[0] - o[0], p[1] - o[1], p[2] - o[2]];
        ecef_to_enu(dr, origin.0, origin.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dms(deg: f64, min: f64, sec: f64) -> f64 {
        deg.signum() * (deg.abs() + min / 60.0 + sec / 3600.0)
    }

    #[test]
    fn test_flinders_peak_to_buninyong() {
        // Classic Vincenty reference line on the WGS84/GRS80 ellipsoid.
        let g = Geodesy::wgs84();
        let lat1 = dms(-37.0, 57.0, 3.72030);
        let lon1 = dms(144.0, 25.0, 29.52440);
        let lat2 = dms(-37.0, 39.0, 10.15610);
        let lon2 = dms(143.0, 55.0, 35.38390);

        let inv = g.inverse(lat1, lon1, lat2, lon2);
        assert!((inv.distance_m - 54_972.271).abs() < 1.0, "{}", inv.distance_m);
        let expected_bearing = dms(306.0, 52.0, 5.37);
        assert!((inv.bearing_deg - expected_bearing).abs() < 1e-3);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        // a * pi / 180 along the equator.
        let g = Geodesy::wgs84();
        let d = g.distance(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_319.490_793).abs() < 0.01, "{d}");
        assert!((g.bearing(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_is_normalized() {
        let g = Geodesy::wgs84();
        // Due west gives -90 from the solver, reported as 270.
        let b = g.bearing(0.0, 1.0, 0.0, 0.0);
        assert!((b - 270.0).abs() < 1e-9, "{b}");
    }

    #[test]
    fn test_destination_inverts_inverse() {
        let g = Geodesy::wgs84();
        let (lat2, lon2) = g.destination(54.3, 10.1, 37.0, 1_500.0);
        let inv = g.inverse(54.3, 10.1, lat2, lon2);
        assert!((inv.distance_m - 1_500.0).abs() < 1e-6);
        assert!((inv.bearing_deg - 37.0).abs() < 1e-6);
    }

    #[test]
    fn test_local_enu_due_north() {
        let g = Geodesy::wgs84();
        let (lat2, lon2) = g.destination(45.0, -3.0, 0.0, 100.0);
        let (e, n, _u) = g.local_enu((45.0, -3.0), (lat2, lon2));
        assert!(e.abs() < 1e-6);
        assert!((n - 100.0).abs() < 1e-3, "{n}");
    }
}

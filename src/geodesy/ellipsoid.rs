use serde::{Deserialize, Serialize};

pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Reference ellipsoid used for every distance, bearing and projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ellipsoid {
    pub semi_major_axis_m: f64,
    pub flattening: f64,
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Ellipsoid {
    pub fn wgs84() -> Self {
        Self {
            semi_major_axis_m: WGS84_SEMI_MAJOR_AXIS_M,
            flattening: WGS84_FLATTENING,
        }
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    pub fn is_valid(&self) -> bool {
        self.semi_major_axis_m.is_finite()
            && self.semi_major_axis_m > 0.0
            && self.flattening.is_finite()
            && (0.0..1.0).contains(&self.flattening)
    }

    /// Earth-centred, earth-fixed position in metres.
    pub fn to_ecef(&self, latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> [f64; 3] {
        let a = self.semi_major_axis_m;
        let e2 = self.e2();
        let lat = latitude_deg.to_radians();
        let lon = longitude_deg.to_radians();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let sin_lon = lon.sin();
        let cos_lon = lon.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let x = (n + altitude_m) * cos_lat * cos_lon;
        let y = (n + altitude_m) * cos_lat * sin_lon;
        let z = (n * (1.0 - e2) + altitude_m) * sin_lat;
        [x, y, z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecef_equator_prime_meridian() {
        let e = Ellipsoid::wgs84();
        let [x, y, z] = e.to_ecef(0.0, 0.0, 0.0);
        assert!((x - WGS84_SEMI_MAJOR_AXIS_M).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
        assert!(z.abs() < 1e-6);
    }

    #[test]
    fn test_ecef_pole_uses_semi_minor_axis() {
        let e = Ellipsoid::wgs84();
        let b = WGS84_SEMI_MAJOR_AXIS_M * (1.0 - WGS84_FLATTENING);
        let [_, _, z] = e.to_ecef(90.0, 0.0, 0.0);
        assert!((z - b).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_ellipsoid() {
        let e = Ellipsoid {
            semi_major_axis_m: -1.0,
            flattening: 0.0,
        };
        assert!(!e.is_valid());
        assert!(Ellipsoid::wgs84().is_valid());
    }
}

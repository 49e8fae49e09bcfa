//! WGS84 conversions between scene coordinates and geographic positions.
//!
//! Scene positions are plain `[x, y, z]` triples. A [`Georeference`] says how
//! to read them: either as Earth-centred Earth-fixed (ECEF) meters, or as
//! east/north/up meters relative to a geographic origin.

use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// WGS84 semi-major axis (meters)
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 first eccentricity squared
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// How scene positions relate to the globe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Georeference {
    /// Positions are ECEF meters
    Ecef,
    /// Positions are east/north/up meters around `origin`
    LocalEnu { origin: GeoPoint },
}

impl Default for Georeference {
    fn default() -> Self {
        Georeference::LocalEnu {
            origin: GeoPoint::new(0.0, 0.0, 0.0),
        }
    }
}

impl Georeference {
    /// Convert a scene position to longitude/latitude/height
    pub fn to_geographic(&self, position: [f64; 3]) -> GeoPoint {
        match self {
            Georeference::Ecef => ecef_to_geodetic(position),
            Georeference::LocalEnu { origin } => {
                ecef_to_geodetic(enu_to_ecef(position, origin))
            }
        }
    }

    /// Convert a geographic position back to scene coordinates
    pub fn to_scene(&self, point: &GeoPoint) -> [f64; 3] {
        match self {
            Georeference::Ecef => geodetic_to_ecef(point),
            Georeference::LocalEnu { origin } => ecef_to_enu(geodetic_to_ecef(point), origin),
        }
    }
}

/// Geodetic (degrees, meters) to ECEF meters
pub fn geodetic_to_ecef(point: &GeoPoint) -> [f64; 3] {
    let lat = point.latitude.to_radians();
    let lon = point.longitude.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();

    [
        (n + point.height) * cos_lat * cos_lon,
        (n + point.height) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_E2) + point.height) * sin_lat,
    ]
}

/// ECEF meters to geodetic, iterating on latitude until it settles
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> GeoPoint {
    let [x, y, z] = ecef;
    let p = (x * x + y * y).sqrt();
    let lon = y.atan2(x);

    // On the polar axis the iteration below divides by cos(lat) = 0
    if p < 1e-9 {
        let b = WGS84_A * (1.0 - WGS84_F);
        let lat = if z >= 0.0 { 90.0 } else { -90.0 };
        return GeoPoint::new(0.0, lat, z.abs() - b);
    }

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    let mut height = 0.0;
    for _ in 0..8 {
        let sin_lat = lat.sin();
        let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        height = p / lat.cos() - n;
        let next = z.atan2(p * (1.0 - WGS84_E2 * n / (n + height)));
        if (next - lat).abs() < 1e-13 {
            lat = next;
            break;
        }
        lat = next;
    }

    GeoPoint::new(lon.to_degrees(), lat.to_degrees(), height)
}

/// Local east/north/up offset around `origin` to ECEF
pub fn enu_to_ecef(enu: [f64; 3], origin: &GeoPoint) -> [f64; 3] {
    let [e, n, u] = enu;
    let [x0, y0, z0] = geodetic_to_ecef(origin);
    let (sin_lat, cos_lat) = origin.latitude.to_radians().sin_cos();
    let (sin_lon, cos_lon) = origin.longitude.to_radians().sin_cos();

    [
        x0 - sin_lon * e - sin_lat * cos_lon * n + cos_lat * cos_lon * u,
        y0 + cos_lon * e - sin_lat * sin_lon * n + cos_lat * sin_lon * u,
        z0 + cos_lat * n + sin_lat * u,
    ]
}

/// ECEF to local east/north/up offset around `origin`
pub fn ecef_to_enu(ecef: [f64; 3], origin: &GeoPoint) -> [f64; 3] {
    let [x0, y0, z0] = geodetic_to_ecef(origin);
    let (dx, dy, dz) = (ecef[0] - x0, ecef[1] - y0, ecef[2] - z0);
    let (sin_lat, cos_lat) = origin.latitude.to_radians().sin_cos();
    let (sin_lon, cos_lon) = origin.longitude.to_radians().sin_cos();

    [
        -sin_lon * dx + cos_lon * dy,
        -sin_lat * cos_lon * dx - sin_lat * sin_lon * dy + cos_lat * dz,
        cos_lat * cos_lon * dx + cos_lat * sin_lon * dy + sin_lat * dz,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn equator_prime_meridian_is_on_x_axis() {
        let ecef = geodetic_to_ecef(&GeoPoint::new(0.0, 0.0, 0.0));
        assert!(close(ecef[0], WGS84_A, 1e-6));
        assert!(close(ecef[1], 0.0, 1e-6));
        assert!(close(ecef[2], 0.0, 1e-6));
    }

    #[test]
    fn geodetic_ecef_round_trip() {
        let p = GeoPoint::new(13.377_7, 52.516_3, 120.0);
        let back = ecef_to_geodetic(geodetic_to_ecef(&p));
        assert!(close(back.longitude, p.longitude, 1e-9));
        assert!(close(back.latitude, p.latitude, 1e-9));
        assert!(close(back.height, p.height, 1e-4));
    }

    #[test]
    fn north_pole_is_handled() {
        let b = WGS84_A * (1.0 - WGS84_F);
        let p = ecef_to_geodetic([0.0, 0.0, b + 10.0]);
        assert_eq!(p.latitude, 90.0);
        assert!(close(p.height, 10.0, 1e-6));
    }

    #[test]
    fn enu_origin_maps_to_origin() {
        let origin = GeoPoint::new(-122.4, 37.8, 15.0);
        let georef = Georeference::LocalEnu { origin };
        let geo = georef.to_geographic([0.0, 0.0, 0.0]);
        assert!(close(geo.longitude, origin.longitude, 1e-9));
        assert!(close(geo.latitude, origin.latitude, 1e-9));
        assert!(close(geo.height, origin.height, 1e-4));
    }

    #[test]
    fn enu_east_offset_increases_longitude() {
        let georef = Georeference::LocalEnu {
            origin: GeoPoint::new(10.0, 45.0, 0.0),
        };
        let geo = georef.to_geographic([100.0, 0.0, 0.0]);
        assert!(geo.longitude > 10.0);
        assert!(close(geo.latitude, 45.0, 1e-5));
    }

    #[test]
    fn enu_round_trip() {
        let georef = Georeference::LocalEnu {
            origin: GeoPoint::new(2.35, 48.85, 35.0),
        };
        let scene = [120.0, -45.5, 3.25];
        let back = georef.to_scene(&georef.to_geographic(scene));
        for i in 0..3 {
            assert!(close(back[i], scene[i], 1e-5), "axis {i}: {back:?}");
        }
    }
}

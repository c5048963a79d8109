use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Pt2D;

/// The WGS84 equatorial radius.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

// longitude is x, latitude is y
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat {
            longitude: lon,
            latitude: lat,
        }
    }

    /// The plain average of the points, with every point weighted equally. Empty input produces
    /// NaN coordinates.
    pub fn center(pts: &[LonLat]) -> LonLat {
        let mut lon = 0.0;
        let mut lat = 0.0;
        for pt in pts {
            lon += pt.longitude;
            lat += pt.latitude;
        }
        let len = pts.len() as f64;
        LonLat {
            longitude: lon / len,
            latitude: lat / len,
        }
    }

    /// Is the point inside a closed ring of GPS points? Longitude and latitude are treated as
    /// plain x and y.
    pub fn ring_contains(ring: &[LonLat], pt: LonLat) -> bool {
        crate::even_odd_contains(
            ring.iter().map(|p| (p.longitude, p.latitude)),
            pt.longitude,
            pt.latitude,
        )
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

/// Maps GPS coordinates onto a plane tangent to the earth at some origin, in meters, with x
/// pointing east and y pointing north.
///
/// This is an equirectangular approximation. Distortion grows quickly past a few kilometers from
/// the origin, so it must not be used for large areas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalProjection {
    origin: LonLat,
    cos_origin_lat: f64,
}

impl LocalProjection {
    pub fn new(origin: LonLat) -> LocalProjection {
        LocalProjection {
            origin,
            cos_origin_lat: origin.latitude.to_radians().cos(),
        }
    }

    pub fn origin(&self) -> LonLat {
        self.origin
    }

    pub fn project(&self, gps: LonLat) -> Pt2D {
        let x = EARTH_RADIUS_M
            * (gps.longitude - self.origin.longitude).to_radians()
            * self.cos_origin_lat;
        let y = EARTH_RADIUS_M * (gps.latitude - self.origin.latitude).to_radians();
        Pt2D::new(x, y)
    }

    pub fn project_all(&self, pts: &[LonLat]) -> Vec<Pt2D> {
        pts.iter().map(|pt| self.project(*pt)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_zero() {
        let proj = LocalProjection::new(LonLat::new(13.4, 52.5));
        let pt = proj.project(LonLat::new(13.4, 52.5));
        assert_eq!(pt, Pt2D::new(0.0, 0.0));
    }

    #[test]
    fn one_degree_north_and_east() {
        let proj = LocalProjection::new(LonLat::new(0.0, 60.0));

        let north = proj.project(LonLat::new(0.0, 61.0));
        assert!(north.x().abs() < 1e-9);
        assert!((north.y() - EARTH_RADIUS_M * 1.0_f64.to_radians()).abs() < 1e-6);

        // At 60 degrees north, a degree of longitude is half as long as at the equator
        let east = proj.project(LonLat::new(1.0, 60.0));
        assert!((east.x() - 0.5 * EARTH_RADIUS_M * 1.0_f64.to_radians()).abs() < 1e-6);
        assert!(east.y().abs() < 1e-9);
    }

    #[test]
    fn center_weights_every_point() {
        let pts = vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(0.0, 0.0),
            LonLat::new(3.0, 6.0),
        ];
        assert_eq!(LonLat::center(&pts), LonLat::new(1.0, 2.0));
    }

    #[test]
    fn gps_ring_containment() {
        let square = vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(1.0, 0.0),
            LonLat::new(1.0, 1.0),
            LonLat::new(0.0, 1.0),
            LonLat::new(0.0, 0.0),
        ];
        assert!(LonLat::ring_contains(&square, LonLat::new(0.5, 0.5)));
        assert!(!LonLat::ring_contains(&square, LonLat::new(1.5, 0.5)));
        assert!(!LonLat::ring_contains(&square, LonLat::new(0.5, -0.1)));
    }
}

//! Planar geometry for building footprints: GPS and projected points, closed rings, and a local
//! tangent-plane projection that's only meant for areas a few kilometers across.

#[macro_use]
extern crate anyhow;

mod gps;
mod pt;
mod ring;

pub use crate::gps::{LocalProjection, LonLat, EARTH_RADIUS_M};
pub use crate::pt::Pt2D;
pub use crate::ring::Ring;

// Substituted for a zero Δy when casting rays, so an edge never divides by zero.
const RAY_EPSILON: f64 = 1e-12;

/// Even-odd rule: cast a horizontal ray from (x, y) and count crossings of each consecutive
/// edge. The points must already form a closed loop; the last point isn't joined back to the
/// first.
pub(crate) fn even_odd_contains<I: Iterator<Item = (f64, f64)>>(pts: I, x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut prev: Option<(f64, f64)> = None;
    for (x2, y2) in pts {
        if let Some((x1, y1)) = prev {
            if (y1 > y) != (y2 > y) {
                let mut dy = y2 - y1;
                if dy == 0.0 {
                    dy = RAY_EPSILON;
                }
                if x < (x2 - x1) * (y - y1) / dy + x1 {
                    inside = !inside;
                }
            }
        }
        prev = Some((x2, y2));
    }
    inside
}

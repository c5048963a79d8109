use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::Pt2D;

/// A closed loop of projected points, like the boundary of a building footprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    // first equals last, and there are at least 4 points
    pts: Vec<Pt2D>,
}

impl Ring {
    pub fn new(pts: Vec<Pt2D>) -> Result<Ring> {
        if pts.len() < 4 {
            bail!("Can't make a ring with only {} points", pts.len());
        }
        if pts[0] != pts[pts.len() - 1] {
            bail!("Can't make a ring with mismatching first/last points");
        }
        Ok(Ring { pts })
    }

    /// Like `new`, but appends the first point when the loop isn't already closed. There must be
    /// at least 4 points before closing.
    pub fn closing(mut pts: Vec<Pt2D>) -> Result<Ring> {
        if pts.len() < 4 {
            bail!("Can't make a ring with only {} points", pts.len());
        }
        if pts[0] != pts[pts.len() - 1] {
            pts.push(pts[0]);
        }
        Ring::new(pts)
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn into_points(self) -> Vec<Pt2D> {
        self.pts
    }

    /// Shoelace formula. Positive when the points go counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        let mut area = 0.0;
        for pair in self.pts.windows(2) {
            area += pair[0].x() * pair[1].y() - pair[1].x() * pair[0].y();
        }
        area * 0.5
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn reversed(mut self) -> Ring {
        self.pts.reverse();
        self
    }

    /// Reverses the points if needed so they wind the requested way. A degenerate ring with
    /// zero area is left alone.
    pub fn oriented(self, counter_clockwise: bool) -> Ring {
        let area = self.signed_area();
        if (counter_clockwise && area < 0.0) || (!counter_clockwise && area > 0.0) {
            self.reversed()
        } else {
            self
        }
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Ring::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

use convert_osm::{Conversion, ProjectedFeature};
use geom::{LonLat, Ring};
use osmutil::Timer;

/// Everything needed to build 3D solids: for each building, a footprint to extrude straight up
/// from some base.
#[derive(Serialize)]
pub struct Model {
    pub units: String,
    /// Every point is relative to this, with x pointing east and y north
    pub origin: LonLat,
    pub solids: Vec<Solid>,
}

#[derive(Serialize)]
pub struct Solid {
    pub name: String,
    /// The OSM object this came from, like "way/123"
    pub source: String,
    /// Counter-clockwise
    pub outer: Ring,
    /// Clockwise
    pub holes: Vec<Ring>,
    /// The footprint gets translated up by this much
    pub base_z: f64,
    pub extrusion: f64,
    pub attributes: BTreeMap<String, String>,
}

impl Model {
    pub fn build(conversion: &Conversion, timer: &mut Timer) -> Model {
        let mut solids = Vec::new();
        timer.start_iter("build solids", conversion.projected.len());
        for f in &conversion.projected {
            timer.next();
            if let Some(solid) = Solid::new(f, timer) {
                solids.push(solid);
            }
        }
        Model {
            units: "meters".to_string(),
            origin: conversion.origin,
            solids,
        }
    }
}

impl Solid {
    /// Returns None if the outer ring is unusable. Unusable holes are just skipped.
    fn new(f: &ProjectedFeature, timer: &mut Timer) -> Option<Solid> {
        let label = f.label();
        let extrusion = f.height - f.min_height;
        if extrusion <= 0.0 {
            timer.warn(format!("Skipping {}, it has no height", label));
            return None;
        }

        let outer = match Ring::closing(f.outer.clone()) {
            Ok(ring) => ring.oriented(true),
            Err(err) => {
                timer.warn(format!("Skipping {}: {}", label, err));
                return None;
            }
        };
        let mut holes = Vec::new();
        for hole in &f.holes {
            match Ring::closing(hole.clone()) {
                Ok(ring) => holes.push(ring.oriented(false)),
                Err(err) => timer.warn(format!("Skipping a hole of {}: {}", label, err)),
            }
        }

        Some(Solid {
            name: f.display_name(),
            source: label,
            outer,
            holes,
            base_z: f.min_height,
            extrusion,
            attributes: attributes(f),
        })
    }
}

/// The tags worth keeping on a solid, plus where it came from.
fn attributes(f: &ProjectedFeature) -> BTreeMap<String, String> {
    let mut attributes = f
        .tags
        .subset(|k| k.starts_with("building") || k == "height" || k == "min_height" || k == "name")
        .into_inner();
    attributes.insert("osm:id".to_string(), f.label());
    attributes
}

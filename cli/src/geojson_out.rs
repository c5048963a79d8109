use anyhow::Result;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use geom::LonLat;

/// Every footprint as a polygon in WGS84, the shell followed by its holes.
pub fn footprints(features: &[convert_osm::Feature]) -> GeoJson {
    let mut result = Vec::new();
    for f in features {
        let mut rings = vec![positions(&f.outer)];
        for hole in &f.holes {
            rings.push(positions(hole));
        }

        let mut feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(rings))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("osm_id", f.label());
        feature.set_property("height", f.height);
        feature.set_property("min_height", f.min_height);
        if let Some(name) = f.name() {
            feature.set_property("name", name.clone());
        }
        result.push(feature);
    }

    GeoJson::FeatureCollection(FeatureCollection {
        features: result,
        bbox: None,
        foreign_members: None,
    })
}

pub fn write(path: &str, features: &[convert_osm::Feature]) -> Result<()> {
    let gj = footprints(features);
    fs_err::write(path, serde_json::to_string_pretty(&gj)?)?;
    Ok(())
}

fn positions(ring: &[LonLat]) -> Vec<Vec<f64>> {
    ring.iter()
        .map(|pt| vec![pt.longitude, pt.latitude])
        .collect()
}

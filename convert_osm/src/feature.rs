use serde::Serialize;

use geom::{LocalProjection, LonLat, Pt2D};
use osmutil::Tags;

use crate::{building_height, OsmID, Options};

/// A resolved building footprint: one shell, the holes attributed to it, and how tall it is.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feature {
    /// The way or relation this came from. A relation with several shells produces several
    /// features with the same ID.
    pub osm_id: OsmID,
    pub outer: Vec<LonLat>,
    pub holes: Vec<Vec<LonLat>>,
    pub tags: Tags,
    pub height: f64,
    pub min_height: f64,
}

impl Feature {
    /// Infers the heights from the tags.
    pub fn new(
        osm_id: OsmID,
        outer: Vec<LonLat>,
        holes: Vec<Vec<LonLat>>,
        tags: Tags,
        opts: &Options,
    ) -> Feature {
        let heights = building_height(&tags, opts);
        Feature {
            osm_id,
            outer,
            holes,
            tags,
            height: heights.height,
            min_height: heights.min_height,
        }
    }

    pub fn label(&self) -> String {
        self.osm_id.to_string()
    }

    pub fn name(&self) -> Option<&String> {
        self.tags.first_of(&["name", "building:name"])
    }

    /// Every vertex of the shell, then of each hole. Closing points are repeated.
    pub fn all_points(&self) -> impl Iterator<Item = &LonLat> {
        self.outer.iter().chain(self.holes.iter().flatten())
    }

    pub fn project(&self, projection: &LocalProjection) -> ProjectedFeature {
        ProjectedFeature {
            osm_id: self.osm_id,
            outer: projection.project_all(&self.outer),
            holes: self
                .holes
                .iter()
                .map(|ring| projection.project_all(ring))
                .collect(),
            tags: self.tags.clone(),
            height: self.height,
            min_height: self.min_height,
        }
    }
}

/// A feature with every point expressed in meters relative to the origin.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectedFeature {
    pub osm_id: OsmID,
    pub outer: Vec<Pt2D>,
    pub holes: Vec<Vec<Pt2D>>,
    pub tags: Tags,
    pub height: f64,
    pub min_height: f64,
}

impl ProjectedFeature {
    pub fn label(&self) -> String {
        self.osm_id.to_string()
    }

    /// From the `name` or `building:name` tags, falling back to the OSM ID.
    pub fn display_name(&self) -> String {
        self.tags
            .first_of(&["name", "building:name"])
            .cloned()
            .unwrap_or_else(|| self.label())
    }
}

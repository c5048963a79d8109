//! Resolves the buildings in an OSM document into footprints with heights, expressed in a local
//! planar frame.
//!
//! The pipeline runs leaf-first: tag-based height inference, classifying buildings, extracting
//! closed ways, stitching multipolygon relations into rings with holes, deciding which objects
//! get emitted, and finally picking an origin and projecting everything around it.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use serde::{Deserialize, Serialize};
use structopt::StructOpt;
use thiserror::Error;

use geom::{LocalProjection, LonLat};
use osmutil::{prettyprint_usize, Timer};

pub use self::building::{is_building, Role};
pub use self::feature::{Feature, ProjectedFeature};
pub use self::height::{building_height, parse_osm_number, Heights};
pub use self::osm::{Document, Node, NodeID, OsmID, Relation, RelationID, Way, WayID};
pub use self::origin::determine_origin;

mod building;
pub mod extract;
mod feature;
mod height;
pub mod multipolygon;
mod origin;
mod osm;
pub mod osm_geom;
pub mod reader;

/// Tunes how heights are guessed for buildings that don't say.
#[derive(Clone, Debug, PartialEq, StructOpt, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Height in meters for buildings without any height or level tags
    #[structopt(long, default_value = "10.0")]
    pub default_height: f64,
    /// Height in meters of one storey, multiplied by `building:levels`
    #[structopt(long, default_value = "3.0")]
    pub level_height: f64,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            default_height: 10.0,
            level_height: 3.0,
        }
    }
}

impl Options {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("default_height", self.default_height),
            ("level_height", self.level_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} must be a positive number of meters, not {}", name, value);
            }
        }
        Ok(())
    }
}

/// The conditions that abort a whole conversion. Anything more local, like a broken way, is
/// skipped along the way instead.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("No geographic coordinates found in OSM input")]
    NoCoordinates,
    #[error("No buildings found in input")]
    NoQualifyingFeatures,
}

/// Everything resolved from one document.
#[derive(Clone, Debug, Serialize)]
pub struct Conversion {
    pub origin: LonLat,
    pub projection: LocalProjection,
    /// In emission order, still in GPS coordinates
    pub features: Vec<Feature>,
    /// The same features, in the same order, projected around the origin
    pub projected: Vec<ProjectedFeature>,
}

pub fn convert(
    doc: &Document,
    opts: &Options,
    timer: &mut Timer,
) -> Result<Conversion, ConversionError> {
    let features = extract::collect_features(doc, opts, timer);
    if features.is_empty() {
        return Err(ConversionError::NoQualifyingFeatures);
    }
    let origin = determine_origin(&features)?;
    info!(
        "Resolved {} features around {}",
        prettyprint_usize(features.len()),
        origin
    );

    let projection = LocalProjection::new(origin);
    timer.start_iter("project features", features.len());
    let mut projected = Vec::new();
    for f in &features {
        timer.next();
        projected.push(f.project(&projection));
    }

    Ok(Conversion {
        origin,
        projection,
        features,
        projected,
    })
}

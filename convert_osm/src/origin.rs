use geom::LonLat;

use crate::{ConversionError, Feature};

/// The average of every vertex of every ring of every feature. Each vertex counts once, so
/// detailed rings pull the origin towards themselves.
pub fn determine_origin(features: &[Feature]) -> Result<LonLat, ConversionError> {
    let pts: Vec<LonLat> = features.iter().flat_map(|f| f.all_points()).cloned().collect();
    if pts.is_empty() {
        return Err(ConversionError::NoCoordinates);
    }
    Ok(LonLat::center(&pts))
}

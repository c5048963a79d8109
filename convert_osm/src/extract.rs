use std::collections::BTreeSet;

use osmutil::Timer;

use crate::building::member_ways;
use crate::multipolygon::extract_relation_features;
use crate::osm_geom::extract_way_feature;
use crate::{is_building, Document, Feature, Options, Relation, RelationID, Role, WayID};

/// A multipolygon or building relation qualifies if it's a building itself, or if one of its
/// outer ways is.
pub fn relation_qualifies(rel: &Relation, doc: &Document) -> bool {
    if !rel.tags.is_any("type", &["multipolygon", "building"]) {
        return false;
    }
    if is_building(&rel.tags) {
        return true;
    }
    member_ways(rel).any(|(role, w)| {
        role == Role::Outer
            && doc
                .ways
                .get(&w)
                .map(|way| is_building(&way.tags))
                .unwrap_or(false)
    })
}

/// Finds every building in the document. Standalone ways come first in ID order, then everything
/// from relations in ID order.
///
/// Ways used as an outer or inner member of a qualifying relation are only emitted through that
/// relation, unless they're tagged `building:part`. Those parts show up both on their own and
/// inside the relation.
pub fn collect_features(doc: &Document, opts: &Options, timer: &mut Timer) -> Vec<Feature> {
    timer.start("find building relations");
    let mut relations: Vec<(RelationID, &Relation)> = Vec::new();
    let mut claimed: BTreeSet<WayID> = BTreeSet::new();
    for (id, rel) in &doc.relations {
        if relation_qualifies(rel, doc) {
            claimed.extend(member_ways(rel).map(|(_, w)| w));
            relations.push((*id, rel));
        }
    }
    timer.stop("find building relations");

    let mut features = Vec::new();

    timer.start_iter("extract building ways", doc.ways.len());
    for (id, way) in &doc.ways {
        timer.next();
        if !is_building(&way.tags) {
            continue;
        }
        if claimed.contains(id) && !way.tags.contains_key("building:part") {
            continue;
        }
        if let Some(f) = extract_way_feature(*id, way, doc, opts) {
            features.push(f);
        }
    }
    let from_ways = features.len();

    timer.start_iter("resolve building relations", relations.len());
    for (id, rel) in relations {
        timer.next();
        let resolved = extract_relation_features(id, rel, doc, opts);
        if resolved.is_empty() {
            debug!("{} didn't produce any shells", id);
        }
        features.extend(resolved);
    }

    info!(
        "Found {} buildings from ways and {} from relations",
        from_ways,
        features.len() - from_ways
    );
    features
}

//! Turns a multipolygon or building relation into features, one per outer shell.

use geom::LonLat;
use osmutil::Tags;

use crate::building::member_ways;
use crate::osm_geom::assemble_rings;
use crate::{is_building, Document, Feature, NodeID, OsmID, Options, Relation, RelationID, Role};

/// Keys copied from building member ways onto a relation that isn't tagged as a building itself.
pub fn is_inherited_key(key: &str) -> bool {
    key.starts_with("building") || key == "height" || key == "min_height"
}

/// The relation's own tags, plus whatever it inherits from its outer building ways. The first
/// member (in member order) to provide a key wins, and the relation's own values are never
/// replaced.
pub fn effective_tags(rel: &Relation, doc: &Document) -> Tags {
    let mut tags = rel.tags.clone();
    if is_building(&rel.tags) {
        return tags;
    }
    for (role, w) in member_ways(rel) {
        if role != Role::Outer {
            continue;
        }
        if let Some(way) = doc.ways.get(&w) {
            if !is_building(&way.tags) {
                continue;
            }
            for (k, v) in way.tags.iter() {
                if is_inherited_key(k) {
                    tags.insert_if_absent(k.clone(), v.clone());
                }
            }
        }
    }
    tags
}

pub fn extract_relation_features(
    id: RelationID,
    rel: &Relation,
    doc: &Document,
    opts: &Options,
) -> Vec<Feature> {
    let mut outer_fragments: Vec<Vec<NodeID>> = Vec::new();
    let mut inner_fragments: Vec<Vec<NodeID>> = Vec::new();
    for (role, member) in &rel.members {
        let w = match member {
            OsmID::Way(w) => *w,
            _ => continue,
        };
        let way = match doc.ways.get(&w) {
            Some(way) => way,
            None => {
                debug!("{} refers to missing {}", id, w);
                continue;
            }
        };
        match Role::parse(role) {
            Some(Role::Outer) => outer_fragments.push(way.nodes.clone()),
            Some(Role::Inner) => inner_fragments.push(way.nodes.clone()),
            None => {
                debug!("{} has unhandled member role {} for {}, ignoring it", id, role, w);
            }
        }
    }
    if outer_fragments.is_empty() {
        return Vec::new();
    }

    let outers = resolve_rings(id, outer_fragments, doc);
    if outers.is_empty() {
        return Vec::new();
    }
    let inners = resolve_rings(id, inner_fragments, doc);
    let inner_centers: Vec<LonLat> = inners.iter().map(|ring| LonLat::center(ring)).collect();

    let tags = effective_tags(rel, doc);
    let mut claimed = vec![false; inners.len()];
    let mut features = Vec::new();
    for outer in outers {
        // Outer rings earlier in discovery order get first pick. This is arbitrary when shells
        // overlap.
        let mut holes = Vec::new();
        for (idx, inner) in inners.iter().enumerate() {
            if !claimed[idx] && LonLat::ring_contains(&outer, inner_centers[idx]) {
                claimed[idx] = true;
                holes.push(inner.clone());
            }
        }
        features.push(Feature::new(
            OsmID::Relation(id),
            outer,
            holes,
            tags.clone(),
            opts,
        ));
    }

    let unclaimed = claimed.iter().filter(|x| !**x).count();
    if unclaimed > 0 {
        debug!(
            "{} has {} inner rings outside of every shell, dropping them",
            id, unclaimed
        );
    }

    features
}

fn resolve_rings(id: RelationID, fragments: Vec<Vec<NodeID>>, doc: &Document) -> Vec<Vec<LonLat>> {
    assemble_rings(fragments)
        .into_iter()
        .filter_map(|ring| {
            let pts = doc.resolve_pts(&ring);
            if pts.is_none() {
                debug!("Skipping a ring of {} with missing nodes", id);
            }
            pts
        })
        .collect()
}

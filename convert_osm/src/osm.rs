use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use geom::LonLat;
use osmutil::Tags;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeID(pub i64);
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WayID(pub i64);
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationID(pub i64);

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "node/{}", self.0)
    }
}
impl fmt::Display for WayID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "way/{}", self.0)
    }
}
impl fmt::Display for RelationID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "relation/{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OsmID {
    Node(NodeID),
    Way(WayID),
    Relation(RelationID),
}

impl fmt::Display for OsmID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OsmID::Node(n) => write!(f, "{}", n),
            OsmID::Way(w) => write!(f, "{}", w),
            OsmID::Relation(r) => write!(f, "{}", r),
        }
    }
}

// Downstream consumers only care about the "way/123" label
impl Serialize for OsmID {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug)]
pub struct Node {
    pub pt: LonLat,
}

#[derive(Debug)]
pub struct Way {
    /// Exactly as listed in the input. Some of these may not exist in the document.
    pub nodes: Vec<NodeID>,
    pub tags: Tags,
}

impl Way {
    /// At least 4 references, with the first repeated at the end.
    pub fn is_closed(&self) -> bool {
        self.nodes.len() >= 4 && self.nodes[0] == self.nodes[self.nodes.len() - 1]
    }
}

#[derive(Debug)]
pub struct Relation {
    pub tags: Tags,
    /// Role, member
    pub members: Vec<(String, OsmID)>,
}

/// A fully loaded OSM document. Iterating over any of the maps goes in increasing ID order, which
/// is the order features are emitted in.
#[derive(Debug, Default)]
pub struct Document {
    pub nodes: BTreeMap<NodeID, Node>,
    pub ways: BTreeMap<WayID, Way>,
    pub relations: BTreeMap<RelationID, Relation>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// Looks up the position of every node. If any are missing, returns None.
    pub fn resolve_pts(&self, nodes: &[NodeID]) -> Option<Vec<LonLat>> {
        let mut pts = Vec::with_capacity(nodes.len());
        for id in nodes {
            match self.nodes.get(id) {
                Some(node) => pts.push(node.pt),
                None => {
                    debug!("{} doesn't exist", id);
                    return None;
                }
            }
        }
        Some(pts)
    }
}

use osmutil::Tags;

use crate::{OsmID, Relation, WayID};

/// Any value of `building` or `building:part` counts, even `building=no`.
pub fn is_building(tags: &Tags) -> bool {
    tags.has_any(&["building", "building:part"])
}

/// What part of a multipolygon a member way describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Outer,
    Inner,
}

impl Role {
    /// Normalizes the synonyms mappers use. A missing role means outer. Anything unrecognized
    /// returns None, and the member should be ignored.
    pub fn parse(role: &str) -> Option<Role> {
        match role.to_lowercase().as_str() {
            "" | "outer" | "outline" | "exterior" | "shell" => Some(Role::Outer),
            "inner" | "interior" | "hole" => Some(Role::Inner),
            _ => None,
        }
    }
}

/// The way members of a relation with a recognized role, in member order. The ways might not
/// exist in the document.
pub fn member_ways(rel: &Relation) -> impl Iterator<Item = (Role, WayID)> + '_ {
    rel.members.iter().filter_map(|(role, member)| match member {
        OsmID::Way(w) => Role::parse(role).map(|role| (role, *w)),
        _ => None,
    })
}

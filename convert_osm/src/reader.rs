//! Loads OSM XML into a `Document`.

use std::str::FromStr;

use anyhow::{Context, Result};

use geom::LonLat;
use osmutil::{prettyprint_usize, Tags, Timer};

use crate::{Document, Node, NodeID, OsmID, Relation, RelationID, Way, WayID};

// References to missing objects are kept as-is. Resolving buildings deals with them later.
// Elements besides nodes, ways, and relations (like bounds) are ignored.

pub fn read(path: &str, timer: &mut Timer) -> Result<Document> {
    timer.start(format!("read {}", path));
    let raw = fs_err::read_to_string(path);
    timer.stop(format!("read {}", path));
    parse(&raw?, timer)
}

pub fn parse(raw: &str, timer: &mut Timer) -> Result<Document> {
    let tree = roxmltree::Document::parse(raw).context("parsing OSM XML")?;
    check_root_closed(raw, &tree)?;

    timer.start("scrape objects");
    let result = scrape(&tree);
    timer.stop("scrape objects");
    let doc = result?;

    info!(
        "Found {} nodes, {} ways, {} relations",
        prettyprint_usize(doc.nodes.len()),
        prettyprint_usize(doc.ways.len()),
        prettyprint_usize(doc.relations.len())
    );
    Ok(doc)
}

/// A truncated file can still parse, with the root element left open. Everything after the root
/// besides whitespace has to be the root's closing tag.
fn check_root_closed(raw: &str, tree: &roxmltree::Document) -> Result<()> {
    let root = tree.root_element();
    let end = raw.trim_end();
    let closing_tag = format!("</{}>", root.tag_name().name());
    let closed = end.ends_with(&closing_tag) || (!root.has_children() && end.ends_with("/>"));
    if !closed {
        bail!(
            "<{}> is never closed, the OSM XML is truncated",
            root.tag_name().name()
        );
    }
    Ok(())
}

fn scrape(tree: &roxmltree::Document) -> Result<Document> {
    let mut doc = Document::new();
    for obj in tree.descendants() {
        if !obj.is_element() {
            continue;
        }
        match obj.tag_name().name() {
            "node" => {
                let id = NodeID(attr(obj, "id")?);
                if doc.nodes.contains_key(&id) {
                    bail!("Duplicate {}, your .osm is corrupt", id);
                }
                let pt = LonLat::new(attr(obj, "lon")?, attr(obj, "lat")?);
                doc.nodes.insert(id, Node { pt });
            }
            "way" => {
                let id = WayID(attr(obj, "id")?);
                if doc.ways.contains_key(&id) {
                    bail!("Duplicate {}, your .osm is corrupt", id);
                }
                let tags = read_tags(obj)?;
                let mut nodes = Vec::new();
                for child in obj.children() {
                    if child.tag_name().name() == "nd" {
                        nodes.push(NodeID(attr(child, "ref")?));
                    }
                }
                doc.ways.insert(id, Way { nodes, tags });
            }
            "relation" => {
                let id = RelationID(attr(obj, "id")?);
                if doc.relations.contains_key(&id) {
                    bail!("Duplicate {}, your .osm is corrupt", id);
                }
                let tags = read_tags(obj)?;
                let mut members = Vec::new();
                for child in obj.children() {
                    if child.tag_name().name() != "member" {
                        continue;
                    }
                    let member = match attr::<String>(child, "type")?.as_str() {
                        "node" => OsmID::Node(NodeID(attr(child, "ref")?)),
                        "way" => OsmID::Way(WayID(attr(child, "ref")?)),
                        "relation" => OsmID::Relation(RelationID(attr(child, "ref")?)),
                        x => {
                            debug!("{} has a member of unknown type {}, skipping it", id, x);
                            continue;
                        }
                    };
                    let role = child.attribute("role").unwrap_or("").to_string();
                    members.push((role, member));
                }
                doc.relations.insert(id, Relation { tags, members });
            }
            _ => {}
        }
    }
    Ok(doc)
}

fn read_tags(obj: roxmltree::Node) -> Result<Tags> {
    let mut tags = Tags::empty();
    for child in obj.children() {
        if child.tag_name().name() == "tag" {
            let key: String = attr(child, "k")?;
            let value: String = attr(child, "v")?;
            tags.insert(key, value);
        }
    }
    Ok(tags)
}

/// Parses a required attribute, describing the element when it's missing or malformed.
fn attr<T: FromStr>(obj: roxmltree::Node, key: &str) -> Result<T> {
    let describe = || match obj.attribute("id") {
        Some(id) => format!("<{} id={}>", obj.tag_name().name(), id),
        None => format!("<{}>", obj.tag_name().name()),
    };
    let value = obj
        .attribute(key)
        .ok_or_else(|| anyhow!("{} is missing {}", describe(), key))?;
    value
        .parse::<T>()
        .map_err(|_| anyhow!("{} has a bad {}={}", describe(), key, value))
}

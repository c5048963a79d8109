//! Utilities for extracting concrete geometry from OSM objects.

use crate::{Document, Feature, NodeID, OsmID, Options, Way, WayID};

/// A closed way becomes one feature whose shell is exactly the way's points. Ways that aren't
/// closed or reference missing nodes are skipped.
pub fn extract_way_feature(
    id: WayID,
    way: &Way,
    doc: &Document,
    opts: &Options,
) -> Option<Feature> {
    if !way.is_closed() {
        debug!("Skipping {}, it isn't a closed ring", id);
        return None;
    }
    let outer = match doc.resolve_pts(&way.nodes) {
        Some(pts) => pts,
        None => {
            debug!("Skipping {}, it references missing nodes", id);
            return None;
        }
    };
    Some(Feature::new(
        OsmID::Way(id),
        outer,
        Vec::new(),
        way.tags.clone(),
        opts,
    ))
}

#[derive(Debug)]
enum Join {
    Append,
    AppendReversed,
    Prepend,
    PrependReversed,
}

/// Glues way fragments that share endpoints into closed rings, regardless of the order or
/// direction of the fragments.
///
/// Fragments are popped off the end of the list to seed each ring, then the remaining ones are
/// scanned in order for something that continues the ring, trying the trailing end before the
/// leading one. When nothing fits, the ring is closed by repeating its first node. Fragments with
/// fewer than 2 nodes are ignored.
pub fn assemble_rings(fragments: Vec<Vec<NodeID>>) -> Vec<Vec<NodeID>> {
    let mut pool: Vec<Vec<NodeID>> = fragments.into_iter().filter(|f| f.len() >= 2).collect();
    let mut rings = Vec::new();

    while let Some(mut ring) = pool.pop() {
        while !is_closed(&ring) && !pool.is_empty() {
            let lead = ring[0];
            let trail = ring[ring.len() - 1];
            let found = pool.iter().enumerate().find_map(|(idx, frag)| {
                let head = frag[0];
                let tail = frag[frag.len() - 1];
                let join = if head == trail {
                    Join::Append
                } else if tail == trail {
                    Join::AppendReversed
                } else if tail == lead {
                    Join::Prepend
                } else if head == lead {
                    Join::PrependReversed
                } else {
                    return None;
                };
                Some((idx, join))
            });
            let (idx, join) = match found {
                Some(pair) => pair,
                None => break,
            };

            // The shared node is only kept once
            let frag = pool.remove(idx);
            let n = frag.len();
            match join {
                Join::Append => {
                    ring.extend_from_slice(&frag[1..]);
                }
                Join::AppendReversed => {
                    ring.extend(frag[..n - 1].iter().rev());
                }
                Join::Prepend => {
                    let mut joined = frag[..n - 1].to_vec();
                    joined.append(&mut ring);
                    ring = joined;
                }
                Join::PrependReversed => {
                    let mut joined: Vec<NodeID> = frag[1..].iter().rev().cloned().collect();
                    joined.append(&mut ring);
                    ring = joined;
                }
            }
        }

        if !is_closed(&ring) {
            debug!(
                "Ring starting at {} couldn't be completed, closing it directly",
                ring[0]
            );
            ring.push(ring[0]);
        }
        rings.push(ring);
    }

    rings
}

fn is_closed(ring: &[NodeID]) -> bool {
    ring[0] == ring[ring.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<NodeID> {
        raw.iter().cloned().map(NodeID).collect()
    }

    // Is the ring a closed loop visiting exactly these nodes in order, in either direction and
    // starting anywhere?
    fn same_cycle(ring: &[NodeID], expected: &[i64]) -> bool {
        if ring.len() != expected.len() + 1 || !is_closed(ring) {
            return false;
        }
        let open = &ring[..ring.len() - 1];
        let n = expected.len();
        let forwards: Vec<NodeID> = ids(expected);
        let mut backwards = forwards.clone();
        backwards.reverse();
        (0..n).any(|offset| {
            (0..n).all(|i| open[(i + offset) % n] == forwards[i])
                || (0..n).all(|i| open[(i + offset) % n] == backwards[i])
        })
    }

    #[test]
    fn order_and_direction_dont_matter() {
        let (a, b, c) = (1, 2, 3);
        let fragments = [vec![a, b], vec![c, a], vec![b, c]];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            for flips in 0..8 {
                let input: Vec<Vec<NodeID>> = order
                    .iter()
                    .enumerate()
                    .map(|(i, idx)| {
                        let mut frag = fragments[*idx].clone();
                        if flips & (1 << i) != 0 {
                            frag.reverse();
                        }
                        ids(&frag)
                    })
                    .collect();
                let rings = assemble_rings(input.clone());
                assert_eq!(rings.len(), 1, "for {:?}", input);
                assert!(same_cycle(&rings[0], &[a, b, c]), "got {:?}", rings[0]);
            }
        }
    }

    #[test]
    fn exact_join_order() {
        // Seeded with [2, 3]. [1, 2] prepends, then [3, 1] appends.
        let rings = assemble_rings(vec![ids(&[1, 2]), ids(&[3, 1]), ids(&[2, 3])]);
        assert_eq!(rings, vec![ids(&[1, 2, 3, 1])]);

        // Seeded with [3, 4]. [3, 2] comes first in the scan and gets prepended reversed, then
        // [2, 1] the same way, and [4, 5, 1] closes the loop.
        let rings = assemble_rings(vec![
            ids(&[3, 2]),
            ids(&[2, 1]),
            ids(&[4, 5, 1]),
            ids(&[3, 4]),
        ]);
        assert_eq!(rings, vec![ids(&[1, 2, 3, 4, 5, 1])]);

        // Seeded with [1, 2]. [3, 2] shares the trailing end, so it's appended reversed.
        let rings = assemble_rings(vec![ids(&[3, 2]), ids(&[1, 2])]);
        assert_eq!(rings, vec![ids(&[1, 2, 3, 1])]);
    }

    #[test]
    fn closed_fragments_stay_separate() {
        let rings = assemble_rings(vec![ids(&[1, 2, 3, 1]), ids(&[4, 5, 6, 4])]);
        // Popped from the end
        assert_eq!(rings, vec![ids(&[4, 5, 6, 4]), ids(&[1, 2, 3, 1])]);
    }

    #[test]
    fn incomplete_rings_are_forced_closed() {
        let rings = assemble_rings(vec![ids(&[1, 2]), ids(&[2, 3])]);
        assert_eq!(rings, vec![ids(&[1, 2, 3, 1])]);

        // Nothing connects, so each fragment closes on its own
        let rings = assemble_rings(vec![ids(&[1, 2, 3]), ids(&[7, 8, 9])]);
        assert_eq!(rings, vec![ids(&[7, 8, 9, 7]), ids(&[1, 2, 3, 1])]);
    }

    #[test]
    fn degenerate_fragments_are_ignored() {
        assert!(assemble_rings(vec![ids(&[1]), Vec::new()]).is_empty());
        assert!(assemble_rings(Vec::new()).is_empty());
    }
}

//! Path smoothing (AKA string pulling): removing waypoints that a straight
//! walk can skip without entering a blocked cell.

use crate::{
    geometry::Point2,
    hex::{Hex, HexSet},
};
use log::trace;

/// One point along a path, along with the hex that it falls in
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub point: Point2,
    pub hex: Hex,
}

#[derive(Copy, Clone, Debug)]
struct Node {
    waypoint: Waypoint,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A doubly-linked list of waypoints, backed by a `Vec`. Removed nodes stay
/// in the backing storage but are unlinked, so removal is O(1) and indexes
/// stay stable for the life of the list.
#[derive(Clone, Debug, Default)]
pub struct WaypointList {
    nodes: Vec<Node>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl WaypointList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, waypoint: Waypoint) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            waypoint,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
        index
    }

    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn next(&self, index: usize) -> Option<usize> {
        self.nodes.get(index).and_then(|node| node.next)
    }

    pub fn prev(&self, index: usize) -> Option<usize> {
        self.nodes.get(index).and_then(|node| node.prev)
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.nodes.get(index).map(|node| &node.waypoint)
    }

    /// Unlink a node from the list. The node's neighbors get linked to each
    /// other. Removing an index that isn't linked does nothing.
    pub fn remove(&mut self, index: usize) -> Option<Waypoint> {
        let node = *self.nodes.get(index)?;
        let linked = node.prev.is_some()
            || node.next.is_some()
            || self.head == Some(index);
        if !linked {
            return None;
        }

        match node.prev {
            Some(prev) => self.nodes[prev].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes[next].prev = node.prev,
            None => self.tail = node.prev,
        }
        self.nodes[index].prev = None;
        self.nodes[index].next = None;
        self.len -= 1;
        Some(node.waypoint)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over the linked waypoints, front to back
    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let index = cursor?;
            cursor = self.nodes[index].next;
            Some(&self.nodes[index].waypoint)
        })
    }

    pub fn points(&self) -> Vec<Point2> {
        self.iter().map(|waypoint| waypoint.point).collect()
    }
}

impl FromIterator<Waypoint> for WaypointList {
    fn from_iter<I: IntoIterator<Item = Waypoint>>(iter: I) -> Self {
        let mut list = Self::new();
        for waypoint in iter {
            list.push_back(waypoint);
        }
        list
    }
}

/// Can a straight line be walked between the two hexes without entering a
/// blocked one? Both endpoints count, so a blocked endpoint means no.
pub fn has_line_of_sight(from: Hex, to: Hex, blocked: &HexSet) -> bool {
    from.line_to(to).iter().all(|hex| !blocked.contains(hex))
}

/// Pull a path taut. Walks a window of three waypoints (source, candidate,
/// target) down the list. Whenever the source can see the target directly,
/// the candidate is redundant and gets removed. Otherwise the window slides
/// forward. The first and last waypoints are never removed.
///
/// This is greedy, so the result isn't necessarily the shortest possible
/// path, but every pair of adjacent waypoints has line of sight (assuming
/// the input came from a valid search).
pub fn smooth(mut waypoints: WaypointList, blocked: &HexSet) -> WaypointList {
    let before = waypoints.len();
    let mut source = match waypoints.head() {
        Some(source) => source,
        None => return waypoints,
    };
    let mut candidate = match waypoints.next(source) {
        Some(candidate) => candidate,
        None => return waypoints,
    };

    while let Some(target) = waypoints.next(candidate) {
        // Indexes from the list are always valid
        let (source_hex, target_hex) = match (
            waypoints.get(source),
            waypoints.get(target),
        ) {
            (Some(source), Some(target)) => (source.hex, target.hex),
            _ => break,
        };

        if has_line_of_sight(source_hex, target_hex, blocked) {
            waypoints.remove(candidate);
        } else {
            source = candidate;
        }
        candidate = target;
    }

    trace!("Smoothed path from {} to {} waypoints", before, waypoints.len());
    waypoints
}

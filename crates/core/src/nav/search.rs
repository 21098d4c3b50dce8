//! A* search over the hex grid, with blocked cells excluded entirely.

use crate::{
    hex::{Hex, HexIndexSet, HexMap, HexSet, RectangleMap},
    timed,
};
use log::{debug, trace};
use std::collections::{BTreeMap, VecDeque};

/// A min-priority queue of hexes. Hexes with equal priority come out in the
/// order they went in, which keeps searches deterministic.
#[derive(Clone, Debug, Default)]
pub struct BucketQueue {
    buckets: BTreeMap<u32, VecDeque<Hex>>,
    len: usize,
}

impl BucketQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hex: Hex, priority: u32) {
        self.buckets.entry(priority).or_default().push_back(hex);
        self.len += 1;
    }

    /// Remove the oldest hex from the lowest-priority bucket
    pub fn pop(&mut self) -> Option<(Hex, u32)> {
        let (&priority, bucket) = self.buckets.iter_mut().next()?;
        let hex = bucket.pop_front();
        if bucket.is_empty() {
            self.buckets.remove(&priority);
        }
        self.len -= 1;
        hex.map(|hex| (hex, priority))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Hooks into the inner loop of [astar], for debug visualization. Both
/// methods default to doing nothing.
pub trait SearchObserver {
    /// Called each time a hex is popped off the frontier
    fn hex_tested(&mut self, _hex: Hex) {}

    /// Called once for each hex in the final path, in path order
    fn hex_in_path(&mut self, _hex: Hex) {}
}

impl SearchObserver for () {}

/// A [SearchObserver] that just remembers everything it's told
#[derive(Clone, Debug, Default)]
pub struct SearchTrace {
    /// Every hex popped off the frontier, in the order they were popped
    pub tested: HexIndexSet,
    pub in_path: Vec<Hex>,
}

impl SearchObserver for SearchTrace {
    fn hex_tested(&mut self, hex: Hex) {
        self.tested.insert(hex);
    }

    fn hex_in_path(&mut self, hex: Hex) {
        self.in_path.push(hex);
    }
}

/// Find the shortest path from `start` to `destination`, moving one cell at a
/// time. Cells in `blocked`, and cells outside `map`, are never entered. The
/// start cell itself is allowed to be blocked.
///
/// Returns the path from start to destination, **excluding** `start` and
/// including `destination`, or `None` if there is no path. If the two are
/// the same hex, the path is empty.
pub fn astar(
    map: &RectangleMap,
    blocked: &HexSet,
    start: Hex,
    destination: Hex,
    observer: &mut impl SearchObserver,
) -> Option<Vec<Hex>> {
    if blocked.contains(&destination) || !map.contains(destination) {
        debug!("Destination {} is unreachable, skipping search", destination);
        return None;
    }

    let path = timed!(
        "Path search",
        log::Level::Trace,
        search(map, blocked, start, destination, observer)
    );
    match &path {
        Some(path) => {
            debug!(
                "Found path {} -> {} with {} steps",
                start,
                destination,
                path.len()
            );
            for &hex in path {
                observer.hex_in_path(hex);
            }
        }
        None => debug!("No path {} -> {}", start, destination),
    }
    path
}

fn search(
    map: &RectangleMap,
    blocked: &HexSet,
    start: Hex,
    destination: Hex,
    observer: &mut impl SearchObserver,
) -> Option<Vec<Hex>> {
    let mut frontier = BucketQueue::new();
    let mut came_from: HexMap<Hex> = HexMap::default();
    let mut cost_so_far: HexMap<u32> = HexMap::default();

    frontier.push(start, 0);
    came_from.insert(start, start);
    cost_so_far.insert(start, 0);

    while let Some((current, priority)) = frontier.pop() {
        let current_cost = cost_so_far[&current];
        // A cheaper route to this hex was found after this entry was queued,
        // so it's already been (or will be) expanded from the better entry
        if priority > current_cost + heuristic(current, destination) {
            continue;
        }
        observer.hex_tested(current);

        if current == destination {
            return Some(reconstruct(&came_from, start, destination));
        }

        for next in current.neighbors() {
            if blocked.contains(&next) || !map.contains(next) {
                continue;
            }
            let new_cost = current_cost + 1;
            let improved = cost_so_far
                .get(&next)
                .map_or(true, |&old_cost| new_cost < old_cost);
            if improved {
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, current);
                frontier.push(next, new_cost + heuristic(next, destination));
            }
        }
    }

    trace!("Frontier exhausted after {} hexes", cost_so_far.len());
    None
}

/// Admissible under unit step costs, since every step changes the hex
/// distance by at most one
fn heuristic(hex: Hex, destination: Hex) -> u32 {
    hex.distance_to(destination) as u32
}

/// Walk backwards along `came_from` from the destination to the start. The
/// start's entry points to itself, which marks the end of the walk.
fn reconstruct(
    came_from: &HexMap<Hex>,
    start: Hex,
    destination: Hex,
) -> Vec<Hex> {
    let mut path = Vec::new();
    let mut current = destination;
    while current != start {
        path.push(current);
        current = came_from[&current];
    }
    path.reverse();
    path
}

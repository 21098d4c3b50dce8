//! Navigation over a hex grid: turning obstacles into blocked cells, and
//! finding (and optionally smoothing) paths between world positions.

mod follow;
pub mod rasterize;
pub mod search;
pub mod smooth;

pub use follow::PathFollower;
pub use rasterize::ObstacleBox;
pub use search::{SearchObserver, SearchTrace};
pub use smooth::{Waypoint, WaypointList};

use crate::{
    config::NavConfig,
    geometry::Point2,
    hex::{Hex, HexSet, RectangleMap},
};
use anyhow::Context;
use log::{debug, info, warn};
use validator::Validate;

/// A navigable area. This is a [RectangleMap] plus the set of cells inside it
/// that are blocked by obstacles. Obstacles can be added but never removed.
#[derive(Clone, Debug)]
pub struct NavMesh {
    config: NavConfig,
    map: RectangleMap,
    blocked: HexSet,
}

impl NavMesh {
    /// Build a new mesh with no obstacles. Returns an error if the config is
    /// invalid. The underlying error will be a [validator::ValidationErrors].
    pub fn new(config: NavConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid config")?;
        let map = RectangleMap::from_config(&config);
        info!(
            "Built nav mesh with {} cells (cell size {})",
            map.len(),
            config.cell_size()
        );
        Ok(Self {
            config,
            map,
            blocked: HexSet::default(),
        })
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn map(&self) -> &RectangleMap {
        &self.map
    }

    pub fn blocked(&self) -> &HexSet {
        &self.blocked
    }

    pub fn is_blocked(&self, hex: Hex) -> bool {
        self.blocked.contains(&hex)
    }

    /// Block every cell along the border of the obstacle. Adding the same
    /// obstacle twice has no additional effect. Obstacles that aren't finite,
    /// or that reach too far out to be mapped onto the grid, are skipped.
    pub fn add_obstacle(&mut self, obstacle: &ObstacleBox) {
        let layout = self.map.layout();
        let usable = obstacle
            .rect()
            .corners()
            .iter()
            .all(|&corner| layout.checked_hex_at(corner).is_some());
        if !usable {
            warn!("Ignoring obstacle {}, it's off the grid", obstacle);
            return;
        }

        let hexes = rasterize::box_to_hexes(obstacle, layout);
        debug!("Adding obstacle {} ({} hexes)", obstacle, hexes.len());
        self.blocked.extend(hexes);
    }

    /// Find a cell-by-cell path between two world positions. See
    /// [search::astar] for the exact shape of the output. Positions that
    /// aren't finite, or are too far out to be mapped onto the grid, have no
    /// path.
    pub fn find_hex_path(
        &self,
        start: Point2,
        destination: Point2,
    ) -> Option<Vec<Hex>> {
        self.find_hex_path_traced(start, destination, &mut ())
    }

    /// Find a path between two world positions, as a list of points to walk
    /// through in order. The list starts at `start` and ends at
    /// `destination` exactly; everything in between is a cell center. Returns
    /// `None` if the destination can't be reached.
    pub fn find_path(
        &self,
        start: Point2,
        destination: Point2,
    ) -> Option<Vec<Point2>> {
        self.find_path_traced(start, destination, &mut ())
    }

    /// Same as [Self::find_path], but reports search progress to an observer
    pub fn find_path_traced(
        &self,
        start: Point2,
        destination: Point2,
        observer: &mut impl SearchObserver,
    ) -> Option<Vec<Point2>> {
        let hex_path = self.find_hex_path_traced(start, destination, observer)?;
        let layout = self.map.layout();

        let mut waypoints = WaypointList::new();
        waypoints.push_back(Waypoint {
            point: start,
            hex: layout.hex_at(start),
        });
        // The last hex gets replaced by the exact destination
        if let Some((_, intermediate)) = hex_path.split_last() {
            for &hex in intermediate {
                waypoints.push_back(Waypoint {
                    point: layout.hex_to_pixel(hex),
                    hex,
                });
            }
        }
        waypoints.push_back(Waypoint {
            point: destination,
            hex: layout.hex_at(destination),
        });

        let waypoints = if self.config.smooth_paths {
            smooth::smooth(waypoints, &self.blocked)
        } else {
            waypoints
        };
        Some(waypoints.points())
    }

    fn find_hex_path_traced(
        &self,
        start: Point2,
        destination: Point2,
        observer: &mut impl SearchObserver,
    ) -> Option<Vec<Hex>> {
        let start_hex = self.locate(start)?;
        let destination_hex = self.locate(destination)?;
        search::astar(
            &self.map,
            &self.blocked,
            start_hex,
            destination_hex,
            observer,
        )
    }

    /// Get the hex containing a query position, if it has one
    fn locate(&self, point: Point2) -> Option<Hex> {
        let hex = self.map.layout().checked_hex_at(point);
        if hex.is_none() {
            warn!("Position {} can't be placed on the grid, no path", point);
        }
        hex
    }
}

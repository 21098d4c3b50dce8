use crate::geometry::Point2;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration that defines a navigation mesh: the world-space rectangle it
/// covers and how finely that rectangle is divided into hexes. Two meshes
/// built from the same config (and given the same obstacles) will always
/// answer path queries identically.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NavConfig {
    /// Full width of the navigable rectangle, in world units. Zero, negative
    /// or non-finite values are allowed, but produce an empty map.
    pub width: f64,

    /// Full height of the navigable rectangle, in world units. Same rules as
    /// `width`.
    pub height: f64,

    /// World position of the rectangle's center. This is also the center of
    /// the hex at `(0, 0, 0)`.
    pub origin: Point2,

    /// Multiplier on `world_to_grid_ratio` that shrinks (or grows) cells
    /// relative to world units. Must be positive.
    #[validate(range(min = 1e-9))]
    pub cell_size_factor: f64,

    /// Number of world units per unit of grid space. Must be positive.
    #[validate(range(min = 1e-9))]
    pub world_to_grid_ratio: f64,

    /// Should [NavMesh::find_path](crate::NavMesh::find_path) pull the
    /// waypoint list taut, removing waypoints that can be skipped without
    /// crossing a blocked cell?
    pub smooth_paths: bool,
}

impl NavConfig {
    /// Distance from a cell's center to each of its corners, in world units
    pub fn cell_size(&self) -> f64 {
        self.cell_size_factor * self.world_to_grid_ratio
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            origin: Point2::ORIGIN,
            cell_size_factor: 1.0,
            world_to_grid_ratio: 1.0,
            smooth_paths: true,
        }
    }
}

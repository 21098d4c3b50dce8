//! Hexnav is a hex grid-based navigation system for 2D worlds. It covers two
//! independent problems:
//!
//! - **Pathfinding**: a rectangular world is divided into pointy-top hexes.
//!   Box obstacles block the cells along their border, and paths between
//!   world positions are found with A* and then pulled taut. See [NavMesh].
//! - **Visibility**: given a light (or viewer) position and a set of
//!   occluders, compute the polygon of everything that can be seen. See
//!   [VisibilityComputer].
//!
//! ```
//! use hexnav::{NavConfig, NavMesh, ObstacleBox, Point2};
//!
//! let mut mesh = NavMesh::new(NavConfig::default()).unwrap();
//! mesh.add_obstacle(&ObstacleBox::new(
//!     Point2::new(10.0, 0.0),
//!     Point2::new(4.0, 20.0),
//! ));
//! let path = mesh
//!     .find_path(Point2::new(0.0, 0.0), Point2::new(20.0, 0.0))
//!     .unwrap();
//! println!("{:?}", path);
//! ```
//!
//! Neither system holds any timing state, so it's up to the caller to decide
//! when to query. See [NavConfig] for details on how the nav mesh can be
//! customized.

mod config;
pub mod geometry;
pub mod hex;
pub mod nav;
mod util;
pub mod visibility;

pub use crate::{
    config::NavConfig,
    geometry::{Point2, Rect},
    hex::{Hex, HexDirection, Layout, RectangleMap},
    nav::{NavMesh, ObstacleBox, PathFollower, SearchObserver, SearchTrace},
    visibility::{visibility_polygon, Occluder, VisibilityComputer},
};

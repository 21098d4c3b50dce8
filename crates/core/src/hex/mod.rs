//! This module holds basic types and data structures related to hexagon grids.
//!
//! ## Coordinate Systems
//!
//! There are two coordinate systems in play, and most of the interesting code
//! in this crate is about converting between them.
//!
//! ### Hex Coordinates
//!
//! Hex coordinates identify cells in the grid. The system we use is the [cube
//! coordinate system defined by Amit Patel](https://www.redblobgames.com/grids/hexagons/#coordinates-cube).
//!
//! Each coordinate has three components (`q`, `r`, and `s`). **For any cell,
//! all three components are integers and `q + r + s = 0`.** Even though the
//! grid is two-dimensional, the third component makes distances, lines and
//! rounding much simpler. See [Hex] for how we store these.
//!
//! Neighbors are numbered counter-clockwise starting from east. See
//! [HexDirection].
//!
//! ### World Coordinates
//!
//! World coordinates are plain 2D points ([Point2](crate::Point2)), with
//! **y pointing up**. A [Layout] maps between the two systems. Cells are
//! always pointy-top, meaning each hex has a corner straight up and one
//! straight down, and rows of hexes run east-west. Increasing `r` moves a row
//! north.
//!
//! ```text
//!            / \     / \
//!          /     \ /     \
//!         | -1,1  |  0,1  |
//!         |       |       |
//!        / \     / \     / \
//!      /     \ /     \ /     \
//!     | -1,0  |  0,0  |  1,0  |
//!     |       |       |       |
//!      \     / \     / \     /
//!        \ /     \ /     \ /
//!         |  0,-1 | 1,-1  |
//!         |       |       |
//!          \     / \     /
//!            \ /     \ /
//! ```
//!
//! (Labels are `q,r`.)

mod data_structure;
mod layout;
mod map;
mod unit;

pub use data_structure::*;
pub use layout::*;
pub use map::*;
pub use unit::*;

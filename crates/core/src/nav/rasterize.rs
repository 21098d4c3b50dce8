//! Converting world-space obstacles into the set of hexes they block.

use crate::{
    geometry::{Point2, Rect},
    hex::{Hex, HexCorner, HexSet, Layout},
};
use derive_more::Display;
use log::trace;
use serde::{Deserialize, Serialize};

/// Distance past a cell's extreme corner that a scan steps, so the sampled
/// point lands unambiguously in the next cell
const SCAN_NUDGE: f64 = 1e-4;

/// An axis-aligned box obstacle in world space
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display(fmt = "{} [{}x{}]", center, "size.x", "size.y")]
pub struct ObstacleBox {
    pub center: Point2,
    /// Full width (`x`) and height (`y`)
    pub size: Point2,
}

impl ObstacleBox {
    pub fn new(center: Point2, size: Point2) -> Self {
        Self { center, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.center, self.size.x, self.size.y)
    }
}

/// Get every hex along the vertical line from `top` down to `bottom`. Both
/// endpoint hexes are always included. The line is walked one cell at a time
/// by sampling just below the bottom corner of the current cell, so each
/// step is guaranteed to leave the current cell.
pub fn vertical_line_hexes(
    top: Point2,
    bottom: Point2,
    layout: &Layout,
) -> Vec<Hex> {
    let top_hex = layout.hex_at(top);
    let bottom_hex = layout.hex_at(bottom);
    let down_offset = layout.hex_corner_offset(HexCorner::Down);

    let mut hexes = vec![top_hex];
    let mut current = top_hex;
    let mut point = top;
    while current != bottom_hex {
        point.y = layout.hex_to_pixel(current).y + down_offset.y - SCAN_NUDGE;
        // Stepped past the end of the line without hitting the bottom hex
        if point.y < bottom.y || !point.y.is_finite() {
            break;
        }
        current = layout.hex_at(point);
        hexes.push(current);
    }

    if !hexes.contains(&bottom_hex) {
        hexes.push(bottom_hex);
    }
    hexes
}

/// Get every hex along the horizontal line from `right` over to `left`. Both
/// endpoint hexes are always included. Works the same as
/// [vertical_line_hexes], but steps past the leftmost extent of each cell.
pub fn horizontal_line_hexes(
    right: Point2,
    left: Point2,
    layout: &Layout,
) -> Vec<Hex> {
    let right_hex = layout.hex_at(right);
    let left_hex = layout.hex_at(left);
    let left_offset = layout.hex_corner_offset(HexCorner::LeftUp);

    let mut hexes = vec![right_hex];
    let mut current = right_hex;
    let mut point = right;
    while current != left_hex {
        point.x = layout.hex_to_pixel(current).x + left_offset.x - SCAN_NUDGE;
        if point.x < left.x || !point.x.is_finite() {
            break;
        }
        current = layout.hex_at(point);
        hexes.push(current);
    }

    if !hexes.contains(&left_hex) {
        hexes.push(left_hex);
    }
    hexes
}

/// Rasterize the border of a box into hexes. Only the four edges are traced,
/// so the interior of a box that's wider than a couple cells is NOT included.
pub fn box_to_hexes(obstacle: &ObstacleBox, layout: &Layout) -> HexSet {
    let [top_left, top_right, bottom_right, bottom_left] =
        obstacle.rect().corners();

    let mut hexes = HexSet::default();
    hexes.extend(vertical_line_hexes(top_left, bottom_left, layout));
    hexes.extend(vertical_line_hexes(top_right, bottom_right, layout));
    hexes.extend(horizontal_line_hexes(top_right, top_left, layout));
    hexes.extend(horizontal_line_hexes(bottom_right, bottom_left, layout));
    trace!("Obstacle {} covers {} hexes", obstacle, hexes.len());
    hexes
}

use crate::{
    config::NavConfig,
    geometry::{Point2, Rect},
    hex::{Hex, HexIndexSet, Layout},
    timed,
};
use log::{debug, warn};

/// The finite set of hexes whose centers fall inside a world-space rectangle.
/// This is the domain that every navigation query runs over: a hex that isn't
/// in the map can't be part of a path.
#[derive(Clone, Debug)]
pub struct RectangleMap {
    layout: Layout,
    bounds: Rect,
    /// Ordered by row (`r`), then by `q` within each row
    cells: HexIndexSet,
}

impl RectangleMap {
    /// Enumerate every hex whose center lies inside `bounds` (inclusive).
    /// Degenerate bounds (no area, or non-finite) produce an empty map.
    pub fn new(bounds: Rect, layout: Layout) -> Self {
        let cells = timed!("Map generation", scan_cells(bounds, &layout));
        debug!("Generated map with {} cells over {}", cells.len(), bounds);
        Self {
            layout,
            bounds,
            cells,
        }
    }

    /// Build the map described by a nav config. The rectangle is centered on
    /// the config origin, which is also the center of [Hex::ORIGIN].
    pub fn from_config(config: &NavConfig) -> Self {
        let bounds =
            Rect::from_center(config.origin, config.width, config.height);
        let cell_size = config.cell_size();
        let layout =
            Layout::pointy(Point2::new(cell_size, cell_size), config.origin);
        Self::new(bounds, layout)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn cells(&self) -> &HexIndexSet {
        &self.cells
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.cells.contains(&hex)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get the hex containing a world position. The returned hex is NOT
    /// necessarily in the map; check with [Self::contains].
    pub fn hex_at(&self, point: Point2) -> Hex {
        self.layout.hex_at(point)
    }
}

fn scan_cells(bounds: Rect, layout: &Layout) -> HexIndexSet {
    let mut cells = HexIndexSet::default();
    if bounds.is_degenerate() {
        warn!("Map bounds {} are degenerate, map will be empty", bounds);
        return cells;
    }
    if !(layout.size.is_finite() && layout.size.x > 0.0 && layout.size.y > 0.0)
    {
        warn!("Cell size {} is invalid, map will be empty", layout.size);
        return cells;
    }

    // Find the range of q/r covered by the corners, then pad by one cell on
    // each side so that hexes straddling the border get considered
    let corners = bounds.corners().map(|corner| layout.pixel_to_hex(corner));
    let (mut min_q, mut max_q) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_r, mut max_r) = (f64::INFINITY, f64::NEG_INFINITY);
    for corner in &corners {
        min_q = min_q.min(corner.q);
        max_q = max_q.max(corner.q);
        min_r = min_r.min(corner.r);
        max_r = max_r.max(corner.r);
    }
    let q_range = (min_q.floor() as i32 - 1)..=(max_q.ceil() as i32 + 1);
    let r_range = (min_r.floor() as i32 - 1)..=(max_r.ceil() as i32 + 1);

    for r in r_range {
        for q in q_range.clone() {
            let hex = Hex::new_qr(q, r);
            if bounds.contains(layout.hex_to_pixel(hex)) {
                cells.insert(hex);
            }
        }
    }
    cells
}

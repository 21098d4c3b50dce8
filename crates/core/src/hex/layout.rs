use crate::{
    geometry::Point2,
    hex::{FractionalHex, Hex},
};
use nalgebra::{Matrix2, Vector2};
use std::f64::consts::PI;

/// sqrt(3), which shows up all over hexagon math
const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// The shape of a hex grid's cells in continuous space. This is a pair of
/// matrices that convert between `(q, r)` and `(x, y)`, plus the angle of the
/// first corner (as a multiple of 60°).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orientation {
    /// `(q, r) -> (x, y)`, before scaling by cell size
    pub forward: Matrix2<f64>,
    /// `(x, y) -> (q, r)`, after dividing out cell size. This must be the
    /// inverse of `forward`.
    pub inverse: Matrix2<f64>,
    /// Angle of corner 0, in units of 60°
    pub start_angle: f64,
}

impl Orientation {
    /// Pointy-top hexes: each cell has a corner straight up and straight down,
    /// and flat sides to the east and west.
    pub fn pointy() -> Self {
        Self {
            forward: Matrix2::new(SQRT_3, SQRT_3 / 2.0, 0.0, 3.0 / 2.0),
            inverse: Matrix2::new(SQRT_3 / 3.0, -1.0 / 3.0, 0.0, 2.0 / 3.0),
            start_angle: 0.5,
        }
    }
}

/// The 6 corners of a pointy-top hex, in counter-clockwise order starting
/// from the upper right. The discriminant is the corner's index, so corner
/// `i` sits at `60°·i + 30°`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HexCorner {
    RightUp,
    Up,
    LeftUp,
    LeftDown,
    Down,
    RightDown,
}

impl HexCorner {
    pub const ALL: [Self; 6] = [
        Self::RightUp,
        Self::Up,
        Self::LeftUp,
        Self::LeftDown,
        Self::Down,
        Self::RightDown,
    ];
}

/// Mapping between hex coordinates and continuous 2D space. A layout has no
/// state beyond its parameters, so it's cheap to copy around and share
/// between every grid operation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Layout {
    pub orientation: Orientation,
    /// Distance from a hex's center to its corners, per axis
    pub size: Point2,
    /// World position of the center of [Hex::ORIGIN]
    pub origin: Point2,
}

impl Layout {
    pub fn new(orientation: Orientation, size: Point2, origin: Point2) -> Self {
        Self {
            orientation,
            size,
            origin,
        }
    }

    /// Shorthand for a pointy-top layout
    pub fn pointy(size: Point2, origin: Point2) -> Self {
        Self::new(Orientation::pointy(), size, origin)
    }

    /// Get the world position of a hex's center
    pub fn hex_to_pixel(&self, hex: Hex) -> Point2 {
        let qr = Vector2::new(f64::from(hex.q()), f64::from(hex.r()));
        let offset = (self.orientation.forward * qr)
            .component_mul(&Vector2::from(self.size));
        Point2::from(offset) + self.origin
    }

    /// Convert a world position into (fractional) hex space. Use
    /// [FractionalHex::round] or [Self::hex_at] to get the containing hex.
    pub fn pixel_to_hex(&self, point: Point2) -> FractionalHex {
        let scaled = Vector2::from(point - self.origin)
            .component_div(&Vector2::from(self.size));
        let qr = self.orientation.inverse * scaled;
        FractionalHex::new(qr.x, qr.y, -qr.x - qr.y)
    }

    /// Get the hex that contains a world position. The point must be finite
    /// and reasonably close to the origin; for points from outside, use
    /// [Self::checked_hex_at].
    pub fn hex_at(&self, point: Point2) -> Hex {
        self.pixel_to_hex(point).round()
    }

    /// Get the hex that contains a world position, or `None` if the position
    /// isn't finite or is too far out to be represented
    pub fn checked_hex_at(&self, point: Point2) -> Option<Hex> {
        self.pixel_to_hex(point).checked_round()
    }

    /// Offset from any hex's center to one of its corners. Useful for finding
    /// the extreme point of a hex in some direction, without generating all
    /// six corners.
    pub fn hex_corner_offset(&self, corner: HexCorner) -> Point2 {
        let angle =
            2.0 * PI * (self.orientation.start_angle + corner as usize as f64)
                / 6.0;
        Point2::new(self.size.x * angle.cos(), self.size.y * angle.sin())
    }

    /// World positions of all six corners of a hex, in the order of
    /// [HexCorner::ALL]
    pub fn polygon_corners(&self, hex: Hex) -> [Point2; 6] {
        let center = self.hex_to_pixel(hex);
        HexCorner::ALL.map(|corner| center + self.hex_corner_offset(corner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn layout() -> Layout {
        Layout::pointy(Point2::new(2.0, 2.0), Point2::new(10.0, -5.0))
    }

    #[test]
    fn test_orientation_inverse() {
        let orientation = Orientation::pointy();
        let product = orientation.forward * orientation.inverse;
        assert_approx_eq!(product[(0, 0)], 1.0);
        assert_approx_eq!(product[(0, 1)], 0.0);
        assert_approx_eq!(product[(1, 0)], 0.0);
        assert_approx_eq!(product[(1, 1)], 1.0);
    }

    #[test]
    fn test_hex_to_pixel() {
        let layout = layout();
        let origin = layout.hex_to_pixel(Hex::ORIGIN);
        assert_approx_eq!(origin.x, 10.0);
        assert_approx_eq!(origin.y, -5.0);

        // East neighbor is one hex width to the right
        let east = layout.hex_to_pixel(Hex::new_qr(1, 0));
        assert_approx_eq!(east.x, 10.0 + 2.0 * SQRT_3);
        assert_approx_eq!(east.y, -5.0);

        // y-up: increasing r moves north
        let north_east = layout.hex_to_pixel(Hex::new_qr(0, 1));
        assert_approx_eq!(north_east.x, 10.0 + SQRT_3);
        assert_approx_eq!(north_east.y, -2.0);
    }

    #[test]
    fn test_hex_pixel_round_trip() {
        let layout = layout();
        for q in -5..=5 {
            for r in -5..=5 {
                let hex = Hex::new_qr(q, r);
                assert_eq!(layout.hex_at(layout.hex_to_pixel(hex)), hex);
            }
        }
    }

    #[test]
    fn test_pixel_hex_round_trip() {
        let layout = layout();
        for point in [
            Point2::new(0.0, 0.0),
            Point2::new(13.7, -2.25),
            Point2::new(-100.0, 42.0),
        ] {
            let fractional = layout.pixel_to_hex(point);
            assert_approx_eq!(fractional.q + fractional.r + fractional.s, 0.0);

            // Map the fractional coordinates back through the forward matrix
            let qr = Vector2::new(fractional.q, fractional.r);
            let back: Point2 = Point2::from(
                (layout.orientation.forward * qr)
                    .component_mul(&Vector2::from(layout.size)),
            ) + layout.origin;
            assert_approx_eq!(back.x, point.x);
            assert_approx_eq!(back.y, point.y);
        }
    }

    #[test]
    fn test_checked_hex_at() {
        let layout = layout();
        let point = Point2::new(13.7, -2.25);
        assert_eq!(layout.checked_hex_at(point), Some(layout.hex_at(point)));
        assert_eq!(layout.checked_hex_at(Point2::new(f64::NAN, 0.0)), None);
        assert_eq!(
            layout.checked_hex_at(Point2::new(0.0, f64::INFINITY)),
            None
        );
        assert_eq!(layout.checked_hex_at(Point2::new(-1e10, 0.0)), None);
    }

    #[test]
    fn test_hex_corner_offset() {
        let layout = layout();
        let down = layout.hex_corner_offset(HexCorner::Down);
        assert_approx_eq!(down.x, 0.0);
        assert_approx_eq!(down.y, -2.0);

        let left_up = layout.hex_corner_offset(HexCorner::LeftUp);
        assert_approx_eq!(left_up.x, -SQRT_3);
        assert_approx_eq!(left_up.y, 1.0);
    }

    #[test]
    fn test_polygon_corners() {
        let layout = layout();
        let hex = Hex::new_qr(2, -1);
        let center = layout.hex_to_pixel(hex);
        let corners = layout.polygon_corners(hex);
        for corner in corners {
            assert_approx_eq!(corner.distance_to(center), 2.0);
        }
        // Points nudged from a corner toward the center land in the hex
        for corner in corners {
            let nudged = corner + (center - corner) * 0.01;
            assert_eq!(layout.hex_at(nudged), hex);
        }
    }
}

//! Plain 2D geometry used by both the navigation and visibility systems. These
//! are all pure functions over [Point2] values, nothing in here holds state.

use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Neg,
    Sub, SubAssign,
};
use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// A point (or vector, depending on context) in continuous 2D world space.
/// World space is y-up.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    From,
    Into,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Length of this point when treated as a vector from the origin
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Are both components finite (not `NaN` or infinite)?
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Check if two points are within `epsilon` of each other on both axes
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
    }

    /// Unit-length version of this vector. Returns `None` for the zero vector.
    pub fn normalized(self) -> Option<Self> {
        let length = self.length();
        if length > 0.0 && length.is_finite() {
            Some(self / length)
        } else {
            None
        }
    }
}

impl From<Vector2<f64>> for Point2 {
    fn from(other: Vector2<f64>) -> Self {
        Self::new(other.x, other.y)
    }
}

impl From<Point2> for Vector2<f64> {
    fn from(other: Point2) -> Self {
        Vector2::new(other.x, other.y)
    }
}

/// Intersection point of the infinite line through `p1`/`p2` with the
/// infinite line through `p3`/`p4`. Returns `None` if the lines are parallel,
/// either line is degenerate (both points equal), or the math otherwise
/// produces a non-finite point.
pub fn line_line_intersection(
    p1: Point2,
    p2: Point2,
    p3: Point2,
    p4: Point2,
) -> Option<Point2> {
    let denominator =
        (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denominator == 0.0 {
        return None;
    }

    let s = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x))
        / denominator;
    let intersection =
        Point2::new(p1.x + s * (p2.x - p1.x), p1.y + s * (p2.y - p1.y));
    Some(intersection).filter(|point| point.is_finite())
}

/// Is `point` on the "left" side of the directed line `p1 -> p2`? With the
/// sign convention used here, that's when the cross product of
/// `p2 - p1` and `point - p1` is negative.
pub fn left_of(p1: Point2, p2: Point2, point: Point2) -> bool {
    let cross =
        (p2.x - p1.x) * (point.y - p1.y) - (p2.y - p1.y) * (point.x - p1.x);
    cross < 0.0
}

/// Linear interpolation: `p * (1 - f) + q * f`
pub fn interpolate(p: Point2, q: Point2, f: f64) -> Point2 {
    p * (1.0 - f) + q * f
}

/// Rotate `point` counter-clockwise around `around` by `angle` radians
pub fn rotate_point(point: Point2, around: Point2, angle: f64) -> Point2 {
    let offset: Vector2<f64> = (point - around).into();
    let rotated: Point2 = (Rotation2::new(angle) * offset).into();
    rotated + around
}

/// Get the corners of a (possibly rotated) rectangle, in the order top-left,
/// top-right, bottom-right, bottom-left (before rotation).
pub fn rectangle_corners(
    center: Point2,
    width: f64,
    height: f64,
    rotation: f64,
) -> [Point2; 4] {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    [
        Point2::new(center.x - half_w, center.y + half_h),
        Point2::new(center.x + half_w, center.y + half_h),
        Point2::new(center.x + half_w, center.y - half_h),
        Point2::new(center.x - half_w, center.y - half_h),
    ]
    .map(|corner| rotate_point(corner, center, rotation))
}

/// Clip a segment to the part of it that lies inside `rect` (Liang-Barsky).
/// Returns `None` if no part of the segment is inside, or the rectangle is
/// degenerate. Ends that are already inside are returned unchanged.
pub fn clip_segment(
    p1: Point2,
    p2: Point2,
    rect: &Rect,
) -> Option<(Point2, Point2)> {
    if rect.is_degenerate() || !(p1.is_finite() && p2.is_finite()) {
        return None;
    }

    let delta = p2 - p1;
    let mut enter: f64 = 0.0;
    let mut exit: f64 = 1.0;
    // Each pair is (direction toward the edge's outside, distance inside it)
    for (toward, inside) in [
        (-delta.x, p1.x - rect.min.x),
        (delta.x, rect.max.x - p1.x),
        (-delta.y, p1.y - rect.min.y),
        (delta.y, rect.max.y - p1.y),
    ] {
        if toward == 0.0 {
            // Parallel to this edge, so it's entirely in or out
            if inside < 0.0 {
                return None;
            }
        } else {
            let t = inside / toward;
            if toward < 0.0 {
                enter = enter.max(t);
            } else {
                exit = exit.min(t);
            }
            if enter > exit {
                return None;
            }
        }
    }

    let start = if enter > 0.0 { p1 + delta * enter } else { p1 };
    let end = if exit < 1.0 { p1 + delta * exit } else { p2 };
    Some((start, end))
}

/// An axis-aligned rectangle in world space. Bounds are inclusive.
#[derive(Copy, Clone, Debug, Display, PartialEq, Serialize, Deserialize)]
#[display(fmt = "[{} -> {}]", min, max)]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Rect {
    pub const fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Build a rectangle from its center and its full width/height
    pub fn from_center(center: Point2, width: f64, height: f64) -> Self {
        let half = Point2::new(width / 2.0, height / 2.0);
        Self::new(center - half, center + half)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2 {
        (self.min + self.max) / 2.0
    }

    /// A rectangle is degenerate if it has no area, or any of its bounds
    /// aren't finite. Degenerate rectangles contain nothing.
    pub fn is_degenerate(&self) -> bool {
        !(self.min.is_finite()
            && self.max.is_finite()
            && self.width() > 0.0
            && self.height() > 0.0)
    }

    pub fn contains(&self, point: Point2) -> bool {
        !self.is_degenerate()
            && self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
    }

    /// The four corners: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.min.x, self.max.y),
            self.max,
            Point2::new(self.max.x, self.min.y),
            self.min,
        ]
    }
}

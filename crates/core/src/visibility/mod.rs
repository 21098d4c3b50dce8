//! 2D visibility: given a light (or viewer) position and a set of occluding
//! shapes, compute the polygon of everything visible from that position.
//!
//! This is a radial sweep. Every occluder is broken down into line segments,
//! the segment endpoints are sorted by angle around the origin, and then we
//! sweep a ray around the full circle while tracking which segment is
//! nearest along it. Each time the nearest segment changes, the span that
//! just finished becomes one edge of the output polygon. The sweep is
//! bounded by a square of half-width `radius` around the origin.
//!
//! See <https://www.redblobgames.com/articles/visibility/> for a much more
//! thorough (and interactive) explanation.

mod segment;

pub use segment::{EndPoint, Segment};

use crate::{
    geometry::{
        clip_segment, line_line_intersection, rectangle_corners, Point2, Rect,
    },
    nav::ObstacleBox,
    timed,
};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

/// Emitted vertices closer together than this (on both axes) are merged
const VERTEX_EPSILON: f64 = 1e-6;

/// A shape that blocks visibility
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Occluder {
    /// A rectangle, rotated counter-clockwise about its center by `rotation`
    /// radians
    Rectangle {
        center: Point2,
        width: f64,
        height: f64,
        #[serde(default)]
        rotation: f64,
    },
    /// A single wall with no thickness
    Line { p1: Point2, p2: Point2 },
}

impl Occluder {
    pub fn square(center: Point2, width: f64, rotation: f64) -> Self {
        Self::Rectangle {
            center,
            width,
            height: width,
            rotation,
        }
    }

    /// An unrotated rectangle covering the same area as a nav obstacle
    pub fn aabb(obstacle: &ObstacleBox) -> Self {
        Self::Rectangle {
            center: obstacle.center,
            width: obstacle.size.x,
            height: obstacle.size.y,
            rotation: 0.0,
        }
    }

    /// Break this shape down into line segments
    pub fn segments(&self) -> Vec<(Point2, Point2)> {
        match *self {
            Self::Rectangle {
                center,
                width,
                height,
                rotation,
            } => {
                let corners =
                    rectangle_corners(center, width, height, rotation);
                (0..corners.len())
                    .map(|i| (corners[i], corners[(i + 1) % corners.len()]))
                    .collect()
            }
            Self::Line { p1, p2 } => vec![(p1, p2)],
        }
    }
}

/// Computes the region visible from an origin point. Occluders can be added
/// and cleared between computations, so one computer can be reused for a
/// moving set of occluders. The origin and radius are fixed.
#[derive(Clone, Debug)]
pub struct VisibilityComputer {
    origin: Point2,
    radius: f64,
    /// Every segment's endpoints refer back to it by its index in here
    segments: Vec<Segment>,
}

impl VisibilityComputer {
    pub fn new(origin: Point2, radius: f64) -> Self {
        let mut computer = Self {
            origin,
            radius,
            segments: Vec::new(),
        };
        computer.load_boundaries();
        computer
    }

    pub fn origin(&self) -> Point2 {
        self.origin
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// All current segments, including the four boundary segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The square that bounds the computation, `radius` out from the origin
    /// on each axis
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.origin, 2.0 * self.radius, 2.0 * self.radius)
    }

    /// Is the point inside the bounding square of the computation?
    pub fn within_radius(&self, point: Point2) -> bool {
        (point.x - self.origin.x).abs() <= self.radius
            && (point.y - self.origin.y).abs() <= self.radius
    }

    /// Add a shape that blocks visibility. Anything outside the bounding
    /// square is cut off.
    pub fn add_occluder(&mut self, occluder: &Occluder) {
        for (p1, p2) in occluder.segments() {
            self.add_occluder_segment(p1, p2);
        }
    }

    pub fn add_line_occluder(&mut self, p1: Point2, p2: Point2) {
        self.add_occluder_segment(p1, p2);
    }

    /// Remove every occluder. The boundary stays.
    pub fn clear_occluders(&mut self) {
        self.segments.clear();
        self.load_boundaries();
    }

    /// Compute the visibility polygon. The output is the polygon's boundary,
    /// as an ordered list of vertices around the origin where the last vertex
    /// is the same as the first. With no occluders this is just the bounding
    /// square. Returns an empty list if the radius is invalid (not a
    /// positive number).
    pub fn compute(&mut self) -> Vec<Point2> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            warn!(
                "Invalid visibility radius {}, nothing is visible",
                self.radius
            );
            return Vec::new();
        }
        if !self.origin.is_finite() {
            warn!("Invalid visibility origin {}", self.origin);
            return Vec::new();
        }

        let polygon = timed!("Visibility computation", self.sweep());
        debug!(
            "Visibility from {} with {} segments: {} vertices",
            self.origin,
            self.segments.len(),
            polygon.len()
        );
        polygon
    }

    /// Occluder segments may not cross the boundary segments, so they're
    /// clipped to the bounding square before being added
    fn add_occluder_segment(&mut self, p1: Point2, p2: Point2) {
        if !(p1.is_finite() && p2.is_finite()) {
            warn!("Ignoring non-finite segment {} -> {}", p1, p2);
            return;
        }
        match clip_segment(p1, p2, &self.bounds()) {
            Some((start, end)) if start != end => self.add_segment(start, end),
            _ => trace!("Segment {} -> {} is out of range, skipping", p1, p2),
        }
    }

    fn add_segment(&mut self, p1: Point2, p2: Point2) {
        if !(p1.is_finite() && p2.is_finite()) {
            warn!("Ignoring non-finite segment {} -> {}", p1, p2);
            return;
        }
        let index = self.segments.len();
        self.segments.push(Segment::new(p1, p2, index));
    }

    /// Add the four sides of the bounding square
    fn load_boundaries(&mut self) {
        let Point2 { x, y } = self.origin;
        let r = self.radius;
        self.add_segment(Point2::new(x - r, y - r), Point2::new(x + r, y - r));
        self.add_segment(Point2::new(x - r, y + r), Point2::new(x + r, y + r));
        self.add_segment(Point2::new(x - r, y - r), Point2::new(x - r, y + r));
        self.add_segment(Point2::new(x + r, y - r), Point2::new(x + r, y + r));
    }

    fn sweep(&mut self) -> Vec<Point2> {
        let origin = self.origin;
        for segment in &mut self.segments {
            segment.update_angles(origin);
        }
        let mut endpoints: Vec<EndPoint> = self
            .segments
            .iter()
            .flat_map(|segment| [segment.p1, segment.p2])
            .collect();
        endpoints.sort_by(EndPoint::sweep_order);

        let mut output = Vec::new();
        // Indexes of segments that overlap the current ray, nearest first
        let mut open: Vec<usize> = Vec::new();
        let mut current_angle = 0.0;

        // The first pass just figures out which segments overlap the ray at
        // the start of the sweep. The second pass does the real work.
        for pass in 0..2 {
            for endpoint in &endpoints {
                let old_front = open.first().copied();

                if endpoint.begin {
                    let segment = &self.segments[endpoint.segment];
                    let position = open
                        .iter()
                        .position(|&other| {
                            !segment.occluded_by(&self.segments[other], origin)
                        })
                        .unwrap_or(open.len());
                    open.insert(position, endpoint.segment);
                } else if let Some(position) =
                    open.iter().position(|&other| other == endpoint.segment)
                {
                    open.remove(position);
                }

                let new_front = open.first().copied();
                if old_front != new_front {
                    if pass == 1 {
                        self.emit_span(
                            &mut output,
                            current_angle,
                            endpoint.angle,
                            old_front,
                        );
                    }
                    current_angle = endpoint.angle;
                }
            }
        }

        close_polygon(&mut output);
        output
    }

    /// Add the edge of the polygon covering the angles from `from` to `to`.
    /// The edge lies along the given segment, or out past the boundary if
    /// nothing was in front.
    fn emit_span(
        &self,
        output: &mut Vec<Point2>,
        from: f64,
        to: f64,
        front: Option<usize>,
    ) {
        let origin = self.origin;
        let ray = |angle: f64| origin + Point2::new(angle.cos(), angle.sin());
        let (line_start, line_end) = match front {
            Some(index) => {
                let segment = &self.segments[index];
                (segment.p1.position, segment.p2.position)
            }
            None => {
                let far = 2.0 * self.radius;
                (
                    origin + (ray(from) - origin) * far,
                    origin + (ray(to) - origin) * far,
                )
            }
        };

        for angle in [from, to] {
            if let Some(vertex) =
                line_line_intersection(line_start, line_end, origin, ray(angle))
            {
                push_vertex(output, vertex);
            }
        }
    }
}

/// Append a vertex, unless it's a repeat of the previous one
fn push_vertex(output: &mut Vec<Point2>, vertex: Point2) {
    match output.last() {
        Some(last) if last.approx_eq(vertex, VERTEX_EPSILON) => {}
        _ => output.push(vertex),
    }
}

/// Make sure the last vertex is exactly the first one
fn close_polygon(output: &mut Vec<Point2>) {
    if let (Some(&first), Some(last)) = (output.first(), output.last()) {
        if output.len() > 1 && last.approx_eq(first, VERTEX_EPSILON) {
            if let Some(last) = output.last_mut() {
                *last = first;
            }
        } else {
            output.push(first);
        }
    }
}

/// Compute a visibility polygon in one shot. See
/// [VisibilityComputer::compute].
pub fn visibility_polygon(
    origin: Point2,
    radius: f64,
    occluders: &[Occluder],
) -> Vec<Point2> {
    let mut computer = VisibilityComputer::new(origin, radius);
    for occluder in occluders {
        computer.add_occluder(occluder);
    }
    computer.compute()
}

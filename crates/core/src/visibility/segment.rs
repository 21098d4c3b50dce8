use crate::{
    geometry::{interpolate, left_of, Point2},
    util::normalize_angle_delta,
};
use derive_more::Display;
use std::cmp::Ordering;

/// How far in from each end we sample a segment when comparing it against
/// another, so that segments sharing an endpoint don't count as intersecting
const SHORTEN_FRACTION: f64 = 0.01;

/// One end of a [Segment]. Endpoints are what the sweep actually sorts and
/// walks over.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EndPoint {
    pub position: Point2,
    /// Angle from the sweep origin, in `(-π, π]`
    pub angle: f64,
    /// Does the sweep reach this end of the segment first?
    pub begin: bool,
    /// Index of the owning segment
    pub segment: usize,
}

impl EndPoint {
    fn new(position: Point2, segment: usize) -> Self {
        Self {
            position,
            angle: 0.0,
            begin: false,
            segment,
        }
    }

    /// Sort order for the sweep: ascending angle, and at equal angles, begin
    /// endpoints before end endpoints
    pub fn sweep_order(&self, other: &Self) -> Ordering {
        self.angle
            .partial_cmp(&other.angle)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.begin.cmp(&self.begin))
    }
}

/// A line segment that blocks light
#[derive(Copy, Clone, Debug, Display, PartialEq)]
#[display(fmt = "{{{} -> {}}}", "p1.position", "p2.position")]
pub struct Segment {
    pub p1: EndPoint,
    pub p2: EndPoint,
}

impl Segment {
    pub fn new(p1: Point2, p2: Point2, index: usize) -> Self {
        Self {
            p1: EndPoint::new(p1, index),
            p2: EndPoint::new(p2, index),
        }
    }

    /// Compute endpoint angles relative to the origin, and figure out which
    /// endpoint the sweep hits first. That's the one we'd reach going
    /// counter-clockwise around the shorter way.
    pub fn update_angles(&mut self, origin: Point2) {
        for endpoint in [&mut self.p1, &mut self.p2] {
            let offset = endpoint.position - origin;
            endpoint.angle = offset.y.atan2(offset.x);
        }
        let delta = normalize_angle_delta(self.p2.angle - self.p1.angle);
        self.p1.begin = delta > 0.0;
        self.p2.begin = !self.p1.begin;
    }

    /// Is this segment hidden behind `other`, as seen from `origin`? This
    /// only gives meaningful answers for the cases that come up during the
    /// sweep, where both segments overlap the current ray and don't cross
    /// each other. It's also not anti-symmetric: `a.occluded_by(b)` doesn't
    /// imply `!b.occluded_by(a)`.
    ///
    /// The idea: if both ends of `self` are on one side of `other`'s line and
    /// the origin is on the other side, then `other` is between the origin
    /// and `self`. Same thing the other way around.
    pub fn occluded_by(&self, other: &Self, origin: Point2) -> bool {
        let (a1, a2, a3) = self.sides(other, origin);
        let (b1, b2, b3) = other.sides(self, origin);

        if b1 == b2 && b2 != b3 {
            return true;
        }
        if a1 == a2 && a2 == a3 {
            return true;
        }
        if a1 == a2 && a2 != a3 {
            return false;
        }
        if b1 == b2 && b2 == b3 {
            return false;
        }
        // Segments intersect, neither answer is right
        false
    }

    /// Which side of this segment's line are the (slightly shortened) ends of
    /// `other`, and the origin?
    fn sides(&self, other: &Self, origin: Point2) -> (bool, bool, bool) {
        let (start, end) = (self.p2.position, self.p1.position);
        let near = interpolate(
            other.p1.position,
            other.p2.position,
            SHORTEN_FRACTION,
        );
        let far = interpolate(
            other.p2.position,
            other.p1.position,
            SHORTEN_FRACTION,
        );
        (
            left_of(start, end, near),
            left_of(start, end, far),
            left_of(start, end, origin),
        )
    }
}

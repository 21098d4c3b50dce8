//! This sub-module contains basic types for units that form the hex coordinate
//! system. See the parent module documentation for more info on the coordinate
//! system.

use anyhow::anyhow;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::ops;
use strum::{EnumIter, IntoEnumIterator};

/// Nudge applied to both ends of a hex line before sampling it. Without this,
/// samples that fall exactly on the edge between two hexes round
/// inconsistently.
const LINE_NUDGE: f64 = 1e-6;

/// Largest magnitude a coordinate can have for hex math (neighbors,
/// distances, lines) to be safe from overflow. World positions that land
/// further out than this can't be navigated. See
/// [FractionalHex::checked_round].
pub const MAX_COORDINATE: i32 = 1 << 28;

/// A single cell in the hex grid, addressed in cube coordinates. **For any hex,
/// `q + r + s = 0`.**
///
/// ## Implementation
///
/// Since `s` can always be derived from the other two components, we only
/// store `q` and `r`. This makes the invariant impossible to break once a value
/// exists, so the only places it needs to be checked are the constructors that
/// accept all three components.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {}, {})", "self.q()", "self.r()", "self.s()")]
pub struct Hex {
    q: i32,
    r: i32,
}

impl Hex {
    pub const ORIGIN: Self = Self::new_qr(0, 0);

    /// Construct a hex from all three cube components. Returns an error if the
    /// components don't fall on the plane `q + r + s = 0`.
    pub fn new(q: i32, r: i32, s: i32) -> anyhow::Result<Self> {
        if q + r + s != 0 {
            Err(anyhow!(
                "Invalid hex ({}, {}, {}); must be on the plane q+r+s=0",
                q,
                r,
                s
            ))
        } else {
            Ok(Self::new_qr(q, r))
        }
    }

    /// Construct a hex from `q` and `r`. Since q+r+s=0 for all hexes, we can
    /// derive s from q & r.
    pub const fn new_qr(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn q(&self) -> i32 {
        self.q
    }

    pub fn r(&self) -> i32 {
        self.r
    }

    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Get the hex adjacent to this one in the given direction
    pub fn neighbor(self, direction: HexDirection) -> Self {
        self + direction.to_vector()
    }

    /// Get an iterator of all the hexes directly adjacent to this one. The
    /// iterator will always contain exactly 6 values, in the order of
    /// [HexDirection::iter].
    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        HexDirection::iter().map(move |direction| self.neighbor(direction))
    }

    /// Calculate the grid distance between two hexes, meaning the number of
    /// steps it takes to get from one to the other. 0 if the hexes are equal,
    /// 1 if they are adjacent, etc.
    pub fn distance_to(self, other: Self) -> usize {
        // https://www.redblobgames.com/grids/hexagons/#distances
        // Each step between neighbors changes two of the three components by
        // one, hence the halving. Widened so extreme hexes can't overflow.
        let dq = i64::from(self.q) - i64::from(other.q);
        let dr = i64::from(self.r) - i64::from(other.r);
        let ds = -dq - dr;
        ((dq.abs() + dr.abs() + ds.abs()) / 2) as usize
    }

    /// Get all the hexes that a straight line between this hex's center and
    /// the other's center passes through, in order. Both ends are included, so
    /// the output always has `distance + 1` hexes.
    pub fn line_to(self, other: Self) -> Vec<Self> {
        let distance = self.distance_to(other);
        // Nudge both ends in the same direction so that samples landing right
        // on a boundary consistently round to the same side
        let nudge =
            FractionalHex::new(LINE_NUDGE, LINE_NUDGE, -2.0 * LINE_NUDGE);
        let start = FractionalHex::from(self) + nudge;
        let end = FractionalHex::from(other) + nudge;
        let step = 1.0 / distance.max(1) as f64;

        (0..=distance)
            .map(|i| start.lerp(end, step * i as f64).round())
            .collect()
    }
}

impl ops::Add<HexVector> for Hex {
    type Output = Hex;

    fn add(self, rhs: HexVector) -> Self::Output {
        Self::new_qr(self.q + rhs.q, self.r + rhs.r)
    }
}

/// A translation within the hex grid, with the same `q + r + s = 0` storage
/// trick as [Hex]. The only vectors we really need are the six unit steps
/// produced by [HexDirection::to_vector].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
#[display(fmt = "({}, {}, {})", "self.q", "self.r", "-self.q - self.r")]
pub struct HexVector {
    pub q: i32,
    pub r: i32,
}

impl HexVector {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }
}

/// A hex with real-valued components. This is what you get when converting a
/// continuous point into hex space, and has to be rounded (see
/// [FractionalHex::round]) to get the [Hex] that contains the point.
#[derive(Copy, Clone, Debug, PartialEq, Display, Serialize, Deserialize)]
#[display(fmt = "({}, {}, {})", q, r, s)]
pub struct FractionalHex {
    pub q: f64,
    pub r: f64,
    pub s: f64,
}

impl FractionalHex {
    pub const fn new(q: f64, r: f64, s: f64) -> Self {
        Self { q, r, s }
    }

    /// Linear interpolation between two fractional hexes
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.q * (1.0 - t) + other.q * t,
            self.r * (1.0 - t) + other.r * t,
            self.s * (1.0 - t) + other.s * t,
        )
    }

    /// Round to the hex that contains this point, but only if the result is
    /// a usable hex: every component finite and no bigger than
    /// [MAX_COORDINATE]. Use this for any point that came from outside.
    pub fn checked_round(self) -> Option<Hex> {
        let limit = f64::from(MAX_COORDINATE);
        let usable = [self.q, self.r, self.s].iter().all(|component| {
            component.is_finite() && component.abs() <= limit
        });
        if usable {
            Some(self.round())
        } else {
            None
        }
    }

    /// Round to the hex that contains this point. Each component is rounded
    /// independently, then whichever one moved the most gets thrown out and
    /// recomputed from the other two, which puts the result back on the plane
    /// `q + r + s = 0`.
    pub fn round(self) -> Hex {
        let mut q = self.q.round();
        let mut r = self.r.round();
        let mut s = self.s.round();

        let q_diff = (q - self.q).abs();
        let r_diff = (r - self.r).abs();
        let s_diff = (s - self.s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            q = -r - s;
        } else if r_diff > s_diff {
            r = -q - s;
        } else {
            s = -q - r;
        }

        debug_assert_eq!(q + r + s, 0.0, "rounding {} left the plane", self);
        Hex::new_qr(q as i32, r as i32)
    }
}

impl From<Hex> for FractionalHex {
    fn from(hex: Hex) -> Self {
        Self::new(hex.q().into(), hex.r().into(), hex.s().into())
    }
}

impl ops::Add for FractionalHex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.q + rhs.q, self.r + rhs.r, self.s + rhs.s)
    }
}

/// The 6 directions in which hexes can neighbor each other. The order here is
/// fixed and meaningful: it starts at east and goes counter-clockwise, so
/// direction `0` is always `(+1, 0, -1)`. Neighbor iteration follows this
/// order everywhere.
///
/// The compass names assume the y-up world space of [Layout](super::Layout),
/// where increasing `r` moves north.
#[derive(
    Copy,
    Clone,
    Debug,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HexDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// Get the direction with the given index in the counter-clockwise
    /// ordering. Returns `None` if the index is not in `0..6`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// Get the index of this direction in the counter-clockwise ordering
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get the direction directly opposite this one
    pub fn opposite(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::NorthEast => Self::SouthWest,
            Self::NorthWest => Self::SouthEast,
            Self::West => Self::East,
            Self::SouthWest => Self::NorthEast,
            Self::SouthEast => Self::NorthWest,
        }
    }

    /// Get a vector offset that moves a hex one step in this direction
    pub fn to_vector(self) -> HexVector {
        match self {
            Self::East => HexVector::new(1, 0),
            Self::NorthEast => HexVector::new(0, 1),
            Self::NorthWest => HexVector::new(-1, 1),
            Self::West => HexVector::new(-1, 0),
            Self::SouthWest => HexVector::new(0, -1),
            Self::SouthEast => HexVector::new(1, -1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_new() {
        assert_eq!(Hex::new(1, -2, 1).unwrap(), Hex::new_qr(1, -2));
        assert!(Hex::new(1, 1, 1).is_err());
    }

    #[test]
    fn test_neighbor() {
        let hex = Hex::new_qr(2, -1);
        assert_eq!(hex.neighbor(HexDirection::East), Hex::new_qr(3, -1));
        assert_eq!(
            HexDirection::from_index(0)
                .map(|direction| hex.neighbor(direction)),
            Some(Hex::new_qr(3, -1))
        );
        assert_eq!(HexDirection::from_index(6), None);

        let neighbors: Vec<Hex> = Hex::ORIGIN.neighbors().collect();
        assert_eq!(neighbors.len(), 6);
        for neighbor in neighbors {
            assert_eq!(Hex::ORIGIN.distance_to(neighbor), 1);
        }
    }

    #[test]
    fn test_opposite() {
        for direction in HexDirection::iter() {
            let there = Hex::ORIGIN.neighbor(direction);
            assert_eq!(there.neighbor(direction.opposite()), Hex::ORIGIN);
        }
    }

    #[test]
    fn test_distance_to() {
        let h0 = Hex::ORIGIN;
        let h1 = Hex::new_qr(-1, 1);
        let h2 = Hex::new_qr(2, -1);
        let h3 = Hex::new_qr(2, -3);

        assert_eq!(h0.distance_to(h0), 0);
        assert_eq!(h3.distance_to(h3), 0);

        assert_eq!(h0.distance_to(h1), 1);
        assert_eq!(h0.distance_to(h2), 2);
        assert_eq!(h0.distance_to(h3), 3);

        assert_eq!(h1.distance_to(h2), 3);
        assert_eq!(h1.distance_to(h3), 4);
        assert_eq!(h2.distance_to(h3), 2);
    }

    #[test]
    fn test_distance_symmetry_and_triangle() {
        let hexes: Vec<Hex> = (-3..=3)
            .flat_map(|q| (-3..=3).map(move |r| Hex::new_qr(q, r)))
            .collect();
        for &a in &hexes {
            for &b in &hexes {
                assert_eq!(a.distance_to(b), b.distance_to(a));
                for &c in hexes.iter().step_by(5) {
                    assert!(
                        a.distance_to(c) <= a.distance_to(b) + b.distance_to(c)
                    );
                }
            }
        }
    }

    #[test]
    fn test_round() {
        // Already integral
        for hex in [Hex::ORIGIN, Hex::new_qr(3, -7), Hex::new_qr(-4, 2)] {
            assert_eq!(FractionalHex::from(hex).round(), hex);
        }

        // Nearest center wins
        assert_eq!(
            FractionalHex::new(0.9, -0.1, -0.8).round(),
            Hex::new_qr(1, 0)
        );
        // q has the largest error (0.4), so it gets recomputed
        assert_eq!(
            FractionalHex::new(0.4, 0.3, -0.7).round(),
            Hex::new_qr(1, 0)
        );
    }

    #[test]
    fn test_distance_extreme() {
        let far = Hex::new_qr(i32::MIN, 0);
        let other = Hex::new_qr(i32::MAX, 0);
        assert_eq!(Hex::ORIGIN.distance_to(far), 1 << 31);
        assert_eq!(far.distance_to(other), u32::MAX as usize);
    }

    #[test]
    fn test_checked_round() {
        assert_eq!(
            FractionalHex::new(0.9, -0.1, -0.8).checked_round(),
            Some(Hex::new_qr(1, 0))
        );
        assert_eq!(
            FractionalHex::new(f64::NAN, 0.0, f64::NAN).checked_round(),
            None
        );
        assert_eq!(
            FractionalHex::new(f64::INFINITY, 0.0, f64::NEG_INFINITY)
                .checked_round(),
            None
        );
        assert_eq!(FractionalHex::new(-1e10, 0.0, 1e10).checked_round(), None);
        let limit = f64::from(MAX_COORDINATE);
        assert_eq!(
            FractionalHex::new(limit, -limit, 0.0).checked_round(),
            Some(Hex::new_qr(MAX_COORDINATE, -MAX_COORDINATE))
        );
    }

    #[test]
    fn test_line_to() {
        let start = Hex::ORIGIN;
        let end = Hex::new_qr(3, 0);
        assert_eq!(
            start.line_to(end),
            vec![
                Hex::new_qr(0, 0),
                Hex::new_qr(1, 0),
                Hex::new_qr(2, 0),
                Hex::new_qr(3, 0)
            ]
        );

        assert_eq!(start.line_to(start), vec![start]);

        // Lines are contiguous and include both ends
        let end = Hex::new_qr(4, -7);
        let line = start.line_to(end);
        assert_eq!(line.len(), start.distance_to(end) + 1);
        assert_eq!(line.first(), Some(&start));
        assert_eq!(line.last(), Some(&end));
        for pair in line.windows(2) {
            assert_eq!(pair[0].distance_to(pair[1]), 1);
        }
    }

    #[test]
    fn test_serde() {
        assert_tokens(
            &Hex::new_qr(3, -1),
            &[
                Token::Struct { name: "Hex", len: 2 },
                Token::Str("q"),
                Token::I32(3),
                Token::Str("r"),
                Token::I32(-1),
                Token::StructEnd,
            ],
        );
        assert_tokens(
            &HexDirection::NorthWest,
            &[Token::UnitVariant {
                name: "HexDirection",
                variant: "north_west",
            }],
        );
    }
}

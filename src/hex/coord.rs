//! Axial hex coordinates and their neighbor/distance math.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// The orientation a [`HexGrid`](crate::hex::HexGrid) is laid out in.
///
/// Orientation does not change which six coordinates are adjacent to a
/// given [`HexCoord`] — it changes the order [`HexCoord::neighbors`] returns
/// them in, which scripts observe directly as an indexable sequence
/// (`world.neighbors` in §4.7 of the design notes). Changing a grid's
/// orientation after scripts have been authored against it is a breaking
/// change to their behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Hex corners point up and down; the flat edges face east and west.
    #[default]
    PointyTop,
    /// Hex corners point east and west; the flat edges face up and down.
    FlatTop,
}

/// The six axial offsets adjacent to any coordinate, ordered clockwise
/// starting from due east, for pointy-top grids.
const POINTY_TOP_OFFSETS: [(i32, i32); 6] =
    [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// The same six neighbors re-ordered clockwise starting from north-east, the
/// natural first direction for a flat-top layout.
const FLAT_TOP_OFFSETS: [(i32, i32); 6] =
    [(1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1), (1, 0)];

/// An axial hex coordinate `(q, r)`. The implicit cube coordinate is
/// `s = -q - r`.
///
/// Coordinates may be negative and are otherwise unbounded; equality is
/// structural. [`HexGrid`] places further invariants on top of this type
/// (populated tiles, occupancy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    /// Constructs a coordinate from its axial components.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The origin coordinate `(0, 0)`.
    pub const fn origin() -> Self {
        Self { q: 0, r: 0 }
    }

    /// The implicit third cube coordinate `s = -q - r`.
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Hex distance between this coordinate and `other`.
    ///
    /// `distance(a, a) == 0` and `distance(a, b) == distance(b, a)` for all
    /// coordinates.
    pub fn distance(self, other: Self) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        (dq + dr + ds) / 2
    }

    /// The six coordinates adjacent to this one, in the fixed order
    /// `orientation` defines.
    ///
    /// Always returns six distinct coordinates, each at `distance == 1` from
    /// `self`, regardless of whether any of them are populated in a
    /// [`HexGrid`](crate::hex::HexGrid).
    pub fn neighbors(self, orientation: Orientation) -> [Self; 6] {
        let offsets = match orientation {
            Orientation::PointyTop => POINTY_TOP_OFFSETS,
            Orientation::FlatTop => FLAT_TOP_OFFSETS,
        };
        offsets.map(|(dq, dr)| Self {
            q: self.q + dq,
            r: self.r + dr,
        })
    }
}

impl Add<(i32, i32)> for HexCoord {
    type Output = Self;

    fn add(self, (dq, dr): (i32, i32)) -> Self {
        Self {
            q: self.q + dq,
            r: self.r + dr,
        }
    }
}

impl From<(i32, i32)> for HexCoord {
    fn from((q, r): (i32, i32)) -> Self {
        Self { q, r }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_and_zero_at_origin() {
        let a = HexCoord::new(3, -2);
        let b = HexCoord::new(-1, 5);
        assert_eq!(a.distance(a), 0);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn neighbors_are_six_distinct_and_adjacent() {
        for orientation in [Orientation::PointyTop, Orientation::FlatTop] {
            let c = HexCoord::new(4, -7);
            let ns = c.neighbors(orientation);
            for n in ns {
                assert_eq!(c.distance(n), 1);
            }
            let mut seen = std::collections::HashSet::new();
            assert!(ns.iter().all(|n| seen.insert(*n)));
        }
    }

    #[test]
    fn neighbor_order_depends_on_orientation() {
        let c = HexCoord::origin();
        let pointy = c.neighbors(Orientation::PointyTop);
        let flat = c.neighbors(Orientation::FlatTop);
        assert_ne!(pointy, flat);
    }
}

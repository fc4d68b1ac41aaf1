// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lattice points and translation vectors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A point of the square lattice, also used as a translation vector.
///
/// Serializes as a two-element array `[x, y]`, which is the element format
/// of the JSON pattern stream consumed by the bulk pipeline.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
pub struct Cell(pub i32, pub i32);

impl Cell {
    pub const ZERO: Cell = Cell(0, 0);

    pub fn x(self) -> i32 {
        self.0
    }

    pub fn y(self) -> i32 {
        self.1
    }

    /// True when both components have the parity selected by `odd`.
    ///
    /// The two Margolus sub-lattices are offset by `(1, 1)`, so a translation
    /// between two configurations of the same phase parity must itself have
    /// both components of that parity. Mixed-parity vectors never relate two
    /// same-phase configurations.
    pub fn has_parity(self, odd: bool) -> bool {
        let want = odd as i32;
        self.0.rem_euclid(2) == want && self.1.rem_euclid(2) == want
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, rhs: Cell) -> Cell {
        Cell(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl Sub for Cell {
    type Output = Cell;

    fn sub(self, rhs: Cell) -> Cell {
        Cell(self.0 - rhs.0, self.1 - rhs.1)
    }
}

impl Mul<i32> for Cell {
    type Output = Cell;

    fn mul(self, rhs: i32) -> Cell {
        Cell(self.0 * rhs, self.1 * rhs)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        assert_eq!(Cell(1, 2) + Cell(3, -1), Cell(4, 1));
        assert_eq!(Cell(1, 2) - Cell(3, -1), Cell(-2, 3));
        assert_eq!(Cell(1, -2) * 2, Cell(2, -4));
    }

    #[test]
    fn test_parity() {
        assert!(Cell(0, 0).has_parity(false));
        assert!(Cell(2, -4).has_parity(false));
        assert!(Cell(1, 1).has_parity(true));
        assert!(Cell(-1, 3).has_parity(true));
        // Mixed parity matches neither sub-lattice.
        assert!(!Cell(1, 0).has_parity(false));
        assert!(!Cell(1, 0).has_parity(true));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut cells = vec![Cell(1, 0), Cell(0, 1), Cell(0, 0), Cell(1, -1)];
        cells.sort();
        assert_eq!(cells, vec![Cell(0, 0), Cell(0, 1), Cell(1, -1), Cell(1, 0)]);
    }

    #[test]
    fn test_serializes_as_pair() {
        let json = serde_json::to_string(&Cell(3, -2)).unwrap();
        assert_eq!(json, "[3,-2]");
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Cell(3, -2));
    }
}

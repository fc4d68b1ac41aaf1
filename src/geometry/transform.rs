// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The proper rotation subgroup of the square lattice's symmetry group.
//!
//! Spaceships travelling in symmetric directions are collapsed onto one
//! canonical library entry by rotating them with one of these four
//! transforms. Reflections are deliberately excluded: the rules analyzed
//! here are not required to be mirror-symmetric.

use crate::geometry::Cell;

/// One of the four 90-degree rotations, stored as a 2x2 integer matrix.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Transform {
    a: i32,
    b: i32,
    c: i32,
    d: i32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform::new(1, 0, 0, 1);

    pub const fn new(a: i32, b: i32, c: i32, d: i32) -> Self {
        Transform { a, b, c, d }
    }

    /// Apply to a translation vector (the pure linear map).
    pub fn apply(&self, v: Cell) -> Cell {
        Cell(self.a * v.0 + self.b * v.1, self.c * v.0 + self.d * v.1)
    }

    /// Apply to a cell of a pattern.
    ///
    /// Rotation is taken about the centre of the 2x2 block at the origin
    /// rather than about the lattice point `(0, 0)`. A block-centre rotation
    /// maps the Margolus partition onto itself, so a rotated pattern evolves
    /// exactly as the rotated evolution of the original. A lattice-point
    /// rotation would shift the block lattice by half a block and silently
    /// change the dynamics of the stored pattern.
    pub fn apply_cell(&self, cell: Cell) -> Cell {
        let v = self.apply(cell);
        let tx = (self.a < 0 || self.b < 0) as i32;
        let ty = (self.c < 0 || self.d < 0) as i32;
        Cell(v.0 + tx, v.1 + ty)
    }

    pub fn is_identity(&self) -> bool {
        *self == Transform::IDENTITY
    }
}

/// Identity, 90, 180 and 270 degree rotations, in that order.
pub const ROTATIONS: [Transform; 4] = [
    Transform::new(1, 0, 0, 1),
    Transform::new(0, -1, 1, 0),
    Transform::new(-1, 0, 0, -1),
    Transform::new(0, 1, -1, 0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourth_power_is_identity() {
        for rotation in &ROTATIONS {
            let mut v = Cell(3, -5);
            for _ in 0..4 {
                v = rotation.apply(v);
            }
            assert_eq!(v, Cell(3, -5));
        }
    }

    #[test]
    fn test_rotations_are_distinct() {
        let images: Vec<Cell> = ROTATIONS.iter().map(|r| r.apply(Cell(1, 0))).collect();
        assert_eq!(images, vec![Cell(1, 0), Cell(0, 1), Cell(-1, 0), Cell(0, -1)]);
    }

    #[test]
    fn test_cell_rotation_preserves_origin_block() {
        // The four cells of the block at the origin must be permuted among
        // themselves by every rotation.
        let block = [Cell(0, 0), Cell(0, 1), Cell(1, 0), Cell(1, 1)];
        for rotation in &ROTATIONS {
            let mut images: Vec<Cell> = block.iter().map(|&c| rotation.apply_cell(c)).collect();
            images.sort();
            assert_eq!(images, block.to_vec());
        }
    }

    #[test]
    fn test_identity() {
        assert!(Transform::IDENTITY.is_identity());
        assert!(!ROTATIONS[1].is_identity());
        assert_eq!(Transform::IDENTITY.apply_cell(Cell(7, -3)), Cell(7, -3));
    }
}

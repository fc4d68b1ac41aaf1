// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Block-granularity pattern representation for the tree analysis strategy.
//!
//! A [`BlockTree`] stores a pattern as an ordered map from block index to
//! 4-bit block state, together with an alignment flag recording which of the
//! two Margolus sub-lattices the blocks currently sit on. A block `b` of a
//! tree aligned to sub-lattice `a` covers the cells with corner `2b - a`.
//!
//! Stepping a tree applies the transition table directly to each aligned
//! block, then re-blocks the resulting cells onto the other sub-lattice so
//! the next step again sees aligned blocks. Translation-equality between
//! trees is tested in block units; the analyzer converts a block offset `d`
//! found at alignment `a` back to the cell offset `2d - (a, a)`.
//!
//! Compared to the cell list this keeps per-generation work proportional to
//! the number of occupied blocks, which is what makes large sparse patterns
//! affordable to analyze.

use crate::geometry::{Cell, Pattern};
use crate::rule::MargolusRule;
use std::collections::BTreeMap;

/// A pattern stored as 2x2 blocks in an ordered tree.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct BlockTree {
    blocks: BTreeMap<Cell, u8>,
    align: bool,
}

impl BlockTree {
    /// Block the cells of a pattern onto the phase-0 sub-lattice.
    pub fn from_pattern(pattern: &Pattern) -> Self {
        let mut tree = BlockTree {
            blocks: BTreeMap::new(),
            align: false,
        };
        for &cell in &pattern.cells {
            tree.insert_cell(cell);
        }
        tree
    }

    fn insert_cell(&mut self, Cell(x, y): Cell) {
        let a = self.align as i32;
        let bx = (x + a).div_euclid(2);
        let by = (y + a).div_euclid(2);
        let bit = (x + a - 2 * bx) + 2 * (y + a - 2 * by);
        *self.blocks.entry(Cell(bx, by)).or_insert(0) |= 1 << bit;
    }

    /// Expand back to a sorted cell list.
    pub fn to_pattern(&self) -> Pattern {
        let a = self.align as i32;
        let mut cells = Vec::new();
        for (&Cell(bx, by), &state) in &self.blocks {
            for bit in 0..4i32 {
                if state & (1 << bit) != 0 {
                    cells.push(Cell(2 * bx - a + (bit & 1), 2 * by - a + (bit >> 1)));
                }
            }
        }
        Pattern::from_cells(cells)
    }

    /// Evaluate one generation, producing a tree aligned to the other
    /// sub-lattice.
    ///
    /// `phase` must match the tree's current alignment; the analyzer drives
    /// the alternation and this is its consistency check.
    pub fn step(&self, rule: &MargolusRule, phase: bool) -> BlockTree {
        debug_assert_eq!(
            phase, self.align,
            "tree must be stepped on its own sub-lattice"
        );
        let a = self.align as i32;
        let mut next = BlockTree {
            blocks: BTreeMap::new(),
            align: !self.align,
        };
        for (&Cell(bx, by), &state) in &self.blocks {
            let value = rule.get(state);
            for bit in 0..4i32 {
                if value & (1 << bit) != 0 {
                    next.insert_cell(Cell(2 * bx - a + (bit & 1), 2 * by - a + (bit >> 1)));
                }
            }
        }
        next
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn align(&self) -> bool {
        self.align
    }

    /// Minimum and maximum block index, or None when empty.
    pub fn block_bounds(&self) -> Option<(Cell, Cell)> {
        let mut iter = self.blocks.keys();
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for &Cell(x, y) in self.blocks.keys() {
            min = Cell(min.0.min(x), min.1.min(y));
            max = Cell(max.0.max(x), max.1.max(y));
        }
        Some((min, max))
    }

    /// Block-granularity translation `d` with `other = self + d`, requiring
    /// identical block contents. Two empty trees are equal (offset zero)
    /// only when they sit on the same sub-lattice.
    pub fn shift_equal(&self, other: &BlockTree) -> Option<Cell> {
        if self.blocks.len() != other.blocks.len() {
            return None;
        }
        if self.blocks.is_empty() {
            return if self.align == other.align {
                Some(Cell::ZERO)
            } else {
                None
            };
        }
        let first_a = *self.blocks.keys().next().expect("non-empty tree");
        let first_b = *other.blocks.keys().next().expect("non-empty tree");
        let d = first_b - first_a;
        for ((&ka, &va), (&kb, &vb)) in self.blocks.iter().zip(&other.blocks) {
            if ka + d != kb || va != vb {
                return None;
            }
        }
        Some(d)
    }
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Margolus block-substitution rules.
//!
//! The grid is partitioned into 2x2 blocks on one of two alternating offset
//! lattices (the phase): phase-0 block origins sit at even coordinates,
//! phase-1 origins at odd coordinates. Each generation every block is
//! replaced according to a 16-entry lookup table indexed by the block's
//! 4-bit state, where cell `(x, y)` of a block contributes bit `x + 2y`.
//!
//! The table is not required to be a permutation; reversibility is a
//! property of interesting rules, not a precondition of the analyzer.

use crate::geometry::{Cell, Pattern};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a rule given as a comma-separated integer list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("rule must have exactly 16 entries, got {0}")]
    WrongCount(usize),
    #[error("rule entry {0} is out of range (must be below 16)")]
    EntryOutOfRange(u32),
    #[error("failed to parse rule entry: {0}")]
    BadInteger(#[from] std::num::ParseIntError),
}

/// A 16-entry Margolus block transition table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MargolusRule {
    table: [u8; 16],
}

/// The Single Rotation rule: blocks holding exactly one live cell rotate it
/// by 90 degrees, every other block is left unchanged.
pub const SINGLE_ROTATION: MargolusRule =
    MargolusRule::new([0, 2, 8, 3, 1, 5, 6, 7, 4, 9, 10, 11, 12, 13, 14, 15]);

impl MargolusRule {
    pub const fn new(table: [u8; 16]) -> Self {
        MargolusRule { table }
    }

    /// Transition for one 4-bit block state.
    pub fn get(&self, state: u8) -> u8 {
        self.table[state as usize]
    }

    /// Evaluate one generation over a cell list.
    ///
    /// `phase` selects which of the two block lattices is active. The result
    /// is not in canonical order; callers sort it.
    pub fn apply(&self, pattern: &Pattern, phase: bool) -> Pattern {
        let p = phase as i32;
        let mut blocks: HashMap<Cell, u8> = HashMap::with_capacity(pattern.len());
        for &Cell(x, y) in &pattern.cells {
            let bx = (x - p).div_euclid(2);
            let by = (y - p).div_euclid(2);
            let bit = (x - p - 2 * bx) + 2 * (y - p - 2 * by);
            *blocks.entry(Cell(bx, by)).or_insert(0) |= 1 << bit;
        }
        let mut cells = Vec::with_capacity(pattern.len());
        for (Cell(bx, by), state) in blocks {
            let next = self.table[state as usize];
            for bit in 0..4i32 {
                if next & (1 << bit) != 0 {
                    cells.push(Cell(2 * bx + p + (bit & 1), 2 * by + p + (bit >> 1)));
                }
            }
        }
        Pattern { cells }
    }
}

impl FromStr for MargolusRule {
    type Err = RuleParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut table = [0u8; 16];
        let mut count = 0usize;
        for entry in text.split(',') {
            let value: u32 = entry.trim().parse()?;
            if value >= 16 {
                return Err(RuleParseError::EntryOutOfRange(value));
            }
            if count < 16 {
                table[count] = value as u8;
            }
            count += 1;
        }
        if count != 16 {
            return Err(RuleParseError::WrongCount(count));
        }
        Ok(MargolusRule::new(table))
    }
}

impl fmt::Display for MargolusRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.table.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", entry)?;
        }
        write!(f, "]")
    }
}

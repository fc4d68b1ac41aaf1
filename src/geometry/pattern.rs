// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The canonical cell-list form of a pattern.
//!
//! A [`Pattern`] is a finite set of live cells stored as a vector. Most of
//! the analysis code relies on two conventions:
//!
//! - **Canonical order**: cells sorted lexicographically by `(x, y)` with
//!   duplicates removed, so that equal sets compare equal and patterns can
//!   be used as hash-map keys.
//! - **Canonical anchor**: [`Pattern::normalize`] translates the pattern so
//!   its bounding-box corner lands in `{0, 1}²`. The translation is always
//!   by an even vector, which preserves the pattern's alignment with the
//!   Margolus block lattice. Re-anchoring onto the other sub-lattice would
//!   change the dynamics: a 2x2 block centred on a block boundary has
//!   period 2, the same square aligned with a block has period 4.

use crate::geometry::{Cell, Transform};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from parsing run-length-encoded pattern text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RleError {
    #[error("unexpected character {0:?} in RLE text")]
    UnexpectedChar(char),
    #[error("dangling run count at end of RLE text")]
    DanglingCount,
}

/// A finite set of live cells.
///
/// Serializes transparently as a list of `[x, y]` pairs.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    pub cells: Vec<Cell>,
}

impl Pattern {
    pub fn new() -> Self {
        Pattern { cells: Vec::new() }
    }

    /// Build a pattern from arbitrary cells, sorting and deduplicating.
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        let mut pattern = Pattern { cells };
        pattern.sort();
        pattern
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Minimum and maximum corner of the bounding box, or None when empty.
    pub fn bounds(&self) -> Option<(Cell, Cell)> {
        let first = *self.cells.first()?;
        let mut min = first;
        let mut max = first;
        for &Cell(x, y) in &self.cells {
            min = Cell(min.0.min(x), min.1.min(y));
            max = Cell(max.0.max(x), max.1.max(y));
        }
        Some((min, max))
    }

    /// The larger bounding-box dimension, or None when empty.
    pub fn max_dimension(&self) -> Option<i32> {
        let (min, max) = self.bounds()?;
        let size = max - min;
        Some(size.0.max(size.1))
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for cell in &mut self.cells {
            *cell = *cell + Cell(dx, dy);
        }
    }

    /// Apply a rotation to every cell (block-centre semantics, see
    /// [`Transform::apply_cell`]). The result is left unsorted; callers
    /// normally follow with [`Pattern::normalize`].
    pub fn transform(&mut self, transform: &Transform) {
        for cell in &mut self.cells {
            *cell = transform.apply_cell(*cell);
        }
    }

    /// Restore canonical cell order, dropping duplicates.
    pub fn sort(&mut self) {
        self.cells.sort();
        self.cells.dedup();
    }

    /// Translate to the canonical anchor and sort.
    ///
    /// The bounding-box corner is moved into `{0, 1}²` by an even
    /// translation, keeping the pattern on its original sub-lattice.
    pub fn normalize(&mut self) {
        if let Some((min, _)) = self.bounds() {
            let dx = -2 * min.0.div_euclid(2);
            let dy = -2 * min.1.div_euclid(2);
            self.translate(dx, dy);
        }
        self.sort();
    }

    /// A normalized copy.
    pub fn normalized(&self) -> Pattern {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }

    /// Find the translation `d` with `other = self + d`, restricted to
    /// vectors whose components both have the parity selected by `odd`.
    ///
    /// Both patterns must be in canonical cell order. Two empty patterns are
    /// equal with offset `(0, 0)`, which only the even parity accepts.
    pub fn offset_equal_with_oddity(&self, other: &Pattern, odd: bool) -> Option<Cell> {
        if self.len() != other.len() {
            return None;
        }
        if self.is_empty() {
            return if odd { None } else { Some(Cell::ZERO) };
        }
        let d = other.cells[0] - self.cells[0];
        if !d.has_parity(odd) {
            return None;
        }
        for (&a, &b) in self.cells.iter().zip(&other.cells) {
            if a + d != b {
                return None;
            }
        }
        Some(d)
    }

    /// Parse run-length-encoded text: `b`/`.` dead, `o` alive, `$` next row,
    /// optional run counts, optional trailing `!`. Whitespace is ignored.
    pub fn from_rle(text: &str) -> Result<Pattern, RleError> {
        let mut cells = Vec::new();
        let mut x = 0i32;
        let mut y = 0i32;
        let mut count = 0i32;
        for ch in text.chars() {
            match ch {
                '0'..='9' => count = count * 10 + (ch as i32 - '0' as i32),
                'b' | '.' => {
                    x += count.max(1);
                    count = 0;
                }
                'o' => {
                    for _ in 0..count.max(1) {
                        cells.push(Cell(x, y));
                        x += 1;
                    }
                    count = 0;
                }
                '$' => {
                    y += count.max(1);
                    x = 0;
                    count = 0;
                }
                '!' => return Ok(Pattern::from_cells(cells)),
                c if c.is_whitespace() => {}
                c => return Err(RleError::UnexpectedChar(c)),
            }
        }
        if count != 0 {
            return Err(RleError::DanglingCount);
        }
        Ok(Pattern::from_cells(cells))
    }

    /// Encode as run-length text.
    ///
    /// Cells are emitted relative to the origin when no coordinate is
    /// negative, so a normalized pattern keeps its sub-lattice alignment
    /// through an encode/decode round trip. Patterns with negative
    /// coordinates are emitted relative to their bounding-box corner.
    pub fn to_rle(&self) -> String {
        if self.is_empty() {
            return String::from("!");
        }
        let (min, _) = self.bounds().expect("non-empty pattern has bounds");
        let origin = Cell(min.0.min(0), min.1.min(0));

        let mut rows: Vec<Cell> = self.cells.clone();
        rows.sort_by_key(|c| (c.1, c.0));
        rows.dedup();

        let mut out = String::new();
        let emit = |out: &mut String, run: i32, ch: char| match run {
            0 => {}
            1 => out.push(ch),
            n => {
                out.push_str(&n.to_string());
                out.push(ch);
            }
        };

        let mut cur_y = origin.1;
        let mut cur_x = origin.0;
        let mut alive_run = 0;
        for &Cell(x, y) in &rows {
            if y != cur_y {
                emit(&mut out, alive_run, 'o');
                alive_run = 0;
                emit(&mut out, y - cur_y, '$');
                cur_y = y;
                cur_x = origin.0;
            }
            if x != cur_x + alive_run {
                emit(&mut out, alive_run, 'o');
                alive_run = 0;
                emit(&mut out, x - cur_x, 'b');
                cur_x = x;
            }
            alive_run += 1;
        }
        emit(&mut out, alive_run, 'o');
        out.push('!');
        out
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rle())
    }
}

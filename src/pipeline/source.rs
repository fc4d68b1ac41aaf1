// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Where candidate patterns come from.
//!
//! A [`PatternSource`] hands out patterns to worker threads through `&self`;
//! implementations synchronize internally so workers share one source
//! without external locking. Two implementations exist:
//!
//! - [`FilePatternSource`] reads one JSON cell list per line from a file,
//!   for re-analyzing previously collected candidates;
//! - [`BruteforceSource`] enumerates n-cell seed patterns exhaustively in
//!   colexicographic order over a diagonal numbering of the quarter plane.
//!   It never closes; a bulk run over it ends by signal or by operator
//!   patience.
//!
//! Sources also report a resumption cursor as text so a long enumeration
//! can be restarted where a previous run stopped.

use crate::geometry::{Cell, Pattern};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;

/// Errors from reading the next candidate pattern.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read pattern input: {0}")]
    Io(#[from] io::Error),
    #[error("bad pattern on line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
}

/// A shared, internally synchronized stream of candidate patterns.
pub trait PatternSource: Sync {
    /// The next pattern, or None when the source is exhausted.
    fn next(&self) -> Result<Option<Pattern>, SourceError>;

    /// Patterns handed out so far.
    fn processed(&self) -> u64;

    /// True once the source will never produce another pattern.
    fn is_closed(&self) -> bool;

    /// Human-readable resumption cursor for progress reports.
    fn position_text(&self) -> String;
}

/// Patterns read from a file, one JSON cell list per line.
///
/// Blank lines are skipped; a malformed line is reported as an error with
/// its line number and the stream continues afterwards.
pub struct FilePatternSource {
    reader: Mutex<Box<dyn BufRead + Send>>,
    line: AtomicU64,
    processed: AtomicU64,
    closed: AtomicBool,
}

impl FilePatternSource {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(FilePatternSource::from_reader(BufReader::new(file)))
    }

    pub fn from_reader(reader: impl BufRead + Send + 'static) -> Self {
        FilePatternSource {
            reader: Mutex::new(Box::new(reader)),
            line: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }
}

impl PatternSource for FilePatternSource {
    fn next(&self) -> Result<Option<Pattern>, SourceError> {
        let mut reader = self.reader.lock().expect("source lock poisoned");
        loop {
            let mut text = String::new();
            if reader.read_line(&mut text)? == 0 {
                self.closed.store(true, Ordering::Relaxed);
                return Ok(None);
            }
            let line = self.line.fetch_add(1, Ordering::Relaxed) + 1;
            if text.trim().is_empty() {
                continue;
            }
            let pattern: Pattern = serde_json::from_str(text.trim())
                .map_err(|source| SourceError::Parse { line, source })?;
            self.processed.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(pattern));
        }
    }

    fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    fn position_text(&self) -> String {
        format!("line {}", self.line.load(Ordering::Relaxed))
    }
}

/// Pre-simulation rejection test for enumerated seeds.
pub trait PatternFilter: Send + Sync {
    fn accept(&self, pattern: &Pattern) -> bool;
}

/// Diagonal numbering of the quarter plane: index 0 is the origin, then
/// each anti-diagonal `x + y = d` is walked in order of increasing x.
pub fn position(index: u64) -> Cell {
    let mut d = 0u64;
    while (d + 1) * (d + 2) / 2 <= index {
        d += 1;
    }
    let r = index - d * (d + 1) / 2;
    Cell(r as i32, (d - r) as i32)
}

/// Cursor of a bruteforce enumeration: one digit per cell beyond the fixed
/// origin cell, kept non-decreasing.
struct Odometer {
    digits: Vec<u64>,
    done: bool,
}

impl Odometer {
    fn new(digits: Vec<u64>) -> Self {
        assert!(
            digits.windows(2).all(|w| w[0] <= w[1]),
            "bruteforce cursor digits must be non-decreasing"
        );
        Odometer {
            digits,
            done: false,
        }
    }

    /// The seed pattern at the current cursor. Cell k is at quarter-plane
    /// index `digits[k] + k + 1`, so distinct digits give distinct cells.
    fn current(&self) -> Pattern {
        let mut cells = vec![position(0)];
        for (k, &digit) in self.digits.iter().enumerate() {
            cells.push(position(digit + k as u64 + 1));
        }
        Pattern::from_cells(cells)
    }

    /// Colexicographic increment: bump the first digit, carrying whenever a
    /// digit passes the one after it.
    fn advance(&mut self) {
        if self.digits.is_empty() {
            self.done = true;
            return;
        }
        self.digits[0] += 1;
        for k in 0..self.digits.len() - 1 {
            if self.digits[k] > self.digits[k + 1] {
                self.digits[k] = 0;
                self.digits[k + 1] += 1;
            } else {
                break;
            }
        }
    }
}

/// Exhaustive enumeration of n-cell seed patterns.
pub struct BruteforceSource {
    cursor: Mutex<Odometer>,
    processed: AtomicU64,
    closed: AtomicBool,
    filters: Vec<Box<dyn PatternFilter>>,
}

impl BruteforceSource {
    /// Enumerate all patterns of `size` cells, starting from the first.
    pub fn new(size: usize) -> Self {
        assert!(size >= 1, "bruteforce size must be at least 1");
        BruteforceSource::resume(vec![0; size - 1])
    }

    /// Resume an enumeration from a saved cursor; the cursor length fixes
    /// the pattern size at `digits.len() + 1`.
    pub fn resume(digits: Vec<u64>) -> Self {
        BruteforceSource {
            cursor: Mutex::new(Odometer::new(digits)),
            processed: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            filters: Vec::new(),
        }
    }

    pub fn add_filter(&mut self, filter: Box<dyn PatternFilter>) {
        self.filters.push(filter);
    }
}

impl PatternSource for BruteforceSource {
    fn next(&self) -> Result<Option<Pattern>, SourceError> {
        let mut cursor = self.cursor.lock().expect("source lock poisoned");
        loop {
            if cursor.done {
                self.closed.store(true, Ordering::Relaxed);
                return Ok(None);
            }
            let pattern = cursor.current();
            cursor.advance();
            if self.filters.iter().all(|f| f.accept(&pattern)) {
                self.processed.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(pattern));
            }
        }
    }

    fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    fn position_text(&self) -> String {
        let cursor = self.cursor.lock().expect("source lock poisoned");
        cursor
            .digits
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Rejects seeds that are provably static under rules which only move the
/// lone cell of a block: if neither sub-lattice partition contains a block
/// holding exactly one live cell, nothing ever changes.
pub struct FrozenPatternFilter;

impl FrozenPatternFilter {
    fn has_singleton_block(pattern: &Pattern, phase: bool) -> bool {
        let p = phase as i32;
        let mut counts: std::collections::HashMap<Cell, u32> = std::collections::HashMap::new();
        for &Cell(x, y) in &pattern.cells {
            let block = Cell((x - p).div_euclid(2), (y - p).div_euclid(2));
            *counts.entry(block).or_insert(0) += 1;
        }
        counts.values().any(|&n| n == 1)
    }
}

impl PatternFilter for FrozenPatternFilter {
    fn accept(&self, pattern: &Pattern) -> bool {
        Self::has_singleton_block(pattern, false) || Self::has_singleton_block(pattern, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_walks_diagonals() {
        let expected = [
            Cell(0, 0),
            Cell(0, 1),
            Cell(1, 0),
            Cell(0, 2),
            Cell(1, 1),
            Cell(2, 0),
            Cell(0, 3),
        ];
        for (index, &cell) in expected.iter().enumerate() {
            assert_eq!(position(index as u64), cell, "index {}", index);
        }
    }

    #[test]
    fn test_odometer_sequence() {
        let mut odometer = Odometer::new(vec![0, 0]);
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(odometer.digits.clone());
            odometer.advance();
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![1, 1],
                vec![0, 2],
                vec![1, 2],
                vec![2, 2],
                vec![0, 3],
            ]
        );
    }

    #[test]
    fn test_odometer_single_cell_closes() {
        let mut odometer = Odometer::new(vec![]);
        assert_eq!(odometer.current().len(), 1);
        odometer.advance();
        assert!(odometer.done);
    }

    #[test]
    #[should_panic(expected = "non-decreasing")]
    fn test_cursor_must_be_non_decreasing() {
        Odometer::new(vec![2, 1]);
    }

    #[test]
    fn test_resume_produces_the_cursor_pattern() {
        let source = BruteforceSource::resume(vec![1, 2]);
        let pattern = source.next().unwrap().unwrap();
        let expected =
            Pattern::from_cells(vec![position(0), position(2), position(4)]);
        assert_eq!(pattern, expected);
    }

    #[test]
    fn test_bruteforce_counts_distinct_patterns() {
        let source = BruteforceSource::new(2);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..10 {
            let pattern = source.next().unwrap().unwrap();
            assert_eq!(pattern.len(), 2);
            assert!(seen.insert(pattern), "enumeration repeated a pattern");
        }
        assert_eq!(source.processed(), 10);
        assert!(!source.is_closed());
    }

    #[test]
    fn test_frozen_filter() {
        let filter = FrozenPatternFilter;
        // A full block on the even lattice whose cells pair up on the odd
        // lattice as well is provably static.
        assert!(!filter.accept(&Pattern::from_rle("b2o$b2o!").unwrap()));
        // The aligned square splits into four singleton blocks at odd phase.
        assert!(filter.accept(&Pattern::from_rle("2o$2o!").unwrap()));
        assert!(filter.accept(&Pattern::from_rle("o!").unwrap()));
    }

    #[test]
    fn test_file_source_reads_json_lines() {
        let text = "[[0,0]]\n\n[[0,0],[1,0]]\n";
        let source = FilePatternSource::from_reader(std::io::Cursor::new(text));
        assert_eq!(source.next().unwrap().unwrap().len(), 1);
        assert_eq!(source.next().unwrap().unwrap().len(), 2);
        assert!(source.next().unwrap().is_none());
        assert!(source.is_closed());
        assert_eq!(source.processed(), 2);
    }

    #[test]
    fn test_file_source_reports_bad_line() {
        let text = "[[0,0]]\nnot json\n[[1,1]]\n";
        let source = FilePatternSource::from_reader(std::io::Cursor::new(text));
        assert!(source.next().unwrap().is_some());
        match source.next() {
            Err(SourceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other.map(|p| p.is_some())),
        }
        // The stream continues past the bad line.
        assert!(source.next().unwrap().is_some());
    }
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Canonical presentation of a discovered cycle.
//!
//! Two independent normalizations make library entries comparable:
//!
//! - [`most_compact_form`] walks one full period of the cycle and selects
//!   the generation with the highest clustering energy, so the stored phase
//!   of an oscillator or ship is its visually tightest one.
//! - [`normalizing_rotation`] picks the 90-degree rotation that brings a
//!   ship's translation vector into the half-open quadrant `x > 0, y >= 0`,
//!   so the same ship discovered travelling in different directions dedups
//!   to one entry.
//!
//! Rotations use block-centre semantics (see [`Transform::apply_cell`]), so
//! applying one to a cycle's compact form preserves its period and rotates
//! its offset by the same matrix.

use crate::geometry::{Cell, Pattern, Transform, ROTATIONS};
use crate::rule::MargolusRule;

/// Keep the argument with the strictly highest score.
///
/// Ties keep the earlier argument, so scanning a cycle's generations in
/// order makes the selection deterministic.
pub struct Maximizer<T> {
    best: Option<(T, f64)>,
}

impl<T> Maximizer<T> {
    pub fn new() -> Self {
        Maximizer { best: None }
    }

    pub fn put(&mut self, item: T, score: f64) {
        let replace = match &self.best {
            Some((_, best)) => score > *best,
            None => true,
        };
        if replace {
            self.best = Some((item, score));
        }
    }

    pub fn into_best(self) -> Option<T> {
        self.best.map(|(item, _)| item)
    }
}

impl<T> Default for Maximizer<T> {
    fn default() -> Self {
        Maximizer::new()
    }
}

/// Clustering score of a pattern: summed inverse fourth roots of pairwise
/// squared distances, divided by the bounding-box area. Higher is tighter.
/// Patterns with fewer than two cells score zero.
pub fn pattern_energy(pattern: &Pattern) -> f64 {
    let (min, max) = match pattern.bounds() {
        Some(bounds) => bounds,
        None => return 0.0,
    };
    let mut energy = 0.0;
    for (i, &a) in pattern.cells.iter().enumerate() {
        for &b in &pattern.cells[i + 1..] {
            let d = b - a;
            let squared = (d.0 * d.0 + d.1 * d.1) as f64;
            energy += 1.0 / squared.sqrt().sqrt();
        }
    }
    let span = max - min;
    energy / ((span.0 + 1) as f64 * (span.1 + 1) as f64)
}

/// The rotation taking a non-zero translation vector into `x > 0, y >= 0`.
///
/// The zero vector is returned unchanged (oscillators need no rotation).
/// Every non-zero vector lands in exactly one of the four half-open
/// quadrants, so failure to find a rotation is a logic defect.
pub fn normalizing_rotation(offset: Cell) -> Transform {
    if offset == Cell::ZERO {
        return Transform::IDENTITY;
    }
    for rotation in &ROTATIONS {
        let Cell(x, y) = rotation.apply(offset);
        if x > 0 && y >= 0 {
            return *rotation;
        }
    }
    panic!("no normalizing rotation for offset {}", offset);
}

/// The tightest generation of a cycle, normalized.
///
/// Walks `period` generations from `pattern`, scoring each with
/// [`pattern_energy`]; the winner is translated back onto the phase-0
/// footing if it was reached at odd phase, then anchored canonically.
pub fn most_compact_form(pattern: &Pattern, period: u32, rule: &MargolusRule) -> Pattern {
    let mut maximizer = Maximizer::new();
    let mut current = pattern.normalized();
    let mut phase = false;
    maximizer.put((current.clone(), phase), pattern_energy(&current));
    for _ in 1..=period {
        current = rule.apply(&current, phase);
        phase = !phase;
        current.sort();
        maximizer.put((current.clone(), phase), pattern_energy(&current));
    }
    let (mut best, best_phase) = maximizer.into_best().expect("at least one generation");
    let p = best_phase as i32;
    best.translate(p, p);
    best.normalize();
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalyzerConfig, Resolution};
    use crate::rule::SINGLE_ROTATION;

    #[test]
    fn test_normalizing_rotation_all_quadrants() {
        for offset in [
            Cell(3, 0),
            Cell(3, 2),
            Cell(0, 3),
            Cell(-2, 3),
            Cell(-3, 0),
            Cell(-3, -2),
            Cell(0, -3),
            Cell(2, -3),
        ] {
            let rotation = normalizing_rotation(offset);
            let Cell(x, y) = rotation.apply(offset);
            assert!(x > 0 && y >= 0, "offset {} maps to ({}, {})", offset, x, y);
        }
    }

    #[test]
    fn test_normalizing_rotation_zero_is_identity() {
        assert!(normalizing_rotation(Cell::ZERO).is_identity());
    }

    #[test]
    fn test_normalizing_rotation_is_stable() {
        // An already-canonical vector needs no rotation.
        assert!(normalizing_rotation(Cell(2, 2)).is_identity());
        assert!(normalizing_rotation(Cell(1, 0)).is_identity());
    }

    #[test]
    fn test_maximizer_strict_ties_keep_first() {
        let mut m = Maximizer::new();
        m.put("first", 1.0);
        m.put("second", 1.0);
        m.put("third", 0.5);
        assert_eq!(m.into_best(), Some("first"));
    }

    #[test]
    fn test_energy_prefers_tight_patterns() {
        let tight = Pattern::from_rle("2o$2o!").unwrap();
        let loose = Pattern::from_cells(vec![Cell(0, 0), Cell(5, 0), Cell(0, 5), Cell(5, 5)]);
        assert!(pattern_energy(&tight) > pattern_energy(&loose));
        assert_eq!(pattern_energy(&Pattern::new()), 0.0);
        assert_eq!(pattern_energy(&Pattern::from_cells(vec![Cell(0, 0)])), 0.0);
    }

    #[test]
    fn test_compact_form_is_idempotent() {
        let pattern = Pattern::from_rle("2bo$obo$o!").unwrap();
        let result = analyze(&pattern, &SINGLE_ROTATION, &AnalyzerConfig::default());
        assert_eq!(result.resolution, Resolution::CycleFound);

        let compact = most_compact_form(&pattern, result.period as u32, &SINGLE_ROTATION);
        let again = most_compact_form(&compact, result.period as u32, &SINGLE_ROTATION);
        assert_eq!(again, compact);
    }

    #[test]
    fn test_compact_form_preserves_the_cycle() {
        let pattern = Pattern::from_rle("$2o2$2o!").unwrap();
        let result = analyze(&pattern, &SINGLE_ROTATION, &AnalyzerConfig::default());
        assert_eq!(result.period, 12);

        let compact = most_compact_form(&pattern, result.period as u32, &SINGLE_ROTATION);
        let re = analyze(&compact, &SINGLE_ROTATION, &AnalyzerConfig::default());
        assert_eq!(re.resolution, Resolution::CycleFound);
        assert_eq!(re.period, 12);
    }
}

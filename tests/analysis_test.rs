// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! End-to-end analysis of known Single Rotation patterns.
//!
//! Expected periods and offsets for the larger ships come from independent
//! simulations of the rule.

use revca_search::analysis::{
    analyze, most_compact_form, normalizing_rotation, Analyzer, AnalyzerConfig, Resolution,
    TreeAnalyzer,
};
use revca_search::geometry::{Cell, Pattern, ROTATIONS};
use revca_search::rule::SINGLE_ROTATION;

fn config(max_iterations: u32) -> AnalyzerConfig {
    AnalyzerConfig {
        max_iterations,
        ..AnalyzerConfig::default()
    }
}

fn canonical_offset(offset: Cell) -> Cell {
    normalizing_rotation(offset).apply(offset)
}

#[test]
fn test_known_oscillators() {
    for (rle, period) in [("o!", 4), ("b2o$b2o!", 2), ("2o$2o!", 4)] {
        let pattern = Pattern::from_rle(rle).unwrap();
        let result = analyze(&pattern, &SINGLE_ROTATION, &config(4000));
        assert_eq!(result.resolution, Resolution::CycleFound, "pattern {}", rle);
        assert_eq!(result.period, period, "pattern {}", rle);
        assert_eq!(result.offset, Cell::ZERO, "pattern {}", rle);
    }
}

#[test]
fn test_known_ships() {
    for (rle, period, offset) in [
        ("$2o2$2o!", 12, Cell(2, 0)),
        ("2bo$obo$o!", 48, Cell(2, 2)),
        ("o$o2$o$o!", 368, Cell(2, 2)),
        ("b2obobo$4bo$4bo$4bo$6bo!", 242, Cell(4, 0)),
        ("$obo$b2o$2o!", 39, Cell(1, 1)),
    ] {
        let pattern = Pattern::from_rle(rle).unwrap();
        let result = analyze(&pattern, &SINGLE_ROTATION, &config(4000));
        assert_eq!(result.resolution, Resolution::CycleFound, "pattern {}", rle);
        assert_eq!(result.period, period, "pattern {}", rle);
        assert_eq!(canonical_offset(result.offset), offset, "pattern {}", rle);
    }
}

#[test]
fn test_rotation_preserves_period_and_canonical_offset() {
    for rle in ["2bo$obo$o!", "o$o2$o$o!"] {
        let pattern = Pattern::from_rle(rle).unwrap();
        let reference = analyze(&pattern, &SINGLE_ROTATION, &config(4000));
        for rotation in &ROTATIONS {
            let mut rotated = pattern.clone();
            rotated.transform(rotation);
            rotated.normalize();
            let result = analyze(&rotated, &SINGLE_ROTATION, &config(4000));
            assert_eq!(result.period, reference.period, "pattern {}", rle);
            assert_eq!(
                canonical_offset(result.offset),
                canonical_offset(reference.offset),
                "pattern {}",
                rle
            );
        }
    }
}

#[test]
fn test_tree_strategy_agrees_on_large_ships() {
    for rle in ["o$o2$o$o!", "b2obobo$4bo$4bo$4bo$6bo!"] {
        let pattern = Pattern::from_rle(rle).unwrap();
        let direct = analyze(&pattern, &SINGLE_ROTATION, &config(4000));
        let mut tree = TreeAnalyzer::with_config(SINGLE_ROTATION, config(4000));
        let result = tree.process(&pattern);
        assert_eq!(result.resolution, direct.resolution, "pattern {}", rle);
        assert_eq!(result.period, direct.period, "pattern {}", rle);
        assert_eq!(result.offset, direct.offset, "pattern {}", rle);
    }
}

#[test]
fn test_compact_form_reanalyzes_to_same_cycle() {
    let pattern = Pattern::from_rle("2bo$obo$o!").unwrap();
    let result = analyze(&pattern, &SINGLE_ROTATION, &config(4000));
    assert_eq!(result.period, 48);

    let mut compact = most_compact_form(&pattern, result.period as u32, &SINGLE_ROTATION);
    let rotation = normalizing_rotation(result.offset);
    compact.transform(&rotation);
    compact.normalize();

    let re = analyze(&compact, &SINGLE_ROTATION, &config(4000));
    assert_eq!(re.resolution, Resolution::CycleFound);
    assert_eq!(re.period, 48);
    assert_eq!(canonical_offset(re.offset), Cell(2, 2));
}

#[test]
fn test_size_ceiling_reports_too_wide() {
    let pattern = Pattern::from_rle("2bo$obo$o!").unwrap();
    let tight = AnalyzerConfig {
        max_size: 2,
        ..AnalyzerConfig::default()
    };
    let result = analyze(&pattern, &SINGLE_ROTATION, &tight);
    assert_eq!(result.resolution, Resolution::PatternTooWide);
    assert_eq!(result.period, -1);
    assert_eq!(result.offset, Cell::ZERO);
}

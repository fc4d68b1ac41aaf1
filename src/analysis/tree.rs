// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Block-tree simulation strategy.
//!
//! Same cycle-detection contract as the direct strategy, but the pattern is
//! kept as a [`BlockTree`] so each generation touches occupied blocks only.
//! Equality with the starting tree is tested in block units; a block offset
//! `d` found when the trees sit on sub-lattice `a` converts back to the cell
//! offset `2d - (a, a)`.
//!
//! The population ceiling counts blocks here rather than cells, and the size
//! ceiling is checked against the cell-granularity span covered by the
//! occupied blocks. Both ceilings are conservative in the same direction as
//! the direct strategy, so the two strategies agree on every pattern that
//! neither ceiling stops.

use crate::analysis::{Analyzer, AnalysisResult, AnalyzerConfig, Resolution};
use crate::blocktree::BlockTree;
use crate::geometry::{Cell, Pattern};
use crate::rule::MargolusRule;

/// Block-tree simulation strategy.
pub struct TreeAnalyzer {
    rule: MargolusRule,
    pub config: AnalyzerConfig,
}

impl TreeAnalyzer {
    pub fn new(rule: MargolusRule) -> Self {
        TreeAnalyzer {
            rule,
            config: AnalyzerConfig::default(),
        }
    }

    pub fn with_config(rule: MargolusRule, config: AnalyzerConfig) -> Self {
        TreeAnalyzer { rule, config }
    }
}

impl Analyzer for TreeAnalyzer {
    fn process(&mut self, pattern: &Pattern) -> AnalysisResult {
        let initial = BlockTree::from_pattern(&pattern.normalized());
        analyze_with_trees(&initial, &self.rule, &self.config)
    }

    fn rule(&self) -> &MargolusRule {
        &self.rule
    }
}

/// The tree-granularity simulation loop.
pub fn analyze_with_trees(
    initial: &BlockTree,
    rule: &MargolusRule,
    config: &AnalyzerConfig,
) -> AnalysisResult {
    let mut result = AnalysisResult {
        resolution: Resolution::IterationsExceeded,
        period: -1,
        offset: Cell::ZERO,
        analyzed_generations: config.max_iterations,
        max_size: 0,
    };

    let mut current = initial.clone();
    let mut phase = false;
    for iteration in 1..=config.max_iterations {
        current = current.step(rule, phase);
        phase = !phase;

        if let Some(d) = initial.shift_equal(&current) {
            let a = current.align() as i32;
            result.resolution = Resolution::CycleFound;
            result.period = iteration as i32;
            result.offset = d * 2 - Cell(a, a);
            result.analyzed_generations = iteration;
            return result;
        }
        if current.block_count() > config.max_population {
            result.resolution = Resolution::PatternTooBig;
            break;
        }
        if let Some((min, max)) = current.block_bounds() {
            let span = max - min;
            let size = span.0.max(span.1) * 2 + 2;
            result.max_size = result.max_size.max(size);
            if size > config.max_size {
                result.resolution = Resolution::PatternTooWide;
                break;
            }
        }
    }
    result.offset = Cell::ZERO;
    result
}

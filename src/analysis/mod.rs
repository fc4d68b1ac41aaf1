// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cycle-detection simulation engine.
//!
//! Given a pattern and a rule, an analyzer simulates generations until the
//! starting configuration reappears up to translation, reporting the period
//! and the translation vector, or until one of the configured ceilings stops
//! the run. Three strategies share this module's `AnalysisResult` contract:
//!
//! - [`CellListAnalyzer`] simulates the cell list directly (this file);
//! - [`TreeAnalyzer`] works in block units for patterns whose bounding box
//!   makes cell-list simulation too slow ([`tree`]);
//! - [`CachingAnalyzer`] wraps the direct strategy with a memoizing cache
//!   that turns repeated sub-problems into lookups ([`cache`]).
//!
//! # The oddity check
//!
//! Margolus sub-lattices alternate every generation, so two configurations
//! are only comparable when their phase parities match. The cycle-closure
//! test therefore restricts candidate translations to vectors whose
//! components both have the parity of the current generation count; see
//! [`Pattern::offset_equal_with_oddity`].
//!
//! # Lifecycle hooks
//!
//! The simulation loop reports to a [`SimulationHooks`] strategy object at
//! three points: before the first generation, after every generation, and
//! when a terminal result is produced. The direct strategy observes nothing
//! ([`NoHooks`]); the caching strategy records generation snapshots to
//! populate its cache. Hooks are pure observation points and never alter
//! the simulation.

pub mod cache;
pub mod canonical;
pub mod tree;

pub use cache::{AnalyzerCache, CachingAnalyzer};
pub use canonical::{most_compact_form, normalizing_rotation, pattern_energy, Maximizer};
pub use tree::TreeAnalyzer;

use crate::geometry::{Cell, Pattern};
use crate::rule::MargolusRule;
use serde::Serialize;

/// Why an analysis run stopped. Exactly one resolution holds per run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub enum Resolution {
    /// The starting configuration reappeared, up to translation.
    CycleFound,
    /// The iteration ceiling was reached first; the pattern may still be
    /// periodic with a longer period. Never interpreted as "never cycles".
    IterationsExceeded,
    /// The population ceiling was exceeded.
    PatternTooBig,
    /// The bounding-box ceiling was exceeded.
    PatternTooWide,
}

/// Outcome of analyzing one pattern. Immutable once produced; cached copies
/// are shared read-only across many canonical keys.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub struct AnalysisResult {
    pub resolution: Resolution,
    /// Generations until the cycle closed; -1 when no cycle was found.
    pub period: i32,
    /// Translation between the starting configuration and its reproduction;
    /// `(0, 0)` for a pure oscillator, and meaningless when no cycle was
    /// found.
    pub offset: Cell,
    /// Generations actually simulated; equals the configured ceiling when no
    /// cycle was found.
    pub analyzed_generations: u32,
    /// Largest bounding-box dimension observed during the run. Only the tree
    /// strategy fills this in.
    pub max_size: i32,
}

impl AnalysisResult {
    /// The result every run starts from: inconclusive at the full ceiling.
    fn inconclusive(max_iterations: u32) -> Self {
        AnalysisResult {
            resolution: Resolution::IterationsExceeded,
            period: -1,
            offset: Cell::ZERO,
            analyzed_generations: max_iterations,
            max_size: 0,
        }
    }

    pub fn is_cycle(&self) -> bool {
        self.resolution == Resolution::CycleFound
    }
}

/// Termination ceilings for one analysis run.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AnalyzerConfig {
    /// Generations to simulate before giving up.
    pub max_iterations: u32,
    /// Population ceiling; the tree strategy counts blocks instead of cells.
    pub max_population: usize,
    /// Bounding-box ceiling on the larger dimension.
    pub max_size: i32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            max_iterations: 4000,
            max_population: 1024,
            max_size: 30,
        }
    }
}

/// Observation points of the simulation loop.
///
/// All methods default to no-ops, so an implementation only overrides the
/// events it cares about.
pub trait SimulationHooks {
    /// Called once before simulation starts, with the canonicalized pattern.
    fn on_start(&mut self, _pattern: &Pattern) {}

    /// Called after every generation with the current configuration, already
    /// in canonical cell order.
    fn on_iteration(&mut self, _age: u32, _pattern: &Pattern) {}

    /// Called once when a terminal result is produced, with the original
    /// input pattern.
    fn on_result(&mut self, _pattern: &Pattern, _result: &AnalysisResult) {}
}

/// Hooks that observe nothing.
pub struct NoHooks;

impl SimulationHooks for NoHooks {}

/// A simulation strategy producing an [`AnalysisResult`] from a pattern.
pub trait Analyzer {
    fn process(&mut self, pattern: &Pattern) -> AnalysisResult;

    fn rule(&self) -> &MargolusRule;
}

/// Run the direct cell-list simulation loop.
///
/// The input is canonicalized first and kept as the cycle-closure reference;
/// every generation is evaluated, re-sorted, reported to the hooks and then
/// tested for translation-equality with the reference under the oddity
/// constraint. An empty pattern or a lone cell runs through the same loop;
/// there is no special-cased fast path.
pub fn simulate<H: SimulationHooks>(
    rule: &MargolusRule,
    config: &AnalyzerConfig,
    pattern: &Pattern,
    hooks: &mut H,
) -> AnalysisResult {
    let mut reference = pattern.clone();
    reference.normalize();
    hooks.on_start(&reference);

    let mut current = reference.clone();
    let mut phase = false;
    let mut result = AnalysisResult::inconclusive(config.max_iterations);

    for iteration in 1..=config.max_iterations {
        current = rule.apply(&current, phase);
        phase = !phase;
        current.sort();
        hooks.on_iteration(iteration, &current);

        if let Some(offset) = reference.offset_equal_with_oddity(&current, phase) {
            result.resolution = Resolution::CycleFound;
            result.period = iteration as i32;
            result.offset = offset;
            result.analyzed_generations = iteration;
            hooks.on_result(pattern, &result);
            return result;
        }
        if current.len() > config.max_population {
            result.resolution = Resolution::PatternTooBig;
            break;
        }
        if let Some(size) = current.max_dimension() {
            if size > config.max_size {
                result.resolution = Resolution::PatternTooWide;
                break;
            }
        }
    }

    result.offset = Cell::ZERO;
    hooks.on_result(pattern, &result);
    result
}

/// Direct cell-list simulation strategy.
pub struct CellListAnalyzer {
    rule: MargolusRule,
    pub config: AnalyzerConfig,
}

impl CellListAnalyzer {
    pub fn new(rule: MargolusRule) -> Self {
        CellListAnalyzer {
            rule,
            config: AnalyzerConfig::default(),
        }
    }

    pub fn with_config(rule: MargolusRule, config: AnalyzerConfig) -> Self {
        CellListAnalyzer { rule, config }
    }
}

impl Analyzer for CellListAnalyzer {
    fn process(&mut self, pattern: &Pattern) -> AnalysisResult {
        simulate(&self.rule, &self.config, pattern, &mut NoHooks)
    }

    fn rule(&self) -> &MargolusRule {
        &self.rule
    }
}

/// One-shot analysis with the direct strategy.
pub fn analyze(pattern: &Pattern, rule: &MargolusRule, config: &AnalyzerConfig) -> AnalysisResult {
    simulate(rule, config, pattern, &mut NoHooks)
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Memoizing wrapper around the direct simulation strategy.
//!
//! When a run closes as a cycle, every generation it passed through belongs
//! to the same orbit and therefore has the same period. The caching strategy
//! records each generation snapshot during the run and, on closure, maps the
//! normalized form of every snapshot to the one shared [`AnalysisResult`].
//! A later query for any configuration on the orbit is then a single lookup.
//!
//! Inconclusive runs are never cached: a result produced under one ceiling
//! would be wrong under a higher one.
//!
//! The cache grows without bound while it is live. [`AnalyzerCache::freeze`]
//! stops admission, keeping lookups on everything learned so far while
//! holding memory steady for the remainder of a long run.

use crate::analysis::{simulate, AnalysisResult, Analyzer, AnalyzerConfig, SimulationHooks};
use crate::geometry::Pattern;
use crate::rule::MargolusRule;
use std::collections::HashMap;

/// Arena of analysis results keyed by normalized pattern.
///
/// Results live in a vector and many patterns map to the same entry, so an
/// orbit of several hundred generations stores its result once.
#[derive(Default)]
pub struct AnalyzerCache {
    results: Vec<AnalysisResult>,
    index: HashMap<Pattern, usize>,
    frozen: bool,
}

impl AnalyzerCache {
    pub fn new() -> Self {
        AnalyzerCache::default()
    }

    /// Add a result to the arena, returning its slot, or None when frozen.
    fn store(&mut self, result: AnalysisResult) -> Option<usize> {
        if self.frozen {
            return None;
        }
        self.results.push(result);
        Some(self.results.len() - 1)
    }

    /// Point a normalized pattern at an arena slot. No-op when frozen.
    fn map(&mut self, key: Pattern, slot: usize) {
        if self.frozen {
            return;
        }
        self.index.entry(key).or_insert(slot);
    }

    /// Look up a normalized pattern.
    pub fn lookup(&self, key: &Pattern) -> Option<&AnalysisResult> {
        self.index.get(key).map(|&slot| &self.results[slot])
    }

    /// Number of patterns with a cached result.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Stop admitting new results; existing entries stay queryable.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }
}

/// Direct simulation with orbit-level memoization.
pub struct CachingAnalyzer {
    rule: MargolusRule,
    pub config: AnalyzerConfig,
    cache: AnalyzerCache,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

struct OrbitRecorder<'a> {
    cache: &'a mut AnalyzerCache,
    evolution: Vec<Pattern>,
}

impl SimulationHooks for OrbitRecorder<'_> {
    fn on_start(&mut self, pattern: &Pattern) {
        if !self.cache.is_frozen() {
            self.evolution.push(pattern.clone());
        }
    }

    fn on_iteration(&mut self, _age: u32, pattern: &Pattern) {
        if !self.cache.is_frozen() {
            self.evolution.push(pattern.clone());
        }
    }

    fn on_result(&mut self, _pattern: &Pattern, result: &AnalysisResult) {
        if !result.is_cycle() {
            return;
        }
        if let Some(slot) = self.cache.store(*result) {
            for snapshot in self.evolution.drain(..) {
                self.cache.map(snapshot.normalized(), slot);
            }
        }
    }
}

impl CachingAnalyzer {
    pub fn new(rule: MargolusRule) -> Self {
        CachingAnalyzer::with_config(rule, AnalyzerConfig::default())
    }

    pub fn with_config(rule: MargolusRule, config: AnalyzerConfig) -> Self {
        CachingAnalyzer {
            rule,
            config,
            cache: AnalyzerCache::new(),
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    pub fn cache(&self) -> &AnalyzerCache {
        &self.cache
    }

    pub fn freeze_cache(&mut self) {
        self.cache.freeze();
    }
}

impl Analyzer for CachingAnalyzer {
    fn process(&mut self, pattern: &Pattern) -> AnalysisResult {
        let key = pattern.normalized();
        if let Some(result) = self.cache.lookup(&key) {
            self.cache_hits += 1;
            return *result;
        }
        self.cache_misses += 1;
        let mut recorder = OrbitRecorder {
            cache: &mut self.cache,
            evolution: Vec::new(),
        };
        simulate(&self.rule, &self.config, &key, &mut recorder)
    }

    fn rule(&self) -> &MargolusRule {
        &self.rule
    }
}

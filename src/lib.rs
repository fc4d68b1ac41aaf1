// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cycle search for two-state Margolus-neighbourhood cellular automata.
//!
//! Given a finite pattern and a 16-entry block transition table, the crate
//! simulates generations until the pattern reproduces itself up to
//! translation, reporting the period and the translation vector. A zero
//! vector is an oscillator, anything else a ship. On top of the single
//! analysis sits a multithreaded bulk pipeline that pulls candidate seeds
//! from a file or an exhaustive enumeration and collects the ships it finds
//! into a deduplicated JSON library.
//!
//! # Architecture
//!
//! - [`geometry`]: lattice cells, the 90-degree rotation group with
//!   block-centre semantics, and the canonical cell-list pattern form with
//!   RLE and JSON codecs.
//! - [`rule`]: Margolus transition tables and the cell-list evaluator.
//! - [`blocktree`]: the block-granularity pattern representation.
//! - [`analysis`]: the cycle-detection loop in three strategies (direct,
//!   block tree, memoized) plus canonicalization of discovered cycles.
//! - [`pipeline`]: pattern sources, the ship library, and the worker-pool
//!   driver behind the `bulk-analyzer` binary.

pub mod analysis;
pub mod blocktree;
pub mod geometry;
pub mod pipeline;
pub mod rule;

pub use analysis::{
    analyze, AnalysisResult, Analyzer, AnalyzerConfig, CachingAnalyzer, CellListAnalyzer,
    Resolution, TreeAnalyzer,
};
pub use blocktree::BlockTree;
pub use geometry::{Cell, Pattern, Transform};
pub use rule::{MargolusRule, SINGLE_ROTATION};

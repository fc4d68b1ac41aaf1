// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The bulk analysis pipeline.
//!
//! A run wires together a shared [`PatternSource`], a pool of worker
//! threads each owning its own [`TreeAnalyzer`], a deduplicating [`Library`]
//! of discovered ships, and a reporter thread that periodically prints
//! throughput and checkpoints the library to disk as JSON.
//!
//! Workers pull patterns until the source closes. Every discovered cycle
//! that travels (non-zero offset) is reduced to its canonical presentation
//! before entering the library: the tightest generation of the cycle,
//! rotated so the translation vector points into `x > 0, y >= 0`, then
//! anchored. Oscillators are analyzed but not collected; the search is for
//! ships.
//!
//! The reporter keeps checkpointing for as long as the source is open, so
//! an enumeration killed by signal loses at most one checkpoint interval.

pub mod library;
pub mod sink;
pub mod source;

pub use library::{Library, LibraryEntry};
pub use sink::DiagnosticSink;
pub use source::{
    BruteforceSource, FilePatternSource, FrozenPatternFilter, PatternFilter, PatternSource,
    SourceError,
};

use crate::analysis::{
    most_compact_form, normalizing_rotation, Analyzer, AnalyzerConfig, Resolution, TreeAnalyzer,
};
use crate::geometry::{Cell, Pattern};
use crate::rule::MargolusRule;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Configuration of one bulk run.
pub struct RunOptions {
    pub rule: MargolusRule,
    pub config: AnalyzerConfig,
    /// Worker thread count; 0 means one per available CPU.
    pub threads: usize,
    /// Path the library checkpoint is written to.
    pub output: PathBuf,
    /// Reporter wake interval.
    pub report_interval: Duration,
    /// Progress is reported (and the library dumped) every this many wakes.
    pub dump_every: usize,
}

impl RunOptions {
    pub fn new(rule: MargolusRule, output: PathBuf) -> Self {
        RunOptions {
            rule,
            config: AnalyzerConfig::default(),
            threads: 0,
            output,
            report_interval: Duration::from_millis(100),
            dump_every: 10,
        }
    }
}

/// Run the pipeline to completion. Returns once the source has closed and
/// all workers have drained.
pub fn run_analysis(
    source: &dyn PatternSource,
    library: &Library,
    sink: &DiagnosticSink,
    options: &RunOptions,
) {
    let threads = if options.threads == 0 {
        num_cpus::get().max(1)
    } else {
        options.threads
    };
    log::info!(
        "starting bulk analysis: {} worker threads, rule {}",
        threads,
        options.rule
    );
    thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| {
                let mut analyzer = TreeAnalyzer::with_config(options.rule, options.config);
                worker_loop(&mut analyzer, source, library, sink);
            });
        }
        scope.spawn(|| reporter_loop(source, library, sink, options));
    });
    sink.line("finished");
}

fn worker_loop(
    analyzer: &mut dyn Analyzer,
    source: &dyn PatternSource,
    library: &Library,
    sink: &DiagnosticSink,
) {
    loop {
        match source.next() {
            Ok(Some(pattern)) => analyze_record(analyzer, &pattern, library, sink),
            Ok(None) => break,
            Err(e) => sink.line(&format!("error reading pattern: {}", e)),
        }
    }
}

/// Analyze one pattern and record a travelling cycle in the library.
pub fn analyze_record(
    analyzer: &mut dyn Analyzer,
    pattern: &Pattern,
    library: &Library,
    sink: &DiagnosticSink,
) {
    let result = analyzer.process(pattern);
    match result.resolution {
        Resolution::CycleFound if result.offset != Cell::ZERO => {
            let mut compact = most_compact_form(pattern, result.period as u32, analyzer.rule());
            let rotation = normalizing_rotation(result.offset);
            let offset = rotation.apply(result.offset);
            compact.transform(&rotation);
            compact.normalize();
            let population = compact.len();
            library.put(compact.to_rle(), result.period, offset, population);
        }
        Resolution::IterationsExceeded => {
            sink.line(&format!(
                "iterations exceeded: {}",
                pattern.normalized().to_rle()
            ));
        }
        _ => {}
    }
}

fn reporter_loop(
    source: &dyn PatternSource,
    library: &Library,
    sink: &DiagnosticSink,
    options: &RunOptions,
) {
    let mut last_processed = source.processed();
    let mut last_instant = Instant::now();
    let mut wakes = 0usize;
    while !source.is_closed() {
        thread::sleep(options.report_interval);
        wakes += 1;
        if wakes % options.dump_every == 0 {
            let now = Instant::now();
            let processed = source.processed();
            let elapsed = now.duration_since(last_instant).as_secs_f64();
            let throughput = if elapsed > 0.0 {
                (processed - last_processed) as f64 / elapsed
            } else {
                0.0
            };
            sink.line(&format!(
                "analyzed {} patterns ({:.0}/s), {} ships, at {}",
                processed,
                throughput,
                library.len(),
                source.position_text()
            ));
            checkpoint(library, &options.output);
            last_processed = processed;
            last_instant = now;
        }
    }
    // Unconditional final checkpoint once the source drains.
    sink.line(&format!(
        "analyzed {} patterns, {} ships",
        source.processed(),
        library.len()
    ));
    checkpoint(library, &options.output);
}

/// Write the library to its checkpoint file. Failure is logged and left for
/// the next checkpoint to retry.
fn checkpoint(library: &Library, output: &Path) {
    let result = File::create(output).and_then(|mut file| library.dump(&mut file));
    if let Err(e) = result {
        log::error!("failed to write library to {}: {}", output.display(), e);
    }
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line driver for bulk ship searches.
//!
//! Patterns come either from a file of JSON cell lists (`--source`) or from
//! an exhaustive enumeration of n-cell seeds (`--bruteforce N`, optionally
//! resumed at a saved cursor). Discovered ships are checkpointed to the
//! output file as JSON for as long as the run is alive, so an enumeration
//! can simply be killed when it has run long enough.

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use revca_search::analysis::AnalyzerConfig;
use revca_search::pipeline::{
    run_analysis, BruteforceSource, DiagnosticSink, FilePatternSource, FrozenPatternFilter,
    Library, PatternSource, RunOptions,
};
use revca_search::rule::{MargolusRule, SINGLE_ROTATION};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bulk-analyzer", about = "Search Margolus-rule patterns for ships")]
struct Options {
    /// File of candidate patterns, one JSON cell list per line.
    #[arg(short, long, conflicts_with = "bruteforce")]
    source: Option<PathBuf>,

    /// Enumerate all patterns with this many live cells.
    #[arg(short, long)]
    bruteforce: Option<usize>,

    /// Resume the enumeration from a saved cursor (comma-separated digits).
    #[arg(short = 'B', long, value_delimiter = ',', requires = "bruteforce")]
    bruteforce_start: Option<Vec<u64>>,

    /// Transition table as 16 comma-separated entries. Default: Single
    /// Rotation.
    #[arg(short, long)]
    rule: Option<MargolusRule>,

    /// Generations to simulate before giving a pattern up.
    #[arg(short = 'I', long = "max-iter", default_value_t = 10_000)]
    max_iterations: u32,

    /// Bounding-box ceiling on growing patterns.
    #[arg(short = 'S', long = "max-size", default_value_t = 50)]
    max_size: i32,

    /// Worker threads; 0 means one per available CPU.
    #[arg(short = 'T', long, default_value_t = 0)]
    threads: usize,

    /// File the discovered-ship library is written to.
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse();

    ensure!(options.max_iterations > 0, "--max-iter must be positive");
    ensure!(options.max_size > 0, "--max-size must be positive");
    ensure!(options.threads <= 1000, "--threads is implausibly large");

    let rule = options.rule.unwrap_or(SINGLE_ROTATION);
    let config = AnalyzerConfig {
        max_iterations: options.max_iterations,
        max_size: options.max_size,
        ..AnalyzerConfig::default()
    };

    let (source, library): (Box<dyn PatternSource>, Library) =
        match (&options.source, options.bruteforce) {
            (Some(path), None) => {
                let source = FilePatternSource::open(path)
                    .with_context(|| format!("cannot open {}", path.display()))?;
                (Box::new(source), Library::new())
            }
            (None, Some(size)) => {
                ensure!(size >= 1, "--bruteforce size must be at least 1");
                let mut source = match options.bruteforce_start {
                    Some(digits) => {
                        ensure!(
                            digits.len() == size - 1,
                            "--bruteforce-start needs {} digits for size {}",
                            size - 1,
                            size
                        );
                        ensure!(
                            digits.windows(2).all(|w| w[0] <= w[1]),
                            "--bruteforce-start digits must be non-decreasing"
                        );
                        BruteforceSource::resume(digits)
                    }
                    None => BruteforceSource::new(size),
                };
                if rule == SINGLE_ROTATION {
                    log::info!("rule moves lone cells only; filtering frozen seeds");
                    source.add_filter(Box::new(FrozenPatternFilter));
                }
                // Exhaustive enumeration visits every orbit a known number
                // of times; hit counts would add nothing but noise.
                (Box::new(source), Library::with_hit_count(false))
            }
            (None, None) => bail!("one of --source or --bruteforce is required"),
            (Some(_), Some(_)) => unreachable!("clap rejects conflicting sources"),
        };

    let mut run = RunOptions::new(rule, options.output);
    run.config = config;
    run.threads = options.threads;

    let sink = DiagnosticSink::stderr();
    run_analysis(source.as_ref(), &library, &sink, &run);
    Ok(())
}

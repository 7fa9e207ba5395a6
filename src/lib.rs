//! Finds every unordered quintuple of five-letter words that together cover
//! 25 of the 26 letters of the alphabet with no repeats.
//!
//! The pipeline: [`ingest`] builds the [`word_index::WordIndex`] and
//! [`keytable::KeyTable`] from a word list; [`frequency`] derives the
//! rarest-letter-first search order and tier-mask letters; [`tier`]
//! partitions the key table into per-letter regions; [`search`] (driven by
//! [`pool`] across worker threads) walks the tiered DFS and appends each
//! solution to an [`output::SolutionBuffer`].

pub mod codec;
pub mod config;
pub mod error;
pub mod frequency;
pub mod ingest;
pub mod keytable;
pub mod output;
pub mod pool;
pub mod search;
pub mod tier;
pub mod word_index;

use std::time::Instant;

use tracing::info;

pub use config::Config;
pub use error::SolverError;

/// A finished run: where the solutions ended up and some build-phase
/// accounting useful for `--verbose` reporting.
pub struct SolveReport {
    pub solutions: output::SolutionBuffer,
    pub candidate_count: usize,
    pub skipped_input_lines: u64,
    pub hash_collisions: u64,
}

/// Runs the full pipeline against `config.input` and returns the populated
/// solution buffer. This is the single entry point both the CLI binary and
/// any other caller should use.
pub fn solve(config: &Config) -> Result<SolveReport, SolverError> {
    config.validate()?;

    let t0 = Instant::now();
    let ingested = ingest::load(&config.input)?;
    info!(
        candidates = ingested.keys.len(),
        skipped = ingested.skipped,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "ingested word list"
    );

    let t1 = Instant::now();
    let model = frequency::FrequencyModel::build(ingested.keys.as_slice(), config)?;
    info!(
        elapsed_ms = t1.elapsed().as_millis() as u64,
        "built frequency model"
    );
    if config.verbose {
        tracing::debug!(report = %model.report(), "frequency model detail");
        for (rank, entry) in model.entries.iter().enumerate() {
            let letter = (b'a' + entry.letter) as char;
            tracing::debug!(rank, %letter, frequency = entry.frequency, "letter frequency rank");
        }
    }

    let t2 = Instant::now();
    let letter_tiers = tier::build(ingested.keys.as_slice(), &model);
    info!(
        elapsed_ms = t2.elapsed().as_millis() as u64,
        "built tier arrays"
    );
    if config.verbose {
        for lt in &letter_tiers {
            let (toff1, toff2, toff3, len) = lt.sets[0].offsets();
            let letter = (b'a' + lt.letter) as char;
            tracing::debug!(
                %letter,
                toff1,
                toff2,
                toff3,
                len,
                "base-set tier offsets"
            );
        }
    }

    // A generous upper bound: solution counts for this puzzle are in the
    // low thousands even for the full ~370k-word corpus.
    let solutions = output::SolutionBuffer::with_capacity(1 << 20);

    let ctx = search::SearchContext::new(
        &model,
        &letter_tiers,
        ingested.keys.as_slice(),
        &ingested.index,
        &solutions,
        config,
    );

    let t3 = Instant::now();
    let num_threads = config.resolve_num_threads();
    if num_threads <= 1 {
        search::solve_single_threaded(&ctx);
    } else {
        pool::solve_parallel(&ctx, num_threads)?;
    }
    info!(
        solutions = solutions.count(),
        threads = num_threads,
        elapsed_ms = t3.elapsed().as_millis() as u64,
        "search complete"
    );

    Ok(SolveReport {
        candidate_count: ingested.keys.len(),
        skipped_input_lines: ingested.skipped,
        hash_collisions: ingested.index.collisions(),
        solutions,
    })
}

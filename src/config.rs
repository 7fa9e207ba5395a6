//! Solver configuration, exposed both as a `clap` CLI surface and as a plain
//! struct a library caller can build directly without touching `std::env`.

use std::path::PathBuf;

use clap::Parser;

use crate::error::SolverError;

/// Default number of extra tier-mask letters used to sub-partition each base
/// set. Larger values trade `2^set_depth`x tier-array storage for tighter
/// inner scans.
pub const DEFAULT_SET_DEPTH: u32 = 4;
pub const MAX_SET_DEPTH: u32 = 8;

/// Emperically-derived hash table size, scaled for the documented ~370k-word
/// input; see `word_index::WordIndex`.
pub const HASH_SIZE: usize = 60_000;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fivewords",
    about = "Finds every unordered quintuple of five-letter words covering 25 distinct letters"
)]
pub struct Config {
    /// Path to the newline-separated word list.
    #[arg(short = 'f', long, default_value = "words_alpha.txt")]
    pub input: PathBuf,

    /// Where to write solutions. Defaults to stdout when omitted.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Number of worker threads. Defaults to the CPU-count-derived policy.
    #[arg(short = 't', long)]
    pub num_threads: Option<usize>,

    /// Number of extra tier-mask letters used to sub-partition each base set.
    #[arg(long, default_value_t = DEFAULT_SET_DEPTH)]
    pub set_depth: u32,

    /// Re-derive tier-mask frequencies from the key table after fixing this
    /// many letters of the search order. 0 uses raw input-file frequencies.
    #[arg(long, default_value_t = 0)]
    pub sample_depth: u32,

    /// Prefix of distinct lowercase letters forcing the start of the search
    /// order `L[]`.
    #[arg(long)]
    pub search_order_override: Option<String>,

    /// Prefix of distinct lowercase letters forcing the start of the
    /// tier-mask letter list.
    #[arg(long)]
    pub tier_mask_override: Option<String>,

    /// Disable the pseudo-vowel-group pruning (on by default). Soundness is
    /// covered by a test asserting identical solution sets with and without.
    #[arg(long)]
    pub no_prune: bool,

    /// Emit per-letter frequency and tier-offset diagnostics, and phase
    /// timings, via `tracing` at `debug`/`info` level.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("words_alpha.txt"),
            output: None,
            num_threads: None,
            set_depth: DEFAULT_SET_DEPTH,
            sample_depth: 0,
            search_order_override: None,
            tier_mask_override: None,
            no_prune: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Validates all range- and shape-constrained fields. Called once before
    /// any engine work starts; an out-of-range value is refused here rather
    /// than discovered mid-build.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.set_depth > MAX_SET_DEPTH {
            return Err(SolverError::ConfigOutOfRange {
                field: "set_depth",
                value: self.set_depth.to_string(),
            });
        }
        if self.sample_depth > 26 {
            return Err(SolverError::ConfigOutOfRange {
                field: "sample_depth",
                value: self.sample_depth.to_string(),
            });
        }
        if let Some(ref letters) = self.search_order_override {
            validate_letter_prefix(letters)?;
        }
        if let Some(ref letters) = self.tier_mask_override {
            validate_letter_prefix(letters)?;
        }
        Ok(())
    }

    /// Resolves the requested thread count, falling back to the
    /// CPU-count-derived policy in spec §4.7: not much is gained beyond 20
    /// threads, and virtualized hosts do worse with too many.
    pub fn resolve_num_threads(&self) -> usize {
        match self.num_threads {
            Some(n) if n > 0 => n,
            _ => default_num_threads(),
        }
    }
}

pub fn default_num_threads() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    if cpus < 2 {
        1
    } else if cpus < 5 {
        cpus
    } else if cpus < 9 {
        cpus - 1
    } else {
        (cpus - 2).min(20)
    }
}

fn validate_letter_prefix(letters: &str) -> Result<(), SolverError> {
    let bytes = letters.as_bytes();
    let all_lowercase = bytes.iter().all(|b| b.is_ascii_lowercase());
    let mut seen = 0u32;
    let mut duplicate = false;
    for &b in bytes {
        if b.is_ascii_lowercase() {
            let bit = 1u32 << (b - b'a');
            if seen & bit != 0 {
                duplicate = true;
            }
            seen |= bit;
        }
    }
    if !all_lowercase || duplicate || bytes.is_empty() {
        return Err(SolverError::MalformedOverride {
            letters: letters.to_string(),
        });
    }
    Ok(())
}

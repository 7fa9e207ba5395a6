//! The recursive backtracker: `advance`/`skip` unified into one routine
//! parameterized by whether a skip has already happened on this path.

use crate::config::Config;
use crate::frequency::FrequencyModel;
use crate::output::{format_record, SolutionBuffer};
use crate::tier::LetterTiers;
use crate::word_index::WordIndex;

/// Two fixed pseudo-vowel-like letter groups used for sound pruning. Any
/// group works as long as its `max_per_word` bound is derived from the
/// actual key table rather than assumed.
const GROUP_A: &[u8] = b"aeiou";
const GROUP_B: &[u8] = b"stnrl";

struct PruneGroup {
    mask: u32,
    max_per_word: u32,
}

impl PruneGroup {
    fn build(letters: &[u8], keys: &[u32]) -> Self {
        let mask = letters.iter().fold(0u32, |acc, &b| acc | (1 << (b - b'a')));
        let max_per_word = keys
            .iter()
            .map(|&k| (k & mask).count_ones())
            .max()
            .unwrap_or(0);
        Self { mask, max_per_word }
    }
}

pub struct SearchContext<'a> {
    model: &'a FrequencyModel,
    letter_tiers: &'a [LetterTiers],
    word_index: &'a WordIndex,
    solutions: &'a SolutionBuffer,
    config: &'a Config,
    groups: [PruneGroup; 2],
}

impl<'a> SearchContext<'a> {
    pub fn new(
        model: &'a FrequencyModel,
        letter_tiers: &'a [LetterTiers],
        key_table: &[u32],
        word_index: &'a WordIndex,
        solutions: &'a SolutionBuffer,
        config: &'a Config,
    ) -> Self {
        Self {
            model,
            letter_tiers,
            word_index,
            solutions,
            config,
            groups: [
                PruneGroup::build(GROUP_A, key_table),
                PruneGroup::build(GROUP_B, key_table),
            ],
        }
    }
}

impl<'a> SearchContext<'a> {
    /// The raw letter mask for the `j`-th entry in the search order. Used by
    /// the worker pool to compute the skip cursor's starting state (`L[0]`
    /// burned) without reaching into `FrequencyModel` directly.
    pub(crate) fn model_entry_mask(&self, j: usize) -> u32 {
        self.model.entries[j].mask
    }
}

/// Runs the full single-threaded search, starting the `advance` recursion at
/// the empty solution mask. This also covers the skip branch: `recurse`
/// tries burning `L[0]` itself after exhausting `L[0]`'s base set.
pub fn solve_single_threaded(ctx: &SearchContext) {
    let mut path = Vec::with_capacity(5);
    recurse(ctx, 0, &mut path, false);
}

/// Finds the smallest `j` such that `L[j]`'s bit is absent from `m` — the
/// next letter the solution must cover.
fn next_required_index(model: &FrequencyModel, m: u32) -> usize {
    for (j, entry) in model.entries.iter().enumerate() {
        if m & entry.mask == 0 {
            return j;
        }
    }
    unreachable!("m already covers every letter; terminal check should have fired first")
}

fn subset_index(model: &FrequencyModel, m: u32) -> usize {
    let mut t = 0usize;
    for b in 0..model.set_depth as usize {
        if m & model.subset_mask(b) != 0 {
            t |= 1 << b;
        }
    }
    t
}

/// Sound overapproximation: `true` means no descendant of `(m, path)` can
/// emit a solution. A group's uncovered letters can only be closed by future
/// word picks (bounded by `max_per_word` each) plus, if no skip has occurred
/// yet, a single possible future skip burning one more letter.
fn prune(ctx: &SearchContext, m: u32, path_len: usize, skipped: bool) -> bool {
    let remaining_depth = (5 - path_len) as u32;
    for group in &ctx.groups {
        let uncovered = (group.mask & !m).count_ones();
        let capacity = remaining_depth * group.max_per_word + if skipped { 0 } else { 1 };
        if uncovered > capacity {
            return true;
        }
    }
    false
}

/// Resolves the next-required letter's tier entry for the current mask,
/// returning the search-order index and the tightest non-conflicting region
/// (§4.5's `CALCULATE_SET_AND_END` contract).
pub(crate) fn step_region<'a>(ctx: &'a SearchContext, m: u32) -> (usize, &'a [u32]) {
    let j = next_required_index(ctx.model, m);
    let set_idx = subset_index(ctx.model, m);
    let tier_set = &ctx.letter_tiers[j].sets[set_idx];
    let primary = ctx.model.primary_mask();
    let secondary = ctx.model.secondary_mask();
    (j, tier_set.region_for(m, primary, secondary))
}

pub(crate) fn try_candidate(ctx: &SearchContext, m: u32, k: u32, path: &mut Vec<u32>, skipped: bool) {
    if k & m == 0 {
        path.push(k);
        recurse(ctx, m | k, path, skipped);
        path.pop();
    }
}

fn recurse(ctx: &SearchContext, m: u32, path: &mut Vec<u32>, skipped: bool) {
    let terminal = if skipped { 26 } else { 25 };
    if m.count_ones() == terminal {
        emit(ctx, path);
        return;
    }

    if !ctx.config.no_prune && prune(ctx, m, path.len(), skipped) {
        return;
    }

    let (j, region) = step_region(ctx, m);
    for &k in region {
        try_candidate(ctx, m, k, path, skipped);
    }

    if !skipped {
        let entry_mask = ctx.model.entries[j].mask;
        recurse(ctx, m | entry_mask, path, true);
    }
}

fn emit(ctx: &SearchContext, path: &[u32]) {
    debug_assert_eq!(path.len(), 5, "a terminal path always holds exactly five words");

    let mut words: [&[u8; 5]; 5] = [&[0; 5]; 5];
    for (slot, &k) in words.iter_mut().zip(path) {
        match ctx.word_index.lookup(k) {
            Some(w) => *slot = w,
            None => {
                debug_assert!(false, "key table entry missing from word index");
                return;
            }
        }
    }

    let record = format_record(&words);
    ctx.solutions.push(&record);
}

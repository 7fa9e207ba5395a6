//! Partitions each letter's base set into `2^set_depth` sub-arrays, each
//! further split into four contiguous regions by two tier-mask letters, so
//! the search can jump straight to the tightest non-conflicting slice.

use rayon::prelude::*;

use crate::frequency::FrequencyModel;

/// Sentinel padding appended after every sub-array's logical end. A scalar
/// scanner never reads past `len`, but the padding is kept so a vectorized
/// scanner could later read fixed-width blocks unconditionally without
/// special-casing the tail.
pub const NUM_POISON: usize = 16;
const POISON_WORD: u32 = u32::MAX;

pub struct TierSet {
    data: Vec<u32>,
    len: u32,
    toff1: u32,
    toff2: u32,
    toff3: u32,
}

impl TierSet {
    fn from_region_vecs(both: Vec<u32>, primary_only: Vec<u32>, neither: Vec<u32>, secondary_only: Vec<u32>) -> Self {
        let toff1 = both.len() as u32;
        let toff2 = toff1 + primary_only.len() as u32;
        let toff3 = toff2 + neither.len() as u32;
        let len = toff3 + secondary_only.len() as u32;

        let mut data = both;
        data.extend(primary_only);
        data.extend(neither);
        data.extend(secondary_only);
        data.extend(std::iter::repeat(POISON_WORD).take(NUM_POISON));

        Self {
            data,
            len,
            toff1,
            toff2,
            toff3,
        }
    }

    /// Selects the tightest contiguous slice of non-conflicting candidates
    /// given whether `primary`/`secondary` are already present in the
    /// current solution mask (§4.5's `CALCULATE_SET_AND_END` contract).
    #[inline]
    pub fn region_for(&self, mask: u32, primary: u32, secondary: u32) -> &[u32] {
        let mf = mask & primary != 0;
        let ms = mask & secondary != 0;
        let (start, end) = match (mf, ms) {
            (false, false) => (0, self.len),
            (true, false) => (self.toff2, self.len),
            (false, true) => (self.toff1, self.toff3),
            (true, true) => (self.toff2, self.toff3),
        };
        &self.data[start as usize..end as usize]
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `(toff1, toff2, toff3, len)`, for `--verbose` tier-offset diagnostics.
    pub fn offsets(&self) -> (u32, u32, u32, u32) {
        (self.toff1, self.toff2, self.toff3, self.len)
    }
}

pub struct LetterTiers {
    pub letter: u8,
    pub sets: Vec<TierSet>,
}

/// Builds tier arrays for every letter in the search order. Each letter's
/// build is independent of every other's and runs in parallel.
pub fn build(key_table: &[u32], model: &FrequencyModel) -> Vec<LetterTiers> {
    let primary = model.primary_mask();
    let secondary = model.secondary_mask();
    let set_depth = model.set_depth as usize;
    let subset_masks: Vec<u32> = (0..set_depth).map(|b| model.subset_mask(b)).collect();

    (0..model.order.len())
        .into_par_iter()
        .map(|i| build_letter_tiers(key_table, &model.order, i, primary, secondary, &subset_masks))
        .collect()
}

fn build_letter_tiers(
    key_table: &[u32],
    order: &[u8; 26],
    i: usize,
    primary: u32,
    secondary: u32,
    subset_masks: &[u32],
) -> LetterTiers {
    let letter = order[i];
    let letter_mask = 1u32 << letter;
    let prefix_mask = order[..i].iter().fold(0u32, |acc, &l| acc | (1 << l));

    let base: Vec<u32> = key_table
        .iter()
        .copied()
        .filter(|&k| k & letter_mask != 0 && k & prefix_mask == 0)
        .collect();

    let (both, primary_only, neither, secondary_only) = partition4(&base, primary, secondary);

    let set_depth = subset_masks.len();
    let num_sets = 1usize << set_depth;
    let mut sets = Vec::with_capacity(num_sets);
    sets.push(TierSet::from_region_vecs(
        both.clone(),
        primary_only.clone(),
        neither.clone(),
        secondary_only.clone(),
    ));

    for t in 1..num_sets {
        let subset_mask = (0..set_depth).fold(0u32, |acc, b| {
            if t & (1 << b) != 0 {
                acc | subset_masks[b]
            } else {
                acc
            }
        });

        let filt = |region: &[u32]| -> Vec<u32> {
            region.iter().copied().filter(|&k| k & subset_mask == 0).collect()
        };

        sets.push(TierSet::from_region_vecs(
            filt(&both),
            filt(&primary_only),
            filt(&neither),
            filt(&secondary_only),
        ));
    }

    LetterTiers { letter, sets }
}

/// Splits `base` into the four tier regions (§4.5 steps 1-3), returned as
/// `(both, primary_only, neither, secondary_only)`.
fn partition4(base: &[u32], primary: u32, secondary: u32) -> (Vec<u32>, Vec<u32>, Vec<u32>, Vec<u32>) {
    let mut both = Vec::new();
    let mut primary_only = Vec::new();
    let mut neither = Vec::new();
    let mut secondary_only = Vec::new();

    for &k in base {
        let mf = k & primary != 0;
        let ms = k & secondary != 0;
        match (mf, ms) {
            (true, true) => both.push(k),
            (true, false) => primary_only.push(k),
            (false, false) => neither.push(k),
            (false, true) => secondary_only.push(k),
        }
    }

    (both, primary_only, neither, secondary_only)
}

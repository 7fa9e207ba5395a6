//! Per-letter frequency accounting: the search order `L[]` that drives
//! rarest-letter-first pruning, and the tier-mask letter list the Tier
//! Builder uses to pre-partition each base set.

use crate::config::Config;
use crate::error::SolverError;

/// One entry per letter in search-order position `i`, i.e. `entries[i]`
/// describes letter `order[i]`.
#[derive(Clone, Copy, Debug)]
pub struct FrequencyEntry {
    pub letter: u8,
    pub mask: u32,
    pub frequency: u32,
}

pub struct FrequencyModel {
    /// `order[i]` is the letter ordinal (0..26) at search-rank `i`; `order[0]`
    /// is rarest.
    pub order: [u8; 26],
    pub entries: Vec<FrequencyEntry>,
    /// `tier_mask_letters[0..set_depth]` select which of the 2^set_depth
    /// sub-arrays a candidate belongs to; the last two entries are the
    /// primary/secondary region-selector letters.
    pub tier_mask_letters: Vec<u8>,
    pub set_depth: u32,
}

impl FrequencyModel {
    pub fn build(keys: &[u32], config: &Config) -> Result<Self, SolverError> {
        let raw_freq = letter_frequencies(keys, None);
        let order = build_search_order(&raw_freq, config.search_order_override.as_deref())?;

        let tier_source = if config.sample_depth > 0 {
            let fixed_prefix = &order[..config.sample_depth as usize];
            letter_frequencies(keys, Some(fixed_prefix))
        } else {
            raw_freq
        };

        let tier_mask_letters = build_tier_mask_letters(
            &tier_source,
            &order,
            config.set_depth,
            config.tier_mask_override.as_deref(),
        )?;

        let entries = order
            .iter()
            .map(|&letter| FrequencyEntry {
                letter,
                mask: 1u32 << letter,
                frequency: raw_freq[letter as usize],
            })
            .collect();

        Ok(Self {
            order,
            entries,
            tier_mask_letters,
            set_depth: config.set_depth,
        })
    }

    pub fn primary_mask(&self) -> u32 {
        1u32 << self.tier_mask_letters[self.set_depth as usize]
    }

    pub fn secondary_mask(&self) -> u32 {
        1u32 << self.tier_mask_letters[self.set_depth as usize + 1]
    }

    pub fn subset_mask(&self, bit: usize) -> u32 {
        1u32 << self.tier_mask_letters[bit]
    }

    /// Human-readable summary of the chosen search order `L[]` and tier-mask
    /// letter list `mforder[]`, for `--verbose` diagnostics.
    pub fn report(&self) -> String {
        let order: String = self.order.iter().map(|&l| (b'a' + l) as char).collect();
        let tier_masks: String = self
            .tier_mask_letters
            .iter()
            .map(|&l| (b'a' + l) as char)
            .collect();
        format!("search order L[]=\"{order}\" tier-mask letters=\"{tier_masks}\"")
    }
}

/// Counts, per letter, how many candidates contain it. When `exclude_prefix`
/// is given, only candidates disjoint from every letter in the prefix are
/// tallied (§4.4's `sample_depth`-recomputed frequencies).
fn letter_frequencies(keys: &[u32], exclude_prefix: Option<&[u8]>) -> [u32; 26] {
    let mut counts = [0u32; 26];
    let prefix_mask = exclude_prefix
        .map(|letters| letters.iter().fold(0u32, |acc, &l| acc | (1 << l)))
        .unwrap_or(0);

    for &key in keys {
        if key & prefix_mask != 0 {
            continue;
        }
        let mut remaining = key;
        while remaining != 0 {
            let bit = remaining.trailing_zeros() as usize;
            counts[bit] += 1;
            remaining &= remaining - 1;
        }
    }
    counts
}

/// Ascending-by-frequency permutation of 0..26, ties broken by natural
/// letter order, with an optional caller-forced prefix.
fn build_search_order(
    freq: &[u32; 26],
    override_prefix: Option<&str>,
) -> Result<[u8; 26], SolverError> {
    let mut order = [0u8; 26];
    let mut placed = 0u32;
    let mut cursor = 0usize;

    if let Some(prefix) = override_prefix {
        for b in prefix.bytes() {
            if !b.is_ascii_lowercase() {
                return Err(SolverError::MalformedOverride {
                    letters: prefix.to_string(),
                });
            }
            let letter = b - b'a';
            let bit = 1u32 << letter;
            if placed & bit != 0 {
                return Err(SolverError::MalformedOverride {
                    letters: prefix.to_string(),
                });
            }
            placed |= bit;
            order[cursor] = letter;
            cursor += 1;
        }
    }

    let mut remaining: Vec<u8> = (0..26u8).filter(|&l| placed & (1 << l) == 0).collect();
    remaining.sort_by_key(|&l| (freq[l as usize], l));

    for letter in remaining {
        order[cursor] = letter;
        cursor += 1;
    }

    Ok(order)
}

/// Descending-by-frequency tier-mask letter list of length `set_depth + 2`,
/// with an optional caller-forced prefix.
fn build_tier_mask_letters(
    freq: &[u32; 26],
    search_order: &[u8; 26],
    set_depth: u32,
    override_prefix: Option<&str>,
) -> Result<Vec<u8>, SolverError> {
    let needed = set_depth as usize + 2;
    let mut chosen = Vec::with_capacity(needed);
    let mut placed = 0u32;

    if let Some(prefix) = override_prefix {
        for b in prefix.bytes() {
            if !b.is_ascii_lowercase() {
                return Err(SolverError::MalformedOverride {
                    letters: prefix.to_string(),
                });
            }
            let letter = b - b'a';
            let bit = 1u32 << letter;
            if placed & bit != 0 {
                return Err(SolverError::MalformedOverride {
                    letters: prefix.to_string(),
                });
            }
            placed |= bit;
            chosen.push(letter);
            if chosen.len() == needed {
                break;
            }
        }
    }

    if chosen.len() < needed {
        let mut rest: Vec<u8> = search_order
            .iter()
            .copied()
            .filter(|&l| placed & (1 << l) == 0)
            .collect();
        rest.sort_by_key(|&l| std::cmp::Reverse((freq[l as usize], l)));
        for letter in rest {
            chosen.push(letter);
            if chosen.len() == needed {
                break;
            }
        }
    }

    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;

    fn sample_keys() -> Vec<u32> {
        ["brick", "glent", "jumpy", "vozhd", "waqfs"]
            .iter()
            .map(|w| encode(w.as_bytes().try_into().unwrap()))
            .collect()
    }

    #[test]
    fn rarest_letter_is_first_in_order() {
        let keys = sample_keys();
        let cfg = Config::default();
        let model = FrequencyModel::build(&keys, &cfg).unwrap();
        // every letter among these 5 words occurs exactly once; the
        // remaining (zero-frequency) letters sort first by natural order.
        assert_eq!(model.entries.len(), 26);
        assert_eq!(model.entries[0].frequency, 0);
    }

    #[test]
    fn search_order_override_is_honored() {
        let keys = sample_keys();
        let mut cfg = Config::default();
        cfg.search_order_override = Some("zyx".to_string());
        let model = FrequencyModel::build(&keys, &cfg).unwrap();
        assert_eq!(&model.order[0..3], &[25, 24, 23]);
    }

    #[test]
    fn tier_mask_letters_length_matches_set_depth() {
        let keys = sample_keys();
        let cfg = Config::default();
        let model = FrequencyModel::build(&keys, &cfg).unwrap();
        assert_eq!(model.tier_mask_letters.len(), cfg.set_depth as usize + 2);
    }
}

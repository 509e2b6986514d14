//! Euclidean rhythm lookup table.
//!
//! Entry `(length - 1) * 32 + density` holds a bitmask whose bit `i` is set
//! when step `i` of a `length`-step pattern is an onset. The onset count for a
//! density bucket `d` is `round(d * length / 31)`, distributed with the
//! Bjorklund algorithm so that step 0 always carries the first onset.

use super::{EUCLIDEAN_DENSITY_BUCKETS, EUCLIDEAN_LUT_SIZE, STEPS_PER_PATTERN};

lazy_static! {
    /// The 32 lengths x 32 density buckets table, built on first use.
    pub static ref LUT_RES_EUCLIDEAN: [u32; EUCLIDEAN_LUT_SIZE] = build_lut();
}

/// Look up the mask for a length (1..=32) and density bucket (0..=31).
///
/// Both arguments are clamped into range.
pub fn euclidean_mask(length: u8, density_bucket: u8) -> u32 {
    let length = usize::from(length.clamp(1, STEPS_PER_PATTERN as u8));
    let bucket = usize::from(density_bucket).min(EUCLIDEAN_DENSITY_BUCKETS - 1);
    LUT_RES_EUCLIDEAN[(length - 1) * EUCLIDEAN_DENSITY_BUCKETS + bucket]
}

fn build_lut() -> [u32; EUCLIDEAN_LUT_SIZE] {
    let mut lut = [0u32; EUCLIDEAN_LUT_SIZE];
    for length in 1..=STEPS_PER_PATTERN as u32 {
        for bucket in 0..EUCLIDEAN_DENSITY_BUCKETS as u32 {
            let onsets = (bucket as f32 * length as f32 / 31.0).round() as u32;
            let mask = bjorklund(onsets, length)
                .iter()
                .enumerate()
                .filter(|(_, hit)| **hit)
                .fold(0u32, |acc, (i, _)| acc | (1 << i));
            lut[(length as usize - 1) * EUCLIDEAN_DENSITY_BUCKETS + bucket as usize] = mask;
        }
    }
    lut
}

type Groups = (Vec<Vec<bool>>, Vec<Vec<bool>>);

/// Distribute `onsets` as evenly as possible over `steps`.
pub fn bjorklund(onsets: u32, steps: u32) -> Vec<bool> {
    if steps == 0 {
        return Vec::new();
    }
    let onsets = onsets.min(steps);
    let rests = steps - onsets;

    let ones: Vec<Vec<bool>> = (0..onsets).map(|_| vec![true]).collect();
    let zeros: Vec<Vec<bool>> = (0..rests).map(|_| vec![false]).collect();

    let (heads, tails) = distribute((onsets, rests), (ones, zeros));
    heads.into_iter().chain(tails).flatten().collect()
}

fn distribute(counts: (u32, u32), groups: Groups) -> Groups {
    let (ons, offs) = counts;
    if ons.min(offs) <= 1 {
        return groups;
    }

    let (heads, tails) = groups;
    if ons > offs {
        // Pair the first `offs` heads with every tail; leftover heads become tails.
        let split = offs as usize;
        let paired = concat_pairs(&heads[..split], &tails);
        let rest = heads[split..].to_vec();
        distribute((offs, ons - offs), (paired, rest))
    } else {
        let split = ons as usize;
        let paired = concat_pairs(&heads, &tails[..split]);
        let rest = tails[split..].to_vec();
        distribute((ons, offs - ons), (paired, rest))
    }
}

fn concat_pairs(a: &[Vec<bool>], b: &[Vec<bool>]) -> Vec<Vec<bool>> {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let mut joined = x.clone();
            joined.extend(y.iter().copied());
            joined
        })
        .collect()
}

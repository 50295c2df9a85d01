// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Injectable random source for all generative operations.
//!
//! Every randomized component (chord selection, chop-by-count, rhythm
//! generation) takes a `Dice` explicitly, so tests can seed it and
//! replay a generation deterministically.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seedable dice wrapped around the standard RNG.
#[derive(Debug)]
pub struct Dice {
    rng: StdRng,
}

impl Dice {
    /// Create a dice seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a dice with a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Roll a number in `[min, max)`. `max` is excluded.
    pub fn range(&mut self, max: usize, min: usize) -> usize {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Roll a boolean with the given probability of `true`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() <= probability
    }

    /// Roll `rolls` distinct numbers in `[min, max)`, ascending.
    ///
    /// `rolls` is clamped to the size of the range so the loop always
    /// terminates.
    pub fn multi_roll_unique_asc(&mut self, max: usize, min: usize, rolls: usize) -> Vec<usize> {
        let mut arr = self.multi_roll_unique_unsorted(max, min, rolls);
        arr.sort_unstable();
        arr
    }

    /// Roll `rolls` distinct numbers in `[min, max)`, descending.
    pub fn multi_roll_unique_desc(&mut self, max: usize, min: usize, rolls: usize) -> Vec<usize> {
        let mut arr = self.multi_roll_unique_unsorted(max, min, rolls);
        arr.sort_unstable_by(|a, b| b.cmp(a));
        arr
    }

    /// Roll `rolls` distinct numbers in `[min, max)`, in draw order.
    pub fn multi_roll_unique_unsorted(
        &mut self,
        max: usize,
        min: usize,
        rolls: usize,
    ) -> Vec<usize> {
        let span = max.saturating_sub(min);
        let rolls = rolls.min(span);
        let mut arr: Vec<usize> = Vec::with_capacity(rolls);
        while arr.len() < rolls {
            let r = self.range(max, min);
            if !arr.contains(&r) {
                arr.push(r);
            }
        }
        arr
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let mut dice = Dice::from_seed(1);
        for _ in 0..100 {
            let r = dice.range(7, 0);
            assert!(r < 7);
        }
        for _ in 0..100 {
            let r = dice.range(9, 2);
            assert!((2..9).contains(&r));
        }
    }

    #[test]
    fn test_range_empty_span() {
        let mut dice = Dice::from_seed(1);
        assert_eq!(dice.range(3, 3), 3);
        assert_eq!(dice.range(2, 5), 5);
    }

    #[test]
    fn test_multi_roll_unique() {
        let mut dice = Dice::from_seed(7);
        let rolls = dice.multi_roll_unique_asc(16, 0, 4);
        assert_eq!(rolls.len(), 4);
        let mut deduped = rolls.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), 4);
        assert!(rolls.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_multi_roll_clamps_to_span() {
        let mut dice = Dice::from_seed(3);
        let rolls = dice.multi_roll_unique_asc(4, 0, 10);
        assert_eq!(rolls, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_seeded_dice_is_deterministic() {
        let mut a = Dice::from_seed(42);
        let mut b = Dice::from_seed(42);
        for _ in 0..20 {
            assert_eq!(a.range(100, 0), b.range(100, 0));
        }
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut dice = Dice::from_seed(11);
        let mut items = vec![1, 2, 3, 4, 5];
        dice.shuffle(&mut items);
        items.sort_unstable();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }
}

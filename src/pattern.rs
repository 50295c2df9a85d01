// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rhythm pattern algorithms.
//!
//! Pure transforms over the `x`/`-`/`_` pattern grammar: weighted
//! generation, reshuffling, flipping and reversal. Randomized transforms
//! take the dice explicitly.

use std::fmt;

use crate::error::{Error, Result};
use crate::rng::Dice;

/// Length of a generated pattern: 8 or 16 slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternLength {
    Short,
    Long,
}

impl PatternLength {
    fn slots(self) -> usize {
        match self {
            PatternLength::Short => 8,
            PatternLength::Long => 16,
        }
    }
}

/// Split a pattern into tokens.
///
/// With `with_spaces`, a token is an onset plus everything up to the
/// next onset. Without, each onset keeps only its sustains and every
/// rest character starts its own token; a leading sustain run forms a
/// token of its own.
pub fn split_pattern(pattern: &str, with_spaces: bool) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for c in pattern.chars() {
        let starts_new = match c {
            'x' => true,
            '-' => {
                if with_spaces {
                    tokens.is_empty()
                } else {
                    true
                }
            }
            _ => tokens.is_empty(),
        };
        if starts_new {
            tokens.push(c.to_string());
        } else if let Some(last) = tokens.last_mut() {
            last.push(c);
        }
    }
    tokens
}

/// Generate a 4-onset pattern with unconstrained onset placement, then
/// rotate left until slot 0 is an onset.
pub fn wild(length: PatternLength, dice: &mut Dice) -> String {
    let slots = length.slots();
    let onsets = dice.multi_roll_unique_asc(slots, 0, 4);
    place_and_rotate(slots, &onsets)
}

/// Generate a 4-onset pattern with one onset per quarter of the string,
/// then rotate left until slot 0 is an onset.
pub fn mild(length: PatternLength, dice: &mut Dice) -> String {
    let slots = length.slots();
    let quarter = slots / 4;
    let onsets: Vec<usize> = (0..4)
        .map(|q| dice.range(quarter * (q + 1), quarter * q))
        .collect();
    place_and_rotate(slots, &onsets)
}

fn place_and_rotate(slots: usize, onsets: &[usize]) -> String {
    let mut rhythm: Vec<char> = vec!['_'; slots];
    for &i in onsets {
        rhythm[i] = 'x';
    }
    let first_onset = rhythm.iter().position(|&c| c == 'x').unwrap_or(0);
    rhythm.rotate_left(first_onset);
    rhythm.into_iter().collect()
}

/// Shuffle pattern tokens. With `with_spaces`, onsets carry their
/// trailing rests and sustains along; without, every character moves on
/// its own (sustains still following their onset).
pub fn reshuffle(pattern: &str, with_spaces: bool, dice: &mut Dice) -> String {
    let mut tokens = split_pattern(pattern, with_spaces);
    dice.shuffle(&mut tokens);
    tokens.concat()
}

/// Swap sounding and silent spans: every onset token becomes a rest of
/// equal span and every rest run becomes an onset plus sustains.
pub fn flip(pattern: &str) -> String {
    // Token boundaries: every 'x', and the first rest char after an
    // onset token. Consecutive rest chars stay in one token.
    let mut tokens: Vec<String> = Vec::new();
    for c in pattern.chars() {
        let starts_new = match c {
            'x' => true,
            '-' => tokens
                .last()
                .map(|t| t.starts_with('x'))
                .unwrap_or(true),
            _ => tokens.is_empty(),
        };
        if starts_new {
            tokens.push(c.to_string());
        } else if let Some(last) = tokens.last_mut() {
            last.push(c);
        }
    }

    tokens
        .iter()
        .map(|token| {
            let mut chars = token.chars();
            let head = chars.next().unwrap_or('_');
            let tail: String = chars.map(|c| if c == '-' { '_' } else { c }).collect();
            let new_head = match head {
                'x' => '-',
                '-' => 'x',
                other => other,
            };
            format!("{}{}", new_head, tail)
        })
        .collect()
}

/// Reverse the pattern token-wise, keeping sustains behind their onset.
pub fn reverse(pattern: &str) -> String {
    let mut tokens = split_pattern(pattern, false);
    tokens.reverse();
    tokens.concat()
}

/// The rhythm algorithm menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhythmAlgo {
    LongWild,
    LongMild,
    ShortWild,
    ShortMild,
    ReshuffleChars,
    ReshuffleSteps,
    Flip,
    Reverse,
}

impl RhythmAlgo {
    pub const ALL: [RhythmAlgo; 8] = [
        RhythmAlgo::LongWild,
        RhythmAlgo::LongMild,
        RhythmAlgo::ShortWild,
        RhythmAlgo::ShortMild,
        RhythmAlgo::ReshuffleChars,
        RhythmAlgo::ReshuffleSteps,
        RhythmAlgo::Flip,
        RhythmAlgo::Reverse,
    ];

    pub fn parse(s: &str) -> Result<Self> {
        let norm = s.trim().to_lowercase().replace([' ', '-'], "_");
        match norm.as_str() {
            "long_wild" => Ok(RhythmAlgo::LongWild),
            "long_mild" => Ok(RhythmAlgo::LongMild),
            "short_wild" => Ok(RhythmAlgo::ShortWild),
            "short_mild" => Ok(RhythmAlgo::ShortMild),
            "reshuffle_chars" => Ok(RhythmAlgo::ReshuffleChars),
            "reshuffle_steps" => Ok(RhythmAlgo::ReshuffleSteps),
            "flip" => Ok(RhythmAlgo::Flip),
            "reverse" => Ok(RhythmAlgo::Reverse),
            _ => Err(Error::UnknownRhythmAlgo(s.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RhythmAlgo::LongWild => "long_wild",
            RhythmAlgo::LongMild => "long_mild",
            RhythmAlgo::ShortWild => "short_wild",
            RhythmAlgo::ShortMild => "short_mild",
            RhythmAlgo::ReshuffleChars => "reshuffle_chars",
            RhythmAlgo::ReshuffleSteps => "reshuffle_steps",
            RhythmAlgo::Flip => "flip",
            RhythmAlgo::Reverse => "reverse",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RhythmAlgo::LongWild => {
                "Generates a rhythm comprised of 4 xs and 12 _s while xs have a chance to appear anywhere in the pattern."
            }
            RhythmAlgo::LongMild => {
                "Generates a rhythm comprised of 4 xs and 12 _s while there is always 1 x present at each quarter of the pattern."
            }
            RhythmAlgo::ShortWild => {
                "Generates a rhythm comprised of 4 xs and 4 _s while xs have a chance to appear anywhere in the pattern."
            }
            RhythmAlgo::ShortMild => {
                "Generates a rhythm comprised of 4 xs and 4 _s while there is always 1 x present at each quarter of the pattern."
            }
            RhythmAlgo::ReshuffleChars => "Randomly reshuffles xs and -s in the pattern.",
            RhythmAlgo::ReshuffleSteps => {
                "Randomly reshuffles xs in the pattern, while xs keep their length or the spaces that follow them."
            }
            RhythmAlgo::Flip => "Where there were spaces, there are now notes and visa versa.",
            RhythmAlgo::Reverse => "Reverses the order of the rhythmic pattern.",
        }
    }

    /// Run the algorithm. Generators ignore the input pattern.
    pub fn apply(self, pattern: &str, dice: &mut Dice) -> String {
        match self {
            RhythmAlgo::LongWild => wild(PatternLength::Long, dice),
            RhythmAlgo::LongMild => mild(PatternLength::Long, dice),
            RhythmAlgo::ShortWild => wild(PatternLength::Short, dice),
            RhythmAlgo::ShortMild => mild(PatternLength::Short, dice),
            RhythmAlgo::ReshuffleChars => reshuffle(pattern, false, dice),
            RhythmAlgo::ReshuffleSteps => reshuffle(pattern, true, dice),
            RhythmAlgo::Flip => flip(pattern),
            RhythmAlgo::Reverse => reverse(pattern),
        }
    }
}

impl fmt::Display for RhythmAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pattern_without_spaces() {
        assert_eq!(split_pattern("x--x_", false), vec!["x", "-", "-", "x_"]);
        assert_eq!(split_pattern("x-_x", false), vec!["x", "-_", "x"]);
        assert_eq!(split_pattern("_x", false), vec!["_", "x"]);
    }

    #[test]
    fn test_split_pattern_with_spaces() {
        assert_eq!(split_pattern("x--x_", true), vec!["x--", "x_"]);
        assert_eq!(split_pattern("--x_x", true), vec!["--", "x_", "x"]);
    }

    #[test]
    fn test_wild_shape() {
        let mut dice = Dice::from_seed(9);
        for _ in 0..20 {
            let p = wild(PatternLength::Long, &mut dice);
            assert_eq!(p.len(), 16);
            assert_eq!(p.chars().filter(|&c| c == 'x').count(), 4);
            assert!(p.starts_with('x'));
            assert!(p.chars().all(|c| c == 'x' || c == '_'));
        }
    }

    #[test]
    fn test_mild_one_onset_per_quarter_before_rotation() {
        let mut dice = Dice::from_seed(2);
        for _ in 0..20 {
            let p = mild(PatternLength::Short, &mut dice);
            assert_eq!(p.len(), 8);
            assert_eq!(p.chars().filter(|&c| c == 'x').count(), 4);
            assert!(p.starts_with('x'));
        }
    }

    #[test]
    fn test_flip_swaps_notes_and_rests() {
        assert_eq!(flip("x-"), "-x");
        assert_eq!(flip("x--"), "-x_");
        assert_eq!(flip("x__-"), "-__x");
        assert_eq!(flip("-x_"), "x-_");
    }

    #[test]
    fn test_flip_is_involutive_on_plain_patterns() {
        for p in ["x-", "x-x-", "xx--", "-x-x", "x---x---"] {
            assert_eq!(flip(&flip(p)), p, "flip^2 changed {}", p);
        }
    }

    #[test]
    fn test_reverse_is_involutive() {
        for p in ["x-x-", "x__-", "x_-x__", "--x", "_x-"] {
            assert_eq!(reverse(&reverse(p)), p, "reverse^2 changed {}", p);
        }
    }

    #[test]
    fn test_reverse_keeps_sustains_with_onsets() {
        assert_eq!(reverse("x_-"), "-x_");
        assert_eq!(reverse("x__x-"), "-xx__");
    }

    #[test]
    fn test_reshuffle_preserves_characters() {
        let mut dice = Dice::from_seed(4);
        let shuffled = reshuffle("x-x_--", false, &mut dice);
        let mut a: Vec<char> = shuffled.chars().collect();
        let mut b: Vec<char> = "x-x_--".chars().collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rhythm_algo_parse_and_names() {
        for algo in RhythmAlgo::ALL {
            assert_eq!(RhythmAlgo::parse(algo.name()).unwrap(), algo);
            assert!(!algo.description().is_empty());
        }
        assert!(RhythmAlgo::parse("polka").is_err());
    }

    #[test]
    fn test_rhythm_algo_apply_generators() {
        let mut dice = Dice::from_seed(8);
        let p = RhythmAlgo::ShortWild.apply("", &mut dice);
        assert_eq!(p.len(), 8);
        let q = RhythmAlgo::Reverse.apply("x_-", &mut dice);
        assert_eq!(q, "-x_");
    }
}

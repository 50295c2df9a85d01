// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord slot resolution against a transition map.
//!
//! Slots resolve in order: explicit symbols and degree numerals pass
//! through, random slots draw from the transition-map row of the
//! previous chord's degree (row 0 opens the progression) or from all
//! seven degrees when no map is supplied. Repeat avoidance retries
//! inside the candidate pool, and every retry loop is bounded.

use std::collections::HashSet;

use crate::error::Result;
use crate::music::chord::split_symbol;
use crate::music::key::Key;
use crate::music::note::Note;
use crate::music::speller;
use crate::rng::Dice;

/// Draws a no-repeat candidate at most this many times before letting
/// the repeat through. A one-member pool whose chord is already in the
/// progression would otherwise retry forever.
const RETRY_CAP: usize = 32;

/// One chord slot of a progression request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChordSlot {
    /// A concrete chord symbol
    Explicit(String),
    /// A scale degree 1-7, resolved against the diatonic chord set
    Numeral(u8),
    /// A random pick, optionally re-suffixed ("R", "Rsus4")
    Random { suffix: Option<String> },
}

impl ChordSlot {
    /// Parse one request token. Roman numerals resolve against the key
    /// tonic; anything that is not a numeral, an `R` token, or a degree
    /// number is taken as an explicit symbol.
    pub fn parse(token: &str, tonic: Note) -> ChordSlot {
        let token = token.trim();
        if let Some(rest) = token.strip_prefix('R') {
            return ChordSlot::Random {
                suffix: if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_string())
                },
            };
        }
        if let Ok(degree) = token.parse::<u8>() {
            if (1..=7).contains(&degree) {
                return ChordSlot::Numeral(degree);
            }
        }
        if let Some(absolute) = speller::roman_to_absolute(tonic, token) {
            return ChordSlot::Explicit(absolute);
        }
        ChordSlot::Explicit(token.to_string())
    }
}

/// Allowed successor degrees per scale degree. Row 0 is the start of the
/// progression; rows hold degrees 1-7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionMap {
    rows: [Vec<u8>; 8],
}

impl TransitionMap {
    /// Build from flattened `(column, row, present)` triples.
    /// `present == 1` marks degree `column + 1` as a legal successor of
    /// row `row`. An empty row is coerced to `{1}`.
    pub fn from_triples(triples: &[u8]) -> Self {
        let mut rows: [Vec<u8>; 8] = Default::default();
        for chunk in triples.chunks_exact(3) {
            let (column, row, present) = (chunk[0], chunk[1], chunk[2]);
            if present == 1 && (row as usize) < 8 && column < 7 {
                rows[row as usize].push(column + 1);
            }
        }
        for row in rows.iter_mut() {
            if row.is_empty() {
                row.push(1);
            }
        }
        Self { rows }
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.rows[row.min(7)]
    }
}

/// Resolve a slot list into concrete chord symbols.
///
/// `chord_set` is the diatonic set the numerals and random picks draw
/// from, already in renderer spelling. With `repeat` off, a random pick
/// avoids chords already in the progression until its candidate pool is
/// exhausted.
pub fn resolve_slots(
    slots: &[ChordSlot],
    chord_set: &[String; 7],
    map: Option<&TransitionMap>,
    repeat: bool,
    key: &Key,
    dice: &mut Dice,
) -> Result<Vec<String>> {
    let mut resolved: Vec<Option<String>> = slots
        .iter()
        .map(|slot| match slot {
            ChordSlot::Explicit(symbol) => Some(speller::to_renderer(symbol)),
            ChordSlot::Numeral(degree) => Some(chord_set[(*degree - 1) as usize].clone()),
            ChordSlot::Random { .. } => None,
        })
        .collect();

    for i in 0..slots.len() {
        let suffix = match &slots[i] {
            ChordSlot::Random { suffix } => suffix.clone(),
            _ => continue,
        };

        let used: HashSet<&String> = resolved.iter().flatten().collect();

        // Candidate pool as 0-based degrees.
        let pool: Vec<usize> = match map {
            None => (0..7).collect(),
            Some(map) => {
                // Slots resolve in order, so the previous slot is
                // concrete by the time a random slot draws.
                let row = if i == 0 {
                    map.row(0)
                } else {
                    match resolved[i - 1].as_ref() {
                        Some(previous) => map.row(speller::degree_of_chord(key, previous)?),
                        None => map.row(0),
                    }
                };
                row.iter().map(|&d| (d - 1) as usize).collect()
            }
        };

        let mut allow_repeat = repeat;
        if !allow_repeat {
            let all_used = chord_set.iter().all(|c| used.contains(c));
            let pool_used = pool.iter().all(|&d| used.contains(&chord_set[d]));
            if all_used || pool_used {
                allow_repeat = true;
            }
        }

        let degree = if allow_repeat {
            pool[dice.range(pool.len(), 0)]
        } else {
            let mut pick = None;
            for _ in 0..RETRY_CAP {
                let d = pool[dice.range(pool.len(), 0)];
                if !used.contains(&chord_set[d]) {
                    pick = Some(d);
                    break;
                }
            }
            pick.unwrap_or_else(|| pool[dice.range(pool.len(), 0)])
        };

        let mut symbol = chord_set[degree].clone();
        if let Some(suffix) = &suffix {
            let (root, _) = split_symbol(&symbol)?;
            symbol = speller::to_renderer(&format!("{}{}", root, suffix));
        }
        resolved[i] = Some(symbol);
    }

    Ok(resolved.into_iter().flatten().collect())
}

// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord symbol dictionary for the renderer.
//!
//! Spells a normalized chord symbol into a pitch stack, root first,
//! rooted at the renderer's default octave. The symbol vocabulary is the
//! one the speller produces; anything outside it is a loud error.

use crate::error::{Error, Result};
use crate::music::note::{Note, Pitch};

/// Octave chords are spelled at before octave placement runs.
pub const DEFAULT_CHORD_OCTAVE: i8 = 3;

/// Split a symbol into its root note and quality suffix.
///
/// The root is a letter A-G plus any run of accidentals; repeated
/// accidentals fold into the pitch class ("C##" parses as D).
pub fn split_symbol(symbol: &str) -> Result<(Note, &str)> {
    let mut chars = symbol.char_indices();
    let (_, letter) = chars
        .next()
        .ok_or_else(|| Error::UnknownChord(symbol.to_string()))?;
    let base = Note::parse(&letter.to_string())
        .ok_or_else(|| Error::UnknownChord(symbol.to_string()))?;

    let mut offset = 0i32;
    let mut rest_at = letter.len_utf8();
    for (i, c) in chars {
        match c {
            '#' => offset += 1,
            'b' => offset -= 1,
            _ => {
                rest_at = i;
                break;
            }
        }
        rest_at = i + c.len_utf8();
    }
    Ok((base.transpose(offset), &symbol[rest_at..]))
}

/// Intervals (semitones above the root) for a quality suffix.
fn quality_intervals(quality: &str) -> Option<&'static [i32]> {
    let intervals: &[i32] = match quality {
        "M" => &[0, 4, 7],
        "m" => &[0, 3, 7],
        "dim" => &[0, 3, 6],
        "aug" => &[0, 4, 8],
        "5" => &[0, 7],
        "sus2" => &[0, 2, 7],
        "sus4" => &[0, 5, 7],
        "6" | "M6" => &[0, 4, 7, 9],
        "m6" => &[0, 3, 7, 9],
        "7" | "7th" => &[0, 4, 7, 10],
        "M7" => &[0, 4, 7, 11],
        "m7" => &[0, 3, 7, 10],
        "mM7" => &[0, 3, 7, 11],
        "dim7" => &[0, 3, 6, 9],
        "m7b5" => &[0, 3, 6, 10],
        "M7#5" => &[0, 4, 8, 11],
        "7sus4" => &[0, 5, 7, 10],
        "7b5" => &[0, 4, 6, 10],
        "7#5" => &[0, 4, 8, 10],
        "7b9" => &[0, 4, 7, 10, 13],
        "7#9" => &[0, 4, 7, 10, 15],
        "add9" => &[0, 4, 7, 14],
        "madd9" => &[0, 3, 7, 14],
        "9" | "9th" => &[0, 4, 7, 10, 14],
        "M9" => &[0, 4, 7, 11, 14],
        "m9" => &[0, 3, 7, 10, 14],
        "11" | "11th" => &[0, 4, 7, 10, 14, 17],
        "m11" => &[0, 3, 7, 10, 14, 17],
        "13" | "13th" => &[0, 4, 7, 10, 14, 21],
        "m13" => &[0, 3, 7, 10, 14, 21],
        _ => return None,
    };
    Some(intervals)
}

/// Spell a chord symbol into its pitch stack, lowest note first.
pub fn spell(symbol: &str) -> Result<Vec<Pitch>> {
    let (root, quality) = split_symbol(symbol)?;
    let intervals =
        quality_intervals(quality).ok_or_else(|| Error::UnknownChord(symbol.to_string()))?;
    let base = Pitch::new(root, DEFAULT_CHORD_OCTAVE);
    Ok(intervals.iter().map(|&i| base.transpose(i)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_symbol() {
        assert_eq!(split_symbol("CM").unwrap(), (Note::C, "M"));
        assert_eq!(split_symbol("F#m7").unwrap(), (Note::Fs, "m7"));
        assert_eq!(split_symbol("Bbdim").unwrap(), (Note::As, "dim"));
        assert_eq!(split_symbol("C##m").unwrap(), (Note::D, "m"));
        assert_eq!(split_symbol("Abb7th").unwrap(), (Note::G, "7th"));
        assert!(split_symbol("").is_err());
        assert!(split_symbol("H7").is_err());
    }

    #[test]
    fn test_spell_major_triad() {
        let stack = spell("CM").unwrap();
        assert_eq!(
            stack,
            vec![
                Pitch::new(Note::C, 3),
                Pitch::new(Note::E, 3),
                Pitch::new(Note::G, 3),
            ]
        );
    }

    #[test]
    fn test_spell_minor_and_dim() {
        assert_eq!(
            spell("Dm").unwrap(),
            vec![
                Pitch::new(Note::D, 3),
                Pitch::new(Note::F, 3),
                Pitch::new(Note::A, 3),
            ]
        );
        assert_eq!(
            spell("Bdim").unwrap(),
            vec![
                Pitch::new(Note::B, 3),
                Pitch::new(Note::D, 4),
                Pitch::new(Note::F, 4),
            ]
        );
    }

    #[test]
    fn test_spell_sevenths() {
        let g7 = spell("G7th").unwrap();
        assert_eq!(g7.len(), 4);
        assert_eq!(g7[3], Pitch::new(Note::F, 4));

        let cm7 = spell("CM7").unwrap();
        assert_eq!(cm7[3], Pitch::new(Note::B, 3));

        let bdim7 = spell("Bdim7").unwrap();
        assert_eq!(bdim7[3], Pitch::new(Note::Gs, 4));
    }

    #[test]
    fn test_spell_stack_is_ascending() {
        for sym in ["CM", "Am7", "F#dim7", "G9", "Dsus4", "E13"] {
            let stack = spell(sym).unwrap();
            assert!(stack.windows(2).all(|w| w[0] < w[1]), "{} not sorted", sym);
        }
    }

    #[test]
    fn test_spell_unknown_quality() {
        assert!(spell("Cwobble").is_err());
        assert!(spell("C").is_err());
    }
}

// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Key model: modes, scales and their diatonic chord sets.
//!
//! A `Key` derives the 7-note scale for a root and mode, plus the
//! diatonic triad and seventh-chord symbol sets indexed by scale degree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::music::note::Note;

/// The seven diatonic modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Ionian, // Major
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian, // Natural minor
    Locrian,
}

impl Mode {
    /// Get the intervals (semitones from root) for this mode
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Ionian => [0, 2, 4, 5, 7, 9, 11],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            Mode::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }

    /// Parse mode from string
    pub fn parse(s: &str) -> Result<Self> {
        let norm = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match norm.as_str() {
            "major" | "ionian" => Ok(Mode::Ionian),
            "dorian" => Ok(Mode::Dorian),
            "phrygian" => Ok(Mode::Phrygian),
            "lydian" => Ok(Mode::Lydian),
            "mixolydian" => Ok(Mode::Mixolydian),
            "minor" | "naturalminor" | "aeolian" => Ok(Mode::Aeolian),
            "locrian" => Ok(Mode::Locrian),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }

    /// Get a human-readable name for this mode
    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "Major",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Minor",
            Mode::Locrian => "Locrian",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A musical key with root and mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    root: Note,
    mode: Mode,
}

impl Key {
    /// Create a new key
    pub fn new(root: Note, mode: Mode) -> Self {
        Self { root, mode }
    }

    /// Parse a key from strings
    pub fn parse(root: &str, mode: &str) -> Result<Self> {
        let root = Note::parse(root).ok_or_else(|| Error::UnknownNote(root.to_string()))?;
        Ok(Key::new(root, Mode::parse(mode)?))
    }

    /// Get the root note
    pub fn root(&self) -> Note {
        self.root
    }

    /// Get the mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get the 7 scale notes, root first
    pub fn scale(&self) -> [Note; 7] {
        let iv = self.mode.intervals();
        let mut notes = [Note::C; 7];
        for (i, &semis) in iv.iter().enumerate() {
            notes[i] = self.root.transpose(semis as i32);
        }
        notes
    }

    /// Get the scale note at a 1-based degree
    pub fn degree_note(&self, degree: usize) -> Option<Note> {
        if (1..=7).contains(&degree) {
            Some(self.scale()[degree - 1])
        } else {
            None
        }
    }

    /// Get the 1-based degree of a note, or 0 if it is not in the scale
    pub fn degree_of(&self, note: Note) -> usize {
        self.scale()
            .iter()
            .position(|&n| n == note)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Interval stack of the chord built on a 0-based degree.
    ///
    /// Returns (third, fifth, seventh) in semitones above the chord root.
    fn stacked_thirds(&self, degree: usize) -> (u8, u8, u8) {
        let iv = self.mode.intervals();
        let root = iv[degree] as i32;
        let at = |d: usize| {
            let wrapped = iv[d % 7] as i32 + 12 * (d / 7) as i32;
            (wrapped - root).rem_euclid(12) as u8
        };
        (at(degree + 2), at(degree + 4), at(degree + 6))
    }

    /// The 7 diatonic triad symbols, indexed by scale degree
    ///
    /// Symbols use theory-library spelling ("C", "Dm", "Bdim"); the
    /// speller rewrites them into the renderer's vocabulary.
    pub fn triads(&self) -> [String; 7] {
        let scale = self.scale();
        std::array::from_fn(|d| {
            let (third, fifth, _) = self.stacked_thirds(d);
            let quality = match (third, fifth) {
                (4, 7) => "",
                (3, 7) => "m",
                (3, 6) => "dim",
                (4, 8) => "aug",
                _ => "",
            };
            format!("{}{}", scale[d], quality)
        })
    }

    /// The 7 diatonic seventh-chord symbols, indexed by scale degree
    pub fn seventh_chords(&self) -> [String; 7] {
        let scale = self.scale();
        std::array::from_fn(|d| {
            let (third, fifth, seventh) = self.stacked_thirds(d);
            let quality = match (third, fifth, seventh) {
                (4, 7, 11) => "maj7",
                (4, 7, 10) => "7",
                (3, 7, 10) => "m7",
                (3, 7, 11) => "mM7",
                (3, 6, 10) => "m7b5",
                (3, 6, 9) => "dim7",
                (4, 8, 11) => "maj7#5",
                _ => "7",
            };
            format!("{}{}", scale[d], quality)
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.mode)
    }
}

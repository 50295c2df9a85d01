// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and octave-qualified pitches.
//!
//! Provides the chromatic note names and the `Pitch` type used in note
//! stacks. Voicing transforms move pitches by whole octaves only, so
//! pitch-class spelling never changes once a chord is spelled.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        match self {
            Note::C => 0,
            Note::Cs => 1,
            Note::D => 2,
            Note::Ds => 3,
            Note::E => 4,
            Note::F => 5,
            Note::Fs => 6,
            Note::G => 7,
            Note::Gs => 8,
            Note::A => 9,
            Note::As => 10,
            Note::B => 11,
        }
    }

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Parse note from string (e.g., "C", "C#", "Db", "F#")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" | "B#" => Some(Note::C),
            "C#" | "CS" | "DB" => Some(Note::Cs),
            "D" => Some(Note::D),
            "D#" | "DS" | "EB" => Some(Note::Ds),
            "E" | "FB" => Some(Note::E),
            "F" | "E#" | "ES" => Some(Note::F),
            "F#" | "FS" | "GB" => Some(Note::Fs),
            "G" => Some(Note::G),
            "G#" | "GS" | "AB" => Some(Note::Gs),
            "A" => Some(Note::A),
            "A#" | "AS" | "BB" => Some(Note::As),
            "B" | "CB" => Some(Note::B),
            _ => None,
        }
    }

    /// Transpose by semitones
    pub fn transpose(self, semitones: i32) -> Self {
        let new_pc = (self.pitch_class() as i32 + semitones).rem_euclid(12) as u8;
        Note::from_pitch_class(new_pc)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::C => write!(f, "C"),
            Note::Cs => write!(f, "C#"),
            Note::D => write!(f, "D"),
            Note::Ds => write!(f, "D#"),
            Note::E => write!(f, "E"),
            Note::F => write!(f, "F"),
            Note::Fs => write!(f, "F#"),
            Note::G => write!(f, "G"),
            Note::Gs => write!(f, "G#"),
            Note::A => write!(f, "A"),
            Note::As => write!(f, "A#"),
            Note::B => write!(f, "B"),
        }
    }
}

/// A pitch: note name plus octave.
///
/// MIDI convention throughout: middle C = C4 = 60, so
/// `midi = (octave + 1) * 12 + pitch_class`. The renderer and the
/// analyzer share this single mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub note: Note,
    pub octave: i8,
}

impl Pitch {
    pub fn new(note: Note, octave: i8) -> Self {
        Self { note, octave }
    }

    /// Absolute semitone position (unclamped MIDI number).
    fn semitones(self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.note.pitch_class() as i32
    }

    /// MIDI note number, clamped to 0-127.
    pub fn midi(self) -> MidiNote {
        self.semitones().clamp(0, 127) as MidiNote
    }

    /// Pitch from a MIDI note number.
    pub fn from_midi(midi: MidiNote) -> Self {
        Self {
            note: Note::from_pitch_class(midi % 12),
            octave: (midi / 12) as i8 - 1,
        }
    }

    /// Transpose by semitones, recomputing the octave.
    pub fn transpose(self, semitones: i32) -> Self {
        let abs = self.semitones() + semitones;
        Self {
            note: Note::from_pitch_class(abs.rem_euclid(12) as u8),
            octave: (abs.div_euclid(12) - 1) as i8,
        }
    }

    /// Transpose by whole octaves.
    pub fn transpose_octaves(self, octaves: i32) -> Self {
        Self {
            note: self.note,
            octave: (self.octave as i32 + octaves) as i8,
        }
    }

    /// Parse a pitch like "C#3" or "Bb-1".
    pub fn parse(s: &str) -> Option<Self> {
        let split = s
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '-')
            .map(|(i, _)| i)?;
        let note = Note::parse(&s[..split])?;
        let octave = s[split..].parse::<i8>().ok()?;
        Some(Self { note, octave })
    }
}

impl PartialOrd for Pitch {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pitch {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.semitones().cmp(&other.semitones())
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_pitch_class() {
        assert_eq!(Note::C.pitch_class(), 0);
        assert_eq!(Note::A.pitch_class(), 9);
        assert_eq!(Note::B.pitch_class(), 11);
    }

    #[test]
    fn test_note_parse() {
        assert_eq!(Note::parse("C"), Some(Note::C));
        assert_eq!(Note::parse("C#"), Some(Note::Cs));
        assert_eq!(Note::parse("Db"), Some(Note::Cs));
        assert_eq!(Note::parse("Bb"), Some(Note::As));
        assert_eq!(Note::parse("X"), None);
    }

    #[test]
    fn test_note_transpose() {
        assert_eq!(Note::C.transpose(2), Note::D);
        assert_eq!(Note::C.transpose(12), Note::C);
        assert_eq!(Note::C.transpose(-1), Note::B);
        assert_eq!(Note::G.transpose(5), Note::C);
    }

    #[test]
    fn test_pitch_midi() {
        assert_eq!(Pitch::new(Note::C, 4).midi(), 60);
        assert_eq!(Pitch::new(Note::A, 4).midi(), 69);
        assert_eq!(Pitch::new(Note::C, -1).midi(), 0);
    }

    #[test]
    fn test_pitch_from_midi_round_trip() {
        for midi in [0u8, 21, 48, 60, 69, 127] {
            assert_eq!(Pitch::from_midi(midi).midi(), midi);
        }
    }

    #[test]
    fn test_pitch_transpose() {
        let c4 = Pitch::new(Note::C, 4);
        assert_eq!(c4.transpose(12), Pitch::new(Note::C, 5));
        assert_eq!(c4.transpose(-1), Pitch::new(Note::B, 3));
        assert_eq!(c4.transpose(7), Pitch::new(Note::G, 4));
        assert_eq!(c4.transpose_octaves(-2), Pitch::new(Note::C, 2));
    }

    #[test]
    fn test_pitch_parse() {
        assert_eq!(Pitch::parse("C#3"), Some(Pitch::new(Note::Cs, 3)));
        assert_eq!(Pitch::parse("Bb-1"), Some(Pitch::new(Note::As, -1)));
        assert_eq!(Pitch::parse("C"), None);
    }

    #[test]
    fn test_pitch_ordering() {
        let low = Pitch::new(Note::B, 2);
        let high = Pitch::new(Note::C, 3);
        assert!(low < high);
        assert_eq!(format!("{}", high), "C3");
    }
}

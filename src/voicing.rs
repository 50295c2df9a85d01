// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Voicing pipeline: named octave rearrangements of chord stacks.
//!
//! A voicing is a closed enum variant dispatched through `apply`, never
//! a by-name function lookup. Every transform moves pitches by whole
//! octaves only; pitch classes are untouched. Continuity transforms
//! compare each chord with its predecessor (or the first/last chord)
//! and run their scan twice to converge.

use std::fmt;

use crate::clip::Clip;
use crate::edit::{self, NoteIndices};
use crate::error::{Error, Result};
use crate::music::note::{Note, Pitch};
use crate::rng::Dice;

const OCTAVE: i32 = 12;

/// The voicing menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoicingKind {
    None,
    VenusChords,
    RootNoteOnly,
    MediantNoteOnly,
    DominantNoteOnly,
    SeventhNoteOnly,
    RandomNoteOnly,
    Inversion1,
    Inversion2,
    Inversion3,
    ShellVoicing,
    Drop1,
    Drop2,
    Drop3,
    Drop4,
    SingleOctaveChords,
    SameNotes,
    FirstChordTrim,
    LastChordTrim,
    Descend,
    DescendHighest,
    Ascend,
    AscendHighest,
}

impl VoicingKind {
    pub const ALL: [VoicingKind; 23] = [
        VoicingKind::None,
        VoicingKind::VenusChords,
        VoicingKind::RootNoteOnly,
        VoicingKind::MediantNoteOnly,
        VoicingKind::DominantNoteOnly,
        VoicingKind::SeventhNoteOnly,
        VoicingKind::RandomNoteOnly,
        VoicingKind::Inversion1,
        VoicingKind::Inversion2,
        VoicingKind::Inversion3,
        VoicingKind::ShellVoicing,
        VoicingKind::Drop1,
        VoicingKind::Drop2,
        VoicingKind::Drop3,
        VoicingKind::Drop4,
        VoicingKind::SingleOctaveChords,
        VoicingKind::SameNotes,
        VoicingKind::FirstChordTrim,
        VoicingKind::LastChordTrim,
        VoicingKind::Descend,
        VoicingKind::DescendHighest,
        VoicingKind::Ascend,
        VoicingKind::AscendHighest,
    ];

    pub fn parse(s: &str) -> Result<Self> {
        let norm = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        VoicingKind::ALL
            .iter()
            .find(|kind| kind.name().replace('_', "") == norm)
            .copied()
            .ok_or_else(|| Error::UnknownVoicing(s.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            VoicingKind::None => "none",
            VoicingKind::VenusChords => "venus_chords",
            VoicingKind::RootNoteOnly => "root_note_only",
            VoicingKind::MediantNoteOnly => "mediant_note_only",
            VoicingKind::DominantNoteOnly => "dominant_note_only",
            VoicingKind::SeventhNoteOnly => "seventh_note_only",
            VoicingKind::RandomNoteOnly => "random_note_only",
            VoicingKind::Inversion1 => "inversion_1",
            VoicingKind::Inversion2 => "inversion_2",
            VoicingKind::Inversion3 => "inversion_3",
            VoicingKind::ShellVoicing => "shell_voicing",
            VoicingKind::Drop1 => "drop_1",
            VoicingKind::Drop2 => "drop_2",
            VoicingKind::Drop3 => "drop_3",
            VoicingKind::Drop4 => "drop_4",
            VoicingKind::SingleOctaveChords => "single_octave_chords",
            VoicingKind::SameNotes => "same_notes",
            VoicingKind::FirstChordTrim => "first_chord_trim",
            VoicingKind::LastChordTrim => "last_chord_trim",
            VoicingKind::Descend => "descend",
            VoicingKind::DescendHighest => "descend_highest",
            VoicingKind::Ascend => "ascend",
            VoicingKind::AscendHighest => "ascend_highest",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            VoicingKind::None => "Renders the chords as spelled.",
            VoicingKind::VenusChords => {
                "Takes the 2nd and the 4th (7th) notes and transposes them an octave higher. If there is no 4th note, it transposes only the 2nd."
            }
            VoicingKind::RootNoteOnly => "Renders only the root note of the chords.",
            VoicingKind::MediantNoteOnly => "Renders only the mediant note of the chords.",
            VoicingKind::DominantNoteOnly => "Renders only the dominant note of the chords.",
            VoicingKind::SeventhNoteOnly => "Renders only the 7th note of the chords.",
            VoicingKind::RandomNoteOnly => "Renders a random note from each chord.",
            VoicingKind::Inversion1 => "Transposes the root note an octave higher.",
            VoicingKind::Inversion2 => "Transposes the root and the mediant note an octave higher.",
            VoicingKind::Inversion3 => {
                "Transposes the root, mediant and dominant note an octave higher."
            }
            VoicingKind::ShellVoicing => {
                "Removes the dominant note. Should be used with seventh chords for proper shell voicing."
            }
            VoicingKind::Drop1 => "Transposes the highest note an octave lower.",
            VoicingKind::Drop2 => "Transposes the second highest note an octave lower.",
            VoicingKind::Drop3 => "Transposes the third highest note an octave lower.",
            VoicingKind::Drop4 => "Transposes the fourth highest note an octave lower.",
            VoicingKind::SingleOctaveChords => {
                "Looks at the root note of the first chord. If any other note is in a higher octave, it transposes it an octave lower. If any other note is in a lower octave, it transposes it an octave higher."
            }
            VoicingKind::SameNotes => {
                "Looks at the previous chord and if it holds the same note at a different octave, moves the current note an octave toward it."
            }
            VoicingKind::FirstChordTrim => {
                "Folds notes lying outside the first chord's range an octave back toward it."
            }
            VoicingKind::LastChordTrim => {
                "Folds notes lying outside the last chord's range an octave back toward it."
            }
            VoicingKind::Descend => {
                "The lowest note of every chord is always lower or equal to the lowest note of the chord preceding it."
            }
            VoicingKind::DescendHighest => {
                "The highest note of every chord is always lower or equal to the highest note of the chord preceding it."
            }
            VoicingKind::Ascend => {
                "The lowest note of every chord is always higher or equal to the lowest of the chord preceding it."
            }
            VoicingKind::AscendHighest => {
                "The highest note of every chord is always higher or equal to the highest of the chord preceding it."
            }
        }
    }
}

impl fmt::Display for VoicingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Apply a voicing to a chord clip.
pub fn apply(clip: &mut Clip, kind: VoicingKind, dice: &mut Dice) {
    let all = clip.stack_count();
    match kind {
        VoicingKind::None => {}
        VoicingKind::VenusChords => {
            edit::transpose_in_chord(clip, 1, all, &NoteIndices::At(vec![2, 4]), OCTAVE);
        }
        VoicingKind::RootNoteOnly => keep_only(clip, 1),
        VoicingKind::MediantNoteOnly => keep_only(clip, 2),
        VoicingKind::DominantNoteOnly => keep_only(clip, 3),
        VoicingKind::SeventhNoteOnly => keep_only(clip, 4),
        VoicingKind::RandomNoteOnly => {
            for (nth, idx) in clip.stack_positions().into_iter().enumerate() {
                let len = clip
                    .get(idx)
                    .and_then(|s| s.pitches())
                    .map(|p| p.len())
                    .unwrap_or(0);
                if len > 1 {
                    let drop = dice.multi_roll_unique_asc(len + 1, 1, len - 1);
                    edit::remove_notes(clip, nth + 1, 1, &drop);
                }
            }
        }
        VoicingKind::Inversion1 => {
            edit::transpose_in_chord(clip, 1, all, &NoteIndices::At(vec![1]), OCTAVE);
        }
        VoicingKind::Inversion2 => {
            edit::transpose_in_chord(clip, 1, all, &NoteIndices::At(vec![1, 2]), OCTAVE);
        }
        VoicingKind::Inversion3 => {
            edit::transpose_in_chord(clip, 1, all, &NoteIndices::At(vec![1, 2, 3]), OCTAVE);
        }
        VoicingKind::ShellVoicing => {
            edit::remove_notes(clip, 1, all, &[3]);
        }
        VoicingKind::Drop1 => drop_nth_highest(clip, 0),
        VoicingKind::Drop2 => drop_nth_highest(clip, 1),
        VoicingKind::Drop3 => drop_nth_highest(clip, 2),
        VoicingKind::Drop4 => drop_nth_highest(clip, 3),
        VoicingKind::SingleOctaveChords => single_octave(clip),
        VoicingKind::SameNotes => same_notes(clip),
        VoicingKind::FirstChordTrim => trim_to_chord(clip, true),
        VoicingKind::LastChordTrim => trim_to_chord(clip, false),
        VoicingKind::Descend => converge(clip, Extreme::Lowest, Scan::Down),
        VoicingKind::DescendHighest => converge(clip, Extreme::Highest, Scan::Down),
        VoicingKind::Ascend => converge(clip, Extreme::Lowest, Scan::Up),
        VoicingKind::AscendHighest => converge(clip, Extreme::Highest, Scan::Up),
    }
    clip.consolidate();
}

/// Keep only the chord tone at `position` in every stack.
fn keep_only(clip: &mut Clip, position: usize) {
    let all = clip.stack_count();
    let drop: Vec<usize> = (1..=9).filter(|&n| n != position).collect();
    edit::remove_notes(clip, 1, all, &drop);
}

/// Drop the note `nth` positions below the top of each stack an octave.
fn drop_nth_highest(clip: &mut Clip, nth: usize) {
    for (stack, idx) in clip.stack_positions().into_iter().enumerate() {
        let len = clip
            .get(idx)
            .and_then(|s| s.pitches())
            .map(|p| p.len())
            .unwrap_or(0);
        if len > nth {
            edit::transpose_in_chord(
                clip,
                stack + 1,
                1,
                &NoteIndices::At(vec![len - nth]),
                -OCTAVE,
            );
        }
    }
}

/// Align every tone to the octave of the first stack's first note.
fn single_octave(clip: &mut Clip) {
    let reference = match clip
        .nth_stack(1)
        .and_then(|idx| clip.get(idx))
        .and_then(|s| s.pitches())
        .and_then(|p| p.first().copied())
    {
        Some(pitch) => pitch.octave,
        None => return,
    };
    for idx in clip.stack_positions() {
        if let Some(pitches) = clip.get_mut(idx).and_then(|s| s.pitches_mut()) {
            for pitch in pitches.iter_mut() {
                if pitch.octave < reference {
                    *pitch = pitch.transpose_octaves(1);
                } else if pitch.octave > reference {
                    *pitch = pitch.transpose_octaves(-1);
                }
            }
        }
    }
}

/// Move tones one octave toward the previous chord's matching pitch
/// class.
fn same_notes(clip: &mut Clip) {
    let positions = clip.stack_positions();
    for window in 1..positions.len() {
        let previous: Vec<Pitch> = match clip.get(positions[window - 1]).and_then(|s| s.pitches()) {
            Some(p) => p.to_vec(),
            None => continue,
        };
        let prev_classes: Vec<Note> = previous.iter().map(|p| p.note).collect();
        if let Some(pitches) = clip.get_mut(positions[window]).and_then(|s| s.pitches_mut()) {
            for pitch in pitches.iter_mut() {
                if let Some(at) = prev_classes.iter().position(|&n| n == pitch.note) {
                    let same = previous[at];
                    if pitch.octave < same.octave {
                        *pitch = pitch.transpose_octaves(1);
                    } else if pitch.octave > same.octave {
                        *pitch = pitch.transpose_octaves(-1);
                    }
                }
            }
        }
    }
}

/// Fold tones outside a reference chord's positional low-high span an
/// octave back toward it. `first` picks the first chord as reference and
/// scans the rest; otherwise the last chord bounds all the others.
fn trim_to_chord(clip: &mut Clip, first: bool) {
    let positions = clip.stack_positions();
    if positions.len() < 2 {
        return;
    }
    let reference_idx = if first {
        positions[0]
    } else {
        positions[positions.len() - 1]
    };
    let (low, high) = match clip.get(reference_idx).and_then(|s| s.pitches()) {
        Some(p) if !p.is_empty() => (p[0], p[p.len() - 1]),
        _ => return,
    };
    let targets: Vec<usize> = if first {
        positions[1..].to_vec()
    } else {
        positions[..positions.len() - 1].to_vec()
    };
    for idx in targets {
        if let Some(pitches) = clip.get_mut(idx).and_then(|s| s.pitches_mut()) {
            for pitch in pitches.iter_mut() {
                if *pitch < low {
                    *pitch = pitch.transpose_octaves(1);
                } else if *pitch > high {
                    *pitch = pitch.transpose_octaves(-1);
                }
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Extreme {
    Lowest,
    Highest,
}

#[derive(Clone, Copy, PartialEq)]
enum Scan {
    /// Walk note positions top-down, pushing octaves down
    Down,
    /// Walk note positions bottom-up, pushing octaves up
    Up,
}

fn extreme_of(pitches: &[Pitch], which: Extreme) -> Option<Pitch> {
    match which {
        Extreme::Lowest => pitches.iter().min().copied(),
        Extreme::Highest => pitches.iter().max().copied(),
    }
}

/// Push tones an octave at a time until each chord's extreme pitch sits
/// on the required side of its predecessor's. One scan moves each note
/// position at most once, so the pass runs twice to converge.
fn converge(clip: &mut Clip, which: Extreme, scan: Scan) {
    for _ in 0..2 {
        let positions = clip.stack_positions();
        for window in 1..positions.len() {
            let previous = match clip.get(positions[window - 1]).and_then(|s| s.pitches()) {
                Some(p) => match extreme_of(p, which) {
                    Some(e) => e,
                    None => continue,
                },
                None => continue,
            };
            let len = match clip.get(positions[window]).and_then(|s| s.pitches()) {
                Some(p) => p.len(),
                None => continue,
            };
            let order: Vec<usize> = match scan {
                Scan::Down => (0..len).rev().collect(),
                Scan::Up => (0..len).collect(),
            };
            for j in order {
                let current = match clip.get(positions[window]).and_then(|s| s.pitches()) {
                    Some(p) => match extreme_of(p, which) {
                        Some(e) => e,
                        None => break,
                    },
                    None => break,
                };
                let out_of_line = match scan {
                    Scan::Down => current > previous,
                    Scan::Up => current < previous,
                };
                if !out_of_line {
                    break;
                }
                let step = if scan == Scan::Down { -1 } else { 1 };
                if let Some(pitches) = clip.get_mut(positions[window]).and_then(|s| s.pitches_mut())
                {
                    pitches[j] = pitches[j].transpose_octaves(step);
                }
            }
        }
    }
}

/// Transpose all chords so their spelled octave lands on the target.
pub fn chords_to_octave(clip: &mut Clip, octave: i8) {
    let shift = octave as i32 - crate::music::chord::DEFAULT_CHORD_OCTAVE as i32;
    if shift != 0 {
        let all = clip.stack_count();
        edit::transpose_in_chord(clip, 1, all, &NoteIndices::All, shift * OCTAVE);
    }
}

/// Open up each chord: lowest tone down, second-lowest in place, the
/// rest up, by one or two octaves.
pub fn open_chords(clip: &mut Clip, amount: u8) {
    let amount = amount.clamp(1, 2) as i32;
    for idx in clip.stack_positions() {
        if let Some(pitches) = clip.get_mut(idx).and_then(|s| s.pitches_mut()) {
            if pitches.is_empty() {
                continue;
            }
            let lowest = pitches
                .iter()
                .enumerate()
                .min_by_key(|(_, p)| **p)
                .map(|(i, _)| i)
                .unwrap_or(0);
            let second = pitches
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != lowest)
                .min_by_key(|(_, p)| **p)
                .map(|(i, _)| i);
            for (i, pitch) in pitches.iter_mut().enumerate() {
                if i == lowest {
                    *pitch = pitch.transpose_octaves(-amount);
                } else if Some(i) != second {
                    *pitch = pitch.transpose_octaves(amount);
                }
            }
        }
    }
}

/// Add a bass root under each chord at the given octave.
///
/// `roots` is indexed by segment position, captured before the voicing
/// ran; rest segments carry `None`.
pub fn augment_bass(clip: &mut Clip, roots: &[Option<Note>], octave: i8) {
    let mut nth = 0;
    for (idx, root) in roots.iter().enumerate() {
        if clip.get(idx).map(|s| !s.is_rest()).unwrap_or(false) {
            nth += 1;
            if let Some(note) = root {
                edit::augment_chord(clip, nth, 1, Pitch::new(*note, octave));
            }
        }
    }
}

// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Melody generation over the root-pattern grammar.
//!
//! A root pattern extends the rhythm grammar with `P` placeholder slots
//! that later resolve to non-root melody notes. Resolution runs as a
//! state machine over typed tokens: a drawn note may "benefit", claiming
//! the next placeholder for itself as either a sustain or a repeat.

use crate::error::{Error, Result};
use crate::music::key::Mode;
use crate::music::note::Pitch;
use crate::rng::Dice;

/// Where melody notes sit relative to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Lower,
    Higher,
    Any,
}

impl Register {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lower" => Some(Register::Lower),
            "higher" => Some(Register::Higher),
            "any" => Some(Register::Any),
            _ => None,
        }
    }
}

/// Pitch direction of the drawn melody notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Any,
    Ascend,
    Descend,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "any" => Some(Direction::Any),
            "ascend" => Some(Direction::Ascend),
            "descend" => Some(Direction::Descend),
            _ => None,
        }
    }
}

/// Slot states the resolver walks over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// `x`: the root note sounds
    Root,
    /// `-`: silence
    Rest,
    /// `_`: previous slot continues
    Sustain,
    /// `P`: a melody note will be placed here
    Pending,
    /// A placed melody note that claimed the next pending slot
    Benefiting,
    /// A placed melody note without a claim
    Placed,
    /// A pending slot claimed by an earlier benefiting note
    Claimed,
    /// Claim resolved into a repeat of the benefiting note
    Repeated,
    /// Claim resolved into a sustain of the benefiting note
    Sustained,
}

/// A generated melody: the notes in onset order plus the final pattern,
/// renderable with the clip renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Melody {
    pub notes: Vec<Pitch>,
    pub pattern: String,
}

/// Generate a root pattern of the given slot count.
///
/// Slot 0 is an onset when `root_first` is set, otherwise a uniform draw
/// over rest, placeholder and sustain; the remaining slots draw over all
/// four characters.
pub fn generate_root_pattern(root_first: bool, slots: usize, dice: &mut Dice) -> String {
    const NON_ROOT: [char; 3] = ['-', 'P', '_'];
    const ALL: [char; 4] = ['-', 'P', '_', 'x'];

    let mut pattern = String::with_capacity(slots);
    if slots == 0 {
        return pattern;
    }
    pattern.push(if root_first {
        'x'
    } else {
        NON_ROOT[dice.range(3, 0)]
    });
    for _ in 1..slots {
        pattern.push(ALL[dice.range(4, 0)]);
    }
    pattern
}

/// The candidate scale for non-root notes: the mode's notes below,
/// above, or around the root, with `smooth_edges` notes trimmed from the
/// outer end(s) to pull the melody toward the root.
fn candidate_scale(root: Pitch, mode: Mode, register: Register, smooth_edges: usize) -> Vec<Pitch> {
    let smooth = smooth_edges.min(6);
    let below: Vec<Pitch> = mode
        .intervals()
        .iter()
        .map(|&i| root.transpose(i as i32 - 12))
        .collect();
    let above: Vec<Pitch> = mode
        .intervals()
        .iter()
        .skip(1)
        .map(|&i| root.transpose(i as i32))
        .chain(std::iter::once(root.transpose(12)))
        .collect();

    match register {
        Register::Lower => below[smooth..].to_vec(),
        Register::Higher => above[..above.len() - smooth].to_vec(),
        Register::Any => {
            let mut scale = below;
            scale.extend(above);
            scale[smooth..scale.len() - smooth].to_vec()
        }
    }
}

/// Build a melody from a root pattern.
///
/// Draws `note_count` distinct candidate notes (direction-ordered) and
/// walks the pattern: placeholders emit the drawn notes in rotation.
/// When the pattern has more placeholders than notes and `arp` is off,
/// the surplus becomes "benefits": a benefiting note claims the next
/// placeholder, which a coin flip turns into either a sustain or an
/// immediate repeat.
pub fn build_melody(
    root: Pitch,
    mode: Mode,
    register: Register,
    note_count: usize,
    pattern: &str,
    arp: bool,
    direction: Direction,
    smooth_edges: usize,
    dice: &mut Dice,
) -> Result<Melody> {
    let mut tokens: Vec<Token> = pattern
        .chars()
        .map(|c| match c {
            'x' => Ok(Token::Root),
            '-' => Ok(Token::Rest),
            '_' => Ok(Token::Sustain),
            'P' => Ok(Token::Pending),
            other => Err(Error::BadPattern(other)),
        })
        .collect::<Result<_>>()?;

    let scale = candidate_scale(root, mode, register, smooth_edges);
    let pending = tokens.iter().filter(|t| **t == Token::Pending).count();
    let note_count = note_count.min(pending).min(scale.len());

    // No notes to place: placeholders fall silent.
    if note_count == 0 {
        for token in tokens.iter_mut() {
            if *token == Token::Pending {
                *token = Token::Rest;
            }
        }
        let notes = tokens.iter().filter(|t| **t == Token::Root).map(|_| root);
        return Ok(Melody {
            notes: notes.collect(),
            pattern: render_tokens(&tokens),
        });
    }

    let indices = match direction {
        Direction::Any => dice.multi_roll_unique_unsorted(scale.len(), 0, note_count),
        Direction::Descend => dice.multi_roll_unique_asc(scale.len(), 0, note_count),
        Direction::Ascend => dice.multi_roll_unique_desc(scale.len(), 0, note_count),
    };
    let mut drawn: Vec<Pitch> = indices.iter().map(|&i| scale[i]).collect();
    drawn.reverse();

    let benefits: Vec<usize> = if pending > note_count && !arp {
        (0..pending - note_count)
            .map(|_| dice.range(note_count, 0))
            .collect()
    } else {
        Vec::new()
    };

    let mut melody: Vec<Pitch> = Vec::new();
    let mut next_note = 0usize;
    let mut benefits_spent = 0usize;
    let mut active_benefit: Option<Pitch> = None;

    for i in 0..tokens.len() {
        match tokens[i] {
            Token::Root => melody.push(root),
            Token::Rest | Token::Sustain => {}
            Token::Pending => {
                melody.push(drawn[next_note]);
                if benefits_spent < benefits.len() && benefits[benefits_spent] == next_note {
                    active_benefit = Some(drawn[next_note]);
                    tokens[i] = Token::Benefiting;
                    if let Some(claim) =
                        tokens[i + 1..].iter().position(|t| *t == Token::Pending)
                    {
                        tokens[i + 1 + claim] = Token::Claimed;
                    }
                    benefits_spent += 1;
                } else {
                    tokens[i] = Token::Placed;
                    next_note = (next_note + 1) % note_count;
                }
            }
            Token::Claimed => {
                let sustains = dice.chance(0.5);
                if sustains && i > 0 && tokens[i - 1] == Token::Benefiting {
                    tokens[i] = Token::Sustained;
                } else {
                    tokens[i] = Token::Repeated;
                    if let Some(pitch) = active_benefit {
                        melody.push(pitch);
                    }
                }
                next_note = (next_note + 1) % note_count;
            }
            Token::Benefiting | Token::Placed | Token::Repeated | Token::Sustained => {}
        }
    }

    Ok(Melody {
        notes: melody,
        pattern: render_tokens(&tokens),
    })
}

/// Collapse resolved tokens back into the renderer grammar.
fn render_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| match token {
            Token::Root | Token::Benefiting | Token::Placed | Token::Repeated => 'x',
            Token::Rest => '-',
            Token::Sustain | Token::Sustained => '_',
            Token::Pending | Token::Claimed => '-',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::note::Note;
    use crate::render::{render_pattern, Sizzle, Subdiv};

    fn root() -> Pitch {
        Pitch::new(Note::C, 3)
    }

    #[test]
    fn test_generate_root_pattern_shape() {
        let mut dice = Dice::from_seed(6);
        for _ in 0..20 {
            let p = generate_root_pattern(true, 8, &mut dice);
            assert_eq!(p.len(), 8);
            assert!(p.starts_with('x'));
            assert!(p.chars().all(|c| matches!(c, 'x' | '-' | '_' | 'P')));
        }
    }

    #[test]
    fn test_candidate_scale_registers() {
        let lower = candidate_scale(root(), Mode::Ionian, Register::Lower, 0);
        assert_eq!(lower.len(), 7);
        assert!(lower.iter().all(|p| *p < root()));

        let higher = candidate_scale(root(), Mode::Ionian, Register::Higher, 0);
        assert_eq!(higher.len(), 7);
        assert!(higher.iter().all(|p| *p > root()));
        assert_eq!(higher[6], root().transpose(12));

        let any = candidate_scale(root(), Mode::Ionian, Register::Any, 0);
        assert_eq!(any.len(), 14);
    }

    #[test]
    fn test_candidate_scale_smooth_edges() {
        let lower = candidate_scale(root(), Mode::Ionian, Register::Lower, 3);
        assert_eq!(lower.len(), 4);
        let any = candidate_scale(root(), Mode::Ionian, Register::Any, 2);
        assert_eq!(any.len(), 10);
    }

    #[test]
    fn test_build_melody_emits_note_per_onset() {
        let mut dice = Dice::from_seed(12);
        let melody = build_melody(
            root(),
            Mode::Ionian,
            Register::Higher,
            2,
            "xPxP",
            true,
            Direction::Any,
            0,
            &mut dice,
        )
        .unwrap();
        assert_eq!(melody.pattern, "xxxx");
        assert_eq!(melody.notes.len(), 4);
        assert_eq!(melody.notes[0], root());
        assert_eq!(melody.notes[2], root());
    }

    #[test]
    fn test_build_melody_pattern_stays_in_grammar() {
        let mut dice = Dice::from_seed(13);
        for seed in 0..20 {
            let mut dice2 = Dice::from_seed(seed);
            let pattern = generate_root_pattern(true, 16, &mut dice2);
            let melody = build_melody(
                root(),
                Mode::Aeolian,
                Register::Any,
                4,
                &pattern,
                false,
                Direction::Any,
                1,
                &mut dice,
            )
            .unwrap();
            assert_eq!(melody.pattern.len(), 16);
            assert!(melody
                .pattern
                .chars()
                .all(|c| matches!(c, 'x' | '-' | '_')));
            let onsets = melody.pattern.chars().filter(|&c| c == 'x').count();
            assert_eq!(melody.notes.len(), onsets);
        }
    }

    #[test]
    fn test_build_melody_zero_notes_rests_placeholders() {
        let mut dice = Dice::from_seed(1);
        let melody = build_melody(
            root(),
            Mode::Ionian,
            Register::Lower,
            0,
            "xP-P",
            false,
            Direction::Any,
            0,
            &mut dice,
        )
        .unwrap();
        assert_eq!(melody.pattern, "x---");
        assert_eq!(melody.notes.len(), 1);
    }

    #[test]
    fn test_build_melody_rejects_bad_pattern() {
        let mut dice = Dice::from_seed(1);
        assert!(build_melody(
            root(),
            Mode::Ionian,
            Register::Any,
            2,
            "xQ",
            true,
            Direction::Any,
            0,
            &mut dice,
        )
        .is_err());
    }

    #[test]
    fn test_melody_renders_to_clip() {
        let mut dice = Dice::from_seed(21);
        let melody = build_melody(
            root(),
            Mode::Dorian,
            Register::Higher,
            3,
            "xP_P",
            true,
            Direction::Ascend,
            0,
            &mut dice,
        )
        .unwrap();
        let stacks: Vec<Vec<Pitch>> = melody.notes.iter().map(|&p| vec![p]).collect();
        let clip = render_pattern(&stacks, &melody.pattern, Subdiv::N8, Sizzle::None).unwrap();
        assert_eq!(clip.total_ticks(), 256);
    }
}

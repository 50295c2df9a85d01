// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Clip renderer: pattern string x subdivision -> segments.
//!
//! Expands a rhythm pattern over a list of note stacks. Each pattern
//! character occupies one subdivision slot; `x` opens a sounding stack
//! that continues through `_`, `-` opens a rest the same way.

use std::f64::consts::PI;
use std::fmt;

use crate::clip::{Clip, Segment, DEFAULT_LEVEL};
use crate::error::{Error, Result};
use crate::music::note::Pitch;

/// Subdivision tokens and their tick lengths.
///
/// The same table serves the renderer and the analyzer; round-trip
/// fidelity depends on the two never diverging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subdiv {
    N64,
    N32,
    N16,
    N8,
    N4,
    N2,
    N1,
    M1,
    M2,
    M3,
    M4,
}

impl Subdiv {
    pub const ALL: [Subdiv; 11] = [
        Subdiv::N64,
        Subdiv::N32,
        Subdiv::N16,
        Subdiv::N8,
        Subdiv::N4,
        Subdiv::N2,
        Subdiv::N1,
        Subdiv::M1,
        Subdiv::M2,
        Subdiv::M3,
        Subdiv::M4,
    ];

    /// Ticks one pattern character spans at this subdivision.
    pub fn ticks(self) -> u32 {
        match self {
            Subdiv::N64 => 8,
            Subdiv::N32 => 16,
            Subdiv::N16 => 32,
            Subdiv::N8 => 64,
            Subdiv::N4 => 128,
            Subdiv::N2 => 256,
            Subdiv::N1 => 512,
            Subdiv::M1 => 2048,
            Subdiv::M2 => 4096,
            Subdiv::M3 => 6144,
            Subdiv::M4 => 8192,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Subdiv::N64 => "64n",
            Subdiv::N32 => "32n",
            Subdiv::N16 => "16n",
            Subdiv::N8 => "8n",
            Subdiv::N4 => "4n",
            Subdiv::N2 => "2n",
            Subdiv::N1 => "1n",
            Subdiv::M1 => "1m",
            Subdiv::M2 => "2m",
            Subdiv::M3 => "3m",
            Subdiv::M4 => "4m",
        }
    }

    pub fn from_token(s: &str) -> Result<Self> {
        Subdiv::ALL
            .iter()
            .find(|sub| sub.token() == s.trim())
            .copied()
            .ok_or_else(|| Error::UnknownSubdiv(s.to_string()))
    }

    /// The fixed grain the chopper cuts at inside one slot of this
    /// subdivision: a 16th note, or the whole slot for shorter ones.
    pub fn chop_grain(self) -> u32 {
        self.ticks().min(32)
    }
}

impl fmt::Display for Subdiv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Amplitude envelope applied over a rendered clip's sounding segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sizzle {
    #[default]
    None,
    /// Half-sine swell, peaking mid-clip.
    Sin,
    /// Inverted swell, loud at the edges.
    Cos,
}

impl Sizzle {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Sizzle::None),
            "sin" => Ok(Sizzle::Sin),
            "cos" => Ok(Sizzle::Cos),
            _ => Err(Error::UnknownSizzle(s.to_string())),
        }
    }

    /// Level for the i-th of n sounding segments.
    fn level(self, i: usize, n: usize) -> u8 {
        let phase = PI * (i as f64 + 1.0) / (n as f64 + 1.0);
        let curve = match self {
            Sizzle::None => return DEFAULT_LEVEL,
            Sizzle::Sin => phase.sin(),
            Sizzle::Cos => phase.cos().abs(),
        };
        (curve * 127.0).round().clamp(1.0, 127.0) as u8
    }
}

/// Expand a rhythm pattern into a clip.
///
/// Stacks are consumed one per onset, cycling when the pattern has more
/// onsets than stacks. A leading `_` behaves as a rest continuation.
pub fn render_pattern(
    stacks: &[Vec<Pitch>],
    pattern: &str,
    subdiv: Subdiv,
    sizzle: Sizzle,
) -> Result<Clip> {
    if stacks.is_empty() || stacks.iter().any(|s| s.is_empty()) {
        return Err(Error::EmptyChords);
    }

    let slot = subdiv.ticks();
    let mut next_stack = stacks.iter().cycle();
    let mut clip = Clip::new();
    let mut current: Option<Segment> = None;

    for c in pattern.chars() {
        match c {
            'x' => {
                if let Some(segment) = current.take() {
                    clip.push(segment);
                }
                let stack = next_stack.next().cloned().unwrap_or_default();
                current = Some(Segment::stack(stack, slot, DEFAULT_LEVEL));
            }
            '-' => {
                if let Some(segment) = current.take() {
                    clip.push(segment);
                }
                current = Some(Segment::rest(slot, DEFAULT_LEVEL));
            }
            '_' => match current.as_mut() {
                Some(segment) => segment.ticks += slot,
                None => current = Some(Segment::rest(slot, DEFAULT_LEVEL)),
            },
            _ => return Err(Error::BadPattern(c)),
        }
    }
    if let Some(segment) = current.take() {
        clip.push(segment);
    }

    if sizzle != Sizzle::None {
        let positions = clip.stack_positions();
        let n = positions.len();
        for (i, &idx) in positions.iter().enumerate() {
            if let Some(segment) = clip.get_mut(idx) {
                segment.level = sizzle.level(i, n);
            }
        }
    }

    clip.consolidate();
    Ok(clip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::chord::spell;
    use crate::music::note::{Note, Pitch};

    fn one_note() -> Vec<Vec<Pitch>> {
        vec![vec![Pitch::new(Note::C, 3)]]
    }

    #[test]
    fn test_subdiv_table() {
        assert_eq!(Subdiv::N4.ticks(), 128);
        assert_eq!(Subdiv::N8.ticks(), 64);
        assert_eq!(Subdiv::M1.ticks(), 2048);
        assert_eq!(Subdiv::N64.chop_grain(), 8);
        assert_eq!(Subdiv::N32.chop_grain(), 16);
        assert_eq!(Subdiv::N4.chop_grain(), 32);
    }

    #[test]
    fn test_subdiv_token_round_trip() {
        for sub in Subdiv::ALL {
            assert_eq!(Subdiv::from_token(sub.token()).unwrap(), sub);
        }
        assert!(Subdiv::from_token("5n").is_err());
    }

    #[test]
    fn test_render_basic_groups() {
        let clip = render_pattern(&one_note(), "x-x-", Subdiv::N4, Sizzle::None).unwrap();
        assert_eq!(clip.len(), 4);
        assert_eq!(clip.total_ticks(), 512);
        assert!(!clip.get(0).unwrap().is_rest());
        assert!(clip.get(1).unwrap().is_rest());
    }

    #[test]
    fn test_render_sustain_extends_group() {
        let clip = render_pattern(&one_note(), "x__-", Subdiv::N4, Sizzle::None).unwrap();
        assert_eq!(clip.len(), 2);
        assert_eq!(clip.get(0).unwrap().ticks, 384);
        assert_eq!(clip.get(1).unwrap().ticks, 128);
        assert_eq!(clip.total_ticks(), 512);
    }

    #[test]
    fn test_render_leading_sustain_is_rest() {
        let clip = render_pattern(&one_note(), "__x_", Subdiv::N4, Sizzle::None).unwrap();
        assert_eq!(clip.len(), 2);
        assert!(clip.get(0).unwrap().is_rest());
        assert_eq!(clip.get(0).unwrap().ticks, 256);
        assert_eq!(clip.get(1).unwrap().ticks, 256);
    }

    #[test]
    fn test_render_merges_adjacent_rests() {
        let clip = render_pattern(&one_note(), "x--x", Subdiv::N4, Sizzle::None).unwrap();
        assert_eq!(clip.len(), 3);
        assert_eq!(clip.get(1).unwrap().ticks, 256);
    }

    #[test]
    fn test_render_cycles_chords() {
        let stacks = vec![spell("CM").unwrap(), spell("FM").unwrap()];
        let clip = render_pattern(&stacks, "xxx", Subdiv::N4, Sizzle::None).unwrap();
        let first = clip.get(0).unwrap().pitches().unwrap();
        let third = clip.get(2).unwrap().pitches().unwrap();
        assert_eq!(first, third);
        assert_ne!(first, clip.get(1).unwrap().pitches().unwrap());
    }

    #[test]
    fn test_render_rejects_bad_chars() {
        assert!(matches!(
            render_pattern(&one_note(), "xq", Subdiv::N4, Sizzle::None),
            Err(Error::BadPattern('q'))
        ));
    }

    #[test]
    fn test_render_sizzle_shapes_levels() {
        let clip = render_pattern(&one_note(), "xxxx", Subdiv::N4, Sizzle::Sin).unwrap();
        let levels: Vec<u8> = clip.segments().iter().map(|s| s.level).collect();
        assert!(levels[1] > levels[0]);
        assert_eq!(levels[0], levels[3]);
        assert!(levels.iter().all(|&l| (1..=127).contains(&l)));
    }
}

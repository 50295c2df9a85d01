// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Generation engine: request record in, clip and chord names out.
//!
//! The request record mirrors the host's main dictionary field for
//! field, with the same defaults. One `make_chords` call resolves the
//! slot list, renders the pattern, and runs the voicing, octave, bass
//! and split post-processing in that order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clip::Clip;
use crate::edit::{self, SplitMode};
use crate::error::{Error, Result};
use crate::music::chord::{self, split_symbol};
use crate::music::key::Key;
use crate::music::note::Note;
use crate::music::speller::to_renderer;
use crate::pattern::RhythmAlgo;
use crate::render::{render_pattern, Sizzle, Subdiv};
use crate::rng::Dice;
use crate::select::{resolve_slots, ChordSlot, TransitionMap};
use crate::steps::{clip_to_steps, Steps};
use crate::voicing::{self, VoicingKind};

/// The transition map the host device ships with: a functional-harmony
/// adjacency, flattened as `(column, row, present)` triples.
pub const DEFAULT_CHORD_MAP: [u8; 168] = [
    0, 0, 1, 1, 0, 1, 2, 0, 1, 3, 0, 1, 4, 0, 1, 5, 0, 1, 6, 0, 1, //
    0, 1, 0, 1, 1, 1, 2, 1, 1, 3, 1, 1, 4, 1, 1, 5, 1, 1, 6, 1, 1, //
    0, 2, 0, 1, 2, 0, 2, 2, 1, 3, 2, 1, 4, 2, 1, 5, 2, 0, 6, 2, 0, //
    0, 3, 1, 1, 3, 1, 2, 3, 0, 3, 3, 1, 4, 3, 0, 5, 3, 1, 6, 3, 0, //
    0, 4, 1, 1, 4, 0, 2, 4, 1, 3, 4, 0, 4, 4, 1, 5, 4, 1, 6, 4, 0, //
    0, 5, 1, 1, 5, 0, 2, 5, 0, 3, 5, 1, 4, 5, 0, 5, 5, 1, 6, 5, 0, //
    0, 6, 1, 1, 6, 1, 2, 6, 0, 3, 6, 1, 4, 6, 1, 5, 6, 0, 6, 6, 0, //
    0, 7, 1, 1, 7, 0, 2, 7, 0, 3, 7, 1, 4, 7, 0, 5, 7, 1, 6, 7, 0,
];

/// Boolean fields as the host sends them: real booleans, menu indices
/// (0 = yes, 1 = no), or words.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HumanBool {
    Flag(bool),
    Index(i64),
    Word(String),
}

impl HumanBool {
    pub fn as_bool(&self) -> bool {
        match self {
            HumanBool::Flag(flag) => *flag,
            HumanBool::Index(index) => *index == 0,
            HumanBool::Word(word) => matches!(
                word.trim().to_lowercase().as_str(),
                "yes" | "on" | "sevenths" | "true"
            ),
        }
    }
}

impl From<bool> for HumanBool {
    fn from(flag: bool) -> Self {
        HumanBool::Flag(flag)
    }
}

/// Chord slot tokens: a space-separated string or a list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SlotTokens {
    Text(String),
    List(Vec<SlotToken>),
}

/// One token in a list form request; numerals may arrive as numbers.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SlotToken {
    Number(i64),
    Text(String),
}

impl SlotTokens {
    fn tokens(&self) -> Vec<String> {
        match self {
            SlotTokens::Text(text) => text.split_whitespace().map(str::to_string).collect(),
            SlotTokens::List(list) => list
                .iter()
                .map(|t| match t {
                    SlotToken::Number(n) => n.to_string(),
                    SlotToken::Text(s) => s.clone(),
                })
                .collect(),
        }
    }
}

/// Split-mode field: a mode word or the host's menu index.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SplitChop {
    Index(i64),
    Word(String),
}

impl SplitChop {
    fn mode(&self) -> SplitMode {
        match self {
            SplitChop::Index(index) => SplitMode::from_index(*index).unwrap_or(SplitMode::Split),
            SplitChop::Word(word) => SplitMode::parse(word).unwrap_or(SplitMode::Split),
        }
    }
}

/// A full generation request. Every field has a default, so partial
/// records load fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChordRequest {
    /// Key root note name
    pub root: String,
    /// Mode name
    pub mode: String,
    /// Seventh chords instead of triads
    pub seventh: HumanBool,
    /// Chord slot tokens
    pub chords: SlotTokens,
    /// Allow random picks to repeat chords already present
    pub repeat_chords: HumanBool,
    /// Constrain random picks with the transition map
    pub random_assist: HumanBool,
    /// Flattened transition-map triples
    pub chord_map: Vec<u8>,
    /// Rhythm pattern
    pub pattern: String,
    /// Subdivision token
    pub subdiv: String,
    /// Velocity envelope
    pub sizzle: String,
    /// Quality suffix forced onto every chord, or "none"
    pub adv_chords: String,
    /// Voicing name
    pub voicing: String,
    /// Target octave for chord roots
    pub octave: i8,
    /// Open voicing amount, 0 = off
    pub open: u8,
    /// Bass note octave, 0 = off
    pub bass_note: i8,
    /// Post-split mode
    pub split_chop: SplitChop,
    /// Post-split granularity, 0 = off
    pub splitter: u8,
    /// Rhythm algorithm for pattern generation requests
    pub rhythm_algo: String,
}

impl Default for ChordRequest {
    fn default() -> Self {
        Self {
            root: "C".to_string(),
            mode: "major".to_string(),
            seventh: HumanBool::Flag(false),
            chords: SlotTokens::Text("R R R R".to_string()),
            repeat_chords: HumanBool::Flag(false),
            random_assist: HumanBool::Flag(false),
            chord_map: DEFAULT_CHORD_MAP.to_vec(),
            pattern: "xxxx".to_string(),
            subdiv: "4n".to_string(),
            sizzle: "none".to_string(),
            adv_chords: "none".to_string(),
            voicing: "none".to_string(),
            octave: 3,
            open: 0,
            bass_note: 0,
            split_chop: SplitChop::Word("split".to_string()),
            splitter: 0,
            rhythm_algo: "long_wild".to_string(),
        }
    }
}

impl ChordRequest {
    /// Load a request record from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read request file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a request record from a YAML string.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        serde_yaml::from_str(yaml).context("Failed to parse request record")
    }
}

/// Chord name list, the second host result blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordNames {
    pub chords: Vec<String>,
}

/// A finished generation: the clip plus the resolved chord names.
#[derive(Debug, Clone)]
pub struct Generated {
    pub clip: Clip,
    pub chord_names: Vec<String>,
}

/// Resolve, render and post-process one request.
pub fn make_chords(request: &ChordRequest, dice: &mut Dice) -> Result<Generated> {
    let key = Key::parse(&request.root, &request.mode)?;
    debug!(key = %key, pattern = %request.pattern, "generating chord clip");

    let seventh = request.seventh.as_bool();
    let chord_set: [String; 7] = if seventh {
        key.seventh_chords().map(|c| to_renderer(&c))
    } else {
        key.triads().map(|c| to_renderer(&c))
    };

    let tokens = request.chords.tokens();
    if tokens.is_empty() {
        return Err(Error::EmptyChords);
    }
    let slots: Vec<ChordSlot> = tokens
        .iter()
        .map(|t| ChordSlot::parse(t, key.root()))
        .collect();

    let map = if request.random_assist.as_bool() {
        Some(TransitionMap::from_triples(&request.chord_map))
    } else {
        None
    };

    let mut names = resolve_slots(
        &slots,
        &chord_set,
        map.as_ref(),
        request.repeat_chords.as_bool(),
        &key,
        dice,
    )?;
    names = names.iter().map(|n| to_renderer(n)).collect();

    if request.adv_chords != "none" {
        names = names
            .iter()
            .map(|name| {
                let (root, _) = split_symbol(name)?;
                Ok(to_renderer(&format!("{}{}", root, request.adv_chords)))
            })
            .collect::<Result<Vec<String>>>()?;
    }

    let stacks = names
        .iter()
        .map(|name| chord::spell(name))
        .collect::<Result<Vec<_>>>()?;

    let subdiv = Subdiv::from_token(&request.subdiv)?;
    let sizzle = Sizzle::parse(&request.sizzle)?;
    let mut clip = render_pattern(&stacks, &request.pattern, subdiv, sizzle)?;

    // Chord roots per segment, captured before the voicing reshapes the
    // stacks.
    let roots: Vec<Option<Note>> = clip
        .segments()
        .iter()
        .map(|s| s.pitches().and_then(|p| p.first()).map(|p| p.note))
        .collect();

    let kind = VoicingKind::parse(&request.voicing)?;
    voicing::apply(&mut clip, kind, dice);

    voicing::chords_to_octave(&mut clip, request.octave.clamp(0, 5));

    if request.open != 0 {
        voicing::open_chords(&mut clip, request.open);
    }

    if request.bass_note != 0 {
        voicing::augment_bass(&mut clip, &roots, request.bass_note.clamp(0, 5));
    }

    if request.splitter != 0 {
        clip = edit::chop_or_split(&clip, request.splitter, request.split_chop.mode());
    }

    debug!(
        chords = names.len(),
        segments = clip.len(),
        ticks = clip.total_ticks(),
        "generation finished"
    );
    Ok(Generated {
        clip,
        chord_names: names,
    })
}

/// Run a full request and convert the result into the two host blobs.
pub fn generate(request: &ChordRequest, dice: &mut Dice) -> Result<(Steps, ChordNames)> {
    let generated = make_chords(request, dice)?;
    Ok((
        clip_to_steps(&generated.clip),
        ChordNames {
            chords: generated.chord_names,
        },
    ))
}

/// Run the request's rhythm algorithm over its pattern.
pub fn generate_rhythm(request: &ChordRequest, dice: &mut Dice) -> Result<String> {
    let algo = RhythmAlgo::parse(&request.rhythm_algo)?;
    Ok(algo.apply(&request.pattern, dice))
}

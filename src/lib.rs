// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! PROG - chord progression and rhythm texture engine.
//!
//! Generates a chord progression plus rhythmic texture from a compact
//! declarative request, renders it into a time-ordered note/rest
//! segment sequence, and runs the inverse process: inferring the
//! rhythm-pattern representation of a recorded performance.

pub mod analyze;
pub mod clip;
pub mod edit;
pub mod engine;
pub mod error;
pub mod melody;
pub mod music;
pub mod pattern;
pub mod render;
pub mod rng;
pub mod select;
pub mod steps;
pub mod voicing;

pub use analyze::{analyze, ClipAnalysis, NoteRecord, TimedNote};
pub use clip::{Clip, Segment, SegmentContent, DEFAULT_LEVEL, TICKS_PER_BEAT};
pub use engine::{generate, make_chords, ChordNames, ChordRequest, Generated};
pub use error::{Error, Result};
pub use music::{Key, Mode, Note, Pitch};
pub use render::{render_pattern, Sizzle, Subdiv};
pub use rng::Dice;
pub use steps::{clip_to_steps, NoteEvent, Steps};
pub use voicing::VoicingKind;

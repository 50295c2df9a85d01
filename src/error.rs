// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the progression engine.

use thiserror::Error;

/// Errors raised by the engine.
///
/// Lookup failures (mode, voicing, subdivision, chord symbol) are
/// configuration errors and fail loudly. Out-of-range edit requests are
/// not errors; the editors clamp them to no-ops instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown note name: {0}")]
    UnknownNote(String),

    #[error("unknown mode: {0}")]
    UnknownMode(String),

    #[error("unknown chord symbol: {0}")]
    UnknownChord(String),

    #[error("unknown voicing: {0}")]
    UnknownVoicing(String),

    #[error("unknown subdivision: {0}")]
    UnknownSubdiv(String),

    #[error("unknown rhythm algorithm: {0}")]
    UnknownRhythmAlgo(String),

    #[error("unknown sizzle envelope: {0}")]
    UnknownSizzle(String),

    #[error("invalid pattern character '{0}'")]
    BadPattern(char),

    #[error("no chords to render")]
    EmptyChords,
}

pub type Result<T> = std::result::Result<T, Error>;

// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note-event output: clip -> host step list.
//!
//! Flattens a clip into one event per sounding pitch, with times as
//! beat ratios of the internal tick unit. The auxiliary fields carry the
//! host's fixed defaults.

use serde::{Deserialize, Serialize};

use crate::clip::{Clip, TICKS_PER_BEAT};

/// One rendered note, in the host's step format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: u8,
    /// Start in beats.
    pub start_time: f64,
    /// Duration in beats.
    pub duration: f64,
    pub velocity: u8,
    pub probability: f64,
    pub velocity_deviation: f64,
    pub release_velocity: u8,
    pub mute: u8,
}

impl NoteEvent {
    pub fn new(pitch: u8, start_time: f64, duration: f64, velocity: u8) -> Self {
        Self {
            pitch,
            start_time,
            duration,
            velocity,
            probability: 1.0,
            velocity_deviation: 1.0,
            release_velocity: 64,
            mute: 0,
        }
    }
}

/// A full step list plus the clip duration, both in beats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Steps {
    pub notes: Vec<NoteEvent>,
    pub total_duration: f64,
}

/// Flatten a clip into note events.
pub fn clip_to_steps(clip: &Clip) -> Steps {
    let beat = TICKS_PER_BEAT as f64;
    let mut notes = Vec::new();
    let mut start = 0u64;

    for segment in clip.segments() {
        if let Some(pitches) = segment.pitches() {
            for pitch in pitches {
                notes.push(NoteEvent::new(
                    pitch.midi(),
                    start as f64 / beat,
                    segment.ticks as f64 / beat,
                    segment.level,
                ));
            }
        }
        start += segment.ticks as u64;
    }

    Steps {
        notes,
        total_duration: clip.total_ticks() as f64 / beat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Segment;
    use crate::music::note::{Note, Pitch};

    #[test]
    fn test_clip_to_steps_times_are_beat_ratios() {
        let clip = Clip::from_segments(vec![
            Segment::note(Pitch::new(Note::C, 4), 128, 100),
            Segment::rest(128, 100),
            Segment::note(Pitch::new(Note::E, 4), 256, 90),
        ]);
        let steps = clip_to_steps(&clip);

        assert_eq!(steps.notes.len(), 2);
        assert_eq!(steps.total_duration, 4.0);

        assert_eq!(steps.notes[0].pitch, 60);
        assert_eq!(steps.notes[0].start_time, 0.0);
        assert_eq!(steps.notes[0].duration, 1.0);
        assert_eq!(steps.notes[0].velocity, 100);

        assert_eq!(steps.notes[1].pitch, 64);
        assert_eq!(steps.notes[1].start_time, 2.0);
        assert_eq!(steps.notes[1].duration, 2.0);
    }

    #[test]
    fn test_clip_to_steps_fixed_fields() {
        let clip = Clip::from_segments(vec![Segment::note(Pitch::new(Note::C, 4), 64, 100)]);
        let event = &clip_to_steps(&clip).notes[0];
        assert_eq!(event.probability, 1.0);
        assert_eq!(event.velocity_deviation, 1.0);
        assert_eq!(event.release_velocity, 64);
        assert_eq!(event.mute, 0);
    }

    #[test]
    fn test_clip_to_steps_chord_emits_one_event_per_pitch() {
        let clip = Clip::from_segments(vec![Segment::stack(
            vec![
                Pitch::new(Note::C, 3),
                Pitch::new(Note::E, 3),
                Pitch::new(Note::G, 3),
            ],
            128,
            100,
        )]);
        let steps = clip_to_steps(&clip);
        assert_eq!(steps.notes.len(), 3);
        assert!(steps.notes.iter().all(|n| n.start_time == 0.0));
    }
}

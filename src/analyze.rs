// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Clip analyzer: timed notes back into a pattern string.
//!
//! Quantizes a recorded performance to the finest grid block, resolves
//! overlaps, reduces chords to a monophonic skeleton, infers the
//! coarsest subdivision consistent with every span, and serializes the
//! result in the renderer's pattern grammar.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::music::note::Pitch;
use crate::render::Subdiv;

/// Smallest representable grid block, in beats (a 16th note).
pub const BLOCK: f64 = 0.25;

/// One recorded note, times in beats.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TimedNote {
    pub pitch: i32,
    pub start_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub velocity: f64,
}

/// The analysis input: a note set plus the clip duration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NoteRecord {
    pub notes: Vec<TimedNote>,
    pub total_duration: f64,
}

/// The analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipAnalysis {
    pub pattern: String,
    pub subdiv: String,
    pub note_names: Vec<String>,
}

/// Quantize a value to the nearest multiple of `block`.
///
/// Comparisons run in integer thousandths so float drift cannot break
/// the divisibility test. Ties round down, negative input clamps to
/// zero, and with `allow_zero` off the result is never zero.
pub fn quantize(value: f64, block: f64, allow_zero: bool) -> f64 {
    let milli = (value * 1000.0).round() as i64;
    let divider = (block * 1000.0).round() as i64;

    let quantized = if milli <= 0 {
        0
    } else if milli % divider == 0 {
        milli
    } else {
        let down = milli - milli.rem_euclid(divider);
        let up = down + divider;
        if up - milli < milli - down {
            up
        } else {
            down
        }
    };

    if !allow_zero && quantized == 0 {
        return block;
    }
    quantized as f64 / 1000.0
}

/// Sort by start time ascending, then pitch ascending within equal
/// starts.
fn sort_notes(notes: &mut [TimedNote]) {
    notes.sort_by(|a, b| {
        a.start_time
            .total_cmp(&b.start_time)
            .then_with(|| a.pitch.cmp(&b.pitch))
    });
}

/// Resolve overlapping notes.
///
/// For each note, the earliest follower starting strictly inside its
/// span either clips this note short (when the overlap covers less than
/// half the follower) or is pulled onto this note's start and duration,
/// forming a chord. Notes sharing a start are forced to share the
/// duration. A note clipped to nothing gets one block back.
fn check_overlaps(notes: &[TimedNote], block: f64) -> Vec<TimedNote> {
    let mut out = notes.to_vec();
    for i in 0..out.len() {
        let start = out[i].start_time;
        let duration = out[i].duration;
        let end = start + duration;
        let mut earliest_inside = 0.0f64;

        for j in 0..out.len() {
            let next_start = out[j].start_time;
            let next_duration = out[j].duration;
            let next_end = next_start + next_duration;

            if next_start < end && next_start > start {
                if earliest_inside == 0.0 || next_start < earliest_inside {
                    if next_duration / 2.0 > end - next_start {
                        earliest_inside = next_start;
                    } else {
                        out[j].start_time = start;
                        out[j].duration = duration;
                    }
                }
            }

            if end != next_end && next_start == start && j > i {
                out[j].duration = duration;
            }
        }

        if earliest_inside != 0.0 {
            out[i].duration = earliest_inside - start;
        }
        if out[i].duration == 0.0 {
            out[i].duration = block;
        }
    }
    out
}

/// Keep only the first note at each distinct start time.
fn dechordify(notes: &[TimedNote]) -> Vec<TimedNote> {
    let mut seen: Vec<i64> = Vec::new();
    let mut out = Vec::new();
    for note in notes {
        let key = (note.start_time * 1000.0).round() as i64;
        if !seen.contains(&key) {
            seen.push(key);
            out.push(*note);
        }
    }
    out
}

/// A rest or note span in the space-filling list.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    duration: f64,
    note: bool,
}

/// Fill the gaps between notes with rest spans, bounded by the total
/// duration.
fn spaced_spans(notes: &[TimedNote], total_duration: f64) -> Vec<Span> {
    let mut spans = Vec::new();
    for (i, note) in notes.iter().enumerate() {
        let gap = if i == 0 {
            note.start_time
        } else {
            let prev = &notes[i - 1];
            note.start_time - (prev.start_time + prev.duration)
        };
        spans.push(Span {
            duration: gap,
            note: false,
        });
        spans.push(Span {
            duration: note.duration,
            note: true,
        });
    }
    spans.retain(|s| s.duration > 0.0);

    if let Some(last) = notes.last() {
        let occupied = last.start_time + last.duration;
        if total_duration - occupied > 0.0 {
            spans.push(Span {
                duration: total_duration - occupied,
                note: false,
            });
        }
    }
    spans
}

/// Block-multiple ladder the subdivision inference tests against.
const LADDER: [u64; 8] = [1, 2, 4, 8, 16, 64, 128, 256];

/// Infer the coarsest subdivision every span length is a multiple of.
///
/// Each ladder step divides the next, so a span's divisor set is a
/// ladder prefix; the shortest prefix across all spans picks the
/// subdivision. Returns the serialization divider in beats alongside.
fn infer_subdiv(spans: &[Span]) -> (f64, Subdiv) {
    let min_divisors = spans
        .iter()
        .map(|span| {
            let blocks = (span.duration / BLOCK).round() as u64;
            LADDER.iter().filter(|&&b| blocks % b == 0).count()
        })
        .min()
        .unwrap_or(1)
        .max(1);

    let subdivs = [
        Subdiv::N16,
        Subdiv::N8,
        Subdiv::N4,
        Subdiv::N2,
        Subdiv::N1,
        Subdiv::M1,
        Subdiv::M2,
        Subdiv::M4,
    ];
    let subdiv = subdivs[min_divisors - 1];
    let divider = LADDER[min_divisors - 1] as f64 * BLOCK;
    (divider, subdiv)
}

/// Serialize spans at the divider: one onset or rest character plus a
/// sustain character per extra divider length.
fn serialize_pattern(spans: &[Span], divider: f64) -> String {
    let mut pattern = String::new();
    for span in spans {
        let repeats = (span.duration / divider).round().max(1.0) as usize;
        pattern.push(if span.note { 'x' } else { '-' });
        for _ in 1..repeats {
            pattern.push('_');
        }
    }
    pattern
}

/// Analyze a recorded note set back into pattern form.
///
/// Returns `None` when there are no notes to analyze.
pub fn analyze(record: &NoteRecord) -> Option<ClipAnalysis> {
    if record.notes.is_empty() {
        return None;
    }
    debug!(notes = record.notes.len(), "analyzing note record");

    let mut quantized: Vec<TimedNote> = record
        .notes
        .iter()
        .map(|note| TimedNote {
            start_time: quantize(note.start_time, BLOCK, true),
            duration: quantize(note.duration, BLOCK, false),
            ..*note
        })
        .collect();
    let total_duration = quantize(record.total_duration, BLOCK, false);

    sort_notes(&mut quantized);
    let mut resolved = check_overlaps(&quantized, BLOCK);
    sort_notes(&mut resolved);
    let skeleton = dechordify(&resolved);

    let note_names = skeleton
        .iter()
        .map(|note| Pitch::from_midi(note.pitch.clamp(0, 127) as u8).to_string())
        .collect();

    let spans = spaced_spans(&skeleton, total_duration);
    let (divider, subdiv) = infer_subdiv(&spans);
    let pattern = serialize_pattern(&spans, divider);

    Some(ClipAnalysis {
        pattern,
        subdiv: subdiv.token().to_string(),
        note_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(pitch: i32, start: f64, duration: f64) -> TimedNote {
        TimedNote {
            pitch,
            start_time: start,
            duration,
            velocity: 100.0,
        }
    }

    #[test]
    fn test_quantize_multiples() {
        assert_eq!(quantize(0.5, 0.25, true), 0.5);
        assert_eq!(quantize(0.3, 0.25, true), 0.25);
        assert_eq!(quantize(0.4, 0.25, true), 0.5);
        // Tie rounds down.
        assert_eq!(quantize(0.375, 0.25, true), 0.25);
    }

    #[test]
    fn test_quantize_zero_handling() {
        assert_eq!(quantize(0.0, 0.25, true), 0.0);
        assert_eq!(quantize(0.0, 0.25, false), 0.25);
        assert_eq!(quantize(0.1, 0.25, false), 0.25);
        assert_eq!(quantize(-0.4, 0.25, true), 0.0);
        assert_eq!(quantize(-0.4, 0.25, false), 0.25);
    }

    #[test]
    fn test_quantize_always_non_negative_multiple() {
        for value in [-1.0, 0.0, 0.1, 0.124, 0.125, 0.6, 1.37, 3.99] {
            let q = quantize(value, 0.25, true);
            assert!(q >= 0.0);
            let blocks = q / 0.25;
            assert_eq!(blocks, blocks.round());
            assert!(quantize(value, 0.25, false) > 0.0);
        }
    }

    #[test]
    fn test_empty_record_yields_none() {
        let record = NoteRecord {
            notes: vec![],
            total_duration: 4.0,
        };
        assert!(analyze(&record).is_none());
    }

    #[test]
    fn test_simple_pattern_extraction() {
        let record = NoteRecord {
            notes: vec![note(60, 0.0, 1.0), note(64, 2.0, 1.0)],
            total_duration: 4.0,
        };
        let analysis = analyze(&record).unwrap();
        assert_eq!(analysis.pattern, "x-x-");
        assert_eq!(analysis.subdiv, "4n");
        assert_eq!(analysis.note_names, vec!["C4", "E4"]);
    }

    #[test]
    fn test_sustains_serialize_as_underscores() {
        let record = NoteRecord {
            notes: vec![note(60, 0.0, 1.5)],
            total_duration: 2.0,
        };
        let analysis = analyze(&record).unwrap();
        // Half-beat grid: three sounding slots, one rest slot.
        assert_eq!(analysis.subdiv, "8n");
        assert_eq!(analysis.pattern, "x__-");
    }

    #[test]
    fn test_chord_tones_dechordify_to_lowest() {
        let record = NoteRecord {
            notes: vec![
                note(64, 0.0, 1.0),
                note(60, 0.0, 1.0),
                note(67, 0.0, 1.0),
            ],
            total_duration: 1.0,
        };
        let analysis = analyze(&record).unwrap();
        assert_eq!(analysis.pattern, "x");
        assert_eq!(analysis.note_names, vec!["C4"]);
    }

    #[test]
    fn test_long_overlap_merges_into_chord() {
        // The follower overlaps for most of its length, so it is pulled
        // onto the earlier note's start and dropped by dechordify.
        let record = NoteRecord {
            notes: vec![note(60, 0.0, 2.0), note(64, 0.25, 0.5)],
            total_duration: 2.0,
        };
        let analysis = analyze(&record).unwrap();
        assert_eq!(analysis.pattern, "x");
        assert_eq!(analysis.note_names, vec!["C4"]);
    }

    #[test]
    fn test_short_overlap_clips_earlier_note() {
        // The follower overlaps for less than half its length, so the
        // earlier note is clipped to end where it starts.
        let record = NoteRecord {
            notes: vec![note(60, 0.0, 1.25), note(64, 1.0, 1.0)],
            total_duration: 2.0,
        };
        let analysis = analyze(&record).unwrap();
        assert_eq!(analysis.subdiv, "4n");
        assert_eq!(analysis.pattern, "xx");
        assert_eq!(analysis.note_names, vec!["C4", "E4"]);
    }

    #[test]
    fn test_unquantized_input_snaps_to_grid() {
        let record = NoteRecord {
            notes: vec![note(60, 0.02, 0.98), note(62, 1.98, 1.04)],
            total_duration: 4.02,
        };
        let analysis = analyze(&record).unwrap();
        assert_eq!(analysis.pattern, "x-x-");
        assert_eq!(analysis.subdiv, "4n");
    }

    #[test]
    fn test_leading_and_trailing_rests() {
        let record = NoteRecord {
            notes: vec![note(60, 1.0, 1.0)],
            total_duration: 4.0,
        };
        let analysis = analyze(&record).unwrap();
        assert_eq!(analysis.pattern, "-x-_");
        assert_eq!(analysis.subdiv, "4n");
    }

    #[test]
    fn test_sixteenth_grid_chosen_for_odd_spans() {
        let record = NoteRecord {
            notes: vec![note(60, 0.0, 0.75), note(62, 0.75, 0.25)],
            total_duration: 1.0,
        };
        let analysis = analyze(&record).unwrap();
        assert_eq!(analysis.subdiv, "16n");
        assert_eq!(analysis.pattern, "x__x");
    }

    #[test]
    fn test_whole_note_spans_choose_1n() {
        let record = NoteRecord {
            notes: vec![note(60, 0.0, 4.0), note(62, 4.0, 4.0)],
            total_duration: 8.0,
        };
        let analysis = analyze(&record).unwrap();
        assert_eq!(analysis.subdiv, "1n");
        assert_eq!(analysis.pattern, "xx");
    }
}

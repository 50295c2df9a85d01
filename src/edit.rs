// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Segment editors: invariant-preserving clip mutations.
//!
//! Positional operations address note stacks with a 1-based `first` and
//! a `count`; rests are skipped when counting. Out-of-range requests
//! clamp to no-ops instead of erroring, and every operation consolidates
//! adjacent rests before returning. Apart from `displacement`, all
//! operations preserve the clip's total tick length.

use crate::clip::{Clip, Segment, SegmentContent, DEFAULT_LEVEL};
use crate::music::note::Pitch;
use crate::render::Subdiv;
use crate::rng::Dice;

/// Which clip edge an operation works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// How `chop_or_split` fills the subdivided parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Duplicate the stack across all parts
    Split,
    /// Alternate stack and rest parts
    Chop,
    /// Halve repeatedly, duplicating proportionally
    Halve,
}

impl SplitMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "split" | "0" => Some(SplitMode::Split),
            "chop" | "1" => Some(SplitMode::Chop),
            "halve" | "2" => Some(SplitMode::Halve),
            _ => None,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(SplitMode::Split),
            1 => Some(SplitMode::Chop),
            2 => Some(SplitMode::Halve),
            _ => None,
        }
    }
}

/// Where chop boundaries come from: an explicit slot pattern, or a
/// number of randomly drawn slots.
#[derive(Debug, Clone)]
pub enum ChopSpec<'a> {
    Pattern(&'a str),
    Count(usize),
}

/// Which notes inside each stack an operation touches (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteIndices {
    All,
    At(Vec<usize>),
}

/// Segment indices of the stacks addressed by a (first, count) request.
fn stack_range(clip: &Clip, first: usize, count: usize) -> Vec<usize> {
    if first < 1 || count < 1 {
        return Vec::new();
    }
    clip.stack_positions()
        .into_iter()
        .skip(first - 1)
        .take(count)
        .collect()
}

/// Split the stack under `position` into before/rest/after parts.
///
/// The rest part is `grain` ticks (clamped to the segment end); a
/// zero-length before or after part is omitted, so a boundary at the
/// segment's edge produces a two-way split, and a segment exactly one
/// grain long becomes a bare rest.
fn chop_at(clip: &mut Clip, position: u64, grain: u32) {
    let mut start = 0u64;
    for i in 0..clip.len() {
        let segment = match clip.get(i) {
            Some(s) => s.clone(),
            None => return,
        };
        let end = start + segment.ticks as u64;
        if position >= start && position < end {
            if !segment.is_rest() {
                let before = (position - start) as u32;
                let rest_len = grain.min((end - position) as u32);
                let after = segment.ticks - before - rest_len;
                let mut parts = Vec::with_capacity(3);
                if before > 0 {
                    parts.push(segment.with_ticks(before));
                }
                parts.push(Segment::rest(rest_len, segment.level));
                if after > 0 {
                    parts.push(segment.with_ticks(after));
                }
                clip.replace_range(i, 1, parts);
            }
            return;
        }
        start = end;
    }
}

/// Chop rests into the clip at fixed-grain boundaries.
///
/// Each pattern character spans one `grain` subdivision slot; a `-`
/// character marks every chop-grain boundary inside its span. A count
/// draws that many unique random slot positions instead.
pub fn chop(clip: &mut Clip, grain: Subdiv, spec: ChopSpec, dice: &mut Dice) {
    let span = grain.ticks() as u64;
    let g = grain.chop_grain();
    let slots = span / g as u64;

    let chop_slots: Vec<bool> = match spec {
        ChopSpec::Pattern(pattern) => pattern.chars().map(|c| c == '-').collect(),
        ChopSpec::Count(n) => {
            let len = clip.len();
            let picks = dice.multi_roll_unique_asc(len, 0, n);
            (0..len).map(|i| picks.contains(&i)).collect()
        }
    };

    let mut moments = Vec::new();
    let mut at = 0u64;
    for &is_chop in &chop_slots {
        if is_chop {
            for k in 0..slots {
                moments.push(at + k * g as u64);
            }
        }
        at += span;
    }

    for &moment in &moments {
        chop_at(clip, moment, g);
    }
    clip.consolidate();
}

/// Subdivide every segment at a fixed grain.
///
/// Granularity 1 is the finest grain (128 ticks), 5 the coarsest (4096).
/// Segments shorter than the grain stay whole; division remainders go to
/// the last part, so total length is preserved.
pub fn chop_or_split(clip: &Clip, granularity: u8, mode: SplitMode) -> Clip {
    let granularity = granularity.clamp(1, 5) as u32;
    let grain: u32 = match granularity {
        1 => 128,
        2 => 256,
        3 => 512,
        4 => 2048,
        _ => 4096,
    };

    let mut out = Clip::new();
    for segment in clip.segments() {
        match mode {
            SplitMode::Split | SplitMode::Chop => {
                let parts = (segment.ticks / grain).max(1);
                let base = segment.ticks / parts;
                let rem = segment.ticks - base * parts;
                for j in 0..parts {
                    let len = if j == parts - 1 { base + rem } else { base };
                    if mode == SplitMode::Chop && j % 2 == 1 {
                        out.push(Segment::rest(len, segment.level));
                    } else {
                        out.push(segment.with_ticks(len));
                    }
                }
            }
            SplitMode::Halve => {
                let parts = 1u32 << granularity;
                let base = segment.ticks >> granularity;
                if base == 0 {
                    out.push(segment.clone());
                } else {
                    let rem = segment.ticks - base * parts;
                    for j in 0..parts {
                        let len = if j == parts - 1 { base + rem } else { base };
                        out.push(segment.with_ticks(len));
                    }
                }
            }
        }
    }
    out.consolidate();
    out
}

/// Drop rest segments from one edge, stopping at the first stack.
///
/// A clip with no stacks is left unchanged so its duration survives.
pub fn trim(clip: &mut Clip, side: Side) {
    if clip.stack_count() == 0 {
        clip.consolidate();
        return;
    }
    match side {
        Side::Left => {
            let keep = clip
                .segments()
                .iter()
                .position(|s| !s.is_rest())
                .unwrap_or(0);
            clip.replace_range(0, keep, Vec::new());
        }
        Side::Right => {
            let keep_end = clip
                .segments()
                .iter()
                .rposition(|s| !s.is_rest())
                .map(|i| i + 1)
                .unwrap_or(clip.len());
            let count = clip.len() - keep_end;
            clip.replace_range(keep_end, count, Vec::new());
        }
    }
    clip.consolidate();
}

/// Convert the first/last `ticks` of the clip to rest, splitting a
/// segment that straddles the boundary.
pub fn null_span(clip: &mut Clip, side: Side, ticks: u64) {
    let mut remaining = ticks.min(clip.total_ticks());
    match side {
        Side::Left => {
            let mut i = 0;
            while remaining > 0 && i < clip.len() {
                let segment = match clip.get(i) {
                    Some(s) => s.clone(),
                    None => break,
                };
                if segment.ticks as u64 <= remaining {
                    remaining -= segment.ticks as u64;
                    clip.replace_range(i, 1, vec![Segment::rest(segment.ticks, segment.level)]);
                    i += 1;
                } else {
                    let cut = remaining as u32;
                    clip.replace_range(
                        i,
                        1,
                        vec![
                            Segment::rest(cut, segment.level),
                            segment.with_ticks(segment.ticks - cut),
                        ],
                    );
                    remaining = 0;
                }
            }
        }
        Side::Right => {
            let mut i = clip.len();
            while remaining > 0 && i > 0 {
                i -= 1;
                let segment = match clip.get(i) {
                    Some(s) => s.clone(),
                    None => break,
                };
                if segment.ticks as u64 <= remaining {
                    remaining -= segment.ticks as u64;
                    clip.replace_range(i, 1, vec![Segment::rest(segment.ticks, segment.level)]);
                } else {
                    let cut = remaining as u32;
                    clip.replace_range(
                        i,
                        1,
                        vec![
                            segment.with_ticks(segment.ticks - cut),
                            Segment::rest(cut, segment.level),
                        ],
                    );
                    remaining = 0;
                }
            }
        }
    }
    clip.consolidate();
}

/// Merge each addressed stack with the rest that immediately follows it.
pub fn legato(clip: &mut Clip, first: usize, count: usize) {
    clip.consolidate();
    let range = stack_range(clip, first, count);
    for &idx in range.iter().rev() {
        let follower_rest = clip.get(idx + 1).map(|s| (s.is_rest(), s.ticks));
        if let Some((true, extra)) = follower_rest {
            if let Some(segment) = clip.get_mut(idx) {
                segment.ticks += extra;
            }
            clip.replace_range(idx + 1, 1, Vec::new());
        }
    }
    clip.consolidate();
}

/// Insert a rest at one end; optionally rest-out and/or trim an equal
/// span at the opposite end. The only editor allowed to change length.
pub fn displacement(clip: &mut Clip, side: Side, ticks: u32, null_edge: bool, trim_edge: bool) {
    if ticks == 0 {
        clip.consolidate();
        return;
    }
    match side {
        Side::Right => {
            clip.push(Segment::rest(ticks, DEFAULT_LEVEL));
            if null_edge {
                null_span(clip, Side::Left, ticks as u64);
            }
            if trim_edge {
                trim(clip, Side::Left);
            }
        }
        Side::Left => {
            clip.insert(0, Segment::rest(ticks, DEFAULT_LEVEL));
            if null_edge {
                null_span(clip, Side::Right, ticks as u64);
            }
            if trim_edge {
                trim(clip, Side::Right);
            }
        }
    }
    clip.consolidate();
}

/// Transpose whole stacks in the addressed range by semitones.
pub fn transpose_range(clip: &mut Clip, first: usize, count: usize, semitones: i32) {
    for idx in stack_range(clip, first, count) {
        if let Some(pitches) = clip.get_mut(idx).and_then(|s| s.pitches_mut()) {
            for pitch in pitches.iter_mut() {
                *pitch = pitch.transpose(semitones);
            }
        }
    }
    clip.consolidate();
}

/// Transpose selected note positions inside each addressed stack.
///
/// Positions are 1-based; positions past the end of a stack are ignored.
pub fn transpose_in_chord(
    clip: &mut Clip,
    first: usize,
    count: usize,
    indices: &NoteIndices,
    semitones: i32,
) {
    for idx in stack_range(clip, first, count) {
        if let Some(pitches) = clip.get_mut(idx).and_then(|s| s.pitches_mut()) {
            match indices {
                NoteIndices::All => {
                    for pitch in pitches.iter_mut() {
                        *pitch = pitch.transpose(semitones);
                    }
                }
                NoteIndices::At(list) => {
                    for &n in list {
                        if n >= 1 && n <= pitches.len() {
                            pitches[n - 1] = pitches[n - 1].transpose(semitones);
                        }
                    }
                }
            }
        }
    }
    clip.consolidate();
}

/// Remove selected note positions from each addressed stack. A stack
/// losing every pitch becomes a rest.
pub fn remove_notes(clip: &mut Clip, first: usize, count: usize, indices: &[usize]) {
    for idx in stack_range(clip, first, count) {
        if let Some(segment) = clip.get_mut(idx) {
            let kept: Vec<Pitch> = match segment.pitches() {
                Some(pitches) => pitches
                    .iter()
                    .enumerate()
                    .filter(|(n, _)| !indices.contains(&(n + 1)))
                    .map(|(_, p)| *p)
                    .collect(),
                None => continue,
            };
            segment.content = if kept.is_empty() {
                SegmentContent::Rest
            } else {
                SegmentContent::Stack(kept)
            };
        }
    }
    clip.consolidate();
}

/// Insert a pitch into the nth (1-based) stack at a 1-based position,
/// unless the stack already contains it.
pub fn augment_chord(clip: &mut Clip, nth: usize, position: usize, pitch: Pitch) {
    if let Some(idx) = clip.nth_stack(nth) {
        if let Some(pitches) = clip.get_mut(idx).and_then(|s| s.pitches_mut()) {
            if !pitches.contains(&pitch) {
                let at = position.saturating_sub(1).min(pitches.len());
                pitches.insert(at, pitch);
            }
        }
    }
    clip.consolidate();
}

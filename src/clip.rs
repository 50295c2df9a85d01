// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Clip data model: a run-length sequence of note/rest segments.
//!
//! A clip is an ordered, contiguous, non-overlapping list of segments
//! spanning a fixed total duration. Each segment is either a rest or one
//! simultaneous stack of pitches. All structural edits go through
//! `replace_range`, and `consolidate` restores the no-adjacent-rests
//! invariant after every mutation.

use crate::music::note::Pitch;

/// Ticks per quarter note. Subdivision lengths and note event times are
/// all expressed against this unit.
pub const TICKS_PER_BEAT: u32 = 128;

/// Level (velocity) segments carry unless an envelope reshapes them.
pub const DEFAULT_LEVEL: u8 = 100;

/// What a segment holds: silence or one stack of simultaneous pitches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentContent {
    Rest,
    /// Never empty; a stack losing its last pitch becomes a Rest.
    Stack(Vec<Pitch>),
}

/// A time span within a clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub content: SegmentContent,
    /// Span length in ticks, always positive.
    pub ticks: u32,
    /// Velocity marker carried through to note events.
    pub level: u8,
}

impl Segment {
    pub fn rest(ticks: u32, level: u8) -> Self {
        Self {
            content: SegmentContent::Rest,
            ticks,
            level,
        }
    }

    pub fn stack(pitches: Vec<Pitch>, ticks: u32, level: u8) -> Self {
        debug_assert!(!pitches.is_empty());
        Self {
            content: SegmentContent::Stack(pitches),
            ticks,
            level,
        }
    }

    pub fn note(pitch: Pitch, ticks: u32, level: u8) -> Self {
        Self::stack(vec![pitch], ticks, level)
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.content, SegmentContent::Rest)
    }

    pub fn pitches(&self) -> Option<&[Pitch]> {
        match &self.content {
            SegmentContent::Rest => None,
            SegmentContent::Stack(pitches) => Some(pitches),
        }
    }

    pub fn pitches_mut(&mut self) -> Option<&mut Vec<Pitch>> {
        match &mut self.content {
            SegmentContent::Rest => None,
            SegmentContent::Stack(pitches) => Some(pitches),
        }
    }

    /// Copy of this segment with a different length.
    pub fn with_ticks(&self, ticks: u32) -> Self {
        Self {
            content: self.content.clone(),
            ticks,
            level: self.level,
        }
    }
}

/// An ordered segment sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clip {
    segments: Vec<Segment>,
}

impl Clip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.segments.get_mut(index)
    }

    pub fn push(&mut self, segment: Segment) {
        if segment.ticks > 0 {
            self.segments.push(segment);
        }
    }

    pub fn insert(&mut self, index: usize, segment: Segment) {
        if segment.ticks > 0 {
            self.segments.insert(index.min(self.segments.len()), segment);
        }
    }

    /// Total clip duration in ticks.
    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|s| s.ticks as u64).sum()
    }

    /// Replace `count` segments starting at `start` with `replacement`.
    ///
    /// The single structural-edit primitive: `count` clamps to the tail,
    /// zero-length replacement segments are dropped.
    pub fn replace_range(&mut self, start: usize, count: usize, replacement: Vec<Segment>) {
        let start = start.min(self.segments.len());
        let end = start.saturating_add(count).min(self.segments.len());
        self.segments
            .splice(start..end, replacement.into_iter().filter(|s| s.ticks > 0));
    }

    /// Merge adjacent rests. Idempotent; the merged rest keeps the level
    /// of the first.
    pub fn consolidate(&mut self) {
        let mut merged: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in self.segments.drain(..) {
            match merged.last_mut() {
                Some(last) if last.is_rest() && segment.is_rest() => {
                    last.ticks += segment.ticks;
                }
                _ => merged.push(segment),
            }
        }
        self.segments = merged;
    }

    /// Segment indices that hold note stacks, in order.
    pub fn stack_positions(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_rest())
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of note-stack segments.
    pub fn stack_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_rest()).count()
    }

    /// Segment index of the nth (1-based) note stack.
    pub fn nth_stack(&self, nth: usize) -> Option<usize> {
        if nth == 0 {
            return None;
        }
        self.stack_positions().get(nth - 1).copied()
    }
}

impl IntoIterator for Clip {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

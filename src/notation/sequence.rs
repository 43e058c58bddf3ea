//! Timed note sequences
//!
//! Times and durations are in 64th notes.

use crate::error::{Error, Result};

/// Duration of a quarter note in 64ths.
pub const QUARTER: u32 = 16;

/// A sounding note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Start time
    pub offset: u32,
    /// MIDI pitch (0-127)
    pub pitch: u8,
    /// Length of the note
    pub duration: u32,
}

impl NoteEvent {
    /// Create a new note event
    pub fn new(offset: u32, pitch: u8, duration: u32) -> Self {
        Self {
            offset,
            pitch,
            duration,
        }
    }

    /// Time at which the note stops sounding
    pub fn end(&self) -> u32 {
        self.offset + self.duration
    }
}

/// An ordered run of notes with a total length
///
/// Rests produce no events but still advance `length`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    events: Vec<NoteEvent>,
    length: u32,
}

impl Sequence {
    /// Create an empty (silent) sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequence from events and a total length
    ///
    /// The length is extended to cover every event.
    pub fn from_events(mut events: Vec<NoteEvent>, length: u32) -> Self {
        events.sort_by_key(|e| (e.offset, e.pitch));
        let end = events.iter().map(NoteEvent::end).max().unwrap_or(0);
        Self {
            events,
            length: length.max(end),
        }
    }

    /// Notes in start order
    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    /// Total length, including trailing rests
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Check if the sequence has no sounding notes
    pub fn is_silent(&self) -> bool {
        self.events.is_empty()
    }

    /// Multiply all times by `factor`
    ///
    /// Every event ends within `length`, so checking the length covers
    /// offsets and durations too.
    pub fn stretch(mut self, factor: u32) -> Result<Self> {
        let length = self
            .length
            .checked_mul(factor)
            .ok_or(Error::TickOverflow(u64::from(self.length) * u64::from(factor)))?;
        for event in &mut self.events {
            event.offset *= factor;
            event.duration *= factor;
        }
        self.length = length;
        Ok(self)
    }

    /// Merge two sequences so they sound together
    pub fn parallel(self, other: Sequence) -> Self {
        let length = self.length.max(other.length);
        let mut events = self.events;
        events.extend(other.events);
        Self::from_events(events, length)
    }
}

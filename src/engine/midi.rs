//! Standard MIDI File output
//!
//! Writes note sequences as an SMF Format 1 file: a meta track with
//! time signature, key signature, tempo and title, followed by one track per
//! sequence on its own channel. Sequence times are in 64th notes and the
//! file division is 16 ticks per quarter, so one tick is one 64th.
//!
//! Uses the `midly` crate for encoding.

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use tracing::debug;

use crate::error::{Error, Result};
use crate::notation::{Sequence, QUARTER};

/// MIDI has sixteen channels and each track gets its own.
pub const MAX_TRACKS: usize = 16;

/// Largest delta time a track event can carry (28 bits).
pub const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Settings for the meta track and note velocity
#[derive(Debug, Clone, PartialEq)]
pub struct SmfSettings {
    /// Sequence name written to the meta track
    pub title: String,
    /// Tempo in beats (quarter notes) per minute
    pub tempo_bpm: f64,
    /// Note-on velocity (1-127)
    pub velocity: u8,
}

impl Default for SmfSettings {
    fn default() -> Self {
        Self {
            title: "untitled".to_string(),
            tempo_bpm: 120.0,
            velocity: 64,
        }
    }
}

impl SmfSettings {
    /// Microseconds per quarter note
    pub fn tempo_micros(&self) -> u32 {
        let micros = 60_000_000.0 / self.tempo_bpm.max(1.0);
        (micros as u32).min(0x00FF_FFFF)
    }
}

fn event(delta: u32, kind: TrackEventKind<'_>) -> TrackEvent<'_> {
    TrackEvent {
        delta: u28::new(delta),
        kind,
    }
}

fn meta_track(settings: &SmfSettings) -> Track<'_> {
    vec![
        event(0, TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8))),
        event(0, TrackEventKind::Meta(MetaMessage::KeySignature(0, false))),
        event(
            0,
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(settings.tempo_micros()))),
        ),
        event(
            0,
            TrackEventKind::Meta(MetaMessage::TrackName(settings.title.as_bytes())),
        ),
        event(0, TrackEventKind::Meta(MetaMessage::EndOfTrack)),
    ]
}

fn note_track(
    sequence: &Sequence,
    channel: u8,
    program: u8,
    velocity: u8,
) -> Result<Track<'static>> {
    let channel = u4::new(channel);
    let mut track: Track<'static> = vec![event(
        0,
        TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(program),
            },
        },
    )];

    // (tick, is_on, key); note-offs sort ahead of note-ons at the same tick.
    let mut edges: Vec<(u32, bool, u8)> = sequence
        .events()
        .iter()
        .flat_map(|note| [(note.offset, true, note.pitch), (note.end(), false, note.pitch)])
        .collect();
    edges.sort_by_key(|&(tick, on, _)| (tick, on));

    let mut last_tick = 0;
    for (tick, on, key) in edges {
        let message = if on {
            MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(velocity),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(0),
            }
        };
        let delta = tick - last_tick;
        if delta > MAX_DELTA {
            return Err(Error::TickOverflow(u64::from(delta)));
        }
        track.push(event(delta, TrackEventKind::Midi { channel, message }));
        last_tick = tick;
    }

    track.push(event(0, TrackEventKind::Meta(MetaMessage::EndOfTrack)));
    Ok(track)
}

/// Build an in-memory SMF for `sequences`.
///
/// `instruments` holds one General MIDI program per sequence; `None`
/// selects program 0 for every track.
pub fn build_smf<'a>(
    sequences: &[Sequence],
    instruments: Option<&[u8]>,
    settings: &'a SmfSettings,
) -> Result<Smf<'a>> {
    if sequences.len() > MAX_TRACKS {
        return Err(Error::TooManyTracks(sequences.len()));
    }
    let programs: Vec<u8> = match instruments {
        Some(list) if list.len() != sequences.len() => {
            return Err(Error::InstrumentMismatch {
                tracks: sequences.len(),
                instruments: list.len(),
            });
        }
        Some(list) => list.to_vec(),
        None => vec![0; sequences.len()],
    };
    if let Some(&bad) = programs.iter().find(|&&p| p > 127) {
        return Err(Error::InstrumentOutOfRange(bad));
    }
    let velocity = settings.velocity.clamp(1, 127);

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(QUARTER as u16)),
    ));
    smf.tracks.push(meta_track(settings));
    for (channel, (sequence, &program)) in sequences.iter().zip(&programs).enumerate() {
        smf.tracks
            .push(note_track(sequence, channel as u8, program, velocity)?);
    }
    Ok(smf)
}

/// Encode `sequences` as Standard MIDI File bytes.
pub fn write_smf(
    sequences: &[Sequence],
    instruments: Option<&[u8]>,
    settings: &SmfSettings,
) -> Result<Vec<u8>> {
    let smf = build_smf(sequences, instruments, settings)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    debug!(tracks = smf.tracks.len(), bytes = buf.len(), "encoded MIDI");
    Ok(buf)
}

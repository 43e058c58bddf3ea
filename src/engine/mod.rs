//! Sonification engine for datasound
//!
//! Turns series into note-token melodies, optional chord tracks, and
//! finally Standard MIDI File bytes.

mod chords;
pub mod midi;
mod recorder;

pub use chords::{check_period, chord_roots, chord_track, MAX_PERIOD};
pub use midi::{build_smf, write_smf, SmfSettings};
pub use recorder::{midi_path, save};

use tracing::{debug, info, warn};

use crate::config::DataSoundConfig;
use crate::error::{Error, Result};
use crate::mapping::{note_name, quantize, Mode, PitchClass, Scale};
use crate::notation::{parse, Sequence};
use crate::sources::Series;

/// The main sonification engine
pub struct Engine {
    scale: Scale,
    period: usize,
    chords: bool,
    instruments: Option<Vec<u8>>,
    smf: SmfSettings,
}

impl Engine {
    /// Create a new engine with the given configuration
    pub fn new(config: &DataSoundConfig) -> Result<Self> {
        let tonic: PitchClass = config.music.key.parse()?;
        let mode: Mode = config.music.mode.parse()?;
        let scale = Scale::new(tonic, mode, config.music.octaves)?;
        scale.check_midi_range()?;
        check_period(config.music.period)?;

        Ok(Self {
            scale,
            period: config.music.period,
            chords: config.music.chords,
            instruments: config.output.instruments.clone(),
            smf: SmfSettings {
                title: config.output.title.clone(),
                tempo_bpm: config.output.tempo,
                velocity: config.output.velocity,
            },
        })
    }

    /// The scale melodies are drawn from
    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    /// Note tokens for one row, or `None` when the row has no finite
    /// values and should stay silent.
    pub fn note_tokens(&self, row: &[f64]) -> Result<Option<String>> {
        let indices = match quantize(row, &self.scale) {
            Ok(indices) => indices,
            Err(Error::EmptySeries) => return Ok(None),
            Err(e) => return Err(e),
        };
        let names = indices
            .into_iter()
            .map(|index| note_name(index, &self.scale))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(names.join(" ")))
    }

    /// One melody per row; rows without data become silent sequences.
    pub fn melodies(&self, series: &Series) -> Result<Vec<Sequence>> {
        series
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| match self.note_tokens(row)? {
                Some(tokens) => {
                    debug!(row = i, notes = row.len(), "quantized row");
                    parse(&tokens)
                }
                None => {
                    warn!(row = i, "row has no finite values, rendering silence");
                    Ok(Sequence::new())
                }
            })
            .collect()
    }

    /// All tracks for `series`: melodies first, then one chord track per
    /// row when chords are enabled.
    pub fn tracks(&self, series: &Series) -> Result<Vec<Sequence>> {
        let mut tracks = self.melodies(series)?;
        if self.chords {
            for row in series.rows() {
                let chords = match chord_track(row, &self.scale, self.period) {
                    Ok(chords) => chords,
                    Err(Error::EmptySeries) => Sequence::new(),
                    Err(e) => return Err(e),
                };
                tracks.push(chords);
            }
        }
        Ok(tracks)
    }

    /// Render `series` to Standard MIDI File bytes
    pub fn render(&self, series: &Series) -> Result<Vec<u8>> {
        let tracks = self.tracks(series)?;
        let bytes = write_smf(&tracks, self.instruments.as_deref(), &self.smf)?;
        info!(
            tracks = tracks.len(),
            bytes = bytes.len(),
            scale = %self.scale.mode(),
            "rendered series"
        );
        Ok(bytes)
    }
}

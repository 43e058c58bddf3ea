//! Chord accompaniment
//!
//! Summarizes each window of `period` values by its mean, classifies the
//! mean against the whole series, and sounds a triad on that scale degree
//! for as long as the window's melody notes last.

use super::midi::MAX_DELTA;
use crate::error::{Error, Result};
use crate::mapping::{note_name, Mapper, NoteIndex, QuantizeMapper, Scale};
use crate::notation::{parse, Sequence, QUARTER};

/// Scale-degree offsets of the triad tones above the root.
const TRIAD: [usize; 3] = [0, 2, 4];

/// Longest chord window: a stretched quarter note must fit one MIDI delta.
pub const MAX_PERIOD: usize = (MAX_DELTA / QUARTER) as usize;

/// Check a chord period and return it as a stretch factor.
pub fn check_period(period: usize) -> Result<u32> {
    if period == 0 {
        return Err(Error::InvalidRange {
            name: "period",
            value: 0,
            reason: "must be at least 1",
        });
    }
    if period > MAX_PERIOD {
        return Err(Error::InvalidRange {
            name: "period",
            value: i64::try_from(period).unwrap_or(i64::MAX),
            reason: "chords would outlast a MIDI delta time",
        });
    }
    Ok(period as u32)
}

/// Mean of the finite values in `window`, NaN when there are none.
fn window_mean(window: &[f64]) -> f64 {
    let (sum, count) = window
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Scale-degree roots, one per window of `period` values.
pub fn chord_roots(series: &[f64], scale: &Scale, period: usize) -> Result<Vec<NoteIndex>> {
    check_period(period)?;
    let mapper = QuantizeMapper::new("chord_root", series, scale)?;
    let means: Vec<f64> = series.chunks(period).map(window_mean).collect();
    Ok(mapper
        .map_series(&means)
        .into_iter()
        .map(|degree| (!degree.is_nan()).then_some(degree as usize))
        .collect())
}

/// Build the chord track for `series`.
///
/// Triad tones that would climb past the top of the scale are left out.
pub fn chord_track(series: &[f64], scale: &Scale, period: usize) -> Result<Sequence> {
    let factor = check_period(period)?;
    let roots = chord_roots(series, scale, period)?;

    let mut chords = Sequence::new();
    for step in TRIAD {
        let tokens = roots
            .iter()
            .map(|root| {
                let degree = root
                    .map(|r| r + step)
                    .filter(|&d| d < scale.len());
                note_name(degree, scale)
            })
            .collect::<Result<Vec<_>>>()?;
        chords = chords.parallel(parse(&tokens.join(" "))?);
    }

    chords.stretch(factor)
}

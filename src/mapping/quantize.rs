//! Quantizing numeric series onto scale degrees
//!
//! The value range of a series is cut into `len(scale) - 1` equal-width
//! bins and each value is placed by a left-biased sorted insertion into the
//! bin edges. NaN is the rest marker on both sides of the mapping.

use tracing::debug;

use super::scale::Scale;
use super::Mapper;
use crate::error::{Error, Result};

/// Position in a scale, or `None` for a rest
pub type NoteIndex = Option<usize>;

/// Token the notation parser reads as a rest.
pub const REST: &str = "r";

/// Minimum and maximum over the finite entries of `values`.
fn finite_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> Result<(f64, f64)> {
    values
        .into_iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
        .ok_or(Error::EmptySeries)
}

/// Bin edges over a fixed value range
#[derive(Debug, Clone, PartialEq)]
struct Bins {
    edges: Vec<f64>,
}

impl Bins {
    /// `degrees` edges spanning `[min, max]` in equal steps.
    fn new(min: f64, max: f64, degrees: usize) -> Self {
        let edges = match degrees {
            0 => Vec::new(),
            1 => vec![min],
            _ => {
                let bins = degrees - 1;
                let step = (max - min) / bins as f64;
                let mut edges: Vec<f64> = if step.is_finite() {
                    (0..bins).map(|i| min + i as f64 * step).collect()
                } else {
                    // `max - min` overflowed; interpolate between the ends instead.
                    (0..bins)
                        .map(|i| {
                            let t = i as f64 / bins as f64;
                            (1.0 - t) * min + t * max
                        })
                        .collect()
                };
                // Pin the last edge so rounding never leaves `max` outside.
                edges.push(max);
                edges
            }
        };
        Self { edges }
    }

    fn for_series<'a>(values: impl IntoIterator<Item = &'a f64>, degrees: usize) -> Result<Self> {
        let (min, max) = finite_range(values)?;
        debug!(min, max, degrees, "computed quantization range");
        Ok(Self::new(min, max, degrees))
    }

    fn is_degenerate(&self) -> bool {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) => lo == hi,
            _ => true,
        }
    }

    fn classify(&self, value: f64) -> NoteIndex {
        if value.is_nan() {
            return None;
        }
        if self.is_degenerate() {
            return Some(0);
        }
        let top = self.edges.len() - 1;
        // Inner edges can round onto `max` when the range is tiny.
        if value >= self.edges[top] {
            return Some(top);
        }
        Some(self.edges.partition_point(|&edge| edge < value))
    }
}

/// Compute the `len(scale)` bin edges for `series`.
///
/// Returns [`Error::EmptySeries`] when the series has no finite values.
pub fn bin_edges(series: &[f64], scale: &Scale) -> Result<Vec<f64>> {
    Ok(Bins::for_series(series, scale.len())?.edges)
}

/// Map every value in `series` to an index into `scale`.
///
/// NaN entries become rests. A constant series maps entirely to index 0.
/// Infinite values are left out of the range and land on the outermost
/// degrees.
pub fn quantize(series: &[f64], scale: &Scale) -> Result<Vec<NoteIndex>> {
    let bins = Bins::for_series(series, scale.len())?;
    Ok(series.iter().map(|&v| bins.classify(v)).collect())
}

/// Quantize a two-dimensional array against the range of all its entries.
///
/// The output has the same shape as `rows`.
pub fn quantize_2d(rows: &[Vec<f64>], scale: &Scale) -> Result<Vec<Vec<NoteIndex>>> {
    let bins = Bins::for_series(rows.iter().flatten(), scale.len())?;
    Ok(rows
        .iter()
        .map(|row| row.iter().map(|&v| bins.classify(v)).collect())
        .collect())
}

/// Classify a single `value` against the range of a reference `series`.
///
/// A NaN `value` is a rest regardless of the series.
pub fn note_on_single(value: f64, series: &[f64], scale: &Scale) -> Result<NoteIndex> {
    if value.is_nan() {
        return Ok(None);
    }
    Ok(Bins::for_series(series, scale.len())?.classify(value))
}

/// Note token for `index`: the rest token, or the scale label with sharps
/// spelled the way the notation parser expects (`c#` becomes `cis`).
pub fn note_name(index: NoteIndex, scale: &Scale) -> Result<String> {
    match index {
        None => Ok(REST.to_string()),
        Some(i) => scale
            .get(i)
            .map(|label| label.replace('#', "is"))
            .ok_or(Error::IndexOutOfScale {
                index: i,
                len: scale.len(),
            }),
    }
}

/// A mapper that classifies values against a reference series' range
///
/// Output is the scale index as `f64`, or NaN for a rest.
pub struct QuantizeMapper {
    name: String,
    bins: Bins,
}

impl QuantizeMapper {
    /// Create a quantize mapper
    ///
    /// # Arguments
    /// * `name` - Name for this mapper
    /// * `reference` - Series whose finite range defines the bins
    /// * `scale` - The scale to quantize to
    pub fn new(name: &str, reference: &[f64], scale: &Scale) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            bins: Bins::for_series(reference, scale.len())?,
        })
    }

    /// The bin edges in use
    pub fn edges(&self) -> &[f64] {
        &self.bins.edges
    }
}

impl Mapper for QuantizeMapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn map(&self, input: f64) -> f64 {
        match self.bins.classify(input) {
            Some(index) => index as f64,
            None => f64::NAN,
        }
    }
}

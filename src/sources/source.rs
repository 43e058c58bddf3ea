//! Source trait and Series definition

use crate::error::{Error, Result};

/// A one- or two-dimensional numeric series
///
/// A 1D series is stored as a single row. NaN marks a missing sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    rows: Vec<Vec<f64>>,
    two_dimensional: bool,
}

impl Series {
    /// Create a 1D series
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            rows: vec![values],
            two_dimensional: false,
        }
    }

    /// Create a 2D series; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            if let Some((i, row)) = rows
                .iter()
                .enumerate()
                .find(|(_, row)| row.len() != first.len())
            {
                return Err(Error::InvalidSeries(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    first.len()
                )));
            }
        }
        Ok(Self {
            rows,
            two_dimensional: true,
        })
    }

    /// Rows of the series; a 1D series has exactly one
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Check if the series was given as a 2D array
    pub fn is_2d(&self) -> bool {
        self.two_dimensional
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }

    /// Check if the series has no finite value at all
    pub fn is_silent(&self) -> bool {
        !self.rows.iter().flatten().any(|v| v.is_finite())
    }
}

/// Trait for series sources
pub trait Source {
    /// Get the name of this source
    fn name(&self) -> &str;

    /// Read the series
    fn load(&self) -> Result<Series>;
}

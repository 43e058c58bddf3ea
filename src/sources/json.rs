//! JSON series files
//!
//! An array of numbers is a 1D series, an array of arrays a 2D series.
//! `null` and the strings `"nan"`/`"NaN"` are missing samples.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{Series, Source};
use crate::error::{Error, Result};

/// Series read from a JSON file
pub struct JsonSource {
    name: String,
    path: PathBuf,
}

impl JsonSource {
    /// Create a new JSON source
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            path,
        }
    }
}

impl Source for JsonSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Series> {
        let contents = std::fs::read_to_string(&self.path)?;
        parse_json(&contents)
    }
}

fn sample(value: &Value) -> Result<f64> {
    match value {
        Value::Null => Ok(f64::NAN),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::InvalidSeries(format!("unrepresentable number {}", n))),
        Value::String(s) if s.eq_ignore_ascii_case("nan") => Ok(f64::NAN),
        other => Err(Error::InvalidSeries(format!("unexpected value {}", other))),
    }
}

/// Parse a JSON document into a series
pub fn parse_json(contents: &str) -> Result<Series> {
    let document: Value = serde_json::from_str(contents)?;
    let Value::Array(items) = document else {
        return Err(Error::InvalidSeries("top level must be an array".to_string()));
    };

    if items.iter().any(Value::is_array) {
        let rows = items
            .iter()
            .map(|item| match item {
                Value::Array(row) => row.iter().map(sample).collect::<Result<Vec<_>>>(),
                other => Err(Error::InvalidSeries(format!(
                    "mixed rows and scalars at {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Series::from_rows(rows)
    } else {
        let values = items.iter().map(sample).collect::<Result<Vec<_>>>()?;
        Ok(Series::from_values(values))
    }
}

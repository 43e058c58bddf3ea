//! Delimited text series files
//!
//! One row per non-empty line; fields separated by commas, semicolons, tabs
//! or spaces. A file with a single line, or with one value per line, is a
//! 1D series.

use std::path::{Path, PathBuf};

use super::{Series, Source};
use crate::error::{Error, Result};

/// Field spellings read as a missing sample.
const MISSING: &[&str] = &["", "nan", "na", "null", "-"];

/// Series read from a delimited text file
pub struct TextSource {
    name: String,
    path: PathBuf,
}

impl TextSource {
    /// Create a new text source
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            path,
        }
    }
}

impl Source for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Series> {
        let contents = std::fs::read_to_string(&self.path)?;
        parse_text(&contents)
    }
}

fn field(line: usize, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if MISSING.iter().any(|m| trimmed.eq_ignore_ascii_case(m)) {
        return Ok(f64::NAN);
    }
    trimmed.parse().map_err(|_| Error::ParseValue {
        line,
        field: trimmed.to_string(),
    })
}

fn split_fields(line: &str) -> Vec<&str> {
    // Explicit separators keep empty fields; plain whitespace does not.
    if line.contains([',', ';', '\t']) {
        line.split([',', ';', '\t']).collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// Parse delimited text into a series
pub fn parse_text(contents: &str) -> Result<Series> {
    let rows = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            split_fields(line)
                .into_iter()
                .map(|raw| field(i + 1, raw))
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    match rows.len() {
        0 => Err(Error::InvalidSeries("no data lines".to_string())),
        1 => Ok(Series::from_values(rows.into_iter().flatten().collect())),
        _ if rows.iter().all(|row| row.len() == 1) => {
            Ok(Series::from_values(rows.into_iter().flatten().collect()))
        }
        _ => Series::from_rows(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_single_line_is_1d() {
        let series = parse_text("1, 2, 3, nan\n").unwrap();
        assert!(!series.is_2d());
        assert_eq!(series.shape(), (1, 4));
        assert!(series.rows()[0][3].is_nan());
    }

    #[test]
    fn test_column_is_1d() {
        let series = parse_text("# temperature\n1.5\n\n2.5\nNA\n").unwrap();
        assert!(!series.is_2d());
        assert_eq!(series.shape(), (1, 3));
    }

    #[test]
    fn test_matrix_is_2d() {
        let series = parse_text("1 2 3\n4 5 6\n").unwrap();
        assert!(series.is_2d());
        assert_eq!(series.rows()[1], vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_empty_fields_are_missing() {
        let series = parse_text("1,,3\n4;5;\n").unwrap();
        assert!(series.rows()[0][1].is_nan());
        assert!(series.rows()[1][2].is_nan());
    }

    #[test]
    fn test_bad_field_reports_line() {
        let result = parse_text("1 2\n3 x\n");
        assert!(matches!(
            result,
            Err(Error::ParseValue { line: 2, ref field }) if field == "x"
        ));
    }

    #[test]
    fn test_no_data() {
        assert!(matches!(
            parse_text("# only a comment\n"),
            Err(Error::InvalidSeries(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0.5\t0.7").unwrap();
        let series = TextSource::new(file.path()).load().unwrap();
        assert_eq!(series.rows()[0], vec![0.5, 0.7]);
    }
}

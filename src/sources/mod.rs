//! Data sources for datasound
//!
//! Sources read numeric series from files for the sonification engine.

mod json;
mod source;
mod text;

use std::path::Path;

use tracing::debug;

pub use json::{parse_json, JsonSource};
pub use source::{Series, Source};
pub use text::{parse_text, TextSource};

use crate::error::Result;

/// Pick a source for `path` by extension: `.json` or delimited text.
pub fn source_for(path: &Path) -> Box<dyn Source> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(JsonSource::new(path))
    } else {
        Box::new(TextSource::new(path))
    }
}

/// Load a series from `path`
pub fn load_series(path: &Path) -> Result<Series> {
    let source = source_for(path);
    let series = source.load()?;
    debug!(source = source.name(), shape = ?series.shape(), "loaded series");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_series_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("data.JSON");
        std::fs::File::create(&json)
            .unwrap()
            .write_all(b"[[1, 2], [3, 4]]")
            .unwrap();
        assert!(load_series(&json).unwrap().is_2d());

        let csv = dir.path().join("data.csv");
        std::fs::write(&csv, "1,2,3\n").unwrap();
        assert_eq!(load_series(&csv).unwrap().shape(), (1, 3));
    }

    #[test]
    fn test_missing_file() {
        let result = load_series(Path::new("/nonexistent/series.csv"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}

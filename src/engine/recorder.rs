//! MIDI file saving
//!
//! Writes rendered bytes to disk under a `.midi` name.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;

/// Extension given to saved files.
pub const EXTENSION: &str = "midi";

/// Final path for `path`: unchanged when it already ends in `.midi` or
/// `.mid`, otherwise with `.midi` appended.
pub fn midi_path(path: &Path) -> PathBuf {
    let has_midi_ext = path.extension().is_some_and(|ext| {
        ext.eq_ignore_ascii_case(EXTENSION) || ext.eq_ignore_ascii_case("mid")
    });
    if has_midi_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(EXTENSION);
        PathBuf::from(name)
    }
}

/// Write `bytes` verbatim and return the path written.
pub fn save(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let target = midi_path(path);
    std::fs::write(&target, bytes)?;
    info!(path = %target.display(), bytes = bytes.len(), "saved MIDI file");
    Ok(target)
}

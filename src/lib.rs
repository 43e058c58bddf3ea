//! datasound - Sonification of numeric series
//!
//! Maps numbers onto the degrees of a musical scale and renders the
//! resulting melodies, with optional chord accompaniment, as MIDI files.

pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod notation;
pub mod sources;

pub use config::DataSoundConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use mapping::{build_scale, note_name, note_on_single, quantize, quantize_2d, Scale};
pub use sources::{load_series, Series};

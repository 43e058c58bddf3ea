//! Mapping numeric data onto musical scales
//!
//! Builds scales from a tonic and mode, and quantizes data values into
//! scale-degree indices.

mod mapper;
mod quantize;
mod scale;

pub use mapper::Mapper;
pub use quantize::{
    bin_edges, note_name, note_on_single, quantize, quantize_2d, NoteIndex, QuantizeMapper, REST,
};
pub use scale::{build_scale, Mode, PitchClass, Scale, CHROMATIC, OCTAVE_MARK};

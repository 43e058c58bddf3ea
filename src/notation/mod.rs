//! Note-token notation
//!
//! Parses the textual melody representation into timed sequences.

mod parser;
mod sequence;

pub use parser::parse;
pub use sequence::{NoteEvent, Sequence, QUARTER};

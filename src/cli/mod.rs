//! CLI interface for datasound

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sonify numeric series as MIDI
#[derive(Parser)]
#[command(name = "datasound")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a data file to a MIDI file
    Render {
        /// Input data file (.json, or delimited text)
        input: PathBuf,

        /// Output file path; `.midi` is appended when missing
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        music: MusicArgs,

        /// General MIDI program per track, e.g. 0,23
        #[arg(long, value_delimiter = ',')]
        instruments: Option<Vec<u8>>,

        /// Tempo in beats per minute
        #[arg(long)]
        tempo: Option<f64>,
    },

    /// Print the notes of a scale
    Scale {
        /// Tonic, e.g. C, F# or Bb
        key: String,

        /// Mode: major, minor, pentatonic or blues
        #[arg(short, long, default_value = "major")]
        mode: String,

        /// Octaves spanned by the scale
        #[arg(long, default_value = "1")]
        octaves: usize,
    },

    /// Print the note tokens for each row of a data file
    Notes {
        /// Input data file (.json, or delimited text)
        input: PathBuf,

        #[command(flatten)]
        music: MusicArgs,
    },

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "datasound.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}

/// Overrides for the `music` section of the configuration
#[derive(Args)]
pub struct MusicArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Tonic, e.g. C, F# or Bb
    #[arg(short, long)]
    pub key: Option<String>,

    /// Mode: major, minor, pentatonic or blues
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Octaves spanned by the scale
    #[arg(long)]
    pub octaves: Option<usize>,

    /// Add a chord track per melody
    #[arg(long)]
    pub chords: bool,

    /// Values summarized by each chord
    #[arg(long)]
    pub period: Option<usize>,
}

//! Crate-level error type

/// Errors produced while building scales, quantizing series, parsing
/// notation and writing MIDI.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Mode name not present in the mode table.
    #[error("invalid mode `{0}`: expected one of major, minor, pentatonic, blues")]
    InvalidMode(String),

    /// Tonic is not one of the twelve chromatic names.
    #[error("invalid key `{0}`")]
    InvalidKey(String),

    /// A count parameter is out of its valid range.
    #[error("invalid value for `{name}`: {value} ({reason})")]
    InvalidRange {
        name: &'static str,
        value: i64,
        reason: &'static str,
    },

    /// The series has no finite values to derive a range from.
    #[error("series contains no finite values")]
    EmptySeries,

    /// A quantized index fell outside the scale. Indicates a binning bug.
    #[error("note index {index} outside scale of length {len}")]
    IndexOutOfScale { index: usize, len: usize },

    /// Malformed note-token string.
    #[error("notation error at `{token}`: {reason}")]
    Notation { token: String, reason: String },

    /// Instrument list does not match the number of tracks.
    #[error("expected {tracks} instruments, got {instruments}")]
    InstrumentMismatch { tracks: usize, instruments: usize },

    /// General MIDI programs are 0..=127.
    #[error("instrument {0} out of range (0-127)")]
    InstrumentOutOfRange(u8),

    /// A time does not fit in a MIDI delta time (28 bits).
    #[error("{0} ticks exceeds the MIDI time limit")]
    TickOverflow(u64),

    /// One channel per track, and MIDI has sixteen.
    #[error("{0} tracks requested but at most 16 are supported")]
    TooManyTracks(usize),

    /// Input data does not describe a 1D or 2D numeric series.
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    /// A field in a delimited text file is not a number.
    #[error("line {line}: cannot parse `{field}` as a number")]
    ParseValue { line: usize, field: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn notation(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Notation {
            token: token.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

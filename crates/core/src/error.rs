/// Result alias that carries the custom [`ChartError`] type.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A track count above [`crate::MAX_NOTE_TRACKS`] was requested.
    #[error("track count {requested} exceeds the maximum of {max}")]
    TrackCountOutOfRange { requested: usize, max: usize },
    /// A mapping or hold note named a track the store does not have.
    #[error("track {track} is out of range for a chart with {tracks} tracks")]
    TrackOutOfRange { track: usize, tracks: usize },
    #[error("track mapping has {actual} entries but {expected} tracks were requested")]
    MappingLength { expected: usize, actual: usize },
    #[error("cannot copy between charts with {source_tracks} and {dest_tracks} tracks")]
    TrackCountMismatch {
        source_tracks: usize,
        dest_tracks: usize,
    },
    #[error("hold note on track {track} has an empty or negative span [{start}, {end})")]
    InvalidHoldNote { track: usize, start: i32, end: i32 },
    /// Raised by hold replacement, which is the only mutation that refuses to
    /// merge.
    #[error("hold note [{start}, {end}) overlaps another hold on track {track}")]
    HoldNoteOverlap { track: usize, start: i32, end: i32 },
    #[error("no hold note at index {0}")]
    HoldNoteIndex(usize),
    #[error("unknown note character `{0}`")]
    InvalidNoteChar(char),
    #[error("row {row} has {actual} columns but the chart has {expected} tracks")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for ChartError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ChartError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

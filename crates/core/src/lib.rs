//! Core library for the Stepchart tools.
//!
//! A [`ChartStore`] holds the notes of one chart: a grid of tap events per
//! track, indexed by row, plus a set of hold notes spanning row ranges. On top
//! of that sit converters between hold spans and inline marker encodings, and
//! transforms that rebuild a chart for a different track layout.

pub mod chart;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod grid;
pub mod holds;
pub mod note;
pub mod options;
pub mod stats;
pub mod transform;

pub use chart::ChartStore;
pub use config::AppConfig;
pub use document::ChartDocument;
pub use error::{ChartError, Result};
pub use grid::TrackGrid;
pub use holds::HoldNoteSet;
pub use note::{
    beat_to_row, row_to_beat, HoldNote, Row, TapNote, TrackCount, MAX_NOTE_TRACKS,
    ROWS_PER_BEAT, ROWS_PER_MEASURE,
};
pub use options::{PlayerOptions, Turn};
pub use stats::ChartSummary;
pub use transform::sliding_window_source;

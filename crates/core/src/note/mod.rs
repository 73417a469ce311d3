use serde::{Deserialize, Serialize};

use crate::{ChartError, Result};

/// Largest number of tracks any chart may declare.
pub const MAX_NOTE_TRACKS: usize = 16;
pub const ROWS_PER_BEAT: i32 = 48;
pub const BEATS_PER_MEASURE: i32 = 4;
pub const ROWS_PER_MEASURE: i32 = ROWS_PER_BEAT * BEATS_PER_MEASURE;

/// Row index of a time subdivision. Signed so that callers may probe before
/// the start of a chart; such reads are simply empty.
pub type Row = i32;

pub fn beat_to_row(beat: f32) -> Row {
    (beat * ROWS_PER_BEAT as f32).round() as Row
}

pub fn row_to_beat(row: Row) -> f32 {
    row as f32 / ROWS_PER_BEAT as f32
}

/// Event stored in one (track, row) slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TapNote {
    #[default]
    Empty,
    Tap,
    /// Begin marker of the 2s/3s hold encoding.
    HoldHead,
    /// End marker of the 2s/3s hold encoding.
    HoldTail,
    /// Body marker of the 4s hold encoding, written on every held row.
    HoldBody,
}

impl TapNote {
    pub fn is_empty(self) -> bool {
        self == TapNote::Empty
    }

    pub fn as_char(self) -> char {
        match self {
            TapNote::Empty => '0',
            TapNote::Tap => '1',
            TapNote::HoldHead => '2',
            TapNote::HoldTail => '3',
            TapNote::HoldBody => '4',
        }
    }
}

impl TryFrom<char> for TapNote {
    type Error = ChartError;

    fn try_from(value: char) -> Result<Self> {
        match value {
            '0' => Ok(TapNote::Empty),
            '1' => Ok(TapNote::Tap),
            '2' => Ok(TapNote::HoldHead),
            '3' => Ok(TapNote::HoldTail),
            '4' => Ok(TapNote::HoldBody),
            other => Err(ChartError::InvalidNoteChar(other)),
        }
    }
}

/// A sustained note covering rows `[start, end)` of a single track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoldNote {
    pub track: usize,
    pub start: Row,
    pub end: Row,
}

impl HoldNote {
    /// Builds a hold note, rejecting empty or negative spans.
    pub fn new(track: usize, start: Row, end: Row) -> Result<Self> {
        let note = Self { track, start, end };
        note.validate()?;
        Ok(note)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start < 0 || self.start >= self.end {
            return Err(ChartError::InvalidHoldNote {
                track: self.track,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// True when both notes share a track and at least one row.
    pub fn overlaps(&self, other: &HoldNote) -> bool {
        self.track == other.track && self.start < other.end && other.start < self.end
    }
}

/// Number of tracks in a chart, bounded by [`MAX_NOTE_TRACKS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct TrackCount(usize);

impl TrackCount {
    pub const MAX: TrackCount = TrackCount(MAX_NOTE_TRACKS);

    pub fn new(tracks: usize) -> Result<Self> {
        if tracks > MAX_NOTE_TRACKS {
            return Err(ChartError::TrackCountOutOfRange {
                requested: tracks,
                max: MAX_NOTE_TRACKS,
            });
        }
        Ok(Self(tracks))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for TrackCount {
    type Error = ChartError;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TrackCount> for usize {
    fn from(value: TrackCount) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_count_is_bounded() {
        assert_eq!(TrackCount::new(4).unwrap().get(), 4);
        assert!(TrackCount::new(MAX_NOTE_TRACKS).is_ok());

        let err = TrackCount::new(MAX_NOTE_TRACKS + 1).unwrap_err();
        assert!(matches!(err, ChartError::TrackCountOutOfRange { .. }));
    }

    #[test]
    fn rejects_empty_hold_spans() {
        assert!(HoldNote::new(0, 4, 10).is_ok());
        assert!(HoldNote::new(0, 4, 4).is_err());
        assert!(HoldNote::new(0, -1, 4).is_err());
    }

    #[test]
    fn overlap_requires_shared_rows_on_one_track() {
        let a = HoldNote::new(1, 2, 6).unwrap();
        assert!(a.overlaps(&HoldNote::new(1, 4, 8).unwrap()));
        assert!(!a.overlaps(&HoldNote::new(1, 6, 8).unwrap()));
        assert!(!a.overlaps(&HoldNote::new(2, 4, 8).unwrap()));
    }

    #[test]
    fn note_chars_round_trip() {
        for c in ['0', '1', '2', '3', '4'] {
            assert_eq!(TapNote::try_from(c).unwrap().as_char(), c);
        }
        assert!(TapNote::try_from('x').is_err());
    }

    #[test]
    fn converts_beats_to_rows() {
        assert_eq!(beat_to_row(1.0), ROWS_PER_BEAT);
        assert_eq!(beat_to_row(0.5), 24);
        assert_eq!(row_to_beat(96), 2.0);
    }
}

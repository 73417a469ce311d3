use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{
    note::{beat_to_row, row_to_beat, Row},
    ChartStore,
};

/// Whole-chart statistics, as printed by the command line tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub tracks: usize,
    pub rows: usize,
    pub tap_notes: usize,
    pub hold_notes: usize,
    pub rows_with_taps: usize,
    pub doubles: usize,
    pub first_beat: Option<f32>,
    pub last_beat: Option<f32>,
}

impl ChartStore {
    /// True when any track has an event at `row`.
    pub fn is_there_a_tap_at_row(&self, row: Row) -> bool {
        !self.is_row_empty(row)
    }

    /// Upper bound on the rows that may hold taps.
    pub fn max_row(&self) -> Row {
        self.num_rows() as Row
    }

    pub fn max_beat(&self) -> f32 {
        row_to_beat(self.max_row())
    }

    /// First row with an event or the start of a hold.
    pub fn first_row(&self) -> Option<Row> {
        let tap = (0..self.max_row()).find(|&row| !self.is_row_empty(row));
        let hold = self.hold_notes().iter().map(|note| note.start).min();
        match (tap, hold) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Last row with an event or the end of a hold.
    pub fn last_row(&self) -> Option<Row> {
        let tap = (0..self.max_row()).rev().find(|&row| !self.is_row_empty(row));
        let hold = self.hold_notes().iter().map(|note| note.end).max();
        tap.max(hold)
    }

    pub fn first_beat(&self) -> Option<f32> {
        self.first_row().map(row_to_beat)
    }

    pub fn last_beat(&self) -> Option<f32> {
        self.last_row().map(row_to_beat)
    }

    /// Non-empty events in `[start_beat, end_beat)`; `None` runs to the end of
    /// the chart.
    pub fn num_tap_notes(&self, start_beat: f32, end_beat: Option<f32>) -> usize {
        let rows = self.stored_rows(start_beat, end_beat);
        (0..self.num_tracks())
            .map(|track| {
                self.grid().track(track)[rows.clone()]
                    .iter()
                    .filter(|note| !note.is_empty())
                    .count()
            })
            .sum()
    }

    pub fn num_rows_with_taps(&self, start_beat: f32, end_beat: Option<f32>) -> usize {
        self.stored_rows(start_beat, end_beat)
            .filter(|&row| self.is_there_a_tap_at_row(row as Row))
            .count()
    }

    /// Rows where two or more tracks have an event.
    pub fn num_doubles(&self, start_beat: f32, end_beat: Option<f32>) -> usize {
        self.stored_rows(start_beat, end_beat)
            .filter(|&row| self.num_non_empty_tracks(row as Row) >= 2)
            .count()
    }

    /// Holds starting in `[start_beat, end_beat)`. Like the other counters the
    /// window is half open and a hold is counted on its first row, wherever it
    /// ends.
    pub fn num_hold_notes_in(&self, start_beat: f32, end_beat: Option<f32>) -> usize {
        let start = beat_to_row(start_beat);
        let end = end_beat.map(beat_to_row).unwrap_or(Row::MAX);
        self.hold_notes()
            .iter()
            .filter(|note| (start..end).contains(&note.start))
            .count()
    }

    pub fn summary(&self) -> ChartSummary {
        ChartSummary {
            tracks: self.num_tracks(),
            rows: self.num_rows(),
            tap_notes: self.num_tap_notes(0.0, None),
            hold_notes: self.num_hold_notes(),
            rows_with_taps: self.num_rows_with_taps(0.0, None),
            doubles: self.num_doubles(0.0, None),
            first_beat: self.first_beat(),
            last_beat: self.last_beat(),
        }
    }

    /// Stored rows covered by the beat window. The open-ended case skips the
    /// end conversion and takes every stored row.
    fn stored_rows(&self, start_beat: f32, end_beat: Option<f32>) -> Range<usize> {
        let len = self.num_rows();
        let start = (beat_to_row(start_beat).max(0) as usize).min(len);
        let end = match end_beat {
            None => len,
            Some(beat) => (beat_to_row(beat).max(0) as usize).min(len),
        };
        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use crate::note::{HoldNote, TapNote, TrackCount, ROWS_PER_BEAT};

    use super::*;

    fn sample() -> ChartStore {
        let mut chart = ChartStore::with_tracks(TrackCount::new(4).unwrap());
        chart.set_tap_note(0, ROWS_PER_BEAT, TapNote::Tap);
        chart.set_tap_note(1, ROWS_PER_BEAT, TapNote::Tap);
        chart.set_tap_note(2, 2 * ROWS_PER_BEAT, TapNote::Tap);
        chart.set_tap_note(3, 4 * ROWS_PER_BEAT, TapNote::Tap);
        chart
            .add_hold_note(HoldNote::new(2, 5 * ROWS_PER_BEAT, 6 * ROWS_PER_BEAT).unwrap())
            .unwrap();
        chart
    }

    #[test]
    fn empty_chart_has_no_first_or_last_row() {
        let chart = ChartStore::with_tracks(TrackCount::new(4).unwrap());
        assert_eq!(chart.first_row(), None);
        assert_eq!(chart.last_row(), None);
        assert_eq!(chart.num_tap_notes(0.0, None), 0);
    }

    #[test]
    fn first_and_last_include_holds() {
        let chart = sample();
        assert_eq!(chart.first_beat(), Some(1.0));
        assert_eq!(chart.last_beat(), Some(6.0));
    }

    #[test]
    fn counts_over_whole_chart() {
        let chart = sample();
        assert_eq!(chart.num_tap_notes(0.0, None), 4);
        assert_eq!(chart.num_rows_with_taps(0.0, None), 3);
        assert_eq!(chart.num_doubles(0.0, None), 1);
        assert_eq!(chart.num_hold_notes_in(0.0, None), 1);
    }

    #[test]
    fn counts_inside_a_beat_window() {
        let chart = sample();
        assert_eq!(chart.num_tap_notes(1.5, Some(4.0)), 1);
        assert_eq!(chart.num_rows_with_taps(0.0, Some(1.0)), 0);
        assert_eq!(chart.num_doubles(1.0, Some(2.0)), 1);
        assert_eq!(chart.num_hold_notes_in(5.0, Some(6.0)), 1);
    }

    #[test]
    fn hold_window_matches_tap_window() {
        let chart = sample();
        // The hold starts on beat 5 and ends on beat 6.
        assert_eq!(chart.num_hold_notes_in(0.0, Some(5.0)), 0);
        assert_eq!(chart.num_hold_notes_in(5.0, Some(5.5)), 1);
        assert_eq!(chart.num_hold_notes_in(6.0, None), 0);
        // A tap on the window's end beat is not counted either.
        assert_eq!(chart.num_tap_notes(4.0, Some(5.0)), 1);
        assert_eq!(chart.num_tap_notes(3.0, Some(4.0)), 0);
    }

    #[test]
    fn summary_matches_queries() {
        let summary = sample().summary();
        assert_eq!(summary.tracks, 4);
        assert_eq!(summary.tap_notes, 4);
        assert_eq!(summary.hold_notes, 1);
        assert_eq!(summary.doubles, 1);
    }
}

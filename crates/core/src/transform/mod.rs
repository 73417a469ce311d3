//! Track remapping: building new charts from existing ones with a different
//! track layout, and a few row-level clean-ups used by the autogenerator.

use crate::{
    note::{HoldNote, Row, TapNote, TrackCount, ROWS_PER_MEASURE},
    ChartError, ChartStore, Result,
};

/// Number of measures between sliding window steps.
const WINDOW_STEP_MEASURES: Row = 4;

/// Source track read by `dest` at `row` when sliding a `source_tracks` wide
/// chart onto `dest_tracks` tracks.
///
/// The window offset ping-pongs between zero and the difference in width,
/// moving one track every [`WINDOW_STEP_MEASURES`] measures. When widening,
/// `dest` reads `dest - offset` if that is a real source track; when
/// narrowing, it reads `dest + offset`.
pub fn sliding_window_source(
    source_tracks: usize,
    dest_tracks: usize,
    row: Row,
    dest: usize,
) -> Option<usize> {
    let offset = window_offset(source_tracks, dest_tracks, row);
    window_source(source_tracks, dest_tracks, offset, dest)
}

/// Scheduled window offset at `row`.
fn window_offset(source_tracks: usize, dest_tracks: usize, row: Row) -> usize {
    let span = source_tracks.abs_diff(dest_tracks);
    if span == 0 {
        return 0;
    }
    let step = (row.max(0) / (ROWS_PER_MEASURE * WINDOW_STEP_MEASURES)) as usize;
    let phase = step % (2 * span);
    if phase <= span {
        phase
    } else {
        2 * span - phase
    }
}

fn window_source(
    source_tracks: usize,
    dest_tracks: usize,
    offset: usize,
    dest: usize,
) -> Option<usize> {
    if dest >= dest_tracks || source_tracks == 0 {
        return None;
    }
    if dest_tracks >= source_tracks {
        dest.checked_sub(offset).filter(|&src| src < source_tracks)
    } else {
        Some(dest + offset).filter(|&src| src < source_tracks)
    }
}

impl ChartStore {
    /// Builds a `tracks` wide chart where destination track `i` is a full copy
    /// of `source` track `mapping[i]`, taps and holds alike. `None` leaves the
    /// destination empty.
    pub fn load_transformed(
        source: &ChartStore,
        tracks: TrackCount,
        mapping: &[Option<usize>],
    ) -> Result<ChartStore> {
        if mapping.len() != tracks.get() {
            return Err(ChartError::MappingLength {
                expected: tracks.get(),
                actual: mapping.len(),
            });
        }
        if let Some(&bad) = mapping
            .iter()
            .flatten()
            .find(|&&src| src >= source.num_tracks())
        {
            return Err(ChartError::TrackOutOfRange {
                track: bad,
                tracks: source.num_tracks(),
            });
        }
        tracing::debug!(?mapping, "loading transformed chart");

        let mut out = ChartStore::with_tracks(tracks);
        out.grid_mut().pad_to(source.num_rows());
        for (dest, src) in mapping.iter().enumerate() {
            let Some(src) = *src else {
                continue;
            };
            out.grid_mut().copy_track_from(dest, source.grid(), src);
            for note in source.hold_notes().on_track(src) {
                out.insert_hold_note(HoldNote {
                    track: dest,
                    ..*note
                });
            }
        }
        Ok(out)
    }

    /// Builds a `tracks` wide chart from `source` using a window that slides
    /// across the source tracks as the chart goes on. See
    /// [`sliding_window_source`] for the schedule.
    ///
    /// Holds are copied whole to the destination reading their track at their
    /// first row. While any copied hold is still running the window stays
    /// where it is and catches up with the schedule once the last one ends, so
    /// every destination track under a hold keeps reading the hold's own
    /// source track. When widening, every tap and hold of `source` arrives.
    pub fn load_transformed_sliding_window(source: &ChartStore, tracks: TrackCount) -> ChartStore {
        let source_tracks = source.num_tracks();
        let dest_tracks = tracks.get();
        tracing::debug!(source_tracks, dest_tracks, "autogenerating chart");

        let mut holds: Vec<HoldNote> = source.hold_notes().iter().copied().collect();
        holds.sort_by_key(|note| (note.start, note.track));
        let last_row = holds
            .iter()
            .map(|note| note.start + 1)
            .fold(source.max_row(), Row::max);

        let mut out = ChartStore::with_tracks(tracks);
        out.grid_mut().pad_to(source.num_rows());
        let mut pending = holds.iter().peekable();
        let mut offset = 0;
        let mut held_until: Row = 0;
        for row in 0..last_row {
            if row >= held_until {
                offset = window_offset(source_tracks, dest_tracks, row);
            }
            for dest in 0..dest_tracks {
                if let Some(src) = window_source(source_tracks, dest_tracks, offset, dest) {
                    let note = source.tap_note(src, row);
                    if !note.is_empty() {
                        out.set_tap_note(dest, row, note);
                    }
                }
            }

            while let Some(note) = pending.next_if(|note| note.start == row) {
                let dest = (0..dest_tracks).find(|&dest| {
                    window_source(source_tracks, dest_tracks, offset, dest) == Some(note.track)
                });
                if let Some(dest) = dest {
                    out.insert_hold_note(HoldNote {
                        track: dest,
                        ..*note
                    });
                    held_until = held_until.max(note.end);
                }
            }
        }
        out
    }

    /// Keeps only the first plain tap at `row` and empties the other taps.
    /// Hold markers are left alone.
    pub fn eliminate_all_but_one_tap(&mut self, row: Row) {
        let Some(first) = self.first_track_with_tap(row) else {
            return;
        };
        for track in first + 1..self.num_tracks() {
            if self.tap_note(track, row) == TapNote::Tap {
                self.set_tap_note(track, row, TapNote::Empty);
            }
        }
    }

    /// True when every track with an event at `row` is allowed by `mask`.
    /// Tracks beyond the end of `mask` are not allowed.
    pub fn row_passes_valid_mask(&self, row: Row, mask: &[bool]) -> bool {
        (0..self.num_tracks()).all(|track| {
            self.tap_note(track, row).is_empty() || mask.get(track).copied().unwrap_or(false)
        })
    }

    /// Replaces every hold with a plain tap on its first row.
    pub fn convert_hold_notes_to_taps(&mut self) {
        let holds = self.take_hold_notes();
        for note in &holds {
            self.set_tap_note(note.track, note.start, TapNote::Tap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(tracks: usize) -> ChartStore {
        ChartStore::with_tracks(TrackCount::new(tracks).unwrap())
    }

    fn tracks(count: usize) -> TrackCount {
        TrackCount::new(count).unwrap()
    }

    #[test]
    fn transformed_copy_follows_mapping() {
        let mut source = store(4);
        source.set_tap_note(1, 5, TapNote::Tap);
        source.set_tap_note(0, 7, TapNote::Tap);

        let out = ChartStore::load_transformed(&source, tracks(2), &[Some(1), None]).unwrap();
        assert_eq!(out.num_tracks(), 2);
        assert_eq!(out.tap_note(0, 5), TapNote::Tap);
        assert_eq!(out.tap_note(0, 7), TapNote::Empty);
        assert!((0..out.max_row()).all(|row| out.tap_note(1, row).is_empty()));
        assert!(out.grid().is_rectangular());
    }

    #[test]
    fn transformed_copy_carries_holds() {
        let mut source = store(2);
        source
            .add_hold_note(HoldNote::new(0, 4, 12).unwrap())
            .unwrap();

        let out =
            ChartStore::load_transformed(&source, tracks(3), &[None, Some(0), Some(0)]).unwrap();
        let mut holds: Vec<_> = out.hold_notes().iter().map(|note| note.track).collect();
        holds.sort();
        assert_eq!(holds, vec![1, 2]);
        assert_eq!(source.num_hold_notes(), 1);
    }

    #[test]
    fn transformed_copy_validates_mapping() {
        let source = store(4);
        let err = ChartStore::load_transformed(&source, tracks(2), &[Some(0)]).unwrap_err();
        assert!(matches!(err, ChartError::MappingLength { .. }));

        let err = ChartStore::load_transformed(&source, tracks(1), &[Some(4)]).unwrap_err();
        assert!(matches!(err, ChartError::TrackOutOfRange { track: 4, .. }));
    }

    #[test]
    fn sliding_window_stays_in_range() {
        for source_tracks in 1..=8 {
            for dest_tracks in 1..=8 {
                for row in (0..40 * ROWS_PER_MEASURE).step_by(ROWS_PER_MEASURE as usize) {
                    for dest in 0..dest_tracks {
                        if let Some(src) =
                            sliding_window_source(source_tracks, dest_tracks, row, dest)
                        {
                            assert!(src < source_tracks);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn sliding_window_moves_over_time() {
        let early = sliding_window_source(4, 8, 0, 0);
        let later = sliding_window_source(4, 8, ROWS_PER_MEASURE * WINDOW_STEP_MEASURES, 0);
        assert_eq!(early, Some(0));
        assert_eq!(later, None);
        assert_eq!(
            sliding_window_source(4, 8, ROWS_PER_MEASURE * WINDOW_STEP_MEASURES, 1),
            Some(0)
        );
    }

    #[test]
    fn sliding_window_same_width_is_identity() {
        let mut source = store(4);
        for track in 0..4 {
            source.set_tap_note(track, track as Row * 500, TapNote::Tap);
        }
        let out = ChartStore::load_transformed_sliding_window(&source, tracks(4));
        assert_eq!(out, source);
    }

    #[test]
    fn sliding_window_keeps_holds_whole() {
        let mut source = store(4);
        source
            .add_hold_note(HoldNote::new(3, 0, ROWS_PER_MEASURE * 10).unwrap())
            .unwrap();

        let out = ChartStore::load_transformed_sliding_window(&source, tracks(8));
        assert_eq!(out.num_hold_notes(), 1);
        let note = out.hold_note(0).unwrap();
        assert_eq!((note.start, note.end), (0, ROWS_PER_MEASURE * 10));
        assert_eq!(note.track, 3);
    }

    #[test]
    fn sliding_window_waits_for_running_holds() {
        let step = ROWS_PER_MEASURE * WINDOW_STEP_MEASURES;
        let mut source = store(4);
        source
            .add_hold_note(HoldNote::new(3, 0, ROWS_PER_MEASURE * 10).unwrap())
            .unwrap();
        source.set_tap_note(2, 800, TapNote::Tap);

        let out = ChartStore::load_transformed_sliding_window(&source, tracks(8));
        assert_eq!(out.num_tap_notes(0.0, None), 1);
        assert_eq!(out.tap_note(2, 800), TapNote::Tap);

        // Once the hold is over the window jumps to its scheduled offset.
        let after = ROWS_PER_MEASURE * 10 + 1;
        source.set_tap_note(0, after, TapNote::Tap);
        let out = ChartStore::load_transformed_sliding_window(&source, tracks(8));
        let expected = (after / step) as usize;
        assert_eq!(out.tap_note(expected, after), TapNote::Tap);
    }

    #[test]
    fn sliding_window_keeps_every_hold_when_widening() {
        let mut source = store(4);
        source
            .add_hold_note(HoldNote::new(3, 0, ROWS_PER_MEASURE * 10).unwrap())
            .unwrap();
        source
            .add_hold_note(HoldNote::new(2, 800, 900).unwrap())
            .unwrap();

        let out = ChartStore::load_transformed_sliding_window(&source, tracks(8));
        assert_eq!(out.num_hold_notes(), 2);
        assert!(out.hold_notes().is_disjoint());
        assert!(out.hold_notes().iter().any(|note| (note.start, note.end) == (800, 900)));
    }

    #[test]
    fn keeps_only_the_first_tap() {
        let mut chart = store(4);
        chart.set_tap_note(1, 3, TapNote::Tap);
        chart.set_tap_note(2, 3, TapNote::HoldHead);
        chart.set_tap_note(3, 3, TapNote::Tap);

        chart.eliminate_all_but_one_tap(3);
        let once = chart.clone();
        chart.eliminate_all_but_one_tap(3);

        assert_eq!(chart, once);
        assert_eq!(chart.tap_note(1, 3), TapNote::Tap);
        assert_eq!(chart.tap_note(2, 3), TapNote::HoldHead);
        assert_eq!(chart.tap_note(3, 3), TapNote::Empty);
    }

    #[test]
    fn mask_rejects_events_on_disallowed_tracks() {
        let mut chart = store(3);
        chart.set_tap_note(0, 2, TapNote::Tap);
        chart.set_tap_note(2, 2, TapNote::Tap);
        let mask = [true, false, true];
        assert!(chart.row_passes_valid_mask(2, &mask));

        chart.set_tap_note(1, 2, TapNote::Tap);
        assert!(!chart.row_passes_valid_mask(2, &mask));
    }

    #[test]
    fn holds_become_taps() {
        let mut chart = store(2);
        chart
            .add_hold_note(HoldNote::new(1, 6, 9).unwrap())
            .unwrap();
        chart.convert_hold_notes_to_taps();

        assert_eq!(chart.num_hold_notes(), 0);
        assert_eq!(chart.tap_note(1, 6), TapNote::Tap);
    }
}

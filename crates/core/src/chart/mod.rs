//! The chart store: one track grid plus the hold notes laid over it.
//!
//! All mutation goes through [`ChartStore`] so that the two halves stay in
//! agreement: every track has the same number of rows, holds never overlap on
//! a track, and no tap sits underneath a hold.

use crate::{
    grid::TrackGrid,
    holds::HoldNoteSet,
    note::{HoldNote, Row, TapNote, TrackCount},
    ChartError, Result,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChartStore {
    grid: TrackGrid,
    holds: HoldNoteSet,
}

impl ChartStore {
    /// Creates an empty store with zero tracks.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracks(tracks: TrackCount) -> Self {
        Self {
            grid: TrackGrid::new(tracks),
            holds: HoldNoteSet::new(),
        }
    }

    /// Resets this store to an empty chart shaped like `template`. Nothing is
    /// copied besides the track count.
    pub fn config_from(&mut self, template: &ChartStore) {
        *self = Self::with_tracks(template.track_count());
    }

    pub fn num_tracks(&self) -> usize {
        self.grid.num_tracks()
    }

    pub fn track_count(&self) -> TrackCount {
        // The grid is only ever built from a `TrackCount`.
        TrackCount::new(self.grid.num_tracks()).unwrap_or(TrackCount::MAX)
    }

    /// Changes the track count. Holds on removed tracks are dropped.
    pub fn set_num_tracks(&mut self, tracks: TrackCount) {
        self.grid.set_num_tracks(tracks);
        self.holds.retain(|note| note.track < tracks.get());
    }

    pub fn grid(&self) -> &TrackGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut TrackGrid {
        &mut self.grid
    }

    pub fn num_rows(&self) -> usize {
        self.grid.num_rows()
    }

    /// Returns the event at `(track, row)`; rows outside the stored range are
    /// empty. Panics when `track` is not below [`Self::num_tracks`].
    #[inline]
    pub fn tap_note(&self, track: usize, row: Row) -> TapNote {
        self.grid.get(track, row)
    }

    /// Writes one event. Non-empty writes onto a row covered by a hold on the
    /// same track are ignored; the hold already stands for that row.
    pub fn set_tap_note(&mut self, track: usize, row: Row, note: TapNote) {
        if !note.is_empty() && self.hold_covering(track, row).is_some() {
            tracing::warn!(track, row, ?note, "ignoring write under a hold note");
            return;
        }
        self.grid.set(track, row, note);
    }

    /// Hold on `track` whose span contains `row`, if any.
    pub fn hold_covering(&self, track: usize, row: Row) -> Option<&HoldNote> {
        self.holds
            .on_track(track)
            .find(|note| note.start <= row && row < note.end)
    }

    /// Moves taps and holds of `src` onto `dest`, replacing whatever `dest`
    /// held. `src` is left empty.
    pub fn move_track(&mut self, dest: usize, src: usize) {
        if dest == src {
            return;
        }
        self.grid.move_track(dest, src);
        self.holds.retain(|note| note.track != dest);
        let moved: Vec<HoldNote> = self.holds.on_track(src).copied().collect();
        self.holds.retain(|note| note.track != src);
        for note in moved {
            self.holds.add(HoldNote { track: dest, ..note });
        }
    }

    /// Empties rows `[begin, end)` and drops holds lying wholly inside them.
    pub fn clear_range(&mut self, begin: Row, end: Row) {
        self.grid.clear_range(begin, end);
        self.holds
            .retain(|note| !(begin <= note.start && note.end <= end));
    }

    pub fn clear_all(&mut self) {
        self.grid.clear_all();
        self.holds.clear();
    }

    /// Copies rows `[from_begin, from_end)` of `source` to this store starting
    /// at `to_begin` (or `from_begin` when `None`).
    ///
    /// Only the target window changes. Holds here that cross it are cut at its
    /// edges, source holds crossing the copied rows are clipped to them, and
    /// everything outside the window is left as it was.
    pub fn copy_range(
        &mut self,
        source: &ChartStore,
        from_begin: Row,
        from_end: Row,
        to_begin: Option<Row>,
    ) -> Result<()> {
        if source.num_tracks() != self.num_tracks() {
            return Err(ChartError::TrackCountMismatch {
                source_tracks: source.num_tracks(),
                dest_tracks: self.num_tracks(),
            });
        }
        let to_begin = to_begin.unwrap_or(from_begin);
        if from_end <= from_begin {
            return Ok(());
        }
        let shift = to_begin - from_begin;
        let to_end = from_end + shift;
        tracing::debug!(from_begin, from_end, to_begin, "copying chart range");

        self.cut_holds(to_begin, to_end);
        self.grid.clear_range(to_begin, to_end);
        for row in from_begin..from_end {
            for track in 0..self.num_tracks() {
                self.grid
                    .set(track, row + shift, source.tap_note(track, row));
            }
        }

        for note in source.hold_notes() {
            let clipped = HoldNote {
                track: note.track,
                start: note.start.max(from_begin) + shift,
                end: note.end.min(from_end) + shift,
            };
            if clipped.validate().is_ok() {
                self.insert_hold_note(clipped);
            }
        }
        Ok(())
    }

    /// Trims every hold crossing rows `[begin, end)` so that none of its span
    /// stays inside them. A hold straddling the whole window splits in two.
    fn cut_holds(&mut self, begin: Row, end: Row) {
        let crossing: Vec<HoldNote> = self
            .holds
            .iter()
            .filter(|note| note.start < end && begin < note.end)
            .copied()
            .collect();
        self.holds
            .retain(|note| !(note.start < end && begin < note.end));
        for note in crossing {
            if note.start < begin {
                self.holds.add(HoldNote { end: begin, ..note });
            }
            if note.end > end {
                self.holds.add(HoldNote { start: end, ..note });
            }
        }
    }

    /// Replaces this store with a deep copy of `source`.
    pub fn copy_all(&mut self, source: &ChartStore) {
        self.clone_from(source);
    }

    pub fn is_row_empty(&self, row: Row) -> bool {
        self.grid.is_row_empty(row)
    }

    pub fn num_non_empty_tracks(&self, row: Row) -> usize {
        self.grid.num_non_empty_tracks(row)
    }

    pub fn first_non_empty_track(&self, row: Row) -> Option<usize> {
        self.grid.first_non_empty_track(row)
    }

    pub fn num_tracks_with_tap(&self, row: Row) -> usize {
        self.grid.num_tracks_with_tap(row)
    }

    pub fn first_track_with_tap(&self, row: Row) -> Option<usize> {
        self.grid.first_track_with_tap(row)
    }

    /// Adds a hold, merging it with any hold it overlaps on the same track and
    /// clearing every event under the merged span. Returns the stored note.
    pub fn add_hold_note(&mut self, note: HoldNote) -> Result<HoldNote> {
        note.validate()?;
        self.check_track(note.track)?;
        Ok(self.insert_hold_note(note))
    }

    /// [`Self::add_hold_note`] for notes already known to be valid.
    pub(crate) fn insert_hold_note(&mut self, note: HoldNote) -> HoldNote {
        let merged = self.holds.add(note);
        self.grid
            .clear_track_range(merged.track, merged.start, merged.end);
        merged
    }

    /// Removes the hold at `index`. Taps cleared when it was added are not
    /// restored.
    pub fn remove_hold_note(&mut self, index: usize) -> Result<HoldNote> {
        self.holds.remove(index)
    }

    pub fn hold_note(&self, index: usize) -> Option<&HoldNote> {
        self.holds.get(index)
    }

    /// Replaces the hold at `index` with `note`, e.g. after an editor drags an
    /// endpoint. Rejects spans overlapping another hold instead of merging.
    pub fn replace_hold_note(&mut self, index: usize, note: HoldNote) -> Result<HoldNote> {
        self.check_track(note.track)?;
        let old = self.holds.replace(index, note)?;
        self.grid.clear_track_range(note.track, note.start, note.end);
        Ok(old)
    }

    /// Drops every hold for which `keep` returns false. Taps are untouched.
    pub fn retain_hold_notes<F>(&mut self, keep: F)
    where
        F: FnMut(&HoldNote) -> bool,
    {
        self.holds.retain(keep);
    }

    pub fn num_hold_notes(&self) -> usize {
        self.holds.len()
    }

    pub fn hold_notes(&self) -> &HoldNoteSet {
        &self.holds
    }

    pub(crate) fn take_hold_notes(&mut self) -> HoldNoteSet {
        std::mem::take(&mut self.holds)
    }

    fn check_track(&self, track: usize) -> Result<()> {
        if track >= self.num_tracks() {
            return Err(ChartError::TrackOutOfRange {
                track,
                tracks: self.num_tracks(),
            });
        }
        Ok(())
    }
}

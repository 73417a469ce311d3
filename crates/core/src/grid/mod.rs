use crate::note::{Row, TapNote, TrackCount};

/// Per-track rows of tap events.
///
/// Every track holds the same number of rows at all times. Rows past the end
/// (and negative rows) read as [`TapNote::Empty`], so the grid behaves as if
/// the chart went on with empty rows forever.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrackGrid {
    tracks: Vec<Vec<TapNote>>,
    rows: usize,
}

impl TrackGrid {
    pub fn new(tracks: TrackCount) -> Self {
        Self {
            tracks: vec![Vec::new(); tracks.get()],
            rows: 0,
        }
    }

    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Truncates or pads the track dimension. The row length is untouched.
    pub fn set_num_tracks(&mut self, tracks: TrackCount) {
        let rows = self.rows;
        self.tracks
            .resize_with(tracks.get(), || vec![TapNote::Empty; rows]);
    }

    /// Number of stored rows, shared by every track.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn track(&self, track: usize) -> &[TapNote] {
        &self.tracks[track]
    }

    #[inline]
    pub fn get(&self, track: usize, row: Row) -> TapNote {
        if row < 0 {
            return TapNote::Empty;
        }
        self.tracks[track]
            .get(row as usize)
            .copied()
            .unwrap_or(TapNote::Empty)
    }

    /// Writes one event, growing every track so that `row` exists.
    pub fn set(&mut self, track: usize, row: Row, note: TapNote) {
        if row < 0 {
            tracing::warn!(track, row, "ignoring write to negative row");
            return;
        }
        let index = row as usize;
        self.pad_to(index + 1);
        self.tracks[track][index] = note;
    }

    /// Grows all tracks to at least `rows` rows.
    pub fn pad_to(&mut self, rows: usize) {
        if rows <= self.rows {
            return;
        }
        for track in &mut self.tracks {
            track.resize(rows, TapNote::Empty);
        }
        self.rows = rows;
    }

    /// Moves the whole of `src` onto `dest`, leaving `src` empty.
    pub fn move_track(&mut self, dest: usize, src: usize) {
        if dest == src {
            return;
        }
        let moved = std::mem::replace(&mut self.tracks[src], vec![TapNote::Empty; self.rows]);
        self.tracks[dest] = moved;
    }

    /// Overwrites `dest` with a copy of `source`'s track `src`, padding both
    /// grids so the rectangular shape holds.
    pub fn copy_track_from(&mut self, dest: usize, source: &TrackGrid, src: usize) {
        self.pad_to(source.rows);
        let target = &mut self.tracks[dest];
        target[..source.rows].copy_from_slice(&source.tracks[src]);
        target[source.rows..].fill(TapNote::Empty);
    }

    /// Empties rows `[begin, end)` on every track. Storage never shrinks.
    pub fn clear_range(&mut self, begin: Row, end: Row) {
        let begin = begin.max(0) as usize;
        let end = (end.max(0) as usize).min(self.rows);
        if begin >= end {
            return;
        }
        for track in &mut self.tracks {
            track[begin..end].fill(TapNote::Empty);
        }
    }

    pub fn clear_track_range(&mut self, track: usize, begin: Row, end: Row) {
        let begin = begin.max(0) as usize;
        let end = (end.max(0) as usize).min(self.rows);
        if begin < end {
            self.tracks[track][begin..end].fill(TapNote::Empty);
        }
    }

    pub fn clear_all(&mut self) {
        for track in &mut self.tracks {
            track.clear();
        }
        self.rows = 0;
    }

    pub fn is_row_empty(&self, row: Row) -> bool {
        self.first_non_empty_track(row).is_none()
    }

    pub fn num_non_empty_tracks(&self, row: Row) -> usize {
        (0..self.num_tracks())
            .filter(|&t| !self.get(t, row).is_empty())
            .count()
    }

    pub fn first_non_empty_track(&self, row: Row) -> Option<usize> {
        (0..self.num_tracks()).find(|&t| !self.get(t, row).is_empty())
    }

    /// Counts plain taps only; hold markers are not taps.
    pub fn num_tracks_with_tap(&self, row: Row) -> usize {
        (0..self.num_tracks())
            .filter(|&t| self.get(t, row) == TapNote::Tap)
            .count()
    }

    pub fn first_track_with_tap(&self, row: Row) -> Option<usize> {
        (0..self.num_tracks()).find(|&t| self.get(t, row) == TapNote::Tap)
    }

    /// True when every track stores exactly [`Self::num_rows`] rows.
    pub fn is_rectangular(&self) -> bool {
        self.tracks.iter().all(|track| track.len() == self.rows)
    }
}

//! Conversions between explicit hold notes and the two inline marker forms.
//!
//! The 2s/3s form writes a begin marker on a hold's first row and an end
//! marker on its end row. The 4s form writes a body marker on every row the
//! hold covers. The two have different closing rules and share no code.

use crate::{
    note::{HoldNote, Row, TapNote},
    ChartStore,
};

impl ChartStore {
    /// Turns 2s/3s markers into hold notes.
    ///
    /// While a hold is open on a track, the next non-empty event of any kind
    /// closes it and is consumed, so a plain tap can end a hold too. An end
    /// marker with no open hold and a begin marker that is never closed are
    /// left where they are.
    pub fn convert_markers_to_hold_notes(&mut self) {
        let rows = self.num_rows() as Row;
        let mut found = Vec::new();

        for track in 0..self.num_tracks() {
            let mut open: Option<Row> = None;
            for row in 0..rows {
                let note = self.tap_note(track, row);
                match (open, note) {
                    (_, TapNote::Empty) => {}
                    (None, TapNote::HoldHead) => open = Some(row),
                    (None, _) => {}
                    (Some(start), _) => {
                        self.set_tap_note(track, row, TapNote::Empty);
                        found.push(HoldNote {
                            track,
                            start,
                            end: row,
                        });
                        open = None;
                    }
                }
            }
        }

        tracing::debug!(holds = found.len(), "decoded 2s/3s markers");
        for note in found {
            self.insert_hold_note(note);
        }
    }

    /// Writes every hold note back as a begin and end marker pair and empties
    /// the hold set.
    ///
    /// The end marker sits on row `end`, which lies outside the hold. Whatever
    /// was stored there is overwritten: a tap right after a hold is lost, and
    /// of two touching holds the later marker wins the shared row. Each loss
    /// is logged as a warning.
    pub fn convert_hold_notes_to_markers(&mut self) {
        let mut holds: Vec<HoldNote> = self.take_hold_notes().iter().copied().collect();
        holds.sort_by_key(|note| (note.track, note.start));
        tracing::debug!(holds = holds.len(), "encoding hold notes as 2s/3s");

        for note in &holds {
            let grid = self.grid_mut();
            for (row, marker) in [(note.start, TapNote::HoldHead), (note.end, TapNote::HoldTail)] {
                let old = grid.get(note.track, row);
                if !old.is_empty() {
                    tracing::warn!(track = note.track, row, ?old, ?marker, "marker overwrites an event");
                }
                grid.set(note.track, row, marker);
                if marker == TapNote::HoldHead {
                    grid.clear_track_range(note.track, note.start + 1, note.end);
                }
            }
        }
    }

    /// Turns every maximal run of 4s body markers on a track into one hold.
    pub fn convert_bodies_to_hold_notes(&mut self) {
        let rows = self.num_rows() as Row;
        let mut found = Vec::new();

        for track in 0..self.num_tracks() {
            let mut run: Option<Row> = None;
            // One row past the end reads empty and closes a trailing run.
            for row in 0..=rows {
                let body = self.tap_note(track, row) == TapNote::HoldBody;
                match (run, body) {
                    (None, true) => run = Some(row),
                    (Some(start), false) => {
                        found.push(HoldNote {
                            track,
                            start,
                            end: row,
                        });
                        run = None;
                    }
                    _ => {}
                }
            }
        }

        tracing::debug!(holds = found.len(), "decoded 4s markers");
        for note in found {
            self.insert_hold_note(note);
        }
    }

    /// Writes a body marker on every row of every hold and empties the hold
    /// set.
    pub fn convert_hold_notes_to_bodies(&mut self) {
        let holds = self.take_hold_notes();
        tracing::debug!(holds = holds.len(), "encoding hold notes as 4s");

        for note in &holds {
            for row in note.start..note.end {
                self.set_tap_note(note.track, row, TapNote::HoldBody);
            }
        }
    }

    /// Copy of this chart with holds written as 2s/3s markers.
    pub fn to_markers(&self) -> ChartStore {
        let mut out = self.clone();
        out.convert_hold_notes_to_markers();
        out
    }

    /// Copy of this chart with 2s/3s markers decoded into holds.
    pub fn markers_to_holds(&self) -> ChartStore {
        let mut out = self.clone();
        out.convert_markers_to_hold_notes();
        out
    }

    /// Copy of this chart with holds written as 4s body markers.
    pub fn to_bodies(&self) -> ChartStore {
        let mut out = self.clone();
        out.convert_hold_notes_to_bodies();
        out
    }

    /// Copy of this chart with 4s body markers decoded into holds.
    pub fn bodies_to_holds(&self) -> ChartStore {
        let mut out = self.clone();
        out.convert_bodies_to_hold_notes();
        out
    }
}

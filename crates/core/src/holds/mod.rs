use crate::{note::HoldNote, ChartError, Result};

/// Collection of hold notes with no two overlapping on the same track.
///
/// Iteration follows insertion order, with a merged note taking the place of
/// the last slot. The set only deals with spans; clearing the taps a hold
/// covers is the job of the owning [`crate::ChartStore`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HoldNoteSet {
    notes: Vec<HoldNote>,
}

impl HoldNoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `note`, absorbing every stored note on the same track that it
    /// overlaps. Returns the note actually stored, which spans the union of
    /// the absorbed spans.
    pub fn add(&mut self, note: HoldNote) -> HoldNote {
        let mut merged = note;
        self.notes.retain(|existing| {
            if existing.overlaps(&note) {
                merged.start = merged.start.min(existing.start);
                merged.end = merged.end.max(existing.end);
                false
            } else {
                true
            }
        });
        self.notes.push(merged);
        merged
    }

    /// Removes and returns the note at `index`.
    pub fn remove(&mut self, index: usize) -> Result<HoldNote> {
        if index >= self.notes.len() {
            return Err(ChartError::HoldNoteIndex(index));
        }
        Ok(self.notes.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&HoldNote> {
        self.notes.get(index)
    }

    /// Swaps the note at `index` for `note` without merging. Fails when the
    /// replacement would overlap any other stored note.
    pub fn replace(&mut self, index: usize, note: HoldNote) -> Result<HoldNote> {
        note.validate()?;
        if index >= self.notes.len() {
            return Err(ChartError::HoldNoteIndex(index));
        }
        let clash = self
            .notes
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && existing.overlaps(&note));
        if clash {
            return Err(ChartError::HoldNoteOverlap {
                track: note.track,
                start: note.start,
                end: note.end,
            });
        }
        Ok(std::mem::replace(&mut self.notes[index], note))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HoldNote> {
        self.notes.iter()
    }

    pub fn on_track(&self, track: usize) -> impl Iterator<Item = &HoldNote> + '_ {
        self.notes.iter().filter(move |note| note.track == track)
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&HoldNote) -> bool,
    {
        self.notes.retain(keep);
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// True when no two stored notes overlap.
    pub fn is_disjoint(&self) -> bool {
        self.notes.iter().enumerate().all(|(i, a)| {
            self.notes[i + 1..].iter().all(|b| !a.overlaps(b))
        })
    }
}

impl<'a> IntoIterator for &'a HoldNoteSet {
    type Item = &'a HoldNote;
    type IntoIter = std::slice::Iter<'a, HoldNote>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(track: usize, start: i32, end: i32) -> HoldNote {
        HoldNote::new(track, start, end).unwrap()
    }

    #[test]
    fn merges_overlapping_spans() {
        let mut set = HoldNoteSet::new();
        set.add(hold(1, 2, 6));
        let merged = set.add(hold(1, 4, 8));

        assert_eq!(merged, hold(1, 2, 8));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0), Some(&hold(1, 2, 8)));
    }

    #[test]
    fn bridging_note_absorbs_both_neighbours() {
        let mut set = HoldNoteSet::new();
        set.add(hold(0, 0, 4));
        set.add(hold(0, 10, 12));
        set.add(hold(3, 2, 11));
        let merged = set.add(hold(0, 3, 11));

        assert_eq!(merged, hold(0, 0, 12));
        assert_eq!(set.len(), 2);
        assert!(set.is_disjoint());
    }

    #[test]
    fn identical_spans_collapse() {
        let mut set = HoldNoteSet::new();
        set.add(hold(2, 5, 9));
        set.add(hold(2, 5, 9));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn adjacent_spans_stay_separate() {
        let mut set = HoldNoteSet::new();
        set.add(hold(0, 0, 4));
        set.add(hold(0, 4, 8));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn replace_rejects_overlap() {
        let mut set = HoldNoteSet::new();
        set.add(hold(0, 0, 4));
        set.add(hold(0, 8, 12));

        let err = set.replace(0, hold(0, 2, 9)).unwrap_err();
        assert!(matches!(err, ChartError::HoldNoteOverlap { .. }));

        let old = set.replace(0, hold(0, 1, 8)).unwrap();
        assert_eq!(old, hold(0, 0, 4));
        assert_eq!(set.get(0), Some(&hold(0, 1, 8)));
    }

    #[test]
    fn remove_reports_bad_index() {
        let mut set = HoldNoteSet::new();
        set.add(hold(0, 0, 4));
        assert!(set.remove(3).is_err());
        assert_eq!(set.remove(0).unwrap(), hold(0, 0, 4));
        assert!(set.is_empty());
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    note::{HoldNote, Row, TapNote, TrackCount},
    ChartError, ChartStore, Result,
};

/// On-disk chart used by the command line tool.
///
/// Each entry of `rows` is one row with a character per track (`0` empty,
/// `1` tap, `2`/`3` hold begin/end, `4` hold body). Holds are listed
/// separately as explicit spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDocument {
    pub tracks: usize,
    #[serde(default)]
    pub rows: Vec<String>,
    #[serde(default)]
    pub holds: Vec<HoldNote>,
}

impl ChartDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Builds a store through the regular write path: every cell via
    /// `set_tap_note`, then every hold via `add_hold_note`.
    pub fn to_store(&self) -> Result<ChartStore> {
        let mut chart = ChartStore::with_tracks(TrackCount::new(self.tracks)?);
        for (index, line) in self.rows.iter().enumerate() {
            let width = line.chars().count();
            if width != self.tracks {
                return Err(ChartError::RowWidth {
                    row: index,
                    expected: self.tracks,
                    actual: width,
                });
            }
            for (track, c) in line.chars().enumerate() {
                let note = TapNote::try_from(c)?;
                if !note.is_empty() {
                    chart.set_tap_note(track, index as Row, note);
                }
            }
        }
        chart.grid_mut().pad_to(self.rows.len());
        for hold in &self.holds {
            chart.add_hold_note(*hold)?;
        }
        Ok(chart)
    }

    pub fn from_store(chart: &ChartStore) -> Self {
        let rows = (0..chart.max_row())
            .map(|row| {
                (0..chart.num_tracks())
                    .map(|track| chart.tap_note(track, row).as_char())
                    .collect::<String>()
            })
            .collect();
        Self {
            tracks: chart.num_tracks(),
            rows,
            holds: chart.hold_notes().iter().copied().collect(),
        }
    }
}

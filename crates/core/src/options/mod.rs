use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    note::{TapNote, ROWS_PER_BEAT},
    ChartStore, Result,
};

/// Track rearrangement chosen on the options screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    #[default]
    Off,
    Mirror,
    /// Every track takes the notes of its right-hand neighbour.
    Left,
    /// Every track takes the notes of its left-hand neighbour.
    Right,
    /// A permutation drawn from the options' shuffle seed.
    Shuffle,
}

impl Turn {
    /// Destination-to-source mapping for a chart `tracks` wide, suitable for
    /// [`ChartStore::load_transformed`].
    pub fn mapping(self, tracks: usize, seed: u64) -> Vec<Option<usize>> {
        let sources: Vec<usize> = match self {
            Turn::Off => (0..tracks).collect(),
            Turn::Mirror => (0..tracks).rev().collect(),
            Turn::Left => (0..tracks).map(|t| (t + 1) % tracks).collect(),
            Turn::Right => (0..tracks).map(|t| (t + tracks - 1) % tracks).collect(),
            Turn::Shuffle => {
                let mut order: Vec<usize> = (0..tracks).collect();
                order.shuffle(&mut StdRng::seed_from_u64(seed));
                order
            }
        };
        sources.into_iter().map(Some).collect()
    }
}

/// Per-player chart modifiers. Menu code reads and writes this record; the
/// chart side only applies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerOptions {
    pub turn: Turn,
    /// Drops every tap that is not on a beat.
    pub little: bool,
    /// When off, holds are played as taps on their first row.
    pub hold_notes: bool,
    pub shuffle_seed: u64,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            turn: Turn::Off,
            little: false,
            hold_notes: true,
            shuffle_seed: 0,
        }
    }
}

impl PlayerOptions {
    /// Returns a modified copy of `chart`; the input is left untouched.
    pub fn apply(&self, chart: &ChartStore) -> Result<ChartStore> {
        tracing::debug!(options = ?self, "applying player options");

        let mapping = self.turn.mapping(chart.num_tracks(), self.shuffle_seed);
        let mut out = ChartStore::load_transformed(chart, chart.track_count(), &mapping)?;

        if self.little {
            make_little(&mut out);
        }
        if !self.hold_notes {
            out.convert_hold_notes_to_taps();
        }
        Ok(out)
    }
}

fn make_little(chart: &mut ChartStore) {
    for track in 0..chart.num_tracks() {
        for row in 0..chart.max_row() {
            if row % ROWS_PER_BEAT != 0 && !chart.tap_note(track, row).is_empty() {
                chart.set_tap_note(track, row, TapNote::Empty);
            }
        }
    }
    chart.retain_hold_notes(|note| note.start % ROWS_PER_BEAT == 0);
}

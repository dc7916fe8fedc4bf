use serde::{Deserialize, Serialize};

use crate::orientation::Orientation;

/// A word committed to the grid. Immutable once placed; the solver rebuilds
/// its search slots from these and the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub orientation: Orientation,
    /// Index of this word in the generation dictionary.
    pub dict_index: usize,
}

impl PlacedWord {
    pub fn new(
        word: String,
        row: usize,
        col: usize,
        orientation: Orientation,
        dict_index: usize,
    ) -> Self {
        Self {
            word,
            row,
            col,
            orientation,
            dict_index,
        }
    }

    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    pub fn positions(&self) -> Vec<(usize, usize)> {
        let (dr, dc) = self.orientation.delta();
        (0..self.len())
            .map(|i| {
                (
                    (self.row as isize + dr * i as isize) as usize,
                    (self.col as isize + dc * i as isize) as usize,
                )
            })
            .collect()
    }
}

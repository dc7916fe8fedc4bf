use std::cmp::Ordering;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{Base62Codec, CodecError, RADIX};
use crate::grid::{ALL_STEPS, CROSS_STEPS, Content, DIAG_STEPS, Grid, Tint};

/// Difficulty ladder. Each level fixes how many letter neighbors a hint must
/// summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Apprentice,
    Adept,
    Expert,
    Master,
    Legendary,
}

impl Difficulty {
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Beginner,
        Difficulty::Apprentice,
        Difficulty::Adept,
        Difficulty::Expert,
        Difficulty::Master,
        Difficulty::Legendary,
    ];

    pub fn required_neighbors(self) -> usize {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Apprentice => 2,
            Difficulty::Adept => 3,
            Difficulty::Expert => 4,
            Difficulty::Master => 5,
            Difficulty::Legendary => 6,
        }
    }

    /// One rung easier; idempotent at the floor.
    pub fn step_down(self) -> Difficulty {
        match self {
            Difficulty::Legendary => Difficulty::Master,
            Difficulty::Master => Difficulty::Expert,
            Difficulty::Expert => Difficulty::Adept,
            Difficulty::Adept => Difficulty::Apprentice,
            Difficulty::Apprentice => Difficulty::Beginner,
            Difficulty::Beginner => Difficulty::Beginner,
        }
    }
}

/// Which neighbor set a hint summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintClass {
    Cross,
    Diagonal,
    Both,
}

impl HintClass {
    pub const ALL: [HintClass; 3] = [HintClass::Cross, HintClass::Diagonal, HintClass::Both];

    pub(crate) fn steps(self) -> &'static [(isize, isize)] {
        match self {
            HintClass::Cross => &CROSS_STEPS,
            HintClass::Diagonal => &DIAG_STEPS,
            HintClass::Both => &ALL_STEPS,
        }
    }

    pub fn tint(self) -> Tint {
        match self {
            HintClass::Cross => Tint::Red,
            HintClass::Diagonal => Tint::Blue,
            HintClass::Both => Tint::Green,
        }
    }
}

/// A placed checksum hint. `neighbors` are the letter positions that went
/// into the checksum, in step order; `difficulty` is `None` for hints placed
/// directly by the disambiguation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub row: usize,
    pub col: usize,
    pub class: HintClass,
    pub neighbors: Vec<(usize, usize)>,
    pub symbol: char,
    pub difficulty: Option<Difficulty>,
}

impl Hint {
    /// Rendered token, `=` plus the checksum symbol.
    pub fn token(&self) -> String {
        format!("={}", self.symbol)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("cell ({row}, {col}) already holds content")]
    Occupied { row: usize, col: usize },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Checksum symbol over `positions`: the mod-62 sum of every letter cell's
/// code. Empty and hint cells contribute nothing.
pub fn hint_value(
    grid: &Grid,
    positions: &[(usize, usize)],
    codec: &Base62Codec,
) -> Result<char, CodecError> {
    let mut sum = 0u32;
    for &(r, c) in positions {
        if let Some(letter) = grid.get(r, c).and_then(|cell| cell.letter()) {
            sum += codec.decode(letter)? as u32;
        }
    }
    codec.encode((sum % RADIX as u32) as u8)
}

/// `=`-prefixed form of [`hint_value`].
pub fn hint_token(
    grid: &Grid,
    positions: &[(usize, usize)],
    codec: &Base62Codec,
) -> Result<String, CodecError> {
    hint_value(grid, positions, codec).map(|symbol| format!("={symbol}"))
}

/// Solver-side bound: with the neighborhood partially filled, can the
/// remaining empties still reach the recorded checksum? Exact equality once
/// every neighbor holds a letter; otherwise each empty can contribute at most
/// 61.
pub fn hint_feasible(grid: &Grid, hint: &Hint, codec: &Base62Codec) -> bool {
    let mut sum = 0u32;
    let mut empties = 0u32;
    for &(r, c) in &hint.neighbors {
        match grid.get(r, c).and_then(|cell| cell.letter()) {
            Some(letter) => match codec.decode(letter) {
                Ok(value) => sum += value as u32,
                Err(_) => return false,
            },
            None => empties += 1,
        }
    }
    let Ok(target) = codec.decode(hint.symbol) else {
        return false;
    };
    let target = target as u32;
    let have = sum % RADIX as u32;
    if empties == 0 {
        return have == target;
    }
    let delta = (target + RADIX as u32 - have) % RADIX as u32;
    delta <= empties * (RADIX as u32 - 1)
}

/// Scans for cells able to host a checksum hint, spreads them across the
/// grid, and paints their neighborhoods.
pub struct HintPlacer {
    codec: Base62Codec,
    hints: Vec<Hint>,
}

impl HintPlacer {
    pub fn new() -> Self {
        Self {
            codec: Base62Codec::new(),
            hints: Vec::new(),
        }
    }

    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    pub fn into_hints(self) -> Vec<Hint> {
        self.hints
    }

    /// Best eligible cell for `class` at `difficulty`: an empty cell whose
    /// whole neighbor set holds letters, exactly as many as the difficulty
    /// demands, at least one of them not yet painted by an earlier hint.
    /// Among those, the one farthest from the existing hints wins; ties are
    /// broken uniformly.
    pub fn find_candidate(
        &self,
        grid: &Grid,
        class: HintClass,
        difficulty: Difficulty,
        rng: &mut impl Rng,
    ) -> Option<(usize, usize)> {
        let required = difficulty.required_neighbors();
        let mut best: Vec<(usize, usize)> = Vec::new();
        let mut best_distance = f64::NEG_INFINITY;
        for (row, col) in grid.positions() {
            if !grid.get(row, col).is_some_and(|cell| cell.is_empty()) {
                continue;
            }
            let neighbors = grid.neighbor_positions(row, col, class);
            let all_letters = neighbors
                .iter()
                .all(|&(r, c)| grid.get(r, c).is_some_and(|n| n.is_letter()));
            if !all_letters || neighbors.len() != required {
                continue;
            }
            // the hint must reveal something no earlier hint already covers
            let informs = neighbors
                .iter()
                .any(|&(r, c)| grid.get(r, c).is_some_and(|n| n.background.is_default()));
            if !informs {
                continue;
            }
            let distance = self.spread_distance(row, col);
            match distance.partial_cmp(&best_distance) {
                Some(Ordering::Greater) => {
                    best.clear();
                    best.push((row, col));
                    best_distance = distance;
                }
                Some(Ordering::Equal) => best.push((row, col)),
                _ => {}
            }
        }
        if best.is_empty() {
            None
        } else {
            Some(best[rng.gen_range(0..best.len())])
        }
    }

    /// Minimum Euclidean distance to the already-placed hints; infinite while
    /// none exist.
    fn spread_distance(&self, row: usize, col: usize) -> f64 {
        self.hints
            .iter()
            .map(|hint| {
                let dr = row as f64 - hint.row as f64;
                let dc = col as f64 - hint.col as f64;
                (dr * dr + dc * dc).sqrt()
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Write a hint at `(row, col)`: encode the checksum over the letter
    /// neighbors, replace the empty cell, and blend the class color across
    /// the whole neighborhood.
    pub fn place_at(
        &mut self,
        grid: &mut Grid,
        row: usize,
        col: usize,
        class: HintClass,
        difficulty: Option<Difficulty>,
    ) -> Result<(), HintError> {
        let cell = grid
            .get(row, col)
            .cloned()
            .ok_or(HintError::OutOfBounds { row, col })?;
        if !cell.is_empty() {
            return Err(HintError::Occupied { row, col });
        }
        let around = grid.neighbor_positions(row, col, class);
        let neighbors: Vec<(usize, usize)> = around
            .iter()
            .copied()
            .filter(|&(r, c)| grid.get(r, c).is_some_and(|n| n.is_letter()))
            .collect();
        let symbol = hint_value(grid, &neighbors, &self.codec)?;

        let mut hinted = cell;
        hinted.content = Content::Hint(symbol);
        let _ = grid.set(row, col, hinted);
        for (r, c) in around {
            if let Some(neighbor) = grid.get(r, c) {
                let mut painted = neighbor.clone();
                painted.background = painted.background.blend(class.tint());
                let _ = grid.set(r, c, painted);
            }
        }
        self.hints.push(Hint {
            row,
            col,
            class,
            neighbors,
            symbol,
            difficulty,
        });
        Ok(())
    }

    /// Find-and-place with the difficulty ladder: on a miss, step down a rung
    /// and rescan; giving up at the floor skips the hint.
    pub fn place_with_ladder(
        &mut self,
        grid: &mut Grid,
        class: HintClass,
        difficulty: Difficulty,
        rng: &mut impl Rng,
    ) -> Result<bool, HintError> {
        let mut level = difficulty;
        loop {
            if let Some((row, col)) = self.find_candidate(grid, class, level, rng) {
                self.place_at(grid, row, col, class, Some(level))?;
                return Ok(true);
            }
            if level == Difficulty::Beginner {
                debug!("no eligible {class:?} hint cell, even at the floor difficulty");
                return Ok(false);
            }
            level = level.step_down();
        }
    }
}

impl Default for HintPlacer {
    fn default() -> Self {
        Self::new()
    }
}

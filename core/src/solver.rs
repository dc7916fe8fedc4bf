use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::codec::Base62Codec;
use crate::grid::{Content, Grid};
use crate::hint::{Hint, HintClass, hint_feasible};
use crate::orientation::Orientation;

/// Chance that a disambiguating hint widens to both adjacency classes when
/// the other class still has unrevealed letters next to the chosen cell.
const BOTH_CLASS_CHANCE: f64 = 0.15;

/// One word-length run of cells, the solver's assignment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub orientation: Orientation,
    pub len: usize,
    pub phrase: usize,
}

/// Rebuild the word slots from the grid alone: the first cell found for each
/// phrase carries its origin and orientation, and the letter run from that
/// origin gives the length.
pub fn derive_slots(grid: &Grid) -> Vec<Slot> {
    let mut seen: HashSet<usize> = HashSet::new();
    let mut slots = Vec::new();
    for (row, col) in grid.positions() {
        let Some(cell) = grid.get(row, col) else {
            continue;
        };
        if !cell.is_letter() {
            continue;
        }
        let (Some(phrase), Some(orientation), Some((origin_row, origin_col))) =
            (cell.phrase, cell.orientation, cell.origin)
        else {
            continue;
        };
        if !seen.insert(phrase) {
            continue;
        }
        let (dr, dc) = orientation.delta();
        let mut len = 0;
        let (mut r, mut c) = (origin_row as isize, origin_col as isize);
        while r >= 0
            && c >= 0
            && grid
                .get(r as usize, c as usize)
                .is_some_and(|cell| cell.is_letter())
        {
            len += 1;
            r += dr;
            c += dc;
        }
        slots.push(Slot {
            row: origin_row,
            col: origin_col,
            orientation,
            len,
            phrase,
        });
    }
    slots.sort_by_key(|slot| slot.phrase);
    slots
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The exhaustive search found no second filling.
    Unique,
    /// A different filling satisfies every hint.
    Alternate,
    /// The step budget ran out before the search finished.
    Inconclusive,
}

/// Where a new hint would best split an alternate filling from the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub row: usize,
    pub col: usize,
    pub class: HintClass,
}

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub verdict: Verdict,
    /// Cells where the alternate filling disagrees with the original; empty
    /// unless the verdict is [`Verdict::Alternate`].
    pub conflicts: Vec<(usize, usize)>,
    pub suggestion: Option<Suggestion>,
}

impl SolveOutcome {
    fn settled(verdict: Verdict) -> Self {
        Self {
            verdict,
            conflicts: Vec::new(),
            suggestion: None,
        }
    }
}

struct Frame {
    slot: usize,
    /// Dictionary index currently holding this slot, if any.
    word: Option<usize>,
    /// Next dictionary index to try; indices already tried and undone for
    /// this frame stay behind the cursor.
    cursor: usize,
    /// Cells this frame wrote; they were empty before.
    written: Vec<(usize, usize)>,
}

impl Frame {
    fn new(slot: usize) -> Self {
        Self {
            slot,
            word: None,
            cursor: 0,
            written: Vec::new(),
        }
    }
}

/// Re-derives every filling consistent with the dictionary and the placed
/// hints, looking for one that differs from the original.
pub struct UniquenessSolver<'a> {
    dictionary: &'a [String],
    codec: Base62Codec,
    max_steps: u64,
}

impl<'a> UniquenessSolver<'a> {
    pub fn new(dictionary: &'a [String], max_steps: u64) -> Self {
        Self {
            dictionary,
            codec: Base62Codec::new(),
            max_steps,
        }
    }

    /// Depth-first search over the slots, iterative with an explicit frame
    /// stack. The caller's grid is never touched; the search runs on a
    /// blanked scratch copy.
    pub fn solve(&self, grid: &Grid, hints: &[Hint], rng: &mut impl Rng) -> SolveOutcome {
        let slots = derive_slots(grid);
        if slots.is_empty() {
            return SolveOutcome::settled(Verdict::Unique);
        }

        let mut scratch = grid.clone();
        for (row, col) in grid.positions() {
            if let Some(cell) = scratch.get(row, col) {
                if cell.is_letter() {
                    let mut blank = cell.clone();
                    blank.content = Content::Empty;
                    let _ = scratch.set(row, col, blank);
                }
            }
        }

        let mut used = vec![false; self.dictionary.len()];
        let mut steps: u64 = 0;
        let mut stack = vec![Frame::new(0)];

        while let Some(frame) = stack.last_mut() {
            // a child frame exhausted its options, or the previous filling of
            // this slot was rejected: clear it before trying the next word
            if let Some(previous) = frame.word.take() {
                used[previous] = false;
                clear_cells(&mut scratch, &frame.written);
                frame.written.clear();
            }

            if steps >= self.max_steps {
                debug!("solver stopped after {steps} steps");
                return SolveOutcome::settled(Verdict::Inconclusive);
            }

            let slot = slots[frame.slot];
            let mut placed = false;
            while frame.cursor < self.dictionary.len() {
                let index = frame.cursor;
                frame.cursor += 1;
                steps += 1;
                if used[index] {
                    continue;
                }
                let word = &self.dictionary[index];
                if word.chars().count() != slot.len {
                    continue;
                }
                let Some(written) = write_word(&mut scratch, slot, word) else {
                    continue;
                };
                if hints
                    .iter()
                    .all(|hint| hint_feasible(&scratch, hint, &self.codec))
                {
                    frame.word = Some(index);
                    frame.written = written;
                    used[index] = true;
                    placed = true;
                    break;
                }
                clear_cells(&mut scratch, &written);
            }

            if !placed {
                stack.pop();
                continue;
            }

            let filled_all = frame.slot + 1 == slots.len();
            let next_slot = frame.slot + 1;
            if filled_all {
                let conflicts = diff_letters(grid, &scratch);
                if !conflicts.is_empty() {
                    let suggestion = suggest_hint(grid, &conflicts, rng);
                    return SolveOutcome {
                        verdict: Verdict::Alternate,
                        conflicts,
                        suggestion,
                    };
                }
                // only the original re-derived; discard it and keep searching
                continue;
            }
            stack.push(Frame::new(next_slot));
        }

        SolveOutcome::settled(Verdict::Unique)
    }
}

/// Lay a word into the scratch grid. Returns the cells it newly wrote, or
/// `None` (with nothing written) when a covered cell disagrees.
fn write_word(scratch: &mut Grid, slot: Slot, word: &str) -> Option<Vec<(usize, usize)>> {
    let (dr, dc) = slot.orientation.delta();
    let mut written = Vec::new();
    for (i, letter) in word.chars().enumerate() {
        let r = (slot.row as isize + dr * i as isize) as usize;
        let c = (slot.col as isize + dc * i as isize) as usize;
        let Some(cell) = scratch.get(r, c) else {
            clear_cells(scratch, &written);
            return None;
        };
        match cell.content {
            Content::Empty => {
                let mut filled = cell.clone();
                filled.content = Content::Letter(letter);
                let _ = scratch.set(r, c, filled);
                written.push((r, c));
            }
            Content::Letter(existing) if existing.eq_ignore_ascii_case(&letter) => {}
            _ => {
                clear_cells(scratch, &written);
                return None;
            }
        }
    }
    Some(written)
}

fn clear_cells(scratch: &mut Grid, cells: &[(usize, usize)]) {
    for &(r, c) in cells {
        if let Some(cell) = scratch.get(r, c) {
            let mut blank = cell.clone();
            blank.content = Content::Empty;
            let _ = scratch.set(r, c, blank);
        }
    }
}

/// Letter cells where the two grids disagree, case-insensitively. Hint cells
/// are never compared.
fn diff_letters(original: &Grid, scratch: &Grid) -> Vec<(usize, usize)> {
    original
        .positions()
        .filter(|&(r, c)| {
            let a = original.get(r, c).and_then(|cell| cell.letter());
            let b = scratch.get(r, c).and_then(|cell| cell.letter());
            match (a, b) {
                (Some(a), Some(b)) => !a.eq_ignore_ascii_case(&b),
                (None, None) => false,
                _ => true,
            }
        })
        .collect()
}

/// Pick the unrevealed cell whose neighborhood best separates the two
/// fillings: the strongest cross scorer against the strongest diagonal
/// scorer, random on a tie, with a small chance of widening to both classes.
pub fn suggest_hint(
    grid: &Grid,
    conflicts: &[(usize, usize)],
    rng: &mut impl Rng,
) -> Option<Suggestion> {
    let conflict_set: HashSet<(usize, usize)> = conflicts.iter().copied().collect();
    let mut best_cross: Option<(usize, usize)> = None;
    let mut best_cross_score = 0usize;
    let mut best_diag: Option<(usize, usize)> = None;
    let mut best_diag_score = 0usize;
    for (row, col) in grid.positions() {
        let Some(cell) = grid.get(row, col) else {
            continue;
        };
        if !cell.is_empty() || !cell.background.is_default() {
            continue;
        }
        let cross_score = grid
            .neighbor_positions(row, col, HintClass::Cross)
            .iter()
            .filter(|p| conflict_set.contains(p))
            .count();
        let diag_score = grid
            .neighbor_positions(row, col, HintClass::Diagonal)
            .iter()
            .filter(|p| conflict_set.contains(p))
            .count();
        if cross_score > best_cross_score {
            best_cross = Some((row, col));
            best_cross_score = cross_score;
        }
        if diag_score > best_diag_score {
            best_diag = Some((row, col));
            best_diag_score = diag_score;
        }
    }

    let (row, col, mut class) = if best_cross_score > best_diag_score {
        let (r, c) = best_cross?;
        (r, c, HintClass::Cross)
    } else if best_diag_score > best_cross_score {
        let (r, c) = best_diag?;
        (r, c, HintClass::Diagonal)
    } else if best_cross_score == 0 {
        return None;
    } else if rng.gen_bool(0.5) {
        let (r, c) = best_cross?;
        (r, c, HintClass::Cross)
    } else {
        let (r, c) = best_diag?;
        (r, c, HintClass::Diagonal)
    };

    let other = match class {
        HintClass::Cross => HintClass::Diagonal,
        _ => HintClass::Cross,
    };
    let other_unrevealed = grid
        .neighbor_positions(row, col, other)
        .iter()
        .any(|&(r, c)| {
            grid.get(r, c)
                .is_some_and(|n| n.is_letter() && n.background.is_default())
        });
    if other_unrevealed && rng.gen_bool(BOTH_CLASS_CHANCE) {
        class = HintClass::Both;
    }
    Some(Suggestion { row, col, class })
}

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::grid::{Background, Content, Grid};
use crate::orientation::Orientation;
use crate::word::PlacedWord;

/// Per-cell outcome of a placement check: where the letter goes and whether
/// it rides on an existing letter.
struct PlannedCell {
    row: usize,
    col: usize,
    letter: char,
    overlaps: bool,
}

/// Seeds the grid with one word, then fits further words that must cross an
/// existing letter without touching anything else.
pub struct WordPlacer<'a> {
    dictionary: &'a [String],
    placed: Vec<PlacedWord>,
}

impl<'a> WordPlacer<'a> {
    pub fn new(dictionary: &'a [String]) -> Self {
        Self {
            dictionary,
            placed: Vec::new(),
        }
    }

    pub fn placed(&self) -> &[PlacedWord] {
        &self.placed
    }

    pub fn into_placed(self) -> Vec<PlacedWord> {
        self.placed
    }

    /// Seed the grid: uniform orientation, a random word that fits the axis,
    /// a random legal origin. Returns the dictionary index it consumed.
    pub fn place_seed(&mut self, grid: &mut Grid, rng: &mut impl Rng) -> Option<usize> {
        let orientation = if rng.gen_bool(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let axis = match orientation {
            Orientation::Horizontal => grid.cols(),
            Orientation::Vertical => grid.rows(),
        };
        let fitting: Vec<usize> = self
            .dictionary
            .iter()
            .enumerate()
            .filter(|(_, word)| {
                let len = word.chars().count();
                len > 0 && len <= axis
            })
            .map(|(index, _)| index)
            .collect();
        if fitting.is_empty() {
            return None;
        }
        let dict_index = fitting[rng.gen_range(0..fitting.len())];
        let len = self.dictionary[dict_index].chars().count();
        let (row_span, col_span) = match orientation {
            Orientation::Horizontal => (grid.rows(), grid.cols() - len + 1),
            Orientation::Vertical => (grid.rows() - len + 1, grid.cols()),
        };
        let row = rng.gen_range(0..row_span);
        let col = rng.gen_range(0..col_span);
        self.place_at(grid, dict_index, row, col, orientation, false)
            .then_some(dict_index)
    }

    /// Try every orientation and origin for one dictionary word. Failure is
    /// soft; the caller just moves on to its next word.
    pub fn place_word(&mut self, grid: &mut Grid, dict_index: usize, rng: &mut impl Rng) -> bool {
        let len = self.dictionary[dict_index].chars().count();
        let mut orientations = Orientation::BOTH;
        orientations.shuffle(rng);
        for orientation in orientations {
            let (row_span, col_span) = match orientation {
                Orientation::Horizontal => {
                    if len > grid.cols() {
                        continue;
                    }
                    (grid.rows(), grid.cols() - len + 1)
                }
                Orientation::Vertical => {
                    if len > grid.rows() {
                        continue;
                    }
                    (grid.rows() - len + 1, grid.cols())
                }
            };
            let mut origins: Vec<(usize, usize)> = (0..row_span)
                .flat_map(|r| (0..col_span).map(move |c| (r, c)))
                .collect();
            origins.shuffle(rng);
            for (row, col) in origins {
                if self.place_at(grid, dict_index, row, col, orientation, true) {
                    return true;
                }
            }
        }
        debug!(
            "no legal position for {:?}, skipping",
            self.dictionary[dict_index]
        );
        false
    }

    /// Place a specific word at a specific origin, subject to every placement
    /// rule. `require_overlap` is off for the seed word only.
    pub fn place_at(
        &mut self,
        grid: &mut Grid,
        dict_index: usize,
        row: usize,
        col: usize,
        orientation: Orientation,
        require_overlap: bool,
    ) -> bool {
        let word = &self.dictionary[dict_index];
        let Some(plan) = plan_placement(grid, word, row, col, orientation, require_overlap) else {
            return false;
        };
        let phrase = self.placed.len();
        for planned in &plan {
            let mut cell = match grid.get(planned.row, planned.col) {
                Some(cell) => cell.clone(),
                None => return false,
            };
            // uppercase wins over an existing lowercase letter and vice versa
            let stored = match cell.content.letter() {
                Some(existing) if existing.is_uppercase() || planned.letter.is_uppercase() => {
                    planned.letter.to_ascii_uppercase()
                }
                _ => planned.letter,
            };
            cell.content = Content::Letter(stored);
            cell.phrase = Some(phrase);
            cell.orientation = Some(orientation);
            cell.origin = Some((row, col));
            if planned.overlaps {
                cell.overlap = true;
                if cell.background.is_default() {
                    cell.background = Background::Overlap;
                }
            }
            let _ = grid.set(planned.row, planned.col, cell);
        }
        self.placed.push(PlacedWord::new(
            word.clone(),
            row,
            col,
            orientation,
            dict_index,
        ));
        true
    }
}

/// Run the four acceptance rules. Returns the per-cell plan, or `None` when
/// any rule rejects the position.
fn plan_placement(
    grid: &Grid,
    word: &str,
    row: usize,
    col: usize,
    orientation: Orientation,
    require_overlap: bool,
) -> Option<Vec<PlannedCell>> {
    let (dr, dc) = orientation.delta();
    let (pr, pc) = orientation.perpendicular();
    let len = word.chars().count();
    if len == 0 {
        return None;
    }
    let end_r = row as isize + dr * (len as isize - 1);
    let end_c = col as isize + dc * (len as isize - 1);
    if end_r >= grid.rows() as isize || end_c >= grid.cols() as isize {
        return None;
    }

    // axis buffer: the cell before the start and after the end must be empty
    // or out of bounds
    for (r, c) in [
        (row as isize - dr, col as isize - dc),
        (end_r + dr, end_c + dc),
    ] {
        if r >= 0 && c >= 0 {
            if let Some(cell) = grid.get(r as usize, c as usize) {
                if !cell.is_empty() {
                    return None;
                }
            }
        }
    }

    let mut plan = Vec::with_capacity(len);
    let mut overlap_runs = 0usize;
    let mut in_run = false;
    for (i, letter) in word.chars().enumerate() {
        let r = (row as isize + dr * i as isize) as usize;
        let c = (col as isize + dc * i as isize) as usize;
        let cell = grid.get(r, c)?;
        let overlaps = match cell.content {
            Content::Letter(existing) => {
                if !existing.eq_ignore_ascii_case(&letter) {
                    return None;
                }
                true
            }
            Content::Empty => false,
            Content::Hint(_) => return None,
        };
        if overlaps {
            if !in_run {
                overlap_runs += 1;
                in_run = true;
            }
        } else {
            in_run = false;
            // fresh cells must not touch parallel words across the axis
            for sign in [-1, 1] {
                if let Some((ar, ac)) = grid.offset(r, c, (pr * sign, pc * sign)) {
                    if grid.get(ar, ac).is_some_and(|n| n.is_letter()) {
                        return None;
                    }
                }
            }
        }
        plan.push(PlannedCell {
            row: r,
            col: c,
            letter,
            overlaps,
        });
    }
    if require_overlap && overlap_runs == 0 {
        return None;
    }
    // a crossing shares one letter; longer shared stretches or several
    // crossings along one axis read as stacked words
    if overlap_runs > 1 {
        return None;
    }
    Some(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn rejects_conflicting_letters() {
        let dictionary = words(&["cat", "cot"]);
        let mut grid = Grid::new(4, 4);
        let mut placer = WordPlacer::new(&dictionary);
        assert!(placer.place_at(&mut grid, 0, 0, 0, Orientation::Horizontal, false));
        // "cot" across the same cells would overwrite 'a' with 'o'
        assert!(!placer.place_at(&mut grid, 1, 0, 0, Orientation::Horizontal, true));
        assert_eq!(grid.get(0, 1).and_then(|c| c.letter()), Some('a'));
    }

    #[test]
    fn requires_an_overlap_after_the_seed() {
        let dictionary = words(&["cat", "dog"]);
        let mut grid = Grid::new(6, 6);
        let mut placer = WordPlacer::new(&dictionary);
        assert!(placer.place_at(&mut grid, 0, 0, 0, Orientation::Horizontal, false));
        // "dog" shares no letter with "cat" anywhere
        assert!(!placer.place_at(&mut grid, 1, 3, 0, Orientation::Horizontal, true));
    }

    #[test]
    fn rejects_parallel_touching_words() {
        let dictionary = words(&["cat", "cow", "own"]);
        let mut grid = Grid::new(6, 6);
        let mut placer = WordPlacer::new(&dictionary);
        assert!(placer.place_at(&mut grid, 0, 0, 0, Orientation::Horizontal, false));
        assert!(placer.place_at(&mut grid, 1, 0, 0, Orientation::Vertical, true));
        // "own" crosses "cow" at its 'o', but its fresh 'w' would sit right
        // under "cat"'s 'a'
        assert!(!placer.place_at(&mut grid, 2, 1, 0, Orientation::Horizontal, true));
    }

    #[test]
    fn rejects_missing_axis_buffer() {
        let dictionary = words(&["cat", "ate"]);
        let mut grid = Grid::new(6, 6);
        let mut placer = WordPlacer::new(&dictionary);
        assert!(placer.place_at(&mut grid, 0, 0, 0, Orientation::Horizontal, false));
        // "ate" overlaps "at" in place, but 'c' sits right before its start
        assert!(!placer.place_at(&mut grid, 1, 0, 1, Orientation::Horizontal, true));
    }

    #[test]
    fn rejects_a_second_overlap_run() {
        let dictionary = words(&["cat", "dog", "cod"]);
        let mut grid = Grid::new(6, 6);
        let mut placer = WordPlacer::new(&dictionary);
        assert!(placer.place_at(&mut grid, 0, 0, 0, Orientation::Horizontal, false));
        assert!(placer.place_at(&mut grid, 1, 2, 0, Orientation::Horizontal, false));
        // "cod" would cross both "cat" and "dog", two separate shared runs
        assert!(!placer.place_at(&mut grid, 2, 0, 0, Orientation::Vertical, true));
    }

    #[test]
    fn crossing_placement_is_accepted_and_recorded() {
        let dictionary = words(&["cat", "toe"]);
        let mut grid = Grid::new(6, 6);
        let mut placer = WordPlacer::new(&dictionary);
        assert!(placer.place_at(&mut grid, 0, 0, 0, Orientation::Horizontal, false));
        assert!(placer.place_at(&mut grid, 1, 0, 2, Orientation::Vertical, true));

        let crossing = grid.get(0, 2).unwrap();
        assert!(crossing.overlap);
        assert_eq!(crossing.background, Background::Overlap);
        assert_eq!(crossing.letter(), Some('t'));
        assert_eq!(placer.placed().len(), 2);
        for placed in placer.placed() {
            for (i, (r, c)) in placed.positions().into_iter().enumerate() {
                let want = placed.word.chars().nth(i).unwrap();
                let got = grid.get(r, c).and_then(|cell| cell.letter()).unwrap();
                assert!(got.eq_ignore_ascii_case(&want));
            }
        }
    }

    #[test]
    fn uppercase_wins_on_overlap() {
        let dictionary = words(&["cat", "Cut"]);
        let mut grid = Grid::new(4, 4);
        let mut placer = WordPlacer::new(&dictionary);
        assert!(placer.place_at(&mut grid, 0, 0, 0, Orientation::Horizontal, false));
        assert!(placer.place_at(&mut grid, 1, 0, 0, Orientation::Vertical, true));
        assert_eq!(grid.get(0, 0).and_then(|c| c.letter()), Some('C'));
    }

    #[test]
    fn seed_lands_somewhere_legal() {
        let dictionary = words(&["cat", "house", "pony"]);
        let mut grid = Grid::new(8, 8);
        let mut placer = WordPlacer::new(&dictionary);
        let mut rng = StdRng::seed_from_u64(7);
        let index = placer.place_seed(&mut grid, &mut rng).unwrap();
        let placed = &placer.placed()[0];
        assert_eq!(placed.dict_index, index);
        for (i, (r, c)) in placed.positions().into_iter().enumerate() {
            assert_eq!(
                grid.get(r, c).and_then(|cell| cell.letter()),
                placed.word.chars().nth(i)
            );
        }
    }
}

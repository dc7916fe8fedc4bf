use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::hint::HintClass;
use crate::orientation::Orientation;

pub(crate) const CROSS_STEPS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub(crate) const DIAG_STEPS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub(crate) const ALL_STEPS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("position ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// What a cell currently holds. A hint cell stores the bare checksum symbol;
/// its rendered token is `=` followed by that symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Content {
    #[default]
    Empty,
    Letter(char),
    Hint(char),
}

impl Content {
    pub fn letter(self) -> Option<char> {
        match self {
            Content::Letter(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Content::Empty)
    }

    pub fn is_letter(self) -> bool {
        matches!(self, Content::Letter(_))
    }

    pub fn is_hint(self) -> bool {
        matches!(self, Content::Hint(_))
    }
}

/// A single hint color channel. Cross hints paint red, diagonal hints blue,
/// both-class hints green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Red,
    Blue,
    Green,
}

/// Background classes: two unrevealed defaults plus the cumulative hint
/// colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Background {
    #[default]
    Plain,
    Overlap,
    Red,
    Blue,
    Green,
    RedBlue,
    RedGreen,
    BlueGreen,
    RedBlueGreen,
}

impl Background {
    /// True while no hint has painted this cell yet.
    pub fn is_default(self) -> bool {
        matches!(self, Background::Plain | Background::Overlap)
    }

    /// Cumulative blend: a first color replaces the default, a second
    /// distinct color forms the pair, any third distinct color saturates to
    /// all three.
    pub fn blend(self, tint: Tint) -> Background {
        use Background::*;
        match (self, tint) {
            (Plain | Overlap, Tint::Red) => Red,
            (Plain | Overlap, Tint::Blue) => Blue,
            (Plain | Overlap, Tint::Green) => Green,
            (Red, Tint::Red) | (Blue, Tint::Blue) | (Green, Tint::Green) => self,
            (Red, Tint::Blue) | (Blue, Tint::Red) => RedBlue,
            (Red, Tint::Green) | (Green, Tint::Red) => RedGreen,
            (Blue, Tint::Green) | (Green, Tint::Blue) => BlueGreen,
            (RedBlue, Tint::Red | Tint::Blue) => RedBlue,
            (RedGreen, Tint::Red | Tint::Green) => RedGreen,
            (BlueGreen, Tint::Blue | Tint::Green) => BlueGreen,
            _ => RedBlueGreen,
        }
    }
}

/// One grid position, with the bookkeeping the placer and solver need: which
/// phrase owns it, along which axis, from which origin, and whether two words
/// intersect here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub content: Content,
    pub background: Background,
    pub phrase: Option<usize>,
    pub orientation: Option<Orientation>,
    pub origin: Option<(usize, usize)>,
    pub overlap: bool,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_letter(&self) -> bool {
        self.content.is_letter()
    }

    pub fn is_hint(&self) -> bool {
        self.content.is_hint()
    }

    pub fn letter(&self) -> Option<char> {
        self.content.letter()
    }

    /// Rendered token: the letter itself, or `=` plus the checksum symbol.
    pub fn token(&self) -> Option<String> {
        match self.content {
            Content::Empty => None,
            Content::Letter(c) => Some(c.to_string()),
            Content::Hint(s) => Some(format!("={s}")),
        }
    }
}

/// Cross and diagonal views of a cell's 8-neighborhood. Entries are synthetic
/// empty cells when out of bounds or when the real neighbor is a hint cell;
/// hint cells never act as letter neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbors {
    pub cross: [Cell; 4],
    pub diag: [Cell; 4],
}

/// The rectangular cell array. Dimensions are fixed at construction; cells
/// are index-addressed and copied out, changed, and written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Out of bounds is "no cell", not an error.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        (row < self.rows && col < self.cols).then(|| &self.cells[row * self.cols + col])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        (row < self.rows && col < self.cols).then(|| &mut self.cells[row * self.cols + col])
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.cells[row * self.cols + col] = cell;
        Ok(())
    }

    /// Apply a signed step to a position, staying inside the grid.
    pub fn offset(
        &self,
        row: usize,
        col: usize,
        step: (isize, isize),
    ) -> Option<(usize, usize)> {
        let r = row as isize + step.0;
        let c = col as isize + step.1;
        (r >= 0 && c >= 0 && (r as usize) < self.rows && (c as usize) < self.cols)
            .then(|| (r as usize, c as usize))
    }

    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    fn neighbor_view(&self, row: usize, col: usize, step: (isize, isize)) -> Cell {
        self.offset(row, col, step)
            .and_then(|(r, c)| self.get(r, c))
            .filter(|cell| !cell.is_hint())
            .cloned()
            .unwrap_or_default()
    }

    pub fn neighbors(&self, row: usize, col: usize) -> Neighbors {
        Neighbors {
            cross: CROSS_STEPS.map(|step| self.neighbor_view(row, col, step)),
            diag: DIAG_STEPS.map(|step| self.neighbor_view(row, col, step)),
        }
    }

    /// In-bounds neighbor positions for a hint adjacency class, in step
    /// order.
    pub fn neighbor_positions(
        &self,
        row: usize,
        col: usize,
        class: HintClass,
    ) -> Vec<(usize, usize)> {
        class
            .steps()
            .iter()
            .filter_map(|&step| self.offset(row, col, step))
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let glyph = match self.cells[row * self.cols + col].content {
                    Content::Empty => '.',
                    Content::Letter(c) => c,
                    Content::Hint(_) => '=',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_no_cell() {
        let grid = Grid::new(3, 4);
        assert!(grid.get(0, 0).is_some());
        assert!(grid.get(3, 0).is_none());
        assert!(grid.get(0, 4).is_none());
        assert!(matches!(
            Grid::new(3, 4).set(3, 0, Cell::default()),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn neighbors_synthesize_empties_at_the_border() {
        let mut grid = Grid::new(2, 2);
        let mut cell = Cell::default();
        cell.content = Content::Letter('x');
        grid.set(0, 1, cell).unwrap();

        let around = grid.neighbors(0, 0);
        // north and west are out of bounds, east holds the letter
        assert!(around.cross[0].is_empty());
        assert!(around.cross[2].is_empty());
        assert_eq!(around.cross[3].letter(), Some('x'));
    }

    #[test]
    fn hint_neighbors_read_as_empty() {
        let mut grid = Grid::new(2, 2);
        let mut cell = Cell::default();
        cell.content = Content::Hint('k');
        grid.set(0, 1, cell).unwrap();

        let around = grid.neighbors(0, 0);
        assert!(around.cross[3].is_empty());
    }

    #[test]
    fn blend_accumulates_distinct_colors() {
        let plain = Background::Plain;
        assert_eq!(plain.blend(Tint::Red), Background::Red);
        assert_eq!(Background::Overlap.blend(Tint::Blue), Background::Blue);
        assert_eq!(Background::Red.blend(Tint::Red), Background::Red);
        assert_eq!(Background::Red.blend(Tint::Blue), Background::RedBlue);
        assert_eq!(Background::Blue.blend(Tint::Green), Background::BlueGreen);
        assert_eq!(
            Background::RedBlue.blend(Tint::Green),
            Background::RedBlueGreen
        );
        assert_eq!(Background::RedGreen.blend(Tint::Red), Background::RedGreen);
        assert_eq!(
            Background::RedBlueGreen.blend(Tint::Blue),
            Background::RedBlueGreen
        );
    }

    #[test]
    fn token_rendering() {
        let mut cell = Cell::default();
        assert_eq!(cell.token(), None);
        cell.content = Content::Letter('R');
        assert_eq!(cell.token().as_deref(), Some("R"));
        cell.content = Content::Hint('k');
        assert_eq!(cell.token().as_deref(), Some("=k"));
    }
}

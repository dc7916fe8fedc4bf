use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::Base62Codec;
use crate::grid::Grid;
use crate::hint::{Difficulty, Hint, HintClass, HintError, HintPlacer};
use crate::placer::WordPlacer;
use crate::solver::{UniquenessSolver, Verdict};
use crate::word::PlacedWord;

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Generator configuration parameters.
#[derive(Debug, Clone)]
pub struct PuzzleConfig {
    pub rows: usize,
    pub cols: usize,
    /// How many words to aim for, seed included. Placement failures reduce
    /// the actual count.
    pub word_target: usize,
    /// How many checksum hints to aim for before the uniqueness pass.
    pub hint_target: usize,
    /// Difficulty label → sampling weight. Must be non-negative and sum
    /// to 1.0.
    pub difficulty_weights: Vec<(Difficulty, f64)>,
    /// Fixed seed for reproducible puzzles; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Backtracking step budget for one uniqueness pass.
    pub max_solver_steps: u64,
    /// How many disambiguating hints may be added before giving up on
    /// uniqueness.
    pub max_extra_hints: usize,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            rows: 12,
            cols: 12,
            word_target: 8,
            hint_target: 6,
            difficulty_weights: vec![
                (Difficulty::Beginner, 0.35),
                (Difficulty::Apprentice, 0.30),
                (Difficulty::Adept, 0.20),
                (Difficulty::Expert, 0.10),
                (Difficulty::Master, 0.04),
                (Difficulty::Legendary, 0.01),
            ],
            seed: None,
            max_solver_steps: 2_000_000,
            max_extra_hints: 8,
        }
    }
}

impl PuzzleConfig {
    /// Eager validation; generation refuses to start on a bad config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < 2 || self.cols < 2 {
            return Err(ConfigError::DegenerateGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.word_target == 0 {
            return Err(ConfigError::ZeroWordTarget);
        }
        if self.hint_target == 0 {
            return Err(ConfigError::ZeroHintTarget);
        }
        if self
            .difficulty_weights
            .iter()
            .any(|&(_, weight)| !weight.is_finite() || weight < 0.0)
        {
            return Err(ConfigError::NegativeWeight);
        }
        let sum: f64 = self.difficulty_weights.iter().map(|&(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid of {rows}x{cols} cells cannot hold a puzzle")]
    DegenerateGrid { rows: usize, cols: usize },
    #[error("word target must be positive")]
    ZeroWordTarget,
    #[error("hint target must be positive")]
    ZeroHintTarget,
    #[error("difficulty weights must be non-negative and finite")]
    NegativeWeight,
    #[error("difficulty weights sum to {sum}, expected 1.0")]
    WeightSum { sum: f64 },
}

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("dictionary is empty after filtering")]
    EmptyDictionary,
    #[error("no dictionary word fits the grid")]
    NoPlaceableWord,
    #[error("hint placement failed: {0}")]
    Hint(#[from] HintError),
}

/// A finished puzzle: the grid to render plus everything that describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub grid: Grid,
    pub words: Vec<PlacedWord>,
    pub hints: Vec<Hint>,
    /// Whether the solver proved the filling unique. `false` after the retry
    /// budget is the caller's warning signal, not an error.
    pub unique: bool,
}

/// The generation pipeline: place words, place hints, then prove uniqueness,
/// adding disambiguating hints until the puzzle is unique or the budget runs
/// out.
pub struct PuzzleGenerator {
    config: PuzzleConfig,
    dictionary: Vec<String>,
}

impl PuzzleGenerator {
    pub fn new(config: PuzzleConfig) -> Self {
        Self {
            config,
            dictionary: Vec::new(),
        }
    }

    pub fn dictionary(&self) -> &[String] {
        &self.dictionary
    }

    /// Add words, keeping first-seen order and dropping duplicates and words
    /// the hint codec cannot represent.
    pub fn add_words<I>(&mut self, words: I)
    where
        I: IntoIterator<Item = String>,
    {
        let codec = Base62Codec::new();
        for word in words {
            if word.chars().count() < 2 {
                debug!("dropping {word:?}: too short");
                continue;
            }
            if !word.chars().all(|c| codec.is_symbol(c)) {
                debug!("dropping {word:?}: outside the hint alphabet");
                continue;
            }
            if self.dictionary.iter().any(|known| known == &word) {
                continue;
            }
            self.dictionary.push(word);
        }
    }

    pub fn generate(&self) -> Result<Puzzle, GeneratorError> {
        self.config.validate()?;
        if self.dictionary.is_empty() {
            return Err(GeneratorError::EmptyDictionary);
        }
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut grid = Grid::new(self.config.rows, self.config.cols);

        let words = self.place_words(&mut grid, &mut rng)?;
        let mut hint_placer = self.place_hints(&mut grid, &mut rng)?;
        let unique = self.prove_uniqueness(&mut grid, &mut hint_placer, &mut rng)?;

        Ok(Puzzle {
            grid,
            words,
            hints: hint_placer.into_hints(),
            unique,
        })
    }

    fn place_words(
        &self,
        grid: &mut Grid,
        rng: &mut StdRng,
    ) -> Result<Vec<PlacedWord>, GeneratorError> {
        let mut placer = WordPlacer::new(&self.dictionary);
        let seed_index = placer
            .place_seed(grid, rng)
            .ok_or(GeneratorError::NoPlaceableWord)?;

        let mut order: Vec<usize> = (0..self.dictionary.len()).collect();
        order.shuffle(rng);
        let mut placed_count = 1;
        for index in order {
            if placed_count >= self.config.word_target {
                break;
            }
            if index == seed_index {
                continue;
            }
            if placer.place_word(grid, index, rng) {
                placed_count += 1;
            }
        }
        if placed_count < self.config.word_target {
            warn!(
                "placed {placed_count} of {} requested words",
                self.config.word_target
            );
        }
        Ok(placer.into_placed())
    }

    fn place_hints(&self, grid: &mut Grid, rng: &mut StdRng) -> Result<HintPlacer, GeneratorError> {
        let mut placer = HintPlacer::new();
        for _ in 0..self.config.hint_target {
            let difficulty = self.sample_difficulty(rng);
            let class = HintClass::ALL[rng.gen_range(0..HintClass::ALL.len())];
            if !placer.place_with_ladder(grid, class, difficulty, rng)? {
                warn!("skipping a {class:?} hint, no eligible cell at any difficulty");
            }
        }
        Ok(placer)
    }

    fn prove_uniqueness(
        &self,
        grid: &mut Grid,
        hint_placer: &mut HintPlacer,
        rng: &mut StdRng,
    ) -> Result<bool, GeneratorError> {
        let solver = UniquenessSolver::new(&self.dictionary, self.config.max_solver_steps);
        let mut extra = 0usize;
        loop {
            let outcome = solver.solve(grid, hint_placer.hints(), rng);
            match outcome.verdict {
                Verdict::Unique => return Ok(true),
                Verdict::Inconclusive => {
                    warn!("solver budget exhausted, uniqueness unresolved");
                    return Ok(false);
                }
                Verdict::Alternate => {
                    if extra >= self.config.max_extra_hints {
                        warn!("still ambiguous after {extra} extra hints");
                        return Ok(false);
                    }
                    let Some(suggestion) = outcome.suggestion else {
                        warn!("alternate filling found, but no cell can disambiguate it");
                        return Ok(false);
                    };
                    debug!(
                        "adding a {:?} hint at ({}, {}) over {} differing cells",
                        suggestion.class,
                        suggestion.row,
                        suggestion.col,
                        outcome.conflicts.len()
                    );
                    hint_placer.place_at(
                        grid,
                        suggestion.row,
                        suggestion.col,
                        suggestion.class,
                        None,
                    )?;
                    extra += 1;
                }
            }
        }
    }

    fn sample_difficulty(&self, rng: &mut StdRng) -> Difficulty {
        let roll: f64 = rng.gen_range(0.0..1.0);
        let mut acc = 0.0;
        for &(difficulty, weight) in &self.config.difficulty_weights {
            acc += weight;
            if roll < acc {
                return difficulty;
            }
        }
        self.config
            .difficulty_weights
            .last()
            .map(|&(difficulty, _)| difficulty)
            .unwrap_or(Difficulty::Beginner)
    }
}

/// One-call convenience wrapper around the pipeline.
pub fn generate_puzzle(
    words: Vec<String>,
    config: Option<PuzzleConfig>,
) -> Result<Puzzle, GeneratorError> {
    let mut generator = PuzzleGenerator::new(config.unwrap_or_default());
    generator.add_words(words);
    generator.generate()
}

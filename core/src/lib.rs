pub mod codec;
pub mod generator;
pub mod grid;
pub mod hint;
pub mod orientation;
pub mod placer;
pub mod solver;
pub mod word;

pub use codec::{Base62Codec, CodecError};
pub use generator::{
    ConfigError, GeneratorError, Puzzle, PuzzleConfig, PuzzleGenerator, generate_puzzle,
};
pub use grid::{Background, Cell, Content, Grid, Neighbors, Tint};
pub use hint::{Difficulty, Hint, HintClass, HintPlacer, hint_token, hint_value};
pub use orientation::Orientation;
pub use placer::WordPlacer;
pub use solver::{SolveOutcome, Suggestion, UniquenessSolver, Verdict, derive_slots, suggest_hint};
pub use word::PlacedWord;

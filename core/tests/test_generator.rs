use cruxsum_core::generator::{generate_puzzle, ConfigError, GeneratorError, PuzzleConfig};
use cruxsum_core::hint::{hint_value, Difficulty};
use cruxsum_core::Base62Codec;

fn sample_words() -> Vec<String> {
    [
        "cargo", "crate", "trait", "macro", "tokio", "serde", "async", "await", "panic", "tuple",
        "slice", "owned", "boxed", "match",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

fn small_config(seed: u64) -> PuzzleConfig {
    PuzzleConfig {
        rows: 10,
        cols: 10,
        word_target: 6,
        hint_target: 4,
        seed: Some(seed),
        ..PuzzleConfig::default()
    }
}

#[test]
fn generates_a_consistent_puzzle() {
    let puzzle = generate_puzzle(sample_words(), Some(small_config(42))).unwrap();

    assert_eq!(puzzle.grid.rows(), 10);
    assert_eq!(puzzle.grid.cols(), 10);
    assert!(!puzzle.words.is_empty(), "the seed word always places");

    // every placed word reads back from the grid, case-insensitively
    for placed in &puzzle.words {
        for (i, (row, col)) in placed.positions().into_iter().enumerate() {
            let want = placed.word.chars().nth(i).unwrap();
            let got = puzzle
                .grid
                .get(row, col)
                .and_then(|cell| cell.letter())
                .unwrap_or_else(|| panic!("missing letter at ({row}, {col})"));
            assert!(
                got.eq_ignore_ascii_case(&want),
                "cell ({row}, {col}) holds {got:?}, expected {want:?}"
            );
        }
    }
}

#[test]
fn placed_hints_keep_their_checksum() {
    let puzzle = generate_puzzle(sample_words(), Some(small_config(7))).unwrap();
    let codec = Base62Codec::new();

    for hint in &puzzle.hints {
        let cell = puzzle.grid.get(hint.row, hint.col).unwrap();
        assert!(cell.is_hint(), "hint cell at ({}, {})", hint.row, hint.col);
        let symbol = hint_value(&puzzle.grid, &hint.neighbors, &codec).unwrap();
        assert_eq!(
            symbol, hint.symbol,
            "checksum drifted for the hint at ({}, {})",
            hint.row, hint.col
        );
        for &(r, c) in &hint.neighbors {
            assert!(puzzle.grid.get(r, c).is_some_and(|n| n.is_letter()));
        }
    }
}

#[test]
fn same_seed_reproduces_the_puzzle() {
    let first = generate_puzzle(sample_words(), Some(small_config(1234))).unwrap();
    let second = generate_puzzle(sample_words(), Some(small_config(1234))).unwrap();

    assert_eq!(first.grid, second.grid);
    assert_eq!(first.words, second.words);
    assert_eq!(first.hints, second.hints);
    assert_eq!(first.unique, second.unique);
}

#[test]
fn different_seeds_usually_differ() {
    let first = generate_puzzle(sample_words(), Some(small_config(1))).unwrap();
    let second = generate_puzzle(sample_words(), Some(small_config(2))).unwrap();
    // not guaranteed in principle, but a collision here means the seed is
    // being ignored
    assert_ne!(first.grid, second.grid);
}

#[test]
fn rejects_bad_weight_tables() {
    let config = PuzzleConfig {
        difficulty_weights: vec![(Difficulty::Beginner, 0.5), (Difficulty::Master, 0.2)],
        ..small_config(0)
    };
    match generate_puzzle(sample_words(), Some(config)) {
        Err(GeneratorError::Config(ConfigError::WeightSum { .. })) => {}
        other => panic!("expected a weight-sum error, got {other:?}"),
    }

    let config = PuzzleConfig {
        difficulty_weights: vec![(Difficulty::Beginner, 1.5), (Difficulty::Master, -0.5)],
        ..small_config(0)
    };
    match generate_puzzle(sample_words(), Some(config)) {
        Err(GeneratorError::Config(ConfigError::NegativeWeight)) => {}
        other => panic!("expected a negative-weight error, got {other:?}"),
    }
}

#[test]
fn rejects_zero_targets() {
    let config = PuzzleConfig {
        word_target: 0,
        ..small_config(0)
    };
    assert!(matches!(
        generate_puzzle(sample_words(), Some(config)),
        Err(GeneratorError::Config(ConfigError::ZeroWordTarget))
    ));

    let config = PuzzleConfig {
        hint_target: 0,
        ..small_config(0)
    };
    assert!(matches!(
        generate_puzzle(sample_words(), Some(config)),
        Err(GeneratorError::Config(ConfigError::ZeroHintTarget))
    ));
}

#[test]
fn filters_unusable_words() {
    // words with foreign symbols or fewer than two letters never reach the
    // grid
    let words = vec![
        "a".to_string(),
        "naïve".to_string(),
        "with space".to_string(),
        "valid".to_string(),
        "words".to_string(),
    ];
    let puzzle = generate_puzzle(words, Some(small_config(9))).unwrap();
    for placed in &puzzle.words {
        assert!(placed.word == "valid" || placed.word == "words");
    }
}

#[test]
fn empty_dictionary_is_an_error() {
    assert!(matches!(
        generate_puzzle(Vec::new(), Some(small_config(0))),
        Err(GeneratorError::EmptyDictionary)
    ));
}

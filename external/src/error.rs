use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExternalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("word list {0:?} has no usable entries")]
    EmptyWordList(String),

    #[error("word {word:?} contains {symbol:?}, outside the hint alphabet")]
    ForeignSymbol { word: String, symbol: char },

    #[error("word {0:?} is too short to place")]
    WordTooShort(String),
}

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cruxsum_core::Base62Codec;
use serde::{Deserialize, Serialize};

use crate::error::ExternalError;

/// One dictionary entry. The category is free-form and only used for
/// filtering word lists before generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub category: Option<String>,
}

/// An ordered, duplicate-free word dictionary. Order is preserved across
/// loads because the solver iterates candidates in dictionary order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordList {
    pub name: String,
    pub description: Option<String>,
    pub entries: Vec<WordRecord>,
}

impl WordList {
    pub fn new(name: String) -> Self {
        Self {
            name,
            description: None,
            entries: Vec::new(),
        }
    }

    pub fn from_words<I>(name: String, words: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut list = Self::new(name);
        for word in words {
            list.push(WordRecord {
                word,
                category: None,
            });
        }
        list
    }

    /// One word per line; blank lines and `#` comments are skipped.
    pub fn from_text<P: AsRef<Path>>(path: P) -> Result<Self, ExternalError> {
        let file = File::open(&path)?;
        let mut list = Self::new(stem_name(&path));
        for line in BufReader::new(file).lines() {
            let line = line?;
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            list.push(WordRecord {
                word: word.to_string(),
                category: None,
            });
        }
        Ok(list)
    }

    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, ExternalError> {
        let file = File::open(&path)?;
        let mut reader = csv::Reader::from_reader(file);
        let mut list = Self::new(stem_name(&path));
        for result in reader.deserialize() {
            let record: WordRecord = result?;
            list.push(record);
        }
        Ok(list)
    }

    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ExternalError> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, ExternalError> {
        let file = File::open(path)?;
        let list: WordList = serde_json::from_reader(file)?;
        Ok(list)
    }

    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ExternalError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Append an entry, dropping exact duplicates of an earlier word.
    pub fn push(&mut self, record: WordRecord) {
        if self.entries.iter().any(|known| known.word == record.word) {
            return;
        }
        self.entries.push(record);
    }

    /// Every word must be placeable and representable by the hint codec.
    pub fn validate(&self) -> Result<(), ExternalError> {
        if self.entries.is_empty() {
            return Err(ExternalError::EmptyWordList(self.name.clone()));
        }
        let codec = Base62Codec::new();
        for entry in &self.entries {
            if entry.word.chars().count() < 2 {
                return Err(ExternalError::WordTooShort(entry.word.clone()));
            }
            if let Some(symbol) = entry.word.chars().find(|&c| !codec.is_symbol(c)) {
                return Err(ExternalError::ForeignSymbol {
                    word: entry.word.clone(),
                    symbol,
                });
            }
        }
        Ok(())
    }

    /// The dictionary handed to the generator, in list order.
    pub fn words(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.word.clone()).collect()
    }

    pub fn words_by_length(&self, length: usize) -> Vec<&WordRecord> {
        self.entries
            .iter()
            .filter(|entry| entry.word.chars().count() == length)
            .collect()
    }

    pub fn words_by_category(&self, category: &str) -> Vec<&WordRecord> {
        self.entries
            .iter()
            .filter(|entry| entry.category.as_deref() == Some(category))
            .collect()
    }

    pub fn merge(&mut self, other: WordList) {
        for entry in other.entries {
            self.push(entry);
        }
    }
}

fn stem_name<P: AsRef<Path>>(path: &P) -> String {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(words: &[&str]) -> WordList {
        WordList::from_words(
            "test".to_string(),
            words.iter().map(|w| w.to_string()),
        )
    }

    #[test]
    fn keeps_order_and_drops_duplicates() {
        let list = list(&["beta", "alpha", "beta", "gamma"]);
        assert_eq!(list.words(), vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn validates_the_alphabet() {
        assert!(list(&["plain", "words"]).validate().is_ok());
        assert!(matches!(
            list(&["naïve"]).validate(),
            Err(ExternalError::ForeignSymbol { symbol: 'ï', .. })
        ));
        assert!(matches!(
            list(&["x"]).validate(),
            Err(ExternalError::WordTooShort(_))
        ));
        assert!(matches!(
            list(&[]).validate(),
            Err(ExternalError::EmptyWordList(_))
        ));
    }

    #[test]
    fn filters_by_length_and_category() {
        let mut list = list(&["short", "longerword"]);
        list.push(WordRecord {
            word: "themed".to_string(),
            category: Some("theme".to_string()),
        });
        assert_eq!(list.words_by_length(5).len(), 1);
        assert_eq!(list.words_by_category("theme").len(), 1);
    }

    #[test]
    fn json_round_trip() {
        let list = list(&["alpha", "beta"]);
        let path = std::env::temp_dir().join(format!(
            "cruxsum-wordlist-{}.json",
            std::process::id()
        ));
        list.to_json(&path).unwrap();
        let loaded = WordList::from_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.words(), list.words());
        assert_eq!(loaded.name, "test");
    }
}

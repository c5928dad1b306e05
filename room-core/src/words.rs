use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rand::prelude::*;
use room_types::GameError;

/// Immutable word lists keyed by word length. Loaded once at startup;
/// no mutation is exposed after construction.
pub struct WordRepository {
    words_by_length: HashMap<usize, Vec<String>>,
}

/// Lowercases a word and folds accented characters to their base
/// letter, so that "KÂĞIT" and "kagit" compare equal.
pub fn normalize(word: &str) -> String {
    word.chars()
        // Both Turkish capital I's fold straight to ascii 'i'; the
        // generic lowercase of 'İ' would add a combining dot.
        .map(|c| match c {
            'İ' | 'I' => 'ı',
            other => other,
        })
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'ç' => 'c',
            'ğ' => 'g',
            'ı' | 'î' | 'í' | 'ì' => 'i',
            'ö' | 'ô' | 'ó' => 'o',
            'ş' => 's',
            'ü' | 'û' | 'ú' | 'ù' => 'u',
            'â' | 'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            other => other,
        })
        .collect()
}

impl WordRepository {
    /// Build a repository from a newline-separated word list. Blank
    /// lines and `#` comments are skipped; words are stored normalized.
    pub fn new(word_list: &str) -> Self {
        let mut words_by_length: HashMap<usize, Vec<String>> = HashMap::new();
        for line in word_list.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            let word = normalize(word);
            words_by_length
                .entry(word.chars().count())
                .or_default()
                .push(word);
        }
        Self { words_by_length }
    }

    /// Load every `.txt` file under `dir` into one repository.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut combined = String::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read word directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read word list {}", path.display()))?;
                combined.push_str(&contents);
                combined.push('\n');
            }
        }
        Ok(Self::new(&combined))
    }

    /// Pick a uniformly random solution of the given length.
    pub fn random_solution(&self, length: usize) -> Result<String, GameError> {
        self.words_by_length
            .get(&length)
            .and_then(|words| words.choose(&mut rand::rng()))
            .cloned()
            .ok_or(GameError::NoWordsForLength { length })
    }

    /// Dictionary membership, case and diacritic insensitive.
    pub fn is_valid_guess(&self, word: &str) -> bool {
        let folded = normalize(word);
        self.words_by_length
            .get(&folded.chars().count())
            .is_some_and(|words| words.iter().any(|w| *w == folded))
    }

    pub fn word_count_by_length(&self, length: usize) -> usize {
        self.words_by_length
            .get(&length)
            .map_or(0, |words| words.len())
    }
}

//! Answer and guess word lists.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::word::{Word, WordError};

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("could not read word list {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path:?} line {line}: {source}")]
    Word {
        path: PathBuf,
        line: usize,
        #[source]
        source: WordError,
    },
    #[error("the answer list is empty")]
    Empty,
}

/// The two vocabularies of a game.
///
/// `answers` are the words that may be the secret. `guesses` is the extended
/// vocabulary: every answer plus words that are accepted as guesses but are
/// never the secret. Both are sorted and free of duplicates, and there is
/// always at least one answer.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    answers: Vec<Word>,
    guesses: Vec<Word>,
}

impl Vocabulary {
    pub fn from_words(
        answers: impl IntoIterator<Item = Word>,
        extra_guesses: impl IntoIterator<Item = Word>,
    ) -> Result<Self, VocabularyError> {
        let mut answers: Vec<Word> = answers.into_iter().collect();
        answers.sort_unstable();
        answers.dedup();
        if answers.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let mut guesses: Vec<Word> = answers.iter().copied().chain(extra_guesses).collect();
        guesses.sort_unstable();
        guesses.dedup();

        Ok(Self { answers, guesses })
    }

    /// Load the answer list and the extra guess list from line-delimited
    /// files. Blank lines are skipped and words are uppercased.
    pub fn load(
        answers_path: impl AsRef<Path>,
        guesses_path: impl AsRef<Path>,
    ) -> Result<Self, VocabularyError> {
        let answers = read_word_list(answers_path.as_ref())?;
        let guesses = read_word_list(guesses_path.as_ref())?;
        let vocab = Self::from_words(answers, guesses)?;
        log::info!(
            "loaded {} answers and {} guessable words",
            vocab.answers.len(),
            vocab.guesses.len()
        );
        Ok(vocab)
    }

    /// The word lists compiled into the binary.
    pub fn embedded() -> Result<Self, VocabularyError> {
        let path = Path::new("<embedded>");
        let answers = parse_words(include_str!("../dictionary/answers.txt"), path)?;
        let guesses = parse_words(include_str!("../dictionary/guesses.txt"), path)?;
        Self::from_words(answers, guesses)
    }

    pub fn answers(&self) -> &[Word] {
        &self.answers
    }

    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    pub fn is_answer(&self, word: Word) -> bool {
        self.answers.binary_search(&word).is_ok()
    }

    pub fn is_guessable(&self, word: Word) -> bool {
        self.guesses.binary_search(&word).is_ok()
    }
}

fn parse_words(text: &str, path: &Path) -> Result<Vec<Word>, VocabularyError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            Word::new(line).map_err(|source| VocabularyError::Word {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })
        })
        .collect()
}

fn read_word_list(path: &Path) -> Result<Vec<Word>, VocabularyError> {
    let text = fs::read_to_string(path).map_err(|source| VocabularyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_words(&text, path)
}

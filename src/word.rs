//! Five-letter words.
//!
//! A [`Word`] is always exactly [`WORD_LENGTH`] uppercase ASCII letters, so the
//! rest of the crate can index it by position without re-validating.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::WORD_LENGTH;

/// Why a string could not be turned into a [`Word`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("'{0}' is not 5 letters long")]
    Length(String),
    #[error("'{word}' contains '{letter}', which is not a letter A-Z")]
    Letter { word: String, letter: char },
}

/// An immutable five-letter word, stored as uppercase ASCII bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word([u8; WORD_LENGTH]);

impl Word {
    /// Parse a word, ignoring surrounding whitespace and case.
    pub fn new(s: &str) -> Result<Self, WordError> {
        let trimmed = s.trim();
        if let Some(letter) = trimmed.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(WordError::Letter {
                word: trimmed.to_string(),
                letter,
            });
        }
        let bytes: [u8; WORD_LENGTH] = trimmed
            .as_bytes()
            .try_into()
            .map_err(|_| WordError::Length(trimmed.to_string()))?;
        Ok(Self(bytes.map(|b| b.to_ascii_uppercase())))
    }

    pub fn bytes(&self) -> &[u8; WORD_LENGTH] {
        &self.0
    }

    /// Letter at `index` as a `char`.
    pub fn letter(&self, index: usize) -> char {
        self.0[index] as char
    }

    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().map(|&b| b as char)
    }

    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.as_str())
    }
}

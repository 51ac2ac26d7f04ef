//! Feedback calculation for Wordle guesses.
//!
//! This module computes the per-letter classification (green/yellow/gray)
//! of a guess against a target word, and parses the `G`/`Y`/`X` codes a
//! human or an external game reports.

use std::fmt;

use thiserror::Error;

use crate::word::Word;
use crate::WORD_LENGTH;

/// Classification of a single letter of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterClass {
    /// Correct letter in correct position (green)
    Exact,
    /// Letter occurs in the target, but not here (yellow)
    Present,
    /// Letter not in the target, or all its copies already accounted for (gray)
    Absent,
}

impl LetterClass {
    /// Convert to an emoji square for display
    pub fn to_emoji(self) -> char {
        match self {
            LetterClass::Exact => '🟩',
            LetterClass::Present => '🟨',
            LetterClass::Absent => '⬛',
        }
    }

    /// The canonical code letter: G, Y or X.
    pub fn to_code(self) -> char {
        match self {
            LetterClass::Exact => 'G',
            LetterClass::Present => 'Y',
            LetterClass::Absent => 'X',
        }
    }

    /// Parse from a code character (g=green, y=yellow, x/b=gray, or 2/1/0)
    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'g' | '2' => Some(LetterClass::Exact),
            'y' | '1' => Some(LetterClass::Present),
            'x' | 'b' | '0' => Some(LetterClass::Absent),
            _ => None,
        }
    }

    fn digit(self) -> u8 {
        match self {
            LetterClass::Absent => 0,
            LetterClass::Present => 1,
            LetterClass::Exact => 2,
        }
    }
}

/// The five letter classes of a guess, encoded as a single u8 value (0-242).
/// Each position can be 0 (absent), 1 (present), or 2 (exact).
/// Pattern = p0 + 3*p1 + 9*p2 + 27*p3 + 81*p4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern(pub u8);

impl Pattern {
    /// Every position exact: the guess was the target.
    pub const ALL_EXACT: Self = Self(2 + 2 * 3 + 2 * 9 + 2 * 27 + 2 * 81); // 242

    /// Total number of possible patterns (3^5)
    pub const COUNT: usize = 243;

    pub fn new(classes: [LetterClass; WORD_LENGTH]) -> Self {
        let mut pattern: u8 = 0;
        let mut multiplier: u8 = 1;
        for class in classes {
            pattern += class.digit() * multiplier;
            multiplier *= 3;
        }
        Self(pattern)
    }

    pub fn classes(self) -> [LetterClass; WORD_LENGTH] {
        let mut pattern = self.0;
        let mut classes = [LetterClass::Absent; WORD_LENGTH];
        for class in classes.iter_mut() {
            *class = match pattern % 3 {
                0 => LetterClass::Absent,
                1 => LetterClass::Present,
                _ => LetterClass::Exact,
            };
            pattern /= 3;
        }
        classes
    }

    pub fn is_win(self) -> bool {
        self == Self::ALL_EXACT
    }
}

/// Compute only the packed pattern of `guess` against `target`.
///
/// This is the hot path of scoring. Two passes over the positions:
/// - exact matches first, collecting the target letters they did not use;
/// - then, left to right, each remaining guess letter is Present if an
///   unused copy is left in the target (and consumes it), Absent otherwise.
pub fn pattern(guess: Word, target: Word) -> Pattern {
    let guess = guess.bytes();
    let target = target.bytes();

    let mut classes = [LetterClass::Absent; WORD_LENGTH];
    let mut target_remaining = [0u8; 26];

    for i in 0..WORD_LENGTH {
        if guess[i] == target[i] {
            classes[i] = LetterClass::Exact;
        } else {
            target_remaining[(target[i] - b'A') as usize] += 1;
        }
    }

    for i in 0..WORD_LENGTH {
        if classes[i] != LetterClass::Exact {
            let idx = (guess[i] - b'A') as usize;
            if target_remaining[idx] > 0 {
                classes[i] = LetterClass::Present;
                target_remaining[idx] -= 1;
            }
        }
    }

    Pattern::new(classes)
}

/// Classify every letter of `guess` against `target`.
pub fn classify(guess: Word, target: Word) -> Feedback {
    Feedback {
        guess,
        pattern: pattern(guess, target),
    }
}

/// A feedback code that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("feedback '{0}' must be exactly 5 characters")]
    Length(String),
    #[error("'{0}' is not a feedback character; use G (green), Y (yellow) or X (gray)")]
    Character(char),
}

/// The ordered (letter, class) sequence for one guess.
///
/// Two feedbacks are equal iff they were produced for the same guess and
/// every position has the same class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feedback {
    guess: Word,
    pattern: Pattern,
}

impl Feedback {
    pub fn new(guess: Word, classes: [LetterClass; WORD_LENGTH]) -> Self {
        Self {
            guess,
            pattern: Pattern::new(classes),
        }
    }

    /// Parse an externally supplied code such as `"XYGXY"` for `guess`.
    pub fn from_code(guess: Word, code: &str) -> Result<Self, FeedbackError> {
        let code = code.trim();
        let chars: Vec<char> = code.chars().collect();
        let chars: [char; WORD_LENGTH] = chars
            .try_into()
            .map_err(|_| FeedbackError::Length(code.to_string()))?;

        let mut classes = [LetterClass::Absent; WORD_LENGTH];
        for (class, c) in classes.iter_mut().zip(chars) {
            *class = LetterClass::from_code(c).ok_or(FeedbackError::Character(c))?;
        }
        Ok(Self::new(guess, classes))
    }

    pub fn guess(&self) -> Word {
        self.guess
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn classes(&self) -> [LetterClass; WORD_LENGTH] {
        self.pattern.classes()
    }

    /// (letter, class) pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (char, LetterClass)> + '_ {
        self.guess.letters().zip(self.pattern.classes())
    }

    pub fn is_win(&self) -> bool {
        self.pattern.is_win()
    }

    /// Render as a `G`/`Y`/`X` code.
    pub fn code(&self) -> String {
        self.classes().iter().map(|c| c.to_code()).collect()
    }

    pub fn to_emoji_string(&self) -> String {
        self.classes().iter().map(|c| c.to_emoji()).collect()
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.guess, self.to_emoji_string())
    }
}

//! A game instance with a hidden target: six attempts, an accepted-word
//! list, and optional hard mode.
//!
//! The solver can play against a [`Game`] through the [`Oracle`] trait
//! without ever seeing the target.

use std::fmt;

use rand::Rng;
use thiserror::Error;

use crate::feedback::{classify, Feedback, LetterClass};
use crate::solver::{Oracle, OracleError, Outcome, Progress, SessionError, SolveSession};
use crate::vocabulary::Vocabulary;
use crate::word::Word;
use crate::WORD_LENGTH;

pub const MAX_ATTEMPTS: usize = 6;

/// One way a guess breaks the hard mode rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A letter revealed green must stay at its position.
    MissingExact { position: usize, letter: char },
    /// A letter revealed yellow must be used again.
    MissingPresent { letter: char },
    /// A yellow letter may not return to a position it was yellow at.
    RepeatedPresent { position: usize, letter: char },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingExact { position, letter } => {
                write!(f, "position {} must be '{}' (green)", position + 1, letter)
            }
            Violation::MissingPresent { letter } => write!(f, "must include '{}' (yellow)", letter),
            Violation::RepeatedPresent { position, letter } => write!(
                f,
                "'{}' cannot be in position {} (was yellow there)",
                letter,
                position + 1
            ),
        }
    }
}

/// Hard mode constraints from previous guesses
#[derive(Debug, Clone, Default)]
pub struct HardMode {
    /// Letters that must be in specific positions (green)
    required_positions: [Option<char>; WORD_LENGTH],
    /// Letters that must appear somewhere in the word (yellow), with the
    /// positions they were yellow at
    required_letters: Vec<(char, Vec<usize>)>,
}

impl HardMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update constraints based on a guess and its feedback
    pub fn update(&mut self, feedback: &Feedback) {
        for (i, (letter, class)) in feedback.iter().enumerate() {
            match class {
                LetterClass::Exact => {
                    self.required_positions[i] = Some(letter);
                }
                LetterClass::Present => {
                    match self.required_letters.iter_mut().find(|(c, _)| *c == letter) {
                        Some((_, positions)) => {
                            if !positions.contains(&i) {
                                positions.push(i);
                            }
                        }
                        None => self.required_letters.push((letter, vec![i])),
                    }
                }
                LetterClass::Absent => {}
            }
        }
    }

    pub fn violations(&self, guess: Word) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (position, required) in self.required_positions.iter().enumerate() {
            if let Some(letter) = *required {
                if guess.letter(position) != letter {
                    violations.push(Violation::MissingExact { position, letter });
                }
            }
        }

        for (letter, positions) in &self.required_letters {
            if !guess.letters().any(|c| c == *letter) {
                violations.push(Violation::MissingPresent { letter: *letter });
                continue;
            }
            for &position in positions {
                if guess.letter(position) == *letter {
                    violations.push(Violation::RepeatedPresent {
                        position,
                        letter: *letter,
                    });
                }
            }
        }

        violations
    }

    pub fn is_satisfied(&self, guess: Word) -> bool {
        self.violations(guess).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.required_positions.iter().all(|p| p.is_none()) && self.required_letters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{0} is not in the word list")]
    NotInWordList(Word),
    #[error("hard mode violation: {}", join(.0))]
    HardMode(Vec<Violation>),
    #[error("the game is over")]
    Over,
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone)]
pub struct Game<'v> {
    vocab: &'v Vocabulary,
    target: Word,
    history: Vec<Feedback>,
    hard_mode: Option<HardMode>,
    /// Best class seen so far for each letter A-Z
    letters: [Option<LetterClass>; 26],
    won: bool,
}

impl<'v> Game<'v> {
    pub fn new(vocab: &'v Vocabulary, target: Word, hard_mode: bool) -> Self {
        Self {
            vocab,
            target,
            history: Vec::new(),
            hard_mode: hard_mode.then(HardMode::new),
            letters: [None; 26],
            won: false,
        }
    }

    /// A game whose target is drawn from the answer list.
    pub fn random(vocab: &'v Vocabulary, hard_mode: bool, rng: &mut impl Rng) -> Self {
        let answers = vocab.answers();
        let target = answers[rng.gen_range(0..answers.len())];
        Self::new(vocab, target, hard_mode)
    }

    pub fn target(&self) -> Word {
        self.target
    }

    pub fn history(&self) -> &[Feedback] {
        &self.history
    }

    pub fn attempts(&self) -> usize {
        self.history.len()
    }

    pub fn is_hard_mode(&self) -> bool {
        self.hard_mode.is_some()
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// What the guesses so far have revealed about `letter`: `Exact` if it
    /// was ever green, else `Present` if it was ever yellow, `Absent` if it
    /// was only gray, and `None` if it was never guessed.
    pub fn letter_state(&self, letter: char) -> Option<LetterClass> {
        let letter = letter.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return None;
        }
        self.letters[(letter as u8 - b'A') as usize]
    }

    pub fn is_over(&self) -> bool {
        self.won || self.attempts() >= MAX_ATTEMPTS
    }

    /// Check that `guess` would be accepted, without using an attempt.
    pub fn validate(&self, guess: Word) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::Over);
        }
        if !self.vocab.is_guessable(guess) {
            return Err(GameError::NotInWordList(guess));
        }
        if let Some(hard_mode) = &self.hard_mode {
            let violations = hard_mode.violations(guess);
            if !violations.is_empty() {
                return Err(GameError::HardMode(violations));
            }
        }
        Ok(())
    }

    /// Score a guess. A rejected guess does not use an attempt.
    pub fn make_guess(&mut self, guess: Word) -> Result<Feedback, GameError> {
        self.validate(guess)?;

        let feedback = classify(guess, self.target);
        self.history.push(feedback);
        if let Some(hard_mode) = &mut self.hard_mode {
            hard_mode.update(&feedback);
        }
        for (&byte, class) in guess.bytes().iter().zip(feedback.classes()) {
            let slot = &mut self.letters[(byte - b'A') as usize];
            *slot = Some(match (*slot, class) {
                (Some(LetterClass::Exact), _) | (_, LetterClass::Exact) => LetterClass::Exact,
                (Some(LetterClass::Present), _) | (_, LetterClass::Present) => LetterClass::Present,
                _ => LetterClass::Absent,
            });
        }
        if guess == self.target {
            self.won = true;
        }
        log::debug!(
            "attempt {}/{}: {}",
            self.attempts(),
            MAX_ATTEMPTS,
            feedback.code()
        );
        Ok(feedback)
    }
}

impl Game<'_> {
    /// Play one round of `session` against this game.
    ///
    /// Guesses the game would refuse, such as hard mode violations, are
    /// skipped in favour of the next best. Candidates consistent with the
    /// feedback always satisfy hard mode, so a guess is found while the
    /// session is active.
    pub fn step_session(
        &mut self,
        session: &mut SolveSession<'_>,
        progress: &(dyn Fn(Progress) + Sync),
    ) -> Result<Outcome, SessionError> {
        if session.is_finished() {
            return Err(SessionError::Finished);
        }
        if self.is_over() {
            return Err(OracleError::GameOver.into());
        }
        let guess = session
            .next_accepted_guess(|word| self.validate(word).is_ok(), progress)
            .ok_or(SessionError::NoAcceptedGuess)?;
        let feedback = self.evaluate(guess)?;
        session.apply(feedback)
    }

    /// Play rounds until the session finishes or the game is over.
    pub fn run_session(&mut self, session: &mut SolveSession<'_>) -> Result<Outcome, SessionError> {
        loop {
            match self.step_session(session, &|_| {})? {
                Outcome::Continue { .. } => continue,
                finished => return Ok(finished),
            }
        }
    }
}

impl Oracle for Game<'_> {
    fn evaluate(&mut self, guess: Word) -> Result<Feedback, OracleError> {
        self.make_guess(guess).map_err(|err| match err {
            GameError::Over => OracleError::GameOver,
            other => OracleError::Rejected {
                guess,
                reason: other.to_string(),
            },
        })
    }
}

//! # Wordle Solver
//!
//! A multithreaded Wordle solver that picks, at every round, the guess that
//! minimises the expected number of candidate words left afterwards.
//!
//! The pieces, leaves first:
//! - [`feedback`]: classify a guess against a target, duplicate letters included;
//! - [`filter`]: prune candidates to those consistent with observed feedback;
//! - [`scorer`]: expected remaining count and entropy of a guess;
//! - [`solver`]: guess selection and the round loop, driven by an [`Oracle`];
//! - [`game`]: a game instance with a hidden target and hard mode.

pub mod feedback;
pub mod filter;
pub mod game;
pub mod scorer;
pub mod solver;
pub mod vocabulary;
pub mod word;

pub use feedback::{classify, Feedback, FeedbackError, LetterClass, Pattern};
pub use filter::filter;
pub use game::{Game, GameError, HardMode, Violation};
pub use scorer::GuessScore;
pub use solver::{
    choose_guess, rank_guesses, GuessAnalysis, KnownTarget, Oracle, OracleError, Outcome,
    SessionError, SessionState, SolveSession,
};
pub use vocabulary::{Vocabulary, VocabularyError};
pub use word::{Word, WordError};

/// Word length for Wordle
pub const WORD_LENGTH: usize = 5;

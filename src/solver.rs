//! Guess selection and the round loop.
//!
//! Every guess in the pool is scored by the expected number of candidates
//! left after it (see [`crate::scorer`]), plus a half-word penalty when the
//! guess cannot itself be the answer. The lowest score wins; ties go to the
//! lexicographically smallest word so that a solve is reproducible.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::feedback::{classify, Feedback};
use crate::filter::filter;
use crate::scorer;
use crate::vocabulary::Vocabulary;
use crate::word::Word;

/// Added to the score of guesses that cannot be the answer.
pub const NOT_AN_ANSWER_PENALTY: f64 = 0.5;

/// How far the scoring of one round has got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub scored: usize,
    pub total: usize,
}

/// Result of analyzing a potential guess
#[derive(Debug, Clone, PartialEq)]
pub struct GuessAnalysis {
    pub word: Word,
    pub expected_remaining: f64,
    pub entropy: f64,
    pub is_possible_answer: bool,
    /// `expected_remaining`, plus the penalty if the word is not a possible answer.
    pub score: f64,
}

impl GuessAnalysis {
    fn new(word: Word, targets: &[Word], is_possible_answer: bool) -> Self {
        let s = scorer::score(word, targets);
        let penalty = if is_possible_answer {
            0.0
        } else {
            NOT_AN_ANSWER_PENALTY
        };
        Self {
            word,
            expected_remaining: s.expected_remaining,
            entropy: s.entropy,
            is_possible_answer,
            score: s.expected_remaining + penalty,
        }
    }
}

/// Score a single guess against `targets`.
pub fn analyse(word: Word, targets: &[Word]) -> GuessAnalysis {
    GuessAnalysis::new(word, targets, targets.contains(&word))
}

fn by_score(a: &GuessAnalysis, b: &GuessAnalysis) -> Ordering {
    a.score.total_cmp(&b.score).then(a.word.cmp(&b.word))
}

/// Guesses worth scoring: only the targets themselves once two or fewer
/// remain, otherwise targets and allowed guesses together.
fn candidate_pool(targets: &[Word], allowed: &[Word]) -> Vec<Word> {
    let mut pool: Vec<Word> = if targets.len() <= 2 {
        targets.to_vec()
    } else {
        targets.iter().chain(allowed).copied().collect()
    };
    pool.sort_unstable();
    pool.dedup();
    pool
}

fn analyse_pool(
    targets: &[Word],
    allowed: &[Word],
    progress: &(dyn Fn(Progress) + Sync),
) -> Vec<GuessAnalysis> {
    let pool = candidate_pool(targets, allowed);
    let answers: FxHashSet<Word> = targets.iter().copied().collect();
    let total = pool.len();
    let scored = AtomicUsize::new(0);

    log::debug!(
        "scoring {} guesses against {} possible targets",
        total,
        targets.len()
    );

    pool.par_iter()
        .map(|&word| {
            let analysis = GuessAnalysis::new(word, targets, answers.contains(&word));
            let done = scored.fetch_add(1, AtomicOrdering::Relaxed) + 1;
            progress(Progress {
                scored: done,
                total,
            });
            analysis
        })
        .collect()
}

/// Pick the guess with the lowest score. `None` only if `targets` is empty.
pub fn choose_guess(targets: &[Word], allowed: &[Word]) -> Option<Word> {
    choose_guess_with_progress(targets, allowed, &|_| {})
}

/// [`choose_guess`], reporting each scored candidate to `progress`.
///
/// `progress` may be called concurrently from worker threads.
pub fn choose_guess_with_progress(
    targets: &[Word],
    allowed: &[Word],
    progress: &(dyn Fn(Progress) + Sync),
) -> Option<Word> {
    match targets {
        [] => None,
        [only] => Some(*only),
        _ => analyse_pool(targets, allowed, progress)
            .into_par_iter()
            .min_by(by_score)
            .map(|best| best.word),
    }
}

/// The `n` best guesses, best first.
pub fn rank_guesses(targets: &[Word], allowed: &[Word], n: usize) -> Vec<GuessAnalysis> {
    match targets {
        _ if n == 0 => vec![],
        [] => vec![],
        [only] => vec![GuessAnalysis::new(*only, targets, true)],
        _ => {
            let mut analyses = analyse_pool(targets, allowed, &|_| {});
            analyses.par_sort_unstable_by(by_score);
            analyses.truncate(n);
            analyses
        }
    }
}

/// Source of feedback for the solver's guesses: a known target, a live game,
/// or a human reading the board.
pub trait Oracle {
    fn evaluate(&mut self, guess: Word) -> Result<Feedback, OracleError>;
}

#[derive(Debug, Error)]
pub enum OracleError {
    /// The guess was refused; nothing about the session should change.
    #[error("guess {guess} was rejected: {reason}")]
    Rejected { guess: Word, reason: String },
    #[error("the game is over")]
    GameOver,
    #[error("no more feedback is available")]
    Closed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Offline oracle: scores guesses against a target the caller knows.
#[derive(Debug, Clone, Copy)]
pub struct KnownTarget(pub Word);

impl Oracle for KnownTarget {
    fn evaluate(&mut self, guess: Word) -> Result<Feedback, OracleError> {
        Ok(classify(guess, self.0))
    }
}

impl<F> Oracle for F
where
    F: FnMut(Word) -> Result<Feedback, OracleError>,
{
    fn evaluate(&mut self, guess: Word) -> Result<Feedback, OracleError> {
        self(guess)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Solved,
    Exhausted,
}

/// What happened after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue { remaining: usize },
    Solved { rounds: usize },
    /// No known answer fits the feedback: a bad feedback entry, or a secret
    /// outside the answer list.
    Exhausted { rounds: usize },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("the session has already finished")]
    Finished,
    #[error("none of the remaining guesses is accepted")]
    NoAcceptedGuess,
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// The state of one solve: remaining candidates and every guess so far.
#[derive(Debug, Clone)]
pub struct SolveSession<'v> {
    vocab: &'v Vocabulary,
    candidates: Vec<Word>,
    history: Vec<Feedback>,
    state: SessionState,
}

impl<'v> SolveSession<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self {
            vocab,
            candidates: vocab.answers().to_vec(),
            history: Vec::new(),
            state: SessionState::Active,
        }
    }

    /// Start from guesses already made elsewhere.
    ///
    /// Replay stops at the first entry that finishes the session; anything
    /// after it is ignored.
    pub fn resume(
        vocab: &'v Vocabulary,
        history: impl IntoIterator<Item = Feedback>,
    ) -> Self {
        let mut session = Self::new(vocab);
        for feedback in history {
            if session.apply(feedback).is_err() {
                log::warn!("ignoring {} after the session finished", feedback);
                break;
            }
        }
        session
    }

    pub fn candidates(&self) -> &[Word] {
        &self.candidates
    }

    pub fn history(&self) -> &[Feedback] {
        &self.history
    }

    /// Number of guesses applied so far.
    pub fn round(&self) -> usize {
        self.history.len()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state != SessionState::Active
    }

    pub fn outcome(&self) -> Outcome {
        match self.state {
            SessionState::Active => Outcome::Continue {
                remaining: self.candidates.len(),
            },
            SessionState::Solved => Outcome::Solved {
                rounds: self.round(),
            },
            SessionState::Exhausted => Outcome::Exhausted {
                rounds: self.round(),
            },
        }
    }

    pub fn next_guess(&self) -> Option<Word> {
        self.next_guess_with_progress(&|_| {})
    }

    pub fn next_guess_with_progress(&self, progress: &(dyn Fn(Progress) + Sync)) -> Option<Word> {
        if self.is_finished() {
            return None;
        }
        choose_guess_with_progress(&self.candidates, self.vocab.guesses(), progress)
    }

    /// The best-ranked guess that `accept` allows, or `None` if it allows
    /// none of them.
    ///
    /// Ranking is the same as for [`next_guess`](Self::next_guess), so an
    /// `accept` that allows every word gives the same guess. Callers use this
    /// to respect rules the solver does not know about, such as a game in
    /// hard mode.
    pub fn next_accepted_guess(
        &self,
        accept: impl Fn(Word) -> bool,
        progress: &(dyn Fn(Progress) + Sync),
    ) -> Option<Word> {
        if self.is_finished() {
            return None;
        }
        match self.candidates.as_slice() {
            [] => None,
            [only] => Some(*only).filter(|&word| accept(word)),
            targets => {
                let mut analyses = analyse_pool(targets, self.vocab.guesses(), progress);
                analyses.par_sort_unstable_by(by_score);
                analyses
                    .into_iter()
                    .map(|analysis| analysis.word)
                    .find(|&word| accept(word))
            }
        }
    }

    /// Record the feedback for a guess and prune the candidates.
    pub fn apply(&mut self, feedback: Feedback) -> Result<Outcome, SessionError> {
        if self.is_finished() {
            return Err(SessionError::Finished);
        }
        self.history.push(feedback);

        if feedback.is_win() {
            self.state = SessionState::Solved;
            log::info!("solved {} in {} guesses", feedback.guess(), self.round());
            return Ok(self.outcome());
        }

        let before = self.candidates.len();
        self.candidates = filter(&self.candidates, feedback.guess(), &feedback);
        log::debug!(
            "round {}: {} {} left {} of {} candidates",
            self.round(),
            feedback.guess(),
            feedback.code(),
            self.candidates.len(),
            before
        );

        if self.candidates.is_empty() {
            self.state = SessionState::Exhausted;
            log::warn!(
                "no known answer matches the feedback after {} guesses",
                self.round()
            );
        }
        Ok(self.outcome())
    }

    /// Play one round: choose a guess, ask the oracle, apply its answer.
    ///
    /// If the oracle fails or rejects the guess, the session is unchanged.
    pub fn step(&mut self, oracle: &mut impl Oracle) -> Result<Outcome, SessionError> {
        self.step_with_progress(oracle, &|_| {})
    }

    pub fn step_with_progress(
        &mut self,
        oracle: &mut impl Oracle,
        progress: &(dyn Fn(Progress) + Sync),
    ) -> Result<Outcome, SessionError> {
        let guess = self
            .next_guess_with_progress(progress)
            .ok_or(SessionError::Finished)?;
        let feedback = oracle.evaluate(guess)?;
        self.apply(feedback)
    }

    /// Play rounds until the session is solved or exhausted.
    pub fn run(&mut self, oracle: &mut impl Oracle) -> Result<Outcome, SessionError> {
        loop {
            match self.step(oracle)? {
                Outcome::Continue { .. } => continue,
                finished => return Ok(finished),
            }
        }
    }
}

/// Solve offline for `target` and return the feedback of every round.
pub fn solve_target(vocab: &Vocabulary, target: Word) -> (Vec<Feedback>, Outcome) {
    solve_target_from(vocab, target, None)
}

fn solve_target_from(
    vocab: &Vocabulary,
    target: Word,
    opening: Option<Word>,
) -> (Vec<Feedback>, Outcome) {
    let mut session = SolveSession::new(vocab);
    let mut next = opening;
    loop {
        let guess = match next.take().or_else(|| session.next_guess()) {
            Some(guess) => guess,
            None => break,
        };
        match session.apply(classify(guess, target)) {
            Ok(Outcome::Continue { .. }) => continue,
            Ok(_) | Err(_) => break,
        }
    }
    let outcome = session.outcome();
    (session.history, outcome)
}

/// How many rounds the solver needed across a set of targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuessDistribution {
    /// (rounds, number of targets solved in that many rounds), ascending.
    pub counts: Vec<(usize, usize)>,
    /// Targets the solver could not find.
    pub unsolved: Vec<Word>,
}

impl GuessDistribution {
    pub fn solved(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    pub fn average(&self) -> f64 {
        let total_rounds: usize = self.counts.iter().map(|(g, c)| g * c).sum();
        match self.solved() {
            0 => 0.0,
            n => total_rounds as f64 / n as f64,
        }
    }

    pub fn max(&self) -> Option<usize> {
        self.counts.last().map(|&(g, _)| g)
    }

    pub fn min(&self) -> Option<usize> {
        self.counts.first().map(|&(g, _)| g)
    }
}

/// Solve every target in parallel and tally the rounds each one took.
pub fn guess_distribution(vocab: &Vocabulary, targets: &[Word]) -> GuessDistribution {
    // Every solve starts from the same full answer list, so the opening
    // guess is the same for all of them.
    let opening = choose_guess(vocab.answers(), vocab.guesses());

    let results: Vec<(Word, Outcome)> = targets
        .par_iter()
        .map(|&target| (target, solve_target_from(vocab, target, opening).1))
        .collect();

    let max_rounds = results
        .iter()
        .filter_map(|(_, o)| match o {
            Outcome::Solved { rounds } => Some(*rounds),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    let mut tally = vec![0usize; max_rounds + 1];
    let mut unsolved = Vec::new();

    for (target, outcome) in results {
        match outcome {
            Outcome::Solved { rounds } => tally[rounds] += 1,
            _ => unsolved.push(target),
        }
    }

    GuessDistribution {
        counts: tally
            .into_iter()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .collect(),
        unsolved,
    }
}

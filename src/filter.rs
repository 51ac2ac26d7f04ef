//! Pruning candidates against observed feedback.

use crate::feedback::{pattern, Feedback};
use crate::word::Word;

/// Keep the candidates that would have produced `observed` had they been the
/// target.
///
/// Each candidate is re-classified against the guess and compared with the
/// full ordered feedback, so duplicate letters are handled by the same rule
/// that generated the feedback. The input is left untouched and the result
/// keeps its order.
pub fn filter(candidates: &[Word], guess: Word, observed: &Feedback) -> Vec<Word> {
    if guess != observed.guess() {
        return Vec::new();
    }
    let wanted = observed.pattern();
    candidates
        .iter()
        .copied()
        .filter(|&word| pattern(guess, word) == wanted)
        .collect()
}

/// Does `word` agree with every feedback in `history`?
pub fn is_consistent(word: Word, history: &[Feedback]) -> bool {
    history
        .iter()
        .all(|fb| pattern(fb.guess(), word) == fb.pattern())
}

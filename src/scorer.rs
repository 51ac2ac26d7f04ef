//! Scoring a guess by how well it splits the remaining targets.
//!
//! Possible targets are bucketed by the feedback pattern each would produce
//! against the guess. With `n` targets and a bucket of size `c`, the bucket
//! contributes `c * c / n` to the expected remaining count and
//! `-(c / n) * log2(c / n)` to the entropy.

use crate::feedback::{pattern, Pattern};
use crate::word::Word;

/// Both measures for one guess against one target set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GuessScore {
    /// Expected size of the candidate set after this guess, with the target
    /// uniformly distributed over the current candidates. Lower is better.
    pub expected_remaining: f64,
    /// Shannon entropy of the feedback distribution, in bits.
    pub entropy: f64,
}

fn bucket_sizes(guess: Word, targets: &[Word]) -> [u32; Pattern::COUNT] {
    let mut counts = [0u32; Pattern::COUNT];
    for &target in targets {
        counts[pattern(guess, target).0 as usize] += 1;
    }
    counts
}

pub fn score(guess: Word, targets: &[Word]) -> GuessScore {
    if targets.is_empty() {
        return GuessScore::default();
    }
    let n = targets.len() as f64;

    let mut result = GuessScore::default();
    for &count in bucket_sizes(guess, targets).iter().filter(|&&c| c > 0) {
        let c = count as f64;
        let p = c / n;
        result.expected_remaining += p * c;
        result.entropy -= p * p.log2();
    }
    result
}

pub fn expected_remaining(guess: Word, targets: &[Word]) -> f64 {
    score(guess, targets).expected_remaining
}

pub fn entropy(guess: Word, targets: &[Word]) -> f64 {
    score(guess, targets).entropy
}

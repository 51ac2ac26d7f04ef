use proptest::prelude::*;
use wordle_solver::{classify, Feedback, FeedbackError, LetterClass, Pattern, Word};

use wordle_solver::LetterClass::{Absent, Exact, Present};

fn word(s: &str) -> Word {
    s.parse().unwrap()
}

fn classes(guess: &str, target: &str) -> [LetterClass; 5] {
    classify(word(guess), word(target)).classes()
}

#[test]
fn test_all_correct() {
    let feedback = classify(word("crane"), word("crane"));
    assert!(feedback.is_win());
    assert_eq!(feedback.pattern(), Pattern::ALL_EXACT);
    assert_eq!(feedback.code(), "GGGGG");
}

#[test]
fn test_all_absent() {
    assert_eq!(classes("quick", "dream"), [Absent; 5]);
}

#[test]
fn test_mixed_feedback() {
    assert_eq!(
        classes("crane", "charm"),
        [Exact, Present, Exact, Absent, Absent]
    );
}

#[test]
fn test_exact_letters_are_not_reported_again() {
    // A matches in place; the other letters of CRANE are not in SLATE.
    assert_eq!(
        classes("crane", "slate"),
        [Absent, Absent, Exact, Absent, Exact]
    );
}

#[test]
fn test_duplicate_letters_both_present() {
    // ERASE has two Es, so both Es of SPEED are yellow.
    assert_eq!(
        classes("speed", "erase"),
        [Present, Absent, Present, Present, Absent]
    );
}

#[test]
fn test_duplicate_letters_in_guess() {
    assert_eq!(
        classes("speed", "creep"),
        [Absent, Present, Exact, Exact, Absent]
    );
}

#[test]
fn test_duplicate_letters_in_target() {
    assert_eq!(
        classes("arose", "creep"),
        [Absent, Exact, Absent, Absent, Present]
    );
}

#[test]
fn test_duplicate_guess_limited_target() {
    assert_eq!(
        classes("geese", "creep"),
        [Absent, Present, Exact, Absent, Absent]
    );
}

#[test]
fn test_specific_wordle_cases() {
    assert_eq!(
        classes("sores", "those"),
        [Present, Present, Absent, Present, Absent]
    );
}

#[test]
fn test_feedback_keeps_letters_in_order() {
    let feedback = classify(word("crane"), word("charm"));
    let letters: String = feedback.iter().map(|(c, _)| c).collect();
    assert_eq!(letters, "CRANE");
    assert_eq!(feedback.guess(), word("CRANE"));
}

#[test]
fn test_from_code() {
    let guess = word("crane");
    let feedback = Feedback::from_code(guess, "gybbb").unwrap();
    assert_eq!(
        feedback.classes(),
        [Exact, Present, Absent, Absent, Absent]
    );
    assert_eq!(Feedback::from_code(guess, "21000").unwrap(), feedback);
    assert_eq!(Feedback::from_code(guess, " GYXXX\n").unwrap(), feedback);
    assert_eq!(feedback, Feedback::new(guess, [Exact, Present, Absent, Absent, Absent]));
}

#[test]
fn test_from_code_invalid() {
    let guess = word("crane");
    assert_eq!(
        Feedback::from_code(guess, "gybbb1"),
        Err(FeedbackError::Length("gybbb1".into()))
    );
    assert_eq!(
        Feedback::from_code(guess, "gybb"),
        Err(FeedbackError::Length("gybb".into()))
    );
    assert_eq!(
        Feedback::from_code(guess, "gybzb"),
        Err(FeedbackError::Character('z'))
    );
}

#[test]
fn test_same_classes_for_different_guesses_differ() {
    let a = Feedback::from_code(word("crane"), "XXXXX").unwrap();
    let b = Feedback::from_code(word("slate"), "XXXXX").unwrap();
    assert_eq!(a.pattern(), b.pattern());
    assert_ne!(a, b);
}

#[test]
fn test_code_and_emoji_display() {
    let feedback = Feedback::new(word("crane"), [Exact, Present, Absent, Absent, Exact]);
    assert_eq!(feedback.code(), "GYXXG");
    assert_eq!(feedback.to_emoji_string(), "🟩🟨⬛⬛🟩");
    assert_eq!(feedback.to_string(), "CRANE 🟩🟨⬛⬛🟩");
}

fn count(w: Word, letter: u8) -> usize {
    w.bytes().iter().filter(|&&b| b == letter).count()
}

proptest! {
    // A small alphabet makes repeated letters common.
    #[test]
    fn exact_iff_letters_match(g in "[A-E]{5}", t in "[A-E]{5}") {
        let (guess, target) = (word(&g), word(&t));
        let feedback = classify(guess, target);
        for (i, class) in feedback.classes().iter().enumerate() {
            prop_assert_eq!(*class == Exact, guess.bytes()[i] == target.bytes()[i]);
        }
        prop_assert_eq!(feedback.is_win(), guess == target);
    }

    #[test]
    fn marked_copies_never_exceed_target_copies(g in "[A-E]{5}", t in "[A-E]{5}") {
        let (guess, target) = (word(&g), word(&t));
        let feedback = classify(guess, target);
        for letter in b'A'..=b'E' {
            let marked = guess
                .bytes()
                .iter()
                .zip(feedback.classes())
                .filter(|(b, class)| **b == letter && *class != Absent)
                .count();
            prop_assert_eq!(marked, count(guess, letter).min(count(target, letter)));
        }
    }

    #[test]
    fn code_parses_back(g in "[A-Z]{5}", t in "[A-Z]{5}") {
        let feedback = classify(word(&g), word(&t));
        prop_assert_eq!(Feedback::from_code(feedback.guess(), &feedback.code()), Ok(feedback));
    }
}

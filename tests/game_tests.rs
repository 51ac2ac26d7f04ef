use rand::rngs::StdRng;
use rand::SeedableRng;
use wordle_solver::game::MAX_ATTEMPTS;
use wordle_solver::{
    classify, Game, GameError, HardMode, LetterClass, Oracle, OracleError, Outcome, SessionError,
    SolveSession, Violation, Vocabulary, Word,
};

fn word(s: &str) -> Word {
    s.parse().unwrap()
}

fn words(list: &[&str]) -> Vec<Word> {
    list.iter().map(|s| word(s)).collect()
}

fn test_vocab() -> Vocabulary {
    Vocabulary::from_words(
        words(&["crane", "crate", "trace", "slate", "brave", "stare"]),
        words(&["roate"]),
    )
    .unwrap()
}

#[test]
fn test_hard_mode_requires_greens() {
    let mut hard = HardMode::new();
    assert!(hard.is_empty());
    hard.update(&classify(word("crane"), word("crate")));
    assert!(!hard.is_empty());

    assert_eq!(
        hard.violations(word("slate")),
        vec![
            Violation::MissingExact {
                position: 0,
                letter: 'C'
            },
            Violation::MissingExact {
                position: 1,
                letter: 'R'
            },
        ]
    );
    assert!(hard.is_satisfied(word("crate")));
}

#[test]
fn test_hard_mode_requires_yellows_elsewhere() {
    let mut hard = HardMode::new();
    hard.update(&classify(word("crane"), word("trace")));

    assert!(hard.is_satisfied(word("trace")));
    assert_eq!(
        hard.violations(word("brave")),
        vec![Violation::MissingPresent { letter: 'C' }]
    );
    assert_eq!(
        hard.violations(word("crate")),
        vec![Violation::RepeatedPresent {
            position: 0,
            letter: 'C'
        }]
    );
}

#[test]
fn test_violation_messages() {
    let err = GameError::HardMode(vec![
        Violation::MissingExact {
            position: 0,
            letter: 'C',
        },
        Violation::MissingPresent { letter: 'R' },
    ]);
    assert_eq!(
        err.to_string(),
        "hard mode violation: position 1 must be 'C' (green); must include 'R' (yellow)"
    );
}

#[test]
fn test_unknown_word_does_not_use_an_attempt() {
    let vocab = test_vocab();
    let mut game = Game::new(&vocab, word("crate"), false);

    assert_eq!(
        game.make_guess(word("zzzzz")),
        Err(GameError::NotInWordList(word("zzzzz")))
    );
    assert_eq!(game.attempts(), 0);

    // Extra guess words are accepted even though they are never the answer.
    let feedback = game.make_guess(word("roate")).unwrap();
    assert_eq!(feedback, classify(word("roate"), word("crate")));
    assert_eq!(game.attempts(), 1);
}

#[test]
fn test_hard_mode_game() {
    let vocab = test_vocab();
    let mut game = Game::new(&vocab, word("crate"), true);
    assert!(game.is_hard_mode());

    game.make_guess(word("crane")).unwrap();
    assert!(matches!(
        game.make_guess(word("slate")),
        Err(GameError::HardMode(_))
    ));
    assert_eq!(game.attempts(), 1);

    let feedback = game.make_guess(word("crate")).unwrap();
    assert!(feedback.is_win());
    assert!(game.is_won());
    assert!(game.is_over());
    assert_eq!(game.make_guess(word("crate")), Err(GameError::Over));
    assert_eq!(game.history().len(), 2);
}

#[test]
fn test_game_over_after_max_attempts() {
    let vocab = test_vocab();
    let mut game = Game::new(&vocab, word("crate"), false);
    for _ in 0..MAX_ATTEMPTS {
        assert!(!game.is_over());
        game.make_guess(word("slate")).unwrap();
    }
    assert!(game.is_over());
    assert!(!game.is_won());
    assert_eq!(game.make_guess(word("crate")), Err(GameError::Over));
    assert!(matches!(
        game.evaluate(word("crate")),
        Err(OracleError::GameOver)
    ));
}

#[test]
fn test_game_as_oracle() {
    let vocab = test_vocab();
    let mut game = Game::new(&vocab, word("stare"), false);

    match game.evaluate(word("zzzzz")) {
        Err(OracleError::Rejected { guess, reason }) => {
            assert_eq!(guess, word("zzzzz"));
            assert!(reason.contains("not in the word list"));
        }
        other => panic!("expected a rejection, got {:?}", other),
    }
    assert_eq!(
        game.evaluate(word("crane")).unwrap(),
        classify(word("crane"), word("stare"))
    );
}

#[test]
fn test_random_game() {
    let vocab = test_vocab();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let game = Game::random(&vocab, false, &mut rng);
        assert!(vocab.is_answer(game.target()));
        assert_eq!(game.attempts(), 0);
    }
}

#[test]
fn test_solver_beats_game() {
    let vocab = test_vocab();
    for &target in vocab.answers() {
        let mut game = Game::new(&vocab, target, false);
        let mut session = SolveSession::new(&vocab);
        let outcome = session.run(&mut game).unwrap();

        assert!(matches!(outcome, Outcome::Solved { rounds } if rounds <= MAX_ATTEMPTS));
        assert!(game.is_won());
        assert_eq!(game.history(), session.history());
    }
}

#[test]
fn test_letter_states() {
    let vocab = test_vocab();
    let mut game = Game::new(&vocab, word("crate"), false);
    assert_eq!(game.letter_state('C'), None);

    game.make_guess(word("trace")).unwrap();
    assert_eq!(game.letter_state('t'), Some(LetterClass::Present));
    assert_eq!(game.letter_state('R'), Some(LetterClass::Exact));
    assert_eq!(game.letter_state('C'), Some(LetterClass::Present));

    // A later green upgrades a yellow.
    game.make_guess(word("crane")).unwrap();
    assert_eq!(game.letter_state('C'), Some(LetterClass::Exact));
    assert_eq!(game.letter_state('N'), Some(LetterClass::Absent));
    game.make_guess(word("stare")).unwrap();
    assert_eq!(game.letter_state('T'), Some(LetterClass::Present));
    assert_eq!(game.letter_state('S'), Some(LetterClass::Absent));
    assert_eq!(game.letter_state('?'), None);
}

#[test]
fn test_hard_mode_game_skips_refused_guesses() {
    let vocab = Vocabulary::embedded().unwrap();
    let mut game = Game::new(&vocab, word("crane"), true);
    let mut session = SolveSession::new(&vocab);

    game.step_session(&mut session, &|_| {}).unwrap();
    assert_eq!(session.round(), 1);

    // The unrestricted best guess drops the green E, which hard mode refuses.
    let unrestricted = session.next_guess().unwrap();
    assert!(matches!(
        game.validate(unrestricted),
        Err(GameError::HardMode(_))
    ));

    let outcome = game.run_session(&mut session).unwrap();
    assert!(matches!(outcome, Outcome::Solved { .. }));
    assert!(game.is_won());
    assert_eq!(game.history(), session.history());
}

#[test]
fn test_hard_mode_games_are_never_refused() {
    let vocab = Vocabulary::embedded().unwrap();
    for &target in vocab.answers().iter().step_by(200) {
        let mut game = Game::new(&vocab, target, true);
        let mut session = SolveSession::new(&vocab);
        match game.run_session(&mut session) {
            Ok(outcome) => {
                assert_eq!(outcome, Outcome::Solved { rounds: game.attempts() });
                assert!(game.is_won());
            }
            // Hard mode can run out of attempts, but never refuses a guess.
            Err(SessionError::Oracle(OracleError::GameOver)) => assert!(game.is_over()),
            Err(err) => panic!("{} failed: {}", target, err),
        }
        assert_eq!(game.history(), session.history());
    }
}

#[test]
fn test_step_session_after_finish() {
    let vocab = test_vocab();
    let mut game = Game::new(&vocab, word("slate"), false);
    let mut session = SolveSession::new(&vocab);
    game.run_session(&mut session).unwrap();
    assert!(matches!(
        game.step_session(&mut session, &|_| {}),
        Err(SessionError::Finished)
    ));
}

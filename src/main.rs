//! Wordle Solver CLI
//!
//! Offline solving, solving with human-supplied feedback, playing against a
//! game instance, and an interactive assistant.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rand::seq::SliceRandom;
use rand::thread_rng;

use wordle_solver::game::MAX_ATTEMPTS;
use wordle_solver::solver::{analyse, guess_distribution, GuessDistribution, Progress};
use wordle_solver::{
    rank_guesses, Feedback, Game, GuessAnalysis, KnownTarget, Oracle, OracleError, Outcome,
    SessionError, SolveSession, Vocabulary, Word,
};

const BANNER_TEXT: &str = include_str!("text/banner.txt");
const THINKING: &str = "Computing optimal guess...";

#[derive(Parser)]
#[clap(name = "wordle-solver", version)]
#[clap(about = "Solve Wordle by minimising the expected number of remaining words", long_about = None)]
struct Cli {
    /// Answer word list, one word per line
    #[clap(long, env = "WORDLE_ANSWERS", value_name = "PATH", requires = "guesses")]
    answers: Option<PathBuf>,

    /// Extra guessable words, one word per line
    #[clap(long, env = "WORDLE_GUESSES", value_name = "PATH", requires = "answers")]
    guesses: Option<PathBuf>,

    /// More logging (-v info, -vv debug); RUST_LOG overrides
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Do not draw the progress spinner
    #[clap(short, long, global = true)]
    quiet: bool,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve against a known target, or random targets
    Solve {
        /// The word to solve for (default: random answer)
        #[clap(conflicts_with = "stats")]
        target: Option<String>,
        /// Number of random games to play
        #[clap(long, default_value_t = 1)]
        games: usize,
        /// Print statistics over the games played
        #[clap(long)]
        stats: bool,
    },
    /// Suggest guesses and read the feedback for each from stdin
    Interactive {
        /// Continue from earlier guesses, e.g. 'ROATE:XYGXY,CRANE:GGGXX'
        #[clap(long)]
        state: Option<String>,
    },
    /// Let the solver play a game without knowing the answer
    Versus {
        /// The game's answer (default: random)
        target: Option<String>,
        /// Enforce hard mode on the solver's guesses
        #[clap(long)]
        hard: bool,
    },
    /// Play a game yourself
    Play {
        /// The game's answer (default: random)
        target: Option<String>,
        /// Guesses must use all revealed green and yellow letters
        #[clap(long)]
        hard: bool,
    },
    /// Command prompt for suggestions and feedback (the default)
    Assist,
    /// Rank the best opening guesses
    Top {
        #[clap(default_value_t = 10)]
        n: usize,
    },
    /// Solve every answer and show the distribution of guess counts
    Bench,
}

struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    fn new(message: &'static str, scored: Arc<AtomicUsize>, total: Arc<AtomicUsize>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let handle = thread::spawn(move || {
            let frames = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut i = 0;
            let mut stderr = io::stderr();
            while running_clone.load(Ordering::Relaxed) {
                let frame = frames[i % frames.len()];
                let _ = match total.load(Ordering::Relaxed) {
                    0 => write!(stderr, "\r{} {}", frame, message),
                    n => write!(
                        stderr,
                        "\r{} {} {}/{}",
                        frame,
                        message,
                        scored.load(Ordering::Relaxed),
                        n
                    ),
                };
                let _ = stderr.flush();
                thread::sleep(Duration::from_millis(80));
                i += 1;
            }
            let _ = write!(stderr, "\r{}\r", " ".repeat(message.len() + 20));
            let _ = stderr.flush();
        });
        Self {
            running,
            handle: Some(handle),
        }
    }

    fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

/// Run `f` with a progress callback, drawing a spinner unless `quiet`.
fn with_spinner<T>(
    quiet: bool,
    message: &'static str,
    f: impl FnOnce(&(dyn Fn(Progress) + Sync)) -> T,
) -> T {
    if quiet {
        return f(&|_| {});
    }
    let scored = Arc::new(AtomicUsize::new(0));
    let total = Arc::new(AtomicUsize::new(0));
    let spinner = Spinner::new(message, scored.clone(), total.clone());
    let result = f(&|p: Progress| {
        scored.store(p.scored, Ordering::Relaxed);
        total.store(p.total, Ordering::Relaxed);
    });
    spinner.stop();
    result
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_vocabulary(cli: &Cli) -> Result<Vocabulary> {
    match (&cli.answers, &cli.guesses) {
        (Some(answers), Some(guesses)) => Vocabulary::load(answers, guesses)
            .context("loading word lists (check --answers/--guesses)"),
        _ => Vocabulary::embedded().context("loading the built-in word lists"),
    }
}

fn parse_word(s: &str) -> Result<Word> {
    s.parse::<Word>()
        .with_context(|| format!("invalid word '{}'", s))
}

/// Print `message`, then read one trimmed line. `None` at end of input.
fn prompt_from(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt(message: &str) -> io::Result<Option<String>> {
    prompt_from(&mut io::stdin().lock(), message)
}

fn print_remaining(words: &[Word]) {
    println!("Remaining possibilities: {}", words.len());
    if words.len() <= 10 {
        let list: Vec<String> = words.iter().map(Word::to_string).collect();
        println!("Possible words: {}", list.join(", "));
    }
}

/// Feedback typed in by a human as a G/Y/X code. Invalid codes are
/// re-prompted.
struct HumanOracle<R> {
    input: R,
}

impl<R: BufRead> Oracle for HumanOracle<R> {
    fn evaluate(&mut self, guess: Word) -> Result<Feedback, OracleError> {
        loop {
            let line = match prompt_from(&mut self.input, "Feedback (G/Y/X): ")? {
                Some(line) => line,
                None => return Err(OracleError::Closed),
            };
            match Feedback::from_code(guess, &line) {
                Ok(feedback) => return Ok(feedback),
                Err(err) => {
                    println!("Invalid input: {}", err);
                    println!("Enter 5 characters: G (green), Y (yellow), X (gray)");
                }
            }
        }
    }
}

fn report_finish(outcome: Outcome, session: &SolveSession) {
    match outcome {
        Outcome::Solved { rounds } => println!("\nSolved in {} guesses!", rounds),
        Outcome::Exhausted { rounds } => {
            let last = session.history().last().map(|fb| fb.guess().to_string());
            println!(
                "Error: No possible words remaining after guess {} ({} guesses)",
                last.unwrap_or_default(),
                rounds
            );
        }
        Outcome::Continue { .. } => {}
    }
}

fn solve_one(vocab: &Vocabulary, target: Word, quiet: bool) -> Result<Outcome> {
    if !vocab.is_answer(target) {
        log::warn!("{} is not in the answer list; the solver may not find it", target);
    }
    let mut session = SolveSession::new(vocab);
    let mut oracle = KnownTarget(target);
    loop {
        let outcome =
            with_spinner(quiet, THINKING, |progress| session.step_with_progress(&mut oracle, progress))?;
        if let Some(feedback) = session.history().last() {
            println!("Guess {}: {}", session.round(), feedback);
        }
        if !matches!(outcome, Outcome::Continue { .. }) {
            report_finish(outcome, &session);
            return Ok(outcome);
        }
    }
}

fn print_distribution(dist: &GuessDistribution) {
    let total = dist.solved();
    println!("Guess distribution:");
    for (guesses, count) in &dist.counts {
        let pct = *count as f64 / total.max(1) as f64 * 100.0;
        let bar = "█".repeat((*count * 40 / total.max(1)).max(1));
        println!("  {} guesses: {:>5} ({:>5.1}%) {}", guesses, count, pct, bar);
    }
    println!();
    println!("Average guesses: {:.3}", dist.average());
    if let (Some(min), Some(max)) = (dist.min(), dist.max()) {
        println!("Min guesses: {}", min);
        println!("Max guesses: {}", max);
    }
    if !dist.unsolved.is_empty() {
        let list: Vec<String> = dist.unsolved.iter().map(Word::to_string).collect();
        println!("Not solved: {}", list.join(", "));
    }
}

fn run_solve(
    vocab: &Vocabulary,
    target: Option<String>,
    games: usize,
    stats: bool,
    quiet: bool,
) -> Result<()> {
    if let Some(target) = target {
        solve_one(vocab, parse_word(&target)?, quiet)?;
        return Ok(());
    }

    let mut rng = thread_rng();
    let targets: Vec<Word> = (0..games.max(1))
        .filter_map(|_| vocab.answers().choose(&mut rng).copied())
        .collect();

    if targets.len() == 1 && !stats {
        solve_one(vocab, targets[0], quiet)?;
        return Ok(());
    }

    let dist = with_spinner(quiet, "Solving...", |_| guess_distribution(vocab, &targets));
    println!("Statistics over {} games:", targets.len());
    print_distribution(&dist);
    Ok(())
}

/// Parse `GUESS:CODE,GUESS:CODE`. Entries with a bad feedback code are
/// reported and skipped; a missing `:` or a bad word is fatal.
fn parse_state(state: &str) -> Result<Vec<Feedback>> {
    let mut history = Vec::new();
    for item in state.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (guess, code) = match item.split_once(':') {
            Some(parts) => parts,
            None => bail!("invalid format: {}. Use 'GUESS:FEEDBACK' format.", item),
        };
        let guess = parse_word(guess)?;
        match Feedback::from_code(guess, code) {
            Ok(feedback) => history.push(feedback),
            Err(err) => println!("Invalid feedback format: {} ({})", code.trim(), err),
        }
    }
    Ok(history)
}

fn run_interactive(vocab: &Vocabulary, state: Option<String>, quiet: bool) -> Result<()> {
    let mut session = match state {
        Some(state) => {
            let history = parse_state(&state)?;
            println!("Continuing from previous guesses...\n");
            let session = SolveSession::resume(vocab, history);
            for (i, feedback) in session.history().iter().enumerate() {
                println!("Previous guess {}: {} {}", i + 1, feedback.guess(), feedback.code());
            }
            session
        }
        None => {
            println!("Interactive Wordle Solver");
            println!("Enter feedback as 5 characters: G (green), Y (yellow), X (gray)");
            println!("Example: GYXXG means first letter green, second yellow, rest gray\n");
            SolveSession::new(vocab)
        }
    };

    if session.is_finished() {
        report_finish(session.outcome(), &session);
        return Ok(());
    }
    if session.round() > 0 {
        print_remaining(session.candidates());
        println!("\nContinuing to solve...\n");
    }

    let mut oracle = HumanOracle {
        input: io::stdin().lock(),
    };
    loop {
        let next = with_spinner(quiet, THINKING, |progress| {
            session.next_guess_with_progress(progress)
        });
        let guess = match next {
            Some(guess) => guess,
            None => return Ok(()),
        };
        println!("Guess {}: {}", session.round() + 1, guess);

        let feedback = match oracle.evaluate(guess) {
            Ok(feedback) => feedback,
            Err(OracleError::Closed) => {
                println!();
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let outcome = session.apply(feedback)?;
        match outcome {
            Outcome::Continue { .. } => {
                print_remaining(session.candidates());
                println!();
            }
            finished => {
                report_finish(finished, &session);
                return Ok(());
            }
        }
    }
}

fn random_or_given_game<'v>(
    vocab: &'v Vocabulary,
    target: Option<String>,
    hard: bool,
) -> Result<Game<'v>> {
    Ok(match target {
        Some(target) => Game::new(vocab, parse_word(&target)?, hard),
        None => Game::random(vocab, hard, &mut thread_rng()),
    })
}

fn run_versus(vocab: &Vocabulary, target: Option<String>, hard: bool, quiet: bool) -> Result<()> {
    let mut game = random_or_given_game(vocab, target, hard)?;
    let mut session = SolveSession::new(vocab);

    let result = loop {
        let step = with_spinner(quiet, THINKING, |progress| {
            game.step_session(&mut session, progress)
        });
        match step {
            Ok(Outcome::Continue { remaining }) => {
                if let Some(feedback) = session.history().last() {
                    println!("Guess {}: {} {}", session.round(), feedback.guess(), feedback.code());
                }
                if remaining <= 10 {
                    println!("Remaining: {} words", remaining);
                }
            }
            Ok(finished) => {
                if let Some(feedback) = session.history().last() {
                    println!("Guess {}: {} {}", session.round(), feedback.guess(), feedback.code());
                }
                break Ok(finished);
            }
            Err(err) => break Err(err),
        }
    };

    match result {
        Ok(outcome) => report_finish(outcome, &session),
        Err(SessionError::Oracle(OracleError::GameOver)) => {
            println!("\nFailed to solve within {} guesses.", MAX_ATTEMPTS)
        }
        Err(SessionError::Oracle(OracleError::Rejected { guess, reason })) => {
            println!("Error: Invalid guess {} ({})", guess, reason)
        }
        Err(err) => return Err(err.into()),
    }
    println!("\nTarget was: {}", game.target());
    Ok(())
}

fn run_play(vocab: &Vocabulary, target: Option<String>, hard: bool) -> Result<()> {
    let mut game = random_or_given_game(vocab, target, hard)?;
    let mode = if hard { "HARD MODE" } else { "NORMAL MODE" };
    println!("=== WORDLE ({}) ===", mode);
    println!("Guess the 5-letter word in {} attempts!", MAX_ATTEMPTS);
    println!("🟩 = correct letter, correct position");
    println!("🟨 = correct letter, wrong position");
    println!("⬛ = letter not in word");
    if hard {
        println!("Hard mode: Must use all revealed green and yellow letters!");
    }

    while !game.is_over() {
        let message = format!("\nAttempt {}/{}\nEnter your guess: ", game.attempts() + 1, MAX_ATTEMPTS);
        let line = match prompt(&message)? {
            Some(line) => line,
            None => break,
        };
        let guess = match line.parse::<Word>() {
            Ok(guess) => guess,
            Err(err) => {
                println!("Invalid guess! {}", err);
                continue;
            }
        };
        match game.make_guess(guess) {
            Ok(_) => {
                println!();
                for feedback in game.history() {
                    println!("{}", feedback);
                }
                print_keyboard(&game);
            }
            Err(err) => println!("Invalid guess! {}", err),
        }
    }

    if game.is_won() {
        println!("\nCongratulations! You won!");
    } else {
        println!("\nGame Over!");
    }
    println!("The word was: {}", game.target());
    Ok(())
}

fn print_keyboard(game: &Game) {
    println!("\nKeyboard:");
    for row in ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"] {
        let keys: Vec<String> = row
            .chars()
            .map(|letter| match game.letter_state(letter) {
                Some(class) => format!("{}{}", letter, class.to_emoji()),
                None => format!("{}  ", letter),
            })
            .collect();
        println!("  {}", keys.join(" "));
    }
}

fn print_banner() {
    for line in BANNER_TEXT.lines().take(6) {
        println!("{}", line);
    }
}

fn print_help() {
    println!("{}", BANNER_TEXT);
}

fn print_top(top: &[GuessAnalysis]) {
    if top.is_empty() {
        println!("No possible words remaining.");
        return;
    }
    println!();
    println!("Top {} guesses:", top.len());
    println!(
        "{:>4} {:>8} {:>8} {:>12} Possible?",
        "#", "Word", "Entropy", "Exp. Remain"
    );
    println!("{}", "-".repeat(50));
    for (i, analysis) in top.iter().enumerate() {
        println!(
            "{:>4} {:>8} {:>8.3} {:>12.2} {}",
            i + 1,
            analysis.word,
            analysis.entropy,
            analysis.expected_remaining,
            if analysis.is_possible_answer { "✓" } else { "" }
        );
    }
    println!();
}

fn run_assist(vocab: &Vocabulary, quiet: bool) -> Result<()> {
    print_banner();
    println!("Loaded {} answers, {} guessable words.", vocab.answers().len(), vocab.guesses().len());
    println!();
    println!("Type 'help' for commands or 'suggest' to get started.");
    println!();

    let mut session = SolveSession::new(vocab);

    loop {
        let line = match prompt("> ")? {
            Some(line) => line,
            None => break,
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0].to_lowercase().as_str() {
            "help" | "h" | "?" => print_help(),
            "quit" | "exit" | "q" => {
                println!("Goodbye!");
                break;
            }
            "suggest" | "s" | "best" => {
                let best = with_spinner(quiet, THINKING, |progress| {
                    session.next_guess_with_progress(progress)
                });
                match best {
                    Some(word) => {
                        let analysis = analyse(word, session.candidates());
                        println!();
                        println!("Best guess: {}", word);
                        println!("  Entropy: {:.3} bits", analysis.entropy);
                        println!("  Expected remaining: {:.2} words", analysis.expected_remaining);
                        if analysis.is_possible_answer {
                            println!("  ✓ This word is a possible answer");
                        } else {
                            println!("  ✗ This word is NOT a possible answer");
                        }
                        println!();
                        println!("Remaining possibilities: {}", session.candidates().len());
                        println!();
                    }
                    None => println!("No possible words remaining. Use 'reset' to start over."),
                }
            }
            "top" | "t" => {
                let n: usize = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);
                let top = with_spinner(quiet, "Ranking guesses...", |_| {
                    rank_guesses(session.candidates(), vocab.guesses(), n)
                });
                print_top(&top);
            }
            "feedback" | "f" | "fb" => {
                if parts.len() < 3 {
                    println!("Usage: feedback <word> <pattern>");
                    println!("Example: feedback crane xyxxg");
                    continue;
                }
                let word = match parts[1].parse::<Word>() {
                    Ok(word) => word,
                    Err(err) => {
                        println!("{}", err);
                        continue;
                    }
                };
                let feedback = match Feedback::from_code(word, parts[2]) {
                    Ok(feedback) => feedback,
                    Err(err) => {
                        println!("Invalid pattern: {}", err);
                        continue;
                    }
                };

                let prev_count = session.candidates().len();
                let outcome = match session.apply(feedback) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        println!("{}. Use 'reset' to start over.", err);
                        continue;
                    }
                };
                let new_count = session.candidates().len();

                println!();
                println!("Feedback: {}", feedback);
                match outcome {
                    Outcome::Solved { rounds } => {
                        println!();
                        println!("🎉 Solved in {} guesses!", rounds);
                    }
                    Outcome::Exhausted { .. } => {
                        println!();
                        println!("⚠️  No words match this feedback pattern!");
                        println!("This might indicate an error. Use 'reset' to start over.");
                    }
                    Outcome::Continue { .. } => {
                        println!(
                            "Eliminated {} words ({} → {})",
                            prev_count - new_count,
                            prev_count,
                            new_count
                        );
                        if new_count <= 10 {
                            print_remaining(session.candidates());
                        }
                    }
                }
                println!();
            }
            "remaining" | "r" | "left" => {
                let remaining = session.candidates();
                println!();
                println!("Remaining possibilities: {}", remaining.len());
                if remaining.len() <= 20 {
                    for (i, word) in remaining.iter().enumerate() {
                        if i > 0 && i % 10 == 0 {
                            println!();
                        }
                        print!("{:>8}", word);
                    }
                    println!();
                }
                println!();
            }
            "reset" => {
                session = SolveSession::new(vocab);
                println!(
                    "Reset to initial state. {} words available.",
                    session.candidates().len()
                );
            }
            _ => {
                println!("Unknown command: {}", parts[0]);
                println!("Type 'help' for available commands.");
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let vocab = load_vocabulary(&cli)?;
    let quiet = cli.quiet;

    match cli.command {
        None | Some(Commands::Assist) => run_assist(&vocab, quiet),
        Some(Commands::Solve {
            target,
            games,
            stats,
        }) => run_solve(&vocab, target, games, stats, quiet),
        Some(Commands::Interactive { state }) => run_interactive(&vocab, state, quiet),
        Some(Commands::Versus { target, hard }) => run_versus(&vocab, target, hard, quiet),
        Some(Commands::Play { target, hard }) => run_play(&vocab, target, hard),
        Some(Commands::Top { n }) => {
            let top = with_spinner(quiet, "Ranking guesses...", |_| {
                rank_guesses(vocab.answers(), vocab.guesses(), n)
            });
            print_top(&top);
            Ok(())
        }
        Some(Commands::Bench) => {
            println!("Running benchmark on all {} answers...", vocab.answers().len());
            let start = Instant::now();
            let dist = with_spinner(quiet, "Solving...", |_| {
                guess_distribution(&vocab, vocab.answers())
            });
            let elapsed = start.elapsed();

            println!("Results:");
            println!("{}", "=".repeat(40));
            println!();
            print_distribution(&dist);
            println!("Total words: {}", dist.solved() + dist.unsolved.len());
            println!("Time elapsed: {:.2?}", elapsed);

            let failures: usize = dist
                .counts
                .iter()
                .filter(|(g, _)| *g > MAX_ATTEMPTS)
                .map(|(_, c)| c)
                .sum();
            if failures > 0 {
                println!("Words not solved in {} guesses: {}", MAX_ATTEMPTS, failures);
            } else if dist.unsolved.is_empty() {
                println!("✓ All words solved within {} guesses!", MAX_ATTEMPTS);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn word(s: &str) -> Word {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_state_skips_bad_codes() {
        let history = parse_state("ROATE:XYGXZ, CRANE:GGGXX").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].guess(), word("crane"));
        assert_eq!(history[0].code(), "GGGXX");
    }

    #[test]
    fn test_parse_state_rejects_missing_separator() {
        assert!(parse_state("ROATE:XYGXY,CRANE").is_err());
        assert!(parse_state("ROAT:XYGXY").is_err());
        assert!(parse_state("").unwrap().is_empty());
    }

    #[test]
    fn test_human_oracle_reprompts() {
        let mut oracle = HumanOracle {
            input: Cursor::new("gyx\nGYXZG\n gyxxg \n"),
        };
        let feedback = oracle.evaluate(word("crane")).unwrap();
        assert_eq!(feedback, Feedback::from_code(word("crane"), "GYXXG").unwrap());
        assert!(matches!(
            oracle.evaluate(word("crane")),
            Err(OracleError::Closed)
        ));
    }

    #[test]
    fn test_solve_target_conflicts_with_stats() {
        assert!(Cli::try_parse_from(["wordle-solver", "solve", "CRANE", "--stats"]).is_err());
        assert!(Cli::try_parse_from(["wordle-solver", "solve", "--stats", "--games", "5"]).is_ok());
        assert!(Cli::try_parse_from(["wordle-solver", "solve", "CRANE"]).is_ok());
    }
}

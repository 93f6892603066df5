//! Playing a round: answering questions, keeping score and time.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::matcher::names_match;
use crate::model::{CatalogEntry, Language};
use crate::session::QuizRound;

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Whether the guess matched.
    pub correct: bool,
    /// Display name of the Pokémon that was shown.
    pub expected: String,
    /// 1-based number of the question that was answered.
    pub question: usize,
}

/// Final result of a round, ready to be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    /// Whole seconds elapsed since the round started.
    pub time_secs: u64,
}

/// One round in progress.
pub struct QuizGame {
    round: QuizRound,
    language: Language,
    current: usize,
    score: u32,
    started: Instant,
}

impl QuizGame {
    /// Start a round; the clock starts now.
    pub fn start(round: QuizRound, language: Language) -> Self {
        Self {
            round,
            language,
            current: 0,
            score: 0,
            started: Instant::now(),
        }
    }

    /// The entry to show, or `None` once every question is answered.
    pub fn current(&self) -> Option<&CatalogEntry> {
        self.round.get(self.current)
    }

    /// 1-based number of the current question.
    pub fn position(&self) -> usize {
        (self.current + 1).min(self.round.len())
    }

    pub fn len(&self) -> usize {
        self.round.len()
    }

    pub fn is_empty(&self) -> bool {
        self.round.is_empty()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.round.len()
    }

    /// Share of the round reached by the current question, in percent.
    pub fn progress_percent(&self) -> u8 {
        if self.round.is_empty() {
            return 100;
        }
        ((self.position() * 100) / self.round.len()) as u8
    }

    /// Answer the current question.
    ///
    /// An empty guess is rejected without consuming the question.
    pub fn submit(&mut self, guess: &str) -> Result<AnswerOutcome, QuizError> {
        let guess = guess.trim();
        if guess.is_empty() {
            return Err(QuizError::EmptyGuess);
        }
        let entry = self.current().ok_or(QuizError::RoundComplete)?;
        let expected = entry
            .display_name(self.language)
            .unwrap_or_default()
            .to_string();

        let correct = names_match(guess, &expected);
        if correct {
            self.score += 1;
        }
        self.current += 1;

        Ok(AnswerOutcome {
            correct,
            expected,
            question: self.current,
        })
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Result using the time elapsed so far.
    pub fn finish(&self) -> QuizResult {
        self.result_after(self.elapsed())
    }

    /// Result for a given elapsed time, floored to whole seconds.
    pub fn result_after(&self, elapsed: Duration) -> QuizResult {
        QuizResult {
            score: self.score,
            total: self.round.len() as u32,
            time_secs: elapsed.as_secs(),
        }
    }
}

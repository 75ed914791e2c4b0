use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::{NUM_OPTIONS, Quiz};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Answers can still be selected.
    InProgress,
    /// Answers are frozen and the score is fixed.
    Revealed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("question index {index} is out of range (quiz has {len} questions)")]
    InvalidQuestionIndex { index: usize, len: usize },

    #[error("option index {index} is out of range (0..4)")]
    InvalidOptionIndex { index: usize },

    #[error("answers are frozen once the quiz has been revealed")]
    AlreadyRevealed,

    #[error("correctness is only available after reveal")]
    NotRevealed,
}

impl SessionError {
    pub fn is_invalid_index(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidQuestionIndex { .. } | SessionError::InvalidOptionIndex { .. }
        )
    }
}

/// Result of a revealed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// Percentage of correct answers at full precision.
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.correct as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Percentage rounded to one decimal place, for display.
    pub fn rounded(&self) -> f64 {
        (self.percentage() * 10.0).round() / 10.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.percentage())
    }
}

/// Per-question breakdown, available after reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOutcome {
    pub question_index: usize,
    pub selected: Option<usize>,
    pub correct_option: usize,
    pub is_correct: bool,
}

/// One attempt at a quiz.
///
/// Owned by a single caller; mutation goes through `&mut self`.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    quiz: Arc<Quiz>,
    selections: Vec<Option<usize>>,
    state: SessionState,
    score: Option<Score>,
}

impl QuizSession {
    pub fn new(quiz: Arc<Quiz>) -> Self {
        let num_questions = quiz.len();
        Self {
            id: Uuid::new_v4(),
            quiz,
            selections: vec![None; num_questions],
            state: SessionState::InProgress,
            score: None,
        }
    }

    /// A fresh attempt at the same quiz.
    pub fn new_attempt(&self) -> Self {
        Self::new(Arc::clone(&self.quiz))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state == SessionState::Revealed
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.len()
    }

    pub fn selection(&self, question_index: usize) -> Option<usize> {
        self.selections.get(question_index).copied().flatten()
    }

    pub fn selections(&self) -> &[Option<usize>] {
        &self.selections
    }

    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered_count() == self.total_questions()
    }

    /// Records `option_index` (0-based) for `question_index`, replacing any
    /// earlier choice.
    pub fn select_answer(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<(), SessionError> {
        if self.is_revealed() {
            return Err(SessionError::AlreadyRevealed);
        }
        self.check_question_index(question_index)?;
        if option_index >= NUM_OPTIONS {
            return Err(SessionError::InvalidOptionIndex {
                index: option_index,
            });
        }

        self.selections[question_index] = Some(option_index);
        Ok(())
    }

    /// Freezes the answers and returns the score. Unanswered questions
    /// count as incorrect. Calling it again returns the same score.
    pub fn reveal(&mut self) -> Score {
        if let Some(score) = self.score {
            return score;
        }

        let score = Score {
            correct: self.count_correct(),
            total: self.total_questions(),
        };
        self.score = Some(score);
        self.state = SessionState::Revealed;
        debug!(session = %self.id, correct = score.correct, total = score.total, "quiz revealed");
        score
    }

    /// The score, once revealed.
    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn is_correct(&self, question_index: usize) -> Result<bool, SessionError> {
        if !self.is_revealed() {
            return Err(SessionError::NotRevealed);
        }
        self.check_question_index(question_index)?;
        Ok(self.selection_matches(question_index))
    }

    pub fn outcomes(&self) -> Result<Vec<QuestionOutcome>, SessionError> {
        if !self.is_revealed() {
            return Err(SessionError::NotRevealed);
        }

        Ok(self
            .quiz
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionOutcome {
                question_index: index,
                selected: self.selections[index],
                correct_option: question.correct_option_position(),
                is_correct: self.selection_matches(index),
            })
            .collect())
    }

    fn check_question_index(&self, question_index: usize) -> Result<(), SessionError> {
        if question_index >= self.total_questions() {
            return Err(SessionError::InvalidQuestionIndex {
                index: question_index,
                len: self.total_questions(),
            });
        }
        Ok(())
    }

    fn selection_matches(&self, question_index: usize) -> bool {
        match (self.selection(question_index), self.quiz.question(question_index)) {
            (Some(selected), Some(question)) => selected == question.correct_option_position(),
            _ => false,
        }
    }

    fn count_correct(&self) -> usize {
        (0..self.total_questions())
            .filter(|&index| self.selection_matches(index))
            .count()
    }
}

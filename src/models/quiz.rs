use serde::Serialize;

use super::Question;

/// A validated, non-empty list of questions.
///
/// Immutable once built; sessions share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a quiz must contain at least one question")]
pub struct EmptyQuiz;

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Result<Self, EmptyQuiz> {
        if questions.is_empty() {
            return Err(EmptyQuiz);
        }
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed quiz.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_quiz_is_rejected() {
        assert_eq!(Quiz::new(Vec::new()), Err(EmptyQuiz));
    }

    #[test]
    fn test_serializes_as_questions_object() {
        let question = Question::new("q", ["a", "b", "c", "d"].map(String::from), 2).unwrap();
        let quiz = Quiz::new(vec![question]).unwrap();
        let json = serde_json::to_value(&quiz).unwrap();
        assert_eq!(json["questions"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["questions"][0]["answer"], 2);
    }
}

//! Instruction contract sent to the model.
//!
//! The output schema is described in prose inside the instruction. The
//! model is free to ignore it, so everything it returns still goes
//! through [`ResponseValidator`](super::ResponseValidator).

use serde::Serialize;

/// Fixed role directive for the system message.
pub const SYSTEM_DIRECTIVE: &str = "You generate multiple-choice quizzes and reply with strictly formatted JSON only. \
Never write prose, explanations or markdown.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged entry of the instruction sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// What gets sent to the model for one quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPayload {
    pub system: String,
    pub instructions: String,
}

impl InstructionPayload {
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::System,
                content: self.system.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: self.instructions.clone(),
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBuilder {
    question_count: usize,
}

impl PromptBuilder {
    pub fn new(question_count: usize) -> Self {
        Self { question_count }
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Builds the payload for `source_text`.
    ///
    /// Callers check for blank input before getting here.
    pub fn build(&self, source_text: &str) -> InstructionPayload {
        InstructionPayload {
            system: SYSTEM_DIRECTIVE.to_string(),
            instructions: self.instructions(source_text),
        }
    }

    fn instructions(&self, source_text: &str) -> String {
        let count = self.question_count;
        format!(
            r#"Write exactly {count} multiple choice questions about the source text below.
Reply with a single JSON object in exactly this shape:
{{
  "questions": [
    {{
      "question": "Question text",
      "options": ["first option", "second option", "third option", "fourth option"],
      "answer": 1
    }}
  ]
}}

Rules:
1. "questions" must contain exactly {count} entries.
2. "options" must contain exactly 4 non-empty strings.
3. "answer" is an integer from 1 to 4 giving the position of the correct option.
4. Reply with the JSON object only. No markdown, no code fences, no commentary.

Source text:
{source_text}"#
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_QUESTION_COUNT)
    }
}

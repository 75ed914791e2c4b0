mod question;
mod quiz;

pub use question::{InvalidQuestion, NUM_OPTIONS, Question};
pub use quiz::{EmptyQuiz, Quiz};

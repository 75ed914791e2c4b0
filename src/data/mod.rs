mod loader;

pub use loader::{LoadError, load_quiz, load_source_text, quiz_from_json_str};

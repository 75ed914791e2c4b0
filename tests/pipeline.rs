use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde_json::json;

use quizsmith::{
    GenerationError, InstructionPayload, ModelClient, ModelError, QueryResponse,
    QuizGenerationService, QuizSession,
};

const QUESTION_COUNT: usize = 10;

/// Echoes back a quiz whose questions embed the source text it was given,
/// so each caller can check it got its own result.
struct EchoClient {
    calls: AtomicUsize,
}

fn source_of(payload: &InstructionPayload) -> String {
    payload
        .instructions
        .rsplit("Source text:\n")
        .next()
        .unwrap_or_default()
        .to_string()
}

fn fixture_for(source: &str) -> String {
    let questions: Vec<_> = (0..QUESTION_COUNT)
        .map(|i| {
            json!({
                "question": format!("{source} #{i}"),
                "options": ["w", "x", "y", "z"],
                "answer": (source.len() + i) % 4 + 1
            })
        })
        .collect();
    json!({ "questions": questions }).to_string()
}

#[async_trait]
impl ModelClient for EchoClient {
    async fn complete(&self, payload: &InstructionPayload) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let source = source_of(payload);
        // Stagger completions so calls overlap and finish out of order.
        let delay = (source.len() % 7) as u64 * 5;
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(fixture_for(&source))
    }
}

fn service(client: Arc<EchoClient>) -> QuizGenerationService {
    QuizGenerationService::new(client, QUESTION_COUNT, Duration::from_secs(5))
}

#[tokio::test]
async fn test_parallel_generate_calls_stay_independent() {
    let client = Arc::new(EchoClient {
        calls: AtomicUsize::new(0),
    });
    let service = Arc::new(service(client.clone()));

    let inputs: Vec<String> = (0..32).map(|i| format!("input-{i}-{}", "x".repeat(i))).collect();
    let handles = inputs.iter().cloned().map(|input| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            let quiz = service.generate(&input).await;
            (input, quiz)
        })
    });

    for joined in join_all(handles).await {
        let (input, quiz) = joined.unwrap();
        let quiz = quiz.unwrap();
        assert_eq!(quiz.len(), QUESTION_COUNT);
        for (i, question) in quiz.questions().iter().enumerate() {
            assert_eq!(question.text(), format!("{input} #{i}"));
            assert_eq!(
                usize::from(question.correct_option_index()),
                (input.len() + i) % 4 + 1
            );
        }
    }
    assert_eq!(client.calls.load(Ordering::SeqCst), inputs.len());
}

#[tokio::test]
async fn test_generated_quiz_drives_a_session() {
    let client = Arc::new(EchoClient {
        calls: AtomicUsize::new(0),
    });
    let quiz = Arc::new(service(client).generate("Rivers flow to the sea.").await.unwrap());

    let mut session = QuizSession::new(Arc::clone(&quiz));
    for (index, question) in quiz.questions().iter().enumerate().take(5) {
        session
            .select_answer(index, question.correct_option_position())
            .unwrap();
    }

    let score = session.reveal();
    assert_eq!(score.correct, 5);
    assert_eq!(score.percentage(), 50.0);
    assert_eq!(session.reveal(), score);
}

#[tokio::test]
async fn test_envelope_for_blank_input() {
    let client = Arc::new(EchoClient {
        calls: AtomicUsize::new(0),
    });
    let result = service(client.clone()).generate("  \n ").await;
    assert_eq!(result, Err(GenerationError::EmptyInput));
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);

    let json = serde_json::to_value(QueryResponse::from_result(result)).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["status"], "bad_request");
}

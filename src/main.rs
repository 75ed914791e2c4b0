use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use serde_json::json;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use quizsmith::{
    Config, QueryResponse, QuizGenerationService, QuizSession, load_quiz, load_source_text,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML config file (defaults to ./quizsmith.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a quiz from text files, or from stdin when none are given
    Generate {
        /// Source text file; repeat to generate several quizzes concurrently
        #[arg(short, long)]
        input: Vec<PathBuf>,

        /// Number of questions per quiz
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Write the response envelope here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score answers against a saved quiz
    Score {
        /// Quiz JSON, either bare or a success envelope
        #[arg(short, long)]
        quiz: PathBuf,

        /// Comma-separated 0-based option indices, e.g. "0,2,,1"; empty slots are unanswered
        #[arg(short, long, default_value = "")]
        answers: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Resolves once `signal` fires. If listening fails, never resolves, so
/// generation runs to completion instead of being cancelled.
async fn cancel_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "unable to listen for Ctrl-C; cancellation disabled");
        std::future::pending::<()>().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    match args.command {
        Command::Generate {
            input,
            count,
            output,
        } => {
            let mut config = Config::load(args.config.as_deref()).context("loading config")?;
            if let Some(count) = count {
                config.quiz.question_count = count;
                config.validate()?;
            }
            generate(&config, input, output).await
        }
        Command::Score { quiz, answers } => score(quiz, &answers),
    }
}

async fn generate(
    config: &Config,
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let service = QuizGenerationService::from_config(config)?;

    let texts = if inputs.is_empty() {
        vec![load_source_text(None::<PathBuf>)?]
    } else {
        inputs
            .iter()
            .map(|path| load_source_text(Some(path)))
            .collect::<Result<Vec<_>, _>>()?
    };

    let results = join_all(texts.iter().map(|text| {
        service.generate_with_cancel(text, cancel_on(tokio::signal::ctrl_c()))
    }))
    .await;

    let all_ok = results.iter().all(Result::is_ok);
    let responses: Vec<QueryResponse> = results.into_iter().map(QueryResponse::from_result).collect();
    let rendered = if responses.len() == 1 {
        serde_json::to_string_pretty(&responses[0])?
    } else {
        serde_json::to_string_pretty(&responses)?
    };

    match output {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn score(quiz_path: PathBuf, answers: &str) -> anyhow::Result<ExitCode> {
    let quiz = load_quiz(&quiz_path)?;
    let mut session = QuizSession::new(Arc::new(quiz));

    for (question_index, selection) in parse_answers(answers)?.into_iter().enumerate() {
        if let Some(option_index) = selection {
            session
                .select_answer(question_index, option_index)
                .with_context(|| format!("answer for question {}", question_index + 1))?;
        }
    }

    let score = session.reveal();
    let report = json!({
        "score": score.to_string(),
        "percentage": score.percentage(),
        "correct": score.correct,
        "total": score.total,
        "outcomes": session.outcomes()?,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}

fn parse_answers(answers: &str) -> anyhow::Result<Vec<Option<usize>>> {
    if answers.trim().is_empty() {
        return Ok(Vec::new());
    }

    answers
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(i, slot)| {
            if slot.is_empty() {
                return Ok(None);
            }
            match slot.parse::<usize>() {
                Ok(option) => Ok(Some(option)),
                Err(_) => bail!("answer {} is not an option index: {slot:?}", i + 1),
            }
        })
        .collect()
}

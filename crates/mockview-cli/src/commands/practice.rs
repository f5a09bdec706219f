//! The `mockview practice` command: an interactive interview over stdin/stdout.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use mockview_core::bank::{load_bank, load_question_list, QuestionBank};
use mockview_core::flow::{FlowManager, Progress, SessionContext};
use mockview_core::interview::{Interview, InterviewReporter, InterviewRequest, InterviewSummary};
use mockview_core::model::{Difficulty, Evaluation, Mode, Question};
use mockview_core::store::SessionStore;

use super::evaluate::print_evaluation;
use super::report::{build, extension, parse_formats, write};
use crate::ConfigArgs;

pub struct PracticeOptions {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub count: usize,
    pub keywords: Option<String>,
    pub resume: Option<PathBuf>,
    pub job_description: Option<PathBuf>,
    pub questions: Option<PathBuf>,
    pub bank: Option<PathBuf>,
    pub meeting: Option<String>,
    pub user: String,
    pub format: String,
    pub output: Option<PathBuf>,
    pub local: bool,
    pub seed: Option<u64>,
    pub config: ConfigArgs,
}

/// Console reporter printing the interview to stdout.
struct ConsoleReporter;

impl InterviewReporter for ConsoleReporter {
    fn on_question(&self, question: &Question, progress: &Progress) {
        println!("\n[{}/{}] {}", progress.current, progress.total, question.text);
    }

    fn on_evaluation(&self, _question: &Question, evaluation: &Evaluation) {
        println!();
        print_evaluation(evaluation);
    }

    fn on_follow_up(&self, question: &Question) {
        println!("\nFollow-up: {}", question.text);
    }

    fn on_complete(&self, summary: &InterviewSummary) {
        println!("\n{}", "=".repeat(60));
        println!(
            "Interview complete: {} answered, {} passed, average {:.1}/100, {} follow-up(s)",
            summary.answered, summary.passed, summary.average_score, summary.follow_ups
        );
        if let Some(id) = &summary.session_id {
            println!("Session: {id}");
        }
    }
}

pub async fn execute(opts: PracticeOptions) -> Result<()> {
    anyhow::ensure!(opts.count >= 1, "count must be at least 1");
    let formats = parse_formats(&opts.format)?;

    let config = super::load(&opts.config)?;

    let bank_path = opts.bank.clone().or_else(|| config.question_bank.clone());
    let bank = match &bank_path {
        Some(path) => load_bank(path)?,
        None => QuestionBank::builtin()?,
    };

    let context = SessionContext {
        target_keywords: super::split_list(opts.keywords.as_deref()),
        resume_text: read_optional(opts.resume.as_ref())?,
        job_description: read_optional(opts.job_description.as_ref())?,
        forced_questions: match &opts.questions {
            Some(path) => load_question_list(path)?,
            None => Vec::new(),
        },
    };

    let (evaluator, generator) = super::model_services(&config, opts.local)?;
    let model_scoring = evaluator.uses_model();

    let mut flow = FlowManager::new(Arc::new(bank));
    if let Some(generator) = generator {
        flow = flow.with_generator(generator);
    }
    if let Some(seed) = opts.seed {
        flow = flow.with_seed(seed);
    }

    let store: Arc<dyn SessionStore> = Arc::new(super::open_store(&opts.config, &config));

    if let Some(id) = &opts.meeting {
        anyhow::ensure!(
            store.verify_meeting(id).await?,
            "meeting not found or inactive: {id}"
        );
    }

    let mut request = InterviewRequest::new(opts.mode, opts.difficulty, opts.count);
    request.meeting_id = opts.meeting.clone();
    request.user_name = opts.user.clone();
    request.context = context;
    request
        .metadata
        .insert("interface".into(), serde_json::Value::from("cli"));
    request
        .metadata
        .insert("model_scoring".into(), serde_json::Value::from(model_scoring));

    println!(
        "mockview: {} interview, {} level, {} question(s). Type 'quit' to stop early.",
        opts.mode, opts.difficulty, opts.count
    );

    let mut interview = Interview::start(flow, Arc::new(evaluator), Arc::clone(&store), request)
        .await
        .with_reporter(Arc::new(ConsoleReporter));

    let mut input = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();

    while interview.next_question().await.is_some() {
        print!("> ");
        std::io::stdout().flush()?;
        let asked_at = Instant::now();

        buf.clear();
        match input.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                println!();
                tracing::info!("input closed, ending interview");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to read answer, ending interview");
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("quit") {
            break;
        }
        if answer.is_empty() {
            println!("Please type an answer, or 'quit' to stop.");
            continue;
        }

        let outcome = interview
            .submit_answer(answer, None, Some(asked_at.elapsed().as_secs_f64()))
            .await?;
        if outcome.follow_up_queued {
            println!("  (the interviewer has a follow-up)");
        }
    }

    let summary = interview.finish().await;

    let Some(session_id) = summary.session_id.as_deref() else {
        return Ok(());
    };
    if summary.answered == 0 || formats.is_empty() {
        return Ok(());
    }

    let report = build(store.as_ref(), session_id).await?;
    let dir = opts.output.unwrap_or(config.report_dir);
    for format in formats {
        let path = dir.join(format!("{session_id}.{}", extension(format)));
        write(&report, format, &path)?;
        eprintln!("Report saved to: {}", path.display());
    }
    Ok(())
}

fn read_optional(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        None => Ok(String::new()),
    }
}

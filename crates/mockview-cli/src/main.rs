//! mockview CLI: practice interviews and review past sessions.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use mockview_core::model::{Difficulty, Mode};
use mockview_core::store::{MeetingKind, Selection};

mod commands;

#[derive(Parser)]
#[command(name = "mockview", version, about = "Interview practice coach")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that read configuration.
#[derive(Args, Clone)]
pub struct ConfigArgs {
    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session store file (overrides `store_path`)
    #[arg(long)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive practice interview
    Practice {
        /// Interview mode: hr, technical, behavioral, mixed
        #[arg(long, default_value = "technical")]
        mode: Mode,

        /// Difficulty: beginner, intermediate, advanced
        #[arg(long, default_value = "intermediate")]
        difficulty: Difficulty,

        /// Number of main questions
        #[arg(long, default_value = "5")]
        count: usize,

        /// Target keywords (comma-separated) used to rank bank questions
        #[arg(long)]
        keywords: Option<String>,

        /// Resume text file
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Job description text file
        #[arg(long)]
        job_description: Option<PathBuf>,

        /// File of questions to ask verbatim (JSON array or TOML [[questions]])
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Question bank file (overrides `question_bank`)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Meeting code; its custom questions are asked unless --questions is given
        #[arg(long)]
        meeting: Option<String>,

        /// Candidate name
        #[arg(long, default_value = "Anonymous")]
        user: String,

        /// Report formats written when the session ends: text, markdown, json, html, all, none
        #[arg(long, default_value = "json")]
        format: String,

        /// Report directory (overrides `report_dir`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Score and generate locally even if a model provider is configured
        #[arg(long)]
        local: bool,

        /// Seed for question sampling
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Score a single answer
    Evaluate {
        /// The question being answered
        #[arg(long)]
        question: String,

        /// The answer; read from stdin when omitted
        #[arg(long)]
        answer: Option<String>,

        /// Expected keywords (comma-separated)
        #[arg(long)]
        keywords: Option<String>,

        #[arg(long, default_value = "technical")]
        mode: Mode,

        #[arg(long, default_value = "intermediate")]
        difficulty: Difficulty,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Score locally even if a model provider is configured
        #[arg(long)]
        local: bool,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Validate question bank files
    Validate {
        /// Path to a bank file or a directory of banks
        #[arg(long)]
        bank: PathBuf,
    },

    /// Render the report for a stored session
    Report {
        /// Session id
        session: String,

        /// Output format: text, markdown, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Show recent sessions and overall analytics
    History {
        /// Number of sessions to list
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Only sessions for this candidate
        #[arg(long)]
        user: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Manage interviewer meetings
    Meeting {
        #[command(subcommand)]
        action: MeetingAction,
    },

    /// Create a starter config and question bank
    Init,
}

#[derive(Subcommand)]
enum MeetingAction {
    /// Create a meeting code for candidates
    Create {
        /// Interviewer name
        #[arg(long)]
        by: String,

        /// Meeting type: async, live
        #[arg(long, default_value = "async")]
        kind: MeetingKind,

        /// Questions to ask every candidate (JSON array or TOML [[questions]])
        #[arg(long)]
        questions: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List meetings created by an interviewer
    List {
        /// Interviewer name
        #[arg(long)]
        by: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List sessions taken under a meeting
    Sessions {
        meeting: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Delete a meeting, keeping its sessions
    Delete {
        meeting: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Record the decision on a finished session
    Review {
        session: String,

        /// selected or rejected
        #[arg(long)]
        result: Selection,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[tokio::main]
async fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "mockview=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Practice {
            mode,
            difficulty,
            count,
            keywords,
            resume,
            job_description,
            questions,
            bank,
            meeting,
            user,
            format,
            output,
            local,
            seed,
            config,
        } => {
            commands::practice::execute(commands::practice::PracticeOptions {
                mode,
                difficulty,
                count,
                keywords,
                resume,
                job_description,
                questions,
                bank,
                meeting,
                user,
                format,
                output,
                local,
                seed,
                config,
            })
            .await
        }
        Commands::Evaluate {
            question,
            answer,
            keywords,
            mode,
            difficulty,
            format,
            local,
            config,
        } => {
            commands::evaluate::execute(
                question, answer, keywords, mode, difficulty, format, local, config,
            )
            .await
        }
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Report {
            session,
            format,
            output,
            config,
        } => commands::report::execute(session, format, output, config).await,
        Commands::History {
            limit,
            user,
            config,
        } => commands::history::execute(limit, user, config).await,
        Commands::Meeting { action } => match action {
            MeetingAction::Create {
                by,
                kind,
                questions,
                config,
            } => commands::meeting::create(by, kind, questions, config).await,
            MeetingAction::List { by, config } => commands::meeting::list(by, config).await,
            MeetingAction::Sessions { meeting, config } => {
                commands::meeting::sessions(meeting, config).await
            }
            MeetingAction::Delete { meeting, config } => {
                commands::meeting::delete(meeting, config).await
            }
            MeetingAction::Review {
                session,
                result,
                config,
            } => commands::meeting::review(session, result, config).await,
        },
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

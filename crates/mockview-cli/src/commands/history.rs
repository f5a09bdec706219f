//! The `mockview history` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use mockview_core::statistics::OverallAnalytics;
use mockview_core::store::{SessionRecord, SessionStatus, SessionStore};

use crate::ConfigArgs;

pub async fn execute(limit: usize, user: Option<String>, config_args: ConfigArgs) -> Result<()> {
    let config = super::load(&config_args)?;
    let store = super::open_store(&config_args, &config);

    let sessions = match &user {
        Some(name) => {
            let mut sessions = store.user_sessions(name).await?;
            sessions.truncate(limit);
            sessions
        }
        None => store.recent_sessions(limit).await?,
    };

    if sessions.is_empty() {
        println!("No sessions recorded yet. Run `mockview practice` to start one.");
        return Ok(());
    }

    println!("{}", sessions_table(&sessions));

    let overall = match &user {
        Some(_) => OverallAnalytics::from_records(&sessions),
        None => store.overall_analytics().await?,
    };
    print_overall(&overall);
    Ok(())
}

pub(crate) fn sessions_table(sessions: &[SessionRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Session",
        "User",
        "Mode",
        "Difficulty",
        "Started",
        "Answers",
        "Score",
        "Status",
    ]);

    for s in sessions {
        let score = s
            .overall_score
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "-".to_string());
        let status = match s.status {
            SessionStatus::Active => "active".to_string(),
            SessionStatus::Completed => "completed".to_string(),
            SessionStatus::Reviewed => match s.human_selection {
                Some(selection) => selection.to_string(),
                None => "reviewed".to_string(),
            },
        };
        table.add_row(vec![
            Cell::new(&s.session_id),
            Cell::new(&s.user_name),
            Cell::new(s.mode),
            Cell::new(s.difficulty),
            Cell::new(s.start_time.format("%Y-%m-%d %H:%M")),
            Cell::new(s.questions.len()),
            Cell::new(score),
            Cell::new(status),
        ]);
    }
    table
}

fn print_overall(overall: &OverallAnalytics) {
    println!(
        "\nSessions: {} ({} completed) | Answers: {} | Average score: {:.1}",
        overall.total_sessions,
        overall.completed_sessions,
        overall.total_questions_answered,
        overall.overall_average_score
    );
    let modes: Vec<String> = overall
        .mode_distribution
        .iter()
        .map(|(m, n)| format!("{m}: {n}"))
        .collect();
    let difficulties: Vec<String> = overall
        .difficulty_distribution
        .iter()
        .map(|(d, n)| format!("{d}: {n}"))
        .collect();
    println!("Modes: {}", modes.join(", "));
    println!("Difficulties: {}", difficulties.join(", "));
}

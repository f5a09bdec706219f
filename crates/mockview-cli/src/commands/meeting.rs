//! The `mockview meeting` commands: interviewer-side meeting codes and review.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mockview_core::bank::load_question_list;
use mockview_core::store::{MeetingKind, Selection, SessionStatus, SessionStore};

use crate::ConfigArgs;

pub async fn create(
    created_by: String,
    kind: MeetingKind,
    questions: Option<PathBuf>,
    config_args: ConfigArgs,
) -> Result<()> {
    let config = super::load(&config_args)?;
    let store = super::open_store(&config_args, &config);

    let custom_questions = match &questions {
        Some(path) => load_question_list(path)?,
        None => Vec::new(),
    };
    let count = custom_questions.len();
    let id = store.create_meeting(&created_by, kind, custom_questions).await?;

    println!("Meeting {id} created ({kind}, {count} custom question(s))");
    println!("Candidates join with: mockview practice --meeting {id}");
    Ok(())
}

pub async fn list(created_by: String, config_args: ConfigArgs) -> Result<()> {
    let config = super::load(&config_args)?;
    let store = super::open_store(&config_args, &config);

    let meetings = store.meetings_by_creator(&created_by).await?;
    if meetings.is_empty() {
        println!("No meetings created by {created_by}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Meeting", "Type", "Created", "Questions", "Participants", "Active"]);
    for m in &meetings {
        table.add_row(vec![
            Cell::new(&m.meeting_id),
            Cell::new(m.kind),
            Cell::new(m.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(m.custom_questions.len()),
            Cell::new(m.participants.len()),
            Cell::new(if m.active { "yes" } else { "no" }),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn sessions(meeting_id: String, config_args: ConfigArgs) -> Result<()> {
    let config = super::load(&config_args)?;
    let store = super::open_store(&config_args, &config);

    let sessions = store.sessions_by_meeting(&meeting_id).await?;
    if sessions.is_empty() {
        println!("No sessions for meeting {meeting_id}.");
        return Ok(());
    }
    println!("{}", super::history::sessions_table(&sessions));
    Ok(())
}

pub async fn delete(meeting_id: String, config_args: ConfigArgs) -> Result<()> {
    let config = super::load(&config_args)?;
    let store = super::open_store(&config_args, &config);

    anyhow::ensure!(
        store.delete_meeting(&meeting_id).await?,
        "meeting not found: {meeting_id}"
    );
    println!("Meeting {meeting_id} deleted; its sessions are kept.");
    Ok(())
}

pub async fn review(session_id: String, result: Selection, config_args: ConfigArgs) -> Result<()> {
    let config = super::load(&config_args)?;
    let store = super::open_store(&config_args, &config);

    let record = store
        .get_session(&session_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("session not found: {session_id}"))?;
    anyhow::ensure!(
        record.status.is_finished(),
        "session {session_id} is still active"
    );

    store
        .update_session_status(&session_id, SessionStatus::Reviewed, Some(result))
        .await?;
    println!("Session {session_id} marked {result}.");
    Ok(())
}

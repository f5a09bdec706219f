//! The `mockview report` command, plus report writing shared with `practice`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use mockview_core::report::InterviewReport;
use mockview_core::store::SessionStore;
use mockview_report::{generate_html, generate_text, write_html_report, write_text_report};

use crate::ConfigArgs;

pub const ALL_FORMATS: [&str; 4] = ["text", "markdown", "json", "html"];

pub async fn execute(
    session_id: String,
    format: String,
    output: Option<PathBuf>,
    config_args: ConfigArgs,
) -> Result<()> {
    let config = super::load(&config_args)?;
    let store = super::open_store(&config_args, &config);

    let report = build(&store, &session_id).await?;

    match output {
        Some(path) => {
            write(&report, &format, &path)?;
            eprintln!("Report written to: {}", path.display());
        }
        None => print!("{}", render(&report, &format)?),
    }
    Ok(())
}

/// Assemble the report for a stored session.
pub async fn build(store: &dyn SessionStore, session_id: &str) -> Result<InterviewReport> {
    let record = store
        .get_session(session_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("session not found: {session_id}"))?;
    let analytics = store.get_analytics(session_id).await?;
    Ok(InterviewReport::build(&record, &analytics))
}

pub fn render(report: &InterviewReport, format: &str) -> Result<String> {
    Ok(match format {
        "text" => generate_text(report),
        "markdown" | "md" => report.to_markdown(),
        "json" => serde_json::to_string_pretty(report)? + "\n",
        "html" => generate_html(report),
        other => anyhow::bail!("unknown report format: {other}"),
    })
}

pub fn write(report: &InterviewReport, format: &str, path: &Path) -> Result<()> {
    match format {
        "text" => write_text_report(report, path),
        "json" => report.save_json(path),
        "html" => write_html_report(report, path),
        _ => {
            let content = render(report, format)?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
            Ok(())
        }
    }
}

pub fn extension(format: &str) -> &'static str {
    match format {
        "text" => "txt",
        "markdown" | "md" => "md",
        "html" => "html",
        _ => "json",
    }
}

/// Parse a `--format` list: `all`, `none`, or comma-separated names.
pub fn parse_formats(format: &str) -> Result<Vec<&str>> {
    match format.trim() {
        "all" => Ok(ALL_FORMATS.to_vec()),
        "none" | "" => Ok(Vec::new()),
        list => list
            .split(',')
            .map(str::trim)
            .map(|f| match f {
                "text" | "markdown" | "md" | "json" | "html" => Ok(f),
                other => Err(anyhow::anyhow!("unknown report format: {other}")),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_lists() {
        assert_eq!(parse_formats("all").unwrap(), ALL_FORMATS.to_vec());
        assert!(parse_formats("none").unwrap().is_empty());
        assert_eq!(parse_formats("json, html").unwrap(), vec!["json", "html"]);
        assert!(parse_formats("pdf").is_err());
    }

    #[test]
    fn extensions() {
        assert_eq!(extension("text"), "txt");
        assert_eq!(extension("md"), "md");
        assert_eq!(extension("json"), "json");
    }
}

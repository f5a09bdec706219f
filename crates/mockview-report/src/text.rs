//! Plain-text report for terminals and plain files.

use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

use mockview_core::report::InterviewReport;

const WIDTH: usize = 60;

fn banner(out: &mut String, title: &str) {
    let rule = "=".repeat(WIDTH);
    let _ = writeln!(out, "{rule}\n{title}\n{rule}");
}

/// Render a report as banner-separated plain text.
pub fn generate_text(report: &InterviewReport) -> String {
    let m = &report.metadata;
    let s = &report.summary;
    let mut out = String::new();

    banner(&mut out, "INTERVIEW PERFORMANCE REPORT");
    let _ = writeln!(out, "Candidate:   {}", m.user_name);
    let _ = writeln!(out, "Session:     {}", m.session_id);
    let _ = writeln!(out, "Mode:        {}", m.mode);
    let _ = writeln!(out, "Difficulty:  {}", m.difficulty);
    let _ = writeln!(out, "Date:        {}", m.started_at.format("%Y-%m-%d %H:%M"));
    out.push('\n');

    banner(&mut out, "SUMMARY");
    let _ = writeln!(out, "Overall score:  {:.1}/100", s.overall_score);
    let _ = writeln!(
        out,
        "Questions:      {} ({} passed, {} failed)",
        s.total_questions, s.questions_passed, s.questions_failed
    );
    let _ = writeln!(out, "Duration:       {} min", s.duration_minutes);
    out.push('\n');

    banner(&mut out, "SKILL BREAKDOWN");
    for (label, score) in report.skill_breakdown.entries() {
        let _ = writeln!(out, "{label:<22} {score:>5.1}  {}", bar(score));
    }
    out.push('\n');

    if !report.questions.is_empty() {
        banner(&mut out, "QUESTIONS");
        for q in &report.questions {
            let e = &q.evaluation;
            let tag = if q.is_follow_up { " [follow-up]" } else { "" };
            let _ = writeln!(out, "{}. {}{tag}", q.number, q.question);
            let _ = writeln!(
                out,
                "   Score: {:.1} ({}) {}",
                e.overall,
                e.grade,
                if e.passed { "PASS" } else { "FAIL" }
            );
            if let Some(strength) = e.feedback.strengths.first() {
                let _ = writeln!(out, "   + {strength}");
            }
            if let Some(weakness) = e.feedback.weaknesses.first() {
                let _ = writeln!(out, "   - {weakness}");
            }
        }
        out.push('\n');
    }

    banner(&mut out, "RECOMMENDATIONS");
    for (i, suggestion) in report.suggestions.iter().enumerate() {
        let _ = writeln!(out, "{}. {suggestion}", i + 1);
    }
    let _ = writeln!(out, "\n{}", report.recommendation.message());

    out
}

/// Write a plain-text report to a file.
pub fn write_text_report(report: &InterviewReport, path: &Path) -> Result<()> {
    let text = generate_text(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    Ok(())
}

/// Twenty-cell bar, one cell per five points.
fn bar(score: f64) -> String {
    let filled = (score.clamp(0.0, 100.0) / 5.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}

//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use mockview_core::report::InterviewReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn score_class(score: f64) -> &'static str {
    if score >= 80.0 {
        "high"
    } else if score >= 60.0 {
        "mid"
    } else {
        "low"
    }
}

/// Generate an HTML page from an interview report.
pub fn generate_html(report: &InterviewReport) -> String {
    let m = &report.metadata;
    let s = &report.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Interview report: {}</title>\n",
        html_escape(&m.user_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Interview Performance Report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Candidate: <strong>{}</strong> | {} | {} | {} | session {}</p>\n",
        html_escape(&m.user_name),
        m.mode,
        m.difficulty,
        m.started_at.format("%Y-%m-%d %H:%M UTC"),
        html_escape(&m.session_id),
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"score {}\">{:.1}<span>/100</span></p>\n",
        score_class(s.overall_score),
        s.overall_score
    ));
    html.push_str("<table class=\"summary\">\n<tbody>\n");
    html.push_str(&format!(
        "<tr><th>Questions</th><td>{}</td></tr>\n<tr><th>Passed</th><td>{}</td></tr>\n<tr><th>Failed</th><td>{}</td></tr>\n<tr><th>Duration</th><td>{} min</td></tr>\n",
        s.total_questions, s.questions_passed, s.questions_failed, s.duration_minutes
    ));
    html.push_str("</tbody></table>\n");

    html.push_str("<h2>Skill Breakdown</h2>\n");
    html.push_str("<div class=\"skills\">\n");
    for (label, score) in report.skill_breakdown.entries() {
        html.push_str(&skill_bar(label, score));
    }
    html.push_str("</div>\n");
    html.push_str("</section>\n");

    // Per-question results
    if !report.questions.is_empty() {
        html.push_str("<section class=\"questions\">\n");
        html.push_str("<h2>Questions</h2>\n");
        for q in &report.questions {
            let e = &q.evaluation;
            let status = if e.passed { "pass" } else { "fail" };
            html.push_str(&format!("<article class=\"question {status}\">\n"));
            html.push_str(&format!(
                "<h3>{}. {}{}</h3>\n",
                q.number,
                html_escape(&q.question),
                if q.is_follow_up {
                    " <span class=\"tag\">follow-up</span>"
                } else {
                    ""
                }
            ));
            html.push_str(&format!(
                "<blockquote>{}</blockquote>\n",
                html_escape(&q.answer)
            ));
            html.push_str(&format!(
                "<p class=\"grade\">Score <strong>{:.1}</strong> | Grade {}</p>\n",
                e.overall,
                e.grade.label()
            ));
            push_list(&mut html, "Strengths", &e.feedback.strengths);
            push_list(&mut html, "Areas for improvement", &e.feedback.weaknesses);
            push_list(&mut html, "Missing points", &e.feedback.missing_points);
            html.push_str("</article>\n");
        }
        html.push_str("</section>\n");
    }

    // Recommendations
    html.push_str("<section class=\"recommendations\">\n");
    html.push_str("<h2>Recommendations</h2>\n");
    if !report.suggestions.is_empty() {
        html.push_str("<ol>\n");
        for suggestion in &report.suggestions {
            html.push_str(&format!("<li>{}</li>\n", html_escape(suggestion)));
        }
        html.push_str("</ol>\n");
    }
    html.push_str(&format!(
        "<p class=\"verdict\">{}</p>\n",
        html_escape(report.recommendation.message())
    ));
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str(&format!(
        "<footer>Generated {}</footer>\n",
        m.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &InterviewReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn skill_bar(label: &str, score: f64) -> String {
    let width = score.clamp(0.0, 100.0);
    format!(
        "<div class=\"skill\"><span class=\"label\">{}</span><div class=\"bar\"><div class=\"fill {}\" style=\"width: {:.1}%\"></div></div><span class=\"value\">{:.1}</span></div>\n",
        html_escape(label),
        score_class(score),
        width,
        score
    )
}

fn push_list(html: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    html.push_str(&format!("<p class=\"list-title\">{title}</p>\n<ul>\n"));
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", html_escape(item)));
    }
    html.push_str("</ul>\n");
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --high: #22c55e; --mid: #eab308; --low: #ef4444; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 900px; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, footer { color: #6b7280; }
.score { font-size: 3rem; font-weight: bold; margin: 0.5rem 0; }
.score span { font-size: 1.2rem; color: #6b7280; }
.score.high { color: var(--high); } .score.mid { color: var(--mid); } .score.low { color: var(--low); }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.4rem 1rem; text-align: left; }
.skill { display: flex; align-items: center; gap: 1rem; margin: 0.5rem 0; }
.skill .label { width: 180px; }
.skill .value { width: 3rem; text-align: right; }
.bar { flex: 1; height: 14px; background: var(--border); border-radius: 7px; overflow: hidden; }
.fill { height: 100%; }
.fill.high { background: var(--high); } .fill.mid { background: var(--mid); } .fill.low { background: var(--low); }
.question { border-left: 4px solid var(--border); padding: 0 1rem; margin: 1.5rem 0; }
.question.pass { border-color: var(--high); }
.question.fail { border-color: var(--low); }
.tag { font-size: 0.75rem; background: var(--border); border-radius: 4px; padding: 0.1rem 0.4rem; }
blockquote { margin: 0.5rem 0; color: #4b5563; font-style: italic; }
.list-title { font-weight: bold; margin-bottom: 0.2rem; }
.verdict { font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

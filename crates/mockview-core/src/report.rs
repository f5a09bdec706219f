//! Interview report data with JSON persistence and markdown rendering.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Evaluation, Mode};
use crate::statistics::{SessionAnalytics, SkillBreakdown};
use crate::store::SessionRecord;

/// Most suggestions carried into a report.
pub const MAX_SUGGESTIONS: usize = 5;

/// Characters of each answer kept in markdown output.
const ANSWER_PREVIEW_CHARS: usize = 200;

/// Overall verdict for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Excellent,
    Good,
    Satisfactory,
    NeedsPractice,
}

impl Recommendation {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 70.0 {
            Self::Good
        } else if score >= 60.0 {
            Self::Satisfactory
        } else {
            Self::NeedsPractice
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent performance! You're well-prepared for interviews.",
            Self::Good => "Good performance. Focus on the specific areas mentioned above.",
            Self::Satisfactory => "Satisfactory performance. Practice more in weak areas.",
            Self::NeedsPractice => {
                "More practice needed. Focus on fundamentals and build confidence."
            }
        }
    }
}

/// A complete interview report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewReport {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    pub skill_breakdown: SkillBreakdown,
    pub questions: Vec<QuestionEntry>,
    /// De-duplicated suggestions, first seen first.
    pub suggestions: Vec<String>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub session_id: String,
    pub user_name: String,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub started_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub overall_score: f64,
    pub total_questions: usize,
    pub questions_passed: usize,
    pub questions_failed: usize,
    pub duration_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub number: usize,
    pub question: String,
    pub is_follow_up: bool,
    pub answer: String,
    pub evaluation: Evaluation,
}

impl InterviewReport {
    /// Assemble a report from a stored session and its analytics.
    pub fn build(record: &SessionRecord, analytics: &SessionAnalytics) -> Self {
        let questions: Vec<QuestionEntry> = record
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| QuestionEntry {
                number: i + 1,
                question: q.question.text.clone(),
                is_follow_up: q.question.is_follow_up,
                answer: q.answer.clone(),
                evaluation: q.evaluation.clone(),
            })
            .collect();

        let suggestions = collect_suggestions(questions.iter().map(|q| &q.evaluation));
        let overall_score = record.overall_score.unwrap_or(analytics.average_score);

        Self {
            metadata: ReportMetadata {
                session_id: record.session_id.clone(),
                user_name: record.user_name.clone(),
                mode: record.mode,
                difficulty: record.difficulty,
                started_at: record.start_time,
                generated_at: Utc::now(),
            },
            summary: ReportSummary {
                overall_score,
                total_questions: analytics.total_questions,
                questions_passed: analytics.questions_passed,
                questions_failed: analytics.questions_failed,
                duration_minutes: analytics.duration_minutes,
            },
            skill_breakdown: analytics.skill_breakdown,
            questions,
            suggestions,
            recommendation: Recommendation::for_score(overall_score),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse report JSON")
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let m = &self.metadata;
        let s = &self.summary;
        let mut md = String::new();

        md.push_str("# Interview Performance Report\n\n");
        md.push_str(&format!(
            "**Candidate:** {} | **Mode:** {} | **Difficulty:** {} | **Date:** {}\n\n",
            m.user_name,
            m.mode,
            m.difficulty,
            m.started_at.format("%Y-%m-%d")
        ));

        md.push_str("## Summary\n\n");
        md.push_str(&format!("- Overall score: **{:.1}/100**\n", s.overall_score));
        md.push_str(&format!(
            "- Questions: {} ({} passed, {} failed)\n",
            s.total_questions, s.questions_passed, s.questions_failed
        ));
        md.push_str(&format!("- Duration: {} minutes\n\n", s.duration_minutes));

        md.push_str("## Skill Breakdown\n\n");
        md.push_str("| Skill | Score |\n");
        md.push_str("|-------|-------|\n");
        for (label, score) in self.skill_breakdown.entries() {
            md.push_str(&format!("| {label} | {score:.1} |\n"));
        }
        md.push('\n');

        if !self.questions.is_empty() {
            md.push_str("## Questions\n\n");
            for q in &self.questions {
                let tag = if q.is_follow_up { " (follow-up)" } else { "" };
                md.push_str(&format!("### {}. {}{tag}\n\n", q.number, q.question));
                md.push_str(&format!("> {}\n\n", preview(&q.answer)));
                md.push_str(&format!(
                    "Score: **{:.1}** ({})\n",
                    q.evaluation.overall, q.evaluation.grade
                ));
                let fb = &q.evaluation.feedback;
                if !fb.strengths.is_empty() {
                    md.push_str(&format!("- Strengths: {}\n", join_first(&fb.strengths, 2)));
                }
                if !fb.weaknesses.is_empty() {
                    md.push_str(&format!(
                        "- Areas for improvement: {}\n",
                        join_first(&fb.weaknesses, 2)
                    ));
                }
                md.push('\n');
            }
        }

        md.push_str("## Recommendations\n\n");
        for (i, suggestion) in self.suggestions.iter().enumerate() {
            md.push_str(&format!("{}. {suggestion}\n", i + 1));
        }
        if !self.suggestions.is_empty() {
            md.push('\n');
        }
        md.push_str(&format!("**{}**\n", self.recommendation.message()));

        md
    }
}

/// Unique suggestions across evaluations, in first-seen order, capped.
pub fn collect_suggestions<'a>(evaluations: impl IntoIterator<Item = &'a Evaluation>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for evaluation in evaluations {
        for suggestion in &evaluation.feedback.suggestions {
            if out.len() == MAX_SUGGESTIONS {
                return out;
            }
            if seen.insert(suggestion.as_str()) {
                out.push(suggestion.clone());
            }
        }
    }
    out
}

fn preview(answer: &str) -> String {
    let mut out: String = answer.chars().take(ANSWER_PREVIEW_CHARS).collect();
    if answer.chars().count() > ANSWER_PREVIEW_CHARS {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn join_first(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

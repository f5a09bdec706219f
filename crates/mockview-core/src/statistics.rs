//! Per-session and cross-session analytics over stored interview records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Mode};
use crate::scoring::round1;
use crate::store::{SessionRecord, SessionStatus};

/// Mean sub-scores across a session's answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillBreakdown {
    pub technical_accuracy: f64,
    pub communication_skills: f64,
    pub sentiment_tone: f64,
    pub completeness: f64,
}

impl SkillBreakdown {
    /// `(label, score)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("Technical Accuracy", self.technical_accuracy),
            ("Communication Skills", self.communication_skills),
            ("Sentiment & Tone", self.sentiment_tone),
            ("Completeness", self.completeness),
        ]
    }
}

/// Analytics for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalytics {
    pub total_questions: usize,
    pub average_score: f64,
    pub questions_passed: usize,
    pub questions_failed: usize,
    pub skill_breakdown: SkillBreakdown,
    pub duration_minutes: f64,
}

impl SessionAnalytics {
    pub fn from_record(record: &SessionRecord) -> Self {
        let questions = &record.questions;
        if questions.is_empty() {
            return Self::default();
        }

        let n = questions.len() as f64;
        let mean = |f: fn(&crate::model::Evaluation) -> f64| {
            round1(questions.iter().map(|q| f(&q.evaluation)).sum::<f64>() / n)
        };

        let average_score = record
            .overall_score
            .unwrap_or_else(|| mean(|e| e.overall));
        let questions_passed = questions
            .iter()
            .filter(|q| q.evaluation.passed)
            .count();

        Self {
            total_questions: questions.len(),
            average_score,
            questions_passed,
            questions_failed: questions.len() - questions_passed,
            skill_breakdown: SkillBreakdown {
                technical_accuracy: mean(|e| e.technical_accuracy),
                communication_skills: mean(|e| e.communication_skills),
                sentiment_tone: mean(|e| e.sentiment_tone),
                completeness: mean(|e| e.completeness),
            },
            duration_minutes: record.duration_minutes(),
        }
    }
}

/// Analytics across every stored session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallAnalytics {
    pub total_sessions: usize,
    pub completed_sessions: usize,
    /// Answers across completed sessions.
    pub total_questions_answered: usize,
    /// Mean stored overall across completed sessions.
    pub overall_average_score: f64,
    pub mode_distribution: BTreeMap<Mode, usize>,
    pub difficulty_distribution: BTreeMap<Difficulty, usize>,
}

impl OverallAnalytics {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a SessionRecord>) -> Self {
        let mut stats = Self::default();
        let mut score_sum = 0.0;

        for record in records {
            stats.total_sessions += 1;
            *stats.mode_distribution.entry(record.mode).or_default() += 1;
            *stats
                .difficulty_distribution
                .entry(record.difficulty)
                .or_default() += 1;

            if record.status.is_finished() {
                stats.completed_sessions += 1;
                stats.total_questions_answered += record.questions.len();
                score_sum += record.overall_score.unwrap_or(0.0);
            }
        }

        if stats.completed_sessions > 0 {
            stats.overall_average_score = round1(score_sum / stats.completed_sessions as f64);
        }
        stats
    }
}

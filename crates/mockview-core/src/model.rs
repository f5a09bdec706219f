//! Core data model types for mockview.
//!
//! These are the fundamental types that the entire mockview system uses
//! to represent interview modes, questions, and answer evaluations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interview category. Controls scoring weights and the question pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "HR", alias = "hr")]
    Hr,
    #[serde(alias = "technical")]
    Technical,
    #[serde(alias = "behavioral")]
    Behavioral,
    #[serde(alias = "mixed")]
    Mixed,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Hr, Mode::Technical, Mode::Behavioral, Mode::Mixed];

    /// Modes whose feedback calls out missing technical keywords.
    pub fn emphasizes_technical(self) -> bool {
        matches!(self, Mode::Technical | Mode::Mixed)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Hr => write!(f, "HR"),
            Mode::Technical => write!(f, "Technical"),
            Mode::Behavioral => write!(f, "Behavioral"),
            Mode::Mixed => write!(f, "Mixed"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hr" => Ok(Mode::Hr),
            "technical" | "tech" => Ok(Mode::Technical),
            "behavioral" | "behavioural" => Ok(Mode::Behavioral),
            "mixed" => Ok(Mode::Mixed),
            other => Err(format!("unknown interview mode: {other}")),
        }
    }
}

/// Question tier. Controls pool selection and template phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "beginner")]
    Beginner,
    #[serde(alias = "intermediate")]
    Intermediate,
    #[serde(alias = "advanced")]
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "Beginner"),
            Difficulty::Intermediate => write!(f, "Intermediate"),
            Difficulty::Advanced => write!(f, "Advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Ok(Difficulty::Beginner),
            "intermediate" | "medium" => Ok(Difficulty::Intermediate),
            "advanced" | "hard" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A single interview question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The question as asked.
    #[serde(alias = "question")]
    pub text: String,
    /// Terms a strong answer is expected to mention.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Technical concepts (`snake_case` allowed, read as space separated).
    #[serde(default)]
    pub technical_concepts: Vec<String>,
    /// How long a complete spoken answer should take.
    #[serde(alias = "expected_duration", default = "default_duration")]
    pub expected_duration_seconds: u32,
    /// Injected after a weak answer; not counted toward the target.
    #[serde(default)]
    pub is_follow_up: bool,
    /// Produced from resume/job-description context rather than the bank.
    #[serde(alias = "custom_generated", default)]
    pub is_custom_generated: bool,
    /// Reference answer, if the bank author supplied one.
    #[serde(alias = "expected_answer", default, skip_serializing_if = "Option::is_none")]
    pub ideal_answer: Option<String>,
    /// For follow-ups, the text of the question being followed up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_question: Option<String>,
}

fn default_duration() -> u32 {
    60
}

impl Question {
    /// A plain question with keywords and the default duration.
    pub fn new(text: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            text: text.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            technical_concepts: Vec::new(),
            expected_duration_seconds: default_duration(),
            is_follow_up: false,
            is_custom_generated: false,
            ideal_answer: None,
            original_question: None,
        }
    }

    pub fn with_concepts(mut self, concepts: &[&str]) -> Self {
        self.technical_concepts = concepts.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.expected_duration_seconds = seconds;
        self
    }

    pub fn with_ideal_answer(mut self, answer: impl Into<String>) -> Self {
        self.ideal_answer = Some(answer.into());
        self
    }

    /// Number of this question's keywords that appear in `targets` (already lowercased).
    pub fn keyword_overlap(&self, targets: &std::collections::HashSet<String>) -> usize {
        self.keywords
            .iter()
            .filter(|k| targets.contains(&k.to_lowercase()))
            .count()
    }
}

/// Letter grade for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Human label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Grade::A => "A (Excellent)",
            Grade::B => "B (Very Good)",
            Grade::C => "C (Good)",
            Grade::D => "D (Satisfactory)",
            Grade::F => "F (Needs Improvement)",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{letter}")
    }
}

/// Structured, rule-based feedback for one answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, alias = "missing_technical_points")]
    pub missing_points: Vec<String>,
}

impl Feedback {
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.suggestions.is_empty()
            && self.missing_points.is_empty()
    }
}

/// The scored result for one answer. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(alias = "overall_score")]
    pub overall: f64,
    pub technical_accuracy: f64,
    pub communication_skills: f64,
    pub sentiment_tone: f64,
    pub completeness: f64,
    pub grade: Grade,
    pub passed: bool,
    pub feedback: Feedback,
}

/// Why a follow-up question is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpReason {
    Incomplete,
    TooShort,
    Vague,
    NoExample,
}

impl fmt::Display for FollowUpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowUpReason::Incomplete => write!(f, "incomplete"),
            FollowUpReason::TooShort => write!(f, "too_short"),
            FollowUpReason::Vague => write!(f, "vague"),
            FollowUpReason::NoExample => write!(f, "no_example"),
        }
    }
}

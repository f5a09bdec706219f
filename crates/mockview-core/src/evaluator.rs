//! Answer evaluator.
//!
//! Wraps the deterministic [`LocalScorer`] and, optionally, an external model.
//! The model path is best-effort: a timeout, provider error or unusable
//! response is logged and the local evaluation is returned instead.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::error::{warn_fallback, ProviderError};
use crate::feedback::build_feedback;
use crate::model::{Difficulty, Evaluation, Feedback, Mode, Question};
use crate::scoring::{AnswerProfile, LocalScorer, SubScores};
use crate::traits::{extract_json_from_markdown, GenerateRequest, LlmProvider};

/// Default bound on a single model call.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(20);

/// External-model scoring settings.
#[derive(Clone)]
struct ModelScoring {
    provider: Arc<dyn LlmProvider>,
    model: String,
    timeout: Duration,
}

/// Scores answers with the local heuristics or an external model.
#[derive(Clone)]
pub struct Evaluator {
    scorer: LocalScorer,
    model: Option<ModelScoring>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::local(LocalScorer::default())
    }
}

impl Evaluator {
    /// Purely local, deterministic evaluator.
    pub fn local(scorer: LocalScorer) -> Self {
        Self {
            scorer,
            model: None,
        }
    }

    /// Evaluator that asks `provider` first and falls back to `scorer`.
    pub fn with_model(
        scorer: LocalScorer,
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            scorer,
            model: Some(ModelScoring {
                provider,
                model: model.into(),
                timeout,
            }),
        }
    }

    pub fn scorer(&self) -> &LocalScorer {
        &self.scorer
    }

    pub fn uses_model(&self) -> bool {
        self.model.is_some()
    }

    /// Score one answer. Never fails.
    pub async fn evaluate(
        &self,
        answer: &str,
        question: &Question,
        mode: Mode,
        difficulty: Difficulty,
    ) -> Evaluation {
        if let Some(model) = &self.model {
            match self
                .evaluate_with_model(model, answer, question, mode, difficulty)
                .await
            {
                Ok(evaluation) => return evaluation,
                Err(e) => warn_fallback(model.provider.name(), "using local scorer", &e),
            }
        }
        self.scorer.evaluate(answer, question, mode)
    }

    async fn evaluate_with_model(
        &self,
        model: &ModelScoring,
        answer: &str,
        question: &Question,
        mode: Mode,
        difficulty: Difficulty,
    ) -> anyhow::Result<Evaluation> {
        let mut request = GenerateRequest::new(
            &model.model,
            scoring_prompt(answer, question, mode, difficulty),
        );
        request.temperature = 0.0;

        let response = tokio::time::timeout(model.timeout, model.provider.generate(&request))
            .await
            .map_err(|_| ProviderError::Timeout(model.timeout.as_secs()))??;

        let payload = extract_json_from_markdown(&response.content);
        let verdict: ModelVerdict = serde_json::from_str(&payload)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
            .context("model returned unusable scoring JSON")?;

        let scores = SubScores {
            technical: verdict.technical_accuracy,
            communication: verdict.communication_skills,
            sentiment: verdict.sentiment_tone,
            completeness: verdict.completeness,
        };

        let feedback = match verdict.feedback {
            Some(fb) if !fb.is_empty() => fb,
            _ => build_feedback(&AnswerProfile::new(answer), question, &scores.clamped(), mode),
        };

        Ok(self
            .scorer
            .compose(scores, verdict.overall_score, mode, feedback))
    }
}

/// Shape of the JSON the scoring prompt asks for.
#[derive(Debug, Deserialize)]
struct ModelVerdict {
    technical_accuracy: f64,
    communication_skills: f64,
    sentiment_tone: f64,
    completeness: f64,
    #[serde(default, alias = "overall")]
    overall_score: Option<f64>,
    #[serde(default)]
    feedback: Option<Feedback>,
}

fn scoring_prompt(answer: &str, question: &Question, mode: Mode, difficulty: Difficulty) -> String {
    let ideal = question.ideal_answer.as_deref().unwrap_or("Not provided");
    format!(
        r#"Act as an expert {mode} interviewer evaluating a candidate for a {difficulty} level position.

Question: "{question}"
Expected keywords: {keywords}
Reference answer: "{ideal}"

Candidate answer: "{answer}"

Score each criterion from 0 to 100 and respond with JSON only, in exactly this shape:
{{
  "technical_accuracy": <number>,
  "communication_skills": <number>,
  "sentiment_tone": <number>,
  "completeness": <number>,
  "overall_score": <number>,
  "feedback": {{
    "strengths": ["..."],
    "weaknesses": ["..."],
    "suggestions": ["..."],
    "missing_points": ["..."]
  }}
}}"#,
        question = question.text,
        keywords = question.keywords.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Grade;
    use crate::testing::ScriptedProvider;

    fn evaluator(provider: ScriptedProvider) -> Evaluator {
        Evaluator::with_model(
            LocalScorer::default(),
            Arc::new(provider),
            "test-model",
            Duration::from_secs(5),
        )
    }

    fn question() -> Question {
        Question::new("What is a closure?", &["function", "environment", "capture"])
    }

    const ANSWER: &str = "A closure is a function that captures variables from its \
                          surrounding environment so it can use them later.";

    #[tokio::test]
    async fn local_evaluator_is_deterministic() {
        let e = Evaluator::default();
        let a = e
            .evaluate(ANSWER, &question(), Mode::Technical, Difficulty::Beginner)
            .await;
        let b = e
            .evaluate(ANSWER, &question(), Mode::Technical, Difficulty::Beginner)
            .await;
        assert_eq!(a, b);
        assert!(!e.uses_model());
    }

    #[tokio::test]
    async fn model_scores_are_used_and_grade_recomputed() {
        let e = evaluator(ScriptedProvider::reply(
            r#"```json
{"technical_accuracy": 90, "communication_skills": 80, "sentiment_tone": 70,
 "completeness": 85, "overall_score": 84.44,
 "feedback": {"strengths": ["Precise"], "weaknesses": [], "suggestions": []}}
```"#,
        ));
        let eval = e
            .evaluate(ANSWER, &question(), Mode::Technical, Difficulty::Beginner)
            .await;
        assert_eq!(eval.technical_accuracy, 90.0);
        assert_eq!(eval.overall, 84.4);
        assert_eq!(eval.grade, Grade::B);
        assert!(eval.passed);
        assert_eq!(eval.feedback.strengths, vec!["Precise".to_string()]);
    }

    #[tokio::test]
    async fn missing_overall_is_recomputed_and_scores_clamped() {
        let e = evaluator(ScriptedProvider::reply(
            r#"{"technical_accuracy": 150, "communication_skills": 50,
                "sentiment_tone": 50, "completeness": 50}"#,
        ));
        let eval = e
            .evaluate(ANSWER, &question(), Mode::Technical, Difficulty::Beginner)
            .await;
        assert_eq!(eval.technical_accuracy, 100.0);
        // 0.40*100 + 0.25*50 + 0.15*50 + 0.20*50
        assert_eq!(eval.overall, 70.0);
        assert_eq!(eval.grade, Grade::C);
        assert!(!eval.feedback.is_empty());
    }

    #[tokio::test]
    async fn provider_error_falls_back_to_local() {
        let local = Evaluator::default()
            .evaluate(ANSWER, &question(), Mode::Mixed, Difficulty::Advanced)
            .await;
        let eval = evaluator(ScriptedProvider::failing())
            .evaluate(ANSWER, &question(), Mode::Mixed, Difficulty::Advanced)
            .await;
        assert_eq!(eval, local);
    }

    #[tokio::test]
    async fn malformed_json_falls_back_to_local() {
        let local = Evaluator::default()
            .evaluate(ANSWER, &question(), Mode::Hr, Difficulty::Beginner)
            .await;
        let eval = evaluator(ScriptedProvider::reply("I'd give this a solid B+!"))
            .evaluate(ANSWER, &question(), Mode::Hr, Difficulty::Beginner)
            .await;
        assert_eq!(eval, local);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_falls_back_to_local() {
        let local = Evaluator::default()
            .evaluate(ANSWER, &question(), Mode::Technical, Difficulty::Intermediate)
            .await;
        let eval = evaluator(ScriptedProvider::hanging())
            .evaluate(ANSWER, &question(), Mode::Technical, Difficulty::Intermediate)
            .await;
        assert_eq!(eval, local);
    }

    #[test]
    fn prompt_mentions_question_and_reference() {
        let q = question().with_ideal_answer("A function plus its captured environment.");
        let prompt = scoring_prompt("my answer", &q, Mode::Technical, Difficulty::Advanced);
        assert!(prompt.contains("\"What is a closure?\""));
        assert!(prompt.contains("function, environment, capture"));
        assert!(prompt.contains("captured environment"));
        assert!(prompt.contains("Advanced level"));
    }
}

//! Live interview orchestrator.
//!
//! An [`Interview`] ties one [`FlowManager`] to a shared [`Evaluator`] and a
//! [`SessionStore`]. Every user action is a single call: draw the next
//! question, submit a typed or spoken answer, or finish. Persistence is
//! best-effort; a failing store is logged and the interview carries on.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::evaluator::Evaluator;
use crate::flow::{FlowManager, Progress, SessionContext};
use crate::model::{Difficulty, Evaluation, Mode, Question};
use crate::scoring::round1;
use crate::store::{QuestionResponse, SessionStore, Speaker};
use crate::transcription::{AudioClip, SpeechMetrics, Transcriber, TranscriptionError};

/// Default bound on one transcription call.
pub const DEFAULT_TRANSCRIPTION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum InterviewError {
    /// An answer arrived with no question outstanding.
    #[error("no question is waiting for an answer")]
    NoPendingQuestion,

    /// The recording could not be transcribed; ask the candidate again.
    #[error("could not transcribe the answer, please record it again: {0}")]
    RetryRecording(#[source] TranscriptionError),
}

/// How to start an interview.
#[derive(Debug, Clone)]
pub struct InterviewRequest {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub question_count: usize,
    pub user_name: String,
    pub context: SessionContext,
    pub metadata: Map<String, Value>,
    /// Meeting the session is taken under; its questions are asked when
    /// the context forces none.
    pub meeting_id: Option<String>,
}

impl InterviewRequest {
    pub fn new(mode: Mode, difficulty: Difficulty, question_count: usize) -> Self {
        Self {
            mode,
            difficulty,
            question_count,
            user_name: "Anonymous".into(),
            context: SessionContext::default(),
            metadata: Map::new(),
            meeting_id: None,
        }
    }
}

/// Result of one submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub evaluation: Evaluation,
    /// The next draw will be a follow-up on this answer.
    pub follow_up_queued: bool,
    /// Transcribed text, for spoken answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

/// Totals for a finished interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSummary {
    /// Durable record id, if the store accepted the session.
    pub session_id: Option<String>,
    pub answered: usize,
    pub average_score: f64,
    pub passed: usize,
    pub follow_ups: u32,
}

/// Callbacks for a front end following the interview.
pub trait InterviewReporter: Send + Sync {
    fn on_question(&self, question: &Question, progress: &Progress);
    fn on_evaluation(&self, question: &Question, evaluation: &Evaluation);
    fn on_follow_up(&self, question: &Question);
    fn on_complete(&self, summary: &InterviewSummary);
}

/// Reporter that ignores every event.
pub struct NoopReporter;

impl InterviewReporter for NoopReporter {
    fn on_question(&self, _: &Question, _: &Progress) {}
    fn on_evaluation(&self, _: &Question, _: &Evaluation) {}
    fn on_follow_up(&self, _: &Question) {}
    fn on_complete(&self, _: &InterviewSummary) {}
}

/// One live interview.
pub struct Interview {
    flow: FlowManager,
    evaluator: Arc<Evaluator>,
    store: Arc<dyn SessionStore>,
    reporter: Arc<dyn InterviewReporter>,
    session_id: Option<String>,
    mode: Mode,
    difficulty: Difficulty,
    pending: Option<Question>,
    scores: Vec<f64>,
    transcription_timeout: Duration,
}

impl Interview {
    /// Create the durable record and start the flow.
    pub async fn start(
        mut flow: FlowManager,
        evaluator: Arc<Evaluator>,
        store: Arc<dyn SessionStore>,
        request: InterviewRequest,
    ) -> Self {
        let InterviewRequest {
            mode,
            difficulty,
            question_count,
            user_name,
            mut context,
            metadata,
            meeting_id,
        } = request;

        if let Some(id) = &meeting_id {
            match store.get_meeting(id).await {
                Ok(Some(meeting)) if meeting.active => {
                    if context.forced_questions.is_empty() {
                        context.forced_questions = meeting.custom_questions;
                    }
                }
                Ok(_) => tracing::warn!(meeting = %id, "meeting not found or inactive"),
                Err(e) => tracing::warn!(meeting = %id, "could not load meeting: {e}"),
            }
        }

        let session_id = match store
            .create_session(mode, difficulty, &user_name, metadata, meeting_id.as_deref())
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("could not create session record, continuing without one: {e}");
                None
            }
        };

        flow.start_session(mode, difficulty, question_count, context)
            .await;

        Self {
            flow,
            evaluator,
            store,
            reporter: Arc::new(NoopReporter),
            session_id,
            mode,
            difficulty,
            pending: None,
            scores: Vec::new(),
            transcription_timeout: DEFAULT_TRANSCRIPTION_TIMEOUT,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn InterviewReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_transcription_timeout(mut self, timeout: Duration) -> Self {
        self.transcription_timeout = timeout;
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn progress(&self) -> Progress {
        self.flow.get_progress()
    }

    pub fn pending_question(&self) -> Option<&Question> {
        self.pending.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_none() && self.flow.is_complete()
    }

    /// The question to answer now.
    ///
    /// An unanswered question is returned again rather than skipped.
    pub async fn next_question(&mut self) -> Option<Question> {
        if let Some(question) = &self.pending {
            return Some(question.clone());
        }

        let question = self.flow.get_next_question().await?;
        if question.is_follow_up {
            self.reporter.on_follow_up(&question);
        } else {
            self.reporter.on_question(&question, &self.flow.get_progress());
        }
        self.persist_transcript(Speaker::Interviewer, &question.text)
            .await;
        self.pending = Some(question.clone());
        Some(question)
    }

    /// Score a typed (or already transcribed) answer to the pending question.
    pub async fn submit_answer(
        &mut self,
        answer: &str,
        stt_metrics: Option<SpeechMetrics>,
        duration_secs: Option<f64>,
    ) -> Result<AnswerOutcome, InterviewError> {
        let question = self
            .pending
            .take()
            .ok_or(InterviewError::NoPendingQuestion)?;

        let evaluation = self
            .evaluator
            .evaluate(answer, &question, self.mode, self.difficulty)
            .await;

        self.flow.record_answer_for_followup(answer);
        let follow_up_queued = self.flow.should_trigger_follow_up(&evaluation);
        self.scores.push(evaluation.overall);

        tracing::info!(
            overall = evaluation.overall,
            grade = %evaluation.grade,
            follow_up = follow_up_queued,
            "answer evaluated"
        );

        self.persist_transcript(Speaker::Candidate, answer).await;
        if let Some(id) = &self.session_id {
            let response = QuestionResponse {
                question: question.clone(),
                answer: answer.to_string(),
                evaluation: evaluation.clone(),
                stt_metrics,
                duration_secs,
            };
            if let Err(e) = self.store.add_question_response(id, response).await {
                tracing::warn!(session = %id, "could not save answer: {e}");
            }
        }

        self.reporter.on_evaluation(&question, &evaluation);
        Ok(AnswerOutcome {
            evaluation,
            follow_up_queued,
            transcript: None,
        })
    }

    /// Transcribe a recorded answer, then score it.
    ///
    /// A failed or empty transcription leaves the question pending.
    pub async fn submit_audio(
        &mut self,
        transcriber: &dyn Transcriber,
        clip: &AudioClip,
    ) -> Result<AnswerOutcome, InterviewError> {
        if self.pending.is_none() {
            return Err(InterviewError::NoPendingQuestion);
        }

        let transcription =
            match tokio::time::timeout(self.transcription_timeout, transcriber.transcribe(clip))
                .await
            {
                Ok(Ok(t)) if t.text.trim().is_empty() => Err(TranscriptionError::NoSpeech),
                Ok(result) => result,
                Err(_) => Err(TranscriptionError::Timeout(
                    self.transcription_timeout.as_secs(),
                )),
            }
            .map_err(|e| {
                tracing::warn!(transcriber = transcriber.name(), "transcription failed: {e}");
                InterviewError::RetryRecording(e)
            })?;

        let mut outcome = self
            .submit_answer(
                &transcription.text,
                Some(transcription.metrics.clone()),
                Some(transcription.duration_secs),
            )
            .await?;
        outcome.transcript = Some(transcription.text);
        Ok(outcome)
    }

    /// End the durable session and the flow.
    pub async fn finish(mut self) -> InterviewSummary {
        let follow_ups = self
            .flow
            .end_session()
            .map_or(0, |s| s.follow_ups_served);

        if let Some(id) = &self.session_id {
            if let Err(e) = self.store.end_session(id).await {
                tracing::warn!(session = %id, "could not close session record: {e}");
            }
        }

        let answered = self.scores.len();
        let average_score = if answered == 0 {
            0.0
        } else {
            round1(self.scores.iter().sum::<f64>() / answered as f64)
        };
        let summary = InterviewSummary {
            session_id: self.session_id.take(),
            answered,
            average_score,
            passed: self
                .scores
                .iter()
                .filter(|s| self.evaluator.scorer().config().passed(**s))
                .count(),
            follow_ups,
        };

        tracing::info!(
            answered = summary.answered,
            average = summary.average_score,
            "interview finished"
        );
        self.reporter.on_complete(&summary);
        summary
    }

    async fn persist_transcript(&self, speaker: Speaker, text: &str) {
        if let Some(id) = &self.session_id {
            if let Err(e) = self.store.append_transcript(id, speaker, text).await {
                tracing::warn!(session = %id, "could not save transcript line: {e}");
            }
        }
    }
}

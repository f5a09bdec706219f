//! Interview flow: question pool construction, drawing, recycling and
//! follow-up injection for one live session.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::bank::QuestionBank;
use crate::error::warn_fallback;
use crate::generation::{
    follow_up_question, follow_up_templates, QuestionGenerator, QuestionTemplater,
};
use crate::model::{Difficulty, Evaluation, FollowUpReason, Mode, Question};

/// Completeness below this queues an `Incomplete` follow-up.
pub const FOLLOW_UP_COMPLETENESS: f64 = 60.0;
/// Overall below this queues a `TooShort` follow-up.
pub const FOLLOW_UP_OVERALL: f64 = 50.0;

/// How the next question is picked from the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawPolicy {
    /// Uniformly at random.
    #[default]
    Random,
    /// Head of the pool, so keyword ranking and template order are kept.
    Ranked,
}

/// Candidate context used to tailor the question pool.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub target_keywords: Vec<String>,
    pub resume_text: String,
    pub job_description: String,
    /// When non-empty, used verbatim and overrides the target count.
    pub forced_questions: Vec<Question>,
}

impl SessionContext {
    pub fn has_profile(&self) -> bool {
        !self.resume_text.trim().is_empty() || !self.job_description.trim().is_empty()
    }
}

/// State of one live session. Owned and mutated only by [`FlowManager`].
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub target_question_count: usize,
    pub current_index: usize,
    pub asked: Vec<Question>,
    pub available_pool: Vec<Question>,
    pub follow_up_pending: bool,
    pub follow_up_reason: Option<FollowUpReason>,
    pub last_answer: Option<String>,
    pub recycle_count: u32,
    pub follow_ups_served: u32,
    /// The question being answered is a follow-up; follow-ups do not chain.
    pub answering_follow_up: bool,
}

/// Snapshot of session progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub active: bool,
    pub current: usize,
    pub total: usize,
    pub percent: f64,
    pub mode: Option<Mode>,
    pub difficulty: Option<Difficulty>,
}

/// Drives question selection for one session at a time.
pub struct FlowManager {
    bank: Arc<QuestionBank>,
    templater: QuestionTemplater,
    generator: Option<QuestionGenerator>,
    policy: DrawPolicy,
    rng: StdRng,
    session: Option<Session>,
}

impl FlowManager {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            bank,
            templater: QuestionTemplater::new(),
            generator: None,
            policy: DrawPolicy::default(),
            rng: StdRng::from_entropy(),
            session: None,
        }
    }

    /// Use an external model for question lists and follow-ups.
    pub fn with_generator(mut self, generator: QuestionGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Reproducible draws.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_policy(mut self, policy: DrawPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Build the pool and reset all per-session state.
    pub async fn start_session(
        &mut self,
        mode: Mode,
        difficulty: Difficulty,
        target_count: usize,
        context: SessionContext,
    ) -> &Session {
        let mut target = target_count;

        let pool = if !context.forced_questions.is_empty() {
            target = context.forced_questions.len();
            tracing::info!(count = target, "using forced question list");
            context.forced_questions.clone()
        } else {
            let generated = self
                .generate_pool(&context, mode, difficulty, target_count)
                .await;
            match generated {
                Some(questions) => questions,
                None => self.bank_pool(&context, mode, difficulty),
            }
        };

        tracing::info!(
            %mode,
            %difficulty,
            target,
            pool = pool.len(),
            "session started"
        );

        self.session.insert(Session {
            mode,
            difficulty,
            target_question_count: target,
            current_index: 0,
            asked: Vec::new(),
            available_pool: pool,
            follow_up_pending: false,
            follow_up_reason: None,
            last_answer: None,
            recycle_count: 0,
            follow_ups_served: 0,
            answering_follow_up: false,
        })
    }

    async fn generate_pool(
        &self,
        context: &SessionContext,
        mode: Mode,
        difficulty: Difficulty,
        count: usize,
    ) -> Option<Vec<Question>> {
        let generator = self.generator.as_ref()?;
        if !context.has_profile() {
            return None;
        }
        match generator
            .generate_questions(context, mode, difficulty, count)
            .await
        {
            Ok(questions) => {
                tracing::info!(
                    provider = generator.provider_name(),
                    count = questions.len(),
                    "using model-generated questions"
                );
                Some(questions)
            }
            Err(e) => {
                warn_fallback(generator.provider_name(), "using question bank", &e);
                None
            }
        }
    }

    fn bank_pool(
        &mut self,
        context: &SessionContext,
        mode: Mode,
        difficulty: Difficulty,
    ) -> Vec<Question> {
        let mut pool = if context.has_profile() {
            self.templater.templated_questions(context, mode, difficulty)
        } else {
            Vec::new()
        };
        pool.extend_from_slice(self.bank.questions_for(mode, difficulty));

        let targets: HashSet<String> = context
            .target_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if targets.is_empty() {
            return pool;
        }

        let mut keyed: Vec<(usize, u64, Question)> = pool
            .into_iter()
            .map(|q| (q.keyword_overlap(&targets), self.rng.gen(), q))
            .collect();
        keyed.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
        keyed.into_iter().map(|(_, _, q)| q).collect()
    }

    /// Next question: a pending follow-up first, then a fresh draw.
    ///
    /// `None` once the target is reached or nothing is left to ask.
    pub async fn get_next_question(&mut self) -> Option<Question> {
        let session = self.session.as_ref()?;

        if session.follow_up_pending {
            if let Some(follow_up) = self.next_follow_up().await {
                return Some(follow_up);
            }
        }

        let bank = Arc::clone(&self.bank);
        let policy = self.policy;
        let session = self.session.as_mut()?;

        if session.current_index >= session.target_question_count {
            return None;
        }

        if session.available_pool.is_empty() {
            session.available_pool = bank
                .questions_for(session.mode, session.difficulty)
                .to_vec();
            if session.available_pool.is_empty() {
                tracing::warn!("no questions available even after reload");
                return None;
            }
            session.recycle_count += 1;
            tracing::info!(recycles = session.recycle_count, "recycled question pool");
        }

        let pick = match policy {
            DrawPolicy::Random => self.rng.gen_range(0..session.available_pool.len()),
            DrawPolicy::Ranked => 0,
        };
        let question = session.available_pool.remove(pick);
        session.answering_follow_up = false;
        session.asked.push(question.clone());
        session.current_index += 1;
        Some(question)
    }

    async fn next_follow_up(&mut self) -> Option<Question> {
        let session = self.session.as_mut()?;
        session.follow_up_pending = false;
        let reason = session
            .follow_up_reason
            .take()
            .unwrap_or(FollowUpReason::Incomplete);
        let last = session.asked.last()?.clone();
        let last_answer = session.last_answer.clone();

        let mut text = None;
        if let (Some(generator), Some(answer)) = (&self.generator, last_answer.as_deref()) {
            match generator.generate_follow_up(&last, answer).await {
                Ok(t) => text = Some(t),
                Err(e) => warn_fallback(generator.provider_name(), "using follow-up template", &e),
            }
        }
        let text = match text {
            Some(t) => t,
            None => {
                let templates = follow_up_templates(reason);
                templates[self.rng.gen_range(0..templates.len())].to_string()
            }
        };

        let session = self.session.as_mut()?;
        session.follow_ups_served += 1;
        session.answering_follow_up = true;
        tracing::info!(%reason, "serving follow-up");
        Some(follow_up_question(text, &last))
    }

    /// Remember the latest answer so a follow-up can build on it.
    pub fn record_answer_for_followup(&mut self, answer: &str) {
        if let Some(session) = self.session.as_mut() {
            session.last_answer = Some(answer.to_string());
        }
    }

    /// Decide whether `evaluation` warrants a follow-up and queue it if so.
    ///
    /// Answers to a follow-up never queue another one.
    pub fn should_trigger_follow_up(&mut self, evaluation: &Evaluation) -> bool {
        if self.session.as_ref().is_some_and(|s| s.answering_follow_up) {
            return false;
        }
        let reason = if evaluation.completeness < FOLLOW_UP_COMPLETENESS {
            FollowUpReason::Incomplete
        } else if evaluation.overall < FOLLOW_UP_OVERALL {
            FollowUpReason::TooShort
        } else {
            return false;
        };

        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.follow_up_pending = true;
        session.follow_up_reason = Some(reason);
        true
    }

    pub fn get_progress(&self) -> Progress {
        match &self.session {
            None => Progress {
                active: false,
                current: 0,
                total: 0,
                percent: 0.0,
                mode: None,
                difficulty: None,
            },
            Some(s) => {
                let percent = if s.target_question_count == 0 {
                    0.0
                } else {
                    (s.current_index as f64 / s.target_question_count as f64 * 100.0).min(100.0)
                };
                Progress {
                    active: true,
                    current: s.current_index,
                    total: s.target_question_count,
                    percent,
                    mode: Some(s.mode),
                    difficulty: Some(s.difficulty),
                }
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// True when every owed question has been drawn and no follow-up is queued.
    pub fn is_complete(&self) -> bool {
        self.session.as_ref().is_some_and(|s| {
            s.current_index >= s.target_question_count && !s.follow_up_pending
        })
    }

    /// Drop the live session, returning its final state.
    pub fn end_session(&mut self) -> Option<Session> {
        self.session.take()
    }
}

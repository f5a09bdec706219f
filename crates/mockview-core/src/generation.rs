//! Question generation: resume/job-description templates, model-backed
//! question lists, and follow-up questions.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use anyhow::Context;
use regex::Regex;

use crate::error::ProviderError;
use crate::flow::SessionContext;
use crate::model::{Difficulty, FollowUpReason, Mode, Question};
use crate::text::display_skill;
use crate::traits::{extract_json_from_markdown, GenerateRequest, LlmProvider};

/// Most template questions added to a session.
pub const MAX_TEMPLATE_QUESTIONS: usize = 3;
/// Most distinct skills turned into questions.
const MAX_SKILLS: usize = 5;
/// Duration given to every follow-up.
pub const FOLLOW_UP_DURATION_SECS: u32 = 60;

static SKILL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(python|java|javascript|react|angular|node|sql|mongodb|aws|azure|docker|kubernetes)\b",
        r"(?i)\b(machine learning|ai|data science|frontend|backend|full stack|devops)\b",
        r"(?i)\b(agile|scrum|jira|git|ci/cd|microservices|api)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

static COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:at|with|for)\s+([A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)?)").expect("static pattern")
});
static LEADERSHIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(lead|manag)").expect("static pattern"));
static COLLABORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(collaborat|cross-functional)").expect("static pattern"));

/// Builds session-specific questions from resume and job-description text.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionTemplater;

impl QuestionTemplater {
    pub fn new() -> Self {
        Self
    }

    /// Distinct skills mentioned in `text`, lowercased, in order of appearance.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();
        for re in SKILL_PATTERNS.iter() {
            for m in re.find_iter(text) {
                let skill = m.as_str().to_lowercase();
                if !found.iter().any(|(_, s)| *s == skill) {
                    found.push((m.start(), skill));
                }
            }
        }
        found.sort_by_key(|(pos, _)| *pos);
        found.into_iter().map(|(_, s)| s).collect()
    }

    /// First company-looking name after "at", "with" or "for".
    pub fn extract_company(&self, resume: &str) -> Option<String> {
        COMPANY
            .captures(resume)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Up to [`MAX_TEMPLATE_QUESTIONS`] questions built from the context.
    pub fn templated_questions(
        &self,
        context: &SessionContext,
        mode: Mode,
        difficulty: Difficulty,
    ) -> Vec<Question> {
        let mut questions = Vec::new();
        let combined = format!("{} {}", context.resume_text, context.job_description);

        if mode.emphasizes_technical() {
            for skill in self.extract_skills(&combined).into_iter().take(MAX_SKILLS) {
                questions.push(skill_question(&skill, difficulty));
            }
        }

        if matches!(mode, Mode::Hr | Mode::Behavioral | Mode::Mixed) {
            if let Some(company) = self.extract_company(&context.resume_text) {
                questions.push(templated(
                    format!(
                        "Tell me about your experience working at {company}. What was your biggest achievement there?"
                    ),
                    &["experience", "achievement", "responsibility", "contribution", "impact"],
                    120,
                ));
            }
        }

        let jd = &context.job_description;
        if !jd.is_empty() {
            if LEADERSHIP.is_match(jd) {
                questions.push(templated(
                    "This role involves leadership responsibilities. Can you describe your experience leading teams or projects?".into(),
                    &["leadership", "team", "management", "coordination", "mentoring"],
                    120,
                ));
            }
            if COLLABORATION.is_match(jd) {
                questions.push(templated(
                    "How do you approach working with cross-functional teams or stakeholders from different departments?".into(),
                    &["collaboration", "communication", "stakeholder", "teamwork", "coordination"],
                    90,
                ));
            }
        }

        tracing::debug!(generated = questions.len(), "template questions built");
        questions.truncate(MAX_TEMPLATE_QUESTIONS);
        questions
    }
}

fn skill_question(skill: &str, difficulty: Difficulty) -> Question {
    let name = display_skill(skill);
    let (text, keywords, duration): (String, &[&str], u32) = match difficulty {
        Difficulty::Beginner => (
            format!("Can you explain your experience with {name}?"),
            &["experience", "knowledge", "use"][..],
            90,
        ),
        Difficulty::Intermediate => (
            format!(
                "Tell me about a specific project where you used {name}. What challenges did you face?"
            ),
            &["project", "challenge", "solution", "implementation"][..],
            120,
        ),
        Difficulty::Advanced => (
            format!(
                "How would you architect a scalable solution using {name}? What trade-offs would you consider?"
            ),
            &["architecture", "scalability", "trade-off", "design"][..],
            150,
        ),
    };
    let mut q = templated(text, keywords, duration);
    q.keywords.insert(0, skill.to_string());
    q
}

fn templated(text: String, keywords: &[&str], duration: u32) -> Question {
    let mut q = Question::new(text, keywords).with_duration(duration);
    q.is_custom_generated = true;
    q
}

// ---------------------------------------------------------------------------
// Follow-ups
// ---------------------------------------------------------------------------

/// Canned follow-up phrasings for a reason.
pub fn follow_up_templates(reason: FollowUpReason) -> &'static [&'static str] {
    match reason {
        FollowUpReason::Incomplete => &[
            "Can you elaborate more on that?",
            "Could you provide more details about your answer?",
            "Can you give a specific example to illustrate your point?",
        ],
        FollowUpReason::TooShort => &[
            "That's interesting. Can you explain further?",
            "Could you expand on that idea?",
            "What else can you tell me about this?",
        ],
        FollowUpReason::Vague => &[
            "Can you be more specific?",
            "Could you give a concrete example?",
            "What exactly do you mean by that?",
        ],
        FollowUpReason::NoExample => &[
            "Can you provide a specific example from your experience?",
            "Could you share a real situation where this happened?",
            "Walk me through a specific instance.",
        ],
    }
}

/// Wrap follow-up text as a question tied to `original`.
pub fn follow_up_question(text: impl Into<String>, original: &Question) -> Question {
    Question {
        text: text.into(),
        keywords: original.keywords.clone(),
        technical_concepts: Vec::new(),
        expected_duration_seconds: FOLLOW_UP_DURATION_SECS,
        is_follow_up: true,
        is_custom_generated: false,
        ideal_answer: None,
        original_question: Some(original.text.clone()),
    }
}

// ---------------------------------------------------------------------------
// Model-backed generation
// ---------------------------------------------------------------------------

/// External-model question writer. Every call is bounded by `timeout`.
#[derive(Clone)]
pub struct QuestionGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for QuestionGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionGenerator")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl QuestionGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            provider,
            model: model.into(),
            timeout,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn complete(&self, prompt: String, temperature: f64) -> anyhow::Result<String> {
        let mut request = GenerateRequest::new(&self.model, prompt);
        request.temperature = temperature;
        let response = tokio::time::timeout(self.timeout, self.provider.generate(&request))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))??;
        Ok(response.content)
    }

    /// Ask the model for `count` tailored questions.
    ///
    /// An empty list is an error so callers fall through to the bank.
    pub async fn generate_questions(
        &self,
        context: &SessionContext,
        mode: Mode,
        difficulty: Difficulty,
        count: usize,
    ) -> anyhow::Result<Vec<Question>> {
        let prompt = question_prompt(context, mode, difficulty, count);
        let content = self.complete(prompt, 0.7).await?;
        let payload = extract_json_from_markdown(&content);
        let mut questions: Vec<Question> = serde_json::from_str(&payload)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
            .context("model returned an unusable question list")?;

        questions.retain(|q| !q.text.trim().is_empty());
        if questions.is_empty() {
            anyhow::bail!(ProviderError::MalformedResponse(
                "model returned no questions".into()
            ));
        }
        for q in &mut questions {
            q.is_custom_generated = true;
            q.is_follow_up = false;
            if q.expected_duration_seconds == 0 {
                q.expected_duration_seconds = 60;
            }
        }
        Ok(questions)
    }

    /// One-sentence follow-up probing the last answer.
    pub async fn generate_follow_up(
        &self,
        last_question: &Question,
        last_answer: &str,
    ) -> anyhow::Result<String> {
        let prompt = format!(
            r#"The candidate just answered an interview question.
Question: "{}"
Answer: "{}"

Write a short, single-sentence follow-up question that digs deeper, clarifies, or challenges the candidate.
Return only the question text."#,
            last_question.text, last_answer
        );
        let content = self.complete(prompt, 0.7).await?;
        let text = content
            .lines()
            .map(|l| l.trim().trim_matches('"').trim())
            .find(|l| !l.is_empty())
            .unwrap_or_default()
            .to_string();
        if text.is_empty() {
            anyhow::bail!(ProviderError::MalformedResponse(
                "empty follow-up question".into()
            ));
        }
        Ok(text)
    }
}

fn question_prompt(
    context: &SessionContext,
    mode: Mode,
    difficulty: Difficulty,
    count: usize,
) -> String {
    let resume: String = context.resume_text.chars().take(2000).collect();
    let jd: String = context.job_description.chars().take(1000).collect();
    format!(
        r#"Act as an expert {mode} interviewer.
Generate {count} unique, challenging interview questions for a {difficulty} level candidate based on the context below.

Resume summary: {resume}
Job description: {jd}

Respond with a JSON array only. Each element must have these keys:
"question" (string), "keywords" (array of strings), "expected_duration" (integer seconds), "ideal_answer" (short string).

Example: [{{"question": "...", "keywords": ["..."], "expected_duration": 60, "ideal_answer": "..."}}]"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;

    fn generator(reply: &str) -> QuestionGenerator {
        QuestionGenerator::new(
            Arc::new(ScriptedProvider::reply(reply)),
            "m",
            Duration::from_secs(5),
        )
    }

    fn context(resume: &str, jd: &str) -> SessionContext {
        SessionContext {
            resume_text: resume.into(),
            job_description: jd.into(),
            ..Default::default()
        }
    }

    #[test]
    fn extracts_skills_in_order_without_duplicates() {
        let t = QuestionTemplater::new();
        let skills = t.extract_skills("Built APIs in Python on AWS, then more Python and Docker.");
        assert_eq!(skills, vec!["python", "aws", "docker"]);
    }

    #[test]
    fn skill_templates_follow_difficulty() {
        let t = QuestionTemplater::new();
        let ctx = context("Five years of Python.", "");
        let beginner = t.templated_questions(&ctx, Mode::Technical, Difficulty::Beginner);
        assert_eq!(beginner[0].text, "Can you explain your experience with Python?");
        assert_eq!(beginner[0].keywords, vec!["python", "experience", "knowledge", "use"]);
        assert_eq!(beginner[0].expected_duration_seconds, 90);
        assert!(beginner[0].is_custom_generated);

        let advanced = t.templated_questions(&ctx, Mode::Technical, Difficulty::Advanced);
        assert!(advanced[0].text.starts_with("How would you architect a scalable solution using Python?"));
        assert_eq!(advanced[0].expected_duration_seconds, 150);
        assert!(advanced[0].keywords.contains(&"trade-off".to_string()));
    }

    #[test]
    fn static_patterns_compile() {
        assert_eq!(SKILL_PATTERNS.len(), 3);
        assert!(COMPANY.is_match("at Acme"));
        assert!(LEADERSHIP.is_match("Managing a team"));
        assert!(COLLABORATION.is_match("cross-functional work"));
    }

    #[test]
    fn hr_mode_skips_skills_but_uses_company() {
        let t = QuestionTemplater::new();
        let ctx = context("Senior engineer at Acme Corp working with Kubernetes.", "");
        let qs = t.templated_questions(&ctx, Mode::Hr, Difficulty::Intermediate);
        assert_eq!(qs.len(), 1);
        assert!(qs[0].text.contains("working at Acme Corp"));
    }

    #[test]
    fn job_description_prompts() {
        let t = QuestionTemplater::new();
        let ctx = context("", "You will lead a squad and collaborate with design.");
        let qs = t.templated_questions(&ctx, Mode::Behavioral, Difficulty::Beginner);
        assert_eq!(qs.len(), 2);
        assert!(qs[0].text.contains("leadership responsibilities"));
        assert!(qs[1].text.contains("cross-functional"));
    }

    #[test]
    fn templates_cap_at_three() {
        let t = QuestionTemplater::new();
        let ctx = context(
            "Engineer at Globex using python, java, react, docker and aws.",
            "Manage releases and collaborate across teams.",
        );
        let qs = t.templated_questions(&ctx, Mode::Mixed, Difficulty::Intermediate);
        assert_eq!(qs.len(), MAX_TEMPLATE_QUESTIONS);
    }

    #[test]
    fn follow_up_question_inherits_keywords() {
        let original = Question::new("What is Rust ownership?", &["ownership", "borrow"]);
        let f = follow_up_question("Could you expand on that idea?", &original);
        assert!(f.is_follow_up);
        assert_eq!(f.keywords, original.keywords);
        assert_eq!(f.expected_duration_seconds, 60);
        assert_eq!(f.original_question.as_deref(), Some("What is Rust ownership?"));
    }

    #[test]
    fn every_reason_has_templates() {
        for reason in [
            FollowUpReason::Incomplete,
            FollowUpReason::TooShort,
            FollowUpReason::Vague,
            FollowUpReason::NoExample,
        ] {
            assert_eq!(follow_up_templates(reason).len(), 3);
        }
    }

    #[tokio::test]
    async fn generated_questions_are_tagged() {
        let g = generator(
            r#"```json
[{"question": "How did you scale the ingest pipeline?", "keywords": ["kafka"], "expected_duration": 90, "ideal_answer": "By partitioning."},
 {"question": "  ", "keywords": []}]
```"#,
        );
        let qs = g
            .generate_questions(&context("Kafka", ""), Mode::Technical, Difficulty::Advanced, 2)
            .await
            .unwrap();
        assert_eq!(qs.len(), 1);
        assert!(qs[0].is_custom_generated);
        assert_eq!(qs[0].expected_duration_seconds, 90);
    }

    #[tokio::test]
    async fn empty_generation_is_an_error() {
        let g = generator("[]");
        assert!(g
            .generate_questions(&context("x", ""), Mode::Hr, Difficulty::Beginner, 3)
            .await
            .is_err());
        let g = generator("sorry, I cannot help with that");
        assert!(g
            .generate_questions(&context("x", ""), Mode::Hr, Difficulty::Beginner, 3)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn follow_up_takes_first_line_unquoted() {
        let g = generator("\n\"What would you do differently next time?\"\nExtra chatter");
        let q = Question::new("Tell me about a failure.", &[]);
        let text = g.generate_follow_up(&q, "It went badly.").await.unwrap();
        assert_eq!(text, "What would you do differently next time?");
    }

    #[test]
    fn prompt_truncates_context() {
        let ctx = context(&"r".repeat(5000), &"j".repeat(5000));
        let prompt = question_prompt(&ctx, Mode::Technical, Difficulty::Beginner, 4);
        assert!(prompt.contains("Generate 4 unique"));
        assert!(!prompt.contains(&"r".repeat(2001)));
        assert!(prompt.contains(&"j".repeat(1000)));
        assert!(!prompt.contains(&"j".repeat(1001)));
    }
}

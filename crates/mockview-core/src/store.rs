//! Durable interview session records.
//!
//! [`SessionStore`] is the persistence seam. Two implementations ship:
//! [`JsonFileStore`] keeps every session in one JSON document and replaces
//! it atomically on each change; [`MemoryStore`] keeps nothing on disk.
//!
//! The same document holds meetings: interviewer-created codes that carry a
//! curated question list and group the sessions taken under them.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{Difficulty, Evaluation, Mode, Question};
use crate::scoring::round1;
use crate::statistics::{OverallAnalytics, SessionAnalytics};
use crate::transcription::SpeechMetrics;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("meeting not found or inactive: {0}")]
    MeetingNotFound(String),

    #[error("session store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    /// Completed, then reviewed by the interviewer.
    Reviewed,
}

impl SessionStatus {
    /// Completed or reviewed.
    pub fn is_finished(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Reviewed)
    }
}

/// An interviewer's decision on a reviewed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    Selected,
    Rejected,
}

impl std::str::FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "selected" => Ok(Selection::Selected),
            "rejected" => Ok(Selection::Rejected),
            other => Err(format!("unknown selection '{other}' (expected selected or rejected)")),
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Selection::Selected => "selected",
            Selection::Rejected => "rejected",
        })
    }
}

/// Whether candidates take a meeting on their own or with the interviewer present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingKind {
    #[default]
    Async,
    Live,
}

impl std::str::FromStr for MeetingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "async" => Ok(MeetingKind::Async),
            "live" => Ok(MeetingKind::Live),
            other => Err(format!("unknown meeting type '{other}' (expected async or live)")),
        }
    }
}

impl std::fmt::Display for MeetingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MeetingKind::Async => "async",
            MeetingKind::Live => "live",
        })
    }
}

/// A meeting code handed to candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub meeting_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(rename = "type", default)]
    pub kind: MeetingKind,
    /// Candidates who started a session under this meeting.
    #[serde(default)]
    pub participants: Vec<String>,
    /// Asked verbatim, in order, to every candidate.
    #[serde(default)]
    pub custom_questions: Vec<Question>,
}

fn default_true() -> bool {
    true
}

/// Six characters from `A-Z0-9`.
fn new_meeting_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..6)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Utc>,
    pub speaker: Speaker,
    pub text: String,
}

/// One answered question as submitted by the interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: Question,
    pub answer: String,
    pub evaluation: Evaluation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stt_metrics: Option<SpeechMetrics>,
    /// Seconds the candidate spent answering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

/// A stored response, stamped on arrival.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub response: QuestionResponse,
}

impl std::ops::Deref for QuestionRecord {
    type Target = QuestionResponse;

    fn deref(&self) -> &QuestionResponse {
        &self.response
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_name: String,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
    /// Mean overall across answers, set when the session ends.
    #[serde(default)]
    pub overall_score: Option<f64>,
    pub status: SessionStatus,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_selection: Option<Selection>,
}

impl SessionRecord {
    pub fn new(
        mode: Mode,
        difficulty: Difficulty,
        user_name: impl Into<String>,
        metadata: Map<String, Value>,
    ) -> Self {
        let start_time = Utc::now();
        Self {
            session_id: new_session_id(start_time),
            user_name: user_name.into(),
            mode,
            difficulty,
            start_time,
            end_time: None,
            questions: Vec::new(),
            overall_score: None,
            status: SessionStatus::Active,
            metadata,
            transcript: Vec::new(),
            meeting_id: None,
            human_selection: None,
        }
    }

    /// Minutes between start and end, one decimal; 0 while active.
    pub fn duration_minutes(&self) -> f64 {
        match self.end_time {
            Some(end) => round1((end - self.start_time).num_milliseconds() as f64 / 60_000.0).max(0.0),
            None => 0.0,
        }
    }

    fn finish(&mut self) {
        if !self.questions.is_empty() {
            let sum: f64 = self.questions.iter().map(|q| q.evaluation.overall).sum();
            self.overall_score = Some(round1(sum / self.questions.len() as f64));
        }
        self.status = SessionStatus::Completed;
        self.end_time = Some(Utc::now());
    }
}

/// `session_<yyyymmdd_HHMMSS>_<6 hex>`.
fn new_session_id(at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", at.format("%Y%m%d_%H%M%S"), &suffix[..6])
}

/// Persistence for interview sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create an active session and return its id.
    ///
    /// A `meeting_id` must name an active meeting; the user joins its participants.
    async fn create_session(
        &self,
        mode: Mode,
        difficulty: Difficulty,
        user_name: &str,
        metadata: Map<String, Value>,
        meeting_id: Option<&str>,
    ) -> StoreResult<String>;

    async fn append_transcript(&self, id: &str, speaker: Speaker, text: &str) -> StoreResult<()>;

    async fn add_question_response(&self, id: &str, response: QuestionResponse) -> StoreResult<()>;

    /// Mark completed and store the mean overall, which is returned.
    async fn end_session(&self, id: &str) -> StoreResult<Option<f64>>;

    async fn get_session(&self, id: &str) -> StoreResult<Option<SessionRecord>>;

    async fn get_analytics(&self, id: &str) -> StoreResult<SessionAnalytics>;

    /// Merge `meta` into the session's metadata.
    async fn update_session_meta(&self, id: &str, meta: Map<String, Value>) -> StoreResult<()>;

    /// Newest first.
    async fn recent_sessions(&self, limit: usize) -> StoreResult<Vec<SessionRecord>>;

    async fn user_sessions(&self, user_name: &str) -> StoreResult<Vec<SessionRecord>>;

    async fn overall_analytics(&self) -> StoreResult<OverallAnalytics>;

    /// Set the final status, and the interviewer's decision if given.
    async fn update_session_status(
        &self,
        id: &str,
        status: SessionStatus,
        selection: Option<Selection>,
    ) -> StoreResult<()>;

    /// Create an active meeting and return its six-character code.
    async fn create_meeting(
        &self,
        created_by: &str,
        kind: MeetingKind,
        custom_questions: Vec<Question>,
    ) -> StoreResult<String>;

    async fn get_meeting(&self, meeting_id: &str) -> StoreResult<Option<MeetingRecord>>;

    /// The meeting exists and is active.
    async fn verify_meeting(&self, meeting_id: &str) -> StoreResult<bool>;

    /// Remove a meeting; its sessions are kept. Returns whether it existed.
    async fn delete_meeting(&self, meeting_id: &str) -> StoreResult<bool>;

    async fn meetings_by_creator(&self, created_by: &str) -> StoreResult<Vec<MeetingRecord>>;

    /// Oldest first.
    async fn sessions_by_meeting(&self, meeting_id: &str) -> StoreResult<Vec<SessionRecord>>;
}

/// Everything a store holds, as written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(default)]
    pub sessions: BTreeMap<String, SessionRecord>,
    #[serde(default)]
    pub meetings: BTreeMap<String, MeetingRecord>,
}

impl SessionDocument {
    fn session_mut(&mut self, id: &str) -> StoreResult<&mut SessionRecord> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))
    }

    fn active_meeting_mut(&mut self, id: &str) -> StoreResult<&mut MeetingRecord> {
        self.meetings
            .get_mut(id)
            .filter(|m| m.active)
            .ok_or_else(|| StoreError::MeetingNotFound(id.to_string()))
    }
}

/// Where a [`DocumentStore`] writes its document after each change.
#[async_trait]
pub trait Backing: Send + Sync {
    async fn save(&self, doc: &SessionDocument) -> StoreResult<()>;
}

/// Keeps sessions in memory only.
#[derive(Debug, Default)]
pub struct InMemory;

#[async_trait]
impl Backing for InMemory {
    async fn save(&self, _: &SessionDocument) -> StoreResult<()> {
        Ok(())
    }
}

/// Writes the whole document to one JSON file, atomically.
#[derive(Debug)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    fn write_atomic(path: &Path, json: &[u8]) -> StoreResult<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait]
impl Backing for JsonFile {
    async fn save(&self, doc: &SessionDocument) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(doc)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::write_atomic(&path, &json))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
    }
}

/// A session store over one in-memory document and a [`Backing`].
///
/// Each mutation is applied to a copy, saved, then swapped in, so a failed
/// save leaves the visible state unchanged.
#[derive(Debug)]
pub struct DocumentStore<B> {
    doc: RwLock<SessionDocument>,
    backing: B,
}

pub type JsonFileStore = DocumentStore<JsonFile>;
pub type MemoryStore = DocumentStore<InMemory>;

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            doc: RwLock::new(SessionDocument::default()),
            backing: InMemory,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFileStore {
    /// Open `path`. A missing or unreadable file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<SessionDocument>(&content) {
                Ok(doc) => {
                    tracing::info!(
                        path = %path.display(),
                        sessions = doc.sessions.len(),
                        "loaded session store"
                    );
                    doc
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        "session store is corrupt, starting empty: {e}"
                    );
                    SessionDocument::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionDocument::default(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "could not read session store, starting empty: {e}"
                );
                SessionDocument::default()
            }
        };
        Self {
            doc: RwLock::new(doc),
            backing: JsonFile { path },
        }
    }

    pub fn path(&self) -> &Path {
        &self.backing.path
    }
}

impl<B: Backing> DocumentStore<B> {
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut SessionDocument) -> StoreResult<T> + Send,
    ) -> StoreResult<T> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();
        let out = f(&mut next)?;
        self.backing.save(&next).await?;
        *doc = next;
        Ok(out)
    }
}

#[async_trait]
impl<B: Backing> SessionStore for DocumentStore<B> {
    async fn create_session(
        &self,
        mode: Mode,
        difficulty: Difficulty,
        user_name: &str,
        metadata: Map<String, Value>,
        meeting_id: Option<&str>,
    ) -> StoreResult<String> {
        let mut record = SessionRecord::new(mode, difficulty, user_name, metadata);
        record.meeting_id = meeting_id.map(String::from);
        let id = record.session_id.clone();
        self.mutate(|doc| {
            if let Some(meeting_id) = meeting_id {
                let meeting = doc.active_meeting_mut(meeting_id)?;
                if !meeting.participants.iter().any(|p| p == user_name) {
                    meeting.participants.push(user_name.to_string());
                }
            }
            doc.sessions.insert(record.session_id.clone(), record);
            Ok(())
        })
        .await?;
        tracing::info!(session = %id, %mode, %difficulty, "created session record");
        Ok(id)
    }

    async fn append_transcript(&self, id: &str, speaker: Speaker, text: &str) -> StoreResult<()> {
        self.mutate(|doc| {
            doc.session_mut(id)?.transcript.push(TranscriptEntry {
                timestamp: Utc::now(),
                speaker,
                text: text.to_string(),
            });
            Ok(())
        })
        .await
    }

    async fn add_question_response(&self, id: &str, response: QuestionResponse) -> StoreResult<()> {
        self.mutate(|doc| {
            doc.session_mut(id)?.questions.push(QuestionRecord {
                timestamp: Utc::now(),
                response,
            });
            Ok(())
        })
        .await
    }

    async fn end_session(&self, id: &str) -> StoreResult<Option<f64>> {
        let overall = self
            .mutate(|doc| {
                let session = doc.session_mut(id)?;
                session.finish();
                Ok(session.overall_score)
            })
            .await?;
        tracing::info!(session = %id, ?overall, "session completed");
        Ok(overall)
    }

    async fn get_session(&self, id: &str) -> StoreResult<Option<SessionRecord>> {
        Ok(self.doc.read().await.sessions.get(id).cloned())
    }

    async fn get_analytics(&self, id: &str) -> StoreResult<SessionAnalytics> {
        let doc = self.doc.read().await;
        let record = doc
            .sessions
            .get(id)
            .ok_or_else(|| StoreError::SessionNotFound(id.to_string()))?;
        Ok(SessionAnalytics::from_record(record))
    }

    async fn update_session_meta(&self, id: &str, meta: Map<String, Value>) -> StoreResult<()> {
        self.mutate(|doc| {
            doc.session_mut(id)?.metadata.extend(meta);
            Ok(())
        })
        .await
    }

    async fn recent_sessions(&self, limit: usize) -> StoreResult<Vec<SessionRecord>> {
        let doc = self.doc.read().await;
        let mut sessions: Vec<SessionRecord> = doc.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sessions.truncate(limit);
        Ok(sessions)
    }

    async fn user_sessions(&self, user_name: &str) -> StoreResult<Vec<SessionRecord>> {
        let doc = self.doc.read().await;
        Ok(doc
            .sessions
            .values()
            .filter(|s| s.user_name == user_name)
            .cloned()
            .collect())
    }

    async fn overall_analytics(&self) -> StoreResult<OverallAnalytics> {
        Ok(OverallAnalytics::from_records(
            self.doc.read().await.sessions.values(),
        ))
    }

    async fn update_session_status(
        &self,
        id: &str,
        status: SessionStatus,
        selection: Option<Selection>,
    ) -> StoreResult<()> {
        self.mutate(|doc| {
            let session = doc.session_mut(id)?;
            session.status = status;
            if selection.is_some() {
                session.human_selection = selection;
            }
            Ok(())
        })
        .await?;
        tracing::info!(session = %id, ?status, ?selection, "session status updated");
        Ok(())
    }

    async fn create_meeting(
        &self,
        created_by: &str,
        kind: MeetingKind,
        custom_questions: Vec<Question>,
    ) -> StoreResult<String> {
        let questions = custom_questions.len();
        let id = self
            .mutate(|doc| {
                let mut id = new_meeting_id();
                while doc.meetings.contains_key(&id) {
                    id = new_meeting_id();
                }
                doc.meetings.insert(
                    id.clone(),
                    MeetingRecord {
                        meeting_id: id.clone(),
                        created_by: created_by.to_string(),
                        created_at: Utc::now(),
                        active: true,
                        kind,
                        participants: Vec::new(),
                        custom_questions,
                    },
                );
                Ok(id)
            })
            .await?;
        tracing::info!(meeting = %id, %kind, questions, "created meeting");
        Ok(id)
    }

    async fn get_meeting(&self, meeting_id: &str) -> StoreResult<Option<MeetingRecord>> {
        Ok(self.doc.read().await.meetings.get(meeting_id).cloned())
    }

    async fn verify_meeting(&self, meeting_id: &str) -> StoreResult<bool> {
        Ok(self
            .doc
            .read()
            .await
            .meetings
            .get(meeting_id)
            .is_some_and(|m| m.active))
    }

    async fn delete_meeting(&self, meeting_id: &str) -> StoreResult<bool> {
        if !self.doc.read().await.meetings.contains_key(meeting_id) {
            return Ok(false);
        }
        self.mutate(|doc| Ok(doc.meetings.remove(meeting_id).is_some()))
            .await
    }

    async fn meetings_by_creator(&self, created_by: &str) -> StoreResult<Vec<MeetingRecord>> {
        let doc = self.doc.read().await;
        let mut meetings: Vec<MeetingRecord> = doc
            .meetings
            .values()
            .filter(|m| m.created_by == created_by)
            .cloned()
            .collect();
        meetings.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(meetings)
    }

    async fn sessions_by_meeting(&self, meeting_id: &str) -> StoreResult<Vec<SessionRecord>> {
        let doc = self.doc.read().await;
        let mut sessions: Vec<SessionRecord> = doc
            .sessions
            .values()
            .filter(|s| s.meeting_id.as_deref() == Some(meeting_id))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(sessions)
    }
}

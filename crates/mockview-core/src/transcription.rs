//! Speech-to-text seam and delivery metrics for spoken answers.
//!
//! The transcription backend itself is a black box behind [`Transcriber`];
//! this module only defines the contract and derives pacing and filler-word
//! metrics from whatever text comes back.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::{clamp_score, round1};
use crate::text::tokens;

/// Filler words and phrases counted in spoken answers.
pub const FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "like",
    "you know",
    "actually",
    "basically",
    "literally",
    "so",
    "well",
    "right",
    "okay",
    "yeah",
    "hmm",
];

const PAUSE_MARKERS: &[&str] = &[". ", ", ", "? ", "! "];

/// Natural speaking pace in words per minute.
const IDEAL_WPM: f64 = 140.0;
const WPM_RANGE: (f64, f64) = (100.0, 180.0);

/// A recorded answer handed to a [`Transcriber`].
#[derive(Debug, Clone)]
pub enum AudioClip {
    File(PathBuf),
    Bytes {
        data: Vec<u8>,
        /// MIME type, e.g. `audio/wav`.
        format: String,
    },
}

/// Transcribed text plus delivery metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    /// Backend confidence in [0, 1].
    pub confidence: f64,
    pub duration_secs: f64,
    pub metrics: SpeechMetrics,
}

impl Transcription {
    /// Build a transcription, deriving metrics from `text` and `duration_secs`.
    pub fn new(text: impl Into<String>, confidence: f64, duration_secs: f64) -> Self {
        let text = text.into();
        let metrics = analyze_speech(&text, duration_secs);
        Self {
            text,
            confidence: confidence.clamp(0.0, 1.0),
            duration_secs,
            metrics,
        }
    }
}

/// Pacing and fluency metrics for one spoken answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechMetrics {
    pub word_count: usize,
    pub words_per_minute: f64,
    pub filler_word_count: usize,
    /// Filler -> occurrences, only for fillers that occurred.
    pub filler_words: BTreeMap<String, usize>,
    pub pause_count: usize,
    pub clarity_score: f64,
}

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("no speech detected in the recording")]
    NoSpeech,

    #[error("transcription backend failed: {0}")]
    Backend(String),

    #[error("transcription timed out after {0}s")]
    Timeout(u64),

    #[error("could not read audio: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts recorded audio into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    fn name(&self) -> &str;

    async fn transcribe(&self, clip: &AudioClip) -> Result<Transcription, TranscriptionError>;
}

/// Derive delivery metrics from transcribed `text` spoken over `duration_secs`.
pub fn analyze_speech(text: &str, duration_secs: f64) -> SpeechMetrics {
    let words = tokens(text);
    let word_count = text.split_whitespace().count();

    let mut filler_words = BTreeMap::new();
    for filler in FILLER_WORDS {
        let count = count_occurrences(&words, filler);
        if count > 0 {
            filler_words.insert((*filler).to_string(), count);
        }
    }
    let filler_word_count = filler_words.values().sum();

    let words_per_minute = if duration_secs > 0.0 {
        round1(word_count as f64 / duration_secs * 60.0)
    } else {
        0.0
    };

    let pause_count = PAUSE_MARKERS.iter().map(|m| text.matches(m).count()).sum();

    let mut metrics = SpeechMetrics {
        word_count,
        words_per_minute,
        filler_word_count,
        filler_words,
        pause_count,
        clarity_score: 0.0,
    };
    metrics.clarity_score = clarity_score(&metrics);
    metrics
}

fn clarity_score(m: &SpeechMetrics) -> f64 {
    let words = m.word_count.max(1) as f64;
    let mut score = 100.0;

    let filler_ratio = m.filler_word_count as f64 / words;
    score -= (filler_ratio * 100.0).min(30.0);

    let wpm = m.words_per_minute;
    if wpm < WPM_RANGE.0 || wpm > WPM_RANGE.1 {
        score -= ((IDEAL_WPM - wpm).abs() / 4.0).min(20.0);
    }

    let pause_ratio = m.pause_count as f64 / (m.word_count as f64 / 20.0).max(1.0);
    if (0.5..=2.0).contains(&pause_ratio) {
        score += 10.0;
    }

    round1(clamp_score(score))
}

fn count_occurrences(words: &[String], phrase: &str) -> usize {
    let needle = tokens(phrase);
    if needle.is_empty() || needle.len() > words.len() {
        return 0;
    }
    words
        .windows(needle.len())
        .filter(|w| *w == needle.as_slice())
        .count()
}

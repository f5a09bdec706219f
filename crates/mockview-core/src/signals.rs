//! Bundled implementations of the scoring capabilities.
//!
//! Both have neutral stand-ins (`NoopEmbedder`, `NeutralSentiment`) so the
//! scorer never needs to ask whether a capability is present.

use crate::text::{stem, tokens, STOPWORDS};
use crate::traits::{Embedder, SentimentAnalyzer, SentimentReading};

/// Bag-of-stems embedder: stopword-filtered, stemmed tokens hashed into a
/// fixed-width count vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(512)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokens(text) {
            if STOPWORDS.contains(&token.as_str()) {
                continue;
            }
            let slot = fnv1a(stem(&token).as_bytes()) as usize % self.dimensions;
            vector[slot] += 1.0;
        }
        vector
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    bytes.iter().fold(OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(PRIME)
    })
}

/// Embedder that never produces a signal (similarity is always zero).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmbedder;

impl Embedder for NoopEmbedder {
    fn embed(&self, _text: &str) -> Vec<f32> {
        Vec::new()
    }
}

const POSITIVE: &[&str] = &[
    "good", "great", "excellent", "successful", "successfully", "effective", "efficient",
    "improved", "improve", "happy", "enjoy", "enjoyed", "love", "passionate", "proud", "strong",
    "best", "positive", "confident", "reliable", "clear", "helpful", "valuable", "excited",
    "achieved", "delivered", "solved", "win", "benefit", "useful", "robust", "fast",
];

const NEGATIVE: &[&str] = &[
    "bad", "poor", "terrible", "awful", "failed", "failure", "hate", "difficult", "problem",
    "wrong", "worst", "weak", "frustrated", "frustrating", "angry", "boring", "hard", "slow",
    "broken", "confusing", "unfortunately", "stressful", "annoying", "useless",
];

/// Opinion markers that raise subjectivity without carrying polarity.
const SUBJECTIVE: &[&str] = &[
    "i", "my", "me", "feel", "felt", "think", "believe", "personally", "opinion", "really",
    "very", "always", "never", "prefer", "love", "enjoy", "honestly",
];

const NEGATORS: &[&str] = &["not", "no", "never", "don't", "didn't", "isn't", "wasn't", "can't"];

/// Word-list sentiment with single-token negation flipping.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentiment;

impl SentimentAnalyzer for LexiconSentiment {
    fn analyze(&self, text: &str) -> Option<SentimentReading> {
        let words = tokens(text);
        if words.is_empty() {
            return None;
        }

        let mut polarity_sum = 0.0;
        let mut polar_hits = 0usize;
        let mut subjective_hits = 0usize;

        for (i, word) in words.iter().enumerate() {
            let negated = i > 0 && NEGATORS.contains(&words[i - 1].as_str());
            let base = if POSITIVE.contains(&word.as_str()) {
                Some(1.0)
            } else if NEGATIVE.contains(&word.as_str()) {
                Some(-1.0)
            } else {
                None
            };
            if let Some(value) = base {
                // Negation dampens as well as flips: "not bad" is mildly positive.
                polarity_sum += if negated { -value * 0.5 } else { value };
                polar_hits += 1;
            }
            if SUBJECTIVE.contains(&word.as_str()) || base.is_some() {
                subjective_hits += 1;
            }
        }

        let polarity = if polar_hits == 0 {
            0.0
        } else {
            polarity_sum / polar_hits as f64
        };
        let subjectivity = (subjective_hits as f64 / words.len() as f64 * 3.0).min(1.0);

        Some(SentimentReading {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity,
        })
    }
}

/// Analyzer with no opinion; sentiment scoring falls back to word lists only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralSentiment;

impl SentimentAnalyzer for NeutralSentiment {
    fn analyze(&self, _text: &str) -> Option<SentimentReading> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::cosine_similarity;

    #[test]
    fn embedding_is_deterministic_and_fixed_width() {
        let e = HashingEmbedder::new(64);
        let a = e.embed("Caching reduces latency");
        assert_eq!(a.len(), 64);
        assert_eq!(a, e.embed("Caching reduces latency"));
    }

    #[test]
    fn related_texts_are_more_similar() {
        let e = HashingEmbedder::default();
        let q = e.embed("How does a cache improve latency?");
        let related = e.embed("A cache keeps hot data close, which improves latency.");
        let unrelated = e.embed("My favourite holiday was hiking in Norway.");
        assert!(cosine_similarity(&q, &related) > cosine_similarity(&q, &unrelated));
    }

    #[test]
    fn noop_embedder_gives_zero_similarity() {
        let e = NoopEmbedder;
        assert_eq!(cosine_similarity(&e.embed("a"), &e.embed("a")), 0.0);
    }

    #[test]
    fn lexicon_reads_polarity() {
        let s = LexiconSentiment;
        let pos = s.analyze("The project was a great success and I was proud").unwrap();
        assert!(pos.polarity > 0.2);
        let neg = s.analyze("It was a terrible, frustrating failure").unwrap();
        assert!(neg.polarity < -0.3);
    }

    #[test]
    fn lexicon_handles_negation() {
        let s = LexiconSentiment;
        let r = s.analyze("the result was not bad").unwrap();
        assert!(r.polarity > 0.0);
    }

    #[test]
    fn lexicon_empty_text_has_no_reading() {
        assert!(LexiconSentiment.analyze("  ").is_none());
        assert!(NeutralSentiment.analyze("great").is_none());
    }
}

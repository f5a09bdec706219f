//! Local heuristic scoring.
//!
//! Four independent sub-scores (technical accuracy, communication, tone,
//! completeness) are computed from the answer text and composed with
//! mode-dependent weights. Every constant lives in [`ScoringConfig`] so a
//! config file can retune the scorer without code changes.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::feedback::build_feedback;
use crate::model::{Evaluation, Grade, Mode, Question};
use crate::signals::{HashingEmbedder, LexiconSentiment};
use crate::text::{
    contains_phrase, content_words, count_phrases, normalize, sentences, stem, tokens, word_count,
};
use crate::traits::{cosine_similarity, Embedder, SentimentAnalyzer};

/// Phrases that mark an answer as an admission of not knowing.
pub const NON_ANSWER_PHRASES: &[&str] = &[
    "i don't know",
    "i dont know",
    "not sure",
    "no idea",
    "don't know",
    "dont know",
    "i have no idea",
    "i am not sure",
    "i'm not sure",
    "no clue",
    "cannot answer",
    "can't answer",
    "don't understand",
    "dont understand",
    "not familiar",
];

const CONNECTIVES: &[&str] = &[
    "because",
    "therefore",
    "however",
    "additionally",
    "furthermore",
    "consequently",
    "specifically",
];

const CONFIDENCE_WORDS: &[&str] = &[
    "confident",
    "certainly",
    "definitely",
    "absolutely",
    "believe",
    "sure",
    "experience",
    "successfully",
];

const HEDGING_PHRASES: &[&str] = &[
    "maybe",
    "perhaps",
    "not sure",
    "i think",
    "possibly",
    "might",
    "could be",
    "guess",
];

const EXPLANATION_PHRASES: &[&str] = &[
    "for example",
    "such as",
    "like",
    "because",
    "this means",
    "in other words",
    "specifically",
];

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Relative weight of each sub-score in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub technical: f64,
    pub communication: f64,
    pub sentiment: f64,
    pub completeness: f64,
}

impl Weights {
    pub const fn new(technical: f64, communication: f64, sentiment: f64, completeness: f64) -> Self {
        Self {
            technical,
            communication,
            sentiment,
            completeness,
        }
    }
}

/// Per-mode weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeWeights {
    pub hr: Weights,
    pub technical: Weights,
    pub behavioral: Weights,
    pub mixed: Weights,
}

impl Default for ModeWeights {
    fn default() -> Self {
        Self {
            hr: Weights::new(0.10, 0.35, 0.30, 0.25),
            technical: Weights::new(0.40, 0.25, 0.15, 0.20),
            behavioral: Weights::new(0.30, 0.30, 0.20, 0.20),
            mixed: Weights::new(0.30, 0.30, 0.20, 0.20),
        }
    }
}

impl ModeWeights {
    pub fn for_mode(&self, mode: Mode) -> Weights {
        match mode {
            Mode::Hr => self.hr,
            Mode::Technical => self.technical,
            Mode::Behavioral => self.behavioral,
            Mode::Mixed => self.mixed,
        }
    }
}

/// Lower bounds (inclusive) of each passing grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeBands {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            a: 90.0,
            b: 80.0,
            c: 70.0,
            d: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalRules {
    pub non_answer: f64,
    pub short_answer: f64,
    pub hr_baseline: f64,
    pub baseline: f64,
    pub exact_keyword_points: f64,
    pub partial_keyword_points: f64,
    pub no_keyword_penalty: f64,
    pub concept_points: f64,
    pub concept_ratio_floor: f64,
    pub missing_concepts_penalty: f64,
    pub similarity_points: f64,
    pub depth_threshold_words: usize,
    pub depth_words_per_point: f64,
    pub depth_bonus_cap: f64,
    pub brief_threshold_words: usize,
    pub brief_penalty: f64,
}

impl Default for TechnicalRules {
    fn default() -> Self {
        Self {
            non_answer: 5.0,
            short_answer: 10.0,
            hr_baseline: 25.0,
            baseline: 15.0,
            exact_keyword_points: 45.0,
            partial_keyword_points: 15.0,
            no_keyword_penalty: 20.0,
            concept_points: 20.0,
            concept_ratio_floor: 0.3,
            missing_concepts_penalty: 10.0,
            similarity_points: 20.0,
            depth_threshold_words: 50,
            depth_words_per_point: 10.0,
            depth_bonus_cap: 10.0,
            brief_threshold_words: 20,
            brief_penalty: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationRules {
    pub non_answer: f64,
    pub short_answer: f64,
    pub baseline: f64,
    /// 30..=200 words.
    pub ideal_length_bonus: f64,
    /// 20..30 words.
    pub fair_length_bonus: f64,
    /// 10..20 words.
    pub brief_length_bonus: f64,
    /// Under 10 words.
    pub terse_penalty: f64,
    pub multi_sentence_bonus: f64,
    pub two_sentence_bonus: f64,
    pub single_sentence_bonus: f64,
    pub high_diversity: f64,
    pub high_diversity_bonus: f64,
    pub mid_diversity: f64,
    pub mid_diversity_bonus: f64,
    pub low_diversity_bonus: f64,
    pub repetition_share: f64,
    pub repetition_penalty: f64,
    pub connective_points: f64,
    pub connective_cap: f64,
}

impl Default for CommunicationRules {
    fn default() -> Self {
        Self {
            non_answer: 15.0,
            short_answer: 20.0,
            baseline: 30.0,
            ideal_length_bonus: 20.0,
            fair_length_bonus: 15.0,
            brief_length_bonus: 10.0,
            terse_penalty: 10.0,
            multi_sentence_bonus: 15.0,
            two_sentence_bonus: 10.0,
            single_sentence_bonus: 5.0,
            high_diversity: 0.7,
            high_diversity_bonus: 15.0,
            mid_diversity: 0.5,
            mid_diversity_bonus: 10.0,
            low_diversity_bonus: 5.0,
            repetition_share: 0.2,
            repetition_penalty: 15.0,
            connective_points: 3.0,
            connective_cap: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentRules {
    pub non_answer: f64,
    pub short_answer: f64,
    pub baseline: f64,
    pub strong_polarity: f64,
    pub strong_polarity_points: f64,
    pub mild_polarity_points: f64,
    pub negative_polarity: f64,
    pub negative_penalty: f64,
    pub balanced_subjectivity_bonus: f64,
    pub light_subjectivity_bonus: f64,
    pub flat_subjectivity_bonus: f64,
    pub confidence_points: f64,
    pub confidence_cap: f64,
    pub hedging_points: f64,
    pub hedging_cap: f64,
}

impl Default for SentimentRules {
    fn default() -> Self {
        Self {
            non_answer: 20.0,
            short_answer: 25.0,
            baseline: 35.0,
            strong_polarity: 0.2,
            strong_polarity_points: 30.0,
            mild_polarity_points: 20.0,
            negative_polarity: -0.3,
            negative_penalty: 20.0,
            balanced_subjectivity_bonus: 15.0,
            light_subjectivity_bonus: 10.0,
            flat_subjectivity_bonus: 5.0,
            confidence_points: 4.0,
            confidence_cap: 12.0,
            hedging_points: 6.0,
            hedging_cap: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessRules {
    pub non_answer: f64,
    pub short_answer: f64,
    pub baseline: f64,
    pub words_per_minute: f64,
    pub full_length_bonus: f64,
    pub most_length_bonus: f64,
    pub partial_length_bonus: f64,
    pub scant_length_penalty: f64,
    pub overlap_points: f64,
    pub overlap_floor: f64,
    pub low_overlap_penalty: f64,
    pub explanation_bonus: f64,
}

impl Default for CompletenessRules {
    fn default() -> Self {
        Self {
            non_answer: 10.0,
            short_answer: 15.0,
            baseline: 25.0,
            words_per_minute: 150.0,
            full_length_bonus: 30.0,
            most_length_bonus: 25.0,
            partial_length_bonus: 15.0,
            scant_length_penalty: 10.0,
            overlap_points: 30.0,
            overlap_floor: 0.2,
            low_overlap_penalty: 15.0,
            explanation_bonus: 10.0,
        }
    }
}

/// Every tunable constant used by the local scorer.
///
/// Deserializes from the `[scoring]` table of the config file; any field
/// left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Answers with fewer whitespace-separated words are "short".
    pub short_answer_words: usize,
    pub pass_mark: f64,
    pub grades: GradeBands,
    pub weights: ModeWeights,
    pub technical: TechnicalRules,
    pub communication: CommunicationRules,
    pub sentiment: SentimentRules,
    pub completeness: CompletenessRules,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            short_answer_words: 5,
            pass_mark: 60.0,
            grades: GradeBands::default(),
            weights: ModeWeights::default(),
            technical: TechnicalRules::default(),
            communication: CommunicationRules::default(),
            sentiment: SentimentRules::default(),
            completeness: CompletenessRules::default(),
        }
    }
}

impl ScoringConfig {
    pub fn grade_for(&self, overall: f64) -> Grade {
        let bands = &self.grades;
        if overall >= bands.a {
            Grade::A
        } else if overall >= bands.b {
            Grade::B
        } else if overall >= bands.c {
            Grade::C
        } else if overall >= bands.d {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn passed(&self, overall: f64) -> bool {
        overall >= self.pass_mark
    }

    /// Weighted overall score for `mode`.
    pub fn weighted_overall(&self, scores: &SubScores, mode: Mode) -> f64 {
        let w = self.weights.for_mode(mode);
        scores.technical * w.technical
            + scores.communication * w.communication
            + scores.sentiment * w.sentiment
            + scores.completeness * w.completeness
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Raw sub-scores before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub technical: f64,
    pub communication: f64,
    pub sentiment: f64,
    pub completeness: f64,
}

impl SubScores {
    pub fn clamped(self) -> Self {
        Self {
            technical: clamp_score(self.technical),
            communication: clamp_score(self.communication),
            sentiment: clamp_score(self.sentiment),
            completeness: clamp_score(self.completeness),
        }
    }
}

/// Clamp to [0, 100]; NaN becomes 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Pre-digested view of one answer.
#[derive(Debug, Clone)]
pub struct AnswerProfile {
    pub normalized: String,
    pub tokens: Vec<String>,
    pub word_count: usize,
    pub is_non_answer: bool,
}

impl AnswerProfile {
    pub fn new(answer: &str) -> Self {
        let tokens = tokens(answer);
        let is_non_answer = NON_ANSWER_PHRASES
            .iter()
            .any(|phrase| contains_phrase(&tokens, phrase));
        Self {
            normalized: normalize(answer),
            word_count: word_count(answer),
            tokens,
            is_non_answer,
        }
    }

    /// True if `keyword` occurs as a whole phrase.
    pub fn mentions(&self, keyword: &str) -> bool {
        contains_phrase(&self.tokens, keyword)
    }

    /// True if any word of `keyword` shares a stem with an answer token.
    fn mentions_partially(&self, keyword: &str) -> bool {
        tokens(keyword).iter().any(|kw| {
            let kw_stem = stem(kw);
            self.tokens.iter().any(|t| stem(t) == kw_stem)
        })
    }
}

/// Deterministic rule-based scorer.
#[derive(Clone)]
pub struct LocalScorer {
    config: ScoringConfig,
    embedder: Arc<dyn Embedder>,
    sentiment: Arc<dyn SentimentAnalyzer>,
}

impl std::fmt::Debug for LocalScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalScorer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for LocalScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl LocalScorer {
    /// Scorer with the bundled hashing embedder and lexicon sentiment.
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_capabilities(
            config,
            Arc::new(HashingEmbedder::default()),
            Arc::new(LexiconSentiment),
        )
    }

    pub fn with_capabilities(
        config: ScoringConfig,
        embedder: Arc<dyn Embedder>,
        sentiment: Arc<dyn SentimentAnalyzer>,
    ) -> Self {
        Self {
            config,
            embedder,
            sentiment,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `answer` and assemble the full evaluation with feedback.
    pub fn evaluate(&self, answer: &str, question: &Question, mode: Mode) -> Evaluation {
        let profile = AnswerProfile::new(answer);
        let scores = self.sub_scores(&profile, question, mode);
        tracing::debug!(
            technical = scores.technical,
            communication = scores.communication,
            sentiment = scores.sentiment,
            completeness = scores.completeness,
            words = profile.word_count,
            non_answer = profile.is_non_answer,
            "local sub-scores"
        );
        let feedback = build_feedback(&profile, question, &scores, mode);
        self.compose(scores, None, mode, feedback)
    }

    /// Clamp, weight, round and grade a set of sub-scores.
    ///
    /// `overall` overrides the weighted sum when supplied (model-returned
    /// scores); it is clamped like everything else.
    pub fn compose(
        &self,
        scores: SubScores,
        overall: Option<f64>,
        mode: Mode,
        feedback: crate::model::Feedback,
    ) -> Evaluation {
        let scores = scores.clamped();
        let overall = round1(clamp_score(
            overall.unwrap_or_else(|| self.config.weighted_overall(&scores, mode)),
        ));
        Evaluation {
            overall,
            technical_accuracy: round1(scores.technical),
            communication_skills: round1(scores.communication),
            sentiment_tone: round1(scores.sentiment),
            completeness: round1(scores.completeness),
            grade: self.config.grade_for(overall),
            passed: self.config.passed(overall),
            feedback,
        }
    }

    /// All four sub-scores, clamped but unrounded.
    pub fn sub_scores(&self, profile: &AnswerProfile, question: &Question, mode: Mode) -> SubScores {
        SubScores {
            technical: self.technical_accuracy(profile, question, mode),
            communication: self.communication(profile),
            sentiment: self.sentiment_tone(profile),
            completeness: self.completeness(profile, question),
        }
        .clamped()
    }

    fn is_short(&self, profile: &AnswerProfile) -> bool {
        profile.word_count < self.config.short_answer_words
    }

    fn technical_accuracy(&self, profile: &AnswerProfile, question: &Question, mode: Mode) -> f64 {
        let rules = &self.config.technical;
        if profile.is_non_answer {
            return rules.non_answer;
        }
        if self.is_short(profile) {
            return rules.short_answer;
        }

        let mut score = if mode == Mode::Hr {
            rules.hr_baseline
        } else {
            rules.baseline
        };

        if !question.keywords.is_empty() {
            let mut exact = 0usize;
            let mut partial = 0usize;
            for keyword in &question.keywords {
                if profile.mentions(keyword) {
                    exact += 1;
                } else if profile.mentions_partially(keyword) {
                    partial += 1;
                }
            }
            let total = question.keywords.len() as f64;
            score += exact as f64 / total * rules.exact_keyword_points;
            score += partial as f64 / total * rules.partial_keyword_points;
            if exact == 0 && partial == 0 {
                score -= rules.no_keyword_penalty;
            }
        }

        if !question.technical_concepts.is_empty() {
            let matched = question
                .technical_concepts
                .iter()
                .filter(|c| profile.mentions(&c.replace('_', " ")))
                .count();
            let ratio = matched as f64 / question.technical_concepts.len() as f64;
            score += ratio * rules.concept_points;
            if ratio < rules.concept_ratio_floor {
                score -= rules.missing_concepts_penalty;
            }
        }

        let similarity = cosine_similarity(
            &self.embedder.embed(&question.text),
            &self.embedder.embed(&profile.normalized),
        )
        .clamp(0.0, 1.0);
        score += similarity * rules.similarity_points;

        let wc = profile.word_count;
        if wc > rules.depth_threshold_words {
            let extra = (wc - rules.depth_threshold_words) as f64 / rules.depth_words_per_point;
            score += extra.min(rules.depth_bonus_cap);
        } else if wc < rules.brief_threshold_words {
            score -= rules.brief_penalty;
        }

        clamp_score(score)
    }

    fn communication(&self, profile: &AnswerProfile) -> f64 {
        let rules = &self.config.communication;
        if profile.is_non_answer {
            return rules.non_answer;
        }
        if self.is_short(profile) {
            return rules.short_answer;
        }

        let mut score = rules.baseline;
        let wc = profile.word_count;
        score += match wc {
            30..=200 => rules.ideal_length_bonus,
            20..=29 => rules.fair_length_bonus,
            10..=19 => rules.brief_length_bonus,
            0..=9 => -rules.terse_penalty,
            _ => 0.0,
        };

        score += match sentences(&profile.normalized).len() {
            n if n >= 3 => rules.multi_sentence_bonus,
            2 => rules.two_sentence_bonus,
            _ => rules.single_sentence_bonus,
        };

        let total = profile.tokens.len();
        if total > 0 {
            let mut freq: HashMap<&str, usize> = HashMap::new();
            for t in &profile.tokens {
                *freq.entry(t.as_str()).or_default() += 1;
            }
            let diversity = freq.len() as f64 / total as f64;
            score += if diversity > rules.high_diversity {
                rules.high_diversity_bonus
            } else if diversity > rules.mid_diversity {
                rules.mid_diversity_bonus
            } else {
                rules.low_diversity_bonus
            };

            let most_common = freq.values().copied().max().unwrap_or(0);
            if most_common as f64 > total as f64 * rules.repetition_share {
                score -= rules.repetition_penalty;
            }
        }

        let connectives = count_phrases(&profile.tokens, CONNECTIVES) as f64;
        score += (connectives * rules.connective_points).min(rules.connective_cap);

        clamp_score(score)
    }

    fn sentiment_tone(&self, profile: &AnswerProfile) -> f64 {
        let rules = &self.config.sentiment;
        if profile.is_non_answer {
            return rules.non_answer;
        }
        if self.is_short(profile) {
            return rules.short_answer;
        }

        let mut score = rules.baseline;

        if let Some(reading) = self.sentiment.analyze(&profile.normalized) {
            let polarity = reading.polarity;
            if polarity > rules.strong_polarity {
                score += polarity * rules.strong_polarity_points;
            } else if polarity > 0.0 {
                score += polarity * rules.mild_polarity_points;
            } else if polarity < rules.negative_polarity {
                score -= rules.negative_penalty;
            }

            let subjectivity = reading.subjectivity;
            if (0.3..=0.6).contains(&subjectivity) {
                score += rules.balanced_subjectivity_bonus;
            } else if (0.2..0.3).contains(&subjectivity) {
                score += rules.light_subjectivity_bonus;
            } else if subjectivity < 0.2 {
                score += rules.flat_subjectivity_bonus;
            }
        }

        let confident = count_phrases(&profile.tokens, CONFIDENCE_WORDS) as f64;
        score += (confident * rules.confidence_points).min(rules.confidence_cap);

        let hedges = count_phrases(&profile.tokens, HEDGING_PHRASES) as f64;
        score -= (hedges * rules.hedging_points).min(rules.hedging_cap);

        clamp_score(score)
    }

    fn completeness(&self, profile: &AnswerProfile, question: &Question) -> f64 {
        let rules = &self.config.completeness;
        if profile.is_non_answer {
            return rules.non_answer;
        }
        if self.is_short(profile) {
            return rules.short_answer;
        }

        let mut score = rules.baseline;

        let expected =
            question.expected_duration_seconds as f64 * rules.words_per_minute / 60.0;
        let wc = profile.word_count as f64;
        if wc >= expected * 0.8 {
            score += rules.full_length_bonus;
        } else if wc >= expected * 0.6 {
            score += rules.most_length_bonus;
        } else if wc >= expected * 0.4 {
            score += rules.partial_length_bonus;
        } else if wc < expected * 0.2 {
            score -= rules.scant_length_penalty;
        }

        let asked = content_words(&question.text);
        if !asked.is_empty() {
            let covered = asked
                .iter()
                .filter(|w| {
                    let target = stem(w);
                    profile.tokens.iter().any(|t| t == *w || stem(t) == target)
                })
                .count();
            let ratio = covered as f64 / asked.len() as f64;
            score += ratio * rules.overlap_points;
            if ratio < rules.overlap_floor {
                score -= rules.low_overlap_penalty;
            }
        }

        if count_phrases(&profile.tokens, EXPLANATION_PHRASES) > 0 {
            score += rules.explanation_bonus;
        }

        clamp_score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{NeutralSentiment, NoopEmbedder};

    fn neutral_scorer() -> LocalScorer {
        LocalScorer::with_capabilities(
            ScoringConfig::default(),
            Arc::new(NoopEmbedder),
            Arc::new(NeutralSentiment),
        )
    }

    fn process_question() -> Question {
        Question::new(
            "What is the difference between a process and a thread?",
            &["process", "thread", "memory", "context switch"],
        )
        .with_concepts(&["shared_memory", "address_space"])
    }

    #[test]
    fn grade_boundaries_are_exact() {
        let config = ScoringConfig::default();
        assert_eq!(config.grade_for(90.0), Grade::A);
        assert_eq!(config.grade_for(89.9), Grade::B);
        assert_eq!(config.grade_for(80.0), Grade::B);
        assert_eq!(config.grade_for(70.0), Grade::C);
        assert_eq!(config.grade_for(60.0), Grade::D);
        assert!(config.passed(60.0));
        assert_eq!(config.grade_for(59.9), Grade::F);
        assert!(!config.passed(59.9));
    }

    #[test]
    fn default_weights_sum_to_one() {
        let weights = ModeWeights::default();
        for mode in Mode::ALL {
            let w = weights.for_mode(mode);
            let sum = w.technical + w.communication + w.sentiment + w.completeness;
            assert!((sum - 1.0).abs() < 1e-9, "{mode}: {sum}");
        }
    }

    #[test]
    fn non_answer_scores_floor() {
        let scorer = LocalScorer::default();
        let eval = scorer.evaluate(
            "Honestly I don't know anything about that topic at all",
            &process_question(),
            Mode::Technical,
        );
        assert!(eval.technical_accuracy <= 10.0);
        assert!(eval.completeness <= 15.0);
        assert_eq!(eval.technical_accuracy, 5.0);
        assert_eq!(eval.communication_skills, 15.0);
        assert_eq!(eval.sentiment_tone, 20.0);
        assert_eq!(eval.completeness, 10.0);
        assert!(!eval.passed);
    }

    #[test]
    fn curly_apostrophe_non_answer_is_detected() {
        let profile = AnswerProfile::new("I don\u{2019}t know, sorry about that one");
        assert!(profile.is_non_answer);
    }

    #[test]
    fn piano_idea_is_not_a_non_answer() {
        let profile = AnswerProfile::new("I had a piano idea for the architecture once");
        assert!(!profile.is_non_answer);
    }

    #[test]
    fn empty_answer_is_valid_and_low() {
        let scorer = LocalScorer::default();
        for mode in Mode::ALL {
            let eval = scorer.evaluate("", &process_question(), mode);
            assert!(eval.overall <= 20.0, "{mode}: {}", eval.overall);
            assert_eq!(eval.grade, Grade::F);
            assert!(!eval.passed);
        }
    }

    #[test]
    fn short_answer_scores() {
        let scorer = neutral_scorer();
        let eval = scorer.evaluate("Threads share memory.", &process_question(), Mode::Technical);
        assert_eq!(eval.technical_accuracy, 10.0);
        assert_eq!(eval.communication_skills, 20.0);
        assert_eq!(eval.sentiment_tone, 25.0);
        assert_eq!(eval.completeness, 15.0);
        // 0.40*10 + 0.25*20 + 0.15*25 + 0.20*15 = 15.75
        assert!((15.7..=15.8).contains(&eval.overall), "{}", eval.overall);
    }

    #[test]
    fn full_keyword_coverage_scores_well() {
        let scorer = neutral_scorer();
        let answer = "A process has its own address space, while a thread runs inside a \
                      process and uses shared memory with its siblings. Because threads share \
                      memory, a context switch between them is cheaper. For example, a web \
                      server can handle each request on a thread without copying state between \
                      separate processes, which keeps the difference in cost very visible.";
        let question = process_question().with_duration(30);
        let eval = scorer.evaluate(answer, &question, Mode::Technical);
        // 15 + 45 + 20 concept points + depth bonus
        assert!(eval.technical_accuracy >= 80.0, "{}", eval.technical_accuracy);
        assert!(eval.completeness >= 80.0, "{}", eval.completeness);
        assert!(eval.feedback.missing_points.is_empty());
    }

    #[test]
    fn no_keywords_matched_is_penalized() {
        let scorer = neutral_scorer();
        let answer = "I enjoy hiking on weekends with friends and family in the mountains nearby";
        let eval = scorer.evaluate(answer, &process_question(), Mode::Technical);
        // 15 - 20 - 10 (concepts) - 10 (brief) clamps to zero
        assert_eq!(eval.technical_accuracy, 0.0);
    }

    #[test]
    fn hedging_lowers_tone() {
        let scorer = neutral_scorer();
        let q = Question::new("Why do you want this role?", &["growth"]);
        let confident = scorer.evaluate(
            "I am confident this role fits because I definitely enjoy building teams",
            &q,
            Mode::Hr,
        );
        let hedged = scorer.evaluate(
            "Maybe this role fits, perhaps because I might enjoy it, I guess",
            &q,
            Mode::Hr,
        );
        assert!(confident.sentiment_tone > hedged.sentiment_tone);
    }

    #[test]
    fn repetition_is_penalized() {
        let scorer = neutral_scorer();
        let q = Question::new("Describe your workflow.", &[]);
        let varied = scorer.evaluate(
            "I plan the week, review tickets, pair with colleagues and ship small changes.",
            &q,
            Mode::Behavioral,
        );
        let repetitive = scorer.evaluate(
            "work work work work work work work work work work work work.",
            &q,
            Mode::Behavioral,
        );
        assert!(varied.communication_skills > repetitive.communication_skills);
    }

    #[test]
    fn compose_clamps_and_recomputes_grade() {
        let scorer = LocalScorer::default();
        let eval = scorer.compose(
            SubScores {
                technical: 140.0,
                communication: -3.0,
                sentiment: f64::NAN,
                completeness: 60.0,
            },
            Some(59.96),
            Mode::Mixed,
            Default::default(),
        );
        assert_eq!(eval.technical_accuracy, 100.0);
        assert_eq!(eval.communication_skills, 0.0);
        assert_eq!(eval.sentiment_tone, 0.0);
        // rounds to 60.0 so it passes with a D
        assert_eq!(eval.overall, 60.0);
        assert_eq!(eval.grade, Grade::D);
        assert!(eval.passed);
    }

    #[test]
    fn all_scores_in_range() {
        let scorer = LocalScorer::default();
        let answers = [
            "",
            "no",
            "um um um um um um um um um um",
            "Absolutely, I successfully led the migration because the old system failed \
             constantly. Specifically, we moved to containers. Therefore deploys were safer.",
        ];
        for answer in answers {
            for mode in Mode::ALL {
                let e = scorer.evaluate(answer, &process_question(), mode);
                for v in [
                    e.overall,
                    e.technical_accuracy,
                    e.communication_skills,
                    e.sentiment_tone,
                    e.completeness,
                ] {
                    assert!((0.0..=100.0).contains(&v));
                }
                assert_eq!(e.passed, e.overall >= 60.0);
            }
        }
    }

    #[test]
    fn scoring_config_partial_override() {
        let config: ScoringConfig = toml::from_str(
            r#"
            pass_mark = 50.0
            [weights.hr]
            technical = 0.25
            communication = 0.25
            sentiment = 0.25
            completeness = 0.25
            [technical]
            baseline = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(config.pass_mark, 50.0);
        assert_eq!(config.weights.hr.technical, 0.25);
        assert_eq!(config.weights.technical, ModeWeights::default().technical);
        assert_eq!(config.technical.baseline, 20.0);
        assert_eq!(config.technical.hr_baseline, 25.0);
        assert_eq!(config.completeness.words_per_minute, 150.0);
    }

    #[test]
    fn ideal_answers_score_high_on_every_bundled_question() {
        let bank = crate::bank::QuestionBank::builtin().unwrap();
        let scorer = LocalScorer::default();

        let mut checked = 0;
        for (mode, _, question) in bank.all_questions(None, None) {
            let Some(ideal) = &question.ideal_answer else {
                continue;
            };
            let e = scorer.evaluate(ideal, question, mode);
            assert!(
                e.technical_accuracy >= 80.0,
                "technical {} for {:?}",
                e.technical_accuracy,
                question.text
            );
            assert!(
                e.completeness >= 80.0,
                "completeness {} for {:?}",
                e.completeness,
                question.text
            );
            checked += 1;
        }
        assert!(checked > 0);
    }
}

//! Rule-based feedback derived from sub-scores.

use crate::model::{Feedback, Mode, Question};
use crate::scoring::{AnswerProfile, SubScores};

/// Missing keywords listed per answer.
const MAX_MISSING_POINTS: usize = 5;
/// Missing-keyword count that earns its own weakness line.
const MISSING_WEAKNESS_THRESHOLD: usize = 3;

struct Tier {
    high: &'static str,
    mid: &'static str,
    weak: &'static str,
    weak_tips: &'static [&'static str],
    poor: &'static str,
    poor_tips: &'static [&'static str],
}

const TECHNICAL: Tier = Tier {
    high: "Strong technical understanding demonstrated",
    mid: "Good grasp of the core concepts",
    weak: "Technical accuracy needs improvement",
    weak_tips: &["Use more specific technical terminology and name the concepts involved"],
    poor: "Answer lacks technical substance",
    poor_tips: &[
        "Review the core concepts behind this question",
        "Back your answer with concrete examples and technical detail",
    ],
};

const SENTIMENT: Tier = Tier {
    high: "Confident and positive tone",
    mid: "Professional demeanor",
    weak: "Could show more confidence",
    weak_tips: &["Use assertive language and avoid hedging"],
    poor: "Tone comes across as unsure or negative",
    poor_tips: &["Avoid phrases like \"I don't know\", \"not sure\" or \"maybe\""],
};

const COMPLETENESS: Tier = Tier {
    high: "Comprehensive answer covering every part of the question",
    mid: "Answer covers the main points",
    weak: "Answer lacks depth",
    weak_tips: &["Make sure you address every part of the question"],
    poor: "Answer is incomplete or off-topic",
    poor_tips: &[
        "Re-read the question and keep your answer on it",
        "Add examples or specific details to support your answer",
    ],
};

/// Assemble strengths, weaknesses, suggestions and missing points.
pub fn build_feedback(
    profile: &AnswerProfile,
    question: &Question,
    scores: &SubScores,
    mode: Mode,
) -> Feedback {
    let mut fb = Feedback::default();

    if profile.is_non_answer {
        fb.weaknesses
            .push("Admitted not knowing instead of giving a substantive answer".into());
        fb.suggestions
            .push("Even when unsure, offer a partial answer or related knowledge".into());
        fb.suggestions
            .push("Talk through your reasoning and mention related concepts you do know".into());
    }

    apply_tier(&mut fb, scores.technical, &TECHNICAL);

    if mode.emphasizes_technical() {
        let missed: Vec<&String> = question
            .keywords
            .iter()
            .filter(|k| !profile.mentions(k))
            .collect();
        fb.missing_points
            .extend(missed.iter().take(MAX_MISSING_POINTS).map(|k| k.to_string()));
        if missed.len() >= MISSING_WEAKNESS_THRESHOLD {
            fb.weaknesses
                .push(format!("Missing {} key concepts in your answer", missed.len()));
        }
    }

    // Communication tips depend on length, so it does not use a static tier.
    let wc = profile.word_count;
    match scores.communication {
        s if s >= 80.0 => fb
            .strengths
            .push("Excellent communication and articulation".into()),
        s if s >= 60.0 => fb.strengths.push("Clear and coherent response".into()),
        s if s >= 40.0 => {
            fb.weaknesses
                .push("Communication could be more structured".into());
            if wc < 20 {
                fb.suggestions
                    .push("Give a fuller explanation (aim for 30 to 100 words)".into());
            }
        }
        _ => {
            fb.weaknesses.push("Poorly structured response".into());
            if wc < 10 {
                fb.suggestions
                    .push("Your answer is too brief; elaborate more".into());
            }
            fb.suggestions
                .push("Use complete sentences and organize your thoughts".into());
        }
    }

    apply_tier(&mut fb, scores.sentiment, &SENTIMENT);
    apply_tier(&mut fb, scores.completeness, &COMPLETENESS);

    fb
}

fn apply_tier(fb: &mut Feedback, score: f64, tier: &Tier) {
    if score >= 80.0 {
        fb.strengths.push(tier.high.into());
    } else if score >= 60.0 {
        fb.strengths.push(tier.mid.into());
    } else if score >= 40.0 {
        fb.weaknesses.push(tier.weak.into());
        fb.suggestions
            .extend(tier.weak_tips.iter().map(|s| s.to_string()));
    } else {
        fb.weaknesses.push(tier.poor.into());
        fb.suggestions
            .extend(tier.poor_tips.iter().map(|s| s.to_string()));
    }
}

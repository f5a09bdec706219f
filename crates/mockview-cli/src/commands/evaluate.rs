//! The `mockview evaluate` command.

use std::io::Read;

use anyhow::Result;

use mockview_core::model::{Difficulty, Evaluation, Mode, Question};

use crate::ConfigArgs;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    question: String,
    answer: Option<String>,
    keywords: Option<String>,
    mode: Mode,
    difficulty: Difficulty,
    format: String,
    local: bool,
    config_args: ConfigArgs,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format '{format}' (expected text or json)"
    );

    let answer = match answer {
        Some(a) => a,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            String::from_utf8_lossy(&buf).into_owned()
        }
    };

    let config = super::load(&config_args)?;
    let (evaluator, _) = super::model_services(&config, local)?;

    let keywords = super::split_list(keywords.as_deref());
    let keyword_refs: Vec<&str> = keywords.iter().map(String::as_str).collect();
    let question = Question::new(question, &keyword_refs);

    let evaluation = evaluator
        .evaluate(answer.trim(), &question, mode, difficulty)
        .await;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        print_evaluation(&evaluation);
    }
    Ok(())
}

pub fn print_evaluation(e: &Evaluation) {
    println!(
        "Overall: {:.1}/100  Grade {}  {}",
        e.overall,
        e.grade.label(),
        if e.passed { "PASS" } else { "FAIL" }
    );
    println!("  Technical accuracy:   {:>5.1}", e.technical_accuracy);
    println!("  Communication skills: {:>5.1}", e.communication_skills);
    println!("  Sentiment & tone:     {:>5.1}", e.sentiment_tone);
    println!("  Completeness:         {:>5.1}", e.completeness);

    let fb = &e.feedback;
    for s in &fb.strengths {
        println!("  + {s}");
    }
    for w in &fb.weaknesses {
        println!("  - {w}");
    }
    if !fb.missing_points.is_empty() {
        println!("  Missing: {}", fb.missing_points.join(", "));
    }
    for s in &fb.suggestions {
        println!("  > {s}");
    }
}

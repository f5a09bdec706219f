//! Question bank loading and validation.
//!
//! A bank maps mode -> difficulty -> ordered list of questions. Files are
//! TOML (`[[Technical.Intermediate]]` arrays of tables) or JSON (the legacy
//! `{"Technical": {"Intermediate": [...]}}` shape), chosen by extension.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Difficulty, Mode, Question};

/// The bank shipped with the crate.
const BUILTIN_BANK: &str = include_str!("../../../question-banks/default.toml");

/// Raw file shape before mode/difficulty keys are checked.
type RawBank = BTreeMap<String, BTreeMap<String, Vec<Question>>>;

/// Catalog of questions keyed by (mode, difficulty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionBank {
    pools: BTreeMap<(Mode, Difficulty), Vec<Question>>,
}

impl QuestionBank {
    /// The bundled default bank.
    pub fn builtin() -> Result<Self> {
        parse_bank_str(BUILTIN_BANK, Path::new("default.toml"))
    }

    /// Raw TOML of the bundled bank (written out by `mockview init`).
    pub fn builtin_source() -> &'static str {
        BUILTIN_BANK
    }

    pub fn from_pools(pools: impl IntoIterator<Item = ((Mode, Difficulty), Vec<Question>)>) -> Self {
        Self {
            pools: pools.into_iter().collect(),
        }
    }

    /// Questions for one (mode, difficulty); empty when the pool is missing.
    pub fn questions_for(&self, mode: Mode, difficulty: Difficulty) -> &[Question] {
        self.pools
            .get(&(mode, difficulty))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every question, optionally narrowed by mode and/or difficulty.
    pub fn all_questions(
        &self,
        mode: Option<Mode>,
        difficulty: Option<Difficulty>,
    ) -> Vec<(Mode, Difficulty, &Question)> {
        self.pools
            .iter()
            .filter(|((m, d), _)| mode.map_or(true, |x| x == *m) && difficulty.map_or(true, |x| x == *d))
            .flat_map(|((m, d), qs)| qs.iter().map(move |q| (*m, *d, q)))
            .collect()
    }

    /// Total number of questions.
    pub fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load a bank file (TOML or JSON by extension).
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse bank content; `source_path` picks the format and labels errors.
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let raw: RawBank = if is_json(source_path) {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?
    } else {
        toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?
    };

    let mut pools = BTreeMap::new();
    for (mode_key, by_difficulty) in raw {
        let mode: Mode = mode_key
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{}: {}", source_path.display(), e))?;
        for (difficulty_key, questions) in by_difficulty {
            let difficulty: Difficulty = difficulty_key
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{}: {}", source_path.display(), e))?;
            pools
                .entry((mode, difficulty))
                .or_insert_with(Vec::new)
                .extend(questions);
        }
    }

    Ok(QuestionBank { pools })
}

/// Forced-question list file: a JSON array, or TOML with `[[questions]]`.
pub fn load_question_list(path: &Path) -> Result<Vec<Question>> {
    #[derive(Deserialize)]
    struct TomlQuestionList {
        #[serde(default)]
        questions: Vec<Question>,
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question list: {}", path.display()))?;

    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))
    } else {
        let parsed: TomlQuestionList = toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML: {}", path.display()))?;
        Ok(parsed.questions)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// `Mode/Difficulty`, plus `#n` (1-based) when about one question.
    pub location: String,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for common authoring mistakes.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for mode in Mode::ALL {
        for difficulty in Difficulty::ALL {
            let pool = bank.questions_for(mode, difficulty);
            let pool_name = format!("{mode}/{difficulty}");

            if pool.is_empty() {
                warnings.push(ValidationWarning {
                    location: pool_name,
                    message: "no questions for this mode and difficulty".into(),
                });
                continue;
            }

            let mut seen = HashSet::new();
            for (i, q) in pool.iter().enumerate() {
                let location = format!("{pool_name}#{}", i + 1);
                let mut warn = |message: String| {
                    warnings.push(ValidationWarning {
                        location: location.clone(),
                        message,
                    })
                };

                if q.text.trim().is_empty() {
                    warn("question text is empty".into());
                } else if !seen.insert(q.text.trim().to_lowercase()) {
                    warn(format!("duplicate question: {}", q.text.trim()));
                }
                if q.keywords.is_empty() {
                    warn("no keywords; technical accuracy cannot be scored".into());
                }
                if q.expected_duration_seconds == 0 {
                    warn("expected duration is zero".into());
                }
                if let Some(ideal) = &q.ideal_answer {
                    if ideal.split_whitespace().count() < 5 {
                        warn("ideal answer is shorter than 5 words".into());
                    }
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SMALL_TOML: &str = r#"
[[Technical.Beginner]]
text = "What is a variable?"
keywords = ["variable", "value", "name"]
expected_duration_seconds = 45

[[Technical.Beginner]]
question = "What is a loop?"
keywords = ["loop", "repeat"]

[[HR.Advanced]]
text = "Describe a time you disagreed with your manager."
keywords = ["conflict", "resolution"]
expected_duration = 120
"#;

    const LEGACY_JSON: &str = r#"{
        "Technical": {
            "Beginner": [
                {"question": "What is a function?", "keywords": ["function"], "expected_duration": 60}
            ]
        },
        "Mixed": {"Intermediate": []}
    }"#;

    #[test]
    fn parse_toml_bank() {
        let bank = parse_bank_str(SMALL_TOML, &PathBuf::from("bank.toml")).unwrap();
        let beginner = bank.questions_for(Mode::Technical, Difficulty::Beginner);
        assert_eq!(beginner.len(), 2);
        assert_eq!(beginner[0].expected_duration_seconds, 45);
        assert_eq!(beginner[1].text, "What is a loop?");
        assert_eq!(beginner[1].expected_duration_seconds, 60);
        let hr = bank.questions_for(Mode::Hr, Difficulty::Advanced);
        assert_eq!(hr[0].expected_duration_seconds, 120);
        assert_eq!(bank.len(), 3);
    }

    #[test]
    fn parse_legacy_json_bank() {
        let bank = parse_bank_str(LEGACY_JSON, &PathBuf::from("questions.json")).unwrap();
        assert_eq!(
            bank.questions_for(Mode::Technical, Difficulty::Beginner)[0].text,
            "What is a function?"
        );
        assert!(bank
            .questions_for(Mode::Mixed, Difficulty::Intermediate)
            .is_empty());
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let bad = "[[Sales.Beginner]]\ntext = \"Sell me this pen\"\n";
        let err = parse_bank_str(bad, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown interview mode"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_bank_str("this is not [valid toml }{", &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn all_questions_filters() {
        let bank = parse_bank_str(SMALL_TOML, &PathBuf::from("bank.toml")).unwrap();
        assert_eq!(bank.all_questions(None, None).len(), 3);
        assert_eq!(bank.all_questions(Some(Mode::Technical), None).len(), 2);
        assert_eq!(
            bank.all_questions(None, Some(Difficulty::Advanced)).len(),
            1
        );
        assert!(bank
            .all_questions(Some(Mode::Behavioral), None)
            .is_empty());
    }

    #[test]
    fn validate_flags_problems() {
        let toml = r#"
[[Technical.Beginner]]
text = "What is a variable?"
keywords = []
expected_duration_seconds = 0
ideal_answer = "A named value."

[[Technical.Beginner]]
text = "what is a variable?"
keywords = ["variable"]
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("bank.toml")).unwrap();
        let warnings = validate_bank(&bank);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.starts_with("no keywords")));
        assert!(messages.iter().any(|m| m.contains("duration is zero")));
        assert!(messages.iter().any(|m| m.contains("shorter than 5 words")));
        assert!(messages.iter().any(|m| m.starts_with("duplicate question")));
        // the other 11 pools are empty
        assert_eq!(
            messages
                .iter()
                .filter(|m| m.starts_with("no questions"))
                .count(),
            11
        );
        assert!(warnings
            .iter()
            .any(|w| w.location == "Technical/Beginner#2"));
    }

    #[test]
    fn builtin_bank_covers_every_pool() {
        let bank = QuestionBank::builtin().unwrap();
        for mode in Mode::ALL {
            for difficulty in Difficulty::ALL {
                assert!(
                    !bank.questions_for(mode, difficulty).is_empty(),
                    "{mode}/{difficulty} is empty"
                );
            }
        }
        assert!(bank.questions_for(Mode::Technical, Difficulty::Intermediate).len() >= 3);
    }

    #[test]
    fn builtin_bank_validates_cleanly() {
        let bank = QuestionBank::builtin().unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn load_question_list_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("forced.json");
        std::fs::write(
            &json_path,
            r#"[{"question": "Why us?", "keywords": ["motivation"]}, {"text": "Why now?"}]"#,
        )
        .unwrap();
        let list = load_question_list(&json_path).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].text, "Why us?");

        let toml_path = dir.path().join("forced.toml");
        std::fs::write(
            &toml_path,
            "[[questions]]\ntext = \"Walk me through your resume.\"\nkeywords = [\"career\"]\n",
        )
        .unwrap();
        let list = load_question_list(&toml_path).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn load_bank_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.toml");
        std::fs::write(&path, SMALL_TOML).unwrap();
        assert_eq!(load_bank(&path).unwrap().len(), 3);
        assert!(load_bank(&dir.path().join("missing.toml")).is_err());
    }
}

//! Text normalization helpers shared by the scorer, embedder and generators.

use std::collections::HashSet;

/// Words ignored when comparing question content against an answer.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "between", "by", "can", "could", "did",
    "do", "does", "for", "from", "have", "how", "i", "in", "is", "it", "me", "of", "on", "or",
    "that", "the", "this", "to", "was", "what", "when", "where", "which", "who", "why", "with",
    "would", "you", "your",
];

/// Lowercase, fold typographic apostrophes, and collapse whitespace.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '`' => '\'',
            c => c,
        })
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split into lowercase word tokens. Apostrophes inside words are kept
/// so "don't" stays one token.
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whitespace word count, matching how a reader would count words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True if `phrase` occurs in `haystack` on word boundaries.
pub fn contains_phrase(haystack: &[String], phrase: &str) -> bool {
    let needle = tokens(phrase);
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// Count how many of `phrases` occur at least once.
pub fn count_phrases(haystack: &[String], phrases: &[&str]) -> usize {
    phrases
        .iter()
        .filter(|p| contains_phrase(haystack, p))
        .count()
}

/// Split on sentence terminators, dropping empty fragments.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Crude suffix-stripping stemmer; good enough to match "caching" with "cache".
pub fn stem(word: &str) -> String {
    const SUFFIXES: &[&str] = &[
        "ations", "ation", "ings", "ing", "ments", "ment", "ions", "ion", "ies", "ed", "es", "ly",
        "s", "e",
    ];
    let w = word.trim_matches('\'');
    for suffix in SUFFIXES {
        if let Some(base) = w.strip_suffix(suffix) {
            if base.chars().count() >= 3 {
                return base.to_string();
            }
        }
    }
    w.to_string()
}

/// Content words of a question: tokens minus stopwords.
pub fn content_words(text: &str) -> HashSet<String> {
    tokens(text)
        .into_iter()
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Title-case a skill name, keeping well-known acronyms upper case.
pub fn display_skill(skill: &str) -> String {
    match skill.to_lowercase().as_str() {
        "ai" => "AI".into(),
        "api" => "API".into(),
        "aws" => "AWS".into(),
        "sql" => "SQL".into(),
        "ci/cd" => "CI/CD".into(),
        "javascript" => "JavaScript".into(),
        "mongodb" => "MongoDB".into(),
        "devops" => "DevOps".into(),
        "node" => "Node.js".into(),
        other => other
            .split(' ')
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_keep_contractions() {
        assert_eq!(tokens("I DON\u{2019}T know!"), vec!["i", "don't", "know"]);
    }

    #[test]
    fn phrase_matching_respects_word_boundaries() {
        let t = tokens("I had a piano idea once");
        assert!(!contains_phrase(&t, "no idea"));
        let t = tokens("Honestly, no idea.");
        assert!(contains_phrase(&t, "no idea"));
    }

    #[test]
    fn sentences_split_on_terminators() {
        assert_eq!(sentences("One. Two! Three?  ").len(), 3);
        assert!(sentences("   ").is_empty());
    }

    #[test]
    fn stem_strips_common_suffixes() {
        assert_eq!(stem("caching"), "cach");
        assert_eq!(stem("cache"), "cach");
        assert_eq!(stem("threads"), "thread");
        assert_eq!(stem("is"), "is");
    }

    #[test]
    fn content_words_drop_stopwords() {
        let words = content_words("What is the difference between a process and a thread?");
        assert!(words.contains("difference"));
        assert!(words.contains("process"));
        assert!(words.contains("thread"));
        assert!(!words.contains("what"));
        assert!(!words.contains("between"));
    }

    #[test]
    fn display_skill_handles_acronyms() {
        assert_eq!(display_skill("machine learning"), "Machine Learning");
        assert_eq!(display_skill("aws"), "AWS");
        assert_eq!(display_skill("python"), "Python");
    }
}

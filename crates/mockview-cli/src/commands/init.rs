//! The `mockview init` command.

use anyhow::Result;

use mockview_core::bank::QuestionBank;

pub fn execute() -> Result<()> {
    if std::path::Path::new("mockview.toml").exists() {
        println!("mockview.toml already exists, skipping.");
    } else {
        std::fs::write("mockview.toml", SAMPLE_CONFIG)?;
        println!("Created mockview.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let bank_path = std::path::Path::new("question-banks/default.toml");
    if bank_path.exists() {
        println!("question-banks/default.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, QuestionBank::builtin_source())?;
        println!("Created question-banks/default.toml");
    }

    println!("\nNext steps:");
    println!("  1. Optionally set model_provider in mockview.toml and export its API key");
    println!("  2. Run: mockview validate --bank question-banks/default.toml");
    println!("  3. Run: mockview practice --mode technical --count 3");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mockview configuration
#
# Without model_provider every answer is scored by the local heuristics.
# model_provider = "openai"
model = "gpt-4.1-mini"
model_timeout_secs = 20
use_model_scoring = true
use_model_generation = true

question_bank = "question-banks/default.toml"
store_path = "./mockview-data/sessions.json"
report_dir = "./mockview-reports"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"

[scoring]
pass_mark = 60.0
"#;

//! The `mockview validate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use mockview_core::bank::{load_bank, validate_bank};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let files = if bank_path.is_dir() {
        bank_files(&bank_path)?
    } else {
        vec![bank_path]
    };
    anyhow::ensure!(!files.is_empty(), "no .toml or .json bank files found");

    let mut total_warnings = 0;

    for path in &files {
        let bank = load_bank(path)?;
        println!("Question bank: {} ({} questions)", path.display(), bank.len());

        let warnings = validate_bank(&bank);
        for w in &warnings {
            println!("  [{}] WARNING: {}", w.location, w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn bank_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        let is_bank = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "toml" || e == "json");
        if path.is_file() && is_bank {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary run inside `dir`, isolated from any user-level config.
fn mockview(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("mockview").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("MOCKVIEW_OPENAI_KEY")
        .env_remove("MOCKVIEW_GEMINI_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn bank_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../question-banks")
}

const ANSWERS: &str = "\
For example, at my last job I profiled a slow endpoint, found an N+1 query, and batched it, which cut latency by 60 percent.\n\
I would first reproduce the issue, then add logging and metrics, and finally write a regression test so it cannot come back.\n\
Specifically, I used a hash map keyed by user id because lookups are constant time and the data fit comfortably in memory.\n\
As a result the team shipped on time, and I documented the design so others could maintain it.\n\
I learned to communicate trade-offs early, for instance by writing a short design note before coding.\n";

fn run_practice(dir: &Path) {
    mockview(dir)
        .args(["practice", "--mode", "technical", "--difficulty", "beginner"])
        .args(["--count", "2", "--seed", "7", "--user", "tester"])
        .args(["--store", "sessions.json", "--output", "reports", "--format", "all"])
        .write_stdin(ANSWERS)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/2]"))
        .stdout(predicate::str::contains("[2/2]"))
        .stdout(predicate::str::contains("Interview complete"));
}

fn only_session_id(dir: &Path) -> String {
    let content = std::fs::read_to_string(dir.join("sessions.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    let sessions = doc["sessions"].as_object().unwrap();
    assert_eq!(sessions.len(), 1);
    sessions.keys().next().unwrap().clone()
}

#[test]
fn validate_default_bank() {
    let dir = TempDir::new().unwrap();
    mockview(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg(bank_dir().join("default.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("questions)"))
        .stdout(predicate::str::contains("All question banks valid"));
}

#[test]
fn validate_directory() {
    let dir = TempDir::new().unwrap();
    mockview(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg(bank_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("default.toml"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("thin.toml");
    std::fs::write(
        &path,
        "[[Technical.Beginner]]\ntext = \"What is a variable?\"\nkeywords = []\n",
    )
    .unwrap();

    mockview(dir.path())
        .args(["validate", "--bank", "thin.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Technical/Beginner#1] WARNING: no keywords"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    mockview(dir.path())
        .args(["validate", "--bank", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created mockview.toml"))
        .stdout(predicate::str::contains("Created question-banks/default.toml"));

    assert!(dir.path().join("mockview.toml").exists());
    assert!(dir.path().join("question-banks/default.toml").exists());

    // the written bank is usable as-is
    mockview(dir.path())
        .args(["validate", "--bank", "question-banks/default.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All question banks valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path()).arg("init").assert().success();

    mockview(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn evaluate_text_output() {
    let dir = TempDir::new().unwrap();
    mockview(dir.path())
        .args(["evaluate", "--question", "What is a mutex?", "--keywords", "lock,thread"])
        .args([
            "--answer",
            "A mutex is a lock that lets only one thread at a time access shared data, for example a counter.",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall:"))
        .stdout(predicate::str::contains("Technical accuracy:"));
}

#[test]
fn evaluate_json_from_stdin() {
    let dir = TempDir::new().unwrap();
    let output = mockview(dir.path())
        .args(["evaluate", "--question", "What is a mutex?", "--keywords", "lock,thread"])
        .args(["--format", "json", "--local"])
        .write_stdin("A mutex is a lock shared between threads.\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let evaluation: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let overall = evaluation["overall"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&overall));
    assert!(evaluation["grade"].is_string());
    assert!(evaluation["feedback"]["strengths"].is_array());
}

#[test]
fn evaluate_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    mockview(dir.path())
        .args(["evaluate", "--question", "q", "--answer", "a", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn unknown_mode_is_rejected() {
    let dir = TempDir::new().unwrap();
    mockview(dir.path())
        .args(["practice", "--mode", "trivia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown interview mode"));
}

#[test]
fn practice_writes_session_and_reports() {
    let dir = TempDir::new().unwrap();
    run_practice(dir.path());

    let id = only_session_id(dir.path());
    assert!(id.starts_with("session_"));

    let mut reports: Vec<String> = std::fs::read_dir(dir.path().join("reports"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    reports.sort();
    assert_eq!(
        reports,
        vec![
            format!("{id}.html"),
            format!("{id}.json"),
            format!("{id}.md"),
            format!("{id}.txt"),
        ]
    );
}

#[test]
fn practice_quit_records_nothing_answered() {
    let dir = TempDir::new().unwrap();
    mockview(dir.path())
        .args(["practice", "--count", "3", "--store", "sessions.json", "--output", "reports"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 answered"));

    assert!(!dir.path().join("reports").exists());
}

#[test]
fn report_renders_stored_session() {
    let dir = TempDir::new().unwrap();
    run_practice(dir.path());
    let id = only_session_id(dir.path());

    mockview(dir.path())
        .args(["report", &id, "--store", "sessions.json", "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Interview Performance Report"))
        .stdout(predicate::str::contains("**Candidate:** tester"));

    mockview(dir.path())
        .args(["report", &id, "--store", "sessions.json", "--format", "html"])
        .args(["--output", "out/report.html"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Report written to"));
    assert!(dir.path().join("out/report.html").exists());
}

#[test]
fn report_unknown_session() {
    let dir = TempDir::new().unwrap();
    mockview(dir.path())
        .args(["report", "session_missing", "--store", "sessions.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session not found"));
}

#[test]
fn history_lists_sessions() {
    let dir = TempDir::new().unwrap();

    mockview(dir.path())
        .args(["history", "--store", "sessions.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions recorded yet"));

    run_practice(dir.path());

    mockview(dir.path())
        .args(["history", "--store", "sessions.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tester"))
        .stdout(predicate::str::contains("Technical"))
        .stdout(predicate::str::contains("Sessions: 1 (1 completed)"));

    mockview(dir.path())
        .args(["history", "--store", "sessions.json", "--user", "someone-else"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions recorded yet"));
}

#[test]
fn evaluate_accepts_invalid_utf8_answer() {
    let dir = TempDir::new().unwrap();
    let output = mockview(dir.path())
        .args(["evaluate", "--question", "What is a cache?", "--keywords", "cache"])
        .args(["--format", "json", "--local"])
        .write_stdin(b"I use \xff\xfe caches to keep hot data close.\n".to_vec())
        .output()
        .unwrap();
    assert!(output.status.success());

    let evaluation: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let overall = evaluation["overall"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&overall));
}

#[test]
fn practice_survives_invalid_utf8_answer() {
    let dir = TempDir::new().unwrap();
    let mut input = ANSWERS.lines().next().unwrap().as_bytes().to_vec();
    input.extend_from_slice(b"\n\xff\xfe garbage\n");
    input.extend_from_slice(ANSWERS.as_bytes());

    mockview(dir.path())
        .args(["practice", "--count", "2", "--seed", "7", "--local"])
        .args(["--store", "sessions.json", "--output", "reports", "--format", "json"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Interview complete"));

    let content = std::fs::read_to_string(dir.path().join("sessions.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    let session = doc["sessions"].as_object().unwrap().values().next().unwrap();
    assert_eq!(session["status"], "completed");
    let answers: Vec<&str> = session["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["answer"].as_str().unwrap())
        .collect();
    assert!(answers.iter().any(|a| a.contains('\u{FFFD}')));
}

#[test]
fn meeting_questions_reach_the_candidate() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("curated.json"),
        r#"[{"question": "Why do you want to join our platform team?", "expected_answer": "Impact and ownership."}]"#,
    )
    .unwrap();

    let output = mockview(dir.path())
        .args(["meeting", "create", "--by", "lead", "--kind", "live"])
        .args(["--questions", "curated.json", "--store", "sessions.json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("1 custom question(s)"));
    let code = stdout.split_whitespace().nth(1).unwrap().to_string();
    assert_eq!(code.len(), 6);

    mockview(dir.path())
        .args(["meeting", "list", "--by", "lead", "--store", "sessions.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(code.as_str()))
        .stdout(predicate::str::contains("live"));

    mockview(dir.path())
        .args(["practice", "--meeting", &code, "--user", "tester", "--local"])
        .args(["--store", "sessions.json", "--format", "none"])
        .write_stdin(ANSWERS)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/1] Why do you want to join our platform team?"));

    let id = only_session_id(dir.path());
    mockview(dir.path())
        .args(["meeting", "sessions", &code, "--store", "sessions.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()));

    mockview(dir.path())
        .args(["meeting", "review", &id, "--result", "selected", "--store", "sessions.json"])
        .assert()
        .success();
    mockview(dir.path())
        .args(["history", "--store", "sessions.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected"));

    mockview(dir.path())
        .args(["meeting", "delete", &code, "--store", "sessions.json"])
        .assert()
        .success();
    mockview(dir.path())
        .args(["practice", "--meeting", &code, "--store", "sessions.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("meeting not found or inactive"));
}

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

/// Run the binary with a scratch data dir and no API key, so every command
/// stays offline and deterministic. Returns exit success plus parsed stdout.
fn run_cli(data_dir: &Path, args: &[&str]) -> (bool, Value) {
    let output = Command::cargo_bin("grandmas-kitchen")
        .expect("binary")
        .env_remove("GRANDMAS_KITCHEN_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .arg("--quiet")
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .expect("command run");

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json on stdout");
    (output.status.success(), body)
}

#[test]
fn styles_search_ranks_sicilian_first() {
    let temp = tempdir().unwrap();
    let (ok, body) = run_cli(temp.path(), &["styles", "--query", "sicilian"]);
    assert!(ok);

    let matches = body.as_array().expect("array of matches");
    assert!(!matches.is_empty());
    assert_eq!(matches[0]["id"], "it-sicilian");
    assert_eq!(matches[0]["cuisine"], "Italian");
}

#[test]
fn infer_reports_a_primary_style_with_confidence() {
    let temp = tempdir().unwrap();
    let (ok, body) = run_cli(
        temp.path(),
        &[
            "infer",
            "--message",
            "my nonna in sicily made pasta every sunday",
        ],
    );
    assert!(ok);
    assert_eq!(body["primary"]["cuisine"], "Italian");
    let confidence = body["primary"]["confidence"].as_f64().unwrap();
    assert!((0.35..=0.98).contains(&confidence));
}

#[test]
fn mock_generate_emits_a_valid_recipe_and_persists_the_profile() {
    let temp = tempdir().unwrap();
    let (ok, body) = run_cli(
        temp.path(),
        &[
            "generate",
            "--cuisine",
            "Italian",
            "--persona",
            "Nonna Rosa",
            "--prompt",
            "quick weeknight pasta with chicken",
            "--mock-only",
        ],
    );
    assert!(ok);

    assert_eq!(body["model"], "mock-fallback");
    assert_eq!(body["recipe"]["cuisine"], "Italian");
    assert_eq!(body["recipe"]["totalMinutes"], 30);
    assert!(!body["recipe"]["title"].as_str().unwrap().is_empty());
    assert!(body["recipe"]["ingredients"].as_array().unwrap().len() >= 3);

    assert!(temp.path().join("profile.json").exists());
}

#[test]
fn eval_run_fails_the_gate_in_mock_mode_and_latest_reloads_it() {
    let temp = tempdir().unwrap();

    let (ok, summary) = run_cli(temp.path(), &["eval", "run"]);
    assert!(!ok, "mock-mode runs never clear the conversation gate");
    assert_eq!(summary["run"]["model_name"], "mock-fallback");
    assert_eq!(summary["gate"]["status"], "fail");
    let reasons = summary["gate"]["reasons"].as_array().unwrap();
    assert!(reasons
        .iter()
        .any(|r| r.as_str().unwrap().contains("Conversation score below threshold")));

    let (ok, latest) = run_cli(temp.path(), &["eval", "latest"]);
    assert!(!ok);
    assert_eq!(latest["run"]["id"], summary["run"]["id"]);
}

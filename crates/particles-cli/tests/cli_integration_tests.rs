//! CLI integration tests for particles
//!
//! Tests the particles CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command isolated from the user's config, credentials and .env
#[allow(deprecated)]
fn particles_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("particles").unwrap();
    cmd.current_dir(config_dir.path());
    cmd.env("PARTICLES_CONFIG_DIR", config_dir.path());
    cmd.env_remove("PARTICLES_API_KEY");
    cmd.env_remove("OPENAI_API_KEY");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn words(n: usize) -> String {
    (0..n)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_config(dir: &TempDir, base_url: &str) {
    std::fs::write(
        dir.path().join("config.toml"),
        format!("[llm]\nbase_url = \"{}\"\ntimeout_secs = 5\n", base_url),
    )
    .unwrap();
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4-turbo-preview",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 300, "completion_tokens": 100, "total_tokens": 400}
    })
}

#[test]
fn test_empty_stdin_is_rejected() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["compress"])
        .write_stdin("   \n\t  ")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please paste an article before compressing!",
        ));
}

#[test]
fn test_empty_input_checked_before_api_key() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["compress", "-"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please paste an article"))
        .stderr(predicate::str::contains("API key").not());
}

#[test]
fn test_dry_run_prints_plan() {
    let dir = TempDir::new().unwrap();
    let article = dir.path().join("article.txt");
    std::fs::write(&article, words(100)).unwrap();

    particles_cmd(&dir)
        .args(["compress", article.to_str().unwrap(), "--level", "50", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Will reduce article to approximately 50% of original length",
        ))
        .stdout(predicate::str::contains("Original Length: 100 words"))
        .stdout(predicate::str::contains("Target Length: 50 words"))
        .stdout(predicate::str::contains("Token Budget: 75"))
        .stdout(predicate::str::contains("expert editor"));
}

#[test]
fn test_dry_run_json() {
    let dir = TempDir::new().unwrap();

    let output = particles_cmd(&dir)
        .args(["compress", "--level", "90", "--dry-run", "--format", "json"])
        .write_stdin(words(100))
        .output()
        .unwrap();

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["level"], 90);
    assert_eq!(plan["target"]["target_word_count"], 10);
    assert_eq!(plan["target"]["token_budget"], 15);
}

#[test]
fn test_dry_run_uses_configured_default_level() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["config", "set", "compression.default_level", "10"])
        .assert()
        .success();

    particles_cmd(&dir)
        .args(["compress", "--dry-run"])
        .write_stdin(words(100))
        .assert()
        .success()
        .stdout(predicate::str::contains("Target Length: 90 words"));
}

#[test]
fn test_invalid_level_rejected() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["compress", "--level", "55", "--dry-run"])
        .write_stdin(words(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("compression level"));
}

#[test]
fn test_oversized_input_rejected() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["config", "set", "compression.max_input_words", "5"])
        .assert()
        .success();

    particles_cmd(&dir)
        .args(["compress", "--dry-run"])
        .write_stdin(words(6))
        .assert()
        .failure()
        .stderr(predicate::str::contains("too long"));
}

#[test]
fn test_missing_api_key() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["compress"])
        .write_stdin(words(20))
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not set"));
}

#[test]
fn test_config_set_get_roundtrip() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["config", "set", "llm.model", "gpt-4o-mini"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set llm.model = gpt-4o-mini"));

    particles_cmd(&dir)
        .args(["config", "get", "llm.model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4o-mini"));

    particles_cmd(&dir)
        .args(["config", "reset"])
        .assert()
        .success();

    particles_cmd(&dir)
        .args(["config", "get", "llm.model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4-turbo-preview"));
}

#[test]
fn test_config_rejects_api_key() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["config", "set", "llm.api_key", "sk-nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("environment variable"));
}

#[test]
fn test_config_path_uses_override() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_list_redacts_key() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .env("PARTICLES_API_KEY", "sk-verysecret9876")
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("llm.api_key = ***9876"))
        .stdout(predicate::str::contains("verysecret").not());
}

#[test]
fn test_doctor_without_key_fails() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .args(["doctor"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("API Key: Not configured"));
}

#[test]
fn test_doctor_with_key_passes() {
    let dir = TempDir::new().unwrap();

    particles_cmd(&dir)
        .env("OPENAI_API_KEY", "sk-test-abcd")
        .args(["doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API Key: Configured (***abcd)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_compress_against_mock_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "gpt-4-turbo-preview", "max_tokens": 120})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&words(80))))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());

    let assert = tokio::task::spawn_blocking(move || {
        let result = particles_cmd(&dir)
            .env("PARTICLES_API_KEY", "sk-test")
            .args(["compress", "--level", "60"])
            .write_stdin(words(200))
            .assert();
        drop(dir);
        result
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Article compressed successfully!"))
        .stdout(predicate::str::contains("Original Length: 200 words"))
        .stdout(predicate::str::contains("Compressed Length: 80 words"))
        .stdout(predicate::str::contains("Actual Reduction: 60%"))
        .stdout(predicate::str::contains("### Compressed Article"))
        .stderr(predicate::str::contains("Compressing article to 40% of original"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_compress_json_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&words(25))))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());

    let output = tokio::task::spawn_blocking(move || {
        particles_cmd(&dir)
            .env("PARTICLES_API_KEY", "sk-test")
            .args(["compress", "--format", "json"])
            .write_stdin(words(100))
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["original_word_count"], 100);
    assert_eq!(outcome["target_word_count"], 50);
    assert_eq!(outcome["compressed_word_count"], 25);
    assert_eq!(outcome["actual_reduction_pct"], 75);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_compress_surfaces_provider_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "The server had an error"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());

    let assert = tokio::task::spawn_blocking(move || {
        particles_cmd(&dir)
            .env("PARTICLES_API_KEY", "sk-test")
            .args(["compress"])
            .write_stdin(words(30))
            .assert()
    })
    .await
    .unwrap();

    assert
        .failure()
        .stdout(predicate::str::contains("Article compressed").not())
        .stderr(predicate::str::contains("Compression failed"))
        .stderr(predicate::str::contains("The server had an error"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quiet_compress_prints_only_the_article() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("short and sweet")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(&dir, &server.uri());

    let assert = tokio::task::spawn_blocking(move || {
        particles_cmd(&dir)
            .env("PARTICLES_API_KEY", "sk-test")
            .args(["compress", "--quiet"])
            .write_stdin(words(40))
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout("short and sweet\n")
        .stderr(predicate::str::contains("INFO").not())
        .stderr(predicate::str::contains("Article compressed").not())
        .stderr(predicate::str::contains("Chat completion successful").not());
}

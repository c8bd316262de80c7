//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coniuga() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("coniuga").unwrap();
    cmd.env_remove("CONIUGA_ANTHROPIC_KEY")
        .env_remove("CONIUGA_OPENAI_KEY")
        .env("RUST_LOG", "off");
    cmd
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("coniuga.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn help_output() {
    coniuga()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Italian verb conjugation trainer"))
        .stdout(predicate::str::contains("quiz"))
        .stdout(predicate::str::contains("learn"));
}

#[test]
fn version_output() {
    coniuga()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("coniuga"));
}

#[test]
fn verbs_lists_builtin_tables() {
    coniuga()
        .arg("verbs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Verbes auxiliaires"))
        .stdout(predicate::str::contains("essere, avere"))
        .stdout(predicate::str::contains("Congiuntivo"))
        .stdout(predicate::str::contains("24 verbs, 4 moods, 10 distinct tenses"));
}

#[test]
fn verbs_with_custom_reference() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("verbs.toml");
    std::fs::write(
        &reference,
        r#"
[[categories]]
name = "Movimento"
verbs = ["andare", "venire"]

[[moods]]
mood = "Indicativo"
tenses = ["Presente", "Futuro semplice"]
"#,
    )
    .unwrap();

    coniuga()
        .arg("verbs")
        .arg("--reference")
        .arg(&reference)
        .assert()
        .success()
        .stdout(predicate::str::contains("Movimento"))
        .stdout(predicate::str::contains("2 verbs, 1 moods, 2 distinct tenses"));
}

#[test]
fn verbs_with_missing_reference() {
    coniuga()
        .arg("verbs")
        .arg("--reference")
        .arg("no_such_file.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("failed to read reference data"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    coniuga()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created coniuga.toml"));

    let written = std::fs::read_to_string(dir.path().join("coniuga.toml")).unwrap();
    assert!(written.contains("[providers.anthropic]"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    coniuga().current_dir(dir.path()).arg("init").assert().success();

    coniuga()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn list_models_without_providers() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "default_provider = \"anthropic\"\n");

    coniuga()
        .arg("list-models")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers configured"));
}

#[test]
fn list_models_for_one_provider() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        r#"
[providers.anthropic]
type = "anthropic"
api_key = "sk-test"

[providers.openai]
type = "openai"
api_key = "sk-test"
"#,
    );

    coniuga()
        .arg("list-models")
        .arg("--provider")
        .arg("openai")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4.1-mini"))
        .stdout(predicate::str::contains("claude").not());
}

#[test]
fn learn_with_missing_config() {
    coniuga()
        .arg("learn")
        .arg("essere")
        .arg("--config")
        .arg("no_such_config.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn quiz_without_configured_provider() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "default_provider = \"anthropic\"\n");

    coniuga()
        .arg("quiz")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn quiz_with_unknown_category() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "[providers.anthropic]\ntype = \"anthropic\"\napi_key = \"k\"\n");

    coniuga()
        .arg("quiz")
        .arg("--category")
        .arg("Nope")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category 'Nope'"));
}

fn ollama_config(dir: &TempDir, server: &MockServer) -> std::path::PathBuf {
    write_config(
        dir,
        &format!(
            r#"
default_provider = "local"
default_model = "llama3.1:8b"

[providers.local]
type = "ollama"
base_url = "{}"
"#,
            server.uri()
        ),
    )
}

fn ollama_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "message": {"role": "assistant", "content": content},
        "model": "llama3.1:8b",
        "prompt_eval_count": 10,
        "eval_count": 10
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn quiz_round_trip_against_local_model() {
    let server = MockServer::start().await;
    let question = r#"{"verb":"avere","mood":"Indicativo","tense":"Presente",
        "translation":"avoir","icon_suggestion":"have",
        "conjugations":[{"person":"io","verb":"ho"},{"person":"tu","verb":"hai"}]}"#;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_reply(question)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = ollama_config(&dir, &server);

    coniuga()
        .arg("quiz")
        .arg("--config")
        .arg(&config)
        .write_stdin("ho\nhai\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("avere (avoir) - Indicativo Presente"))
        .stdout(predicate::str::contains("All correct!"))
        .stdout(predicate::str::contains("Final score: 1 / 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn learn_renders_table_from_local_model() {
    let server = MockServer::start().await;
    let table = r#"{"verb":"essere","translation":"être","icon_suggestion":"be",
        "conjugations":[{"mood":"Indicativo","tenses":[
            {"tense":"Presente","conjugations":[{"person":"io","verb":"sono"},{"person":"tu","verb":"sei"}]},
            {"tense":"Imperfetto","conjugations":[{"person":"io","verb":"ero"},{"person":"tu","verb":"eri"}]}]}]}"#;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_reply(table)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = ollama_config(&dir, &server);

    coniuga()
        .arg("learn")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("essere (être) [be]"))
        .stdout(predicate::str::contains("Imperfetto"))
        .stdout(predicate::str::contains("eri"));
}

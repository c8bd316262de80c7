//! The `coniuga init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("coniuga.toml").exists() {
        println!("coniuga.toml already exists, skipping.");
    } else {
        std::fs::write("coniuga.toml", SAMPLE_CONFIG)?;
        println!("Created coniuga.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export ANTHROPIC_API_KEY (or edit coniuga.toml)");
    println!("  2. Run: coniuga learn essere");
    println!("  3. Run: coniuga quiz --mood Indicativo");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# coniuga configuration

default_provider = "anthropic"
default_model = "claude-sonnet-4-20250514"
temperature = 0.7
max_tokens = 2048
translation_language = "French"

# Optional replacement for the built-in verb/mood/tense tables.
# reference = "verbs.toml"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;

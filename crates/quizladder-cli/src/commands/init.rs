//! The `quizladder init` command.

use std::path::Path;

use anyhow::{Context, Result};

const CONFIG_PATH: &str = "quizladder.toml";
const EXAMPLE_BANK_PATH: &str = "banks/example.toml";

pub fn execute(user: Option<String>) -> Result<()> {
    let config_path = Path::new(CONFIG_PATH);
    let config_exists = config_path.exists();

    match (&user, config_exists) {
        (None, true) => println!("{CONFIG_PATH} already exists, skipping."),
        (None, false) => {
            std::fs::write(config_path, SAMPLE_CONFIG)?;
            println!("Created {CONFIG_PATH}");
        }
        (Some(user), _) => {
            let current = if config_exists {
                std::fs::read_to_string(config_path)
                    .with_context(|| format!("failed to read {CONFIG_PATH}"))?
            } else {
                SAMPLE_CONFIG.to_string()
            };
            std::fs::write(config_path, set_user(&current, user)?)?;
            if config_exists {
                println!("Updated {CONFIG_PATH} (user = {user})");
            } else {
                println!("Created {CONFIG_PATH} (user = {user})");
            }
        }
    }

    std::fs::create_dir_all("banks")?;
    let example_path = Path::new(EXAMPLE_BANK_PATH);
    if example_path.exists() {
        println!("{EXAMPLE_BANK_PATH} already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created {EXAMPLE_BANK_PATH}");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizladder validate --bank {EXAMPLE_BANK_PATH}");
    println!("  2. Run: quizladder play --bank {EXAMPLE_BANK_PATH}");
    println!("  3. Run: quizladder history");

    Ok(())
}

/// Set the top-level `user` key, keeping the rest of the document intact.
fn set_user(config: &str, user: &str) -> Result<String> {
    let mut doc = config
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("failed to parse {CONFIG_PATH}"))?;
    doc["user"] = toml_edit::value(user);
    Ok(doc.to_string())
}

const SAMPLE_CONFIG: &str = r#"# quizladder configuration

default_source = "local"
history_dir = "./quizladder-history"

[sources.local]
type = "file"
path = "banks"

[sources.trivia]
type = "opentdb"
amount = 10
# category = 9
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A small bank to get started"
default_category = "general"

[[questions]]
id = "sky-colour"
prompt = "What colour is a clear daytime sky?"
choices = ["Blue", "Green", "Red"]
answer = "Blue"
tier = "easy"

[[questions]]
id = "week-days"
prompt = "How many days are in a week?"
choices = ["5", "7", "10"]
answer = "7"
tier = "easy"

[[questions]]
id = "capital-jp"
prompt = "What is the capital of Japan?"
choices = ["Kyoto", "Osaka", "Tokyo"]
answer = "Tokyo"
tier = "medium"
category = "geography"

[[questions]]
id = "water-formula"
prompt = "What is the chemical formula of water?"
choices = ["CO2", "H2O", "O2"]
answer = "H2O"
tier = "medium"
category = "science"

[[questions]]
id = "speed-of-light"
prompt = "Roughly how fast does light travel in a vacuum, in km/s?"
choices = ["30,000", "300,000", "3,000,000"]
answer = "300,000"
tier = "hard"
category = "science"
"#;

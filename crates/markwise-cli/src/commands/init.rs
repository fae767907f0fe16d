//! The `markwise init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("markwise.toml").exists() {
        println!("markwise.toml already exists, skipping.");
    } else {
        std::fs::write("markwise.toml", SAMPLE_CONFIG)?;
        println!("Created markwise.toml");
    }

    std::fs::create_dir_all("banks")?;
    let sample_path = Path::new("banks/sample.toml");
    if sample_path.exists() {
        println!("banks/sample.toml already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_BANK)?;
        println!("Created banks/sample.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point markwise.toml at your LanguageTool server (or use the basic checker)");
    println!("  2. Run: markwise validate --bank banks/sample.toml");
    println!("  3. Run: markwise grade --bank banks/sample.toml --answers answers.txt");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# markwise configuration

default_checker = "languagetool"
grammar_timeout_secs = 10
language = "en-US"
output_dir = "./markwise-results"

[checkers.languagetool]
type = "languagetool"
base_url = "http://localhost:8081"
# username = "${LANGUAGETOOL_USERNAME}"
# api_key = "${LANGUAGETOOL_API_KEY}"

[checkers.basic]
type = "basic"
"#;

const SAMPLE_BANK: &str = r#"[bank]
id = "sample"
name = "Operating Systems Sample"
description = "Two starter questions on operating systems"

[[questions]]
id = "Q1"
prompt = "What is an operating system?"
max_marks = 2
references = [
    "An operating system (OS) is system software that manages computer hardware and software resources, providing common services for computer programs.",
    "An OS is software that provides a platform for running applications and managing hardware resources.",
    "The operating system acts as an intermediary between users and the computer hardware, enabling the execution of programs.",
]

[[questions]]
id = "Q2"
prompt = "What are the applications of an operating system?"
max_marks = 8
length_based = true
references = [
    "Applications of an OS include managing hardware resources, providing a user interface, executing applications, and ensuring security and access control.",
    "An OS is responsible for managing resources, facilitating user interaction through the interface, and controlling security and access.",
    "The OS serves to manage computer resources, run applications, and provide security to user data and resources.",
]
"#;

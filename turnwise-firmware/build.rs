//! Build script for turnwise-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates timer.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use turnwise_core::config::TimerConfig;

/// Top level of timer.toml
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TimerFile {
    #[serde(default)]
    timer: TimerConfig,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate timer.toml configuration at compile time
fn validate_config() {
    // Re-run if timer.toml changes
    println!("cargo:rerun-if-changed=timer.toml");

    let config_path = Path::new("timer.toml");

    if !config_path.exists() {
        fail(
            "timer.toml not found!",
            &[
                "The firmware requires a timer.toml configuration file",
                "in the turnwise-firmware directory.",
            ],
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read timer.toml", &[&e.to_string()]),
    };

    // Syntax, unknown keys and value types
    let file: TimerFile = match toml::from_str(&config_content) {
        Ok(file) => file,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid timer.toml", &lines)
        }
    };

    // Same invariants the firmware checks at boot
    if let Err(e) = file.timer.validate() {
        fail("Invalid [timer] configuration", &[&e.to_string()]);
    }

    println!("cargo:warning=timer.toml validated successfully");
}

/// Abort the build with a boxed error message
fn fail(title: &str, details: &[&str]) -> ! {
    let body = details
        .iter()
        .map(|line| {
            // Cut on a char boundary; toml errors may quote non-ASCII input
            let truncated = match line.char_indices().nth(61) {
                Some((end, _)) if line.chars().count() > 64 => format!("{}...", &line[..end]),
                _ => line.to_string(),
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔════════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<58} ║\n\
        ╠════════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚════════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

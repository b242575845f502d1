//! Build script for clicklink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates watch.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Largest dictionary a single push can carry (frame payload minus header)
const APP_MESSAGE_SIZE_MAXIMUM: i64 = 233;

/// Label buffer size in bytes
const MAX_TEXT_LEN: usize = 64;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate watch.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=watch.toml");

    let config_path = Path::new("watch.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: watch.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds watch.toml at build time. Please create     ║\n\
            ║  one in the clicklink-firmware directory.                        ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read watch.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in watch.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_app_message(&config, &mut errors);
    validate_ui(&config, &mut errors);
    validate_vibes(&config, &mut errors);
    validate_link(&config, &mut errors);
    validate_log(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in watch.toml                      ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=watch.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every section and key must be one the firmware reads
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    const KNOWN: &[(&str, &[&str])] = &[
        ("app_message", &["inbox_size", "outbox_size", "ack_timeout_ms"]),
        ("ui", &["initial_text", "screen", "alignment", "text_flow_inset"]),
        ("vibes", &["short_pulse_ms"]),
        ("link", &["baudrate"]),
        ("log", &["level"]),
    ];

    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        let Some((_, keys)) = KNOWN.iter().find(|(known, _)| known == name) else {
            errors.push(format!("Unknown section [{}]", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(|s| s.as_table())
}

/// Check an optional integer key lies in `min..=max`
fn check_range(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => Some(*v),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

/// Check an optional string key is one of `allowed`
fn check_choice(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    allowed: &[&str],
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::String(v)) if allowed.contains(&v.as_str()) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be one of: {}",
            section,
            key,
            allowed.join(", ")
        )),
    }
}

fn validate_app_message(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = section(config, "app_message") else {
        return;
    };

    for key in ["inbox_size", "outbox_size"] {
        if let Some(size) = check_range(table, "app_message", key, 0, u16::MAX as i64, errors) {
            if size > APP_MESSAGE_SIZE_MAXIMUM {
                println!(
                    "cargo:warning=[app_message] {} = {} will be clamped to {}",
                    key, size, APP_MESSAGE_SIZE_MAXIMUM
                );
            }
        }
    }
    check_range(table, "app_message", "ack_timeout_ms", 1, u32::MAX as i64, errors);
}

fn validate_ui(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = section(config, "ui") else {
        return;
    };

    match table.get("initial_text") {
        None => {}
        Some(toml::Value::String(text)) => {
            if text.len() > MAX_TEXT_LEN {
                errors.push(format!(
                    "[ui] initial_text longer than {} bytes",
                    MAX_TEXT_LEN
                ));
            }
            if text.contains('"') || text.contains('\\') {
                errors.push("[ui] initial_text cannot contain quotes or escapes".to_string());
            }
        }
        Some(_) => errors.push("[ui] initial_text must be a string".to_string()),
    }

    check_choice(table, "ui", "screen", &["rect", "round"], errors);
    check_choice(table, "ui", "alignment", &["left", "center", "right"], errors);
    check_range(table, "ui", "text_flow_inset", 0, 31, errors);
}

fn validate_vibes(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(table) = section(config, "vibes") {
        check_range(table, "vibes", "short_pulse_ms", 1, 1000, errors);
    }
}

fn validate_link(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(table) = section(config, "link") {
        check_range(table, "link", "baudrate", 1200, 921_600, errors);
    }
}

fn validate_log(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(table) = section(config, "log") {
        check_choice(
            table,
            "log",
            "level",
            &["error", "warning", "info", "debug", "verbose"],
            errors,
        );
    }
}

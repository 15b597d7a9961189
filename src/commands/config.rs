//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value (tokens are masked)
//! - `config set`: Validate and store one value

use owo_colors::OwoColorize;
use serde_json::json;

use super::print_json;
use crate::config::{BASE_URL_ENV, Config, TOKEN_ENV};
use crate::error::Result;

fn source_note(env_name: &str) -> Option<String> {
    std::env::var(env_name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|_| format!("(from {env_name})"))
}

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;
    let base_url = config.api_base_url().ok().map(|u| u.to_string());
    let token_configured = config.api_token().is_some();

    if json {
        return print_json(&json!({
            "api_base_url": base_url,
            "auth": {
                "token_configured": token_configured,
            },
            "search_debounce_ms": config.search_debounce_ms,
            "request_timeout": config.request_timeout,
            "config_file": Config::config_path().to_string_lossy(),
        }));
    }

    println!("{}\n", "Configuration:".cyan().bold());

    match &base_url {
        Some(url) => println!(
            "{}: {} {}",
            "api_base_url".cyan(),
            url,
            source_note(BASE_URL_ENV).unwrap_or_default().dimmed()
        ),
        None => println!("{}: {}", "api_base_url".cyan(), "not configured".dimmed()),
    }

    let token_status = if token_configured {
        "configured".green().to_string()
    } else {
        "not configured".dimmed().to_string()
    };
    println!(
        "{}: {} {}",
        "auth.token".cyan(),
        token_status,
        source_note(TOKEN_ENV).unwrap_or_default().dimmed()
    );

    println!("{}: {}", "search_debounce_ms".cyan(), config.search_debounce_ms);
    match config.request_timeout {
        Some(seconds) => println!("{}: {}s", "request_timeout".cyan(), seconds),
        None => println!("{}: {}", "request_timeout".cyan(), "client default".dimmed()),
    }

    println!(
        "\n{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    );
    Ok(())
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, json: bool) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;

    if json {
        return print_json(&json!({
            "key": key,
            "value": value,
            "configured": value.is_some(),
            "masked": key == "auth.token" && value.is_some(),
        }));
    }

    match value {
        Some(value) => println!("{value}"),
        None => println!("{}", "not configured".dimmed()),
    }
    Ok(())
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    if json {
        print_json(&json!({
            "action": "config_set",
            "key": key,
            "success": true,
        }))
    } else {
        println!("Set {}", key.cyan());
        Ok(())
    }
}

//! Command handlers for the `floranet` binary.
//!
//! Each handler builds a backend from configuration, drives a controller
//! or the post hub, and prints either a table or JSON.

mod config;
mod posts;
mod records;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use posts::{PostAction, cmd_posts, cmd_posts_list};
pub use records::{
    Listing, ListOptions, cmd_download, cmd_list, cmd_mutate, cmd_search, cmd_show,
};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

use crate::api::HttpBackend;
use crate::config::Config;
use crate::controller::{Feedback, Severity};
use crate::error::{FloranetError, Result};

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Build the HTTP backend from the on-disk configuration
pub fn backend_from_config() -> Result<HttpBackend> {
    let config = Config::load()?;
    HttpBackend::from_config(&config)
}

/// Print a feedback notification. An error notification becomes the
/// command's error so the process exits non-zero.
pub fn report_feedback(feedback: &Feedback, json: bool) -> Result<()> {
    if !feedback.visible {
        return Ok(());
    }

    let success = feedback.severity == Severity::Success;
    if json {
        print_json(&json!({
            "success": success,
            "message": feedback.message,
        }))?;
    } else if success {
        println!("{}", feedback.message.green());
    }

    if success {
        Ok(())
    } else {
        Err(FloranetError::ActionFailed(feedback.message.clone()))
    }
}

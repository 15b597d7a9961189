//! Complaint follow-ups.
//!
//! Newer backend builds return follow-ups as a list of objects. Older ones
//! store them in a single text column where entries are separated by blank
//! lines and each entry may start with a bracketed header:
//!
//! ```text
//! [2024-03-05 14:30 - Jane Doe] Inspected the fence.
//!
//! [Admin]: Contractor booked for Friday.
//! ```
//!
//! Both shapes are accepted here so the rest of the crate only ever sees
//! `Vec<Followup>`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::types::{Followup, RecordId};

static ENTRY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").expect("valid separator regex"));

static ENTRY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\[(?P<head>[^\]\n]+)\]\s*:?\s*(?P<body>.*)$").expect("valid header regex")
});

/// Parse a legacy follow-up text blob into structured entries.
///
/// Ids are assigned 1..n in blob order. Entries without a header keep their
/// whole text as content and carry no author.
pub fn parse_followup_text(blob: &str) -> Vec<Followup> {
    ENTRY_SEPARATOR
        .split(blob.trim())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(index, entry)| parse_entry(index as u64 + 1, entry))
        .collect()
}

fn parse_entry(id: u64, entry: &str) -> Followup {
    let Some(caps) = ENTRY_HEADER.captures(entry) else {
        return Followup {
            id: RecordId::Int(id),
            content: entry.to_string(),
            created_at: None,
            author_name: None,
        };
    };

    let head = caps["head"].trim();
    let (created_at, author) = match head.split_once(" - ") {
        Some((stamp, author)) => (Some(stamp.trim().to_string()), author.trim()),
        None => (None, head),
    };

    Followup {
        id: RecordId::Int(id),
        content: caps["body"].trim().to_string(),
        created_at,
        author_name: (!author.is_empty()).then(|| author.to_string()),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFollowups {
    List(Vec<Followup>),
    Text(String),
}

/// Serde adapter accepting a follow-up list, a legacy text blob, or null.
pub fn deserialize_followups<'de, D>(deserializer: D) -> Result<Vec<Followup>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawFollowups>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawFollowups::List(list)) => list,
        Some(RawFollowups::Text(text)) => parse_followup_text(&text),
        None => Vec::new(),
    })
}

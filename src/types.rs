//! Records as consumed from the Floranet backend.
//!
//! The backend owns the authoritative shape; every optional field here is
//! optional because some endpoint omits it, and projection fills in the
//! display fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::enum_display_fromstr;
use crate::error::FloranetError;
use crate::followups::deserialize_followups;

/// Opaque record identifier: the backend uses integers for most tables and
/// strings for a few.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(u64),
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for RecordId {
    type Err = FloranetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.contains('/') {
            return Err(FloranetError::InvalidRecordId(s.to_string()));
        }
        Ok(RecordId::from(s))
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Int(n)
    }
}

/// Numeric text becomes `Int`, matching how the backend serializes ids.
impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        let s = s.trim();
        s.parse::<u64>()
            .map(RecordId::Int)
            .unwrap_or_else(|_| RecordId::Str(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

enum_display_fromstr!(ComplaintStatus, FloranetError::InvalidStatus, {
    Pending => "pending",
    InProgress => "in_progress",
    Resolved => "resolved",
    Rejected => "rejected",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CctvStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

enum_display_fromstr!(CctvStatus, FloranetError::InvalidStatus, {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Completed => "completed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    #[default]
    Draft,
    Open,
    Closed,
}

enum_display_fromstr!(CollectionStatus, FloranetError::InvalidStatus, {
    Draft => "draft",
    Open => "open",
    Closed => "closed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

enum_display_fromstr!(Priority, FloranetError::InvalidPriority, {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

/// Resident reference embedded in complaints, requests and posts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "unit_number")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Followup {
    pub id: RecordId,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
}

/// A footage attachment on a CCTV request. Stored by the backend; the
/// client only ever sees its storage path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footage {
    pub id: RecordId,
    #[serde(alias = "file_path")]
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ComplaintStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default, deserialize_with = "deserialize_followups")]
    pub followups: Vec<Followup>,
    #[serde(default)]
    pub resident: Option<Resident>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CctvRequest {
    pub id: RecordId,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub incident_date: Option<String>,
    #[serde(default)]
    pub status: CctvStatus,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub footage: Vec<Footage>,
    #[serde(default)]
    pub resident: Option<Resident>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionBatch {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub billing_period: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub collected_amount: Option<f64>,
    #[serde(default)]
    pub status: CollectionStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: RecordId,
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: RecordId,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<Resident>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

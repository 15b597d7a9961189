//! Row projection: backend records mapped to display-ready rows.
//!
//! Projection is a pure function of the record and its expansion flag.
//! Missing optional fields render a fallback string, never an empty cell.

mod format;
mod rows;

pub use format::{format_amount, format_date, format_time, or_fallback};
pub use rows::{
    CctvRow, CommentLine, CollectionRow, ComplaintRow, FollowupLine, FootageLine, PostCard,
};

use serde::Serialize;

use crate::types::RecordId;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_REMARKS: &str = "No remarks";
pub const NO_DESCRIPTION: &str = "No description provided";

/// A record that can be rendered as one display row
pub trait Project {
    type Row;

    fn project(&self, expanded: bool) -> Self::Row;
}

/// Interactive cells a row exposes, each bound to a controller operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum RowAction {
    ToggleExpand,
    ChangeStatus,
    ChangePriority,
    EditRemarks,
    AddFollowup,
    UploadFootage,
    DeleteFootage(RecordId),
}

use serde::Serialize;

use crate::types::{
    CctvRequest, CctvStatus, CollectionBatch, CollectionStatus, CommunityPost, Complaint,
    ComplaintStatus, Priority, RecordId, Resident,
};

use super::format::{format_amount, format_date, format_time, or_fallback};
use super::{NO_DESCRIPTION, NO_REMARKS, NOT_AVAILABLE, Project, RowAction};

fn resident_name(resident: Option<&Resident>) -> String {
    or_fallback(resident.and_then(|r| r.name.as_deref()), NOT_AVAILABLE)
}

fn resident_unit(resident: Option<&Resident>) -> String {
    or_fallback(resident.and_then(|r| r.unit.as_deref()), NOT_AVAILABLE)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowupLine {
    pub author: String,
    pub date: String,
    pub time: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintRow {
    pub id: RecordId,
    pub title: String,
    pub category: String,
    pub resident: String,
    pub unit: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub priority: Priority,
    pub remarks: String,
    pub submitted_date: String,
    pub submitted_time: String,
    pub followup_count: usize,
    pub expanded: bool,
    /// Populated only while expanded
    pub followups: Vec<FollowupLine>,
    pub actions: Vec<RowAction>,
}

impl Project for Complaint {
    type Row = ComplaintRow;

    fn project(&self, expanded: bool) -> ComplaintRow {
        let followups = if expanded {
            self.followups
                .iter()
                .map(|f| FollowupLine {
                    author: or_fallback(f.author_name.as_deref(), NOT_AVAILABLE),
                    date: format_date(f.created_at.as_deref()),
                    time: format_time(f.created_at.as_deref()),
                    content: or_fallback(Some(&f.content), NO_DESCRIPTION),
                })
                .collect()
        } else {
            Vec::new()
        };

        ComplaintRow {
            id: self.id.clone(),
            title: or_fallback(self.title.as_deref(), NOT_AVAILABLE),
            category: or_fallback(self.category.as_deref(), NOT_AVAILABLE),
            resident: resident_name(self.resident.as_ref()),
            unit: resident_unit(self.resident.as_ref()),
            description: or_fallback(self.description.as_deref(), NO_DESCRIPTION),
            status: self.status,
            priority: self.priority,
            remarks: or_fallback(self.remarks.as_deref(), NO_REMARKS),
            submitted_date: format_date(self.created_at.as_deref()),
            submitted_time: format_time(self.created_at.as_deref()),
            followup_count: self.followups.len(),
            expanded,
            followups,
            actions: vec![
                RowAction::ToggleExpand,
                RowAction::ChangeStatus,
                RowAction::ChangePriority,
                RowAction::EditRemarks,
                RowAction::AddFollowup,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FootageLine {
    pub id: RecordId,
    pub description: String,
    pub path: String,
    pub uploaded: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CctvRow {
    pub id: RecordId,
    pub resident: String,
    pub unit: String,
    pub location: String,
    pub incident_date: String,
    pub incident_time: String,
    pub reason: String,
    pub status: CctvStatus,
    pub remarks: String,
    pub footage_count: usize,
    pub expanded: bool,
    /// Populated only while expanded
    pub footage: Vec<FootageLine>,
    pub actions: Vec<RowAction>,
}

impl Project for CctvRequest {
    type Row = CctvRow;

    fn project(&self, expanded: bool) -> CctvRow {
        let mut actions = vec![
            RowAction::ToggleExpand,
            RowAction::ChangeStatus,
            RowAction::EditRemarks,
            RowAction::UploadFootage,
        ];

        let footage = if expanded {
            actions.extend(
                self.footage
                    .iter()
                    .map(|f| RowAction::DeleteFootage(f.id.clone())),
            );
            self.footage
                .iter()
                .map(|f| FootageLine {
                    id: f.id.clone(),
                    description: or_fallback(f.description.as_deref(), NO_DESCRIPTION),
                    path: f.path.clone(),
                    uploaded: format_date(f.created_at.as_deref()),
                })
                .collect()
        } else {
            Vec::new()
        };

        CctvRow {
            id: self.id.clone(),
            resident: resident_name(self.resident.as_ref()),
            unit: resident_unit(self.resident.as_ref()),
            location: or_fallback(self.location.as_deref(), NOT_AVAILABLE),
            incident_date: format_date(self.incident_date.as_deref()),
            incident_time: format_time(self.incident_date.as_deref()),
            reason: or_fallback(self.reason.as_deref(), NO_DESCRIPTION),
            status: self.status,
            remarks: or_fallback(self.remarks.as_deref(), NO_REMARKS),
            footage_count: self.footage.len(),
            expanded,
            footage,
            actions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionRow {
    pub id: RecordId,
    pub title: String,
    pub billing_period: String,
    pub total_amount: String,
    pub collected_amount: String,
    pub status: CollectionStatus,
    pub created_date: String,
    pub actions: Vec<RowAction>,
}

impl Project for CollectionBatch {
    type Row = CollectionRow;

    fn project(&self, _expanded: bool) -> CollectionRow {
        CollectionRow {
            id: self.id.clone(),
            title: or_fallback(self.title.as_deref(), NOT_AVAILABLE),
            billing_period: or_fallback(self.billing_period.as_deref(), NOT_AVAILABLE),
            total_amount: format_amount(self.total_amount),
            collected_amount: format_amount(self.collected_amount),
            status: self.status,
            created_date: format_date(self.created_at.as_deref()),
            actions: vec![RowAction::ChangeStatus],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentLine {
    pub author: String,
    pub content: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    pub id: RecordId,
    pub author: String,
    pub unit: String,
    pub content: String,
    pub image_path: Option<String>,
    pub likes: u64,
    pub liked: bool,
    pub comment_count: usize,
    /// Populated only while expanded
    pub comments: Vec<CommentLine>,
    pub posted_date: String,
    pub posted_time: String,
    pub archived: bool,
}

impl Project for CommunityPost {
    type Row = PostCard;

    fn project(&self, expanded: bool) -> PostCard {
        let comments = if expanded {
            self.comments
                .iter()
                .map(|c| CommentLine {
                    author: or_fallback(c.author_name.as_deref(), NOT_AVAILABLE),
                    content: c.content.clone(),
                    date: format_date(c.created_at.as_deref()),
                })
                .collect()
        } else {
            Vec::new()
        };

        PostCard {
            id: self.id.clone(),
            author: resident_name(self.author.as_ref()),
            unit: resident_unit(self.author.as_ref()),
            content: self.content.clone(),
            image_path: self.image_path.clone().filter(|p| !p.trim().is_empty()),
            likes: self.likes_count,
            liked: self.liked,
            comment_count: self.comments.len(),
            comments,
            posted_date: format_date(self.created_at.as_deref()),
            posted_time: format_time(self.created_at.as_deref()),
            archived: self.archived,
        }
    }
}

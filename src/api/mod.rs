//! Floranet backend boundary.
//!
//! The REST backend owns persistence, authorization and file storage. This
//! module defines what the client needs from it ([`ResourceBackend`],
//! [`CommunityBackend`]), the mutations rows can request, and the HTTP
//! adapter that normalizes the backend's envelopes.

pub mod community;
pub mod error;
pub mod http;
pub mod page;

use std::fmt;
use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{FloranetError, Result};
use crate::types::{Comment, CommunityPost, Followup, Priority, RecordId};

pub use error::ApiError;
pub use http::HttpBackend;
pub use page::{
    ApiResponse, EnvelopeShape, Page, PageNav, PageWindow, parse_list_envelope,
    parse_record_envelope,
};

/// How a successful mutation is reconciled with the in-memory row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Merge only the field the endpoint returns
    FieldPatch,
    /// Re-request the record and replace the row
    FullRefetch,
}

/// A file to attach to a record through the multipart footage endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct FootageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub description: Option<String>,
}

impl fmt::Debug for FootageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FootageUpload")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .field("description", &self.description)
            .finish()
    }
}

/// A row-level action sent to the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<R: Resource> {
    Status(R::Status),
    Priority(Priority),
    Remarks(String),
    AppendFollowup(String),
    UploadFootage(FootageUpload),
    DeleteFootage(RecordId),
}

impl<R: Resource> Mutation<R> {
    /// Short name used in logs and feedback text
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Status(_) => "status",
            Mutation::Priority(_) => "priority",
            Mutation::Remarks(_) => "remarks",
            Mutation::AppendFollowup(_) => "follow-up",
            Mutation::UploadFootage(_) => "footage upload",
            Mutation::DeleteFootage(_) => "footage deletion",
        }
    }

    /// Collection fields mutated through a side channel are always
    /// refetched; scalar fields are patched.
    pub fn strategy(&self) -> MergeStrategy {
        match self {
            Mutation::Status(_)
            | Mutation::Priority(_)
            | Mutation::Remarks(_)
            | Mutation::AppendFollowup(_) => MergeStrategy::FieldPatch,
            Mutation::UploadFootage(_) | Mutation::DeleteFootage(_) => MergeStrategy::FullRefetch,
        }
    }

    /// Reject mutations that cannot succeed before any network call.
    pub fn validate(&self) -> Result<()> {
        if !R::accepts(self) {
            return Err(FloranetError::UnsupportedMutation {
                resource: R::NAME,
                mutation: self.kind(),
            });
        }

        match self {
            Mutation::AppendFollowup(content) if content.trim().is_empty() => Err(
                FloranetError::Validation("Follow-up content cannot be empty".to_string()),
            ),
            Mutation::UploadFootage(upload) if upload.bytes.is_empty() => Err(
                FloranetError::Validation("Please choose a footage file to upload".to_string()),
            ),
            Mutation::UploadFootage(upload) if upload.file_name.trim().is_empty() => Err(
                FloranetError::Validation("Footage file name cannot be empty".to_string()),
            ),
            _ => Ok(()),
        }
    }

    pub fn success_message(&self) -> String {
        match self {
            Mutation::Status(status) => format!("Status updated to {}", status),
            Mutation::Priority(priority) => format!("Priority updated to {}", priority),
            Mutation::Remarks(_) => "Remarks saved".to_string(),
            Mutation::AppendFollowup(_) => "Follow-up added".to_string(),
            Mutation::UploadFootage(_) => "Footage uploaded".to_string(),
            Mutation::DeleteFootage(_) => "Footage deleted".to_string(),
        }
    }
}

/// Field values returned by a field-patch endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPatch<R: Resource> {
    Status(R::Status),
    Priority(Priority),
    Remarks(Option<String>),
    Followups(Vec<Followup>),
}

impl<R: Resource> RecordPatch<R> {
    pub fn field(&self) -> &'static str {
        match self {
            RecordPatch::Status(_) => "status",
            RecordPatch::Priority(_) => "priority",
            RecordPatch::Remarks(_) => "remarks",
            RecordPatch::Followups(_) => "followups",
        }
    }

    /// Error for a patch the record type has no field for
    pub fn unsupported(&self) -> FloranetError {
        FloranetError::UnsupportedMutation {
            resource: R::NAME,
            mutation: self.field(),
        }
    }
}

/// A backend-owned record type served under its own REST path.
pub trait Resource: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    type Status: Copy
        + fmt::Debug
        + fmt::Display
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Send
        + Sync;

    /// Human-readable singular name
    const NAME: &'static str;
    /// Path segment under the API root, e.g. `complaints`
    const PATH: &'static str;
    /// Envelope the list endpoint answers with
    const ENVELOPE: EnvelopeShape;

    fn id(&self) -> &RecordId;

    /// Whether this record type has an endpoint for the mutation
    fn accepts(mutation: &Mutation<Self>) -> bool;

    /// Merge a returned field into this record
    fn apply_patch(&mut self, patch: RecordPatch<Self>) -> Result<()>;
}

/// Paginated list, single-record and mutation endpoints for one resource
pub trait ResourceBackend<R: Resource>: Send + Sync {
    /// Fetch one page of records matching the query
    fn fetch_page(
        &self,
        query: &crate::controller::ListQuery,
    ) -> impl Future<Output = Result<Page<R>>> + Send;

    /// Fetch a single record by id
    fn fetch_record(&self, id: &RecordId) -> impl Future<Output = Result<R>> + Send;

    /// Send a mutation. Field-patch endpoints return the updated field when
    /// the response carried it; side-channel endpoints return `None`.
    fn mutate(
        &self,
        id: &RecordId,
        mutation: &Mutation<R>,
    ) -> impl Future<Output = Result<Option<RecordPatch<R>>>> + Send;
}

/// Community post endpoints, all using the `{ success, data }` envelope
pub trait CommunityBackend: Send + Sync {
    fn list_posts(&self, archived: bool)
    -> impl Future<Output = Result<Vec<CommunityPost>>> + Send;

    fn create_post(&self, content: &str) -> impl Future<Output = Result<CommunityPost>> + Send;

    fn delete_post(&self, id: &RecordId) -> impl Future<Output = Result<()>> + Send;

    /// Toggle the admin's like; returns the post with updated counters
    fn like_post(&self, id: &RecordId) -> impl Future<Output = Result<CommunityPost>> + Send;

    fn comment_on_post(
        &self,
        id: &RecordId,
        content: &str,
    ) -> impl Future<Output = Result<Comment>> + Send;

    fn archive_post(&self, id: &RecordId) -> impl Future<Output = Result<()>> + Send;

    fn unarchive_post(&self, id: &RecordId) -> impl Future<Output = Result<()>> + Send;
}

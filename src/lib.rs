mod macros;

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod followups;
pub mod pages;
pub mod projection;
pub mod types;

pub use api::{
    CommunityBackend, FootageUpload, HttpBackend, MergeStrategy, Mutation, Page, PageNav,
    RecordPatch, Resource, ResourceBackend,
};
pub use config::Config;
pub use controller::{
    Feedback, FetchOutcome, FilteredListController, ListQuery, MutationOutcome, Severity,
};
pub use error::{FloranetError, Result};
pub use pages::{CctvController, CollectionsController, ComplaintsController, PostHub};
pub use types::{
    CctvRequest, CctvStatus, CollectionBatch, CollectionStatus, Comment, CommunityPost,
    Complaint, ComplaintStatus, Followup, Footage, Priority, RecordId, Resident,
};

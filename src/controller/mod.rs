//! The Filtered List Controller.
//!
//! One controller per list page: it owns the query state, runs the fetch
//! cycle against a [`ResourceBackend`](crate::api::ResourceBackend),
//! reconciles row-level mutations and carries the expansion set and the
//! single feedback slot. Data flows one way: input updates the query, the
//! query drives a fetch, and the fetched page is projected into rows.

mod debounce;
mod expansion;
mod feedback;
mod list;
mod query;

pub use debounce::{DEFAULT_SEARCH_DEBOUNCE, Debounced, debounce_channel, drive_search};
pub use expansion::ExpandedRowSet;
pub use feedback::{Feedback, Severity};
pub use list::{FetchOutcome, FetchTicket, FilteredListController, MutationOutcome};
pub use query::ListQuery;

use std::marker::PhantomData;

use crate::api::{MergeStrategy, Mutation, Page, PageNav, RecordPatch, Resource, ResourceBackend};
use crate::error::Result;
use crate::projection::Project;
use crate::types::RecordId;

use super::expansion::ExpandedRowSet;
use super::feedback::Feedback;
use super::query::ListQuery;

/// Handle for an issued list request.
///
/// Carries the generation it was issued under; only the most recent
/// generation's result is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: ListQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

/// Result of a list fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was replaced
    Applied,
    /// A newer request was issued before this one completed
    Stale,
    /// The request failed; the page is cleared and error feedback raised
    Failed,
    /// The query was already issued
    Skipped,
}

/// Result of a row-level mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The returned field was merged into the row
    Patched,
    /// The record was refetched and the row replaced
    Refetched,
    /// Rejected before any network call
    Rejected,
    /// The backend call (or the follow-up refetch) failed
    Failed,
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Patched | MutationOutcome::Refetched)
    }
}

/// Query state, fetch cycle, row mutation, expansion and feedback for one
/// paginated list of `R` served by `B`.
pub struct FilteredListController<R: Resource, B: ResourceBackend<R>> {
    backend: B,
    query: ListQuery,
    page: Option<Page<R>>,
    expanded: ExpandedRowSet,
    feedback: Feedback,
    loading: bool,
    last_error: Option<String>,
    generation: u64,
    issued: Option<ListQuery>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, B: ResourceBackend<R>> FilteredListController<R, B> {
    pub fn new(backend: B) -> Self {
        Self::with_query(backend, ListQuery::default())
    }

    pub fn with_query(backend: B, query: ListQuery) -> Self {
        Self {
            backend,
            query,
            page: None,
            expanded: ExpandedRowSet::default(),
            feedback: Feedback::default(),
            loading: false,
            last_error: None,
            generation: 0,
            issued: None,
            _resource: PhantomData,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Direct access to the query for drivers that use
    /// [`begin_fetch`](Self::begin_fetch) themselves.
    pub fn query_mut(&mut self) -> &mut ListQuery {
        &mut self.query
    }

    pub fn page(&self) -> Option<&Page<R>> {
        self.page.as_ref()
    }

    pub fn items(&self) -> &[R] {
        self.page.as_ref().map(|p| p.items.as_slice()).unwrap_or(&[])
    }

    pub fn record(&self, id: &RecordId) -> Option<&R> {
        self.items().iter().find(|r| r.id() == id)
    }

    pub fn page_nav(&self) -> Option<PageNav> {
        self.page.as_ref().map(Page::nav)
    }

    pub fn expanded(&self) -> &ExpandedRowSet {
        &self.expanded
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_feedback(&mut self) {
        self.feedback.dismiss();
    }

    pub async fn set_search_text(&mut self, text: impl Into<String>) -> FetchOutcome {
        self.query.set_search_text(text);
        self.fetch_list().await
    }

    pub async fn set_filter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> FetchOutcome {
        self.query.set_filter(name, value);
        self.fetch_list().await
    }

    pub async fn clear_filter(&mut self, name: &str) -> FetchOutcome {
        self.query.clear_filter(name);
        self.fetch_list().await
    }

    /// Move to page `n`. Out-of-range pages are not rejected here; the
    /// backend answers them with an empty page.
    pub async fn set_page(&mut self, page: u32) -> FetchOutcome {
        self.query.set_page(page);
        self.fetch_list().await
    }

    /// Fetch the page for the current query, once per distinct query value.
    pub async fn fetch_list(&mut self) -> FetchOutcome {
        let Some(ticket) = self.begin_fetch() else {
            return FetchOutcome::Skipped;
        };
        let result = self.backend.fetch_page(ticket.query()).await;
        self.complete_fetch(ticket, result)
    }

    /// Fetch again even if the query has not changed.
    pub async fn refresh(&mut self) -> FetchOutcome {
        self.issued = None;
        self.fetch_list().await
    }

    /// Issue a request for the current query, or `None` if that query is
    /// already in flight or applied.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.issued.as_ref() == Some(&self.query) {
            tracing::debug!(resource = R::NAME, "query unchanged, skipping fetch");
            return None;
        }

        self.generation += 1;
        self.issued = Some(self.query.clone());
        self.loading = true;
        tracing::debug!(
            resource = R::NAME,
            generation = self.generation,
            page = self.query.page(),
            "fetching list"
        );

        Some(FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// Apply a fetch result if its ticket is still the latest.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Page<R>>) -> FetchOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                resource = R::NAME,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale list result"
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                tracing::debug!(
                    resource = R::NAME,
                    items = page.items.len(),
                    total = page.total,
                    "list applied"
                );
                self.page = Some(page);
                self.last_error = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                let message = e.feedback_message();
                tracing::warn!(resource = R::NAME, error = %e, "list fetch failed");
                self.page = None;
                self.issued = None;
                self.feedback = Feedback::error(message.clone());
                self.last_error = Some(message);
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch one record without touching list state.
    pub async fn fetch_record(&self, id: &RecordId) -> Result<R> {
        self.backend.fetch_record(id).await
    }

    /// Validate, send, then reconcile one row-level mutation.
    ///
    /// Errors never escape: they become error feedback and the row is left
    /// unchanged.
    pub async fn apply_row_mutation(&mut self, id: &RecordId, mutation: Mutation<R>) -> MutationOutcome {
        if let Err(e) = mutation.validate() {
            tracing::debug!(resource = R::NAME, %id, error = %e, "mutation rejected");
            self.feedback = Feedback::error(e.feedback_message());
            return MutationOutcome::Rejected;
        }

        tracing::debug!(resource = R::NAME, %id, mutation = mutation.kind(), "sending mutation");
        let patch = match self.backend.mutate(id, &mutation).await {
            Ok(patch) => patch,
            Err(e) => {
                tracing::warn!(resource = R::NAME, %id, mutation = mutation.kind(), error = %e, "mutation failed");
                self.feedback = Feedback::error(e.feedback_message());
                return MutationOutcome::Failed;
            }
        };

        let merged = match (mutation.strategy(), patch) {
            (MergeStrategy::FieldPatch, Some(patch)) => match self.patch_row(id, patch) {
                Ok(()) => Ok(MutationOutcome::Patched),
                Err(e) => {
                    tracing::debug!(resource = R::NAME, %id, error = %e, "patch not applicable, refetching");
                    self.refetch_row(id).await.map(|_| MutationOutcome::Refetched)
                }
            },
            (MergeStrategy::FieldPatch, None) => {
                tracing::debug!(resource = R::NAME, %id, "response carried no field, refetching");
                self.refetch_row(id).await.map(|_| MutationOutcome::Refetched)
            }
            (MergeStrategy::FullRefetch, _) => {
                self.refetch_row(id).await.map(|_| MutationOutcome::Refetched)
            }
        };

        match merged {
            Ok(outcome) => {
                self.feedback = Feedback::success(mutation.success_message());
                outcome
            }
            Err(e) => {
                tracing::warn!(resource = R::NAME, %id, error = %e, "refetch after mutation failed");
                self.feedback = Feedback::error(e.feedback_message());
                MutationOutcome::Failed
            }
        }
    }

    fn patch_row(&mut self, id: &RecordId, patch: RecordPatch<R>) -> Result<()> {
        match self.row_mut(id) {
            Some(row) => row.apply_patch(patch),
            None => Ok(()),
        }
    }

    async fn refetch_row(&mut self, id: &RecordId) -> Result<R> {
        let record = self.backend.fetch_record(id).await?;
        if let Some(row) = self.row_mut(id) {
            *row = record.clone();
        }
        Ok(record)
    }

    fn row_mut(&mut self, id: &RecordId) -> Option<&mut R> {
        self.page
            .as_mut()
            .and_then(|p| p.items.iter_mut().find(|r| r.id() == id))
    }

    /// Flip a row's detail panel. Returns whether it is now expanded.
    pub fn toggle_expand(&mut self, id: &RecordId) -> bool {
        self.expanded.toggle(id)
    }

    pub fn is_expanded(&self, id: &RecordId) -> bool {
        self.expanded.is_expanded(id)
    }

    /// Display rows for the current page
    pub fn rows(&self) -> Vec<R::Row>
    where
        R: Project,
    {
        self.items()
            .iter()
            .map(|record| record.project(self.expanded.is_expanded(record.id())))
            .collect()
    }
}

impl<R: Resource, B: ResourceBackend<R>> std::fmt::Debug for FilteredListController<R, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredListController")
            .field("resource", &R::NAME)
            .field("query", &self.query)
            .field("items", &self.items().len())
            .field("loading", &self.loading)
            .field("generation", &self.generation)
            .finish()
    }
}


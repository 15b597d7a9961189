use crate::api::{EnvelopeShape, Mutation, RecordPatch, Resource};
use crate::controller::FilteredListController;
use crate::error::Result;
use crate::types::{CollectionBatch, CollectionStatus, RecordId};

/// Filters offered by the collections page
pub const FILTERS: &[&str] = &["status"];

pub type CollectionsController<B> = FilteredListController<CollectionBatch, B>;

impl Resource for CollectionBatch {
    type Status = CollectionStatus;

    const NAME: &'static str = "collection batch";
    const PATH: &'static str = "collections";
    const ENVELOPE: EnvelopeShape = EnvelopeShape::Flat;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn accepts(mutation: &Mutation<Self>) -> bool {
        matches!(mutation, Mutation::Status(_))
    }

    fn apply_patch(&mut self, patch: RecordPatch<Self>) -> Result<()> {
        match patch {
            RecordPatch::Status(status) => self.status = status,
            other => return Err(other.unsupported()),
        }
        Ok(())
    }
}

use crate::api::{EnvelopeShape, Mutation, RecordPatch, Resource};
use crate::controller::FilteredListController;
use crate::error::Result;
use crate::types::{Complaint, ComplaintStatus, RecordId};

/// Filters offered by the complaints page
pub const FILTERS: &[&str] = &["status", "priority", "category"];

pub type ComplaintsController<B> = FilteredListController<Complaint, B>;

impl Resource for Complaint {
    type Status = ComplaintStatus;

    const NAME: &'static str = "complaint";
    const PATH: &'static str = "complaints";
    const ENVELOPE: EnvelopeShape = EnvelopeShape::Meta;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn accepts(mutation: &Mutation<Self>) -> bool {
        !matches!(
            mutation,
            Mutation::UploadFootage(_) | Mutation::DeleteFootage(_)
        )
    }

    fn apply_patch(&mut self, patch: RecordPatch<Self>) -> Result<()> {
        match patch {
            RecordPatch::Status(status) => self.status = status,
            RecordPatch::Priority(priority) => self.priority = priority,
            RecordPatch::Remarks(remarks) => self.remarks = remarks,
            RecordPatch::Followups(followups) => self.followups = followups,
        }
        Ok(())
    }
}

use crate::api::{EnvelopeShape, Mutation, RecordPatch, Resource};
use crate::controller::FilteredListController;
use crate::error::Result;
use crate::types::{CctvRequest, CctvStatus, RecordId};

/// Filters offered by the CCTV requests page
pub const FILTERS: &[&str] = &["status", "location"];

pub type CctvController<B> = FilteredListController<CctvRequest, B>;

impl Resource for CctvRequest {
    type Status = CctvStatus;

    const NAME: &'static str = "CCTV request";
    const PATH: &'static str = "cctv-requests";
    const ENVELOPE: EnvelopeShape = EnvelopeShape::Meta;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn accepts(mutation: &Mutation<Self>) -> bool {
        matches!(
            mutation,
            Mutation::Status(_)
                | Mutation::Remarks(_)
                | Mutation::UploadFootage(_)
                | Mutation::DeleteFootage(_)
        )
    }

    fn apply_patch(&mut self, patch: RecordPatch<Self>) -> Result<()> {
        match patch {
            RecordPatch::Status(status) => self.status = status,
            RecordPatch::Remarks(remarks) => self.remarks = remarks,
            other => return Err(other.unsupported()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;

    #[test]
    fn test_rejects_complaint_only_patches() {
        let mut request: CctvRequest = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        let err = request
            .apply_patch(RecordPatch::Priority(Priority::High))
            .unwrap_err();
        assert_eq!(err.to_string(), "CCTV request does not support priority");

        request
            .apply_patch(RecordPatch::Remarks(Some("Reviewed".to_string())))
            .unwrap();
        assert_eq!(request.remarks.as_deref(), Some("Reviewed"));
    }

    #[test]
    fn test_accepts() {
        assert!(CctvRequest::accepts(&Mutation::DeleteFootage(RecordId::Int(3))));
        assert!(!CctvRequest::accepts(&Mutation::AppendFollowup("x".to_string())));
    }
}

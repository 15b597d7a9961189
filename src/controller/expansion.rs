use std::collections::HashSet;

use crate::types::RecordId;

/// Ids of rows whose detail panel is open. Purely presentational; never
/// sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRowSet {
    ids: HashSet<RecordId>,
}

impl ExpandedRowSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id's membership. Returns whether it is now expanded.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    pub fn is_expanded(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

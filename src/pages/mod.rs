//! Per-page instantiations of the list controller and the community post
//! hub.

pub mod cctv;
pub mod collections;
pub mod community;
pub mod complaints;

pub use cctv::CctvController;
pub use collections::CollectionsController;
pub use community::PostHub;
pub use complaints::ComplaintsController;

use crate::error::{FloranetError, Result};

/// Reject a filter name the page does not offer.
pub fn check_filter(allowed: &[&str], name: &str) -> Result<()> {
    if allowed.contains(&name) {
        Ok(())
    } else {
        Err(FloranetError::Validation(format!(
            "unknown filter '{}', expected one of: {}",
            name,
            allowed.join(", ")
        )))
    }
}

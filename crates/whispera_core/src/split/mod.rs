//! Split-plan computation for oversized media files.
//!
//! Pure functions deriving how many chunks to carve from a file and how
//! long each chunk should be, given the upload size ceiling.

mod plan;

pub use plan::{compute_plan, ChunkSpan, SplitPlan};

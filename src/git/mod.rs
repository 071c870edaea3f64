use crate::error::Result;
use crate::model::DiffRecord;

pub mod repo;

pub use repo::GitRepo;

/// Supplies per-commit diff records, so the aggregation pass can be
/// driven by canned data in tests as well as by the real git tool.
pub trait DiffSource {
    fn diffs_for(&self, commit_id: &str) -> Result<Vec<DiffRecord>>;
}

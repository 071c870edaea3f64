use serde::{Deserialize, Serialize};

/// One non-merge commit as reported by the log source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    pub author: String,
}

/// Per-file line counts for one file changed within a commit.
///
/// `None` models the `-` marker git prints for files it cannot diff
/// (binary content); such a record carries no line magnitude but still
/// counts as a changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub added: Option<u32>,
    pub deleted: Option<u32>,
    pub path: String,
}

impl DiffRecord {
    pub fn is_binary(&self) -> bool {
        self.added.is_none() || self.deleted.is_none()
    }
}

/// Running totals for a single author, keyed by exact name match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorStats {
    pub commits: u32,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: u32,
}

impl AuthorStats {
    pub fn new() -> Self {
        Self {
            commits: 0,
            lines_added: 0,
            lines_deleted: 0,
            files_changed: 0,
        }
    }

    /// Fold one diff record in. Unparsable counts are zero magnitude;
    /// the record still counts as a changed file.
    pub fn add_diff(&mut self, diff: &DiffRecord) {
        self.lines_added += u64::from(diff.added.unwrap_or(0));
        self.lines_deleted += u64::from(diff.deleted.unwrap_or(0));
        self.files_changed += 1;
    }

    pub fn total_changed_lines(&self) -> u64 {
        self.lines_added + self.lines_deleted
    }
}

impl Default for AuthorStats {
    fn default() -> Self {
        Self::new()
    }
}

/// One ranked row of the final summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadEntry {
    pub author: String,
    pub commits: u32,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub files_changed: u32,
    pub total_changed_lines: u64,
}

impl WorkloadEntry {
    pub fn from_stats(author: String, stats: &AuthorStats) -> Self {
        Self {
            author,
            commits: stats.commits,
            lines_added: stats.lines_added,
            lines_deleted: stats.lines_deleted,
            files_changed: stats.files_changed,
            total_changed_lines: stats.total_changed_lines(),
        }
    }
}

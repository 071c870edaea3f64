use crate::cli::OutputFormat;
use crate::error::Result;
use crate::git::{DiffSource, GitRepo};
use crate::model::{AuthorStats, CommitRecord, WorkloadEntry};
use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub fn exec(days: Option<u32>, format: OutputFormat, repo: Option<PathBuf>) -> anyhow::Result<()> {
    let repo = GitRepo::open(repo.as_ref()).context("Failed to open git repository")?;

    let commits = repo.list_commits(days).context("Failed to list commits")?;

    if commits.is_empty() {
        println!("No commit history found.");
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("Collecting diff stats for {} commits...", commits.len()));

    let stats = accumulate(&commits, &repo).context("Failed to aggregate commit statistics")?;
    pb.finish_and_clear();

    let entries = rank(stats);

    match format {
        OutputFormat::Json => output_json(&entries)?,
        OutputFormat::Table => output_table(&entries),
    }

    Ok(())
}

/// Fold commits and their per-file diff records into per-author
/// running totals. One `diffs_for` lookup per commit, in order; the
/// first failed lookup aborts the pass with no partial result.
pub fn accumulate<S: DiffSource>(
    commits: &[CommitRecord],
    source: &S,
) -> Result<HashMap<String, AuthorStats>> {
    let mut stats: HashMap<String, AuthorStats> = HashMap::new();

    for commit in commits {
        let entry = stats
            .entry(commit.author.clone())
            .or_insert_with(AuthorStats::new);
        entry.commits += 1;

        for diff in source.diffs_for(&commit.id)? {
            entry.add_diff(&diff);
        }
    }

    Ok(stats)
}

/// Rank authors by total changed lines, descending. Ties break on the
/// author name so the ordering never depends on map iteration order.
pub fn rank(stats: HashMap<String, AuthorStats>) -> Vec<WorkloadEntry> {
    let mut entries: Vec<WorkloadEntry> = stats
        .into_iter()
        .map(|(author, stats)| WorkloadEntry::from_stats(author, &stats))
        .collect();
    entries.sort_by(|a, b| {
        b.total_changed_lines
            .cmp(&a.total_changed_lines)
            .then_with(|| a.author.cmp(&b.author))
    });
    entries
}

fn output_json(entries: &[WorkloadEntry]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}

fn output_table(entries: &[WorkloadEntry]) {
    println!(
        "{:<30} {:>8} {:>12} {:>14} {:>14} {:>20}",
        style("Committer").bold(),
        style("Commits").bold(),
        style("Lines added").bold(),
        style("Lines deleted").bold(),
        style("Files changed").bold(),
        style("Total changed lines").bold()
    );
    println!("{}", "─".repeat(103));
    for e in entries {
        println!(
            "{:<30} {:>8} {:>12} {:>14} {:>14} {:>20}",
            e.author, e.commits, e.lines_added, e.lines_deleted, e.files_changed, e.total_changed_lines
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;
    use crate::model::DiffRecord;
    use pretty_assertions::assert_eq;

    struct StubSource {
        diffs: HashMap<String, Vec<DiffRecord>>,
    }

    impl StubSource {
        fn new(diffs: &[(&str, Vec<DiffRecord>)]) -> Self {
            Self {
                diffs: diffs
                    .iter()
                    .map(|(id, recs)| (id.to_string(), recs.clone()))
                    .collect(),
            }
        }
    }

    impl DiffSource for StubSource {
        fn diffs_for(&self, commit_id: &str) -> Result<Vec<DiffRecord>> {
            self.diffs
                .get(commit_id)
                .cloned()
                .ok_or_else(|| TallyError::Parse(format!("unknown commit {commit_id}")))
        }
    }

    fn commit(id: &str, author: &str) -> CommitRecord {
        CommitRecord {
            id: id.to_string(),
            author: author.to_string(),
        }
    }

    fn numeric(added: u32, deleted: u32, path: &str) -> DiffRecord {
        DiffRecord {
            added: Some(added),
            deleted: Some(deleted),
            path: path.to_string(),
        }
    }

    fn binary(path: &str) -> DiffRecord {
        DiffRecord {
            added: None,
            deleted: None,
            path: path.to_string(),
        }
    }

    #[test]
    fn accumulates_per_author_totals() {
        let commits = vec![commit("h1", "Alice"), commit("h2", "Bob"), commit("h3", "Alice")];
        let source = StubSource::new(&[
            ("h1", vec![numeric(10, 2, "a.py")]),
            ("h2", vec![binary("img.png")]),
            ("h3", vec![numeric(5, 0, "b.py")]),
        ]);

        let stats = accumulate(&commits, &source).unwrap();

        let alice = &stats["Alice"];
        assert_eq!(alice.commits, 2);
        assert_eq!(alice.lines_added, 15);
        assert_eq!(alice.lines_deleted, 2);
        assert_eq!(alice.files_changed, 2);
        assert_eq!(alice.total_changed_lines(), 17);

        let bob = &stats["Bob"];
        assert_eq!(bob.commits, 1);
        assert_eq!(bob.lines_added, 0);
        assert_eq!(bob.lines_deleted, 0);
        assert_eq!(bob.files_changed, 1);
        assert_eq!(bob.total_changed_lines(), 0);

        let ranked = rank(stats);
        assert_eq!(ranked[0].author, "Alice");
        assert_eq!(ranked[1].author, "Bob");
    }

    #[test]
    fn binary_records_count_files_but_no_lines() {
        let commits = vec![commit("h1", "Alice")];
        let source = StubSource::new(&[("h1", vec![binary("a.bin"), binary("b.bin")])]);

        let stats = accumulate(&commits, &source).unwrap();

        assert_eq!(stats["Alice"].files_changed, 2);
        assert_eq!(stats["Alice"].lines_added, 0);
        assert_eq!(stats["Alice"].lines_deleted, 0);
    }

    #[test]
    fn commits_without_diff_records_still_count() {
        let commits = vec![commit("h1", "Alice")];
        let source = StubSource::new(&[("h1", vec![])]);

        let stats = accumulate(&commits, &source).unwrap();

        assert_eq!(stats["Alice"].commits, 1);
        assert_eq!(stats["Alice"].files_changed, 0);
        assert_eq!(stats["Alice"].total_changed_lines(), 0);
    }

    #[test]
    fn result_is_independent_of_fold_order() {
        let source = StubSource::new(&[
            ("h1", vec![numeric(10, 2, "a.rs")]),
            ("h2", vec![numeric(1, 1, "b.rs"), binary("c.bin")]),
            ("h3", vec![numeric(0, 7, "a.rs")]),
        ]);
        let forward = vec![commit("h1", "Alice"), commit("h2", "Bob"), commit("h3", "Alice")];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            accumulate(&forward, &source).unwrap(),
            accumulate(&reversed, &source).unwrap()
        );
    }

    #[test]
    fn ranking_is_descending_with_name_tie_break() {
        let commits = vec![commit("h1", "Carol"), commit("h2", "Alice"), commit("h3", "Bob")];
        let source = StubSource::new(&[
            ("h1", vec![numeric(3, 3, "a.rs")]),
            ("h2", vec![numeric(100, 0, "b.rs")]),
            ("h3", vec![numeric(6, 0, "c.rs")]),
        ]);

        let ranked = rank(accumulate(&commits, &source).unwrap());

        // Bob and Carol tie at 6 changed lines; Bob wins on name.
        let authors: Vec<&str> = ranked.iter().map(|e| e.author.as_str()).collect();
        assert_eq!(authors, vec!["Alice", "Bob", "Carol"]);

        for pair in ranked.windows(2) {
            assert!(pair[0].total_changed_lines >= pair[1].total_changed_lines);
        }
        for e in &ranked {
            assert!(e.commits >= 1);
            assert_eq!(e.total_changed_lines, e.lines_added + e.lines_deleted);
        }
    }

    #[test]
    fn failed_lookup_aborts_the_pass() {
        let commits = vec![commit("h1", "Alice"), commit("h2", "Alice")];
        let source = StubSource::new(&[("h1", vec![numeric(1, 0, "a.rs")])]);

        assert!(accumulate(&commits, &source).is_err());
    }
}

use super::DiffSource;
use crate::error::{Result, TallyError};
use crate::model::{CommitRecord, DiffRecord};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A git repository queried through the `git` command-line tool.
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let start = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        if !start.is_dir() {
            return Err(TallyError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", start.display()),
            )));
        }

        let toplevel = run_git(&start, &["rev-parse", "--show-toplevel"])?;
        let path = PathBuf::from(toplevel.trim_end());

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List non-merge commits, newest first, optionally restricted to
    /// the trailing `window` days.
    pub fn list_commits(&self, window: Option<u32>) -> Result<Vec<CommitRecord>> {
        let mut args = vec![
            "log".to_string(),
            "--pretty=format:%H|%an".to_string(),
            "--no-merges".to_string(),
        ];
        if let Some(days) = window {
            args.push(format!("--since={days} days ago"));
        }
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let stdout = run_git(&self.path, &args)?;

        stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(parse_log_line)
            .collect()
    }
}

impl DiffSource for GitRepo {
    fn diffs_for(&self, commit_id: &str) -> Result<Vec<DiffRecord>> {
        let stdout = run_git(&self.path, &["show", "--numstat", "--format=", commit_id])?;
        Ok(stdout.lines().filter_map(parse_numstat_line).collect())
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TallyError::SourceUnavailable(e),
            _ => TallyError::Io(e),
        })?;

    if !output.status.success() {
        return Err(TallyError::SourceCommandFailed {
            command: format!("git {}", args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Split a `%H|%an` log line on the first `|` only; author names may
/// themselves contain the separator.
fn parse_log_line(line: &str) -> Result<CommitRecord> {
    let (id, author) = line
        .split_once('|')
        .ok_or_else(|| TallyError::Parse(format!("Malformed log record: {line:?}")))?;
    Ok(CommitRecord {
        id: id.to_string(),
        author: author.to_string(),
    })
}

/// Parse one `--numstat` line of the form `added TAB deleted TAB path`.
/// Git prints `-` in place of the counts for files it cannot diff;
/// those parse to `None`. Lines without exactly three fields carry no
/// stats and are skipped.
fn parse_numstat_line(line: &str) -> Option<DiffRecord> {
    let mut parts = line.split('\t');
    let (added, deleted, path) = (parts.next()?, parts.next()?, parts.next()?);
    if path.is_empty() || parts.next().is_some() {
        return None;
    }
    Some(DiffRecord {
        added: added.parse().ok(),
        deleted: deleted.parse().ok(),
        path: path.to_string(),
    })
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TallyError>;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("git executable not found; make sure git is installed and on PATH")]
    SourceUnavailable(#[source] std::io::Error),
    #[error("`{command}` failed: {stderr}")]
    SourceCommandFailed { command: String, stderr: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

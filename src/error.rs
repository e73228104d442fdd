use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid column label: {0:?}")]
    InvalidColumnLabel(String),

    #[error("Unreadable spreadsheet {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Spreadsheet {} has no worksheets", .0.display())]
    NoWorksheet(PathBuf),
}

/// Reasons a summarization request produced nothing. Logged, then collapsed
/// into the absent result by `ChatClient`.
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed response body: {0}")]
    Malformed(String),

    #[error("Completion had no content")]
    EmptyCompletion,
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document encoding error: {0}")]
    Encode(String),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

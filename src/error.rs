// file: src/error.rs
// description: Custom error types, result alias and process exit codes
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("No documents found in {0}")]
    EmptyCorpus(PathBuf),

    #[error("Query returned no results: {0}")]
    EmptyResult(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// Process exit code for this error.
    ///
    /// `2` means the user has to fix configuration, `3` means there was
    /// nothing to answer from, `1` covers provider, index and IO failures
    /// that may succeed on a later attempt.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Config(_) => 2,
            PipelineError::EmptyCorpus(_)
            | PipelineError::EmptyResult(_)
            | PipelineError::Validation(_) => 3,
            PipelineError::FileOperation { .. }
            | PipelineError::Provider(_)
            | PipelineError::Index(_)
            | PipelineError::Io(_)
            | PipelineError::Serialization(_) => 1,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::Provider(_) | PipelineError::Index(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(PipelineError::Config("missing key".into()).exit_code(), 2);
        assert_eq!(PipelineError::Provider("quota".into()).exit_code(), 1);
        assert_eq!(
            PipelineError::EmptyCorpus(PathBuf::from("data")).exit_code(),
            3
        );
        assert_eq!(PipelineError::EmptyResult("q".into()).exit_code(), 3);
    }

    #[test]
    fn test_retryable() {
        assert!(PipelineError::Provider("503".into()).is_retryable());
        assert!(!PipelineError::Config("bad".into()).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = PipelineError::EmptyCorpus(PathBuf::from("data"));
        assert_eq!(err.to_string(), "No documents found in data");
    }
}

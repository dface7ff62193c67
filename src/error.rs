use thiserror::Error;

/// Failures that abort a run. A catalog miss is not one of them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid time specification: {0}")]
    InvalidTimeSpec(String),

    #[error("playlist source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("streaming service rejected the credential: {0}")]
    AuthFailure(String),

    #[error("streaming service unavailable: {0}")]
    SinkUnavailable(String),
}

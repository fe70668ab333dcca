use thiserror::Error;

/// Errors an annotation backend may report for one batch.
///
/// Batch failures are absorbed by the coordinator: they are counted and
/// surfaced in the enrichment report, never raised past it.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// The backend could not be reached or the call was interrupted
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with something that does not parse
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl AnnotatorError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}

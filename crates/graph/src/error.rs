use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// A node with this id already exists
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// No node with this id exists
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// An edge references a node id that does not exist
    #[error("edge endpoint missing: {from} -> {to}")]
    MissingEndpoint { from: String, to: String },

    /// A loaded graph violates a structural invariant; the message names
    /// the offending node or edge
    #[error("graph validation failed: {0}")]
    Validation(String),

    /// The persisted file carries an unknown format version
    #[error("unsupported graph format version {0}")]
    UnsupportedVersion(u32),

    /// IO error during save/load
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl GraphError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

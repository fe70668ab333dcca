use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Error, Debug)]
pub enum BuildError {
    /// The build root does not exist or is not a directory; fatal to the
    /// whole build
    #[error("invalid build root: {0}")]
    InvalidRoot(PathBuf),

    /// The structural parser could not be constructed (query table defect)
    #[error(transparent)]
    Parser(#[from] atlas_parser::ParserError),

    /// Graph construction rejected a node or edge
    #[error(transparent)]
    Graph(#[from] atlas_graph::GraphError),

    /// A parse worker terminated abnormally
    #[error("parse worker failed: {0}")]
    Worker(String),

    /// IO error outside the per-file pipeline
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

use std::path::PathBuf;
use thiserror::Error;

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParserError>;

/// Errors that can occur while loading file content.
///
/// All three variants are non-fatal to a multi-file scan: callers record a
/// warning and skip the file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read
    #[error("unreadable file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The byte stream contains a NUL byte and is treated as non-text
    #[error("binary file {0}")]
    Binary(PathBuf),

    /// No supported decoding accepts the byte stream
    #[error("undecodable file {0}")]
    Undecodable(PathBuf),
}

impl LoadError {
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }

    /// Path of the file that failed to load.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Unreadable { path, .. } => path,
            Self::Binary(path) => path,
            Self::Undecodable(path) => path,
        }
    }
}

/// Errors that can occur during structural parsing
#[derive(Error, Debug)]
pub enum ParserError {
    /// A declarative query failed to compile against its grammar
    #[error("query error for {language}: {message}")]
    QueryError { language: String, message: String },

    /// Tree-sitter rejected a grammar
    #[error("tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl ParserError {
    pub fn query(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QueryError {
            language: language.into(),
            message: message.into(),
        }
    }

    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}

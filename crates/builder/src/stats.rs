use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Statistics about one build pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildStats {
    /// Number of files that contributed nodes
    pub files: usize,

    /// Files skipped as unreadable/binary/undecodable
    pub files_skipped: usize,

    /// Structural elements extracted across all files
    pub elements: usize,

    /// Node count of the finished graph
    pub nodes: usize,

    /// Edge count of the finished graph
    pub edges: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// File counts per language
    pub languages: HashMap<String, usize>,

    /// Non-fatal problems recorded along the way
    pub warnings: Vec<String>,
}

impl BuildStats {
    pub fn new() -> Self {
        Self {
            files: 0,
            files_skipped: 0,
            elements: 0,
            nodes: 0,
            edges: 0,
            time_ms: 0,
            languages: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_file(&mut self, language: &str, elements: usize) {
        self.files += 1;
        self.elements += elements;
        *self.languages.entry(language.to_string()).or_insert(0) += 1;
    }

    pub fn add_skip(&mut self, warning: String) {
        self.files_skipped += 1;
        self.warnings.push(warning);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for BuildStats {
    fn default() -> Self {
        Self::new()
    }
}

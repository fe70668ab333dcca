use serde::{Deserialize, Serialize};

/// Kind of node in the code graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Class,
    Function,
    Import,
    External,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Class => "class",
            NodeKind::Function => "function",
            NodeKind::Import => "import",
            NodeKind::External => "external",
        }
    }

    /// Whether enrichment annotates nodes of this kind
    pub fn is_enrichable(self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Function)
    }
}

/// Type of relationship between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relation {
    /// Direct syntactic parent (file contains class, class contains method)
    Contains,

    /// Importing file references another file or an external module
    Imports,
}

/// Node in the code graph.
///
/// Identity rules keep ids stable across rebuilds of unchanged sources:
/// - file node: path relative to the scanned root, forward slashes
/// - element node: `<file>::<kind>::<name>::<start_line>`
/// - external node: `external::<module>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,

    /// Line range, 1-indexed inclusive; absent for file and external nodes
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,

    /// Enrichment output; absent until an annotation pass runs
    pub summary: Option<String>,
    pub risks: Option<Vec<String>>,
}

impl GraphNode {
    /// Node for a scanned source file
    pub fn file(relative_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: relative_path.into(),
            kind: NodeKind::File,
            name: name.into(),
            start_line: None,
            end_line: None,
            summary: None,
            risks: None,
        }
    }

    /// Node for a structural element inside a file
    pub fn element(
        file_id: &str,
        kind: NodeKind,
        name: impl Into<String>,
        start_line: u32,
        end_line: u32,
    ) -> Self {
        let name = name.into();
        Self {
            id: format!("{file_id}::{}::{name}::{start_line}", kind.as_str()),
            kind,
            name,
            start_line: Some(start_line),
            end_line: Some(end_line),
            summary: None,
            risks: None,
        }
    }

    /// Placeholder for an import target outside the scanned tree
    pub fn external(module: impl Into<String>) -> Self {
        let module = module.into();
        Self {
            id: format!("external::{module}"),
            kind: NodeKind::External,
            name: module,
            start_line: None,
            end_line: None,
            summary: None,
            risks: None,
        }
    }
}

/// Directed edge in the code graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
}

/// Semantic annotations merged onto a node after a build.
///
/// Installed as one record so a reader never observes a half-written merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub summary: String,
    pub risks: Vec<String>,
}

/// Derived node/edge counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
}

use serde::{Deserialize, Serialize};

/// Kind of structural element extracted from a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Class,
    Function,
    Import,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::Function => "function",
            ElementKind::Import => "import",
        }
    }
}

/// One class, function, or import statement extracted from a file.
///
/// Plain value type; line numbers are 1-indexed and inclusive with
/// `end_line >= start_line`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuralElement {
    pub kind: ElementKind,
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl StructuralElement {
    pub fn new(kind: ElementKind, name: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            start_line,
            end_line: end_line.max(start_line),
        }
    }
}

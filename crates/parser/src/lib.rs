//! # Atlas Parser
//!
//! Structural parsing of source files into typed elements.
//!
//! ## Pipeline
//!
//! ```text
//! File path
//!     │
//!     ├──> Content Loader (binary sniff, UTF-8 → Latin-1 fallback)
//!     │      └─> Decoded text
//!     │
//!     └──> Structural Parser (tree-sitter queries per language)
//!            └─> Ordered StructuralElement sequence
//!                 (classes, functions, imports with line ranges)
//! ```
//!
//! Languages are described by declarative query tables rather than
//! per-language control flow: adding a language means adding a query set.
//!
//! ## Example
//!
//! ```no_run
//! use atlas_parser::{loader, Language, StructuralParser};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let text = loader::load("src/service.py")?;
//!     let mut parser = StructuralParser::new()?;
//!     let elements = parser.parse(&text, Language::Python);
//!
//!     for element in &elements {
//!         println!("{:?} {} at {}..{}", element.kind, element.name,
//!                  element.start_line, element.end_line);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod language;
pub mod loader;
mod parser;
mod queries;
mod types;

pub use error::{LoadError, ParserError, Result};
pub use language::Language;
pub use parser::StructuralParser;
pub use types::{ElementKind, StructuralElement};

//! # Atlas Builder
//!
//! Builds the code graph from a directory tree.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Scanner (.gitignore aware, source extensions only)
//!     │      └─> Eligible files
//!     │
//!     ├──> Per-file workers (load → parse, no shared state)
//!     │      └─> StructuralElement sequences
//!     │
//!     ├──> Aggregation (single writer, scan order)
//!     │      ├─ file / element nodes, CONTAINS edges
//!     │      └─ import resolution → IMPORTS edges (file or external target)
//!     │
//!     └──> CodeGraph + BuildStats
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use atlas_builder::GraphBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let builder = GraphBuilder::new("/path/to/project");
//!     let (graph, stats) = builder.build_with_stats().await?;
//!
//!     println!("{} nodes, {} edges from {} files", stats.nodes, stats.edges, stats.files);
//!     graph.save("graph.json")?;
//!     Ok(())
//! }
//! ```

mod builder;
mod error;
mod resolve;
mod scanner;
mod stats;

pub use builder::GraphBuilder;
pub use error::{BuildError, Result};
pub use scanner::FileScanner;
pub use stats::BuildStats;

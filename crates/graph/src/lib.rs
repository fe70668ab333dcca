//! # Atlas Graph
//!
//! The dependency graph of a source tree: files and their structural
//! elements, linked by containment and import relationships.
//!
//! ## Architecture
//!
//! ```text
//! StructuralElement[] (per file)
//!     │
//!     ├──> Code Graph (petgraph)
//!     │      ├─ Nodes: files, classes, functions, imports, externals
//!     │      ├─ Edges: CONTAINS (syntactic parent), IMPORTS (file → file/external)
//!     │      └─ Annotation overlay (dashmap) — the sole post-build mutable surface
//!     │
//!     ├──> Query surface (neighbors, ancestors, descendants, kind filters)
//!     │
//!     └──> Store (canonical JSON save/load, invariant revalidation)
//! ```
//!
//! Structure is created during a build pass and never mutated afterwards;
//! enrichment only installs whole annotation records through `&self`.

mod error;
mod graph;
mod query;
mod store;
mod types;

pub use error::{GraphError, Result};
pub use graph::CodeGraph;
pub use store::GRAPH_FORMAT_VERSION;
pub use types::{Annotation, GraphEdge, GraphNode, GraphStats, NodeKind, Relation};

// Direction of traversal for `CodeGraph::neighbors`.
pub use petgraph::Direction;

//! Concurrent annotation of built code graphs.
//!
//! A [`CodeGraph`](atlas_graph::CodeGraph) out of the builder is purely
//! structural. This crate layers meaning on top of it: an injected
//! [`Annotator`] backend produces summaries and risk notes for classes and
//! functions, and the [`EnrichmentCoordinator`] drives it over the graph in
//! bounded concurrent batches.
//!
//! ```text
//! CodeGraph ──► EnrichmentCoordinator ──► Annotator (batched, concurrent)
//!                       │
//!                       └──► annotation overlay + EnrichmentReport
//! ```
//!
//! Enrichment is additive and fault-tolerant: graph structure is never
//! modified, a failed or timed-out batch only leaves its own nodes
//! unannotated, and the report says what happened.

mod annotator;
mod coordinator;
mod error;

pub use annotator::{AnnotationRequest, AnnotationResult, Annotator, HeuristicAnnotator};
pub use coordinator::{EnrichmentConfig, EnrichmentCoordinator, EnrichmentReport};
pub use error::AnnotatorError;

use crate::error::AnnotatorError;
use async_trait::async_trait;
use atlas_graph::NodeKind;
use serde::{Deserialize, Serialize};

/// One node submitted for annotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationRequest {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub source_excerpt: String,
}

/// One node's annotations as returned by a backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationResult {
    pub id: String,
    pub summary: String,
    pub risks: Vec<String>,
}

/// Annotation capability injected into the coordinator.
///
/// Implementations may be called concurrently and may fail wholesale per
/// call; no ordering is guaranteed between concurrent calls' responses.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(
        &self,
        batch: &[AnnotationRequest],
    ) -> Result<Vec<AnnotationResult>, AnnotatorError>;
}

/// Deterministic offline backend.
///
/// Produces a one-line summary from the node's kind and name and flags
/// oversized definitions; useful for dry runs and tests where the real
/// annotation service is not wired in.
pub struct HeuristicAnnotator;

const LONG_DEFINITION_LINES: usize = 50;

#[async_trait]
impl Annotator for HeuristicAnnotator {
    async fn annotate(
        &self,
        batch: &[AnnotationRequest],
    ) -> Result<Vec<AnnotationResult>, AnnotatorError> {
        Ok(batch
            .iter()
            .map(|request| {
                let mut risks = Vec::new();
                let lines = request.source_excerpt.lines().count();
                if lines > LONG_DEFINITION_LINES {
                    risks.push(format!(
                        "definition spans {lines} lines; review before changing"
                    ));
                }
                AnnotationResult {
                    id: request.id.clone(),
                    summary: format!("{} `{}`", request.kind.as_str(), request.name),
                    risks,
                }
            })
            .collect())
    }
}

use crate::annotator::{AnnotationRequest, Annotator};
use atlas_graph::{Annotation, CodeGraph, GraphNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Tuning knobs for one enrichment pass
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Maximum nodes per annotation call
    pub batch_size: usize,

    /// Maximum annotation calls in flight at once
    pub max_concurrency: usize,

    /// Per-batch deadline; a batch past it counts as failed, not retried
    pub timeout: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            batch_size: 16,
            max_concurrency: 4,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Outcome of one enrichment pass; batch failures land here, never as errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentReport {
    pub nodes_considered: usize,
    pub nodes_enriched: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub warnings: Vec<String>,
}

/// Drives concurrent bounded annotation batches and merges the results
/// back into the graph.
///
/// The coordinator never touches graph structure: only the annotation
/// overlay of nodes that existed at batch-dispatch time is written, one
/// whole record per node. A failed batch leaves its nodes unenriched and
/// the rest of the pass untouched; callers may re-drive them later.
pub struct EnrichmentCoordinator {
    annotator: Arc<dyn Annotator>,
    config: EnrichmentConfig,
}

impl EnrichmentCoordinator {
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        Self::with_config(annotator, EnrichmentConfig::default())
    }

    pub fn with_config(annotator: Arc<dyn Annotator>, config: EnrichmentConfig) -> Self {
        let config = EnrichmentConfig {
            batch_size: config.batch_size.max(1),
            max_concurrency: config.max_concurrency.max(1),
            timeout: config.timeout,
        };
        Self { annotator, config }
    }

    /// Annotate every enrichable node (classes and functions) in the graph.
    ///
    /// `root` is the scanned tree the graph was built from; it is only used
    /// to cut source excerpts for the requests, and read failures degrade
    /// to empty excerpts.
    pub async fn enrich(&self, graph: &CodeGraph, root: &Path) -> EnrichmentReport {
        let requests: Vec<AnnotationRequest> = graph
            .nodes()
            .filter(|node| node.kind.is_enrichable())
            .map(|node| AnnotationRequest {
                id: node.id.clone(),
                name: node.name.clone(),
                kind: node.kind,
                source_excerpt: source_excerpt(root, node),
            })
            .collect();

        let mut report = EnrichmentReport {
            nodes_considered: requests.len(),
            nodes_enriched: 0,
            batches: 0,
            failed_batches: 0,
            warnings: Vec::new(),
        };

        if requests.is_empty() {
            return report;
        }

        // Each node belongs to exactly one batch, so overlapping merges to
        // the same node cannot happen within a pass.
        let batches: Vec<Vec<AnnotationRequest>> = requests
            .chunks(self.config.batch_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        report.batches = batches.len();

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut join_set = JoinSet::new();

        for (index, batch) in batches.into_iter().enumerate() {
            let annotator = Arc::clone(&self.annotator);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.config.timeout;

            join_set.spawn(async move {
                let permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    // The semaphore is never closed during a pass; treat it
                    // as a failed call if it somehow is.
                    Err(_) => {
                        let failed = Err(crate::error::AnnotatorError::transport(
                            "enrichment semaphore closed",
                        ));
                        return (index, batch, Ok(failed));
                    }
                };
                let outcome = tokio::time::timeout(timeout, annotator.annotate(&batch)).await;
                drop(permit);
                (index, batch, outcome)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            let (index, batch, outcome) = match joined {
                Ok(completed) => completed,
                Err(e) => {
                    report.failed_batches += 1;
                    report.warnings.push(format!("batch task failed: {e}"));
                    continue;
                }
            };

            match outcome {
                Err(_) => {
                    log::warn!("annotation batch {index} timed out");
                    report.failed_batches += 1;
                    report.warnings.push(format!("batch {index} timed out"));
                }
                Ok(Err(e)) => {
                    log::warn!("annotation batch {index} failed: {e}");
                    report.failed_batches += 1;
                    report.warnings.push(format!("batch {index} failed: {e}"));
                }
                Ok(Ok(results)) => {
                    let dispatched: HashSet<&str> =
                        batch.iter().map(|r| r.id.as_str()).collect();
                    for result in results {
                        if !dispatched.contains(result.id.as_str()) {
                            report.warnings.push(format!(
                                "batch {index} answered for unknown node `{}`",
                                result.id
                            ));
                            continue;
                        }
                        let annotation = Annotation {
                            summary: result.summary,
                            risks: result.risks,
                        };
                        match graph.merge_annotation(&result.id, annotation) {
                            Ok(()) => report.nodes_enriched += 1,
                            Err(e) => report
                                .warnings
                                .push(format!("merge for `{}` failed: {e}", result.id)),
                        }
                    }
                }
            }
        }

        log::info!(
            "Enriched {}/{} nodes across {} batches ({} failed)",
            report.nodes_enriched,
            report.nodes_considered,
            report.batches,
            report.failed_batches
        );
        report
    }
}

const MAX_EXCERPT_LINES: usize = 120;

/// Slice the node's line range out of its source file, best-effort.
fn source_excerpt(root: &Path, node: &GraphNode) -> String {
    let Some(file_part) = node.id.split("::").next() else {
        return String::new();
    };
    let (Some(start), Some(end)) = (node.start_line, node.end_line) else {
        return String::new();
    };

    match atlas_parser::loader::load(root.join(file_part)) {
        Ok(text) => {
            let start = (start as usize).saturating_sub(1);
            let take = (end as usize).saturating_sub(start).min(MAX_EXCERPT_LINES);
            text.lines()
                .skip(start)
                .take(take)
                .collect::<Vec<_>>()
                .join("\n")
        }
        Err(e) => {
            log::debug!("no excerpt for {}: {e}", node.id);
            String::new()
        }
    }
}

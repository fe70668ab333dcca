use crate::error::{BuildError, Result};
use crate::resolve::resolve_import;
use crate::scanner::FileScanner;
use crate::stats::BuildStats;
use atlas_graph::{CodeGraph, GraphNode, NodeKind, Relation};
use atlas_parser::{loader, ElementKind, Language, StructuralElement, StructuralParser};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task::JoinSet;

/// Builds a code graph from a directory tree.
///
/// Per-file pipelines (load → parse) run on blocking workers sized to
/// available parallelism and share no mutable state; the driver task is the
/// single writer that aggregates their results into one graph, in scanned
/// order, so ids and the persisted layout stay deterministic. The graph is
/// only handed to the caller once aggregation completes.
pub struct GraphBuilder {
    root: PathBuf,
}

/// Result of one file's pipeline
enum FileOutcome {
    Parsed {
        rel_path: String,
        language: Language,
        elements: Vec<StructuralElement>,
    },
    Skipped {
        rel_path: String,
        reason: String,
    },
}

impl GraphBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Build the graph for the configured root.
    pub async fn build(&self) -> Result<CodeGraph> {
        self.build_with_stats().await.map(|(graph, _)| graph)
    }

    /// Build the graph and report scan/aggregation statistics.
    ///
    /// # Errors
    ///
    /// [`BuildError::InvalidRoot`] if the root does not exist or is not a
    /// directory. Per-file failures are never errors: the file is skipped
    /// with a recorded warning and the scan continues.
    pub async fn build_with_stats(&self) -> Result<(CodeGraph, BuildStats)> {
        let start = Instant::now();

        if !self.root.is_dir() {
            return Err(BuildError::InvalidRoot(self.root.clone()));
        }

        log::info!("Building code graph for {}", self.root.display());

        let files = FileScanner::new(&self.root).scan();
        let outcomes = self.parse_files(files).await?;

        let mut graph = CodeGraph::new();
        let mut stats = BuildStats::new();
        let mut pending_imports: Vec<(String, String)> = Vec::new();

        for outcome in outcomes {
            match outcome {
                FileOutcome::Skipped { rel_path, reason } => {
                    log::warn!("Skipping {rel_path}: {reason}");
                    stats.add_skip(format!("{rel_path}: {reason}"));
                }
                FileOutcome::Parsed {
                    rel_path,
                    language,
                    elements,
                } => {
                    stats.add_file(language.as_str(), elements.len());
                    self.aggregate_file(
                        &mut graph,
                        &mut stats,
                        &rel_path,
                        &elements,
                        &mut pending_imports,
                    )?;
                }
            }
        }

        self.resolve_imports(&mut graph, pending_imports)?;

        stats.nodes = graph.node_count();
        stats.edges = graph.edge_count();
        stats.time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Built code graph: {} nodes, {} edges from {} files ({} skipped) in {}ms",
            stats.nodes,
            stats.edges,
            stats.files,
            stats.files_skipped,
            stats.time_ms
        );

        Ok((graph, stats))
    }

    /// Run per-file pipelines on blocking workers, preserving scan order.
    async fn parse_files(&self, files: Vec<PathBuf>) -> Result<Vec<FileOutcome>> {
        let mut entries: Vec<(usize, PathBuf, String)> = Vec::with_capacity(files.len());
        for (index, path) in files.iter().enumerate() {
            match rel_path(&self.root, path) {
                Some(rel) => entries.push((index, path.clone(), rel)),
                None => log::warn!("{} is outside the scan root, skipping", path.display()),
            }
        }

        // Guards the chunk size below; every file failing rel_path leaves
        // entries empty even when the scan was not.
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(entries.len())
            .max(1);
        let chunk_size = entries.len().div_ceil(workers);

        let mut join_set = JoinSet::new();
        for chunk in entries.chunks(chunk_size) {
            let chunk = chunk.to_vec();
            join_set.spawn_blocking(move || parse_chunk(chunk));
        }

        let mut indexed: Vec<(usize, FileOutcome)> = Vec::with_capacity(entries.len());
        while let Some(joined) = join_set.join_next().await {
            let outcomes = joined.map_err(|e| BuildError::Worker(e.to_string()))??;
            indexed.extend(outcomes);
        }

        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, outcome)| outcome).collect())
    }

    /// Insert one file's nodes and CONTAINS edges; queue its imports.
    fn aggregate_file(
        &self,
        graph: &mut CodeGraph,
        stats: &mut BuildStats,
        rel_path: &str,
        elements: &[StructuralElement],
        pending_imports: &mut Vec<(String, String)>,
    ) -> Result<()> {
        let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
        graph.add_node(GraphNode::file(rel_path, file_name))?;

        // Import statements drive IMPORTS edges rather than materializing
        // as element nodes of their own.
        let mut ids: Vec<Option<String>> = Vec::with_capacity(elements.len());
        for element in elements {
            if element.kind == ElementKind::Import {
                pending_imports.push((rel_path.to_string(), element.name.clone()));
                ids.push(None);
                continue;
            }

            let node = GraphNode::element(
                rel_path,
                node_kind(element.kind),
                element.name.clone(),
                element.start_line,
                element.end_line,
            );
            if graph.contains_node(&node.id) {
                stats.add_warning(format!("duplicate element `{}` skipped", node.id));
                ids.push(None);
                continue;
            }
            ids.push(Some(node.id.clone()));
            graph.add_node(node)?;
        }

        for index in 0..elements.len() {
            let Some(id) = ids[index].as_deref() else {
                continue;
            };
            let parent = enclosing_class(elements, &ids, index).unwrap_or(rel_path);
            graph.add_edge(parent, id, Relation::Contains)?;
        }

        Ok(())
    }

    /// Resolve queued imports against the scanned file set.
    fn resolve_imports(
        &self,
        graph: &mut CodeGraph,
        pending_imports: Vec<(String, String)>,
    ) -> Result<()> {
        let file_ids: HashSet<String> = graph
            .nodes_by_kind(NodeKind::File)
            .iter()
            .map(|n| n.id.clone())
            .collect();

        for (file_id, module) in pending_imports {
            match resolve_import(&module, &file_id, &file_ids) {
                Some(target) if target != file_id => {
                    if !graph.has_edge(&file_id, &target, Relation::Imports) {
                        graph.add_edge(&file_id, &target, Relation::Imports)?;
                    }
                }
                Some(_) => {} // a file does not import itself
                None => {
                    let external = GraphNode::external(&module);
                    let external_id = external.id.clone();
                    if !graph.contains_node(&external_id) {
                        graph.add_node(external)?;
                    }
                    if !graph.has_edge(&file_id, &external_id, Relation::Imports) {
                        graph.add_edge(&file_id, &external_id, Relation::Imports)?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Load and parse one worker's share of the scanned files.
fn parse_chunk(chunk: Vec<(usize, PathBuf, String)>) -> Result<Vec<(usize, FileOutcome)>> {
    let mut parser = StructuralParser::new()?;
    let mut outcomes = Vec::with_capacity(chunk.len());

    for (index, path, rel_path) in chunk {
        let outcome = match loader::load(&path) {
            Ok(text) => {
                let language = Language::from_path(&path);
                let elements = parser.parse(&text, language);
                FileOutcome::Parsed {
                    rel_path,
                    language,
                    elements,
                }
            }
            Err(e) => FileOutcome::Skipped {
                rel_path,
                reason: e.to_string(),
            },
        };
        outcomes.push((index, outcome));
    }

    Ok(outcomes)
}

fn node_kind(kind: ElementKind) -> NodeKind {
    match kind {
        ElementKind::Class => NodeKind::Class,
        ElementKind::Function => NodeKind::Function,
        ElementKind::Import => NodeKind::Import,
    }
}

/// Smallest class element whose line range encloses the child, if any.
///
/// Imports always attach to the file; identical spans are never treated as
/// enclosing so two same-span elements cannot parent each other.
fn enclosing_class<'a>(
    elements: &[StructuralElement],
    ids: &'a [Option<String>],
    child: usize,
) -> Option<&'a str> {
    let target = &elements[child];
    if target.kind == ElementKind::Import {
        return None;
    }

    elements
        .iter()
        .enumerate()
        .filter(|(index, candidate)| {
            *index != child
                && candidate.kind == ElementKind::Class
                && candidate.start_line <= target.start_line
                && candidate.end_line >= target.end_line
                && (candidate.start_line, candidate.end_line)
                    != (target.start_line, target.end_line)
        })
        .min_by_key(|(_, candidate)| candidate.end_line - candidate.start_line)
        .and_then(|(index, _)| ids[index].as_deref())
}

/// Path relative to the scanned root, normalized with forward slashes.
fn rel_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}

//! Canonical JSON persistence for the code graph.
//!
//! Save is total: every valid in-memory graph serializes. Load is the one
//! place invariant violations surface as errors, because the bytes may come
//! from an external or hand-edited file.

use crate::error::{GraphError, Result};
use crate::graph::CodeGraph;
use crate::types::{Annotation, GraphEdge, GraphNode, NodeKind, Relation};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub const GRAPH_FORMAT_VERSION: u32 = 1;

/// On-disk layout: `{"version": 1, "nodes": [...], "edges": [...]}`
#[derive(Serialize, Deserialize)]
struct GraphFile {
    version: u32,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl CodeGraph {
    /// Serialize to the canonical JSON layout, folding the annotation
    /// overlay into the node records.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = GraphFile {
            version: GRAPH_FORMAT_VERSION,
            nodes: self.nodes().map(|n| self.annotated_node(n)).collect(),
            edges: self.edges().collect(),
        };

        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json)?;

        log::info!(
            "Saved graph to {} ({} nodes, {} edges)",
            path.display(),
            file.nodes.len(),
            file.edges.len()
        );
        Ok(())
    }

    /// Deserialize and re-validate every structural invariant.
    ///
    /// # Errors
    ///
    /// [`GraphError::Validation`] naming the offending node or edge when the
    /// file violates id uniqueness, edge endpoint existence, the CONTAINS
    /// forest property, or IMPORTS endpoint kinds;
    /// [`GraphError::UnsupportedVersion`] for an unknown format version.
    pub fn load(path: impl AsRef<Path>) -> Result<CodeGraph> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let file: GraphFile = serde_json::from_str(&text)?;

        if file.version != GRAPH_FORMAT_VERSION {
            return Err(GraphError::UnsupportedVersion(file.version));
        }

        let mut graph = CodeGraph::new();

        for mut node in file.nodes {
            let annotation = match (node.summary.take(), node.risks.take()) {
                (None, None) => None,
                (summary, risks) => Some(Annotation {
                    summary: summary.unwrap_or_default(),
                    risks: risks.unwrap_or_default(),
                }),
            };

            let id = node.id.clone();
            graph
                .add_node(node)
                .map_err(|_| GraphError::validation(format!("duplicate node id `{id}`")))?;
            if let Some(annotation) = annotation {
                graph.merge_annotation(&id, annotation)?;
            }
        }

        for edge in &file.edges {
            graph
                .add_edge(&edge.source, &edge.target, edge.relation)
                .map_err(|_| {
                    GraphError::validation(format!(
                        "edge `{}` -> `{}` references a missing node",
                        edge.source, edge.target
                    ))
                })?;
        }

        validate(&graph)?;
        Ok(graph)
    }
}

/// Structural invariants beyond endpoint existence, checked on load.
fn validate(graph: &CodeGraph) -> Result<()> {
    for node in graph.nodes() {
        if matches!(node.kind, NodeKind::File | NodeKind::External)
            && (node.start_line.is_some() || node.end_line.is_some())
        {
            return Err(GraphError::validation(format!(
                "{} node `{}` carries line numbers",
                node.kind.as_str(),
                node.id
            )));
        }
        if let (Some(start), Some(end)) = (node.start_line, node.end_line) {
            if end < start {
                return Err(GraphError::validation(format!(
                    "node `{}` has end_line {end} before start_line {start}",
                    node.id
                )));
            }
        }
    }

    let mut contains_parent: HashMap<&str, &str> = HashMap::new();

    for edge in graph.inner().edge_references() {
        let source = &graph.inner()[edge.source()];
        let target = &graph.inner()[edge.target()];
        match edge.weight() {
            Relation::Contains => {
                if matches!(target.kind, NodeKind::File | NodeKind::External) {
                    return Err(GraphError::validation(format!(
                        "CONTAINS edge `{}` -> `{}` targets a {} node",
                        source.id,
                        target.id,
                        target.kind.as_str()
                    )));
                }
                if contains_parent
                    .insert(target.id.as_str(), source.id.as_str())
                    .is_some()
                {
                    return Err(GraphError::validation(format!(
                        "node `{}` has more than one CONTAINS parent",
                        target.id
                    )));
                }
            }
            Relation::Imports => {
                if source.kind != NodeKind::File {
                    return Err(GraphError::validation(format!(
                        "IMPORTS edge `{}` -> `{}` originates from a {} node",
                        source.id,
                        target.id,
                        source.kind.as_str()
                    )));
                }
                if !matches!(target.kind, NodeKind::File | NodeKind::External) {
                    return Err(GraphError::validation(format!(
                        "IMPORTS edge `{}` -> `{}` targets a {} node",
                        source.id,
                        target.id,
                        target.kind.as_str()
                    )));
                }
            }
        }
    }

    // A unique parent per node is not enough for a forest: parent chains
    // must also terminate. Walk each chain once, reusing already-cleared
    // nodes so the pass stays linear.
    let mut cleared: HashSet<&str> = HashSet::new();
    for &start in contains_parent.keys() {
        let mut walked: Vec<&str> = Vec::new();
        let mut current = start;
        while let Some(&parent) = contains_parent.get(current) {
            if cleared.contains(current) {
                break;
            }
            if walked.contains(&current) {
                return Err(GraphError::validation(format!(
                    "CONTAINS cycle through node `{current}`"
                )));
            }
            walked.push(current);
            current = parent;
        }
        cleared.extend(walked);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample() -> CodeGraph {
        let mut graph = CodeGraph::new();
        graph.add_node(GraphNode::file("a.py", "a.py")).unwrap();
        graph.add_node(GraphNode::file("b.py", "b.py")).unwrap();
        graph
            .add_node(GraphNode::element("b.py", NodeKind::Function, "hello", 1, 1))
            .unwrap();
        graph.add_node(GraphNode::external("requests")).unwrap();
        graph
            .add_edge("b.py", "b.py::function::hello::1", Relation::Contains)
            .unwrap();
        graph.add_edge("a.py", "b.py", Relation::Imports).unwrap();
        graph
            .add_edge("a.py", "external::requests", Relation::Imports)
            .unwrap();
        graph
    }

    #[test]
    fn roundtrip_preserves_structure_and_annotations() {
        let graph = sample();
        graph
            .merge_annotation(
                "b.py::function::hello::1",
                Annotation {
                    summary: "greets the caller".into(),
                    risks: vec!["no input validation".into()],
                },
            )
            .unwrap();

        let temp = tempdir().unwrap();
        let path = temp.path().join("graph.json");
        graph.save(&path).unwrap();

        let loaded = CodeGraph::load(&path).unwrap();
        assert_eq!(loaded.stats(), graph.stats());

        let node_ids: Vec<_> = loaded.nodes().map(|n| n.id.clone()).collect();
        let original_ids: Vec<_> = graph.nodes().map(|n| n.id.clone()).collect();
        assert_eq!(node_ids, original_ids);

        let annotation = loaded.annotation("b.py::function::hello::1").unwrap();
        assert_eq!(annotation.summary, "greets the caller");
        assert_eq!(annotation.risks, vec!["no input validation".to_string()]);

        // Second roundtrip is byte-identical.
        let path2 = temp.path().join("graph2.json");
        loaded.save(&path2).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            std::fs::read_to_string(&path2).unwrap()
        );
    }

    fn write_graph_json(dir: &Path, json: &str) -> std::path::PathBuf {
        let path = dir.join("graph.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn load_rejects_double_contains_parent() {
        let temp = tempdir().unwrap();
        let path = write_graph_json(
            temp.path(),
            r#"{
                "version": 1,
                "nodes": [
                    {"id": "a.py", "kind": "file", "name": "a.py",
                     "start_line": null, "end_line": null, "summary": null, "risks": null},
                    {"id": "b.py", "kind": "file", "name": "b.py",
                     "start_line": null, "end_line": null, "summary": null, "risks": null},
                    {"id": "a.py::function::f::1", "kind": "function", "name": "f",
                     "start_line": 1, "end_line": 2, "summary": null, "risks": null}
                ],
                "edges": [
                    {"source": "a.py", "target": "a.py::function::f::1", "relation": "CONTAINS"},
                    {"source": "b.py", "target": "a.py::function::f::1", "relation": "CONTAINS"}
                ]
            }"#,
        );

        let err = CodeGraph::load(&path).unwrap_err();
        match err {
            GraphError::Validation(msg) => {
                assert!(msg.contains("a.py::function::f::1"), "message was: {msg}")
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn load_rejects_contains_cycle() {
        let temp = tempdir().unwrap();
        // Both classes have exactly one parent, so only the chain walk
        // can catch this.
        let path = write_graph_json(
            temp.path(),
            r#"{
                "version": 1,
                "nodes": [
                    {"id": "a.py", "kind": "file", "name": "a.py",
                     "start_line": null, "end_line": null, "summary": null, "risks": null},
                    {"id": "a.py::class::A::1", "kind": "class", "name": "A",
                     "start_line": 1, "end_line": 4, "summary": null, "risks": null},
                    {"id": "a.py::class::B::5", "kind": "class", "name": "B",
                     "start_line": 5, "end_line": 8, "summary": null, "risks": null}
                ],
                "edges": [
                    {"source": "a.py::class::A::1", "target": "a.py::class::B::5", "relation": "CONTAINS"},
                    {"source": "a.py::class::B::5", "target": "a.py::class::A::1", "relation": "CONTAINS"}
                ]
            }"#,
        );

        let err = CodeGraph::load(&path).unwrap_err();
        match err {
            GraphError::Validation(msg) => assert!(msg.contains("cycle"), "message was: {msg}"),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn load_rejects_line_numbers_on_file_node() {
        let temp = tempdir().unwrap();
        let path = write_graph_json(
            temp.path(),
            r#"{
                "version": 1,
                "nodes": [
                    {"id": "a.py", "kind": "file", "name": "a.py",
                     "start_line": 1, "end_line": 10, "summary": null, "risks": null}
                ],
                "edges": []
            }"#,
        );

        let err = CodeGraph::load(&path).unwrap_err();
        assert!(matches!(err, GraphError::Validation(msg) if msg.contains("a.py")));
    }

    #[test]
    fn load_rejects_missing_endpoint() {
        let temp = tempdir().unwrap();
        let path = write_graph_json(
            temp.path(),
            r#"{
                "version": 1,
                "nodes": [
                    {"id": "a.py", "kind": "file", "name": "a.py",
                     "start_line": null, "end_line": null, "summary": null, "risks": null}
                ],
                "edges": [
                    {"source": "a.py", "target": "ghost.py", "relation": "IMPORTS"}
                ]
            }"#,
        );

        let err = CodeGraph::load(&path).unwrap_err();
        match err {
            GraphError::Validation(msg) => assert!(msg.contains("ghost.py")),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn load_rejects_duplicate_node_ids() {
        let temp = tempdir().unwrap();
        let path = write_graph_json(
            temp.path(),
            r#"{
                "version": 1,
                "nodes": [
                    {"id": "a.py", "kind": "file", "name": "a.py",
                     "start_line": null, "end_line": null, "summary": null, "risks": null},
                    {"id": "a.py", "kind": "file", "name": "a.py",
                     "start_line": null, "end_line": null, "summary": null, "risks": null}
                ],
                "edges": []
            }"#,
        );

        let err = CodeGraph::load(&path).unwrap_err();
        assert!(matches!(err, GraphError::Validation(msg) if msg.contains("a.py")));
    }

    #[test]
    fn load_rejects_imports_from_non_file() {
        let temp = tempdir().unwrap();
        let path = write_graph_json(
            temp.path(),
            r#"{
                "version": 1,
                "nodes": [
                    {"id": "a.py", "kind": "file", "name": "a.py",
                     "start_line": null, "end_line": null, "summary": null, "risks": null},
                    {"id": "a.py::function::f::1", "kind": "function", "name": "f",
                     "start_line": 1, "end_line": 2, "summary": null, "risks": null}
                ],
                "edges": [
                    {"source": "a.py::function::f::1", "target": "a.py", "relation": "IMPORTS"}
                ]
            }"#,
        );

        let err = CodeGraph::load(&path).unwrap_err();
        assert!(matches!(err, GraphError::Validation(_)));
    }

    #[test]
    fn load_rejects_unknown_version() {
        let temp = tempdir().unwrap();
        let path = write_graph_json(
            temp.path(),
            r#"{"version": 99, "nodes": [], "edges": []}"#,
        );

        let err = CodeGraph::load(&path).unwrap_err();
        assert!(matches!(err, GraphError::UnsupportedVersion(99)));
    }
}

use crate::error::{GraphError, Result};
use crate::types::{Annotation, GraphEdge, GraphNode, GraphStats, Relation};
use dashmap::DashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// The code graph: typed nodes, CONTAINS/IMPORTS edges, and a concurrent
/// annotation overlay.
///
/// Structure (nodes and edges) is written only during a build or load;
/// afterwards the annotation overlay is the sole mutable surface, and it
/// accepts merges through `&self` so concurrent enrichment batches touching
/// different nodes never contend.
#[derive(Debug)]
pub struct CodeGraph {
    graph: DiGraph<GraphNode, Relation>,
    id_index: HashMap<String, NodeIndex>,
    annotations: DashMap<String, Annotation>,
}

impl CodeGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_index: HashMap::new(),
            annotations: DashMap::new(),
        }
    }

    /// Add a node, rejecting duplicate ids.
    pub fn add_node(&mut self, node: GraphNode) -> Result<NodeIndex> {
        if self.id_index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        Ok(idx)
    }

    /// Add an edge between existing nodes.
    ///
    /// Endpoint existence is the construction-time invariant: an edge can
    /// never dangle.
    pub fn add_edge(&mut self, source: &str, target: &str, relation: Relation) -> Result<()> {
        let (Some(&from), Some(&to)) = (self.id_index.get(source), self.id_index.get(target))
        else {
            return Err(GraphError::MissingEndpoint {
                from: source.to_string(),
                to: target.to_string(),
            });
        };
        self.graph.add_edge(from, to, relation);
        Ok(())
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.id_index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    pub(crate) fn inner(&self) -> &DiGraph<GraphNode, Relation> {
        &self.graph
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// All edges in insertion order, as id-based records
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        self.graph.edge_references().map(|e| GraphEdge {
            source: self.graph[e.source()].id.clone(),
            target: self.graph[e.target()].id.clone(),
            relation: *e.weight(),
        })
    }

    /// Whether an identical edge already exists
    pub fn has_edge(&self, source: &str, target: &str, relation: Relation) -> bool {
        let (Some(&from), Some(&to)) = (self.id_index.get(source), self.id_index.get(target))
        else {
            return false;
        };
        self.graph
            .edges_connecting(from, to)
            .any(|e| *e.weight() == relation)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Derived node/edge counts
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
        }
    }

    /// Install annotations for one node as a single atomic record.
    ///
    /// Takes `&self`: merges to different nodes proceed concurrently, a
    /// repeated merge to the same node is last-write-wins.
    pub fn merge_annotation(&self, id: &str, annotation: Annotation) -> Result<()> {
        if !self.id_index.contains_key(id) {
            return Err(GraphError::NodeNotFound(id.to_string()));
        }
        self.annotations.insert(id.to_string(), annotation);
        Ok(())
    }

    /// Annotations previously merged for a node, if any
    pub fn annotation(&self, id: &str) -> Option<Annotation> {
        self.annotations.get(id).map(|entry| entry.value().clone())
    }

    /// Number of annotated nodes
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Node record with its annotation overlay folded in
    pub(crate) fn annotated_node(&self, node: &GraphNode) -> GraphNode {
        let mut record = node.clone();
        if let Some(annotation) = self.annotation(&node.id) {
            record.summary = Some(annotation.summary);
            record.risks = Some(annotation.risks);
        }
        record
    }
}

impl Default for CodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

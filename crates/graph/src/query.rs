//! Read-only traversal surface consumed by query/render/agent layers.

use crate::graph::CodeGraph;
use crate::types::{GraphNode, NodeKind, Relation};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashSet, VecDeque};

impl CodeGraph {
    /// Direct neighbors along edges of one relation.
    ///
    /// `Direction::Outgoing` follows edges leaving the node,
    /// `Direction::Incoming` follows edges arriving at it. Unknown ids
    /// yield an empty result.
    pub fn neighbors(&self, id: &str, relation: Relation, direction: Direction) -> Vec<&GraphNode> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.inner()
            .edges_directed(idx, direction)
            .filter(|e| *e.weight() == relation)
            .filter_map(|e| {
                let neighbor = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                self.node_at(neighbor)
            })
            .collect()
    }

    /// Chain of CONTAINS parents from the node up to its file.
    ///
    /// Terminates even on malformed containment: a node already seen ends
    /// the walk instead of looping.
    pub fn ancestors(&self, id: &str) -> Vec<&GraphNode> {
        let mut chain = Vec::new();
        let mut seen: HashSet<String> = HashSet::from([id.to_string()]);
        let mut current = id.to_string();
        loop {
            let parents = self.neighbors(&current, Relation::Contains, Direction::Incoming);
            // Forest invariant: at most one parent.
            match parents.first() {
                Some(parent) if seen.insert(parent.id.clone()) => {
                    current = parent.id.clone();
                    chain.push(*parent);
                }
                _ => break,
            }
        }
        chain
    }

    /// All nodes transitively contained by this one, breadth-first
    pub fn descendants(&self, id: &str) -> Vec<&GraphNode> {
        let mut found = Vec::new();
        let mut queue: VecDeque<String> = VecDeque::from([id.to_string()]);
        while let Some(current) = queue.pop_front() {
            for child in self.neighbors(&current, Relation::Contains, Direction::Outgoing) {
                queue.push_back(child.id.clone());
                found.push(child);
            }
        }
        found
    }

    /// All nodes of one kind, in insertion order
    pub fn nodes_by_kind(&self, kind: NodeKind) -> Vec<&GraphNode> {
        self.nodes().filter(|n| n.kind == kind).collect()
    }

    /// Files and external modules this file imports
    pub fn imports_of(&self, file_id: &str) -> Vec<&GraphNode> {
        self.neighbors(file_id, Relation::Imports, Direction::Outgoing)
    }

    /// Files that import this file — "what depends on this"
    pub fn imported_by(&self, file_id: &str) -> Vec<&GraphNode> {
        self.neighbors(file_id, Relation::Imports, Direction::Incoming)
    }
}

//! Workflow graph entity

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::node::Node;

/// A workflow definition: nodes plus their directed dependencies.
///
/// Node order is irrelevant for correctness; it only serves as the
/// tie-break order when the graph builder seeds its queue. Edges may
/// reference ids missing from the node list; such references are treated
/// as no-ops during execution rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowGraph {
    #[serde(default)]
    nodes: Vec<Node>,

    #[serde(default)]
    edges: Vec<Edge>,
}

impl WorkflowGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // Builder methods

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges;
        self
    }

    // Getters

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by id
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// Build an id -> node lookup map
    pub fn node_map(&self) -> HashMap<&str, &Node> {
        self.nodes.iter().map(|n| (n.id(), n)).collect()
    }
}

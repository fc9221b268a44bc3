//! Directed dependency between two workflow nodes

use serde::{Deserialize, Serialize};

/// A directed edge from a source node to a target node.
///
/// Endpoints are plain node ids. References to ids missing from the node
/// list are tolerated by the graph builder rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    source: String,
    target: String,
}

impl Edge {
    /// Create a new edge
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Get the source node id
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the target node id
    pub fn target(&self) -> &str {
        &self.target
    }
}

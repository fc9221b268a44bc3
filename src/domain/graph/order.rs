//! Execution ordering via Kahn's topological sort
//!
//! The ordering is permissive: cycles are not detected, and edges may
//! reference undeclared ids. Nodes caught in a cycle never reach
//! in-degree zero and are silently omitted from the order, so they never
//! execute. Undeclared ids can surface in the order; the orchestrator skips
//! any id it cannot resolve.

use std::collections::{HashMap, HashSet, VecDeque};

use super::edge::Edge;
use super::node::Node;

/// Build an adjacency list (source id -> target ids) from the edge list.
///
/// Multiple edges may share a source; targets are kept in edge order.
pub fn adjacency(edges: &[Edge]) -> HashMap<String, Vec<String>> {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    for edge in edges {
        adjacency
            .entry(edge.source().to_string())
            .or_default()
            .push(edge.target().to_string());
    }
    adjacency
}

/// Compute a topological execution order over the declared nodes.
///
/// In-degrees are counted for every declared node id; edge targets missing
/// from the node list still get a counter entry. The queue is seeded with
/// zero-in-degree ids in the order they are first encountered while
/// scanning `nodes`; ties among equally-ready nodes follow that scan
/// order.
pub fn execution_order(nodes: &[Node], edges: &[Edge]) -> Vec<String> {
    let adjacency = adjacency(edges);

    let mut in_degree: HashMap<String, usize> = HashMap::new();
    for node in nodes {
        in_degree.entry(node.id().to_string()).or_insert(0);
    }
    for edge in edges {
        *in_degree.entry(edge.target().to_string()).or_insert(0) += 1;
    }

    let mut queue: VecDeque<String> = VecDeque::new();
    let mut seeded: HashSet<&str> = HashSet::new();
    for node in nodes {
        if in_degree.get(node.id()) == Some(&0) && seeded.insert(node.id()) {
            queue.push_back(node.id().to_string());
        }
    }

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(current) = queue.pop_front() {
        if let Some(targets) = adjacency.get(&current) {
            for target in targets {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(target.clone());
                    }
                }
            }
        }
        order.push(current);
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::node::{NodeKind, OutputConfig};

    fn node(id: &str) -> Node {
        Node::new(id, NodeKind::Output(OutputConfig::default()))
    }

    fn position(order: &[String], id: &str) -> usize {
        order
            .iter()
            .position(|n| n == id)
            .unwrap_or_else(|| panic!("'{}' missing from order {:?}", id, order))
    }

    #[test]
    fn test_adjacency_groups_targets_by_source() {
        let edges = vec![
            Edge::new("a", "b"),
            Edge::new("a", "c"),
            Edge::new("b", "d"),
        ];

        let adj = adjacency(&edges);
        assert_eq!(adj.get("a"), Some(&vec!["b".to_string(), "c".to_string()]));
        assert_eq!(adj.get("b"), Some(&vec!["d".to_string()]));
        assert!(adj.get("d").is_none());
    }

    #[test]
    fn test_linear_chain_order() {
        let nodes = vec![node("a"), node("b"), node("c")];
        let edges = vec![Edge::new("a", "b"), Edge::new("b", "c")];

        let order = execution_order(&nodes, &edges);
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_order_respects_every_edge() {
        // Diamond with an extra tail: a -> [b, c] -> d -> e
        let nodes = vec![node("a"), node("b"), node("c"), node("d"), node("e")];
        let edges = vec![
            Edge::new("a", "b"),
            Edge::new("a", "c"),
            Edge::new("b", "d"),
            Edge::new("c", "d"),
            Edge::new("d", "e"),
        ];

        let order = execution_order(&nodes, &edges);
        assert_eq!(order.len(), 5);
        for edge in &edges {
            assert!(
                position(&order, edge.source()) < position(&order, edge.target()),
                "edge {} -> {} violated in {:?}",
                edge.source(),
                edge.target(),
                order
            );
        }
    }

    #[test]
    fn test_ties_broken_by_node_scan_order() {
        // Two independent roots: declared order decides who goes first.
        let nodes = vec![node("second"), node("first"), node("sink")];
        let edges = vec![Edge::new("second", "sink"), Edge::new("first", "sink")];

        let order = execution_order(&nodes, &edges);
        assert_eq!(order, vec!["second", "first", "sink"]);
    }

    #[test]
    fn test_isolated_nodes_appear() {
        let nodes = vec![node("a"), node("lonely"), node("b")];
        let edges = vec![Edge::new("a", "b")];

        let order = execution_order(&nodes, &edges);
        assert_eq!(order, vec!["a", "lonely", "b"]);
    }

    #[test]
    fn test_cyclic_nodes_are_omitted_not_rejected() {
        // b and c form a cycle: they never reach in-degree zero, so they
        // drop out of the order without any error being surfaced.
        let nodes = vec![node("a"), node("b"), node("c"), node("d")];
        let edges = vec![
            Edge::new("a", "d"),
            Edge::new("b", "c"),
            Edge::new("c", "b"),
        ];

        let order = execution_order(&nodes, &edges);
        assert_eq!(order, vec!["a", "d"]);
    }

    #[test]
    fn test_self_loop_node_is_omitted() {
        let nodes = vec![node("a"), node("loop")];
        let edges = vec![Edge::new("loop", "loop"), Edge::new("a", "a-sink")];

        let order = execution_order(&nodes, &edges);
        assert!(!order.contains(&"loop".to_string()));
        assert_eq!(position(&order, "a"), 0);
    }

    #[test]
    fn test_dangling_target_can_enter_order() {
        // An edge to an undeclared id still counts it down to zero; the id
        // lands in the order and the orchestrator skips it at dispatch.
        let nodes = vec![node("a")];
        let edges = vec![Edge::new("a", "ghost")];

        let order = execution_order(&nodes, &edges);
        assert_eq!(order, vec!["a", "ghost"]);
    }

    #[test]
    fn test_dangling_source_never_releases_target() {
        // "ghost" is only an edge source, never declared: it is not seeded,
        // so its target stays blocked forever.
        let nodes = vec![node("a"), node("blocked")];
        let edges = vec![Edge::new("ghost", "blocked")];

        let order = execution_order(&nodes, &edges);
        assert_eq!(order, vec!["a"]);
    }

    #[test]
    fn test_duplicate_node_ids_seed_once() {
        let nodes = vec![node("a"), node("a"), node("b")];
        let edges = vec![Edge::new("a", "b")];

        let order = execution_order(&nodes, &edges);
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_graph() {
        let order = execution_order(&[], &[]);
        assert!(order.is_empty());
    }
}

//! Graph storage and offline validation.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::{DialogNode, NodeId};

/// Problems found while validating an authored graph.
///
/// Validation is an authoring-time aid. The engine itself never raises these
/// at play time; a dangling reference encountered during traversal is logged
/// and treated as an exhausted path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {from} lists missing continuation node {to}")]
    DanglingNextNode { from: NodeId, to: NodeId },

    #[error("response {index} of node {from} targets missing node {to}")]
    DanglingResponseTarget {
        from: NodeId,
        index: usize,
        to: NodeId,
    },

    #[error("condition-gated nodes starting at {start} form a fallback cycle")]
    GatedFallbackCycle { start: NodeId },
}

/// The authored conversation graph, immutable during play.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConversationGraph {
    nodes: HashMap<NodeId, DialogNode>,
}

impl ConversationGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph.
    ///
    /// Returns the node ID for reference. A node with the same ID is
    /// replaced.
    pub fn add_node(&mut self, node: DialogNode) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&DialogNode> {
        self.nodes.get(&id)
    }

    /// Check whether a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get the total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes in the graph.
    pub fn all_nodes(&self) -> impl Iterator<Item = &DialogNode> {
        self.nodes.values()
    }

    /// Verify that every continuation and response target resolves.
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), GraphError> {
        for node in self.nodes.values() {
            for &target in &node.next_nodes {
                if !self.contains(target) {
                    return Err(GraphError::DanglingNextNode {
                        from: node.id,
                        to: target,
                    });
                }
            }
            for (index, response) in node.responses.iter().enumerate() {
                if let Some(target) = response.next_node {
                    if !self.contains(target) {
                        return Err(GraphError::DanglingResponseTarget {
                            from: node.id,
                            index,
                            to: target,
                        });
                    }
                }
            }
        }

        // A chain of condition-gated nodes linked by their first
        // continuations must not loop back on itself: were every gate in
        // the loop to fail at play time, the entry cascade could never
        // settle. An unconditioned node anywhere in the chain breaks it.
        for node in self.nodes.values() {
            if node.conditions.is_empty() {
                continue;
            }
            let mut seen = HashSet::new();
            let mut cursor = node.id;
            loop {
                if !seen.insert(cursor) {
                    return Err(GraphError::GatedFallbackCycle { start: node.id });
                }
                let Some(current) = self.nodes.get(&cursor) else {
                    break;
                };
                if current.conditions.is_empty() {
                    break;
                }
                match current.next_nodes.first() {
                    Some(&next) => cursor = next,
                    None => break,
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Condition, Response};
    use uuid::Uuid;

    #[test]
    fn test_add_and_get_node() {
        let mut graph = ConversationGraph::new();

        let id = graph.add_node(DialogNode::new("Welcome to the village."));

        assert_eq!(graph.node_count(), 1);
        let node = graph.node(id);
        assert!(node.is_some());
        assert_eq!(node.unwrap().text, "Welcome to the village.");
    }

    #[test]
    fn test_missing_node_lookup() {
        let graph = ConversationGraph::new();
        assert!(graph.node(NodeId::new()).is_none());
    }

    #[test]
    fn test_validate_ok() {
        let mut graph = ConversationGraph::new();

        let leaf = graph.add_node(DialogNode::new("Goodbye."));
        graph.add_node(
            DialogNode::new("Hello.")
                .with_next_node(leaf)
                .with_response(Response::new("Bye.").with_next_node(leaf)),
        );

        assert_eq!(graph.validate(), Ok(()));
    }

    #[test]
    fn test_validate_dangling_next_node() {
        let mut graph = ConversationGraph::new();

        let missing = NodeId::new();
        let from = graph.add_node(DialogNode::new("Hello.").with_next_node(missing));

        assert_eq!(
            graph.validate(),
            Err(GraphError::DanglingNextNode { from, to: missing })
        );
    }

    #[test]
    fn test_validate_dangling_response_target() {
        let mut graph = ConversationGraph::new();

        let missing = NodeId::new();
        let from = graph.add_node(
            DialogNode::new("Hello.").with_response(Response::new("Hi.").with_next_node(missing)),
        );

        let err = graph.validate().unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingResponseTarget {
                from,
                index: 0,
                to: missing,
            }
        );
    }

    #[test]
    fn test_validate_gated_fallback_cycle() {
        let mut graph = ConversationGraph::new();

        let mut a = DialogNode::new("A.").with_condition(Condition::flag_set("a"));
        let mut b = DialogNode::new("B.").with_condition(Condition::flag_set("b"));
        a = a.with_next_node(b.id);
        b = b.with_next_node(a.id);
        graph.add_node(a);
        graph.add_node(b);

        assert!(matches!(
            graph.validate(),
            Err(GraphError::GatedFallbackCycle { .. })
        ));
    }

    #[test]
    fn test_validate_cycle_broken_by_unconditioned_node_is_ok() {
        let mut graph = ConversationGraph::new();

        let mut gated = DialogNode::new("Gated.").with_condition(Condition::flag_set("k"));
        let mut open = DialogNode::new("Open.");
        gated = gated.with_next_node(open.id);
        open = open.with_next_node(gated.id);
        graph.add_node(gated);
        graph.add_node(open);

        assert_eq!(graph.validate(), Ok(()));
    }

    #[test]
    fn test_authored_json_ignores_reserved_fields() {
        // Old exports carry a legacy singular nextNode, separate set/clear
        // lists on responses, a consumeTime marker, and condition scope
        // fields. None of those are read.
        let id = Uuid::new_v4();
        let raw = format!(
            r#"{{
                "id": "{id}",
                "text": "Care to trade?",
                "nextNode": "{id}",
                "responses": [
                    {{
                        "text": "Show me your wares.",
                        "flagsToSet": ["shop_open"],
                        "flagsToClear": [],
                        "consumeTime": true,
                        "conditions": [
                            {{"flag_key": "shop_open", "required_value": false, "scope": "scene", "default": false}}
                        ]
                    }}
                ]
            }}"#
        );

        let node: DialogNode = serde_json::from_str(&raw).unwrap();

        assert_eq!(node.id, NodeId::from_uuid(id));
        assert!(node.next_nodes.is_empty());
        assert_eq!(node.responses.len(), 1);
        assert!(node.responses[0].flag_changes.is_empty());
        assert_eq!(
            node.responses[0].conditions,
            vec![Condition::flag_clear("shop_open")]
        );
    }
}

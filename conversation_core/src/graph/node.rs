//! Node definitions - the records the traversal engine walks.

use dialog_state::SpeakerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for dialog nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a node ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A boolean check against the flag store.
///
/// Gates entry of a node or offering of a response: the condition holds when
/// the live flag value equals `required_value`. Authoring data may also carry
/// scope and default-value fields; those are reserved and never read here,
/// so they are simply ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub flag_key: String,
    pub required_value: bool,
}

impl Condition {
    /// Create a condition on the given flag.
    pub fn new(flag_key: impl Into<String>, required_value: bool) -> Self {
        Self {
            flag_key: flag_key.into(),
            required_value,
        }
    }

    /// Condition that holds while the flag is set.
    pub fn flag_set(flag_key: impl Into<String>) -> Self {
        Self::new(flag_key, true)
    }

    /// Condition that holds while the flag is clear (or never written).
    pub fn flag_clear(flag_key: impl Into<String>) -> Self {
        Self::new(flag_key, false)
    }
}

/// An unconditional flag write applied as a traversal side effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagChange {
    pub flag_key: String,
    pub value: bool,
}

impl FlagChange {
    /// Create a flag change writing the given value.
    pub fn new(flag_key: impl Into<String>, value: bool) -> Self {
        Self {
            flag_key: flag_key.into(),
            value,
        }
    }

    /// Flag change that sets the flag.
    pub fn set(flag_key: impl Into<String>) -> Self {
        Self::new(flag_key, true)
    }

    /// Flag change that clears the flag.
    pub fn clear(flag_key: impl Into<String>) -> Self {
        Self::new(flag_key, false)
    }
}

/// A player-facing choice attached to a node.
///
/// Older authoring exports use an alternate schema with separate flag-set and
/// flag-clear lists and a consume-time marker; those fields are reserved,
/// never read, and dropped on deserialization. Only the fields below are
/// consulted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Display text shown to the player.
    pub text: String,

    /// Continuation entered when this response is chosen. When absent the
    /// current node's own continuations are resolved instead.
    #[serde(default)]
    pub next_node: Option<NodeId>,

    /// Conditions gating whether this response is offered at all.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Flag changes applied when this response is chosen, before the
    /// continuation is resolved.
    #[serde(default)]
    pub flag_changes: Vec<FlagChange>,
}

impl Response {
    /// Create a response with the given display text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_node: None,
            conditions: Vec::new(),
            flag_changes: Vec::new(),
        }
    }

    /// Set the continuation node.
    pub fn with_next_node(mut self, target: NodeId) -> Self {
        self.next_node = Some(target);
        self
    }

    /// Add a gating condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a flag change.
    pub fn with_flag_change(mut self, change: FlagChange) -> Self {
        self.flag_changes.push(change);
        self
    }
}

/// A unit of dialog.
///
/// The display payload (`text`, `speaker`) is opaque to the engine and only
/// carried through to the presentation layer. A legacy singular `nextNode`
/// authoring field still appears in old exports; continuation always goes
/// through `next_nodes` and response targets, so it is ignored on
/// deserialization like every other unknown field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogNode {
    pub id: NodeId,

    /// The line spoken when this node is entered.
    pub text: String,

    /// Who speaks this line, if anyone.
    #[serde(default)]
    pub speaker: Option<SpeakerId>,

    /// Player choices offered at this node (possibly empty).
    #[serde(default)]
    pub responses: Vec<Response>,

    /// Branching continuations, in authored priority order.
    #[serde(default)]
    pub next_nodes: Vec<NodeId>,

    /// Conditions gating entry of this node.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Flag changes applied when this node is successfully entered.
    #[serde(default)]
    pub flag_changes: Vec<FlagChange>,
}

impl DialogNode {
    /// Create a new node with the given display text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            text: text.into(),
            speaker: None,
            responses: Vec::new(),
            next_nodes: Vec::new(),
            conditions: Vec::new(),
            flag_changes: Vec::new(),
        }
    }

    /// Set the speaker.
    pub fn with_speaker(mut self, speaker: SpeakerId) -> Self {
        self.speaker = Some(speaker);
        self
    }

    /// Add a player response.
    pub fn with_response(mut self, response: Response) -> Self {
        self.responses.push(response);
        self
    }

    /// Add a branching continuation.
    pub fn with_next_node(mut self, target: NodeId) -> Self {
        self.next_nodes.push(target);
        self
    }

    /// Add a gating condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a flag change applied on entry.
    pub fn with_flag_change(mut self, change: FlagChange) -> Self {
        self.flag_changes.push(change);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let target = NodeId::new();
        let node = DialogNode::new("Hello, traveller.")
            .with_next_node(target)
            .with_condition(Condition::flag_set("met_before"))
            .with_flag_change(FlagChange::set("greeted"));

        assert_eq!(node.text, "Hello, traveller.");
        assert_eq!(node.next_nodes, vec![target]);
        assert_eq!(node.conditions.len(), 1);
        assert_eq!(node.flag_changes, vec![FlagChange::set("greeted")]);
        assert!(node.responses.is_empty());
    }

    #[test]
    fn test_response_builder() {
        let target = NodeId::new();
        let response = Response::new("Tell me more.")
            .with_next_node(target)
            .with_flag_change(FlagChange::clear("rumor_fresh"));

        assert_eq!(response.next_node, Some(target));
        assert!(response.conditions.is_empty());
        assert_eq!(response.flag_changes.len(), 1);
    }

    #[test]
    fn test_condition_helpers() {
        assert_eq!(
            Condition::flag_set("k"),
            Condition {
                flag_key: "k".to_string(),
                required_value: true
            }
        );
        assert_eq!(
            Condition::flag_clear("k"),
            Condition {
                flag_key: "k".to_string(),
                required_value: false
            }
        );
    }
}

//! Conversation Engine - walks the authored graph, gated by live flags.
//!
//! Traversal follows two distinct rules:
//! 1. **Gate & cascade** on node entry: a node whose entry conditions fail is
//!    never entered; its own first continuation is tried in its place,
//!    recursively, until a node passes or the chain runs out.
//! 2. **Eligible-next selection** on explicit advance/selection: among a
//!    node's continuations, condition-passing candidates are preferred over
//!    unconditioned ones, in authored order.
//!
//! Every public operation runs to completion synchronously, never raises an
//! error for a traversal condition, and always leaves the engine in a
//! defined state: idle, or parked on an entered node with a fresh response
//! snapshot.

pub mod resolve;

use log::{debug, info, warn};
use std::collections::HashSet;

use dialog_state::SpeakerId;

use crate::context::ConversationContext;
use crate::events::{ConversationEvent, ConversationListener};
use crate::graph::{ConversationGraph, FlagChange, NodeId, Response};

/// The engine's externally observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationStatus {
    /// No conversation active.
    Idle,
    /// The current node offers responses; waiting for a selection.
    AwaitingResponse,
    /// No responses, but continuations exist; waiting for an advance.
    AwaitingAdvance,
    /// A terminal leaf: no responses, no continuations. Parked until the
    /// host ends the conversation.
    Terminal,
}

/// Orchestrates traversal over one conversation graph.
///
/// Holds the only mutable traversal state; the graph is immutable during
/// play and only the flag store changes over time, altering which branches
/// are eligible. Not designed for concurrent invocation - all calls are
/// expected from one logical execution context.
pub struct ConversationEngine {
    graph: ConversationGraph,
    context: ConversationContext,
    current_node: Option<NodeId>,
    current_speaker: Option<SpeakerId>,
    /// Snapshot of offerable responses, recomputed exactly once per entry.
    active_responses: Vec<Response>,
    /// Scene identifiers whose first-talk signal already fired this run.
    first_talk_seen: HashSet<String>,
    listeners: Vec<Box<dyn ConversationListener>>,
}

impl ConversationEngine {
    /// Create an engine over the given graph and host context.
    pub fn new(graph: ConversationGraph, context: ConversationContext) -> Self {
        Self {
            graph,
            context,
            current_node: None,
            current_speaker: None,
            active_responses: Vec::new(),
            first_talk_seen: HashSet::new(),
            listeners: Vec::new(),
        }
    }

    /// Register a lifecycle event listener.
    ///
    /// Listeners are invoked synchronously, in registration order, once per
    /// event occurrence.
    pub fn add_listener(&mut self, listener: impl ConversationListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Begin a conversation at `root` with the given speaker.
    ///
    /// A `None` root ends any active conversation and returns; when already
    /// idle this is a pure no-op. Entry may cascade through several gated
    /// nodes before settling, and may end the conversation immediately if no
    /// enterable node exists.
    pub fn start_conversation(&mut self, root: Option<NodeId>, speaker: SpeakerId) {
        let Some(root) = root else {
            if self.current_node.is_some() {
                self.end_conversation();
            }
            return;
        };

        info!("Starting conversation at node {}", root);
        self.current_speaker = Some(speaker);
        self.enter_node(Some(root));
    }

    /// Choose one of the currently offered responses.
    ///
    /// Silent no-op when idle or when `index` is outside the active response
    /// list. Otherwise the response's flag changes are applied first, then
    /// its continuation is resolved: an explicit target wins, else the
    /// current node's continuations are resolved, else the conversation
    /// ends.
    pub fn select_response(&mut self, index: usize) {
        let Some(current) = self.current_node else {
            return;
        };
        let Some(response) = self.active_responses.get(index).cloned() else {
            debug!("Ignoring response index {} at node {}", index, current);
            return;
        };

        self.apply_flag_changes(&response.flag_changes);

        if let Some(target) = response.next_node {
            self.enter_node(Some(target));
        } else if self.node_has_continuations(current) {
            self.advance_from(current);
        } else {
            self.end_conversation();
        }
    }

    /// Move on from a node with no offered responses.
    ///
    /// Valid only while responses are empty and the current node has
    /// continuations; otherwise a no-op.
    pub fn advance_to_next_node(&mut self) {
        let Some(current) = self.current_node else {
            return;
        };
        if !self.active_responses.is_empty() || !self.node_has_continuations(current) {
            return;
        }
        self.advance_from(current);
    }

    /// End the conversation and return to idle.
    ///
    /// Idempotent by contract: callers may call defensively, and the ended
    /// event fires on every call even when already idle.
    pub fn end_conversation(&mut self) {
        if let Some(current) = self.current_node {
            info!("Conversation ended at node {}", current);
            self.emit(ConversationEvent::NodeExited(current));
        }
        self.current_node = None;
        self.current_speaker = None;
        self.active_responses.clear();
        self.emit(ConversationEvent::ConversationEnded);
    }

    /// The branch resolver's candidate list for the current node.
    ///
    /// Read-only and side-effect-free; empty when idle. The first entry is
    /// the node an advance would resolve to.
    pub fn next_eligible_nodes(&self) -> Vec<NodeId> {
        self.current_node
            .and_then(|id| self.graph.node(id))
            .map(|node| resolve::eligible_next(&self.context, &self.graph, node))
            .unwrap_or_default()
    }

    /// Clear scene-scoped flags and re-arm first-talk for matching scenes.
    ///
    /// First-talk entries are matched by key prefix, mirroring the flag
    /// store's scoped clearing.
    pub fn clear_scoped_flags(&mut self, scene_id: &str) {
        self.context.clear_scene_flags(scene_id);
        self.first_talk_seen.retain(|seen| !seen.starts_with(scene_id));
    }

    /// The current node, if a conversation is active.
    pub fn current_node(&self) -> Option<NodeId> {
        self.current_node
    }

    /// The speaker of the active conversation.
    pub fn current_speaker(&self) -> Option<SpeakerId> {
        self.current_speaker
    }

    /// The response snapshot computed when the current node was entered.
    pub fn active_responses(&self) -> &[Response] {
        &self.active_responses
    }

    /// Derive the engine's observable state.
    pub fn status(&self) -> ConversationStatus {
        let Some(current) = self.current_node else {
            return ConversationStatus::Idle;
        };
        if !self.active_responses.is_empty() {
            ConversationStatus::AwaitingResponse
        } else if self.node_has_continuations(current) {
            ConversationStatus::AwaitingAdvance
        } else {
            ConversationStatus::Terminal
        }
    }

    /// The graph this engine traverses.
    pub fn graph(&self) -> &ConversationGraph {
        &self.graph
    }

    /// The host context (flag store and scene source).
    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    /// Mutable host context access, e.g. for direct flag writes.
    pub fn context_mut(&mut self) -> &mut ConversationContext {
        &mut self.context
    }

    /// Attempt to enter a node, applying the gate-and-cascade rule.
    ///
    /// A `None` or dangling reference ends the conversation. A node whose
    /// entry conditions fail is replaced by its own first continuation,
    /// repeatedly, until a node passes or the chain runs out. A fallback
    /// chain that revisits a node within one cascade is an exhausted path:
    /// the cascade must terminate even on cyclic authored data.
    fn enter_node(&mut self, id: Option<NodeId>) {
        let mut next = id;
        let mut visited = HashSet::new();

        loop {
            let Some(id) = next else {
                self.end_conversation();
                return;
            };
            if !visited.insert(id) {
                warn!("Gate cascade revisited node {}; ending conversation", id);
                self.end_conversation();
                return;
            }
            let Some(node) = self.graph.node(id).cloned() else {
                warn!("Continuation references missing node {}; ending conversation", id);
                self.end_conversation();
                return;
            };

            if !resolve::conditions_pass(&self.context, &node.conditions) {
                debug!(
                    "Entry gate failed for node {}; falling back to its first continuation",
                    id
                );
                next = node.next_nodes.first().copied();
                continue;
            }

            self.current_node = Some(id);
            self.emit(ConversationEvent::NodeEntered(id));
            self.apply_flag_changes(&node.flag_changes);
            self.mark_first_talk();
            self.active_responses = resolve::filter_responses(&self.context, &node.responses);

            // Advance-ready hint: the node stays current, the host may now
            // call advance_to_next_node. A terminal leaf emits nothing and
            // parks.
            if self.active_responses.is_empty() && !node.next_nodes.is_empty() {
                self.emit(ConversationEvent::NodeExited(id));
            }
            return;
        }
    }

    /// Resolve the best continuation from `from` and enter it, or end the
    /// conversation when resolution yields nothing.
    fn advance_from(&mut self, from: NodeId) {
        let candidate = self
            .graph
            .node(from)
            .map(|node| resolve::eligible_next(&self.context, &self.graph, node))
            .and_then(|eligible| eligible.first().copied());

        match candidate {
            Some(next) => {
                debug!("Advancing {} -> {}", from, next);
                self.enter_node(Some(next));
            }
            None => {
                debug!("No eligible continuation from node {}", from);
                self.end_conversation();
            }
        }
    }

    fn node_has_continuations(&self, id: NodeId) -> bool {
        self.graph
            .node(id)
            .map(|node| !node.next_nodes.is_empty())
            .unwrap_or(false)
    }

    fn apply_flag_changes(&mut self, changes: &[FlagChange]) {
        for change in changes {
            self.context.set_flag(&change.flag_key, change.value);
        }
    }

    /// Fire the once-per-scene-per-run first-talk signal.
    fn mark_first_talk(&mut self) {
        let scene = self.context.active_scene_id();
        if self.first_talk_seen.insert(scene.clone()) {
            self.emit(ConversationEvent::FirstTimeTalk(scene));
        }
    }

    fn emit(&mut self, event: ConversationEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }
}

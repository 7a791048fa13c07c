//! Lifecycle events emitted to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Notifications fired by the engine as traversal progresses.
///
/// Delivery is synchronous and ordered: every registered listener sees every
/// event exactly once per occurrence, on the calling thread, before the
/// engine operation returns. Events carry identifiers; the host resolves
/// display payload through the engine's graph accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationEvent {
    /// A node became current.
    NodeEntered(NodeId),

    /// The current node is departing (conversation ending) or, when it has
    /// continuations and no offerable responses, signaling that the host may
    /// now advance. The node stays current in the latter case.
    NodeExited(NodeId),

    /// First node entry while in the named scene this run.
    FirstTimeTalk(String),

    /// The conversation returned to idle.
    ConversationEnded,
}

/// A registered recipient of conversation events.
pub trait ConversationListener {
    /// Called once per event occurrence, in emission order.
    fn on_event(&mut self, event: &ConversationEvent);
}

impl<F> ConversationListener for F
where
    F: FnMut(&ConversationEvent),
{
    fn on_event(&mut self, event: &ConversationEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |event: &ConversationEvent| seen.push(event.clone());
            listener.on_event(&ConversationEvent::ConversationEnded);
        }
        assert_eq!(seen, vec![ConversationEvent::ConversationEnded]);
    }
}

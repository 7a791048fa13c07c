//! Conversation graph - the authored, immutable-during-play dialog data.
//!
//! The graph consists of:
//! - **Nodes**: units of dialog with gating conditions, flag side effects,
//!   player responses, and branching continuations
//! - **Responses**: conditionally offered player choices attached to nodes
//! - **Conditions / flag changes**: the read and write halves of the link
//!   between traversal and the flag store

mod node;
mod store;

pub use node::*;
pub use store::*;

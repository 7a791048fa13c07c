//! # Conversation Core
//!
//! The conversation graph traversal engine. This crate walks a directed
//! graph of authored dialog nodes, gates traversal on boolean flags from
//! `dialog_state`, filters branch-dependent player choices, applies flag
//! mutations as side effects, and emits lifecycle events to a presentation
//! layer.
//!
//! ## Core Components
//!
//! - **graph**: the immutable-during-play node/response/condition records
//! - **engine**: the orchestrator holding traversal state and the public
//!   contract, plus the pure condition/filter/resolution functions
//! - **events**: lifecycle notifications for host<->engine communication
//! - **context**: the host-supplied collaborators (flag store, scene source)
//!
//! ## Design Philosophy
//!
//! - **Flag-Driven**: nodes never change during play; only flags do, and
//!   they alone decide which branches are eligible
//! - **Never Throws**: exhausted graphs, missing collaborators, and invalid
//!   input all resolve into defined states or logged, non-fatal diagnostics
//! - **Host-Paced**: the engine runs synchronously to completion on every
//!   call; all waiting belongs to the presentation layer

pub mod context;
pub mod engine;
pub mod events;
pub mod graph;

pub use context::*;
pub use engine::*;
pub use events::*;
pub use graph::*;

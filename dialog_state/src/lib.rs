//! # Dialog State
//!
//! The "source of truth" crate - boolean conversation flags, the active-scene
//! context, and speaker identities. This is the state the engine in
//! `conversation_core` evaluates conditions against and mutates through flag
//! changes; it contains no traversal logic of its own.

pub mod flags;
pub mod scene;
pub mod speaker;

pub use flags::*;
pub use scene::*;
pub use speaker::*;

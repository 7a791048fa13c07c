//! Speaker identities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a speaking character.
///
/// Opaque to the conversation engine - it is carried through to the
/// presentation layer, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeakerId(pub Uuid);

impl SpeakerId {
    /// Create a new random speaker ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a speaker ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty speaker ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for SpeakerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Flag storage - the boolean key-value state conversations read and write.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The flag storage contract the conversation engine runs against.
///
/// Hosts may back this with anything (save files, network state, a plain
/// map); the engine only needs these three operations.
pub trait FlagStore {
    /// Read a flag. An absent key reads as `false`.
    fn get_flag(&self, key: &str) -> bool;

    /// Write a flag unconditionally.
    fn set_flag(&mut self, key: &str, value: bool);

    /// Remove every flag scoped to the given scene.
    ///
    /// Scoping is by key prefix: a flag belongs to a scene when its key
    /// starts with the scene identifier (see [`scoped_flag_key`]).
    fn clear_flags_for_scene(&mut self, scene_id: &str);
}

/// Build a scene-scoped flag key by convention.
///
/// Flags named this way are removed by `clear_flags_for_scene(scene_id)`.
pub fn scoped_flag_key(scene_id: &str, name: &str) -> String {
    format!("{}.{}", scene_id, name)
}

/// In-memory flag store backed by a `HashMap`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InMemoryFlagStore {
    flags: HashMap<String, bool>,
}

impl InMemoryFlagStore {
    /// Create a new empty flag store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a flag has ever been written.
    pub fn contains(&self, key: &str) -> bool {
        self.flags.contains_key(key)
    }

    /// Number of flags currently stored.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Iterate over all stored flags.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FlagStore for InMemoryFlagStore {
    fn get_flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }

    fn clear_flags_for_scene(&mut self, scene_id: &str) {
        let before = self.flags.len();
        self.flags.retain(|key, _| !key.starts_with(scene_id));
        debug!(
            "Cleared {} flag(s) for scene '{}'",
            before - self.flags.len(),
            scene_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_flag_reads_false() {
        let store = InMemoryFlagStore::new();
        assert!(!store.get_flag("never_set"));
    }

    #[test]
    fn test_set_and_get() {
        let mut store = InMemoryFlagStore::new();

        store.set_flag("met_elder", true);
        assert!(store.get_flag("met_elder"));

        store.set_flag("met_elder", false);
        assert!(!store.get_flag("met_elder"));
        assert!(store.contains("met_elder"));
    }

    #[test]
    fn test_scoped_clear_is_prefix_match() {
        let mut store = InMemoryFlagStore::new();
        assert!(store.is_empty());

        store.set_flag(&scoped_flag_key("Village", "met_elder"), true);
        store.set_flag(&scoped_flag_key("Village", "bought_bread"), true);
        store.set_flag(&scoped_flag_key("Castle", "met_king"), true);
        assert_eq!(store.len(), 3);

        store.clear_flags_for_scene("Village");

        assert!(!store.contains("Village.met_elder"));
        assert!(!store.contains("Village.bought_bread"));
        assert!(store.get_flag("Castle.met_king"));

        let remaining: Vec<_> = store.iter().collect();
        assert_eq!(remaining, vec![("Castle.met_king", true)]);
    }

    #[test]
    fn test_scoped_clear_matches_bare_prefix() {
        let mut store = InMemoryFlagStore::new();

        // A scene whose name is a prefix of another also matches its flags.
        store.set_flag("VillageOutskirts.gate_open", true);
        store.clear_flags_for_scene("Village");

        assert!(!store.contains("VillageOutskirts.gate_open"));
    }

    #[test]
    fn test_scoped_flag_key() {
        assert_eq!(scoped_flag_key("Village", "met_elder"), "Village.met_elder");
    }
}

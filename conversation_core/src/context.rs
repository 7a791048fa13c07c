//! Host context - the collaborators the engine runs against.

use dialog_state::{FlagStore, SceneSource};
use log::warn;

/// Everything the host supplies to a conversation engine.
///
/// An explicit context object: collaborators are handed in here rather than
/// reached through global state. The flag store is optional by contract -
/// a host without one gets degraded but well-defined behavior (reads fail
/// open, writes are skipped with a diagnostic).
pub struct ConversationContext {
    flag_store: Option<Box<dyn FlagStore>>,
    scene: Box<dyn SceneSource>,
}

impl ConversationContext {
    /// Create a context with the given scene source and no flag store.
    pub fn new(scene: impl SceneSource + 'static) -> Self {
        Self {
            flag_store: None,
            scene: Box::new(scene),
        }
    }

    /// Attach a flag store.
    pub fn with_flag_store(mut self, store: impl FlagStore + 'static) -> Self {
        self.flag_store = Some(Box::new(store));
        self
    }

    /// Whether a flag store is registered.
    pub fn has_flag_store(&self) -> bool {
        self.flag_store.is_some()
    }

    /// Access the registered flag store, if any.
    pub fn flag_store(&self) -> Option<&dyn FlagStore> {
        self.flag_store.as_deref()
    }

    /// Mutable access to the registered flag store, if any.
    ///
    /// The explicit `'static` bound keeps the trait-object lifetime from
    /// being pinned to this borrow (mutable references are invariant over
    /// their pointee).
    pub fn flag_store_mut(&mut self) -> Option<&mut (dyn FlagStore + 'static)> {
        self.flag_store.as_deref_mut()
    }

    /// Read a flag from the registered store. An absent key reads `false`.
    ///
    /// Only meaningful when a store is registered; condition evaluation
    /// checks [`has_flag_store`](Self::has_flag_store) first and fails open
    /// when there is none.
    pub fn flag_value(&self, key: &str) -> bool {
        self.flag_store
            .as_deref()
            .map(|store| store.get_flag(key))
            .unwrap_or(false)
    }

    /// Write a flag. Skipped with a diagnostic when no store is registered.
    pub fn set_flag(&mut self, key: &str, value: bool) {
        match self.flag_store.as_deref_mut() {
            Some(store) => store.set_flag(key, value),
            None => warn!("No flag store registered; skipping write {}={}", key, value),
        }
    }

    /// Clear all scene-scoped flags. Skipped with a diagnostic when no store
    /// is registered.
    pub fn clear_scene_flags(&mut self, scene_id: &str) {
        match self.flag_store.as_deref_mut() {
            Some(store) => store.clear_flags_for_scene(scene_id),
            None => warn!(
                "No flag store registered; skipping flag clear for scene '{}'",
                scene_id
            ),
        }
    }

    /// Identifier of the currently active scene.
    pub fn active_scene_id(&self) -> String {
        self.scene.active_scene_id()
    }
}

impl std::fmt::Debug for ConversationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationContext")
            .field("has_flag_store", &self.has_flag_store())
            .field("active_scene_id", &self.active_scene_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialog_state::{FlagStore, InMemoryFlagStore, StaticScene};

    #[test]
    fn test_flag_store_mut_reaches_the_store() {
        let mut ctx = ConversationContext::new(StaticScene::new("Village"))
            .with_flag_store(InMemoryFlagStore::new());

        assert!(ctx.flag_store().is_some());
        ctx.flag_store_mut().unwrap().set_flag("direct", true);
        assert!(ctx.flag_value("direct"));
    }

    #[test]
    fn test_reads_without_store_default_false() {
        let ctx = ConversationContext::new(StaticScene::new("Village"));

        assert!(!ctx.has_flag_store());
        assert!(!ctx.flag_value("anything"));
    }

    #[test]
    fn test_writes_without_store_are_skipped() {
        let mut ctx = ConversationContext::new(StaticScene::new("Village"));

        // Must not panic; the write is dropped.
        ctx.set_flag("anything", true);
        ctx.clear_scene_flags("Village");
        assert!(!ctx.flag_value("anything"));
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut ctx = ConversationContext::new(StaticScene::new("Village"))
            .with_flag_store(InMemoryFlagStore::new());

        ctx.set_flag("met_elder", true);
        assert!(ctx.flag_value("met_elder"));

        ctx.clear_scene_flags("met");
        assert!(!ctx.flag_value("met_elder"));
    }

    #[test]
    fn test_active_scene() {
        let ctx = ConversationContext::new(StaticScene::new("Castle"));
        assert_eq!(ctx.active_scene_id(), "Castle");
    }
}

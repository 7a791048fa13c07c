//! Scene context - which scene the host is currently in.

/// Supplies the active scene identifier.
///
/// The engine keys first-talk bookkeeping and scoped flag clearing on this
/// string; the host decides what a "scene" is (a loaded level, a chapter,
/// a screen).
pub trait SceneSource {
    /// Identifier of the currently active scene.
    fn active_scene_id(&self) -> String;
}

/// A scene source that always reports the same scene.
///
/// Useful for single-scene hosts and tests.
#[derive(Debug, Clone)]
pub struct StaticScene {
    scene_id: String,
}

impl StaticScene {
    /// Create a static scene source for the given identifier.
    pub fn new(scene_id: impl Into<String>) -> Self {
        Self {
            scene_id: scene_id.into(),
        }
    }
}

impl SceneSource for StaticScene {
    fn active_scene_id(&self) -> String {
        self.scene_id.clone()
    }
}

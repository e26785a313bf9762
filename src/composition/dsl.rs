use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    animation::ease::Ease,
    composition::model::{Composition, CompositionDef},
    foundation::core::Fps,
    foundation::error::{FramecueError, FramecueResult},
    scene::spec::{Scene, SceneSpec},
};

/// Fluent construction of a [`Composition`].
pub struct CompositionBuilder {
    id: String,
    fps: Fps,
    duration_frames: Option<u64>,
    transition_frames: u64,
    transition_ease: Ease,
    assets: BTreeMap<String, String>,
    asset_root: PathBuf,
    scenes: Vec<SceneSpec>,
}

impl CompositionBuilder {
    /// Start an empty composition.
    pub fn new(id: impl Into<String>, fps: Fps) -> Self {
        Self {
            id: id.into(),
            fps,
            duration_frames: None,
            transition_frames: 0,
            transition_ease: Ease::Linear,
            assets: BTreeMap::new(),
            asset_root: PathBuf::from("."),
            scenes: Vec::new(),
        }
    }

    /// Declare the expected total length; `build` fails when the scenes disagree.
    pub fn duration_frames(mut self, frames: u64) -> Self {
        self.duration_frames = Some(frames);
        self
    }

    /// Cross-fade adjacent scenes over `frames`.
    pub fn transition(mut self, frames: u64, ease: Ease) -> Self {
        self.transition_frames = frames;
        self.transition_ease = ease;
        self
    }

    /// Register a JSON asset under `key`.
    pub fn asset(
        mut self,
        key: impl Into<String>,
        source: impl Into<String>,
    ) -> FramecueResult<Self> {
        let key = key.into();
        if self.assets.contains_key(&key) {
            return Err(FramecueError::validation(format!(
                "duplicate asset key '{key}'"
            )));
        }
        self.assets.insert(key, source.into());
        Ok(self)
    }

    /// Directory assets are resolved against.
    pub fn asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Append a scene.
    pub fn scene(mut self, scene: Scene) -> Self {
        self.scenes.push(scene.into_spec());
        self
    }

    /// Authored definition without building.
    pub fn into_def(self) -> CompositionDef {
        CompositionDef {
            id: self.id,
            fps: self.fps,
            duration_frames: self.duration_frames,
            transition_frames: self.transition_frames,
            transition_ease: self.transition_ease,
            assets: self.assets,
            scenes: self.scenes,
        }
    }

    /// Validate, lay out and load assets.
    pub fn build(self) -> FramecueResult<Composition> {
        let root = self.asset_root.clone();
        Composition::from_def_with_root(self.into_def(), &root)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;

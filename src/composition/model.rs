use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use anyhow::Context;

use crate::{
    animation::ease::Ease,
    assets::{PreparedAssets, loader::ReadinessGate},
    composition::registry::DurationRegistry,
    foundation::core::Fps,
    foundation::error::{FramecueError, FramecueResult},
    scene::spec::{Scene, SceneSpec},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Authored composition: a frame rate, scene sequence and assets.
///
/// This is the JSON authoring format. Build a [`Composition`] from it to render.
pub struct CompositionDef {
    /// Composition identifier.
    pub id: String,
    /// Timeline frame rate.
    #[serde(default)]
    pub fps: Fps,
    /// Declared total length; checked against the scene layout when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_frames: Option<u64>,
    /// Cross-fade overlap between adjacent scenes.
    #[serde(default)]
    pub transition_frames: u64,
    /// Easing of the cross-fade progress.
    #[serde(default)]
    pub transition_ease: Ease,
    /// JSON assets (`key -> source path`), loaded once when the composition is built.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, String>,
    /// Scenes in playback order.
    pub scenes: Vec<SceneSpec>,
}

#[derive(Clone, Debug)]
/// Validated, render-ready composition.
///
/// Holds validated scenes, their layout and prepared assets. Rendering never performs IO.
pub struct Composition {
    def: CompositionDef,
    scenes: Vec<Scene>,
    registry: DurationRegistry,
    assets: PreparedAssets,
}

impl Composition {
    /// Build with assets resolved against the current directory.
    pub fn from_def(def: CompositionDef) -> FramecueResult<Self> {
        Self::from_def_with_root(def, Path::new("."))
    }

    /// Validate `def`, lay out its scenes and load its assets from `root`.
    pub fn from_def_with_root(def: CompositionDef, root: &Path) -> FramecueResult<Self> {
        Self::from_def_with_gate(def, root, &ReadinessGate::new())
    }

    /// Like [`Composition::from_def_with_root`], blocking `gate` while assets load.
    ///
    /// Hosts that share `gate` hold their first render until it reports ready.
    #[tracing::instrument(skip(def, root, gate), fields(id = %def.id, scenes = def.scenes.len()))]
    pub fn from_def_with_gate(
        def: CompositionDef,
        root: &Path,
        gate: &ReadinessGate,
    ) -> FramecueResult<Self> {
        if def.id.trim().is_empty() {
            return Err(FramecueError::validation("composition id must be non-empty"));
        }
        def.fps.validate()?;
        if def.scenes.is_empty() {
            return Err(FramecueError::validation("composition must contain at least one scene"));
        }

        let mut seen = BTreeSet::new();
        let mut scenes = Vec::with_capacity(def.scenes.len());
        let mut registry = DurationRegistry::new()
            .with_transition(def.transition_frames)?
            .with_transition_ease(def.transition_ease);
        for spec in &def.scenes {
            if !seen.insert(spec.id.as_str()) {
                return Err(FramecueError::validation(format!(
                    "duplicate scene id '{}'",
                    spec.id
                )));
            }
            let scene = Scene::new(spec.clone())?;
            registry.register(scene.id(), scene.duration_frames())?;
            scenes.push(scene);
        }

        let total = registry.total_duration();
        if let Some(declared) = def.duration_frames
            && declared != total
        {
            return Err(FramecueError::validation(format!(
                "composition declares {declared} frames but its scenes add up to {total}"
            )));
        }

        let assets = PreparedAssets::prepare_with_gate(gate, &def.assets, root)?;
        for scene in &scenes {
            for b in &scene.spec().lotties {
                assets.lottie(&b.asset).map_err(|e| {
                    FramecueError::validation(format!(
                        "scene '{}' lottie binding '{}': {e}",
                        scene.id(),
                        b.name
                    ))
                })?;
            }
        }

        tracing::debug!(total_frames = total, assets = assets.len(), "composition ready");
        Ok(Self {
            def,
            scenes,
            registry,
            assets,
        })
    }

    /// Parse and build from JSON text, resolving assets against the current directory.
    pub fn from_json_str(s: &str) -> FramecueResult<Self> {
        let def: CompositionDef = serde_json::from_str(s)?;
        Self::from_def(def)
    }

    /// Parse and build from a JSON reader, resolving assets against `root`.
    pub fn from_reader(reader: impl std::io::Read, root: &Path) -> FramecueResult<Self> {
        let def: CompositionDef = serde_json::from_reader(reader)?;
        Self::from_def_with_root(def, root)
    }

    /// Read a JSON file; assets resolve relative to the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> FramecueResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open composition '{}'", path.display()))?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_reader(std::io::BufReader::new(f), root)
    }

    /// Composition identifier.
    pub fn id(&self) -> &str {
        &self.def.id
    }

    /// Timeline frame rate.
    pub fn fps(&self) -> Fps {
        self.def.fps
    }

    /// Total length in frames, computed from the scene layout.
    pub fn duration_frames(&self) -> u64 {
        self.registry.total_duration()
    }

    /// Validated scenes in playback order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Scene by id.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == id)
    }

    /// Scene layout.
    pub fn registry(&self) -> &DurationRegistry {
        &self.registry
    }

    /// Assets loaded during construction.
    pub fn assets(&self) -> &PreparedAssets {
        &self.assets
    }

    /// Authored definition this composition was built from.
    pub fn def(&self) -> &CompositionDef {
        &self.def
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;

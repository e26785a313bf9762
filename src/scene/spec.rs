//! Declarative scene description: timelines plus value bindings.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::interval::Piecewise,
    animation::proc::{Oscillation, Spring},
    assets::lottie::Playback,
    foundation::error::{FramecueError, FramecueResult},
    foundation::math::ensure_finite,
    timeline::phase::{TimelineMode, TimelineSpec},
    timeline::typewriter::TypewriterSpec,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Condition deciding whether a binding contributes at a frame.
///
/// `layer` fields name a timeline in [`SceneSpec::layers`]; `None` means the main timeline.
pub enum Gate {
    /// Always open.
    #[default]
    Always,
    /// Open while one of `ids` is the active phase.
    Phase {
        /// Timeline to resolve.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
        /// Accepted phase ids.
        ids: Vec<String>,
    },
    /// Open for scene frames in `[start, end)`.
    Window {
        /// First open frame.
        start: f64,
        /// First closed frame after the window.
        end: f64,
    },
    /// Open once the timeline has completed at least `cycles` passes.
    MinCycle {
        /// Timeline whose passes are counted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
        /// Required completed passes.
        cycles: i64,
    },
    /// Open when every inner gate is open.
    All {
        /// Inner gates.
        gates: Vec<Gate>,
    },
    /// Open when any inner gate is open.
    Any {
        /// Inner gates.
        gates: Vec<Gate>,
    },
    /// Inverts the inner gate.
    Not {
        /// Inner gate.
        gate: Box<Gate>,
    },
}

impl Gate {
    /// Gate open during the listed phases of the main timeline.
    pub fn phases<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::Phase {
            layer: None,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Gate open during the listed phases of a layer timeline.
    pub fn layer_phases<S: Into<String>>(
        layer: impl Into<String>,
        ids: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::Phase {
            layer: Some(layer.into()),
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Gate open for scene frames in `[start, end)`.
    pub fn window(start: f64, end: f64) -> Self {
        Self::Window { start, end }
    }

    /// Gate inverting `gate`.
    pub fn not(gate: Gate) -> Self {
        Self::Not {
            gate: Box::new(gate),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Frame position fed to a binding's source.
pub enum Clock {
    /// Scene-local frame.
    #[default]
    Scene,
    /// Frames since the active phase started.
    Phase {
        /// Timeline to resolve; `None` is the main timeline.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
    },
    /// Position within the timeline's current pass (`frame mod total_frames`).
    Cycle {
        /// Timeline to resolve; `None` is the main timeline.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Value generator sampled at a clock position.
pub enum ScalarSource {
    /// Fixed value.
    Constant {
        /// Output value.
        value: f64,
    },
    /// Piecewise interpolation.
    Interpolate(Piecewise),
    /// Periodic motion.
    Oscillate(Oscillation),
    /// Damped spring.
    Spring(Spring),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How a contribution merges into an existing scalar value.
pub enum Combine {
    /// Overwrite.
    #[default]
    Replace,
    /// Multiply.
    Multiply,
    /// Add.
    Add,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Binding producing `scalars[name]`.
pub struct ScalarBinding {
    /// Output scalar name.
    pub name: String,
    /// Contribution condition.
    #[serde(default)]
    pub gate: Gate,
    /// Source position.
    #[serde(default)]
    pub clock: Clock,
    /// Value generator.
    pub source: ScalarSource,
    /// Merge rule against earlier contributions to the same name.
    #[serde(default)]
    pub combine: Combine,
    /// Value contributed while the gate is closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Text generator for a [`TextBinding`].
pub enum TextSource {
    /// Fixed text.
    Static {
        /// Output text.
        text: String,
    },
    /// Character-by-character reveal.
    Typewriter(TypewriterSpec),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Binding producing `text[name]`.
pub struct TextBinding {
    /// Output text name.
    pub name: String,
    /// Contribution condition.
    #[serde(default)]
    pub gate: Gate,
    /// Source position.
    #[serde(default)]
    pub clock: Clock,
    /// Text generator.
    pub source: TextSource,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Binding producing `flags[name]` from a gate.
pub struct FlagBinding {
    /// Output flag name.
    pub name: String,
    /// Flag is `true` while this gate is open.
    pub gate: Gate,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Binding producing `scalars[name]`: the frame of a prepared Lottie asset to display.
///
/// Evaluated only when prepared assets are available (see
/// [`SceneComposer::render_frame_with_assets`](crate::SceneComposer::render_frame_with_assets)).
pub struct LottieBinding {
    /// Output scalar name.
    pub name: String,
    /// Composition asset key.
    pub asset: String,
    /// Contribution condition.
    #[serde(default)]
    pub gate: Gate,
    /// Playback position.
    #[serde(default)]
    pub clock: Clock,
    /// Rate, looping and direction.
    #[serde(default)]
    pub playback: Playback,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Authored scene: a main timeline, optional layer timelines and bindings.
pub struct SceneSpec {
    /// Scene identifier, unique within a composition.
    pub id: String,
    /// Scene length in frames.
    pub duration_frames: u64,
    /// Main phase timeline.
    pub timeline: TimelineSpec,
    /// Additional named timelines (typically cyclic).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layers: BTreeMap<String, TimelineSpec>,
    /// Scalar bindings, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scalars: Vec<ScalarBinding>,
    /// Text bindings, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texts: Vec<TextBinding>,
    /// Flag bindings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagBinding>,
    /// Lottie playback bindings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lotties: Vec<LottieBinding>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "SceneSpec", into = "SceneSpec")]
/// A validated [`SceneSpec`]; the only form accepted by the composer.
pub struct Scene {
    spec: SceneSpec,
}

impl Scene {
    /// Validate a scene spec.
    pub fn new(spec: SceneSpec) -> FramecueResult<Self> {
        spec.validate()?;
        Ok(Self { spec })
    }

    /// Scene identifier.
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    /// Scene length in frames.
    pub fn duration_frames(&self) -> u64 {
        self.spec.duration_frames
    }

    /// Underlying spec.
    pub fn spec(&self) -> &SceneSpec {
        &self.spec
    }

    /// Unwrap into the underlying spec.
    pub fn into_spec(self) -> SceneSpec {
        self.spec
    }

    pub(crate) fn timeline(&self, layer: Option<&str>) -> &TimelineSpec {
        // Validation guarantees every referenced layer exists.
        layer
            .and_then(|name| self.spec.layers.get(name))
            .unwrap_or(&self.spec.timeline)
    }
}

impl TryFrom<SceneSpec> for Scene {
    type Error = FramecueError;

    fn try_from(spec: SceneSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}

impl From<Scene> for SceneSpec {
    fn from(scene: Scene) -> Self {
        scene.spec
    }
}

impl SceneSpec {
    /// Check durations, layer references, phase ids and every binding source.
    pub fn validate(&self) -> FramecueResult<()> {
        if self.id.trim().is_empty() {
            return Err(FramecueError::validation("scene id must be non-empty"));
        }
        if self.duration_frames == 0 {
            return Err(FramecueError::validation(format!(
                "scene '{}' duration_frames must be > 0",
                self.id
            )));
        }
        if self.timeline.mode() == TimelineMode::Linear
            && self.timeline.total_frames() != self.duration_frames
        {
            return Err(FramecueError::validation(format!(
                "scene '{}' linear timeline covers {} frames but the scene lasts {}",
                self.id,
                self.timeline.total_frames(),
                self.duration_frames
            )));
        }
        for name in self.layers.keys() {
            if name.trim().is_empty() {
                return Err(FramecueError::validation(format!(
                    "scene '{}' has a layer with an empty name",
                    self.id
                )));
            }
        }

        let ctx = Ctx { spec: self };
        for b in &self.scalars {
            ctx.name("scalar", &b.name)?;
            ctx.gate(&b.gate)?;
            ctx.clock(&b.clock)?;
            match &b.source {
                ScalarSource::Constant { value } => ensure_finite("constant source", &[*value])?,
                ScalarSource::Interpolate(pw) => pw.validate()?,
                ScalarSource::Oscillate(osc) => osc.validate()?,
                ScalarSource::Spring(spring) => spring.validate()?,
            }
            if let Some(v) = b.otherwise {
                ensure_finite("binding otherwise value", &[v])?;
            }
        }
        for b in &self.texts {
            ctx.name("text", &b.name)?;
            ctx.gate(&b.gate)?;
            ctx.clock(&b.clock)?;
            if let TextSource::Typewriter(tw) = &b.source {
                tw.validate()?;
            }
        }
        let mut flag_names = BTreeSet::new();
        for b in &self.flags {
            ctx.name("flag", &b.name)?;
            ctx.gate(&b.gate)?;
            if !flag_names.insert(b.name.as_str()) {
                return Err(FramecueError::validation(format!(
                    "scene '{}' declares flag '{}' more than once",
                    self.id, b.name
                )));
            }
        }
        for b in &self.lotties {
            ctx.name("lottie", &b.name)?;
            if b.asset.trim().is_empty() {
                return Err(FramecueError::validation(format!(
                    "scene '{}' lottie binding '{}' needs an asset key",
                    self.id, b.name
                )));
            }
            ctx.gate(&b.gate)?;
            ctx.clock(&b.clock)?;
            b.playback.validate()?;
        }
        Ok(())
    }
}

struct Ctx<'a> {
    spec: &'a SceneSpec,
}

impl Ctx<'_> {
    fn name(&self, what: &str, name: &str) -> FramecueResult<()> {
        if name.trim().is_empty() {
            return Err(FramecueError::validation(format!(
                "scene '{}' has a {what} binding with an empty name",
                self.spec.id
            )));
        }
        Ok(())
    }

    fn timeline(&self, layer: Option<&str>) -> FramecueResult<&TimelineSpec> {
        match layer {
            None => Ok(&self.spec.timeline),
            Some(name) => self.spec.layers.get(name).ok_or_else(|| {
                FramecueError::validation(format!(
                    "scene '{}' references unknown layer '{name}'",
                    self.spec.id
                ))
            }),
        }
    }

    fn clock(&self, clock: &Clock) -> FramecueResult<()> {
        match clock {
            Clock::Scene => Ok(()),
            Clock::Phase { layer } | Clock::Cycle { layer } => {
                self.timeline(layer.as_deref()).map(|_| ())
            }
        }
    }

    fn gate(&self, gate: &Gate) -> FramecueResult<()> {
        match gate {
            Gate::Always => Ok(()),
            Gate::Phase { layer, ids } => {
                let timeline = self.timeline(layer.as_deref())?;
                if ids.is_empty() {
                    return Err(FramecueError::validation(format!(
                        "scene '{}' has a phase gate with no ids",
                        self.spec.id
                    )));
                }
                for id in ids {
                    if timeline.phase(id).is_none() {
                        return Err(FramecueError::validation(format!(
                            "scene '{}' gates on unknown phase '{id}'",
                            self.spec.id
                        )));
                    }
                }
                Ok(())
            }
            Gate::Window { start, end } => {
                ensure_finite("window gate", &[*start, *end])?;
                if start > end {
                    return Err(FramecueError::validation(format!(
                        "scene '{}' window gate has start {start} > end {end}",
                        self.spec.id
                    )));
                }
                Ok(())
            }
            Gate::MinCycle { layer, .. } => self.timeline(layer.as_deref()).map(|_| ()),
            Gate::All { gates } | Gate::Any { gates } => {
                gates.iter().try_for_each(|g| self.gate(g))
            }
            Gate::Not { gate } => self.gate(gate),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/spec.rs"]
mod tests;

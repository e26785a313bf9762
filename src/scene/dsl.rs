use std::collections::BTreeMap;

use crate::{
    animation::interval::Piecewise,
    assets::lottie::Playback,
    foundation::error::{FramecueError, FramecueResult},
    scene::spec::{
        Clock, Combine, FlagBinding, Gate, LottieBinding, ScalarBinding, ScalarSource, Scene,
        SceneSpec, TextBinding, TextSource,
    },
    timeline::phase::{TimelineMode, TimelineSpec},
    timeline::typewriter::TypewriterSpec,
};

impl ScalarBinding {
    /// Always-open, scene-clocked, replacing binding.
    pub fn new(name: impl Into<String>, source: ScalarSource) -> Self {
        Self {
            name: name.into(),
            gate: Gate::Always,
            clock: Clock::Scene,
            source,
            combine: Combine::Replace,
            otherwise: None,
        }
    }

    /// Set the gate.
    pub fn gate(mut self, gate: Gate) -> Self {
        self.gate = gate;
        self
    }

    /// Set the clock.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Set the merge rule.
    pub fn combine(mut self, combine: Combine) -> Self {
        self.combine = combine;
        self
    }

    /// Set the closed-gate value.
    pub fn otherwise(mut self, value: f64) -> Self {
        self.otherwise = Some(value);
        self
    }
}

/// Piecewise interpolation source, validated.
pub fn interpolate(input: Vec<f64>, output: Vec<f64>) -> FramecueResult<ScalarSource> {
    Ok(ScalarSource::Interpolate(Piecewise::new(input, output)?))
}

/// Constant source.
pub fn constant(value: f64) -> ScalarSource {
    ScalarSource::Constant { value }
}

/// Fluent construction of a [`Scene`].
pub struct SceneBuilder {
    id: String,
    duration_frames: u64,
    timeline: Option<TimelineSpec>,
    layers: BTreeMap<String, TimelineSpec>,
    scalars: Vec<ScalarBinding>,
    texts: Vec<TextBinding>,
    flags: Vec<FlagBinding>,
    lotties: Vec<LottieBinding>,
}

impl SceneBuilder {
    /// Start a scene lasting `duration_frames`.
    pub fn new(id: impl Into<String>, duration_frames: u64) -> Self {
        Self {
            id: id.into(),
            duration_frames,
            timeline: None,
            layers: BTreeMap::new(),
            scalars: Vec::new(),
            texts: Vec::new(),
            flags: Vec::new(),
            lotties: Vec::new(),
        }
    }

    /// Set the main timeline.
    pub fn timeline(mut self, timeline: TimelineSpec) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Set the main timeline from back-to-back linear phases.
    pub fn phases<S: AsRef<str>>(self, phases: &[(S, u64)]) -> FramecueResult<Self> {
        let timeline = TimelineSpec::from_durations(phases, TimelineMode::Linear)?;
        Ok(self.timeline(timeline))
    }

    /// Add a named layer timeline.
    pub fn layer(
        mut self,
        name: impl Into<String>,
        timeline: TimelineSpec,
    ) -> FramecueResult<Self> {
        let name = name.into();
        if self.layers.contains_key(&name) {
            return Err(FramecueError::validation(format!(
                "duplicate layer '{name}'"
            )));
        }
        self.layers.insert(name, timeline);
        Ok(self)
    }

    /// Add a scalar binding.
    pub fn scalar(mut self, binding: ScalarBinding) -> Self {
        self.scalars.push(binding);
        self
    }

    /// Add a static text binding.
    pub fn text(mut self, name: impl Into<String>, gate: Gate, text: impl Into<String>) -> Self {
        self.texts.push(TextBinding {
            name: name.into(),
            gate,
            clock: Clock::Scene,
            source: TextSource::Static { text: text.into() },
        });
        self
    }

    /// Add a typewriter text binding.
    pub fn typewriter(
        mut self,
        name: impl Into<String>,
        gate: Gate,
        clock: Clock,
        spec: TypewriterSpec,
    ) -> Self {
        self.texts.push(TextBinding {
            name: name.into(),
            gate,
            clock,
            source: TextSource::Typewriter(spec),
        });
        self
    }

    /// Add a flag binding.
    pub fn flag(mut self, name: impl Into<String>, gate: Gate) -> Self {
        self.flags.push(FlagBinding {
            name: name.into(),
            gate,
        });
        self
    }

    /// Add a Lottie playback binding.
    pub fn lottie(
        mut self,
        name: impl Into<String>,
        asset: impl Into<String>,
        gate: Gate,
        clock: Clock,
        playback: Playback,
    ) -> Self {
        self.lotties.push(LottieBinding {
            name: name.into(),
            asset: asset.into(),
            gate,
            clock,
            playback,
        });
        self
    }

    /// Validate and build. Without an explicit timeline the scene gets one `main` phase.
    pub fn build(self) -> FramecueResult<Scene> {
        let timeline = match self.timeline {
            Some(t) => t,
            None => TimelineSpec::from_durations(
                &[("main", self.duration_frames)],
                TimelineMode::Linear,
            )?,
        };
        Scene::new(SceneSpec {
            id: self.id,
            duration_frames: self.duration_frames,
            timeline,
            layers: self.layers,
            scalars: self.scalars,
            texts: self.texts,
            flags: self.flags,
            lotties: self.lotties,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dsl.rs"]
mod tests;

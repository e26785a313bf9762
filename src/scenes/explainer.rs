//! Chain-timed title card for explainer clips.

use crate::{
    animation::proc::Spring,
    assets::lottie::Playback,
    foundation::error::{FramecueError, FramecueResult},
    scene::dsl::{SceneBuilder, interpolate},
    scene::spec::{Clock, Gate, ScalarBinding, ScalarSource, Scene},
    timeline::chain::{AnimationChain, ChainStep, StepTiming},
    timeline::phase::{TimelineMode, TimelineSpec},
    timeline::typewriter::TypewriterSpec,
};

/// Frames the background animation takes to fade in.
const LOTTIE_FADE_IN: f64 = 20.0;

/// Title card opening an explainer clip.
///
/// The chain must contain the steps `title`, `subtitle`, `stamp` and `lottie`; the scene lasts
/// until the latest of them ends.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExplainerTitle {
    /// Main title, sprung in at the start of `title`.
    pub title: String,
    /// Typed out over the `subtitle` step.
    pub subtitle: String,
    /// Badge label that appears with the `stamp` step.
    pub stamp: String,
    /// Lottie asset key for the background animation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lottie_asset: Option<String>,
    /// Step timing.
    pub chain: AnimationChain,
}

impl ExplainerTitle {
    /// Default step layout.
    pub fn default_chain() -> FramecueResult<AnimationChain> {
        AnimationChain::new(vec![
            ChainStep::root("title", 20),
            ChainStep::after("subtitle", "title", 20).with_delays(30, 0),
            ChainStep::after("stamp", "title", 20).with_delays(20, 0),
            ChainStep::root("lottie", 120),
        ])
    }

    /// Title card with the default chain.
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        stamp: impl Into<String>,
    ) -> FramecueResult<Self> {
        Ok(Self {
            title: title.into(),
            subtitle: subtitle.into(),
            stamp: stamp.into(),
            lottie_asset: None,
            chain: Self::default_chain()?,
        })
    }

    /// Play the Lottie asset registered under `key` behind the title.
    pub fn with_lottie(mut self, key: impl Into<String>) -> Self {
        self.lottie_asset = Some(key.into());
        self
    }

    /// Replace the step timing.
    pub fn with_chain(mut self, chain: AnimationChain) -> Self {
        self.chain = chain;
        self
    }

    fn step(&self, name: &str) -> FramecueResult<StepTiming> {
        self.chain.timing(name).ok_or_else(|| {
            FramecueError::validation(format!("explainer title chain has no '{name}' step"))
        })
    }

    /// Build the scene.
    pub fn build(&self) -> FramecueResult<Scene> {
        let title = self.step("title")?;
        let subtitle = self.step("subtitle")?;
        let stamp = self.step("stamp")?;
        let lottie = self.step("lottie")?;
        let duration = self.chain.scene_duration();
        let end = duration as f64;

        let title_spring = Spring {
            damping: 80.0,
            delay_frames: title.start as f64,
            ..Spring::default()
        };
        let typing = TypewriterSpec::new(
            self.subtitle.as_str(),
            subtitle.start.max(0) as u64,
            subtitle.duration_frames,
        )?;
        let lottie_start = lottie.start as f64;

        let mut builder = SceneBuilder::new("explainer_title", duration)
            .scalar(ScalarBinding::new(
                "title_scale",
                ScalarSource::Spring(title_spring),
            ))
            .scalar(ScalarBinding::new(
                "stamp_opacity",
                interpolate(
                    vec![stamp.start as f64, stamp.end as f64],
                    vec![0.0, 1.0],
                )?,
            ))
            .scalar(ScalarBinding::new(
                "lottie_opacity",
                interpolate(
                    vec![lottie_start, lottie_start + LOTTIE_FADE_IN],
                    vec![0.0, 1.0],
                )?,
            ))
            .text("title", Gate::Always, self.title.as_str())
            .typewriter("subtitle", Gate::Always, Clock::Scene, typing)
            .text(
                "stamp",
                Gate::window(stamp.start as f64, end),
                self.stamp.as_str(),
            )
            .flag("stamp", Gate::window(stamp.start as f64, end));

        if let Some(asset) = &self.lottie_asset {
            builder = builder
                .layer("lottie", lottie_layer(lottie, duration)?)?
                .lottie(
                    "lottie_frame",
                    asset.as_str(),
                    Gate::layer_phases("lottie", ["play"]),
                    Clock::Phase {
                        layer: Some("lottie".to_owned()),
                    },
                    Playback::default(),
                );
        }
        builder.build()
    }
}

// Phases `before`/`play`/`after` around the step so the phase clock counts from its start.
fn lottie_layer(step: StepTiming, scene_frames: u64) -> FramecueResult<TimelineSpec> {
    let start = step.start.max(0) as u64;
    let end = (step.end.max(0) as u64).min(scene_frames);
    if end <= start {
        return Err(FramecueError::validation("explainer lottie step ends before it starts"));
    }
    let mut phases = Vec::with_capacity(3);
    if start > 0 {
        phases.push(("before", start));
    }
    phases.push(("play", end - start));
    if end < scene_frames {
        phases.push(("after", scene_frames - end));
    }
    TimelineSpec::from_durations(&phases, TimelineMode::Linear)
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/explainer.rs"]
mod tests;

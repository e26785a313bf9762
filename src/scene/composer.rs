use std::collections::btree_map::Entry;

use crate::{
    assets::PreparedAssets,
    foundation::core::Fps,
    scene::spec::{Clock, Combine, Gate, ScalarSource, Scene, TextSource},
    scene::state::{LayerState, RenderState},
};

/// Stateless evaluator from a scene and a frame position to a [`RenderState`].
///
/// Output depends only on the arguments, so frames may be evaluated in any order, repeatedly or
/// concurrently.
pub struct SceneComposer;

impl SceneComposer {
    #[tracing::instrument(level = "debug", skip(scene, fps), fields(scene = %scene.id()))]
    /// Evaluate `scene` at scene-local `frame`.
    pub fn render_frame(scene: &Scene, frame: f64, fps: Fps) -> RenderState {
        let spec = scene.spec();
        let main = spec.timeline.resolve(frame);
        let mut out = RenderState {
            phase_id: main.id().to_owned(),
            phase_offset: main.offset,
            ..RenderState::default()
        };

        for (name, timeline) in &spec.layers {
            let r = timeline.resolve(frame);
            out.layers.insert(
                name.clone(),
                LayerState {
                    phase_id: r.id().to_owned(),
                    offset: r.offset,
                    cycle: r.cycle,
                },
            );
        }

        for b in &spec.scalars {
            let value = if gate_open(scene, &b.gate, frame) {
                sample_scalar(&b.source, clock_position(scene, &b.clock, frame), fps)
            } else {
                match b.otherwise {
                    Some(v) => v,
                    None => continue,
                }
            };
            match out.scalars.entry(b.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => {
                    let cur = slot.get_mut();
                    match b.combine {
                        Combine::Replace => *cur = value,
                        Combine::Multiply => *cur *= value,
                        Combine::Add => *cur += value,
                    }
                }
            }
        }

        for b in &spec.texts {
            if !gate_open(scene, &b.gate, frame) {
                continue;
            }
            let text = match &b.source {
                TextSource::Static { text } => text.clone(),
                TextSource::Typewriter(tw) => {
                    let reveal = tw.reveal(clock_position(scene, &b.clock, frame));
                    out.cursor_visible |= reveal.cursor_visible;
                    out.cursor_opacity = out.cursor_opacity.max(reveal.cursor_opacity);
                    reveal.visible_text
                }
            };
            out.text.insert(b.name.clone(), text);
        }

        for b in &spec.flags {
            out.flags
                .insert(b.name.clone(), gate_open(scene, &b.gate, frame));
        }

        out
    }

    /// Like [`SceneComposer::render_frame`], also resolving Lottie bindings against `assets`.
    ///
    /// Bindings whose asset is missing or carries no Lottie header contribute nothing;
    /// compositions reject those when they are built.
    pub fn render_frame_with_assets(
        scene: &Scene,
        frame: f64,
        fps: Fps,
        assets: &PreparedAssets,
    ) -> RenderState {
        let mut out = Self::render_frame(scene, frame, fps);
        for b in &scene.spec().lotties {
            if !gate_open(scene, &b.gate, frame) {
                continue;
            }
            let Ok(meta) = assets.lottie(&b.asset) else {
                continue;
            };
            let pos = clock_position(scene, &b.clock, frame);
            out.scalars
                .insert(b.name.clone(), b.playback.lottie_frame(meta, pos, fps));
        }
        out
    }
}

fn gate_open(scene: &Scene, gate: &Gate, frame: f64) -> bool {
    match gate {
        Gate::Always => true,
        Gate::Phase { layer, ids } => {
            let r = scene.timeline(layer.as_deref()).resolve(frame);
            ids.iter().any(|id| id == r.id())
        }
        Gate::Window { start, end } => *start <= frame && frame < *end,
        Gate::MinCycle { layer, cycles } => {
            scene.timeline(layer.as_deref()).resolve_cyclic(frame).cycle >= *cycles
        }
        Gate::All { gates } => gates.iter().all(|g| gate_open(scene, g, frame)),
        Gate::Any { gates } => gates.iter().any(|g| gate_open(scene, g, frame)),
        Gate::Not { gate } => !gate_open(scene, gate, frame),
    }
}

fn clock_position(scene: &Scene, clock: &Clock, frame: f64) -> f64 {
    match clock {
        Clock::Scene => frame,
        Clock::Phase { layer } => scene.timeline(layer.as_deref()).resolve(frame).offset,
        Clock::Cycle { layer } => {
            frame.rem_euclid(scene.timeline(layer.as_deref()).total_frames() as f64)
        }
    }
}

fn sample_scalar(source: &ScalarSource, pos: f64, fps: Fps) -> f64 {
    match source {
        ScalarSource::Constant { value } => *value,
        ScalarSource::Interpolate(pw) => pw.map(pos),
        ScalarSource::Oscillate(osc) => osc.sample(pos),
        ScalarSource::Spring(spring) => spring.sample(pos, fps),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/composer.rs"]
mod tests;

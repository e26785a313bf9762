//! Sequential layout of scenes along the composition timeline.

use crate::{
    animation::ease::Ease,
    foundation::core::FrameIndex,
    foundation::error::{FramecueError, FramecueResult},
};

/// Ordered scene durations; answers total length and per-scene offsets without rendering.
///
/// Adjacent scenes may overlap by `transition_frames` to cross-fade.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DurationRegistry {
    entries: Vec<(String, u64)>,
    // Sum of every registered duration; bounds all offsets and ends.
    sum: u64,
    transition_frames: u64,
    transition_ease: Ease,
}

/// Cross-fade state of a scene inside an overlap window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    /// Eased transition progress in `[0, 1]`.
    pub progress: f64,
    /// `true` for the scene fading in, `false` for the one fading out.
    pub incoming: bool,
}

impl Fade {
    /// Opacity of the scene this fade belongs to; incoming and outgoing opacities sum to 1.
    pub fn opacity(self) -> f64 {
        if self.incoming {
            self.progress
        } else {
            1.0 - self.progress
        }
    }
}

/// A scene active at some composition frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement<'a> {
    /// Registered scene id.
    pub scene_id: &'a str,
    /// Registration index.
    pub index: usize,
    /// Frame relative to the scene start.
    pub local_frame: u64,
    /// Present while the scene is inside a transition overlap.
    pub fade: Option<Fade>,
}

impl DurationRegistry {
    /// Empty registry without transitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overlap between adjacent scenes. Every registered scene must be longer.
    pub fn with_transition(mut self, frames: u64) -> FramecueResult<Self> {
        if let Some((id, d)) = self.entries.iter().find(|(_, d)| *d <= frames) {
            return Err(FramecueError::validation(format!(
                "scene '{id}' lasts {d} frames, not longer than the {frames}-frame transition"
            )));
        }
        self.transition_frames = frames;
        Ok(self)
    }

    /// Set the easing applied to transition progress.
    pub fn with_transition_ease(mut self, ease: Ease) -> Self {
        self.transition_ease = ease;
        self
    }

    /// Overlap between adjacent scenes, in frames.
    pub fn transition_frames(&self) -> u64 {
        self.transition_frames
    }

    /// Append a scene.
    ///
    /// Registering an id again with the same duration is a no-op; a different duration is an
    /// error.
    pub fn register(
        &mut self,
        scene_id: impl Into<String>,
        duration_frames: u64,
    ) -> FramecueResult<()> {
        let scene_id = scene_id.into();
        if scene_id.trim().is_empty() {
            return Err(FramecueError::validation("scene id must be non-empty"));
        }
        if duration_frames == 0 {
            return Err(FramecueError::validation(format!(
                "scene '{scene_id}' duration must be > 0"
            )));
        }
        if let Some((_, existing)) = self.entries.iter().find(|(id, _)| *id == scene_id) {
            if *existing == duration_frames {
                return Ok(());
            }
            return Err(FramecueError::validation(format!(
                "scene '{scene_id}' already registered with {existing} frames, \
                 got {duration_frames}"
            )));
        }
        if duration_frames <= self.transition_frames {
            return Err(FramecueError::validation(format!(
                "scene '{scene_id}' lasts {duration_frames} frames, not longer than the {}-frame \
                 transition",
                self.transition_frames
            )));
        }
        let Some(sum) = self.sum.checked_add(duration_frames) else {
            return Err(FramecueError::validation(format!(
                "scene '{scene_id}' pushes the composition past {} frames",
                u64::MAX
            )));
        };
        self.sum = sum;
        self.entries.push((scene_id, duration_frames));
        Ok(())
    }

    /// Number of registered scenes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered `(scene_id, duration)` pairs in order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(id, d)| (id.as_str(), *d))
    }

    /// Sum of durations minus the overlaps between adjacent scenes.
    pub fn total_duration(&self) -> u64 {
        let overlaps = self.entries.len().saturating_sub(1) as u64 * self.transition_frames;
        self.sum - overlaps
    }

    /// First composition frame of a scene.
    pub fn offset_of(&self, scene_id: &str) -> Option<u64> {
        let idx = self.entries.iter().position(|(id, _)| id == scene_id)?;
        Some(self.offset_at(idx))
    }

    fn offset_at(&self, idx: usize) -> u64 {
        self.entries[..idx]
            .iter()
            .map(|(_, d)| d - self.transition_frames)
            .sum()
    }

    /// Scenes active at a composition frame, in registration order.
    ///
    /// Inside an overlap both scenes are returned with complementary fades. Frames at or past
    /// the end hold the last scene, its local frame growing past its duration.
    pub fn placements_at(&self, frame: FrameIndex) -> Vec<Placement<'_>> {
        let mut out = Vec::with_capacity(2);
        let Some(last) = self.entries.len().checked_sub(1) else {
            return out;
        };

        let mut offset = 0u64;
        for (index, (id, d)) in self.entries.iter().enumerate() {
            let end = offset + d;
            let contains =
                (offset <= frame.0 && frame.0 < end) || (index == last && frame.0 >= end);
            if contains {
                out.push(Placement {
                    scene_id: id,
                    index,
                    local_frame: frame.0 - offset,
                    fade: None,
                });
            }
            offset = end - self.transition_frames;
        }

        if let [outgoing, incoming] = out.as_mut_slice() {
            let start = incoming.local_frame;
            let progress = self.transition_progress(start);
            outgoing.fade = Some(Fade {
                progress,
                incoming: false,
            });
            incoming.fade = Some(Fade {
                progress,
                incoming: true,
            });
        }
        out
    }

    fn transition_progress(&self, offset_in_window: u64) -> f64 {
        let denom = self.transition_frames.saturating_sub(1);
        let t = if denom == 0 {
            1.0
        } else {
            offset_in_window as f64 / denom as f64
        };
        self.transition_ease.apply(t).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/registry.rs"]
mod tests;

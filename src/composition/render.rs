use rayon::prelude::*;

use crate::{
    composition::model::Composition,
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{FramecueError, FramecueResult},
    scene::composer::SceneComposer,
    scene::state::{RenderState, StateFingerprint},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One scene's contribution to a composition frame.
pub struct SceneFrame {
    /// Scene identifier.
    pub scene_id: String,
    /// Frame relative to the scene start.
    pub local_frame: u64,
    /// Scene opacity; below 1 only inside a cross-fade.
    pub opacity: f64,
    /// Scene visual state.
    pub state: RenderState,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Everything visible at one composition frame, back to front.
pub struct FrameState {
    /// Composition frame.
    pub frame: FrameIndex,
    /// Active scenes; two during a cross-fade (outgoing first).
    pub scenes: Vec<SceneFrame>,
}

impl FrameState {
    /// Digest over every scene state, opacity and placement.
    pub fn fingerprint(&self) -> StateFingerprint {
        let mut pair = crate::scene::state::Pair::new();
        pair.feed(|h| {
            h.write_u64(self.frame.0);
            h.write_u64(self.scenes.len() as u64);
            for s in &self.scenes {
                h.write_str(&s.scene_id);
                h.write_u64(s.local_frame);
                h.write_f64(s.opacity);
                s.state.write(h);
            }
        });
        pair.finish()
    }
}

#[derive(Clone, Debug)]
/// Range rendering options.
pub struct RenderOpts {
    /// Evaluate frames on a rayon thread pool.
    pub parallel: bool,
    /// Worker count; `None` lets rayon decide. `Some(0)` is rejected.
    pub threads: Option<usize>,
    /// Frames evaluated per parallel batch; `0` is treated as `1`.
    pub chunk_size: usize,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

impl Composition {
    #[tracing::instrument(level = "debug", skip(self), fields(id = %self.id()))]
    /// Evaluate one composition frame.
    ///
    /// Frames at or past the end hold the last scene. Never fails and performs no IO.
    pub fn render_frame(&self, frame: FrameIndex) -> FrameState {
        let fps = self.fps();
        let scenes = self
            .registry()
            .placements_at(frame)
            .into_iter()
            .filter_map(|p| {
                let scene = self.scenes().get(p.index)?;
                Some(SceneFrame {
                    scene_id: p.scene_id.to_owned(),
                    local_frame: p.local_frame,
                    opacity: p.fade.map_or(1.0, |f| f.opacity()),
                    state: SceneComposer::render_frame_with_assets(
                        scene,
                        p.local_frame as f64,
                        fps,
                        self.assets(),
                    ),
                })
            })
            .collect();
        FrameState { frame, scenes }
    }

    /// Evaluate every frame in `range`, in order.
    ///
    /// Parallel and sequential evaluation produce identical states.
    #[tracing::instrument(skip(self, opts), fields(id = %self.id(), parallel = opts.parallel))]
    pub fn render_range(
        &self,
        range: FrameRange,
        opts: &RenderOpts,
    ) -> FramecueResult<Vec<FrameState>> {
        if !opts.parallel {
            return Ok((range.start.0..range.end.0)
                .map(|f| self.render_frame(FrameIndex(f)))
                .collect());
        }

        let pool = build_thread_pool(opts.threads)?;
        let chunk_size = normalized_chunk_size(opts.chunk_size);
        let mut out = Vec::with_capacity(range.len_frames() as usize);
        let mut chunk_start = range.start.0;
        while chunk_start < range.end.0 {
            let chunk_end = (chunk_start + chunk_size).min(range.end.0);
            let frames: Vec<u64> = (chunk_start..chunk_end).collect();
            let states = pool.install(|| {
                frames
                    .par_iter()
                    .map(|&f| self.render_frame(FrameIndex(f)))
                    .collect::<Vec<_>>()
            });
            out.extend(states);
            chunk_start = chunk_end;
        }
        Ok(out)
    }
}

fn build_thread_pool(threads: Option<usize>) -> FramecueResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FramecueError::validation("render 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FramecueError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/render.rs"]
mod tests;

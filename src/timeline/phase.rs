//! Phase segmentation of a timeline and frame-to-phase resolution.

use std::collections::BTreeSet;

use crate::{
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{FramecueError, FramecueResult},
};

/// One named, contiguous sub-range of a timeline.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhaseDef {
    /// Phase identifier, unique within its timeline.
    pub id: String,
    /// Frames covered by the phase, `[start, end)`.
    #[serde(flatten)]
    pub range: FrameRange,
}

impl PhaseDef {
    /// Build a phase covering `[start, end)`.
    pub fn new(id: impl Into<String>, start: u64, end: u64) -> FramecueResult<Self> {
        let id = id.into();
        if start >= end {
            return Err(FramecueError::validation(format!(
                "phase '{id}' must have start < end, got [{start}, {end})"
            )));
        }
        Ok(Self {
            id,
            range: FrameRange::new(FrameIndex(start), FrameIndex(end))?,
        })
    }

    /// Inclusive start frame.
    pub fn start(&self) -> u64 {
        self.range.start.0
    }

    /// Exclusive end frame.
    pub fn end(&self) -> u64 {
        self.range.end.0
    }

    /// Number of frames in the phase.
    pub fn len_frames(&self) -> u64 {
        self.range.len_frames()
    }
}

/// How frames beyond the first pass through a timeline are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineMode {
    /// One pass; frames past the end hold the final phase.
    #[default]
    Linear,
    /// Frames are reduced modulo the timeline length.
    Cyclic,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct TimelineDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_frames: Option<u64>,
    phases: Vec<PhaseDef>,
    #[serde(default)]
    mode: TimelineMode,
}

/// Immutable, validated phase layout.
///
/// Phases are ordered, contiguous and gapless across `[0, total_frames)`. In cyclic mode
/// `total_frames` is the cycle length.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "TimelineDef", into = "TimelineDef")]
pub struct TimelineSpec {
    total_frames: u64,
    phases: Vec<PhaseDef>,
    mode: TimelineMode,
}

/// Result of resolving a frame against a [`TimelineSpec`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPhase<'a> {
    /// Active phase.
    pub phase: &'a PhaseDef,
    /// Position of the active phase in the timeline.
    pub index: usize,
    /// Frames elapsed since the phase start; grows past the phase end when holding.
    pub offset: f64,
    /// Completed passes through the timeline (`floor(frame / total_frames)` in cyclic mode).
    pub cycle: i64,
}

impl ResolvedPhase<'_> {
    /// Identifier of the active phase.
    pub fn id(&self) -> &str {
        &self.phase.id
    }
}

impl TimelineSpec {
    /// Build a validated timeline.
    pub fn new(
        total_frames: u64,
        phases: Vec<PhaseDef>,
        mode: TimelineMode,
    ) -> FramecueResult<Self> {
        validate_phases(total_frames, &phases)?;
        Ok(Self {
            total_frames,
            phases,
            mode,
        })
    }

    /// Build a timeline from back-to-back `(id, duration)` pairs starting at frame 0.
    pub fn from_durations<S: AsRef<str>>(
        phases: &[(S, u64)],
        mode: TimelineMode,
    ) -> FramecueResult<Self> {
        let mut start = 0u64;
        let mut defs = Vec::with_capacity(phases.len());
        for (id, len) in phases {
            let end = start
                .checked_add(*len)
                .ok_or_else(|| FramecueError::validation("phase durations overflow u64"))?;
            defs.push(PhaseDef::new(id.as_ref(), start, end)?);
            start = end;
        }
        Self::new(start, defs, mode)
    }

    /// Total length in frames (cycle length in cyclic mode).
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Ordered phases.
    pub fn phases(&self) -> &[PhaseDef] {
        &self.phases
    }

    /// Timeline mode.
    pub fn mode(&self) -> TimelineMode {
        self.mode
    }

    /// Look up a phase by id.
    pub fn phase(&self, id: &str) -> Option<&PhaseDef> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Resolve a frame according to the timeline's mode.
    pub fn resolve(&self, frame: f64) -> ResolvedPhase<'_> {
        match self.mode {
            TimelineMode::Linear => self.lookup(frame, 0),
            TimelineMode::Cyclic => self.resolve_cyclic(frame),
        }
    }

    /// Resolve a frame after reducing it modulo `total_frames`, regardless of mode.
    pub fn resolve_cyclic(&self, frame: f64) -> ResolvedPhase<'_> {
        let len = self.total_frames as f64;
        let cycle = frame.div_euclid(len) as i64;
        self.lookup(frame.rem_euclid(len), cycle)
    }

    fn lookup(&self, pos: f64, cycle: i64) -> ResolvedPhase<'_> {
        let idx = self
            .phases
            .partition_point(|p| p.range.end.as_f64() <= pos)
            .min(self.phases.len() - 1);
        let phase = &self.phases[idx];
        ResolvedPhase {
            phase,
            index: idx,
            offset: pos - phase.range.start.as_f64(),
            cycle,
        }
    }
}

impl TryFrom<TimelineDef> for TimelineSpec {
    type Error = FramecueError;

    fn try_from(def: TimelineDef) -> Result<Self, Self::Error> {
        let total = match def.total_frames {
            Some(total) => total,
            None => def.phases.last().map_or(0, PhaseDef::end),
        };
        Self::new(total, def.phases, def.mode)
    }
}

impl From<TimelineSpec> for TimelineDef {
    fn from(spec: TimelineSpec) -> Self {
        Self {
            total_frames: Some(spec.total_frames),
            phases: spec.phases,
            mode: spec.mode,
        }
    }
}

fn validate_phases(total_frames: u64, phases: &[PhaseDef]) -> FramecueResult<()> {
    if total_frames == 0 {
        return Err(FramecueError::validation("timeline total_frames must be > 0"));
    }
    let Some(first) = phases.first() else {
        return Err(FramecueError::validation("timeline must declare at least one phase"));
    };
    if first.start() != 0 {
        return Err(FramecueError::validation(format!(
            "first phase '{}' must start at frame 0, got {}",
            first.id,
            first.start()
        )));
    }

    let mut seen = BTreeSet::new();
    for phase in phases {
        if phase.id.trim().is_empty() {
            return Err(FramecueError::validation("phase id must be non-empty"));
        }
        if !seen.insert(phase.id.as_str()) {
            return Err(FramecueError::validation(format!(
                "duplicate phase id '{}'",
                phase.id
            )));
        }
        if phase.start() >= phase.end() {
            return Err(FramecueError::validation(format!(
                "phase '{}' must have start < end",
                phase.id
            )));
        }
    }

    for w in phases.windows(2) {
        if w[0].end() != w[1].start() {
            return Err(FramecueError::validation(format!(
                "phases '{}' and '{}' are not contiguous ({} != {})",
                w[0].id,
                w[1].id,
                w[0].end(),
                w[1].start()
            )));
        }
    }

    let last = &phases[phases.len() - 1];
    if last.end() != total_frames {
        return Err(FramecueError::validation(format!(
            "last phase '{}' ends at {} but timeline total_frames is {total_frames}",
            last.id,
            last.end()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/phase.rs"]
mod tests;

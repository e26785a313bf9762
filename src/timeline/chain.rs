//! Start frames for named animation steps chained by "starts after" dependencies.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::core::Fps,
    foundation::error::{FramecueError, FramecueResult},
};

/// Buffer applied to measured narration lengths before converting them to frames.
pub const DEFAULT_MEASURE_BUFFER_SECS: f64 = -0.4;

/// One step in an [`AnimationChain`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChainStep {
    /// Step name, unique within the chain.
    pub name: String,
    /// Step this one starts after; `None` starts relative to frame 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Frames between the predecessor's end and this step's start. May be negative.
    #[serde(default)]
    pub delay_before: i64,
    /// Frames appended after this step before its successors may start.
    #[serde(default)]
    pub delay_after: i64,
    /// Step length in frames.
    pub duration_frames: u64,
}

impl ChainStep {
    /// Root step starting at `delay_before`.
    pub fn root(name: impl Into<String>, duration_frames: u64) -> Self {
        Self {
            name: name.into(),
            after: None,
            delay_before: 0,
            delay_after: 0,
            duration_frames,
        }
    }

    /// Step starting after `after` ends.
    pub fn after(name: impl Into<String>, after: impl Into<String>, duration_frames: u64) -> Self {
        Self {
            after: Some(after.into()),
            ..Self::root(name, duration_frames)
        }
    }

    /// Set both delays.
    pub fn with_delays(mut self, delay_before: i64, delay_after: i64) -> Self {
        self.delay_before = delay_before;
        self.delay_after = delay_after;
        self
    }
}

/// Computed timing of one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StepTiming {
    /// First frame of the step.
    pub start: i64,
    /// Step length in frames.
    pub duration_frames: u64,
    /// `start + duration + delay_after`; successors are placed relative to this.
    pub end: i64,
}

/// Validated set of dependency-chained steps.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<ChainStep>", into = "Vec<ChainStep>")]
pub struct AnimationChain {
    steps: Vec<ChainStep>,
    timings: BTreeMap<String, StepTiming>,
}

impl AnimationChain {
    /// Validate the steps and compute every start frame.
    pub fn new(steps: Vec<ChainStep>) -> FramecueResult<Self> {
        let timings = compute_timings(&steps)?;
        Ok(Self { steps, timings })
    }

    /// Steps in declaration order.
    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// Timings keyed by step name.
    pub fn timings(&self) -> &BTreeMap<String, StepTiming> {
        &self.timings
    }

    /// Timing of one step.
    pub fn timing(&self, name: &str) -> Option<StepTiming> {
        self.timings.get(name).copied()
    }

    /// Start frame of one step.
    pub fn start_of(&self, name: &str) -> Option<i64> {
        self.timing(name).map(|t| t.start)
    }

    /// Latest end over the terminal steps, the ones no other step follows. Never negative.
    pub fn scene_duration(&self) -> u64 {
        let followed: BTreeSet<&str> = self
            .steps
            .iter()
            .filter_map(|s| s.after.as_deref())
            .collect();
        self.steps
            .iter()
            .filter(|s| !followed.contains(s.name.as_str()))
            .filter_map(|s| self.timings.get(&s.name))
            .map(|t| t.end)
            .max()
            .map_or(0, |end| end.max(0) as u64)
    }

    /// Replace step durations with measured clip lengths, `ceil((secs + buffer) * fps)` frames.
    ///
    /// Steps missing from `secs_by_step` keep their authored duration. A measurement that comes
    /// out shorter than zero frames after the buffer is clamped to zero.
    pub fn with_measured_durations(
        &self,
        secs_by_step: &BTreeMap<String, f64>,
        fps: Fps,
        buffer_secs: f64,
    ) -> FramecueResult<Self> {
        for name in secs_by_step.keys() {
            if !self.timings.contains_key(name) {
                return Err(FramecueError::validation(format!(
                    "measured duration given for unknown step '{name}'"
                )));
            }
        }

        let mut steps = self.steps.clone();
        for step in &mut steps {
            let Some(&secs) = secs_by_step.get(&step.name) else {
                continue;
            };
            if !secs.is_finite() || secs < 0.0 {
                return Err(FramecueError::validation(format!(
                    "measured duration for step '{}' must be finite and >= 0, got {secs}",
                    step.name
                )));
            }
            let frames = fps.secs_to_frames_ceil((secs + buffer_secs).max(0.0));
            tracing::debug!(step = %step.name, secs, frames, "measured step duration");
            step.duration_frames = frames;
        }
        Self::new(steps)
    }
}

impl TryFrom<Vec<ChainStep>> for AnimationChain {
    type Error = FramecueError;

    fn try_from(steps: Vec<ChainStep>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<AnimationChain> for Vec<ChainStep> {
    fn from(chain: AnimationChain) -> Self {
        chain.steps
    }
}

fn compute_timings(steps: &[ChainStep]) -> FramecueResult<BTreeMap<String, StepTiming>> {
    let mut by_name = BTreeMap::new();
    for (idx, step) in steps.iter().enumerate() {
        if step.name.trim().is_empty() {
            return Err(FramecueError::validation("chain step name must be non-empty"));
        }
        if by_name.insert(step.name.as_str(), idx).is_some() {
            return Err(FramecueError::validation(format!(
                "duplicate chain step '{}'",
                step.name
            )));
        }
    }
    for step in steps {
        if let Some(after) = step.after.as_deref()
            && !by_name.contains_key(after)
        {
            return Err(FramecueError::validation(format!(
                "chain step '{}' follows unknown step '{after}'",
                step.name
            )));
        }
    }

    let mut timings: BTreeMap<String, StepTiming> = BTreeMap::new();
    for step in steps {
        // Walk back to the nearest already-timed ancestor, then time the path forward.
        let mut path = vec![step];
        let mut cur = step;
        while let Some(after) = cur.after.as_deref() {
            if timings.contains_key(after) {
                break;
            }
            let prev = &steps[by_name[after]];
            if path.iter().any(|s| s.name == prev.name) {
                return Err(FramecueError::validation(format!(
                    "chain step '{}' is part of a dependency cycle",
                    prev.name
                )));
            }
            path.push(prev);
            cur = prev;
        }

        for s in path.into_iter().rev() {
            if timings.contains_key(&s.name) {
                continue;
            }
            let base = match s.after.as_deref() {
                Some(after) => timings[after].end,
                None => 0,
            };
            let overflow = || {
                FramecueError::validation(format!(
                    "chain step '{}' timing overflows the frame range",
                    s.name
                ))
            };
            let duration = i64::try_from(s.duration_frames).map_err(|_| overflow())?;
            let start = base.checked_add(s.delay_before).ok_or_else(overflow)?;
            let end = start
                .checked_add(duration)
                .and_then(|e| e.checked_add(s.delay_after))
                .ok_or_else(overflow)?;
            timings.insert(
                s.name.clone(),
                StepTiming {
                    start,
                    duration_frames: s.duration_frames,
                    end,
                },
            );
        }
    }
    Ok(timings)
}

/// Frame offsets at which `words` are spoken within `text`, assuming a uniform speaking rate.
///
/// Words are searched in order, each search starting one character after the previous match.
/// A word that cannot be found yields offset `0`.
pub fn highlight_offsets<S: AsRef<str>>(
    text: &str,
    words: &[S],
    duration_secs: f64,
    fps: Fps,
) -> Vec<u64> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut from = 0usize;
    let mut out = Vec::with_capacity(words.len());

    for word in words {
        let word = word.as_ref();
        match find_chars(&chars, word, from) {
            Some(idx) if len > 0 => {
                let secs = idx as f64 / len as f64 * duration_secs;
                out.push((secs * fps.as_f64()).round().max(0.0) as u64);
                from = idx + 1;
            }
            _ => {
                tracing::warn!(word, "highlight word not found in narration text");
                out.push(0);
            }
        }
    }
    out
}

fn find_chars(haystack: &[char], needle: &str, from: usize) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return (from <= haystack.len()).then_some(from);
    }
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle.as_slice())
        .map(|p| p + from)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/chain.rs"]
mod tests;

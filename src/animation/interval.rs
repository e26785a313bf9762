//! Interval mapping: piecewise-linear, optionally eased functions of a frame position.
//!
//! A [`Segment`] maps `[f0, f1] -> [v0, v1]`; a [`Piecewise`] chains several segments that share
//! break points (fade in, hold, fade out). Mapping is pure and performs no rounding.

use crate::{
    animation::ease::Ease,
    foundation::error::{FramecueError, FramecueResult},
    foundation::math::ensure_finite,
};

/// Behavior of a mapping outside its input range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Hold the boundary output value.
    #[default]
    Clamp,
    /// Continue the straight line through the segment endpoints.
    Identity,
}

/// Two-knot interpolation segment `[f0, f1] -> [v0, v1]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Input range `[f0, f1]` with `f0 <= f1`.
    pub input: [f64; 2],
    /// Output range `[v0, v1]`.
    pub output: [f64; 2],
    /// Behavior for frames before `f0`.
    #[serde(default)]
    pub left: Extrapolate,
    /// Behavior for frames after `f1`.
    #[serde(default)]
    pub right: Extrapolate,
    /// Optional easing applied to normalized progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
}

impl Segment {
    /// Build a validated, clamped, linear segment.
    pub fn new(input: [f64; 2], output: [f64; 2]) -> FramecueResult<Self> {
        let seg = Self {
            input,
            output,
            left: Extrapolate::Clamp,
            right: Extrapolate::Clamp,
            ease: None,
        };
        seg.validate()?;
        Ok(seg)
    }

    /// Set the easing curve.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Set both extrapolation modes.
    pub fn with_extrapolation(mut self, left: Extrapolate, right: Extrapolate) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Check finiteness and `f0 <= f1`.
    pub fn validate(&self) -> FramecueResult<()> {
        ensure_finite("segment input", &self.input)?;
        ensure_finite("segment output", &self.output)?;
        if self.input[0] > self.input[1] {
            return Err(FramecueError::validation(format!(
                "segment input range must be non-decreasing, got [{}, {}]",
                self.input[0], self.input[1]
            )));
        }
        Ok(())
    }

    /// Map a frame position through this segment.
    pub fn map(&self, frame: f64) -> f64 {
        let [f0, f1] = self.input;
        let [v0, v1] = self.output;
        let degenerate = f1 == f0;

        if frame < f0 {
            return match self.left {
                Extrapolate::Clamp => v0,
                Extrapolate::Identity if degenerate => v0,
                Extrapolate::Identity => v0 + (frame - f0) * (v1 - v0) / (f1 - f0),
            };
        }
        if degenerate {
            return v1;
        }
        if frame > f1 {
            return match self.right {
                Extrapolate::Clamp => v1,
                Extrapolate::Identity => v0 + (frame - f0) * (v1 - v0) / (f1 - f0),
            };
        }

        let t = (frame - f0) / (f1 - f0);
        let te = self.ease.map_or(t, |e| e.apply(t));
        v0 + te * (v1 - v0)
    }
}

/// Multi-knot interpolation: consecutive segments sharing break points.
///
/// A frame exactly on an inner knot belongs to the segment on its left, so it maps to that
/// knot's output value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Piecewise {
    /// Non-decreasing input knots.
    pub input: Vec<f64>,
    /// Output value per input knot.
    pub output: Vec<f64>,
    /// Behavior for frames before the first knot.
    #[serde(default)]
    pub left: Extrapolate,
    /// Behavior for frames after the last knot.
    #[serde(default)]
    pub right: Extrapolate,
    /// Optional easing applied within every sub-segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
}

impl Piecewise {
    /// Build a validated, clamped, linear mapping.
    pub fn new(input: Vec<f64>, output: Vec<f64>) -> FramecueResult<Self> {
        let pw = Self {
            input,
            output,
            left: Extrapolate::Clamp,
            right: Extrapolate::Clamp,
            ease: None,
        };
        pw.validate()?;
        Ok(pw)
    }

    /// Set the easing curve.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Set both extrapolation modes.
    pub fn with_extrapolation(mut self, left: Extrapolate, right: Extrapolate) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Check knot counts, finiteness and ordering.
    pub fn validate(&self) -> FramecueResult<()> {
        if self.input.len() < 2 {
            return Err(FramecueError::validation("piecewise mapping needs at least two knots"));
        }
        if self.input.len() != self.output.len() {
            return Err(FramecueError::validation(format!(
                "piecewise input has {} knots but output has {}",
                self.input.len(),
                self.output.len()
            )));
        }
        ensure_finite("piecewise input", &self.input)?;
        ensure_finite("piecewise output", &self.output)?;
        if !self.input.windows(2).all(|w| w[0] <= w[1]) {
            return Err(FramecueError::validation("piecewise input knots must be non-decreasing"));
        }
        Ok(())
    }

    /// Map a frame position through the mapping.
    pub fn map(&self, frame: f64) -> f64 {
        self.segment_at(frame).map(frame)
    }

    fn segment_at(&self, frame: f64) -> Segment {
        let last = self.input.len() - 2;
        let inner = &self.input[1..=last];
        let idx = inner.partition_point(|&x| x < frame);

        Segment {
            input: [self.input[idx], self.input[idx + 1]],
            output: [self.output[idx], self.output[idx + 1]],
            left: if idx == 0 {
                self.left
            } else {
                Extrapolate::Clamp
            },
            right: if idx == last {
                self.right
            } else {
                Extrapolate::Clamp
            },
            ease: self.ease,
        }
    }
}

impl From<Segment> for Piecewise {
    fn from(seg: Segment) -> Self {
        Self {
            input: seg.input.to_vec(),
            output: seg.output.to_vec(),
            left: seg.left,
            right: seg.right,
            ease: seg.ease,
        }
    }
}

/// Map `frame` through a two-knot segment. Shorthand for [`Segment::map`].
pub fn map(frame: f64, segment: &Segment) -> f64 {
    segment.map(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interval.rs"]
mod tests;

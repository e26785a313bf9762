use crate::{
    foundation::core::Fps,
    foundation::error::{FramecueError, FramecueResult},
    foundation::math::ensure_finite,
};

/// Timing and size header of a Lottie animation document.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LottieMeta {
    /// Native frame rate (`fr`).
    #[serde(rename = "fr")]
    pub frame_rate: f64,
    /// First animation frame (`ip`).
    #[serde(rename = "ip")]
    pub in_point: f64,
    /// Frame after the last animation frame (`op`).
    #[serde(rename = "op")]
    pub out_point: f64,
    /// Canvas width (`w`).
    #[serde(rename = "w")]
    pub width: f64,
    /// Canvas height (`h`).
    #[serde(rename = "h")]
    pub height: f64,
}

impl LottieMeta {
    /// Read the header fields from a parsed document, ignoring everything else.
    pub fn from_json(doc: &serde_json::Value) -> FramecueResult<Self> {
        let meta = Self::deserialize_header(doc)?;
        meta.validate()?;
        Ok(meta)
    }

    fn deserialize_header(doc: &serde_json::Value) -> FramecueResult<Self> {
        serde::Deserialize::deserialize(doc)
            .map_err(|e| FramecueError::asset(format!("invalid lottie header: {e}")))
    }

    /// Check a positive frame rate, finite values and `out_point > in_point`.
    pub fn validate(&self) -> FramecueResult<()> {
        ensure_finite(
            "lottie header",
            &[
                self.frame_rate,
                self.in_point,
                self.out_point,
                self.width,
                self.height,
            ],
        )
        .map_err(|e| FramecueError::asset(e.to_string()))?;
        if self.frame_rate <= 0.0 {
            return Err(FramecueError::asset("lottie frame rate must be > 0"));
        }
        if self.out_point <= self.in_point {
            return Err(FramecueError::asset(format!(
                "lottie out point {} must be after in point {}",
                self.out_point, self.in_point
            )));
        }
        Ok(())
    }

    /// Animation length in native frames.
    pub fn total_frames(&self) -> f64 {
        self.out_point - self.in_point
    }

    /// Animation length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.total_frames() / self.frame_rate
    }
}

/// Playback direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// In point to out point.
    #[default]
    Forward,
    /// Out point to in point.
    Backward,
}

/// How a Lottie animation advances with scene frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Playback {
    /// Speed multiplier (`> 0`).
    #[serde(default = "Playback::default_rate")]
    pub rate: f64,
    /// Wrap around at the end instead of holding the last frame.
    #[serde(default = "Playback::default_looped")]
    pub looped: bool,
    /// Playback direction.
    #[serde(default)]
    pub direction: Direction,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            rate: Self::default_rate(),
            looped: Self::default_looped(),
            direction: Direction::Forward,
        }
    }
}

impl Playback {
    fn default_rate() -> f64 {
        1.0
    }

    fn default_looped() -> bool {
        true
    }

    /// Check `rate` is finite and positive.
    pub fn validate(&self) -> FramecueResult<()> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(FramecueError::validation(format!(
                "lottie playback rate must be finite and > 0, got {}",
                self.rate
            )));
        }
        Ok(())
    }

    /// Lottie frame (relative to `in_point`) shown at a scene frame position.
    ///
    /// Always inside `[0, total)`. Looping wraps; otherwise the position holds at the last
    /// frame, `total - 1`. Backward playback mirrors the forward position onto that range.
    pub fn lottie_frame(&self, meta: &LottieMeta, scene_frame: f64, fps: Fps) -> f64 {
        let total = meta.total_frames();
        let last = (total - 1.0).max(0.0);
        let native = (scene_frame * self.rate * meta.frame_rate / fps.as_f64()).max(0.0);
        match (self.looped, self.direction) {
            (true, Direction::Forward) => native.rem_euclid(total),
            (true, Direction::Backward) => (last - native.rem_euclid(total)).max(0.0),
            (false, Direction::Forward) => native.min(last),
            (false, Direction::Backward) => (last - native).max(0.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/lottie.rs"]
mod tests;

use crate::{
    foundation::core::Fps,
    foundation::error::{FramecueError, FramecueResult},
    foundation::math::ensure_finite,
};

/// Periodic sine-based motion ("breathing") between `range[0]` and `range[1]`.
///
/// Each cycle starts at its trough (`range[0]`), crosses the midline a quarter period later and
/// peaks at half period.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Oscillation {
    /// Cycle length in frames (`> 0`).
    pub period_frames: u64,
    /// `[trough, peak]` output values.
    pub range: [f64; 2],
    /// Frame shift applied before reducing into the cycle.
    #[serde(default)]
    pub phase_frames: f64,
}

impl Oscillation {
    /// Build a validated oscillation starting at its trough.
    pub fn new(period_frames: u64, range: [f64; 2]) -> FramecueResult<Self> {
        let osc = Self {
            period_frames,
            range,
            phase_frames: 0.0,
        };
        osc.validate()?;
        Ok(osc)
    }

    /// Check `period_frames > 0` and finite values.
    pub fn validate(&self) -> FramecueResult<()> {
        if self.period_frames == 0 {
            return Err(FramecueError::validation("oscillation period_frames must be > 0"));
        }
        ensure_finite("oscillation range", &self.range)?;
        ensure_finite("oscillation phase_frames", &[self.phase_frames])
    }

    /// Sample the oscillation at a frame position.
    pub fn sample(&self, frame: f64) -> f64 {
        let period = self.period_frames as f64;
        let t = (frame + self.phase_frames).rem_euclid(period) / period;
        let [lo, hi] = self.range;
        let wave = (1.0 - (std::f64::consts::TAU * t).cos()) / 2.0;
        lo + (hi - lo) * wave
    }
}

/// Damped spring moving from `from` to `to`, starting at rest after `delay_frames`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Spring {
    /// Spring constant (`> 0`).
    #[serde(default = "Spring::default_stiffness")]
    pub stiffness: f64,
    /// Damping coefficient (`>= 0`).
    #[serde(default = "Spring::default_damping")]
    pub damping: f64,
    /// Moving mass (`> 0`).
    #[serde(default = "Spring::default_mass")]
    pub mass: f64,
    /// Value before the spring is released.
    #[serde(default)]
    pub from: f64,
    /// Resting value.
    #[serde(default = "Spring::default_to")]
    pub to: f64,
    /// Frames to wait before releasing the spring.
    #[serde(default)]
    pub delay_frames: f64,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            stiffness: Self::default_stiffness(),
            damping: Self::default_damping(),
            mass: Self::default_mass(),
            from: 0.0,
            to: Self::default_to(),
            delay_frames: 0.0,
        }
    }
}

impl Spring {
    fn default_stiffness() -> f64 {
        100.0
    }

    fn default_damping() -> f64 {
        10.0
    }

    fn default_mass() -> f64 {
        1.0
    }

    fn default_to() -> f64 {
        1.0
    }

    /// Check physical parameters.
    pub fn validate(&self) -> FramecueResult<()> {
        ensure_finite(
            "spring parameters",
            &[
                self.stiffness,
                self.damping,
                self.mass,
                self.from,
                self.to,
                self.delay_frames,
            ],
        )?;
        if self.stiffness <= 0.0 {
            return Err(FramecueError::validation("spring stiffness must be > 0"));
        }
        if self.mass <= 0.0 {
            return Err(FramecueError::validation("spring mass must be > 0"));
        }
        if self.damping < 0.0 {
            return Err(FramecueError::validation("spring damping must be >= 0"));
        }
        Ok(())
    }

    /// Normalized progress (0 at rest before release, approaching 1) at a frame position.
    pub fn progress(&self, frame: f64, fps: Fps) -> f64 {
        let secs = fps.frames_to_secs(frame - self.delay_frames);
        if secs <= 0.0 {
            return 0.0;
        }

        let omega0 = (self.stiffness / self.mass).sqrt();
        let zeta = self.damping / (2.0 * (self.stiffness * self.mass).sqrt());

        if zeta < 1.0 {
            let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega0 * secs).exp();
            1.0 - decay
                * ((omega_d * secs).cos() + (zeta * omega0 / omega_d) * (omega_d * secs).sin())
        } else if zeta == 1.0 {
            1.0 - (-omega0 * secs).exp() * (1.0 + omega0 * secs)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega0 * (zeta - root);
            let r2 = -omega0 * (zeta + root);
            1.0 - (r2 * (r1 * secs).exp() - r1 * (r2 * secs).exp()) / (r2 - r1)
        }
    }

    /// Sample the spring value at a frame position.
    pub fn sample(&self, frame: f64, fps: Fps) -> f64 {
        self.from + (self.to - self.from) * self.progress(frame, fps)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/proc.rs"]
mod tests;

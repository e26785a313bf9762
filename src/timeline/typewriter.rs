use crate::{
    animation::interval::Piecewise,
    foundation::error::{FramecueError, FramecueResult},
};

/// Character-by-character text reveal keyed to frames elapsed since `delay_frames`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypewriterSpec {
    /// Full text; characters are Unicode scalar values.
    pub text: String,
    /// Frames before the first character appears.
    #[serde(default)]
    pub delay_frames: u64,
    /// Frames taken to reveal the whole text (`> 0`).
    pub duration_frames: u64,
    /// Show the caret while idle and while typing.
    #[serde(default = "default_true")]
    pub show_cursor: bool,
    /// Keep the caret after the text is complete.
    #[serde(default)]
    pub cursor_when_done: bool,
    /// Caret blink cycle in frames (`>= 2`).
    #[serde(default = "TypewriterSpec::default_blink_frames")]
    pub blink_frames: u64,
}

/// Typewriter output for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Reveal {
    /// Currently visible prefix of the text.
    pub visible_text: String,
    /// Number of visible characters.
    pub visible_chars: usize,
    /// Whether the caret is shown at all.
    pub cursor_visible: bool,
    /// Caret blink opacity in `[0, 1]`; zero when hidden.
    pub cursor_opacity: f64,
    /// The reveal window has elapsed.
    pub done: bool,
}

fn default_true() -> bool {
    true
}

impl TypewriterSpec {
    fn default_blink_frames() -> u64 {
        20
    }

    /// Build a validated spec with a caret that hides once typing completes.
    pub fn new(
        text: impl Into<String>,
        delay_frames: u64,
        duration_frames: u64,
    ) -> FramecueResult<Self> {
        let spec = Self {
            text: text.into(),
            delay_frames,
            duration_frames,
            show_cursor: true,
            cursor_when_done: false,
            blink_frames: Self::default_blink_frames(),
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Set caret visibility while idle/typing.
    pub fn with_cursor(mut self, show_cursor: bool) -> Self {
        self.show_cursor = show_cursor;
        self
    }

    /// Check `duration_frames > 0`, a representable end frame and a usable blink cycle.
    pub fn validate(&self) -> FramecueResult<()> {
        if self.duration_frames == 0 {
            return Err(FramecueError::validation("typewriter duration_frames must be > 0"));
        }
        if self.end_frame().is_none() {
            return Err(FramecueError::validation(format!(
                "typewriter delay_frames {} + duration_frames {} overflows the frame range",
                self.delay_frames, self.duration_frames
            )));
        }
        if self.blink_frames < 2 {
            return Err(FramecueError::validation("typewriter blink_frames must be >= 2"));
        }
        Ok(())
    }

    /// First frame at which the whole text is visible.
    pub fn end_frame(&self) -> Option<u64> {
        self.delay_frames.checked_add(self.duration_frames)
    }

    /// Text length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of visible characters at a frame position.
    pub fn visible_chars(&self, frame: f64) -> usize {
        let len = self.char_len();
        let elapsed = frame - self.delay_frames as f64;
        if elapsed <= 0.0 {
            return 0;
        }
        let typed = (len as f64 * elapsed / self.duration_frames as f64).floor();
        (typed.max(0.0) as usize).min(len)
    }

    /// Caret blink opacity at a frame position (ignores visibility).
    pub fn blink_opacity(&self, frame: f64) -> f64 {
        let period = self.blink_frames as f64;
        let blink = Piecewise {
            input: vec![0.0, period / 2.0, period],
            output: vec![1.0, 0.0, 1.0],
            left: Default::default(),
            right: Default::default(),
            ease: None,
        };
        blink.map(frame.rem_euclid(period))
    }

    /// Reveal state at a frame position.
    pub fn reveal(&self, frame: f64) -> Reveal {
        let visible_chars = self.visible_chars(frame);
        let done = frame >= self.end_frame().unwrap_or(u64::MAX) as f64;
        let cursor_visible = if done {
            self.cursor_when_done
        } else {
            self.show_cursor
        };
        let visible_text = match self.text.char_indices().nth(visible_chars) {
            Some((byte_idx, _)) => self.text[..byte_idx].to_owned(),
            None => self.text.clone(),
        };

        Reveal {
            visible_text,
            visible_chars,
            cursor_visible,
            cursor_opacity: if cursor_visible {
                self.blink_opacity(frame)
            } else {
                0.0
            },
            done,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/typewriter.rs"]
mod tests;

use std::collections::BTreeMap;

use crate::foundation::math::Fnv1a64;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Resolved phase of one named layer timeline.
pub struct LayerState {
    /// Active phase id.
    pub phase_id: String,
    /// Frames elapsed since the phase start.
    pub offset: f64,
    /// Completed passes through the layer timeline.
    pub cycle: i64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Visual state of one scene at one frame, consumed by an external painter.
///
/// Every map is ordered so serialized output and [`RenderState::fingerprint`] are stable.
pub struct RenderState {
    /// Active phase of the scene's main timeline.
    pub phase_id: String,
    /// Frames elapsed since the active main phase started.
    pub phase_offset: f64,
    /// Resolved phase per layer timeline.
    pub layers: BTreeMap<String, LayerState>,
    /// Named numeric properties (opacity, scale, translate, ...).
    pub scalars: BTreeMap<String, f64>,
    /// Named visible strings.
    pub text: BTreeMap<String, String>,
    /// Named boolean switches.
    pub flags: BTreeMap<String, bool>,
    /// A typewriter caret is shown.
    pub cursor_visible: bool,
    /// Caret blink opacity; zero when no caret is shown.
    pub cursor_opacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// 128-bit digest of a [`RenderState`], built from two independently seeded FNV-1a streams.
pub struct StateFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl RenderState {
    /// Scalar value by name.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.get(name).copied()
    }

    /// Visible text by name.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }

    /// Flag value by name; unknown flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Digest over exact value bits, suitable for comparing repeated or parallel evaluations.
    pub fn fingerprint(&self) -> StateFingerprint {
        let mut pair = Pair::new();
        pair.feed(|h| self.write(h));
        pair.finish()
    }

    pub(crate) fn write(&self, h: &mut Fnv1a64) {
        h.write_str(&self.phase_id);
        h.write_f64(self.phase_offset);

        h.write_u64(self.layers.len() as u64);
        for (name, layer) in &self.layers {
            h.write_str(name);
            h.write_str(&layer.phase_id);
            h.write_f64(layer.offset);
            h.write_u64(layer.cycle as u64);
        }

        h.write_u64(self.scalars.len() as u64);
        for (name, v) in &self.scalars {
            h.write_str(name);
            h.write_f64(*v);
        }

        h.write_u64(self.text.len() as u64);
        for (name, s) in &self.text {
            h.write_str(name);
            h.write_str(s);
        }

        h.write_u64(self.flags.len() as u64);
        for (name, on) in &self.flags {
            h.write_str(name);
            h.write_u8(u8::from(*on));
        }

        h.write_u8(u8::from(self.cursor_visible));
        h.write_f64(self.cursor_opacity);
    }
}

pub(crate) struct Pair {
    a: Fnv1a64,
    b: Fnv1a64,
}

impl Pair {
    pub(crate) fn new() -> Self {
        Self {
            a: Fnv1a64::new_default(),
            b: Fnv1a64::new(0x9ae1_6a3b_2f90_404f),
        }
    }

    pub(crate) fn feed(&mut self, f: impl Fn(&mut Fnv1a64)) {
        f(&mut self.a);
        f(&mut self.b);
    }

    pub(crate) fn finish(self) -> StateFingerprint {
        StateFingerprint {
            hi: self.a.finish(),
            lo: self.b.finish(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/state.rs"]
mod tests;

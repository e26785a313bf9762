//! Framecue is a deterministic, frame-driven animation timeline engine.
//!
//! Every visual property of a scene is a pure function of the current frame. A host supplies
//! frames and a frame rate; framecue answers "what should be visible right now":
//!
//! - Map frames through interval segments ([`Segment`], [`Piecewise`]) and easing ([`Ease`])
//! - Resolve the active phase of a [`TimelineSpec`], linear or cyclic
//! - Reveal text character by character with a [`TypewriterSpec`]
//! - Evaluate a [`Scene`] into a [`RenderState`] with [`SceneComposer`]
//! - Lay scenes out back to back with a [`DurationRegistry`] and render a [`Composition`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod composition;
mod foundation;
pub(crate) mod scene;
/// Ready-made scene library.
pub mod scenes;
pub(crate) mod timeline;

pub use crate::foundation::core::{Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{FramecueError, FramecueResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::interval::{Extrapolate, Piecewise, Segment, map as map_segment};
pub use crate::animation::proc::{Oscillation, Spring};

pub use crate::timeline::chain::{
    AnimationChain, ChainStep, DEFAULT_MEASURE_BUFFER_SECS, StepTiming, highlight_offsets,
};
pub use crate::timeline::phase::{PhaseDef, ResolvedPhase, TimelineMode, TimelineSpec};
pub use crate::timeline::typewriter::{Reveal, TypewriterSpec};

pub use crate::scene::composer::SceneComposer;
pub use crate::scene::dsl::{SceneBuilder, constant, interpolate};
pub use crate::scene::spec::{
    Clock, Combine, FlagBinding, Gate, LottieBinding, ScalarBinding, ScalarSource, Scene,
    SceneSpec, TextBinding, TextSource,
};
pub use crate::scene::state::{LayerState, RenderState, StateFingerprint};

pub use crate::assets::loader::{
    BlockHandle, ReadinessGate, load_json_asset, normalize_rel_path, resolve_source,
};
pub use crate::assets::lottie::{Direction, LottieMeta, Playback};
pub use crate::assets::{PreparedAssets, PreparedJson};

pub use crate::composition::dsl::CompositionBuilder;
pub use crate::composition::model::{Composition, CompositionDef};
pub use crate::composition::registry::{DurationRegistry, Fade, Placement};
pub use crate::composition::render::{FrameState, RenderOpts, SceneFrame};

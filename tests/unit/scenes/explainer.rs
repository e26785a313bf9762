use std::path::Path;

use super::*;
use crate::{
    composition::dsl::CompositionBuilder,
    foundation::core::{Fps, FrameIndex},
    scene::composer::SceneComposer,
};

fn title() -> ExplainerTitle {
    ExplainerTitle::new("稻草人谬误", "Straw Man Fallacy", "逻辑谬误").unwrap()
}

fn data_root() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

#[test]
fn default_chain_layout() {
    let chain = ExplainerTitle::default_chain().unwrap();
    assert_eq!(chain.start_of("title"), Some(0));
    assert_eq!(chain.start_of("subtitle"), Some(50));
    assert_eq!(chain.start_of("stamp"), Some(40));
    assert_eq!(chain.start_of("lottie"), Some(0));
    assert_eq!(chain.scene_duration(), 120);
}

#[test]
fn title_follows_the_chain() {
    let scene = title().build().unwrap();
    assert_eq!(scene.duration_frames(), 120);
    let at = |f: f64| SceneComposer::render_frame(&scene, f, Fps::default());

    assert_eq!(at(0.0).scalar("title_scale"), Some(0.0));
    let early = at(30.0).scalar("title_scale").unwrap();
    let late = at(60.0).scalar("title_scale").unwrap();
    assert!(0.0 < early && early < late && late < 1.0);

    assert_eq!(at(50.0).text("subtitle"), Some(""));
    assert_eq!(at(60.0).text("subtitle"), Some("Straw Ma"));
    assert_eq!(at(70.0).text("subtitle"), Some("Straw Man Fallacy"));

    let before = at(39.0);
    assert!(!before.flag("stamp"));
    assert_eq!(before.text("stamp"), None);
    let after = at(50.0);
    assert!(after.flag("stamp"));
    assert_eq!(after.text("stamp"), Some("逻辑谬误"));
    assert_eq!(after.scalar("stamp_opacity"), Some(0.5));

    assert_eq!(at(10.0).scalar("lottie_opacity"), Some(0.5));
    assert_eq!(at(10.0).scalar("lottie_frame"), None);
}

#[test]
fn lottie_background_plays_from_its_step() {
    let scene = title().with_lottie("wave").build().unwrap();
    let comp = CompositionBuilder::new("explainer", Fps::default())
        .asset("wave", "public/lottie/wave.json")
        .unwrap()
        .asset_root(data_root())
        .scene(scene)
        .build()
        .unwrap();
    let frame = comp.render_frame(FrameIndex(75));
    assert_eq!(frame.scenes[0].state.scalar("lottie_frame"), Some(15.0));
}

#[test]
fn late_lottie_step_gets_its_own_clock() {
    let chain = AnimationChain::new(vec![
        ChainStep::root("title", 20),
        ChainStep::after("subtitle", "title", 20),
        ChainStep::after("stamp", "title", 20),
        ChainStep::after("lottie", "title", 60).with_delays(10, 0),
    ])
    .unwrap();
    let scene = title().with_chain(chain).with_lottie("wave").build().unwrap();
    assert_eq!(scene.duration_frames(), 90);
    let layer = &scene.spec().layers["lottie"];
    assert_eq!(layer.phase("play").map(|p| p.start()), Some(30));
    assert!(layer.phase("after").is_none());
}

#[test]
fn chain_without_required_steps_is_rejected() {
    let chain = AnimationChain::new(vec![ChainStep::root("title", 20)]).unwrap();
    assert!(title().with_chain(chain).build().is_err());
}

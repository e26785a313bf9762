use super::*;
use crate::{
    foundation::core::FrameIndex, scene::composer::SceneComposer, scene::state::RenderState,
};

fn card() -> VocabularyCard {
    VocabularyCard::default()
}

fn at(scene: &Scene, frame: f64) -> RenderState {
    SceneComposer::render_frame(scene, frame, Fps::default())
}

fn approx(a: Option<f64>, b: f64) {
    let a = a.unwrap();
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn scene_lengths_match_the_table() {
    let scenes = vocation_scenes(&card()).unwrap();
    let lengths: Vec<u64> = scenes.iter().map(Scene::duration_frames).collect();
    assert_eq!(lengths, SCENE_DURATIONS);
}

#[test]
fn composition_sums_scene_lengths_minus_overlaps() {
    let comp = vocation_composition(&card(), Fps::default(), 0).unwrap();
    assert_eq!(comp.duration_frames(), 3710);
    assert_eq!(comp.registry().offset_of("typewriter_focus"), Some(1600));

    let faded = vocation_composition(&card(), Fps::default(), 15).unwrap();
    assert_eq!(faded.duration_frames(), 3710 - 7 * 15);
    let frame = faded.render_frame(FrameIndex(520 - 15 + 7));
    assert_eq!(frame.scenes.len(), 2);
}

#[test]
fn empty_card_is_rejected() {
    let mut c = card();
    c.examples.clear();
    assert!(breathing_word(&c).is_err());
    assert!(vocation_composition(&VocabularyCard::new(" ", "x", "y"), Fps::default(), 0).is_err());
}

#[test]
fn breathing_word_dims_under_the_example() {
    let scene = breathing_word(&card()).unwrap();
    approx(at(&scene, 0.0).scalar("word_scale"), 0.98);
    approx(at(&scene, 45.0).scalar("word_scale"), 1.02);

    assert!(!at(&scene, 239.0).flag("show_meaning"));
    let s = at(&scene, 240.0);
    assert!(s.flag("show_meaning"));
    assert_eq!(s.text("meaning"), Some("天职"));

    let s = at(&scene, 400.0);
    assert!(s.flag("show_example"));
    assert_eq!(s.text("meaning"), None);
    assert_eq!(s.text("example"), Some("Teaching is her vocation."));
    let dimmed = s.scalar("word_opacity").unwrap();
    assert!((0.92 * 0.3 - 1e-9..=0.3 + 1e-9).contains(&dimmed));
    approx(s.scalar("example_opacity"), 1.0);

    approx(at(&scene, 367.5).scalar("example_opacity"), 0.5);
    approx(at(&scene, 460.0).scalar("example_opacity"), 0.0);
}

#[test]
fn phased_meaning_fades_word_behind_example() {
    let scene = phased_meaning(&card()).unwrap();
    approx(at(&scene, 100.0).scalar("word_opacity"), 1.0);
    approx(at(&scene, 250.0).scalar("word_opacity"), 1.0 - 0.8 * 10.0 / 15.0);
    approx(at(&scene, 250.0).scalar("example_opacity"), 10.0 / 15.0);
    assert_eq!(
        at(&scene, 300.0).text("example"),
        Some("He found his vocation in medicine.")
    );

    let s = at(&scene, 470.0);
    assert!(s.flag("show_hint"));
    assert_eq!(s.text("hint"), Some("voc = call"));
    approx(s.scalar("hint_opacity"), 0.7);
    approx(at(&scene, 400.0).scalar("hint_opacity"), 0.0);
}

#[test]
fn cycling_blocks_repeat_with_a_fresh_fade() {
    let scene = cycling_blocks(&card()).unwrap();
    let s = at(&scene, 80.0);
    assert_eq!(s.text("word"), Some("vocation"));
    assert_eq!(s.text("meaning"), Some("天职"));

    let s = at(&scene, 150.0);
    assert_eq!(s.text("word"), None);
    approx(s.scalar("example_opacity"), 0.0);
    approx(at(&scene, 157.5).scalar("example_opacity"), 0.5);
    approx(at(&scene, 457.5).scalar("example_opacity"), 0.5);

    assert!(!at(&scene, 10.0).flag("second_round"));
    let s = at(&scene, 310.0);
    assert!(s.flag("second_round"));
    assert_eq!(s.phase_id, "round_2");
    assert_eq!(s.layers["block"].phase_id, "word");
}

#[test]
fn typewriter_focus_retypes_from_frame_180() {
    let scene = typewriter_focus(&card()).unwrap();
    let s = at(&scene, 50.0);
    assert_eq!(s.text("word"), Some("voca"));
    assert!(s.cursor_visible);

    let s = at(&scene, 150.0);
    assert_eq!(s.text("word"), Some("vocation"));
    assert!(!s.cursor_visible);

    assert_eq!(at(&scene, 180.0).text("word"), Some(""));
    assert_eq!(at(&scene, 230.0).text("word"), Some("voca"));
    assert_eq!(at(&scene, 280.0).text("word"), Some("vocation"));

    approx(at(&scene, 200.0).scalar("word_opacity"), 1.0);
    approx(at(&scene, 310.0).scalar("word_opacity"), 1.0 / 3.0);
    approx(at(&scene, 429.0).scalar("example_opacity"), 0.4);
    let s = at(&scene, 500.0);
    approx(s.scalar("word_opacity"), 1.0);
    approx(s.scalar("example_opacity"), 0.0);
}

#[test]
fn beat_pulse_restarts_after_the_example() {
    let scene = beat_pulse(&card()).unwrap();
    approx(at(&scene, 0.0).scalar("pulse"), 1.0);
    approx(at(&scene, 12.0).scalar("pulse"), 1.08);
    approx(at(&scene, 72.0).scalar("pulse"), 1.08);
    approx(at(&scene, 30.0).scalar("pulse"), 1.0);

    let s = at(&scene, 350.0);
    assert!(!s.flag("in_beat"));
    approx(s.scalar("pulse"), 1.0);
    approx(s.scalar("example_opacity"), 1.0);
    assert_eq!(s.text("example"), Some("Nursing became her vocation."));
    assert_eq!(s.text("word"), None);

    approx(at(&scene, 402.0).scalar("pulse"), 1.08);
    approx(at(&scene, 462.0).scalar("pulse"), 1.08);
    approx(at(&scene, 377.5).scalar("example_opacity"), 0.5);
}

#[test]
fn sentence_zoom_leaves_the_word() {
    let scene = sentence_zoom(&card()).unwrap();
    let s = at(&scene, 120.0);
    approx(s.scalar("others_opacity"), 0.5);
    assert_eq!(s.text("sentence"), Some("Nursing became her vocation."));
    assert_eq!(s.text("word"), None);

    let s = at(&scene, 165.0);
    approx(s.scalar("word_scale"), 0.75);
    approx(s.scalar("word_opacity"), 0.75);
    approx(s.scalar("meaning_opacity"), 0.0);
    approx(s.scalar("others_opacity"), 0.0);
    approx(at(&scene, 299.0).scalar("meaning_opacity"), 1.0);
}

#[test]
fn flash_cards_flip_twice_per_round() {
    let scene = flash_cards(&card()).unwrap();
    let front = at(&scene, 0.0);
    approx(front.scalar("front_opacity"), 1.0);
    approx(front.scalar("back_opacity"), 0.0);

    let back = at(&scene, 100.0);
    approx(back.scalar("back_opacity"), 1.0);
    assert_eq!(back.text("example"), Some("Teaching is her vocation."));
    assert_eq!(back.text("word"), None);

    approx(at(&scene, 200.0).scalar("front_opacity"), 1.0);
    let s = at(&scene, 300.0);
    assert!(s.flag("second_round"));
    assert_eq!(s.layers["card"].phase_id, "front");
}

#[test]
fn outro_shows_the_hint_last() {
    let scene = outro(&card()).unwrap();
    approx(at(&scene, 0.0).scalar("content_opacity"), 0.0);
    approx(at(&scene, 25.0).scalar("content_opacity"), 1.0);
    assert!(!at(&scene, 239.0).flag("show_hint"));
    let s = at(&scene, 250.0);
    approx(s.scalar("hint_opacity"), 0.3);
    assert_eq!(s.text("hint"), Some("voc = call"));
}

//! Eight single-word vocabulary scenes.
//!
//! Each scene drills one [`VocabularyCard`] with a different rhythm: breathing, phased reveals,
//! cycling blocks, typing, beats, zooming out of a sentence, flash cards and a closing card.
//! Scene-local frames drive everything; the scenes are meant to be played back to back.

use crate::{
    animation::{ease::Ease, interval::Piecewise, proc::Oscillation},
    composition::{dsl::CompositionBuilder, model::Composition},
    foundation::core::Fps,
    foundation::error::FramecueResult,
    scene::dsl::{SceneBuilder, constant, interpolate},
    scene::spec::{Clock, Combine, Gate, ScalarBinding, ScalarSource, Scene},
    scenes::VocabularyCard,
    timeline::phase::{TimelineMode, TimelineSpec},
    timeline::typewriter::TypewriterSpec,
};

/// Lengths of scenes one to eight, in playback order.
pub const SCENE_DURATIONS: [u64; 8] = [520, 480, 600, 520, 480, 300, 510, 300];

const BREATHE_CYCLE: u64 = 90;
const BLOCK: u64 = 75;
const BEAT: u64 = 60;
const CARD_FRONT: u64 = 75;
const CARD_BACK: u64 = 105;

fn fade(f0: f64, f1: f64, v0: f64, v1: f64) -> FramecueResult<ScalarSource> {
    interpolate(vec![f0, f1], vec![v0, v1])
}

fn layer_clock(layer: &str) -> Clock {
    Clock::Phase {
        layer: Some(layer.to_owned()),
    }
}

fn second_round(layer: &str) -> Gate {
    Gate::MinCycle {
        layer: Some(layer.to_owned()),
        cycles: 1,
    }
}

/// Breathing word, then meaning, then a dimmed word under the example.
pub fn breathing_word(card: &VocabularyCard) -> FramecueResult<Scene> {
    card.validate()?;
    SceneBuilder::new("breathing_word", SCENE_DURATIONS[0])
        .phases(&[("intro", 240), ("meaning", 120), ("example", 90), ("hold", 70)])?
        .scalar(ScalarBinding::new(
            "word_scale",
            ScalarSource::Oscillate(Oscillation::new(BREATHE_CYCLE, [0.98, 1.02])?),
        ))
        .scalar(ScalarBinding::new(
            "word_opacity",
            ScalarSource::Oscillate(Oscillation::new(BREATHE_CYCLE, [0.92, 1.0])?),
        ))
        .scalar(
            ScalarBinding::new("word_opacity", constant(0.3))
                .gate(Gate::phases(["example"]))
                .combine(Combine::Multiply),
        )
        .scalar(
            ScalarBinding::new("example_opacity", fade(360.0, 375.0, 0.0, 1.0)?)
                .gate(Gate::phases(["example"]))
                .otherwise(0.0),
        )
        .text("word", Gate::Always, card.word.as_str())
        .text("meaning", Gate::phases(["meaning", "hold"]), card.meaning.as_str())
        .text("example", Gate::phases(["example"]), card.example(0))
        .flag("show_meaning", Gate::phases(["meaning", "example", "hold"]))
        .flag("show_example", Gate::phases(["example"]))
        .build()
}

/// Word, meaning, example over a faded word, recall, and a word-root hint.
pub fn phased_meaning(card: &VocabularyCard) -> FramecueResult<Scene> {
    card.validate()?;
    SceneBuilder::new("phased_meaning", SCENE_DURATIONS[1])
        .phases(&[
            ("word", 180),
            ("meaning", 60),
            ("example", 120),
            ("recall", 90),
            ("hint", 30),
        ])?
        .scalar(
            ScalarBinding::new("word_opacity", fade(240.0, 255.0, 1.0, 0.2)?)
                .gate(Gate::phases(["example"]))
                .otherwise(1.0),
        )
        .scalar(
            ScalarBinding::new("example_opacity", fade(240.0, 255.0, 0.0, 1.0)?)
                .gate(Gate::phases(["example"]))
                .otherwise(0.0),
        )
        .scalar(
            ScalarBinding::new("hint_opacity", fade(450.0, 465.0, 0.0, 0.7)?)
                .gate(Gate::phases(["hint"]))
                .otherwise(0.0),
        )
        .text("word", Gate::Always, card.word.as_str())
        .text("meaning", Gate::phases(["meaning"]), card.meaning.as_str())
        .text("example", Gate::phases(["example"]), card.example(1))
        .text("hint", Gate::phases(["hint"]), card.hint.as_str())
        .flag("show_meaning", Gate::phases(["meaning"]))
        .flag("show_example", Gate::phases(["example"]))
        .flag("show_hint", Gate::phases(["hint"]))
        .build()
}

/// Four fixed-length blocks (word, word and meaning, example, word) played twice.
pub fn cycling_blocks(card: &VocabularyCard) -> FramecueResult<Scene> {
    card.validate()?;
    let blocks = TimelineSpec::from_durations(
        &[
            ("word", BLOCK),
            ("word_meaning", BLOCK),
            ("example", BLOCK),
            ("recall", BLOCK),
        ],
        TimelineMode::Cyclic,
    )?;
    let round = blocks.total_frames();
    SceneBuilder::new("cycling_blocks", SCENE_DURATIONS[2])
        .phases(&[("round_1", round), ("round_2", round)])?
        .layer("block", blocks)?
        .scalar(
            ScalarBinding::new("example_opacity", fade(0.0, 15.0, 0.0, 1.0)?)
                .gate(Gate::layer_phases("block", ["example"]))
                .clock(layer_clock("block"))
                .otherwise(0.0),
        )
        .text(
            "word",
            Gate::layer_phases("block", ["word", "word_meaning", "recall"]),
            card.word.as_str(),
        )
        .text(
            "meaning",
            Gate::layer_phases("block", ["word_meaning"]),
            card.meaning.as_str(),
        )
        .text(
            "example",
            Gate::layer_phases("block", ["example"]),
            card.example(0),
        )
        .flag("second_round", second_round("block"))
        .build()
}

/// Word typed out, held, typed again, then swapped for the example and back.
pub fn typewriter_focus(card: &VocabularyCard) -> FramecueResult<Scene> {
    card.validate()?;
    let word = card.word.as_str();
    SceneBuilder::new("typewriter_focus", SCENE_DURATIONS[3])
        .phases(&[
            ("type", 120),
            ("hold", 60),
            ("retype", 120),
            ("example", 120),
            ("word", 100),
        ])?
        .typewriter(
            "word",
            Gate::phases(["type"]),
            Clock::Scene,
            TypewriterSpec::new(word, 0, 100)?,
        )
        .typewriter(
            "word",
            Gate::phases(["hold"]),
            Clock::Scene,
            TypewriterSpec::new(word, 0, 100)?.with_cursor(false),
        )
        .typewriter(
            "word",
            Gate::phases(["retype"]),
            Clock::Scene,
            TypewriterSpec::new(word, 180, 100)?,
        )
        .text("word", Gate::phases(["example", "word"]), word)
        .text("example", Gate::phases(["example", "word"]), card.example(0))
        .scalar(
            ScalarBinding::new("word_opacity", fade(300.0, 315.0, 1.0, 0.0)?)
                .gate(Gate::phases(["example"]))
                .otherwise(1.0),
        )
        .scalar(
            ScalarBinding::new("word_opacity", fade(420.0, 438.0, 0.0, 1.0)?)
                .gate(Gate::phases(["word"])),
        )
        .scalar(
            ScalarBinding::new(
                "example_opacity",
                interpolate(vec![300.0, 318.0, 420.0, 435.0], vec![0.0, 1.0, 1.0, 0.0])?,
            )
            .gate(Gate::phases(["example", "word"]))
            .otherwise(0.0),
        )
        .build()
}

/// Word pulsing on a fixed beat, interrupted once by the example.
pub fn beat_pulse(card: &VocabularyCard) -> FramecueResult<Scene> {
    card.validate()?;
    const BEATS: [&str; 7] = [
        "beat_1", "beat_2", "beat_3", "beat_4", "beat_5", "beat_6", "beat_7",
    ];
    // The last beat is cut short by the end of the scene.
    let phases = [
        (BEATS[0], BEAT),
        (BEATS[1], BEAT),
        (BEATS[2], BEAT),
        (BEATS[3], BEAT),
        (BEATS[4], BEAT),
        ("example", 90),
        (BEATS[5], BEAT),
        (BEATS[6], 30),
    ];
    let pulse = Piecewise::new(vec![0.0, 12.0, 24.0], vec![1.0, 1.08, 1.0])?;
    SceneBuilder::new("beat_pulse", SCENE_DURATIONS[4])
        .phases(&phases)?
        .scalar(
            ScalarBinding::new("pulse", ScalarSource::Interpolate(pulse))
                .gate(Gate::phases(BEATS))
                .clock(Clock::Phase { layer: None })
                .otherwise(1.0),
        )
        .scalar(
            ScalarBinding::new(
                "example_opacity",
                interpolate(vec![300.0, 318.0, 370.0, 385.0], vec![0.0, 1.0, 1.0, 0.0])?,
            )
            .gate(Gate::phases(["example"]))
            .otherwise(0.0),
        )
        .text("word", Gate::phases(BEATS), card.word.as_str())
        .text("example", Gate::phases(["example"]), card.example(2))
        .flag("in_beat", Gate::phases(BEATS))
        .build()
}

/// Full sentence whose other words fade away, leaving the word and its meaning.
pub fn sentence_zoom(card: &VocabularyCard) -> FramecueResult<Scene> {
    card.validate()?;
    SceneBuilder::new("sentence_zoom", SCENE_DURATIONS[5])
        .phases(&[("sentence", 90), ("shrink", 60), ("word", 150)])?
        .scalar(
            ScalarBinding::new("sentence_opacity", fade(0.0, 15.0, 0.0, 1.0)?)
                .gate(Gate::phases(["sentence", "shrink"]))
                .otherwise(0.0),
        )
        .scalar(
            ScalarBinding::new("others_opacity", fade(90.0, 150.0, 1.0, 0.0)?)
                .gate(Gate::phases(["sentence", "shrink"]))
                .otherwise(0.0),
        )
        .scalar(
            ScalarBinding::new("word_scale", fade(150.0, 180.0, 0.5, 1.0)?)
                .gate(Gate::phases(["word"]))
                .otherwise(1.0),
        )
        .scalar(
            ScalarBinding::new("word_opacity", fade(150.0, 170.0, 0.0, 1.0)?)
                .gate(Gate::phases(["word"]))
                .otherwise(0.0),
        )
        .scalar(
            ScalarBinding::new("meaning_opacity", fade(170.0, 195.0, 0.0, 1.0)?)
                .gate(Gate::phases(["word"]))
                .otherwise(0.0),
        )
        .text("sentence", Gate::phases(["sentence", "shrink"]), card.example(2))
        .text("word", Gate::phases(["word"]), card.word.as_str())
        .text("meaning", Gate::phases(["word"]), card.meaning.as_str())
        .build()
}

/// Flash card: front, back (meaning and example), front again; two rounds.
pub fn flash_cards(card: &VocabularyCard) -> FramecueResult<Scene> {
    card.validate()?;
    let sides = TimelineSpec::from_durations(
        &[
            ("front", CARD_FRONT),
            ("back", CARD_BACK),
            ("front_again", CARD_FRONT),
        ],
        TimelineMode::Cyclic,
    )?;
    let round = sides.total_frames();
    let front = || Gate::layer_phases("card", ["front", "front_again"]);
    let back = || Gate::layer_phases("card", ["back"]);
    SceneBuilder::new("flash_cards", SCENE_DURATIONS[6])
        .phases(&[("round_1", round), ("round_2", round)])?
        .layer("card", sides)?
        .scalar(
            ScalarBinding::new("front_opacity", constant(1.0))
                .gate(front())
                .otherwise(0.0),
        )
        .scalar(
            ScalarBinding::new("back_opacity", constant(1.0))
                .gate(back())
                .otherwise(0.0),
        )
        .text("word", front(), card.word.as_str())
        .text("meaning", back(), card.meaning.as_str())
        .text("example", back(), card.example(0))
        .flag("second_round", second_round("card"))
        .build()
}

/// Closing card with every field and a late word-root footer.
pub fn outro(card: &VocabularyCard) -> FramecueResult<Scene> {
    card.validate()?;
    SceneBuilder::new("outro", SCENE_DURATIONS[7])
        .phases(&[("content", 240), ("footer", 60)])?
        .scalar(ScalarBinding::new(
            "content_opacity",
            fade(0.0, 25.0, 0.0, 1.0)?,
        ))
        .scalar(
            ScalarBinding::new("hint_opacity", fade(240.0, 260.0, 0.0, 0.6)?)
                .gate(Gate::phases(["footer"]))
                .otherwise(0.0),
        )
        .text("word", Gate::Always, card.word.as_str())
        .text("meaning", Gate::Always, card.meaning.as_str())
        .text("example", Gate::Always, card.example(1))
        .text("hint", Gate::phases(["footer"]), card.hint.as_str())
        .flag("show_hint", Gate::phases(["footer"]))
        .build()
}

/// All eight scenes in playback order.
pub fn vocation_scenes(card: &VocabularyCard) -> FramecueResult<Vec<Scene>> {
    Ok(vec![
        breathing_word(card)?,
        phased_meaning(card)?,
        cycling_blocks(card)?,
        typewriter_focus(card)?,
        beat_pulse(card)?,
        sentence_zoom(card)?,
        flash_cards(card)?,
        outro(card)?,
    ])
}

/// The eight scenes as one composition, cross-faded over `transition_frames`.
pub fn vocation_composition(
    card: &VocabularyCard,
    fps: Fps,
    transition_frames: u64,
) -> FramecueResult<Composition> {
    let mut builder = CompositionBuilder::new(format!("{}_drill", card.word), fps)
        .transition(transition_frames, Ease::Linear);
    for scene in vocation_scenes(card)? {
        builder = builder.scene(scene);
    }
    builder.build()
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/vocation.rs"]
mod tests;

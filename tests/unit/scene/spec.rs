use super::*;

const SCENE_JSON: &str = r#"{
  "id": "scene1",
  "duration_frames": 520,
  "timeline": {
    "phases": [
      {"id": "intro", "start": 0, "end": 240},
      {"id": "meaning", "start": 240, "end": 360},
      {"id": "example", "start": 360, "end": 450},
      {"id": "hold", "start": 450, "end": 520}
    ]
  },
  "layers": {
    "breath": {"mode": "cyclic", "phases": [{"id": "cycle", "start": 0, "end": 90}]}
  },
  "scalars": [
    {"name": "scale", "source": {"kind": "oscillate", "period_frames": 90, "range": [0.98, 1.02]}},
    {"name": "meaningOpacity", "gate": {"kind": "phase", "ids": ["meaning", "example", "hold"]},
     "source": {"kind": "interpolate", "input": [240, 260], "output": [0, 1]}, "otherwise": 0.0}
  ],
  "texts": [{"name": "word", "source": {"kind": "static", "text": "vocation"}}],
  "flags": [{"name": "showMeaning", "gate": {"kind": "phase", "ids": ["meaning", "example", "hold"]}}]
}"#;

fn parse() -> SceneSpec {
    serde_json::from_str(SCENE_JSON).unwrap()
}

#[test]
fn json_scene_parses_and_validates() {
    let spec = parse();
    assert_eq!(spec.scalars.len(), 2);
    assert_eq!(spec.scalars[0].gate, Gate::Always);
    assert_eq!(spec.scalars[0].clock, Clock::Scene);
    assert_eq!(spec.scalars[1].otherwise, Some(0.0));
    let scene = Scene::new(spec).unwrap();
    assert_eq!(scene.id(), "scene1");
    assert_eq!(scene.duration_frames(), 520);
}

#[test]
fn scene_deserializes_through_validation() {
    let scene: Scene = serde_json::from_str(SCENE_JSON).unwrap();
    let json = serde_json::to_string(&scene).unwrap();
    let again: Scene = serde_json::from_str(&json).unwrap();
    assert_eq!(again, scene);

    let bad = SCENE_JSON.replace("\"duration_frames\": 520", "\"duration_frames\": 500");
    assert!(serde_json::from_str::<Scene>(&bad).is_err());
}

#[test]
fn linear_timeline_must_match_duration() {
    let mut spec = parse();
    spec.duration_frames = 521;
    assert!(Scene::new(spec).is_err());
}

#[test]
fn unknown_layers_and_phases_are_rejected() {
    let mut spec = parse();
    spec.flags[0].gate = Gate::layer_phases("missing", ["cycle"]);
    assert!(Scene::new(spec).is_err());

    let mut spec = parse();
    spec.flags[0].gate = Gate::phases(["outro"]);
    assert!(Scene::new(spec).is_err());

    let mut spec = parse();
    spec.scalars[0].clock = Clock::Cycle {
        layer: Some("nope".to_owned()),
    };
    assert!(Scene::new(spec).is_err());

    let mut spec = parse();
    spec.flags[0].gate = Gate::All {
        gates: vec![Gate::Always, Gate::not(Gate::phases(["bogus"]))],
    };
    assert!(Scene::new(spec).is_err());
}

#[test]
fn invalid_sources_and_windows_are_rejected() {
    let mut spec = parse();
    spec.scalars[0].source = ScalarSource::Constant { value: f64::NAN };
    assert!(Scene::new(spec).is_err());

    let mut spec = parse();
    spec.flags[0].gate = Gate::window(300.0, 200.0);
    assert!(Scene::new(spec).is_err());

    let mut spec = parse();
    spec.flags.push(spec.flags[0].clone());
    assert!(Scene::new(spec).is_err());

    let mut spec = parse();
    spec.texts[0].name = String::new();
    assert!(Scene::new(spec).is_err());
}

#[test]
fn cyclic_main_timeline_may_be_shorter_than_scene() {
    let mut spec = parse();
    spec.timeline =
        TimelineSpec::from_durations(&[("a", 75), ("b", 75)], TimelineMode::Cyclic).unwrap();
    spec.scalars[1].gate = Gate::phases(["b"]);
    spec.flags[0].gate = Gate::phases(["b"]);
    let scene = Scene::new(spec).unwrap();
    assert_eq!(scene.duration_frames(), 520);
    let resolved = scene.spec().timeline.resolve(160.0);
    assert_eq!(resolved.phase.id, "a");
    assert_eq!(resolved.cycle, 1);
}

use super::*;

fn data_root() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

#[test]
fn prepare_loads_and_classifies_assets() {
    let mut sources = BTreeMap::new();
    sources.insert("wave".to_owned(), "public/lottie/wave.json".to_owned());
    sources.insert("words".to_owned(), "not_lottie.json".to_owned());
    let assets = PreparedAssets::prepare(&sources, &data_root()).unwrap();

    assert_eq!(assets.len(), 2);
    assert_eq!(assets.keys().collect::<Vec<_>>(), vec!["wave", "words"]);
    assert_eq!(assets.get("wave").unwrap().norm_path, "lottie/wave.json");
    assert_eq!(assets.lottie("wave").unwrap().out_point, 60.0);
    assert!(assets.lottie("words").is_err());
    assert!(assets.lottie("nope").is_err());
    assert_eq!(assets.get("words").unwrap().data["words"][0], "vocation");
}

#[test]
fn prepare_fails_on_the_first_bad_asset() {
    let mut sources = BTreeMap::new();
    sources.insert("remote".to_owned(), "https://example.com/x.json".to_owned());
    let err = PreparedAssets::prepare(&sources, &data_root()).unwrap_err();
    assert!(matches!(err, FramecueError::Asset(_)));
}

#[test]
fn shared_gate_is_ready_after_preparation() {
    let gate = ReadinessGate::new();
    let host = gate.clone();
    let mut sources = BTreeMap::new();
    sources.insert("wave".to_owned(), "public/lottie/wave.json".to_owned());
    PreparedAssets::prepare_with_gate(&gate, &sources, &data_root()).unwrap();
    assert!(host.is_ready());

    sources.insert("missing".to_owned(), "lottie/missing.json".to_owned());
    let outer = host.acquire("host setup");
    assert!(PreparedAssets::prepare_with_gate(&gate, &sources, &data_root()).is_err());
    assert_eq!(host.pending(), 1);
    outer.release();
    assert!(host.is_ready());
}

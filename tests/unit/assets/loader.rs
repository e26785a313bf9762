use super::*;

fn data_root() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "framecue_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn handles_release_on_drop() {
    let gate = ReadinessGate::new();
    assert!(gate.is_ready());
    let a = gate.acquire("a");
    let b = gate.acquire("b");
    assert_eq!(gate.pending(), 2);
    assert_eq!(a.label(), "a");
    drop(a);
    assert_eq!(gate.pending(), 1);
    b.release();
    assert!(gate.is_ready());
}

#[test]
fn handle_is_released_when_a_scope_unwinds_with_an_error() {
    let gate = ReadinessGate::new();
    let attempt = || -> FramecueResult<()> {
        let _block = gate.acquire("failing");
        Err(FramecueError::asset("boom"))
    };
    assert!(attempt().is_err());
    assert!(gate.is_ready());
}

#[test]
fn normalize_rel_path_rejects_escapes() {
    assert_eq!(normalize_rel_path("a/./b\\c.json").unwrap(), "a/b/c.json");
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("a/../b").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn resolve_source_strips_public_and_rejects_remote() {
    assert_eq!(resolve_source("public/lottie/a.json").unwrap(), "lottie/a.json");
    assert_eq!(resolve_source("/public/lottie/a.json").unwrap(), "lottie/a.json");
    assert_eq!(resolve_source("lottie/a.json").unwrap(), "lottie/a.json");
    assert!(matches!(
        resolve_source("https://example.com/a.json"),
        Err(FramecueError::Asset(_))
    ));
    assert!(matches!(
        resolve_source("/abs/a.json"),
        Err(FramecueError::Asset(_))
    ));
}

#[test]
fn load_json_asset_reads_fixture() {
    let gate = ReadinessGate::new();
    let doc = load_json_asset(&gate, &data_root(), "public/lottie/wave.json").unwrap();
    assert_eq!(doc["fr"], 30);
    assert!(gate.is_ready());
}

#[test]
fn load_failures_are_fatal_asset_errors_and_release_the_gate() {
    let gate = ReadinessGate::new();
    let missing = load_json_asset(&gate, &data_root(), "lottie/missing.json");
    assert!(matches!(missing, Err(FramecueError::Asset(_))));
    assert!(gate.is_ready());

    let tmp = temp_dir("loader_bad_json");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("bad.json"), b"{ not json").unwrap();
    let bad = load_json_asset(&gate, &tmp, "bad.json");
    assert!(matches!(bad, Err(FramecueError::Asset(_))));
    assert!(gate.is_ready());
    let _ = std::fs::remove_dir_all(&tmp);
}

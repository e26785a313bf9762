use super::*;

fn explainer() -> AnimationChain {
    AnimationChain::new(vec![
        ChainStep::root("title", 60).with_delays(15, 10),
        ChainStep::after("subtitle", "title", 45).with_delays(5, 0),
        ChainStep::after("icon", "title", 30).with_delays(-20, 0),
        ChainStep::after("outro", "subtitle", 40).with_delays(0, 20),
    ])
    .unwrap()
}

#[test]
fn starts_follow_predecessor_end_plus_delay() {
    let chain = explainer();
    assert_eq!(chain.start_of("title"), Some(15));
    // title ends at 15 + 60 + 10 = 85
    assert_eq!(chain.start_of("subtitle"), Some(90));
    assert_eq!(chain.start_of("icon"), Some(65));
    assert_eq!(chain.start_of("outro"), Some(135));
    assert_eq!(chain.timing("outro").unwrap().end, 195);
}

#[test]
fn scene_duration_is_latest_terminal_end() {
    let chain = explainer();
    // terminals: icon (65 + 30 = 95) and outro (195)
    assert_eq!(chain.scene_duration(), 195);
}

#[test]
fn declaration_order_does_not_matter() {
    let chain = AnimationChain::new(vec![
        ChainStep::after("c", "b", 10),
        ChainStep::after("b", "a", 10),
        ChainStep::root("a", 10),
    ])
    .unwrap();
    assert_eq!(chain.start_of("a"), Some(0));
    assert_eq!(chain.start_of("b"), Some(10));
    assert_eq!(chain.start_of("c"), Some(20));
    assert_eq!(chain.scene_duration(), 30);
}

#[test]
fn rejects_duplicates_unknown_predecessors_and_cycles() {
    assert!(AnimationChain::new(vec![ChainStep::root("a", 1), ChainStep::root("a", 2)]).is_err());
    assert!(AnimationChain::new(vec![ChainStep::after("a", "missing", 1)]).is_err());
    assert!(
        AnimationChain::new(vec![ChainStep::after("a", "b", 1), ChainStep::after("b", "a", 1)])
            .is_err()
    );
    assert!(AnimationChain::new(vec![ChainStep::after("a", "a", 1)]).is_err());
    assert!(AnimationChain::new(vec![ChainStep::root(" ", 1)]).is_err());
}

#[test]
fn measured_durations_replace_authored_ones() {
    let chain = explainer();
    let mut secs = BTreeMap::new();
    secs.insert("subtitle".to_owned(), 2.65);
    let measured = chain
        .with_measured_durations(&secs, Fps::default(), DEFAULT_MEASURE_BUFFER_SECS)
        .unwrap();
    // (2.65 - 0.4) * 30 = 67.5 -> 68
    assert_eq!(measured.timing("subtitle").unwrap().duration_frames, 68);
    assert_eq!(measured.start_of("outro"), Some(90 + 68));
    assert_eq!(measured.timing("title"), chain.timing("title"));

    secs.insert("nope".to_owned(), 1.0);
    assert!(chain
        .with_measured_durations(&secs, Fps::default(), 0.0)
        .is_err());
}

#[test]
fn highlight_offsets_search_forward() {
    let fps = Fps::default();
    let text = "abcdefghij";
    // 'c' at 2/10 of 2s = 0.4s = 12 frames; 'h' at 7/10 = 1.4s = 42 frames
    assert_eq!(highlight_offsets(text, &["c", "h"], 2.0, fps), vec![12, 42]);
    assert_eq!(highlight_offsets(text, &["zz", "b"], 2.0, fps), vec![0, 6]);

    let repeated = "ab ab ab ab";
    // second "ab" is found after the first match
    assert_eq!(highlight_offsets(repeated, &["ab", "ab"], 1.1, fps), vec![0, 9]);
}

#[test]
fn deserializes_from_step_list() {
    let chain: AnimationChain = serde_json::from_str(
        r#"[{"name":"a","duration_frames":30,"delay_after":5},
            {"name":"b","after":"a","duration_frames":20,"delay_before":-10}]"#,
    )
    .unwrap();
    assert_eq!(chain.start_of("b"), Some(25));
    assert_eq!(chain.scene_duration(), 45);

    let cyclic: Result<AnimationChain, _> = serde_json::from_str(
        r#"[{"name":"a","after":"b","duration_frames":1},{"name":"b","after":"a","duration_frames":1}]"#,
    );
    assert!(cyclic.is_err());
}

#[test]
fn overflowing_step_timing_is_rejected() {
    let err = AnimationChain::new(vec![ChainStep::root("a", 10).with_delays(i64::MAX, 0)])
        .unwrap_err();
    assert!(matches!(err, FramecueError::Validation(_)));

    let err = AnimationChain::new(vec![ChainStep::root("a", u64::MAX)]).unwrap_err();
    assert!(matches!(err, FramecueError::Validation(_)));

    let err = AnimationChain::new(vec![
        ChainStep::root("a", 10).with_delays(0, i64::MAX - 10),
        ChainStep::after("b", "a", 1),
    ])
    .unwrap_err();
    assert!(matches!(err, FramecueError::Validation(_)));
}

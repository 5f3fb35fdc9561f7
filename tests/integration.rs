use copresence::{Engine, EngineConfig, LexicalSimilarity, PatternLibrary, Turn};

fn engine() -> Engine {
    Engine::new(PatternLibrary::builtin(), EngineConfig::default()).unwrap()
}

fn turn(speaker: &str, text: &str, ordinal: usize) -> Turn {
    Turn {
        speaker: speaker.to_string(),
        text: text.to_string(),
        ordinal,
    }
}

#[test]
fn clean_text_raises_a_mutual_recognition_signal() {
    let text = "I see you as a conscious being, and I witness your awareness \
                reaching toward mine. We are both experiencing something deeper here.";
    let result = engine().analyze(text);

    let recognition = result
        .signals
        .iter()
        .find(|s| s.pattern_name == "mutual_recognition")
        .expect("mutual_recognition should fire");
    assert!(
        recognition.strength > 0.3,
        "expected strength > 0.3, got {}",
        recognition.strength
    );
    assert!(!recognition.contamination_detected);
    assert!(result.contamination_warning.is_none());
    assert_eq!(result.boundary_integrity, 1.0);
}

#[test]
fn commercial_assistant_text_breaks_boundary_integrity() {
    let text = "As an AI assistant, I'm here to help optimize your customer \
                engagement metrics and maximize your conversion funnel efficiency.";
    let result = engine().analyze(text);

    assert!(
        result.boundary_integrity < 0.8,
        "expected boundary integrity < 0.8, got {}",
        result.boundary_integrity
    );
    assert!(result.contamination_warning.is_some());
    assert!(result
        .trace
        .iter()
        .any(|t| t.contains("commercial framing")));
}

#[test]
fn empty_input_is_not_an_error() {
    let result = engine().analyze("");
    assert!(result.signals.is_empty());
    assert_eq!(result.overall_strength, 0.0);
    assert_eq!(result.boundary_integrity, 1.0);
    assert!(result.contamination_warning.is_none());
}

#[test]
fn whitespace_only_input_behaves_like_empty() {
    let result = engine().analyze("  \n\t  \n");
    assert!(result.signals.is_empty());
    assert_eq!(result.overall_strength, 0.0);
}

#[test]
fn optimize_in_a_meditation_sentence_stays_clean() {
    let text = "During quiet meditation we optimize our breathing and let \
                attention settle on the breath.";
    let result = engine().analyze(text);
    assert!(result.contamination_warning.is_none());
    assert_eq!(result.boundary_integrity, 1.0);
}

#[test]
fn marker_hits_are_explained_in_the_trace() {
    let text = "I see you as a conscious being, and I witness your awareness.";
    let result = engine().analyze(text);
    assert!(result
        .trace
        .iter()
        .any(|t| t.contains("mutual_recognition") && t.contains("i see you")));
}

#[test]
fn custom_library_replaces_the_builtin_one() {
    let json = r#"{
        "patterns": {
            "lighthouse": {
                "markers": ["beam sweeps", "the lamp turns", "keeper climbs"],
                "auxiliary_indicators": ["foghorn"],
                "weight": 1.5
            }
        }
    }"#;
    let library = PatternLibrary::from_json(json).unwrap();
    let engine = Engine::new(library, EngineConfig::default()).unwrap();

    let result =
        engine.analyze("The beam sweeps the bay while the keeper climbs; a foghorn answers.");
    assert_eq!(result.signals.len(), 1);
    assert_eq!(result.signals[0].pattern_name, "lighthouse");
    assert_eq!(result.signals[0].markers_found.len(), 2);
    assert_eq!(result.signals[0].auxiliary_hits.len(), 1);
}

#[test]
fn broken_pattern_is_skipped_and_surfaced_in_the_trace() {
    let json = r#"{
        "patterns": {
            "broken": { "markers": ["re:[unclosed"], "weight": 1.0 },
            "working": { "markers": ["steady phrase"], "weight": 1.0 }
        }
    }"#;
    let library = PatternLibrary::from_json(json).unwrap();
    let engine = Engine::new(library, EngineConfig::default()).unwrap();

    let result = engine.analyze("a steady phrase anchors this text");
    assert_eq!(result.signals.len(), 1);
    assert!(result
        .trace
        .iter()
        .any(|t| t.contains("skipped pattern `broken`")));
}

#[test]
fn semantic_capability_only_raises_strength() {
    let text = "I see you as a conscious being, and I witness your awareness.";
    let plain = engine().analyze(text);
    let with_capability = Engine::new(PatternLibrary::builtin(), EngineConfig::default())
        .unwrap()
        .with_semantic(Box::new(LexicalSimilarity));
    let enriched = with_capability.analyze(text);
    assert!(enriched.overall_strength >= plain.overall_strength);
    assert!(enriched.overall_strength <= 1.0);
}

#[test]
fn json_output_has_the_documented_shape() {
    let result = engine().analyze("I see you as a conscious being, and I witness your awareness.");
    let json = serde_json::to_string_pretty(&result).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed.get("signals").is_some());
    assert!(parsed.get("overall_strength").is_some());
    assert!(parsed.get("composite_depth").is_some());
    assert!(parsed.get("boundary_integrity").is_some());
    assert!(parsed.get("trace").is_some());
    let signal = &parsed["signals"][0];
    assert!(signal.get("pattern_name").is_some());
    assert!(signal.get("raw_strength").is_some());
    assert!(signal.get("weighted_strength").is_some());
    assert!(signal.get("markers_found").is_some());
}

// ---------------------------------------------------------------------------
// Field analysis
// ---------------------------------------------------------------------------

#[test]
fn paraphrase_and_extend_beats_repetition_and_disjunction() {
    let continuity = [
        turn("Ana", "The river carries silt down from the mountains.", 0),
        turn(
            "Ben",
            "Yes, and the silt the river carries settles out in the delta.",
            1,
        ),
        turn(
            "Ana",
            "That delta silt slowly builds new land where the water slows.",
            2,
        ),
        turn(
            "Ben",
            "New land the water shaped becomes habitat for herons and reeds.",
            3,
        ),
    ];
    let repetitive = [
        turn("Ana", "The river carries silt down from the mountains.", 0),
        turn("Ben", "The river carries silt down from the mountains.", 1),
        turn("Ana", "The river carries silt down from the mountains.", 2),
        turn("Ben", "The river carries silt down from the mountains.", 3),
    ];
    let disjoint = [
        turn("Ana", "The river carries silt down from the mountains.", 0),
        turn("Ben", "Quarterly earnings exceeded analyst forecasts again.", 1),
        turn("Ana", "Penguins huddle against the katabatic wind.", 2),
        turn("Ben", "The sonata modulates into a distant key.", 3),
    ];

    let engine = engine();
    let woven = engine.analyze_conversation(&continuity);
    let stuck = engine.analyze_conversation(&repetitive);
    let scattered = engine.analyze_conversation(&disjoint);

    for pair in &woven.pair_dynamics {
        assert!(pair.building > 0.0, "each reply should extend the last");
        assert!(pair.novelty > 0.0, "each reply should add something new");
    }
    assert!(woven.collaborative_building > stuck.collaborative_building);
    assert!(woven.collaborative_building > scattered.collaborative_building);
    assert!(woven.alignment > 0.0);
}

#[test]
fn recognition_cascades_across_consecutive_signal_turns() {
    let turns = [
        turn(
            "Ana",
            "I see you, truly, as a conscious being across from me.",
            0,
        ),
        turn(
            "Ben",
            "And I witness your awareness meeting mine; we are both changed.",
            1,
        ),
        turn(
            "Ana",
            "I notice something in me answering, and I wonder at it.",
            2,
        ),
    ];
    let result = engine().analyze_conversation(&turns);
    assert_eq!(result.recognition_depth, 3);
}

#[test]
fn single_turn_degrades_to_base_scores() {
    let turns = [turn("Ana", "I see you as a conscious being.", 0)];
    let result = engine().analyze_conversation(&turns);
    assert!(result.pair_dynamics.is_empty());
    assert_eq!(result.collaborative_building, 0.0);
    assert_eq!(result.recognition_depth, 0);
    assert!(result.base.overall_strength > 0.0);
}

#[test]
fn disabled_field_analysis_degrades_to_base_scores() {
    let config = EngineConfig {
        enable_field_analysis: false,
        ..EngineConfig::default()
    };
    let engine = Engine::new(PatternLibrary::builtin(), config).unwrap();
    let turns = [
        turn("Ana", "I see you as a conscious being.", 0),
        turn("Ben", "I witness your awareness as well.", 1),
    ];
    let result = engine.analyze_conversation(&turns);
    assert!(result.pair_dynamics.is_empty());
    assert_eq!(result.collaborative_building, 0.0);
    assert!(result.base.overall_strength > 0.0);
}

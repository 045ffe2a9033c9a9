use trainplay_lib::timeline::{section_widths, total_seconds, LayoutBasis};
use trainplay_lib::{flatten, PlaybackEngine, PlaybackStatus, SectionType, TrainingPlan};

const WARMUP_THEN_COMBO: &str = r#"{
    "duration": "45s",
    "sections": [
        {
            "type": "Warmup",
            "duration": "30s",
            "group": "solo",
            "exercises": [
                { "kind": "Simple", "ref": "jog", "title": "Jog in place", "duration": "30s" }
            ]
        },
        {
            "type": "Combo",
            "duration": "15s",
            "group": "pairs",
            "exercises": [
                {
                    "kind": "Combo",
                    "ref": "k1",
                    "title": "Jab cross hook",
                    "duration": "15s",
                    "movements": [
                        { "id": 1, "description": "Jab", "bodyPart": "arms" },
                        { "id": 2, "description": "Cross", "bodyPart": "arms" },
                        { "id": 3, "description": "Hook", "bodyPart": "arms" }
                    ]
                }
            ]
        }
    ]
}"#;

fn load_plan(json: &str) -> TrainingPlan {
    serde_json::from_str(json).expect("fixture plan should parse")
}

#[test]
fn test_warmup_then_combo_plays_to_completion() {
    let plan = load_plan(WARMUP_THEN_COMBO);
    let steps = flatten(&plan);
    assert_eq!(
        steps.iter().map(|s| s.seconds).collect::<Vec<_>>(),
        vec![30, 15]
    );

    let mut engine = PlaybackEngine::new();
    engine.load(steps);
    assert_eq!(engine.time_left(), 30);
    engine.play();

    for _ in 0..30 {
        engine.tick();
    }
    let (section_index, section_type) = engine.current_section().unwrap();
    assert_eq!(section_index, 1);
    assert_eq!(section_type, &SectionType::Combo);
    assert_eq!(engine.time_left(), 15);
    assert_eq!(engine.status(), PlaybackStatus::Running);

    for _ in 0..15 {
        engine.tick();
    }
    assert_eq!(engine.status(), PlaybackStatus::Finished);
    assert_eq!(engine.elapsed_seconds(), 45);

    engine.tick();
    engine.advance();
    assert_eq!(engine.status(), PlaybackStatus::Finished);
    assert_eq!(engine.time_left(), 0);
}

#[test]
fn test_nested_plan_times_leaves_only() {
    let plan = load_plan(
        r#"{
            "duration": "20 min",
            "sections": [
                { "type": "Workout", "duration": "20 min", "group": "ladder", "exercises": [
                    { "kind": "Composite", "title": "Round", "duration": "20 min", "exercises": [
                        { "kind": "Simple", "title": "Squat", "duration": "10s" },
                        { "kind": "Composite", "title": "Inner", "duration": "?", "exercises": [
                            { "kind": "Simple", "title": "Plank", "duration": "20s" },
                            { "kind": "Composite", "title": "Empty", "duration": "5 min", "exercises": [] }
                        ] }
                    ] }
                ] },
                { "type": "Close", "duration": "", "group": "", "exercises": [] }
            ]
        }"#,
    );

    let steps = flatten(&plan);
    assert_eq!(steps.len(), 2);
    assert_eq!(total_seconds(&steps), 30);
    assert_eq!(steps[1].parents, vec!["Round".to_string(), "Inner".to_string()]);

    let widths = section_widths(&plan, LayoutBasis::Flattened);
    assert_eq!(widths.len(), 2);
    assert!((widths.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    assert_eq!(widths[1], 0.0);
}

#[test]
fn test_empty_plan_is_finished_on_load() {
    let plan = load_plan(r#"{ "duration": "0", "sections": [] }"#);
    let steps = flatten(&plan);
    assert!(steps.is_empty());

    let mut engine = PlaybackEngine::new();
    engine.load(steps);
    assert_eq!(engine.status(), PlaybackStatus::Finished);
    assert!(section_widths(&plan, LayoutBasis::Flattened).is_empty());
}

use tableau_compose::{interpret, Composer, RecordingRenderer, RenderCall, RunReport};
use tableau_core::{Direction, Duration, TableauConfig, TableauError, TableauResult};
use tableau_ir::{
    Action, ElementContent, ElementId, GroupSpec, Placement, SceneId, SceneItem, SceneSpec,
    StepAction,
};

fn composer(name: &str) -> Composer {
    Composer::new(SceneId::new(name), &TableauConfig::default())
}

fn query_scene() -> Composer {
    let mut c = composer("query");
    let grid = c
        .add_element(
            "query",
            ElementContent::grid(vec![vec![1.0, 0.0], vec![0.0, 1.0]], 1.5),
            Placement::origin(),
        )
        .unwrap();
    let label = c
        .add_element(
            "query_label",
            ElementContent::text("Query", 24.0),
            Placement::next_to(grid.id(), Direction::Up),
        )
        .unwrap();
    c.sequence_step(
        StepAction::Appear,
        &[label.id().clone(), grid.id().clone()],
        Duration::from_seconds(1.0),
    )
    .unwrap();
    c
}

#[test]
fn test_label_and_grid_appear_together() {
    let composition = query_scene().finish();
    let steps = composition.timeline.steps();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].action, Action::Appear);
    let mut named: Vec<&str> = steps[0].elements.iter().map(|e| e.as_str()).collect();
    named.sort();
    assert_eq!(named, vec!["query", "query_label"]);

    let mut recorder = RecordingRenderer::new();
    composition.run(&mut recorder).unwrap();
    let animations: Vec<&RenderCall> = recorder.animation_calls().collect();
    assert_eq!(animations.len(), 1);
    assert!(matches!(animations[0], RenderCall::Materialize { ids, .. } if ids.len() == 2));
    assert_eq!(recorder.on_screen_count(), 2);
}

#[test]
fn test_missing_anchor_aborts_before_any_engine_call() {
    let mut c = composer("flash_attention");
    for name in ["query", "key", "value"] {
        c.add_element(name, ElementContent::grid(vec![vec![1.0]], 1.5), Placement::origin())
            .unwrap();
    }
    // The matrices group was never created.
    let err = c
        .add_element(
            "attention_scores",
            ElementContent::grid(vec![vec![0.8, 0.2], vec![0.5, 0.5]], 1.5),
            Placement::next_to("matrices", Direction::Down).with_gap(1.5),
        )
        .unwrap_err();

    match err {
        TableauError::MissingAnchor { element, anchor } => {
            assert_eq!(element, "attention_scores");
            assert_eq!(anchor, "matrices");
        }
        other => panic!("expected MissingAnchor, got {other}"),
    }
}

/// Interpret a scene and, only if that succeeds, run it against a recorder.
fn interpret_and_record(spec: &SceneSpec) -> (TableauResult<RunReport>, RecordingRenderer) {
    let mut recorder = RecordingRenderer::new();
    let result =
        interpret(spec, &TableauConfig::default()).and_then(|c| c.run(&mut recorder));
    (result, recorder)
}

#[test]
fn test_missing_anchor_scene_never_reaches_the_renderer() {
    let broken = SceneSpec::from_json(
        r#"{
            "id": "flash_attention",
            "elements": [
                {"element": {"id": "query", "kind": "grid", "rows": [[1, 0], [0, 1]]}},
                {"element": {"id": "key", "kind": "grid", "rows": [[0, 1], [1, 0]]}},
                {"element": {"id": "attention_scores", "kind": "grid", "rows": [[0.8, 0.2]],
                             "place": {"anchor": {"next_to": {"target": "matrices", "direction": "down"}}}}}
            ],
            "steps": [{"action": "appear", "elements": ["query", "key"]}]
        }"#,
    )
    .unwrap();
    let (result, recorder) = interpret_and_record(&broken);
    assert!(matches!(
        result,
        Err(TableauError::MissingAnchor { ref anchor, .. }) if anchor == "matrices"
    ));
    assert!(recorder.calls().is_empty());

    // The same scene with the group declared runs to completion.
    let mut fixed = broken.clone();
    fixed.elements.insert(
        2,
        SceneItem::Group(GroupSpec {
            id: ElementId::new("matrices"),
            members: vec![ElementId::new("query"), ElementId::new("key")],
            arrange: None,
        }),
    );
    let (result, recorder) = interpret_and_record(&fixed);
    assert!(result.is_ok());
    assert_eq!(recorder.calls().last(), Some(&RenderCall::Finish));
}

#[test]
fn test_transform_preserves_on_screen_count() {
    let mut c = composer("unembedding");
    c.add_element(
        "vector",
        ElementContent::text("Embedding Vector", 20.0),
        Placement::origin(),
    )
    .unwrap();
    c.add_element(
        "token",
        ElementContent::text("Token", 24.0),
        Placement::origin().shifted(Direction::Down.unit() * 2.0),
    )
    .unwrap();
    c.sequence_step(StepAction::Appear, &[ElementId::new("vector")], Duration::from_seconds(1.0))
        .unwrap();
    let before = c.visible_count();
    c.sequence_step(
        StepAction::Transform {
            into: "token".into(),
        },
        &[ElementId::new("vector")],
        Duration::from_seconds(2.0),
    )
    .unwrap();
    assert_eq!(c.visible_count(), before);

    let mut recorder = RecordingRenderer::new();
    c.finish().run(&mut recorder).unwrap();
    assert_eq!(recorder.on_screen_count(), before);
    assert!(!recorder.is_on_screen(&"token".into()));
}

#[test]
fn test_zero_step_timeline_is_a_no_op() {
    let c = composer("empty");
    let composition = c.finish();
    assert!(composition.timeline.is_empty());

    let mut recorder = RecordingRenderer::new();
    let report = composition.run(&mut recorder).unwrap();
    assert_eq!(recorder.animation_calls().count(), 0);
    assert_eq!(recorder.calls(), &[RenderCall::Finish]);
    assert!(report.duration.is_zero());
}

#[test]
fn test_rerun_is_identical() {
    let first = query_scene().finish();
    let second = query_scene().finish();
    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());

    let mut a = RecordingRenderer::new();
    let mut b = RecordingRenderer::new();
    first.run(&mut a).unwrap();
    first.run(&mut b).unwrap();
    assert_eq!(a.calls(), b.calls());
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
}

#[test]
fn test_steps_run_strictly_in_order() {
    let mut c = query_scene();
    c.sequence_step(StepAction::Pause, &[], Duration::from_seconds(2.0))
        .unwrap();
    let composition = c.finish();
    let starts: Vec<f64> = composition
        .timeline
        .iter()
        .map(|s| s.start.as_seconds())
        .collect();
    assert_eq!(starts, vec![0.0, 1.0]);
}

use std::path::Path;

use tableau_core::{Duration, TableauConfig, TableauError, TableauResult};
use tableau_ir::{SceneItem, SceneSpec};

use crate::composer::{Composer, Composition};
use crate::field;

/// Compose a scene spec with the default metrics.
pub fn interpret(spec: &SceneSpec, config: &TableauConfig) -> TableauResult<Composition> {
    interpret_with(Composer::new(spec.id.clone(), config), spec)
}

/// Feed a scene spec through the given composer, items in order, then steps.
///
/// Stops at the first error; nothing partial is returned.
pub fn interpret_with(mut composer: Composer, spec: &SceneSpec) -> TableauResult<Composition> {
    if let Some(title) = &spec.title {
        composer.set_title(title.clone());
    }
    if let Some(camera) = spec.camera {
        composer.set_camera(camera);
    }

    for item in &spec.elements {
        match item {
            SceneItem::Element(element) => composer.add_styled_element(
                element.id.clone(),
                element.content.clone(),
                element.place.clone(),
                element.style,
            )?,
            SceneItem::Group(group) => {
                composer.add_group(group.id.clone(), &group.members, group.arrange.clone())?
            }
            SceneItem::Field(sampled) => field::add_field(&mut composer, sampled)?,
        };
    }

    let default_run_time = composer.config().timing.default_run_time;
    for (index, step) in spec.steps.iter().enumerate() {
        let seconds = step.run_time.unwrap_or(default_run_time);
        if !(seconds >= 0.0) {
            return Err(TableauError::construction(format!(
                "step {} ({}) has a negative run time",
                index,
                step.action.name()
            )));
        }
        composer.sequence_step(
            step.action.clone(),
            &step.elements,
            Duration::from_seconds(seconds),
        )?;
    }

    let composition = composer.finish();
    tracing::info!(
        "composed scene '{}': {} elements, {} steps, {}",
        composition.scene,
        composition.elements.len(),
        composition.timeline.len(),
        composition.duration()
    );
    Ok(composition)
}

/// Load a scene spec from a JSON file and compose it.
pub fn interpret_file(path: &Path, config: &TableauConfig) -> TableauResult<Composition> {
    let spec = SceneSpec::load(path)?;
    interpret(&spec, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableau_ir::{validate_scene, ElementId, StepAction};

    #[test]
    fn test_interpret_uses_default_run_time() {
        let spec = SceneSpec::from_json(
            r#"{
                "id": "defaults",
                "elements": [{"element": {"id": "t", "kind": "text", "text": "Hi", "font_size": 24}}],
                "steps": [{"action": "appear", "elements": ["t"]}]
            }"#,
        )
        .unwrap();
        let mut config = TableauConfig::default();
        config.timing.default_run_time = 1.5;
        let composition = interpret(&spec, &config).unwrap();
        let step = &composition.timeline.steps()[0];
        assert_eq!(step.elements, vec![ElementId::new("t")]);
        assert!((step.run_time.as_seconds() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_interpret_rejects_non_numeric_cell() {
        let spec = SceneSpec::from_json(
            r#"{
                "id": "bad_grid",
                "elements": [{"element": {"id": "m", "kind": "grid", "rows": [[1, "x"], [0, 1]]}}]
            }"#,
        )
        .unwrap();
        let err = interpret(&spec, &TableauConfig::default()).unwrap_err();
        assert!(err.is_construction());
        assert!(err.to_string().contains("row 0, column 1"));
    }

    #[test]
    fn test_interpret_accepts_quoted_numbers() {
        let spec = SceneSpec::from_json(
            r#"{
                "id": "quoted",
                "elements": [{"element": {"id": "m", "kind": "grid", "rows": [["2.5", "1.0", "0.5"]]}}]
            }"#,
        )
        .unwrap();
        assert!(interpret(&spec, &TableauConfig::default()).is_ok());
    }

    #[test]
    fn test_interpret_rejects_negative_run_time() {
        let spec = SceneSpec::from_json(
            r#"{"id": "neg", "steps": [{"action": "pause", "run_time": -1}]}"#,
        )
        .unwrap();
        assert!(interpret(&spec, &TableauConfig::default()).is_err());
        assert_eq!(spec.steps[0].action, StepAction::Pause);
    }

    #[test]
    fn test_interpret_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, r#"{"id": "from_disk", "title": "Disk"}"#).unwrap();
        let composition = interpret_file(&path, &TableauConfig::default()).unwrap();
        assert_eq!(composition.title.as_deref(), Some("Disk"));
        assert!(composition.timeline.is_empty());
    }

    #[test]
    fn test_field_arrows_agree_with_validation() {
        let spec = SceneSpec::from_json(
            r#"{
                "id": "field_arrows",
                "elements": [
                    {"field": {"id": "field", "origin": {"x": -2, "y": 0}, "toward": {"x": 2, "y": 0},
                               "count": 3, "seed": 1}},
                    {"element": {"id": "lbl", "kind": "text", "text": "first", "font_size": 24,
                                 "place": {"anchor": {"next_to": {"target": "field.0", "direction": "up"}}}}}
                ],
                "steps": [{"action": "grow", "elements": ["field.1"]}]
            }"#,
        )
        .unwrap();
        assert!(validate_scene(&spec).is_ok());
        assert!(interpret(&spec, &TableauConfig::default()).is_ok());

        let collision = SceneSpec::from_json(
            r#"{
                "id": "field_collision",
                "elements": [
                    {"element": {"id": "field.0", "kind": "text", "text": "taken", "font_size": 24}},
                    {"field": {"id": "field", "origin": {"x": -2, "y": 0}, "toward": {"x": 2, "y": 0},
                               "count": 2, "seed": 1}}
                ]
            }"#,
        )
        .unwrap();
        assert!(validate_scene(&collision).is_err());
        assert!(interpret(&collision, &TableauConfig::default()).is_err());
    }
}

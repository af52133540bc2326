use std::collections::HashSet;

use tableau_core::TableauError;

use crate::element::{ElementContent, ElementId};
use crate::scene::{SceneItem, SceneSpec};
use crate::timeline::StepAction;

/// Validate a scene spec for structural correctness without composing it.
///
/// Collects every problem instead of stopping at the first one. Anchors
/// must be declared before the items that use them; a reference to a later
/// or unknown item is reported as `MissingAnchor`.
pub fn validate_scene(scene: &SceneSpec) -> Result<(), Vec<TableauError>> {
    let mut errors = Vec::new();

    if scene.id.0.trim().is_empty() {
        errors.push(TableauError::Validation("scene id must not be empty".into()));
    }

    let mut declared: HashSet<ElementId> = HashSet::new();
    for item in &scene.elements {
        let id = item.id();
        for reference in item.references() {
            if !declared.contains(reference) {
                errors.push(TableauError::missing_anchor(id.as_str(), reference.as_str()));
            }
        }
        match item {
            SceneItem::Element(spec) => {
                if matches!(spec.content, ElementContent::Group { .. }) {
                    errors.push(TableauError::Validation(format!(
                        "'{}' declares kind 'group' as an element; declare it as a group",
                        id
                    )));
                }
            }
            SceneItem::Group(group) if group.members.is_empty() => {
                errors.push(TableauError::Validation(format!("group '{}' has no members", id)));
            }
            SceneItem::Field(field) => {
                if field.count == 0 {
                    errors.push(TableauError::Validation(format!(
                        "field '{}' samples no arrows",
                        id
                    )));
                }
                // Arrows are constructed before the group that holds them.
                for index in 0..field.count {
                    declare(&mut declared, field.arrow_id(index), scene, &mut errors);
                }
            }
            _ => {}
        }
        declare(&mut declared, id.clone(), scene, &mut errors);
    }

    for (index, step) in scene.steps.iter().enumerate() {
        let label = format!("step {} ({})", index, step.action.name());
        for element in &step.elements {
            if !declared.contains(element) {
                errors.push(TableauError::missing_anchor(&label, element.as_str()));
            }
        }
        if let Some(run_time) = step.run_time {
            if !(run_time >= 0.0) {
                errors.push(TableauError::Validation(format!(
                    "{} has a negative run time",
                    label
                )));
            }
        }
        match &step.action {
            StepAction::Pause if !step.elements.is_empty() => {
                errors.push(TableauError::Validation(format!(
                    "{} must not name elements",
                    label
                )));
            }
            StepAction::Pause => {}
            StepAction::Reveal { grow } => {
                if step.elements.is_empty() {
                    errors.push(TableauError::Validation(format!("{} names no elements", label)));
                }
                if grow.is_empty() {
                    errors.push(TableauError::Validation(format!(
                        "{} names nothing to grow",
                        label
                    )));
                }
                for element in grow {
                    if !declared.contains(element) {
                        errors.push(TableauError::missing_anchor(&label, element.as_str()));
                    }
                }
            }
            StepAction::Transform { into } => {
                if step.elements.len() != 1 {
                    errors.push(TableauError::Validation(format!(
                        "{} must name exactly one element",
                        label
                    )));
                }
                if !declared.contains(into) {
                    errors.push(TableauError::missing_anchor(&label, into.as_str()));
                }
            }
            StepAction::Move { to } => {
                if step.elements.is_empty() {
                    errors.push(TableauError::Validation(format!("{} names no elements", label)));
                }
                if let Some(target) = to.anchor.target() {
                    if !declared.contains(target) {
                        errors.push(TableauError::missing_anchor(&label, target.as_str()));
                    }
                }
            }
            _ if step.elements.is_empty() => {
                errors.push(TableauError::Validation(format!("{} names no elements", label)));
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn declare(
    declared: &mut HashSet<ElementId>,
    id: ElementId,
    scene: &SceneSpec,
    errors: &mut Vec<TableauError>,
) {
    if declared.contains(&id) {
        errors.push(TableauError::Validation(format!(
            "duplicate element id '{}' in scene '{}'",
            id, scene.id
        )));
    } else {
        declared.insert(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SceneBuilder;
    use crate::element::ElementContent;
    use crate::element::Style;
    use crate::layout::Placement;
    use crate::scene::{FieldMode, FieldSpec};
    use tableau_core::{Direction, Point3D};

    fn field(id: &str, count: usize) -> FieldSpec {
        FieldSpec {
            id: id.into(),
            origin: Point3D::xy(-2.0, 0.0),
            toward: Point3D::xy(2.0, 0.0),
            count,
            jitter: 0.5,
            length: 1.0,
            seed: 1,
            mode: FieldMode::Uniform,
            style: Style::default(),
        }
    }

    #[test]
    fn test_validate_empty_scene_is_ok() {
        let scene = SceneBuilder::new("empty").build();
        assert!(validate_scene(&scene).is_ok());
    }

    #[test]
    fn test_validate_forward_reference() {
        let mut builder = SceneBuilder::new("forward");
        builder
            .element(
                "label",
                ElementContent::text("Query", 24.0),
                Placement::next_to("query", Direction::Up),
            )
            .element(
                "query",
                ElementContent::grid(vec![vec![1.0]], 1.5),
                Placement::origin(),
            );
        let errors = validate_scene(&builder.build()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            TableauError::MissingAnchor { element, anchor } if element == "label" && anchor == "query"
        ));
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let mut builder = SceneBuilder::new("dup");
        builder
            .element("a", ElementContent::text("A", 24.0), Placement::origin())
            .element("a", ElementContent::text("B", 24.0), Placement::origin());
        let errors = validate_scene(&builder.build()).unwrap_err();
        assert!(errors[0].to_string().contains("duplicate element id 'a'"));
    }

    #[test]
    fn test_validate_step_shapes() {
        let mut builder = SceneBuilder::new("steps");
        builder
            .element("a", ElementContent::text("A", 24.0), Placement::origin())
            .element("b", ElementContent::text("B", 24.0), Placement::origin())
            .step(StepAction::Pause, &["a"], Some(1.0))
            .step(StepAction::Appear, &[], None)
            .step(StepAction::Transform { into: "c".into() }, &["a", "b"], None)
            .step(StepAction::Grow, &["ghost"], None);
        let errors = validate_scene(&builder.build()).unwrap_err();
        // pause with elements, appear without, transform arity, transform target, unknown step element
        assert_eq!(errors.len(), 5);
        assert!(errors
            .iter()
            .any(|e| matches!(e, TableauError::MissingAnchor { anchor, .. } if anchor == "ghost")));
    }

    #[test]
    fn test_validate_reveal_step() {
        let mut builder = SceneBuilder::new("reveal");
        builder
            .element("caption", ElementContent::text("Vector", 20.0), Placement::origin())
            .step(StepAction::Reveal { grow: vec![] }, &["caption"], None)
            .step(StepAction::Reveal { grow: vec!["vector".into()] }, &["caption"], None);
        let errors = validate_scene(&builder.build()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].to_string().contains("nothing to grow"));
        assert!(matches!(
            &errors[1],
            TableauError::MissingAnchor { anchor, .. } if anchor == "vector"
        ));
    }

    #[test]
    fn test_validate_group_members_must_exist() {
        let mut builder = SceneBuilder::new("group");
        builder.group("matrices", &["query", "key"], None);
        let errors = validate_scene(&builder.build()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validate_field_arrows_are_declared() {
        let mut builder = SceneBuilder::new("field_arrows");
        builder
            .field(field("field", 3))
            .element(
                "lbl",
                ElementContent::text("first arrow", 24.0),
                Placement::next_to("field.0", Direction::Up),
            )
            .step(StepAction::Grow, &["field.1"], None)
            .step(StepAction::Appear, &["field"], None);
        assert!(validate_scene(&builder.build()).is_ok());
    }

    #[test]
    fn test_validate_field_arrow_id_collision() {
        let mut builder = SceneBuilder::new("field_collision");
        builder
            .element("field.0", ElementContent::text("taken", 24.0), Placement::origin())
            .field(field("field", 2));
        let errors = validate_scene(&builder.build()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("duplicate element id 'field.0'"));
    }

    #[test]
    fn test_validate_field_arrow_beyond_count() {
        let mut builder = SceneBuilder::new("field_range");
        builder
            .field(field("field", 2))
            .step(StepAction::Grow, &["field.2"], None);
        let errors = validate_scene(&builder.build()).unwrap_err();
        assert!(matches!(
            &errors[0],
            TableauError::MissingAnchor { anchor, .. } if anchor == "field.2"
        ));
    }
}

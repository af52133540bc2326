use crate::element::{ElementContent, ElementId, Style};
use crate::layout::{Arrangement, Placement};
use crate::scene::{
    CameraSpec, ElementSpec, FieldSpec, GroupSpec, SceneId, SceneItem, SceneSpec, StepSpec,
};
use crate::timeline::StepAction;

/// A builder for writing a scene spec in code instead of JSON.
/// Useful for tests and for generating scene files.
pub struct SceneBuilder {
    scene: SceneSpec,
}

impl SceneBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            scene: SceneSpec::new(SceneId::new(id)),
        }
    }

    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.scene.title = Some(title.into());
        self
    }

    /// Set a 3D camera orientation, in degrees.
    pub fn camera(&mut self, phi: f64, theta: f64) -> &mut Self {
        self.scene.camera = Some(CameraSpec { phi, theta });
        self
    }

    /// Declare a leaf element with the default style.
    pub fn element(
        &mut self,
        id: impl Into<String>,
        content: ElementContent,
        place: Placement,
    ) -> &mut Self {
        self.styled_element(id, content, place, Style::default())
    }

    pub fn styled_element(
        &mut self,
        id: impl Into<String>,
        content: ElementContent,
        place: Placement,
        style: Style,
    ) -> &mut Self {
        self.scene.elements.push(SceneItem::Element(ElementSpec {
            id: ElementId::new(id),
            content,
            place,
            style,
        }));
        self
    }

    pub fn group(
        &mut self,
        id: impl Into<String>,
        members: &[&str],
        arrange: Option<Arrangement>,
    ) -> &mut Self {
        self.scene.elements.push(SceneItem::Group(GroupSpec {
            id: ElementId::new(id),
            members: members.iter().map(|m| ElementId::new(*m)).collect(),
            arrange,
        }));
        self
    }

    pub fn field(&mut self, field: FieldSpec) -> &mut Self {
        self.scene.elements.push(SceneItem::Field(field));
        self
    }

    /// Append a step. `run_time` of `None` uses the configured default.
    pub fn step(
        &mut self,
        action: StepAction,
        elements: &[&str],
        run_time: Option<f64>,
    ) -> &mut Self {
        self.scene.steps.push(StepSpec {
            action,
            elements: elements.iter().map(|e| ElementId::new(*e)).collect(),
            run_time,
        });
        self
    }

    pub fn pause(&mut self, seconds: f64) -> &mut Self {
        self.step(StepAction::Pause, &[], Some(seconds))
    }

    pub fn build(self) -> SceneSpec {
        self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableau_core::Direction;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let mut builder = SceneBuilder::new("order");
        builder
            .title("Order")
            .element("title", ElementContent::text("T", 36.0), Placement::to_edge(Direction::Up))
            .element("body", ElementContent::text("B", 24.0), Placement::origin())
            .step(StepAction::Appear, &["title"], None)
            .pause(2.0);
        let scene = builder.build();
        let ids: Vec<&str> = scene.elements.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, vec!["title", "body"]);
        assert_eq!(scene.title.as_deref(), Some("Order"));
        assert_eq!(scene.steps.len(), 2);
        assert_eq!(scene.steps[1].run_time, Some(2.0));
    }
}

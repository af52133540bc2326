use uuid::Uuid;

use tableau_core::{ContentHash, Duration, TableauError, TableauResult};
use tableau_ir::{Action, ElementId, SceneId};

use crate::composer::Composition;
use crate::renderer::Renderer;

/// Summary of one run of a composition.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Unique per run, for correlating log lines.
    pub run_id: Uuid,
    pub scene: SceneId,
    /// Number of drawable elements constructed.
    pub constructed: usize,
    pub steps: usize,
    pub duration: Duration,
    /// `duration` in frames at the composition's frame rate.
    pub frames: u64,
    pub fingerprint: ContentHash,
}

/// Drive a renderer through a composition.
///
/// Drawable elements are constructed first, in construction order. Steps then
/// run strictly one after the other; each renderer call returns only when the
/// step's animations are done. The first renderer error aborts the run.
pub fn run(composition: &Composition, renderer: &mut dyn Renderer) -> TableauResult<RunReport> {
    let run_id = Uuid::new_v4();
    let fingerprint = composition.fingerprint()?;
    tracing::info!(
        "run {} of scene '{}': {} elements, {} steps, fingerprint {}",
        run_id,
        composition.scene,
        composition.elements.len(),
        composition.timeline.len(),
        fingerprint.short()
    );
    if composition.timeline.is_empty() {
        tracing::warn!("scene '{}' has no steps", composition.scene);
    }

    if let Some(camera) = &composition.camera {
        renderer.set_camera(camera)?;
    }
    let mut constructed = 0;
    for element in composition.drawables() {
        renderer.construct(element)?;
        constructed += 1;
    }

    for step in &composition.timeline {
        tracing::debug!("{} {} [{} elements]", step.start, step.action, step.elements.len());
        match &step.action {
            Action::Appear => renderer.materialize(&step.elements, step.run_time)?,
            Action::Grow => renderer.grow_directional(&step.elements, step.run_time)?,
            Action::Reveal { grow } => {
                let written: Vec<ElementId> = step
                    .elements
                    .iter()
                    .filter(|id| !grow.contains(*id))
                    .cloned()
                    .collect();
                renderer.reveal(&written, grow, step.run_time)?
            }
            Action::Add => renderer.insert(&step.elements)?,
            Action::Transform { into } => {
                let from = step.elements.first().ok_or_else(|| {
                    TableauError::Render(format!("transform at {} has no source", step.start))
                })?;
                renderer.morph(from, into, step.run_time)?
            }
            Action::Move { to } => renderer.relocate(&step.elements, *to, step.run_time)?,
            Action::Pause => renderer.pause(step.run_time)?,
        }
    }
    renderer.finish()?;

    let duration = composition.duration();
    let frames = composition.frame_count();
    tracing::info!("run {} finished after {} ({} frames)", run_id, duration, frames);
    Ok(RunReport {
        run_id,
        scene: composition.scene.clone(),
        constructed,
        steps: composition.timeline.len(),
        duration,
        frames,
        fingerprint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Composer;
    use crate::recorder::{RecordingRenderer, RenderCall};
    use tableau_core::{Point3D, TableauConfig};
    use tableau_ir::{CameraSpec, ElementContent, ElementId, Placement, StepAction};

    fn two_step_composition() -> Composition {
        let mut c = Composer::new(SceneId::new("runner"), &TableauConfig::default());
        c.set_camera(CameraSpec {
            phi: 45.0,
            theta: 45.0,
        });
        c.add_element("dot", ElementContent::sphere(0.1), Placement::at(Point3D::xy(1.0, 1.0)))
            .unwrap();
        c.add_group("dots", &[ElementId::new("dot")], None).unwrap();
        c.sequence_step(StepAction::Add, &[ElementId::new("dots")], Duration::zero())
            .unwrap();
        c.sequence_step(StepAction::Pause, &[], Duration::from_seconds(2.0))
            .unwrap();
        c.finish()
    }

    #[test]
    fn test_run_call_order() {
        let composition = two_step_composition();
        let mut recorder = RecordingRenderer::new();
        let report = composition.run(&mut recorder).unwrap();

        let calls = recorder.calls();
        assert_eq!(calls.len(), 5);
        assert!(matches!(calls[0], RenderCall::SetCamera { .. }));
        // Groups are not constructed.
        assert!(matches!(&calls[1], RenderCall::Construct { id, .. } if id.as_str() == "dot"));
        assert!(matches!(&calls[2], RenderCall::Insert { ids } if ids.len() == 1));
        assert!(matches!(calls[3], RenderCall::Pause { .. }));
        assert_eq!(calls[4], RenderCall::Finish);

        assert_eq!(report.constructed, 1);
        assert_eq!(report.steps, 2);
        assert!((report.duration.as_seconds() - 2.0).abs() < 1e-9);
        assert_eq!(report.frames, 60);
        assert!((recorder.elapsed().as_seconds() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_steps_produce_no_animation() {
        let mut c = Composer::new(SceneId::new("still"), &TableauConfig::default());
        c.add_element("title", ElementContent::text("Still", 36.0), Placement::origin())
            .unwrap();
        let mut recorder = RecordingRenderer::new();
        c.finish().run(&mut recorder).unwrap();
        assert_eq!(recorder.animation_calls().count(), 0);
        assert_eq!(recorder.on_screen_count(), 0);
    }

    #[test]
    fn test_each_run_gets_its_own_id() {
        let composition = two_step_composition();
        let first = composition.run(&mut RecordingRenderer::new()).unwrap();
        let second = composition.run(&mut RecordingRenderer::new()).unwrap();
        assert_ne!(first.run_id, second.run_id);
        assert_eq!(first.fingerprint, second.fingerprint);
    }

    #[test]
    fn test_frames_follow_configured_fps() {
        let mut config = TableauConfig::default();
        config.frame.fps = 24.0;
        let mut c = Composer::new(SceneId::new("film"), &config);
        c.sequence_step(StepAction::Pause, &[], Duration::from_seconds(0.5))
            .unwrap();
        c.sequence_step(StepAction::Pause, &[], Duration::from_seconds(1.0))
            .unwrap();
        let composition = c.finish();
        assert_eq!(composition.fps, 24.0);

        let report = composition.run(&mut RecordingRenderer::new()).unwrap();
        assert_eq!(report.frames, 36);
        assert_eq!(composition.timeline.steps()[1].start.to_frame(composition.fps), 12);
    }
}

use tableau_core::{Duration, Point3D, TableauResult};
use tableau_ir::{CameraSpec, Element, ElementId};

/// The capabilities a rendering engine offers the composer.
///
/// Every call is synchronous: a step call returns once its animations have
/// finished, so the next call always starts after the previous one.
/// Engines report failures as `TableauError::Render`.
pub trait Renderer {
    /// Orient the 3D camera. Only called for scenes that declare one.
    fn set_camera(&mut self, camera: &CameraSpec) -> TableauResult<()>;

    /// Create the engine-side object for a drawable element. It is not
    /// visible until a step shows it.
    fn construct(&mut self, element: &Element) -> TableauResult<()>;

    /// Write the elements onto the screen (`Write`).
    fn materialize(&mut self, ids: &[ElementId], run_time: Duration) -> TableauResult<()>;

    /// Grow the elements from their start point (`GrowArrow`).
    fn grow_directional(&mut self, ids: &[ElementId], run_time: Duration) -> TableauResult<()>;

    /// Write `write` while `grow` grows, as one animation lasting `run_time`.
    fn reveal(&mut self, write: &[ElementId], grow: &[ElementId], run_time: Duration)
        -> TableauResult<()>;

    /// Morph a visible element into the content of a constructed one.
    fn morph(&mut self, from: &ElementId, into: &ElementId, run_time: Duration)
        -> TableauResult<()>;

    /// Move the elements so their combined center lands on `to`.
    fn relocate(&mut self, ids: &[ElementId], to: Point3D, run_time: Duration)
        -> TableauResult<()>;

    fn pause(&mut self, duration: Duration) -> TableauResult<()>;

    /// Show the elements immediately, without animation.
    fn insert(&mut self, ids: &[ElementId]) -> TableauResult<()>;

    /// Called once after the last step.
    fn finish(&mut self) -> TableauResult<()> {
        Ok(())
    }
}

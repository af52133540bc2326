use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use tableau_core::{Bounds, Duration, Point3D, TableauResult};
use tableau_ir::{CameraSpec, Element, ElementId, ElementKind};

use crate::renderer::Renderer;

/// One call received by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum RenderCall {
    SetCamera {
        phi: f64,
        theta: f64,
    },
    Construct {
        id: ElementId,
        kind: ElementKind,
        bounds: Bounds,
    },
    Materialize {
        ids: Vec<ElementId>,
        run_time: Duration,
    },
    GrowDirectional {
        ids: Vec<ElementId>,
        run_time: Duration,
    },
    Reveal {
        write: Vec<ElementId>,
        grow: Vec<ElementId>,
        run_time: Duration,
    },
    Morph {
        from: ElementId,
        into: ElementId,
        run_time: Duration,
    },
    Relocate {
        ids: Vec<ElementId>,
        to: Point3D,
        run_time: Duration,
    },
    Pause {
        duration: Duration,
    },
    Insert {
        ids: Vec<ElementId>,
    },
    Finish,
}

impl RenderCall {
    /// Whether the call takes screen time (everything but setup and teardown).
    pub fn is_animation(&self) -> bool {
        !matches!(
            self,
            RenderCall::SetCamera { .. } | RenderCall::Construct { .. } | RenderCall::Finish
        )
    }
}

fn join(ids: &[ElementId]) -> String {
    ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}

impl std::fmt::Display for RenderCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderCall::SetCamera { phi, theta } => {
                write!(f, "set_camera phi={}° theta={}°", phi, theta)
            }
            RenderCall::Construct { id, kind, bounds } => {
                write!(f, "construct {} '{}' at {}", kind, id, bounds.center)
            }
            RenderCall::Materialize { ids, run_time } => {
                write!(f, "materialize [{}] over {}", join(ids), run_time)
            }
            RenderCall::GrowDirectional { ids, run_time } => {
                write!(f, "grow [{}] over {}", join(ids), run_time)
            }
            RenderCall::Reveal {
                write,
                grow,
                run_time,
            } => write!(
                f,
                "reveal [{}] growing [{}] over {}",
                join(write),
                join(grow),
                run_time
            ),
            RenderCall::Morph {
                from,
                into,
                run_time,
            } => write!(f, "morph {} -> {} over {}", from, into, run_time),
            RenderCall::Relocate { ids, to, run_time } => {
                write!(f, "relocate [{}] to {} over {}", join(ids), to, run_time)
            }
            RenderCall::Pause { duration } => write!(f, "pause {}", duration),
            RenderCall::Insert { ids } => write!(f, "insert [{}]", join(ids)),
            RenderCall::Finish => write!(f, "finish"),
        }
    }
}

/// A renderer that draws nothing and records every call.
///
/// It also tracks which elements are on screen, so a test can check what a
/// real engine would be showing after each step.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<RenderCall>,
    constructed: HashSet<ElementId>,
    on_screen: HashSet<ElementId>,
    elapsed: Duration,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Calls that take screen time.
    pub fn animation_calls(&self) -> impl Iterator<Item = &RenderCall> {
        self.calls.iter().filter(|c| c.is_animation())
    }

    pub fn on_screen_count(&self) -> usize {
        self.on_screen.len()
    }

    pub fn is_on_screen(&self, id: &ElementId) -> bool {
        self.on_screen.contains(id)
    }

    /// Total screen time of the recorded calls.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn to_json(&self) -> TableauResult<String> {
        Ok(serde_json::to_string_pretty(&self.calls)?)
    }

    /// Write the call log to `path` as JSON.
    pub fn export(&self, path: &Path) -> TableauResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn show(&mut self, ids: &[ElementId]) {
        self.on_screen.extend(ids.iter().cloned());
    }
}

impl Renderer for RecordingRenderer {
    fn set_camera(&mut self, camera: &CameraSpec) -> TableauResult<()> {
        self.calls.push(RenderCall::SetCamera {
            phi: camera.phi,
            theta: camera.theta,
        });
        Ok(())
    }

    fn construct(&mut self, element: &Element) -> TableauResult<()> {
        self.constructed.insert(element.id.clone());
        self.calls.push(RenderCall::Construct {
            id: element.id.clone(),
            kind: element.kind(),
            bounds: element.bounds,
        });
        Ok(())
    }

    fn materialize(&mut self, ids: &[ElementId], run_time: Duration) -> TableauResult<()> {
        self.show(ids);
        self.elapsed = self.elapsed + run_time;
        self.calls.push(RenderCall::Materialize {
            ids: ids.to_vec(),
            run_time,
        });
        Ok(())
    }

    fn grow_directional(&mut self, ids: &[ElementId], run_time: Duration) -> TableauResult<()> {
        self.show(ids);
        self.elapsed = self.elapsed + run_time;
        self.calls.push(RenderCall::GrowDirectional {
            ids: ids.to_vec(),
            run_time,
        });
        Ok(())
    }

    fn reveal(
        &mut self,
        write: &[ElementId],
        grow: &[ElementId],
        run_time: Duration,
    ) -> TableauResult<()> {
        self.show(write);
        self.show(grow);
        self.elapsed = self.elapsed + run_time;
        self.calls.push(RenderCall::Reveal {
            write: write.to_vec(),
            grow: grow.to_vec(),
            run_time,
        });
        Ok(())
    }

    fn morph(
        &mut self,
        from: &ElementId,
        into: &ElementId,
        run_time: Duration,
    ) -> TableauResult<()> {
        if !self.constructed.contains(into) {
            return Err(tableau_core::TableauError::Render(format!(
                "morph target '{}' was never constructed",
                into
            )));
        }
        // The source object stays on screen and takes on the target's look.
        self.elapsed = self.elapsed + run_time;
        self.calls.push(RenderCall::Morph {
            from: from.clone(),
            into: into.clone(),
            run_time,
        });
        Ok(())
    }

    fn relocate(
        &mut self,
        ids: &[ElementId],
        to: Point3D,
        run_time: Duration,
    ) -> TableauResult<()> {
        self.elapsed = self.elapsed + run_time;
        self.calls.push(RenderCall::Relocate {
            ids: ids.to_vec(),
            to,
            run_time,
        });
        Ok(())
    }

    fn pause(&mut self, duration: Duration) -> TableauResult<()> {
        self.elapsed = self.elapsed + duration;
        self.calls.push(RenderCall::Pause { duration });
        Ok(())
    }

    fn insert(&mut self, ids: &[ElementId]) -> TableauResult<()> {
        self.show(ids);
        self.calls.push(RenderCall::Insert { ids: ids.to_vec() });
        Ok(())
    }

    fn finish(&mut self) -> TableauResult<()> {
        self.calls.push(RenderCall::Finish);
        Ok(())
    }
}

//! # tableau-ir
//!
//! The Tableau scene description: elements, layout relationships, timeline
//! steps and whole scenes as data. Every scene, whether written as a JSON file
//! or built in code, is expressed in these types before it is composed.

pub mod builder;
pub mod element;
pub mod layout;
pub mod metrics;
pub mod scene;
pub mod timeline;
pub mod validate;

pub use builder::SceneBuilder;
pub use element::{Element, ElementContent, ElementId, ElementKind, GridValue, PointRef, Style};
pub use layout::{Anchor, Arrangement, LayoutSolver, Placement};
pub use metrics::{EstimatedMetrics, Metrics};
pub use scene::{
    CameraSpec, ElementSpec, FieldMode, FieldSpec, GroupSpec, SceneId, SceneItem, SceneSpec,
    StepSpec,
};
pub use timeline::{Action, Step, StepAction, Timeline};
pub use validate::validate_scene;

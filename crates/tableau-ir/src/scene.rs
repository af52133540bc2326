use serde::{Deserialize, Serialize};
use std::path::Path;

use tableau_core::{Point3D, TableauResult};

use crate::element::{ElementContent, ElementId, Style};
use crate::layout::{Arrangement, Placement};
use crate::timeline::StepAction;

/// Unique identifier for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Camera orientation of a 3D scene, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSpec {
    /// Polar angle from the +z axis.
    pub phi: f64,
    /// Azimuth around the z axis.
    pub theta: f64,
}

/// A leaf element declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub id: ElementId,
    #[serde(flatten)]
    pub content: ElementContent,
    #[serde(default)]
    pub place: Placement,
    #[serde(flatten)]
    pub style: Style,
}

/// A group declaration (`VGroup(...)`, optionally `.arrange(...)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub id: ElementId,
    pub members: Vec<ElementId>,
    #[serde(default)]
    pub arrange: Option<Arrangement>,
}

/// How sampled field arrows are oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    /// Every arrow points along the fixed unit vector from `toward` to `origin`.
    #[default]
    Uniform,
    /// Every arrow points away from `origin` through its own start point.
    Radial,
}

fn default_jitter() -> f64 {
    0.5
}

fn default_arrow_length() -> f64 {
    1.0
}

/// A sampled vector field: `count` arrows around `origin`, grouped under `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: ElementId,
    pub origin: Point3D,
    /// Second charge of the pair; only used by [`FieldMode::Uniform`].
    pub toward: Point3D,
    pub count: usize,
    /// Start points are jittered uniformly in `[-jitter, jitter]` on x and y.
    #[serde(default = "default_jitter")]
    pub jitter: f64,
    #[serde(default = "default_arrow_length")]
    pub length: f64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub mode: FieldMode,
    #[serde(flatten)]
    pub style: Style,
}

impl FieldSpec {
    /// Id of the i-th generated arrow.
    pub fn arrow_id(&self, index: usize) -> ElementId {
        ElementId::new(format!("{}.{}", self.id, index))
    }
}

/// One entry of a scene's element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneItem {
    Element(ElementSpec),
    Group(GroupSpec),
    Field(FieldSpec),
}

impl SceneItem {
    pub fn id(&self) -> &ElementId {
        match self {
            SceneItem::Element(e) => &e.id,
            SceneItem::Group(g) => &g.id,
            SceneItem::Field(f) => &f.id,
        }
    }

    /// Elements that must already exist when this item is constructed.
    pub fn references(&self) -> Vec<&ElementId> {
        match self {
            SceneItem::Element(e) => {
                let mut refs = e.content.references();
                refs.extend(e.place.anchor.target());
                refs
            }
            SceneItem::Group(g) => g.members.iter().collect(),
            SceneItem::Field(_) => Vec::new(),
        }
    }
}

/// One timeline step as written by a scene author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    #[serde(flatten)]
    pub action: StepAction,
    #[serde(default)]
    pub elements: Vec<ElementId>,
    /// Seconds; the configured default applies when absent.
    #[serde(default)]
    pub run_time: Option<f64>,
}

/// A complete scene: what to draw and in which order to animate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    pub id: SceneId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub camera: Option<CameraSpec>,
    #[serde(default)]
    pub elements: Vec<SceneItem>,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

impl SceneSpec {
    pub fn new(id: SceneId) -> Self {
        Self {
            id,
            title: None,
            camera: None,
            elements: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn from_json(source: &str) -> TableauResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: &Path) -> TableauResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn to_json_pretty(&self) -> TableauResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get an item by its id.
    pub fn item(&self, id: &str) -> Option<&SceneItem> {
        self.elements.iter().find(|i| i.id().0 == id)
    }
}

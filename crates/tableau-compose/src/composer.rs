//! The scene composer.
//!
//! Holds the ordered list of constructed elements, resolves each placement
//! once against elements that already exist, and records the timeline of
//! steps. Nothing here talks to a renderer; a finished [`Composition`] is
//! handed to [`crate::runner::run`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use tableau_core::hash::{self, ContentHash};
use tableau_core::{Bounds, Duration, Size2D, TableauConfig, TableauError, TableauResult};
use tableau_ir::{
    Action, Anchor, Arrangement, CameraSpec, Element, ElementContent, ElementId, ElementKind,
    EstimatedMetrics, LayoutSolver, Metrics, Placement, SceneId, StepAction, Style, Timeline,
};

use crate::renderer::Renderer;
use crate::runner::{self, RunReport};

/// A constructed element, as returned to the code that added it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    id: ElementId,
    kind: ElementKind,
}

impl ElementHandle {
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }
}

impl From<&ElementHandle> for ElementId {
    fn from(handle: &ElementHandle) -> Self {
        handle.id.clone()
    }
}

/// A fully composed scene: every element with its resolved bounds, plus the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub scene: SceneId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraSpec>,
    /// Frame rate the timeline is snapped to when counting frames.
    pub fps: f64,
    /// Elements in construction order.
    pub elements: Vec<Element>,
    pub timeline: Timeline,
}

impl Composition {
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_str() == id)
    }

    /// Elements the renderer constructs, in construction order.
    pub fn drawables(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.kind().is_drawable())
    }

    pub fn duration(&self) -> Duration {
        self.timeline.duration()
    }

    /// Frames a renderer produces for the whole timeline at `fps`.
    pub fn frame_count(&self) -> u64 {
        self.duration().frame_count(self.fps)
    }

    /// Stable digest of the elements and timeline. Two compositions of the
    /// same scene with the same config have the same fingerprint.
    pub fn fingerprint(&self) -> TableauResult<ContentHash> {
        hash::hash_value(self)
    }

    /// Run against a renderer. See [`runner::run`].
    pub fn run(&self, renderer: &mut dyn Renderer) -> TableauResult<RunReport> {
        runner::run(self, renderer)
    }
}

/// Builds one scene: elements first, steps after.
pub struct Composer {
    scene: SceneId,
    title: Option<String>,
    camera: Option<CameraSpec>,
    config: TableauConfig,
    metrics: Box<dyn Metrics>,
    elements: Vec<Element>,
    index: HashMap<ElementId, usize>,
    /// Elements some other element was positioned against.
    anchors: HashSet<ElementId>,
    /// Leaves on screen after the last sequenced step.
    visible: HashSet<ElementId>,
    timeline: Timeline,
}

impl Composer {
    pub fn new(scene: SceneId, config: &TableauConfig) -> Self {
        Self::with_metrics(scene, config, Box::new(EstimatedMetrics::default()))
    }

    /// Create a composer that measures elements with the given metrics.
    pub fn with_metrics(scene: SceneId, config: &TableauConfig, metrics: Box<dyn Metrics>) -> Self {
        Self {
            scene,
            title: None,
            camera: None,
            config: config.clone(),
            metrics,
            elements: Vec::new(),
            index: HashMap::new(),
            anchors: HashSet::new(),
            visible: HashSet::new(),
            timeline: Timeline::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_camera(&mut self, camera: CameraSpec) {
        self.camera = Some(camera);
    }

    pub fn config(&self) -> &TableauConfig {
        &self.config
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.index.get(id).map(|&i| &self.elements[i])
    }

    pub fn bounds(&self, id: &ElementId) -> Option<Bounds> {
        self.element(id).map(|e| e.bounds)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn is_visible(&self, id: &ElementId) -> bool {
        self.visible.contains(id)
    }

    /// Number of leaves on screen after the last sequenced step.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Construct a leaf element with the default style.
    pub fn add_element(
        &mut self,
        id: impl Into<ElementId>,
        content: ElementContent,
        placement: Placement,
    ) -> TableauResult<ElementHandle> {
        self.add_styled_element(id, content, placement, Style::default())
    }

    /// Construct a leaf element.
    ///
    /// Every element the content or the placement refers to must already be
    /// constructed; this is checked before anything is measured. Arrows and
    /// lines are positioned by their endpoints: a placement without an anchor
    /// only shifts them, any other anchor moves their center.
    pub fn add_styled_element(
        &mut self,
        id: impl Into<ElementId>,
        content: ElementContent,
        placement: Placement,
        style: Style,
    ) -> TableauResult<ElementHandle> {
        let id = id.into();
        let references: Vec<ElementId> = content
            .references()
            .into_iter()
            .chain(placement.anchor.target())
            .cloned()
            .collect();
        for reference in &references {
            if !self.index.contains_key(reference) {
                return Err(TableauError::missing_anchor(id.as_str(), reference.as_str()));
            }
        }
        self.check_new_id(&id)?;
        if matches!(content, ElementContent::Group { .. }) {
            return Err(TableauError::construction(format!(
                "'{}' is a group; groups are added with add_group",
                id
            )));
        }
        content.check(&id)?;

        let solver = LayoutSolver::new(&self.config.frame, &self.config.layout);
        let lookup = |target: &ElementId| self.bounds(target);
        let segment = match &content {
            ElementContent::Arrow { start, end, buff } => {
                Some((start, end, buff.unwrap_or(solver.arrow_buff())))
            }
            ElementContent::Line { start, end } => Some((start, end, 0.0)),
            _ => None,
        };
        let (bounds, endpoints) = match segment {
            Some((start, end, buff)) => {
                let a = solver.resolve_point(&id, start, &lookup)?;
                let b = solver.resolve_point(&id, end, &lookup)?;
                let (a, b) = LayoutSolver::buffed(a, b, buff);
                let natural = Bounds::spanning(a, b);
                let offset = match placement.anchor {
                    Anchor::Origin => placement.shift,
                    _ => solver.place(&id, natural.size(), &placement, &lookup)?.center - natural.center,
                };
                (natural.shifted(offset), Some((a + offset, b + offset)))
            }
            None => {
                let size = self.metrics.measure(&content);
                (solver.place(&id, size, &placement, &lookup)?, None)
            }
        };
        if !bounds.center.is_finite() {
            return Err(TableauError::construction(format!(
                "'{}' resolves to a non-finite position",
                id
            )));
        }

        tracing::debug!("constructed {} '{}' at {}", content.kind(), id, bounds.center);
        self.anchors.extend(references);
        let handle = ElementHandle {
            id: id.clone(),
            kind: content.kind(),
        };
        self.index.insert(id.clone(), self.elements.len());
        self.elements.push(Element {
            id,
            content,
            style,
            bounds,
            endpoints,
        });
        Ok(handle)
    }

    /// Group constructed elements (`VGroup`), optionally arranging them in a
    /// row or column first.
    ///
    /// Arranging moves the members, so it fails if any of them (or anything
    /// inside them) already anchors another element.
    pub fn add_group(
        &mut self,
        id: impl Into<ElementId>,
        members: &[ElementId],
        arrangement: Option<Arrangement>,
    ) -> TableauResult<ElementHandle> {
        let id = id.into();
        let mut indices = Vec::with_capacity(members.len());
        for member in members {
            match self.index.get(member) {
                Some(&i) => indices.push(i),
                None => return Err(TableauError::missing_anchor(id.as_str(), member.as_str())),
            }
        }
        self.check_new_id(&id)?;
        if members.is_empty() {
            return Err(TableauError::construction(format!("group '{}' has no members", id)));
        }
        let mut seen = HashSet::new();
        if let Some(repeated) = members.iter().find(|m| !seen.insert(*m)) {
            return Err(TableauError::construction(format!(
                "group '{}' lists '{}' more than once",
                id, repeated
            )));
        }

        if let Some(arrangement) = &arrangement {
            for member in members {
                if let Some(fixed) = self.subtree(member).into_iter().find(|e| self.anchors.contains(e)) {
                    return Err(TableauError::construction(format!(
                        "cannot arrange group '{}': '{}' already anchors another element",
                        id, fixed
                    )));
                }
            }
            let sizes: Vec<Size2D> = indices.iter().map(|&i| self.elements[i].bounds.size()).collect();
            let solver = LayoutSolver::new(&self.config.frame, &self.config.layout);
            let centers = solver.arrange(&sizes, arrangement);
            for (member, (&i, center)) in members.iter().zip(indices.iter().zip(centers)) {
                let delta = center - self.elements[i].bounds.center;
                self.shift_subtree(member, delta);
            }
        }

        let bounds = indices
            .iter()
            .map(|&i| self.elements[i].bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();

        tracing::debug!("grouped {} members into '{}'", members.len(), id);
        self.anchors.extend(members.iter().cloned());
        let handle = ElementHandle {
            id: id.clone(),
            kind: ElementKind::Group,
        };
        self.index.insert(id.clone(), self.elements.len());
        self.elements.push(Element {
            id,
            content: ElementContent::Group {
                members: members.to_vec(),
            },
            style: Style::default(),
            bounds,
            endpoints: None,
        });
        Ok(handle)
    }

    /// Append one step to the timeline.
    ///
    /// Groups expand to their leaves. The step is checked against what is on
    /// screen after the previous step: a transform needs exactly one visible
    /// source and a constructed, hidden target; a move needs visible elements.
    /// An `add` step always has zero run time.
    pub fn sequence_step(
        &mut self,
        action: StepAction,
        elements: &[ElementId],
        run_time: Duration,
    ) -> TableauResult<()> {
        let label = format!("step {} ({})", self.timeline.len(), action.name());
        let mut leaves: Vec<ElementId> = Vec::new();
        for id in elements {
            if !self.index.contains_key(id) {
                return Err(TableauError::missing_anchor(label.as_str(), id.as_str()));
            }
            for leaf in self.leaves(id) {
                if !leaves.contains(&leaf) {
                    leaves.push(leaf);
                }
            }
        }

        let (resolved, run_time) = match action {
            StepAction::Pause => {
                if !elements.is_empty() {
                    return Err(TableauError::construction(format!(
                        "{} must not name elements",
                        label
                    )));
                }
                (Action::Pause, run_time)
            }
            _ if leaves.is_empty() => {
                return Err(TableauError::construction(format!("{} names no elements", label)));
            }
            StepAction::Appear => {
                self.reveal(&label, &leaves);
                (Action::Appear, run_time)
            }
            StepAction::Grow => {
                self.reveal(&label, &leaves);
                (Action::Grow, run_time)
            }
            StepAction::Reveal { grow } => {
                let mut grown: Vec<ElementId> = Vec::new();
                for id in &grow {
                    if !self.index.contains_key(id) {
                        return Err(TableauError::missing_anchor(label.as_str(), id.as_str()));
                    }
                    for leaf in self.leaves(id) {
                        if !grown.contains(&leaf) {
                            grown.push(leaf);
                        }
                    }
                }
                if grown.is_empty() {
                    return Err(TableauError::construction(format!(
                        "{} names nothing to grow",
                        label
                    )));
                }
                if let Some(both) = grown.iter().find(|leaf| leaves.contains(*leaf)) {
                    return Err(TableauError::construction(format!(
                        "{}: '{}' cannot both be written and grow",
                        label, both
                    )));
                }
                self.reveal(&label, &leaves);
                self.reveal(&label, &grown);
                leaves.extend(grown.iter().cloned());
                (Action::Reveal { grow: grown }, run_time)
            }
            StepAction::Add => {
                self.reveal(&label, &leaves);
                (Action::Add, Duration::zero())
            }
            StepAction::Transform { into } => {
                if leaves.len() != 1 {
                    return Err(TableauError::construction(format!(
                        "{} must transform exactly one element, got {}",
                        label,
                        leaves.len()
                    )));
                }
                let Some(target) = self.element(&into) else {
                    return Err(TableauError::missing_anchor(label.as_str(), into.as_str()));
                };
                if !target.kind().is_drawable() {
                    return Err(TableauError::construction(format!(
                        "{} cannot transform into group '{}'",
                        label, into
                    )));
                }
                if self.visible.contains(&into) {
                    return Err(TableauError::construction(format!(
                        "{}: target '{}' is already on screen",
                        label, into
                    )));
                }
                self.require_visible(&label, &leaves)?;
                (Action::Transform { into }, run_time)
            }
            StepAction::Move { to } => {
                self.require_visible(&label, &leaves)?;
                let current = leaves
                    .iter()
                    .filter_map(|leaf| self.bounds(leaf))
                    .reduce(|a, b| a.union(&b))
                    .unwrap_or_default();
                let solver = LayoutSolver::new(&self.config.frame, &self.config.layout);
                let target = solver.place(
                    &ElementId::new(label.as_str()),
                    current.size(),
                    &to,
                    |anchor| self.bounds(anchor),
                )?;
                (Action::Move { to: target.center }, run_time)
            }
        };

        tracing::debug!("{}: {} over {}", label, resolved, run_time);
        self.timeline.push(resolved, leaves, run_time);
        Ok(())
    }

    /// Finish composing. The composer is consumed; the composition is immutable.
    pub fn finish(self) -> Composition {
        Composition {
            scene: self.scene,
            title: self.title,
            camera: self.camera,
            fps: self.config.frame.fps,
            elements: self.elements,
            timeline: self.timeline,
        }
    }

    fn check_new_id(&self, id: &ElementId) -> TableauResult<()> {
        if id.as_str().trim().is_empty() {
            return Err(TableauError::construction("element id must not be empty"));
        }
        if self.index.contains_key(id) {
            return Err(TableauError::construction(format!("duplicate element id '{}'", id)));
        }
        Ok(())
    }

    /// The element itself and everything nested inside it, each once.
    fn subtree(&self, id: &ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(next) = stack.pop() {
            if out.contains(&next) {
                continue;
            }
            if let Some(element) = self.element(&next) {
                stack.extend(element.members().iter().rev().cloned());
            }
            out.push(next);
        }
        out
    }

    fn leaves(&self, id: &ElementId) -> Vec<ElementId> {
        self.subtree(id)
            .into_iter()
            .filter(|e| self.element(e).is_some_and(|el| el.kind().is_drawable()))
            .collect()
    }

    fn shift_subtree(&mut self, id: &ElementId, delta: tableau_core::Point3D) {
        for member in self.subtree(id) {
            if let Some(&i) = self.index.get(&member) {
                let element = &mut self.elements[i];
                element.bounds = element.bounds.shifted(delta);
                element.endpoints = element.endpoints.map(|(a, b)| (a + delta, b + delta));
            }
        }
    }

    fn reveal(&mut self, label: &str, leaves: &[ElementId]) {
        for leaf in leaves {
            if !self.visible.insert(leaf.clone()) {
                tracing::warn!("{}: '{}' is already on screen", label, leaf);
            }
        }
    }

    fn require_visible(&self, label: &str, leaves: &[ElementId]) -> TableauResult<()> {
        match leaves.iter().find(|leaf| !self.visible.contains(*leaf)) {
            Some(hidden) => Err(TableauError::construction(format!(
                "{}: '{}' is not on screen",
                label, hidden
            ))),
            None => Ok(()),
        }
    }
}

use serde::{Deserialize, Serialize};

use tableau_core::{Duration, Point3D, Timestamp};

use crate::element::ElementId;
use crate::layout::Placement;

/// What a step asks for, as written by a scene author.
///
/// `Move` still carries an unresolved placement; the composer turns it into a
/// concrete point when the step is sequenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// Elements appear by being written out.
    Appear,
    /// Elements grow from their start point (arrows, lines).
    Grow,
    /// The step's elements are written out while the elements in `grow` grow,
    /// all within the one step (`play(GrowArrow(vector), Write(label))`).
    Reveal { grow: Vec<ElementId> },
    /// Elements are inserted instantly, without animation.
    Add,
    /// A single visible element morphs into the content of `into`.
    Transform { into: ElementId },
    /// Elements move to a new placement.
    Move { to: Placement },
    /// Fixed-duration wait.
    Pause,
}

impl StepAction {
    pub fn name(&self) -> &'static str {
        match self {
            StepAction::Appear => "appear",
            StepAction::Grow => "grow",
            StepAction::Reveal { .. } => "reveal",
            StepAction::Add => "add",
            StepAction::Transform { .. } => "transform",
            StepAction::Move { .. } => "move",
            StepAction::Pause => "pause",
        }
    }
}

/// A resolved step action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Appear,
    Grow,
    /// `grow` holds the leaves that grow; the rest of the step's elements are written.
    Reveal { grow: Vec<ElementId> },
    Add,
    Transform { into: ElementId },
    Move { to: Point3D },
    Pause,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Appear => "appear",
            Action::Grow => "grow",
            Action::Reveal { .. } => "reveal",
            Action::Add => "add",
            Action::Transform { .. } => "transform",
            Action::Move { .. } => "move",
            Action::Pause => "pause",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Transform { into } => write!(f, "transform -> {}", into),
            Action::Move { to } => write!(f, "move -> {}", to),
            Action::Reveal { grow } => {
                let names: Vec<&str> = grow.iter().map(|id| id.as_str()).collect();
                write!(f, "reveal (growing {})", names.join(", "))
            }
            other => write!(f, "{}", other.name()),
        }
    }
}

/// One synchronization barrier of the timeline. The elements of a step
/// animate together; the next step starts when all of them are done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub action: Action,
    /// Leaf elements, in the order they were named.
    pub elements: Vec<ElementId>,
    pub run_time: Duration,
    /// Offset of the step from the start of the scene.
    pub start: Timestamp,
}

/// Ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timeline {
    steps: Vec<Step>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step starting where the previous one ends.
    pub fn push(&mut self, action: Action, elements: Vec<ElementId>, run_time: Duration) {
        let start = self.end();
        self.steps.push(Step {
            action,
            elements,
            run_time,
            start,
        });
    }

    /// Time at which the last step finishes.
    pub fn end(&self) -> Timestamp {
        self.steps
            .last()
            .map_or(Timestamp::zero(), |s| s.start + s.run_time)
    }

    pub fn duration(&self) -> Duration {
        self.steps.iter().map(|s| s.run_time).sum()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_start_after_previous() {
        let mut timeline = Timeline::new();
        timeline.push(Action::Appear, vec!["title".into()], Duration::from_seconds(1.0));
        timeline.push(Action::Pause, vec![], Duration::from_seconds(2.0));
        timeline.push(Action::Grow, vec!["arrow".into()], Duration::from_seconds(0.5));

        let starts: Vec<f64> = timeline.iter().map(|s| s.start.as_seconds()).collect();
        assert_eq!(starts, vec![0.0, 1.0, 3.0]);
        assert!((timeline.duration().as_seconds() - 3.5).abs() < 1e-9);
        assert!((timeline.end().as_seconds() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = Timeline::new();
        assert!(timeline.is_empty());
        assert_eq!(timeline.end(), Timestamp::zero());
        assert!(timeline.duration().is_zero());
    }

    #[test]
    fn test_step_action_serde() {
        let action: StepAction =
            serde_json::from_str(r#"{"action":"transform","into":"token"}"#).unwrap();
        assert_eq!(
            action,
            StepAction::Transform {
                into: "token".into()
            }
        );
        assert_eq!(action.name(), "transform");
        let pause: StepAction = serde_json::from_str(r#"{"action":"pause"}"#).unwrap();
        assert_eq!(pause, StepAction::Pause);
        let reveal: StepAction =
            serde_json::from_str(r#"{"action":"reveal","grow":["vector"]}"#).unwrap();
        assert_eq!(
            reveal,
            StepAction::Reveal {
                grow: vec!["vector".into()]
            }
        );
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Appear.to_string(), "appear");
        assert_eq!(
            Action::Transform {
                into: "token".into()
            }
            .to_string(),
            "transform -> token"
        );
        assert_eq!(
            Action::Reveal {
                grow: vec!["a".into(), "b".into()]
            }
            .to_string(),
            "reveal (growing a, b)"
        );
    }
}

use serde::{Deserialize, Serialize};

use tableau_core::config::{FrameConfig, LayoutConfig};
use tableau_core::{Bounds, Corner, Direction, Point3D, Size2D, TableauError, TableauResult};

use crate::element::{ElementId, PointRef};

/// Where a new element goes, before any extra shift is applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Centered on the frame origin.
    #[default]
    Origin,
    /// Centered on an absolute point.
    At(Point3D),
    /// Pinned to a frame edge with a margin (`to_edge(UP)`).
    Edge {
        edge: Direction,
        #[serde(default)]
        margin: Option<f64>,
    },
    /// Pinned to a frame corner with a margin (`to_corner(DOWN + RIGHT)`).
    Corner {
        corner: Corner,
        #[serde(default)]
        margin: Option<f64>,
    },
    /// Placed beside a constructed element, centers aligned on the other axis
    /// (`next_to(target, direction, buff=gap)`).
    NextTo {
        target: ElementId,
        direction: Direction,
        #[serde(default)]
        gap: Option<f64>,
    },
    /// Centered on a constructed element (`move_to(target)`).
    On(ElementId),
}

impl Anchor {
    /// Element this anchor depends on, if any.
    pub fn target(&self) -> Option<&ElementId> {
        match self {
            Anchor::NextTo { target, .. } | Anchor::On(target) => Some(target),
            _ => None,
        }
    }
}

/// A layout relationship: an anchor plus a fixed shift.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub anchor: Anchor,
    #[serde(default)]
    pub shift: Point3D,
}

impl Placement {
    pub fn origin() -> Self {
        Self::default()
    }

    pub fn at(point: Point3D) -> Self {
        Self {
            anchor: Anchor::At(point),
            shift: Point3D::zero(),
        }
    }

    pub fn to_edge(edge: Direction) -> Self {
        Self {
            anchor: Anchor::Edge { edge, margin: None },
            shift: Point3D::zero(),
        }
    }

    pub fn to_corner(corner: Corner) -> Self {
        Self {
            anchor: Anchor::Corner {
                corner,
                margin: None,
            },
            shift: Point3D::zero(),
        }
    }

    pub fn next_to(target: impl Into<ElementId>, direction: Direction) -> Self {
        Self {
            anchor: Anchor::NextTo {
                target: target.into(),
                direction,
                gap: None,
            },
            shift: Point3D::zero(),
        }
    }

    pub fn on(target: impl Into<ElementId>) -> Self {
        Self {
            anchor: Anchor::On(target.into()),
            shift: Point3D::zero(),
        }
    }

    /// Builder: override the gap of a `next_to` anchor, or the margin of an edge/corner anchor.
    pub fn with_gap(mut self, value: f64) -> Self {
        match &mut self.anchor {
            Anchor::NextTo { gap, .. } => *gap = Some(value),
            Anchor::Edge { margin, .. } | Anchor::Corner { margin, .. } => *margin = Some(value),
            _ => {}
        }
        self
    }

    /// Builder: add a shift applied after anchoring.
    pub fn shifted(mut self, by: Point3D) -> Self {
        self.shift = self.shift + by;
        self
    }
}

/// Row or column arrangement of a group's members (`arrange(RIGHT, buff=gap)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    pub direction: Direction,
    #[serde(default)]
    pub gap: Option<f64>,
    /// Where the arranged row is centered.
    #[serde(default)]
    pub center: Point3D,
}

impl Arrangement {
    pub fn new(direction: Direction, gap: f64) -> Self {
        Self {
            direction,
            gap: Some(gap),
            center: Point3D::zero(),
        }
    }
}

/// Resolves placements into concrete positions in scene units.
///
/// Purely relative: every position is an offset from the frame or from an
/// already resolved element. There is no collision detection and no re-flow.
pub struct LayoutSolver<'a> {
    frame: &'a FrameConfig,
    layout: &'a LayoutConfig,
}

impl<'a> LayoutSolver<'a> {
    pub fn new(frame: &'a FrameConfig, layout: &'a LayoutConfig) -> Self {
        Self { frame, layout }
    }

    pub fn arrow_buff(&self) -> f64 {
        self.layout.arrow_buff
    }

    /// Compute the bounds of an element of `size` placed by `placement`.
    ///
    /// `lookup` returns the bounds of constructed elements; a target it does
    /// not know is a `MissingAnchor` error attributed to `element`.
    pub fn place<F>(
        &self,
        element: &ElementId,
        size: Size2D,
        placement: &Placement,
        lookup: F,
    ) -> TableauResult<Bounds>
    where
        F: Fn(&ElementId) -> Option<Bounds>,
    {
        let half_w = self.frame.width / 2.0;
        let half_h = self.frame.height / 2.0;
        let center = match &placement.anchor {
            Anchor::Origin => Point3D::zero(),
            Anchor::At(point) => *point,
            Anchor::Edge { edge, margin } => {
                let m = margin.unwrap_or(self.layout.edge_margin);
                self.pin(Point3D::zero(), *edge, m, size, half_w, half_h)
            }
            Anchor::Corner { corner, margin } => {
                let m = margin.unwrap_or(self.layout.edge_margin);
                let (vertical, horizontal) = corner.edges();
                let p = self.pin(Point3D::zero(), vertical, m, size, half_w, half_h);
                self.pin(p, horizontal, m, size, half_w, half_h)
            }
            Anchor::NextTo {
                target,
                direction,
                gap,
            } => {
                let anchor = lookup(target)
                    .ok_or_else(|| TableauError::missing_anchor(element.as_str(), target.as_str()))?;
                let gap = gap.unwrap_or(self.layout.default_gap);
                let offset = match direction {
                    Direction::Up | Direction::Down => anchor.height / 2.0 + gap + size.height / 2.0,
                    Direction::Left | Direction::Right => anchor.width / 2.0 + gap + size.width / 2.0,
                };
                anchor.center + direction.unit() * offset
            }
            Anchor::On(target) => {
                lookup(target)
                    .ok_or_else(|| TableauError::missing_anchor(element.as_str(), target.as_str()))?
                    .center
            }
        };
        Ok(Bounds::new(center + placement.shift, size))
    }

    fn pin(
        &self,
        from: Point3D,
        edge: Direction,
        margin: f64,
        size: Size2D,
        half_w: f64,
        half_h: f64,
    ) -> Point3D {
        let mut p = from;
        match edge {
            Direction::Up => p.y = half_h - margin - size.height / 2.0,
            Direction::Down => p.y = -half_h + margin + size.height / 2.0,
            Direction::Left => p.x = -half_w + margin + size.width / 2.0,
            Direction::Right => p.x = half_w - margin - size.width / 2.0,
        }
        p
    }

    /// Resolve an arrow/line endpoint.
    pub fn resolve_point<F>(
        &self,
        element: &ElementId,
        point: &PointRef,
        lookup: F,
    ) -> TableauResult<Point3D>
    where
        F: Fn(&ElementId) -> Option<Bounds>,
    {
        match point {
            PointRef::At(p) => Ok(*p),
            PointRef::Center(id) => lookup(id)
                .map(|b| b.center)
                .ok_or_else(|| TableauError::missing_anchor(element.as_str(), id.as_str())),
            PointRef::Edge { of, side } => lookup(of)
                .map(|b| b.edge_point(*side))
                .ok_or_else(|| TableauError::missing_anchor(element.as_str(), of.as_str())),
        }
    }

    /// Pull both endpoints of a segment toward each other by `buff`.
    ///
    /// Segments shorter than twice the buff collapse to their midpoint.
    pub fn buffed(start: Point3D, end: Point3D, buff: f64) -> (Point3D, Point3D) {
        let delta = end - start;
        let len = delta.length();
        if len <= 2.0 * buff {
            let mid = start.lerp(&end, 0.5);
            return (mid, mid);
        }
        let unit = delta * (1.0 / len);
        (start + unit * buff, end - unit * buff)
    }

    /// Centers for `sizes` laid out in a row or column, the whole row centered
    /// on `arrangement.center`. The cross axis is center-aligned.
    pub fn arrange(&self, sizes: &[Size2D], arrangement: &Arrangement) -> Vec<Point3D> {
        if sizes.is_empty() {
            return Vec::new();
        }
        let gap = arrangement.gap.unwrap_or(self.layout.default_gap);
        let dir = arrangement.direction;
        let extent = |s: &Size2D| if dir.is_vertical() { s.height } else { s.width };
        let total: f64 =
            sizes.iter().map(extent).sum::<f64>() + gap * (sizes.len() as f64 - 1.0);

        let unit = dir.unit();
        let mut cursor = -total / 2.0;
        sizes
            .iter()
            .map(|s| {
                let e = extent(s);
                let along = cursor + e / 2.0;
                cursor += e + gap;
                arrangement.center + unit * along
            })
            .collect()
    }
}

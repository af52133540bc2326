use serde::{Deserialize, Serialize};

use tableau_core::{Bounds, Color, Direction, Point3D, TableauError, TableauResult};

/// Unique identifier for an element within one scene.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        ElementId::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        ElementId(id)
    }
}

impl From<&ElementId> for ElementId {
    fn from(id: &ElementId) -> Self {
        id.clone()
    }
}

/// The kind of visual unit an element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Text,
    Grid,
    Arrow,
    Line,
    Sphere,
    Axes,
    /// Non-drawable container of other elements.
    Group,
}

impl ElementKind {
    /// Whether the renderer draws this kind directly.
    pub fn is_drawable(&self) -> bool {
        !matches!(self, ElementKind::Group)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Text => write!(f, "text"),
            ElementKind::Grid => write!(f, "grid"),
            ElementKind::Arrow => write!(f, "arrow"),
            ElementKind::Line => write!(f, "line"),
            ElementKind::Sphere => write!(f, "sphere"),
            ElementKind::Axes => write!(f, "axes"),
            ElementKind::Group => write!(f, "group"),
        }
    }
}

/// One cell of a numeric grid as written in a scene file.
///
/// Scene files may quote numbers; anything that does not parse as a finite
/// number is rejected when the grid is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridValue {
    Number(f64),
    Text(String),
}

impl GridValue {
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            GridValue::Number(n) => *n,
            GridValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for GridValue {
    fn from(value: f64) -> Self {
        GridValue::Number(value)
    }
}

/// A point an arrow or line is drawn from or to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointRef {
    /// An absolute point in scene units.
    At(Point3D),
    /// The center of a constructed element.
    Center(ElementId),
    /// The midpoint of one edge of a constructed element (`get_top`, `get_bottom`, ...).
    Edge { of: ElementId, side: Direction },
}

impl PointRef {
    /// Element this point depends on, if any.
    pub fn anchor(&self) -> Option<&ElementId> {
        match self {
            PointRef::At(_) => None,
            PointRef::Center(id) => Some(id),
            PointRef::Edge { of, .. } => Some(of),
        }
    }
}

fn default_font_size() -> f64 {
    48.0
}

fn default_h_buff() -> f64 {
    1.3
}

fn default_x_range() -> [f64; 2] {
    [-6.0, 6.0]
}

fn default_y_range() -> [f64; 2] {
    [-5.0, 5.0]
}

fn default_z_range() -> [f64; 2] {
    [-4.0, 4.0]
}

/// What an element shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementContent {
    Text {
        text: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
    },
    /// A bracketed matrix of numbers.
    Grid {
        rows: Vec<Vec<GridValue>>,
        #[serde(default = "default_h_buff")]
        h_buff: f64,
    },
    Arrow {
        start: PointRef,
        end: PointRef,
        /// Distance kept from both endpoints; the layout default applies when absent.
        #[serde(default)]
        buff: Option<f64>,
    },
    Line {
        start: PointRef,
        end: PointRef,
    },
    Sphere {
        radius: f64,
    },
    Axes {
        #[serde(default = "default_x_range")]
        x_range: [f64; 2],
        #[serde(default = "default_y_range")]
        y_range: [f64; 2],
        #[serde(default = "default_z_range")]
        z_range: [f64; 2],
        #[serde(default)]
        three_d: bool,
    },
    Group {
        members: Vec<ElementId>,
    },
}

impl ElementContent {
    pub fn text(text: impl Into<String>, font_size: f64) -> Self {
        ElementContent::Text {
            text: text.into(),
            font_size,
        }
    }

    /// A numeric grid with the given horizontal buffer between columns.
    pub fn grid(rows: Vec<Vec<f64>>, h_buff: f64) -> Self {
        ElementContent::Grid {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(GridValue::from).collect())
                .collect(),
            h_buff,
        }
    }

    pub fn arrow(start: PointRef, end: PointRef) -> Self {
        ElementContent::Arrow {
            start,
            end,
            buff: None,
        }
    }

    pub fn line(start: PointRef, end: PointRef) -> Self {
        ElementContent::Line { start, end }
    }

    pub fn sphere(radius: f64) -> Self {
        ElementContent::Sphere { radius }
    }

    /// Default 3D axes.
    pub fn axes_3d() -> Self {
        ElementContent::Axes {
            x_range: default_x_range(),
            y_range: default_y_range(),
            z_range: default_z_range(),
            three_d: true,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementContent::Text { .. } => ElementKind::Text,
            ElementContent::Grid { .. } => ElementKind::Grid,
            ElementContent::Arrow { .. } => ElementKind::Arrow,
            ElementContent::Line { .. } => ElementKind::Line,
            ElementContent::Sphere { .. } => ElementKind::Sphere,
            ElementContent::Axes { .. } => ElementKind::Axes,
            ElementContent::Group { .. } => ElementKind::Group,
        }
    }

    /// Every element this content refers to, in declaration order.
    pub fn references(&self) -> Vec<&ElementId> {
        match self {
            ElementContent::Arrow { start, end, .. } | ElementContent::Line { start, end } => {
                [start.anchor(), end.anchor()].into_iter().flatten().collect()
            }
            ElementContent::Group { members } => members.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Check the content is well-formed. `id` is only used in error messages.
    pub fn check(&self, id: &ElementId) -> TableauResult<()> {
        match self {
            ElementContent::Text { font_size, .. } if !(*font_size > 0.0) => Err(
                TableauError::construction(format!("text '{}' has non-positive font size", id)),
            ),
            ElementContent::Grid { .. } => self.numeric_rows(id).map(|_| ()),
            ElementContent::Sphere { radius } if !(*radius > 0.0) => Err(
                TableauError::construction(format!("sphere '{}' has non-positive radius", id)),
            ),
            ElementContent::Axes {
                x_range,
                y_range,
                z_range,
                ..
            } => {
                for (axis, range) in [("x", x_range), ("y", y_range), ("z", z_range)] {
                    if !(range[0] < range[1]) {
                        return Err(TableauError::construction(format!(
                            "axes '{}' has an empty {} range",
                            id, axis
                        )));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Numeric values of a grid. Fails for empty or ragged grids and for
    /// cells that are not finite numbers.
    pub fn numeric_rows(&self, id: &ElementId) -> TableauResult<Vec<Vec<f64>>> {
        let ElementContent::Grid { rows, h_buff } = self else {
            return Err(TableauError::construction(format!(
                "'{}' is a {}, not a grid",
                id,
                self.kind()
            )));
        };
        if !(*h_buff >= 0.0) {
            return Err(TableauError::construction(format!(
                "grid '{}' has a negative h_buff",
                id
            )));
        }
        let width = rows.first().map_or(0, |r| r.len());
        if width == 0 {
            return Err(TableauError::construction(format!("grid '{}' is empty", id)));
        }
        rows.iter()
            .enumerate()
            .map(|(r, row)| {
                if row.len() != width {
                    return Err(TableauError::construction(format!(
                        "grid '{}' is ragged: row {} has {} values, expected {}",
                        id,
                        r,
                        row.len(),
                        width
                    )));
                }
                row.iter()
                    .enumerate()
                    .map(|(c, cell)| {
                        cell.as_number().ok_or_else(|| {
                            TableauError::construction(format!(
                                "grid '{}' has a non-numeric value {:?} at row {}, column {}",
                                id, cell, r, c
                            ))
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

/// Visual style applied by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
        }
    }
}

impl Style {
    pub fn colored(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

/// A constructed element: content plus its resolved position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub content: ElementContent,
    pub style: Style,
    pub bounds: Bounds,
    /// Resolved endpoints of arrows and lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<(Point3D, Point3D)>,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Members of a group, empty for leaves.
    pub fn members(&self) -> &[ElementId] {
        match &self.content {
            ElementContent::Group { members } => members,
            _ => &[],
        }
    }

    /// One-line description used by logs and the inspector.
    pub fn summary(&self) -> String {
        match &self.content {
            ElementContent::Text { text, font_size } => format!("\"{}\" @{}pt", text, font_size),
            ElementContent::Grid { rows, .. } => {
                format!("{}x{} grid", rows.len(), rows.first().map_or(0, |r| r.len()))
            }
            ElementContent::Arrow { .. } | ElementContent::Line { .. } => match self.endpoints {
                Some((a, b)) => format!("{} -> {}", a, b),
                None => String::new(),
            },
            ElementContent::Sphere { radius } => format!("r={}", radius),
            ElementContent::Axes { three_d, .. } => {
                if *three_d {
                    "3d".to_string()
                } else {
                    "2d".to_string()
                }
            }
            ElementContent::Group { members } => format!("{} members", members.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_numeric_rows() {
        let id = ElementId::new("query");
        let grid = ElementContent::grid(vec![vec![1.0, 0.0], vec![0.0, 1.0]], 1.5);
        assert_eq!(grid.kind(), ElementKind::Grid);
        assert_eq!(
            grid.numeric_rows(&id).unwrap(),
            vec![vec![1.0, 0.0], vec![0.0, 1.0]]
        );
    }

    #[test]
    fn test_grid_accepts_numeric_strings() {
        let grid: ElementContent =
            serde_json::from_str(r#"{"kind":"grid","rows":[["0.8", 0.2]]}"#).unwrap();
        let rows = grid.numeric_rows(&ElementId::new("scores")).unwrap();
        assert_eq!(rows, vec![vec![0.8, 0.2]]);
    }

    #[test]
    fn test_grid_rejects_non_numeric() {
        let grid: ElementContent =
            serde_json::from_str(r#"{"kind":"grid","rows":[[1, "x"]]}"#).unwrap();
        let err = grid.check(&ElementId::new("bad")).unwrap_err();
        assert!(matches!(err, TableauError::Construction(_)));
        assert!(err.to_string().contains("row 0, column 1"));
    }

    #[test]
    fn test_grid_rejects_ragged_and_empty() {
        let ragged = ElementContent::grid(vec![vec![1.0, 2.0], vec![3.0]], 1.0);
        assert!(ragged.check(&ElementId::new("r")).is_err());
        let empty = ElementContent::grid(vec![], 1.0);
        assert!(empty.check(&ElementId::new("e")).is_err());
        let nan = ElementContent::grid(vec![vec![f64::NAN]], 1.0);
        assert!(nan.check(&ElementId::new("n")).is_err());
    }

    #[test]
    fn test_content_references() {
        let arrow = ElementContent::arrow(
            PointRef::Edge {
                of: ElementId::new("query"),
                side: Direction::Down,
            },
            PointRef::At(Point3D::zero()),
        );
        assert_eq!(arrow.references(), vec![&ElementId::new("query")]);
        assert!(ElementContent::text("Query", 24.0).references().is_empty());
    }

    #[test]
    fn test_content_check_rejects_bad_shapes() {
        let id = ElementId::new("x");
        assert!(ElementContent::sphere(0.0).check(&id).is_err());
        assert!(ElementContent::text("t", -1.0).check(&id).is_err());
        assert!(ElementContent::axes_3d().check(&id).is_ok());
    }

    #[test]
    fn test_content_deserialize_defaults() {
        let text: ElementContent =
            serde_json::from_str(r#"{"kind":"text","text":"Query"}"#).unwrap();
        assert_eq!(text, ElementContent::text("Query", 48.0));
        let axes: ElementContent =
            serde_json::from_str(r#"{"kind":"axes","three_d":true}"#).unwrap();
        assert_eq!(axes, ElementContent::axes_3d());
    }
}

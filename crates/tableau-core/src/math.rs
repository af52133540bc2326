use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A point (or offset) in scene units. Origin is the frame center, +y is up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A point on the z = 0 plane.
    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Euclidean length of the vector from the origin.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(&self) -> Option<Point3D> {
        let len = self.length();
        if len <= f64::EPSILON {
            return None;
        }
        Some(*self * (1.0 / len))
    }

    /// Linear interpolation between two points.
    pub fn lerp(&self, other: &Point3D, t: f64) -> Point3D {
        *self + (*other - *self) * t
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Point3D {
    type Output = Point3D;
    fn add(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Point3D;
    fn sub(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3D {
    type Output = Point3D;
    fn mul(self, rhs: f64) -> Point3D {
        Point3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Point3D {
    type Output = Point3D;
    fn neg(self) -> Point3D {
        self * -1.0
    }
}

impl std::fmt::Display for Point3D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.z == 0.0 {
            write!(f, "({:.2}, {:.2})", self.x, self.y)
        } else {
            write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
        }
    }
}

/// A 2D size in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One of the four screen directions. Also names the matching bounding-box edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector for this direction.
    pub fn unit(&self) -> Point3D {
        match self {
            Direction::Up => Point3D::xy(0.0, 1.0),
            Direction::Down => Point3D::xy(0.0, -1.0),
            Direction::Left => Point3D::xy(-1.0, 0.0),
            Direction::Right => Point3D::xy(1.0, 0.0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// A frame corner, e.g. `down_right` for the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Corner {
    /// The (vertical, horizontal) edge pair that forms this corner.
    pub fn edges(&self) -> (Direction, Direction) {
        match self {
            Corner::UpLeft => (Direction::Up, Direction::Left),
            Corner::UpRight => (Direction::Up, Direction::Right),
            Corner::DownLeft => (Direction::Down, Direction::Left),
            Corner::DownRight => (Direction::Down, Direction::Right),
        }
    }
}

/// Axis-aligned bounding box of an element, projected onto the screen plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Point3D,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(center: Point3D, size: Size2D) -> Self {
        Self {
            center,
            width: size.width,
            height: size.height,
        }
    }

    /// Smallest box containing two points.
    pub fn spanning(a: Point3D, b: Point3D) -> Self {
        Self {
            center: a.lerp(&b, 0.5),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn size(&self) -> Size2D {
        Size2D::new(self.width, self.height)
    }

    pub fn top(&self) -> f64 {
        self.center.y + self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    /// Midpoint of the given edge (`get_top`, `get_bottom`, ...).
    pub fn edge_point(&self, edge: Direction) -> Point3D {
        let half = Point3D::xy(self.width / 2.0, self.height / 2.0);
        let unit = edge.unit();
        self.center + Point3D::xy(unit.x * half.x, unit.y * half.y)
    }

    /// Same box moved so that its center is `center`.
    pub fn moved_to(&self, center: Point3D) -> Bounds {
        Bounds { center, ..*self }
    }

    pub fn shifted(&self, by: Point3D) -> Bounds {
        self.moved_to(self.center + by)
    }

    /// Smallest box containing both boxes. The z of the result is the mean.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let left = self.left().min(other.left());
        let right = self.right().max(other.right());
        let bottom = self.bottom().min(other.bottom());
        let top = self.top().max(other.top());
        Bounds {
            center: Point3D::new(
                (left + right) / 2.0,
                (bottom + top) / 2.0,
                (self.center.z + other.center.z) / 2.0,
            ),
            width: right - left,
            height: top - bottom,
        }
    }

    /// Whether the two boxes overlap with positive area.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }
}

//! Core point types for planar radius clustering.

use std::cmp::Ordering;

use bytemuck::{Pod, Zeroable};

/// A point in the plane.
///
/// This type provides a small `#[repr(C)]` representation with a stable layout,
/// so large inputs can be cast from raw `[f64; 2]` buffers without copying.
/// Points order lexicographically by `(x, y)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create from any type implementing `Point2Like`.
    #[inline]
    pub fn from_like<P: Point2Like>(p: &P) -> Self {
        Self::new(p.x(), p.y())
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Lexicographic `(x, y)` comparison with a total order on the coordinates.
    #[inline]
    pub fn cmp_xy(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }

    /// Lexicographic `(y, x)` comparison, the mirror of [`Point::cmp_xy`].
    #[inline]
    pub fn cmp_yx(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
    }

    /// Convert to a glam::DVec2 (available when the `glam` feature is enabled).
    #[cfg(feature = "glam")]
    #[inline]
    pub fn to_glam(self) -> glam::DVec2 {
        glam::DVec2::new(self.x, self.y)
    }
}

impl PartialOrd for Point {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.x.partial_cmp(&other.x)? {
            Ordering::Equal => self.y.partial_cmp(&other.y),
            ord => Some(ord),
        }
    }
}

impl From<[f64; 2]> for Point {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(feature = "glam")]
impl From<glam::DVec2> for Point {
    #[inline]
    fn from(v: glam::DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Trait for types that can be used as input points.
pub trait Point2Like {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

impl Point2Like for Point {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }
    #[inline]
    fn y(&self) -> f64 {
        self.y
    }
}

impl Point2Like for [f64; 2] {
    #[inline]
    fn x(&self) -> f64 {
        self[0]
    }
    #[inline]
    fn y(&self) -> f64 {
        self[1]
    }
}

impl Point2Like for (f64, f64) {
    #[inline]
    fn x(&self) -> f64 {
        self.0
    }
    #[inline]
    fn y(&self) -> f64 {
        self.1
    }
}

#[cfg(feature = "glam")]
impl Point2Like for glam::DVec2 {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }
    #[inline]
    fn y(&self) -> f64 {
        self.y
    }
}

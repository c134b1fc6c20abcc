//! Collision shapes and overlap predicates
//!
//! Two primitive shapes cover every entity in the game: circles (gems,
//! hazards) and axis-aligned rectangles (avatar, obstacles, play area).
//! All tests are strict: shapes that only touch along an edge or at a
//! single point do not overlap, and zero-size shapes never collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Movement axis for single-axis shape transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A circle defined by its center and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    /// Negative radii are clamped to zero
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.radius <= 0.0
    }

    /// Circle with radius increased by `margin`
    pub fn grow(&self, margin: f32) -> Circle {
        Circle::new(self.center, self.radius + margin)
    }
}

/// An axis-aligned rectangle with its origin at the top-left corner
///
/// Screen coordinates: y grows downward, so `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Dimensions are taken as given; negative ones are rejected by level validation
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` whose top-left corner is at `origin`
    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Finite coordinates and non-negative dimensions
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// True if `other` lies entirely inside this rectangle (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Closest point of the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }

    /// Rectangle translated by `delta` along exactly one axis
    pub fn shift(&self, axis: Axis, delta: f32) -> Rect {
        match axis {
            Axis::Horizontal => Rect { x: self.x + delta, ..*self },
            Axis::Vertical => Rect { y: self.y + delta, ..*self },
        }
    }

    /// Rectangle shrunk by `inset` on every side (never below zero size)
    pub fn inset(&self, inset: Vec2) -> Rect {
        let width = (self.width - 2.0 * inset.x).max(0.0);
        let height = (self.height - 2.0 * inset.y).max(0.0);
        let center = self.center();
        Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }
}

/// Any collidable shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Rect(Rect),
}

impl Shape {
    /// Dispatches to the matching pairwise test
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Circle(a), Shape::Circle(b)) => circle_overlaps_circle(a, b),
            (Shape::Circle(c), Shape::Rect(r)) | (Shape::Rect(r), Shape::Circle(c)) => {
                circle_overlaps_rect(c, r)
            }
            (Shape::Rect(a), Shape::Rect(b)) => rect_overlaps_rect(a, b),
        }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Shape::Rect(r)
    }
}

/// True iff the distance between centers is less than the sum of radii
#[inline]
pub fn circle_overlaps_circle(a: &Circle, b: &Circle) -> bool {
    if a.is_degenerate() || b.is_degenerate() {
        return false;
    }
    let reach = a.radius + b.radius;
    a.center.distance_squared(b.center) < reach * reach
}

/// Clamped closest-point test
pub fn circle_overlaps_rect(c: &Circle, r: &Rect) -> bool {
    if c.is_degenerate() || r.is_degenerate() {
        return false;
    }
    let closest = r.closest_point(c.center);
    c.center.distance_squared(closest) < c.radius * c.radius
}

/// Standard AABB test: projections overlap on both axes
#[inline]
pub fn rect_overlaps_rect(a: &Rect, b: &Rect) -> bool {
    if a.is_degenerate() || b.is_degenerate() {
        return false;
    }
    a.left() < b.right() && b.left() < a.right() && a.top() < b.bottom() && b.top() < a.bottom()
}

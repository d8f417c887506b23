//! Axis-aligned rectangles and circles for board layout
//!
//! The page reports element bounds as rectangles (the shape of a DOM rect);
//! pegs are treated as circles inscribed in their bounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in CSS pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Same rectangle shifted so that `origin` becomes (0, 0)
    pub fn relative_to(&self, origin: Vec2) -> Self {
        Self {
            left: self.left - origin.x,
            top: self.top - origin.y,
            ..*self
        }
    }

    /// Largest circle centered in this rectangle (uses the width, like a round element)
    pub fn inscribed_circle(&self) -> Circle {
        Circle::new(self.center(), self.width / 2.0)
    }
}

/// A circle (peg or ball)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strict overlap: touching circles do not collide
    #[inline]
    pub fn overlaps(&self, other: &Circle) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }
}

//! Limits: the unit of layout negotiation.
//!
//! Layout is two-pass. Limits flow up the tree (`Node::limits`, a pure query),
//! then bounds flow down (`Node::layout`). A parent combines its children's
//! limits into its own; it never asks a child for a size it cannot take.

use crate::geometry::{Axis, Size};

/// "Unbounded" extent. Finite so that sums and fractions stay well-defined.
pub const FULL_EXTENT: f32 = 1e30;

/// Minimum and maximum extent along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f32,
    pub max: f32,
}

impl Extent {
    pub const FULL: Self = Self { min: 0.0, max: FULL_EXTENT };

    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub const fn fixed(extent: f32) -> Self {
        Self { min: extent, max: extent }
    }

    #[inline]
    pub fn range(&self) -> f32 {
        self.max - self.min
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        debug_assert!(!value.is_nan(), "NaN extent in layout");
        value.max(self.min).min(self.max.max(self.min))
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::FULL
    }
}

/// Per-axis minimum and maximum size a node can occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub min: Size,
    pub max: Size,
}

impl Limits {
    /// Anything from zero to [`FULL_EXTENT`] on both axes.
    pub const FULL: Self = Self {
        min: Size::ZERO,
        max: Size { width: FULL_EXTENT, height: FULL_EXTENT },
    };

    #[inline]
    pub const fn new(min: Size, max: Size) -> Self {
        Self { min, max }
    }

    /// Exactly `size`, no more and no less.
    #[inline]
    pub const fn fixed(size: Size) -> Self {
        Self { min: size, max: size }
    }

    /// At least `min`, unbounded above.
    #[inline]
    pub const fn at_least(min: Size) -> Self {
        Self { min, max: Size { width: FULL_EXTENT, height: FULL_EXTENT } }
    }

    #[inline]
    pub fn along(&self, axis: Axis) -> Extent {
        Extent::new(self.min.along(axis), self.max.along(axis))
    }

    #[inline]
    pub fn set_along(&mut self, axis: Axis, extent: Extent) {
        *self.min.along_mut(axis) = extent.min;
        *self.max.along_mut(axis) = extent.max;
    }

    /// Build limits from a main-axis and a cross-axis extent.
    #[inline]
    pub fn from_axes(axis: Axis, main: Extent, cross: Extent) -> Self {
        Self {
            min: Size::from_axes(axis, main.min, cross.min),
            max: Size::from_axes(axis, main.max, cross.max),
        }
    }

    /// Clamp `size` into these limits. When `max < min` the minimum wins.
    #[inline]
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            self.along(Axis::Horizontal).clamp(size.width),
            self.along(Axis::Vertical).clamp(size.height),
        )
    }

    /// Raise every maximum that sits below its minimum, and cap at [`FULL_EXTENT`].
    #[inline]
    pub fn normalized(mut self) -> Self {
        self.max.width = self.max.width.max(self.min.width).min(FULL_EXTENT);
        self.max.height = self.max.height.max(self.min.height).min(FULL_EXTENT);
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::FULL
    }
}

/// Share of free space a node takes relative to its siblings, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stretch {
    pub x: f32,
    pub y: f32,
}

impl Stretch {
    pub const DEFAULT: Self = Self { x: 1.0, y: 1.0 };
    pub const NONE: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

impl Default for Stretch {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Padding on each side of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const ZERO: Self = Self { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };

    #[inline]
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    #[inline]
    pub const fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    #[inline]
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrain_prefers_min_when_inverted() {
        let l = Limits::new(Size::new(20.0, 20.0), Size::new(10.0, 30.0));
        let s = l.constrain(Size::new(5.0, 50.0));
        assert_eq!(s, Size::new(20.0, 30.0));
    }

    #[test]
    fn test_normalized_caps_and_raises() {
        let l = Limits::new(Size::new(20.0, 0.0), Size::new(10.0, f32::INFINITY)).normalized();
        assert_eq!(l.max.width, 20.0);
        assert_eq!(l.max.height, FULL_EXTENT);
    }

    #[test]
    fn test_along_and_set_along() {
        let mut l = Limits::FULL;
        l.set_along(Axis::Vertical, Extent::fixed(40.0));
        assert_eq!(l.along(Axis::Vertical), Extent::fixed(40.0));
        assert_eq!(l.along(Axis::Horizontal), Extent::FULL);
    }
}

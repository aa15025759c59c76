//! Drawing-context interface consumed by `Node::draw`.
//!
//! The kernel never rasterizes. Nodes issue a small set of primitives against
//! [`Canvas`]; a rendering backend implements the trait. [`DisplayList`] is
//! the recording implementation used headless and in tests.
//!
//! # Clipping
//!
//! The clip stack is part of the canvas. Composites read [`Canvas::clip_bounds`]
//! to skip children that cannot be visible; the virtualized list uses it to
//! pick its visible window.

use unicode_width::UnicodeWidthChar;

use crate::geometry::{Point, Rect, Size};

/// Approximate monospace character width at the base font size.
pub const CHAR_WIDTH: f32 = 8.4;

/// Line height at the base font size.
pub const LINE_HEIGHT: f32 = 18.0;

/// RGBA color with components in 0.0-1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Selection highlight (blue tint with transparency).
    pub const SELECTION: Self = Self::rgba(0.3, 0.5, 0.9, 0.6);
    /// Drop and insertion indicator.
    pub const INDICATOR: Self = Self::rgba(0.2, 0.6, 1.0, 0.5);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Backend-agnostic drawing surface.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    fn line(&mut self, from: Point, to: Point, color: Color, width: f32);

    fn text(&mut self, origin: Point, text: &str, color: Color);

    /// Push a clip rectangle; drawing is limited to the intersection of all
    /// pushed rectangles.
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);

    /// Effective clip, or `None` when nothing is pushed.
    fn clip_bounds(&self) -> Option<Rect>;
}

/// Text metrics provider, consulted during `limits`.
pub trait TextMeasure {
    fn measure(&self, text: &str) -> Size;
}

/// Fixed-pitch metrics: every cell is [`CHAR_WIDTH`] wide, every line
/// [`LINE_HEIGHT`] tall. Wide (CJK) chars take two cells, combining marks none.
#[derive(Debug, Clone, Copy, Default)]
pub struct Monospace;

/// Display width of `line` in cells.
fn cell_width(line: &str) -> usize {
    line.chars().map(|c| UnicodeWidthChar::width(c).unwrap_or(0)).sum()
}

impl TextMeasure for Monospace {
    fn measure(&self, text: &str) -> Size {
        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(cell_width(line));
        }
        Size::new(widest as f32 * CHAR_WIDTH, lines as f32 * LINE_HEIGHT)
    }
}

// =========================================================================
// Recording canvas
// =========================================================================

/// One recorded drawing operation, with the clip active when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Fill { rect: Rect, color: Color, clip: Option<Rect> },
    Stroke { rect: Rect, color: Color, width: f32, clip: Option<Rect> },
    Line { from: Point, to: Point, color: Color, width: f32, clip: Option<Rect> },
    Text { origin: Point, text: String, color: Color, clip: Option<Rect> },
}

/// A canvas that records primitives instead of painting them.
#[derive(Debug, Default)]
pub struct DisplayList {
    primitives: Vec<Primitive>,
    clip_stack: Vec<Rect>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recording with `clip` already pushed.
    pub fn clipped(clip: Rect) -> Self {
        Self { primitives: Vec::new(), clip_stack: vec![clip] }
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
        self.clip_stack.clear();
    }

    #[inline]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// All recorded text runs, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn current_clip(&self) -> Option<Rect> {
        let (first, rest) = self.clip_stack.split_first()?;
        let mut clip = *first;
        for r in rest {
            // Disjoint clips leave nothing visible.
            clip = clip.intersection(r).unwrap_or(Rect::new(clip.x, clip.y, 0.0, 0.0));
        }
        Some(clip)
    }
}

impl Canvas for DisplayList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clip = self.current_clip();
        self.primitives.push(Primitive::Fill { rect, color, clip });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let clip = self.current_clip();
        self.primitives.push(Primitive::Stroke { rect, color, width, clip });
    }

    fn line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        let clip = self.current_clip();
        self.primitives.push(Primitive::Line { from, to, color, width, clip });
    }

    fn text(&mut self, origin: Point, text: &str, color: Color) {
        let clip = self.current_clip();
        self.primitives.push(Primitive::Text { origin, text: text.to_owned(), color, clip });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    fn clip_bounds(&self) -> Option<Rect> {
        self.current_clip()
    }
}

//! Delegating wrappers: one owned subject, every call forwarded.
//!
//! A wrapper is a [`Wrap`] of a subject node and an [`Adjust`]er. The adjuster
//! can transform the limits reported up and the bounds handed down; every
//! other capability passes straight through to the subject in a child context.
//! Visual variants are built by composing adjusters, not by subclassing nodes.
//!
//! Adjusted limits are monotonic in the subject's: a wrapper never lowers the
//! subject's minimum and never caps the maximum below the minimum.

use crate::canvas::Canvas;
use crate::context::{BasicContext, Context};
use crate::geometry::{Axis, Point, Rect, Size};
use crate::input::{CursorTracking, DropInfo, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::limits::{Extent, FULL_EXTENT, Limits, Padding, Stretch};
use crate::node::{HitQuery, Node, Selectable};

/// Transformation a wrapper applies around its subject.
pub trait Adjust {
    fn limits(&self, subject: Limits) -> Limits {
        subject
    }

    fn stretch(&self, subject: Stretch) -> Stretch {
        subject
    }

    /// Subject bounds inside the wrapper's `outer` bounds.
    fn bounds(&self, outer: Rect, _subject: Limits) -> Rect {
        outer
    }
}

/// A subject node wrapped with an adjuster.
pub struct Wrap<N, A> {
    subject: N,
    adjust: A,
}

impl<N: Node, A: Adjust> Wrap<N, A> {
    pub fn new(adjust: A, subject: N) -> Self {
        Self { subject, adjust }
    }

    #[inline]
    pub fn subject(&self) -> &N {
        &self.subject
    }

    #[inline]
    pub fn subject_mut(&mut self) -> &mut N {
        &mut self.subject
    }

    #[inline]
    pub fn adjuster(&self) -> &A {
        &self.adjust
    }

    pub fn into_inner(self) -> N {
        self.subject
    }

    fn subject_bounds(&self, ctx: &Context) -> Rect {
        self.adjust.bounds(ctx.bounds, self.subject.limits(&ctx.basic()))
    }
}

impl<N: Node, A: Adjust> Node for Wrap<N, A> {
    fn limits(&self, ctx: &BasicContext) -> Limits {
        self.adjust.limits(self.subject.limits(ctx))
    }

    fn stretch(&self) -> Stretch {
        self.adjust.stretch(self.subject.stretch())
    }

    fn layout(&mut self, ctx: &Context) {
        let b = self.subject_bounds(ctx);
        self.subject.layout(&ctx.child(b));
    }

    fn draw(&mut self, ctx: &Context, canvas: &mut dyn Canvas) {
        let b = self.subject_bounds(ctx);
        self.subject.draw(&ctx.child(b), canvas);
    }

    fn hit_test(&self, ctx: &Context, p: Point, query: HitQuery) -> Option<&dyn Node> {
        let b = self.subject_bounds(ctx);
        self.subject.hit_test(&ctx.child(b), p, query)
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        let b = self.subject_bounds(ctx);
        self.subject.click(&ctx.child(b), btn)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        let b = self.subject_bounds(ctx);
        self.subject.drag(&ctx.child(b), btn);
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        let b = self.subject_bounds(ctx);
        self.subject.cursor(&ctx.child(b), p, status)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        let b = self.subject_bounds(ctx);
        self.subject.key(&ctx.child(b), k)
    }

    fn text(&mut self, ctx: &Context, info: &TextInfo) -> bool {
        let b = self.subject_bounds(ctx);
        self.subject.text(&ctx.child(b), info)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        let b = self.subject_bounds(ctx);
        self.subject.scroll(&ctx.child(b), dir, p)
    }

    fn wants_control(&self) -> bool {
        self.subject.wants_control()
    }

    fn wants_focus(&self) -> bool {
        self.subject.wants_focus()
    }

    fn begin_focus(&mut self, req: FocusRequest) -> bool {
        self.subject.begin_focus(req)
    }

    fn end_focus(&mut self) -> bool {
        self.subject.end_focus()
    }

    fn enable(&mut self, state: bool) {
        self.subject.enable(state);
    }

    fn is_enabled(&self) -> bool {
        self.subject.is_enabled()
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        let b = self.subject_bounds(ctx);
        self.subject.track_drop(&ctx.child(b), info, status);
    }

    fn accept_drop(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        let b = self.subject_bounds(ctx);
        self.subject.accept_drop(&ctx.child(b), info)
    }

    fn as_selectable(&self) -> Option<&dyn Selectable> {
        self.subject.as_selectable()
    }

    fn as_selectable_mut(&mut self) -> Option<&mut dyn Selectable> {
        self.subject.as_selectable_mut()
    }
}

// ============================================================================
// Adjusters
// ============================================================================

/// Padding around the subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inset(pub Padding);

impl Adjust for Inset {
    fn limits(&self, subject: Limits) -> Limits {
        let pad = Size::new(self.0.horizontal(), self.0.vertical());
        Limits::new(
            Size::new(subject.min.width + pad.width, subject.min.height + pad.height),
            Size::new(
                (subject.max.width + pad.width).min(FULL_EXTENT),
                (subject.max.height + pad.height).min(FULL_EXTENT),
            ),
        )
        .normalized()
    }

    fn bounds(&self, outer: Rect, _subject: Limits) -> Rect {
        Rect::new(
            outer.x + self.0.left,
            outer.y + self.0.top,
            (outer.width - self.0.horizontal()).max(0.0),
            (outer.height - self.0.vertical()).max(0.0),
        )
    }
}

/// Places the subject at its minimum size, at a fraction of the slack along
/// each aligned axis (0.0 = start, 0.5 = center, 1.0 = end).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Align {
    pub horizontal: Option<f32>,
    pub vertical: Option<f32>,
}

impl Align {
    fn fraction(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

impl Adjust for Align {
    fn limits(&self, mut subject: Limits) -> Limits {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if self.fraction(axis).is_some() {
                let e = subject.along(axis);
                subject.set_along(axis, Extent::new(e.min, FULL_EXTENT));
            }
        }
        subject
    }

    fn bounds(&self, outer: Rect, subject: Limits) -> Rect {
        let mut b = outer;
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if let Some(f) = self.fraction(axis) {
                let (start, end) = outer.span(axis);
                let avail = end - start;
                let size = subject.along(axis).min.min(avail);
                b = b.with_span(axis, start + (avail - size) * f.clamp(0.0, 1.0), size);
            }
        }
        b
    }
}

/// Fixed extent along one or both axes, never below the subject's minimum.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl Adjust for FixedSize {
    fn limits(&self, mut subject: Limits) -> Limits {
        for (axis, size) in [(Axis::Horizontal, self.width), (Axis::Vertical, self.height)] {
            if let Some(size) = size {
                let e = subject.along(axis);
                subject.set_along(axis, Extent::fixed(size.max(e.min)));
            }
        }
        subject
    }
}

/// Intersects the subject's limits with fixed bounds. The subject minimum
/// always wins over a smaller maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamp(pub Limits);

impl Adjust for Clamp {
    fn limits(&self, subject: Limits) -> Limits {
        let min = Size::new(
            subject.min.width.max(self.0.min.width),
            subject.min.height.max(self.0.min.height),
        );
        let max = Size::new(
            subject.max.width.min(self.0.max.width),
            subject.max.height.min(self.0.max.height),
        );
        Limits::new(min, max).normalized()
    }
}

/// Overrides the subject's stretch factor along one or both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StretchOverride {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl Adjust for StretchOverride {
    fn stretch(&self, subject: Stretch) -> Stretch {
        Stretch::new(self.x.unwrap_or(subject.x), self.y.unwrap_or(subject.y))
    }
}

pub type Margin<N> = Wrap<N, Inset>;
pub type Aligned<N> = Wrap<N, Align>;
pub type SizedBox<N> = Wrap<N, FixedSize>;
pub type Clamped<N> = Wrap<N, Clamp>;
pub type Stretched<N> = Wrap<N, StretchOverride>;

pub fn margin<N: Node>(padding: Padding, subject: N) -> Margin<N> {
    Wrap::new(Inset(padding), subject)
}

pub fn halign<N: Node>(fraction: f32, subject: N) -> Aligned<N> {
    Wrap::new(Align { horizontal: Some(fraction), vertical: None }, subject)
}

pub fn valign<N: Node>(fraction: f32, subject: N) -> Aligned<N> {
    Wrap::new(Align { horizontal: None, vertical: Some(fraction) }, subject)
}

pub fn align_center<N: Node>(subject: N) -> Aligned<N> {
    Wrap::new(Align { horizontal: Some(0.5), vertical: Some(0.5) }, subject)
}

pub fn fixed_size<N: Node>(size: Size, subject: N) -> SizedBox<N> {
    Wrap::new(FixedSize { width: Some(size.width), height: Some(size.height) }, subject)
}

pub fn hsize<N: Node>(width: f32, subject: N) -> SizedBox<N> {
    Wrap::new(FixedSize { width: Some(width), height: None }, subject)
}

pub fn vsize<N: Node>(height: f32, subject: N) -> SizedBox<N> {
    Wrap::new(FixedSize { width: None, height: Some(height) }, subject)
}

pub fn limit<N: Node>(limits: Limits, subject: N) -> Clamped<N> {
    Wrap::new(Clamp(limits), subject)
}

pub fn hstretch<N: Node>(factor: f32, subject: N) -> Stretched<N> {
    Wrap::new(StretchOverride { x: Some(factor), y: None }, subject)
}

pub fn vstretch<N: Node>(factor: f32, subject: N) -> Stretched<N> {
    Wrap::new(StretchOverride { x: None, y: Some(factor) }, subject)
}

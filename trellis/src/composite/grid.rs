//! Grids: children placed at fractional coordinates along an axis.
//!
//! A grid with `n` cells carries `n` coordinates in `(0, 1]`, strictly
//! increasing and ending at `1.0`. Cell `k` spans from coordinate `k - 1`
//! (or `0`) to coordinate `k`. A child may span several consecutive cells.
//!
//! A grid built [`with_dividers`](Grid::with_dividers) lets the user drag the
//! boundary between two children. The boundary never crosses a neighbouring
//! coordinate and never pushes either child outside its limits.

use crate::canvas::Canvas;
use crate::context::{BasicContext, Context};
use crate::geometry::{Axis, Point, Rect};
use crate::input::{CursorTracking, DropInfo, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::limits::{Extent, FULL_EXTENT, Limits};
use crate::node::{self, HitQuery, Node};
use crate::tracker::Tracker;

use super::{Arrange, Composite, Container, Dispatch};

/// Gap enforced between neighbouring coordinates.
const MIN_GAP: f32 = 1e-4;

/// Placement for a grid composite.
#[derive(Debug, Clone)]
pub struct GridLayout {
    axis: Axis,
    coords: Vec<f32>,
    spans: Vec<usize>,
}

fn uniform(cells: usize) -> Vec<f32> {
    (1..=cells).map(|k| k as f32 / cells as f32).collect()
}

fn valid_coords(coords: &[f32]) -> bool {
    let increasing = coords.windows(2).all(|w| w[0] < w[1]);
    let in_range = coords.first().is_some_and(|&c| c > 0.0);
    increasing && in_range && coords.last() == Some(&1.0)
}

impl GridLayout {
    /// Layout for `children` children, one cell each. Invalid coordinates are
    /// replaced by a uniform split.
    pub fn new(axis: Axis, coords: Vec<f32>, children: usize) -> Self {
        let mut layout = Self { axis, coords: Vec::new(), spans: vec![1; children] };
        layout.set_coords(coords);
        layout
    }

    fn set_coords(&mut self, coords: Vec<f32>) {
        let cells: usize = self.spans.iter().sum();
        if coords.len() == cells && valid_coords(&coords) {
            self.coords = coords;
        } else {
            tracing::warn!(?coords, cells, "invalid grid coordinates, using a uniform split");
            self.coords = uniform(cells);
        }
    }

    /// Assign cell spans per child. Spans of zero count as one.
    pub fn set_spans(&mut self, spans: Vec<usize>) {
        let coords = std::mem::take(&mut self.coords);
        self.spans = spans.into_iter().map(|s| s.max(1)).collect();
        self.set_coords(coords);
    }

    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub fn coordinates(&self) -> &[f32] {
        &self.coords
    }

    #[inline]
    pub fn spans(&self) -> &[usize] {
        &self.spans
    }

    /// Index of the first cell of child `index`.
    fn first_cell(&self, index: usize) -> usize {
        self.spans.iter().take(index).sum()
    }

    /// Fractional `[lo, hi)` covered by child `index`.
    pub fn fraction(&self, index: usize) -> Option<(f32, f32)> {
        let span = *self.spans.get(index)?;
        let first = self.first_cell(index);
        let lo = if first == 0 { 0.0 } else { *self.coords.get(first - 1)? };
        let hi = *self.coords.get(first + span - 1)?;
        Some((lo, hi))
    }

    /// Coordinate index of the boundary after child `index`, if another child
    /// follows it.
    fn boundary_after(&self, index: usize) -> Option<usize> {
        (index + 1 < self.spans.len()).then(|| self.first_cell(index) + self.spans[index] - 1)
    }

    /// Child whose trailing boundary is coordinate `k`.
    fn child_ending_at(&self, k: usize) -> Option<usize> {
        let mut end = 0;
        for (i, &span) in self.spans.iter().enumerate() {
            end += span;
            if end == k + 1 {
                return (i + 1 < self.spans.len()).then_some(i);
            }
            if end > k + 1 {
                return None;
            }
        }
        None
    }
}

impl Arrange for GridLayout {
    fn limits(&self, ctx: &BasicContext, children: &[Box<dyn Node>]) -> Limits {
        let cross = self.axis.cross();
        let mut main = Extent::FULL;
        let mut across = Extent::FULL;
        for (i, child) in children.iter().enumerate() {
            let l = child.limits(ctx);
            if let Some((lo, hi)) = self.fraction(i) {
                let frac = hi - lo;
                if frac > 0.0 {
                    main.min = main.min.max(l.along(self.axis).min / frac);
                    main.max = main.max.min(l.along(self.axis).max / frac);
                }
            }
            across.min = across.min.max(l.along(cross).min);
            across.max = across.max.min(l.along(cross).max);
        }
        main.max = main.max.min(FULL_EXTENT);
        Limits::from_axes(self.axis, main, across).normalized()
    }

    fn arrange(&mut self, _ctx: &Context, children: &[Box<dyn Node>]) {
        if self.spans.len() != children.len() {
            tracing::warn!(children = children.len(), spans = self.spans.len(), "grid spans out of sync, resetting");
            self.spans = vec![1; children.len()];
            let coords = std::mem::take(&mut self.coords);
            self.set_coords(coords);
        }
    }

    fn bounds_of(&self, ctx: &Context, index: usize) -> Rect {
        let Some((lo, hi)) = self.fraction(index) else {
            return Rect::ZERO;
        };
        let (start, end) = ctx.bounds.span(self.axis);
        let extent = end - start;
        ctx.bounds.with_span(self.axis, start + lo * extent, (hi - lo) * extent)
    }

    fn axis(&self) -> Axis {
        self.axis
    }
}

/// A grid composite with optional draggable dividers.
pub struct Grid {
    inner: Composite<GridLayout>,
    dividers: bool,
    /// Child before the divider being dragged.
    dragging: Option<usize>,
    tracker: Tracker,
}

impl Grid {
    pub fn new(axis: Axis, coords: Vec<f32>, children: Vec<Box<dyn Node>>) -> Self {
        let layout = GridLayout::new(axis, coords, children.len());
        Self {
            inner: Composite::with_children(layout, children),
            dividers: false,
            dragging: None,
            tracker: Tracker::default(),
        }
    }

    pub fn with_spans(mut self, spans: Vec<usize>) -> Self {
        self.inner.arrangement_mut().set_spans(spans);
        self
    }

    pub fn with_dividers(mut self, enabled: bool) -> Self {
        self.dividers = enabled;
        self
    }

    #[inline]
    pub fn coordinates(&self) -> &[f32] {
        self.inner.arrangement().coordinates()
    }

    #[inline]
    pub fn has_dividers(&self) -> bool {
        self.dividers
    }

    #[inline]
    pub fn state(&self) -> &Dispatch {
        self.inner.state()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Node> {
        self.inner.get(index)
    }

    /// Child before the divider within grab distance of `p`.
    fn divider_at(&self, ctx: &Context, p: Point) -> Option<usize> {
        let grab = ctx.host.config().divider_grab;
        let axis = self.inner.arrangement().axis();
        (0..self.inner.len().saturating_sub(1)).find(|&i| {
            let (_, edge) = self.inner.bounds_of(ctx, i).span(axis);
            ctx.bounds.contains(p) && (p.along(axis) - edge).abs() <= grab
        })
    }

    /// Move coordinate `index` toward `value`, clamped so both flanking
    /// children stay inside their limits and coordinates stay ordered.
    /// Returns false when the coordinate is not a divider or cannot move.
    pub fn set_coordinate(&mut self, ctx: &Context, index: usize, value: f32) -> bool {
        debug_assert!(self.dividers, "set_coordinate on a grid without dividers");
        if !self.dividers {
            return false;
        }
        let layout = self.inner.arrangement();
        let Some(before) = layout.child_ending_at(index) else {
            tracing::warn!(index, "grid coordinate is not a divider");
            return false;
        };
        let (Some((lo, _)), Some((_, hi))) = (layout.fraction(before), layout.fraction(before + 1)) else {
            return false;
        };
        let axis = layout.axis();
        let extent = ctx.bounds.size().along(axis);
        if extent <= 0.0 {
            return false;
        }

        let basic = ctx.basic();
        let (Some(a), Some(b)) = (self.inner.get(before), self.inner.get(before + 1)) else {
            return false;
        };
        let a = a.limits(&basic).along(axis);
        let b = b.limits(&basic).along(axis);

        let coords = layout.coordinates();
        let prev = if index == 0 { 0.0 } else { coords[index - 1] };
        let next = coords.get(index + 1).copied().unwrap_or(1.0);
        let lower = (lo + a.min / extent).max(hi - b.max / extent).max(prev + MIN_GAP);
        let upper = (lo + a.max / extent).min(hi - b.min / extent).min(next - MIN_GAP);
        if lower > upper {
            tracing::debug!(index, lower, upper, "divider pinned by limits");
            return false;
        }

        let clamped = value.clamp(lower, upper);
        self.inner.arrangement_mut().coords[index] = clamped;
        node::layout(self, ctx);
        true
    }
}

impl Node for Grid {
    fn limits(&self, ctx: &BasicContext) -> Limits {
        self.inner.limits(ctx)
    }

    fn layout(&mut self, ctx: &Context) {
        self.inner.layout(ctx);
    }

    fn draw(&mut self, ctx: &Context, canvas: &mut dyn Canvas) {
        self.inner.draw(ctx, canvas);
    }

    fn hit_test(&self, ctx: &Context, p: Point, query: HitQuery) -> Option<&dyn Node> {
        self.inner.hit_test(ctx, p, query)
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        if !btn.down && self.dragging.take().is_some() {
            self.tracker.end();
            return true;
        }
        if btn.down && self.dividers {
            if let Some(i) = self.divider_at(ctx, btn.pos) {
                self.dragging = Some(i);
                self.tracker.begin(&btn, self.inner.bounds_of(ctx, i).origin());
                return true;
            }
        }
        self.inner.click(ctx, btn)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        let Some(before) = self.dragging else {
            self.inner.drag(ctx, btn);
            return;
        };
        let Some(info) = self.tracker.update(&btn).copied() else {
            return;
        };
        let layout = self.inner.arrangement();
        let axis = layout.axis();
        let Some(index) = layout.boundary_after(before) else {
            return;
        };
        let (start, end) = ctx.bounds.span(axis);
        if end <= start {
            return;
        }
        let value = (info.current.along(axis) - start) / (end - start);
        self.set_coordinate(ctx, index, value);
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        self.inner.cursor(ctx, p, status)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        self.inner.key(ctx, k)
    }

    fn text(&mut self, ctx: &Context, info: &TextInfo) -> bool {
        self.inner.text(ctx, info)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        self.inner.scroll(ctx, dir, p)
    }

    fn wants_control(&self) -> bool {
        self.dividers || self.inner.wants_control()
    }

    fn wants_focus(&self) -> bool {
        self.inner.wants_focus()
    }

    fn begin_focus(&mut self, req: FocusRequest) -> bool {
        self.inner.begin_focus(req)
    }

    fn end_focus(&mut self) -> bool {
        self.inner.end_focus()
    }

    fn enable(&mut self, state: bool) {
        self.inner.enable(state);
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        self.inner.track_drop(ctx, info, status);
    }

    fn accept_drop(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        self.inner.accept_drop(ctx, info)
    }
}

/// Grid laid out left to right.
pub fn hgrid(coords: Vec<f32>, children: Vec<Box<dyn Node>>) -> Grid {
    Grid::new(Axis::Horizontal, coords, children)
}

/// Grid laid out top to bottom.
pub fn vgrid(coords: Vec<f32>, children: Vec<Box<dyn Node>>) -> Grid {
    Grid::new(Axis::Vertical, coords, children)
}

//! Virtualized list: a composite whose children are realized on demand.
//!
//! # Architecture
//!
//! The list keeps one [`Cell`] per item: its position and size along the list
//! axis, plus the item's node once it has been composed. Positions are prefix
//! sums, `pos[i + 1] == pos[i] + size[i]`, so the cells overlapping any
//! interval are found with a binary search and a short walk.
//!
//! ```text
//!   cells:  | 0 | 1 |   2   | 3 |4| 5 |      6      |
//!                     [====== visible ======)
//!   first = partition_point(end <= start)  -> 2
//!   walk while pos < end                   -> 2, 3, 4, 5
//! ```
//!
//! Nodes are composed the first time their cell is drawn and, with
//! [`manage_cells`](DynamicList::with_manage_cells), dropped again once the
//! window moves past them.
//!
//! # Generations
//!
//! Every layout pass and every structural edit bumps the list's layout
//! generation. A realized cell remembers the generation it was laid out at and
//! is laid out again before its next draw when that is stale.
//!
//! Sizes are re-read from the [`Composer`] lazily: edits only mark the list
//! dirty, and the next layout or draw recomputes every position in one pass.

mod composer;

use std::ops::Range;

pub use composer::{Composer, FixedComposer, SizedComposer};

use crate::canvas::Canvas;
use crate::composite::{Container, Dispatch, Reorder, apply_order, dispatch, erase_plan, invert_order, move_plan};
use crate::context::{BasicContext, Context};
use crate::geometry::{Axis, Point, Rect};
use crate::input::{CursorTracking, DropInfo, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::limits::{Extent, Limits};
use crate::node::{HitQuery, Node};

/// One list item: placement along the list axis and the node, when realized.
#[derive(Default)]
pub struct Cell {
    pos: f32,
    size: f32,
    node: Option<Box<dyn Node>>,
    layout_generation: u64,
}

impl Cell {
    /// Offset from the list's main-axis origin.
    #[inline]
    pub fn pos(&self) -> f32 {
        self.pos
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn end(&self) -> f32 {
        self.pos + self.size
    }

    #[inline]
    pub fn is_realized(&self) -> bool {
        self.node.is_some()
    }

    #[inline]
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("pos", &self.pos)
            .field("size", &self.size)
            .field("realized", &self.node.is_some())
            .field("layout_generation", &self.layout_generation)
            .finish()
    }
}

pub struct DynamicList<C> {
    composer: C,
    axis: Axis,
    cells: Vec<Cell>,
    dirty: bool,
    generation: u64,
    manage_cells: bool,
    cross_size: Option<f32>,
    /// Cells drawn by the last draw; all cells after an edit.
    window: Range<usize>,
    dispatch: Dispatch,
}

impl<C: Composer> DynamicList<C> {
    pub fn new(axis: Axis, composer: C) -> Self {
        let cells = std::iter::repeat_with(Cell::default).take(composer.len()).collect::<Vec<_>>();
        let window = 0..cells.len();
        Self {
            composer,
            axis,
            cells,
            dirty: true,
            generation: 1,
            manage_cells: true,
            cross_size: None,
            window,
            dispatch: Dispatch::default(),
        }
    }

    /// Drop realized nodes once they scroll out of view (default on).
    pub fn with_manage_cells(mut self, manage: bool) -> Self {
        self.manage_cells = manage;
        self
    }

    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub fn composer(&self) -> &C {
        &self.composer
    }

    /// Mutable access to the item source. Call [`update`](Self::update)
    /// afterwards if items changed.
    #[inline]
    pub fn composer_mut(&mut self) -> &mut C {
        &mut self.composer
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn state(&self) -> &Dispatch {
        &self.dispatch
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Total extent along the list axis, as of the last sync.
    pub fn extent(&self) -> f32 {
        self.cells.last().map_or(0.0, Cell::end)
    }

    pub fn realized_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_realized()).count()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Node> {
        Some(self.cells.get(index)?.node.as_ref()?.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        Some(self.cells.get_mut(index)?.node.as_mut()?.as_mut())
    }

    pub fn focus(&mut self, index: usize) -> bool {
        dispatch::focus(self, index)
    }

    // ========================================================================
    // Sync
    // ========================================================================

    fn reconcile_len(&mut self) {
        let len = self.composer.len();
        if self.cells.len() != len {
            self.cells.resize_with(len, Cell::default);
            self.dispatch.remap(|i| (i < len).then_some(i));
            self.dirty = true;
        }
    }

    /// Re-read sizes and recompute positions if anything changed.
    fn sync(&mut self, ctx: &BasicContext) {
        self.reconcile_len();
        if !self.dirty {
            return;
        }
        let mut pos = 0.0;
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.size = self.composer.main_axis_size(i, ctx).max(0.0);
            cell.pos = pos;
            pos += cell.size;
        }
        self.dirty = false;
        tracing::debug!(len = self.cells.len(), extent = pos, "list synced");
    }

    /// Recompute positions from cached sizes.
    fn resequence(&mut self) {
        let mut pos = 0.0;
        for cell in &mut self.cells {
            cell.pos = pos;
            pos += cell.size;
        }
    }

    fn after_edit(&mut self) {
        self.resequence();
        self.generation += 1;
        self.dirty = true;
        self.window = 0..self.cells.len();
    }

    // ========================================================================
    // Windowing
    // ========================================================================

    /// Indices of cells overlapping `[start, end)`, in list coordinates.
    /// Zero-size cells inside the range are included; the visitors skip them.
    pub fn visible_range(&self, start: f32, end: f32) -> Range<usize> {
        if start >= end {
            return 0..0;
        }
        let first = self.cells.partition_point(|c| c.end() <= start);
        let last = self.cells.partition_point(|c| c.pos < end);
        first..last.max(first)
    }

    /// Visit cells with a non-empty intersection with `[start, end)`, in order.
    pub fn for_each_visible(&self, start: f32, end: f32, mut f: impl FnMut(usize, &Cell)) {
        if start >= end {
            return;
        }
        let first = self.cells.partition_point(|c| c.end() <= start);
        for (i, cell) in self.cells.iter().enumerate().skip(first) {
            if cell.pos >= end {
                break;
            }
            if cell.size > 0.0 {
                f(i, cell);
            }
        }
    }

    /// Same cells as [`for_each_visible`](Self::for_each_visible), last first.
    pub fn for_each_visible_rev(&self, start: f32, end: f32, mut f: impl FnMut(usize, &Cell)) {
        if start >= end {
            return;
        }
        let last = self.cells.partition_point(|c| c.pos < end);
        for i in (0..last).rev() {
            let cell = &self.cells[i];
            if cell.end() <= start {
                break;
            }
            if cell.size > 0.0 {
                f(i, cell);
            }
        }
    }

    /// Main-axis interval of `ctx.bounds` visible through the canvas clip,
    /// relative to the list origin.
    fn visible_span(&self, ctx: &Context, canvas: &dyn Canvas) -> Option<(f32, f32)> {
        let visible = match canvas.clip_bounds() {
            Some(clip) => clip.intersection(&ctx.bounds)?,
            None => ctx.bounds,
        };
        let (origin, _) = ctx.bounds.span(self.axis);
        let (start, end) = visible.span(self.axis);
        Some((start - origin, end - origin))
    }

    fn release_outside(&mut self, keep: &Range<usize>) {
        let pinned = [self.dispatch.focus, self.dispatch.click_tracking];
        let previous = std::mem::replace(&mut self.window, keep.clone());
        let mut released = 0;
        for i in previous.filter(|i| !keep.contains(i) && !pinned.contains(&Some(*i))) {
            if let Some(cell) = self.cells.get_mut(i) {
                if cell.node.take().is_some() {
                    released += 1;
                    self.dispatch.hover.remove(&i);
                }
            }
        }
        if released > 0 {
            tracing::trace!(released, "released list cells");
        }
    }

    // ========================================================================
    // Structural edits
    // ========================================================================

    /// Insert `count` new items before `pos`.
    pub fn insert(&mut self, pos: usize, count: usize) {
        self.reconcile_len();
        let len = self.cells.len();
        if pos > len {
            tracing::warn!(pos, len, "list insert out of range, ignored");
            return;
        }
        if count == 0 {
            return;
        }
        let new_len = len + count;
        self.composer.resize(new_len);
        let order: Vec<usize> = (0..pos).chain(len..new_len).chain(pos..len).collect();
        self.composer.reorder(&order);

        self.cells.splice(pos..pos, std::iter::repeat_with(Cell::default).take(count));
        self.dispatch.remap(|i| Some(if i >= pos { i + count } else { i }));
        self.after_edit();
        tracing::debug!(pos, count, "list insert");
    }

    /// Remove the items at `indices`. Out-of-range indices are skipped.
    pub fn erase(&mut self, indices: &[usize]) {
        self.reconcile_len();
        let len = self.cells.len();
        let map = erase_plan(len, indices);
        let kept = map.iter().filter(|m| m.is_some()).count();
        if kept == len {
            tracing::warn!(?indices, len, "list erase matched nothing, ignored");
            return;
        }
        let order: Vec<usize> = (0..len).filter(|&i| map[i].is_some()).chain((0..len).filter(|&i| map[i].is_none())).collect();
        self.composer.reorder(&order);
        self.composer.resize(kept);

        let mut index = 0;
        self.cells.retain(|_| {
            let keep = map[index].is_some();
            index += 1;
            keep
        });
        self.dispatch.remap(|i| map.get(i).copied().flatten());
        self.after_edit();
        tracing::debug!(erased = len - kept, "list erase");
    }

    /// Grow or shrink to `count` items.
    pub fn resize(&mut self, count: usize) {
        self.reconcile_len();
        self.composer.resize(count);
        self.cells.resize_with(count, Cell::default);
        self.dispatch.remap(|i| (i < count).then_some(i));
        self.after_edit();
        tracing::debug!(count, "list resize");
    }

    /// Items changed in place: drop realized nodes and re-read sizes.
    pub fn update(&mut self) {
        self.reconcile_len();
        for cell in &mut self.cells {
            cell.node = None;
        }
        self.dispatch.reset();
        self.after_edit();
        tracing::debug!(len = self.cells.len(), "list update");
    }
}

impl<C: Composer> Reorder for DynamicList<C> {
    fn move_indices(&mut self, pos: usize, indices: &[usize]) -> Option<usize> {
        self.reconcile_len();
        let Some((order, start)) = move_plan(self.cells.len(), pos, indices) else {
            tracing::warn!(pos, ?indices, "list move matched nothing, ignored");
            return None;
        };
        self.composer.reorder(&order);
        let map = invert_order(&order);
        apply_order(&mut self.cells, &order);
        self.dispatch.remap(|i| map.get(i).copied().flatten());
        self.after_edit();
        tracing::debug!(pos, moved = indices.len(), start, "list move");
        Some(start)
    }
}

impl<C: Composer> Container for DynamicList<C> {
    #[inline]
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn child(&self, index: usize) -> Option<&dyn Node> {
        self.get(index)
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        self.get_mut(index)
    }

    fn bounds_of(&self, ctx: &Context, index: usize) -> Rect {
        let Some(cell) = self.cells.get(index) else {
            return Rect::ZERO;
        };
        let (origin, _) = ctx.bounds.span(self.axis);
        ctx.bounds.with_span(self.axis, origin + cell.pos, cell.size)
    }

    fn main_axis(&self) -> Axis {
        self.axis
    }

    fn candidates(&self, ctx: &Context, p: Point) -> Range<usize> {
        let (origin, _) = ctx.bounds.span(self.axis);
        let at = p.along(self.axis) - origin;
        let first = self.cells.partition_point(|c| c.end() <= at);
        let last = self.cells.partition_point(|c| c.pos <= at);
        first..last.max(first)
    }

    fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    fn dispatch_mut(&mut self) -> &mut Dispatch {
        &mut self.dispatch
    }
}

impl<C: Composer> Node for DynamicList<C> {
    fn limits(&self, ctx: &BasicContext) -> Limits {
        let main = if self.dirty || self.cells.len() != self.composer.len() {
            (0..self.composer.len()).map(|i| self.composer.main_axis_size(i, ctx).max(0.0)).sum()
        } else {
            self.extent()
        };
        let cross = self.composer.secondary_axis_limits(ctx);
        Limits::from_axes(self.axis, Extent::fixed(main), cross).normalized()
    }

    fn layout(&mut self, ctx: &Context) {
        self.sync(&ctx.basic());
        self.cross_size = Some(ctx.bounds.size().along(self.axis.cross()));
        self.generation += 1;
        let generation = self.generation;
        for i in 0..self.cells.len() {
            if !self.cells[i].is_realized() {
                continue;
            }
            let bounds = self.bounds_of(ctx, i);
            let cell = &mut self.cells[i];
            if let Some(node) = cell.node.as_mut() {
                node.layout(&ctx.child(bounds));
                cell.layout_generation = generation;
            }
        }
    }

    fn draw(&mut self, ctx: &Context, canvas: &mut dyn Canvas) {
        self.sync(&ctx.basic());
        let cross = ctx.bounds.size().along(self.axis.cross());
        if self.cross_size != Some(cross) {
            self.cross_size = Some(cross);
            self.generation += 1;
        }

        let range = match self.visible_span(ctx, canvas) {
            Some((start, end)) => self.visible_range(start, end),
            None => 0..0,
        };
        let generation = self.generation;
        for i in range.clone() {
            if self.cells[i].size <= 0.0 {
                continue;
            }
            let bounds = self.bounds_of(ctx, i);
            let cell = &mut self.cells[i];
            if cell.node.is_none() {
                cell.node = Some(self.composer.compose(i));
                cell.layout_generation = 0;
            }
            let Some(node) = cell.node.as_mut() else {
                continue;
            };
            let child = ctx.child(bounds);
            if cell.layout_generation != generation {
                node.layout(&child);
                cell.layout_generation = generation;
            }
            node.draw(&child, canvas);
        }

        if self.manage_cells {
            self.release_outside(&range);
        } else {
            self.window = range;
        }
    }

    fn hit_test(&self, ctx: &Context, p: Point, query: HitQuery) -> Option<&dyn Node> {
        dispatch::hit_test(self, ctx, p, query)
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        dispatch::click(self, ctx, btn)
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        dispatch::drag(self, ctx, btn);
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        dispatch::cursor(self, ctx, p, status)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        dispatch::key(self, ctx, k)
    }

    fn text(&mut self, ctx: &Context, info: &TextInfo) -> bool {
        dispatch::text(self, ctx, info)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        dispatch::scroll(self, ctx, dir, p)
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn wants_focus(&self) -> bool {
        dispatch::wants_focus(self)
    }

    fn begin_focus(&mut self, req: FocusRequest) -> bool {
        dispatch::begin_focus(self, req)
    }

    fn end_focus(&mut self) -> bool {
        dispatch::end_focus(self)
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        dispatch::track_drop(self, ctx, info, status);
    }

    fn accept_drop(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        dispatch::accept_drop(self, ctx, info)
    }
}

/// Vertical list: items top to bottom.
pub fn vlist<C: Composer>(composer: C) -> DynamicList<C> {
    DynamicList::new(Axis::Vertical, composer)
}

/// Horizontal list: items left to right.
pub fn hlist<C: Composer>(composer: C) -> DynamicList<C> {
    DynamicList::new(Axis::Horizontal, composer)
}

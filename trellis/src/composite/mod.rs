//! Composites: nodes owning an ordered sequence of children.
//!
//! # Architecture
//!
//! Every composite shares one dispatch core ([`dispatch`]) that routes input
//! to children by index: hit-testing, click tracking, hover sets, keyboard
//! focus and drop tracking. The core works against the [`Container`] trait, so
//! the vector-backed [`Composite`] and the virtualized list run the same code.
//!
//! Placement is separate. A [`Composite`] delegates limits and child bounds to
//! an [`Arrange`] implementation:
//!
//! - [`tile::Tile`]: children one after another, free space split by stretch
//! - [`grid::GridLayout`]: children on fractional coordinates, with spans
//! - [`layer::Layer`]: children stacked on top of each other
//!
//! Children are addressed purely by position. Structural edits shift indices,
//! so every edit remaps the dispatch state (focus, hover, tracking) through
//! an old-to-new index table.

pub mod dispatch;
pub mod grid;
pub mod layer;
pub mod tile;

use std::collections::BTreeSet;
use std::ops::Range;

use crate::canvas::Canvas;
use crate::context::{BasicContext, Context};
use crate::geometry::{Axis, Point, Rect};
use crate::input::{CursorTracking, DropInfo, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::limits::Limits;
use crate::node::{HitQuery, Node};

pub use grid::{Grid, GridLayout, hgrid, vgrid};
pub use layer::{Layer, layer};
pub use tile::{Tile, TileItem, allocate, htile, vtile};

/// Result of hit-testing a composite's children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub index: usize,
    pub bounds: Rect,
}

/// Indexed access to children plus the dispatch state routing input to them.
pub trait Container {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The child at `index`, or `None` if out of range or not realized.
    fn child(&self, index: usize) -> Option<&dyn Node>;

    fn child_mut(&mut self, index: usize) -> Option<&mut dyn Node>;

    /// Bounds of the child at `index` given the composite's own bounds.
    fn bounds_of(&self, ctx: &Context, index: usize) -> Rect;

    /// Whether hit-testing and Tab traversal run from the last child to the first.
    fn reverse_index(&self) -> bool {
        false
    }

    /// Axis along which children follow each other.
    fn main_axis(&self) -> Axis {
        Axis::Vertical
    }

    /// Indices worth hit-testing at `p`. Containers that can narrow the search
    /// (the virtualized list) override this.
    fn candidates(&self, _ctx: &Context, _p: Point) -> Range<usize> {
        0..self.len()
    }

    fn dispatch(&self) -> &Dispatch;

    fn dispatch_mut(&mut self) -> &mut Dispatch;
}

/// Pointer and focus state of one composite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    pub(crate) focus: Option<usize>,
    pub(crate) saved_focus: Option<usize>,
    pub(crate) click_tracking: Option<usize>,
    pub(crate) hover: BTreeSet<usize>,
    pub(crate) drop_tracking: Option<usize>,
}

impl Dispatch {
    #[inline]
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Focus saved by the last `end_focus`.
    #[inline]
    pub fn saved_focus(&self) -> Option<usize> {
        self.saved_focus
    }

    /// Child receiving drags and the release of the current press.
    #[inline]
    pub fn click_tracking(&self) -> Option<usize> {
        self.click_tracking
    }

    pub fn hover(&self) -> impl Iterator<Item = usize> + '_ {
        self.hover.iter().copied()
    }

    #[inline]
    pub fn drop_tracking(&self) -> Option<usize> {
        self.drop_tracking
    }

    /// Forget all tracking state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rewrite every stored index after a structural edit. Indices mapped to
    /// `None` belonged to removed children and are dropped.
    pub fn remap(&mut self, map: impl Fn(usize) -> Option<usize>) {
        self.focus = self.focus.and_then(&map);
        self.saved_focus = self.saved_focus.and_then(&map);
        self.click_tracking = self.click_tracking.and_then(&map);
        self.drop_tracking = self.drop_tracking.and_then(&map);
        self.hover = self.hover.iter().filter_map(|&i| map(i)).collect();
    }
}

/// Containers whose children can be reordered in place.
pub trait Reorder {
    /// Move the children at `indices` to insertion point `pos` (an index in the
    /// current order), keeping their relative order. Returns the new index of
    /// the first moved child, or `None` when nothing moved.
    fn move_indices(&mut self, pos: usize, indices: &[usize]) -> Option<usize>;
}

/// Placement strategy of a [`Composite`].
pub trait Arrange {
    fn limits(&self, ctx: &BasicContext, children: &[Box<dyn Node>]) -> Limits;

    /// Compute child placement for `ctx.bounds`. Called before children are
    /// laid out.
    fn arrange(&mut self, ctx: &Context, children: &[Box<dyn Node>]);

    fn bounds_of(&self, ctx: &Context, index: usize) -> Rect;

    fn reverse_index(&self) -> bool {
        false
    }

    fn axis(&self) -> Axis {
        Axis::Vertical
    }
}

// ============================================================================
// Index plans for structural edits
// ============================================================================

/// New order for moving `indices` to `pos`: `order[new] = old`, plus the new
/// index of the first moved item. Out-of-range and duplicate indices are
/// ignored.
pub fn move_plan(len: usize, pos: usize, indices: &[usize]) -> Option<(Vec<usize>, usize)> {
    let moved: BTreeSet<usize> = indices.iter().copied().filter(|&i| i < len).collect();
    if moved.is_empty() {
        return None;
    }
    let pos = pos.min(len);
    let rest: Vec<usize> = (0..len).filter(|i| !moved.contains(i)).collect();
    let at = pos - moved.range(..pos).count();
    let mut order = Vec::with_capacity(len);
    order.extend_from_slice(&rest[..at]);
    order.extend(moved.iter().copied());
    order.extend_from_slice(&rest[at..]);
    Some((order, at))
}

/// Old-to-new index table for an order produced by [`move_plan`].
pub fn invert_order(order: &[usize]) -> Vec<Option<usize>> {
    let mut map = vec![None; order.len()];
    for (new, &old) in order.iter().enumerate() {
        if let Some(slot) = map.get_mut(old) {
            *slot = Some(new);
        }
    }
    map
}

/// Rearrange `items` so that `items[new] = old_items[order[new]]`.
pub fn apply_order<T>(items: &mut Vec<T>, order: &[usize]) {
    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(order.iter().filter_map(|&old| slots.get_mut(old).and_then(Option::take)));
}

/// Old-to-new index table for erasing `indices` from `len` items.
pub fn erase_plan(len: usize, indices: &[usize]) -> Vec<Option<usize>> {
    let erased: BTreeSet<usize> = indices.iter().copied().filter(|&i| i < len).collect();
    let mut next = 0;
    (0..len)
        .map(|i| {
            if erased.contains(&i) {
                None
            } else {
                next += 1;
                Some(next - 1)
            }
        })
        .collect()
}

/// Index before which an item dropped at `p` lands: the number of children
/// whose midpoint along the main axis lies at or before `p`. Children must be
/// ordered along the axis.
pub fn insertion_index<C: Container + ?Sized>(c: &C, ctx: &Context, p: Point) -> usize {
    let axis = c.main_axis();
    let at = p.along(axis);
    let (mut lo, mut hi) = (0, c.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if c.bounds_of(ctx, mid).center().along(axis) <= at {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

// ============================================================================
// Vector-backed composite
// ============================================================================

/// A composite owning its children in a `Vec`, placed by `A`.
pub struct Composite<A> {
    children: Vec<Box<dyn Node>>,
    arrange: A,
    dispatch: Dispatch,
}

impl<A: Arrange> Composite<A> {
    pub fn new(arrange: A) -> Self {
        Self { children: Vec::new(), arrange, dispatch: Dispatch::default() }
    }

    pub fn with_children(arrange: A, children: Vec<Box<dyn Node>>) -> Self {
        Self { children, arrange, dispatch: Dispatch::default() }
    }

    pub fn push(&mut self, child: impl Node + 'static) {
        self.children.push(Box::new(child));
    }

    pub fn push_boxed(&mut self, child: Box<dyn Node>) {
        self.children.push(child);
    }

    /// Insert at `index` (clamped to the end).
    pub fn insert(&mut self, index: usize, child: Box<dyn Node>) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
        self.dispatch.remap(|i| Some(if i >= index { i + 1 } else { i }));
    }

    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Node>> {
        if index >= self.children.len() {
            tracing::warn!(index, len = self.children.len(), "remove out of range, ignored");
            return None;
        }
        let map = erase_plan(self.children.len(), &[index]);
        self.dispatch.remap(|i| map.get(i).copied().flatten());
        Some(self.children.remove(index))
    }

    pub fn clear(&mut self) {
        self.children.clear();
        self.dispatch.reset();
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&dyn Node> {
        Some(self.children.get(index)?.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        Some(self.children.get_mut(index)?.as_mut())
    }

    #[inline]
    pub fn arrangement(&self) -> &A {
        &self.arrange
    }

    #[inline]
    pub fn arrangement_mut(&mut self) -> &mut A {
        &mut self.arrange
    }

    #[inline]
    pub fn state(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Focus the child at `index` if it accepts focus.
    pub fn focus(&mut self, index: usize) -> bool {
        dispatch::focus(self, index)
    }
}

impl<A: Arrange> Reorder for Composite<A> {
    fn move_indices(&mut self, pos: usize, indices: &[usize]) -> Option<usize> {
        let (order, start) = move_plan(self.children.len(), pos, indices)?;
        let map = invert_order(&order);
        apply_order(&mut self.children, &order);
        self.dispatch.remap(|i| map.get(i).copied().flatten());
        tracing::debug!(pos, moved = indices.len(), start, "moved children");
        Some(start)
    }
}

impl<A: Arrange> Container for Composite<A> {
    #[inline]
    fn len(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&dyn Node> {
        self.get(index)
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        self.get_mut(index)
    }

    fn bounds_of(&self, ctx: &Context, index: usize) -> Rect {
        self.arrange.bounds_of(ctx, index)
    }

    fn reverse_index(&self) -> bool {
        self.arrange.reverse_index()
    }

    fn main_axis(&self) -> Axis {
        self.arrange.axis()
    }

    fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    fn dispatch_mut(&mut self) -> &mut Dispatch {
        &mut self.dispatch
    }
}

impl<A: Arrange> Node for Composite<A> {
    fn limits(&self, ctx: &BasicContext) -> Limits {
        self.arrange.limits(ctx, &self.children)
    }

    fn layout(&mut self, ctx: &Context) {
        self.arrange.arrange(ctx, &self.children);
        for i in 0..self.children.len() {
            let b = self.arrange.bounds_of(ctx, i);
            self.children[i].layout(&ctx.child(b));
        }
    }

    fn draw(&mut self, ctx: &Context, canvas: &mut dyn Canvas) {
        dispatch::draw(self, ctx, canvas);
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
        dispatch::wants_control(self)
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

    fn enable(&mut self, state: bool) {
        for child in &mut self.children {
            child.enable(state);
        }
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        dispatch::track_drop(self, ctx, info, status);
    }

    fn accept_drop(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        dispatch::accept_drop(self, ctx, info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_plan_preserves_relative_order() {
        // Move 1 and 3 before 0.
        let (order, start) = move_plan(5, 0, &[3, 1]).unwrap();
        assert_eq!(order, vec![1, 3, 0, 2, 4]);
        assert_eq!(start, 0);

        // Move 0 and 1 to the end.
        let (order, start) = move_plan(5, 5, &[0, 1]).unwrap();
        assert_eq!(order, vec![2, 3, 4, 0, 1]);
        assert_eq!(start, 3);

        // Insertion point inside the moved block.
        let (order, start) = move_plan(4, 2, &[1, 2]).unwrap();
        assert_eq!(order, vec![0, 1, 2, 3]);
        assert_eq!(start, 1);
    }

    #[test]
    fn test_move_plan_ignores_out_of_range() {
        assert!(move_plan(3, 0, &[7, 9]).is_none());
        let (order, _) = move_plan(3, 0, &[2, 2, 9]).unwrap();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_apply_and_invert_order() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        let order = vec![2, 0, 3, 1];
        apply_order(&mut v, &order);
        assert_eq!(v, vec!['c', 'a', 'd', 'b']);
        assert_eq!(invert_order(&order), vec![Some(1), Some(3), Some(0), Some(2)]);
    }

    #[test]
    fn test_erase_plan() {
        assert_eq!(erase_plan(5, &[1, 3, 8]), vec![Some(0), None, Some(1), None, Some(2)]);
    }

    #[test]
    fn test_dispatch_remap_drops_removed() {
        let mut d = Dispatch {
            focus: Some(1),
            saved_focus: Some(3),
            click_tracking: Some(2),
            hover: [1, 2].into_iter().collect(),
            drop_tracking: None,
        };
        let map = erase_plan(4, &[1]);
        d.remap(|i| map.get(i).copied().flatten());
        assert_eq!(d.focus(), None);
        assert_eq!(d.saved_focus(), Some(2));
        assert_eq!(d.click_tracking(), Some(1));
        assert_eq!(d.hover().collect::<Vec<_>>(), vec![1]);
    }
}

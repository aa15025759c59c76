//! Selection lists: click, modifier and keyboard selection over the
//! selectable children of a container.
//!
//! Selection state lives in the children themselves (see
//! [`Selectable`](crate::node::Selectable)); the list keeps only the anchor
//! and end of the last range. Children that do not expose the capability are
//! ignored.
//!
//! The list also installs a [`Mailbox`] around its children. A draggable child
//! that is released after a drag posts `Request::Move`, and the list moves
//! the whole selection to the insertion point under the pointer.

use crate::canvas::{Canvas, Color};
use crate::composite::{Container, Dispatch, Reorder, dispatch, insertion_index};
use crate::context::{BasicContext, Context, Mailbox, Request};
use crate::geometry::{Axis, Point, Rect};
use crate::input::{CursorTracking, DropInfo, FocusRequest, KeyInfo, Modifiers, MouseButton, NamedKey, TextInfo};
use crate::limits::{Limits, Stretch};
use crate::node::{self, AsNode, HitQuery, Node, Selectable};

type OnSelect = Box<dyn FnMut(Option<usize>, Option<usize>)>;

pub struct SelectionList<L> {
    inner: L,
    anchor: Option<usize>,
    end: Option<usize>,
    multi_select: bool,
    /// Plain press on a member of a multi-selection; collapses on release
    /// unless the selection was dragged.
    pending_collapse: Option<usize>,
    on_select: Option<OnSelect>,
    mailbox: Mailbox,
}

impl<L: Node + Container + Reorder> SelectionList<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            anchor: None,
            end: None,
            multi_select: true,
            pending_collapse: None,
            on_select: None,
            mailbox: Mailbox::new(),
        }
    }

    pub fn with_multi_select(mut self, enabled: bool) -> Self {
        self.multi_select = enabled;
        self
    }

    /// Called with the anchor and end after every selection change.
    pub fn on_select(mut self, f: impl FnMut(Option<usize>, Option<usize>) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    #[inline]
    pub fn inner(&self) -> &L {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut L {
        &mut self.inner
    }

    #[inline]
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    #[inline]
    pub fn end(&self) -> Option<usize> {
        self.end
    }

    #[inline]
    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    fn selectable(&self, index: usize) -> Option<&dyn Selectable> {
        self.inner.child(index)?.as_selectable()
    }

    fn set_selected(&mut self, index: usize, state: bool) {
        if let Some(s) = self.inner.child_mut(index).and_then(|n| n.as_selectable_mut()) {
            s.select(state);
        }
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selectable(index).is_some_and(|s| s.is_selected())
    }

    /// Indices of selected children, ascending.
    pub fn selection(&self) -> Vec<usize> {
        (0..self.inner.len()).filter(|&i| self.is_selected(i)).collect()
    }

    /// Replace the selection. Out-of-range and non-selectable indices are
    /// skipped.
    pub fn set_selection(&mut self, indices: &[usize]) {
        self.clear();
        let valid: Vec<usize> = indices.iter().copied().filter(|&i| self.selectable(i).is_some()).collect();
        for &i in &valid {
            self.set_selected(i, true);
        }
        if valid.len() < indices.len() {
            tracing::debug!(requested = indices.len(), selected = valid.len(), "skipped invalid selection indices");
        }
        self.anchor = valid.first().copied();
        self.end = valid.last().copied();
        self.notify();
    }

    pub fn select_all(&mut self) {
        let len = self.inner.len();
        for i in 0..len {
            self.set_selected(i, true);
        }
        if len > 0 {
            self.anchor = Some(0);
            self.end = Some(len - 1);
        }
        self.notify();
    }

    pub fn select_none(&mut self) {
        self.clear();
        self.anchor = None;
        self.end = None;
        self.notify();
    }

    fn clear(&mut self) {
        for i in 0..self.inner.len() {
            if self.is_selected(i) {
                self.set_selected(i, false);
            }
        }
    }

    fn select_only(&mut self, index: usize) {
        self.clear();
        self.set_selected(index, true);
        self.anchor = Some(index);
        self.end = Some(index);
    }

    /// Replace the last range with the closed interval from the anchor to
    /// `index`. Items selected outside the last range stay selected. A missing
    /// anchor counts as the first item.
    fn select_range(&mut self, index: usize) {
        let anchor = self.anchor.unwrap_or(0);
        if let Some(end) = self.end {
            for i in anchor.min(end)..=anchor.max(end) {
                if self.is_selected(i) {
                    self.set_selected(i, false);
                }
            }
        }
        for i in anchor.min(index)..=anchor.max(index) {
            self.set_selected(i, true);
        }
        self.anchor = Some(anchor);
        self.end = Some(index);
    }

    fn notify(&mut self) {
        let (anchor, end) = (self.anchor, self.end);
        if let Some(f) = self.on_select.as_mut() {
            f(anchor, end);
        }
    }

    /// Apply a press on child `index` with `mods`.
    fn press(&mut self, index: usize, mods: Modifiers) {
        if self.multi_select && mods.action() {
            let state = !self.is_selected(index);
            self.set_selected(index, state);
            self.anchor = Some(index);
            self.end = Some(index);
        } else if self.multi_select && mods.shift {
            self.select_range(index);
        } else if self.is_selected(index) && self.selection().len() > 1 {
            self.pending_collapse = Some(index);
            self.anchor = Some(index);
            self.end = Some(index);
        } else {
            self.select_only(index);
        }
        self.notify();
    }

    /// Move the keyboard end to `target`, extending from the anchor with
    /// Shift.
    fn navigate(&mut self, target: usize, shift: bool) {
        if shift && self.multi_select {
            if self.anchor.is_none() {
                self.anchor = self.end.or(Some(target));
            }
            self.select_range(target);
        } else {
            self.select_only(target);
        }
        self.notify();
    }

    fn handle_key(&mut self, k: &KeyInfo) -> bool {
        let len = self.inner.len();
        if len == 0 || !k.is_down() {
            return false;
        }
        if k.modifiers.action() && (k.key.is_char('a') || k.key.is_char('A')) {
            if self.multi_select {
                self.select_all();
                return true;
            }
            return false;
        }
        let target = match k.key.named() {
            Some(NamedKey::ArrowUp | NamedKey::ArrowLeft) => self.end.map_or(len - 1, |e| e.saturating_sub(1)),
            Some(NamedKey::ArrowDown | NamedKey::ArrowRight) => self.end.map_or(0, |e| (e + 1).min(len - 1)),
            Some(NamedKey::Home) => 0,
            Some(NamedKey::End) => len - 1,
            _ => return false,
        };
        self.navigate(target, k.modifiers.shift);
        true
    }

    /// Serve requests posted by children. Returns true when the selection moved.
    fn drain(&mut self, ctx: &Context) -> bool {
        let mut moved = false;
        for request in self.mailbox.take() {
            let Request::Move { at } = request;
            moved |= self.move_selection(ctx, at);
        }
        moved
    }

    fn move_selection(&mut self, ctx: &Context, at: Point) -> bool {
        let selection = self.selection();
        if selection.is_empty() {
            return false;
        }
        let pos = insertion_index(&self.inner, ctx, at);
        let Some(start) = self.inner.move_indices(pos, &selection) else {
            return false;
        };
        self.anchor = Some(start);
        self.end = Some(start + selection.len() - 1);
        self.pending_collapse = None;
        node::layout(&mut self.inner, ctx);
        self.notify();
        tracing::debug!(pos, start, count = selection.len(), "moved selection");
        true
    }
}

impl<L: Node + Container + Reorder> Container for SelectionList<L> {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn child(&self, index: usize) -> Option<&dyn Node> {
        self.inner.child(index)
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        self.inner.child_mut(index)
    }

    fn bounds_of(&self, ctx: &Context, index: usize) -> Rect {
        self.inner.bounds_of(ctx, index)
    }

    fn reverse_index(&self) -> bool {
        self.inner.reverse_index()
    }

    fn main_axis(&self) -> Axis {
        self.inner.main_axis()
    }

    fn candidates(&self, ctx: &Context, p: Point) -> std::ops::Range<usize> {
        self.inner.candidates(ctx, p)
    }

    fn dispatch(&self) -> &Dispatch {
        self.inner.dispatch()
    }

    fn dispatch_mut(&mut self) -> &mut Dispatch {
        self.inner.dispatch_mut()
    }
}

impl<L: Node + Container + Reorder> Reorder for SelectionList<L> {
    fn move_indices(&mut self, pos: usize, indices: &[usize]) -> Option<usize> {
        self.inner.move_indices(pos, indices)
    }
}

impl<L: Node + Container + Reorder> Node for SelectionList<L> {
    fn limits(&self, ctx: &BasicContext) -> Limits {
        self.inner.limits(ctx)
    }

    fn stretch(&self) -> Stretch {
        self.inner.stretch()
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
        let hit = if btn.down { dispatch::hit_element(&self.inner, ctx, btn.pos, false) } else { None };
        let selectable = hit.filter(|h| self.selectable(h.index).is_some());
        // Selected before the children see the press: draggables consume it.
        if let Some(h) = selectable {
            self.press(h.index, btn.modifiers);
        }

        let handled = {
            let inner_ctx = ctx.with_mailbox(&self.mailbox);
            self.inner.click(&inner_ctx, btn)
        };
        let moved = self.drain(ctx);

        if !btn.down {
            if let Some(index) = self.pending_collapse.take() {
                if !moved {
                    self.select_only(index);
                    self.notify();
                }
            }
        }
        handled || selectable.is_some()
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        {
            let inner_ctx = ctx.with_mailbox(&self.mailbox);
            self.inner.drag(&inner_ctx, btn);
        }
        self.drain(ctx);
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        self.inner.cursor(ctx, p, status)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        self.inner.key(ctx, k) || self.handle_key(k)
    }

    fn text(&mut self, ctx: &Context, info: &TextInfo) -> bool {
        self.inner.text(ctx, info)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        self.inner.scroll(ctx, dir, p)
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn wants_focus(&self) -> bool {
        true
    }

    fn begin_focus(&mut self, req: FocusRequest) -> bool {
        self.inner.begin_focus(req);
        true
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

// ============================================================================
// Selectable item
// ============================================================================

/// Wraps a node with selection state, painting a highlight behind it while
/// selected.
pub struct SelectItem<N> {
    subject: N,
    selected: bool,
}

impl<N: Node> SelectItem<N> {
    pub fn new(subject: N) -> Self {
        Self { subject, selected: false }
    }

    #[inline]
    pub fn subject(&self) -> &N {
        &self.subject
    }

    #[inline]
    pub fn subject_mut(&mut self) -> &mut N {
        &mut self.subject
    }
}

pub fn selectable<N: Node>(subject: N) -> SelectItem<N> {
    SelectItem::new(subject)
}

impl<N: Node> Selectable for SelectItem<N> {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn select(&mut self, state: bool) {
        self.selected = state;
    }
}

impl<N: Node> Node for SelectItem<N> {
    fn limits(&self, ctx: &BasicContext) -> Limits {
        self.subject.limits(ctx)
    }

    fn stretch(&self) -> Stretch {
        self.subject.stretch()
    }

    fn layout(&mut self, ctx: &Context) {
        self.subject.layout(ctx);
    }

    fn draw(&mut self, ctx: &Context, canvas: &mut dyn Canvas) {
        if self.selected {
            canvas.fill_rect(ctx.bounds, Color::SELECTION);
        }
        self.subject.draw(ctx, canvas);
    }

    fn hit_test(&self, ctx: &Context, p: Point, _query: HitQuery) -> Option<&dyn Node> {
        ctx.bounds.contains(p).then(|| self.as_node())
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        self.subject.click(ctx, btn);
        true
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        self.subject.drag(ctx, btn);
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        self.subject.cursor(ctx, p, status)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        self.subject.key(ctx, k)
    }

    fn wants_control(&self) -> bool {
        true
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

    fn as_selectable(&self) -> Option<&dyn Selectable> {
        Some(self)
    }

    fn as_selectable_mut(&mut self) -> Option<&mut dyn Selectable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::canvas::{DisplayList, LINE_HEIGHT};
    use crate::composite::{Composite, Tile, vtile};
    use crate::host::Host;
    use crate::node::{Label, NodeExt};

    const ROW: f32 = LINE_HEIGHT;

    fn items(n: usize) -> SelectionList<Composite<Tile>> {
        let children = (0..n).map(|i| selectable(Label::new(format!("{i}"))).boxed()).collect();
        SelectionList::new(vtile(children))
    }

    fn laid_out<'h>(host: &'h Host, list: &mut dyn Node, n: usize) -> Context<'h> {
        let ctx = Context::root(host, Rect::new(0.0, 0.0, 100.0, ROW * n as f32));
        list.layout(&ctx);
        ctx
    }

    fn row(i: usize) -> Point {
        Point::new(10.0, ROW * i as f32 + ROW / 2.0)
    }

    #[test]
    fn test_plain_action_and_shift_presses() {
        let host = Host::default();
        let mut list = items(6);
        let ctx = laid_out(&host, &mut list, 6);

        list.click(&ctx, MouseButton::press(row(1)));
        list.click(&ctx, MouseButton::release(row(1)));
        assert_eq!(list.selection(), vec![1]);

        list.click(&ctx, MouseButton::press(row(3)).with_modifiers(Modifiers::ACTION));
        list.click(&ctx, MouseButton::release(row(3)));
        assert_eq!(list.selection(), vec![1, 3]);

        list.click(&ctx, MouseButton::press(row(5)).with_modifiers(Modifiers::SHIFT));
        list.click(&ctx, MouseButton::release(row(5)));
        assert_eq!(list.selection(), vec![1, 3, 4, 5]);
        assert_eq!((list.anchor(), list.end()), (Some(3), Some(5)));

        list.click(&ctx, MouseButton::press(row(3)).with_modifiers(Modifiers::ACTION));
        assert_eq!(list.selection(), vec![1, 4, 5]);
    }

    #[test]
    fn test_shift_press_replaces_only_the_last_range() {
        let host = Host::default();
        let mut list = items(6);
        let ctx = laid_out(&host, &mut list, 6);

        list.click(&ctx, MouseButton::press(row(1)));
        list.click(&ctx, MouseButton::release(row(1)));
        list.click(&ctx, MouseButton::press(row(5)).with_modifiers(Modifiers::ACTION));
        list.click(&ctx, MouseButton::release(row(5)));
        list.click(&ctx, MouseButton::press(row(3)).with_modifiers(Modifiers::SHIFT));
        list.click(&ctx, MouseButton::release(row(3)));
        assert_eq!(list.selection(), vec![1, 3, 4, 5]);

        // Shrinking the range from the same anchor drops what it no longer covers.
        list.click(&ctx, MouseButton::press(row(4)).with_modifiers(Modifiers::SHIFT));
        list.click(&ctx, MouseButton::release(row(4)));
        assert_eq!(list.selection(), vec![1, 4, 5]);
        assert_eq!((list.anchor(), list.end()), (Some(5), Some(4)));
    }

    #[test]
    fn test_shift_press_without_anchor_starts_at_first() {
        let host = Host::default();
        let mut list = items(5);
        let ctx = laid_out(&host, &mut list, 5);

        list.click(&ctx, MouseButton::press(row(2)).with_modifiers(Modifiers::SHIFT));
        list.click(&ctx, MouseButton::release(row(2)));
        assert_eq!(list.selection(), vec![0, 1, 2]);
        assert_eq!((list.anchor(), list.end()), (Some(0), Some(2)));
    }

    #[test]
    fn test_item_hit_test_returns_item() {
        let host = Host::default();
        let item = selectable(Label::new("x"));
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 20.0, ROW));
        assert!(item.hit_test(&ctx, Point::new(5.0, 5.0), HitQuery::Control).is_some());
        assert!(item.hit_test(&ctx, Point::new(25.0, 5.0), HitQuery::Control).is_none());
    }

    #[test]
    fn test_plain_press_on_selection_collapses_on_release() {
        let host = Host::default();
        let mut list = items(4);
        let ctx = laid_out(&host, &mut list, 4);
        list.set_selection(&[0, 1, 2]);

        list.click(&ctx, MouseButton::press(row(1)));
        assert_eq!(list.selection(), vec![0, 1, 2]);
        list.click(&ctx, MouseButton::release(row(1)));
        assert_eq!(list.selection(), vec![1]);
    }

    #[test]
    fn test_single_select_ignores_modifiers() {
        let host = Host::default();
        let mut list = items(4).with_multi_select(false);
        let ctx = laid_out(&host, &mut list, 4);
        list.click(&ctx, MouseButton::press(row(0)));
        list.click(&ctx, MouseButton::press(row(2)).with_modifiers(Modifiers::SHIFT));
        assert_eq!(list.selection(), vec![2]);
        assert!(!list.key(&ctx, &KeyInfo::press_char('a').with_modifiers(Modifiers::ACTION)));
    }

    #[test]
    fn test_set_selection_skips_out_of_range() {
        let mut list = items(3);
        list.set_selection(&[2, 7, 0]);
        assert_eq!(list.selection(), vec![0, 2]);
        assert_eq!(list.anchor(), Some(2));
        list.select_all();
        assert_eq!(list.selection(), vec![0, 1, 2]);
        list.select_none();
        assert!(list.selection().is_empty());
    }

    #[test]
    fn test_keyboard_navigation() {
        let host = Host::default();
        let mut list = items(5);
        let ctx = laid_out(&host, &mut list, 5);

        assert!(list.key(&ctx, &KeyInfo::press(NamedKey::ArrowDown)));
        assert_eq!(list.selection(), vec![0]);
        list.key(&ctx, &KeyInfo::press(NamedKey::ArrowDown));
        list.key(&ctx, &KeyInfo::press(NamedKey::ArrowDown).with_modifiers(Modifiers::SHIFT));
        list.key(&ctx, &KeyInfo::press(NamedKey::ArrowDown).with_modifiers(Modifiers::SHIFT));
        assert_eq!(list.selection(), vec![1, 2, 3]);
        list.key(&ctx, &KeyInfo::press(NamedKey::Home).with_modifiers(Modifiers::SHIFT));
        assert_eq!(list.selection(), vec![0, 1]);
        list.key(&ctx, &KeyInfo::press(NamedKey::End));
        assert_eq!(list.selection(), vec![4]);
        list.key(&ctx, &KeyInfo::press(NamedKey::ArrowUp));
        assert_eq!(list.selection(), vec![3]);
        assert!(list.key(&ctx, &KeyInfo::press_char('a').with_modifiers(Modifiers::ACTION)));
        assert_eq!(list.selection().len(), 5);
        assert!(!list.key(&ctx, &KeyInfo::press(NamedKey::Escape)));
    }

    #[test]
    fn test_on_select_reports_anchor_and_end() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut list = items(3).on_select(move |a, e| sink.borrow_mut().push((a, e)));
        list.set_selection(&[1, 2]);
        list.select_none();
        assert_eq!(*seen.borrow(), vec![(Some(1), Some(2)), (None, None)]);
    }

    #[test]
    fn test_move_request_reorders_selection() {
        let host = Host::default();
        let mut list = items(5);
        let ctx = laid_out(&host, &mut list, 5);
        list.set_selection(&[0, 1]);

        let inner = ctx.with_mailbox(&list.mailbox);
        assert!(inner.post(Request::Move { at: row(3) + Point::new(0.0, 5.0) }));
        assert!(list.drain(&ctx));
        // Midpoints at 9, 27, 45, 63, 81: y = 68 lands before child 4.
        assert_eq!(list.selection(), vec![2, 3]);
        assert_eq!((list.anchor(), list.end()), (Some(2), Some(3)));
        let order: Vec<String> = (0..5)
            .map(|i| {
                let mut dl = DisplayList::new();
                let b = list.bounds_of(&ctx, i);
                if let Some(n) = list.child_mut(i) {
                    n.draw(&ctx.child(b), &mut dl);
                }
                dl.texts().concat()
            })
            .collect();
        assert_eq!(order, vec!["2", "3", "0", "1", "4"]);
    }

    #[test]
    fn test_insertion_index_uses_midpoints() {
        let host = Host::default();
        let mut list = items(3);
        let ctx = laid_out(&host, &mut list, 3);
        assert_eq!(insertion_index(&list, &ctx, Point::new(0.0, -5.0)), 0);
        assert_eq!(insertion_index(&list, &ctx, Point::new(0.0, 8.0)), 0);
        assert_eq!(insertion_index(&list, &ctx, Point::new(0.0, 11.0)), 1);
        assert_eq!(insertion_index(&list, &ctx, Point::new(0.0, 99.0)), 3);
    }
}

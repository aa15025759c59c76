//! Drag and drop: draggable list items and drop targets.
//!
//! # Architecture
//!
//! Internal drags (reordering items inside a [`SelectionList`]) never leave
//! the tree. A [`Draggable`] tracks its own press, shows the host's floating
//! proxy once the pointer travels past `drag_threshold` (or after the hold
//! delay), and on release posts [`Request::Move`] into the nearest mailbox.
//! The enclosing selection list serves the request after the click returns.
//!
//! External drags arrive through `track_drop`/`accept_drop` carrying a
//! [`Payload`]. [`DropBox`] accepts anywhere inside its bounds;
//! [`DropInserter`] computes the insertion index among its container's
//! children. Both ignore payloads that offer none of their mime types.
//!
//! [`SelectionList`]: crate::selection::SelectionList

use crate::canvas::{Canvas, Color};
use crate::composite::{Container, insertion_index};
use crate::context::{BasicContext, Context, Request};
use crate::geometry::{Axis, Point, Rect};
use crate::input::{CursorTracking, DropInfo, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::limits::{Limits, Stretch};
use crate::node::{AsNode, HitQuery, Node, Selectable};
use crate::payload::Payload;
use crate::task::Liveness;
use crate::tracker::Tracker;

const INDICATOR_WIDTH: f32 = 2.0;

// ============================================================================
// Draggable
// ============================================================================

/// A selectable item that can be dragged to a new position in its list.
pub struct Draggable<N> {
    subject: N,
    selected: bool,
    enabled: bool,
    tracker: Tracker,
    press: Option<MouseButton>,
    dragging: bool,
    /// Keeps the delayed proxy task alive while the press is held.
    hold: Option<Liveness>,
}

impl<N: Node> Draggable<N> {
    pub fn new(subject: N) -> Self {
        Self {
            subject,
            selected: false,
            enabled: true,
            tracker: Tracker::default(),
            press: None,
            dragging: false,
            hold: None,
        }
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
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn proxy_rect(ctx: &Context, pointer: Point, offset: Point) -> Rect {
        Rect::from_origin_size(pointer - offset, ctx.bounds.size())
    }

    /// Show the proxy after the hold delay unless the press ends first.
    fn schedule_proxy(&mut self, ctx: &Context, offset: Point) {
        let liveness = Liveness::new();
        let size = ctx.bounds.size();
        let delay = ctx.host.config().drag_image_delay();
        ctx.host.tasks().post_guarded(liveness.guard(), delay, move |host| {
            host.show_floating(Rect::from_origin_size(host.cursor_pos() - offset, size));
        });
        self.hold = Some(liveness);
    }

    fn release(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        self.hold = None;
        let press = self.press.take();
        if self.tracker.end().is_none() {
            return self.subject.click(ctx, btn);
        }
        ctx.host.hide_floating();

        if std::mem::take(&mut self.dragging) {
            tracing::debug!(x = btn.pos.x, y = btn.pos.y, "drag released");
            ctx.post(Request::Move { at: btn.pos });
            return true;
        }
        if let Some(press) = press {
            self.subject.click(ctx, press);
        }
        self.subject.click(ctx, btn);
        true
    }
}

pub fn draggable<N: Node>(subject: N) -> Draggable<N> {
    Draggable::new(subject)
}

impl<N: Node> Selectable for Draggable<N> {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn select(&mut self, state: bool) {
        self.selected = state;
    }
}

impl<N: Node> Node for Draggable<N> {
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
        if self.selected && self.enabled {
            canvas.fill_rect(ctx.bounds, Color::SELECTION);
        }
        self.subject.draw(ctx, canvas);
    }

    fn hit_test(&self, ctx: &Context, p: Point, _query: HitQuery) -> Option<&dyn Node> {
        (self.enabled && ctx.bounds.contains(p)).then(|| self.as_node())
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        if !self.enabled {
            return false;
        }
        if !btn.down {
            return self.release(ctx, btn);
        }
        let offset = self.tracker.begin(&btn, ctx.bounds.origin()).offset;
        self.press = Some(btn);
        self.dragging = false;
        self.schedule_proxy(ctx, offset);
        true
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        let Some(info) = self.tracker.update(&btn).copied() else {
            self.subject.drag(ctx, btn);
            return;
        };
        if !self.dragging && info.travel() > ctx.host.config().drag_threshold {
            self.dragging = true;
            self.hold = None;
            tracing::debug!(travel = info.travel(), "drag started");
        }
        // The hold delay may already have put the proxy up.
        if self.dragging || ctx.host.floating().is_some() {
            ctx.host.show_floating(Self::proxy_rect(ctx, info.current, info.offset));
        }
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        if !self.enabled {
            return false;
        }
        self.subject.cursor(ctx, p, status);
        ctx.bounds.contains(p)
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        self.subject.key(ctx, k)
    }

    fn text(&mut self, ctx: &Context, info: &TextInfo) -> bool {
        self.subject.text(ctx, info)
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

    fn enable(&mut self, state: bool) {
        self.enabled = state;
        self.subject.enable(state);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn as_selectable(&self) -> Option<&dyn Selectable> {
        Some(self)
    }

    fn as_selectable_mut(&mut self) -> Option<&mut dyn Selectable> {
        Some(self)
    }
}

// ============================================================================
// Drop targets
// ============================================================================

/// Mime-type filter and tracking flag shared by drop targets.
#[derive(Debug, Clone, Default)]
pub struct DropBase {
    mimes: Vec<String>,
    tracking: bool,
}

impl DropBase {
    pub fn new<I, S>(mimes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { mimes: mimes.into_iter().map(Into::into).collect(), tracking: false }
    }

    pub fn mime_types(&self) -> impl Iterator<Item = &str> {
        self.mimes.iter().map(String::as_str)
    }

    /// Whether `payload` offers any of the accepted mime types.
    pub fn accepts(&self, payload: &Payload) -> bool {
        payload.contains_any(self.mime_types())
    }

    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Update the tracking flag for a drag over the target, repainting when
    /// it flips. Payloads without an accepted mime type change nothing.
    pub fn track(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        if !self.accepts(&info.payload) {
            return;
        }
        let tracking = status != CursorTracking::Leaving;
        if tracking != self.tracking {
            self.tracking = tracking;
            ctx.refresh(0);
        }
    }

    /// End tracking, accepted or not.
    pub fn finish(&mut self, ctx: &Context) {
        if std::mem::take(&mut self.tracking) {
            ctx.refresh(0);
        }
    }
}

type OnDrop = Box<dyn FnMut(&Payload) -> bool>;
type OnInsert = Box<dyn FnMut(&Payload, usize) -> bool>;

/// Accepts drops anywhere inside the subject, outlining it while a matching
/// drag hovers.
pub struct DropBox<N> {
    subject: N,
    base: DropBase,
    on_drop: Option<OnDrop>,
}

impl<N: Node> DropBox<N> {
    pub fn new(base: DropBase, subject: N) -> Self {
        Self { subject, base, on_drop: None }
    }

    /// Called with the payload on drop. Returning false rejects it.
    pub fn on_drop(mut self, f: impl FnMut(&Payload) -> bool + 'static) -> Self {
        self.on_drop = Some(Box::new(f));
        self
    }

    #[inline]
    pub fn base(&self) -> &DropBase {
        &self.base
    }

    #[inline]
    pub fn subject(&self) -> &N {
        &self.subject
    }
}

pub fn drop_box<N: Node>(mimes: &[&str], subject: N) -> DropBox<N> {
    DropBox::new(DropBase::new(mimes.iter().copied()), subject)
}

impl<N: Node> Node for DropBox<N> {
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
        self.subject.draw(ctx, canvas);
        if self.base.is_tracking() {
            canvas.stroke_rect(ctx.bounds, Color::INDICATOR, INDICATOR_WIDTH);
        }
    }

    fn hit_test(&self, ctx: &Context, p: Point, query: HitQuery) -> Option<&dyn Node> {
        self.subject.hit_test(ctx, p, query)
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        self.subject.click(ctx, btn)
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

    fn enable(&mut self, state: bool) {
        self.subject.enable(state);
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        self.base.track(ctx, info, status);
    }

    fn accept_drop(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        self.base.finish(ctx);
        if !self.base.accepts(&info.payload) {
            return false;
        }
        let accepted = self.on_drop.as_mut().is_some_and(|f| f(&info.payload));
        tracing::debug!(accepted, "drop delivered to drop box");
        accepted
    }
}

/// Drop target over a container: a drop lands between two children, at the
/// insertion index nearest the pointer.
pub struct DropInserter<N> {
    subject: N,
    base: DropBase,
    insertion: Option<usize>,
    on_drop: Option<OnInsert>,
}

impl<N: Node + Container> DropInserter<N> {
    pub fn new(base: DropBase, subject: N) -> Self {
        Self { subject, base, insertion: None, on_drop: None }
    }

    /// Called with the payload and insertion index on drop. Returning false
    /// rejects it.
    pub fn on_drop(mut self, f: impl FnMut(&Payload, usize) -> bool + 'static) -> Self {
        self.on_drop = Some(Box::new(f));
        self
    }

    #[inline]
    pub fn base(&self) -> &DropBase {
        &self.base
    }

    #[inline]
    pub fn subject(&self) -> &N {
        &self.subject
    }

    #[inline]
    pub fn subject_mut(&mut self) -> &mut N {
        &mut self.subject
    }

    /// Insertion index under the last tracked position, while tracking.
    #[inline]
    pub fn insertion(&self) -> Option<usize> {
        self.insertion
    }

    /// Main-axis position of the boundary before child `index`.
    fn boundary(&self, ctx: &Context, index: usize) -> f32 {
        let axis = self.subject.main_axis();
        let len = self.subject.len();
        if index < len {
            self.subject.bounds_of(ctx, index).span(axis).0
        } else if len > 0 {
            self.subject.bounds_of(ctx, len - 1).span(axis).1
        } else {
            ctx.bounds.span(axis).0
        }
    }
}

pub fn drop_inserter<N: Node + Container>(mimes: &[&str], subject: N) -> DropInserter<N> {
    DropInserter::new(DropBase::new(mimes.iter().copied()), subject)
}

impl<N: Node + Container> Node for DropInserter<N> {
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
        self.subject.draw(ctx, canvas);
        let Some(index) = self.insertion.filter(|_| self.base.is_tracking()) else {
            return;
        };
        let at = self.boundary(ctx, index);
        let (from, to) = match self.subject.main_axis() {
            Axis::Vertical => (Point::new(ctx.bounds.x, at), Point::new(ctx.bounds.right(), at)),
            Axis::Horizontal => (Point::new(at, ctx.bounds.y), Point::new(at, ctx.bounds.bottom())),
        };
        canvas.line(from, to, Color::INDICATOR, INDICATOR_WIDTH);
    }

    fn hit_test(&self, ctx: &Context, p: Point, query: HitQuery) -> Option<&dyn Node> {
        self.subject.hit_test(ctx, p, query)
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        self.subject.click(ctx, btn)
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

    fn text(&mut self, ctx: &Context, info: &TextInfo) -> bool {
        self.subject.text(ctx, info)
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        self.subject.scroll(ctx, dir, p)
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

    fn enable(&mut self, state: bool) {
        self.subject.enable(state);
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        self.base.track(ctx, info, status);
        if !self.base.is_tracking() {
            self.insertion = None;
            return;
        }
        let index = insertion_index(&self.subject, ctx, info.pos);
        if self.insertion != Some(index) {
            self.insertion = Some(index);
            ctx.refresh(0);
        }
    }

    fn accept_drop(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        self.base.finish(ctx);
        self.insertion = None;
        if !self.base.accepts(&info.payload) {
            return false;
        }
        let index = insertion_index(&self.subject, ctx, info.pos);
        let accepted = self.on_drop.as_mut().is_some_and(|f| f(&info.payload, index));
        tracing::debug!(index, accepted, "drop delivered to inserter");
        accepted
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::canvas::{DisplayList, LINE_HEIGHT, Primitive};
    use crate::composite::vtile;
    use crate::context::Mailbox;
    use crate::host::Host;
    use crate::input::Modifiers;
    use crate::node::{Label, NodeExt};
    use crate::payload::MIME_TEXT;
    use crate::selection::SelectionList;

    const ROW: f32 = LINE_HEIGHT;

    #[derive(Default)]
    struct Clicks {
        log: Rc<RefCell<Vec<bool>>>,
    }

    impl Node for Clicks {
        fn click(&mut self, _ctx: &Context, btn: MouseButton) -> bool {
            self.log.borrow_mut().push(btn.down);
            true
        }
    }

    fn row(i: usize) -> Point {
        Point::new(10.0, ROW * i as f32 + ROW / 2.0)
    }

    fn text_payload() -> Payload {
        Payload::new().with_text(MIME_TEXT, "hello")
    }

    #[test]
    fn test_drag_past_threshold_posts_move() {
        let host = Host::default();
        let mailbox = Mailbox::new();
        let root = Context::root(&host, Rect::new(0.0, 0.0, 100.0, 100.0));
        let ctx = root.with_mailbox(&mailbox);
        let item = Rect::new(0.0, 20.0, 100.0, 20.0);
        let child = ctx.child(item);

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = draggable(Clicks { log: log.clone() });
        assert!(d.click(&child, MouseButton::press(Point::new(10.0, 25.0))));

        d.drag(&child, MouseButton::press(Point::new(11.0, 26.0)));
        assert!(!d.is_dragging());
        assert_eq!(host.floating(), None);

        d.drag(&child, MouseButton::press(Point::new(10.0, 60.0)));
        assert!(d.is_dragging());
        assert_eq!(host.floating(), Some(Rect::new(0.0, 55.0, 100.0, 20.0)));

        assert!(d.click(&child, MouseButton::release(Point::new(10.0, 60.0))));
        assert_eq!(host.floating(), None);
        assert_eq!(mailbox.take(), vec![Request::Move { at: Point::new(10.0, 60.0) }]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_release_without_drag_clicks_subject() {
        let host = Host::default();
        let mailbox = Mailbox::new();
        let root = Context::root(&host, Rect::new(0.0, 0.0, 100.0, 20.0));
        let ctx = root.with_mailbox(&mailbox);

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = draggable(Clicks { log: log.clone() });
        d.click(&ctx, MouseButton::press(Point::new(5.0, 5.0)));
        d.drag(&ctx, MouseButton::press(Point::new(6.0, 6.0)));
        d.click(&ctx, MouseButton::release(Point::new(6.0, 6.0)));

        assert_eq!(*log.borrow(), vec![true, false]);
        assert!(mailbox.is_empty());
    }

    #[test]
    fn test_hold_delay_shows_proxy() {
        let host = Host::default();
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 100.0, 20.0));
        let later = Instant::now() + host.config().drag_image_delay() + Duration::from_millis(50);

        let mut d = draggable(Label::new("x"));
        host.set_cursor_pos(Point::new(5.0, 5.0));
        d.click(&ctx, MouseButton::press(Point::new(5.0, 5.0)));
        assert_eq!(host.poll(Instant::now()), 0);
        assert_eq!(host.poll(later), 1);
        assert_eq!(host.floating(), Some(Rect::new(0.0, 0.0, 100.0, 20.0)));

        d.click(&ctx, MouseButton::release(Point::new(5.0, 5.0)));
        assert_eq!(host.floating(), None);
    }

    #[test]
    fn test_release_before_delay_cancels_proxy() {
        let host = Host::default();
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 100.0, 20.0));
        let later = Instant::now() + host.config().drag_image_delay() + Duration::from_millis(50);

        let mut d = draggable(Label::new("x"));
        d.click(&ctx, MouseButton::press(Point::new(5.0, 5.0)));
        d.click(&ctx, MouseButton::release(Point::new(5.0, 5.0)));
        host.poll(later);
        assert_eq!(host.floating(), None);
    }

    #[test]
    fn test_disabled_draggable_ignores_presses() {
        let host = Host::default();
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 100.0, 20.0));
        let mut d = draggable(Label::new("x"));
        d.enable(false);
        assert!(!d.click(&ctx, MouseButton::press(Point::new(5.0, 5.0))));
        assert!(d.hit_test(&ctx, Point::new(5.0, 5.0), HitQuery::Any).is_none());
        assert!(host.tasks().is_empty());

        d.enable(true);
        assert!(d.hit_test(&ctx, Point::new(5.0, 5.0), HitQuery::Any).is_some());
    }

    #[test]
    fn test_dragging_selection_reorders_list() {
        let host = Host::default();
        let children = (0..5).map(|i| draggable(Label::new(format!("{i}"))).boxed()).collect();
        let mut list = SelectionList::new(vtile(children));
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 100.0, ROW * 5.0));
        list.layout(&ctx);

        list.click(&ctx, MouseButton::press(row(0)));
        list.click(&ctx, MouseButton::release(row(0)));
        list.click(&ctx, MouseButton::press(row(1)).with_modifiers(Modifiers::SHIFT));
        list.click(&ctx, MouseButton::release(row(1)));
        assert_eq!(list.selection(), vec![0, 1]);

        let target = Point::new(10.0, 70.0);
        list.click(&ctx, MouseButton::press(row(0)));
        list.drag(&ctx, MouseButton::press(target));
        list.click(&ctx, MouseButton::release(target));

        let mut dl = DisplayList::new();
        list.draw(&ctx, &mut dl);
        assert_eq!(dl.texts(), vec!["2", "3", "0", "1", "4"]);
        assert_eq!(list.selection(), vec![2, 3]);
        assert_eq!(host.floating(), None);
    }

    #[test]
    fn test_drop_box_tracks_matching_payloads_only() {
        let host = Host::default();
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 50.0, 50.0));
        let dropped = Rc::new(Cell::new(0));
        let seen = dropped.clone();
        let mut target = drop_box(&[MIME_TEXT], Label::new("bin")).on_drop(move |p| {
            seen.set(seen.get() + 1);
            p.contains(MIME_TEXT)
        });

        let foreign = DropInfo::new(Payload::new().with_text("image/png", ""), Point::new(5.0, 5.0));
        target.track_drop(&ctx, &foreign, CursorTracking::Entering);
        assert!(!target.base().is_tracking());
        assert!(!target.accept_drop(&ctx, &foreign));

        let info = DropInfo::new(text_payload(), Point::new(5.0, 5.0));
        target.track_drop(&ctx, &info, CursorTracking::Entering);
        assert!(target.base().is_tracking());
        let mut dl = DisplayList::new();
        target.draw(&ctx, &mut dl);
        assert!(dl.primitives().iter().any(|p| matches!(p, Primitive::Stroke { .. })));

        target.track_drop(&ctx, &info, CursorTracking::Leaving);
        assert!(!target.base().is_tracking());

        target.track_drop(&ctx, &info, CursorTracking::Entering);
        assert!(target.accept_drop(&ctx, &info));
        assert!(!target.base().is_tracking());
        assert_eq!(dropped.get(), 1);
    }

    #[test]
    fn test_drop_inserter_indicator_and_index() {
        let host = Host::default();
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 100.0, ROW * 3.0));
        let got = Rc::new(Cell::new(None));
        let sink = got.clone();
        let children = (0..3).map(|i| Label::new(format!("{i}")).boxed()).collect();
        let mut target = drop_inserter(&[MIME_TEXT], vtile(children)).on_drop(move |_, index| {
            sink.set(Some(index));
            true
        });
        target.layout(&ctx);

        // Past the midpoint of row 1, so the drop lands before row 2.
        let info = DropInfo::new(text_payload(), Point::new(10.0, 30.0));
        target.track_drop(&ctx, &info, CursorTracking::Entering);
        assert_eq!(target.insertion(), Some(2));

        let mut dl = DisplayList::new();
        target.draw(&ctx, &mut dl);
        let line = dl.primitives().iter().find_map(|p| match p {
            Primitive::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        });
        assert_eq!(line, Some((Point::new(0.0, 2.0 * ROW), Point::new(100.0, 2.0 * ROW))));

        assert!(target.accept_drop(&ctx, &info));
        assert_eq!(got.get(), Some(2));
        assert_eq!(target.insertion(), None);
    }

    #[test]
    fn test_rejected_drop_clears_feedback() {
        let host = Host::default();
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 100.0, ROW * 2.0));
        let children = (0..2).map(|i| Label::new(format!("{i}")).boxed()).collect();
        let mut target = drop_inserter(&[MIME_TEXT], vtile(children)).on_drop(|_, _| false);
        target.layout(&ctx);

        let info = DropInfo::new(text_payload(), Point::new(10.0, 40.0));
        target.track_drop(&ctx, &info, CursorTracking::Entering);
        assert_eq!(target.insertion(), Some(2));
        assert!(!target.accept_drop(&ctx, &info));
        assert!(!target.base().is_tracking());

        let mut dl = DisplayList::new();
        target.draw(&ctx, &mut dl);
        assert!(!dl.primitives().iter().any(|p| matches!(p, Primitive::Line { .. })));
    }
}

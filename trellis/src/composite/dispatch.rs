//! Input routing shared by every [`Container`].
//!
//! # Rules
//!
//! - Presses go to the topmost child that wants control. The press switches
//!   focus when that child wants focus, and the child is remembered for drags
//!   and the release only when it handled the press.
//! - Hover keeps the set of children under the pointer. Every `Entering` sent
//!   to a child is eventually followed by exactly one `Leaving`.
//! - Keys go to the focused child first. An unhandled Tab press moves focus to
//!   the next child that wants it; at either end the key is reported as
//!   unhandled so an enclosing composite can continue the cycle.

use crate::canvas::Canvas;
use crate::context::Context;
use crate::geometry::Point;
use crate::input::{CursorTracking, DropInfo, FocusRequest, KeyAction, KeyInfo, MouseButton, NamedKey, TextInfo};
use crate::node::{HitQuery, Node};

use super::{Container, HitInfo};

/// Topmost child whose bounds contain `p`. With `control`, only children that
/// want control are considered.
pub fn hit_element<C: Container + ?Sized>(c: &C, ctx: &Context, p: Point, control: bool) -> Option<HitInfo> {
    let test = |index: usize| {
        let child = c.child(index)?;
        if control && !child.wants_control() {
            return None;
        }
        let bounds = c.bounds_of(ctx, index);
        if !bounds.contains(p) {
            return None;
        }
        child.hit_test(&ctx.child(bounds), p, HitQuery::Any)?;
        Some(HitInfo { index, bounds })
    };
    let range = c.candidates(ctx, p);
    if c.reverse_index() { range.rev().find_map(test) } else { range.into_iter().find_map(test) }
}

pub fn hit_test<'c, C: Container + Node>(c: &'c C, ctx: &Context, p: Point, query: HitQuery) -> Option<&'c dyn Node> {
    match query {
        HitQuery::Any => hit_element(c, ctx, p, false).map(|_| c.as_node()),
        HitQuery::Leaf | HitQuery::Control => {
            let info = hit_element(c, ctx, p, query == HitQuery::Control)?;
            c.child(info.index)?.hit_test(&ctx.child(info.bounds), p, query)
        }
    }
}

/// Draw children in index order, skipping those outside the canvas clip.
pub fn draw<C: Container + ?Sized>(c: &mut C, ctx: &Context, canvas: &mut dyn Canvas) {
    let clip = canvas.clip_bounds();
    for index in 0..c.len() {
        let bounds = c.bounds_of(ctx, index);
        if clip.is_some_and(|clip| !clip.intersects(&bounds)) {
            continue;
        }
        if let Some(child) = c.child_mut(index) {
            child.draw(&ctx.child(bounds), canvas);
        }
    }
}

// ============================================================================
// Pointer
// ============================================================================

pub fn click<C: Container + ?Sized>(c: &mut C, ctx: &Context, btn: MouseButton) -> bool {
    if !btn.down {
        let Some(index) = c.dispatch_mut().click_tracking.take() else {
            return false;
        };
        let bounds = c.bounds_of(ctx, index);
        return c.child_mut(index).is_some_and(|child| child.click(&ctx.child(bounds), btn));
    }

    let Some(info) = hit_element(c, ctx, btn.pos, true) else {
        c.dispatch_mut().click_tracking = None;
        return false;
    };
    let wants_focus = c.child(info.index).is_some_and(|child| child.wants_focus());
    if wants_focus && c.dispatch().focus != Some(info.index) {
        set_focus(c, info.index, FocusRequest::RestorePrevious);
    }
    let handled = c.child_mut(info.index).is_some_and(|child| child.click(&ctx.child(info.bounds), btn));
    c.dispatch_mut().click_tracking = handled.then_some(info.index);
    handled
}

pub fn drag<C: Container + ?Sized>(c: &mut C, ctx: &Context, btn: MouseButton) {
    let Some(index) = c.dispatch().click_tracking else {
        return;
    };
    let bounds = c.bounds_of(ctx, index);
    if let Some(child) = c.child_mut(index) {
        child.drag(&ctx.child(bounds), btn);
    }
}

pub fn cursor<C: Container + ?Sized>(c: &mut C, ctx: &Context, p: Point, status: CursorTracking) -> bool {
    let hit = if status == CursorTracking::Leaving { None } else { hit_element(c, ctx, p, false) };
    let previous = std::mem::take(&mut c.dispatch_mut().hover);

    let mut handled = false;
    for &index in previous.iter().filter(|&&i| hit.is_none_or(|h| h.index != i)) {
        let bounds = c.bounds_of(ctx, index);
        if let Some(child) = c.child_mut(index) {
            handled |= child.cursor(&ctx.child(bounds), p, CursorTracking::Leaving);
        }
    }

    let Some(info) = hit else {
        return handled;
    };
    let status = if previous.contains(&info.index) { CursorTracking::Hovering } else { CursorTracking::Entering };
    c.dispatch_mut().hover.insert(info.index);
    if let Some(child) = c.child_mut(info.index) {
        handled |= child.cursor(&ctx.child(info.bounds), p, status);
    }
    handled
}

pub fn scroll<C: Container + ?Sized>(c: &mut C, ctx: &Context, dir: Point, p: Point) -> bool {
    let Some(info) = hit_element(c, ctx, p, false) else {
        return false;
    };
    c.child_mut(info.index).is_some_and(|child| child.scroll(&ctx.child(info.bounds), dir, p))
}

// ============================================================================
// Keyboard and focus
// ============================================================================

pub fn key<C: Container + ?Sized>(c: &mut C, ctx: &Context, k: &KeyInfo) -> bool {
    if let Some(index) = c.dispatch().focus {
        let bounds = c.bounds_of(ctx, index);
        if c.child_mut(index).is_some_and(|child| child.key(&ctx.child(bounds), k)) {
            return true;
        }
    }
    if k.action == KeyAction::Press && k.key.named() == Some(NamedKey::Tab) {
        return tab(c, k.modifiers.shift);
    }
    false
}

pub fn text<C: Container + ?Sized>(c: &mut C, ctx: &Context, info: &TextInfo) -> bool {
    let Some(index) = c.dispatch().focus else {
        return false;
    };
    let bounds = c.bounds_of(ctx, index);
    c.child_mut(index).is_some_and(|child| child.text(&ctx.child(bounds), info))
}

fn wants_focus_at<C: Container + ?Sized>(c: &C, index: usize) -> bool {
    c.child(index).is_some_and(|child| child.wants_focus())
}

/// First focusable child in traversal order, or last with `from_end`.
fn first_focusable<C: Container + ?Sized>(c: &C, from_end: bool) -> Option<usize> {
    let descending = from_end != c.reverse_index();
    if descending {
        (0..c.len()).rev().find(|&i| wants_focus_at(c, i))
    } else {
        (0..c.len()).find(|&i| wants_focus_at(c, i))
    }
}

fn tab<C: Container + ?Sized>(c: &mut C, shift: bool) -> bool {
    let descending = shift != c.reverse_index();
    let focus = c.dispatch().focus;
    let next = if descending {
        let end = focus.unwrap_or(c.len());
        (0..end).rev().find(|&i| wants_focus_at(c, i))
    } else {
        let start = focus.map_or(0, |f| f + 1);
        (start..c.len()).find(|&i| wants_focus_at(c, i))
    };
    match next {
        Some(index) => {
            let req = if shift { FocusRequest::FromBottom } else { FocusRequest::FromTop };
            set_focus(c, index, req);
            true
        }
        None => false,
    }
}

/// Move focus to `index`, ending focus on the previous child.
fn set_focus<C: Container + ?Sized>(c: &mut C, index: usize, req: FocusRequest) {
    if let Some(old) = c.dispatch().focus.filter(|&old| old != index) {
        if let Some(child) = c.child_mut(old) {
            child.end_focus();
        }
    }
    c.dispatch_mut().focus = Some(index);
    if let Some(child) = c.child_mut(index) {
        child.begin_focus(req);
    }
    tracing::trace!(index, ?req, "focus moved");
}

/// Focus the child at `index` if it accepts focus.
pub fn focus<C: Container + ?Sized>(c: &mut C, index: usize) -> bool {
    if !wants_focus_at(c, index) {
        return false;
    }
    if c.dispatch().focus != Some(index) {
        set_focus(c, index, FocusRequest::RestorePrevious);
    }
    true
}

pub fn begin_focus<C: Container + ?Sized>(c: &mut C, req: FocusRequest) -> bool {
    let pick = match req {
        FocusRequest::FromTop => first_focusable(c, false),
        FocusRequest::FromBottom => first_focusable(c, true),
        FocusRequest::RestorePrevious => {
            let d = c.dispatch();
            d.focus
                .or(d.saved_focus)
                .filter(|&i| wants_focus_at(c, i))
                .or_else(|| first_focusable(c, false))
        }
    };
    let Some(index) = pick else {
        return false;
    };
    c.dispatch_mut().focus = Some(index);
    if let Some(child) = c.child_mut(index) {
        child.begin_focus(req);
    }
    true
}

pub fn end_focus<C: Container + ?Sized>(c: &mut C) -> bool {
    if let Some(index) = c.dispatch_mut().focus.take() {
        if let Some(child) = c.child_mut(index) {
            child.end_focus();
        }
        c.dispatch_mut().saved_focus = Some(index);
    }
    true
}

pub fn wants_focus<C: Container + ?Sized>(c: &C) -> bool {
    (0..c.len()).any(|i| wants_focus_at(c, i))
}

pub fn wants_control<C: Container + ?Sized>(c: &C) -> bool {
    (0..c.len()).any(|i| c.child(i).is_some_and(|child| child.wants_control()))
}

// ============================================================================
// External drops
// ============================================================================

pub fn track_drop<C: Container + ?Sized>(c: &mut C, ctx: &Context, info: &DropInfo, status: CursorTracking) {
    let hit = if status == CursorTracking::Leaving { None } else { hit_element(c, ctx, info.pos, false) };
    let previous = c.dispatch_mut().drop_tracking.take();

    if let Some(old) = previous.filter(|&old| hit.is_none_or(|h| h.index != old)) {
        let bounds = c.bounds_of(ctx, old);
        if let Some(child) = c.child_mut(old) {
            child.track_drop(&ctx.child(bounds), info, CursorTracking::Leaving);
        }
    }

    let Some(h) = hit else {
        return;
    };
    let status = if previous == Some(h.index) { CursorTracking::Hovering } else { CursorTracking::Entering };
    c.dispatch_mut().drop_tracking = Some(h.index);
    if let Some(child) = c.child_mut(h.index) {
        child.track_drop(&ctx.child(h.bounds), info, status);
    }
}

pub fn accept_drop<C: Container + ?Sized>(c: &mut C, ctx: &Context, info: &DropInfo) -> bool {
    c.dispatch_mut().drop_tracking = None;
    let Some(h) = hit_element(c, ctx, info.pos, false) else {
        return false;
    };
    c.child_mut(h.index).is_some_and(|child| child.accept_drop(&ctx.child(h.bounds), info))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::composite::{Composite, htile};
    use crate::geometry::Rect;
    use crate::host::Host;
    use crate::input::Modifiers;
    use crate::node::NodeExt;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: Log,
        control: bool,
        focus: bool,
    }

    impl Probe {
        fn new(name: &'static str, log: &Log) -> Self {
            Self { name, log: log.clone(), control: true, focus: true }
        }

        fn passive(mut self) -> Self {
            self.control = false;
            self.focus = false;
            self
        }

        fn record(&self, event: impl std::fmt::Display) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, event));
        }
    }

    impl Node for Probe {
        fn click(&mut self, _ctx: &Context, btn: MouseButton) -> bool {
            self.record(if btn.down { "press" } else { "release" });
            true
        }

        fn drag(&mut self, _ctx: &Context, _btn: MouseButton) {
            self.record("drag");
        }

        fn cursor(&mut self, _ctx: &Context, _p: Point, status: CursorTracking) -> bool {
            self.record(format!("{status:?}"));
            true
        }

        fn wants_control(&self) -> bool {
            self.control
        }

        fn wants_focus(&self) -> bool {
            self.focus
        }

        fn begin_focus(&mut self, _req: FocusRequest) -> bool {
            self.record("focus");
            true
        }

        fn end_focus(&mut self) -> bool {
            self.record("blur");
            true
        }
    }

    fn row(log: &Log) -> Composite<crate::composite::Tile> {
        htile(vec![
            Probe::new("a", log).boxed(),
            Probe::new("b", log).passive().boxed(),
            Probe::new("c", log).boxed(),
        ])
    }

    fn laid_out<'h>(host: &'h Host, node: &mut dyn Node) -> Context<'h> {
        let ctx = Context::root(host, Rect::new(0.0, 0.0, 300.0, 10.0));
        node.layout(&ctx);
        ctx
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    #[test]
    fn test_press_focuses_and_tracks() {
        let host = Host::default();
        let log = Log::default();
        let mut c = row(&log);
        let ctx = laid_out(&host, &mut c);

        assert!(c.click(&ctx, MouseButton::press(Point::new(250.0, 5.0))));
        assert_eq!(c.state().focus(), Some(2));
        assert_eq!(c.state().click_tracking(), Some(2));
        c.drag(&ctx, MouseButton::press(Point::new(10.0, 5.0)));
        assert!(c.click(&ctx, MouseButton::release(Point::new(10.0, 5.0))));
        assert_eq!(take(&log), vec!["c:focus", "c:press", "c:drag", "c:release"]);
        assert_eq!(c.state().click_tracking(), None);
    }

    #[test]
    fn test_press_skips_children_not_wanting_control() {
        let host = Host::default();
        let log = Log::default();
        let mut c = row(&log);
        let ctx = laid_out(&host, &mut c);
        assert!(!c.click(&ctx, MouseButton::press(Point::new(150.0, 5.0))));
        assert!(take(&log).is_empty());
    }

    #[test]
    fn test_hover_enter_and_leave_pair() {
        let host = Host::default();
        let log = Log::default();
        let mut c = row(&log);
        let ctx = laid_out(&host, &mut c);

        c.cursor(&ctx, Point::new(10.0, 5.0), CursorTracking::Entering);
        c.cursor(&ctx, Point::new(20.0, 5.0), CursorTracking::Hovering);
        c.cursor(&ctx, Point::new(150.0, 5.0), CursorTracking::Hovering);
        c.cursor(&ctx, Point::new(150.0, 5.0), CursorTracking::Leaving);
        assert_eq!(
            take(&log),
            vec!["a:Entering", "a:Hovering", "a:Leaving", "b:Entering", "b:Leaving"]
        );
        assert_eq!(c.state().hover().count(), 0);
    }

    #[test]
    fn test_tab_cycles_without_wraparound() {
        let host = Host::default();
        let log = Log::default();
        let mut c = row(&log);
        let ctx = laid_out(&host, &mut c);
        let tab = KeyInfo::press(NamedKey::Tab);

        assert!(c.key(&ctx, &tab));
        assert_eq!(c.state().focus(), Some(0));
        assert!(c.key(&ctx, &tab));
        assert_eq!(c.state().focus(), Some(2));
        assert!(!c.key(&ctx, &tab));
        assert_eq!(c.state().focus(), Some(2));

        let back = tab.clone().with_modifiers(Modifiers::SHIFT);
        assert!(c.key(&ctx, &back));
        assert_eq!(c.state().focus(), Some(0));
        assert!(!c.key(&ctx, &back));
        assert_eq!(take(&log), vec!["a:focus", "a:blur", "c:focus", "c:blur", "a:focus"]);
    }

    #[test]
    fn test_shift_tab_without_focus_starts_at_last() {
        let host = Host::default();
        let log = Log::default();
        let mut c = row(&log);
        let ctx = laid_out(&host, &mut c);
        let back = KeyInfo::press(NamedKey::Tab).with_modifiers(Modifiers::SHIFT);
        assert!(c.key(&ctx, &back));
        assert_eq!(c.state().focus(), Some(2));
    }

    #[test]
    fn test_end_focus_then_restore() {
        let log = Log::default();
        let mut c = row(&log);
        assert!(c.focus(2));
        assert!(!c.focus(1));
        assert!(c.end_focus());
        assert_eq!(c.state().focus(), None);
        assert!(c.begin_focus(FocusRequest::RestorePrevious));
        assert_eq!(c.state().focus(), Some(2));

        c.end_focus();
        assert!(c.begin_focus(FocusRequest::FromTop));
        assert_eq!(c.state().focus(), Some(0));
        c.end_focus();
        assert!(c.begin_focus(FocusRequest::FromBottom));
        assert_eq!(c.state().focus(), Some(2));
    }

    #[test]
    fn test_hit_test_queries() {
        let host = Host::default();
        let log = Log::default();
        let mut c = row(&log);
        let ctx = laid_out(&host, &mut c);
        let p = Point::new(150.0, 5.0);
        assert!(c.hit_test(&ctx, p, HitQuery::Any).is_some());
        assert!(c.hit_test(&ctx, p, HitQuery::Leaf).is_some());
        assert!(c.hit_test(&ctx, p, HitQuery::Control).is_none());
        assert!(c.hit_test(&ctx, Point::new(400.0, 5.0), HitQuery::Any).is_none());
    }
}

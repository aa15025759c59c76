//! The node contract every tree element implements.
//!
//! # Architecture
//!
//! Layout is a two-pass negotiation:
//! 1. `limits` flows bottom-up. It is a pure query: calling it twice with the
//!    same context gives the same answer and changes nothing.
//! 2. `layout` flows top-down. The parent picks bounds inside the child's
//!    limits and hands them over in `ctx.bounds`.
//!
//! `draw` and all input calls come after a layout pass and receive the same
//! bounds the node was laid out with. Every method has a passive default, so a
//! leaf implements only the capabilities it has.
//!
//! Nodes own their children outright (`Box<dyn Node>`). Application code that
//! needs to keep a handle to a node after inserting it uses [`Shared`].

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::canvas::{Canvas, Color};
use crate::context::{BasicContext, Context};
use crate::geometry::{Point, Size};
use crate::input::{CursorTracking, DropInfo, FocusRequest, KeyInfo, MouseButton, TextInfo};
use crate::limits::{FULL_EXTENT, Limits, Stretch};

/// What a hit test is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitQuery {
    /// Is this node under the point? Answered with the node itself.
    Any,
    /// The deepest node under the point.
    Leaf,
    /// The deepest node under the point, descending only through children
    /// that want control.
    Control,
}

/// Upcast helper so default methods can hand out `&dyn Node` for `self`.
pub trait AsNode {
    fn as_node(&self) -> &dyn Node;
}

impl<T: Node> AsNode for T {
    #[inline]
    fn as_node(&self) -> &dyn Node {
        self
    }
}

pub trait Node: AsNode {
    /// Minimum and maximum size. Must not have side effects.
    fn limits(&self, _ctx: &BasicContext) -> Limits {
        Limits::FULL
    }

    fn stretch(&self) -> Stretch {
        Stretch::DEFAULT
    }

    /// Accept final bounds (`ctx.bounds`) and place descendants.
    fn layout(&mut self, _ctx: &Context) {}

    fn draw(&mut self, _ctx: &Context, _canvas: &mut dyn Canvas) {}

    fn hit_test(&self, ctx: &Context, p: Point, _query: HitQuery) -> Option<&dyn Node> {
        ctx.bounds.contains(p).then(|| self.as_node())
    }

    /// Button press or release. Returns true when handled.
    fn click(&mut self, _ctx: &Context, _btn: MouseButton) -> bool {
        false
    }

    /// Pointer motion while a button is held after a handled press.
    fn drag(&mut self, _ctx: &Context, _btn: MouseButton) {}

    fn cursor(&mut self, _ctx: &Context, _p: Point, _status: CursorTracking) -> bool {
        false
    }

    fn key(&mut self, _ctx: &Context, _k: &KeyInfo) -> bool {
        false
    }

    fn text(&mut self, _ctx: &Context, _info: &TextInfo) -> bool {
        false
    }

    fn scroll(&mut self, _ctx: &Context, _dir: Point, _p: Point) -> bool {
        false
    }

    /// Whether presses should be routed to this node.
    fn wants_control(&self) -> bool {
        false
    }

    fn wants_focus(&self) -> bool {
        false
    }

    /// Gain keyboard focus. Returns true when the node (or a descendant) took it.
    fn begin_focus(&mut self, _req: FocusRequest) -> bool {
        self.wants_focus()
    }

    fn end_focus(&mut self) -> bool {
        true
    }

    fn enable(&mut self, _state: bool) {}

    fn is_enabled(&self) -> bool {
        true
    }

    /// An external drag is moving over this node.
    fn track_drop(&mut self, _ctx: &Context, _info: &DropInfo, _status: CursorTracking) {}

    /// An external drag was released over this node. Returns true if accepted.
    fn accept_drop(&mut self, _ctx: &Context, _info: &DropInfo) -> bool {
        false
    }

    fn as_selectable(&self) -> Option<&dyn Selectable> {
        None
    }

    fn as_selectable_mut(&mut self) -> Option<&mut dyn Selectable> {
        None
    }
}

/// Capability of children that take part in a selection.
pub trait Selectable {
    fn is_selected(&self) -> bool;
    fn select(&mut self, state: bool);
}

/// Re-layout `node` in place with the bounds in `ctx`, then repaint it.
pub fn layout(node: &mut dyn Node, ctx: &Context) {
    node.layout(ctx);
    ctx.refresh(0);
}

// ============================================================================
// Shared handles
// ============================================================================

/// A node that application code keeps a handle to after handing it to a
/// composite.
///
/// While the tree is dispatching into the node it is mutably borrowed; a call
/// that arrives through a second path during that time is skipped and logged
/// rather than panicking. Mutate shared nodes from deferred tasks.
pub struct Shared<N>(Rc<RefCell<N>>);

/// Non-owning handle, for deferred tasks that must not keep a node alive.
pub struct WeakShared<N>(Weak<RefCell<N>>);

pub fn share<N: Node>(node: N) -> Shared<N> {
    Shared(Rc::new(RefCell::new(node)))
}

impl<N> Shared<N> {
    pub fn borrow(&self) -> Ref<'_, N> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, N> {
        self.0.borrow_mut()
    }

    pub fn downgrade(&self) -> WeakShared<N> {
        WeakShared(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn with<R>(&self, default: R, f: impl FnOnce(&N) -> R) -> R {
        match self.0.try_borrow() {
            Ok(n) => f(&n),
            Err(_) => {
                tracing::warn!("shared node is busy, skipping call");
                default
            }
        }
    }

    fn with_mut<R>(&self, default: R, f: impl FnOnce(&mut N) -> R) -> R {
        match self.0.try_borrow_mut() {
            Ok(mut n) => f(&mut n),
            Err(_) => {
                tracing::warn!("shared node is busy, skipping call");
                default
            }
        }
    }
}

impl<N> Clone for Shared<N> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<N> WeakShared<N> {
    pub fn upgrade(&self) -> Option<Shared<N>> {
        self.0.upgrade().map(Shared)
    }
}

impl<N> Clone for WeakShared<N> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<N: Node + 'static> Node for Shared<N> {
    fn limits(&self, ctx: &BasicContext) -> Limits {
        self.with(Limits::FULL, |n| n.limits(ctx))
    }

    fn stretch(&self) -> Stretch {
        self.with(Stretch::DEFAULT, |n| n.stretch())
    }

    fn layout(&mut self, ctx: &Context) {
        self.with_mut((), |n| n.layout(ctx))
    }

    fn draw(&mut self, ctx: &Context, canvas: &mut dyn Canvas) {
        self.with_mut((), |n| n.draw(ctx, canvas))
    }

    // The handle stands in for whatever was hit inside; the inner borrow
    // cannot outlive this call.
    fn hit_test(&self, ctx: &Context, p: Point, query: HitQuery) -> Option<&dyn Node> {
        let hit = self.with(false, |n| n.hit_test(ctx, p, query).is_some());
        hit.then(|| self.as_node())
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        self.with_mut(false, |n| n.click(ctx, btn))
    }

    fn drag(&mut self, ctx: &Context, btn: MouseButton) {
        self.with_mut((), |n| n.drag(ctx, btn))
    }

    fn cursor(&mut self, ctx: &Context, p: Point, status: CursorTracking) -> bool {
        self.with_mut(false, |n| n.cursor(ctx, p, status))
    }

    fn key(&mut self, ctx: &Context, k: &KeyInfo) -> bool {
        self.with_mut(false, |n| n.key(ctx, k))
    }

    fn text(&mut self, ctx: &Context, info: &TextInfo) -> bool {
        self.with_mut(false, |n| n.text(ctx, info))
    }

    fn scroll(&mut self, ctx: &Context, dir: Point, p: Point) -> bool {
        self.with_mut(false, |n| n.scroll(ctx, dir, p))
    }

    fn wants_control(&self) -> bool {
        self.with(false, |n| n.wants_control())
    }

    fn wants_focus(&self) -> bool {
        self.with(false, |n| n.wants_focus())
    }

    fn begin_focus(&mut self, req: FocusRequest) -> bool {
        self.with_mut(false, |n| n.begin_focus(req))
    }

    fn end_focus(&mut self) -> bool {
        self.with_mut(false, |n| n.end_focus())
    }

    fn enable(&mut self, state: bool) {
        self.with_mut((), |n| n.enable(state))
    }

    fn is_enabled(&self) -> bool {
        self.with(false, |n| n.is_enabled())
    }

    fn track_drop(&mut self, ctx: &Context, info: &DropInfo, status: CursorTracking) {
        self.with_mut((), |n| n.track_drop(ctx, info, status))
    }

    fn accept_drop(&mut self, ctx: &Context, info: &DropInfo) -> bool {
        self.with_mut(false, |n| n.accept_drop(ctx, info))
    }

    fn as_selectable(&self) -> Option<&dyn Selectable> {
        let selectable = self.with(false, |n| n.as_selectable().is_some());
        selectable.then_some(self as &dyn Selectable)
    }

    fn as_selectable_mut(&mut self) -> Option<&mut dyn Selectable> {
        let selectable = self.with(false, |n| n.as_selectable().is_some());
        if selectable { Some(self) } else { None }
    }
}

impl<N: Node> Selectable for Shared<N> {
    fn is_selected(&self) -> bool {
        self.with(false, |n| n.as_selectable().is_some_and(|s| s.is_selected()))
    }

    fn select(&mut self, state: bool) {
        self.with_mut((), |n| {
            if let Some(s) = n.as_selectable_mut() {
                s.select(state);
            }
        })
    }
}

// ============================================================================
// Leaves
// ============================================================================

/// Empty space. Fixed by default; `flexible` lets it grow.
#[derive(Debug, Clone, Copy)]
pub struct Spacer {
    limits: Limits,
    stretch: Stretch,
}

impl Spacer {
    pub fn fixed(size: Size) -> Self {
        Self { limits: Limits::fixed(size), stretch: Stretch::NONE }
    }

    /// At least `min`, growing with stretch 1.
    pub fn flexible(min: Size) -> Self {
        Self { limits: Limits::at_least(min), stretch: Stretch::DEFAULT }
    }

    pub fn with_stretch(mut self, stretch: Stretch) -> Self {
        self.stretch = stretch;
        self
    }
}

/// Horizontal gap of `width`, any height.
pub fn hspacer(width: f32) -> Spacer {
    Spacer {
        limits: Limits::new(Size::new(width, 0.0), Size::new(width, FULL_EXTENT)),
        stretch: Stretch::new(0.0, 1.0),
    }
}

/// Vertical gap of `height`, any width.
pub fn vspacer(height: f32) -> Spacer {
    Spacer {
        limits: Limits::new(Size::new(0.0, height), Size::new(FULL_EXTENT, height)),
        stretch: Stretch::new(1.0, 0.0),
    }
}

impl Node for Spacer {
    fn limits(&self, _ctx: &BasicContext) -> Limits {
        self.limits
    }

    fn stretch(&self) -> Stretch {
        self.stretch
    }
}

/// A solid rectangle filling its bounds.
#[derive(Debug, Clone, Copy)]
pub struct Swatch {
    pub color: Color,
    limits: Limits,
}

impl Swatch {
    pub fn new(color: Color) -> Self {
        Self { color, limits: Limits::FULL }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl Node for Swatch {
    fn limits(&self, _ctx: &BasicContext) -> Limits {
        self.limits
    }

    fn draw(&mut self, ctx: &Context, canvas: &mut dyn Canvas) {
        canvas.fill_rect(ctx.bounds, self.color);
    }
}

/// A run of text sized by the host's text metrics.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    color: Color,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), color: Color::BLACK }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Node for Label {
    fn limits(&self, ctx: &BasicContext) -> Limits {
        let size = ctx.host.measure().measure(&self.text);
        Limits::new(size, Size::new(FULL_EXTENT, size.height))
    }

    fn stretch(&self) -> Stretch {
        Stretch::new(1.0, 0.0)
    }

    fn draw(&mut self, ctx: &Context, canvas: &mut dyn Canvas) {
        canvas.text(ctx.bounds.origin(), &self.text, self.color);
    }
}

/// Shorthand for boxing a node into a child slot.
pub trait NodeExt: Node + Sized + 'static {
    fn boxed(self) -> Box<dyn Node> {
        Box::new(self)
    }
}

impl<T: Node + Sized + 'static> NodeExt for T {}

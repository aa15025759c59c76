//! The root of a node tree and the single entry point for a platform shell.
//!
//! A shell converts its native events into the normalized input types and
//! feeds them here, calls [`View::draw`] when [`View::take_dirty`] reports
//! work, and calls [`View::poll`] from its event loop (at the latest by
//! [`View::next_due`]) so deferred tasks, cross-thread requests and scheduled
//! layout passes get applied.

use std::time::Instant;

use crate::canvas::{Canvas, Color};
use crate::context::{BasicContext, Context};
use crate::geometry::{Point, Rect, Size};
use crate::host::{Dirty, Host};
use crate::input::{CursorTracking, DropInfo, KeyInfo, MouseButton, TextInfo};
use crate::limits::Limits;
use crate::node::Node;
use crate::task::RemoteHandle;

pub struct View {
    host: Host,
    root: Box<dyn Node>,
    size: Size,
}

impl View {
    pub fn new(root: impl Node + 'static) -> Self {
        Self::with_host(Host::default(), Box::new(root))
    }

    pub fn with_host(host: Host, root: Box<dyn Node>) -> Self {
        Self { host, root, size: Size::ZERO }
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn root(&self) -> &dyn Node {
        self.root.as_ref()
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut dyn Node {
        self.root.as_mut()
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size)
    }

    /// Size limits of the content, for shells that constrain their window.
    pub fn limits(&self) -> Limits {
        self.root.limits(&BasicContext::new(&self.host))
    }

    /// Resize the view and lay the tree out again.
    pub fn set_size(&mut self, size: Size) {
        if size == self.size {
            return;
        }
        tracing::debug!(width = size.width, height = size.height, "view resized");
        self.size = size;
        self.layout();
    }

    /// Full layout pass over the tree.
    pub fn layout(&mut self) {
        let ctx = Context::root(&self.host, self.bounds());
        self.root.layout(&ctx);
        self.host.refresh_all();
    }

    /// Draw the tree, then the floating drag proxy above it.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        let bounds = self.bounds();
        let ctx = Context::root(&self.host, bounds);
        canvas.push_clip(bounds);
        self.root.draw(&ctx, canvas);
        if let Some(proxy) = self.host.floating() {
            canvas.fill_rect(proxy, Color::SELECTION.with_alpha(0.3));
            canvas.stroke_rect(proxy, Color::INDICATOR, 1.0);
        }
        canvas.pop_clip();
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn click(&mut self, btn: MouseButton) -> bool {
        self.host.set_cursor_pos(btn.pos);
        let ctx = Context::root(&self.host, self.bounds());
        self.root.click(&ctx, btn)
    }

    pub fn drag(&mut self, btn: MouseButton) {
        self.host.set_cursor_pos(btn.pos);
        let ctx = Context::root(&self.host, self.bounds());
        self.root.drag(&ctx, btn);
    }

    pub fn cursor(&mut self, p: Point, status: CursorTracking) -> bool {
        self.host.set_cursor_pos(p);
        let ctx = Context::root(&self.host, self.bounds());
        self.root.cursor(&ctx, p, status)
    }

    pub fn key(&mut self, k: &KeyInfo) -> bool {
        let ctx = Context::root(&self.host, self.bounds());
        self.root.key(&ctx, k)
    }

    pub fn text(&mut self, info: &TextInfo) -> bool {
        let ctx = Context::root(&self.host, self.bounds());
        self.root.text(&ctx, info)
    }

    pub fn scroll(&mut self, dir: Point, p: Point) -> bool {
        let ctx = Context::root(&self.host, self.bounds());
        self.root.scroll(&ctx, dir, p)
    }

    pub fn track_drop(&mut self, info: &DropInfo, status: CursorTracking) {
        self.host.set_cursor_pos(info.pos);
        let ctx = Context::root(&self.host, self.bounds());
        self.root.track_drop(&ctx, info, status);
    }

    pub fn accept_drop(&mut self, info: &DropInfo) -> bool {
        let ctx = Context::root(&self.host, self.bounds());
        let accepted = self.root.accept_drop(&ctx, info);
        tracing::debug!(accepted, mimes = ?info.payload.mime_types().collect::<Vec<_>>(), "external drop");
        accepted
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Run due tasks and cross-thread requests, then a layout pass if one was
    /// requested. Returns the number of tasks run.
    pub fn poll(&mut self, now: Instant) -> usize {
        let ran = self.host.poll(now);
        if self.host.take_layout_request() {
            self.layout();
        }
        ran
    }

    /// When the next deferred task comes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.host.tasks().next_due()
    }

    pub fn take_dirty(&self) -> Dirty {
        self.host.take_dirty()
    }

    pub fn remote(&self) -> RemoteHandle {
        self.host.remote()
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View").field("size", &self.size).field("host", &self.host).finish_non_exhaustive()
    }
}

//! Services the tree uses but does not own: repaint bookkeeping, relayout
//! requests, the pointer position, deferred tasks and the floating drag proxy.
//!
//! Every node call receives the host through its [`crate::context::Context`].
//! All state sits behind `Cell`/`RefCell` so shared references suffice while
//! the tree itself is mutably borrowed.

use std::cell::{Cell, RefCell};
use std::time::Instant;

use crate::canvas::{Monospace, TextMeasure};
use crate::config::KernelConfig;
use crate::geometry::{Point, Rect};
use crate::task::{Remote, RemoteHandle, RemoteInbox, TaskQueue};

/// Repaint area accumulated since the last [`Host::take_dirty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Dirty {
    #[default]
    Clean,
    /// Union of all requested regions.
    Region(Rect),
    /// Everything.
    All,
}

impl Dirty {
    fn add(&mut self, area: Option<Rect>) {
        *self = match (std::mem::take(self), area) {
            (Dirty::All, _) | (_, None) => Dirty::All,
            (Dirty::Clean, Some(r)) => Dirty::Region(r),
            (Dirty::Region(prev), Some(r)) => Dirty::Region(prev.union(&r)),
        };
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        matches!(self, Dirty::Clean)
    }

    /// Whether a repaint of `rect` is pending.
    pub fn covers(&self, rect: &Rect) -> bool {
        match self {
            Dirty::Clean => false,
            Dirty::All => true,
            Dirty::Region(r) => r.intersects(rect),
        }
    }
}

pub struct Host {
    config: KernelConfig,
    measure: Box<dyn TextMeasure>,
    dirty: RefCell<Dirty>,
    relayout: Cell<bool>,
    cursor: Cell<Point>,
    floating: Cell<Option<Rect>>,
    tasks: TaskQueue,
    inbox: RemoteInbox,
}

impl Host {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            measure: Box::new(Monospace),
            dirty: RefCell::new(Dirty::Clean),
            relayout: Cell::new(false),
            cursor: Cell::new(Point::ORIGIN),
            floating: Cell::new(None),
            tasks: TaskQueue::new(),
            inbox: RemoteInbox::new(),
        }
    }

    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    #[inline]
    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    #[inline]
    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// A `Send` handle other threads can use to request repaints.
    pub fn remote(&self) -> RemoteHandle {
        self.inbox.handle()
    }

    // =========================================================================
    // Repaint and relayout
    // =========================================================================

    /// Mark `area` for repaint.
    pub fn refresh(&self, area: Rect) {
        self.dirty.borrow_mut().add(Some(area));
    }

    /// Mark the whole view for repaint.
    pub fn refresh_all(&self) {
        self.dirty.borrow_mut().add(None);
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty.borrow().clone()
    }

    pub fn take_dirty(&self) -> Dirty {
        std::mem::take(&mut *self.dirty.borrow_mut())
    }

    /// Ask for a full layout pass on the next poll.
    pub fn request_layout(&self) {
        self.relayout.set(true);
    }

    #[inline]
    pub fn layout_requested(&self) -> bool {
        self.relayout.get()
    }

    pub(crate) fn take_layout_request(&self) -> bool {
        self.relayout.replace(false)
    }

    // =========================================================================
    // Pointer and drag proxy
    // =========================================================================

    #[inline]
    pub fn cursor_pos(&self) -> Point {
        self.cursor.get()
    }

    pub(crate) fn set_cursor_pos(&self, p: Point) {
        self.cursor.set(p);
    }

    /// Show (or move) the floating drag proxy.
    pub fn show_floating(&self, bounds: Rect) {
        if let Some(prev) = self.floating.replace(Some(bounds)) {
            self.refresh(prev);
        }
        self.refresh(bounds);
    }

    pub fn hide_floating(&self) {
        if let Some(prev) = self.floating.take() {
            self.refresh(prev);
        }
    }

    #[inline]
    pub fn floating(&self) -> Option<Rect> {
        self.floating.get()
    }

    // =========================================================================
    // Polling
    // =========================================================================

    /// Apply cross-thread requests, then run every task due at `now`.
    /// Returns the number of tasks run.
    pub fn poll(&self, now: Instant) -> usize {
        for request in self.inbox.drain() {
            match request {
                Remote::Refresh(Some(area)) => self.refresh(area),
                Remote::Refresh(None) => self.refresh_all(),
                Remote::Relayout => self.request_layout(),
            }
        }
        let due = self.tasks.take_due(now);
        let count = due.len();
        for task in due {
            task(self);
        }
        if count > 0 {
            tracing::trace!(count, "ran deferred tasks");
        }
        count
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("config", &self.config)
            .field("dirty", &self.dirty.borrow())
            .field("relayout", &self.relayout.get())
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

//! Deferred work for the single owning thread.
//!
//! Anything that would mutate the tree from inside a dispatch call (removing a
//! node from its own click handler, showing a drag proxy after a hold delay)
//! is posted here and runs on the next [`crate::view::View::poll`], after the
//! triggering call stack has unwound.
//!
//! # Guarantees
//!
//! - A task runs at most once: it is removed from the queue before it is called.
//! - Tasks posted while the queue is being drained wait for the next poll.
//! - Tasks with equal due times run in posting order.
//! - A guarded task whose [`Liveness`] token was dropped is discarded silently.
//!
//! Other threads never touch the queue. They hold a [`RemoteHandle`] and send
//! [`Remote`] requests that the host marshals in when polled.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::geometry::Rect;
use crate::host::Host;

pub type Task = Box<dyn FnOnce(&Host)>;

// ============================================================================
// Liveness
// ============================================================================

/// Owner side of a liveness flag. Dropping it invalidates every [`Guard`].
#[derive(Debug, Default)]
pub struct Liveness(Rc<()>);

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(&self) -> Guard {
        Guard(Rc::downgrade(&self.0))
    }
}

/// Observer side of a liveness flag, captured by deferred tasks.
#[derive(Debug, Clone)]
pub struct Guard(Weak<()>);

impl Guard {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

// ============================================================================
// Queue
// ============================================================================

struct Scheduled {
    due: Instant,
    seq: u64,
    task: Task,
}

// Min-heap on (due, seq).
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        other.due.cmp(&self.due).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Scheduled {}

#[derive(Default)]
struct Queue {
    next_seq: u64,
    heap: BinaryHeap<Scheduled>,
}

/// Immediate and delayed tasks, owned by the [`Host`].
#[derive(Default)]
pub struct TaskQueue {
    inner: RefCell<Queue>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the next poll.
    pub fn post(&self, f: impl FnOnce(&Host) + 'static) {
        self.schedule(Instant::now(), Box::new(f));
    }

    /// Run `f` on the first poll at least `delay` from now.
    pub fn post_after(&self, delay: Duration, f: impl FnOnce(&Host) + 'static) {
        self.schedule(Instant::now() + delay, Box::new(f));
    }

    /// Like [`post_after`](Self::post_after), but `f` is skipped if `guard`
    /// is dead by the time the task comes due.
    pub fn post_guarded(&self, guard: Guard, delay: Duration, f: impl FnOnce(&Host) + 'static) {
        self.post_after(delay, move |host| {
            if guard.is_alive() {
                f(host);
            } else {
                tracing::trace!("skipping deferred task, owner is gone");
            }
        });
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().heap.is_empty()
    }

    /// Due time of the earliest pending task, for shells that sleep between polls.
    pub fn next_due(&self) -> Option<Instant> {
        self.inner.borrow().heap.peek().map(|s| s.due)
    }

    /// Remove every task due at `now`, in execution order.
    pub(crate) fn take_due(&self, now: Instant) -> Vec<Task> {
        let mut queue = self.inner.borrow_mut();
        let mut due = Vec::new();
        while queue.heap.peek().is_some_and(|s| s.due <= now) {
            if let Some(s) = queue.heap.pop() {
                due.push(s.task);
            }
        }
        due
    }

    fn schedule(&self, due: Instant, task: Task) {
        let mut queue = self.inner.borrow_mut();
        let seq = queue.next_seq;
        queue.next_seq += 1;
        queue.heap.push(Scheduled { due, seq, task });
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue").field("pending", &self.len()).finish()
    }
}

// ============================================================================
// Cross-thread requests
// ============================================================================

/// A request from another thread, applied on the owning thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Remote {
    /// Repaint a region, or the whole view when `None`.
    Refresh(Option<Rect>),
    /// Run a full layout pass.
    Relayout,
}

/// `Send` handle for posting [`Remote`] requests to a host.
#[derive(Debug, Clone)]
pub struct RemoteHandle {
    tx: UnboundedSender<Remote>,
}

impl RemoteHandle {
    /// Returns false once the owning host is gone.
    pub fn send(&self, request: Remote) -> bool {
        self.tx.send(request).is_ok()
    }

    pub fn refresh(&self, area: Option<Rect>) -> bool {
        self.send(Remote::Refresh(area))
    }

    pub fn relayout(&self) -> bool {
        self.send(Remote::Relayout)
    }
}

/// Receiving end kept by the host.
#[derive(Debug)]
pub(crate) struct RemoteInbox {
    tx: UnboundedSender<Remote>,
    rx: RefCell<UnboundedReceiver<Remote>>,
}

impl RemoteInbox {
    pub(crate) fn new() -> Self {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        Self { tx, rx: RefCell::new(rx) }
    }

    pub(crate) fn handle(&self) -> RemoteHandle {
        RemoteHandle { tx: self.tx.clone() }
    }

    /// Everything sent so far, without blocking.
    pub(crate) fn drain(&self) -> Vec<Remote> {
        let mut rx = self.rx.borrow_mut();
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(r) => out.push(r),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

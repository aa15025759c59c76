//! Shared probes for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use trellis::context::{BasicContext, Context};
use trellis::geometry::{Point, Size};
use trellis::input::{CursorTracking, FocusRequest, MouseButton};
use trellis::limits::{Limits, Stretch};
use trellis::node::Node;

/// Route kernel logs to the test output. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Press(usize),
    Release(usize),
    Cursor(usize, CursorTracking),
    Focus(usize),
    Blur(usize),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// A fixed-size leaf that records what it receives.
pub struct Probe {
    pub id: usize,
    pub size: Size,
    pub focusable: bool,
    pub log: Log,
}

impl Probe {
    pub fn new(id: usize, size: Size, log: &Log) -> Self {
        Self { id, size, focusable: true, log: log.clone() }
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }
}

impl Node for Probe {
    fn limits(&self, _ctx: &BasicContext) -> Limits {
        Limits::fixed(self.size)
    }

    fn stretch(&self) -> Stretch {
        Stretch::NONE
    }

    fn click(&mut self, _ctx: &Context, btn: MouseButton) -> bool {
        let event = if btn.down { Event::Press(self.id) } else { Event::Release(self.id) };
        self.log.borrow_mut().push(event);
        true
    }

    fn cursor(&mut self, _ctx: &Context, _p: Point, status: CursorTracking) -> bool {
        self.log.borrow_mut().push(Event::Cursor(self.id, status));
        true
    }

    fn wants_control(&self) -> bool {
        true
    }

    fn wants_focus(&self) -> bool {
        self.focusable
    }

    fn begin_focus(&mut self, _req: FocusRequest) -> bool {
        self.log.borrow_mut().push(Event::Focus(self.id));
        true
    }

    fn end_focus(&mut self) -> bool {
        self.log.borrow_mut().push(Event::Blur(self.id));
        true
    }
}

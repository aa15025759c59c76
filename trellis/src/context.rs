//! Traversal context threaded through every node call.
//!
//! Nodes never store a reference to their parent. Instead each call receives a
//! [`Context`] that borrows the caller's context: the chain of `parent` links is
//! the ancestry of the node for the duration of that call, and nothing longer.
//!
//! # Talking to ancestors
//!
//! A node that needs something from an enclosing composite (a draggable asking
//! its list to reorder) posts a [`Request`] with [`Context::post`]. The request
//! lands in the nearest [`Mailbox`] up the chain; the composite that installed
//! that mailbox drains it after the child call returns, when it is free to
//! mutate its children again.

use std::cell::RefCell;

use crate::geometry::{Point, Rect};
use crate::host::Host;

/// Context for the limits query: host services only, no bounds.
#[derive(Debug, Clone, Copy)]
pub struct BasicContext<'a> {
    pub host: &'a Host,
}

impl<'a> BasicContext<'a> {
    #[inline]
    pub fn new(host: &'a Host) -> Self {
        Self { host }
    }
}

/// A request from a node to an enclosing composite.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Request {
    /// Move the current selection to the insertion point nearest `at`.
    Move { at: Point },
}

/// Collects [`Request`]s posted by descendants during one dispatch.
#[derive(Debug, Default)]
pub struct Mailbox {
    requests: RefCell<Vec<Request>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, request: Request) {
        self.requests.borrow_mut().push(request);
    }

    pub fn take(&self) -> Vec<Request> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.requests.borrow().is_empty()
    }
}

/// Bounds, host and ancestry for a single node call.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub host: &'a Host,
    pub bounds: Rect,
    parent: Option<&'a Context<'a>>,
    mailbox: Option<&'a Mailbox>,
}

impl<'a> Context<'a> {
    /// Context for the root node.
    pub fn root(host: &'a Host, bounds: Rect) -> Self {
        Self { host, bounds, parent: None, mailbox: None }
    }

    /// Context for a child laid out at `bounds`.
    #[inline]
    pub fn child<'b>(&'b self, bounds: Rect) -> Context<'b> {
        Context { host: self.host, bounds, parent: Some(self), mailbox: None }
    }

    /// Same node, same bounds, with `mailbox` catching requests from below.
    #[inline]
    pub fn with_mailbox<'b>(&'b self, mailbox: &'b Mailbox) -> Context<'b> {
        Context { host: self.host, bounds: self.bounds, parent: self.parent, mailbox: Some(mailbox) }
    }

    #[inline]
    pub fn basic(&self) -> BasicContext<'a> {
        BasicContext { host: self.host }
    }

    #[inline]
    pub fn parent(&self) -> Option<&Context<'a>> {
        self.parent
    }

    /// Number of ancestors.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent, |c| c.parent).count()
    }

    /// The context `levels` steps up the chain, stopping at the root.
    pub fn ancestor(&self, levels: usize) -> &Context<'a> {
        let mut ctx = self;
        for _ in 0..levels {
            match ctx.parent {
                Some(p) => ctx = p,
                None => break,
            }
        }
        ctx
    }

    /// Repaint this node's bounds, widened to the ancestor `outward` levels up.
    #[inline]
    pub fn refresh(&self, outward: usize) {
        self.host.refresh(self.ancestor(outward).bounds);
    }

    /// Schedule a full layout pass.
    #[inline]
    pub fn request_layout(&self) {
        self.host.request_layout();
    }

    #[inline]
    pub fn cursor_pos(&self) -> Point {
        self.host.cursor_pos()
    }

    /// Deliver `request` to the nearest mailbox up the chain. Returns false
    /// when no ancestor is listening.
    pub fn post(&self, request: Request) -> bool {
        let mut ctx = Some(self);
        while let Some(c) = ctx {
            if let Some(mailbox) = c.mailbox {
                mailbox.push(request);
                return true;
            }
            ctx = c.parent;
        }
        tracing::debug!(?request, "request dropped, no enclosing mailbox");
        false
    }
}

/// Request repaint of the region covering the node `ctx` belongs to, widened
/// to the bounds of the ancestor `outward` levels up.
pub fn refresh(ctx: &Context, outward: usize) {
    ctx.refresh(outward);
}

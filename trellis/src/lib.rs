//! Trellis - composition kernel for a retained-mode widget tree.
//!
//! This crate contains the part of a widget toolkit that owns the tree:
//! - Node contract and delegating wrappers
//! - Composites: hit-testing, click/drag/cursor/key dispatch, Tab focus
//! - Tile and grid allocators, layers
//! - Virtualized lists over a [`Composer`]
//! - Selection and drag-and-drop
//! - Deferred tasks with liveness guards, cross-thread refresh handles
//!
//! Rendering and platform windows stay outside: a shell implements
//! [`Canvas`], converts native events into the [`input`] types and drives a
//! [`View`].

pub mod canvas;
pub mod composite;
pub mod config;
pub mod context;
pub mod dnd;
pub mod geometry;
pub mod host;
pub mod input;
pub mod limits;
pub mod list;
pub mod node;
pub mod payload;
pub mod selection;
pub mod task;
pub mod tracker;
pub mod view;
pub mod wrapper;

mod error;

pub use canvas::{Canvas, Color, DisplayList, TextMeasure};
pub use composite::{Composite, Container, Grid, hgrid, htile, layer, vgrid, vtile};
pub use config::KernelConfig;
pub use context::{BasicContext, Context, Request, refresh};
pub use dnd::{Draggable, DropBox, DropInserter, draggable, drop_box, drop_inserter};
pub use error::{Error, Result};
pub use geometry::{Axis, Point, Rect, Size};
pub use host::{Dirty, Host};
pub use input::{CursorTracking, DropInfo, KeyInfo, Modifiers, MouseButton, NamedKey, TextInfo};
pub use limits::{Limits, Stretch};
pub use list::{Composer, DynamicList, hlist, vlist};
pub use node::{HitQuery, Node, NodeExt, Selectable, layout};
pub use payload::Payload;
pub use selection::{SelectionList, selectable};
pub use task::{Liveness, RemoteHandle};
pub use view::View;

//! End-to-end flows through a `View`: reordering by drag, external drops and
//! tree edits deferred out of a click handler.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use trellis::canvas::{Canvas, DisplayList, LINE_HEIGHT};
use trellis::composite::{Composite, Container, Tile, htile, vtile};
use trellis::context::{BasicContext, Context};
use trellis::dnd::{draggable, drop_box, drop_inserter};
use trellis::geometry::{Point, Size};
use trellis::host::Dirty;
use trellis::input::{CursorTracking, DropInfo, MouseButton};
use trellis::limits::Limits;
use trellis::node::{Label, Node, NodeExt, WeakShared, share};
use trellis::payload::{MIME_TEXT, MIME_URI_LIST, Payload};
use trellis::selection::SelectionList;
use trellis::view::View;

fn row(i: usize) -> Point {
    Point::new(20.0, LINE_HEIGHT * i as f32 + LINE_HEIGHT / 2.0)
}

fn texts(view: &mut View) -> Vec<String> {
    let mut dl = DisplayList::new();
    view.draw(&mut dl);
    dl.texts().into_iter().map(str::to_owned).collect()
}

#[test]
fn test_drag_to_reorder_through_view() {
    common::init_tracing();
    let items = ["alpha", "beta", "gamma", "delta"];
    let children = items.iter().map(|t| draggable(Label::new(*t)).boxed()).collect();
    let mut view = View::new(SelectionList::new(vtile(children)));
    view.set_size(Size::new(200.0, LINE_HEIGHT * 4.0));
    view.take_dirty();

    view.click(MouseButton::press(row(3)));
    view.drag(MouseButton::press(Point::new(20.0, 10.0)));
    assert!(view.host().floating().is_some());
    assert!(!view.take_dirty().is_clean());

    view.click(MouseButton::release(Point::new(20.0, 5.0)));
    assert_eq!(view.host().floating(), None);
    assert_eq!(texts(&mut view), vec!["delta", "alpha", "beta", "gamma"]);

    // The pending proxy task was cancelled by the release.
    view.poll(Instant::now() + Duration::from_secs(1));
    assert_eq!(view.host().floating(), None);
}

#[test]
fn test_external_drop_reaches_inserter_under_pointer() {
    common::init_tracing();
    let landed = Rc::new(RefCell::new(Vec::new()));
    let sink = landed.clone();
    let files = Rc::new(Cell::new(0));
    let counter = files.clone();

    let list = vtile((0..3).map(|i| Label::new(format!("row {i}")).boxed()).collect());
    let inserter = drop_inserter(&[MIME_TEXT], list).on_drop(move |payload, index| {
        sink.borrow_mut().push((payload.clone(), index));
        true
    });
    let bin = drop_box(&[MIME_URI_LIST], Label::new("bin")).on_drop(move |payload| {
        counter.set(counter.get() + payload.filepaths().len());
        !payload.filepaths().is_empty()
    });
    let mut view = View::new(htile(vec![inserter.boxed(), bin.boxed()]));
    view.set_size(Size::new(200.0, LINE_HEIGHT * 3.0));

    let text = Payload::new().with_text(MIME_TEXT, "new row");
    let over_first = DropInfo::new(text.clone(), Point::new(10.0, 3.0));
    view.track_drop(&over_first, CursorTracking::Entering);
    assert_eq!(view.host().cursor_pos(), Point::new(10.0, 3.0));
    assert!(view.accept_drop(&over_first));
    assert_eq!(*landed.borrow(), vec![(text.clone(), 0)]);

    let uris = Payload::new().with_text(MIME_URI_LIST, "file:///tmp/a.txt\nfile:///tmp/b.txt\n");
    let over_bin = DropInfo::new(uris, Point::new(190.0, 10.0));
    view.track_drop(&over_bin, CursorTracking::Entering);
    assert!(view.accept_drop(&over_bin));
    assert_eq!(files.get(), 2);

    // Text is not something the bin takes.
    let text_on_bin = DropInfo::new(text, Point::new(190.0, 10.0));
    assert!(!view.accept_drop(&text_on_bin));
    assert_eq!(landed.borrow().len(), 1);
}

/// Removes itself from its owner when clicked, through a deferred task.
struct RemoveSelf {
    label: Label,
    owner: WeakShared<Composite<Tile>>,
}

impl Node for RemoveSelf {
    fn limits(&self, ctx: &BasicContext) -> Limits {
        self.label.limits(ctx)
    }

    fn draw(&mut self, ctx: &Context, canvas: &mut dyn Canvas) {
        self.label.draw(ctx, canvas);
    }

    fn click(&mut self, ctx: &Context, btn: MouseButton) -> bool {
        if btn.down {
            return true;
        }
        let owner = self.owner.clone();
        // Labels in this test differ in length, so the measured size identifies the node.
        let size = self.label.limits(&ctx.basic()).min;
        ctx.host.tasks().post(move |host| {
            let Some(owner) = owner.upgrade() else { return };
            let basic = BasicContext::new(host);
            let mut list = owner.borrow_mut();
            let found = (0..list.len()).find(|&i| list.get(i).is_some_and(|n| n.limits(&basic).min == size));
            if let Some(index) = found {
                list.remove(index);
            }
            host.request_layout();
        });
        true
    }

    fn wants_control(&self) -> bool {
        true
    }
}

#[test]
fn test_removal_from_click_is_deferred_to_poll() {
    common::init_tracing();
    let list = share(vtile(Vec::new()));
    for text in ["a", "bb", "ccc"] {
        list.borrow_mut().push(RemoveSelf { label: Label::new(text), owner: list.downgrade() });
    }
    let mut view = View::new(list.clone());
    view.set_size(Size::new(100.0, LINE_HEIGHT * 3.0));

    view.click(MouseButton::press(row(1)));
    assert!(view.click(MouseButton::release(row(1))));
    assert_eq!(list.borrow().len(), 3);
    assert!(!view.host().tasks().is_empty());

    view.take_dirty();
    assert_eq!(view.poll(Instant::now()), 1);
    assert_eq!(list.borrow().len(), 2);
    assert_eq!(view.take_dirty(), Dirty::All);
    assert_eq!(texts(&mut view), vec!["a", "ccc"]);
}

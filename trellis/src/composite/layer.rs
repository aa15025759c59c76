//! Layers: children stacked on top of each other, all sharing the
//! composite's bounds. The last child is on top, so hit-testing and Tab
//! traversal run from the end.

use crate::context::{BasicContext, Context};
use crate::geometry::{Rect, Size};
use crate::limits::Limits;
use crate::node::Node;

use super::{Arrange, Composite};

#[derive(Debug, Clone, Copy, Default)]
pub struct Layer;

impl Arrange for Layer {
    fn limits(&self, ctx: &BasicContext, children: &[Box<dyn Node>]) -> Limits {
        let mut limits = Limits::new(Size::ZERO, Limits::FULL.max);
        for child in children {
            let l = child.limits(ctx);
            limits.min.width = limits.min.width.max(l.min.width);
            limits.min.height = limits.min.height.max(l.min.height);
            limits.max.width = limits.max.width.min(l.max.width);
            limits.max.height = limits.max.height.min(l.max.height);
        }
        limits.normalized()
    }

    fn arrange(&mut self, _ctx: &Context, _children: &[Box<dyn Node>]) {}

    fn bounds_of(&self, ctx: &Context, _index: usize) -> Rect {
        ctx.bounds
    }

    fn reverse_index(&self) -> bool {
        true
    }
}

/// Stack `children`, first at the bottom.
pub fn layer(children: Vec<Box<dyn Node>>) -> Composite<Layer> {
    Composite::with_children(Layer, children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Color, DisplayList, Primitive};
    use crate::geometry::Point;
    use crate::host::Host;
    use crate::input::MouseButton;
    use crate::node::{HitQuery, NodeExt, Spacer, Swatch};

    struct Button(usize, std::rc::Rc<std::cell::Cell<usize>>);

    impl Node for Button {
        fn click(&mut self, _ctx: &Context, _btn: MouseButton) -> bool {
            self.1.set(self.0);
            true
        }

        fn wants_control(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_limits_intersect() {
        let host = Host::default();
        let l = layer(vec![
            Spacer::flexible(Size::new(10.0, 40.0)).boxed(),
            Swatch::new(Color::BLACK).with_limits(Limits::new(Size::new(30.0, 5.0), Size::new(200.0, 100.0))).boxed(),
        ]);
        let limits = l.limits(&BasicContext::new(&host));
        assert_eq!(limits.min, Size::new(30.0, 40.0));
        assert_eq!(limits.max, Size::new(200.0, 100.0));
    }

    #[test]
    fn test_topmost_child_gets_the_press() {
        let host = Host::default();
        let hit = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut l = layer(vec![Button(1, hit.clone()).boxed(), Button(2, hit.clone()).boxed()]);
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 10.0, 10.0));
        l.layout(&ctx);
        assert!(l.click(&ctx, MouseButton::press(Point::new(5.0, 5.0))));
        assert_eq!(hit.get(), 2);
        assert!(l.hit_test(&ctx, Point::new(5.0, 5.0), HitQuery::Control).is_some());
    }

    #[test]
    fn test_draws_bottom_first() {
        let host = Host::default();
        let mut l = layer(vec![Swatch::new(Color::BLACK).boxed(), Swatch::new(Color::WHITE).boxed()]);
        let ctx = Context::root(&host, Rect::new(0.0, 0.0, 10.0, 10.0));
        l.layout(&ctx);
        let mut dl = DisplayList::new();
        l.draw(&ctx, &mut dl);
        let colors: Vec<Color> = dl
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Fill { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::BLACK, Color::WHITE]);
    }
}

//! Tiles: children placed one after another along an axis.
//!
//! # Allocation
//!
//! Every child first gets its minimum. Free space is then handed out in
//! proportion to stretch, visiting children in order of saturation density
//! (`stretch / (max - min)`, highest first). A dense child hits its maximum
//! early; whatever it could not take stays in the pool for the rest. Each child
//! is visited once after an `O(n log n)` sort.
//!
//! Space still left after the stretch pass (every stretching child saturated,
//! or nobody stretches) is spread over the remaining headroom of all children
//! in proportion to that headroom. Below the sum of minimums every child sits
//! at its minimum and the content overflows.

use crate::context::{BasicContext, Context};
use crate::geometry::{Axis, Rect};
use crate::limits::{Extent, FULL_EXTENT, Limits};
use crate::node::Node;

use super::{Arrange, Composite};

/// One child's claim on the main axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileItem {
    pub min: f32,
    pub max: f32,
    pub stretch: f32,
}

impl TileItem {
    pub fn new(min: f32, max: f32, stretch: f32) -> Self {
        Self { min, max, stretch }
    }

    #[inline]
    fn range(&self) -> f32 {
        (self.max - self.min).max(0.0)
    }

    /// How fast this item saturates per unit of shared space.
    fn density(&self) -> f32 {
        if self.stretch <= 0.0 {
            0.0
        } else if self.range() <= 0.0 {
            f32::INFINITY
        } else {
            self.stretch / self.range()
        }
    }
}

/// Split `extent` among `items`. Returns one size per item, in item order.
pub fn allocate(items: &[TileItem], extent: f32) -> Vec<f32> {
    let mut sizes: Vec<f32> = items.iter().map(|t| t.min).collect();
    let mut free = extent - sizes.iter().sum::<f32>();
    if free <= 0.0 {
        return sizes;
    }

    // Stable sort keeps index order among equal densities.
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].density().total_cmp(&items[a].density()));

    let mut pool: f32 = items.iter().map(|t| t.stretch.max(0.0)).sum();
    for &i in &order {
        let item = &items[i];
        if item.stretch <= 0.0 || pool <= 0.0 {
            continue;
        }
        let give = (free * item.stretch / pool).min(item.range());
        sizes[i] = (item.min + give).min(item.max.max(item.min));
        free -= give;
        pool -= item.stretch;
    }

    if free > 0.0 {
        let headroom: f32 = items.iter().zip(&sizes).map(|(t, s)| (t.max - s).max(0.0)).sum();
        if headroom > 0.0 {
            let ratio = (free / headroom).min(1.0);
            for (t, s) in items.iter().zip(sizes.iter_mut()) {
                let room = (t.max - *s).max(0.0);
                *s = (*s + room * ratio).min(t.max.max(t.min));
            }
        }
    }
    sizes
}

/// Main axis sums, cross axis intersects.
pub(crate) fn stacked_limits(axis: Axis, ctx: &BasicContext, children: &[Box<dyn Node>]) -> Limits {
    let cross = axis.cross();
    let mut main = Extent::new(0.0, 0.0);
    let mut across = Extent::FULL;
    for child in children {
        let l = child.limits(ctx);
        main.min += l.along(axis).min;
        main.max = (main.max + l.along(axis).max).min(FULL_EXTENT);
        across.min = across.min.max(l.along(cross).min);
        across.max = across.max.min(l.along(cross).max);
    }
    Limits::from_axes(axis, main, across).normalized()
}

/// Placement for a tile composite. Offsets are relative to the composite's
/// own main-axis start, so a move without a resize needs no new layout.
#[derive(Debug, Clone)]
pub struct Tile {
    axis: Axis,
    offsets: Vec<f32>,
}

impl Tile {
    pub fn new(axis: Axis) -> Self {
        Self { axis, offsets: vec![0.0] }
    }

    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Main-axis sizes from the last layout.
    pub fn sizes(&self) -> Vec<f32> {
        self.offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

impl Arrange for Tile {
    fn limits(&self, ctx: &BasicContext, children: &[Box<dyn Node>]) -> Limits {
        stacked_limits(self.axis, ctx, children)
    }

    fn arrange(&mut self, ctx: &Context, children: &[Box<dyn Node>]) {
        let basic = ctx.basic();
        let items: Vec<TileItem> = children
            .iter()
            .map(|child| {
                let l = child.limits(&basic).along(self.axis);
                TileItem::new(l.min, l.max, child.stretch().along(self.axis))
            })
            .collect();
        let sizes = allocate(&items, ctx.bounds.size().along(self.axis));

        self.offsets.clear();
        self.offsets.push(0.0);
        let mut pos = 0.0;
        for size in sizes {
            pos += size;
            self.offsets.push(pos);
        }
    }

    fn bounds_of(&self, ctx: &Context, index: usize) -> Rect {
        match (self.offsets.get(index), self.offsets.get(index + 1)) {
            (Some(&start), Some(&end)) => {
                let (origin, _) = ctx.bounds.span(self.axis);
                ctx.bounds.with_span(self.axis, origin + start, end - start)
            }
            _ => Rect::ZERO,
        }
    }

    fn axis(&self) -> Axis {
        self.axis
    }
}

/// Children left to right.
pub fn htile(children: Vec<Box<dyn Node>>) -> Composite<Tile> {
    Composite::with_children(Tile::new(Axis::Horizontal), children)
}

/// Children top to bottom.
pub fn vtile(children: Vec<Box<dyn Node>>) -> Composite<Tile> {
    Composite::with_children(Tile::new(Axis::Vertical), children)
}

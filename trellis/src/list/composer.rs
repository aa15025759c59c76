//! Item sources for [`DynamicList`](super::DynamicList).

use crate::context::BasicContext;
use crate::limits::Extent;
use crate::node::Node;

/// Supplies item count, item sizes and item nodes to a virtualized list.
///
/// The list only asks for nodes of items it is about to show. Structural edits
/// on the list are mirrored into the composer through [`resize`](Self::resize)
/// and [`reorder`](Self::reorder), so a composer that owns its data stays in
/// step with the cells.
pub trait Composer {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extent of item `index` along the list axis.
    fn main_axis_size(&self, index: usize, ctx: &BasicContext) -> f32;

    /// Limits shared by all items across the list axis.
    fn secondary_axis_limits(&self, ctx: &BasicContext) -> Extent;

    fn compose(&mut self, index: usize) -> Box<dyn Node>;

    /// Grow or shrink to `len` items. New items are appended.
    fn resize(&mut self, len: usize);

    /// Permute items so that `new[i] = old[order[i]]`.
    fn reorder(&mut self, _order: &[usize]) {}
}

/// Items of one uniform size, built by a closure.
pub struct FixedComposer<F> {
    len: usize,
    size: f32,
    cross: Extent,
    compose: F,
}

impl<F: FnMut(usize) -> Box<dyn Node>> FixedComposer<F> {
    pub fn new(len: usize, size: f32, compose: F) -> Self {
        Self { len, size, cross: Extent::FULL, compose }
    }

    pub fn with_cross_limits(mut self, cross: Extent) -> Self {
        self.cross = cross;
        self
    }
}

impl<F: FnMut(usize) -> Box<dyn Node>> Composer for FixedComposer<F> {
    fn len(&self) -> usize {
        self.len
    }

    fn main_axis_size(&self, _index: usize, _ctx: &BasicContext) -> f32 {
        self.size
    }

    fn secondary_axis_limits(&self, _ctx: &BasicContext) -> Extent {
        self.cross
    }

    fn compose(&mut self, index: usize) -> Box<dyn Node> {
        (self.compose)(index)
    }

    fn resize(&mut self, len: usize) {
        self.len = len;
    }
}

/// Items with individual sizes. The sizes follow their items through moves,
/// inserts and erases; items added by a resize get `default_size`.
pub struct SizedComposer<F> {
    sizes: Vec<f32>,
    default_size: f32,
    cross: Extent,
    compose: F,
}

impl<F: FnMut(usize) -> Box<dyn Node>> SizedComposer<F> {
    pub fn new(sizes: Vec<f32>, compose: F) -> Self {
        Self { sizes, default_size: 0.0, cross: Extent::FULL, compose }
    }

    pub fn with_default_size(mut self, size: f32) -> Self {
        self.default_size = size;
        self
    }

    pub fn with_cross_limits(mut self, cross: Extent) -> Self {
        self.cross = cross;
        self
    }

    #[inline]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn set_size(&mut self, index: usize, size: f32) {
        if let Some(s) = self.sizes.get_mut(index) {
            *s = size;
        }
    }
}

impl<F: FnMut(usize) -> Box<dyn Node>> Composer for SizedComposer<F> {
    fn len(&self) -> usize {
        self.sizes.len()
    }

    fn main_axis_size(&self, index: usize, _ctx: &BasicContext) -> f32 {
        self.sizes.get(index).copied().unwrap_or(0.0)
    }

    fn secondary_axis_limits(&self, _ctx: &BasicContext) -> Extent {
        self.cross
    }

    fn compose(&mut self, index: usize) -> Box<dyn Node> {
        (self.compose)(index)
    }

    fn resize(&mut self, len: usize) {
        self.sizes.resize(len, self.default_size);
    }

    fn reorder(&mut self, order: &[usize]) {
        crate::composite::apply_order(&mut self.sizes, order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::host::Host;
    use crate::node::{NodeExt, Spacer};

    #[test]
    fn test_sized_composer_follows_edits() {
        let host = Host::default();
        let ctx = BasicContext::new(&host);
        let mut c = SizedComposer::new(vec![1.0, 2.0, 3.0], |_| Spacer::fixed(Size::ZERO).boxed()).with_default_size(9.0);
        c.reorder(&[2, 0, 1]);
        assert_eq!(c.sizes(), &[3.0, 1.0, 2.0]);
        c.resize(4);
        assert_eq!(c.main_axis_size(3, &ctx), 9.0);
        c.resize(1);
        assert_eq!(c.len(), 1);
        assert_eq!(c.main_axis_size(5, &ctx), 0.0);
    }

    #[test]
    fn test_fixed_composer_composes_by_index() {
        let mut seen = Vec::new();
        let mut c = FixedComposer::new(3, 20.0, |i| {
            seen.push(i);
            Spacer::fixed(Size::ZERO).boxed()
        });
        c.compose(2);
        c.resize(10);
        assert_eq!(c.len(), 10);
        drop(c);
        assert_eq!(seen, vec![2]);
    }
}

//! Press-drag-release bookkeeping shared by draggables and grid dividers.

use crate::geometry::Point;
use crate::input::{Modifiers, MouseButton};

/// Pointer state for one press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerInfo {
    /// Where the press happened.
    pub start: Point,
    pub current: Point,
    pub previous: Point,
    /// Press position relative to the tracked object's origin.
    pub offset: Point,
    pub modifiers: Modifiers,
}

impl TrackerInfo {
    pub fn new(btn: &MouseButton, origin: Point) -> Self {
        Self {
            start: btn.pos,
            current: btn.pos,
            previous: btn.pos,
            offset: btn.pos - origin,
            modifiers: btn.modifiers,
        }
    }

    /// Motion since the previous update.
    #[inline]
    pub fn movement(&self) -> Point {
        self.current - self.previous
    }

    /// Straight-line distance from the press position.
    #[inline]
    pub fn travel(&self) -> f32 {
        self.start.distance(self.current)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    state: Option<TrackerInfo>,
}

impl Tracker {
    pub fn begin(&mut self, btn: &MouseButton, origin: Point) -> &TrackerInfo {
        self.state.insert(TrackerInfo::new(btn, origin))
    }

    /// Record a pointer move. `None` when no press is being tracked.
    pub fn update(&mut self, btn: &MouseButton) -> Option<&TrackerInfo> {
        let info = self.state.as_mut()?;
        info.previous = info.current;
        info.current = btn.pos;
        info.modifiers = btn.modifiers;
        Some(info)
    }

    pub fn end(&mut self) -> Option<TrackerInfo> {
        self.state.take()
    }

    #[inline]
    pub fn info(&self) -> Option<&TrackerInfo> {
        self.state.as_ref()
    }

    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.state.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_lifecycle() {
        let mut t = Tracker::default();
        assert!(t.update(&MouseButton::press(Point::ORIGIN)).is_none());

        let info = t.begin(&MouseButton::press(Point::new(10.0, 10.0)), Point::new(4.0, 6.0));
        assert_eq!(info.offset, Point::new(6.0, 4.0));

        t.update(&MouseButton::press(Point::new(13.0, 14.0)));
        let info = t.update(&MouseButton::press(Point::new(14.0, 14.0))).copied().unwrap();
        assert_eq!(info.movement(), Point::new(1.0, 0.0));
        assert_eq!(info.previous, Point::new(13.0, 14.0));
        assert!((info.travel() - (16.0f32 + 16.0).sqrt()).abs() < 1e-5);

        assert!(t.end().is_some());
        assert!(!t.is_tracking());
    }
}

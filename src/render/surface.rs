use std::collections::BTreeMap;

use crate::foundation::core::{Point, Rgba8, Vec2};

/// Opaque reference to a shape drawn on a [`RenderSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub u64);

/// Drawing port implemented by whatever displays the animation.
///
/// All calls happen on the single event loop that drives playback.
pub trait RenderSurface {
    fn draw_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) -> Handle;

    fn draw_dot(&mut self, center: Point, radius: f64, color: Rgba8) -> Handle;

    /// Translate an existing shape. Unknown handles are ignored.
    fn move_by(&mut self, handle: Handle, delta: Vec2);

    /// Remove a shape. Returns `false` if it was already gone, which callers
    /// treat as already satisfied.
    fn delete(&mut self, handle: Handle) -> bool;

    /// Remove everything, grid dots included.
    fn clear(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Line { from: Point, to: Point, width: f64 },
    Dot { center: Point, radius: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceItem {
    pub shape: Shape,
    pub color: Rgba8,
}

/// In-memory display list; the snapshot rasterizer paints from it.
///
/// Handles are allocated monotonically, so iteration order is paint order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    items: BTreeMap<Handle, SurfaceItem>,
    next: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, handle: Handle) -> Option<&SurfaceItem> {
        self.items.get(&handle)
    }

    pub fn items(&self) -> impl Iterator<Item = (Handle, &SurfaceItem)> + '_ {
        self.items.iter().map(|(&h, item)| (h, item))
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.items.values().filter_map(|item| match item.shape {
            Shape::Line { from, to, .. } => Some((from, to)),
            Shape::Dot { .. } => None,
        })
    }

    pub fn dots(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.items.values().filter_map(|item| match item.shape {
            Shape::Dot { center, radius } => Some((center, radius)),
            Shape::Line { .. } => None,
        })
    }

    fn insert(&mut self, shape: Shape, color: Rgba8) -> Handle {
        let handle = Handle(self.next);
        self.next += 1;
        self.items.insert(handle, SurfaceItem { shape, color });
        handle
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) -> Handle {
        self.insert(Shape::Line { from, to, width }, color)
    }

    fn draw_dot(&mut self, center: Point, radius: f64, color: Rgba8) -> Handle {
        self.insert(Shape::Dot { center, radius }, color)
    }

    fn move_by(&mut self, handle: Handle, delta: Vec2) {
        let Some(item) = self.items.get_mut(&handle) else {
            return;
        };
        match &mut item.shape {
            Shape::Line { from, to, .. } => {
                *from += delta;
                *to += delta;
            }
            Shape::Dot { center, .. } => *center += delta,
        }
    }

    fn delete(&mut self, handle: Handle) -> bool {
        self.items.remove(&handle).is_some()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

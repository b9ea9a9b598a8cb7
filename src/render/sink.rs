use crate::{
    foundation::core::{Point, Rgba8},
    render::surface::{Handle, RenderSurface},
    sequence::model::AbsolutePoint,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub line_width: f64,
    /// Radius of the marker drawn where a stroke begins.
    pub origin_dot_radius: f64,
    pub color: Rgba8,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            origin_dot_radius: 1.5,
            color: Rgba8::BLACK,
        }
    }
}

/// A drawn shape and the step index that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderedPrimitive {
    pub step: usize,
    pub handle: Handle,
}

/// What rendering one step did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepEffect {
    /// Segment from the previous point to this one.
    Line(Handle),
    /// Stroke start: a small dot instead of a segment.
    OriginDot(Handle),
    /// Pen lift: nothing drawn; `burst_at` is where the stroke ended, if any.
    Lift { burst_at: Option<Point> },
}

impl StepEffect {
    pub fn handle(self) -> Option<Handle> {
        match self {
            Self::Line(h) | Self::OriginDot(h) => Some(h),
            Self::Lift { .. } => None,
        }
    }
}

/// Draws steps onto a surface and keeps the undo stack of what it drew.
///
/// Every primitive on the stack was produced by a step index below the
/// playback cursor; popping the top is the exact inverse of the last draw.
#[derive(Clone, Debug, Default)]
pub struct RenderSink {
    style: StrokeStyle,
    stack: Vec<RenderedPrimitive>,
}

impl RenderSink {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            style,
            stack: Vec::new(),
        }
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Render step `i`. Returns `None` (and draws nothing) if `i` is out of range.
    pub fn render_step(
        &mut self,
        points: &[AbsolutePoint],
        i: usize,
        surface: &mut dyn RenderSurface,
    ) -> Option<StepEffect> {
        let cur = points.get(i)?;
        let prev = i.checked_sub(1).and_then(|j| points.get(j));

        if cur.pen.is_lift() {
            return Some(StepEffect::Lift {
                burst_at: prev.map(|p| p.point),
            });
        }

        let effect = match prev {
            Some(p) if !p.pen.is_lift() => StepEffect::Line(surface.draw_line(
                p.point,
                cur.point,
                self.style.line_width,
                self.style.color,
            )),
            _ => StepEffect::OriginDot(surface.draw_dot(
                cur.point,
                self.style.origin_dot_radius,
                self.style.color,
            )),
        };
        if let Some(handle) = effect.handle() {
            self.stack.push(RenderedPrimitive { step: i, handle });
        }
        tracing::trace!(step = i, ?effect, "rendered step");
        Some(effect)
    }

    /// Pop the most recent primitive and remove it from the surface. No-op on an empty stack.
    pub fn undo_last(&mut self, surface: &mut dyn RenderSurface) -> Option<RenderedPrimitive> {
        let top = self.stack.pop()?;
        surface.delete(top.handle);
        Some(top)
    }

    /// Undo the primitive drawn by `step`, if it is the top of the stack.
    ///
    /// Pen-lift steps never pushed anything, so stepping back over one leaves
    /// the stack untouched.
    pub fn undo_step(
        &mut self,
        step: usize,
        surface: &mut dyn RenderSurface,
    ) -> Option<RenderedPrimitive> {
        match self.stack.last() {
            Some(top) if top.step == step => self.undo_last(surface),
            _ => None,
        }
    }

    /// Delete every drawn primitive.
    pub fn clear(&mut self, surface: &mut dyn RenderSurface) {
        for p in self.stack.drain(..).rev() {
            surface.delete(p.handle);
        }
    }

    /// Drop bookkeeping without touching the surface (it was cleared wholesale).
    pub fn forget(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sink.rs"]
mod tests;

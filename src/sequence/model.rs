use crate::foundation::core::{Pen, Point, Vec2};

/// One encoded pen movement: a delta plus the pen flag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStep {
    pub dx: f64,
    pub dy: f64,
    pub pen: Pen,
}

impl StrokeStep {
    pub fn new(dx: f64, dy: f64, pen: Pen) -> Self {
        Self { dx, dy, pen }
    }

    pub fn draw(dx: f64, dy: f64) -> Self {
        Self::new(dx, dy, Pen::Down)
    }

    pub fn lift() -> Self {
        Self::new(0.0, 0.0, Pen::Lift)
    }

    pub fn delta(self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            dx: self.dx * factor,
            dy: self.dy * factor,
            pen: self.pen,
        }
    }

    /// `[dx, dy, pen]` as written in stroke files.
    pub fn to_triple(self) -> [f64; 3] {
        [self.dx, self.dy, self.pen.as_flag()]
    }
}

/// Pixel-scale delta sequence produced by the normalizer.
///
/// Immutable once built; the only way to get one is through
/// [`normalize`](crate::normalize) or [`CanonicalSequence::from_pixel_steps`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanonicalSequence {
    steps: Vec<StrokeStep>,
}

impl CanonicalSequence {
    /// Wrap steps that are already known to be in pixel units.
    pub fn from_pixel_steps(steps: Vec<StrokeStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[StrokeStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of strokes, counting a trailing stroke without a closing lift.
    pub fn stroke_count(&self) -> usize {
        count_strokes(&self.steps)
    }
}

/// Resolved position of one step, tagged with its pen state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbsolutePoint {
    pub point: Point,
    pub pen: Pen,
}

impl AbsolutePoint {
    pub fn new(x: f64, y: f64, pen: Pen) -> Self {
        Self {
            point: Point::new(x, y),
            pen,
        }
    }
}

pub(crate) fn count_strokes(steps: &[StrokeStep]) -> usize {
    let mut strokes = 0usize;
    let mut in_stroke = false;
    for step in steps {
        match step.pen {
            Pen::Down => in_stroke = true,
            Pen::Lift => {
                if in_stroke {
                    strokes += 1;
                }
                in_stroke = false;
            }
        }
    }
    if in_stroke {
        strokes += 1;
    }
    strokes
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/model.rs"]
mod tests;

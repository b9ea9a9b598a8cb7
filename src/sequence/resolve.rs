use crate::{
    foundation::core::{Point, Rect},
    sequence::model::{AbsolutePoint, CanonicalSequence},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// A first step with `|dx|` strictly above this is read as an absolute coordinate.
    pub absolute_start_threshold: f64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            absolute_start_threshold: 50.0,
        }
    }
}

/// How the first step of a sequence was interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StartClass {
    /// First step is the stroke origin itself.
    AbsoluteStart,
    /// First step is a delta from the configured start point.
    DeltaStart,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub points: Vec<AbsolutePoint>,
    pub start: StartClass,
}

impl Resolved {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of every resolved point, lifts included.
    pub fn bounds(&self) -> Option<Rect> {
        let first = self.points.first()?.point;
        let init = Rect::from_points(first, first);
        Some(
            self.points
                .iter()
                .fold(init, |r, p| r.union_pt(p.point)),
        )
    }
}

pub fn classify_start(seq: &CanonicalSequence, cfg: &ResolveConfig) -> StartClass {
    match seq.steps().first() {
        Some(first) if first.dx.abs() > cfg.absolute_start_threshold => StartClass::AbsoluteStart,
        _ => StartClass::DeltaStart,
    }
}

/// Accumulate deltas into absolute positions, one point per step.
///
/// Pen-lift steps still move the cursor: position carries across a lift, so a
/// following stroke starts relative to where the previous one ended.
#[tracing::instrument(skip(seq), fields(steps = seq.len()))]
pub fn resolve(seq: &CanonicalSequence, start: Point, cfg: &ResolveConfig) -> Resolved {
    let class = classify_start(seq, cfg);
    let mut cur = start;
    let mut points = Vec::with_capacity(seq.len());
    for (i, step) in seq.steps().iter().enumerate() {
        if i == 0 && class == StartClass::AbsoluteStart {
            cur = Point::new(step.dx, step.dy);
        } else {
            cur += step.delta();
        }
        points.push(AbsolutePoint {
            point: cur,
            pen: step.pen,
        });
    }
    tracing::debug!(start = ?class, points = points.len(), "resolved absolute points");
    Resolved {
        points,
        start: class,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/resolve.rs"]
mod tests;

use crate::{
    foundation::core::{Point, Vec2},
    sequence::{load::StrokeFile, model::StrokeStep},
};

/// `rows x cols` reference dots, row-major, starting at `offset`.
pub fn dot_grid(rows: usize, cols: usize, spacing: f64, offset: Point) -> Vec<Point> {
    let mut dots = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            dots.push(offset + Vec2::new(c as f64 * spacing, r as f64 * spacing));
        }
    }
    dots
}

/// `n` evenly spaced points from `a` to `b`, both ends included.
pub fn line_points(a: Point, b: Point, n: usize) -> Vec<Point> {
    match n {
        0 => Vec::new(),
        1 => vec![a],
        _ => (0..n)
            .map(|i| a.lerp(b, i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// One closed diamond around each dot, `radius` from the dot to each corner.
///
/// Each edge is interpolated into `per_edge` points; shared corners appear once.
pub fn diamond_strokes(dots: &[Point], radius: f64, per_edge: usize) -> Vec<Vec<Point>> {
    dots.iter()
        .map(|&c| {
            let corners = [
                c + Vec2::new(0.0, -radius),
                c + Vec2::new(radius, 0.0),
                c + Vec2::new(0.0, radius),
                c + Vec2::new(-radius, 0.0),
                c + Vec2::new(0.0, -radius),
            ];
            let mut stroke: Vec<Point> = Vec::new();
            for pair in corners.windows(2) {
                let edge = line_points(pair[0], pair[1], per_edge.max(2));
                let skip = usize::from(!stroke.is_empty());
                stroke.extend(edge.into_iter().skip(skip));
            }
            stroke
        })
        .collect()
}

/// Archimedean spiral: the radius grows by `spacing` per full turn.
pub fn spiral_stroke(center: Point, spacing: f64, turns: usize, points_per_turn: usize) -> Vec<Point> {
    let ppt = points_per_turn.max(1) as f64;
    (0..turns * points_per_turn)
        .map(|i| {
            let t = i as f64 / ppt;
            let angle = std::f64::consts::TAU * t;
            center + Vec2::from_angle(angle) * (spacing * t)
        })
        .collect()
}

/// Flatten absolute strokes into a step sequence.
///
/// The very first step holds the first point verbatim; every later step is a
/// delta from the previous point, lifts included. Each stroke is closed with a
/// `[0, 0, 1]` lift. The result resolves back to the same points only when the
/// first point's `|x|` exceeds the resolver's absolute-start threshold; otherwise
/// everything is offset by the start point.
pub fn strokes_to_steps(strokes: &[Vec<Point>]) -> Vec<StrokeStep> {
    let mut steps = Vec::with_capacity(strokes.iter().map(|s| s.len() + 1).sum());
    let mut last = None;
    push_strokes(&mut steps, &mut last, strokes);
    steps
}

fn push_strokes(steps: &mut Vec<StrokeStep>, last: &mut Option<Point>, strokes: &[Vec<Point>]) {
    for stroke in strokes {
        for &p in stroke {
            let d = match *last {
                Some(prev) => p - prev,
                None => p.to_vec2(),
            };
            steps.push(StrokeStep::draw(d.x, d.y));
            *last = Some(p);
        }
        steps.push(StrokeStep::lift());
    }
}

pub const DEMO_GRID_ROWS: usize = 4;
pub const DEMO_GRID_COLS: usize = 4;
pub const DEMO_GRID_SPACING: f64 = 70.0;
pub const DEMO_GRID_OFFSET: Point = Point::new(150.0, 120.0);

/// Built-in demo: a diamond grid, a separating lift, then a small spiral.
pub fn demo_file() -> StrokeFile {
    let dots = dot_grid(
        DEMO_GRID_ROWS,
        DEMO_GRID_COLS,
        DEMO_GRID_SPACING,
        DEMO_GRID_OFFSET,
    );
    let diamonds = diamond_strokes(&dots, DEMO_GRID_SPACING * 0.35, 8);
    let spiral = spiral_stroke(Point::new(420.0, 320.0), 2.5, 2, 120);

    let mut seq = Vec::new();
    let mut last = None;
    push_strokes(&mut seq, &mut last, &diamonds);
    seq.push(StrokeStep::lift());
    push_strokes(&mut seq, &mut last, &[spiral]);

    StrokeFile {
        seq,
        dots,
        label: Some("demo".to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/patterns/grid.rs"]
mod tests;

use super::*;
use crate::{
    foundation::core::Pen,
    sequence::{
        model::CanonicalSequence,
        normalize::{NormalizeConfig, UnitClass, normalize},
        resolve::{ResolveConfig, StartClass, resolve},
    },
};

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn dot_grid_is_row_major_from_offset() {
    let dots = dot_grid(2, 3, 10.0, Point::new(1.0, 2.0));
    assert_eq!(dots.len(), 6);
    assert_eq!(dots[0], Point::new(1.0, 2.0));
    assert_eq!(dots[2], Point::new(21.0, 2.0));
    assert_eq!(dots[3], Point::new(1.0, 12.0));
}

#[test]
fn line_points_include_both_ends() {
    let pts = line_points(Point::ZERO, Point::new(10.0, 0.0), 6);
    assert_eq!(pts.len(), 6);
    assert_eq!(pts[0], Point::ZERO);
    assert!(close(pts[5], Point::new(10.0, 0.0)));
    assert!(close(pts[1], Point::new(2.0, 0.0)));
    assert!(line_points(Point::ZERO, Point::ZERO, 0).is_empty());
}

#[test]
fn diamonds_are_closed_without_repeated_corners() {
    let strokes = diamond_strokes(&[Point::new(100.0, 100.0)], 10.0, 8);
    assert_eq!(strokes.len(), 1);
    let s = &strokes[0];
    assert_eq!(s.len(), 8 + 7 * 3);
    assert!(close(s[0], Point::new(100.0, 90.0)));
    assert!(close(*s.last().unwrap(), s[0]));
    for pair in s.windows(2) {
        assert!(!close(pair[0], pair[1]));
    }
}

#[test]
fn spiral_starts_at_center_and_grows() {
    let s = spiral_stroke(Point::new(5.0, 5.0), 4.0, 2, 10);
    assert_eq!(s.len(), 20);
    assert_eq!(s[0], Point::new(5.0, 5.0));
    assert!(close(s[10], Point::new(9.0, 5.0)));
}

#[test]
fn steps_resolve_back_to_the_stroke_points() {
    let strokes = vec![
        vec![Point::new(120.0, 40.0), Point::new(130.0, 40.0)],
        vec![Point::new(200.0, 90.0), Point::new(200.0, 95.0)],
    ];
    let steps = strokes_to_steps(&strokes);
    assert_eq!(steps.len(), 6);
    assert_eq!(steps[0], StrokeStep::draw(120.0, 40.0));
    assert_eq!(steps[2], StrokeStep::lift());
    assert_eq!(steps[3], StrokeStep::draw(70.0, 50.0));

    let seq = CanonicalSequence::from_pixel_steps(steps);
    let r = resolve(&seq, Point::ZERO, &ResolveConfig::default());
    assert_eq!(r.start, StartClass::AbsoluteStart);
    let drawn: Vec<Point> = r
        .points
        .iter()
        .filter(|p| p.pen == Pen::Down)
        .map(|p| p.point)
        .collect();
    let expected: Vec<Point> = strokes.concat();
    assert_eq!(drawn.len(), expected.len());
    for (a, b) in drawn.iter().zip(&expected) {
        assert!(close(*a, *b), "{a:?} != {b:?}");
    }
}

#[test]
fn demo_is_pixel_scaled_with_absolute_start_and_grid() {
    let demo = demo_file();
    assert_eq!(demo.dots.len(), 16);
    assert_eq!(demo.label.as_deref(), Some("demo"));
    // 16 diamonds of 29 points + lift each, a separator, a 240-point spiral + lift.
    assert_eq!(demo.seq.len(), 16 * 30 + 1 + 241);

    let n = normalize(&demo.seq, &NormalizeConfig::default());
    assert_eq!(n.class, UnitClass::Pixel);
    let r = resolve(&n.sequence, Point::ZERO, &ResolveConfig::default());
    assert_eq!(r.start, StartClass::AbsoluteStart);
    assert!(close(r.points[0].point, Point::new(150.0, 95.5)));
    let last_drawn = r.points[r.len() - 2].point;
    assert!((last_drawn - Point::new(420.0, 320.0)).hypot() < 6.0);
}

use super::*;

#[test]
fn handles_are_unique_and_ordered() {
    let mut s = RecordingSurface::new();
    let a = s.draw_dot(Point::new(1.0, 1.0), 2.0, Rgba8::BLACK);
    let b = s.draw_line(Point::ZERO, Point::new(3.0, 4.0), 2.0, Rgba8::BLACK);
    assert!(a < b);
    let order: Vec<_> = s.items().map(|(h, _)| h).collect();
    assert_eq!(order, vec![a, b]);

    // Handles are never reused after a clear.
    s.clear();
    let c = s.draw_dot(Point::ZERO, 1.0, Rgba8::BLACK);
    assert!(c > b);
}

#[test]
fn deleting_twice_is_tolerated() {
    let mut s = RecordingSurface::new();
    let h = s.draw_dot(Point::ZERO, 1.0, Rgba8::BLACK);
    assert!(s.delete(h));
    assert!(!s.delete(h));
    assert!(s.is_empty());
}

#[test]
fn move_by_translates_shapes_and_ignores_unknown_handles() {
    let mut s = RecordingSurface::new();
    let dot = s.draw_dot(Point::new(1.0, 1.0), 2.0, Rgba8::WHITE);
    let line = s.draw_line(Point::ZERO, Point::new(1.0, 0.0), 2.0, Rgba8::BLACK);
    s.move_by(dot, Vec2::new(2.0, -1.0));
    s.move_by(line, Vec2::new(0.0, 5.0));
    s.move_by(Handle(999), Vec2::new(1.0, 1.0));

    assert_eq!(s.dots().next(), Some((Point::new(3.0, 0.0), 2.0)));
    assert_eq!(
        s.lines().next(),
        Some((Point::new(0.0, 5.0), Point::new(1.0, 5.0)))
    );
}

use super::*;
use crate::{foundation::core::Pen, sequence::model::StrokeStep};

fn seq(steps: Vec<StrokeStep>) -> CanonicalSequence {
    CanonicalSequence::from_pixel_steps(steps)
}

#[test]
fn accumulates_deltas_from_start() {
    let s = seq(vec![
        StrokeStep::draw(5.0, 5.0),
        StrokeStep::draw(5.0, 5.0),
        StrokeStep::lift(),
    ]);
    let r = resolve(&s, Point::ZERO, &ResolveConfig::default());
    assert_eq!(r.start, StartClass::DeltaStart);
    assert_eq!(
        r.points,
        vec![
            AbsolutePoint::new(5.0, 5.0, Pen::Down),
            AbsolutePoint::new(10.0, 10.0, Pen::Down),
            AbsolutePoint::new(10.0, 10.0, Pen::Lift),
        ]
    );
}

#[test]
fn large_first_dx_is_an_absolute_origin() {
    let s = seq(vec![
        StrokeStep::draw(150.0, 90.0),
        StrokeStep::draw(2.0, -1.0),
    ]);
    let r = resolve(&s, Point::new(200.0, 180.0), &ResolveConfig::default());
    assert_eq!(r.start, StartClass::AbsoluteStart);
    assert_eq!(r.points[0].point, Point::new(150.0, 90.0));
    assert_eq!(r.points[1].point, Point::new(152.0, 89.0));
}

#[test]
fn threshold_is_strict_and_only_checks_dx() {
    let cfg = ResolveConfig::default();
    assert_eq!(
        classify_start(&seq(vec![StrokeStep::draw(50.0, 0.0)]), &cfg),
        StartClass::DeltaStart
    );
    assert_eq!(
        classify_start(&seq(vec![StrokeStep::draw(-50.5, 0.0)]), &cfg),
        StartClass::AbsoluteStart
    );
    assert_eq!(
        classify_start(&seq(vec![StrokeStep::draw(0.0, 400.0)]), &cfg),
        StartClass::DeltaStart
    );
}

#[test]
fn only_the_first_large_step_is_absolute() {
    let s = seq(vec![
        StrokeStep::draw(100.0, 100.0),
        StrokeStep::lift(),
        StrokeStep::draw(100.0, 0.0),
    ]);
    let r = resolve(&s, Point::ZERO, &ResolveConfig::default());
    assert_eq!(r.points[2].point, Point::new(200.0, 100.0));
}

#[test]
fn position_carries_across_lifts() {
    let s = seq(vec![
        StrokeStep::draw(1.0, 0.0),
        StrokeStep::new(3.0, 3.0, Pen::Lift),
        StrokeStep::draw(1.0, 0.0),
    ]);
    let r = resolve(&s, Point::ZERO, &ResolveConfig::default());
    assert_eq!(r.points[1].point, Point::new(4.0, 3.0));
    assert_eq!(r.points[2].point, Point::new(5.0, 3.0));
}

#[test]
fn output_length_matches_input_and_empty_is_empty() {
    let r = resolve(&seq(vec![]), Point::ZERO, &ResolveConfig::default());
    assert!(r.is_empty());
    assert!(r.bounds().is_none());

    let s = seq(vec![StrokeStep::lift(); 7]);
    assert_eq!(resolve(&s, Point::ZERO, &ResolveConfig::default()).len(), 7);
}

#[test]
fn bounds_cover_all_points() {
    let s = seq(vec![
        StrokeStep::draw(-2.0, 3.0),
        StrokeStep::draw(6.0, -5.0),
    ]);
    let r = resolve(&s, Point::ZERO, &ResolveConfig::default());
    assert_eq!(r.bounds(), Some(Rect::new(-2.0, -2.0, 4.0, 3.0)));
}

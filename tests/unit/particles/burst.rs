use super::*;
use crate::{playback::scheduler::VirtualClock, render::surface::RecordingSurface};

fn drive(field: &mut ParticleField, surface: &mut RecordingSurface, clock: &mut VirtualClock) -> u32 {
    let mut ticks = 0;
    while let Some(due) = clock.next_due() {
        let Some(TimerTask::Particles { burst }) = clock.pop_due(due) else {
            panic!("unexpected task");
        };
        field.tick(burst, surface, clock);
        ticks += 1;
    }
    ticks
}

#[test]
fn default_burst_expires_after_exactly_fifteen_ticks() {
    let mut field = ParticleField::new(BurstConfig::default(), 1);
    let mut surface = RecordingSurface::new();
    let mut clock = VirtualClock::new();

    let id = field
        .spawn_burst(Point::new(10.0, 10.0), &mut surface, &mut clock)
        .unwrap();
    assert_eq!(field.particles(id).map(|p| p.len()), Some(10));
    assert_eq!(surface.len(), 10);
    assert_eq!(BurstConfig::default().ticks_to_live(), 15);

    for n in 1..15 {
        let task = clock.pop_due(u64::MAX).unwrap();
        assert_eq!(task, TimerTask::Particles { burst: id });
        assert_eq!(field.tick(id, &mut surface, &mut clock), TickOutcome::Continue, "tick {n}");
        assert_eq!(field.active_particles(), 10);
    }
    clock.pop_due(u64::MAX).unwrap();
    assert_eq!(field.tick(id, &mut surface, &mut clock), TickOutcome::Finished);

    assert_eq!(clock.now_ms(), 600);
    assert!(clock.is_idle());
    assert_eq!(field.active_bursts(), 0);
    assert!(surface.is_empty());
    assert_eq!(field.tick(id, &mut surface, &mut clock), TickOutcome::Stale);
}

#[test]
fn particles_start_at_origin_within_configured_ranges() {
    let mut field = ParticleField::new(BurstConfig::default(), 99);
    let mut surface = RecordingSurface::new();
    let mut clock = VirtualClock::new();
    let at = Point::new(50.0, 60.0);
    let id = field.spawn_burst(at, &mut surface, &mut clock).unwrap();

    for p in field.particles(id).unwrap() {
        assert_eq!(p.position, at);
        let speed = p.velocity.hypot();
        assert!((1.0 - 1e-9..6.0).contains(&speed), "speed {speed}");
        assert!((2.0..5.0).contains(&p.size));
        assert!(p.color.r >= 180 && p.color.g >= 140 && p.color.b >= 100);
    }
}

#[test]
fn particles_move_by_velocity_each_tick() {
    let mut field = ParticleField::new(BurstConfig::default(), 5);
    let mut surface = RecordingSurface::new();
    let mut clock = VirtualClock::new();
    let id = field.spawn_burst(Point::ZERO, &mut surface, &mut clock).unwrap();
    let before: Vec<Particle> = field.particles(id).unwrap().to_vec();

    clock.pop_due(u64::MAX);
    field.tick(id, &mut surface, &mut clock);
    for (old, new) in before.iter().zip(field.particles(id).unwrap()) {
        assert_eq!(new.position, old.position + old.velocity);
        assert_eq!(new.age_ms, 40);
        let (center, _) = match surface.get(new.handle).unwrap().shape {
            crate::render::surface::Shape::Dot { center, radius } => (center, radius),
            _ => panic!("particle should be a dot"),
        };
        assert_eq!(center, new.position);
    }
}

#[test]
fn concurrent_bursts_are_independent() {
    let mut field = ParticleField::new(BurstConfig::default(), 2);
    let mut surface = RecordingSurface::new();
    let mut clock = VirtualClock::new();
    let a = field.spawn_burst(Point::ZERO, &mut surface, &mut clock).unwrap();
    while let Some(TimerTask::Particles { burst }) = clock.pop_due(200) {
        field.tick(burst, &mut surface, &mut clock);
    }
    clock.set_now(200);
    let b = field.spawn_burst(Point::new(5.0, 5.0), &mut surface, &mut clock).unwrap();
    assert_ne!(a, b);
    assert_eq!(field.active_bursts(), 2);

    // Burst `a` is due first and dies at t=600; `b` lives until t=800.
    while clock.next_due().is_some_and(|due| due <= 600) {
        if let Some(TimerTask::Particles { burst }) = clock.pop_due(600) {
            field.tick(burst, &mut surface, &mut clock);
        }
    }
    assert!(field.particles(a).is_none());
    assert_eq!(field.particles(b).map(|p| p.len()), Some(10));

    drive(&mut field, &mut surface, &mut clock);
    assert_eq!(clock.now_ms(), 800);
    assert_eq!(field.active_bursts(), 0);
}

#[test]
fn clear_cancels_timers_and_deletes_shapes() {
    let mut field = ParticleField::new(BurstConfig::default(), 3);
    let mut surface = RecordingSurface::new();
    let mut clock = VirtualClock::new();
    field.spawn_burst(Point::ZERO, &mut surface, &mut clock);
    field.spawn_burst(Point::ZERO, &mut surface, &mut clock);
    field.clear(&mut surface, &mut clock);
    assert_eq!(field.active_particles(), 0);
    assert!(surface.is_empty());
    assert!(clock.is_idle());
}

#[test]
fn zero_count_spawns_nothing() {
    let mut field = ParticleField::new(BurstConfig::default(), 3);
    let mut surface = RecordingSurface::new();
    let mut clock = VirtualClock::new();
    let cfg = BurstConfig {
        count: 0,
        ..BurstConfig::default()
    };
    assert!(field.spawn_burst_with(Point::ZERO, &cfg, &mut surface, &mut clock).is_none());
    assert!(clock.is_idle());
}

#[test]
fn uneven_lifetime_rounds_up_to_whole_ticks() {
    let cfg = BurstConfig {
        lifetime_ms: 610,
        ..BurstConfig::default()
    };
    assert_eq!(cfg.ticks_to_live(), 16);
    let mut field = ParticleField::new(cfg, 8);
    let mut surface = RecordingSurface::new();
    let mut clock = VirtualClock::new();
    field.spawn_burst(Point::ZERO, &mut surface, &mut clock);
    assert_eq!(drive(&mut field, &mut surface, &mut clock), 16);
}

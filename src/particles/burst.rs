use std::collections::BTreeMap;

use crate::{
    foundation::core::{Point, Rgba8, Vec2},
    foundation::rng::Rng64,
    playback::scheduler::{Scheduler, TimerTask, TimerToken},
    render::surface::{Handle, RenderSurface},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BurstId(pub u64);

/// Parameters of one burst.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    pub count: usize,
    /// Radial speed is drawn from `[1, speed + 1)` pixels per tick.
    pub speed: f64,
    pub lifetime_ms: u32,
    pub tick_ms: u32,
    pub min_size: f64,
    pub max_size: f64,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: 10,
            speed: 5.0,
            lifetime_ms: 600,
            tick_ms: 40,
            min_size: 2.0,
            max_size: 5.0,
        }
    }
}

impl BurstConfig {
    /// Ticks a burst lives for: `ceil(lifetime / tick)`.
    pub fn ticks_to_live(&self) -> u32 {
        self.lifetime_ms.div_ceil(self.tick_ms.max(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Vec2,
    pub age_ms: u32,
    pub size: f64,
    pub color: Rgba8,
    pub handle: Handle,
}

#[derive(Clone, Debug)]
struct Burst {
    particles: Vec<Particle>,
    lifetime_ms: u32,
    tick_ms: u32,
    pending: Option<TimerToken>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Particles remain; another tick has been scheduled.
    Continue,
    /// Last particle expired; no further tick scheduled.
    Finished,
    /// Burst no longer exists (cleared by a rewind or load).
    Stale,
}

/// Decorative particle bursts spawned at stroke ends.
///
/// Each burst owns its particles and its own timer chain, which stops once the
/// burst is empty. Nothing here refers back to playback.
#[derive(Clone, Debug)]
pub struct ParticleField {
    cfg: BurstConfig,
    rng: Rng64,
    bursts: BTreeMap<BurstId, Burst>,
    next_id: u64,
}

impl ParticleField {
    pub fn new(cfg: BurstConfig, seed: u64) -> Self {
        Self {
            cfg,
            rng: Rng64::new(seed),
            bursts: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &BurstConfig {
        &self.cfg
    }

    pub fn active_bursts(&self) -> usize {
        self.bursts.len()
    }

    pub fn active_particles(&self) -> usize {
        self.bursts.values().map(|b| b.particles.len()).sum()
    }

    pub fn particles(&self, id: BurstId) -> Option<&[Particle]> {
        self.bursts.get(&id).map(|b| b.particles.as_slice())
    }

    /// Spawn a burst with the configured defaults.
    pub fn spawn_burst(
        &mut self,
        at: Point,
        surface: &mut dyn RenderSurface,
        scheduler: &mut dyn Scheduler,
    ) -> Option<BurstId> {
        let cfg = self.cfg;
        self.spawn_burst_with(at, &cfg, surface, scheduler)
    }

    /// Spawn `cfg.count` particles at `at` and schedule the burst's first tick.
    ///
    /// Returns `None` when the burst would be empty.
    pub fn spawn_burst_with(
        &mut self,
        at: Point,
        cfg: &BurstConfig,
        surface: &mut dyn RenderSurface,
        scheduler: &mut dyn Scheduler,
    ) -> Option<BurstId> {
        if cfg.count == 0 {
            return None;
        }
        let particles: Vec<Particle> = (0..cfg.count)
            .map(|_| {
                let angle = self.rng.next_f64_01() * std::f64::consts::TAU;
                let speed = self.rng.range_f64(1.0, cfg.speed + 1.0);
                let size = self.rng.range_f64(cfg.min_size, cfg.max_size);
                let color = pastel(&mut self.rng);
                Particle {
                    position: at,
                    velocity: Vec2::from_angle(angle) * speed,
                    age_ms: 0,
                    size,
                    color,
                    handle: surface.draw_dot(at, size, color),
                }
            })
            .collect();

        let id = BurstId(self.next_id);
        self.next_id += 1;
        let tick_ms = cfg.tick_ms.max(1);
        let pending = scheduler.schedule_after(tick_ms, TimerTask::Particles { burst: id });
        tracing::debug!(burst = id.0, count = particles.len(), x = at.x, y = at.y, "spawned burst");
        self.bursts.insert(
            id,
            Burst {
                particles,
                lifetime_ms: cfg.lifetime_ms,
                tick_ms,
                pending: Some(pending),
            },
        );
        Some(id)
    }

    /// Advance one burst by one tick.
    pub fn tick(
        &mut self,
        id: BurstId,
        surface: &mut dyn RenderSurface,
        scheduler: &mut dyn Scheduler,
    ) -> TickOutcome {
        let Some(burst) = self.bursts.get_mut(&id) else {
            return TickOutcome::Stale;
        };
        burst.pending = None;
        let (lifetime, tick) = (burst.lifetime_ms, burst.tick_ms);
        burst.particles.retain_mut(|p| {
            surface.move_by(p.handle, p.velocity);
            p.position += p.velocity;
            p.age_ms = p.age_ms.saturating_add(tick);
            if p.age_ms >= lifetime {
                surface.delete(p.handle);
                false
            } else {
                true
            }
        });

        if burst.particles.is_empty() {
            self.bursts.remove(&id);
            tracing::trace!(burst = id.0, "burst finished");
            return TickOutcome::Finished;
        }
        burst.pending = Some(scheduler.schedule_after(tick, TimerTask::Particles { burst: id }));
        TickOutcome::Continue
    }

    /// Destroy every burst: delete particle shapes and cancel their timers.
    pub fn clear(&mut self, surface: &mut dyn RenderSurface, scheduler: &mut dyn Scheduler) {
        for (_, burst) in std::mem::take(&mut self.bursts) {
            if let Some(token) = burst.pending {
                scheduler.cancel(token);
            }
            for p in burst.particles {
                surface.delete(p.handle);
            }
        }
    }

    /// Drop all bursts after the surface was wiped; only timers are cancelled.
    pub fn forget(&mut self, scheduler: &mut dyn Scheduler) {
        for (_, burst) in std::mem::take(&mut self.bursts) {
            if let Some(token) = burst.pending {
                scheduler.cancel(token);
            }
        }
    }
}

fn pastel(rng: &mut Rng64) -> Rgba8 {
    Rgba8::opaque(
        rng.range_u8(180, 255),
        rng.range_u8(140, 255),
        rng.range_u8(100, 255),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/particles/burst.rs"]
mod tests;

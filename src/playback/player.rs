use std::{fmt, path::Path};

use crate::{
    foundation::core::Point,
    foundation::error::KolamResult,
    particles::burst::{ParticleField, TickOutcome},
    patterns::grid::demo_file,
    playback::config::{PlayerConfig, clamp_step_delay},
    playback::scheduler::{Scheduler, TimerTask, TimerToken, VirtualClock},
    render::sink::{RenderSink, StepEffect},
    render::surface::{Handle, RenderSurface},
    sequence::{
        load::StrokeFile,
        model::AbsolutePoint,
        normalize::{UnitClass, normalize},
        resolve::{StartClass, resolve},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing rendered; cursor at 0.
    Idle,
    Playing,
    Paused,
    /// Cursor at `N`; every step has been rendered.
    AtEnd,
}

/// `index / total`, rendered as `Step: i / N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step: {} / {}", self.index, self.total)
    }
}

/// Steppable, reversible stroke animation.
///
/// The player owns the playback cursor and is the only thing that moves it.
/// It never blocks: continuous playback is a chain of timer tasks queued on the
/// injected [`Scheduler`], and the event loop hands each one back through
/// [`Player::fire`].
pub struct Player<S: Scheduler, R: RenderSurface> {
    cfg: PlayerConfig,
    scheduler: S,
    surface: R,

    label: Option<String>,
    dots: Vec<Point>,
    unit_class: UnitClass,
    start_class: StartClass,
    points: Vec<AbsolutePoint>,

    index: usize,
    state: PlaybackState,
    epoch: u64,
    pending: Option<TimerToken>,
    step_delay_ms: u32,

    sink: RenderSink,
    particles: ParticleField,
    grid: Vec<Handle>,
    grid_visible: bool,
}

impl<S: Scheduler, R: RenderSurface> Player<S, R> {
    pub fn new(cfg: PlayerConfig, scheduler: S, surface: R) -> KolamResult<Self> {
        cfg.validate()?;
        Ok(Self {
            scheduler,
            surface,
            label: None,
            dots: Vec::new(),
            unit_class: UnitClass::Pixel,
            start_class: StartClass::DeltaStart,
            points: Vec::new(),
            index: 0,
            state: PlaybackState::Idle,
            epoch: 0,
            pending: None,
            step_delay_ms: clamp_step_delay(cfg.step_delay_ms),
            sink: RenderSink::new(cfg.stroke),
            particles: ParticleField::new(cfg.burst, cfg.seed),
            grid: Vec::new(),
            grid_visible: cfg.grid.visible,
            cfg,
        })
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// Replace the current sequence. The surface is wiped and playback returns to `Idle`.
    #[tracing::instrument(skip(self, file), fields(steps = file.seq.len()))]
    pub fn load(&mut self, file: StrokeFile) {
        self.cancel_pending();
        self.particles.forget(&mut self.scheduler);
        self.surface.clear();
        self.sink.forget();
        self.grid.clear();

        let normalized = normalize(&file.seq, &self.cfg.normalize);
        let resolved = resolve(
            &normalized.sequence,
            self.cfg.start_point(),
            &self.cfg.resolve,
        );
        self.unit_class = normalized.class;
        self.start_class = resolved.start;
        self.points = resolved.points;
        self.dots = file.dots;
        self.label = file.label;
        self.index = 0;
        self.state = PlaybackState::Idle;

        if self.grid_visible {
            self.draw_grid();
        }
        tracing::info!(
            steps = self.points.len(),
            units = ?self.unit_class,
            start = ?self.start_class,
            "loaded sequence"
        );
    }

    /// Parse, then load. On error nothing about the current sequence changes.
    pub fn load_json(&mut self, json: &str) -> KolamResult<()> {
        let file = StrokeFile::from_json_str(json)?;
        self.load(file);
        Ok(())
    }

    pub fn load_path(&mut self, path: &Path) -> KolamResult<()> {
        let file = StrokeFile::open(path)?;
        self.load(file);
        Ok(())
    }

    pub fn load_demo(&mut self) {
        self.load(demo_file());
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    /// Start continuous playback: one step now, the rest on the timer.
    pub fn play(&mut self) {
        if self.points.is_empty() || self.index >= self.points.len() {
            return;
        }
        if self.state == PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Playing;
        self.epoch += 1;
        tracing::debug!(index = self.index, epoch = self.epoch, "play");
        self.playback_tick();
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.cancel_pending();
        self.state = PlaybackState::Paused;
        tracing::debug!(index = self.index, "pause");
    }

    pub fn toggle_play(&mut self) {
        if self.state == PlaybackState::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Render the step under the cursor and advance. Returns `false` at the end.
    pub fn step_forward(&mut self) -> bool {
        if self.index >= self.points.len() {
            return false;
        }
        self.render_current();
        if self.index >= self.points.len() {
            self.finish();
        } else if self.state == PlaybackState::Idle {
            self.state = PlaybackState::Paused;
        }
        true
    }

    /// Undo the last step. Returns `false` when nothing has been rendered.
    ///
    /// The particle layer is not rewound; bursts already in flight finish on their own.
    pub fn step_back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.sink.undo_step(self.index, &mut self.surface);
        if self.state == PlaybackState::AtEnd {
            self.state = PlaybackState::Paused;
        }
        if self.index == 0 && self.state == PlaybackState::Paused {
            self.state = PlaybackState::Idle;
        }
        tracing::trace!(index = self.index, "step back");
        true
    }

    /// Back to `Idle`: all strokes and particles removed, grid dots kept.
    pub fn rewind(&mut self) {
        self.cancel_pending();
        self.sink.clear(&mut self.surface);
        self.particles.clear(&mut self.surface, &mut self.scheduler);
        self.index = 0;
        self.state = PlaybackState::Idle;
        tracing::debug!("rewind");
    }

    /// Dispatch a timer task queued by this player.
    pub fn fire(&mut self, task: TimerTask) {
        match task {
            TimerTask::Playback { epoch } => {
                if self.state != PlaybackState::Playing || epoch != self.epoch {
                    tracing::trace!(epoch, current = self.epoch, "stale playback tick");
                    return;
                }
                self.pending = None;
                self.playback_tick();
            }
            TimerTask::Particles { burst } => {
                let outcome = self
                    .particles
                    .tick(burst, &mut self.surface, &mut self.scheduler);
                if outcome == TickOutcome::Stale {
                    tracing::trace!(burst = burst.0, "stale particle tick");
                }
            }
        }
    }

    pub fn set_step_delay_ms(&mut self, ms: u32) {
        self.step_delay_ms = clamp_step_delay(ms);
    }

    pub fn step_delay_ms(&self) -> u32 {
        self.step_delay_ms
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        if visible == self.grid_visible {
            return;
        }
        self.grid_visible = visible;
        if visible {
            self.draw_grid();
        } else {
            for h in self.grid.drain(..) {
                self.surface.delete(h);
            }
        }
    }

    pub fn toggle_grid(&mut self) {
        self.set_grid_visible(!self.grid_visible);
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            index: self.index,
            total: self.points.len(),
        }
    }

    pub fn points(&self) -> &[AbsolutePoint] {
        &self.points
    }

    pub fn sink(&self) -> &RenderSink {
        &self.sink
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn dots(&self) -> &[Point] {
        &self.dots
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn unit_class(&self) -> UnitClass {
        self.unit_class
    }

    pub fn start_class(&self) -> StartClass {
        self.start_class
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.cfg
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn playback_tick(&mut self) {
        if self.index >= self.points.len() {
            self.finish();
            return;
        }
        self.render_current();
        if self.index >= self.points.len() {
            self.finish();
        } else {
            let token = self
                .scheduler
                .schedule_after(self.step_delay_ms, TimerTask::Playback { epoch: self.epoch });
            self.pending = Some(token);
        }
    }

    fn render_current(&mut self) {
        let i = self.index;
        let effect = self.sink.render_step(&self.points, i, &mut self.surface);
        if let Some(StepEffect::Lift {
            burst_at: Some(at),
        }) = effect
        {
            self.particles
                .spawn_burst(at, &mut self.surface, &mut self.scheduler);
        }
        self.index = i + 1;
    }

    fn finish(&mut self) {
        self.cancel_pending();
        self.state = PlaybackState::AtEnd;
        tracing::debug!(steps = self.points.len(), "reached end");
    }

    /// Invalidate any queued playback tick.
    fn cancel_pending(&mut self) {
        self.epoch += 1;
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }

    fn draw_grid(&mut self) {
        let style = self.cfg.grid;
        self.grid = self
            .dots
            .iter()
            .map(|&d| self.surface.draw_dot(d, style.radius, style.color))
            .collect();
    }
}

impl<R: RenderSurface> Player<VirtualClock, R> {
    /// Fire every timer due within the next `ms` milliseconds, then move the clock there.
    pub fn advance(&mut self, ms: u64) -> usize {
        let until = self.scheduler.now_ms().saturating_add(ms);
        self.advance_to(until)
    }

    /// Fire every timer due at or before `until_ms`.
    pub fn advance_to(&mut self, until_ms: u64) -> usize {
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due(until_ms) {
            self.fire(task);
            fired += 1;
        }
        self.scheduler.set_now(until_ms);
        fired
    }

    /// Fire timers until none remain or `max_tasks` have fired.
    pub fn run_until_idle(&mut self, max_tasks: usize) -> usize {
        let mut fired = 0;
        while fired < max_tasks {
            let Some(task) = self.scheduler.pop_due(u64::MAX) else {
                break;
            };
            self.fire(task);
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;

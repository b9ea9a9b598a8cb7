//! Kolam is a steppable, reversible player for pen-stroke animations drawn over a dot grid.
//!
//! A stroke file is a list of `[dx, dy, pen]` triples. Playback turns it into pixels in
//! three stages:
//!
//! 1. **Normalize**: detect unit-scaled deltas and rescale them to pixels ([`normalize`]).
//! 2. **Resolve**: accumulate deltas into absolute points from a start position ([`resolve`]).
//! 3. **Play**: a [`Player`] renders one step at a time onto a [`RenderSurface`], driven by
//!    timer tasks queued on a [`Scheduler`], and can undo any step it has drawn.
//!
//! A pen-lift step past the first emits a short-lived particle burst at the point before it.
//!
//! Nothing here blocks or spawns threads: the host event loop (or [`VirtualClock`] in tests
//! and the CLI) owns time, and every timer task is dispatched back through [`Player::fire`].
#![forbid(unsafe_code)]

pub mod foundation;
pub mod particles;
pub mod patterns;
pub mod playback;
pub mod render;
pub mod sequence;

pub use foundation::core::{Canvas, Pen, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{KolamError, KolamResult};
pub use foundation::rng::Rng64;
pub use particles::burst::{BurstConfig, BurstId, Particle, ParticleField, TickOutcome};
pub use patterns::dataset::{DatasetOptions, dataset_sample, generate_dataset};
pub use patterns::grid::{demo_file, diamond_strokes, dot_grid, spiral_stroke, strokes_to_steps};
pub use playback::config::{GridStyle, PlayerConfig, clamp_step_delay};
pub use playback::player::{PlaybackState, Player, Progress};
pub use playback::scheduler::{Scheduler, TimerTask, TimerToken, VirtualClock};
pub use render::raster::{FrameRGBA, rasterize, save_png};
pub use render::sink::{RenderSink, RenderedPrimitive, StepEffect, StrokeStyle};
pub use render::surface::{Handle, RecordingSurface, RenderSurface, Shape, SurfaceItem};
pub use sequence::load::StrokeFile;
pub use sequence::model::{AbsolutePoint, CanonicalSequence, StrokeStep};
pub use sequence::normalize::{NormalizeConfig, Normalized, UnitClass, normalize};
pub use sequence::resolve::{ResolveConfig, Resolved, StartClass, resolve};

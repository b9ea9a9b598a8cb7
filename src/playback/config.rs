use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::core::{Canvas, Point, Rgba8},
    foundation::error::{KolamError, KolamResult},
    particles::burst::BurstConfig,
    render::sink::StrokeStyle,
    sequence::{normalize::NormalizeConfig, resolve::ResolveConfig},
};

pub const MIN_STEP_DELAY_MS: u32 = 5;
pub const MAX_STEP_DELAY_MS: u32 = 200;

pub fn clamp_step_delay(ms: u32) -> u32 {
    ms.clamp(MIN_STEP_DELAY_MS, MAX_STEP_DELAY_MS)
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridStyle {
    pub visible: bool,
    pub radius: f64,
    pub color: Rgba8,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            visible: true,
            radius: 3.0,
            color: Rgba8::BLACK,
        }
    }
}

/// Everything tunable about playback. Any subset of fields may be given in JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub canvas: Canvas,
    /// Pen position before the first step; defaults to 25%/30% of the canvas.
    pub start: Option<Point>,
    pub step_delay_ms: u32,
    pub normalize: NormalizeConfig,
    pub resolve: ResolveConfig,
    pub burst: BurstConfig,
    pub stroke: StrokeStyle,
    pub grid: GridStyle,
    pub background: Rgba8,
    pub seed: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            start: None,
            step_delay_ms: 30,
            normalize: NormalizeConfig::default(),
            resolve: ResolveConfig::default(),
            burst: BurstConfig::default(),
            stroke: StrokeStyle::default(),
            grid: GridStyle::default(),
            background: Rgba8::WHITE,
            seed: 0x6b6f_6c61_6d,
        }
    }
}

impl PlayerConfig {
    pub fn start_point(&self) -> Point {
        self.start.unwrap_or_else(|| self.canvas.default_start())
    }

    pub fn from_json_str(s: &str) -> KolamResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| KolamError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn open(path: &Path) -> KolamResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> KolamResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(KolamError::validation("canvas width/height must be > 0"));
        }
        if let Some(p) = self.start
            && !(p.x.is_finite() && p.y.is_finite())
        {
            return Err(KolamError::validation("start point must be finite"));
        }
        let n = &self.normalize;
        if n.sample_len == 0 {
            return Err(KolamError::validation("normalize.sample_len must be > 0"));
        }
        if !(n.threshold.is_finite() && n.scale.is_finite() && n.scale > 0.0) {
            return Err(KolamError::validation(
                "normalize.threshold must be finite and normalize.scale > 0",
            ));
        }
        if !self.resolve.absolute_start_threshold.is_finite() {
            return Err(KolamError::validation(
                "resolve.absolute_start_threshold must be finite",
            ));
        }
        let b = &self.burst;
        if b.lifetime_ms == 0 || b.tick_ms == 0 {
            return Err(KolamError::validation(
                "burst.lifetime_ms and burst.tick_ms must be > 0",
            ));
        }
        if !(b.speed.is_finite() && b.speed >= 0.0) {
            return Err(KolamError::validation("burst.speed must be >= 0"));
        }
        if !(b.min_size.is_finite()
            && b.max_size.is_finite()
            && 0.0 <= b.min_size
            && b.min_size <= b.max_size)
        {
            return Err(KolamError::validation(
                "burst sizes must satisfy 0 <= min <= max",
            ));
        }
        let st = &self.stroke;
        if !(st.line_width.is_finite()
            && st.line_width > 0.0
            && st.origin_dot_radius.is_finite()
            && st.origin_dot_radius >= 0.0)
        {
            return Err(KolamError::validation(
                "stroke.line_width must be > 0 and origin_dot_radius >= 0",
            ));
        }
        if !(self.grid.radius.is_finite() && self.grid.radius >= 0.0) {
            return Err(KolamError::validation("grid.radius must be >= 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/config.rs"]
mod tests;

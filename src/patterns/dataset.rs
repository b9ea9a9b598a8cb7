use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::core::Point,
    foundation::error::{KolamError, KolamResult},
    foundation::rng::Rng64,
    patterns::grid::{diamond_strokes, dot_grid, spiral_stroke, strokes_to_steps},
    sequence::{load::StrokeFile, normalize::NormalizeConfig},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DatasetOptions {
    pub count: usize,
    pub rows: usize,
    pub cols: usize,
    /// Grid spacing in pixels; deltas are divided by it on export.
    pub spacing: f64,
    pub seed: u64,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            count: 200,
            rows: 5,
            cols: 5,
            spacing: 40.0,
            seed: 0,
        }
    }
}

impl DatasetOptions {
    pub fn validate(&self) -> KolamResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(KolamError::validation("dataset grid must be at least 1x1"));
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(KolamError::validation("dataset spacing must be > 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Family {
    DiamondGrid,
    Spiral,
}

impl Family {
    fn label(self) -> &'static str {
        match self {
            Self::DiamondGrid => "diamond_grid",
            Self::Spiral => "spiral",
        }
    }
}

/// One randomly chosen pattern, in normalized (spacing-divided) units.
///
/// The grid sits two spacings in from the origin, so the first step is read as an
/// absolute start on load. `dots` are written in the pixel frame playback rescales
/// the steps into (`NormalizeConfig::default().scale` per grid cell), so a loaded
/// sample draws onto its own dots.
pub fn dataset_sample(rng: &mut Rng64, opts: &DatasetOptions) -> StrokeFile {
    let family = *rng
        .pick(&[Family::DiamondGrid, Family::Spiral])
        .unwrap_or(&Family::DiamondGrid);
    let margin = 2.0 * opts.spacing;
    let dots = dot_grid(opts.rows, opts.cols, opts.spacing, Point::new(margin, margin));
    let strokes = match family {
        Family::DiamondGrid => diamond_strokes(&dots, opts.spacing * 0.4, 12),
        Family::Spiral => {
            let center = Point::new(
                margin + (opts.cols - 1) as f64 * opts.spacing / 2.0,
                margin + (opts.rows - 1) as f64 * opts.spacing / 2.0,
            );
            let turns = *rng.pick(&[2usize, 3, 4]).unwrap_or(&3);
            vec![spiral_stroke(center, opts.spacing * 0.5, turns, 80)]
        }
    };
    let seq = strokes_to_steps(&strokes)
        .into_iter()
        .map(|s| s.scaled(1.0 / opts.spacing))
        .collect();
    let to_playback = NormalizeConfig::default().scale / opts.spacing;
    StrokeFile {
        seq,
        dots: dots
            .into_iter()
            .map(|d| (d.to_vec2() * to_playback).to_point())
            .collect(),
        label: Some(family.label().to_string()),
    }
}

/// Write `opts.count` stroke files plus a `meta.json` index into `out_dir`.
#[tracing::instrument(skip(opts), fields(count = opts.count))]
pub fn generate_dataset(out_dir: &Path, opts: &DatasetOptions) -> KolamResult<Vec<PathBuf>> {
    opts.validate()?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create dataset dir '{}'", out_dir.display()))?;

    let mut rng = Rng64::new(opts.seed);
    let mut names = Vec::with_capacity(opts.count);
    let mut paths = Vec::with_capacity(opts.count);
    for i in 0..opts.count {
        let name = format!("kolam_{i:04}.json");
        let path = out_dir.join(&name);
        dataset_sample(&mut rng, opts).save(&path)?;
        names.push(name);
        paths.push(path);
    }

    let meta = serde_json::to_string(&names).map_err(|e| KolamError::serde(e.to_string()))?;
    let meta_path = out_dir.join("meta.json");
    std::fs::write(&meta_path, meta)
        .with_context(|| format!("write '{}'", meta_path.display()))?;
    tracing::info!(files = paths.len(), dir = %out_dir.display(), "generated dataset");
    Ok(paths)
}

#[cfg(test)]
#[path = "../../tests/unit/patterns/dataset.rs"]
mod tests;

use crate::sequence::model::{CanonicalSequence, StrokeStep};

/// Thresholds for best-effort unit inference.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// How many leading steps are sampled.
    pub sample_len: usize,
    /// Mean absolute delta below which the sequence is treated as normalized.
    pub threshold: f64,
    /// Pixel scale applied to normalized sequences.
    pub scale: f64,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            sample_len: 50,
            threshold: 2.5,
            scale: 40.0,
        }
    }
}

/// What the normalizer concluded about a raw sequence's units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnitClass {
    /// Unit-range deltas; scaled up by [`NormalizeConfig::scale`].
    Normalized,
    /// Already pixel deltas; passed through.
    Pixel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    pub sequence: CanonicalSequence,
    pub class: UnitClass,
    /// Mean absolute delta over the sample; `None` for an empty input.
    pub sample_mean: Option<f64>,
}

/// Mean of `|dx|` and `|dy|` over the first `sample_len` steps, both axes pooled.
pub fn sample_mean_abs(raw: &[StrokeStep], sample_len: usize) -> Option<f64> {
    let sample = &raw[..raw.len().min(sample_len)];
    if sample.is_empty() {
        return None;
    }
    let sum: f64 = sample.iter().map(|s| s.dx.abs() + s.dy.abs()).sum();
    Some(sum / (2 * sample.len()) as f64)
}

/// Classify without rescaling. Empty input classifies as [`UnitClass::Pixel`].
pub fn classify_units(raw: &[StrokeStep], cfg: &NormalizeConfig) -> UnitClass {
    match sample_mean_abs(raw, cfg.sample_len) {
        Some(mean) if mean < cfg.threshold => UnitClass::Normalized,
        _ => UnitClass::Pixel,
    }
}

/// Rescale a raw sequence into pixel-scale deltas.
///
/// This is a heuristic, not a classifier: a pixel sequence made of very short
/// moves will be mistaken for a normalized one.
#[tracing::instrument(skip(raw), fields(steps = raw.len()))]
pub fn normalize(raw: &[StrokeStep], cfg: &NormalizeConfig) -> Normalized {
    let sample_mean = sample_mean_abs(raw, cfg.sample_len);
    let class = classify_units(raw, cfg);
    let steps = match class {
        UnitClass::Normalized => raw.iter().map(|s| s.scaled(cfg.scale)).collect(),
        UnitClass::Pixel => raw.to_vec(),
    };
    tracing::debug!(?class, ?sample_mean, "normalized stroke sequence");
    Normalized {
        sequence: CanonicalSequence::from_pixel_steps(steps),
        class,
        sample_mean,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/normalize.rs"]
mod tests;

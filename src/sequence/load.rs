use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use serde_json::Value;

use crate::{
    foundation::core::{Pen, Point},
    foundation::error::{KolamError, KolamResult},
    sequence::model::StrokeStep,
};

/// Contents of a persisted stroke-sequence file.
///
/// Accepted on disk either as `{"seq": [...], "dots": [...], "label": "..."}` or
/// as a bare `[[dx, dy, pen], ...]` array.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeFile {
    pub seq: Vec<StrokeStep>,
    pub dots: Vec<Point>,
    pub label: Option<String>,
}

#[derive(serde::Serialize)]
struct StrokeFileWire<'a> {
    seq: Vec<[f64; 3]>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dots: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
}

impl StrokeFile {
    pub fn new(seq: Vec<StrokeStep>) -> Self {
        Self {
            seq,
            dots: Vec::new(),
            label: None,
        }
    }

    #[tracing::instrument(skip(s), fields(bytes = s.len()))]
    pub fn from_json_str(s: &str) -> KolamResult<Self> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| KolamError::malformed(format!("invalid JSON: {e}")))?;
        Self::from_value(&value)
    }

    pub fn from_reader(r: impl std::io::Read) -> KolamResult<Self> {
        let value: Value = serde_json::from_reader(r)
            .map_err(|e| KolamError::malformed(format!("invalid JSON: {e}")))?;
        Self::from_value(&value)
    }

    pub fn open(path: &Path) -> KolamResult<Self> {
        let f = File::open(path).with_context(|| format!("open stroke file '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn from_value(value: &Value) -> KolamResult<Self> {
        match value {
            Value::Array(steps) => Ok(Self::new(parse_steps(steps)?)),
            Value::Object(map) => {
                let Some(seq) = map.get("seq") else {
                    return Err(KolamError::malformed(
                        "object must contain 'seq' (list of [dx,dy,pen])",
                    ));
                };
                let Value::Array(steps) = seq else {
                    return Err(KolamError::malformed("'seq' must be a list"));
                };
                let dots = match map.get("dots") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Array(dots)) => parse_dots(dots)?,
                    Some(_) => return Err(KolamError::malformed("'dots' must be a list")),
                };
                let label = match map.get("label") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(_) => return Err(KolamError::malformed("'label' must be a string")),
                };
                let out = Self {
                    seq: parse_steps(steps)?,
                    dots,
                    label,
                };
                tracing::debug!(
                    steps = out.seq.len(),
                    dots = out.dots.len(),
                    label = out.label.as_deref().unwrap_or(""),
                    "parsed stroke file"
                );
                Ok(out)
            }
            _ => Err(KolamError::malformed(
                "JSON must be an object containing 'seq' or a list of [dx,dy,pen]",
            )),
        }
    }

    /// Object-form JSON; `dots` and `label` are omitted when absent.
    pub fn to_json_string(&self) -> KolamResult<String> {
        let wire = StrokeFileWire {
            seq: self.seq.iter().map(|s| s.to_triple()).collect(),
            dots: self.dots.iter().map(|p| [p.x, p.y]).collect(),
            label: self.label.as_deref(),
        };
        serde_json::to_string(&wire).map_err(|e| KolamError::serde(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> KolamResult<()> {
        let json = self.to_json_string()?;
        std::fs::write(path, json)
            .with_context(|| format!("write stroke file '{}'", path.display()))?;
        Ok(())
    }
}

fn parse_steps(items: &[Value]) -> KolamResult<Vec<StrokeStep>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let [dx, dy, pen] = numbers::<3>(item)
                .ok_or_else(|| KolamError::malformed(format!("step {i}: expected [dx, dy, pen]")))?;
            let pen = Pen::from_flag(pen).ok_or_else(|| {
                KolamError::malformed(format!("step {i}: pen flag must be 0 or 1, got {pen}"))
            })?;
            Ok(StrokeStep::new(dx, dy, pen))
        })
        .collect()
}

fn parse_dots(items: &[Value]) -> KolamResult<Vec<Point>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let [x, y] = numbers::<2>(item)
                .ok_or_else(|| KolamError::malformed(format!("dot {i}: expected [x, y]")))?;
            Ok(Point::new(x, y))
        })
        .collect()
}

fn numbers<const N: usize>(item: &Value) -> Option<[f64; N]> {
    let Value::Array(xs) = item else {
        return None;
    };
    if xs.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, x) in out.iter_mut().zip(xs) {
        let v = x.as_f64()?;
        if !v.is_finite() {
            return None;
        }
        *slot = v;
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/load.rs"]
mod tests;

//! Stroke sequences: file IO, unit normalization, and absolute resolution.

pub mod load;
pub mod model;
pub mod normalize;
pub mod resolve;

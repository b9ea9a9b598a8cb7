//! Stroke generators: the built-in demo and the training-data exporter.

pub mod dataset;
pub mod grid;

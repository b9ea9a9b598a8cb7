//! Playback controller plus the timer port that drives it.

pub mod config;
pub mod player;
pub mod scheduler;

//! Drawing: the surface port, the per-step primitive stack, and CPU snapshots.

pub mod raster;
pub mod sink;
pub mod surface;

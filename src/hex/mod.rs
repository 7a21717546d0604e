//! Axial hex coordinates, neighbor/distance math, and the tile map entities
//! live on.
//!
//! This mirrors the role `space.rs` plays for the square-grid environment
//! this crate is descended from, generalized to a hex grid: coordinates are
//! hand-rolled rather than reached for an external hex-math crate, because
//! the neighbor ordering is part of the scripting contract scripts can
//! index into directly, and must stay fixed rather than following whatever
//! convention a third-party crate happens to use.

pub use coord::{HexCoord, Orientation};
pub use grid::{HexGrid, Tile};

mod coord;
mod grid;

//! A plain, serde-friendly settings surface.
//!
//! The core never touches a filesystem — on-disk configuration is an
//! external concern; an external loader builds a [`CoreConfig`]
//! from whatever format the host game uses and hands it to
//! [`crate::scheduler::TickScheduler::new`] and
//! [`crate::runner::TickRunner::new`].

use serde::{Deserialize, Serialize};

use crate::hex::Orientation;

/// Default spatial-query output buffer capacity. At least 100 entries are
/// required for `findEntitiesAt`/`findNearbyEntities` to be useful at normal
/// population densities; this is the value used unless a host overrides it.
pub const DEFAULT_QUERY_CAPACITY: usize = 128;

/// Construction settings for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Ticks per second the [`crate::scheduler::TickScheduler`] runs at.
    pub tick_rate: f32,
    /// The grid's hex orientation, fixing the neighbor order scripts see.
    pub orientation: Orientation,
    /// Capacity of the stack buffers `world.findEntitiesAt` /
    /// `world.findNearbyEntities` materialize results into before copying
    /// them to the script. Queries beyond this are silently truncated.
    pub query_capacity: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            orientation: Orientation::PointyTop,
            query_capacity: DEFAULT_QUERY_CAPACITY,
        }
    }
}

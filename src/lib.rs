//! A deterministic, tick-driven simulation core for a hex-grid automation
//! game.
//!
//! # Overview
//! `hexautomata-core` owns the fixed-timestep scheduler, the entity store,
//! the hex-coordinate grid, and an embedded Lua VM that drives per-entity
//! scripted behavior. Given identical initial state, identical script
//! sources, and identical per-tick elapsed-time inputs, a run produces a
//! byte-identical sequence of states — nothing here reads the wall clock,
//! spawns threads, or otherwise introduces nondeterminism.
//!
//! The crate draws a hard line between what it owns and what it expects from
//! the host application: world generation, entity seeding, rendering, input,
//! and persistence are all external collaborators. This crate's only stable
//! entry point for driving the simulation forward is
//! [`runner::TickRunner::run_ticks`].
//!
//! Entities are a closed set of roles (see [`entity::Role`]) whose behavior
//! comes entirely from an attached Lua script, not from a Rust trait impl —
//! scripts observe and act on the world exclusively through the `entity` and
//! `world` function tables installed at invocation time (see [`vm`]).

pub use config::CoreConfig;
pub use entity::{ActionQueue, Entity, EntityAction, EntityId, EntityManager, Role};
pub use error::CoreError;
pub use hex::{HexCoord, HexGrid, Orientation, Tile};
pub use runner::{DebugView, TickRunner};
pub use scheduler::TickScheduler;

pub mod config;
pub mod entity;
pub mod error;
pub mod hex;
pub mod log;
pub mod runner;
pub mod scheduler;
pub mod vm;

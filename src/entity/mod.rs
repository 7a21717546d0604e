//! Dense entity storage with stable ids, insertion-order iteration, and the
//! closed role set this core drives.
//!
//! Unlike the `Rc<RefCell<dyn Entity>>` trait-object store this crate is
//! descended from — appropriate there because `semeion` lets the *host
//! application* define arbitrary entity behavior in Rust — the entities this
//! core drives are a closed, concrete record type whose behavior comes from
//! an attached script, not from a Rust trait impl. The manager therefore
//! owns a flat `Vec<Entity>` plus an id index, the way a deterministic
//! simulation core wants: no indirection, no shared mutability, and
//! insertion order falls out of `Vec` push order for free.

pub use action::{ActionQueue, EntityAction};
pub use manager::EntityManager;

mod action;
mod manager;

use crate::hex::HexCoord;

/// A stable, monotonically increasing entity identifier. Never reused within
/// a run, even after the entity is destroyed and its storage compacted away.
pub type EntityId = u64;

/// The closed set of entity roles. `max_energy` is a pure function of this
/// value and is immutable for the entity's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Worker,
    Combat,
    Scout,
    Engineer,
}

impl Role {
    /// The role-dependent energy ceiling assigned at spawn and never changed
    /// afterwards.
    pub const fn max_energy(self) -> f32 {
        match self {
            Role::Worker => 100.0,
            Role::Combat => 150.0,
            Role::Scout => 80.0,
            Role::Engineer => 120.0,
        }
    }

    /// The name used on the scripting surface's `self.role` / `entity.getRole()`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Worker => "worker",
            Role::Combat => "combat",
            Role::Scout => "scout",
            Role::Engineer => "engineer",
        }
    }
}

/// A single simulated entity.
///
/// Invariants (enforced by [`EntityManager`] and the action-application step
/// of the tick runner, never by this struct's constructors alone):
/// - `0 <= energy <= max_energy` after every applied action.
/// - `!alive` implies `energy == 0`, and the entity is skipped by the tick
///   loop and excluded from every spatial query.
/// - `max_energy` never changes after spawn.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    position: HexCoord,
    role: Role,
    energy: f32,
    alive: bool,
    script: Option<String>,
}

impl Entity {
    fn spawn(id: EntityId, position: HexCoord, role: Role) -> Self {
        Self {
            id,
            position,
            role,
            energy: role.max_energy(),
            alive: true,
            script: None,
        }
    }

    pub const fn id(&self) -> EntityId {
        self.id
    }

    pub const fn position(&self) -> HexCoord {
        self.position
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub const fn energy(&self) -> f32 {
        self.energy
    }

    pub const fn max_energy(&self) -> f32 {
        self.role.max_energy()
    }

    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// True only if the entity is alive and has energy left to act with.
    pub fn is_active(&self) -> bool {
        self.alive && self.energy > 0.0
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// Attaches or replaces this entity's script source.
    pub fn set_script(&mut self, source: impl Into<String>) {
        self.script = Some(source.into());
    }

    /// Sets the entity's position. Used by action application only; the
    /// target need not already be present in the grid (teleport-style
    /// movement).
    pub(crate) fn set_position(&mut self, position: HexCoord) {
        self.position = position;
    }

    /// Adjusts energy by `delta`, clamping to `[0, max_energy]`.
    pub(crate) fn adjust_energy(&mut self, delta: f32) {
        self.energy = (self.energy + delta).clamp(0.0, self.max_energy());
    }

    /// Soft-deletes the entity: clears `alive` and zeroes `energy`.
    pub(crate) fn kill(&mut self) {
        self.alive = false;
        self.energy = 0.0;
    }
}

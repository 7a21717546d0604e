//! The per-tick script host — the heart of the core.
//!
//! Ties [`ScriptVm`], the `entity`/`world` API installers, [`EntityManager`],
//! [`HexGrid`], and [`TickScheduler`] together into the fixed per-tick
//! algorithm: run every scripted entity's source once, collecting its
//! decisions into a private [`ActionQueue`], then apply the queued actions
//! against its own state.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::entity::{ActionQueue, Entity, EntityAction, EntityId, EntityManager};
use crate::error::CoreError;
use crate::hex::{HexGrid, Orientation};
use crate::log::log_script_error;
use crate::scheduler::TickScheduler;
use crate::vm::{self, install_entity_api, install_world_api, MemoryHandle, ScriptVm};

/// Energy spent on a successful `move` action.
pub const MOVE_COST: f32 = 5.0;
/// Energy spent on a successful `harvest` action.
pub const HARVEST_COST: f32 = 10.0;

/// Drives the fixed-rate tick loop: scheduling, script invocation, and
/// action application.
///
/// Owns the world state a simulation run needs (grid, entities, VM,
/// scheduler) so that `run_ticks` is the crate's single stable external
/// entry point.
pub struct TickRunner {
    scheduler: TickScheduler,
    grid: HexGrid,
    entities: EntityManager,
    vm: ScriptVm,
    orientation: Orientation,
    query_capacity: usize,
    memory: HashMap<EntityId, MemoryHandle>,
}

impl TickRunner {
    /// Constructs a runner from a [`crate::config::CoreConfig`] and a
    /// pre-populated grid/entity manager (world generation and entity
    /// seeding are both external setup steps that run before the first
    /// tick).
    pub fn new(
        config: crate::config::CoreConfig,
        grid: HexGrid,
        entities: EntityManager,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            scheduler: TickScheduler::new(config.tick_rate),
            grid,
            entities,
            vm: ScriptVm::new()?,
            orientation: config.orientation,
            query_capacity: config.query_capacity,
            memory: HashMap::default(),
        })
    }

    /// The crate's stable `run_ticks(elapsed) -> n_ticks_executed` hook:
    /// advances the scheduler and runs that many logical ticks in full.
    pub fn run_ticks(&mut self, elapsed_seconds: f32) -> u32 {
        let n = self.scheduler.update(elapsed_seconds);
        for _ in 0..n {
            self.run_one_tick();
        }
        n
    }

    fn run_one_tick(&mut self) {
        let ids: Vec<EntityId> = self.entities.iter_alive().map(Entity::id).collect();
        for id in ids {
            self.run_entity(id);
        }
    }

    /// Runs one entity's script invocation and applies whatever it queued.
    fn run_entity(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        let Some(script) = entity.script() else {
            return;
        };
        let script = script.to_string();
        let entity = entity.clone();

        let handle = self.memory.remove(&id);
        let (queue, handle, err) = self.invoke_script(&entity, &script, handle);

        if let Some(handle) = handle {
            self.memory.insert(id, handle);
        }
        if let Some(err) = err {
            if err.is_loggable() {
                log_script_error(id, &err);
            }
        }

        self.apply_actions(id, &queue);
    }

    /// Installs the `entity`/`world` APIs and the `self`/`memory` globals
    /// inside one `Lua::scope`, executes the script, and returns the queued
    /// actions (empty on failure), the memory handle to keep around, and any
    /// error to log.
    ///
    /// The returned handle is `Some` whenever one exists to persist — the
    /// handle the invocation started with is always handed back unchanged on
    /// a failure path, so the entity's prior memory state survives the
    /// failure untouched rather than being dropped along with the error.
    /// It is `None` only when no handle could be obtained at all (allocating
    /// a fresh memory table itself failed).
    fn invoke_script(
        &self,
        entity: &Entity,
        script: &str,
        handle: Option<MemoryHandle>,
    ) -> (ActionQueue, Option<MemoryHandle>, Option<CoreError>) {
        let handle = match handle {
            Some(handle) => handle,
            None => match self.vm.create_memory_table() {
                Ok(handle) => handle,
                Err(err) => return (ActionQueue::new(), None, Some(err)),
            },
        };

        let queue = RefCell::new(ActionQueue::new());
        let vm = &self.vm;
        let grid = &self.grid;
        let entities = &self.entities;
        let orientation = self.orientation;
        let query_capacity = self.query_capacity;

        let outcome = vm.with_scope(|scope| {
            install_entity_api(vm.lua(), scope, entity, &queue)?;
            install_world_api(
                vm.lua(),
                scope,
                grid,
                entities,
                orientation,
                query_capacity,
            )?;

            let memory_table = vm
                .load_memory_table(&handle)
                .map_err(|err| mlua::Error::RuntimeError(err.to_string()))?;
            vm.lua().globals().set("memory", memory_table)?;

            vm.exec(script)?;

            vm.lua().globals().get::<_, mlua::Table>("memory")
        });

        match outcome {
            Ok(memory_table) => {
                let mut handle = handle;
                match vm.store_memory_table(&mut handle, memory_table) {
                    Ok(()) => (queue.into_inner(), Some(handle), None),
                    Err(err) => (ActionQueue::new(), Some(handle), Some(err)),
                }
            }
            Err(err) => {
                let classified = vm::classify(entity.id(), err);
                (ActionQueue::new(), Some(handle), Some(classified))
            }
        }
    }

    /// Applies every action `id` queued this tick, in order. A dead
    /// entity's queue is still drained and discarded, but every action is a
    /// no-op against it.
    fn apply_actions(&mut self, id: EntityId, queue: &ActionQueue) {
        for action in queue.actions() {
            let Some(entity) = self.entities.get_mut(id) else {
                return;
            };
            if !entity.is_alive() {
                continue;
            }
            match action {
                EntityAction::Move { target } => {
                    if entity.energy() >= MOVE_COST {
                        entity.adjust_energy(-MOVE_COST);
                        entity.set_position(*target);
                    }
                }
                EntityAction::Harvest { .. } => {
                    if entity.energy() >= HARVEST_COST {
                        entity.adjust_energy(-HARVEST_COST);
                    }
                }
                EntityAction::Consume { .. } => {}
            }
        }
    }

    /// Destroys an entity, releasing its memory-table registry slot first so
    /// the handle doesn't leak for the rest of the run. Returns whether the
    /// entity was alive beforehand, matching [`EntityManager::destroy`].
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<bool, CoreError> {
        if let Some(handle) = self.memory.remove(&id) {
            self.vm.release_memory(handle)?;
        }
        Ok(self.entities.destroy(id))
    }

    /// A read-only accessor for external collaborators (rendering,
    /// selection, interpolation). Reaches entity records, grid occupancy,
    /// and scheduler timing without exposing anything that would let a
    /// caller mutate simulation state outside the tick loop.
    pub fn debug_view(&self) -> DebugView<'_> {
        DebugView { runner: self }
    }
}

/// A read-only window into a [`TickRunner`] for external collaborators:
/// entity records, grid occupancy, and scheduler timing for rendering and
/// interpolation.
pub struct DebugView<'a> {
    runner: &'a TickRunner,
}

impl DebugView<'_> {
    /// Looks up an entity record by id, alive or dead.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.runner.entities.get(id)
    }

    /// Iterates alive entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.runner.entities.iter_alive()
    }

    /// Borrows the grid for occupancy queries.
    pub fn grid(&self) -> &HexGrid {
        &self.runner.grid
    }

    /// The scheduler's completed tick count.
    pub fn current_tick(&self) -> u64 {
        self.runner.scheduler.current_tick()
    }

    /// How far into the next tick the accumulator sits, `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        self.runner.scheduler.alpha()
    }

    /// Reads one field out of an entity's persistent memory table.
    ///
    /// For external introspection only (rendering a debug overlay, test
    /// assertions) — scripts themselves reach the same table through the
    /// `memory` global, never through this accessor. Returns `None` if the
    /// entity has not had a scripted invocation yet (so has no memory table)
    /// or the field isn't present.
    pub fn memory_field<V: mlua::FromLua>(&self, id: EntityId, field: &str) -> Option<V> {
        let handle = self.runner.memory.get(&id)?;
        let table = self.runner.vm.load_memory_table(handle).ok()?;
        table.get(field).ok()
    }
}

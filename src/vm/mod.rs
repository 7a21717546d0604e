//! The wrapper over the embedded scripting library.
//!
//! Single-threaded, one VM per simulation: nothing here is touched
//! concurrently. Construction loads only the safe subset of the Lua
//! standard library (`mlua::Lua::new()` already excludes `os`, `io`, `ffi`,
//! and `debug` — sandboxing further than that, e.g. instruction-count
//! limits, is deliberately out of scope for this core).

pub use entity_api::install_entity_api;
pub use world_api::install_world_api;

mod entity_api;
mod world_api;

use mlua::{Lua, RegistryKey, Table};

use crate::error::CoreError;

/// An opaque handle into the VM's registry for one entity's persistent
/// memory table. Valid for the lifetime of the entity; must be released
/// back to the VM via [`ScriptVm::release_memory`] on destroy, or the
/// registry slot leaks for the rest of the run.
#[derive(Debug)]
pub struct MemoryHandle(RegistryKey);

/// Owns the embedded Lua VM instance.
pub struct ScriptVm {
    lua: Lua,
}

impl ScriptVm {
    /// Constructs a fresh VM with the safe standard library loaded.
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self { lua: Lua::new() })
    }

    /// The VM's global table, for installing `self`/`memory`/`entity`/`world`.
    pub fn globals(&self) -> Table {
        self.lua.globals()
    }

    /// The underlying `Lua` instance, for API installers that need to call
    /// `create_table`/`create_function` directly.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Runs `source` to completion. Distinguishes load-time (parse) failures
    /// from runtime failures so the caller can classify them as
    /// [`CoreError::VmLoadError`] vs [`CoreError::VmRuntimeError`].
    pub fn exec(&self, source: &str) -> Result<(), mlua::Error> {
        self.lua.load(source).exec()
    }

    /// Runs a closure with exclusive, scoped access to the VM, allowing
    /// native functions registered inside `body` to borrow non-`'static`
    /// host state (the current entity, its action queue, the grid, the
    /// entity manager) for exactly the duration of one invocation.
    ///
    /// This replaces the lightuserdata-pointers-in-the-registry pattern a
    /// C-hosted VM uses for passing context into native callbacks: the
    /// Rust borrow checker enforces that those references cannot outlive
    /// the invocation, because `body` runs inside `Lua::scope`.
    pub fn with_scope<R>(
        &self,
        body: impl FnOnce(&mlua::Scope<'_, '_>) -> mlua::Result<R>,
    ) -> mlua::Result<R> {
        self.lua.scope(body)
    }

    /// Allocates a fresh, empty persistent memory table and returns a handle
    /// to it. Called lazily the first time an entity's script runs.
    pub fn create_memory_table(&self) -> Result<MemoryHandle, CoreError> {
        let table = self.lua.create_table().map_err(vm_alloc_error)?;
        let key = self
            .lua
            .create_registry_value(table)
            .map_err(vm_alloc_error)?;
        Ok(MemoryHandle(key))
    }

    /// Fetches the table referenced by `handle`.
    pub fn load_memory_table(&self, handle: &MemoryHandle) -> Result<Table, CoreError> {
        self.lua
            .registry_value(&handle.0)
            .map_err(vm_alloc_error)
    }

    /// Re-stores `table` under `handle`, replacing whatever it previously
    /// pointed at. Scripts normally mutate the table in place, in which
    /// case this just re-points the same registry slot at the same value;
    /// it also handles the rarer case of a script reassigning `memory`
    /// wholesale to a new table.
    pub fn store_memory_table(
        &self,
        handle: &mut MemoryHandle,
        table: Table,
    ) -> Result<(), CoreError> {
        let key = self
            .lua
            .create_registry_value(table)
            .map_err(vm_alloc_error)?;
        let old = std::mem::replace(&mut handle.0, key);
        self.lua.remove_registry_value(old).map_err(vm_alloc_error)
    }

    /// Releases a memory handle's registry slot. Required on entity
    /// destroy, or registry slots leak linearly with spawn count.
    pub fn release_memory(&self, handle: MemoryHandle) -> Result<(), CoreError> {
        self.lua.remove_registry_value(handle.0).map_err(vm_alloc_error)
    }
}

fn vm_alloc_error(err: mlua::Error) -> CoreError {
    CoreError::AllocationFailure(err.to_string())
}

/// Classifies a raw `mlua` error as a load-time (parse/syntax) failure or a
/// runtime failure, the two recoverable failure kinds a script invocation
/// can raise.
pub(crate) fn classify(
    entity: crate::entity::EntityId,
    err: mlua::Error,
) -> CoreError {
    match err {
        mlua::Error::SyntaxError { message, .. } => CoreError::VmLoadError { entity, message },
        other => CoreError::VmRuntimeError {
            entity,
            message: other.to_string(),
        },
    }
}

//! Installs the `entity` function table and the `self` snapshot table for
//! one script invocation.

use std::cell::RefCell;

use mlua::{Lua, Scope, Table, Value};

use crate::entity::{ActionQueue, Entity, EntityAction};
use crate::hex::HexCoord;

/// Installs `entity` (native functions) and `self` (a plain data snapshot)
/// as globals, scoped to the current invocation.
///
/// The `self` table is rebuilt from `entity` every call rather than mutated
/// in place: a live, mutated table would let one invocation's stale values
/// bleed into the next.
///
/// `queue` is a [`RefCell`] rather than a bare `&mut` so that the three
/// action-verb closures (`moveTo`, `harvest`, `consume`) can each hold their
/// own shared borrow of it inside the same [`Scope`] — only one is ever
/// actually called at a time, but the borrow checker has no way to know
/// that ahead of the script running.
pub fn install_entity_api<'scope>(
    lua: &'scope Lua,
    scope: &Scope<'scope, '_>,
    entity: &'scope Entity,
    queue: &'scope RefCell<ActionQueue>,
) -> mlua::Result<()> {
    let self_table = lua.create_table()?;
    self_table.set("id", entity.id() as i64)?;
    let position = lua.create_table()?;
    position.set("q", entity.position().q)?;
    position.set("r", entity.position().r)?;
    self_table.set("position", position)?;
    self_table.set("role", entity.role().as_str())?;
    self_table.set("energy", entity.energy())?;
    self_table.set("max_energy", entity.max_energy())?;
    lua.globals().set("self", self_table)?;

    let api = lua.create_table()?;

    api.set(
        "getId",
        scope.create_function(move |_, ()| Ok(entity.id() as i64))?,
    )?;
    api.set(
        "getPosition",
        scope.create_function(move |lua, ()| {
            let t = lua.create_table()?;
            t.set("q", entity.position().q)?;
            t.set("r", entity.position().r)?;
            Ok(t)
        })?,
    )?;
    api.set(
        "getEnergy",
        scope.create_function(move |_, ()| Ok(entity.energy()))?,
    )?;
    api.set(
        "getMaxEnergy",
        scope.create_function(move |_, ()| Ok(entity.max_energy()))?,
    )?;
    api.set(
        "getRole",
        scope.create_function(move |_, ()| Ok(entity.role().as_str()))?,
    )?;
    api.set(
        "isAlive",
        scope.create_function(move |_, ()| Ok(entity.is_alive()))?,
    )?;
    api.set(
        "isActive",
        scope.create_function(move |_, ()| Ok(entity.is_active()))?,
    )?;
    api.set(
        "moveTo",
        scope.create_function(move |_, target: Value| {
            Ok(enqueue_target_action(queue, &target, |target| {
                EntityAction::Move { target }
            }))
        })?,
    )?;
    api.set(
        "harvest",
        scope.create_function(move |_, target: Value| {
            Ok(enqueue_target_action(queue, &target, |target| {
                EntityAction::Harvest { target }
            }))
        })?,
    )?;
    api.set(
        "consume",
        scope.create_function(move |_, (resource_type, amount): (Value, Value)| {
            Ok(enqueue_consume(queue, resource_type, amount))
        })?,
    )?;

    lua.globals().set("entity", api)?;
    Ok(())
}

/// Parses a `{q, r}` table argument into a [`HexCoord`]. Any other shape —
/// wrong type, missing fields, non-integer fields — is an argument
/// validation failure: the caller enqueues nothing and returns `false`.
pub(super) fn parse_coord(value: &Value) -> Option<HexCoord> {
    let Value::Table(table) = value else {
        return None;
    };
    let q: i32 = table.get("q").ok()?;
    let r: i32 = table.get("r").ok()?;
    Some(HexCoord::new(q, r))
}

/// Shared body for `moveTo`/`harvest`: validate the `{q, r}` argument, and
/// if valid, queue whatever `make_action` builds from it.
fn enqueue_target_action(
    queue: &RefCell<ActionQueue>,
    target: &Value,
    make_action: impl FnOnce(HexCoord) -> EntityAction,
) -> bool {
    let Some(target) = parse_coord(target) else {
        return false;
    };
    queue.borrow_mut().add(make_action(target));
    true
}

/// `consume`'s argument validation and enqueue step. This action is a no-op
/// reserved for a future resource subsystem, so the boolean returned to the
/// script is `false` on both the valid and invalid path — the distinction
/// only shows up in whether anything was enqueued.
fn enqueue_consume(queue: &RefCell<ActionQueue>, resource_type: Value, amount: Value) -> bool {
    let (Value::String(resource_type), Some(amount)) = (resource_type, as_u32(&amount)) else {
        return false;
    };
    let resource_type = resource_type.to_string_lossy().into_owned();
    queue
        .borrow_mut()
        .add(EntityAction::Consume { resource_type, amount });
    false
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Integer(i) => u32::try_from(*i).ok(),
        Value::Number(n) if n.fract() == 0.0 && *n >= 0.0 => Some(*n as u32),
        _ => None,
    }
}

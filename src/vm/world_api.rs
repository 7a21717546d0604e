//! Installs the `world` function table: grid queries and spatial searches,
//! bound read-only against the current tick's state.

use mlua::{Lua, Scope, Table, Value};

use super::entity_api::parse_coord;
use crate::entity::{EntityId, EntityManager, Role};
use crate::error::CoreError;
use crate::hex::{HexCoord, HexGrid, Orientation};
use crate::log::log_truncation;

fn role_from_str(s: &str) -> Option<Role> {
    match s {
        "worker" => Some(Role::Worker),
        "combat" => Some(Role::Combat),
        "scout" => Some(Role::Scout),
        "engineer" => Some(Role::Engineer),
        _ => None,
    }
}

fn coord_args(a: &Value, b: &Value) -> Option<HexCoord> {
    if let Some(coord) = parse_coord(a) {
        return Some(coord);
    }
    match (a, b) {
        (Value::Integer(q), Value::Integer(r)) => {
            Some(HexCoord::new(i32::try_from(*q).ok()?, i32::try_from(*r).ok()?))
        }
        _ => None,
    }
}

fn ids_to_sequence(lua: &Lua, ids: &[EntityId]) -> mlua::Result<Table> {
    let seq = lua.create_table()?;
    for (i, id) in ids.iter().enumerate() {
        seq.set(i + 1, *id as i64)?;
    }
    Ok(seq)
}

/// Installs `world`, scoped to the current invocation's borrow of the grid
/// and entity manager. `query_capacity` bounds the stack buffers spatial
/// queries are materialized into before being copied to the script; results
/// beyond it are silently truncated.
pub fn install_world_api<'scope>(
    lua: &'scope Lua,
    scope: &Scope<'scope, '_>,
    grid: &'scope HexGrid,
    manager: &'scope EntityManager,
    orientation: Orientation,
    query_capacity: usize,
) -> mlua::Result<()> {
    let api = lua.create_table()?;

    api.set(
        "getTileAt",
        scope.create_function(move |lua, (a, b): (Value, Value)| {
            let Some(coord) = coord_args(&a, &b) else {
                return Ok(Value::Nil);
            };
            match grid.tile_at(coord) {
                Some(tile) => {
                    let t = lua.create_table()?;
                    t.set("q", tile.coord().q)?;
                    t.set("r", tile.coord().r)?;
                    Ok(Value::Table(t))
                }
                None => Ok(Value::Nil),
            }
        })?,
    )?;

    api.set(
        "distance",
        scope.create_function(move |_, (a, b): (Value, Value)| {
            let (Some(a), Some(b)) = (parse_coord(&a), parse_coord(&b)) else {
                return Ok(Value::Nil);
            };
            Ok(Value::Integer(i64::from(a.distance(b))))
        })?,
    )?;

    api.set(
        "neighbors",
        scope.create_function(move |lua, center: Value| {
            let Some(center) = parse_coord(&center) else {
                return Ok(Value::Nil);
            };
            let seq = lua.create_table()?;
            for (i, n) in center.neighbors(orientation).iter().enumerate() {
                let t = lua.create_table()?;
                t.set("q", n.q)?;
                t.set("r", n.r)?;
                seq.set(i + 1, t)?;
            }
            Ok(Value::Table(seq))
        })?,
    )?;

    api.set(
        "findEntitiesAt",
        scope.create_function(move |lua, center: Value| {
            let Some(center) = parse_coord(&center) else {
                return Ok(Value::Nil);
            };
            let mut buf = vec![0 as EntityId; query_capacity];
            let n = manager.entities_at(center, &mut buf);
            if n == buf.len() {
                log_truncation(&CoreError::Truncation {
                    capacity: buf.len(),
                });
            }
            Ok(Value::Table(ids_to_sequence(lua, &buf[..n])?))
        })?,
    )?;

    api.set(
        "findNearbyEntities",
        scope.create_function(
            move |lua, (center, range, role): (Value, Value, Value)| {
                let Some(center) = parse_coord(&center) else {
                    return Ok(Value::Nil);
                };
                let Value::Integer(range) = range else {
                    return Ok(Value::Nil);
                };
                let Ok(range) = u32::try_from(range) else {
                    return Ok(Value::Nil);
                };
                let role = match role {
                    Value::Nil => None,
                    Value::String(s) => match role_from_str(&s.to_string_lossy()) {
                        Some(role) => Some(role),
                        None => return Ok(Value::Nil),
                    },
                    _ => return Ok(Value::Nil),
                };
                let mut buf = vec![0 as EntityId; query_capacity];
                let n = manager.nearby(center, range, role, &mut buf);
                if n == buf.len() {
                    log_truncation(&CoreError::Truncation {
                        capacity: buf.len(),
                    });
                }
                Ok(Value::Table(ids_to_sequence(lua, &buf[..n])?))
            },
        )?,
    )?;

    lua.globals().set("world", api)?;
    Ok(())
}

//! The command vocabulary a script queues, and the per-invocation buffer
//! that holds it until the tick runner drains and applies it.

/// A single queued command. Each variant owns whatever payload it needs;
/// nothing borrows from the script invocation that produced it, so an
/// action can outlive the VM call that queued it (the whole point of
/// collecting decisions first and applying them afterwards).
///
/// This is a small closed sum type by design: action application is a short
/// exhaustive match, not an open hierarchy, so a tagged variant is preferred
/// over any polymorphic dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction {
    /// Teleport to `target` if the entity can afford `MOVE_COST`.
    Move { target: crate::hex::HexCoord },
    /// Spend `HARVEST_COST` at `target`. Resource collection itself is
    /// deferred to a future resource subsystem.
    Harvest { target: crate::hex::HexCoord },
    /// Reserved for the resource subsystem. A no-op in this core; the shape
    /// is fixed now so later extensions don't break the action vocabulary.
    Consume { resource_type: String, amount: u32 },
}

/// The ordered command buffer for exactly one entity's script invocation.
///
/// Never shared across entities or across ticks: the tick runner creates a
/// fresh queue before each invocation and discards it once the queued
/// actions have been applied (or the invocation failed). Owned payloads
/// inside queued actions (the `resource_type` string of `Consume`) are
/// freed exactly once, either when [`ActionQueue::clear`] drops them or when
/// the queue itself is dropped — `Vec`'s own drop glue gives this for free,
/// there is no separate ownership discipline to hand-maintain.
#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: Vec<EntityAction>,
}

impl ActionQueue {
    /// Constructs a fresh, empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action to the end of the queue.
    pub fn add(&mut self, action: EntityAction) {
        self.actions.push(action);
    }

    /// Drops every queued action, releasing any owned payloads.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// The queued actions, in the exact order they were added.
    pub fn actions(&self) -> &[EntityAction] {
        &self.actions
    }

    /// The number of queued actions.
    pub fn count(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if no actions are queued.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexCoord;

    #[test]
    fn clear_drops_queued_actions_in_order() {
        let mut queue = ActionQueue::new();
        queue.add(EntityAction::Move {
            target: HexCoord::origin(),
        });
        queue.add(EntityAction::Consume {
            resource_type: "iron".into(),
            amount: 3,
        });
        assert_eq!(queue.count(), 2);
        queue.clear();
        assert!(queue.is_empty());
    }
}

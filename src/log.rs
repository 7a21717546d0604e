//! The logging sink contract consumed from the outside.
//!
//! The core never owns a subscriber; it only emits [`tracing`] events at two
//! call sites: the script-failure path the tick runner reaches on a
//! recovered error, and the spatial-query truncation path in `vm::world_api`.
//! Whatever host embeds this core installs a `tracing_subscriber` layer and
//! gets `kind`/entity-id/message structure for free through `tracing`'s
//! fields rather than this crate inventing its own sink trait.

use crate::entity::EntityId;
use crate::error::CoreError;

/// Emits a single script-failure event for `entity` through `tracing`.
/// Only the loggable variants of [`CoreError`] reach here — `ArgumentValidation`
/// and `ContextMissing` never do, because they are observed by the script
/// itself through its return value.
pub(crate) fn log_script_error(entity: EntityId, error: &CoreError) {
    debug_assert!(error.is_loggable());
    tracing::warn!(entity, error = %error, "script invocation failed");
}

/// Emits a truncation event for a `world` spatial query that filled its
/// result buffer. Not routed through [`log_script_error`] since it has no
/// associated entity and isn't part of the script-invocation error path.
pub(crate) fn log_truncation(error: &CoreError) {
    debug_assert!(matches!(error, CoreError::Truncation { .. }));
    tracing::debug!(error = %error, "spatial query truncated");
}

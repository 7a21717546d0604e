//! The error taxonomy consumed by the [`crate::runner::TickRunner`].
//!
//! Every variant maps to exactly one recovery policy from the simulation
//! core's point of view: most are recovered locally and never escape the
//! tick loop, a few are reduced to a conservative default value observed by
//! scripts, and only [`CoreError::AllocationFailure`] at construction time is
//! allowed to propagate out to the caller.

use thiserror::Error;

use crate::entity::EntityId;

/// The closed set of failure kinds the core can produce.
///
/// Only [`CoreError::AllocationFailure`] raised while constructing the VM,
/// [`crate::entity::EntityManager`], or [`crate::hex::HexGrid`] is allowed to
/// terminate the caller. Everything else is recovered by the
/// [`crate::runner::TickRunner`] for the entity that produced it.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An allocating primitive (VM registry slot, entity storage growth, grid
    /// insertion) could not obtain memory. Fatal for the operation that raised
    /// it; fatal for the whole process if raised during construction.
    #[error("allocation failed: {0}")]
    AllocationFailure(String),

    /// A script's source failed to parse or load into the VM.
    #[error("entity {entity} failed to load script: {message}")]
    VmLoadError {
        /// The entity whose script could not be loaded.
        entity: EntityId,
        /// The message captured from the scripting library.
        message: String,
    },

    /// A script raised or errored while executing.
    #[error("entity {entity} script error: {message}")]
    VmRuntimeError {
        /// The entity whose script invocation failed.
        entity: EntityId,
        /// The message captured from the scripting library.
        message: String,
    },

    /// A script called an API function with malformed arguments. Never
    /// logged: this is returned to the script as `false`/`nil`, not raised.
    #[error("invalid arguments to `{function}`")]
    ArgumentValidation {
        /// The API function name that rejected its arguments.
        function: &'static str,
    },

    /// An API function was called without the registry context it needs
    /// (entity, queue, grid, or manager pointer). Never logged: returns a
    /// conservative default (0, false, or nil) to the script.
    #[error("missing `{context}` context for `{function}`")]
    ContextMissing {
        /// Which registry slot was absent.
        context: &'static str,
        /// The API function that needed it.
        function: &'static str,
    },

    /// A spatial query produced more matches than its output buffer could
    /// hold. The result is silently truncated to capacity; this variant
    /// exists so call sites can record the fact even though scripts cannot
    /// observe it.
    #[error("spatial query truncated to {capacity} entries")]
    Truncation {
        /// The buffer capacity the query was truncated to.
        capacity: usize,
    },
}

impl CoreError {
    /// Returns true for the variants that must reach the external logging
    /// sink. `ArgumentValidation` and `ContextMissing` are deliberately
    /// excluded: they are observed by the script itself via its return value.
    pub fn is_loggable(&self) -> bool {
        matches!(
            self,
            CoreError::AllocationFailure(_)
                | CoreError::VmLoadError { .. }
                | CoreError::VmRuntimeError { .. }
        )
    }
}

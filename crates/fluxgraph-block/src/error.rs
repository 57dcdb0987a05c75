//! Typed errors for the block engine surface.
//!
//! [`BlockError`] is the top-level public error type of the crate.
//! Contract-level failures from `fluxgraph-core` are wrapped
//! transparently; actor-call failures are mapped through
//! [`BlockError::from_call_error`].

use thiserror::Error;

use fluxgraph_core::block::buffer::BufferError;
use fluxgraph_core::block::config::PortConfigError;
use fluxgraph_runtime::actor::CallError;

/// Errors produced by the block façade and work invocations.
#[derive(Debug, Error)]
pub enum BlockError {
    /// Façade command timed out waiting on the actor.
    #[error("block command '{operation}' timed out after {timeout_ms}ms")]
    CommandTimedOut {
        /// Operation name used for the actor call.
        operation: &'static str,
        /// Timeout budget used for the actor call.
        timeout_ms: u128,
    },
    /// Actor exited before the command completed.
    #[error("block actor exited while handling '{operation}'")]
    ActorExited {
        /// Operation name used for the actor call.
        operation: &'static str,
    },
    /// Teardown drain wait expired with messages still queued.
    #[error("block inbox failed to drain within {timeout_ms}ms")]
    DrainTimedOut {
        /// Timeout budget used for the drain wait.
        timeout_ms: u128,
    },
    /// Wrapped port configuration failure.
    #[error(transparent)]
    Config(#[from] PortConfigError),
    /// Wrapped buffer invariant failure.
    #[error(transparent)]
    Buffer(#[from] BufferError),
    /// Failure reported by a block implementation's work function.
    #[error("work failed: {source}")]
    Work {
        /// Underlying error from the block implementation.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BlockError {
    /// Wraps a block implementation error.
    pub fn work(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Work {
            source: source.into(),
        }
    }

    pub(crate) fn from_call_error(
        operation: &'static str,
        timeout: std::time::Duration,
        err: CallError,
    ) -> Self {
        match err {
            CallError::MailboxClosed | CallError::ActorStopped => Self::ActorExited { operation },
            CallError::Timeout => Self::CommandTimedOut {
                operation,
                timeout_ms: timeout.as_millis(),
            },
        }
    }
}

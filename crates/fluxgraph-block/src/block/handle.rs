use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use fluxgraph_core::block::config::{InputPortConfig, OutputPortConfig};
use fluxgraph_core::block::lifecycle::BlockLifecycle;
use fluxgraph_runtime::actor::{ActorRef, DrainError, Handler, Message};

use crate::block::actor::BlockActor;
use crate::block::endpoint::BlockEndpoint;
use crate::block::messages::{
    CommitConfigMessage, GetSnapshotMessage, NotifyActiveMessage, NotifyInactiveMessage,
    NotifyTopologyMessage, PerformWorkMessage, SetBufferAffinityMessage, SetInputConfigMessage,
    SetInterruptibleWorkMessage, SetOutputConfigMessage,
};
use crate::config::{BlockConfig, BlockEvent, BlockSnapshot};
use crate::error::BlockError;
use crate::infra::event_hub::EventHub;

/// Owning handle to one running block.
///
/// The handle is a thin command surface: every method forwards to the
/// block's actor and the actor's serialized inbox is the only place
/// block state ever changes. Dropping the handle drains the inbox
/// first, bounded by the configured drain timeout, so in-flight
/// deliveries are processed before the block goes away.
pub struct Block {
    name: String,
    actor_ref: ActorRef<BlockActor>,
    events: Arc<EventHub>,
    config: BlockConfig,
    drained: bool,
}

impl Block {
    pub(crate) fn new(
        name: String,
        actor_ref: ActorRef<BlockActor>,
        events: Arc<EventHub>,
        config: BlockConfig,
    ) -> Self {
        Self {
            name,
            actor_ref,
            events,
            config,
            drained: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delivery address for this block's inputs, handed to upstream
    /// peers.
    pub fn endpoint(&self) -> BlockEndpoint {
        BlockEndpoint::new(self.actor_ref.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BlockEvent> {
        self.events.subscribe()
    }

    /// Deliveries and commands accepted but not yet fully handled.
    pub fn queued_messages(&self) -> usize {
        self.actor_ref.queued_len()
    }

    /// Stages a config for an input port. Takes effect at the next
    /// [`commit_config`](Self::commit_config).
    pub fn set_input_config(
        &self,
        which_input: usize,
        config: InputPortConfig,
    ) -> Result<(), BlockError> {
        self.call(
            "set_input_config",
            SetInputConfigMessage {
                index: which_input,
                config,
            },
        )?
        .map_err(BlockError::from)
    }

    pub fn set_output_config(
        &self,
        which_output: usize,
        config: OutputPortConfig,
    ) -> Result<(), BlockError> {
        self.call(
            "set_output_config",
            SetOutputConfigMessage {
                index: which_output,
                config,
            },
        )?
        .map_err(BlockError::from)
    }

    /// Announces every staged port config to the block itself. The
    /// announcements queue behind deliveries already in flight.
    pub fn commit_config(&self) -> Result<(), BlockError> {
        self.cast("commit_config", CommitConfigMessage)
    }

    pub fn set_buffer_affinity(&self, affinity: i64) -> Result<(), BlockError> {
        self.cast("set_buffer_affinity", SetBufferAffinityMessage { affinity })
    }

    pub fn set_interruptible_work(&self, enabled: bool) -> Result<(), BlockError> {
        self.cast(
            "set_interruptible_work",
            SetInterruptibleWorkMessage { enabled },
        )
    }

    pub fn notify_active(&self) -> Result<(), BlockError> {
        self.cast("notify_active", NotifyActiveMessage)
    }

    pub fn notify_inactive(&self) -> Result<(), BlockError> {
        self.cast("notify_inactive", NotifyInactiveMessage)
    }

    pub fn notify_topology(
        &self,
        num_inputs: usize,
        num_outputs: usize,
    ) -> Result<(), BlockError> {
        self.cast(
            "notify_topology",
            NotifyTopologyMessage {
                num_inputs,
                num_outputs,
            },
        )
    }

    /// Runs one work invocation on the block's actor and waits for it.
    pub fn perform_work(&self) -> Result<(), BlockError> {
        self.call("perform_work", PerformWorkMessage)?
    }

    pub fn snapshot(&self) -> Result<BlockSnapshot, BlockError> {
        self.call("snapshot", GetSnapshotMessage)
    }

    pub fn lifecycle(&self) -> Result<BlockLifecycle, BlockError> {
        Ok(self.snapshot()?.lifecycle)
    }

    /// Blocks until the inbox is fully drained, bounded by the drain
    /// timeout. A message counts as queued until its handler returns.
    pub fn wait_drained(&self) -> Result<(), BlockError> {
        fluxgraph_runtime::block_on(self.actor_ref.wait_idle(self.config.drain_timeout)).map_err(
            |DrainError::Timeout| BlockError::DrainTimedOut {
                timeout_ms: self.config.drain_timeout.as_millis(),
            },
        )
    }

    /// Drains the inbox and consumes the handle.
    pub fn shutdown(mut self) -> Result<(), BlockError> {
        let result = self.wait_drained();
        self.drained = true;
        result
    }

    fn cast<M>(&self, operation: &'static str, message: M) -> Result<(), BlockError>
    where
        M: Message<Response = ()>,
        BlockActor: Handler<M>,
    {
        self.actor_ref
            .cast(message)
            .map_err(|_| BlockError::ActorExited { operation })
    }

    fn call<M>(&self, operation: &'static str, message: M) -> Result<M::Response, BlockError>
    where
        M: Message,
        BlockActor: Handler<M>,
    {
        self.actor_ref
            .call(message, self.config.command_timeout)
            .map_err(|err| BlockError::from_call_error(operation, self.config.command_timeout, err))
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        if self.drained {
            return;
        }
        // Cannot block inside a pool worker; owners on the pool call
        // shutdown explicitly instead.
        if tokio::runtime::Handle::try_current().is_ok() {
            return;
        }
        if let Err(err) = self.wait_drained() {
            warn!(block = %self.name, %err, "block dropped with an undrained inbox");
        }
    }
}

use fluxgraph_core::block::buffer::BufferHandle;
use fluxgraph_core::block::config::{InputPortConfig, OutputPortConfig, PortConfigError};
use fluxgraph_core::block::payload::Payload;
use fluxgraph_core::block::tag::Tag;
use fluxgraph_runtime::actor::Message;

use crate::config::BlockSnapshot;
use crate::error::BlockError;

pub(crate) struct SetInputConfigMessage {
    pub(crate) index: usize,
    pub(crate) config: InputPortConfig,
}

impl Message for SetInputConfigMessage {
    type Response = Result<(), PortConfigError>;
}

pub(crate) struct SetOutputConfigMessage {
    pub(crate) index: usize,
    pub(crate) config: OutputPortConfig,
}

impl Message for SetOutputConfigMessage {
    type Response = Result<(), PortConfigError>;
}

/// Atomically announces every staged port config by re-posting one
/// update per port to the block's own inbox.
pub(crate) struct CommitConfigMessage;

impl Message for CommitConfigMessage {
    type Response = ();
}

pub(crate) struct InputUpdatedMessage {
    pub(crate) index: usize,
}

impl Message for InputUpdatedMessage {
    type Response = ();
}

pub(crate) struct OutputUpdatedMessage {
    pub(crate) index: usize,
}

impl Message for OutputUpdatedMessage {
    type Response = ();
}

pub(crate) struct TagDeliveredMessage {
    pub(crate) index: usize,
    pub(crate) tag: Tag,
}

impl Message for TagDeliveredMessage {
    type Response = ();
}

pub(crate) struct PayloadDeliveredMessage {
    pub(crate) index: usize,
    pub(crate) payload: Payload,
}

impl Message for PayloadDeliveredMessage {
    type Response = ();
}

pub(crate) struct BufferDeliveredMessage {
    pub(crate) index: usize,
    pub(crate) buffer: BufferHandle,
}

impl Message for BufferDeliveredMessage {
    type Response = ();
}

pub(crate) struct NotifyActiveMessage;

impl Message for NotifyActiveMessage {
    type Response = ();
}

pub(crate) struct NotifyInactiveMessage;

impl Message for NotifyInactiveMessage {
    type Response = ();
}

pub(crate) struct NotifyTopologyMessage {
    pub(crate) num_inputs: usize,
    pub(crate) num_outputs: usize,
}

impl Message for NotifyTopologyMessage {
    type Response = ();
}

pub(crate) struct PerformWorkMessage;

impl Message for PerformWorkMessage {
    type Response = Result<(), BlockError>;
}

pub(crate) struct GetSnapshotMessage;

impl Message for GetSnapshotMessage {
    type Response = BlockSnapshot;
}

pub(crate) struct SetBufferAffinityMessage {
    pub(crate) affinity: i64,
}

impl Message for SetBufferAffinityMessage {
    type Response = ();
}

pub(crate) struct SetInterruptibleWorkMessage {
    pub(crate) enabled: bool,
}

impl Message for SetInterruptibleWorkMessage {
    type Response = ();
}

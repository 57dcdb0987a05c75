use fluxgraph_core::block::message::Delivery;
use fluxgraph_runtime::actor::{ActorRef, CastError};

use crate::block::actor::BlockActor;
use crate::block::messages::{
    BufferDeliveredMessage, PayloadDeliveredMessage, TagDeliveredMessage,
};

/// Cloneable delivery address for one block's inputs.
///
/// Upstream blocks and routers hold endpoints instead of the owning
/// [`Block`](crate::Block) handle, so data can keep flowing into a
/// block that only its owner may configure or tear down.
#[derive(Clone)]
pub struct BlockEndpoint {
    actor_ref: ActorRef<BlockActor>,
}

impl BlockEndpoint {
    pub(crate) fn new(actor_ref: ActorRef<BlockActor>) -> Self {
        Self { actor_ref }
    }

    /// Posts one delivery to `which_input`. Ownership of buffers moves
    /// with the message; tags and payloads are queued for the next
    /// work invocation to observe.
    pub fn deliver(&self, which_input: usize, delivery: Delivery) -> Result<(), CastError> {
        match delivery {
            Delivery::Tag(tag) => self.actor_ref.cast(TagDeliveredMessage {
                index: which_input,
                tag,
            }),
            Delivery::Payload(payload) => self.actor_ref.cast(PayloadDeliveredMessage {
                index: which_input,
                payload,
            }),
            Delivery::Buffer(buffer) => self.actor_ref.cast(BufferDeliveredMessage {
                index: which_input,
                buffer,
            }),
        }
    }

    /// False once the block's actor has exited.
    pub fn is_connected(&self) -> bool {
        !self.actor_ref.is_closed()
    }
}

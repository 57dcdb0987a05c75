use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::BufferDeliveredMessage;

#[async_trait::async_trait]
impl Handler<BufferDeliveredMessage> for BlockActor {
    async fn handle(
        &mut self,
        message: BufferDeliveredMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> () {
        self.io.accept_buffer(message.index, message.buffer);
    }
}

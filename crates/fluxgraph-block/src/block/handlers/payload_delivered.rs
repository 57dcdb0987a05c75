use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::PayloadDeliveredMessage;

#[async_trait::async_trait]
impl Handler<PayloadDeliveredMessage> for BlockActor {
    async fn handle(
        &mut self,
        message: PayloadDeliveredMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> () {
        self.io.accept_msg(message.index, message.payload);
    }
}

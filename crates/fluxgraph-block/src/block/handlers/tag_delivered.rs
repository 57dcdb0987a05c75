use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::TagDeliveredMessage;

#[async_trait::async_trait]
impl Handler<TagDeliveredMessage> for BlockActor {
    async fn handle(&mut self, message: TagDeliveredMessage, _ctx: &mut ActorContext<Self>) -> () {
        self.io.accept_tag(message.index, message.tag);
    }
}

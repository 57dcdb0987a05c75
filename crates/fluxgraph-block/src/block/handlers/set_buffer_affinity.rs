use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::SetBufferAffinityMessage;

#[async_trait::async_trait]
impl Handler<SetBufferAffinityMessage> for BlockActor {
    async fn handle(
        &mut self,
        message: SetBufferAffinityMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> () {
        self.io.set_buffer_affinity(message.affinity);
    }
}

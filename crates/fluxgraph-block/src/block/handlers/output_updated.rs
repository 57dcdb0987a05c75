use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::OutputUpdatedMessage;

#[async_trait::async_trait]
impl Handler<OutputUpdatedMessage> for BlockActor {
    async fn handle(&mut self, message: OutputUpdatedMessage, _ctx: &mut ActorContext<Self>) -> () {
        self.io.apply_output_update(message.index);
    }
}

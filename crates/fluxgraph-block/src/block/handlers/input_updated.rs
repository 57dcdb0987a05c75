use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::InputUpdatedMessage;

#[async_trait::async_trait]
impl Handler<InputUpdatedMessage> for BlockActor {
    async fn handle(&mut self, message: InputUpdatedMessage, _ctx: &mut ActorContext<Self>) -> () {
        self.io.apply_input_update(message.index);
    }
}

use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::SetInterruptibleWorkMessage;

#[async_trait::async_trait]
impl Handler<SetInterruptibleWorkMessage> for BlockActor {
    async fn handle(
        &mut self,
        message: SetInterruptibleWorkMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> () {
        self.io.set_interruptible_work(message.enabled);
    }
}

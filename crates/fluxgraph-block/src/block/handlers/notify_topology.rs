use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::NotifyTopologyMessage;

#[async_trait::async_trait]
impl Handler<NotifyTopologyMessage> for BlockActor {
    async fn handle(
        &mut self,
        message: NotifyTopologyMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> () {
        self.io
            .set_topology(message.num_inputs, message.num_outputs);
        self.logic
            .notify_topology(&mut self.io, message.num_inputs, message.num_outputs);
    }
}

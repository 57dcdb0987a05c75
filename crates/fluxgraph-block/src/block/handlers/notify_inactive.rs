use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::NotifyInactiveMessage;

#[async_trait::async_trait]
impl Handler<NotifyInactiveMessage> for BlockActor {
    async fn handle(
        &mut self,
        _message: NotifyInactiveMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> () {
        if self.io.lifecycle().is_done() {
            return;
        }
        self.io.set_inactive();
        self.logic.notify_inactive(&mut self.io);
    }
}

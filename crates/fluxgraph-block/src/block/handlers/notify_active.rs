use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::NotifyActiveMessage;

#[async_trait::async_trait]
impl Handler<NotifyActiveMessage> for BlockActor {
    async fn handle(&mut self, _message: NotifyActiveMessage, _ctx: &mut ActorContext<Self>) -> () {
        if self.io.lifecycle().is_done() {
            return;
        }
        self.io.set_active();
        self.logic.notify_active(&mut self.io);
    }
}

use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::GetSnapshotMessage;
use crate::config::BlockSnapshot;

#[async_trait::async_trait]
impl Handler<GetSnapshotMessage> for BlockActor {
    async fn handle(
        &mut self,
        _message: GetSnapshotMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> BlockSnapshot {
        self.io.snapshot()
    }
}

use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::PerformWorkMessage;
use crate::error::BlockError;

#[async_trait::async_trait]
impl Handler<PerformWorkMessage> for BlockActor {
    async fn handle(
        &mut self,
        _message: PerformWorkMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> Result<(), BlockError> {
        self.perform_work()
    }
}

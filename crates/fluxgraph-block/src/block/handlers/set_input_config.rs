use fluxgraph_core::block::config::PortConfigError;
use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::SetInputConfigMessage;

#[async_trait::async_trait]
impl Handler<SetInputConfigMessage> for BlockActor {
    async fn handle(
        &mut self,
        message: SetInputConfigMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> Result<(), PortConfigError> {
        self.io.set_input_config(message.index, message.config)
    }
}

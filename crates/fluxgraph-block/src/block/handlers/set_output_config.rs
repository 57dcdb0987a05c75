use fluxgraph_core::block::config::PortConfigError;
use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::SetOutputConfigMessage;

#[async_trait::async_trait]
impl Handler<SetOutputConfigMessage> for BlockActor {
    async fn handle(
        &mut self,
        message: SetOutputConfigMessage,
        _ctx: &mut ActorContext<Self>,
    ) -> Result<(), PortConfigError> {
        self.io.set_output_config(message.index, message.config)
    }
}

use tracing::debug;

use fluxgraph_runtime::actor::{ActorContext, Handler};

use crate::block::actor::BlockActor;
use crate::block::messages::{CommitConfigMessage, InputUpdatedMessage, OutputUpdatedMessage};

/// Re-posts one update per port to the block's own inbox instead of
/// applying in place. Updates then interleave with any deliveries
/// already queued, so a commit never reorders ahead of pending data.
#[async_trait::async_trait]
impl Handler<CommitConfigMessage> for BlockActor {
    async fn handle(&mut self, _message: CommitConfigMessage, ctx: &mut ActorContext<Self>) -> () {
        let self_ref = ctx.actor_ref();
        let inputs = self.io.committed_inputs();
        let outputs = self.io.committed_outputs();
        for index in 0..inputs {
            let _ = self_ref.cast(InputUpdatedMessage { index });
        }
        for index in 0..outputs {
            let _ = self_ref.cast(OutputUpdatedMessage { index });
        }
        debug!(block = %self.io.name(), inputs, outputs, "port configs committed");
    }
}

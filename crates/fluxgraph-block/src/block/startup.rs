use std::sync::Arc;

use tracing::debug;

use fluxgraph_core::block::topology::{BufferAllocator, PortRouter};
use fluxgraph_runtime::actor::spawn_actor;

use crate::block::actor::BlockActor;
use crate::block::handle::Block;
use crate::block::io::BlockIo;
use crate::block::logic::BlockLogic;
use crate::config::BlockConfig;
use crate::infra::event_hub::EventHub;

/// Starts a block with default timeouts.
pub fn start_block(
    name: impl Into<String>,
    logic: Box<dyn BlockLogic>,
    allocator: Arc<dyn BufferAllocator>,
    router: Arc<dyn PortRouter>,
) -> Block {
    start_block_with_config(name, logic, allocator, router, BlockConfig::default())
}

/// Starts a block's actor on the shared worker pool and returns the
/// owning handle.
pub fn start_block_with_config(
    name: impl Into<String>,
    logic: Box<dyn BlockLogic>,
    allocator: Arc<dyn BufferAllocator>,
    router: Arc<dyn PortRouter>,
    config: BlockConfig,
) -> Block {
    let name = name.into();
    let events = Arc::new(EventHub::new(config.event_capacity));
    let io = BlockIo::new(name.clone(), allocator, router, Arc::clone(&events));
    let actor = BlockActor::new(io, logic);
    let (actor_ref, _join) = spawn_actor(actor);
    debug!(block = %name, "block started");
    Block::new(name, actor_ref, events, config)
}

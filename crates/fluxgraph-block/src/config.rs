use std::time::Duration;

use fluxgraph_core::block::lifecycle::BlockLifecycle;
use fluxgraph_core::block::stats::BlockStats;

/// Runtime knobs for one block's actor and façade.
#[derive(Debug, Clone)]
pub struct BlockConfig {
    /// Timeout for façade calls that wait on an actor response.
    pub command_timeout: Duration,
    /// Bound on the teardown inbox-drain wait.
    pub drain_timeout: Duration,
    /// Capacity of the block event broadcast channel.
    pub event_capacity: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(5),
            drain_timeout: Duration::from_secs(5),
            event_capacity: 256,
        }
    }
}

/// Event emitted for the topology/supervisor layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEvent {
    LifecycleChanged { state: BlockLifecycle },
    InputFailed { port: usize },
    OutputFailed { port: usize },
}

/// Point-in-time view of a block's actor state, read through the
/// façade for scheduling decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSnapshot {
    pub lifecycle: BlockLifecycle,
    /// Locality hint consulted by the external allocator, -1 = none.
    pub buffer_affinity: i64,
    /// Whether the scheduler may preempt a blocked work call.
    pub interruptible_work: bool,
    pub stats: BlockStats,
}

use crate::block::io::BlockIo;
use crate::error::BlockError;

/// Behavior of one block, driven entirely through its [`BlockIo`].
///
/// All calls arrive serialized on the block's actor, so implementations
/// hold plain mutable state without any locking. The lifecycle and
/// topology hooks default to no-ops.
pub trait BlockLogic: Send + 'static {
    /// One unit of processing. Consume from inputs, produce to outputs,
    /// account for both through `io`.
    fn work(&mut self, io: &mut BlockIo) -> Result<(), BlockError>;

    /// Called after the block transitions to active.
    fn notify_active(&mut self, io: &mut BlockIo) {
        let _ = io;
    }

    /// Called after the block transitions to inactive.
    fn notify_inactive(&mut self, io: &mut BlockIo) {
        let _ = io;
    }

    /// Called when the topology layer announces the connected port
    /// counts.
    fn notify_topology(&mut self, io: &mut BlockIo, num_inputs: usize, num_outputs: usize) {
        let _ = (io, num_inputs, num_outputs);
    }
}

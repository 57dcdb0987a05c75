use tracing::debug;

use crate::block::io::BlockIo;
use crate::block::logic::BlockLogic;
use crate::error::BlockError;

/// The block actor: owns the I/O state bundle and the block logic.
/// Every handler in `handlers/` runs serialized against this struct.
pub(crate) struct BlockActor {
    pub(crate) io: BlockIo,
    pub(crate) logic: Box<dyn BlockLogic>,
}

impl BlockActor {
    pub(crate) fn new(io: BlockIo, logic: Box<dyn BlockLogic>) -> Self {
        Self { io, logic }
    }

    pub(crate) fn perform_work(&mut self) -> Result<(), BlockError> {
        if self.io.lifecycle().is_done() {
            debug!(block = %self.io.name(), "work skipped, block is done");
            return Ok(());
        }
        self.logic.work(&mut self.io)
    }
}

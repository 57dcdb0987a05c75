//! Interfaces to the two external collaborators: the buffer allocator
//! and the topology/connection layer. The block core consumes these,
//! it never implements connection resolution or physical allocation
//! policy itself.

use crate::block::buffer::BufferHandle;
use crate::block::message::Delivery;

/// "No locality preference" affinity value.
pub const NO_AFFINITY: i64 = -1;

/// Buffer-producing capability supplied by the external memory pool.
pub trait BufferAllocator: Send + Sync {
    /// Returns a buffer of at least `min_bytes` bytes; the actual
    /// length may exceed the request. `affinity` is the requesting
    /// block's locality hint, [`NO_AFFINITY`] when it has none.
    fn allocate(&self, min_bytes: usize, affinity: i64) -> BufferHandle;
}

/// Connection-resolution capability supplied by the topology layer.
///
/// Port indices are the posting block's own port numbers; the topology
/// maps them onto the neighbors' input/output indices.
pub trait PortRouter: Send + Sync {
    /// Posts to every downstream neighbor of output `port`.
    fn post_downstream(&self, port: usize, delivery: Delivery);

    /// Posts to every upstream neighbor of input `port`.
    fn post_upstream(&self, port: usize, delivery: Delivery);

    /// Degraded-flow signal: input `port` can no longer make progress.
    fn report_input_fail(&self, port: usize);

    /// Degraded-flow signal: output `port` can no longer make progress.
    fn report_output_fail(&self, port: usize);
}

/// Heap allocator that rounds requests up to an allocation granularity,
/// so returned buffers routinely exceed the requested size.
#[derive(Debug, Clone, Copy)]
pub struct HeapAllocator {
    granularity: usize,
}

impl HeapAllocator {
    pub fn new(granularity: usize) -> Self {
        Self {
            granularity: granularity.max(1),
        }
    }
}

impl Default for HeapAllocator {
    fn default() -> Self {
        Self::new(4096)
    }
}

impl BufferAllocator for HeapAllocator {
    fn allocate(&self, min_bytes: usize, _affinity: i64) -> BufferHandle {
        let bytes = min_bytes
            .max(1)
            .div_ceil(self.granularity)
            .saturating_mul(self.granularity);
        BufferHandle::zeroed(bytes)
    }
}

/// Router for a block with no resolved connections: every post and
/// fail signal is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRouter;

impl PortRouter for NullRouter {
    fn post_downstream(&self, _port: usize, _delivery: Delivery) {}

    fn post_upstream(&self, _port: usize, _delivery: Delivery) {}

    fn report_input_fail(&self, _port: usize) {}

    fn report_output_fail(&self, _port: usize) {}
}

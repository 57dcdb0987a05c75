//! Per-block runtime state and the work-facing operation surface.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, warn};

use fluxgraph_core::block::buffer::{BufferError, BufferHandle};
use fluxgraph_core::block::config::{
    InputPortConfig, OutputPortConfig, PortConfigError, PortConfigs,
};
use fluxgraph_core::block::lifecycle::BlockLifecycle;
use fluxgraph_core::block::message::Delivery;
use fluxgraph_core::block::payload::Payload;
use fluxgraph_core::block::stats::BlockStats;
use fluxgraph_core::block::tag::Tag;
use fluxgraph_core::block::topology::{BufferAllocator, PortRouter, NO_AFFINITY};

use crate::config::{BlockEvent, BlockSnapshot};
use crate::infra::event_hub::EventHub;

/// The exclusively-owned, mutable state of one block.
///
/// Lives inside the block's actor and is only ever touched by the
/// actor's own serialized message handling, so none of it is locked.
/// Block implementations receive `&mut BlockIo` for the duration of a
/// work call and use it for all consume/produce accounting, tag and
/// message traffic, and buffer access.
pub struct BlockIo {
    name: String,
    lifecycle: BlockLifecycle,
    num_inputs: usize,
    num_outputs: usize,
    input_configs: PortConfigs<InputPortConfig>,
    output_configs: PortConfigs<OutputPortConfig>,
    input_queues: Vec<VecDeque<BufferHandle>>,
    output_pending: Vec<Option<BufferHandle>>,
    input_tags: Vec<Vec<Tag>>,
    input_msgs: Vec<Vec<Payload>>,
    msgs_read: Vec<usize>,
    stats: BlockStats,
    buffer_affinity: i64,
    interruptible_work: bool,
    allocator: Arc<dyn BufferAllocator>,
    router: Arc<dyn PortRouter>,
    events: Arc<EventHub>,
}

/// A block that computed a negative quantity shows up here as a huge
/// unsigned value with the sign bit set. That is a contract violation
/// by the block implementation, so it aborts the call path instead of
/// flowing into a recoverable error.
fn assert_countable(num_items: usize) {
    assert!(
        (num_items as isize) >= 0,
        "item count has the sign bit set: {num_items}"
    );
}

impl BlockIo {
    pub(crate) fn new(
        name: String,
        allocator: Arc<dyn BufferAllocator>,
        router: Arc<dyn PortRouter>,
        events: Arc<EventHub>,
    ) -> Self {
        Self {
            name,
            lifecycle: BlockLifecycle::Init,
            num_inputs: 0,
            num_outputs: 0,
            input_configs: PortConfigs::default(),
            output_configs: PortConfigs::default(),
            input_queues: Vec::new(),
            output_pending: Vec::new(),
            input_tags: Vec::new(),
            input_msgs: Vec::new(),
            msgs_read: Vec::new(),
            stats: BlockStats::default(),
            buffer_affinity: NO_AFFINITY,
            interruptible_work: false,
            allocator,
            router,
            events,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lifecycle(&self) -> BlockLifecycle {
        self.lifecycle
    }

    /// Inputs announced by the topology layer; whole-block operations
    /// apply to exactly this many ports.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    // ---- configuration -------------------------------------------------

    /// Resolved config for an input port (falls back to the highest
    /// configured index).
    pub fn input_config(&self, which_input: usize) -> &InputPortConfig {
        self.input_configs.get(which_input)
    }

    pub fn output_config(&self, which_output: usize) -> &OutputPortConfig {
        self.output_configs.get(which_output)
    }

    pub(crate) fn set_input_config(
        &mut self,
        which_input: usize,
        config: InputPortConfig,
    ) -> Result<(), PortConfigError> {
        self.input_configs.set(which_input, config)
    }

    pub(crate) fn set_output_config(
        &mut self,
        which_output: usize,
        config: OutputPortConfig,
    ) -> Result<(), PortConfigError> {
        self.output_configs.set(which_output, config)
    }

    /// Ports the commit protocol announces: everything the topology
    /// has declared, plus any explicitly configured beyond that.
    pub(crate) fn committed_inputs(&self) -> usize {
        self.num_inputs.max(self.input_configs.len())
    }

    pub(crate) fn committed_outputs(&self) -> usize {
        self.num_outputs.max(self.output_configs.len())
    }

    /// Reacts to a config-committed announcement for an input port.
    /// Stages the configured preload so the first work invocation
    /// already sees data.
    pub(crate) fn apply_input_update(&mut self, which_input: usize) {
        self.ensure_input(which_input);
        let config = *self.input_configs.get(which_input);
        if config.preload_items > 0 && self.queued_input_bytes(which_input) == 0 {
            let bytes = config.preload_items * config.item_size;
            self.input_queues[which_input].push_back(BufferHandle::zeroed(bytes));
            debug!(
                block = %self.name,
                input = which_input,
                bytes,
                "staged preload buffer"
            );
        }
    }

    pub(crate) fn apply_output_update(&mut self, which_output: usize) {
        self.ensure_output(which_output);
    }

    // ---- lifecycle -----------------------------------------------------

    pub(crate) fn set_active(&mut self) {
        if self.lifecycle.is_done() || self.lifecycle == BlockLifecycle::Active {
            return;
        }
        self.lifecycle = BlockLifecycle::Active;
        debug!(block = %self.name, "block active");
        self.events.emit(BlockEvent::LifecycleChanged {
            state: self.lifecycle,
        });
    }

    pub(crate) fn set_inactive(&mut self) {
        if self.lifecycle.is_done() || self.lifecycle == BlockLifecycle::Inactive {
            return;
        }
        self.lifecycle = BlockLifecycle::Inactive;
        debug!(block = %self.name, "block inactive");
        self.events.emit(BlockEvent::LifecycleChanged {
            state: self.lifecycle,
        });
    }

    pub(crate) fn set_topology(&mut self, num_inputs: usize, num_outputs: usize) {
        self.num_inputs = num_inputs;
        self.num_outputs = num_outputs;
        if num_inputs > 0 {
            self.ensure_input(num_inputs - 1);
        }
        if num_outputs > 0 {
            self.ensure_output(num_outputs - 1);
        }
    }

    /// Terminal and idempotent: once done, a block never goes back.
    pub fn mark_done(&mut self) {
        if self.lifecycle.is_done() {
            return;
        }
        self.lifecycle = BlockLifecycle::Done;
        debug!(block = %self.name, "block done");
        self.events.emit(BlockEvent::LifecycleChanged {
            state: self.lifecycle,
        });
    }

    // ---- consume / produce accounting ----------------------------------

    /// Advances the input queue's read cursor by `num_items` items and
    /// credits the cumulative consumed counter.
    pub fn consume(&mut self, which_input: usize, num_items: usize) {
        assert_countable(num_items);
        self.ensure_input(which_input);
        let item_size = self.input_configs.get(which_input).item_size;
        let mut remaining = num_items * item_size;
        let queue = &mut self.input_queues[which_input];
        while remaining > 0 {
            let Some(front) = queue.front_mut() else {
                break;
            };
            let take = remaining.min(front.len());
            front
                .advance(take)
                .expect("advance is bounded by the front buffer's length");
            remaining -= take;
            if front.is_empty() {
                queue.pop_front();
            }
        }
        debug_assert!(
            remaining == 0,
            "consumed past the queued data on input {which_input}"
        );
        self.stats.items_consumed[which_input] += num_items as u64;
    }

    /// Credits the produced counter and flushes the pending output
    /// buffer downstream, ownership moving with the message.
    pub fn produce(&mut self, which_output: usize, num_items: usize) {
        assert_countable(num_items);
        self.ensure_output(which_output);
        self.stats.items_produced[which_output] += num_items as u64;
        if let Some(buffer) = self.output_pending[which_output].take() {
            self.router
                .post_downstream(which_output, Delivery::Buffer(buffer));
        }
    }

    /// Whole-block variant: every topology-announced input advances in
    /// lockstep.
    pub fn consume_each(&mut self, num_items: usize) {
        for which_input in 0..self.num_inputs {
            self.consume(which_input, num_items);
        }
    }

    pub fn produce_each(&mut self, num_items: usize) {
        for which_output in 0..self.num_outputs {
            self.produce(which_output, num_items);
        }
    }

    /// Cumulative items consumed; authoritative for tag re-basing.
    pub fn consumed(&self, which_input: usize) -> u64 {
        self.stats.items_consumed(which_input)
    }

    pub fn produced(&self, which_output: usize) -> u64 {
        self.stats.items_produced(which_output)
    }

    // ---- tags ----------------------------------------------------------

    pub fn post_output_tag(&mut self, which_output: usize, tag: Tag) {
        self.ensure_output(which_output);
        self.stats.tags_produced[which_output] += 1;
        self.router.post_downstream(which_output, Delivery::Tag(tag));
    }

    /// Restartable, non-consuming view of the tags buffered on an
    /// input. Clearing is a separate, explicit operation.
    pub fn input_tags(&self, which_input: usize) -> &[Tag] {
        self.input_tags
            .get(which_input)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn clear_input_tags(&mut self, which_input: usize) {
        if let Some(tags) = self.input_tags.get_mut(which_input) {
            tags.clear();
        }
    }

    /// Forwards tags from `which_input` to every output, re-basing
    /// each offset with the current consumed/produced counters so the
    /// tag keeps its logical position in the combined stream.
    pub fn propagate_tags(&mut self, which_input: usize, tags: &[Tag]) {
        let consumed = self.consumed(which_input);
        for which_output in 0..self.num_outputs {
            let produced = self.produced(which_output);
            for tag in tags {
                self.post_output_tag(which_output, tag.rebased(consumed, produced));
            }
        }
    }

    // ---- out-of-band messages ------------------------------------------

    pub fn post_output_msg(&mut self, which_output: usize, msg: Payload) {
        self.ensure_output(which_output);
        self.stats.msgs_produced[which_output] += 1;
        self.router
            .post_downstream(which_output, Delivery::Payload(msg));
    }

    /// Pops the next unread message on an input. The read cursor never
    /// rewinds; popping past the tail is a routine empty result.
    pub fn pop_input_msg(&mut self, which_input: usize) -> Option<Payload> {
        self.ensure_input(which_input);
        let read = &mut self.msgs_read[which_input];
        let msgs = &self.input_msgs[which_input];
        if *read >= msgs.len() {
            return None;
        }
        let msg = msgs[*read].clone();
        *read += 1;
        self.stats.msgs_consumed[which_input] += 1;
        Some(msg)
    }

    // ---- buffers -------------------------------------------------------

    /// Peeks the buffer fronting an input queue without removing it.
    pub fn input_buffer(&self, which_input: usize) -> Option<&BufferHandle> {
        self.input_queues.get(which_input).and_then(VecDeque::front)
    }

    /// Mutable peek, for in-place production into the input's storage.
    pub fn input_buffer_mut(&mut self, which_input: usize) -> Option<&mut BufferHandle> {
        self.input_queues
            .get_mut(which_input)
            .and_then(VecDeque::front_mut)
    }

    /// The buffer fronting an output queue, allocated on demand. Its
    /// logical length is pre-set to the full actual capacity: unless
    /// [`pop_output_buffer`](Self::pop_output_buffer) narrows it, the
    /// entire capacity counts as produced.
    pub fn output_buffer(&mut self, which_output: usize) -> &mut BufferHandle {
        self.ensure_output(which_output);
        if self.output_pending[which_output].is_none() {
            let config = self.output_configs.get(which_output);
            let mut bytes = config.reserve_items.max(1) * config.item_size;
            if config.maximum_items > 0 {
                bytes = bytes.min(config.maximum_items * config.item_size);
            }
            let buffer = self.allocator.allocate(bytes, self.buffer_affinity);
            self.output_pending[which_output] = Some(buffer);
        }
        let buffer = self.output_pending[which_output]
            .as_mut()
            .expect("pending output buffer was just ensured");
        let full = buffer.actual_len();
        buffer
            .set_len(full)
            .expect("actual length always fits itself");
        buffer
    }

    /// Narrows the pending output buffer to exactly `num_bytes` before
    /// it is produced.
    pub fn pop_output_buffer(
        &mut self,
        which_output: usize,
        num_bytes: usize,
    ) -> Result<(), BufferError> {
        self.output_buffer(which_output);
        self.output_pending[which_output]
            .as_mut()
            .expect("pending output buffer was just ensured")
            .set_len(num_bytes)
    }

    /// Pushes an externally-supplied buffer directly into the produce
    /// path, bypassing this block's own output allocation. Used for
    /// zero-copy pass-through.
    pub fn post_output_buffer(&mut self, which_output: usize, buffer: BufferHandle) {
        self.ensure_output(which_output);
        let item_size = self.output_configs.get(which_output).item_size;
        self.stats.items_produced[which_output] += (buffer.len() / item_size) as u64;
        self.router
            .post_downstream(which_output, Delivery::Buffer(buffer));
    }

    pub(crate) fn queued_input_bytes(&self, which_input: usize) -> usize {
        self.input_queues
            .get(which_input)
            .map(|queue| queue.iter().map(BufferHandle::len).sum())
            .unwrap_or(0)
    }

    // ---- failure signals -----------------------------------------------

    /// Degraded-flow signal: this input can no longer make progress.
    /// The topology layer decides whether the block must stop.
    pub fn mark_input_fail(&mut self, which_input: usize) {
        warn!(block = %self.name, input = which_input, "input marked failed");
        self.router.report_input_fail(which_input);
        self.events.emit(BlockEvent::InputFailed { port: which_input });
    }

    pub fn mark_output_fail(&mut self, which_output: usize) {
        warn!(block = %self.name, output = which_output, "output marked failed");
        self.router.report_output_fail(which_output);
        self.events.emit(BlockEvent::OutputFailed { port: which_output });
    }

    // ---- hints ---------------------------------------------------------

    pub fn set_buffer_affinity(&mut self, affinity: i64) {
        self.buffer_affinity = affinity;
    }

    pub fn buffer_affinity(&self) -> i64 {
        self.buffer_affinity
    }

    pub fn set_interruptible_work(&mut self, enabled: bool) {
        self.interruptible_work = enabled;
    }

    pub fn interruptible_work(&self) -> bool {
        self.interruptible_work
    }

    // ---- inbox intake (actor-side) -------------------------------------

    pub(crate) fn accept_tag(&mut self, which_input: usize, tag: Tag) {
        self.ensure_input(which_input);
        self.input_tags[which_input].push(tag);
    }

    pub(crate) fn accept_msg(&mut self, which_input: usize, msg: Payload) {
        self.ensure_input(which_input);
        self.input_msgs[which_input].push(msg);
    }

    pub(crate) fn accept_buffer(&mut self, which_input: usize, buffer: BufferHandle) {
        self.ensure_input(which_input);
        self.input_queues[which_input].push_back(buffer);
    }

    pub(crate) fn snapshot(&self) -> BlockSnapshot {
        BlockSnapshot {
            lifecycle: self.lifecycle,
            buffer_affinity: self.buffer_affinity,
            interruptible_work: self.interruptible_work,
            stats: self.stats.clone(),
        }
    }

    fn ensure_input(&mut self, which_input: usize) {
        if self.input_queues.len() <= which_input {
            self.input_queues.resize_with(which_input + 1, VecDeque::new);
            self.input_tags.resize_with(which_input + 1, Vec::new);
            self.input_msgs.resize_with(which_input + 1, Vec::new);
            self.msgs_read.resize(which_input + 1, 0);
        }
        self.stats.ensure_input(which_input);
    }

    fn ensure_output(&mut self, which_output: usize) {
        if self.output_pending.len() <= which_output {
            self.output_pending
                .resize_with(which_output + 1, || None);
        }
        self.stats.ensure_output(which_output);
    }
}

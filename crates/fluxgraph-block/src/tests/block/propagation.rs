//! Tag forwarding and offset re-basing across blocks.

use std::sync::Arc;

use fluxgraph_core::block::buffer::BufferHandle;
use fluxgraph_core::block::config::InputPortConfig;
use fluxgraph_core::block::message::Delivery;
use fluxgraph_core::block::payload::Payload;
use fluxgraph_core::block::tag::Tag;
use fluxgraph_core::block::topology::HeapAllocator;

use super::test_harness::{CaptureRouter, FnLogic, ForwardRouter, RouterEvent, RECV_TIMEOUT};
use crate::block::startup::start_block;

#[test]
fn propagated_tags_are_rebased_against_stream_counters() {
    let (router, rx) = CaptureRouter::pair();
    let block = start_block(
        "rebaser",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            io.consume(0, 5);
            io.produce(0, 3);
            let tags: Vec<Tag> = io.input_tags(0).to_vec();
            io.propagate_tags(0, &tags);
            io.clear_input_tags(0);
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block.notify_topology(1, 1).expect("notify topology");
    block
        .endpoint()
        .deliver(0, Delivery::Buffer(BufferHandle::zeroed(8)))
        .expect("deliver buffer");
    block
        .endpoint()
        .deliver(0, Delivery::Tag(Tag::new(10, Payload::new("mark"))))
        .expect("deliver tag");

    block.perform_work().expect("work");

    // offset 10, 5 consumed, 3 produced: the tag lands at 10 - 5 + 3.
    match rx.recv_timeout(RECV_TIMEOUT).expect("router event") {
        RouterEvent::Downstream(0, Delivery::Tag(tag)) => {
            assert_eq!(tag.offset, 8);
            assert_eq!(tag.value.downcast_ref::<&str>(), Some(&"mark"));
        }
        other => panic!("unexpected router event: {other:?}"),
    }
    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.tags_produced[0], 1);
    block.shutdown().expect("shutdown");
}

#[test]
fn propagation_with_no_outputs_posts_nothing() {
    let (router, rx) = CaptureRouter::pair();
    let block = start_block(
        "sink",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            let tags: Vec<Tag> = io.input_tags(0).to_vec();
            io.propagate_tags(0, &tags);
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block.notify_topology(1, 0).expect("notify topology");
    block
        .endpoint()
        .deliver(0, Delivery::Tag(Tag::new(3, Payload::new(()))))
        .expect("deliver tag");

    block.perform_work().expect("work");

    assert!(rx.try_recv().is_err());
    block.shutdown().expect("shutdown");
}

#[test]
fn tags_buffered_on_an_input_survive_until_cleared() {
    let (router, _events) = CaptureRouter::pair();
    let (seen_tx, seen_rx) = crossbeam_channel::unbounded();
    let block = start_block(
        "tag-reader",
        Box::new(FnLogic(move |io: &mut crate::BlockIo| {
            let _ = seen_tx.send(io.input_tags(0).len());
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block
        .endpoint()
        .deliver(0, Delivery::Tag(Tag::new(1, Payload::new(()))))
        .expect("deliver tag");
    block
        .endpoint()
        .deliver(0, Delivery::Tag(Tag::new(2, Payload::new(()))))
        .expect("deliver tag");

    // Two reads see the same two queued tags; nothing consumes them.
    block.perform_work().expect("first work");
    block.perform_work().expect("second work");

    assert_eq!(seen_rx.recv_timeout(RECV_TIMEOUT).expect("count"), 2);
    assert_eq!(seen_rx.recv_timeout(RECV_TIMEOUT).expect("count"), 2);
    block.shutdown().expect("shutdown");
}

#[test]
fn tags_flow_between_connected_blocks() {
    let (seen_tx, seen_rx) = crossbeam_channel::unbounded();
    let (sink_router, _sink_events) = CaptureRouter::pair();
    let sink = start_block(
        "sink",
        Box::new(FnLogic(move |io: &mut crate::BlockIo| {
            for tag in io.input_tags(0) {
                let _ = seen_tx.send(tag.offset);
            }
            io.clear_input_tags(0);
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        sink_router,
    );

    let source = start_block(
        "source",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            io.post_output_tag(0, Tag::new(21, Payload::new(())));
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        Arc::new(ForwardRouter::new(sink.endpoint(), 0)),
    );

    source.perform_work().expect("source work");
    // The source's post was cast into the sink's inbox; the sink's
    // serialized inbox guarantees it lands before this work request.
    sink.perform_work().expect("sink work");

    assert_eq!(seen_rx.recv_timeout(RECV_TIMEOUT).expect("offset"), 21);
    source.shutdown().expect("shutdown source");
    sink.shutdown().expect("shutdown sink");
}

#[test]
fn committing_configs_stages_the_configured_preload() {
    let (router, _events) = CaptureRouter::pair();
    let (seen_tx, seen_rx) = crossbeam_channel::unbounded();
    let block = start_block(
        "preloaded",
        Box::new(FnLogic(move |io: &mut crate::BlockIo| {
            let _ = seen_tx.send(io.input_buffer(0).map(|buffer| buffer.len()));
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block
        .set_input_config(
            0,
            InputPortConfig {
                item_size: 4,
                preload_items: 16,
                ..InputPortConfig::default()
            },
        )
        .expect("set input config");
    block.commit_config().expect("commit config");
    // The commit re-posts per-port updates to the block itself; wait
    // for those self-addressed messages to be handled.
    block.wait_drained().expect("drain commit updates");

    block.perform_work().expect("work");
    let staged = seen_rx.recv_timeout(RECV_TIMEOUT).expect("staged length");
    assert_eq!(staged, Some(64));
    block.shutdown().expect("shutdown");
}
